//! Parsing ELF bytes into the region tree.
//!
//! The parser reads the three header tables, converts every entry into a
//! byte range, and folds the ranges into the region tree: special leaves
//! first (the header, both tables, the section-name table, then every
//! section), segments last, wrapping whatever their file range covers.

use crate::{
    Result, bad_class_error, bad_data_error, bad_header_size_error, bad_magic_error,
    bad_version_error,
    class::{ElfClass, PhdrFields, ShdrFields},
    codec::Cursor,
    defs::{
        Class, Encoding, Machine, ObjectKind, OsAbi, SectionFlags, SectionType, SegmentFlags,
        SegmentType,
    },
    image::{ElfFile, ElfImage},
    region::{DataRegion, RegionSizes, Section, Segment, insert_at, insert_segment},
    strtab, truncated_error,
};
use alloc::{format, vec, vec::Vec};
use core::marker::PhantomData;
use elf::abi;

impl ElfFile {
    /// Parses an ELF image of either class, dispatching on the ident.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let ident = bytes
            .get(..16)
            .ok_or_else(|| truncated_error("ELF identifier"))?;
        if ident[..4] != abi::ELFMAGIC {
            return Err(bad_magic_error(format!(
                "file starts with {:02x?}",
                &ident[..4]
            )));
        }
        match Class::from_byte(ident[4]) {
            Some(Class::Elf32) => Ok(ElfFile::Elf32(ElfImage::parse(bytes)?)),
            Some(Class::Elf64) => Ok(ElfFile::Elf64(ElfImage::parse(bytes)?)),
            None => Err(bad_class_error(format!("class byte {:#04x}", ident[4]))),
        }
    }
}

impl<C: ElfClass> ElfImage<C> {
    /// Parses an ELF image of this class. Fails with `BadClass` when the
    /// input carries the other address width.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let ident = bytes
            .get(..16)
            .ok_or_else(|| truncated_error("ELF identifier"))?;
        if ident[..4] != abi::ELFMAGIC {
            return Err(bad_magic_error(format!(
                "file starts with {:02x?}",
                &ident[..4]
            )));
        }
        let class = Class::from_byte(ident[4])
            .ok_or_else(|| bad_class_error(format!("class byte {:#04x}", ident[4])))?;
        if class != C::CLASS {
            return Err(bad_class_error(format!(
                "expected {:?}, found {class:?}",
                C::CLASS
            )));
        }
        let encoding = Encoding::from_byte(ident[5])
            .ok_or_else(|| bad_data_error(format!("data byte {:#04x}", ident[5])))?;
        let version = ident[6];
        if version != abi::EV_CURRENT as u8 {
            return Err(bad_version_error(format!("ident version {version}")));
        }
        let osabi = OsAbi::from_u8(ident[7]);
        let abi_version = ident[8];

        let mut cur = Cursor::new(bytes, encoding);
        cur.seek(16)?;
        let kind = ObjectKind::from_u16(cur.u16()?);
        let machine = Machine::from_u16(cur.u16()?);
        let version32 = cur.u32()?;
        if version32 != u32::from(version) {
            return Err(bad_version_error(format!("header version {version32}")));
        }
        let entry = C::read_addr(&mut cur)?;
        let phoff = C::read_addr(&mut cur)?;
        let shoff = C::read_addr(&mut cur)?;
        let flags = cur.u32()?;
        let ehsize = cur.u16()?;
        let phentsize = cur.u16()?;
        let phnum = cur.u16()?;
        let shentsize = cur.u16()?;
        let shnum = cur.u16()?;
        let shstrndx = cur.u16()?;

        if C::CLASS == Class::Elf64 && usize::from(ehsize) != C::EHDR_SIZE {
            return Err(bad_header_size_error(format!("e_ehsize {ehsize}")));
        }
        if usize::from(phentsize) != C::PHDR_SIZE {
            return Err(bad_header_size_error(format!("e_phentsize {phentsize}")));
        }
        if usize::from(shentsize) != C::SHDR_SIZE {
            return Err(bad_header_size_error(format!("e_shentsize {shentsize}")));
        }

        #[cfg(feature = "log")]
        log::debug!(
            "parsing {:?} {:?} image: {} section headers, {} program headers",
            C::CLASS,
            encoding,
            shnum,
            phnum
        );

        let mut shdrs: Vec<ShdrFields> = Vec::with_capacity(usize::from(shnum));
        for i in 0..u64::from(shnum) {
            cur.seek(shoff + i * C::SHDR_SIZE as u64)?;
            shdrs.push(C::read_shdr(&mut cur)?);
        }

        // An `e_shstrndx` of 0 (`SHN_UNDEF`) means the file carries no
        // section-name table at all.
        let has_name_table = shnum > 0 && shstrndx != 0;
        let name_table_bytes: &[u8] = if has_name_table {
            let shdr = shdrs.get(usize::from(shstrndx)).ok_or_else(|| {
                truncated_error(format!("e_shstrndx {shstrndx} out of range"))
            })?;
            slice_range(bytes, shdr.offset, shdr.size)?
        } else {
            &[]
        };

        // (file offset, leaf) pairs for the fold below.
        let mut leaves: Vec<(u64, DataRegion)> = Vec::with_capacity(shdrs.len());
        for (i, shdr) in shdrs.iter().enumerate() {
            if has_name_table && i == usize::from(shstrndx) {
                leaves.push((shdr.offset, DataRegion::SectionNameTable));
                continue;
            }
            let name = if name_table_bytes.is_empty() {
                Vec::new()
            } else {
                strtab::lookup(name_table_bytes, u64::from(shdr.name))?.to_vec()
            };
            let section_kind = SectionType::from_u32(shdr.kind);
            let content = if section_kind == SectionType::NoBits {
                Vec::new()
            } else {
                slice_range(bytes, shdr.offset, shdr.size)?.to_vec()
            };
            leaves.push((
                shdr.offset,
                DataRegion::Section(Section {
                    name,
                    kind: section_kind,
                    flags: SectionFlags::from_bits_retain(shdr.flags),
                    addr: shdr.addr,
                    size: shdr.size,
                    link: shdr.link,
                    info: shdr.info,
                    addralign: shdr.addralign,
                    entsize: shdr.entsize,
                    content,
                }),
            ));
        }

        let mut phdrs: Vec<PhdrFields> = Vec::with_capacity(usize::from(phnum));
        for i in 0..u64::from(phnum) {
            cur.seek(phoff + i * C::PHDR_SIZE as u64)?;
            phdrs.push(C::read_phdr(&mut cur)?);
        }

        let sizes = RegionSizes {
            ehdr: C::EHDR_SIZE as u64,
            phdr_table: u64::from(phnum) * C::PHDR_SIZE as u64,
            shdr_table: u64::from(shnum) * C::SHDR_SIZE as u64,
            name_table: name_table_bytes.len() as u64,
        };
        let mut regions = vec![DataRegion::Raw(bytes.to_vec())];
        insert_at(&mut regions, 0, 0, DataRegion::ElfHeader, &sizes)?;
        if phnum > 0 {
            insert_at(&mut regions, 0, phoff, DataRegion::SegmentHeaders, &sizes)?;
        }
        if shnum > 0 {
            insert_at(&mut regions, 0, shoff, DataRegion::SectionHeaders, &sizes)?;
        }
        for (offset, leaf) in leaves {
            insert_at(&mut regions, 0, offset, leaf, &sizes)?;
        }
        for phdr in phdrs {
            let segment = Segment {
                kind: SegmentType::from_u32(phdr.kind),
                flags: SegmentFlags::from_bits_retain(phdr.flags),
                vaddr: phdr.vaddr,
                paddr: phdr.paddr,
                align: phdr.align,
                memsz: phdr.memsz,
                regions: Vec::new(),
            };
            insert_segment(&mut regions, 0, phdr.offset, phdr.filesz, segment, &sizes)?;
        }

        Ok(ElfImage {
            encoding,
            version,
            osabi,
            abi_version,
            kind,
            machine,
            entry,
            flags,
            regions,
            marker: PhantomData,
        })
    }
}

fn slice_range(bytes: &[u8], offset: u64, size: u64) -> Result<&[u8]> {
    let start = usize::try_from(offset).ok();
    let len = usize::try_from(size).ok();
    start
        .zip(len)
        .and_then(|(start, len)| bytes.get(start..start.checked_add(len)?))
        .ok_or_else(|| {
            truncated_error(format!(
                "range [{offset}, +{size}) outside file of {} bytes",
                bytes.len()
            ))
        })
}
