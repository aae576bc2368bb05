//! The address-width abstraction separating the 32-bit and 64-bit file
//! classes.
//!
//! [`ElfClass`] is a sealed trait implemented by the two marker types
//! [`Class32`] and [`Class64`]. It provides the fixed header sizes, the
//! address codec, and the wire [`Record`] descriptions for each header
//! table, so the parser and the renderer never branch on the class
//! themselves.

use crate::{
    Result,
    codec::{Cursor, Field, Record},
    defs::Class,
};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Class32 {}
    impl Sealed for super::Class64 {}
}

/// Flat ELF header fields in wire order.
#[derive(Debug, Clone)]
pub struct EhdrFields {
    pub ident: [u8; 16],
    pub kind: u16,
    pub machine: u16,
    pub version: u32,
    pub entry: u64,
    pub phoff: u64,
    pub shoff: u64,
    pub flags: u32,
    pub ehsize: u16,
    pub phentsize: u16,
    pub phnum: u16,
    pub shentsize: u16,
    pub shnum: u16,
    pub shstrndx: u16,
}

/// Flat program-header fields. The wire order differs between the classes;
/// the per-class [`Record`] encodes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhdrFields {
    pub kind: u32,
    pub flags: u32,
    pub offset: u64,
    pub vaddr: u64,
    pub paddr: u64,
    pub filesz: u64,
    pub memsz: u64,
    pub align: u64,
}

/// Flat section-header fields in wire order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShdrFields {
    pub name: u32,
    pub kind: u32,
    pub flags: u64,
    pub addr: u64,
    pub offset: u64,
    pub size: u64,
    pub link: u32,
    pub info: u32,
    pub addralign: u64,
    pub entsize: u64,
}

/// A symbol record in canonical field order, before name resolution.
#[derive(Debug, Clone, Copy)]
pub struct RawSymbol {
    pub name: u32,
    pub value: u64,
    pub size: u64,
    pub info: u8,
    pub other: u8,
    pub shndx: u16,
}

/// The address width of an ELF image, as a type.
pub trait ElfClass: sealed::Sealed + Sized + 'static {
    const CLASS: Class;
    const EHDR_SIZE: usize;
    const PHDR_SIZE: usize;
    const SHDR_SIZE: usize;
    const SYM_SIZE: usize;

    /// Reads one address-width integer, widened to `u64`.
    fn read_addr(cur: &mut Cursor<'_>) -> Result<u64>;

    /// The ELF header record for this class.
    fn ehdr_record() -> &'static Record<EhdrFields>;

    /// The program-header record for this class (field order differs).
    fn phdr_record() -> &'static Record<PhdrFields>;

    /// The section-header record for this class.
    fn shdr_record() -> &'static Record<ShdrFields>;

    /// Reads one program-header entry in this class's field order.
    fn read_phdr(cur: &mut Cursor<'_>) -> Result<PhdrFields>;

    /// Reads one symbol record in this class's field order.
    fn read_sym(cur: &mut Cursor<'_>) -> Result<RawSymbol>;

    /// Reads one section-header entry. The field order is shared between
    /// the classes; only the widths differ.
    fn read_shdr(cur: &mut Cursor<'_>) -> Result<ShdrFields> {
        Ok(ShdrFields {
            name: cur.u32()?,
            kind: cur.u32()?,
            flags: Self::read_addr(cur)?,
            addr: Self::read_addr(cur)?,
            offset: Self::read_addr(cur)?,
            size: Self::read_addr(cur)?,
            link: cur.u32()?,
            info: cur.u32()?,
            addralign: Self::read_addr(cur)?,
            entsize: Self::read_addr(cur)?,
        })
    }
}

/// Marker for the 32-bit class (`ELFCLASS32`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class32 {}

/// Marker for the 64-bit class (`ELFCLASS64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class64 {}

static EHDR32: Record<EhdrFields> = Record(&[
    ("e_ident", Field::Bytes(16, |f, out| out.extend_from_slice(&f.ident))),
    ("e_type", Field::U16(|f| f.kind)),
    ("e_machine", Field::U16(|f| f.machine)),
    ("e_version", Field::U32(|f| f.version)),
    ("e_entry", Field::U32(|f| f.entry as u32)),
    ("e_phoff", Field::U32(|f| f.phoff as u32)),
    ("e_shoff", Field::U32(|f| f.shoff as u32)),
    ("e_flags", Field::U32(|f| f.flags)),
    ("e_ehsize", Field::U16(|f| f.ehsize)),
    ("e_phentsize", Field::U16(|f| f.phentsize)),
    ("e_phnum", Field::U16(|f| f.phnum)),
    ("e_shentsize", Field::U16(|f| f.shentsize)),
    ("e_shnum", Field::U16(|f| f.shnum)),
    ("e_shstrndx", Field::U16(|f| f.shstrndx)),
]);

static EHDR64: Record<EhdrFields> = Record(&[
    ("e_ident", Field::Bytes(16, |f, out| out.extend_from_slice(&f.ident))),
    ("e_type", Field::U16(|f| f.kind)),
    ("e_machine", Field::U16(|f| f.machine)),
    ("e_version", Field::U32(|f| f.version)),
    ("e_entry", Field::U64(|f| f.entry)),
    ("e_phoff", Field::U64(|f| f.phoff)),
    ("e_shoff", Field::U64(|f| f.shoff)),
    ("e_flags", Field::U32(|f| f.flags)),
    ("e_ehsize", Field::U16(|f| f.ehsize)),
    ("e_phentsize", Field::U16(|f| f.phentsize)),
    ("e_phnum", Field::U16(|f| f.phnum)),
    ("e_shentsize", Field::U16(|f| f.shentsize)),
    ("e_shnum", Field::U16(|f| f.shnum)),
    ("e_shstrndx", Field::U16(|f| f.shstrndx)),
]);

static PHDR32: Record<PhdrFields> = Record(&[
    ("p_type", Field::U32(|f| f.kind)),
    ("p_offset", Field::U32(|f| f.offset as u32)),
    ("p_vaddr", Field::U32(|f| f.vaddr as u32)),
    ("p_paddr", Field::U32(|f| f.paddr as u32)),
    ("p_filesz", Field::U32(|f| f.filesz as u32)),
    ("p_memsz", Field::U32(|f| f.memsz as u32)),
    ("p_flags", Field::U32(|f| f.flags)),
    ("p_align", Field::U32(|f| f.align as u32)),
]);

// ELF-64 moves p_flags next to p_type.
static PHDR64: Record<PhdrFields> = Record(&[
    ("p_type", Field::U32(|f| f.kind)),
    ("p_flags", Field::U32(|f| f.flags)),
    ("p_offset", Field::U64(|f| f.offset)),
    ("p_vaddr", Field::U64(|f| f.vaddr)),
    ("p_paddr", Field::U64(|f| f.paddr)),
    ("p_filesz", Field::U64(|f| f.filesz)),
    ("p_memsz", Field::U64(|f| f.memsz)),
    ("p_align", Field::U64(|f| f.align)),
]);

static SHDR32: Record<ShdrFields> = Record(&[
    ("sh_name", Field::U32(|f| f.name)),
    ("sh_type", Field::U32(|f| f.kind)),
    ("sh_flags", Field::U32(|f| f.flags as u32)),
    ("sh_addr", Field::U32(|f| f.addr as u32)),
    ("sh_offset", Field::U32(|f| f.offset as u32)),
    ("sh_size", Field::U32(|f| f.size as u32)),
    ("sh_link", Field::U32(|f| f.link)),
    ("sh_info", Field::U32(|f| f.info)),
    ("sh_addralign", Field::U32(|f| f.addralign as u32)),
    ("sh_entsize", Field::U32(|f| f.entsize as u32)),
]);

static SHDR64: Record<ShdrFields> = Record(&[
    ("sh_name", Field::U32(|f| f.name)),
    ("sh_type", Field::U32(|f| f.kind)),
    ("sh_flags", Field::U64(|f| f.flags)),
    ("sh_addr", Field::U64(|f| f.addr)),
    ("sh_offset", Field::U64(|f| f.offset)),
    ("sh_size", Field::U64(|f| f.size)),
    ("sh_link", Field::U32(|f| f.link)),
    ("sh_info", Field::U32(|f| f.info)),
    ("sh_addralign", Field::U64(|f| f.addralign)),
    ("sh_entsize", Field::U64(|f| f.entsize)),
]);

impl ElfClass for Class32 {
    const CLASS: Class = Class::Elf32;
    const EHDR_SIZE: usize = 52;
    const PHDR_SIZE: usize = 32;
    const SHDR_SIZE: usize = 40;
    const SYM_SIZE: usize = 16;

    fn read_addr(cur: &mut Cursor<'_>) -> Result<u64> {
        Ok(u64::from(cur.u32()?))
    }

    fn ehdr_record() -> &'static Record<EhdrFields> {
        &EHDR32
    }

    fn phdr_record() -> &'static Record<PhdrFields> {
        &PHDR32
    }

    fn shdr_record() -> &'static Record<ShdrFields> {
        &SHDR32
    }

    fn read_phdr(cur: &mut Cursor<'_>) -> Result<PhdrFields> {
        Ok(PhdrFields {
            kind: cur.u32()?,
            offset: u64::from(cur.u32()?),
            vaddr: u64::from(cur.u32()?),
            paddr: u64::from(cur.u32()?),
            filesz: u64::from(cur.u32()?),
            memsz: u64::from(cur.u32()?),
            flags: cur.u32()?,
            align: u64::from(cur.u32()?),
        })
    }

    fn read_sym(cur: &mut Cursor<'_>) -> Result<RawSymbol> {
        Ok(RawSymbol {
            name: cur.u32()?,
            value: u64::from(cur.u32()?),
            size: u64::from(cur.u32()?),
            info: cur.u8()?,
            other: cur.u8()?,
            shndx: cur.u16()?,
        })
    }
}

impl ElfClass for Class64 {
    const CLASS: Class = Class::Elf64;
    const EHDR_SIZE: usize = 64;
    const PHDR_SIZE: usize = 56;
    const SHDR_SIZE: usize = 64;
    const SYM_SIZE: usize = 24;

    fn read_addr(cur: &mut Cursor<'_>) -> Result<u64> {
        cur.u64()
    }

    fn ehdr_record() -> &'static Record<EhdrFields> {
        &EHDR64
    }

    fn phdr_record() -> &'static Record<PhdrFields> {
        &PHDR64
    }

    fn shdr_record() -> &'static Record<ShdrFields> {
        &SHDR64
    }

    fn read_phdr(cur: &mut Cursor<'_>) -> Result<PhdrFields> {
        let kind = cur.u32()?;
        let flags = cur.u32()?;
        Ok(PhdrFields {
            kind,
            flags,
            offset: cur.u64()?,
            vaddr: cur.u64()?,
            paddr: cur.u64()?,
            filesz: cur.u64()?,
            memsz: cur.u64()?,
            align: cur.u64()?,
        })
    }

    fn read_sym(cur: &mut Cursor<'_>) -> Result<RawSymbol> {
        let name = cur.u32()?;
        let info = cur.u8()?;
        let other = cur.u8()?;
        let shndx = cur.u16()?;
        Ok(RawSymbol {
            name,
            info,
            other,
            shndx,
            value: cur.u64()?,
            size: cur.u64()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes_match_the_fixed_header_sizes() {
        assert_eq!(Class32::ehdr_record().size(), Class32::EHDR_SIZE);
        assert_eq!(Class32::phdr_record().size(), Class32::PHDR_SIZE);
        assert_eq!(Class32::shdr_record().size(), Class32::SHDR_SIZE);
        assert_eq!(Class64::ehdr_record().size(), Class64::EHDR_SIZE);
        assert_eq!(Class64::phdr_record().size(), Class64::PHDR_SIZE);
        assert_eq!(Class64::shdr_record().size(), Class64::SHDR_SIZE);
    }
}
