//! Rendering the region tree back to bytes.
//!
//! The ELF header depends on the final layout (table offsets, entry
//! counts, the name-table index), and the layout in turn depends on the
//! sizes of everything emitted before each region. The renderer resolves
//! the cycle in two passes: a layout pass simulates the emission to fix
//! every offset and pre-build both header tables, then the emit pass
//! writes bytes against the finished layout. Nothing is back-patched.

use crate::{
    class::{EhdrFields, ElfClass, PhdrFields, ShdrFields},
    codec::Emitter,
    defs::{SegmentFlags, SegmentType},
    image::{ElfFile, ElfImage},
    region::{DataRegion, Section},
};
use alloc::vec::Vec;
use elf::abi;
use hashbrown::HashMap;

/// Recomputed program-header fields for one rendered segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentMeta {
    pub kind: SegmentType,
    pub flags: SegmentFlags,
    pub offset: u64,
    pub vaddr: u64,
    pub paddr: u64,
    pub filesz: u64,
    pub memsz: u64,
    pub align: u64,
}

impl SegmentMeta {
    fn to_fields(self) -> PhdrFields {
        PhdrFields {
            kind: self.kind.to_u32(),
            flags: self.flags.bits(),
            offset: self.offset,
            vaddr: self.vaddr,
            paddr: self.paddr,
            filesz: self.filesz,
            memsz: self.memsz,
            align: self.align,
        }
    }
}

/// The output of a render: the file bytes plus the recomputed layout facts
/// callers most often need to index into them.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    /// Per-segment metadata and content slices, in program-header table
    /// order (pre-load entries first).
    pub segments: Vec<(SegmentMeta, Vec<u8>)>,
    pub phdr_table_offset: u64,
    pub shdr_table_offset: u64,
    pub shstrndx: u16,
}

/// Which program-header list a reserved slot went to.
enum PhdrSlot {
    PreLoad(usize),
    Main(usize),
}

struct Layout {
    name_table: Vec<u8>,
    name_offsets: HashMap<Vec<u8>, u64>,
    section_count: usize,
    segment_count: usize,
    phdr_table_offset: u64,
    shdr_table_offset: u64,
    shstrndx: u16,
    pre_load_phdrs: Vec<SegmentMeta>,
    phdrs: Vec<SegmentMeta>,
    shdr_records: Vec<ShdrFields>,
}

impl Layout {
    fn reserve_phdr(&mut self, kind: SegmentType) -> PhdrSlot {
        let placeholder = SegmentMeta {
            kind,
            flags: SegmentFlags::empty(),
            offset: 0,
            vaddr: 0,
            paddr: 0,
            filesz: 0,
            memsz: 0,
            align: 0,
        };
        if kind.is_pre_load() {
            self.pre_load_phdrs.push(placeholder);
            PhdrSlot::PreLoad(self.pre_load_phdrs.len() - 1)
        } else {
            self.phdrs.push(placeholder);
            PhdrSlot::Main(self.phdrs.len() - 1)
        }
    }

    fn fill_phdr(&mut self, slot: PhdrSlot, meta: SegmentMeta) {
        match slot {
            PhdrSlot::PreLoad(idx) => self.pre_load_phdrs[idx] = meta,
            PhdrSlot::Main(idx) => self.phdrs[idx] = meta,
        }
    }

    fn name_offset(&self, name: &[u8]) -> u32 {
        *self
            .name_offsets
            .get(name)
            .unwrap_or_else(|| panic!("invalid region tree: section name missing from name table"))
            as u32
    }
}

#[derive(Default)]
struct TreeCensus {
    ehdr: usize,
    phdr_table: usize,
    shdr_table: usize,
    name_table: usize,
    sections: usize,
    named_sections: usize,
    segments: usize,
}

fn census(regions: &[DataRegion], counts: &mut TreeCensus) {
    for region in regions {
        match region {
            DataRegion::ElfHeader => counts.ehdr += 1,
            DataRegion::SegmentHeaders => counts.phdr_table += 1,
            DataRegion::SectionHeaders => counts.shdr_table += 1,
            DataRegion::SectionNameTable => counts.name_table += 1,
            DataRegion::Section(section) => {
                counts.sections += 1;
                if !section.name.is_empty() {
                    counts.named_sections += 1;
                }
            }
            DataRegion::Segment(segment) => {
                counts.segments += 1;
                census(&segment.regions, counts);
            }
            DataRegion::Raw(_) => {}
        }
    }
}

fn validate_tree(counts: &TreeCensus) {
    if counts.ehdr != 1 {
        panic!(
            "invalid region tree: expected exactly one ElfHeader region, found {}",
            counts.ehdr
        );
    }
    if counts.phdr_table > 1 || counts.shdr_table > 1 || counts.name_table > 1 {
        panic!("invalid region tree: duplicate header-table region");
    }
    if counts.segments > 0 && counts.phdr_table == 0 {
        panic!("invalid region tree: segments present but no SegmentHeaders region");
    }
    if (counts.sections > 0 || counts.name_table > 0) && counts.shdr_table == 0 {
        panic!("invalid region tree: sections present but no SectionHeaders region");
    }
    if counts.named_sections > 0 && counts.name_table == 0 {
        panic!("invalid region tree: named sections present but no SectionNameTable region");
    }
}

fn section_shdr(layout: &Layout, section: &Section, offset: u64) -> ShdrFields {
    ShdrFields {
        name: if section.name.is_empty() && layout.name_table.is_empty() {
            0
        } else {
            layout.name_offset(&section.name)
        },
        kind: section.kind.to_u32(),
        flags: section.flags.bits(),
        addr: section.addr,
        offset,
        size: section.nominal_size(),
        link: section.link,
        info: section.info,
        addralign: section.addralign,
        entsize: section.entsize,
    }
}

fn layout_walk<C: ElfClass>(regions: &[DataRegion], layout: &mut Layout, pos: &mut u64) {
    for region in regions {
        match region {
            DataRegion::ElfHeader => *pos += C::EHDR_SIZE as u64,
            DataRegion::SegmentHeaders => {
                layout.phdr_table_offset = *pos;
                *pos += (layout.segment_count * C::PHDR_SIZE) as u64;
            }
            DataRegion::SectionHeaders => {
                layout.shdr_table_offset = *pos;
                *pos += (layout.section_count * C::SHDR_SIZE) as u64;
            }
            DataRegion::SectionNameTable => {
                layout.shstrndx = layout.shdr_records.len() as u16;
                let record = ShdrFields {
                    name: layout.name_offset(b".shstrtab"),
                    kind: abi::SHT_STRTAB,
                    flags: 0,
                    addr: 0,
                    offset: *pos,
                    size: layout.name_table.len() as u64,
                    link: 0,
                    info: 0,
                    addralign: 1,
                    entsize: 0,
                };
                layout.shdr_records.push(record);
                *pos += layout.name_table.len() as u64;
            }
            DataRegion::Section(section) => {
                let offset = if section.file_size() == 0 || section.addralign <= 1 {
                    *pos
                } else {
                    pos.next_multiple_of(section.addralign)
                };
                let record = section_shdr(layout, section, offset);
                layout.shdr_records.push(record);
                *pos = offset + section.file_size();
            }
            DataRegion::Segment(segment) => {
                let slot = layout.reserve_phdr(segment.kind);
                let start = *pos;
                layout_walk::<C>(&segment.regions, layout, pos);
                layout.fill_phdr(
                    slot,
                    SegmentMeta {
                        kind: segment.kind,
                        flags: segment.flags,
                        offset: start,
                        vaddr: segment.vaddr,
                        paddr: segment.paddr,
                        filesz: *pos - start,
                        memsz: segment.memsz,
                        align: segment.align,
                    },
                );
            }
            DataRegion::Raw(bytes) => *pos += bytes.len() as u64,
        }
    }
}

fn emit_walk<C: ElfClass>(
    regions: &[DataRegion],
    out: &mut Emitter,
    layout: &Layout,
    ehdr: &EhdrFields,
) {
    for region in regions {
        match region {
            DataRegion::ElfHeader => C::ehdr_record().write(out, ehdr),
            DataRegion::SegmentHeaders => {
                for meta in layout.pre_load_phdrs.iter().chain(&layout.phdrs) {
                    C::phdr_record().write(out, &meta.to_fields());
                }
            }
            DataRegion::SectionHeaders => {
                for record in &layout.shdr_records {
                    C::shdr_record().write(out, record);
                }
            }
            DataRegion::SectionNameTable => out.put_bytes(&layout.name_table),
            DataRegion::Section(section) => {
                if section.file_size() > 0 {
                    out.pad_to(section.addralign);
                    out.put_bytes(&section.content);
                }
            }
            DataRegion::Segment(segment) => emit_walk::<C>(&segment.regions, out, layout, ehdr),
            DataRegion::Raw(bytes) => out.put_bytes(bytes),
        }
    }
}

impl<C: ElfClass> ElfImage<C> {
    /// Renders the image, recomputing every header table, file offset and
    /// the section-name table.
    ///
    /// # Panics
    ///
    /// Panics when the region tree violates its invariants (a missing or
    /// duplicated placeholder region).
    pub fn render(&self) -> Rendered {
        let mut counts = TreeCensus::default();
        census(&self.regions, &mut counts);
        validate_tree(&counts);

        let (name_table, name_offsets) = if counts.name_table > 0 {
            self.build_name_table()
        } else {
            (Vec::new(), HashMap::new())
        };
        let mut layout = Layout {
            name_table,
            name_offsets,
            section_count: counts.sections + counts.name_table,
            segment_count: counts.segments,
            phdr_table_offset: 0,
            shdr_table_offset: 0,
            shstrndx: 0,
            pre_load_phdrs: Vec::new(),
            phdrs: Vec::new(),
            shdr_records: Vec::with_capacity(counts.sections + counts.name_table),
        };
        let mut pos = 0u64;
        layout_walk::<C>(&self.regions, &mut layout, &mut pos);

        let mut ident = [0u8; 16];
        ident[..4].copy_from_slice(&abi::ELFMAGIC);
        ident[4] = C::CLASS.to_byte();
        ident[5] = self.encoding.to_byte();
        ident[6] = self.version;
        ident[7] = self.osabi.to_u8();
        ident[8] = self.abi_version;
        let ehdr = EhdrFields {
            ident,
            kind: self.kind.to_u16(),
            machine: self.machine.to_u16(),
            version: u32::from(self.version),
            entry: self.entry,
            phoff: layout.phdr_table_offset,
            shoff: layout.shdr_table_offset,
            flags: self.flags,
            ehsize: C::EHDR_SIZE as u16,
            phentsize: C::PHDR_SIZE as u16,
            phnum: layout.segment_count as u16,
            shentsize: C::SHDR_SIZE as u16,
            shnum: layout.section_count as u16,
            shstrndx: layout.shstrndx,
        };

        let mut out = Emitter::new(self.encoding);
        emit_walk::<C>(&self.regions, &mut out, &layout, &ehdr);
        debug_assert_eq!(out.len() as u64, pos);
        let bytes = out.into_bytes();

        let segments = layout
            .pre_load_phdrs
            .iter()
            .chain(&layout.phdrs)
            .map(|meta| {
                let start = meta.offset as usize;
                let end = start + meta.filesz as usize;
                (*meta, bytes[start..end].to_vec())
            })
            .collect();

        #[cfg(feature = "log")]
        log::debug!(
            "rendered {:?} image: {} bytes, {} sections, {} segments",
            C::CLASS,
            bytes.len(),
            layout.section_count,
            layout.segment_count
        );

        Rendered {
            bytes,
            segments,
            phdr_table_offset: layout.phdr_table_offset,
            shdr_table_offset: layout.shdr_table_offset,
            shstrndx: layout.shstrndx,
        }
    }
}

impl ElfFile {
    /// Renders whichever class the image carries. See [`ElfImage::render`].
    pub fn render(&self) -> Rendered {
        match self {
            ElfFile::Elf32(image) => image.render(),
            ElfFile::Elf64(image) => image.render(),
        }
    }
}
