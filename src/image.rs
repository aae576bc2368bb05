//! The top-level file image and its editing operations.
//!
//! An [`ElfImage`] owns the header fields that live outside any region plus
//! the ordered region tree. Everything in between parse and render happens
//! here: finding, mutating and removing sections, and regenerating the
//! section-name table.

use crate::{
    class::{Class32, Class64, ElfClass},
    defs::{Class, Encoding, Machine, ObjectKind, OsAbi, SectionFlags, SectionType},
    region::{DataRegion, Section, SectionSlot, Sections, find_section_mut, map_regions, section_slots},
    strtab,
};
use alloc::vec::Vec;
use core::marker::PhantomData;
use hashbrown::HashMap;

/// An in-memory ELF file image of address width `C`.
///
/// The region sequence is totally ordered by file offset; overlap between
/// segments and other regions is modeled by nesting. Rendering recomputes
/// every offset, so edits never need to fix up cross-references by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElfImage<C: ElfClass> {
    pub encoding: Encoding,
    /// Format version byte; 1 for every conforming file.
    pub version: u8,
    pub osabi: OsAbi,
    pub abi_version: u8,
    pub kind: ObjectKind,
    pub machine: Machine,
    /// Entry-point virtual address.
    pub entry: u64,
    /// Processor-specific flags (`e_flags`).
    pub flags: u32,
    pub regions: Vec<DataRegion>,
    pub(crate) marker: PhantomData<C>,
}

/// A 32-bit file image.
pub type Elf32 = ElfImage<Class32>;
/// A 64-bit file image.
pub type Elf64 = ElfImage<Class64>;

/// An ELF image of either class, as discovered at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElfFile {
    Elf32(Elf32),
    Elf64(Elf64),
}

impl<C: ElfClass> ElfImage<C> {
    /// Creates an empty image with conventional defaults. The caller is
    /// expected to fill in `regions` (and usually `kind` and `machine`)
    /// before rendering.
    pub fn new(encoding: Encoding) -> Self {
        ElfImage {
            encoding,
            version: 1,
            osabi: OsAbi::SysV,
            abi_version: 0,
            kind: ObjectKind::None,
            machine: Machine::None,
            entry: 0,
            flags: 0,
            regions: Vec::new(),
            marker: PhantomData,
        }
    }

    pub fn class(&self) -> Class {
        C::CLASS
    }

    /// In-order iterator over the sections, descending into segments. The
    /// synthetic name-table section is not included; see
    /// [`section_slots`](Self::section_slots) for the indexable list.
    pub fn sections(&self) -> Sections<'_> {
        Sections::new(&self.regions)
    }

    /// The in-order section list as the section-header table will index
    /// it, with the name table occupying its slot.
    pub fn section_slots(&self) -> Vec<SectionSlot<'_>> {
        section_slots(&self.regions)
    }

    pub fn find_section(&self, name: &[u8]) -> Option<&Section> {
        self.sections().find(|section| section.name == name)
    }

    pub fn find_section_mut(&mut self, name: &[u8]) -> Option<&mut Section> {
        find_section_mut(&mut self.regions, name)
    }

    /// Rebuilds the tree through `f`, visiting every section in order and
    /// deleting those for which `f` returns `None`.
    pub fn map_sections(&mut self, mut f: impl FnMut(Section) -> Option<Section>) {
        let regions = core::mem::take(&mut self.regions);
        self.regions = map_regions(regions, &mut f);
    }

    /// Deletes every section with the given name. Returns `true` when at
    /// least one section was removed.
    pub fn remove_section(&mut self, name: &[u8]) -> bool {
        let mut removed = false;
        self.map_sections(|section| {
            if section.name == name {
                removed = true;
                None
            } else {
                Some(section)
            }
        });
        removed
    }

    pub(crate) fn build_name_table(&self) -> (Vec<u8>, HashMap<Vec<u8>, u64>) {
        let names: Vec<&[u8]> = self
            .sections()
            .map(|section| section.name.as_slice())
            .chain([b".shstrtab".as_slice()])
            .collect();
        strtab::build(names)
    }

    /// The `.shstrtab` bytes regenerated from the current section names.
    pub fn name_table_bytes(&self) -> Vec<u8> {
        self.build_name_table().0
    }

    /// The synthetic `.shstrtab` section as the renderer will emit it.
    pub fn name_table_section(&self) -> Section {
        let content = self.name_table_bytes();
        Section {
            name: b".shstrtab".to_vec(),
            kind: SectionType::StrTab,
            flags: SectionFlags::empty(),
            addr: 0,
            size: content.len() as u64,
            link: 0,
            info: 0,
            addralign: 1,
            entsize: 0,
            content,
        }
    }
}

impl ElfFile {
    pub fn class(&self) -> Class {
        match self {
            ElfFile::Elf32(_) => Class::Elf32,
            ElfFile::Elf64(_) => Class::Elf64,
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            ElfFile::Elf32(image) => image.encoding,
            ElfFile::Elf64(image) => image.encoding,
        }
    }

    pub fn machine(&self) -> Machine {
        match self {
            ElfFile::Elf32(image) => image.machine,
            ElfFile::Elf64(image) => image.machine,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            ElfFile::Elf32(image) => image.kind,
            ElfFile::Elf64(image) => image.kind,
        }
    }
}
