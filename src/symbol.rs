//! A typed, on-demand view of symbol-table sections.
//!
//! Symbol tables are ordinary sections to the region tree; this module
//! parses their packed records into [`SymbolEntry`] values, resolving
//! names through the string table named by `sh_link` and section
//! cross-references against the in-order section list.

use crate::{
    Result, bad_symbol_error,
    class::ElfClass,
    codec::Cursor,
    defs::{SectionIndex, SectionType, SymbolBinding, SymbolType},
    image::ElfImage,
    region::{Section, SectionSlot},
    strtab, truncated_error,
};
use alloc::borrow::Cow;
use alloc::format;
use alloc::vec::Vec;

/// One symbol-table entry.
///
/// Entries are an independent derived view: they own their name bytes and
/// reference their enclosing section by section-list index, not by
/// borrowing from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Byte offset of the name in the associated string table.
    pub name_index: u32,
    /// Resolved name bytes.
    pub name: Vec<u8>,
    /// Section-list index of the enclosing section, when `shndx` is an
    /// ordinary in-range index.
    pub section: Option<usize>,
    pub kind: SymbolType,
    pub binding: SymbolBinding,
    /// The `st_other` byte (visibility).
    pub other: u8,
    pub shndx: SectionIndex,
    pub value: u64,
    pub size: u64,
}

impl<C: ElfClass> ElfImage<C> {
    /// Parses every `SHT_SYMTAB` section into a list of typed entries.
    pub fn symbol_tables(&self) -> Result<Vec<Vec<SymbolEntry>>> {
        let slots = self.section_slots();
        let mut tables = Vec::new();
        for slot in &slots {
            let SectionSlot::Section(section) = *slot else {
                continue;
            };
            if section.kind != SectionType::SymTab {
                continue;
            }
            tables.push(self.parse_symtab(section, &slots)?);
        }
        Ok(tables)
    }

    fn parse_symtab(
        &self,
        table: &Section,
        slots: &[SectionSlot<'_>],
    ) -> Result<Vec<SymbolEntry>> {
        // `sh_link` is a 1-based reference into the section list; 0 names
        // no string table at all.
        let strings: Cow<'_, [u8]> = match (table.link as usize)
            .checked_sub(1)
            .and_then(|idx| slots.get(idx))
        {
            Some(SectionSlot::Section(strtab_section)) => {
                Cow::Borrowed(strtab_section.content.as_slice())
            }
            Some(SectionSlot::NameTable) => Cow::Owned(self.name_table_bytes()),
            None => {
                return Err(truncated_error(format!(
                    "symbol table sh_link {} out of range",
                    table.link
                )));
            }
        };

        let count = table.content.len() / C::SYM_SIZE;
        let mut cur = Cursor::new(&table.content, self.encoding);
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let raw = C::read_sym(&mut cur)?;
            let kind = SymbolType::from_u8(raw.info & 0x0f);
            let binding = SymbolBinding::from_u8(raw.info >> 4).ok_or_else(|| {
                bad_symbol_error(format!("unrecognized binding {:#x}", raw.info >> 4))
            })?;
            let shndx = SectionIndex::from_u16(raw.shndx);
            let section = match shndx {
                SectionIndex::Index(idx) if usize::from(idx) < slots.len() => {
                    Some(usize::from(idx))
                }
                _ => None,
            };
            entries.push(SymbolEntry {
                name_index: raw.name,
                name: strtab::lookup(strings.as_ref(), u64::from(raw.name))?.to_vec(),
                section,
                kind,
                binding,
                other: raw.other,
                shndx,
                value: raw.value,
                size: raw.size,
            });
        }
        Ok(entries)
    }

    /// Resolves a symbol back to the content bytes that define it:
    /// `contents[value .. value + size]` of the enclosing section.
    ///
    /// Returns `None` when the symbol has no enclosing section, its size
    /// is zero, or the range exceeds the section bounds.
    pub fn find_symbol_definition(&self, sym: &SymbolEntry) -> Option<&[u8]> {
        let slots = self.section_slots();
        let SectionSlot::Section(section) = *slots.get(sym.section?)? else {
            return None;
        };
        if sym.size == 0 {
            return None;
        }
        let start = usize::try_from(sym.value).ok()?;
        let end = start.checked_add(usize::try_from(sym.size).ok()?)?;
        section.content.get(start..end)
    }
}
