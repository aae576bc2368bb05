//! Malformed-input scenarios for the parser's error taxonomy.

mod common;

use common::{minimal_rel32, two_section_rel32};
use elf_edit::{Elf64, ElfFile, Error};

#[test]
fn short_buffers_are_truncated() {
    let input = minimal_rel32(false);
    assert!(matches!(
        ElfFile::parse(&input[..12]),
        Err(Error::Truncated { .. })
    ));
    assert!(matches!(
        ElfFile::parse(&input[..30]),
        Err(Error::Truncated { .. })
    ));
}

#[test]
fn wrong_magic_is_rejected() {
    let mut input = minimal_rel32(false);
    input[0] = 0x7e;
    assert!(matches!(
        ElfFile::parse(&input),
        Err(Error::BadMagic { .. })
    ));
}

#[test]
fn unknown_class_bytes_are_rejected() {
    let mut input = minimal_rel32(false);
    input[4] = 3;
    assert!(matches!(
        ElfFile::parse(&input),
        Err(Error::BadClass { .. })
    ));
}

#[test]
fn class_mismatch_is_rejected() {
    let input = minimal_rel32(false);
    assert!(matches!(
        Elf64::parse(&input),
        Err(Error::BadClass { .. })
    ));
}

#[test]
fn unknown_data_bytes_are_rejected() {
    let mut input = minimal_rel32(false);
    input[5] = 0;
    assert!(matches!(ElfFile::parse(&input), Err(Error::BadData { .. })));
}

#[test]
fn wrong_versions_are_rejected() {
    let mut input = minimal_rel32(false);
    input[6] = 2;
    assert!(matches!(
        ElfFile::parse(&input),
        Err(Error::BadVersion { .. })
    ));

    // The 32-bit header version must agree with the ident byte.
    let mut input = minimal_rel32(false);
    input[20..24].copy_from_slice(&2u32.to_le_bytes());
    assert!(matches!(
        ElfFile::parse(&input),
        Err(Error::BadVersion { .. })
    ));
}

#[test]
fn wrong_entry_sizes_are_rejected() {
    // e_shentsize sits at offset 46 in a 32-bit header.
    let mut input = minimal_rel32(false);
    input[46..48].copy_from_slice(&44u16.to_le_bytes());
    assert!(matches!(
        ElfFile::parse(&input),
        Err(Error::BadHeaderSize { .. })
    ));

    // e_phentsize (offset 42) is validated even though the fixture carries
    // no program headers at all.
    let mut input = minimal_rel32(false);
    input[42..44].copy_from_slice(&0xffffu16.to_le_bytes());
    assert!(matches!(
        ElfFile::parse(&input),
        Err(Error::BadHeaderSize { .. })
    ));
}

#[test]
fn overlapping_sections_are_rejected() {
    // Move .data's file range into the middle of .text. The .data entry is
    // shdr index 2; the table starts at 111 and sh_offset sits 16 bytes in.
    let mut input = two_section_rel32();
    let field = 111 + 2 * 40 + 16;
    input[field..field + 4].copy_from_slice(&70u32.to_le_bytes());
    assert!(matches!(
        ElfFile::parse(&input),
        Err(Error::Overlap { .. })
    ));
}

#[test]
fn section_ranges_past_the_end_are_truncated() {
    // Push .text's file range past the end of the buffer.
    let mut input = two_section_rel32();
    let field = 111 + 40 + 16;
    input[field..field + 4].copy_from_slice(&10_000u32.to_le_bytes());
    assert!(matches!(
        ElfFile::parse(&input),
        Err(Error::Truncated { .. })
    ));
}
