//! Symbol-table view scenarios.

mod common;

use common::W;
use elf_edit::{
    DataRegion, Elf32, Elf64, Encoding, Error, Machine, ObjectKind, Section, SectionFlags,
    SectionIndex, SectionType, SymbolBinding, SymbolType,
};

fn section(name: &[u8], kind: SectionType, content: Vec<u8>) -> Section {
    Section {
        name: name.to_vec(),
        kind,
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

fn null_section() -> Section {
    Section {
        name: Vec::new(),
        kind: SectionType::Null,
        flags: SectionFlags::empty(),
        addr: 0,
        size: 0,
        link: 0,
        info: 0,
        addralign: 0,
        entsize: 0,
        content: Vec::new(),
    }
}

fn sym32(w: &mut W, name: u32, value: u32, size: u32, info: u8, shndx: u16) {
    w.u32(name).u32(value).u32(size).u8(info).u8(0).u16(shndx);
}

/// A 32-bit image whose section list is
/// `[null, .text, .strtab, .symtab, .shstrtab]` with three symbols.
fn symtab_image(second_info: u8) -> Elf32 {
    let mut image = Elf32::new(Encoding::Lsb);
    image.kind = ObjectKind::Rel;
    image.machine = Machine::X86;

    let strings = b"\0main\0helper\0".to_vec();

    let mut syms = W::le();
    sym32(&mut syms, 0, 0, 0, 0, 0);
    sym32(&mut syms, 1, 4, 6, second_info, 1); // main -> .text
    sym32(&mut syms, 6, 0, 0, 0x01, 1); // helper: LOCAL OBJECT

    let mut symtab = section(b".symtab", SectionType::SymTab, syms.out);
    symtab.link = 3; // 1-based: .strtab is the third section
    symtab.entsize = 16;

    image.regions = vec![
        DataRegion::Section(null_section()),
        DataRegion::ElfHeader,
        DataRegion::Section(section(
            b".text",
            SectionType::ProgBits,
            b"ABCDEFGHIJ".to_vec(),
        )),
        DataRegion::Section(section(b".strtab", SectionType::StrTab, strings)),
        DataRegion::Section(symtab),
        DataRegion::SectionNameTable,
        DataRegion::SectionHeaders,
    ];
    image
}

#[test]
fn symbol_tables_resolve_names_and_kinds() {
    // STB_GLOBAL << 4 | STT_FUNC
    let image = symtab_image(0x12);
    let tables = image.symbol_tables().unwrap();
    assert_eq!(tables.len(), 1);
    let syms = &tables[0];
    assert_eq!(syms.len(), 3);

    assert_eq!(syms[0].name, b"");
    assert_eq!(syms[0].shndx, SectionIndex::Undef);
    assert_eq!(syms[0].section, None);

    assert_eq!(syms[1].name, b"main");
    assert_eq!(syms[1].kind, SymbolType::Func);
    assert_eq!(syms[1].binding, SymbolBinding::Global);
    assert_eq!(syms[1].shndx, SectionIndex::Index(1));
    assert_eq!(syms[1].section, Some(1));

    assert_eq!(syms[2].name, b"helper");
    assert_eq!(syms[2].kind, SymbolType::Object);
    assert_eq!(syms[2].binding, SymbolBinding::Local);
}

#[test]
fn symbol_definitions_slice_the_enclosing_section() {
    let image = symtab_image(0x12);
    let syms = &image.symbol_tables().unwrap()[0];

    // value 4, size 6 inside "ABCDEFGHIJ".
    assert_eq!(image.find_symbol_definition(&syms[1]), Some(&b"EFGHIJ"[..]));
    // Zero-sized symbols resolve to nothing.
    assert_eq!(image.find_symbol_definition(&syms[2]), None);
    // Neither do symbols with no enclosing section.
    assert_eq!(image.find_symbol_definition(&syms[0]), None);

    // A range past the section bounds resolves to nothing.
    let mut oob = syms[1].clone();
    oob.size = 64;
    assert_eq!(image.find_symbol_definition(&oob), None);
}

#[test]
fn sh_link_lookup_is_one_based() {
    // Read 1-based, link = 2 names .text rather than .strtab; .text's
    // content carries no NUL, so name resolution fails instead of
    // silently reading the wrong table.
    let mut image = symtab_image(0x12);
    image.find_section_mut(b".symtab").unwrap().link = 2;
    assert!(image.symbol_tables().is_err());

    // 0 means no string table at all, and past-the-end links are caught.
    for bad_link in [0, 6] {
        let mut image = symtab_image(0x12);
        image.find_section_mut(b".symtab").unwrap().link = bad_link;
        assert!(matches!(
            image.symbol_tables().unwrap_err(),
            Error::Truncated { .. }
        ));
    }
}

#[test]
fn unknown_bindings_are_rejected() {
    // Binding 5 exists in no ABI this crate knows.
    let image = symtab_image(0x52);
    let err = image.symbol_tables().unwrap_err();
    assert!(matches!(err, Error::BadSymbol { .. }));
}

#[test]
fn unknown_symbol_types_are_preserved() {
    // Type 0xd is unassigned; it must survive as an Ext value.
    let image = symtab_image(0x1d);
    let syms = &image.symbol_tables().unwrap()[0];
    assert_eq!(syms[1].kind, SymbolType::Ext(0xd));
    assert_eq!(syms[1].binding, SymbolBinding::Global);
}

#[test]
fn symbols_round_trip_through_render() {
    let image = symtab_image(0x12);
    let rendered = image.render();
    let reparsed = Elf32::parse(&rendered.bytes).unwrap();
    let tables = reparsed.symbol_tables().unwrap();
    assert_eq!(tables, image.symbol_tables().unwrap());
    assert_eq!(
        reparsed.find_symbol_definition(&tables[0][1]),
        Some(&b"EFGHIJ"[..])
    );
}

#[test]
fn sixty_four_bit_records_use_the_rearranged_layout() {
    let mut image = Elf64::new(Encoding::Lsb);
    image.kind = ObjectKind::Rel;
    image.machine = Machine::X86_64;

    let strings = b"\0entry\0".to_vec();
    let mut syms = W::le();
    // 64-bit layout: name, info, other, shndx, value, size.
    syms.u32(0).u8(0).u8(0).u16(0).u64(0).u64(0);
    syms.u32(1).u8(0x12).u8(0).u16(1).u64(2).u64(2);

    let mut symtab = section(b".symtab", SectionType::SymTab, syms.out);
    symtab.link = 3; // 1-based: .strtab is the third section
    symtab.entsize = 24;

    image.regions = vec![
        DataRegion::Section(null_section()),
        DataRegion::ElfHeader,
        DataRegion::Section(section(
            b".text",
            SectionType::ProgBits,
            b"XYZW".to_vec(),
        )),
        DataRegion::Section(section(b".strtab", SectionType::StrTab, strings)),
        DataRegion::Section(symtab),
        DataRegion::SectionNameTable,
        DataRegion::SectionHeaders,
    ];

    let syms = &image.symbol_tables().unwrap()[0];
    assert_eq!(syms.len(), 2);
    assert_eq!(syms[1].name, b"entry");
    assert_eq!(syms[1].value, 2);
    assert_eq!(syms[1].size, 2);
    assert_eq!(syms[1].kind, SymbolType::Func);
    assert_eq!(image.find_symbol_definition(&syms[1]), Some(&b"ZW"[..]));
}

#[test]
fn reserved_section_indices_decode() {
    let mut image = symtab_image(0x12);
    // Patch the third symbol's shndx to SHN_ABS.
    if let Some(symtab) = image.find_section_mut(b".symtab") {
        let record = 2 * 16;
        symtab.content[record + 14..record + 16].copy_from_slice(&0xfff1u16.to_le_bytes());
    }
    let syms = &image.symbol_tables().unwrap()[0];
    assert_eq!(syms[2].shndx, SectionIndex::Abs);
    assert_eq!(syms[2].section, None);
}
