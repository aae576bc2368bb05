//! Enumerations and flag sets covering the closed value spaces of the ELF
//! format.
//!
//! Every enum maps onto its underlying integer width and back. Unknown
//! values never fail the conversion: they are preserved in an `Ext`
//! fall-through variant so unknown machines, section types and segment
//! types survive a parse-render cycle unchanged. The exceptions are the
//! ident bytes (class, data encoding), which admit exactly two values and
//! are validated by the parser instead.

use bitflags::bitflags;
use core::fmt::{self, Display, Formatter};
use elf::abi;

/// Standard ELF constants absent from the `elf` crate's `abi` module at the
/// pinned version, defined here with their fixed spec values.
mod abi_compat {
    pub const ELFOSABI_ARM: u8 = 97;
    pub const ELFOSABI_STANDALONE: u8 = 255;
    pub const EM_LOONGARCH: u16 = 258;
    pub const SHN_LOPROC: u16 = 0xff00;
    pub const SHN_HIPROC: u16 = 0xff1f;
    pub const SHN_LOOS: u16 = 0xff20;
    pub const SHN_HIOS: u16 = 0xff3f;
}

/// Address width of an ELF file: 32-bit or 64-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

impl Class {
    pub fn from_byte(v: u8) -> Option<Self> {
        match v {
            abi::ELFCLASS32 => Some(Class::Elf32),
            abi::ELFCLASS64 => Some(Class::Elf64),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Class::Elf32 => abi::ELFCLASS32,
            Class::Elf64 => abi::ELFCLASS64,
        }
    }
}

/// Byte order of the multi-byte fields in an ELF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Two's complement little-endian (`ELFDATA2LSB`).
    Lsb,
    /// Two's complement big-endian (`ELFDATA2MSB`).
    Msb,
}

impl Encoding {
    pub fn from_byte(v: u8) -> Option<Self> {
        match v {
            abi::ELFDATA2LSB => Some(Encoding::Lsb),
            abi::ELFDATA2MSB => Some(Encoding::Msb),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Encoding::Lsb => abi::ELFDATA2LSB,
            Encoding::Msb => abi::ELFDATA2MSB,
        }
    }
}

/// The OS or ABI extension an ELF file targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsAbi {
    /// UNIX System V (also "none").
    SysV,
    HpUx,
    NetBsd,
    /// GNU/Linux extensions.
    Gnu,
    Solaris,
    FreeBsd,
    OpenBsd,
    Arm,
    Standalone,
    Ext(u8),
}

impl OsAbi {
    pub fn from_u8(v: u8) -> Self {
        match v {
            abi::ELFOSABI_NONE => OsAbi::SysV,
            abi::ELFOSABI_HPUX => OsAbi::HpUx,
            abi::ELFOSABI_NETBSD => OsAbi::NetBsd,
            abi::ELFOSABI_GNU => OsAbi::Gnu,
            abi::ELFOSABI_SOLARIS => OsAbi::Solaris,
            abi::ELFOSABI_FREEBSD => OsAbi::FreeBsd,
            abi::ELFOSABI_OPENBSD => OsAbi::OpenBsd,
            abi_compat::ELFOSABI_ARM => OsAbi::Arm,
            abi_compat::ELFOSABI_STANDALONE => OsAbi::Standalone,
            v => OsAbi::Ext(v),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            OsAbi::SysV => abi::ELFOSABI_NONE,
            OsAbi::HpUx => abi::ELFOSABI_HPUX,
            OsAbi::NetBsd => abi::ELFOSABI_NETBSD,
            OsAbi::Gnu => abi::ELFOSABI_GNU,
            OsAbi::Solaris => abi::ELFOSABI_SOLARIS,
            OsAbi::FreeBsd => abi::ELFOSABI_FREEBSD,
            OsAbi::OpenBsd => abi::ELFOSABI_OPENBSD,
            OsAbi::Arm => abi_compat::ELFOSABI_ARM,
            OsAbi::Standalone => abi_compat::ELFOSABI_STANDALONE,
            OsAbi::Ext(v) => v,
        }
    }
}

/// The object-file type from `e_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    None,
    /// Relocatable file.
    Rel,
    /// Executable file.
    Exec,
    /// Shared object.
    Dyn,
    /// Core dump.
    Core,
    Ext(u16),
}

impl ObjectKind {
    pub fn from_u16(v: u16) -> Self {
        match v {
            abi::ET_NONE => ObjectKind::None,
            abi::ET_REL => ObjectKind::Rel,
            abi::ET_EXEC => ObjectKind::Exec,
            abi::ET_DYN => ObjectKind::Dyn,
            abi::ET_CORE => ObjectKind::Core,
            v => ObjectKind::Ext(v),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            ObjectKind::None => abi::ET_NONE,
            ObjectKind::Rel => abi::ET_REL,
            ObjectKind::Exec => abi::ET_EXEC,
            ObjectKind::Dyn => abi::ET_DYN,
            ObjectKind::Core => abi::ET_CORE,
            ObjectKind::Ext(v) => v,
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::None => f.write_str("none"),
            ObjectKind::Rel => f.write_str("relocatable"),
            ObjectKind::Exec => f.write_str("executable"),
            ObjectKind::Dyn => f.write_str("shared object"),
            ObjectKind::Core => f.write_str("core"),
            ObjectKind::Ext(v) => write!(f, "type({v:#x})"),
        }
    }
}

/// The target machine from `e_machine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Machine {
    None,
    Sparc,
    X86,
    M68k,
    Mips,
    PowerPc,
    PowerPc64,
    Arm,
    Ia64,
    X86_64,
    AArch64,
    RiscV,
    LoongArch,
    Tic6x,
    Ext(u16),
}

impl Machine {
    pub fn from_u16(v: u16) -> Self {
        match v {
            abi::EM_NONE => Machine::None,
            abi::EM_SPARC => Machine::Sparc,
            abi::EM_386 => Machine::X86,
            abi::EM_68K => Machine::M68k,
            abi::EM_MIPS => Machine::Mips,
            abi::EM_PPC => Machine::PowerPc,
            abi::EM_PPC64 => Machine::PowerPc64,
            abi::EM_ARM => Machine::Arm,
            abi::EM_IA_64 => Machine::Ia64,
            abi::EM_X86_64 => Machine::X86_64,
            abi::EM_AARCH64 => Machine::AArch64,
            abi::EM_RISCV => Machine::RiscV,
            abi_compat::EM_LOONGARCH => Machine::LoongArch,
            abi::EM_TI_C6000 => Machine::Tic6x,
            v => Machine::Ext(v),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Machine::None => abi::EM_NONE,
            Machine::Sparc => abi::EM_SPARC,
            Machine::X86 => abi::EM_386,
            Machine::M68k => abi::EM_68K,
            Machine::Mips => abi::EM_MIPS,
            Machine::PowerPc => abi::EM_PPC,
            Machine::PowerPc64 => abi::EM_PPC64,
            Machine::Arm => abi::EM_ARM,
            Machine::Ia64 => abi::EM_IA_64,
            Machine::X86_64 => abi::EM_X86_64,
            Machine::AArch64 => abi::EM_AARCH64,
            Machine::RiscV => abi::EM_RISCV,
            Machine::LoongArch => abi_compat::EM_LOONGARCH,
            Machine::Tic6x => abi::EM_TI_C6000,
            Machine::Ext(v) => v,
        }
    }
}

impl Display for Machine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Machine::None => f.write_str("none"),
            Machine::Sparc => f.write_str("sparc"),
            Machine::X86 => f.write_str("i386"),
            Machine::M68k => f.write_str("m68k"),
            Machine::Mips => f.write_str("mips"),
            Machine::PowerPc => f.write_str("powerpc"),
            Machine::PowerPc64 => f.write_str("powerpc64"),
            Machine::Arm => f.write_str("arm"),
            Machine::Ia64 => f.write_str("ia64"),
            Machine::X86_64 => f.write_str("x86-64"),
            Machine::AArch64 => f.write_str("aarch64"),
            Machine::RiscV => f.write_str("riscv"),
            Machine::LoongArch => f.write_str("loongarch"),
            Machine::Tic6x => f.write_str("tic6x"),
            Machine::Ext(v) => write!(f, "machine({v:#x})"),
        }
    }
}

/// The type of a section from `sh_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    Null,
    ProgBits,
    SymTab,
    StrTab,
    Rela,
    Hash,
    Dynamic,
    Note,
    NoBits,
    Rel,
    Shlib,
    DynSym,
    Ext(u32),
}

impl SectionType {
    pub fn from_u32(v: u32) -> Self {
        match v {
            abi::SHT_NULL => SectionType::Null,
            abi::SHT_PROGBITS => SectionType::ProgBits,
            abi::SHT_SYMTAB => SectionType::SymTab,
            abi::SHT_STRTAB => SectionType::StrTab,
            abi::SHT_RELA => SectionType::Rela,
            abi::SHT_HASH => SectionType::Hash,
            abi::SHT_DYNAMIC => SectionType::Dynamic,
            abi::SHT_NOTE => SectionType::Note,
            abi::SHT_NOBITS => SectionType::NoBits,
            abi::SHT_REL => SectionType::Rel,
            abi::SHT_SHLIB => SectionType::Shlib,
            abi::SHT_DYNSYM => SectionType::DynSym,
            v => SectionType::Ext(v),
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            SectionType::Null => abi::SHT_NULL,
            SectionType::ProgBits => abi::SHT_PROGBITS,
            SectionType::SymTab => abi::SHT_SYMTAB,
            SectionType::StrTab => abi::SHT_STRTAB,
            SectionType::Rela => abi::SHT_RELA,
            SectionType::Hash => abi::SHT_HASH,
            SectionType::Dynamic => abi::SHT_DYNAMIC,
            SectionType::Note => abi::SHT_NOTE,
            SectionType::NoBits => abi::SHT_NOBITS,
            SectionType::Rel => abi::SHT_REL,
            SectionType::Shlib => abi::SHT_SHLIB,
            SectionType::DynSym => abi::SHT_DYNSYM,
            SectionType::Ext(v) => v,
        }
    }
}

impl Display for SectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SectionType::Null => f.write_str("NULL"),
            SectionType::ProgBits => f.write_str("PROGBITS"),
            SectionType::SymTab => f.write_str("SYMTAB"),
            SectionType::StrTab => f.write_str("STRTAB"),
            SectionType::Rela => f.write_str("RELA"),
            SectionType::Hash => f.write_str("HASH"),
            SectionType::Dynamic => f.write_str("DYNAMIC"),
            SectionType::Note => f.write_str("NOTE"),
            SectionType::NoBits => f.write_str("NOBITS"),
            SectionType::Rel => f.write_str("REL"),
            SectionType::Shlib => f.write_str("SHLIB"),
            SectionType::DynSym => f.write_str("DYNSYM"),
            SectionType::Ext(v) => write!(f, "section({v:#x})"),
        }
    }
}

/// The type of a program segment from `p_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentType {
    Null,
    Load,
    Dynamic,
    Interp,
    Note,
    Shlib,
    Phdr,
    Ext(u32),
}

impl SegmentType {
    pub fn from_u32(v: u32) -> Self {
        match v {
            abi::PT_NULL => SegmentType::Null,
            abi::PT_LOAD => SegmentType::Load,
            abi::PT_DYNAMIC => SegmentType::Dynamic,
            abi::PT_INTERP => SegmentType::Interp,
            abi::PT_NOTE => SegmentType::Note,
            abi::PT_SHLIB => SegmentType::Shlib,
            abi::PT_PHDR => SegmentType::Phdr,
            v => SegmentType::Ext(v),
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            SegmentType::Null => abi::PT_NULL,
            SegmentType::Load => abi::PT_LOAD,
            SegmentType::Dynamic => abi::PT_DYNAMIC,
            SegmentType::Interp => abi::PT_INTERP,
            SegmentType::Note => abi::PT_NOTE,
            SegmentType::Shlib => abi::PT_SHLIB,
            SegmentType::Phdr => abi::PT_PHDR,
            SegmentType::Ext(v) => v,
        }
    }

    /// Pre-load segments are emitted ahead of all others in the program
    /// header table so loaders find them without scanning.
    pub fn is_pre_load(self) -> bool {
        matches!(self, SegmentType::Phdr | SegmentType::Interp)
    }
}

impl Display for SegmentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SegmentType::Null => f.write_str("NULL"),
            SegmentType::Load => f.write_str("LOAD"),
            SegmentType::Dynamic => f.write_str("DYNAMIC"),
            SegmentType::Interp => f.write_str("INTERP"),
            SegmentType::Note => f.write_str("NOTE"),
            SegmentType::Shlib => f.write_str("SHLIB"),
            SegmentType::Phdr => f.write_str("PHDR"),
            SegmentType::Ext(v) => write!(f, "segment({v:#x})"),
        }
    }
}

bitflags! {
    /// Section attribute flags (`sh_flags`).
    ///
    /// Stored at the file's address width; unknown bits are kept verbatim,
    /// so conversions must go through [`SectionFlags::from_bits_retain`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SectionFlags: u64 {
        const WRITE = abi::SHF_WRITE as u64;
        const ALLOC = abi::SHF_ALLOC as u64;
        const EXECINSTR = abi::SHF_EXECINSTR as u64;
        const MERGE = abi::SHF_MERGE as u64;
        const TLS = abi::SHF_TLS as u64;
    }

    /// Segment permission flags (`p_flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SegmentFlags: u32 {
        const X = abi::PF_X;
        const W = abi::PF_W;
        const R = abi::PF_R;
    }
}

/// The type of a symbol, from the low nibble of `st_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    NoType,
    Object,
    Func,
    Section,
    File,
    Common,
    Tls,
    Ext(u8),
}

impl SymbolType {
    pub fn from_u8(v: u8) -> Self {
        match v {
            abi::STT_NOTYPE => SymbolType::NoType,
            abi::STT_OBJECT => SymbolType::Object,
            abi::STT_FUNC => SymbolType::Func,
            abi::STT_SECTION => SymbolType::Section,
            abi::STT_FILE => SymbolType::File,
            abi::STT_COMMON => SymbolType::Common,
            abi::STT_TLS => SymbolType::Tls,
            v => SymbolType::Ext(v),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            SymbolType::NoType => abi::STT_NOTYPE,
            SymbolType::Object => abi::STT_OBJECT,
            SymbolType::Func => abi::STT_FUNC,
            SymbolType::Section => abi::STT_SECTION,
            SymbolType::File => abi::STT_FILE,
            SymbolType::Common => abi::STT_COMMON,
            SymbolType::Tls => abi::STT_TLS,
            SymbolType::Ext(v) => v,
        }
    }
}

impl Display for SymbolType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SymbolType::NoType => f.write_str("NOTYPE"),
            SymbolType::Object => f.write_str("OBJECT"),
            SymbolType::Func => f.write_str("FUNC"),
            SymbolType::Section => f.write_str("SECTION"),
            SymbolType::File => f.write_str("FILE"),
            SymbolType::Common => f.write_str("COMMON"),
            SymbolType::Tls => f.write_str("TLS"),
            SymbolType::Ext(v) => write!(f, "symtype({v:#x})"),
        }
    }
}

/// The binding of a symbol, from the high nibble of `st_info`.
///
/// Bindings have no fall-through variant: a record carrying an unknown
/// binding fails symbol parsing with `BadSymbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolBinding {
    Local,
    Global,
    Weak,
}

impl SymbolBinding {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            abi::STB_LOCAL => Some(SymbolBinding::Local),
            abi::STB_GLOBAL => Some(SymbolBinding::Global),
            abi::STB_WEAK => Some(SymbolBinding::Weak),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            SymbolBinding::Local => abi::STB_LOCAL,
            SymbolBinding::Global => abi::STB_GLOBAL,
            SymbolBinding::Weak => abi::STB_WEAK,
        }
    }
}

impl Display for SymbolBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SymbolBinding::Local => f.write_str("LOCAL"),
            SymbolBinding::Global => f.write_str("GLOBAL"),
            SymbolBinding::Weak => f.write_str("WEAK"),
        }
    }
}

/// A section-index field (`st_shndx`) with its reserved-range semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionIndex {
    /// Undefined, irrelevant or otherwise meaningless section.
    Undef,
    LoProc,
    /// Inside the processor-reserved range, exclusive of its ends.
    CustomProc(u16),
    HiProc,
    LoOs,
    /// Inside the OS-reserved range, exclusive of its ends.
    CustomOs(u16),
    HiOs,
    /// The symbol has an absolute value.
    Abs,
    /// The symbol labels a common block.
    Common,
    /// An ordinary index into the section-header table.
    Index(u16),
}

impl SectionIndex {
    pub fn from_u16(v: u16) -> Self {
        match v {
            abi::SHN_UNDEF => SectionIndex::Undef,
            abi_compat::SHN_LOPROC => SectionIndex::LoProc,
            abi_compat::SHN_HIPROC => SectionIndex::HiProc,
            abi_compat::SHN_LOOS => SectionIndex::LoOs,
            abi_compat::SHN_HIOS => SectionIndex::HiOs,
            abi::SHN_ABS => SectionIndex::Abs,
            abi::SHN_COMMON => SectionIndex::Common,
            v if v > abi_compat::SHN_LOPROC && v < abi_compat::SHN_HIPROC => SectionIndex::CustomProc(v),
            v if v > abi_compat::SHN_LOOS && v < abi_compat::SHN_HIOS => SectionIndex::CustomOs(v),
            v => SectionIndex::Index(v),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            SectionIndex::Undef => abi::SHN_UNDEF,
            SectionIndex::LoProc => abi_compat::SHN_LOPROC,
            SectionIndex::CustomProc(v) => v,
            SectionIndex::HiProc => abi_compat::SHN_HIPROC,
            SectionIndex::LoOs => abi_compat::SHN_LOOS,
            SectionIndex::CustomOs(v) => v,
            SectionIndex::HiOs => abi_compat::SHN_HIOS,
            SectionIndex::Abs => abi::SHN_ABS,
            SectionIndex::Common => abi::SHN_COMMON,
            SectionIndex::Index(v) => v,
        }
    }

    /// A machine-specific pretty name for a value in the processor-reserved
    /// range, when the target defines one.
    ///
    /// Values in that range mean different things on different targets, so
    /// the alias is gated on the machine (and, for HP-UX on IA-64, the
    /// OS/ABI byte).
    pub fn alias(self, machine: Machine, osabi: OsAbi) -> Option<&'static str> {
        match (self, machine) {
            (SectionIndex::LoProc, Machine::Ia64) if osabi == OsAbi::HpUx => Some("ANSI_COMMON"),
            (SectionIndex::LoProc, Machine::Tic6x) => Some("SCOMMON"),
            (SectionIndex::CustomProc(0xff02), Machine::X86_64) => Some("LCOMMON"),
            (SectionIndex::CustomProc(0xff03), Machine::Mips) => Some("SCOMMON"),
            (SectionIndex::CustomProc(0xff04), Machine::Mips) => Some("SUNDEFINED"),
            _ => None,
        }
    }
}

impl Display for SectionIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SectionIndex::Undef => f.write_str("UND"),
            SectionIndex::LoProc => f.write_str("LOPROC"),
            SectionIndex::CustomProc(v) => write!(f, "PROC({v:#x})"),
            SectionIndex::HiProc => f.write_str("HIPROC"),
            SectionIndex::LoOs => f.write_str("LOOS"),
            SectionIndex::CustomOs(v) => write!(f, "OS({v:#x})"),
            SectionIndex::HiOs => f.write_str("HIOS"),
            SectionIndex::Abs => f.write_str("ABS"),
            SectionIndex::Common => f.write_str("COM"),
            SectionIndex::Index(v) => write!(f, "{v}"),
        }
    }
}
