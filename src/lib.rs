//! # elf_edit
//!
//! **elf_edit** is a layout-preserving parser, editor and writer for ELF
//! (Executable and Linkable Format) object files. It reads an ELF image
//! into a single edit-friendly tree that unifies the link-time view
//! (sections) with the load-time view (segments), and re-serializes the
//! tree deterministically, recomputing header tables, string tables,
//! alignment padding and cross-references as it goes.
//!
//! The core is purely in-memory: it accepts and returns byte buffers,
//! leaving file I/O, disassembly, relocation and dynamic-linking concerns
//! to its callers.
//!
//! ## Core properties
//!
//! * **Round-trip fidelity**: an unedited tree renders back to the input
//!   bytes; unknown machines, section types and segment types survive as
//!   raw values.
//! * **Overlap-aware**: segments nest around the regions their file range
//!   covers, so the dual section/segment view stays consistent under
//!   edits.
//! * **Deterministic output**: the renderer computes the final layout
//!   first, then writes bytes against it. Nothing is back-patched.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use elf_edit::ElfFile;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("liba.so")?;
//!
//!     // Parse, drop a section, write back out.
//!     let mut file = ElfFile::parse(&bytes)?;
//!     if let ElfFile::Elf64(image) = &mut file {
//!         image.remove_section(b".comment");
//!     }
//!     std::fs::write("liba-stripped.so", file.render().bytes)?;
//!     Ok(())
//! }
//! ```
#![no_std]
#![warn(
    clippy::unnecessary_wraps,
    clippy::unnecessary_lazy_evaluations,
    clippy::collapsible_if,
    clippy::cast_lossless,
    clippy::explicit_iter_loop,
    clippy::manual_assert,
    clippy::needless_question_mark,
    clippy::needless_return,
    clippy::needless_update,
    clippy::redundant_clone,
    clippy::redundant_else,
    clippy::redundant_static_lifetimes
)]
#![allow(clippy::len_without_is_empty, clippy::unnecessary_cast)]
extern crate alloc;

pub mod class;
pub mod codec;
pub mod defs;
mod error;
mod image;
mod parse;
pub mod region;
mod render;
pub mod strtab;
mod symbol;

pub(crate) use error::*;

pub use class::{Class32, Class64, ElfClass};
pub use defs::{
    Class, Encoding, Machine, ObjectKind, OsAbi, SectionFlags, SectionIndex, SectionType,
    SegmentFlags, SegmentType, SymbolBinding, SymbolType,
};
pub use error::Error;
pub use image::{Elf32, Elf64, ElfFile, ElfImage};
pub use region::{DataRegion, Section, SectionSlot, Sections, Segment};
pub use render::{Rendered, SegmentMeta};
pub use symbol::SymbolEntry;

/// A type alias for `Result`s returned by `elf_edit` functions.
///
/// This is a convenience alias that eliminates the need to repeatedly
/// specify the [`Error`] type in function signatures.
pub type Result<T> = core::result::Result<T, Error>;
