//! Error types for parsing and editing ELF images.

use alloc::string::{String, ToString};
use core::fmt::{Display, Formatter};

/// The error type returned by parsing and folding operations in this crate.
///
/// Rendering never returns an error: a region tree that violates the tree
/// invariants is a programming error and panics instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The buffer does not begin with the `\x7f ELF` magic bytes.
    BadMagic { msg: String },
    /// The format version (ident byte or the 32-bit header field) is not 1.
    BadVersion { msg: String },
    /// The class byte is neither `ELFCLASS32` nor `ELFCLASS64`, or does not
    /// match the requested address width.
    BadClass { msg: String },
    /// The data-encoding byte is neither `ELFDATA2LSB` nor `ELFDATA2MSB`.
    BadData { msg: String },
    /// A header-table entry size disagrees with the file class.
    BadHeaderSize { msg: String },
    /// A read or a fold walked past the end of the available bytes.
    Truncated { msg: String },
    /// Two special regions claim the same bytes.
    Overlap { msg: String },
    /// A symbol record carries an unrecognized binding value.
    BadSymbol { msg: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::BadMagic { msg } => write!(f, "bad ELF magic: {msg}"),
            Error::BadVersion { msg } => write!(f, "bad ELF version: {msg}"),
            Error::BadClass { msg } => write!(f, "bad ELF class: {msg}"),
            Error::BadData { msg } => write!(f, "bad data encoding: {msg}"),
            Error::BadHeaderSize { msg } => write!(f, "bad header size: {msg}"),
            Error::Truncated { msg } => write!(f, "truncated input: {msg}"),
            Error::Overlap { msg } => write!(f, "overlapping regions: {msg}"),
            Error::BadSymbol { msg } => write!(f, "bad symbol record: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

#[cold]
pub(crate) fn bad_magic_error(msg: impl ToString) -> Error {
    Error::BadMagic {
        msg: msg.to_string(),
    }
}

#[cold]
pub(crate) fn bad_version_error(msg: impl ToString) -> Error {
    Error::BadVersion {
        msg: msg.to_string(),
    }
}

#[cold]
pub(crate) fn bad_class_error(msg: impl ToString) -> Error {
    Error::BadClass {
        msg: msg.to_string(),
    }
}

#[cold]
pub(crate) fn bad_data_error(msg: impl ToString) -> Error {
    Error::BadData {
        msg: msg.to_string(),
    }
}

#[cold]
pub(crate) fn bad_header_size_error(msg: impl ToString) -> Error {
    Error::BadHeaderSize {
        msg: msg.to_string(),
    }
}

#[cold]
pub(crate) fn truncated_error(msg: impl ToString) -> Error {
    Error::Truncated {
        msg: msg.to_string(),
    }
}

#[cold]
pub(crate) fn overlap_error(msg: impl ToString) -> Error {
    Error::Overlap {
        msg: msg.to_string(),
    }
}

#[cold]
pub(crate) fn bad_symbol_error(msg: impl ToString) -> Error {
    Error::BadSymbol {
        msg: msg.to_string(),
    }
}
