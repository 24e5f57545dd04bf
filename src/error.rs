//! Error types for `msbtkit`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `msbtkit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The path to load does not resolve to an existing file.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    // ==================== Container Errors ====================
    /// The file is not a valid MSBT container (missing `MsgStdBn` magic).
    #[error("invalid MSBT magic: expected MsgStdBn, found {0:?}")]
    InvalidMsbtMagic([u8; 8]),

    /// The byte order mark is neither FF FE nor FE FF.
    #[error("invalid byte order mark: {0:02X?}")]
    InvalidByteOrderMark([u8; 2]),

    /// The header encoding byte does not name a known text encoding.
    #[error("unsupported encoding byte: {0:#04x}")]
    UnsupportedEncoding(u8),

    /// A mandatory section is missing from the container.
    #[error("missing mandatory section: {0}")]
    MissingSection(&'static str),

    /// The same mandatory section appears more than once.
    #[error("duplicate {tag} section")]
    DuplicateSection {
        /// The repeated section tag.
        tag: String,
    },

    /// A section's declared length runs past the end of the file.
    #[error("section {tag} overruns the file: declared {declared} bytes, {remaining} remaining")]
    SectionOverrun {
        /// The section tag.
        tag: String,
        /// The declared body size in bytes.
        declared: usize,
        /// Bytes actually remaining in the file.
        remaining: usize,
    },

    /// A section body is too short for the tables it declares.
    #[error("truncated {tag} section")]
    TruncatedSection {
        /// The section tag.
        tag: String,
    },

    /// An offset stored inside a section points outside its body.
    #[error("offset {offset} out of bounds in {tag} section of {size} bytes")]
    OffsetOutOfBounds {
        /// The section tag.
        tag: String,
        /// The offending offset.
        offset: usize,
        /// The section body size in bytes.
        size: usize,
    },

    /// The label section declares zero hash groups.
    #[error("label section declares zero groups")]
    EmptyGroupTable,

    /// A label references a string index outside the pool.
    #[error("string index {index} out of bounds ({count} strings in pool)")]
    InvalidStringIndex {
        /// The out-of-range index.
        index: usize,
        /// The number of strings in the pool.
        count: usize,
    },

    /// Unexpected end of file.
    #[error("unexpected end of file")]
    UnexpectedEof,

    // ==================== Text Codec Errors ====================
    /// A text run's byte length is not a multiple of the code unit size.
    #[error("text run of {len} bytes is not aligned to {unit}-byte code units")]
    MisalignedTextRun {
        /// The run length in bytes.
        len: usize,
        /// The code unit size in bytes.
        unit: usize,
    },

    /// A string run does not end with a null terminator.
    #[error("unterminated string at pool index {index}")]
    UnterminatedString {
        /// The pool index of the offending string.
        index: usize,
    },

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// UTF-16 conversion error.
    #[error("UTF-16 conversion error: {0}")]
    Utf16Error(#[from] std::string::FromUtf16Error),

    // ==================== Label Directory Errors ====================
    /// A label with the same name already exists in the directory.
    #[error("duplicate label name: {0}")]
    DuplicateLabel(String),

    /// No label with the given name exists in the directory.
    #[error("label not found: {0}")]
    LabelNotFound(String),

    /// A label name exceeds the format's length limit.
    #[error("label name is {len} bytes (maximum {max})")]
    LabelTooLong {
        /// The rejected name's length in bytes.
        len: usize,
        /// The maximum allowed length.
        max: usize,
    },

    /// A label name is empty.
    #[error("label name is empty")]
    EmptyLabelName,
}

/// A specialized Result type for `msbtkit` operations.
pub type Result<T> = std::result::Result<T, Error>;
