//! MSBT message container format
//!
//! Binary container for localizable game text: a hash-bucketed label
//! directory (`LBL1`) over an ordered string pool (`TXT2`), plus any number
//! of opaque metadata sections carried through unmodified.

mod editor;
mod encoding;
mod label;
mod pool;
mod reader;
mod writer;

pub use encoding::{ByteOrder, TextEncoding};
pub use label::{Label, LabelDirectory};
pub use pool::StringPool;
pub use reader::{parse_msbt_bytes, read_msbt};
pub use writer::{serialize_msbt, write_msbt};

/// "MsgStdBn" magic signature.
pub const MSBT_SIGNATURE: [u8; 8] = *b"MsgStdBn";

/// Tag of the mandatory label/bucket section.
pub const SECTION_LABELS: [u8; 4] = *b"LBL1";

/// Tag of the mandatory string-pool section.
pub const SECTION_TEXTS: [u8; 4] = *b"TXT2";

/// Size of the fixed file header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Size of each section header (tag + size + reserved) in bytes.
pub const SECTION_HEADER_SIZE: usize = 16;

/// Section bodies are padded out to this boundary.
pub const SECTION_ALIGNMENT: usize = 16;

/// Byte used to pad sections to the alignment boundary.
pub const PADDING_BYTE: u8 = 0xAB;

/// Format version stored in the header.
pub const MSBT_VERSION: u8 = 3;

/// Maximum label name length in bytes.
pub const LABEL_MAX_LENGTH: usize = 64;

/// Characters a label name may contain, for host-side validation.
pub const LABEL_NAME_FILTER: &str = "^[A-Za-z0-9_]+$";

/// Hash group count for containers created from scratch.
pub const DEFAULT_GROUP_COUNT: usize = 101;

/// A recognized-but-uninterpreted section, preserved byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueSection {
    /// Four-byte ASCII section tag.
    pub tag: [u8; 4],
    /// The section body exactly as read.
    pub data: Vec<u8>,
}

/// One section slot, in on-disk order.
#[derive(Debug, Clone)]
pub enum Section {
    /// The label/bucket section; contents live in the label directory.
    Labels,
    /// The string-pool section; contents live in the string pool.
    Texts,
    /// Any other section, re-emitted unchanged on save.
    Opaque(OpaqueSection),
}

/// A fully parsed in-memory MSBT container.
#[derive(Debug, Clone)]
pub struct Msbt {
    byte_order: ByteOrder,
    encoding: TextEncoding,
    version: u8,
    directory: LabelDirectory,
    pool: StringPool,
    sections: Vec<Section>,
}

impl Msbt {
    /// Create an empty container with the default group count.
    #[must_use]
    pub fn new(encoding: TextEncoding, byte_order: ByteOrder) -> Self {
        Self::with_groups(encoding, byte_order, DEFAULT_GROUP_COUNT)
    }

    /// Create an empty container with an explicit hash group count.
    ///
    /// The group count is fixed for the container's lifetime; edits change
    /// bucket contents, never the bucket count.
    #[must_use]
    pub fn with_groups(encoding: TextEncoding, byte_order: ByteOrder, group_count: usize) -> Self {
        Self {
            byte_order,
            encoding,
            version: MSBT_VERSION,
            directory: LabelDirectory::new(group_count),
            pool: StringPool::new(),
            sections: vec![Section::Labels, Section::Texts],
        }
    }

    /// The container's text encoding.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The container's byte order.
    #[must_use]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// The format version carried in the header.
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The label directory.
    #[must_use]
    pub fn directory(&self) -> &LabelDirectory {
        &self.directory
    }

    /// The string pool.
    #[must_use]
    pub fn pool(&self) -> &StringPool {
        &self.pool
    }

    /// Section slots in on-disk order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of entries in the container.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }
}
