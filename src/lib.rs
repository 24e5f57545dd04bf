//! # msbtkit
//!
//! A pure-Rust library for working with MSBT message containers - the
//! binary message-table format used to store localizable game text.
//!
//! ## Supported operations
//!
//! - **Load / save** - parse a container into an editable in-memory form
//!   and re-serialize it, carrying unknown sections through byte-for-byte
//! - **Enumerate** - labels and text in the container's hash-bucket order
//! - **Mutate** - add, rename and remove entries, edit entry text
//!
//! ## Quick Start
//!
//! ```no_run
//! use msbtkit::formats::msbt::{read_msbt, write_msbt};
//!
//! let mut msbt = read_msbt("Dialogue.msbt")?;
//! msbt.set_text("Greeting", "Hi there!")?;
//! msbt.add_entry("Farewell", "Bye!")?;
//! write_msbt("Dialogue.msbt", &msbt)?;
//! # Ok::<(), msbtkit::Error>(())
//! ```
//!
//! ### Through the editing-host adapter
//!
//! The [`adapter::MsbtAdapter`] is the boundary a generic editing host
//! drives: coarse load/save results, entry enumeration, and boolean
//! mutation outcomes.
//!
//! ```no_run
//! use msbtkit::adapter::{LoadResult, MsbtAdapter};
//!
//! let mut adapter = MsbtAdapter::new();
//! assert_eq!(adapter.load("Dialogue.msbt"), LoadResult::Success);
//! for entry in adapter.entries() {
//!     println!("{}: {}", entry.name(), entry.text());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `msbtkit` command-line binary

pub mod adapter;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::adapter::{Entry, LoadResult, MsbtAdapter, SaveResult};
    pub use crate::error::{Error, Result};
    pub use crate::formats::msbt::{
        ByteOrder, Label, LabelDirectory, Msbt, StringPool, TextEncoding, parse_msbt_bytes,
        read_msbt, serialize_msbt, write_msbt,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
