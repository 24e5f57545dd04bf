//! File format handlers

pub mod common;
pub mod msbt;

// Re-export main container types
pub use msbt::{Msbt, parse_msbt_bytes, read_msbt, serialize_msbt, write_msbt};
