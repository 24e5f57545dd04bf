//! MSBT editing operations
//!
//! Structural edits keep the directory and pool coupled: new strings are
//! appended at the highest index, removals compact the pool and renumber
//! every label above the removed index.

use super::{Label, Msbt};
use crate::error::{Error, Result};

impl Msbt {
    /// Add a new entry.
    ///
    /// The text is appended to the string pool, so the new entry
    /// enumerates last within its hash bucket.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateLabel`] if the name is already taken, or a
    /// name-limit error. The container is unchanged on failure.
    pub fn add_entry(&mut self, name: &str, text: &str) -> Result<()> {
        let bytes = self.encoding.encode(text, self.byte_order);
        self.directory.insert(name.to_string(), self.pool.len())?;
        self.pool.append(bytes);
        Ok(())
    }

    /// Rename an entry, keeping its text.
    ///
    /// # Errors
    /// Returns [`Error::LabelNotFound`] if `name` is absent, or
    /// [`Error::DuplicateLabel`] if `new_name` belongs to a different
    /// entry. The container is unchanged on failure.
    pub fn rename_entry(&mut self, name: &str, new_name: &str) -> Result<()> {
        self.directory.rename(name, new_name)
    }

    /// Remove an entry together with its pool record, renumbering every
    /// higher string index.
    ///
    /// # Errors
    /// Returns [`Error::LabelNotFound`] if `name` is absent.
    pub fn remove_entry(&mut self, name: &str) -> Result<()> {
        let label = self.directory.remove(name)?;
        self.pool.remove(label.string_index)?;
        self.directory.shift_indices_above(label.string_index);
        Ok(())
    }

    /// Replace an entry's text in place.
    ///
    /// # Errors
    /// Returns [`Error::LabelNotFound`] if `name` is absent.
    pub fn set_text(&mut self, name: &str, text: &str) -> Result<()> {
        let bytes = self.encoding.encode(text, self.byte_order);
        let index = self
            .directory
            .lookup(name)
            .ok_or_else(|| Error::LabelNotFound(name.to_string()))?
            .string_index;
        self.pool.set(index, bytes)
    }

    /// Decode an entry's text.
    ///
    /// # Errors
    /// Returns [`Error::LabelNotFound`] if `name` is absent, or a codec
    /// error if the stored bytes do not decode.
    pub fn text(&self, name: &str) -> Result<String> {
        let label = self
            .directory
            .lookup(name)
            .ok_or_else(|| Error::LabelNotFound(name.to_string()))?;
        let bytes = self
            .pool
            .get(label.string_index)
            .ok_or(Error::InvalidStringIndex {
                index: label.string_index,
                count: self.pool.len(),
            })?;
        self.encoding.decode(bytes, self.byte_order)
    }

    /// Whether an entry with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.directory.contains(name)
    }

    /// Iterate labels in enumeration (bucket) order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.directory.iter()
    }
}
