//! Host-facing adapter for MSBT files
//!
//! A generic editing host drives one loaded file through four operations:
//! load, save, enumerate entries, and mutate entries. Mutation failures
//! collapse to `false` at this boundary; the underlying typed errors are
//! logged here and stay observable on the library API.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::formats::msbt::{
    LABEL_MAX_LENGTH, LABEL_NAME_FILTER, Msbt, TextEncoding, read_msbt, write_msbt,
};

/// Outcome of a load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResult {
    Success,
    Failure,
    FileNotFound,
}

/// Outcome of a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    Success,
    Failure,
}

/// An editable entry: one (label, string) pair plus the text it had when
/// the file was loaded.
///
/// Entries are value snapshots rebuilt on every enumeration; edits are
/// committed back through the adapter's mutation methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    edited_text: String,
    original_text: String,
    string_index: usize,
    max_length: usize,
    encoding: TextEncoding,
}

impl Entry {
    /// The entry's label name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Current (edited) text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.edited_text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.edited_text = text.into();
    }

    /// Text as it was when the file was loaded.
    #[must_use]
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Position of the entry's string in the pool.
    #[must_use]
    pub fn string_index(&self) -> usize {
        self.string_index
    }

    /// Maximum text length the host should allow (0 = unlimited).
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// The container encoding the entry's text serializes with.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }
}

impl fmt::Display for Entry {
    /// Display name: the label name, or the string index for unnamed
    /// entries.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.string_index)
        } else {
            f.write_str(&self.name)
        }
    }
}

impl Ord for Entry {
    /// Display order: name first, string-pool index as the tie-breaker.
    /// Deterministic and independent of the hash bucket layout.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.string_index.cmp(&other.string_index))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One open MSBT file and its edit state.
///
/// Each adapter owns at most one container; hosts open multiple files by
/// holding multiple adapters with fully independent state.
#[derive(Debug, Default)]
pub struct MsbtAdapter {
    path: Option<PathBuf>,
    msbt: Option<Msbt>,
    original_texts: HashMap<String, String>,
}

impl MsbtAdapter {
    /// Adapter display name.
    pub const NAME: &'static str = "MSBT";
    /// Adapter description.
    pub const DESCRIPTION: &'static str = "Message Studio Binary Text";
    /// File extension filter.
    pub const EXTENSION: &'static str = "*.msbt";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a container from disk, replacing any previously loaded state.
    ///
    /// A failed parse leaves the adapter empty rather than half-loaded.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> LoadResult {
        let path = path.as_ref();
        if !path.is_file() {
            return LoadResult::FileNotFound;
        }
        match read_msbt(path) {
            Ok(msbt) => {
                self.original_texts = snapshot_texts(&msbt);
                self.msbt = Some(msbt);
                self.path = Some(path.to_path_buf());
                LoadResult::Success
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                self.msbt = None;
                self.path = None;
                self.original_texts.clear();
                LoadResult::Failure
            }
        }
    }

    /// Save to `path`, or to the load path when omitted.
    ///
    /// The container is serialized to memory first; a failure before the
    /// write leaves the previously saved file untouched.
    pub fn save(&mut self, path: Option<&Path>) -> SaveResult {
        let Some(msbt) = self.msbt.as_ref() else {
            tracing::warn!("Save requested with no container loaded");
            return SaveResult::Failure;
        };
        if let Some(p) = path {
            self.path = Some(p.to_path_buf());
        }
        let Some(target) = self.path.clone() else {
            return SaveResult::Failure;
        };
        match write_msbt(&target, msbt) {
            Ok(()) => SaveResult::Success,
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", target.display(), e);
                SaveResult::Failure
            }
        }
    }

    /// Check whether `path` parses as an MSBT container, retaining nothing.
    #[must_use]
    pub fn identify<P: AsRef<Path>>(path: P) -> bool {
        read_msbt(path).is_ok()
    }

    /// The path of the loaded file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Entries in enumeration (bucket) order, rebuilt on every call.
    #[must_use]
    pub fn entries(&self) -> Vec<Entry> {
        let Some(msbt) = self.msbt.as_ref() else {
            return Vec::new();
        };

        let mut entries = Vec::with_capacity(msbt.len());
        for label in msbt.labels() {
            let text = match msbt.text(&label.name) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Undecodable text for entry {}: {}", label.name, e);
                    String::new()
                }
            };
            entries.push(Entry {
                name: label.name.clone(),
                edited_text: text,
                original_text: self
                    .original_texts
                    .get(&label.name)
                    .cloned()
                    .unwrap_or_default(),
                string_index: label.string_index,
                max_length: 0,
                encoding: msbt.encoding(),
            });
        }
        entries
    }

    /// Label names in the same order as [`MsbtAdapter::entries`].
    #[must_use]
    pub fn name_list(&self) -> Vec<String> {
        self.msbt
            .as_ref()
            .map(|msbt| msbt.labels().map(|label| label.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Pattern of characters allowed in a label name.
    #[must_use]
    pub fn name_filter() -> &'static str {
        LABEL_NAME_FILTER
    }

    /// Maximum label name length in bytes.
    #[must_use]
    pub fn name_max_length() -> usize {
        LABEL_MAX_LENGTH
    }

    /// A fresh empty entry bound to the loaded container's encoding.
    ///
    /// The entry joins the directory only once [`MsbtAdapter::add_entry`]
    /// commits it.
    #[must_use]
    pub fn new_entry(&self) -> Entry {
        Entry {
            name: String::new(),
            edited_text: String::new(),
            original_text: String::new(),
            string_index: 0,
            max_length: 0,
            encoding: self.msbt.as_ref().map_or(TextEncoding::Utf16, Msbt::encoding),
        }
    }

    /// Commit a new entry to the directory. Returns `false` on any failure.
    pub fn add_entry(&mut self, entry: &Entry) -> bool {
        self.try_mutate("add", |msbt| msbt.add_entry(&entry.name, &entry.edited_text))
    }

    /// Rename an entry. Returns `false` on any failure.
    pub fn rename_entry(&mut self, entry: &Entry, new_name: &str) -> bool {
        self.try_mutate("rename", |msbt| msbt.rename_entry(&entry.name, new_name))
    }

    /// Remove an entry and its text. Returns `false` on any failure.
    pub fn remove_entry(&mut self, entry: &Entry) -> bool {
        self.try_mutate("remove", |msbt| msbt.remove_entry(&entry.name))
    }

    /// Apply an entry's edited text to the container. Returns `false` on
    /// any failure.
    pub fn update_entry(&mut self, entry: &Entry) -> bool {
        self.try_mutate("update", |msbt| msbt.set_text(&entry.name, &entry.edited_text))
    }

    fn try_mutate(&mut self, action: &str, op: impl FnOnce(&mut Msbt) -> Result<()>) -> bool {
        let Some(msbt) = self.msbt.as_mut() else {
            tracing::warn!("Entry {} requested with no container loaded", action);
            return false;
        };
        match op(msbt) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Entry {} rejected: {}", action, e);
                false
            }
        }
    }
}

fn snapshot_texts(msbt: &Msbt) -> HashMap<String, String> {
    msbt.labels()
        .filter_map(|label| {
            msbt.text(&label.name)
                .ok()
                .map(|text| (label.name.clone(), text))
        })
        .collect()
}
