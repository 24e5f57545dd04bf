//! CLI commands for MSBT message file operations

use std::path::{Path, PathBuf};

use crate::adapter::MsbtAdapter;
use crate::formats::msbt::{ByteOrder, Msbt, Section, TextEncoding, read_msbt, write_msbt};

/// List entries in container order, or sorted by name.
pub fn list(path: &Path, limit: Option<usize>, sorted: bool) -> anyhow::Result<()> {
    let msbt = read_msbt(path)?;

    let mut names: Vec<_> = msbt.labels().map(|label| label.name.clone()).collect();
    if sorted {
        names.sort();
    }

    let shown = limit.unwrap_or(names.len()).min(names.len());
    for name in &names[..shown] {
        let text = msbt.text(name)?;
        println!("{name}\t{}", truncate_text(&text, 80));
    }

    if shown < names.len() {
        println!("... and {} more", names.len() - shown);
    }

    Ok(())
}

/// Print an entry's text, falling back to a partial name search.
pub fn get(path: &Path, name: &str) -> anyhow::Result<()> {
    let msbt = read_msbt(path)?;

    if msbt.contains(name) {
        println!("{}", msbt.text(name)?);
        return Ok(());
    }

    // Partial, case-insensitive match
    let query = name.to_lowercase();
    let matches: Vec<_> = msbt
        .labels()
        .filter(|label| label.name.to_lowercase().contains(&query))
        .collect();

    if matches.is_empty() {
        anyhow::bail!("entry not found: {name}");
    }

    for label in matches {
        let text = msbt.text(&label.name)?;
        println!("{}", label.name);
        println!("  {}", truncate_text(&text, 80));
    }

    Ok(())
}

/// Add a new entry.
pub fn add(path: &Path, name: &str, text: &str, create: bool) -> anyhow::Result<()> {
    let mut msbt = if path.exists() {
        read_msbt(path)?
    } else if create {
        Msbt::new(TextEncoding::Utf16, ByteOrder::Little)
    } else {
        anyhow::bail!(
            "file does not exist: {}. Use --create to create a new file.",
            path.display()
        );
    };

    msbt.add_entry(name, text)?;
    write_msbt(path, &msbt)?;

    println!("Added entry: {name}");
    Ok(())
}

/// Replace an existing entry's text.
pub fn set(path: &Path, name: &str, text: &str) -> anyhow::Result<()> {
    let mut msbt = read_msbt(path)?;
    msbt.set_text(name, text)?;
    write_msbt(path, &msbt)?;

    println!("Updated entry: {name}");
    Ok(())
}

/// Rename an entry.
pub fn rename(path: &Path, name: &str, new_name: &str) -> anyhow::Result<()> {
    let mut msbt = read_msbt(path)?;
    msbt.rename_entry(name, new_name)?;
    write_msbt(path, &msbt)?;

    println!("Renamed entry: {name} -> {new_name}");
    Ok(())
}

/// Delete an entry and its text.
pub fn delete(path: &Path, name: &str) -> anyhow::Result<()> {
    let mut msbt = read_msbt(path)?;
    let text = msbt.text(name)?;
    msbt.remove_entry(name)?;
    write_msbt(path, &msbt)?;

    println!("Deleted entry: {name}");
    println!("  Previous text: {}", truncate_text(&text, 80));
    Ok(())
}

/// Probe a file for the container format.
pub fn check(path: &Path) -> anyhow::Result<()> {
    if MsbtAdapter::identify(path) {
        println!("{}: valid MSBT container", path.display());
    } else {
        println!("{}: not an MSBT container", path.display());
    }
    Ok(())
}

/// Show statistics about one or more MSBT files.
pub fn stats(paths: &[PathBuf]) -> anyhow::Result<()> {
    for path in paths {
        let msbt = read_msbt(path)?;

        let mut texts = Vec::with_capacity(msbt.len());
        for label in msbt.labels() {
            texts.push((label.name.clone(), msbt.text(&label.name)?));
        }

        let entries = texts.len();
        let chars: usize = texts.iter().map(|(_, text)| text.chars().count()).sum();
        let avg_len = if entries > 0 { chars / entries } else { 0 };
        let opaque = msbt
            .sections()
            .iter()
            .filter(|section| matches!(section, Section::Opaque(_)))
            .count();
        let encoding = match msbt.encoding() {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16 => "UTF-16",
        };
        let order = match msbt.byte_order() {
            ByteOrder::Little => "little-endian",
            ByteOrder::Big => "big-endian",
        };

        println!("{}:", path.display());
        println!("  Entries: {entries}");
        println!("  Hash groups: {}", msbt.directory().bucket_count());
        println!("  Encoding: {encoding} ({order})");
        println!("  Opaque sections: {opaque}");
        println!("  Total characters: {chars}");
        println!("  Average length: {avg_len} chars");

        if let Some((name, text)) = texts.iter().max_by_key(|(_, text)| text.chars().count()) {
            println!("  Longest: {name} ({} chars)", text.chars().count());
        }

        let empty_count = texts.iter().filter(|(_, text)| text.is_empty()).count();
        if empty_count > 0 {
            println!("  Empty entries: {empty_count}");
        }

        println!();
    }

    Ok(())
}

/// Truncate text for display.
fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.replace('\n', "\\n");
    if text.chars().count() > max_len {
        let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text
    }
}
