//! MSBT file writing and serialization

use std::path::Path;

use super::{
    HEADER_SIZE, MSBT_SIGNATURE, Msbt, PADDING_BYTE, SECTION_ALIGNMENT, SECTION_LABELS,
    SECTION_TEXTS, Section,
};
use crate::error::Result;

/// Write a container to disk.
///
/// The byte buffer is fully built in memory before any byte is written, so
/// a failed serialization leaves the destination file untouched.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be written.
///
/// [`Error::Io`]: crate::Error::Io
pub fn write_msbt<P: AsRef<Path>>(path: P, msbt: &Msbt) -> Result<()> {
    let bytes = serialize_msbt(msbt)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Serialize a container to bytes.
///
/// The group table, offset table, section sizes and header total size are
/// recomputed from current state; opaque sections are re-emitted verbatim;
/// byte order and encoding selector are carried over from load.
pub fn serialize_msbt(msbt: &Msbt) -> Result<Vec<u8>> {
    let order = msbt.byte_order;

    let mut body = Vec::new();
    for section in &msbt.sections {
        let (tag, data) = match section {
            Section::Labels => (SECTION_LABELS, write_labels(msbt)?),
            Section::Texts => (SECTION_TEXTS, write_texts(msbt)?),
            Section::Opaque(opaque) => (opaque.tag, opaque.data.clone()),
        };

        body.extend_from_slice(&tag);
        order.write_u32(&mut body, data.len() as u32)?;
        body.extend_from_slice(&[0u8; 8]);
        body.extend_from_slice(&data);

        // The header is itself a whole number of alignment units, so
        // aligning relative to the section stream aligns the file.
        let aligned = body.len().next_multiple_of(SECTION_ALIGNMENT);
        body.resize(aligned, PADDING_BYTE);
    }

    let mut output = Vec::with_capacity(HEADER_SIZE + body.len());
    output.extend_from_slice(&MSBT_SIGNATURE);
    output.extend_from_slice(&order.bom());
    order.write_u16(&mut output, 0)?;
    output.push(msbt.encoding.to_byte());
    output.push(msbt.version);
    order.write_u16(&mut output, msbt.sections.len() as u16)?;
    order.write_u16(&mut output, 0)?;
    order.write_u32(&mut output, (HEADER_SIZE + body.len()) as u32)?;
    output.extend_from_slice(&[0u8; 10]);
    output.extend_from_slice(&body);

    Ok(output)
}

/// Serialize the `LBL1` body from the label directory.
fn write_labels(msbt: &Msbt) -> Result<Vec<u8>> {
    let order = msbt.byte_order;
    let buckets = msbt.directory.buckets();
    let table_size = 4 + buckets.len() * 8;

    let mut table = Vec::with_capacity(table_size);
    let mut blobs = Vec::new();

    order.write_u32(&mut table, buckets.len() as u32)?;
    for bucket in buckets {
        order.write_u32(&mut table, bucket.len() as u32)?;
        order.write_u32(&mut table, (table_size + blobs.len()) as u32)?;

        for label in bucket {
            blobs.push(label.name.len() as u8);
            blobs.extend_from_slice(label.name.as_bytes());
            order.write_u32(&mut blobs, label.string_index as u32)?;
        }
    }

    table.extend_from_slice(&blobs);
    Ok(table)
}

/// Serialize the `TXT2` body from the string pool.
fn write_texts(msbt: &Msbt) -> Result<Vec<u8>> {
    let order = msbt.byte_order;
    let unit = msbt.encoding.code_unit_size();
    let count = msbt.pool.len();
    let table_size = 4 + count * 4;

    let mut table = Vec::with_capacity(table_size);
    let mut strings = Vec::new();

    order.write_u32(&mut table, count as u32)?;
    for record in msbt.pool.iter() {
        order.write_u32(&mut table, (table_size + strings.len()) as u32)?;
        strings.extend_from_slice(record);
        strings.resize(strings.len() + unit, 0);
    }

    table.extend_from_slice(&strings);
    Ok(table)
}
