//! MSBT file reading and parsing

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::ReadBytesExt;

use super::{
    ByteOrder, HEADER_SIZE, Label, LabelDirectory, MSBT_SIGNATURE, Msbt, OpaqueSection,
    SECTION_ALIGNMENT, SECTION_HEADER_SIZE, SECTION_LABELS, SECTION_TEXTS, Section, StringPool,
    TextEncoding,
};
use crate::error::{Error, Result};

/// Read an MSBT file from disk.
///
/// # Errors
/// Returns [`Error::FileNotFound`] if the path does not resolve to an
/// existing file, [`Error::Io`] for other read failures, or any parse
/// error from [`parse_msbt_bytes`].
pub fn read_msbt<P: AsRef<Path>>(path: P) -> Result<Msbt> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_msbt_bytes(&buffer)
}

/// Parse MSBT data from bytes.
///
/// A failed parse returns an error without retaining any partial state;
/// both mandatory sections must be present, every declared length and
/// offset must stay inside the buffer, and all text must decode in the
/// declared encoding.
pub fn parse_msbt_bytes(data: &[u8]) -> Result<Msbt> {
    if data.len() < HEADER_SIZE {
        return Err(Error::UnexpectedEof);
    }
    let mut cursor = Cursor::new(data);

    let mut magic = [0u8; 8];
    cursor.read_exact(&mut magic)?;
    if magic != MSBT_SIGNATURE {
        return Err(Error::InvalidMsbtMagic(magic));
    }

    let mut bom = [0u8; 2];
    cursor.read_exact(&mut bom)?;
    let byte_order = ByteOrder::from_bom(bom)?;

    let _reserved = byte_order.read_u16(&mut cursor)?;
    let encoding = TextEncoding::from_byte(cursor.read_u8()?)?;
    let version = cursor.read_u8()?;
    let section_count = byte_order.read_u16(&mut cursor)? as usize;

    // Remaining header fields (reserved u16, total size u32, 10 reserved
    // bytes) are recomputed on save.
    cursor.set_position(HEADER_SIZE as u64);

    let mut directory = None;
    let mut pool = None;
    let mut sections = Vec::with_capacity(section_count);

    for _ in 0..section_count {
        let header_start = cursor.position() as usize;
        if data.len() - header_start < SECTION_HEADER_SIZE {
            return Err(Error::UnexpectedEof);
        }

        let mut tag = [0u8; 4];
        cursor.read_exact(&mut tag)?;
        let size = byte_order.read_u32(&mut cursor)? as usize;
        let body_start = header_start + SECTION_HEADER_SIZE;

        let remaining = data.len() - body_start;
        if size > remaining {
            return Err(Error::SectionOverrun {
                tag: tag_name(tag),
                declared: size,
                remaining,
            });
        }
        let body = &data[body_start..body_start + size];

        if tag == SECTION_LABELS {
            if directory.is_some() {
                return Err(Error::DuplicateSection {
                    tag: tag_name(tag),
                });
            }
            directory = Some(parse_labels(body, byte_order)?);
            sections.push(Section::Labels);
        } else if tag == SECTION_TEXTS {
            if pool.is_some() {
                return Err(Error::DuplicateSection {
                    tag: tag_name(tag),
                });
            }
            pool = Some(parse_texts(body, byte_order, encoding)?);
            sections.push(Section::Texts);
        } else {
            sections.push(Section::Opaque(OpaqueSection {
                tag,
                data: body.to_vec(),
            }));
        }

        // Sections are padded out to the alignment boundary; the last one
        // may end flush with the file.
        let next = (body_start + size).next_multiple_of(SECTION_ALIGNMENT);
        cursor.set_position(next.min(data.len()) as u64);
    }

    let directory = directory.ok_or(Error::MissingSection("LBL1"))?;
    let pool = pool.ok_or(Error::MissingSection("TXT2"))?;

    // Referential invariant: every label points at a live pool record.
    for label in directory.iter() {
        if label.string_index >= pool.len() {
            return Err(Error::InvalidStringIndex {
                index: label.string_index,
                count: pool.len(),
            });
        }
    }

    Ok(Msbt {
        byte_order,
        encoding,
        version,
        directory,
        pool,
        sections,
    })
}

fn tag_name(tag: [u8; 4]) -> String {
    String::from_utf8_lossy(&tag).into_owned()
}

/// Parse the `LBL1` body: a group table of per-bucket counts and offsets,
/// followed by the label blobs each offset points at.
fn parse_labels(body: &[u8], order: ByteOrder) -> Result<LabelDirectory> {
    let truncated = || Error::TruncatedSection {
        tag: tag_name(SECTION_LABELS),
    };

    let mut cursor = Cursor::new(body);
    let group_count = order.read_u32(&mut cursor).map_err(|_| truncated())? as usize;
    if group_count == 0 {
        return Err(Error::EmptyGroupTable);
    }
    if body.len() < 4 + group_count * 8 {
        return Err(truncated());
    }

    let mut groups = Vec::with_capacity(group_count);
    for _ in 0..group_count {
        let label_count = order.read_u32(&mut cursor)? as usize;
        let offset = order.read_u32(&mut cursor)? as usize;
        // A label blob is at least five bytes (length byte + string index),
        // so a count past that cannot fit in the section.
        if label_count > body.len() / 5 {
            return Err(truncated());
        }
        groups.push((label_count, offset));
    }

    let mut buckets = Vec::with_capacity(group_count);
    for (label_count, offset) in groups {
        if offset > body.len() {
            return Err(Error::OffsetOutOfBounds {
                tag: tag_name(SECTION_LABELS),
                offset,
                size: body.len(),
            });
        }

        let mut position = offset;
        let mut bucket = Vec::with_capacity(label_count);
        for _ in 0..label_count {
            let name_len = *body.get(position).ok_or_else(truncated)? as usize;
            position += 1;

            let name_bytes = body
                .get(position..position + name_len)
                .ok_or_else(truncated)?;
            position += name_len;

            let index_bytes = body.get(position..position + 4).ok_or_else(truncated)?;
            position += 4;
            let mut index = [0u8; 4];
            index.copy_from_slice(index_bytes);

            bucket.push(Label {
                name: String::from_utf8(name_bytes.to_vec())?,
                string_index: order.u32_from(index) as usize,
            });
        }
        buckets.push(bucket);
    }

    LabelDirectory::from_buckets(buckets)
}

/// Parse the `TXT2` body: an offset table followed by null-terminated,
/// encoded string runs. Terminators are stripped; the pool keeps raw bytes.
fn parse_texts(body: &[u8], order: ByteOrder, encoding: TextEncoding) -> Result<StringPool> {
    let truncated = || Error::TruncatedSection {
        tag: tag_name(SECTION_TEXTS),
    };

    let mut cursor = Cursor::new(body);
    let count = order.read_u32(&mut cursor).map_err(|_| truncated())? as usize;
    if body.len() < 4 + count * 4 {
        return Err(truncated());
    }

    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        offsets.push(order.read_u32(&mut cursor)? as usize);
    }

    let mut pool = StringPool::new();
    for (index, &offset) in offsets.iter().enumerate() {
        let end = if index + 1 < count {
            offsets[index + 1]
        } else {
            body.len()
        };
        if offset > end || end > body.len() {
            return Err(Error::OffsetOutOfBounds {
                tag: tag_name(SECTION_TEXTS),
                offset,
                size: body.len(),
            });
        }

        let run = strip_terminator(&body[offset..end], encoding, index)?;
        // Text must decode in the declared encoding for the load to
        // succeed; the pool itself keeps the raw bytes.
        encoding.decode(run, order)?;
        pool.append(run.to_vec());
    }

    Ok(pool)
}

fn strip_terminator(run: &[u8], encoding: TextEncoding, index: usize) -> Result<&[u8]> {
    let unit = encoding.code_unit_size();
    if encoding.is_fixed_width() && run.len() % unit != 0 {
        return Err(Error::MisalignedTextRun {
            len: run.len(),
            unit,
        });
    }
    if run.len() < unit || run[run.len() - unit..].iter().any(|&byte| byte != 0) {
        return Err(Error::UnterminatedString { index });
    }
    Ok(&run[..run.len() - unit])
}
