//! Text codec for MSBT string payloads
//!
//! A container stores its text either as UTF-8 or as UTF-16 in the byte
//! order declared by the header BOM. Strings are terminated with one null
//! code unit; the reader strips it, the writer appends it.

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Byte order of every multi-byte field in a container, from the header BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Detect the byte order from the header's byte order mark.
    ///
    /// # Errors
    /// Returns [`Error::InvalidByteOrderMark`] for anything other than
    /// FF FE or FE FF.
    pub fn from_bom(bom: [u8; 2]) -> Result<Self> {
        match bom {
            [0xFF, 0xFE] => Ok(Self::Little),
            [0xFE, 0xFF] => Ok(Self::Big),
            other => Err(Error::InvalidByteOrderMark(other)),
        }
    }

    /// The two BOM bytes as they appear on disk.
    #[must_use]
    pub fn bom(self) -> [u8; 2] {
        match self {
            Self::Little => [0xFF, 0xFE],
            Self::Big => [0xFE, 0xFF],
        }
    }

    pub(crate) fn read_u16(self, cursor: &mut Cursor<&[u8]>) -> Result<u16> {
        Ok(match self {
            Self::Little => cursor.read_u16::<LittleEndian>()?,
            Self::Big => cursor.read_u16::<BigEndian>()?,
        })
    }

    pub(crate) fn read_u32(self, cursor: &mut Cursor<&[u8]>) -> Result<u32> {
        Ok(match self {
            Self::Little => cursor.read_u32::<LittleEndian>()?,
            Self::Big => cursor.read_u32::<BigEndian>()?,
        })
    }

    pub(crate) fn write_u16(self, buffer: &mut Vec<u8>, value: u16) -> Result<()> {
        match self {
            Self::Little => buffer.write_u16::<LittleEndian>(value)?,
            Self::Big => buffer.write_u16::<BigEndian>(value)?,
        }
        Ok(())
    }

    pub(crate) fn write_u32(self, buffer: &mut Vec<u8>, value: u32) -> Result<()> {
        match self {
            Self::Little => buffer.write_u32::<LittleEndian>(value)?,
            Self::Big => buffer.write_u32::<BigEndian>(value)?,
        }
        Ok(())
    }

    pub(crate) fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Little => u32::from_le_bytes(bytes),
            Self::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Character encoding of the string pool, from the header encoding byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16,
}

impl TextEncoding {
    /// Map the header encoding byte to an encoding.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedEncoding`] for unknown selector bytes.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Utf8),
            0x01 => Ok(Self::Utf16),
            other => Err(Error::UnsupportedEncoding(other)),
        }
    }

    /// The header encoding byte for this encoding.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Utf8 => 0x00,
            Self::Utf16 => 0x01,
        }
    }

    /// Size of one code unit in bytes. This is also the terminator size.
    #[must_use]
    pub fn code_unit_size(self) -> usize {
        match self {
            Self::Utf8 => 1,
            Self::Utf16 => 2,
        }
    }

    /// Whether every code unit occupies the same number of bytes.
    #[must_use]
    pub fn is_fixed_width(self) -> bool {
        matches!(self, Self::Utf16)
    }

    /// Decode a raw text run (terminator already stripped) into a string.
    ///
    /// # Errors
    /// Returns [`Error::MisalignedTextRun`] if a fixed-width run is not a
    /// whole number of code units, or a conversion error for byte sequences
    /// that are not valid in the encoding.
    pub fn decode(self, bytes: &[u8], order: ByteOrder) -> Result<String> {
        match self {
            Self::Utf8 => Ok(String::from_utf8(bytes.to_vec())?),
            Self::Utf16 => {
                if bytes.len() % 2 != 0 {
                    return Err(Error::MisalignedTextRun {
                        len: bytes.len(),
                        unit: 2,
                    });
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| match order {
                        ByteOrder::Little => u16::from_le_bytes([pair[0], pair[1]]),
                        ByteOrder::Big => u16::from_be_bytes([pair[0], pair[1]]),
                    })
                    .collect();
                Ok(String::from_utf16(&units)?)
            }
        }
    }

    /// Encode a string into raw bytes, without a terminator.
    #[must_use]
    pub fn encode(self, text: &str, order: ByteOrder) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16 => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    let pair = match order {
                        ByteOrder::Little => unit.to_le_bytes(),
                        ByteOrder::Big => unit.to_be_bytes(),
                    };
                    bytes.extend_from_slice(&pair);
                }
                bytes
            }
        }
    }
}
