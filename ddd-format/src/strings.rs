//! Fixed-width text fields.
//!
//! Two wire shapes share one in-memory type:
//! - plain IA5 strings of a fixed width (card numbers, approval numbers)
//! - code-paged strings: one selector byte, then a fixed-width body
//!   (Name, Address, VehicleRegistrationNumber)
//!
//! Decoding never fails on content. Bytes that are not printable in their
//! code page degrade to an uppercase hex rendering, and the original bytes
//! are always kept in `encoded` so the field writes back unchanged.

use serde::{Deserialize, Serialize};

use crate::codec::{DecodeError, EncodeError, Reader};
use crate::codepage::CodePage;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StringValue {
    pub encoding: CodePage,
    /// Field body exactly as read, excluding the code page byte.
    pub encoded: Vec<u8>,
    pub decoded: String,
}

fn is_padding(b: u8) -> bool {
    matches!(b, 0x00 | 0xFF) || b.is_ascii_whitespace()
}

fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| !is_padding(b))
        .map_or(0, |i| i + 1);
    &bytes[..end]
}

fn decode_text(encoding: CodePage, body: &[u8]) -> String {
    if encoding == CodePage::Empty {
        return String::new();
    }
    let trimmed = trim_padding(body);
    if trimmed.is_empty() {
        return String::new();
    }
    let text = if encoding == CodePage::Ia5 {
        trimmed
            .iter()
            .all(|b| (0x20..=0x7E).contains(b))
            .then(|| trimmed.iter().map(|&b| char::from(b)).collect::<String>())
    } else {
        encoding.decode(trimmed)
    };
    text.unwrap_or_else(|| hex::encode_upper(trimmed))
}

impl StringValue {
    /// A plain IA5 value built from text; `encoded` is filled on write.
    pub fn ia5(text: impl Into<String>) -> Self {
        Self {
            encoding: CodePage::Ia5,
            encoded: Vec::new(),
            decoded: text.into(),
        }
    }

    pub fn with_code_page(encoding: CodePage, text: impl Into<String>) -> Self {
        Self {
            encoding,
            encoded: Vec::new(),
            decoded: text.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.decoded
    }

    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }

    /// Read a plain IA5 field of `width` bytes.
    pub fn read_ia5(r: &mut Reader<'_>, width: usize) -> Result<Self, DecodeError> {
        let body = r.take(width)?;
        Ok(Self {
            encoding: CodePage::Ia5,
            encoded: body.to_vec(),
            decoded: decode_text(CodePage::Ia5, body),
        })
    }

    /// Read a code page byte followed by a `width`-byte body.
    pub fn read_code_paged(r: &mut Reader<'_>, width: usize) -> Result<Self, DecodeError> {
        let encoding = CodePage::from_wire(r.u8()?);
        let body = r.take(width)?;
        Ok(Self {
            encoding,
            encoded: body.to_vec(),
            decoded: decode_text(encoding, body),
        })
    }

    /// Field body of exactly `width` bytes.
    ///
    /// The retained `encoded` bytes win when they still have the right width
    /// and still decode to `decoded`; otherwise `decoded` is re-encoded and
    /// padded with spaces.
    fn body(&self, width: usize) -> Result<Vec<u8>, EncodeError> {
        if self.encoded.len() == width && decode_text(self.encoding, &self.encoded) == self.decoded {
            return Ok(self.encoded.clone());
        }
        let mut body = match self.encoding {
            CodePage::Ia5 => {
                if !self.decoded.is_ascii() {
                    return Err(EncodeError::UnmappableText(CodePage::Ia5.name().into()));
                }
                self.decoded.as_bytes().to_vec()
            }
            cp => cp.encode(&self.decoded)?,
        };
        if body.len() > width {
            return Err(EncodeError::StringTooLong {
                width,
                actual: body.len(),
            });
        }
        body.resize(width, b' ');
        Ok(body)
    }

    pub fn write_ia5(&self, width: usize, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(&self.body(width)?);
        Ok(())
    }

    pub fn write_code_paged(&self, width: usize, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.push(self.encoding.to_wire());
        out.extend_from_slice(&self.body(width)?);
        Ok(())
    }
}

impl std::fmt::Display for StringValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_spaces_nul_and_ff() {
        let mut r = Reader::new(b"AB12\x00\xFF  ");
        let s = StringValue::read_ia5(&mut r, 8).unwrap();
        assert_eq!(s.as_str(), "AB12");
    }

    #[test]
    fn binary_content_falls_back_to_hex() {
        let mut r = Reader::new(&[0x01, 0xC3, 0x20, 0x20]);
        let s = StringValue::read_ia5(&mut r, 4).unwrap();
        assert_eq!(s.as_str(), "01C3");
    }

    #[test]
    fn empty_code_page_decodes_to_empty_text() {
        let mut data = vec![0xFF];
        data.extend_from_slice(b"GARBAGE");
        let mut r = Reader::new(&data);
        let s = StringValue::read_code_paged(&mut r, 7).unwrap();
        assert_eq!(s.encoding, CodePage::Empty);
        assert!(s.is_empty());
        let mut out = Vec::new();
        s.write_code_paged(7, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn edited_text_is_padded() {
        let mut s = StringValue::ia5("OLD");
        s.encoded = b"OLD  ".to_vec();
        s.decoded = "NEW".into();
        let mut out = Vec::new();
        s.write_ia5(5, &mut out).unwrap();
        assert_eq!(out, b"NEW  ".to_vec());
    }
}
