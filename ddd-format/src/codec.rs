use thiserror::Error;

use crate::ef::Generation;

/// Failure while decoding a field from wire bytes.
///
/// Length problems (`InsufficientData`, `TrailingBytes`) are kept apart from
/// semantic problems so callers can tell a short record from a bad one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("insufficient data: needed {needed} bytes, {available} available")]
    InsufficientData { needed: usize, available: usize },
    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),
    #[error("invalid BCD byte 0x{byte:02X}")]
    InvalidBcd { byte: u8 },
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("string of {actual} bytes does not fit a {width}-byte field")]
    StringTooLong { width: usize, actual: usize },
    #[error("text cannot be represented in code page {0}")]
    UnmappableText(String),
    #[error("value {value} does not fit in {digits} BCD digits")]
    BcdOverflow { value: u32, digits: usize },
    #[error("value {value} does not fit in {bytes} bytes")]
    IntegerOverflow { value: u64, bytes: usize },
    #[error("record value of {0} bytes exceeds the 65535-byte length field")]
    RecordTooLong(usize),
    #[error("{field}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{count} {what} do not fit the record count field")]
    TooManyRecords { what: &'static str, count: usize },
}

/// Big-endian cursor over a borrowed byte slice.
///
/// `position()` is the number of bytes consumed so far, which is how every
/// parser reports its consumed length.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes not yet consumed, without advancing.
    pub fn peek_rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::InsufficientData {
                needed: n,
                available: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    /// Three-byte big-endian unsigned integer (odometer values).
    pub fn u24(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(3)?;
        Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    /// Split off the next `n` bytes as an independent reader.
    pub fn sub(&mut self, n: usize) -> Result<Reader<'a>, DecodeError> {
        Ok(Reader::new(self.take(n)?))
    }

    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    /// Decode `count` consecutive values of `T`.
    pub fn decode_n<T: Decode>(&mut self, count: usize) -> Result<Vec<T>, DecodeError> {
        (0..count).map(|_| T::decode(self)).collect()
    }

    pub fn expect_end(&self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}

/// A value with a fixed binary layout that can be read from a [`Reader`].
pub trait Decode: Sized {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError>;
}

/// Inverse of [`Decode`]: append the wire form of `self` to `out`.
pub trait Encode {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError>;
}

/// A value whose layout depends on the data generation it was recorded in.
///
/// Generation 2 widens several shared structures (card numbers gain a
/// generation byte, place records gain a GNSS fix), so the caller supplies
/// the generation it learned from the record tag or transfer type.
pub trait DecodeGen: Sized {
    fn decode_gen(r: &mut Reader<'_>, generation: Generation) -> Result<Self, DecodeError>;
}

pub trait EncodeGen {
    fn encode_gen(&self, generation: Generation, out: &mut Vec<u8>) -> Result<(), EncodeError>;
}

/// Decode a value from the start of `data` and report how many bytes it used.
pub fn decode_prefix<T: Decode>(data: &[u8]) -> Result<(T, usize), DecodeError> {
    let mut r = Reader::new(data);
    let value = T::decode(&mut r)?;
    Ok((value, r.position()))
}

/// Decode a value that must consume `data` completely.
pub fn decode_exact<T: Decode>(data: &[u8]) -> Result<T, DecodeError> {
    let mut r = Reader::new(data);
    let value = T::decode(&mut r)?;
    r.expect_end()?;
    Ok(value)
}

pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    value.encode(&mut out)?;
    Ok(out)
}

impl Decode for u8 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.u8()
    }
}

impl Encode for u8 {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.push(*self);
        Ok(())
    }
}

impl Decode for u16 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.u16()
    }
}

impl Encode for u16 {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(&self.to_be_bytes());
        Ok(())
    }
}

impl Decode for u32 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.u32()
    }
}

impl Encode for u32 {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(&self.to_be_bytes());
        Ok(())
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.array()
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(self);
        Ok(())
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        for item in self {
            item.encode(out)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.as_slice().encode(out)
    }
}

pub fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

pub fn put_u24(out: &mut Vec<u8>, value: u32) -> Result<(), EncodeError> {
    if value > 0x00FF_FFFF {
        return Err(EncodeError::IntegerOverflow {
            value: u64::from(value),
            bytes: 3,
        });
    }
    out.extend_from_slice(&value.to_be_bytes()[1..]);
    Ok(())
}

pub fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Write a record count into a `u8` count field.
pub fn put_count_u8(out: &mut Vec<u8>, what: &'static str, count: usize) -> Result<(), EncodeError> {
    let n = u8::try_from(count).map_err(|_| EncodeError::TooManyRecords { what, count })?;
    out.push(n);
    Ok(())
}

/// Write a record count into a `u16` count field.
pub fn put_count_u16(out: &mut Vec<u8>, what: &'static str, count: usize) -> Result<(), EncodeError> {
    let n = u16::try_from(count).map_err(|_| EncodeError::TooManyRecords { what, count })?;
    put_u16(out, n);
    Ok(())
}

/// Write exactly `width` bytes of `value`, failing on any other length.
pub fn put_fixed(
    out: &mut Vec<u8>,
    field: &'static str,
    value: &[u8],
    width: usize,
) -> Result<(), EncodeError> {
    if value.len() != width {
        return Err(EncodeError::LengthMismatch {
            field,
            expected: width,
            actual: value.len(),
        });
    }
    out.extend_from_slice(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_reports_consumed_length() {
        let mut r = Reader::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(r.u16().unwrap(), 0x0102);
        assert_eq!(r.u24().unwrap(), 0x030405);
        assert_eq!(r.position(), 5);
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn take_past_end_is_insufficient_data() {
        let mut r = Reader::new(&[0xAA]);
        assert_eq!(
            r.u32(),
            Err(DecodeError::InsufficientData {
                needed: 4,
                available: 1
            })
        );
        // A failed read does not advance the cursor
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn put_u24_rejects_wide_values() {
        let mut out = Vec::new();
        assert!(put_u24(&mut out, 0x0100_0000).is_err());
        put_u24(&mut out, 0x00AB_CDEF).unwrap();
        assert_eq!(out, vec![0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn decode_exact_rejects_trailing_bytes() {
        assert_eq!(decode_exact::<u16>(&[0, 1, 2]), Err(DecodeError::TrailingBytes(1)));
        assert_eq!(decode_prefix::<u16>(&[0, 1, 2]), Ok((1, 2)));
    }
}
