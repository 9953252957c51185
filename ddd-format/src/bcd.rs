//! Binary-coded decimal fields: two decimal digits per byte, high nibble first.

use crate::codec::{DecodeError, EncodeError, Reader};

/// Decode a single BCD byte into 0..=99.
pub fn decode_bcd_byte(byte: u8) -> Result<u8, DecodeError> {
    let hi = byte >> 4;
    let lo = byte & 0x0F;
    if hi > 9 || lo > 9 {
        return Err(DecodeError::InvalidBcd { byte });
    }
    Ok(hi * 10 + lo)
}

pub fn encode_bcd_byte(value: u8) -> Result<u8, EncodeError> {
    if value > 99 {
        return Err(EncodeError::BcdOverflow {
            value: u32::from(value),
            digits: 2,
        });
    }
    Ok(((value / 10) << 4) | (value % 10))
}

/// Decode a BCD digit string of up to four bytes into an integer.
pub fn decode_bcd(bytes: &[u8]) -> Result<u32, DecodeError> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        let v = decode_bcd_byte(b)?;
        Ok(acc * 100 + u32::from(v))
    })
}

/// Encode `value` as `width` bytes of BCD, zero-padded on the left.
pub fn encode_bcd(value: u32, width: usize, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let digits = width * 2;
    if digits < 10 && u64::from(value) >= 10u64.pow(digits as u32) {
        return Err(EncodeError::BcdOverflow { value, digits });
    }
    let start = out.len();
    out.resize(start + width, 0);
    let mut rest = value;
    for i in (0..width).rev() {
        let pair = (rest % 100) as u8;
        rest /= 100;
        out[start + i] = ((pair / 10) << 4) | (pair % 10);
    }
    Ok(())
}

/// Read a two-byte BCD counter (presence counters, VU data block counters).
pub fn read_bcd_u16(r: &mut Reader<'_>) -> Result<u16, DecodeError> {
    let bytes = r.take(2)?;
    // Four digits never exceed 9999
    Ok(decode_bcd(bytes)? as u16)
}

pub fn write_bcd_u16(value: u16, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    encode_bcd(u32::from(value), 2, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_byte_bcd() {
        assert_eq!(decode_bcd(&[0x20, 0x24]).unwrap(), 2024);
        let mut out = Vec::new();
        encode_bcd(2024, 2, &mut out).unwrap();
        assert_eq!(out, vec![0x20, 0x24]);
    }

    #[test]
    fn encode_pads_with_leading_zeros() {
        let mut out = Vec::new();
        encode_bcd(7, 3, &mut out).unwrap();
        assert_eq!(out, vec![0x00, 0x00, 0x07]);
    }

    #[test]
    fn overflow_is_rejected() {
        let mut out = Vec::new();
        assert_eq!(
            encode_bcd(10_000, 2, &mut out),
            Err(EncodeError::BcdOverflow {
                value: 10_000,
                digits: 4
            })
        );
    }
}
