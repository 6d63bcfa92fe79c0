//! Length-prefixed modified UTF-8 strings
//!
//! Matrix names and descriptions are stored as a big-endian `u16` byte
//! length followed by modified UTF-8: `U+0000` is written as `C0 80` and
//! characters outside the Basic Multilingual Plane are written as two
//! three-byte surrogates.

use alloc::string::String;
use alloc::vec::Vec;

use super::constants::MAX_UTF_LEN;
use crate::{MatrixError, Result};

/// Size of the length prefix
pub const PREFIX_SIZE: usize = 2;

/// Number of modified UTF-8 bytes needed for `s`
pub fn encoded_len(s: &str) -> usize {
    s.encode_utf16()
        .map(|unit| match unit {
            0x0001..=0x007F => 1,
            0x0000 | 0x0080..=0x07FF => 2,
            _ => 3,
        })
        .sum()
}

/// Encode `s` with its length prefix
pub fn encode(s: &str) -> Result<Vec<u8>> {
    let len = encoded_len(s);
    if len > MAX_UTF_LEN {
        return Err(MatrixError::StringTooLong { len });
    }

    let mut out = Vec::with_capacity(PREFIX_SIZE + len);
    out.extend_from_slice(&(len as u16).to_be_bytes());
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }

    Ok(out)
}

/// Read the length prefix
pub fn decode_prefix(bytes: &[u8]) -> Result<usize> {
    match bytes {
        [hi, lo, ..] => Ok(u16::from_be_bytes([*hi, *lo]) as usize),
        _ => Err(MatrixError::CorruptFormat("truncated string length")),
    }
}

/// Decode the string body (without its length prefix)
pub fn decode_body(bytes: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b0 = bytes[i] as u16;
        let (unit, width) = match bytes[i] >> 4 {
            0x0..=0x7 => (b0, 1),
            0xC | 0xD => {
                let b1 = continuation(bytes, i + 1)?;
                (((b0 & 0x1F) << 6) | b1, 2)
            }
            0xE => {
                let b1 = continuation(bytes, i + 1)?;
                let b2 = continuation(bytes, i + 2)?;
                (((b0 & 0x0F) << 12) | (b1 << 6) | b2, 3)
            }
            _ => return Err(MatrixError::CorruptFormat("invalid modified UTF-8 lead byte")),
        };
        units.push(unit);
        i += width;
    }

    char::decode_utf16(units)
        .collect::<core::result::Result<String, _>>()
        .map_err(|_| MatrixError::CorruptFormat("unpaired surrogate in string"))
}

/// Decode a prefixed string from the start of `bytes`, returning it with
/// the number of bytes consumed
pub fn decode(bytes: &[u8]) -> Result<(String, usize)> {
    let len = decode_prefix(bytes)?;
    let body = bytes
        .get(PREFIX_SIZE..PREFIX_SIZE + len)
        .ok_or(MatrixError::CorruptFormat("truncated string"))?;
    Ok((decode_body(body)?, PREFIX_SIZE + len))
}

fn continuation(bytes: &[u8], index: usize) -> Result<u16> {
    match bytes.get(index) {
        Some(&b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
        Some(_) => Err(MatrixError::CorruptFormat("invalid modified UTF-8 continuation byte")),
        None => Err(MatrixError::CorruptFormat("truncated modified UTF-8 sequence")),
    }
}
