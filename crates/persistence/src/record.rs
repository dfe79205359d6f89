// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! On-disk framing of a single commitment:
//! `[MAGIC][VERSION u32][LEN u32][JSON][CRC64]`, little endian.

use crate::error::{PersistenceError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use capymon_core::Commitment;
use crc64fast::Digest;
use std::io::Cursor;

pub const MAGIC: [u8; 4] = *b"CPMC";
pub const VERSION: u32 = 1;
const HEADER_SIZE: usize = 4 + 4 + 4;
const TRAILER_SIZE: usize = 8;

fn checksum(data: &[u8]) -> u64 {
    let mut digest = Digest::new();
    digest.write(data);
    digest.sum64()
}

pub fn encode(commitment: &Commitment) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(commitment)
        .map_err(|e| PersistenceError::InvalidFormat(e.to_string()))?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + body.len() + TRAILER_SIZE);
    buf.extend_from_slice(&MAGIC);
    buf.write_u32::<LittleEndian>(VERSION)?;
    buf.write_u32::<LittleEndian>(body.len() as u32)?;
    buf.extend_from_slice(&body);

    let crc = checksum(&buf);
    buf.write_u64::<LittleEndian>(crc)?;
    Ok(buf)
}

pub fn decode(data: &[u8]) -> Result<Commitment> {
    if data.len() < HEADER_SIZE + TRAILER_SIZE {
        return Err(PersistenceError::InvalidFormat(format!(
            "record too short: {} bytes",
            data.len()
        )));
    }

    let (content, trailer) = data.split_at(data.len() - TRAILER_SIZE);
    let expected = Cursor::new(trailer).read_u64::<LittleEndian>()?;
    let found = checksum(content);
    if expected != found {
        return Err(PersistenceError::ChecksumMismatch { expected, found });
    }

    if content[0..4] != MAGIC {
        return Err(PersistenceError::InvalidMagic);
    }

    let mut cursor = Cursor::new(&content[4..HEADER_SIZE]);
    let version = cursor.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(PersistenceError::UnsupportedVersion(version));
    }
    let len = cursor.read_u32::<LittleEndian>()? as usize;

    let body = &content[HEADER_SIZE..];
    if body.len() != len {
        return Err(PersistenceError::InvalidFormat(format!(
            "header claims {} bytes, found {}",
            len,
            body.len()
        )));
    }

    serde_json::from_slice(body).map_err(|e| PersistenceError::InvalidFormat(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_byte_detected() {
        let c = Commitment::with_salt("0xa1", 2, vec![9; 16], Some(1));
        let mut bytes = encode(&c).unwrap();
        bytes[HEADER_SIZE + 3] ^= 0xFF;
        assert!(matches!(decode(&bytes), Err(PersistenceError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_truncated_record() {
        let c = Commitment::with_salt("0xa1", 2, vec![9; 16], Some(1));
        let bytes = encode(&c).unwrap();
        assert!(decode(&bytes[..bytes.len() / 2]).is_err());
        assert!(decode(&bytes[..5]).is_err());
    }

    #[test]
    fn test_invalid_magic() {
        let c = Commitment::with_salt("0xa1", 0, vec![1], None);
        let mut bytes = encode(&c).unwrap();
        bytes[0..4].copy_from_slice(b"BADM");
        // Re-seal so only the magic is wrong.
        let n = bytes.len() - TRAILER_SIZE;
        let crc = checksum(&bytes[..n]);
        bytes[n..].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(decode(&bytes), Err(PersistenceError::InvalidMagic)));
    }
}
