//! SHA-256 digest computation over uploaded content
//!
//! Content is hashed in bounded blocks so that arbitrarily large uploads never
//! have to be held in memory at once.

use crate::domain::ids::Sha256Digest;
use crate::domain::Result;
use sha2::{Digest, Sha256};
use std::io::{Read, Seek, SeekFrom};

/// Largest block read from a source in one call
pub const BLOCK_SIZE: usize = 1024 * 1024;

/// Checksum and exact length of a byte sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigest {
    pub sha256: Sha256Digest,
    pub size_bytes: u64,
}

/// Incremental SHA-256 over a stream of chunks
///
/// The result depends only on the concatenated bytes, never on how they were
/// split into chunks.
#[derive(Debug, Clone, Default)]
pub struct StreamingDigest {
    hasher: Sha256,
    size_bytes: u64,
}

impl StreamingDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.size_bytes += chunk.len() as u64;
    }

    /// Bytes consumed so far
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Finish hashing
    pub fn finalize(self) -> ContentDigest {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.hasher.finalize());
        ContentDigest {
            sha256: Sha256Digest::from_bytes(bytes),
            size_bytes: self.size_bytes,
        }
    }
}

/// Hash everything from the start of `source`, then rewind it
///
/// Reads at most [`BLOCK_SIZE`] bytes at a time. On success the read position
/// is back at offset zero so the caller can reuse the source.
///
/// # Errors
///
/// Returns `NovaError::Io` if reading or seeking fails.
pub fn digest_source<R: Read + Seek>(source: &mut R) -> Result<ContentDigest> {
    source.seek(SeekFrom::Start(0))?;

    let mut digest = StreamingDigest::new();
    let mut block = vec![0u8; BLOCK_SIZE];
    loop {
        let read = match source.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        digest.update(&block[..read]);
    }

    source.seek(SeekFrom::Start(0))?;
    Ok(digest.finalize())
}

/// Calculate SHA-256 checksum of raw bytes
///
/// # Returns
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_case::test_case;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_empty_input() {
        let digest = StreamingDigest::new().finalize();
        assert_eq!(digest.sha256.as_str(), EMPTY_SHA256);
        assert_eq!(digest.size_bytes, 0);
        assert_eq!(calculate_checksum_bytes(b""), EMPTY_SHA256);
    }

    #[test]
    fn test_known_vector() {
        let mut source = Cursor::new(b"abc".to_vec());
        let digest = digest_source(&mut source).unwrap();
        assert_eq!(
            digest.sha256.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest.size_bytes, 3);
    }

    #[test_case(1 ; "single bytes")]
    #[test_case(7 ; "odd chunks")]
    #[test_case(4096 ; "page chunks")]
    fn test_chunking_does_not_change_result(chunk_size: usize) {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

        let mut digest = StreamingDigest::new();
        for chunk in data.chunks(chunk_size) {
            digest.update(chunk);
        }
        let digest = digest.finalize();

        assert_eq!(digest.sha256.as_str(), calculate_checksum_bytes(&data));
        assert_eq!(digest.size_bytes, data.len() as u64);
    }

    #[test]
    fn test_source_larger_than_block() {
        let data = vec![0x5au8; BLOCK_SIZE * 2 + 17];
        let mut source = Cursor::new(data.clone());

        let digest = digest_source(&mut source).unwrap();
        assert_eq!(digest.size_bytes, data.len() as u64);
        assert_eq!(digest.sha256.as_str(), calculate_checksum_bytes(&data));
    }

    #[test]
    fn test_source_is_rewound() {
        let mut source = Cursor::new(b"hello world".to_vec());
        source.set_position(6);

        let digest = digest_source(&mut source).unwrap();
        assert_eq!(source.position(), 0);
        assert_eq!(digest.size_bytes, 11);

        let again = digest_source(&mut source).unwrap();
        assert_eq!(digest, again);
    }
}
