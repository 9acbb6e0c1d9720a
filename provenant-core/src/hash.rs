//! Chunked content hashing.
//!
//! Content addressing splits the byte source into fixed-size chunks, hashes
//! each chunk with SHA3-256, and reduces the hex-encoded leaf digests to a
//! single root in one pass: for more than one chunk, the root is the digest
//! of the concatenated leaf digests. A single-chunk source uses its leaf
//! digest as the root directly.
//!
//! The reduction is deliberately depth-1, not a binary tree. Every digest
//! already registered on a ledger depends on this exact shape; changing it
//! orphans all existing records.

use sha3::{Digest, Sha3_256};

/// Chunk size for leaf hashing (1 MiB).
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Hex-encoded SHA3-256 digest of a byte slice.
///
/// Also used for manifest digests; content roots and manifest anchors share
/// one digest algorithm.
pub fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(Sha3_256::digest(bytes))
}

/// Compute the content root for a byte source.
///
/// An empty source yields an empty digest rather than an error; callers
/// treat the empty string as "nothing to address".
pub fn hash_content(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let leaves: Vec<String> = bytes.chunks(CHUNK_SIZE).map(digest_hex).collect();
    if let [root] = leaves.as_slice() {
        return root.clone();
    }
    digest_hex(leaves.concat().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let data = b"the same bytes, hashed twice";
        assert_eq!(hash_content(data), hash_content(data));
    }

    #[test]
    fn test_empty_input_yields_empty_digest() {
        assert_eq!(hash_content(b""), "");
    }

    #[test]
    fn test_single_chunk_root_is_leaf_digest() {
        let data = b"fits in one chunk";
        assert_eq!(hash_content(data), digest_hex(data));
    }

    #[test]
    fn test_exact_chunk_boundary_is_single_leaf() {
        let data = vec![0xAB; CHUNK_SIZE];
        assert_eq!(hash_content(&data), digest_hex(&data));
    }

    #[test]
    fn test_multi_chunk_root_is_single_pass_reduction() {
        // Three chunks, the last one short.
        let data: Vec<u8> = (0..2 * CHUNK_SIZE + 123).map(|i| (i % 251) as u8).collect();

        let expected_leaves: Vec<String> =
            data.chunks(CHUNK_SIZE).map(digest_hex).collect();
        let expected_root = digest_hex(expected_leaves.concat().as_bytes());

        assert_eq!(hash_content(&data), expected_root);
    }

    #[test]
    fn test_one_extra_byte_crosses_chunk_boundary() {
        let data = vec![0u8; CHUNK_SIZE + 1];
        // Two leaves now, so the root is a reduction, not a leaf digest.
        assert_ne!(hash_content(&data), digest_hex(&data));
    }
}
