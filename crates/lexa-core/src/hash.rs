use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of raw bytes.
pub fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    format!("{:x}", hasher.finalize())
}

/// Digest identifying a corpus by the exact bytes it was parsed from.
///
/// Two reports with the same digest were computed over the same input
/// file, regardless of where that file lived on disk.
pub fn corpus_digest(raw: &[u8]) -> String {
    sha256_hex(raw)
}
