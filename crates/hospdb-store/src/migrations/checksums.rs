//! Checksums for migrations
//!
//! SHA-256 of the migration SQL, recorded on apply and compared on every
//! later run to detect an embedded script that changed after it was applied.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a migration script
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
