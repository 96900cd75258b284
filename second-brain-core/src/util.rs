//! Pure, side-effect-free helpers shared by the recall pipeline.

use sha2::{Digest, Sha256};

/// Maximum length of a query string echoed into a DEBUG log line (§4.3.3).
pub const QUERY_LOG_CHAR_CAP: usize = 80;

/// Clamp a requested result limit into `[1, 100]` before any oversampling
/// multiplier is applied (§4.3.3). This is a hard security/correctness
/// bound, not merely a default.
#[must_use]
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, 100)
}

/// Normalize content for dedup identity: trim, lowercase, and collapse
/// whitespace runs (§4.3.1).
#[must_use]
pub fn normalize_for_identity(content: &str) -> String {
    content
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// SHA-256 over the normalized content, truncated to the low 64 bits.
/// Content identity is not a security function (§9), so truncation is
/// acceptable and keeps dedup keys small.
#[must_use]
pub fn content_hash64(content: &str) -> u64 {
    let normalized = normalize_for_identity(content);
    let digest = Sha256::digest(normalized.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_be_bytes(bytes)
}

/// Truncate a query string to `QUERY_LOG_CHAR_CAP` characters for DEBUG
/// logging; full length is logged separately at INFO (§4.3.3).
#[must_use]
pub fn truncate_for_log(query: &str) -> String {
    if query.chars().count() <= QUERY_LOG_CHAR_CAP {
        query.to_string()
    } else {
        let truncated: String = query.chars().take(QUERY_LOG_CHAR_CAP).collect();
        format!("{truncated}…")
    }
}
