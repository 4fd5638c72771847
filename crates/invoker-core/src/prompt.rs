//! Prompt fingerprints for tracking which template version produced a result.

use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 hex fingerprint for a prompt template.
pub fn fingerprint_prompt(prompt: &str) -> String {
    Sha256::digest(prompt.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
