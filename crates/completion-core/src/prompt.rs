//! Prompt helpers: fingerprints, serialized size and token estimates.

use sha2::{Digest, Sha256};

use crate::message::ChatMessage;

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Length in characters of the JSON serialization of a message list.
pub fn serialized_len(messages: &[ChatMessage]) -> usize {
    serde_json::to_string(messages)
        .map(|json| json.chars().count())
        .unwrap_or_else(|_| {
            messages
                .iter()
                .map(|m| m.content.chars().count() + m.role.as_str().len())
                .sum()
        })
}

/// Heuristic token count: characters divided by `chars_per_token`, rounded up.
///
/// A ratio of zero is treated as one.
pub fn estimate_tokens(chars: usize, chars_per_token: usize) -> u64 {
    let ratio = chars_per_token.max(1) as u64;
    (chars as u64).div_ceil(ratio)
}
