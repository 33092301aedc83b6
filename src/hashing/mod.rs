use blake3::Hasher;

/// Computes the 32-byte cache key for an `(original, generated)` text pair.
///
/// Each text is prefixed with its byte length, so no choice of separator can make
/// two different pairs encode to the same input (`("ab", "c")` vs `("a", "bc")`).
#[inline]
pub fn hash_text_pair(original: &str, generated: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&(original.len() as u64).to_le_bytes());
    hasher.update(original.as_bytes());
    hasher.update(&(generated.len() as u64).to_le_bytes());
    hasher.update(generated.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Renders the first bytes of a key as hex for log output.
pub fn short_hex(key: &[u8; 32]) -> String {
    key[..6].iter().map(|b| format!("{b:02x}")).collect()
}
