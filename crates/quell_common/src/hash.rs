//! Content hashing for stable finding identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed using XXH3.
///
/// Two findings whose identity inputs hash to the same `ContentHash` are
/// considered the same logical bug across analysis runs. The [`Display`]
/// form (32 lowercase hex characters) is what gets written into bundles and
/// suppression files.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the lowercase hex representation of this hash.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Incrementally feeds several fields into one [`ContentHash`].
///
/// Each field is length-prefixed so that `("ab", "c")` and `("a", "bc")`
/// never produce the same hash.
#[derive(Default)]
pub struct ContentHashBuilder {
    buf: Vec<u8>,
}

impl ContentHashBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a string field.
    pub fn field(mut self, value: &str) -> Self {
        self.buf
            .extend_from_slice(&(value.len() as u64).to_le_bytes());
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    /// Appends a signed integer field.
    pub fn int(mut self, value: i64) -> Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Finishes the builder and returns the hash of all appended fields.
    pub fn finish(self) -> ContentHash {
        ContentHash::from_bytes(&self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::from_bytes(b"hello world");
        let b = ContentHash::from_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = ContentHash::from_bytes(b"hello");
        let b = ContentHash::from_bytes(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn display_format() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h}");
        assert_eq!(s.len(), 32, "Display should be 32 hex chars");
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(s, h.to_hex());
    }

    #[test]
    fn debug_abbreviated() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h:?}");
        assert!(s.starts_with("ContentHash("));
    }

    #[test]
    fn builder_fields_are_length_prefixed() {
        let a = ContentHashBuilder::new().field("ab").field("c").finish();
        let b = ContentHashBuilder::new().field("a").field("bc").finish();
        assert_ne!(a, b);
    }

    #[test]
    fn builder_is_deterministic() {
        let make = || {
            ContentHashBuilder::new()
                .field("core.DivideZero")
                .int(-3)
                .field("x = 1 / y;")
                .finish()
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_bytes(b"serde test");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
