//! Content fingerprints that name memoized results on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in a fingerprint digest.
const FINGERPRINT_LEN: usize = 16;

/// A 128-bit fingerprint computed using XXH3 over a canonical byte sequence.
///
/// Two calls with the same `Fingerprint` are assumed to produce the same
/// result. The [`Display`](fmt::Display) form is 32 lowercase hex characters
/// and is what appears in cache file names.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Computes a fingerprint from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Parses the 32-character lowercase hex rendering produced by `Display`.
    pub fn from_hex(input: &str) -> Result<Self, ParseFingerprintError> {
        let invalid = || ParseFingerprintError {
            input: input.to_string(),
        };
        let digits = input.as_bytes();
        let lower_hex = digits
            .iter()
            .all(|&d| matches!(d, b'0'..=b'9' | b'a'..=b'f'));
        if digits.len() != FINGERPRINT_LEN * 2 || !lower_hex {
            return Err(invalid());
        }

        let mut bytes = [0u8; FINGERPRINT_LEN];
        for (byte, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
            *byte = (hex_value(pair[0]) << 4) | hex_value(pair[1]);
        }
        Ok(Self(bytes))
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

/// Value of one lowercase hex digit; callers have already checked the range.
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        _ => digit - b'a' + 10,
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Error type for parsing fingerprint strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fingerprint: '{input}'")]
pub struct ParseFingerprintError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = Fingerprint::from_bytes(b"hello world");
        let b = Fingerprint::from_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = Fingerprint::from_bytes(b"hello");
        let b = Fingerprint::from_bytes(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn display_format() {
        let fp = Fingerprint::from_bytes(b"test");
        let s = format!("{fp}");
        assert_eq!(s.len(), 32, "Display should be 32 hex chars");
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn debug_abbreviated() {
        let fp = Fingerprint::from_bytes(b"test");
        let s = format!("{fp:?}");
        assert!(s.starts_with("Fingerprint("));
        assert!(s.ends_with("..)"));
    }

    #[test]
    fn hex_roundtrip() {
        let fp = Fingerprint::from_bytes(b"roundtrip");
        let parsed: Fingerprint = fp.to_string().parse().unwrap();
        assert_eq!(fp, parsed);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = Fingerprint::from_hex("abc").unwrap_err();
        assert_eq!(err.to_string(), "invalid fingerprint: 'abc'");
    }

    #[test]
    fn parse_rejects_non_hex() {
        let input = "zz".repeat(16);
        assert!(Fingerprint::from_hex(&input).is_err());
    }

    #[test]
    fn parse_rejects_sign_prefix() {
        let input = "+f".repeat(16);
        assert!(Fingerprint::from_hex(&input).is_err());
    }

    #[test]
    fn parse_rejects_uppercase() {
        let upper = Fingerprint::from_bytes(b"case").to_string().to_ascii_uppercase();
        assert!(Fingerprint::from_hex(&upper).is_err());
    }

    #[test]
    fn parse_rejects_multibyte_input() {
        // 32 bytes long, but not ASCII
        let input = "é".repeat(16);
        assert!(Fingerprint::from_hex(&input).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let fp = Fingerprint::from_bytes(b"serde test");
        let json = serde_json::to_string(&fp).unwrap();
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
