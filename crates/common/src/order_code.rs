//! Human-readable order codes.

use rand::Rng;
use serde::{Deserialize, Serialize};

const PREFIX: &str = "GM-";
const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Human-readable order code in the form `GM-` followed by 9 random
/// base-36 uppercase characters (e.g. `GM-K4QZ81X0M`).
///
/// Codes are not checked for uniqueness before insert; the collision
/// probability over 36^9 values is accepted as negligible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    /// Generates a new random order code.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut code = String::with_capacity(PREFIX.len() + SUFFIX_LEN);
        code.push_str(PREFIX);
        for _ in 0..SUFFIX_LEN {
            code.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
        }
        Self(code)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error returned when parsing a string that is not a valid order code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOrderCode(pub String);

impl std::fmt::Display for InvalidOrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid order code: {}", self.0)
    }
}

impl std::error::Error for InvalidOrderCode {}

impl std::str::FromStr for OrderCode {
    type Err = InvalidOrderCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| InvalidOrderCode(s.to_string()))?;
        if suffix.len() != SUFFIX_LEN || !suffix.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(InvalidOrderCode(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn generated_code_has_expected_shape() {
        let code = OrderCode::generate();
        assert!(code.as_str().starts_with("GM-"));
        assert_eq!(code.as_str().len(), 12);
        assert!(
            code.as_str()[3..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn generated_codes_differ() {
        // Probabilistic, but 36^9 values make a collision here implausible.
        let a = OrderCode::generate();
        let b = OrderCode::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_accepts_generated_codes() {
        let code = OrderCode::generate();
        let parsed = OrderCode::from_str(code.as_str()).unwrap();
        assert_eq!(parsed, code);
    }

    #[test]
    fn parse_rejects_bad_prefix() {
        assert!(OrderCode::from_str("XX-123456789").is_err());
    }

    #[test]
    fn parse_rejects_bad_length() {
        assert!(OrderCode::from_str("GM-1234").is_err());
        assert!(OrderCode::from_str("GM-1234567890AB").is_err());
    }

    #[test]
    fn parse_rejects_lowercase() {
        assert!(OrderCode::from_str("GM-abcdefghi").is_err());
    }

    #[test]
    fn serialization_is_transparent() {
        let code = OrderCode::from_str("GM-A1B2C3D4E").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"GM-A1B2C3D4E\"");
    }
}
