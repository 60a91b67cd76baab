//! OTP token entities.
//!
//! A [`Token`] is a named secret key used to generate one-time passwords.
//! Only the name and the raw key bytes are modeled here; OTP generation
//! itself happens on the device. On the wire the secret travels as an array
//! of byte values, which is exactly what the serde derive produces for
//! `Vec<u8>` under JSON.

use serde::{Deserialize, Serialize};

use crate::domain::secret::{self, SecretFormatError};

/// A named OTP secret as exchanged with the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Display name, e.g. `alice@example.com`.
    pub name: String,
    /// Raw key bytes — the cryptographic seed for OTP generation.
    pub secret: Vec<u8>,
}

/// An ordered token collection. Insertion order is display/edit order; names
/// are not required to be unique (the device may deduplicate or not).
pub type TokenSet = Vec<Token>;

impl Token {
    /// Builds a token from a display name and Base32 secret text.
    ///
    /// # Errors
    ///
    /// Returns [`SecretFormatError`] if the text is not valid Base32.
    pub fn from_base32(name: impl Into<String>, secret_text: &str) -> Result<Self, SecretFormatError> {
        Ok(Self {
            name: name.into(),
            secret: secret::decode_secret(secret_text)?,
        })
    }

    /// Returns the secret as canonical upper-case Base32 text for display.
    pub fn secret_base32(&self) -> String {
        secret::encode_secret(&self.secret)
    }
}

/// An operator-edited token entry that has not been validated yet.
///
/// Drafts hold the secret as raw text exactly as typed. They are converted
/// to [`Token`]s (and thereby Base32-validated) when the token set is saved
/// to the device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenDraft {
    /// Display name; drafts with an empty name are skipped on save.
    pub name: String,
    /// Base32 secret text; drafts with empty text are skipped on save.
    pub secret: String,
}

impl TokenDraft {
    /// Creates a draft from name and secret text.
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }

    /// Returns `true` if either field is empty, in which case the draft is
    /// omitted from a save rather than failing it.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() || self.secret.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base32_decodes_secret_text() {
        let token = Token::from_base32("work-vpn", "AEBAG===").unwrap();
        assert_eq!(token.name, "work-vpn");
        assert_eq!(token.secret, vec![1, 2, 3]);
    }

    #[test]
    fn test_from_base32_rejects_invalid_text() {
        assert!(Token::from_base32("bad", "not base32!").is_err());
    }

    #[test]
    fn test_secret_base32_matches_canonical_encoding() {
        let token = Token {
            name: "a".to_string(),
            secret: vec![1, 2, 3],
        };
        assert_eq!(token.secret_base32(), "AEBAG===");
    }

    #[test]
    fn test_token_serializes_secret_as_byte_array() {
        let token = Token {
            name: "a".to_string(),
            secret: vec![1, 2, 3],
        };
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r#"{"name":"a","secret":[1,2,3]}"#);
    }

    #[test]
    fn test_draft_blank_detection() {
        assert!(TokenDraft::new("", "AEBAG===").is_blank());
        assert!(TokenDraft::new("name", "").is_blank());
        assert!(!TokenDraft::new("name", "AEBAG===").is_blank());
    }
}
