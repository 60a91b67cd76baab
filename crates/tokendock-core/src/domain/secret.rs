//! Secret codec: Base32 text ↔ raw OTP key bytes.
//!
//! Operators enter OTP seeds as Base32 text (the format printed next to QR
//! codes, e.g. `JBSWY3DPEHPK3PXP`), while the device stores and transmits raw
//! key bytes. The two are equivalent representations of the same value and
//! must round-trip exactly; this module is the only place in the codebase
//! that knows about the conversion.
//!
//! Decoding is case-insensitive: input is folded to upper case before being
//! handed to the RFC 4648 decoder, matching what the device's companion
//! tooling has always accepted. No characters are ever silently dropped — a
//! symbol outside the standard 32-character alphabet, or padding that does
//! not line up with the text length, is a [`SecretFormatError`].

use data_encoding::BASE32;
use thiserror::Error;

/// Error raised when secret text is not valid Base32.
#[derive(Debug, Error, PartialEq)]
#[error("invalid Base32 secret text: {0}")]
pub struct SecretFormatError(#[from] data_encoding::DecodeError);

/// Decodes Base32 secret text into raw key bytes.
///
/// Accepts upper- or lower-case input; padding must be present and correct
/// for the canonical RFC 4648 encoding.
///
/// # Errors
///
/// Returns [`SecretFormatError`] if the text contains characters outside the
/// Base32 alphabet (after case folding) or has invalid padding/length.
pub fn decode_secret(text: &str) -> Result<Vec<u8>, SecretFormatError> {
    let folded = text.to_ascii_uppercase();
    Ok(BASE32.decode(folded.as_bytes())?)
}

/// Encodes raw key bytes as canonical upper-case Base32 text with padding.
pub fn encode_secret(bytes: &[u8]) -> String {
    BASE32.encode(bytes)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
