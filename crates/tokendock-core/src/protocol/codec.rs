//! Wire codec for device requests and responses.
//!
//! Outbound: a [`Command`] becomes one contiguous JSON message; the caller
//! writes it in a single transport write. Inbound classification is
//! deliberately loose, because the firmware contract is informal and assumed
//! fixed:
//!
//! - Simple commands succeed iff the literal substring `"OK"` occurs
//!   anywhere in the raw reply bytes. There is no structured failure body.
//! - `get_data` replies with a JSON object
//!   `{"tokens": [{"name": ..., "secret": [bytes...]}, ...]}`. Anything that
//!   does not parse to that schema is a terminal [`ProtocolError::MalformedPayload`]
//!   for the call; the codec never retries.
//!
//! This substring-presence ack semantic is part of the device contract and
//! must not be "upgraded" to structured status codes.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::token::Token;
use crate::protocol::command::{Command, ACK_MARKER};

/// Errors that can occur while encoding a command or decoding a reply.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The command could not be serialized. Should not happen for any
    /// well-formed [`Command`]; surfaced rather than panicking.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),

    /// The reply to `get_data` could not be parsed or violated the schema.
    #[error("malformed device payload: {0}")]
    MalformedPayload(String),
}

/// Result of classifying a raw reply to an ack/nack-style command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStatus {
    /// The reply contained the success marker.
    Ack,
    /// Anything else, including an empty reply.
    Nack,
}

/// Schema of the `get_data` reply.
#[derive(Deserialize)]
struct DataPayload {
    tokens: Vec<Token>,
}

/// Encodes a [`Command`] as a single JSON wire message.
///
/// No length prefix or terminator is added; the message is intended for one
/// contiguous transport write.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn encode_command(command: &Command) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(command).map_err(ProtocolError::Encode)
}

/// Classifies a raw reply as ack or nack.
///
/// Success iff [`ACK_MARKER`] occurs anywhere in `raw`. The device is
/// authoritative; no other structure is assumed.
pub fn decode_ack(raw: &[u8]) -> AckStatus {
    let matched = raw.windows(ACK_MARKER.len()).any(|w| w == ACK_MARKER);
    if matched {
        AckStatus::Ack
    } else {
        AckStatus::Nack
    }
}

/// Decodes a `get_data` reply into the device's token set.
///
/// Each `secret` element must be an integer in `[0, 255]`.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPayload`] if the bytes are not valid
/// JSON for the expected schema.
pub fn decode_data(raw: &[u8]) -> Result<Vec<Token>, ProtocolError> {
    let payload: DataPayload = serde_json::from_slice(raw).map_err(|e| {
        debug!("get_data payload failed to parse: {e}");
        ProtocolError::MalformedPayload(e.to_string())
    })?;
    Ok(payload.tokens)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
