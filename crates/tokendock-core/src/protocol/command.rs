//! The device command vocabulary and protocol constants.
//!
//! The token dock firmware speaks a small JSON request/response protocol
//! over its serial link. Every request is a single JSON object with an
//! `"action"` discriminator and exactly the fields the device needs to
//! authorize and perform that action — no more. There is no length prefix
//! and no delimiter: one logical message per write, one reply per read
//! window, with a fixed maximum reply size per command.

use std::time::Duration;

use serde::Serialize;

use crate::domain::token::Token;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Timeout for every authenticated command and for authentication itself.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum reply size for ack/nack-style commands.
pub const ACK_READ_LIMIT: usize = 100;

/// Maximum reply size for the `get_data` token payload.
pub const DATA_READ_LIMIT: usize = 1024;

/// Marker substring whose presence anywhere in a raw reply signals success.
pub const ACK_MARKER: &[u8] = b"OK";

/// Fixed message written to a candidate port during device detection.
/// The exact byte sequence (including the space and CRLF) is part of the
/// firmware contract.
pub const PROBE_MESSAGE: &[u8] = b"{\"action\": \"call\"}\r\n";

/// Baud rate used for detection probes.
pub const PROBE_BAUD: u32 = 115_200;

/// Timeout for a single detection probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Maximum reply size read during a detection probe.
pub const PROBE_READ_LIMIT: usize = 100;

// ── Commands ──────────────────────────────────────────────────────────────────

/// All requests the client can issue to the device.
///
/// Serializes directly to the wire representation; the variant name becomes
/// the `"action"` field. Commands are never received, so there is no
/// `Deserialize` on this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Authenticate the session with the master PIN.
    Auth { pin: String },
    /// Rotate the master PIN. The device validates `old_pin` itself.
    ChangePin { old_pin: String, new_pin: String },
    /// Update the WiFi credentials the device uses.
    ///
    /// The firmware's field name for the SSID is `wifi`; the Rust API keeps
    /// the clearer name.
    ChangeWifi {
        pin: String,
        #[serde(rename = "wifi")]
        ssid: String,
        password: String,
    },
    /// Replace the device's stored token set wholesale.
    SaveTokens { pin: String, tokens: Vec<Token> },
    /// Fetch the device's current token set.
    GetData { pin: String },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
