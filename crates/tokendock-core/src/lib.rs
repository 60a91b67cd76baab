//! # tokendock-core
//!
//! Shared library for tokendock containing the device wire protocol and the
//! domain entities for OTP token management.
//!
//! This crate is used by the client application and by anything else that
//! needs to speak to the token dock firmware. It has zero dependencies on
//! OS APIs, serial hardware, or UI frameworks.
//!
//! The two top-level modules:
//!
//! - **`protocol`** – How bytes travel over the serial link. Commands are
//!   encoded as single JSON messages with an `"action"` discriminator, and
//!   responses are classified either as bare ack/nack (the literal `"OK"`
//!   marker anywhere in the raw bytes) or as a structured token payload.
//!
//! - **`domain`** – Pure business logic with no I/O. OTP token entities and
//!   the Base32 secret codec that converts between human-typeable secret
//!   text and the raw key bytes carried on the wire.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `tokendock_core::Token` instead of `tokendock_core::domain::token::Token`.
pub use domain::secret::{decode_secret, encode_secret, SecretFormatError};
pub use domain::token::{Token, TokenDraft, TokenSet};
pub use protocol::codec::{decode_ack, decode_data, encode_command, AckStatus, ProtocolError};
pub use protocol::command::Command;
