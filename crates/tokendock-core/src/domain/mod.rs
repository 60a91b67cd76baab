//! Domain entities for tokendock.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: the OTP token entity and the Base32 secret codec. Nothing
//! here touches the serial port or the wire codec; outer layers depend on
//! these types, never the other way around.

/// Base32 secret text ↔ raw key bytes.
pub mod secret;

/// OTP token entities.
pub mod token;
