//! tokendock-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! The client drives a token dock — an ESP8266-class device that stores OTP
//! token secrets and generates one-time passwords — over its serial link:
//!
//! 1. Enumerates serial ports and probes each candidate until one answers
//!    the detection message.
//! 2. Opens a session against the chosen port and authenticates with the
//!    operator's PIN.
//! 3. Issues management commands: rotate the PIN, update WiFi credentials,
//!    push an edited token set, pull the current token set back for display.
//!
//! Every command is one blocking write followed by one blocking read on an
//! exclusively-owned half-duplex serial link; there is no pipelining and no
//! background polling.

/// Application layer: the session state machine and the detection probe.
pub mod application;

/// Infrastructure layer: serial transport, mock transport, and configuration.
pub mod infrastructure;
