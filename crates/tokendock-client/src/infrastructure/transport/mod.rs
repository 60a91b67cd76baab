//! Transport abstraction over the serial link.
//!
//! The device protocol has no real framing: no length prefix, no delimiter.
//! The session relies on fixed-size blocking reads as a framing substitute —
//! one logical message per write, one reply per read window. That contract
//! lives entirely behind the [`Transport`] trait, so a future firmware
//! revision could add length-prefix framing without touching the session
//! logic. A reply split across read windows, or one exceeding the window, is
//! a known limitation of the device contract, preserved here deliberately.
//!
//! The serial handle itself is scoped per operation: the session asks the
//! [`TransportFactory`] to open the port, performs its single write/read
//! exchange, and the handle is closed on drop — on every exit path,
//! including failure. This mirrors how the device firmware expects exactly
//! one request per port-open.

use std::time::Duration;

use thiserror::Error;

pub mod mock;
pub mod serial;

/// Errors produced by the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The serial port could not be opened.
    #[error("serial port {port} unavailable: {reason}")]
    Unavailable { port: String, reason: String },

    /// No response bytes arrived within the read timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// An I/O error occurred on an open port.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A byte-oriented, half-duplex channel to the device.
///
/// One exchange per open handle: a single contiguous `write` followed by a
/// single bounded `read`. Dropping the handle closes the port.
pub trait Transport {
    /// Writes one complete message as a single contiguous write.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Reads up to `max_bytes`, accumulating until the limit is reached or
    /// `timeout` elapses. Returns whatever arrived within the window;
    /// an empty window is [`TransportError::Timeout`].
    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

/// Opens [`Transport`] handles for named ports.
///
/// The factory is the seam between the session state machine and the real
/// serial hardware; tests substitute [`mock::MockTransportFactory`].
pub trait TransportFactory {
    /// Opens `port` at `baud` with the given read timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unavailable`] if the port cannot be opened.
    fn open(
        &self,
        port: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Box<dyn Transport>, TransportError>;
}
