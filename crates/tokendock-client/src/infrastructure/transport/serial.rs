//! `serialport`-backed transport implementation.
//!
//! `read` mirrors the semantics of a bounded blocking serial read: it
//! accumulates bytes until `max_bytes` have arrived or the deadline passes,
//! then returns whatever it has. Only a completely empty window is reported
//! as [`TransportError::Timeout`]; a partial reply is handed to the decoder
//! as-is, because the device contract gives us no way to know whether more
//! is coming.

use std::io::Read;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{Transport, TransportError, TransportFactory};

/// Smallest per-chunk timeout handed to the serial driver while polling
/// toward the overall deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Opens real serial ports via the `serialport` crate.
#[derive(Debug, Default, Clone)]
pub struct SerialTransportFactory;

impl SerialTransportFactory {
    pub fn new() -> Self {
        Self
    }
}

impl TransportFactory for SerialTransportFactory {
    fn open(
        &self,
        port: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Box<dyn Transport>, TransportError> {
        let handle = serialport::new(port, baud)
            .timeout(POLL_INTERVAL.min(timeout))
            .open()
            .map_err(|e| TransportError::Unavailable {
                port: port.to_string(),
                reason: e.to_string(),
            })?;
        debug!("opened {port} at {baud} baud");
        Ok(Box::new(SerialTransport { inner: handle }))
    }
}

/// An open serial port. Dropping it closes the port.
struct SerialTransport {
    inner: Box<dyn serialport::SerialPort>,
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        use std::io::Write;
        self.inner.write_all(bytes)?;
        self.inner.flush()?;
        Ok(())
    }

    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let deadline = Instant::now() + timeout;
        let mut collected = Vec::with_capacity(max_bytes);
        let mut chunk = vec![0u8; max_bytes];

        while collected.len() < max_bytes {
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(d) if !d.is_zero() => d,
                _ => break,
            };
            if self.inner.set_timeout(POLL_INTERVAL.min(remaining)).is_err() {
                break;
            }
            match self.inner.read(&mut chunk[..max_bytes - collected.len()]) {
                Ok(0) => break,
                Ok(n) => collected.extend_from_slice(&chunk[..n]),
                Err(e) if is_timeout_error(&e) => continue,
                Err(e) => {
                    warn!("serial read error: {e}");
                    return Err(TransportError::Io(e));
                }
            }
        }

        if collected.is_empty() {
            return Err(TransportError::Timeout(timeout));
        }
        Ok(collected)
    }
}

/// Returns `true` for OS timeout / would-block errors that mean "nothing
/// arrived yet" rather than a broken port.
fn is_timeout_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}

/// Enumerates the serial ports present on this machine.
///
/// Ports that cannot be enumerated yield an empty list rather than an error;
/// detection treats "no ports" and "no matching port" the same way.
pub fn list_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            warn!("failed to enumerate serial ports: {e}");
            Vec::new()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
