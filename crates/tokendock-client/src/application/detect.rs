//! Device detection probe.
//!
//! During port discovery the front-end has nothing but a list of serial
//! ports that might or might not have a token dock on the other end. The
//! probe writes the fixed detection message to each candidate in turn at the
//! device's fixed boot baud and accepts the first port that answers with the
//! success marker. A port that cannot be opened (in use, permission denied,
//! unplugged between enumeration and probe) is treated exactly like one
//! that answered wrong: skipped, never fatal to the scan.

use tracing::{debug, info};

use tokendock_core::protocol::codec::{decode_ack, AckStatus};
use tokendock_core::protocol::command::{PROBE_BAUD, PROBE_MESSAGE, PROBE_READ_LIMIT, PROBE_TIMEOUT};

use crate::infrastructure::transport::TransportFactory;

/// Probes `ports` in the given order and returns the first one a token dock
/// answers on, or `None` if no candidate responds. Each port is tried at
/// most once.
pub fn detect(factory: &dyn TransportFactory, ports: &[String]) -> Option<String> {
    for port in ports {
        if probe_port(factory, port) {
            info!("token dock detected on {port}");
            return Some(port.clone());
        }
    }
    None
}

/// Runs one single-shot probe: open, write the detection message, read one
/// bounded reply, check for the marker.
fn probe_port(factory: &dyn TransportFactory, port: &str) -> bool {
    let mut transport = match factory.open(port, PROBE_BAUD, PROBE_TIMEOUT) {
        Ok(transport) => transport,
        Err(e) => {
            debug!("skipping {port}: {e}");
            return false;
        }
    };
    if let Err(e) = transport.write(PROBE_MESSAGE) {
        debug!("probe write to {port} failed: {e}");
        return false;
    }
    match transport.read(PROBE_READ_LIMIT, PROBE_TIMEOUT) {
        Ok(raw) => decode_ack(&raw) == AckStatus::Ack,
        Err(e) => {
            debug!("no probe reply from {port}: {e}");
            false
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
