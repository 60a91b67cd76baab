//! Mock transport for unit and integration testing.
//!
//! The real [`super::serial::SerialTransportFactory`] needs physical
//! hardware on the other end of the port, so tests substitute this in-memory
//! implementation. Each opened handle records every write into a shared
//! `Mutex<Vec<...>>` and serves scripted responses in order, so assertions
//! can inspect exactly which bytes went out, how many times the port was
//! opened, and how the session reacts to any reply the firmware could
//! produce.
//!
//! # Usage in tests
//!
//! ```ignore
//! let factory = MockTransportFactory::new();
//! factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
//!
//! let mut session = Session::new(Box::new(factory.clone()));
//! session.connect("COM3", 115_200).unwrap();
//! session.authenticate("1234").unwrap();
//!
//! let writes = factory.writes.lock().unwrap();
//! assert_eq!(writes.len(), 1);
//! ```

use std::collections::HashSet;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Transport, TransportError, TransportFactory};

/// One scripted outcome for a `read` call.
#[derive(Debug, Clone)]
pub enum ScriptedRead {
    /// The device replies with these bytes.
    Reply(Vec<u8>),
    /// Nothing arrives within the read window.
    Timeout,
}

/// Parameters recorded for each successful `open` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRecord {
    pub port: String,
    pub baud: u32,
    pub timeout: Duration,
}

/// A factory whose handles replay scripted responses and record all traffic.
///
/// Clone the factory to keep a handle on the shared records while the
/// session owns the original; both see the same state.
#[derive(Debug, Clone, Default)]
pub struct MockTransportFactory {
    /// Every message written through any handle, in order.
    pub writes: Arc<Mutex<Vec<Vec<u8>>>>,
    /// Every successful `open`, in order.
    pub opens: Arc<Mutex<Vec<OpenRecord>>>,
    /// Scripted read outcomes, consumed front to back across all handles.
    responses: Arc<Mutex<VecDeque<ScriptedRead>>>,
    /// Ports that refuse to open.
    unopenable: Arc<Mutex<HashSet<String>>>,
}

impl MockTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the next read outcome.
    pub fn push_response(&self, response: ScriptedRead) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Marks `port` as failing to open with [`TransportError::Unavailable`].
    pub fn refuse_port(&self, port: &str) {
        self.unopenable.lock().unwrap().insert(port.to_string());
    }

    /// Number of `open` calls made so far.
    pub fn open_count(&self) -> usize {
        self.opens.lock().unwrap().len()
    }

    /// Number of writes made so far across all handles.
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// The last message written, if any.
    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.writes.lock().unwrap().last().cloned()
    }
}

impl TransportFactory for MockTransportFactory {
    fn open(
        &self,
        port: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Box<dyn Transport>, TransportError> {
        if self.unopenable.lock().unwrap().contains(port) {
            return Err(TransportError::Unavailable {
                port: port.to_string(),
                reason: "scripted open failure".to_string(),
            });
        }
        self.opens.lock().unwrap().push(OpenRecord {
            port: port.to_string(),
            baud,
            timeout,
        });
        Ok(Box::new(MockTransport {
            writes: Arc::clone(&self.writes),
            responses: Arc::clone(&self.responses),
        }))
    }
}

/// A handle produced by [`MockTransportFactory::open`].
struct MockTransport {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    responses: Arc<Mutex<VecDeque<ScriptedRead>>>,
}

impl Transport for MockTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.writes.lock().unwrap().push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        match self.responses.lock().unwrap().pop_front() {
            Some(ScriptedRead::Reply(mut bytes)) => {
                // A real read window never returns more than max_bytes.
                bytes.truncate(max_bytes);
                Ok(bytes)
            }
            Some(ScriptedRead::Timeout) | None => Err(TransportError::Timeout(timeout)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
