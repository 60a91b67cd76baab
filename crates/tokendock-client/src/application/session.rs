//! The device session state machine.
//!
//! A [`Session`] owns the connection parameters, the authentication status,
//! the cached PIN, and the cached token set, and sequences commands against
//! the transport:
//!
//! ```text
//! Disconnected ──connect──▶ Connected ──authenticate──▶ Authenticated
//!       ▲                       │                            │
//!       └───────────────────disconnect───────────────────────┘
//! ```
//!
//! There is no path from `Authenticated` back to `Connected`; teardown
//! always returns to `Disconnected`. The cached PIN is set exactly when the
//! session is authenticated.
//!
//! Every operation is synchronous and atomic from the caller's perspective:
//! it opens the port, performs exactly one write followed by exactly one
//! bounded read, and closes the port again, blocking until completion or
//! timeout. Nothing is pipelined and nothing retries; an unconfirmed
//! transition never advances the state machine. Input-validation failures
//! are raised before any I/O.
//!
//! A `Session` must not be driven from more than one thread at a time;
//! independent sessions (e.g. against different ports) need no coordination.

use tracing::{debug, info, warn};

use tokendock_core::domain::secret;
use tokendock_core::domain::token::{Token, TokenDraft, TokenSet};
use tokendock_core::protocol::codec::{self, AckStatus, ProtocolError};
use tokendock_core::protocol::command::{
    Command, ACK_READ_LIMIT, COMMAND_TIMEOUT, DATA_READ_LIMIT,
};
use tokendock_core::SecretFormatError;

use crate::infrastructure::transport::{TransportError, TransportFactory};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No connection parameters recorded.
    Disconnected,
    /// Port and baud recorded; not yet authenticated.
    Connected,
    /// PIN accepted by the device; management commands available.
    Authenticated,
}

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The port could not be opened, or I/O on it failed outright.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(#[source] TransportError),

    /// No response arrived within the operation's timeout.
    #[error("device did not respond in time")]
    Timeout,

    /// The device rejected the PIN, or did not answer the auth command.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device rejected a PIN change, or the supplied old PIN did not
    /// match the session's cached PIN.
    #[error("PIN rejected")]
    PinRejected,

    /// A required field was empty; caught before any I/O.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A token secret was not valid Base32; the save was aborted before I/O.
    #[error(transparent)]
    SecretFormat(#[from] SecretFormatError),

    /// The structured `get_data` reply could not be parsed.
    #[error("malformed device payload")]
    MalformedPayload(#[source] ProtocolError),

    /// The device answered a non-auth command without the success marker.
    #[error("device rejected the command")]
    DeviceRejected,

    /// The operation is not valid in the session's current state.
    #[error("{operation} is not valid while {status:?}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// A command failed to serialize. Indicates a bug, not a device problem.
    #[error("failed to encode command")]
    Encode(#[source] ProtocolError),
}

/// An owned session against one device. See the module docs for the state
/// machine and the atomicity contract.
pub struct Session {
    factory: Box<dyn TransportFactory>,
    status: SessionStatus,
    port: String,
    baud: u32,
    pin: Option<String>,
    tokens: TokenSet,
}

impl Session {
    /// Creates an empty, disconnected session that will open ports through
    /// `factory`.
    pub fn new(factory: Box<dyn TransportFactory>) -> Self {
        Self {
            factory,
            status: SessionStatus::Disconnected,
            port: String::new(),
            baud: 0,
            pin: None,
            tokens: TokenSet::new(),
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The cached token set, as last replaced by [`Session::get_data`].
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Records connection parameters and transitions to `Connected`.
    ///
    /// Performs no I/O beyond parameter validation.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidInput`] for an empty port or zero baud;
    /// [`SessionError::InvalidState`] if already connected.
    pub fn connect(&mut self, port: &str, baud: u32) -> Result<(), SessionError> {
        self.require(SessionStatus::Disconnected, "connect")?;
        if port.is_empty() {
            return Err(SessionError::InvalidInput("port must not be empty"));
        }
        if baud == 0 {
            return Err(SessionError::InvalidInput("baud must be positive"));
        }
        self.port = port.to_string();
        self.baud = baud;
        self.status = SessionStatus::Connected;
        info!("session connected to {port} at {baud} baud");
        Ok(())
    }

    /// Authenticates with the device PIN.
    ///
    /// On ack the PIN is cached and the session becomes `Authenticated`.
    /// On nack or timeout the session stays `Connected`.
    ///
    /// # Errors
    ///
    /// [`SessionError::AuthenticationFailed`] when the device does not
    /// answer with the success marker within the timeout.
    pub fn authenticate(&mut self, pin: &str) -> Result<(), SessionError> {
        self.require(SessionStatus::Connected, "authenticate")?;
        let command = Command::Auth {
            pin: pin.to_string(),
        };
        let raw = match self.exchange(&command, ACK_READ_LIMIT) {
            Ok(raw) => raw,
            // An unanswered auth is indistinguishable from a rejected one.
            Err(SessionError::Timeout) => {
                warn!("authentication timed out");
                return Err(SessionError::AuthenticationFailed);
            }
            Err(e) => return Err(e),
        };
        match codec::decode_ack(&raw) {
            AckStatus::Ack => {
                self.pin = Some(pin.to_string());
                self.status = SessionStatus::Authenticated;
                info!("authenticated");
                Ok(())
            }
            AckStatus::Nack => {
                warn!("device rejected PIN");
                Err(SessionError::AuthenticationFailed)
            }
        }
    }

    /// Rotates the device PIN.
    ///
    /// `old_pin` must match the session's cached PIN; the device
    /// re-validates it independently. On ack the cached PIN is replaced; on
    /// nack it is left unchanged.
    ///
    /// # Errors
    ///
    /// [`SessionError::PinRejected`] on a local mismatch (before any I/O)
    /// or a device nack.
    pub fn change_pin(&mut self, old_pin: &str, new_pin: &str) -> Result<(), SessionError> {
        self.require(SessionStatus::Authenticated, "change_pin")?;
        if old_pin.is_empty() || new_pin.is_empty() {
            return Err(SessionError::InvalidInput("PIN must not be empty"));
        }
        if self.pin.as_deref() != Some(old_pin) {
            return Err(SessionError::PinRejected);
        }
        let command = Command::ChangePin {
            old_pin: old_pin.to_string(),
            new_pin: new_pin.to_string(),
        };
        let raw = self.exchange(&command, ACK_READ_LIMIT)?;
        match codec::decode_ack(&raw) {
            AckStatus::Ack => {
                self.pin = Some(new_pin.to_string());
                info!("device PIN rotated");
                Ok(())
            }
            AckStatus::Nack => Err(SessionError::PinRejected),
        }
    }

    /// Updates the WiFi credentials the device uses.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidInput`] for an empty ssid or password, raised
    /// before any I/O; [`SessionError::DeviceRejected`] on nack.
    pub fn change_wifi(&mut self, ssid: &str, password: &str) -> Result<(), SessionError> {
        self.require(SessionStatus::Authenticated, "change_wifi")?;
        if ssid.is_empty() {
            return Err(SessionError::InvalidInput("ssid must not be empty"));
        }
        if password.is_empty() {
            return Err(SessionError::InvalidInput("password must not be empty"));
        }
        let command = Command::ChangeWifi {
            pin: self.cached_pin()?,
            ssid: ssid.to_string(),
            password: password.to_string(),
        };
        let raw = self.exchange(&command, ACK_READ_LIMIT)?;
        match codec::decode_ack(&raw) {
            AckStatus::Ack => {
                info!("device WiFi settings updated");
                Ok(())
            }
            AckStatus::Nack => Err(SessionError::DeviceRejected),
        }
    }

    /// Pushes an edited token set to the device wholesale.
    ///
    /// Drafts with an empty name or empty secret text are filtered out
    /// without failing the save. The remaining secrets are Base32-decoded
    /// before anything touches the wire; one bad secret aborts the whole
    /// save with nothing sent. Entries whose secret decodes to zero bytes
    /// are filtered like blanks.
    ///
    /// # Errors
    ///
    /// [`SessionError::SecretFormat`] for invalid Base32;
    /// [`SessionError::DeviceRejected`] on nack.
    pub fn save_tokens(&mut self, drafts: &[TokenDraft]) -> Result<(), SessionError> {
        self.require(SessionStatus::Authenticated, "save_tokens")?;

        let mut tokens = Vec::with_capacity(drafts.len());
        for draft in drafts {
            if draft.is_blank() {
                debug!("skipping blank token draft");
                continue;
            }
            let bytes = secret::decode_secret(&draft.secret)?;
            if bytes.is_empty() {
                debug!("skipping token draft with empty decoded secret");
                continue;
            }
            tokens.push(Token {
                name: draft.name.clone(),
                secret: bytes,
            });
        }

        let command = Command::SaveTokens {
            pin: self.cached_pin()?,
            tokens,
        };
        let raw = self.exchange(&command, ACK_READ_LIMIT)?;
        match codec::decode_ack(&raw) {
            AckStatus::Ack => {
                info!("token set saved to device");
                Ok(())
            }
            AckStatus::Nack => Err(SessionError::DeviceRejected),
        }
    }

    /// Pulls the device's current token set, replacing the cached set.
    ///
    /// This is a refresh: the cached set is cleared first, and on timeout or
    /// decode failure it stays empty — the previous contents are not
    /// restored.
    ///
    /// # Errors
    ///
    /// [`SessionError::Timeout`] when no reply arrives;
    /// [`SessionError::MalformedPayload`] when the reply does not parse.
    pub fn get_data(&mut self) -> Result<&[Token], SessionError> {
        self.require(SessionStatus::Authenticated, "get_data")?;
        self.tokens.clear();

        let command = Command::GetData {
            pin: self.cached_pin()?,
        };
        let raw = self.exchange(&command, DATA_READ_LIMIT)?;
        let tokens = codec::decode_data(&raw).map_err(SessionError::MalformedPayload)?;
        info!("fetched {} token(s) from device", tokens.len());
        self.tokens = tokens;
        Ok(&self.tokens)
    }

    /// Clears the PIN and cached tokens and returns to `Disconnected`.
    /// Valid in any state; idempotent.
    pub fn disconnect(&mut self) {
        if self.status != SessionStatus::Disconnected {
            info!("session disconnected from {}", self.port);
        }
        self.pin = None;
        self.tokens.clear();
        self.port.clear();
        self.baud = 0;
        self.status = SessionStatus::Disconnected;
    }

    /// Performs the single write/read exchange for one command. The port is
    /// opened for just this exchange and closed on every exit path.
    fn exchange(&self, command: &Command, read_limit: usize) -> Result<Vec<u8>, SessionError> {
        let message = codec::encode_command(command).map_err(SessionError::Encode)?;
        let mut transport = self
            .factory
            .open(&self.port, self.baud, COMMAND_TIMEOUT)
            .map_err(SessionError::TransportUnavailable)?;
        transport.write(&message).map_err(map_io_error)?;
        transport
            .read(read_limit, COMMAND_TIMEOUT)
            .map_err(map_io_error)
    }

    fn cached_pin(&self) -> Result<String, SessionError> {
        // Guarded by require(Authenticated) in every caller.
        self.pin.clone().ok_or(SessionError::InvalidState {
            operation: "command requiring authentication",
            status: self.status,
        })
    }

    fn require(&self, expected: SessionStatus, operation: &'static str) -> Result<(), SessionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }
}

fn map_io_error(e: TransportError) -> SessionError {
    match e {
        TransportError::Timeout(_) => SessionError::Timeout,
        other => SessionError::TransportUnavailable(other),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
