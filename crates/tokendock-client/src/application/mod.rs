//! Application layer: use cases for the client.
//!
//! [`session`] owns the device session state machine; [`detect`] implements
//! the single-shot detection probe used during port discovery. Both talk to
//! the serial hardware only through the infrastructure
//! [`crate::infrastructure::transport::TransportFactory`] seam.

pub mod detect;
pub mod session;

pub use detect::detect;
pub use session::{Session, SessionError, SessionStatus};
