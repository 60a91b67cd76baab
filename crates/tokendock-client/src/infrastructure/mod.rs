//! Infrastructure adapters for the client application.

pub mod storage;
pub mod transport;
