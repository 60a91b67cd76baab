//! Protocol module containing the command vocabulary and the wire codec.

pub mod codec;
pub mod command;

pub use codec::{decode_ack, decode_data, encode_command, AckStatus, ProtocolError};
pub use command::Command;
