//! Key event record and its wire codec.

pub mod codec;
pub mod event;

pub use codec::{decode_event, decode_events, encode_event, ProtocolError};
pub use event::*;
