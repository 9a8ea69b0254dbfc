//! # ssb-rpc-protocol
//!
//! Frame encoder for the Scuttlebutt RPC protocol (muxrpc).
//!
//! This crate provides:
//! - The 9-byte muxrpc header with flags, body length and request number
//! - Composable header flags (stream, end/error, body type)
//! - A shareable request number counter
//! - Request and response encoding, with responses carrying the negated
//!   request number

pub mod codec;
pub mod config;
pub mod counter;
pub mod error;
pub mod flag;
pub mod frame;

pub use codec::Encoder;
pub use config::CodecConfig;
pub use counter::RequestCounter;
pub use error::{ConfigError, ProtocolError};
pub use flag::{BodyType, RpcFlag};
pub use frame::{Frame, FrameFlags, FRAME_HEADER_SIZE};
