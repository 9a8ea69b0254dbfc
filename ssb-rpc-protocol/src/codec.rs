//! Encoder for muxrpc requests and responses.

use crate::config::CodecConfig;
use crate::counter::RequestCounter;
use crate::error::ProtocolError;
use crate::flag::RpcFlag;
use crate::frame::{check_body_len, Frame, FrameFlags};
use bytes::{Bytes, BytesMut};
use std::sync::Arc;

/// Encodes request and response frames.
///
/// Cloning an encoder shares its request counter, so every clone hands out
/// numbers from the same sequence.
#[derive(Debug, Clone)]
pub struct Encoder {
    counter: Arc<RequestCounter>,
    config: CodecConfig,
}

impl Encoder {
    /// Creates an encoder with its own counter starting at 1.
    pub fn new() -> Self {
        Self::with_counter(Arc::new(RequestCounter::new()))
    }

    /// Creates an encoder drawing request numbers from `counter`.
    pub fn with_counter(counter: Arc<RequestCounter>) -> Self {
        Self {
            counter,
            config: CodecConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn counter(&self) -> &Arc<RequestCounter> {
        &self.counter
    }

    /// Allocates the next request number.
    pub fn next_request_number(&self) -> i32 {
        self.counter.next()
    }

    /// Encodes `body` as a request with an allocated request number.
    ///
    /// The body length is checked before a number is allocated, so a
    /// rejected body does not consume one.
    pub fn encode_request(
        &self,
        body: impl Into<Bytes>,
        flags: &[RpcFlag],
    ) -> Result<BytesMut, ProtocolError> {
        let body = body.into();
        check_body_len(body.len(), self.config.max_body_len)?;
        let request_number = self.next_request_number();
        self.encode_request_with_number(body, request_number, flags)
    }

    /// Encodes a UTF-8 string body as a request with an allocated request
    /// number.
    pub fn encode_request_str(
        &self,
        body: &str,
        flags: &[RpcFlag],
    ) -> Result<BytesMut, ProtocolError> {
        self.encode_request(Bytes::copy_from_slice(body.as_bytes()), flags)
    }

    /// Encodes `body` as request `request_number`, which must be >= 1.
    pub fn encode_request_with_number(
        &self,
        body: impl Into<Bytes>,
        request_number: i32,
        flags: &[RpcFlag],
    ) -> Result<BytesMut, ProtocolError> {
        let flags = FrameFlags::new().apply_all(flags);
        let frame = Frame::request(body.into(), request_number, flags)?;
        let encoded = frame.encode(self.config.max_body_len)?;
        tracing::trace!(
            request_number,
            body_len = frame.body.len(),
            flags = frame.flags.bits(),
            "encoded request"
        );
        Ok(encoded)
    }

    /// Encodes `body` as the response to request `request_number`.
    ///
    /// The flag byte starts from `flag_byte` and `flags` are applied on top
    /// of it in order.
    pub fn encode_response(
        &self,
        body: impl Into<Bytes>,
        request_number: i32,
        flag_byte: u8,
        flags: &[RpcFlag],
    ) -> Result<BytesMut, ProtocolError> {
        let flags = FrameFlags::from(flag_byte).apply_all(flags);
        let frame = Frame::response(body.into(), request_number, flags)?;
        let encoded = frame.encode(self.config.max_body_len)?;
        tracing::trace!(
            request_number,
            body_len = frame.body.len(),
            flags = frame.flags.bits(),
            "encoded response"
        );
        Ok(encoded)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
