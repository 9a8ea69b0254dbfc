//! Binary frame format for muxrpc.
//!
//! Frame layout (9 bytes header + body):
//!
//! ```text
//! +--------+-------------+----------------+
//! | flags  | body_len    | request_number |
//! | 1 byte | 4 bytes u32 | 4 bytes i32    |
//! +--------+-------------+----------------+
//! | body                                  |
//! | body_len bytes                        |
//! +---------------------------------------+
//! ```
//!
//! All integers are big-endian. The request number is positive in requests
//! and negated in the matching response.

use crate::error::ProtocolError;
use crate::flag::{BodyType, RpcFlag};
use bytes::{BufMut, Bytes, BytesMut};

/// Size of the fixed frame header in bytes (1+4+4 = 9).
pub const FRAME_HEADER_SIZE: usize = 9;

/// Offset of the body length field.
pub const BODY_LEN_OFFSET: usize = 1;

/// Offset of the request number field.
pub const REQUEST_NUMBER_OFFSET: usize = 5;

/// Header flag byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameFlags(u8);

impl FrameFlags {
    pub fn new() -> Self {
        Self(0)
    }

    /// Writes `flag` into the byte.
    pub fn apply(self, flag: RpcFlag) -> Self {
        Self(flag.apply(self.0))
    }

    /// Applies `flags` in order.
    pub fn apply_all(self, flags: &[RpcFlag]) -> Self {
        flags.iter().fold(self, |acc, flag| acc.apply(*flag))
    }

    pub fn is_stream(&self) -> bool {
        self.0 & RpcFlag::STREAM_BIT != 0
    }

    pub fn is_end_or_error(&self) -> bool {
        self.0 & RpcFlag::END_OR_ERROR_BIT != 0
    }

    pub fn body_type(&self) -> Option<BodyType> {
        BodyType::from_bits(self.0)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl From<u8> for FrameFlags {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

/// A frame ready to be written out.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Header flags.
    pub flags: FrameFlags,
    /// Signed request number as it goes on the wire.
    pub request_number: i32,
    /// Opaque body.
    pub body: Bytes,
}

impl Frame {
    /// Creates a request frame. `request_number` must be >= 1.
    pub fn request(
        body: Bytes,
        request_number: i32,
        flags: FrameFlags,
    ) -> Result<Self, ProtocolError> {
        check_request_number(request_number)?;
        Ok(Self {
            flags,
            request_number,
            body,
        })
    }

    /// Creates a response to request `request_number`, which must be >= 1.
    /// The stored number is its negation.
    pub fn response(
        body: Bytes,
        request_number: i32,
        flags: FrameFlags,
    ) -> Result<Self, ProtocolError> {
        check_request_number(request_number)?;
        Ok(Self {
            flags,
            // cannot overflow: request_number >= 1
            request_number: request_number.wrapping_neg(),
            body,
        })
    }

    pub fn is_response(&self) -> bool {
        self.request_number < 0
    }

    /// Total encoded length.
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.body.len()
    }

    /// Encodes the frame into bytes, rejecting bodies longer than
    /// `max_body_len`.
    pub fn encode(&self, max_body_len: u32) -> Result<BytesMut, ProtocolError> {
        let body_len = check_body_len(self.body.len(), max_body_len)?;

        let mut buf = BytesMut::with_capacity(self.encoded_len());

        // Flags (1 byte)
        buf.put_u8(self.flags.bits());

        // Body length (4 bytes)
        buf.put_u32(body_len);

        // Request number (4 bytes)
        buf.put_i32(self.request_number);

        // Body
        buf.put_slice(&self.body);

        Ok(buf)
    }
}

pub(crate) fn check_request_number(request_number: i32) -> Result<(), ProtocolError> {
    if request_number < 1 {
        return Err(ProtocolError::InvalidRequestNumber(request_number));
    }
    Ok(())
}

pub(crate) fn check_body_len(len: usize, max_body_len: u32) -> Result<u32, ProtocolError> {
    match u32::try_from(len) {
        Ok(body_len) if body_len <= max_body_len => Ok(body_len),
        _ => Err(ProtocolError::BodyTooLarge {
            size: len,
            max: max_body_len,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_layout() {
        let frame = Frame::request(Bytes::from_static(b"test"), 1, FrameFlags::new()).unwrap();
        let encoded = frame.encode(u32::MAX).unwrap();

        assert_eq!(
            &encoded[..FRAME_HEADER_SIZE],
            &[0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01]
        );
        assert_eq!(&encoded[FRAME_HEADER_SIZE..], b"test");
        assert_eq!(encoded.len(), 13);
        assert!(!frame.is_response());
    }

    #[test]
    fn test_response_layout() {
        let frame = Frame::response(Bytes::from_static(&[1, 2, 3]), 5, FrameFlags::from(0x02))
            .unwrap();
        let encoded = frame.encode(u32::MAX).unwrap();

        assert_eq!(
            &encoded[..],
            &[0x02, 0x00, 0x00, 0x00, 0x03, 0xFF, 0xFF, 0xFF, 0xFB, 0x01, 0x02, 0x03]
        );
        assert!(frame.is_response());
        assert_eq!(frame.request_number, -5);
    }

    #[test]
    fn test_response_max_request_number() {
        let frame = Frame::response(Bytes::new(), i32::MAX, FrameFlags::new()).unwrap();
        let encoded = frame.encode(u32::MAX).unwrap();
        assert_eq!(
            &encoded[REQUEST_NUMBER_OFFSET..FRAME_HEADER_SIZE],
            &[0x80, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn test_invalid_request_numbers() {
        for n in [0, -1, -5, i32::MIN] {
            assert!(matches!(
                Frame::request(Bytes::new(), n, FrameFlags::new()),
                Err(ProtocolError::InvalidRequestNumber(m)) if m == n
            ));
            assert!(matches!(
                Frame::response(Bytes::new(), n, FrameFlags::new()),
                Err(ProtocolError::InvalidRequestNumber(m)) if m == n
            ));
        }
    }

    #[test]
    fn test_empty_body() {
        let frame = Frame::request(Bytes::new(), 7, FrameFlags::new()).unwrap();
        let encoded = frame.encode(u32::MAX).unwrap();
        assert_eq!(encoded.len(), FRAME_HEADER_SIZE);
        assert_eq!(&encoded[BODY_LEN_OFFSET..REQUEST_NUMBER_OFFSET], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_body_too_large() {
        let frame = Frame::request(Bytes::from(vec![0u8; 17]), 1, FrameFlags::new()).unwrap();
        assert!(frame.encode(17).is_ok());
        assert_eq!(
            frame.encode(16).unwrap_err(),
            ProtocolError::BodyTooLarge { size: 17, max: 16 }
        );
    }

    #[test]
    fn test_body_len_beyond_u32() {
        // only reachable on 64-bit targets
        if let Ok(len) = usize::try_from(u64::from(u32::MAX) + 1) {
            assert!(matches!(
                check_body_len(len, u32::MAX),
                Err(ProtocolError::BodyTooLarge { .. })
            ));
        }
    }

    #[test]
    fn test_frame_flags() {
        let flags = FrameFlags::new().apply_all(&[RpcFlag::STREAM, RpcFlag::END, RpcFlag::JSON]);
        assert!(flags.is_stream());
        assert!(flags.is_end_or_error());
        assert_eq!(flags.body_type(), Some(BodyType::Json));
        assert_eq!(flags.bits(), 0b1110);

        let flags = FrameFlags::new();
        assert!(!flags.is_stream());
        assert!(!flags.is_end_or_error());
        assert_eq!(flags.body_type(), Some(BodyType::Binary));
    }
}
