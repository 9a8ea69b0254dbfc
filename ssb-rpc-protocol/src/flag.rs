//! Header flags.
//!
//! The flag byte of a muxrpc header carries three fields:
//!
//! ```text
//!  7   6   5   4   3        2             1   0
//! +---+---+---+---+--------+-------------+-------+
//! |    reserved   | stream | end / error | type  |
//! +---+---+---+---+--------+-------------+-------+
//! ```
//!
//! Each [`RpcFlag`] owns a mask and writes its value under that mask, so a
//! later flag touching the same bits replaces an earlier one.

/// Encoding of the frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyType {
    Binary,
    Utf8String,
    Json,
}

impl BodyType {
    /// Bits reserved for the body type.
    pub const MASK: u8 = 0b0000_0011;

    pub fn bits(self) -> u8 {
        match self {
            BodyType::Binary => 0b00,
            BodyType::Utf8String => 0b01,
            BodyType::Json => 0b10,
        }
    }

    /// Reads the body type out of a flag byte. `0b11` is unassigned.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & Self::MASK {
            0b00 => Some(BodyType::Binary),
            0b01 => Some(BodyType::Utf8String),
            0b10 => Some(BodyType::Json),
            _ => None,
        }
    }
}

/// A single flag applied to a header flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcFlag {
    /// Message belongs to a stream.
    Stream(bool),
    /// Stream end, or error when sent as a response.
    EndOrError(bool),
    /// Body encoding.
    BodyType(BodyType),
}

impl RpcFlag {
    pub const STREAM_BIT: u8 = 0b0000_1000;
    pub const END_OR_ERROR_BIT: u8 = 0b0000_0100;

    /// Shorthand for `Stream(true)`.
    pub const STREAM: RpcFlag = RpcFlag::Stream(true);
    /// Shorthand for `EndOrError(true)`.
    pub const END: RpcFlag = RpcFlag::EndOrError(true);
    /// Shorthand for `BodyType(BodyType::Json)`.
    pub const JSON: RpcFlag = RpcFlag::BodyType(BodyType::Json);

    /// Bits this flag writes.
    pub fn mask(self) -> u8 {
        match self {
            RpcFlag::Stream(_) => Self::STREAM_BIT,
            RpcFlag::EndOrError(_) => Self::END_OR_ERROR_BIT,
            RpcFlag::BodyType(_) => BodyType::MASK,
        }
    }

    fn value(self) -> u8 {
        match self {
            RpcFlag::Stream(on) | RpcFlag::EndOrError(on) => {
                if on {
                    self.mask()
                } else {
                    0
                }
            }
            RpcFlag::BodyType(body_type) => body_type.bits(),
        }
    }

    /// Returns `flags` with this flag written into it. Bits outside
    /// [`mask`](Self::mask) are left as they are.
    pub fn apply(self, flags: u8) -> u8 {
        (flags & !self.mask()) | self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits() {
        assert_eq!(RpcFlag::STREAM.apply(0), 0b1000);
        assert_eq!(RpcFlag::END.apply(0), 0b0100);
        assert_eq!(RpcFlag::BodyType(BodyType::Binary).apply(0), 0b00);
        assert_eq!(RpcFlag::BodyType(BodyType::Utf8String).apply(0), 0b01);
        assert_eq!(RpcFlag::JSON.apply(0), 0b10);
    }

    #[test]
    fn test_clearing_flags() {
        assert_eq!(RpcFlag::Stream(false).apply(0xFF), 0xF7);
        assert_eq!(RpcFlag::EndOrError(false).apply(0xFF), 0xFB);
        assert_eq!(RpcFlag::BodyType(BodyType::Binary).apply(0xFF), 0xFC);
    }

    #[test]
    fn test_reserved_bits_untouched() {
        let seeded = 0b1010_0000;
        let out = RpcFlag::JSON.apply(RpcFlag::STREAM.apply(seeded));
        assert_eq!(out, 0b1010_1010);
    }

    #[test]
    fn test_overlapping_flags_last_wins() {
        let utf8 = RpcFlag::BodyType(BodyType::Utf8String);

        let a = RpcFlag::JSON.apply(utf8.apply(0));
        let b = utf8.apply(RpcFlag::JSON.apply(0));
        assert_eq!(a, 0b10);
        assert_eq!(b, 0b01);

        assert_eq!(RpcFlag::Stream(false).apply(RpcFlag::STREAM.apply(0)), 0);
        assert_eq!(RpcFlag::STREAM.apply(RpcFlag::Stream(false).apply(0)), 0b1000);
    }

    #[test]
    fn test_disjoint_flags_commute() {
        let a = RpcFlag::END.apply(RpcFlag::STREAM.apply(RpcFlag::JSON.apply(0)));
        let b = RpcFlag::JSON.apply(RpcFlag::END.apply(RpcFlag::STREAM.apply(0)));
        assert_eq!(a, b);
        assert_eq!(a, 0b1110);
    }

    #[test]
    fn test_body_type_from_bits() {
        assert_eq!(BodyType::from_bits(0b1000), Some(BodyType::Binary));
        assert_eq!(BodyType::from_bits(0b0001), Some(BodyType::Utf8String));
        assert_eq!(BodyType::from_bits(0b0110), Some(BodyType::Json));
        assert_eq!(BodyType::from_bits(0b0011), None);
    }
}
