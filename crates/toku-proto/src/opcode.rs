//! Frame opcode: the one-byte tag at the start of every frame.

/// Operation code identifying a frame's type.
///
/// Closed set. The wire value 8 is unassigned; any other value not listed
/// here is invalid. `Hello` takes the wire value 0, which the decoder also
/// uses internally as its "no frame in progress" sentinel (see
/// [`crate::decoder::Decoder`]).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Initial handshake from the connecting peer.
    Hello = 0,
    /// Server response to `Hello`.
    HelloAck = 1,
    /// Keepalive probe.
    Ping = 2,
    /// Keepalive response.
    Pong = 3,
    /// Client request, correlated by `seq`.
    Request = 4,
    /// Server response, correlated by `seq`.
    Response = 5,
    /// Unsolicited server-to-client message.
    Push = 6,
    /// Graceful connection teardown with a status code.
    Goaway = 7,
    /// Application-defined error, optionally correlated by `seq`.
    Error = 9,
}

impl Opcode {
    /// Parses a wire opcode byte. Returns `None` for unassigned or invalid
    /// values (including the unassigned value 8).
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Hello),
            1 => Some(Self::HelloAck),
            2 => Some(Self::Ping),
            3 => Some(Self::Pong),
            4 => Some(Self::Request),
            5 => Some(Self::Response),
            6 => Some(Self::Push),
            7 => Some(Self::Goaway),
            9 => Some(Self::Error),
            _ => None,
        }
    }

    /// Wire value of this opcode.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Size of the fixed header following the opcode byte, in bytes.
    ///
    /// Excludes the opcode byte itself; includes `flags`.
    #[must_use]
    pub const fn header_size(self) -> usize {
        match self {
            // flags(1) + version(1) + size(4)
            Self::Hello => 6,
            // flags(1) + ping_interval(4) + size(4)
            Self::HelloAck => 9,
            // flags(1) + seq(4)
            Self::Ping | Self::Pong => 5,
            // flags(1) + seq(4) + size(4)
            Self::Request | Self::Response => 9,
            // flags(1) + size(4)
            Self::Push => 5,
            // flags(1) + code(2) + size(4)
            Self::Goaway => 7,
            // flags(1) + seq(4) + code(2) + size(4)
            Self::Error => 11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_defined_values() {
        for op in [
            Opcode::Hello,
            Opcode::HelloAck,
            Opcode::Ping,
            Opcode::Pong,
            Opcode::Request,
            Opcode::Response,
            Opcode::Push,
            Opcode::Goaway,
            Opcode::Error,
        ] {
            assert_eq!(Opcode::from_u8(op.to_u8()), Some(op));
        }
    }

    #[test]
    fn rejects_unassigned_value() {
        assert_eq!(Opcode::from_u8(8), None);
    }

    #[test]
    fn rejects_out_of_range_value() {
        assert_eq!(Opcode::from_u8(255), None);
    }

    #[test]
    fn header_sizes_match_wire_layout() {
        assert_eq!(Opcode::Hello.header_size(), 6);
        assert_eq!(Opcode::HelloAck.header_size(), 9);
        assert_eq!(Opcode::Ping.header_size(), 5);
        assert_eq!(Opcode::Pong.header_size(), 5);
        assert_eq!(Opcode::Request.header_size(), 9);
        assert_eq!(Opcode::Response.header_size(), 9);
        assert_eq!(Opcode::Push.header_size(), 5);
        assert_eq!(Opcode::Goaway.header_size(), 7);
        assert_eq!(Opcode::Error.header_size(), 11);
    }
}
