use crate::error::PacketError;

/// Packet types known to the protocol.
///
/// `Exec` and `AuthResponse` share the wire value `2`. Only their position in
/// an exchange tells them apart, so decoded packets carry the raw `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    // SERVERDATA_AUTH
    Auth,
    // SERVERDATA_EXECCOMMAND
    Exec,
    // SERVERDATA_AUTH_RESPONSE
    AuthResponse,
    // SERVERDATA_RESPONSE_VALUE
    Response,
}

impl PacketType {
    pub const fn value(self) -> i32 {
        match self {
            PacketType::Auth => 3,
            PacketType::Exec => 2,
            PacketType::AuthResponse => 2,
            PacketType::Response => 0,
        }
    }
}

impl From<PacketType> for i32 {
    fn from(packet_type: PacketType) -> Self {
        packet_type.value()
    }
}

/// A single Source RCON packet.
///
/// Wire layout, all integers little-endian:
/// `size | id | type | body | 0x00 | 0x00`, where `size` counts every byte
/// after itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    id: i32,
    packet_type: i32,
    body: String,
}

impl Packet {
    /// `id` + `type` + the two terminating NUL bytes.
    pub const BASE_PACKET_SIZE: i32 = 10;

    /// Builds a packet. The body may not contain NUL bytes since the framing
    /// relies on them as terminators.
    pub fn new(
        id: i32,
        packet_type: impl Into<i32>,
        body: impl Into<String>,
    ) -> Result<Self, PacketError> {
        let body = body.into();
        Self::check_body(&body)?;

        Ok(Packet {
            id,
            packet_type: packet_type.into(),
            body,
        })
    }

    /// Whether `body` can be framed at all.
    pub fn check_body(body: &str) -> Result<(), PacketError> {
        if body.contains('\0') {
            return Err(PacketError::EmbeddedNul);
        }
        Ok(())
    }

    /// Decodes a complete frame, size prefix included.
    pub fn unpack(incoming: &[u8]) -> Result<Self, PacketError> {
        let size = read_i32(incoming, 0)?;
        if size < Self::BASE_PACKET_SIZE {
            return Err(PacketError::InvalidLength(size));
        }

        let expected = 4 + size as usize;
        if incoming.len() < expected {
            return Err(PacketError::Truncated {
                expected,
                actual: incoming.len(),
            });
        }

        let id = read_i32(incoming, 4)?;
        let packet_type = read_i32(incoming, 8)?;
        // the two trailing NULs are consumed but not part of the body
        let body = String::from_utf8_lossy(&incoming[12..expected - 2]).into_owned();

        Ok(Packet {
            id,
            packet_type,
            body,
        })
    }

    // Since the only one of these values that can change in length is the body,
    // an easy way to calculate the size of a packet is to find the byte-length
    // of the packet body, then add 10 to it.
    pub fn size(&self) -> i32 {
        self.body.len() as i32 + Self::BASE_PACKET_SIZE
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn packet_type(&self) -> i32 {
        self.packet_type
    }

    pub fn body(&self) -> &str {
        self.body.as_ref()
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn pack(&self) -> Vec<u8> {
        // Size, ID, Type, Body, Terminator
        let mut payload = Vec::<u8>::with_capacity(4 + self.size() as usize);
        payload.extend_from_slice(&self.size().to_le_bytes());
        payload.extend_from_slice(&self.id.to_le_bytes());
        payload.extend_from_slice(&self.packet_type.to_le_bytes());
        payload.extend_from_slice(self.body.as_bytes());
        // null terminate the body (C++ interop 🤢), then null terminate the entire package
        payload.extend_from_slice(&[0u8, 0u8]);
        payload
    }
}

fn read_i32(buf: &[u8], offset: usize) -> Result<i32, PacketError> {
    buf.get(offset..offset + 4)
        .and_then(|bytes| bytes.try_into().ok())
        .map(i32::from_le_bytes)
        .ok_or(PacketError::Truncated {
            expected: offset + 4,
            actual: buf.len(),
        })
}
