use crate::common::padding;
use crate::cursor::ReadCursor;
use crate::error::{StunError, StunErrorType};
use crate::types::{Cookie, MAGIC_COOKIE, TRANSACTION_ID_SIZE};
use crate::TransactionId;
use fallible_iterator::{FallibleIterator, IntoFallibleIterator};

// Stun message format
//       0                   1                   2                   3
//       0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//      +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//      |0 0|     STUN Message Type     |         Message Length        |
//      +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//      |                         Magic Cookie                          |
//      +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//      |                                                               |
//      |                     Transaction ID (96 bits)                  |
//      |                                                               |
//      +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

/// STUN message header size
pub const MESSAGE_HEADER_SIZE: usize = 20;
pub(crate) const ATTRIBUTE_HEADER_SIZE: usize = 4;

/// The STUN message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Message type, without the two most significant bits
    pub msg_type: u16,
    /// Length of the attribute section
    pub msg_length: u16,
    /// Magic cookie
    pub cookie: Cookie,
    /// Transaction Id
    pub transaction_id: TransactionId,
}

impl MessageHeader {
    /// Reads and validates the 20 bytes header at the start of `buffer`.
    /// Fails with [`TruncatedData`](StunErrorType::TruncatedData) if fewer
    /// than 20 bytes are available, with
    /// [`InvalidParam`](StunErrorType::InvalidParam) if the two most
    /// significant bits are not zero and with
    /// [`BadMagicCookie`](StunErrorType::BadMagicCookie) if the cookie is not
    /// `0x2112A442`.
    pub fn decode(buffer: &[u8]) -> Result<Self, StunError> {
        let mut cursor = ReadCursor::new(buffer);
        let header = cursor.read_bytes(MESSAGE_HEADER_SIZE)?;

        let mut cursor = ReadCursor::new(header);
        let msg_type = cursor.read_u16()?;
        let msg_length = cursor.read_u16()?;
        let cookie = Cookie::from(cursor.read_u32()?);
        let transaction_id = TransactionId::from(cursor.read_array::<TRANSACTION_ID_SIZE>()?);

        let bits = msg_type >> 14;
        if bits != 0 {
            return Err(StunError::new(
                StunErrorType::InvalidParam,
                format!("Most significant bits are not zero: {:#04b}", bits),
            ));
        }

        if cookie != MAGIC_COOKIE {
            return Err(StunError::new(
                StunErrorType::BadMagicCookie,
                format!("Cookie {:#010x}", cookie.as_u32()),
            ));
        }

        Ok(Self {
            msg_type,
            msg_length,
            cookie,
            transaction_id,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RawMessage<'a> {
    /// Message header
    pub header: MessageHeader,
    /// Attributes
    pub attributes: &'a [u8],
}

impl<'a> RawMessage<'a> {
    /// Splits `buffer` into the header and the attribute section declared
    /// by it. Returns the message and the number of bytes it spans.
    pub fn decode(buffer: &'a [u8]) -> Result<(Self, usize), StunError> {
        let header = MessageHeader::decode(buffer)?;

        let attributes_size = header.msg_length as usize;
        if attributes_size % 4 != 0 {
            return Err(StunError::new(
                StunErrorType::MalformedAttribute,
                format!("Message length {} is not a multiple of 4", attributes_size),
            ));
        }

        let mut cursor = ReadCursor::new(buffer);
        cursor.skip(MESSAGE_HEADER_SIZE)?;
        let attributes = cursor.read_bytes(attributes_size)?;

        Ok((Self { header, attributes }, cursor.position()))
    }
}

// Format of STUN Attributes:
//      0                   1                   2                   3
//      0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//     |         Type                  |            Length             |
//     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//     |                         Value (variable)                ....
//     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, PartialEq, Eq)]
pub struct RawAttribute<'a> {
    /// Attribute type
    pub attr_type: u16,
    /// Offset of the value within the attribute section
    pub offset: usize,
    /// Attribute value of size equal to Length
    pub value: &'a [u8],
}

#[derive(Debug, PartialEq, Eq)]
pub struct RawAttributes<'a>(&'a [u8]);

impl<'a> From<&'a [u8]> for RawAttributes<'a> {
    fn from(buff: &'a [u8]) -> Self {
        RawAttributes(buff)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RawAttributesIter<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> RawAttributesIter<'a> {
    pub fn pos(&self) -> usize {
        self.pos
    }

    fn overrun(&self, msg: String) -> StunError {
        StunError::new(
            StunErrorType::AttributeOverrun,
            format!("{} (offset {}, length {})", msg, self.pos, self.buffer.len()),
        )
    }
}

impl<'a> FallibleIterator for RawAttributesIter<'a> {
    type Item = RawAttribute<'a>;
    type Error = StunError;

    fn next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        if self.pos == self.buffer.len() {
            return Ok(None);
        }

        let buffer: &'a [u8] = self.buffer;
        let mut cursor = ReadCursor::new(&buffer[self.pos..]);
        let (attr_type, attr_length) = match (cursor.read_u16(), cursor.read_u16()) {
            (Ok(attr_type), Ok(attr_length)) => (attr_type, attr_length as usize),
            _ => return Err(self.overrun(String::from("Attribute header"))),
        };

        let offset = self.pos + ATTRIBUTE_HEADER_SIZE;
        let value = cursor.read_bytes(attr_length).map_err(|_| {
            self.overrun(format!("Attribute value of {} bytes", attr_length))
        })?;
        cursor.skip(padding(attr_length)).map_err(|_| {
            self.overrun(format!("Padding of {} bytes", padding(attr_length)))
        })?;

        self.pos += cursor.position();

        Ok(Some(RawAttribute {
            attr_type,
            offset,
            value,
        }))
    }
}

impl<'a> IntoFallibleIterator for RawAttributes<'a> {
    type Item = RawAttribute<'a>;
    type Error = StunError;
    type IntoFallibleIter = RawAttributesIter<'a>;

    fn into_fallible_iter(self) -> Self::IntoFallibleIter {
        RawAttributesIter {
            buffer: self.0,
            pos: 0,
        }
    }
}
