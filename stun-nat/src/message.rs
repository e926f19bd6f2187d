use crate::attributes::{StunAttribute, StunAttributeType};
use crate::error::{StunError, StunErrorType};
use crate::TransactionId;

/// Class and method of a STUN message, packed together in the first 16
/// bits of the header. Requests open a transaction that is closed by
/// either a success or an error response; indications travel alone.
/// # Examples
///```rust
/// # use stun_nat::{MessageClass, MessageType};
/// # use stun_nat::methods::BINDING;
/// let msg_type = MessageType::new(BINDING, MessageClass::ErrorResponse);
/// assert_eq!(msg_type.as_u16(), 0x0111);
///
/// let msg_type = MessageType::from(0x0101);
/// assert_eq!(msg_type.method(), BINDING);
/// assert_eq!(msg_type.class(), MessageClass::SuccessResponse);
///```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageType {
    method: MessageMethod,
    class: MessageClass,
}

// Bit layout of the 14 bits holding the method (M) and class (C):
//
//    13 12 11 10  9  8  7  6  5  4  3  2  1  0
//   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//   |M |M |M |M |M |C |M |M |M |C |M |M |M |M |
//   |11|10| 9| 8| 7| 1| 6| 5| 4| 0| 3| 2| 1| 0|
//   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+
const METHOD_HIGH: u16 = 0x0F80;
const METHOD_MID: u16 = 0x0070;
const METHOD_LOW: u16 = 0x000F;
const CLASS_HIGH: u16 = 0x0100;
const CLASS_LOW: u16 = 0x0010;

impl MessageType {
    /// Creates a new message type.
    pub fn new(method: MessageMethod, class: MessageClass) -> Self {
        Self { method, class }
    }

    /// Returns the message class.
    pub fn class(&self) -> MessageClass {
        self.class
    }

    /// Returns the message method
    pub fn method(&self) -> MessageMethod {
        self.method
    }

    /// Returns the wire value of this message type. The two most
    /// significant bits are always zero.
    pub fn as_u16(&self) -> u16 {
        let method = self.method.0;
        let class = u16::from(self.class.bits());
        ((method & METHOD_HIGH) << 2)
            | ((method & METHOD_MID) << 1)
            | (method & METHOD_LOW)
            | ((class & 0b10) << 7)
            | ((class & 0b01) << 4)
    }
}

impl From<u16> for MessageType {
    fn from(value: u16) -> Self {
        let class = ((value & CLASS_HIGH) >> 7) | ((value & CLASS_LOW) >> 4);
        let method = ((value >> 2) & METHOD_HIGH) | ((value >> 1) & METHOD_MID) | (value & METHOD_LOW);
        // Two bits can only hold one of the four classes
        MessageType::new(MessageMethod(method), MessageClass::from_bits(class as u8))
    }
}

/// Method of a STUN message. Methods are 12 bits wide, although the
/// methods assigned so far are in the range 0x000-0x0FF.
///
/// # Examples
///```rust
/// # use stun_nat::{MessageMethod, StunErrorType};
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let binding = MessageMethod::try_from(0x001)?;
/// assert_eq!(binding.as_u16(), 0x001);
/// assert!(binding.is_valid());
///
/// let method = MessageMethod::try_from(0x1000);
/// assert_eq!(method.expect_err("Error expected"), StunErrorType::InvalidParam);
/// #
/// #   Ok(())
/// # }
///```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MessageMethod(pub(crate) u16);

impl MessageMethod {
    /// Returns the numeric value of this method.
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if the method is in the assigned range 0x000-0x0FF
    pub fn is_valid(&self) -> bool {
        self.0 <= 0x00ff
    }
}

impl TryFrom<u16> for MessageMethod {
    type Error = StunError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value > 0x0fff {
            return Err(StunError::new(
                StunErrorType::InvalidParam,
                format!("Method {:#06x} does not fit in 12 bits", value),
            ));
        }
        Ok(MessageMethod(value))
    }
}

/// Class of a STUN message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageClass {
    /// Request, answered by a response
    Request,
    /// Indication, no response is expected
    Indication,
    /// Success response
    SuccessResponse,
    /// Error response
    ErrorResponse,
}

impl MessageClass {
    fn bits(&self) -> u8 {
        match self {
            MessageClass::Request => 0b00,
            MessageClass::Indication => 0b01,
            MessageClass::SuccessResponse => 0b10,
            MessageClass::ErrorResponse => 0b11,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => MessageClass::Request,
            0b01 => MessageClass::Indication,
            0b10 => MessageClass::SuccessResponse,
            _ => MessageClass::ErrorResponse,
        }
    }

    /// Returns true for success and error responses
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            MessageClass::SuccessResponse | MessageClass::ErrorResponse
        )
    }
}

impl TryFrom<u8> for MessageClass {
    type Error = StunError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b11 {
            return Err(StunError::new(
                StunErrorType::InvalidParam,
                format!("Class {:#04x} does not fit in 2 bits", value),
            ));
        }
        Ok(MessageClass::from_bits(value))
    }
}

/// Builds a [`StunMessage`]. Attributes are kept in the order they are
/// added.
///
/// # Examples
///```rust
/// # use stun_nat::{MessageClass, StunMessageBuilder};
/// # use stun_nat::attributes::discovery::{ChangeRequest, ResponsePort, ChangeRequestFlags::*};
/// # use stun_nat::attributes::stun::XorMappedAddress;
/// # use stun_nat::methods::BINDING;
/// let message = StunMessageBuilder::new(BINDING, MessageClass::Request)
///     .with_attribute(ChangeRequest::new(Some(ChangeIp | ChangePort)))
///     .with_attribute(ResponsePort::from(5000))
///     .build();
///
/// let attr = message.get::<ChangeRequest>().expect("CHANGE-REQUEST not found");
/// let change_request = attr.as_change_request().expect("Not a CHANGE-REQUEST value");
/// assert!(change_request.change_ip());
/// assert!(change_request.change_port());
///
/// assert!(message.get::<XorMappedAddress>().is_none());
///```
#[derive(Debug)]
pub struct StunMessageBuilder {
    msg_type: MessageType,
    transaction_id: Option<TransactionId>,
    attributes: Vec<StunAttribute>,
}

impl StunMessageBuilder {
    /// Starts a message of the given method and class.
    pub fn new(method: MessageMethod, class: MessageClass) -> StunMessageBuilder {
        Self {
            msg_type: MessageType::new(method, class),
            transaction_id: None,
            attributes: Vec::new(),
        }
    }

    /// Sets the transaction ID. A random one is generated otherwise.
    pub fn with_transaction_id(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    /// Appends an attribute.
    pub fn with_attribute<T>(mut self, attribute: T) -> Self
    where
        T: Into<StunAttribute>,
    {
        self.attributes.push(attribute.into());
        self
    }

    /// Creates the STUN message.
    pub fn build(self) -> StunMessage {
        StunMessage {
            method: self.msg_type.method(),
            class: self.msg_type.class(),
            transaction_id: self.transaction_id.unwrap_or_default(),
            attributes: self.attributes,
        }
    }
}

/// A decoded STUN message: the header fields plus the list of attributes
/// in wire order. The length and magic cookie are not stored; the encoder
/// computes the former and always writes
/// [`MAGIC_COOKIE`](crate::MAGIC_COOKIE).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StunMessage {
    method: MessageMethod,
    class: MessageClass,
    transaction_id: TransactionId,
    attributes: Vec<StunAttribute>,
}

impl StunMessage {
    /// Returns the message method.
    pub fn method(&self) -> MessageMethod {
        self.method
    }

    /// Returns the message class
    pub fn class(&self) -> MessageClass {
        self.class
    }

    /// Returns the message type
    pub fn message_type(&self) -> MessageType {
        MessageType::new(self.method, self.class)
    }

    /// Returns the transaction ID
    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    /// Returns the attributes in wire order.
    pub fn attributes(&self) -> &[StunAttribute] {
        &self.attributes
    }

    /// Returns the first attribute of type `A`, if any.
    pub fn get<A>(&self) -> Option<&StunAttribute>
    where
        A: StunAttributeType,
    {
        self.attributes
            .iter()
            .find(|attr| attr.attribute_type() == A::get_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::BINDING;

    const CLASSES: [MessageClass; 4] = [
        MessageClass::Request,
        MessageClass::Indication,
        MessageClass::SuccessResponse,
        MessageClass::ErrorResponse,
    ];

    #[test]
    fn message_class() {
        for (bits, class) in CLASSES.iter().enumerate() {
            let decoded = MessageClass::try_from(bits as u8).expect("Invalid class");
            assert_eq!(&decoded, class);
            assert_eq!(decoded.bits(), bits as u8);
            assert_eq!(decoded.is_response(), bits >= 2);
        }

        assert_eq!(
            MessageClass::try_from(4).expect_err("Error expected"),
            StunErrorType::InvalidParam
        );
    }

    #[test]
    fn message_method() {
        assert!(MessageMethod::try_from(0x0000).is_ok());
        assert!(BINDING.is_valid());

        let method = MessageMethod::try_from(0x0FFF).expect("Can not create MessageMethod");
        assert_eq!(method.as_u16(), 0x0FFF);
        assert!(!method.is_valid());

        assert_eq!(
            MessageMethod::try_from(0x1000).expect_err("Error expected"),
            StunErrorType::InvalidParam
        );
    }

    #[test]
    fn message_type_bits() {
        // Every method bit and both class bits in a single value
        let method = MessageMethod::try_from(0x08D8).expect("Can not create MessageMethod");

        for (class, value) in CLASSES.iter().zip([0x22A8u16, 0x22B8, 0x23A8, 0x23B8]) {
            let msg_type = MessageType::new(method, *class);
            assert_eq!(msg_type.as_u16(), value);

            let decoded = MessageType::from(value);
            assert_eq!(decoded.method(), method);
            assert_eq!(decoded.class(), *class);
        }

        assert_eq!(MessageType::from(0x0001).method(), BINDING);
        assert_eq!(MessageType::from(0x0001).class(), MessageClass::Request);
    }

    #[test]
    fn build_message() {
        let transaction_id = TransactionId::from([0x01; 12]);
        let msg = StunMessageBuilder::new(BINDING, MessageClass::Indication)
            .with_transaction_id(transaction_id)
            .build();
        assert_eq!(msg.message_type().as_u16(), 0x0011);
        assert_eq!(msg.transaction_id(), &transaction_id);
        assert!(msg.attributes().is_empty());

        // Random transaction IDs
        let a = StunMessageBuilder::new(BINDING, MessageClass::Request).build();
        let b = StunMessageBuilder::new(BINDING, MessageClass::Request).build();
        assert_ne!(a.transaction_id(), b.transaction_id());
    }
}
