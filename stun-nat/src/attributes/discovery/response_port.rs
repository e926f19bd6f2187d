use crate::attributes::codecs::{decode_response_port, encode_response_port};
use crate::attributes::{stunt_attribute, AttributeValue, StunAttribute, StunAttributeType};
use crate::StunError;

const RESPONSE_PORT: u16 = 0x0027;

/// The response port attribute contains a port.  This attribute can be
/// present in the Binding Request and indicates which port the Binding
/// Response will be sent to.  For servers which support the response
/// port attribute, the Binding Response MUST be transmitted to the
/// source IP address of the Binding Request and the port contained in
/// response port.
///
/// # Examples
///```rust
/// # use stun_nat::attributes::discovery::ResponsePort;
/// let attr = ResponsePort::from(1234);
/// assert_eq!(attr, 1234);
/// assert_eq!(attr.port(), 1234);
///```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResponsePort(u16);

impl ResponsePort {
    /// Creates a new attribute
    pub fn new(port: u16) -> Self {
        Self(port)
    }

    /// Returns the port the response must be sent to
    pub fn port(&self) -> u16 {
        self.0
    }
}

impl PartialEq<u16> for ResponsePort {
    fn eq(&self, other: &u16) -> bool {
        self.0 == *other
    }
}

impl PartialEq<ResponsePort> for u16 {
    fn eq(&self, other: &ResponsePort) -> bool {
        *self == other.0
    }
}

impl From<u16> for ResponsePort {
    fn from(port: u16) -> Self {
        ResponsePort(port)
    }
}

impl From<ResponsePort> for StunAttribute {
    fn from(value: ResponsePort) -> Self {
        StunAttribute::new(RESPONSE_PORT, AttributeValue::ResponsePort(value))
    }
}

impl TryFrom<&StunAttribute> for ResponsePort {
    type Error = StunError;

    fn try_from(attr: &StunAttribute) -> Result<Self, Self::Error> {
        attr.expect_type(ResponsePort::get_type())?;
        Ok(*attr.as_response_port()?)
    }
}

stunt_attribute!(
    ResponsePort,
    RESPONSE_PORT,
    "RESPONSE-PORT",
    decode_response_port,
    encode_response_port
);
