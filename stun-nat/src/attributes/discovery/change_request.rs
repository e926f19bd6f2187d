use crate::attributes::codecs::{decode_change_request, encode_change_request};
use crate::attributes::{stunt_attribute, AttributeValue, StunAttribute, StunAttributeType};
use crate::StunError;
use enumflags2::{bitflags, BitFlags};

const CHANGE_REQUEST: u16 = 0x0003;

/// Flags of the change request attribute. They ask the server to send the
/// response from its alternate IP address and/or its alternate port.
#[bitflags]
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChangeRequestFlags {
    /// Change port
    ChangePort = 1 << 1,
    /// Change IP
    ChangeIp = 1 << 2,
}

/// The change request attribute contains two flags to control the IP
/// address and port that the server uses to send the response. These
/// flags are called the "change IP" and "change port" flags.
/// This attribute is allowed only in the Binding Request. The
/// "change IP" and "change port" flags are useful for determining the
/// current filtering behavior of a NAT. They instruct the server to
/// send the Binding Responses from the alternate source IP address
/// and/or alternate port. The change request attribute is optional in
/// the Binding Request.
///
/// The flags word is kept as received, reserved bits included.
///
/// # Example
///```rust
/// # use stun_nat::attributes::discovery::ChangeRequest;
/// # use stun_nat::attributes::discovery::ChangeRequestFlags::*;
///
/// let change_request = ChangeRequest::new(Some(ChangeIp | ChangePort));
/// assert!(change_request.change_ip());
/// assert!(change_request.flags().contains(ChangePort));
/// assert_eq!(change_request.as_u32(), 0x00000006);
///```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChangeRequest(u32);

impl ChangeRequest {
    /// creates a new change request attribute
    /// # Arguments
    /// - `flags`: The change IP and change port flags, if any
    /// # Returns
    /// The change request attribute
    pub fn new(flags: Option<BitFlags<ChangeRequestFlags>>) -> Self {
        let flags = match flags {
            Some(flags) => flags.bits(),
            None => 0,
        };
        ChangeRequest(flags)
    }

    /// Returns the flags set in the change request attribute
    pub fn flags(&self) -> BitFlags<ChangeRequestFlags> {
        BitFlags::<ChangeRequestFlags>::from_bits_truncate(self.0)
    }

    /// Returns true if the server must answer from its alternate IP address
    pub fn change_ip(&self) -> bool {
        self.flags().contains(ChangeRequestFlags::ChangeIp)
    }

    /// Returns true if the server must answer from its alternate port
    pub fn change_port(&self) -> bool {
        self.flags().contains(ChangeRequestFlags::ChangePort)
    }

    /// Returns the flags word as it travels on the wire
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ChangeRequest {
    fn from(value: u32) -> Self {
        ChangeRequest(value)
    }
}

impl From<ChangeRequest> for StunAttribute {
    fn from(value: ChangeRequest) -> Self {
        StunAttribute::new(CHANGE_REQUEST, AttributeValue::ChangeRequest(value))
    }
}

impl TryFrom<&StunAttribute> for ChangeRequest {
    type Error = StunError;

    fn try_from(attr: &StunAttribute) -> Result<Self, Self::Error> {
        attr.expect_type(ChangeRequest::get_type())?;
        Ok(*attr.as_change_request()?)
    }
}

stunt_attribute!(
    ChangeRequest,
    CHANGE_REQUEST,
    "CHANGE-REQUEST",
    decode_change_request,
    encode_change_request
);
