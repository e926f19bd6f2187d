//! NAT Behavior Discovery attributes defined for STUN
//! [`RFC5780`](https://datatracker.ietf.org/doc/html/rfc5780)
//!
//! The family is registered in the default registry when the `discovery`
//! feature is enabled. Custom registries add it with
//! [`discovery_register_attributes`].

mod change_request;
mod other_address;
mod padding;
mod response_origin;
mod response_port;

use crate::attributes::codecs::{decode_xor_address, encode_xor_address};
use crate::attributes::AttributeCodec;
use crate::registry::{AttributeDescriptor, AttributeRegistry};
use crate::StunError;
pub use change_request::{ChangeRequest, ChangeRequestFlags};
pub use other_address::OtherAddress;
pub use padding::Padding;
pub use response_origin::ResponseOrigin;
pub use response_port::ResponsePort;

/// Attributes of the NAT behavior discovery family.
pub const DISCOVERY_ATTRIBUTES: [AttributeDescriptor; 5] = [
    ChangeRequest::DESCRIPTOR,
    Padding::DESCRIPTOR,
    ResponsePort::DESCRIPTOR,
    ResponseOrigin::DESCRIPTOR,
    OtherAddress::DESCRIPTOR,
];

/// Wire form of the RESPONSE-ORIGIN and OTHER-ADDRESS attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryAddressEncoding {
    /// Plain address, as MAPPED-ADDRESS
    #[default]
    Plain,
    /// XOR obfuscated address, as XOR-MAPPED-ADDRESS. Some deployments send
    /// the discovery addresses this way.
    Xored,
}

/// Registers the NAT behavior discovery attributes.
/// # Arguments:
/// - `registry` - The registry to extend.
/// - `encoding` - How RESPONSE-ORIGIN and OTHER-ADDRESS travel on the wire.
///   Their values must be flagged accordingly, see
///   [`AddressAttribute::xored`](crate::attributes::AddressAttribute::xored).
/// # Returns:
/// An error of type [`DuplicateType`](crate::StunErrorType::DuplicateType)
/// if any of the attributes is already registered.
pub fn discovery_register_attributes(
    registry: &mut AttributeRegistry,
    encoding: DiscoveryAddressEncoding,
) -> Result<(), StunError> {
    for descriptor in DISCOVERY_ATTRIBUTES {
        let is_address = descriptor.attribute_type() == ResponseOrigin::DESCRIPTOR.attribute_type()
            || descriptor.attribute_type() == OtherAddress::DESCRIPTOR.attribute_type();
        let descriptor = match encoding {
            DiscoveryAddressEncoding::Xored if is_address => {
                descriptor
                    .with_decoder(decode_xor_address)
                    .with_encoder(encode_xor_address)
            }
            _ => descriptor,
        };
        registry.register_descriptor(descriptor)?;
    }
    Ok(())
}
