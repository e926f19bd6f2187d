//! STUN attributes defined in
//! [`RFC5389`](https://datatracker.ietf.org/doc/html/rfc5389).
//!
//! Addresses are decoded into [`AddressAttribute`](crate::AddressAttribute)
//! values. The remaining attributes of this family are kept as raw bytes;
//! no integrity or fingerprint check is performed on them.

mod alternate_server;
mod error_code;
mod fingerprint;
mod mapped_address;
mod message_integrity;
mod nonce;
mod realm;
mod software;
mod unknown_attributes;
mod user_name;
mod xor_mapped_address;

use crate::attributes::AttributeCodec;
use crate::registry::{AttributeDescriptor, AttributeRegistry};
use crate::StunError;
pub use alternate_server::AlternateServer;
pub use error_code::ErrorCode;
pub use fingerprint::Fingerprint;
pub use mapped_address::MappedAddress;
pub use message_integrity::MessageIntegrity;
pub use nonce::Nonce;
pub use realm::Realm;
pub use software::Software;
pub use unknown_attributes::UnknownAttributes;
pub use user_name::UserName;
pub use xor_mapped_address::XorMappedAddress;

/// Attributes of the base STUN family.
pub const STUN_ATTRIBUTES: [AttributeDescriptor; 11] = [
    MappedAddress::DESCRIPTOR,
    UserName::DESCRIPTOR,
    MessageIntegrity::DESCRIPTOR,
    ErrorCode::DESCRIPTOR,
    UnknownAttributes::DESCRIPTOR,
    Realm::DESCRIPTOR,
    Nonce::DESCRIPTOR,
    XorMappedAddress::DESCRIPTOR,
    Software::DESCRIPTOR,
    AlternateServer::DESCRIPTOR,
    Fingerprint::DESCRIPTOR,
];

/// Registers the base STUN attributes.
/// # Returns:
/// An error of type [`DuplicateType`](crate::StunErrorType::DuplicateType)
/// if any of the attributes is already registered.
pub fn stun_register_attributes(registry: &mut AttributeRegistry) -> Result<(), StunError> {
    STUN_ATTRIBUTES
        .into_iter()
        .try_for_each(|descriptor| registry.register_descriptor(descriptor))
}
