//! STUN message codec.
//!
//! This crate decodes and encodes STUN messages and keeps a registry of the
//! attribute types it knows how to handle. The implementation is based on:
//! * [`RFC5389`](https://datatracker.ietf.org/doc/html/rfc5389). Session Traversal Utilities for NAT (STUN).
//! * [`RFC5780`](https://datatracker.ietf.org/doc/html/rfc5780). NAT Behavior Discovery Using STUN.
//! * [`RFC5769`](https://datatracker.ietf.org/doc/html/rfc5769). Test Vectors for Session Traversal Utilities for NAT (STUN).
//!
//! # Usage
//! Example that creates and encodes a NAT behavior discovery Binding request
//!```rust
//! # use stun_nat::attributes::discovery::{ChangeRequest, Padding, ResponsePort};
//! # use stun_nat::attributes::discovery::ChangeRequestFlags::*;
//! # use stun_nat::{MessageClass, MessageEncoderBuilder, StunMessageBuilder};
//! # use stun_nat::methods::BINDING;
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let msg = StunMessageBuilder::new(BINDING, MessageClass::Request)
//!     .with_attribute(ChangeRequest::new(Some(ChangeIp | ChangePort)))
//!     .with_attribute(ResponsePort::from(4660))
//!     .with_attribute(Padding::new("ABCDE"))
//!     .build();
//!
//! let encoder = MessageEncoderBuilder::default().build();
//! let buffer = encoder.encode(&msg)?;
//!
//! // Header plus 8 + 8 + 12 bytes of attributes
//! assert_eq!(buffer.len(), 48);
//! assert_eq!(&buffer[2..4], [0x00, 0x1c]);
//! #
//! #   Ok(())
//! # }
//!```
//!
//! Example that decodes a STUN Binding response and fetches some attributes.
//!```rust
//! # use stun_nat::attributes::stun::{Software, XorMappedAddress};
//! # use stun_nat::{MessageClass, MessageDecoderBuilder};
//! # use stun_nat::methods::BINDING;
//! # use std::net::{IpAddr, Ipv4Addr};
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let sample_ipv4_response = [
//!     0x01, 0x01, 0x00, 0x3c, // Response type and message length
//!     0x21, 0x12, 0xa4, 0x42, // Magic cookie
//!     0xb7, 0xe7, 0xa7, 0x01, // }
//!     0xbc, 0x34, 0xd6, 0x86, // }  Transaction ID
//!     0xfa, 0x87, 0xdf, 0xae, // }
//!     0x80, 0x22, 0x00, 0x0b, // SOFTWARE attribute header
//!     0x74, 0x65, 0x73, 0x74, // }
//!     0x20, 0x76, 0x65, 0x63, // }  UTF-8 server name
//!     0x74, 0x6f, 0x72, 0x20, // }
//!     0x00, 0x20, 0x00, 0x08, // XOR-MAPPED-ADDRESS attribute header
//!     0x00, 0x01, 0xa1, 0x47, // Address family (IPv4) and xor'd mapped port number
//!     0xe1, 0x12, 0xa6, 0x43, // Xor'd mapped IPv4 address
//!     0x00, 0x08, 0x00, 0x14, // MESSAGE-INTEGRITY header
//!     0x2b, 0x91, 0xf5, 0x99, // }
//!     0xfd, 0x9e, 0x90, 0xc3, // }
//!     0x8c, 0x74, 0x89, 0xf9, // } HMAC-SHA1 fingerprint
//!     0x2a, 0xf9, 0xba, 0x53, // }
//!     0xf0, 0x6b, 0xe7, 0xd7, // }
//!     0x80, 0x28, 0x00, 0x04, // FINGERPRINT attribute header
//!     0xc0, 0x7d, 0x4c, 0x96, // Reserved for CRC32 fingerprint
//! ];
//!
//! let decoder = MessageDecoderBuilder::default().build();
//! let (msg, size) = decoder.decode(&sample_ipv4_response)?;
//! assert_eq!(size, sample_ipv4_response.len());
//!
//! assert_eq!(msg.method(), BINDING);
//! assert_eq!(msg.class(), MessageClass::SuccessResponse);
//!
//! let software = Software::try_from(
//!     msg.get::<Software>().ok_or("Software attribute not found")?,
//! )?;
//! assert_eq!(software.as_str()?, "test vector");
//!
//! let xor_addr = msg.get::<XorMappedAddress>()
//!   .ok_or("XorMappedAddress attribute not found")?
//!   .as_address()?;
//! let socket = xor_addr.socket_address();
//! assert_eq!(socket.ip(), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
//! assert_eq!(socket.port(), 32853);
//! assert!(xor_addr.is_xored());
//! #
//! #   Ok(())
//! # }
//!```
//!
//! # Attribute registry
//! Attribute values are decoded by the functions registered for their type
//! in an [`AttributeRegistry`]. Unregistered attribute types in the
//! comprehension-optional range (`0x8000`-`0xFFFF`) are kept as opaque
//! bytes, while unregistered comprehension-required types
//! (`0x0000`-`0x7FFF`) make decoding fail with
//! [`UnknownRequiredAttribute`](StunErrorType::UnknownRequiredAttribute).
//!
//! #  Common features
//! This crate defines next feature flags that can be enabled:
//! * **discovery**: Registers the attributes defined in
//!     [`RFC5780`](https://datatracker.ietf.org/doc/html/rfc5780)
//!     in the default registry. Enabled by default.

#![deny(missing_docs)]

mod common;
mod context;
mod message;
mod raw;
mod registry;
mod types;

pub mod attributes;
pub mod cursor;
pub mod error;
pub mod methods;

pub use crate::attributes::{
    AddressAttribute, AttributeCodec, AttributeType, AttributeValue, StunAttribute,
    StunAttributeType,
};
pub use crate::context::{
    AttributeDecoderContext, AttributeEncoderContext, MessageDecoder, MessageDecoderBuilder,
    MessageEncoder, MessageEncoderBuilder,
};
pub use crate::cursor::{ReadCursor, WriteCursor};
pub use crate::error::{
    StunAttributeError, StunDecodeError, StunEncodeError, StunError, StunErrorInfo,
    StunErrorLevel, StunErrorType, StunMessageError,
};
pub use crate::message::{
    MessageClass, MessageMethod, MessageType, StunMessage, StunMessageBuilder,
};
pub use crate::raw::{MessageHeader, MESSAGE_HEADER_SIZE};
pub use crate::registry::{
    default_registry, AttributeDescriptor, AttributeRegistry, DecoderHandler, EncoderHandler,
    Lookup,
};
pub use crate::types::{AddressFamily, Cookie, TransactionId, MAGIC_COOKIE};

/// Decodes a STUN message using the default attribute registry.
/// # Returns:
/// The decoded message and the number of bytes it spans in `buffer`.
pub fn decode(buffer: &[u8]) -> Result<(StunMessage, usize), StunDecodeError> {
    MessageDecoder::default().decode(buffer)
}

/// Encodes a STUN message using the default attribute registry.
pub fn encode(msg: &StunMessage) -> Result<Vec<u8>, StunEncodeError> {
    MessageEncoder::default().encode(msg)
}
