//! STUN Attributes.
//! This module contains the attribute model shared by every attribute family:
//! the attribute type, the closed set of value layouts, and the typed
//! attributes defined for STUN and for NAT behavior discovery.

use crate::context::{AttributeDecoderContext, AttributeEncoderContext};
use crate::error::{StunError, StunErrorType};
use crate::registry::AttributeDescriptor;
use std::fmt;

mod address_port;
pub use address_port::AddressAttribute;

pub mod codecs;
pub mod discovery;
pub mod stun;

use discovery::{ChangeRequest, ResponsePort};

/// A STUN attribute type is a hex number in the range 0x0000-0xFFFF.
/// STUN attribute types in the range 0x0000-0x7FFF are considered
/// comprehension-required.
///
/// # Examples
///```rust
/// # use stun_nat::AttributeType;
/// let attr_type = AttributeType::from(0x0003);
/// assert_eq!(attr_type.as_u16(), 0x0003);
/// // This is a comprehension required attribute
/// assert!(attr_type.is_comprehension_required());
/// // This is not a comprehension optional attribute
/// assert!(!attr_type.is_comprehension_optional());
///```
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct AttributeType(u16);
impl AttributeType {
    /// Creates a new [`AttributeType` ]
    pub const fn new(attr_type: u16) -> Self {
        AttributeType(attr_type)
    }

    /// Return the [`u16`] representation of this attribute type
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a comprehension required attribute
    pub fn is_comprehension_required(&self) -> bool {
        // Comprehension-required range (0x0000-0x7FFF):
        self.0 < 0x8000
    }

    /// Returns true if this is a comprehension optional attribute
    pub fn is_comprehension_optional(self) -> bool {
        // Comprehension-optional range (0x8000-0xFFFF)
        !self.is_comprehension_required()
    }
}

impl From<u16> for AttributeType {
    fn from(val: u16) -> Self {
        Self::new(val)
    }
}

impl From<AttributeType> for u16 {
    fn from(val: AttributeType) -> Self {
        val.0
    }
}

impl fmt::Debug for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AttributeType (0x{:04X})", self.0)?;
        Ok(())
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "attribute type (0x{:04X})", self.0)?;
        Ok(())
    }
}

/// Trait implemented by all typed attributes
pub trait StunAttributeType {
    /// Returns the STUN attribute type of this instance.
    fn attribute_type(&self) -> AttributeType;

    /// Returns the STUN attribute type.
    fn get_type() -> AttributeType
    where
        Self: Sized;
}

/// Typed attributes that know how to register themselves in an
/// [`AttributeRegistry`](crate::AttributeRegistry).
pub trait AttributeCodec: StunAttributeType {
    /// Type code, name and codec functions of this attribute
    const DESCRIPTOR: AttributeDescriptor;
}

macro_rules! stunt_attribute (
    ($attr_class:ident, $attr_type:ident, $name:literal, $decode:expr, $encode:expr) => {
        impl crate::attributes::StunAttributeType for $attr_class {
            fn get_type() -> crate::attributes::AttributeType where Self: Sized {
                crate::attributes::AttributeType::new($attr_type)
            }
            fn attribute_type(&self) -> crate::attributes::AttributeType {
                $attr_class::get_type()
            }
        }
        impl crate::attributes::AttributeCodec for $attr_class {
            const DESCRIPTOR: crate::registry::AttributeDescriptor =
                crate::registry::AttributeDescriptor {
                    attr_type: crate::attributes::AttributeType::new($attr_type),
                    name: $name,
                    decode: $decode,
                    encode: $encode,
                };
        }
    }
);
pub(crate) use stunt_attribute;

macro_rules! attribute_value_impl (
    ($(($variant:ident, $value:ty, $doc:literal)),*) => {
        /// Value layouts an attribute can carry. The set is closed and
        /// protocol defined; new attribute types reuse one of these layouts.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum AttributeValue {
            $(
                #[doc = $doc]
                $variant($value),
            )*
        }

        impl AttributeValue {
            /// Returns the name of the layout of this value
            pub fn kind(&self) -> &'static str {
                match self {
                    $(AttributeValue::$variant(_) => std::stringify!($variant),)*
                }
            }

            $(
                paste::paste! {
                    #[doc = "Returns true if this value is `" $variant "`"]
                    pub fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self, AttributeValue::$variant(_))
                    }

                    #[doc = "Returns a reference to the inner value or an error if the layout is not `" $variant "`"]
                    pub fn [<as_ $variant:snake>](&self) -> Result<&$value, StunError> {
                        match self {
                            AttributeValue::$variant(value) => Ok(value),
                            _ => Err(StunError::new(
                                StunErrorType::InvalidParam,
                                format!("Value {} is not of type {}", self.kind(), std::stringify!($variant))
                            )),
                        }
                    }
                }
            )*
        }

        impl StunAttribute {
            $(
                paste::paste! {
                    #[doc = "Returns true if the value of this attribute is `" $variant "`"]
                    pub fn [<is_ $variant:snake>](&self) -> bool {
                        self.value.[<is_ $variant:snake>]()
                    }

                    #[doc = "Returns a reference to the attribute value or an error if the layout is not `" $variant "`"]
                    pub fn [<as_ $variant:snake>](&self) -> Result<&$value, StunError> {
                        self.value.[<as_ $variant:snake>]()
                    }

                    #[doc = "Returns a reference to the `" $variant "` value."]
                    #[doc = "# Panics"]
                    #[doc = "Panics if the value is not `" $variant  "`"]
                    pub fn [<expect_ $variant:snake>](&self) -> &$value {
                        match &self.value {
                            AttributeValue::$variant(value) => value,
                            other => panic!("Attribute value is {}, not {}", other.kind(), std::stringify!($variant)),
                        }
                    }
                }
            )*
        }
    }
);

attribute_value_impl!(
    (Opaque, Vec<u8>, "Raw bytes kept verbatim"),
    (Address, AddressAttribute, "Transport address, plain or XOR obfuscated"),
    (ChangeRequest, ChangeRequest, "Change IP and change port flags"),
    (ResponsePort, ResponsePort, "Port the response must be sent to"),
    (Padding, Vec<u8>, "Free form bytes only meaningful by their length")
);

impl AttributeValue {
    /// Writes this value on the wire. XOR obfuscated addresses use the
    /// cookie and transaction ID carried by the context.
    pub fn encode(&self, ctx: &mut AttributeEncoderContext) -> Result<usize, StunError> {
        match self {
            AttributeValue::Opaque(bytes) | AttributeValue::Padding(bytes) => {
                ctx.cursor().write_bytes(bytes)
            }
            AttributeValue::Address(addr) => addr.encode(ctx),
            AttributeValue::ChangeRequest(flags) => ctx.cursor().write_u32(flags.as_u32()),
            AttributeValue::ResponsePort(port) => {
                let size = ctx.cursor().write_u16(port.port())?;
                Ok(size + ctx.cursor().write_zeros(2)?)
            }
        }
    }
}

/// An attribute attached to a [`StunMessage`](crate::StunMessage): a type
/// code tagging one of the [`AttributeValue`] layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StunAttribute {
    attr_type: AttributeType,
    value: AttributeValue,
}

impl StunAttribute {
    /// Creates a new attribute
    pub fn new<T>(attr_type: T, value: AttributeValue) -> Self
    where
        T: Into<AttributeType>,
    {
        Self {
            attr_type: attr_type.into(),
            value,
        }
    }

    /// Returns the STUN attribute type of this instance.
    pub fn attribute_type(&self) -> AttributeType {
        self.attr_type
    }

    /// Returns the value of this attribute
    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    /// Consumes the attribute returning its value
    pub fn into_value(self) -> AttributeValue {
        self.value
    }

    pub(crate) fn expect_type(&self, attr_type: AttributeType) -> Result<(), StunError> {
        (self.attr_type == attr_type).then_some(()).ok_or_else(|| {
            StunError::new(
                StunErrorType::InvalidParam,
                format!("Expected {}, found {}", attr_type, self.attr_type),
            )
        })
    }
}

pub(crate) fn decode_with<F>(
    ctx: &AttributeDecoderContext,
    decode: F,
) -> Result<AttributeValue, StunError>
where
    F: FnOnce(&AttributeDecoderContext) -> Result<AttributeValue, StunError>,
{
    // A value shorter than its layout is malformed, not a truncated message
    decode(ctx).map_err(|e| match e.error_type {
        StunErrorType::TruncatedData => {
            StunError::new(StunErrorType::MalformedAttribute, e.info.to_string())
        }
        _ => e,
    })
}
