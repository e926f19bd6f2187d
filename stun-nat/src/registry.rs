//! Attribute registry.
//!
//! Maps attribute type codes to the functions that decode and encode their
//! values. The codec engine only knows about the attribute families that
//! have been registered; unregistered comprehension-optional attributes are
//! kept as opaque bytes while unregistered comprehension-required ones make
//! decoding fail.

use crate::attributes::{AttributeCodec, AttributeType, AttributeValue};
use crate::context::{AttributeDecoderContext, AttributeEncoderContext};
use crate::error::{StunError, StunErrorType};
use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Function that decodes an attribute value
pub type DecoderHandler = fn(&AttributeDecoderContext) -> Result<AttributeValue, StunError>;

/// Function that encodes an attribute value. Returns the number of bytes
/// written.
pub type EncoderHandler =
    fn(&AttributeValue, &mut AttributeEncoderContext) -> Result<usize, StunError>;

/// Describes how an attribute type is decoded and encoded.
#[derive(Clone, Copy)]
pub struct AttributeDescriptor {
    pub(crate) attr_type: AttributeType,
    pub(crate) name: &'static str,
    pub(crate) decode: DecoderHandler,
    pub(crate) encode: EncoderHandler,
}

impl AttributeDescriptor {
    /// Creates a new descriptor.
    pub fn new<T>(
        attr_type: T,
        name: &'static str,
        decode: DecoderHandler,
        encode: EncoderHandler,
    ) -> Self
    where
        T: Into<AttributeType>,
    {
        Self {
            attr_type: attr_type.into(),
            name,
            decode,
            encode,
        }
    }

    /// Returns the attribute type.
    pub fn attribute_type(&self) -> AttributeType {
        self.attr_type
    }

    /// Returns the human-readable name of the attribute.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the function that decodes the attribute value.
    pub fn decoder(&self) -> DecoderHandler {
        self.decode
    }

    /// Returns the function that encodes the attribute value.
    pub fn encoder(&self) -> EncoderHandler {
        self.encode
    }

    /// Returns a copy of this descriptor that decodes values with `decode`.
    pub fn with_decoder(mut self, decode: DecoderHandler) -> Self {
        self.decode = decode;
        self
    }

    /// Returns a copy of this descriptor that encodes values with `encode`.
    pub fn with_encoder(mut self, encode: EncoderHandler) -> Self {
        self.encode = encode;
        self
    }
}

impl fmt::Debug for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("attr_type", &self.attr_type)
            .field("name", &self.name)
            .finish()
    }
}

/// Result of looking an attribute type up in the registry.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    /// The type is registered
    Known(&'a AttributeDescriptor),
    /// The type is not registered but it is comprehension-optional, so the
    /// value is kept as raw bytes.
    Opaque,
}

/// Table of the attribute types an encoder or decoder understands.
///
/// # Examples
///```rust
/// # use stun_nat::{AttributeRegistry, StunErrorType};
/// # use stun_nat::attributes::codecs::{decode_opaque, encode_opaque};
/// # use stun_nat::attributes::discovery::{discovery_register_attributes, DiscoveryAddressEncoding};
/// let mut registry = AttributeRegistry::default();
/// discovery_register_attributes(&mut registry, DiscoveryAddressEncoding::Plain)
///     .expect("Can not register attributes");
/// assert_eq!(registry.name(0x0003), Some("CHANGE-REQUEST"));
///
/// // Register a private attribute
/// registry.register(0xC001, "PRIVATE", decode_opaque, encode_opaque)
///     .expect("Can not register attribute");
///
/// // Codes are registered only once
/// assert_eq!(
///     registry.register(0x0026, "PADDING", decode_opaque, encode_opaque)
///         .expect_err("Error expected"),
///     StunErrorType::DuplicateType
/// );
///```
#[derive(Debug, Default, Clone)]
pub struct AttributeRegistry(HashMap<AttributeType, AttributeDescriptor>);

impl AttributeRegistry {
    /// Creates a registry holding the same attribute families as the
    /// default registry.
    pub fn with_defaults() -> Result<Self, StunError> {
        let mut registry = AttributeRegistry::default();
        crate::attributes::stun::stun_register_attributes(&mut registry)?;

        #[cfg(feature = "discovery")]
        crate::attributes::discovery::discovery_register_attributes(
            &mut registry,
            crate::attributes::discovery::DiscoveryAddressEncoding::Plain,
        )?;

        Ok(registry)
    }

    /// Registers a new attribute type.
    /// # Arguments:
    /// - `attr_type` - The attribute type code.
    /// - `name` - Human-readable name used in logs and errors.
    /// - `decode` - Function that decodes the attribute value.
    /// - `encode` - Function that encodes the attribute value.
    /// # Returns:
    /// An error of type [`DuplicateType`](StunErrorType::DuplicateType) if the
    /// code is already registered.
    pub fn register<T>(
        &mut self,
        attr_type: T,
        name: &'static str,
        decode: DecoderHandler,
        encode: EncoderHandler,
    ) -> Result<(), StunError>
    where
        T: Into<AttributeType>,
    {
        self.register_descriptor(AttributeDescriptor::new(attr_type, name, decode, encode))
    }

    /// Registers the attribute type described by a typed attribute.
    pub fn register_attribute<A>(&mut self) -> Result<(), StunError>
    where
        A: AttributeCodec,
    {
        self.register_descriptor(A::DESCRIPTOR)
    }

    /// Registers an attribute type from its descriptor.
    pub fn register_descriptor(&mut self, descriptor: AttributeDescriptor) -> Result<(), StunError> {
        if let Some(registered) = self.0.get(&descriptor.attr_type) {
            return Err(StunError::new(
                StunErrorType::DuplicateType,
                format!(
                    "Can not register {} as {}, already registered as {}",
                    descriptor.attr_type, descriptor.name, registered.name
                ),
            ));
        }
        debug!(
            "Registered {} ({})",
            descriptor.attr_type, descriptor.name
        );
        self.0.insert(descriptor.attr_type, descriptor);
        Ok(())
    }

    /// Finds out how an attribute type must be handled.
    /// # Returns:
    /// [`Lookup::Known`] for registered types, [`Lookup::Opaque`] for
    /// unregistered comprehension-optional types and an error of type
    /// [`UnknownRequiredAttribute`](StunErrorType::UnknownRequiredAttribute)
    /// for unregistered comprehension-required types.
    pub fn lookup<T>(&self, attr_type: T) -> Result<Lookup<'_>, StunError>
    where
        T: Into<AttributeType>,
    {
        let attr_type = attr_type.into();
        match self.0.get(&attr_type) {
            Some(descriptor) => Ok(Lookup::Known(descriptor)),
            None if attr_type.is_comprehension_optional() => Ok(Lookup::Opaque),
            None => Err(StunError::new(
                StunErrorType::UnknownRequiredAttribute,
                format!("{} is not registered", attr_type),
            )),
        }
    }

    /// Returns the descriptor of a registered attribute type.
    pub fn get<T>(&self, attr_type: T) -> Option<&AttributeDescriptor>
    where
        T: Into<AttributeType>,
    {
        self.0.get(&attr_type.into())
    }

    /// Returns the name of a registered attribute type.
    pub fn name<T>(&self, attr_type: T) -> Option<&'static str>
    where
        T: Into<AttributeType>,
    {
        self.get(attr_type).map(|descriptor| descriptor.name)
    }

    /// Returns true if the attribute type is registered.
    pub fn contains<T>(&self, attr_type: T) -> bool
    where
        T: Into<AttributeType>,
    {
        self.0.contains_key(&attr_type.into())
    }

    /// Returns the number of registered attribute types.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no registered attribute types.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

lazy_static! {
    static ref REGISTRY: Arc<AttributeRegistry> = Arc::new(
        AttributeRegistry::with_defaults().expect("Built-in attribute types are unique")
    );
}

/// Returns the process-wide registry used by default encoders and decoders.
/// It is populated on first use and never modified afterwards.
pub fn default_registry() -> Arc<AttributeRegistry> {
    REGISTRY.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::codecs::{decode_opaque, encode_opaque};
    use crate::attributes::stun::AlternateServer;

    #[test]
    fn default_registry_content() {
        let registry = default_registry();
        assert!(registry.contains(0x0001)); // MAPPED-ADDRESS
        assert!(registry.contains(0x0006)); // USERNAME
        assert!(registry.contains(0x0008)); // MESSAGE-INTEGRITY
        assert!(registry.contains(0x0009)); // ERROR-CODE
        assert!(registry.contains(0x000A)); // UNKNOWN-ATTRIBUTES
        assert!(registry.contains(0x0014)); // REALM
        assert!(registry.contains(0x0015)); // NONCE
        assert!(registry.contains(0x0020)); // XOR-MAPPED-ADDRESS
        assert!(registry.contains(0x8022)); // SOFTWARE
        assert!(registry.contains(0x8023)); // ALTERNATE-SERVER
        assert!(registry.contains(0x8028)); // FINGERPRINT

        #[cfg(feature = "discovery")]
        {
            assert_eq!(registry.len(), 16);
            assert_eq!(registry.name(0x0003), Some("CHANGE-REQUEST"));
            assert_eq!(registry.name(0x0026), Some("PADDING"));
            assert_eq!(registry.name(0x0027), Some("RESPONSE-PORT"));
            assert_eq!(registry.name(0x802b), Some("RESPONSE-ORIGIN"));
            assert_eq!(registry.name(0x802c), Some("OTHER-ADDRESS"));
        }

        assert!(!registry.contains(0x0000)); // RESERVED
        assert!(!registry.contains(0xFFFF));
    }

    #[test]
    fn lookup() {
        let registry = default_registry();
        match registry.lookup(0x8022).expect("Can not look up SOFTWARE") {
            Lookup::Known(descriptor) => assert_eq!(descriptor.name(), "SOFTWARE"),
            Lookup::Opaque => panic!("SOFTWARE is registered"),
        }

        assert!(matches!(registry.lookup(0xFFFF), Ok(Lookup::Opaque)));
        assert_eq!(
            registry.lookup(0x7FFF).expect_err("Error expected"),
            StunErrorType::UnknownRequiredAttribute
        );
    }

    #[test]
    fn register() {
        let mut registry = AttributeRegistry::default();
        assert!(registry.is_empty());

        registry
            .register_attribute::<AlternateServer>()
            .expect("Can not register ALTERNATE-SERVER");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.name(0x8023), Some("ALTERNATE-SERVER"));

        // AlternateServer is already registered
        assert_eq!(
            registry
                .register_attribute::<AlternateServer>()
                .expect_err("Error expected"),
            StunErrorType::DuplicateType
        );
        assert_eq!(
            registry
                .register(0x8023, "OTHER", decode_opaque, encode_opaque)
                .expect_err("Error expected"),
            StunErrorType::DuplicateType
        );
        // First registration wins
        assert_eq!(registry.name(0x8023), Some("ALTERNATE-SERVER"));

        registry
            .register(0x7001, "PRIVATE", decode_opaque, encode_opaque)
            .expect("Can not register attribute");
        assert!(matches!(registry.lookup(0x7001), Ok(Lookup::Known(_))));
        let _val = format!("{:?}", registry.get(0x7001));
    }
}
