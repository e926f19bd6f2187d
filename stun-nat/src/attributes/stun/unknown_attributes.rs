use crate::attributes::AttributeType;
use byteorder::{BigEndian, ByteOrder};

const UNKNOWN_ATTRIBUTES: u16 = 0x000A;

crate::common::opaque_attribute!(
    /// The [`UnknownAttributes`] attribute is present only in an error
    /// response when the response code in the ERROR-CODE attribute is 420.
    /// It lists the comprehension-required attributes that were not
    /// understood, as 16-bit values.
    /// # Examples
    ///```rust
    /// # use stun_nat::AttributeType;
    /// # use stun_nat::attributes::stun::UnknownAttributes;
    /// let attr = UnknownAttributes::with_types([0x7fff, 0x0030]);
    /// assert_eq!(
    ///     attr.types(),
    ///     vec![AttributeType::new(0x7fff), AttributeType::new(0x0030)]
    /// );
    ///```
    UnknownAttributes,
    UNKNOWN_ATTRIBUTES,
    "UNKNOWN-ATTRIBUTES",
);

impl UnknownAttributes {
    /// Creates the attribute from the list of attribute types.
    pub fn with_types<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AttributeType>,
    {
        let mut value = Vec::new();
        for attr_type in types {
            let mut buf = [0u8; 2];
            BigEndian::write_u16(&mut buf, attr_type.into().as_u16());
            value.extend_from_slice(&buf);
        }
        Self(value)
    }

    /// Returns the attribute types listed. A trailing odd byte is ignored.
    pub fn types(&self) -> Vec<AttributeType> {
        self.0
            .chunks_exact(2)
            .map(|chunk| AttributeType::from(BigEndian::read_u16(chunk)))
            .collect()
    }
}
