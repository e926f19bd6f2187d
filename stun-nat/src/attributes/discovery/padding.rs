use crate::attributes::codecs::{decode_padding, encode_padding};
use crate::attributes::{stunt_attribute, AttributeValue, StunAttribute, StunAttributeType};
use crate::StunError;

const PADDING: u16 = 0x0026;

/// The padding attribute allows for the entire message to be padded to
/// force the STUN message to be divided into IP fragments.  This attribute
/// consists entirely of free-form content, the value of which does not
/// matter. Padding can be used in either Binding Requests or Binding
/// Responses.
///
/// # Examples
///```rust
/// # use stun_nat::attributes::discovery::Padding;
/// let attr = Padding::new("ABCDEFGHIJK...");
/// assert_eq!(attr.len(), 14);
///
/// // Filled with zeros up to a given size
/// let attr = Padding::with_size(1200);
/// assert_eq!(attr.as_bytes(), vec![0x00; 1200]);
///```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Padding(Vec<u8>);

impl Padding {
    /// Creates a new attribute
    pub fn new<T>(value: T) -> Self
    where
        T: AsRef<[u8]>,
    {
        Self(value.as_ref().to_vec())
    }

    /// Creates a padding attribute of `size` zero bytes
    pub fn with_size(size: usize) -> Self {
        Self(vec![0x00; size])
    }

    /// Returns the padding content
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of padding bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no padding bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Padding> for StunAttribute {
    fn from(value: Padding) -> Self {
        StunAttribute::new(PADDING, AttributeValue::Padding(value.0))
    }
}

impl TryFrom<&StunAttribute> for Padding {
    type Error = StunError;

    fn try_from(attr: &StunAttribute) -> Result<Self, Self::Error> {
        attr.expect_type(Padding::get_type())?;
        Ok(Padding::new(attr.as_padding()?))
    }
}

stunt_attribute!(Padding, PADDING, "PADDING", decode_padding, encode_padding);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_stunt_attribute() {
        let attr = StunAttribute::from(Padding::new("test"));
        assert!(attr.is_padding());
        assert!(attr.as_padding().is_ok());
        assert!(attr.as_opaque().is_err());

        assert!(attr.attribute_type().is_comprehension_required());
        assert!(!attr.attribute_type().is_comprehension_optional());

        let padding = Padding::try_from(&attr).expect("Can not get PADDING");
        assert_eq!(padding.as_bytes(), b"test");
        assert!(!padding.is_empty());
        assert!(Padding::default().is_empty());
    }
}
