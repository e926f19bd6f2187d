use stun_nat::attributes::stun::{Fingerprint, MessageIntegrity};
use stun_nat::{
    MessageClass, MessageMethod, StunAttribute, StunAttributeType, StunMessage, StunMessageBuilder,
    TransactionId,
};

/// Collection of the attributes of a message being built. Each attribute
/// type appears once; adding an attribute of a type already present
/// replaces it. [`MessageIntegrity`] and [`Fingerprint`] are kept at the
/// end of the message, in that order, no matter when they were added.
#[derive(Debug, Default, Clone)]
pub struct StunAttributes {
    attributes: Vec<StunAttribute>,
    integrity: Option<StunAttribute>,
    fingerprint: Option<StunAttribute>,
}

impl StunAttributes {
    /// Adds a STUN attribute to the collection. If the attribute is already present,
    /// it will be replaced.
    pub fn add<T>(&mut self, attribute: T)
    where
        T: Into<StunAttribute>,
    {
        let attr = attribute.into();

        if attr.attribute_type() == MessageIntegrity::get_type() {
            self.integrity = Some(attr);
        } else if attr.attribute_type() == Fingerprint::get_type() {
            self.fingerprint = Some(attr);
        } else if let Some(index) = self
            .attributes
            .iter()
            .position(|a| a.attribute_type() == attr.attribute_type())
        {
            self.attributes[index] = attr;
        } else {
            self.attributes.push(attr);
        }
    }

    /// Removes a STUN attribute from the collection.
    /// # Returns
    /// The removed attribute if it was present.
    pub fn remove<T>(&mut self) -> Option<StunAttribute>
    where
        T: StunAttributeType,
    {
        if T::get_type() == MessageIntegrity::get_type() {
            return self.integrity.take();
        }
        if T::get_type() == Fingerprint::get_type() {
            return self.fingerprint.take();
        }
        self.attributes
            .iter()
            .position(|a| a.attribute_type() == T::get_type())
            .map(|index| self.attributes.remove(index))
    }

    /// Returns the number of attributes in the collection
    pub fn len(&self) -> usize {
        self.attributes.len()
            + usize::from(self.integrity.is_some())
            + usize::from(self.fingerprint.is_some())
    }

    /// Returns true if the collection has no attributes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<StunAttributes> for Vec<StunAttribute> {
    fn from(val: StunAttributes) -> Self {
        let mut attributes = val.attributes;
        attributes.extend(val.integrity);
        attributes.extend(val.fingerprint);
        attributes
    }
}

/// Builds a message with the attributes in the collection. A random
/// transaction ID is used if none is provided.
pub fn create_stun_message(
    method: MessageMethod,
    class: MessageClass,
    transaction_id: Option<TransactionId>,
    attributes: StunAttributes,
) -> StunMessage {
    let mut builder = StunMessageBuilder::new(method, class);
    if let Some(transaction_id) = transaction_id {
        builder = builder.with_transaction_id(transaction_id);
    }

    let attributes: Vec<StunAttribute> = attributes.into();
    for attr in attributes {
        builder = builder.with_attribute(attr);
    }

    builder.build()
}

#[cfg(test)]
mod stun_message_tests {
    use super::*;
    use stun_nat::attributes::discovery::{ChangeRequest, ChangeRequestFlags, ResponsePort};
    use stun_nat::attributes::stun::{ErrorCode, Nonce, Realm, Software, UserName};
    use stun_nat::methods::BINDING;

    #[test]
    fn test_add_stun_attribute() {
        let mut attributes = StunAttributes::default();

        attributes.add(UserName::from("test-username-1"));
        attributes.add(UserName::from("test-username-2"));
        attributes.add(Software::from("test-software-1"));
        attributes.add(Software::from("test-software-2"));
        assert_eq!(attributes.len(), 2);

        let mut iter = attributes.attributes.iter();
        let attr = iter.next().expect("Expected attribute UserName");
        let username = UserName::try_from(attr).expect("Can not get UserName");
        assert_eq!(username.as_str(), Ok("test-username-2"));

        let attr = iter.next().expect("Expected attribute Software");
        let software = Software::try_from(attr).expect("Can not get Software");
        assert_eq!(software.as_str(), Ok("test-software-2"));

        assert!(iter.next().is_none());
    }

    #[test]
    fn test_remove_stun_attribute() {
        let mut attributes = StunAttributes::default();

        attributes.add(UserName::from("test-username-1"));
        attributes.add(Software::from("test-software-1"));

        let attr = attributes
            .remove::<UserName>()
            .expect("Expected attribute UserName");
        assert_eq!(attr.attribute_type(), UserName::get_type());
        assert!(attributes.remove::<ErrorCode>().is_none());
        assert_eq!(attributes.len(), 1);

        let mut attributes = StunAttributes::default();
        attributes.add(MessageIntegrity::new([0x2b; 20]));
        attributes.add(Fingerprint::new([0xc0, 0x7d, 0x4c, 0x96]));
        attributes.add(ChangeRequest::new(Some(ChangeRequestFlags::ChangePort.into())));
        attributes.add(ResponsePort::from(4660));
        attributes.add(ErrorCode::with_code(420, "Unknown Attribute").expect("Invalid error"));

        assert!(attributes.remove::<MessageIntegrity>().is_some());
        assert!(attributes.remove::<Fingerprint>().is_some());
        assert!(attributes.remove::<ChangeRequest>().is_some());
        assert!(attributes.remove::<ResponsePort>().is_some());
        assert!(attributes.remove::<ErrorCode>().is_some());
        assert!(attributes.remove::<ErrorCode>().is_none());

        assert!(attributes.is_empty());
    }

    #[test]
    fn test_stun_attribute_position() {
        let mut attributes = StunAttributes::default();
        attributes.add(MessageIntegrity::new([0x2b; 20]));
        attributes.add(UserName::from("test-username"));
        attributes.add(Fingerprint::new([0xc0, 0x7d, 0x4c, 0x96]));
        attributes.add(Realm::from("test-realm"));
        attributes.add(Nonce::from("test-nonce"));

        let vector: Vec<StunAttribute> = Vec::from(attributes);
        let types: Vec<u16> = vector
            .iter()
            .map(|attr| attr.attribute_type().as_u16())
            .collect();
        assert_eq!(types, [0x0006, 0x0014, 0x0015, 0x0008, 0x8028]);
    }

    #[test]
    fn test_create_stun_message() {
        let transaction_id = TransactionId::default();

        let mut attributes = StunAttributes::default();
        attributes.add(Fingerprint::new([0xc0, 0x7d, 0x4c, 0x96]));
        attributes.add(Software::from("test-software-1"));
        attributes.add(ResponsePort::from(4660));
        attributes.add(Software::from("test-software-2"));

        let message = create_stun_message(
            BINDING,
            MessageClass::Request,
            Some(transaction_id),
            attributes,
        );

        assert_eq!(message.method(), BINDING);
        assert_eq!(message.class(), MessageClass::Request);
        assert_eq!(message.transaction_id(), &transaction_id);

        let attributes = message.attributes();
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes[0].attribute_type(), Software::get_type());
        assert_eq!(attributes[0].expect_opaque().as_slice(), b"test-software-2");
        assert_eq!(attributes[1].expect_response_port().port(), 4660);
        assert_eq!(attributes[2].attribute_type(), Fingerprint::get_type());
    }
}
