use crate::attributes::address_port::address_port_attribute;

const OTHER_ADDRESS: u16 = 0x802c;

address_port_attribute!(
    /// The other address attribute is used in Binding Responses.  It informs
    /// the client of the source IP address and port that would be used if
    /// the client requested the "change IP" and "change port" behavior.
    ///
    /// # Examples
    ///```rust
    /// # use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    /// # use stun_nat::attributes::discovery::OtherAddress;
    /// let attr = OtherAddress::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 11)), 3479);
    ///
    /// assert_eq!(attr.socket_address().port(), 3479);
    /// assert!(attr.socket_address().is_ipv4());
    ///```
    OtherAddress,
    OTHER_ADDRESS,
    "OTHER-ADDRESS",
    xored: false
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeType, StunAttribute};
    use crate::error::StunErrorType;
    use std::net::{IpAddr, Ipv6Addr, SocketAddr};

    #[test]
    fn other_address_stunt_attribute() {
        let socket = SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 3479);
        let attr = StunAttribute::from(OtherAddress::from(socket));
        assert_eq!(attr.attribute_type(), AttributeType::from(0x802c));
        assert!(attr.is_address());
        assert!(attr.as_change_request().is_err());

        let other = OtherAddress::try_from(&attr).expect("Can not get OTHER-ADDRESS");
        assert_eq!(other.as_ref(), &socket);

        // Same layout, different type
        let attr = StunAttribute::from(crate::attributes::discovery::ResponseOrigin::from(socket));
        assert_eq!(
            OtherAddress::try_from(&attr).expect_err("Error expected"),
            StunErrorType::InvalidParam
        );
    }
}
