use crate::attributes::address_port::address_port_attribute;

const RESPONSE_ORIGIN: u16 = 0x802b;

address_port_attribute!(
    /// The response origin attribute is inserted by the server and indicates
    /// the source IP address and port the response was sent from.  It is
    /// useful for detecting double NAT configurations.  It is only present
    /// in Binding Responses.
    ///
    /// The address travels in plain form. Registries built with
    /// [`DiscoveryAddressEncoding::Xored`](crate::attributes::discovery::DiscoveryAddressEncoding)
    /// decode it XOR obfuscated instead.
    ///
    /// # Examples
    ///```rust
    /// # use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    /// # use stun_nat::attributes::discovery::ResponseOrigin;
    /// let socket = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);
    /// let attr = ResponseOrigin::from(socket);
    ///
    /// assert_eq!(attr.socket_address().port(), 8080);
    /// assert!(attr.socket_address().is_ipv4());
    ///```
    ResponseOrigin,
    RESPONSE_ORIGIN,
    "RESPONSE-ORIGIN",
    xored: false
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::StunAttribute;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    #[test]
    fn response_origin_stunt_attribute() {
        let socket = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);
        let attr = StunAttribute::from(ResponseOrigin::from(socket));
        assert!(attr.is_address());
        assert!(!attr.expect_address().is_xored());
        assert!(attr.as_padding().is_err());

        assert!(!attr.attribute_type().is_comprehension_required());
        assert!(attr.attribute_type().is_comprehension_optional());

        let origin = ResponseOrigin::try_from(&attr).expect("Can not get RESPONSE-ORIGIN");
        assert_eq!(origin.socket_address(), &socket);
    }
}
