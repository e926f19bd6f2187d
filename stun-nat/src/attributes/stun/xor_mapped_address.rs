use crate::attributes::address_port::address_port_attribute;

const XOR_MAPPED_ADDRESS: u16 = 0x0020;

address_port_attribute!(
    /// The `XorMappedAddress` attribute is identical to the
    /// [`MappedAddress`](crate::attributes::stun::MappedAddress)
    /// attribute, except that the reflexive transport address is
    /// obfuscated through the XOR function.
    ///
    /// # Examples
    ///```rust
    /// # use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    /// # use stun_nat::attributes::stun::XorMappedAddress;
    /// let socket = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);
    /// let attr = XorMappedAddress::from(socket);
    ///
    /// let socket = attr.socket_address();
    /// assert_eq!(socket.port(), 8080);
    /// assert_eq!(socket.is_ipv4(), true);
    ///```
    XorMappedAddress,
    XOR_MAPPED_ADDRESS,
    "XOR-MAPPED-ADDRESS",
    xored: true
);
