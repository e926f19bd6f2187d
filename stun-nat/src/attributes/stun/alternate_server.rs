use crate::attributes::address_port::address_port_attribute;

const ALTERNATE_SERVER: u16 = 0x8023;

address_port_attribute!(
    /// The alternate server represents an alternate transport address
    /// identifying a different STUN server that the STUN client should try.
    ///
    /// # Examples
    ///```rust
    /// # use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    /// # use stun_nat::attributes::stun::AlternateServer;
    /// let socket = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);
    /// let attr = AlternateServer::from(socket);
    ///
    /// let socket = attr.socket_address();
    /// assert_eq!(socket.port(), 8080);
    /// assert_eq!(socket.is_ipv4(), true);
    ///```
    AlternateServer,
    ALTERNATE_SERVER,
    "ALTERNATE-SERVER",
    xored: false
);
