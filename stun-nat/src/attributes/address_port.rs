use crate::common::socket_addr_xor;
use crate::context::{AttributeDecoderContext, AttributeEncoderContext};
use crate::error::{StunError, StunErrorType};
use crate::types::AddressFamily;
use std::net::{IpAddr, SocketAddr};

// Format of MAPPED-ADDRESS Attribute:
//	    0                   1                   2                   3
//      0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//     |0 0 0 0 0 0 0 0|    Family     |           Port                |
//     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//     |                                                               |
//     |                 Address (32 bits or 128 bits)                 |
//     |                                                               |
//     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

/// A transport address carried by an attribute. The `xored` flag tells
/// whether the address travels XOR obfuscated with the magic cookie and
/// the transaction ID, as XOR-MAPPED-ADDRESS does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressAttribute {
    addr: SocketAddr,
    xored: bool,
}

impl AddressAttribute {
    /// Creates an address sent in plain form.
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr, xored: false }
    }

    /// Creates an address sent XOR obfuscated.
    pub fn xored(addr: SocketAddr) -> Self {
        Self { addr, xored: true }
    }

    /// Returns the address in clear form, regardless of how it travels.
    pub fn socket_address(&self) -> &SocketAddr {
        &self.addr
    }

    /// Returns the address family.
    pub fn family(&self) -> AddressFamily {
        AddressFamily::from(&self.addr)
    }

    /// Returns true if the address is XOR obfuscated on the wire.
    pub fn is_xored(&self) -> bool {
        self.xored
    }

    pub(crate) fn decode(ctx: &AttributeDecoderContext, xored: bool) -> Result<Self, StunError> {
        let mut cursor = ctx.cursor();

        // The first 8 bits MUST be ignored by receivers
        cursor.skip(1)?;
        let family = AddressFamily::try_from(cursor.read_u8()?)?;
        let port = cursor.read_u16()?;

        let expected = 4 + family.address_size();
        if ctx.length() != expected {
            return Err(StunError::new(
                StunErrorType::MalformedAttribute,
                format!(
                    "{} address requires {} bytes, declared length: {}",
                    family,
                    expected,
                    ctx.length()
                ),
            ));
        }

        let ip = match family {
            AddressFamily::IPv4 => IpAddr::from(cursor.read_array::<4>()?),
            AddressFamily::IPv6 => IpAddr::from(cursor.read_array::<16>()?),
        };

        let addr = SocketAddr::new(ip, port);
        let addr = if xored {
            socket_addr_xor(&addr, ctx.cookie(), ctx.transaction_id())
        } else {
            addr
        };

        Ok(Self { addr, xored })
    }

    pub(crate) fn encode(&self, ctx: &mut AttributeEncoderContext) -> Result<usize, StunError> {
        let addr = if self.xored {
            socket_addr_xor(&self.addr, ctx.cookie(), ctx.transaction_id())
        } else {
            self.addr
        };
        let family = AddressFamily::from(&addr);

        let cursor = ctx.cursor();
        // The first 8 bits MUST be set to 0
        let mut size = cursor.write_u8(0x00)?;
        size += cursor.write_u8(family.as_u8())?;
        size += cursor.write_u16(addr.port())?;
        size += match addr.ip() {
            IpAddr::V4(ip) => cursor.write_bytes(&ip.octets())?,
            IpAddr::V6(ip) => cursor.write_bytes(&ip.octets())?,
        };

        Ok(size)
    }
}

impl From<SocketAddr> for AddressAttribute {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr)
    }
}

/// Creates a STUN attribute which contains a
/// [`SocketAddress`](std::net::SocketAddr) field.
macro_rules! address_port_attribute {
    (
        $(#[$meta:meta])*
        $class_name:ident,
        $attr_type:ident,
        $name:literal,
        xored: $xored:literal
    ) => (
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $class_name(std::net::SocketAddr);

        impl $class_name {
            /// Creates a new attribute.
            pub fn new(address: std::net::IpAddr, port: u16) -> Self {
                Self(std::net::SocketAddr::new(address, port))
            }

            /// Returns the [`SocketAddr`](std::net::SocketAddr) associated to this attribute.
            pub fn socket_address(&self) -> &std::net::SocketAddr {
                &self.0
            }
        }

        impl AsRef<std::net::SocketAddr> for $class_name {
            fn as_ref(&self) -> &std::net::SocketAddr {
                &self.0
            }
        }

        impl From<std::net::SocketAddr> for $class_name {
            fn from(addr: std::net::SocketAddr) -> Self {
                Self(addr)
            }
        }

        impl From<$class_name> for crate::attributes::StunAttribute {
            fn from(value: $class_name) -> Self {
                let addr = if $xored {
                    crate::attributes::AddressAttribute::xored(value.0)
                } else {
                    crate::attributes::AddressAttribute::new(value.0)
                };
                crate::attributes::StunAttribute::new(
                    $attr_type,
                    crate::attributes::AttributeValue::Address(addr),
                )
            }
        }

        impl TryFrom<&crate::attributes::StunAttribute> for $class_name {
            type Error = crate::StunError;

            fn try_from(attr: &crate::attributes::StunAttribute) -> Result<Self, Self::Error> {
                use crate::attributes::StunAttributeType;
                attr.expect_type($class_name::get_type())?;
                Ok(Self(*attr.as_address()?.socket_address()))
            }
        }

        crate::attributes::stunt_attribute!(
            $class_name,
            $attr_type,
            $name,
            if $xored {
                crate::attributes::codecs::decode_xor_address
            } else {
                crate::attributes::codecs::decode_address
            },
            if $xored {
                crate::attributes::codecs::encode_xor_address
            } else {
                crate::attributes::codecs::encode_address
            }
        );
    )
}
pub(crate) use address_port_attribute;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::WriteCursor;
    use crate::{TransactionId, MAGIC_COOKIE};
    use std::str::FromStr;

    const TRANSACTION_ID: [u8; 12] = [
        0xB7, 0xE7, 0xA7, 0x01, 0xBC, 0x34, 0xD6, 0x86, 0xFA, 0x87, 0xDF, 0xAE,
    ];

    fn decode(value: &[u8], xored: bool) -> Result<AddressAttribute, StunError> {
        let transaction_id = TransactionId::from(TRANSACTION_ID);
        let ctx = AttributeDecoderContext::new(value, 0, value.len(), MAGIC_COOKIE, &transaction_id);
        AddressAttribute::decode(&ctx, xored)
    }

    fn encode(attr: &AddressAttribute) -> Vec<u8> {
        let transaction_id = TransactionId::from(TRANSACTION_ID);
        let mut cursor = WriteCursor::default();
        let mut ctx = AttributeEncoderContext::new(&mut cursor, MAGIC_COOKIE, &transaction_id);
        let size = attr.encode(&mut ctx).expect("Can not encode address");
        assert_eq!(size, cursor.position());
        cursor.into_inner()
    }

    #[test]
    fn decode_ipv4() {
        // ADDRESS: 70.199.128.46, port:4604
        let buffer = [0x00, 0x01, 0x11, 0xfc, 0x46, 0xc7, 0x80, 0x2e];
        let attr = decode(&buffer, false).expect("Can not decode address");
        assert!(!attr.is_xored());
        assert_eq!(attr.family(), AddressFamily::IPv4);
        assert_eq!(attr.socket_address().to_string(), "70.199.128.46:4604");
        assert_eq!(encode(&attr), buffer);
    }

    #[test]
    fn decode_ipv6() {
        // ADDRESS: `1918:1716:1514:1312:1110:f0e:d0c:b0a`, port:4604
        let buffer = [
            0x00, 0x02, 0x11, 0xfc, 25u8, 24u8, 23u8, 22u8, 21u8, 20u8, 19u8, 18u8, 17u8, 16u8,
            15u8, 14u8, 13u8, 12u8, 11u8, 10u8,
        ];
        let attr = decode(&buffer, false).expect("Can not decode address");
        assert_eq!(attr.family(), AddressFamily::IPv6);
        assert_eq!(attr.socket_address().port(), 4604);
        assert_eq!(
            attr.socket_address().ip(),
            IpAddr::from_str("1918:1716:1514:1312:1110:f0e:d0c:b0a").expect("Invalid IP")
        );
        assert_eq!(encode(&attr), buffer);
    }

    #[test]
    fn decode_xored() {
        let buffer = [0x00, 0x01, 0xa1, 0x47, 0xe1, 0x12, 0xa6, 0x43];
        let attr = decode(&buffer, true).expect("Can not decode address");
        assert!(attr.is_xored());
        assert_eq!(
            attr.socket_address(),
            &SocketAddr::from_str("192.0.2.1:32853").expect("Can not parse SocketAddr")
        );
        assert_eq!(encode(&attr), buffer);

        // Same bytes read in plain form
        let attr = decode(&buffer, false).expect("Can not decode address");
        assert_eq!(attr.socket_address().to_string(), "225.18.166.67:41287");
    }

    #[test]
    fn decode_error() {
        // Unknown family
        let buffer = [0x00, 0x03, 0x11, 0xfc, 0x46, 0xc7, 0x80, 0x2e];
        assert_eq!(
            decode(&buffer, false).expect_err("Error expected"),
            StunErrorType::UnknownAddressFamily
        );

        // IPv4 with an IPv6 sized value
        let buffer = [
            0x00, 0x01, 0x11, 0xfc, 0x46, 0xc7, 0x80, 0x2e, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            decode(&buffer, false).expect_err("Error expected"),
            StunErrorType::MalformedAttribute
        );

        // IPv6 family with an IPv4 sized value
        let buffer = [0x00, 0x02, 0x11, 0xfc, 0x46, 0xc7, 0x80, 0x2e];
        assert_eq!(
            decode(&buffer, false).expect_err("Error expected"),
            StunErrorType::MalformedAttribute
        );

        // Not even the family and port
        let buffer = [0x00, 0x01, 0x11];
        assert_eq!(
            decode(&buffer, false).expect_err("Error expected"),
            StunErrorType::TruncatedData
        );
    }
}
