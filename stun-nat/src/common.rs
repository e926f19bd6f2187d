use crate::types::{Cookie, MAGIC_COOKIE_SIZE, TRANSACTION_ID_SIZE};
use crate::TransactionId;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_PADDING_VALUE: u8 = 0x00;

/// Number of zero bytes that align a value of `value_size` bytes to a
/// 32-bit boundary.
pub fn padding(value_size: usize) -> usize {
    (4 - (value_size & 3)) & 3
}

/// Applies the XOR obfuscation used by address attributes. The port is
/// XORed with the most significant 16 bits of the cookie, IPv4 addresses
/// with the cookie, and IPv6 addresses with the cookie followed by the
/// transaction ID. The transform is its own inverse.
pub fn socket_addr_xor(
    addr: &SocketAddr,
    cookie: Cookie,
    transaction_id: &TransactionId,
) -> SocketAddr {
    let xor_port = addr.port() ^ (cookie.as_u32() >> 16) as u16;
    let cookie = cookie.to_bytes();
    match addr.ip() {
        IpAddr::V4(ip) => {
            let mut octets = ip.octets();
            for (b, k) in octets.iter_mut().zip(cookie.iter()) {
                *b ^= k;
            }
            SocketAddr::new(IpAddr::from(octets), xor_port)
        }
        IpAddr::V6(ip) => {
            let mut key = [0u8; MAGIC_COOKIE_SIZE + TRANSACTION_ID_SIZE];
            key[..MAGIC_COOKIE_SIZE].copy_from_slice(&cookie);
            key[MAGIC_COOKIE_SIZE..].copy_from_slice(transaction_id.as_bytes());
            let mut octets = ip.octets();
            for (b, k) in octets.iter_mut().zip(key.iter()) {
                *b ^= k;
            }
            SocketAddr::new(IpAddr::from(octets), xor_port)
        }
    }
}

// Creates a STUN attribute whose value is kept as raw bytes.
macro_rules! opaque_attribute {
    (
        $(#[$meta:meta])*
        $class_name:ident,
        $attr_type:ident,
        $name:literal,
    ) => (
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $class_name(Vec<u8>);

        impl $class_name {
            /// Creates a new attribute.
            pub fn new<T>(value: T) -> Self
            where
                T: Into<Vec<u8>>,
            {
                Self(value.into())
            }

            /// Returns the raw value of this attribute.
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl AsRef<[u8]> for $class_name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<$class_name> for crate::attributes::StunAttribute {
            fn from(value: $class_name) -> Self {
                crate::attributes::StunAttribute::new(
                    $attr_type,
                    crate::attributes::AttributeValue::Opaque(value.0),
                )
            }
        }

        impl TryFrom<&crate::attributes::StunAttribute> for $class_name {
            type Error = crate::StunError;

            fn try_from(attr: &crate::attributes::StunAttribute) -> Result<Self, Self::Error> {
                use crate::attributes::StunAttributeType;
                attr.expect_type($class_name::get_type())?;
                Ok(Self(attr.as_opaque()?.clone()))
            }
        }

        crate::attributes::stunt_attribute!(
            $class_name,
            $attr_type,
            $name,
            crate::attributes::codecs::decode_opaque,
            crate::attributes::codecs::encode_opaque
        );
    );
    (
        $(#[$meta:meta])*
        $class_name:ident,
        $attr_type:ident,
        $name:literal,
        text,
    ) => (
        crate::common::opaque_attribute!(
            $(#[$meta])*
            $class_name,
            $attr_type,
            $name,
        );

        impl $class_name {
            /// Returns the value as UTF-8 text.
            pub fn as_str(&self) -> Result<&str, crate::StunError> {
                Ok(std::str::from_utf8(&self.0)?)
            }
        }

        impl From<&str> for $class_name {
            fn from(value: &str) -> Self {
                Self(value.as_bytes().to_vec())
            }
        }
    );
}
pub(crate) use opaque_attribute;

#[cfg(test)]
mod tests {
    use crate::common::*;
    use crate::MAGIC_COOKIE;
    use std::str::FromStr;

    #[test]
    fn test_padding() {
        // Check all u16 range
        for i in 0..u16::MAX {
            let v = i % 4;
            let v = if v == 0 { 0 } else { 4 - v };
            assert_eq!(padding(i.into()), v as usize);
        }
    }

    #[test]
    fn xor_ipv4() {
        let transaction_id = TransactionId::from([
            0xB7, 0xE7, 0xA7, 0x01, 0xBC, 0x34, 0xD6, 0x86, 0xFA, 0x87, 0xDF, 0xAE,
        ]);
        let addr = SocketAddr::from_str("192.0.2.1:32853").expect("Can not parse SocketAddr");
        let xored = socket_addr_xor(&addr, MAGIC_COOKIE, &transaction_id);
        assert_eq!(xored.port(), 0xA147);
        assert_eq!(xored.ip(), IpAddr::from([0xE1, 0x12, 0xA6, 0x43]));

        // Applying the transform twice gives back the original address
        assert_eq!(socket_addr_xor(&xored, MAGIC_COOKIE, &transaction_id), addr);
    }

    #[test]
    fn xor_ipv6() {
        let transaction_id = TransactionId::from([
            0xB7, 0xE7, 0xA7, 0x01, 0xBC, 0x34, 0xD6, 0x86, 0xFA, 0x87, 0xDF, 0xAE,
        ]);
        let addr = SocketAddr::from_str("[2001:db8:1234:5678:11:2233:4455:6677]:32853")
            .expect("Can not parse SocketAddr");
        let xored = socket_addr_xor(&addr, MAGIC_COOKIE, &transaction_id);
        assert_eq!(xored.port(), 0xA147);
        assert_eq!(
            xored.ip(),
            IpAddr::from([
                0x01, 0x13, 0xA9, 0xFA, 0xA5, 0xD3, 0xF1, 0x79, 0xBC, 0x25, 0xF4, 0xB5, 0xBE,
                0xD2, 0xB9, 0xD9
            ])
        );
        assert_eq!(socket_addr_xor(&xored, MAGIC_COOKIE, &transaction_id), addr);
    }
}
