use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use stun_nat::attributes::codecs::{decode_opaque, encode_opaque};
use stun_nat::attributes::discovery::ChangeRequestFlags::*;
use stun_nat::attributes::discovery::{
    discovery_register_attributes, ChangeRequest, DiscoveryAddressEncoding, OtherAddress, Padding,
    ResponseOrigin, ResponsePort,
};
use stun_nat::attributes::stun::{
    stun_register_attributes, ErrorCode, MappedAddress, Software, UnknownAttributes, UserName,
    XorMappedAddress,
};
use stun_nat::error::StunErrorLevel;
use stun_nat::methods::BINDING;
use stun_nat::{
    AddressAttribute, AttributeRegistry, AttributeType, AttributeValue, MessageClass,
    MessageDecoderBuilder, MessageEncoderBuilder, StunAttribute, StunAttributeType,
    StunDecodeError, StunErrorType, StunMessageBuilder, TransactionId, MESSAGE_HEADER_SIZE,
};

const RAW: [u8; 12] = [0x11; 12];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn attribute_position(error: &StunDecodeError) -> Option<(Option<AttributeType>, usize)> {
    match &error.0 {
        StunErrorLevel::Attribute(e) => Some((e.attr_type, e.position)),
        StunErrorLevel::Message(_) => None,
    }
}

#[test]
fn test_discovery_attributes_request() {
    init_logging();

    let msg = StunMessageBuilder::new(BINDING, MessageClass::Request)
        .with_transaction_id(TransactionId::from(RAW))
        .with_attribute(Software::from("STUN test"))
        .with_attribute(ChangeRequest::new(Some(ChangePort.into())))
        .with_attribute(ResponsePort::from(5000))
        .with_attribute(Padding::with_size(13))
        .build();

    let encoder = MessageEncoderBuilder::default().build();
    let buffer = encoder.encode(&msg).expect("Failed to encode message");
    // 20 header + 16 software + 8 change request + 8 response port + 20 padding
    assert_eq!(buffer.len(), 72);

    let decoder = MessageDecoderBuilder::default().build();
    let (decoded, size) = decoder.decode(&buffer).expect("Failed to decode message");
    assert_eq!(size, buffer.len());
    assert_eq!(decoded, msg);

    let attr = decoded
        .get::<ChangeRequest>()
        .expect("CHANGE-REQUEST not found");
    let change_request = attr.as_change_request().expect("Not a CHANGE-REQUEST");
    assert!(change_request.change_port());
    assert!(!change_request.change_ip());
}

#[test]
fn test_discovery_attributes_response() {
    init_logging();

    let mapped = SocketAddr::new(
        IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)),
        40000,
    );
    let origin = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1)), 3478);
    let other = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(198, 51, 100, 2)), 3479);

    let msg = StunMessageBuilder::new(BINDING, MessageClass::SuccessResponse)
        .with_transaction_id(TransactionId::from(RAW))
        .with_attribute(MappedAddress::from(mapped))
        .with_attribute(XorMappedAddress::from(mapped))
        .with_attribute(ResponseOrigin::from(origin))
        .with_attribute(OtherAddress::from(other))
        .build();

    let buffer = stun_nat::encode(&msg).expect("Failed to encode message");
    assert_eq!(buffer.len(), MESSAGE_HEADER_SIZE + 24 + 24 + 12 + 12);

    let (decoded, _) = stun_nat::decode(&buffer).expect("Failed to decode message");
    assert_eq!(decoded, msg);

    let attr = decoded.get::<MappedAddress>().expect("MAPPED-ADDRESS not found");
    assert!(!attr.expect_address().is_xored());
    let attr = decoded
        .get::<XorMappedAddress>()
        .expect("XOR-MAPPED-ADDRESS not found");
    assert!(attr.expect_address().is_xored());
    assert_eq!(attr.expect_address().socket_address(), &mapped);

    // Both address attributes carry the same address but only one travels in clear
    assert_eq!(&buffer[24..28], [0x00, 0x02, 0x9c, 0x40]);
    assert_ne!(&buffer[48..52], [0x00, 0x02, 0x9c, 0x40]);
}

#[test]
fn test_truncated_messages() {
    init_logging();

    let msg = StunMessageBuilder::new(BINDING, MessageClass::Request)
        .with_attribute(ChangeRequest::new(Some(ChangeIp | ChangePort)))
        .with_attribute(UserName::from("user"))
        .build();
    let buffer = stun_nat::encode(&msg).expect("Failed to encode message");

    for k in 0..buffer.len() {
        let error = stun_nat::decode(&buffer[..k]).expect_err("Error expected");
        assert_eq!(error, StunErrorType::TruncatedData, "prefix of {} bytes", k);
    }

    // Bytes after the declared length are not consumed
    let mut extended = buffer.clone();
    extended.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    let (decoded, size) = stun_nat::decode(&extended).expect("Failed to decode message");
    assert_eq!(size, buffer.len());
    assert_eq!(decoded, msg);
}

#[test]
fn test_header_errors() {
    let msg = StunMessageBuilder::new(BINDING, MessageClass::Indication).build();
    let buffer = stun_nat::encode(&msg).expect("Failed to encode message");
    assert_eq!(buffer.len(), MESSAGE_HEADER_SIZE);

    let mut wrong_cookie = buffer.clone();
    wrong_cookie[4] = 0x22;
    assert_eq!(
        stun_nat::decode(&wrong_cookie).expect_err("Error expected"),
        StunErrorType::BadMagicCookie
    );

    let mut wrong_type = buffer.clone();
    wrong_type[0] |= 0x80;
    assert_eq!(
        stun_nat::decode(&wrong_type).expect_err("Error expected"),
        StunErrorType::InvalidParam
    );

    let mut wrong_length = buffer;
    wrong_length[3] = 0x02;
    wrong_length.extend_from_slice(&[0x00, 0x00]);
    assert_eq!(
        stun_nat::decode(&wrong_length).expect_err("Error expected"),
        StunErrorType::MalformedAttribute
    );
}

#[test]
fn test_unknown_attributes() {
    init_logging();

    let mut buffer = vec![
        0x00, 0x01, 0x00, 0x10, // Request type and message length
        0x21, 0x12, 0xa4, 0x42, // Magic cookie
        0x11, 0x11, 0x11, 0x11, // }
        0x11, 0x11, 0x11, 0x11, // }  Transaction ID
        0x11, 0x11, 0x11, 0x11, // }
        0x00, 0x27, 0x00, 0x04, // RESPONSE-PORT attribute header
        0x12, 0x34, 0x00, 0x00, // Port and reserved bytes
        0xff, 0xff, 0x00, 0x02, // Unknown comprehension-optional attribute
        0x01, 0x02, 0x00, 0x00, // Value and padding
    ];

    let (msg, size) = stun_nat::decode(&buffer).expect("Failed to decode message");
    assert_eq!(size, 36);
    let attributes = msg.attributes();
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[1].attribute_type(), AttributeType::from(0xffff));
    assert_eq!(attributes[1].value(), &AttributeValue::Opaque(vec![0x01, 0x02]));

    // Opaque attributes are written back as they came
    assert_eq!(stun_nat::encode(&msg).expect("Failed to encode message"), buffer);

    // Any other value would not be decoded as it was given
    let attr = StunAttribute::new(0xffff, AttributeValue::Padding(vec![0x01, 0x02]));
    let msg = StunMessageBuilder::new(BINDING, MessageClass::Request)
        .with_attribute(attr)
        .build();
    assert_eq!(
        stun_nat::encode(&msg).expect_err("Error expected"),
        StunErrorType::MalformedAttribute
    );

    // Same message with a comprehension-required type
    buffer[28] = 0x7f;
    let error = stun_nat::decode(&buffer).expect_err("Error expected");
    assert_eq!(error, StunErrorType::UnknownRequiredAttribute);
    assert_eq!(
        attribute_position(&error),
        Some((Some(AttributeType::from(0x7fff)), 1))
    );

    let attr = StunAttribute::new(0x7fff, AttributeValue::Opaque(vec![0x01]));
    let msg = StunMessageBuilder::new(BINDING, MessageClass::Request)
        .with_attribute(attr)
        .build();
    assert_eq!(
        stun_nat::encode(&msg).expect_err("Error expected"),
        StunErrorType::UnknownRequiredAttribute
    );
}

#[test]
fn test_attribute_errors() {
    init_logging();

    // Attribute longer than the message
    let buffer = [
        0x00, 0x01, 0x00, 0x08, // Request type and message length
        0x21, 0x12, 0xa4, 0x42, // Magic cookie
        0x11, 0x11, 0x11, 0x11, // }
        0x11, 0x11, 0x11, 0x11, // }  Transaction ID
        0x11, 0x11, 0x11, 0x11, // }
        0x80, 0x22, 0x00, 0x08, // SOFTWARE attribute header
        0x74, 0x65, 0x73, 0x74, // Only 4 bytes of value
    ];
    let error = stun_nat::decode(&buffer).expect_err("Error expected");
    assert_eq!(error, StunErrorType::AttributeOverrun);
    assert_eq!(attribute_position(&error), Some((None, 0)));

    // Unknown address family
    let buffer = [
        0x01, 0x01, 0x00, 0x14, // Response type and message length
        0x21, 0x12, 0xa4, 0x42, // Magic cookie
        0x11, 0x11, 0x11, 0x11, // }
        0x11, 0x11, 0x11, 0x11, // }  Transaction ID
        0x11, 0x11, 0x11, 0x11, // }
        0x00, 0x03, 0x00, 0x04, // CHANGE-REQUEST attribute header
        0x00, 0x00, 0x00, 0x00, // No flags
        0x80, 0x2b, 0x00, 0x08, // RESPONSE-ORIGIN attribute header
        0x00, 0x03, 0x0d, 0x96, // Family 0x03
        0xc0, 0x00, 0x02, 0x0a, // IPv4 address
    ];
    let error = stun_nat::decode(&buffer).expect_err("Error expected");
    assert_eq!(error, StunErrorType::UnknownAddressFamily);
    assert_eq!(
        attribute_position(&error),
        Some((Some(AttributeType::from(0x802b)), 1))
    );

    // IPv4 family with the length of an IPv6 address
    let buffer = [
        0x01, 0x01, 0x00, 0x18, // Response type and message length
        0x21, 0x12, 0xa4, 0x42, // Magic cookie
        0x11, 0x11, 0x11, 0x11, // }
        0x11, 0x11, 0x11, 0x11, // }  Transaction ID
        0x11, 0x11, 0x11, 0x11, // }
        0x80, 0x2c, 0x00, 0x14, // OTHER-ADDRESS attribute header
        0x00, 0x01, 0x0d, 0x97, // Family IPv4 and port
        0xc0, 0x00, 0x02, 0x0b, // }
        0x00, 0x00, 0x00, 0x00, // }  20 bytes of value
        0x00, 0x00, 0x00, 0x00, // }
        0x00, 0x00, 0x00, 0x00, // }
    ];
    assert_eq!(
        stun_nat::decode(&buffer).expect_err("Error expected"),
        StunErrorType::MalformedAttribute
    );

    // CHANGE-REQUEST shorter than 4 bytes
    let buffer = [
        0x00, 0x01, 0x00, 0x08, // Request type and message length
        0x21, 0x12, 0xa4, 0x42, // Magic cookie
        0x11, 0x11, 0x11, 0x11, // }
        0x11, 0x11, 0x11, 0x11, // }  Transaction ID
        0x11, 0x11, 0x11, 0x11, // }
        0x00, 0x03, 0x00, 0x02, // CHANGE-REQUEST attribute header
        0x00, 0x06, 0x00, 0x00, // Value and padding
    ];
    assert_eq!(
        stun_nat::decode(&buffer).expect_err("Error expected"),
        StunErrorType::MalformedAttribute
    );
}

#[test]
fn test_change_request_flags() {
    for (flags, change_ip, change_port) in [
        (0x00u8, false, false),
        (0x02, false, true),
        (0x04, true, false),
        (0x06, true, true),
    ] {
        let buffer = [
            0x00, 0x01, 0x00, 0x08, // Request type and message length
            0x21, 0x12, 0xa4, 0x42, // Magic cookie
            0x11, 0x11, 0x11, 0x11, // }
            0x11, 0x11, 0x11, 0x11, // }  Transaction ID
            0x11, 0x11, 0x11, 0x11, // }
            0x00, 0x03, 0x00, 0x04, // CHANGE-REQUEST attribute header
            0x00, 0x00, 0x00, flags, // Flags
        ];
        let (msg, _) = stun_nat::decode(&buffer).expect("Failed to decode message");
        let attr = msg.get::<ChangeRequest>().expect("CHANGE-REQUEST not found");
        let change_request = attr.expect_change_request();
        assert_eq!(change_request.change_ip(), change_ip);
        assert_eq!(change_request.change_port(), change_port);
    }
}

#[test]
fn test_padding_invariant() {
    for size in 0..9 {
        let msg = StunMessageBuilder::new(BINDING, MessageClass::Request)
            .with_attribute(Padding::with_size(size))
            .build();
        let buffer = stun_nat::encode(&msg).expect("Failed to encode message");
        assert_eq!(buffer.len() % 4, 0);

        let declared = u16::from_be_bytes([buffer[2], buffer[3]]) as usize;
        assert_eq!(declared, buffer.len() - MESSAGE_HEADER_SIZE);

        let attr_len = u16::from_be_bytes([buffer[22], buffer[23]]) as usize;
        assert_eq!(attr_len, size);
        assert!(buffer[24 + size..].iter().all(|b| *b == 0x00));
    }
}

#[test]
fn test_error_response() {
    let msg = StunMessageBuilder::new(BINDING, MessageClass::ErrorResponse)
        .with_attribute(ErrorCode::with_code(420, "Unknown Attribute").expect("Bad error code"))
        .with_attribute(UnknownAttributes::with_types([0x7fffu16]))
        .build();
    let buffer = stun_nat::encode(&msg).expect("Failed to encode message");
    let (decoded, _) = stun_nat::decode(&buffer).expect("Failed to decode message");
    assert_eq!(decoded.class(), MessageClass::ErrorResponse);

    let attr = decoded.get::<ErrorCode>().expect("ERROR-CODE not found");
    let error = ErrorCode::try_from(attr).expect("Can not get ERROR-CODE");
    assert_eq!(error.code(), Ok(420));
    assert_eq!(error.reason(), Ok("Unknown Attribute"));

    let attr = decoded
        .get::<UnknownAttributes>()
        .expect("UNKNOWN-ATTRIBUTES not found");
    let unknown = UnknownAttributes::try_from(attr).expect("Can not get UNKNOWN-ATTRIBUTES");
    assert_eq!(unknown.types(), vec![AttributeType::from(0x7fff)]);
}

#[test]
fn test_custom_registry() {
    init_logging();

    let mut registry = AttributeRegistry::default();
    stun_register_attributes(&mut registry).expect("Can not register STUN attributes");
    registry
        .register(0x0030, "PRIVATE", decode_opaque, encode_opaque)
        .expect("Can not register PRIVATE");
    let registry = Arc::new(registry);

    let msg = StunMessageBuilder::new(BINDING, MessageClass::Request)
        .with_attribute(StunAttribute::new(
            0x0030,
            AttributeValue::Opaque(vec![0x01, 0x02, 0x03]),
        ))
        .build();

    // The default registry does not know the private attribute
    assert_eq!(
        stun_nat::encode(&msg).expect_err("Error expected"),
        StunErrorType::UnknownRequiredAttribute
    );

    let encoder = MessageEncoderBuilder::default()
        .with_registry(registry.clone())
        .build();
    let buffer = encoder.encode(&msg).expect("Failed to encode message");
    assert_eq!(buffer.len(), MESSAGE_HEADER_SIZE + 8);

    let decoder = MessageDecoderBuilder::default()
        .with_registry(registry.clone())
        .build();
    let (decoded, _) = decoder.decode(&buffer).expect("Failed to decode message");
    assert_eq!(decoded, msg);

    // Discovery attributes are not part of this registry
    let msg = StunMessageBuilder::new(BINDING, MessageClass::Request)
        .with_attribute(ChangeRequest::new(None))
        .build();
    let buffer = stun_nat::encode(&msg).expect("Failed to encode message");
    assert_eq!(
        decoder.decode(&buffer).expect_err("Error expected"),
        StunErrorType::UnknownRequiredAttribute
    );
    assert_eq!(decoder.registry().len(), 12);
}

#[test]
fn test_address_wire_form() {
    init_logging();

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 32853);
    let transaction_id = TransactionId::from(RAW);
    let message = |attr_type: AttributeType, value: AddressAttribute| {
        StunMessageBuilder::new(BINDING, MessageClass::SuccessResponse)
            .with_transaction_id(transaction_id)
            .with_attribute(StunAttribute::new(attr_type, AttributeValue::Address(value)))
            .build()
    };

    // RESPONSE-ORIGIN travels in plain form in the default registry
    let msg = message(ResponseOrigin::get_type(), AddressAttribute::xored(addr));
    assert_eq!(
        stun_nat::encode(&msg).expect_err("Error expected"),
        StunErrorType::MalformedAttribute
    );
    let msg = message(XorMappedAddress::get_type(), AddressAttribute::new(addr));
    assert_eq!(
        stun_nat::encode(&msg).expect_err("Error expected"),
        StunErrorType::MalformedAttribute
    );

    let msg = message(ResponseOrigin::get_type(), AddressAttribute::new(addr));
    let buffer = stun_nat::encode(&msg).expect("Failed to encode message");
    let (decoded, _) = stun_nat::decode(&buffer).expect("Failed to decode message");
    assert_eq!(decoded, msg);

    // Registered XOR obfuscated, the plain value is the one rejected
    let mut registry = AttributeRegistry::default();
    stun_register_attributes(&mut registry).expect("Can not register STUN attributes");
    discovery_register_attributes(&mut registry, DiscoveryAddressEncoding::Xored)
        .expect("Can not register discovery attributes");
    let registry = Arc::new(registry);
    let encoder = MessageEncoderBuilder::default()
        .with_registry(registry.clone())
        .build();
    let decoder = MessageDecoderBuilder::default()
        .with_registry(registry)
        .build();

    assert_eq!(
        encoder.encode(&msg).expect_err("Error expected"),
        StunErrorType::MalformedAttribute
    );
    let msg = message(OtherAddress::get_type(), AddressAttribute::xored(addr));
    let buffer = encoder.encode(&msg).expect("Failed to encode message");
    let (decoded, _) = decoder.decode(&buffer).expect("Failed to decode message");
    assert_eq!(decoded, msg);
}
