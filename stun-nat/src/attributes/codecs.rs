//! Decode and encode functions for every attribute value layout.
//!
//! These are the functions registered in an
//! [`AttributeRegistry`](crate::AttributeRegistry). Custom attribute types
//! that reuse one of the layouts can register them directly. Encoders fail
//! with [`MalformedAttribute`](StunErrorType::MalformedAttribute) when given
//! a value of another layout.

use crate::attributes::discovery::{ChangeRequest, ResponsePort};
use crate::attributes::{AddressAttribute, AttributeValue};
use crate::context::{AttributeDecoderContext, AttributeEncoderContext};
use crate::error::{StunError, StunErrorType};

fn layout_mismatch(expected: &str, value: &AttributeValue) -> StunError {
    StunError::new(
        StunErrorType::MalformedAttribute,
        format!("Expected {} value, found {}", expected, value.kind()),
    )
}

/// Keeps the value bytes verbatim.
pub fn decode_opaque(ctx: &AttributeDecoderContext) -> Result<AttributeValue, StunError> {
    Ok(AttributeValue::Opaque(ctx.raw_value().to_vec()))
}

/// Writes opaque bytes verbatim.
pub fn encode_opaque(
    value: &AttributeValue,
    ctx: &mut AttributeEncoderContext,
) -> Result<usize, StunError> {
    match value {
        AttributeValue::Opaque(_) => value.encode(ctx),
        _ => Err(layout_mismatch("Opaque", value)),
    }
}

/// Keeps the padding bytes verbatim.
pub fn decode_padding(ctx: &AttributeDecoderContext) -> Result<AttributeValue, StunError> {
    Ok(AttributeValue::Padding(ctx.raw_value().to_vec()))
}

/// Writes padding bytes verbatim.
pub fn encode_padding(
    value: &AttributeValue,
    ctx: &mut AttributeEncoderContext,
) -> Result<usize, StunError> {
    match value {
        AttributeValue::Padding(_) => value.encode(ctx),
        _ => Err(layout_mismatch("Padding", value)),
    }
}

/// Decodes an address sent in plain form.
pub fn decode_address(ctx: &AttributeDecoderContext) -> Result<AttributeValue, StunError> {
    Ok(AttributeValue::Address(AddressAttribute::decode(ctx, false)?))
}

/// Decodes an address sent XOR obfuscated with the magic cookie and the
/// transaction ID of the message.
pub fn decode_xor_address(ctx: &AttributeDecoderContext) -> Result<AttributeValue, StunError> {
    Ok(AttributeValue::Address(AddressAttribute::decode(ctx, true)?))
}

fn encode_address_as(
    value: &AttributeValue,
    ctx: &mut AttributeEncoderContext,
    xored: bool,
) -> Result<usize, StunError> {
    match value {
        AttributeValue::Address(addr) if addr.is_xored() == xored => value.encode(ctx),
        AttributeValue::Address(_) => Err(StunError::new(
            StunErrorType::MalformedAttribute,
            if xored {
                "Plain address given to an attribute sent XOR obfuscated"
            } else {
                "XOR obfuscated address given to an attribute sent in plain form"
            },
        )),
        _ => Err(layout_mismatch("Address", value)),
    }
}

/// Encodes an address in plain form. Values flagged as XOR obfuscated are
/// rejected, they would be decoded as a different address.
pub fn encode_address(
    value: &AttributeValue,
    ctx: &mut AttributeEncoderContext,
) -> Result<usize, StunError> {
    encode_address_as(value, ctx, false)
}

/// Encodes an address XOR obfuscated with the magic cookie and the
/// transaction ID of the message. Plain values are rejected.
pub fn encode_xor_address(
    value: &AttributeValue,
    ctx: &mut AttributeEncoderContext,
) -> Result<usize, StunError> {
    encode_address_as(value, ctx, true)
}

/// Decodes the 32-bit flags word of a CHANGE-REQUEST. Reserved bits are
/// kept as received.
pub fn decode_change_request(ctx: &AttributeDecoderContext) -> Result<AttributeValue, StunError> {
    let mut cursor = ctx.cursor();
    let flags = cursor.read_u32()?;
    Ok(AttributeValue::ChangeRequest(ChangeRequest::from(flags)))
}

/// Encodes the flags word of a CHANGE-REQUEST.
pub fn encode_change_request(
    value: &AttributeValue,
    ctx: &mut AttributeEncoderContext,
) -> Result<usize, StunError> {
    match value {
        AttributeValue::ChangeRequest(_) => value.encode(ctx),
        _ => Err(layout_mismatch("ChangeRequest", value)),
    }
}

/// Decodes a 16-bit port. The two bytes that follow it are reserved and
/// ignored whatever their content.
pub fn decode_response_port(ctx: &AttributeDecoderContext) -> Result<AttributeValue, StunError> {
    let mut cursor = ctx.cursor();
    let port = cursor.read_u16()?;
    cursor.skip(2)?;
    Ok(AttributeValue::ResponsePort(ResponsePort::from(port)))
}

/// Encodes a port followed by two zeroed reserved bytes.
pub fn encode_response_port(
    value: &AttributeValue,
    ctx: &mut AttributeEncoderContext,
) -> Result<usize, StunError> {
    match value {
        AttributeValue::ResponsePort(_) => value.encode(ctx),
        _ => Err(layout_mismatch("ResponsePort", value)),
    }
}
