use crate::attributes::{codecs, AttributeType, StunAttribute};
use crate::common::{padding, DEFAULT_PADDING_VALUE};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{
    StunAttributeError, StunDecodeError, StunEncodeError, StunError, StunErrorLevel,
    StunMessageError,
};
use crate::raw::{RawAttribute, RawAttributes, RawMessage, MESSAGE_HEADER_SIZE};
use crate::registry::{default_registry, AttributeRegistry, Lookup};
use crate::types::{Cookie, MAGIC_COOKIE};
use crate::{MessageType, StunMessage, StunMessageBuilder, TransactionId};
use fallible_iterator::{FallibleIterator, IntoFallibleIterator};
use log::{debug, trace};
use std::sync::Arc;

fn message_error(error: StunError) -> StunErrorLevel {
    StunErrorLevel::Message(StunMessageError(error))
}

fn attribute_error(
    attr_type: Option<AttributeType>,
    position: usize,
) -> impl FnOnce(StunError) -> StunErrorLevel {
    move |error| {
        StunErrorLevel::Attribute(StunAttributeError {
            attr_type,
            position,
            error,
        })
    }
}

/// Data available to the function decoding an attribute value.
#[derive(Debug, Clone, Copy)]
pub struct AttributeDecoderContext<'a> {
    buffer: &'a [u8],
    offset: usize,
    length: usize,
    cookie: Cookie,
    transaction_id: &'a TransactionId,
}

impl<'a> AttributeDecoderContext<'a> {
    /// Creates a new context.
    /// # Arguments:
    /// - `buffer` - The buffer holding the attribute.
    /// - `offset` - Offset of the attribute value within `buffer`.
    /// - `length` - Declared length of the value.
    /// - `cookie` - Magic cookie of the enclosing message.
    /// - `transaction_id` - Transaction ID of the enclosing message.
    pub fn new(
        buffer: &'a [u8],
        offset: usize,
        length: usize,
        cookie: Cookie,
        transaction_id: &'a TransactionId,
    ) -> Self {
        Self {
            buffer,
            offset,
            length,
            cookie,
            transaction_id,
        }
    }

    /// Returns the buffer holding the attribute.
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Returns the offset of the value within the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the declared length of the value.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the value bytes, without padding.
    pub fn raw_value(&self) -> &'a [u8] {
        self.buffer
            .get(self.offset..self.offset + self.length)
            .unwrap_or_default()
    }

    /// Returns a cursor over the value bytes.
    pub fn cursor(&self) -> ReadCursor<'a> {
        ReadCursor::new(self.raw_value())
    }

    /// Returns the magic cookie of the enclosing message.
    pub fn cookie(&self) -> Cookie {
        self.cookie
    }

    /// Returns the transaction ID of the enclosing message.
    pub fn transaction_id(&self) -> &'a TransactionId {
        self.transaction_id
    }
}

/// Data available to the function encoding an attribute value.
#[derive(Debug)]
pub struct AttributeEncoderContext<'a> {
    cursor: &'a mut WriteCursor,
    cookie: Cookie,
    transaction_id: &'a TransactionId,
}

impl<'a> AttributeEncoderContext<'a> {
    /// Creates a new context writing to `cursor`.
    pub fn new(
        cursor: &'a mut WriteCursor,
        cookie: Cookie,
        transaction_id: &'a TransactionId,
    ) -> Self {
        Self {
            cursor,
            cookie,
            transaction_id,
        }
    }

    /// Returns the cursor where the value must be written.
    pub fn cursor(&mut self) -> &mut WriteCursor {
        self.cursor
    }

    /// Returns the magic cookie of the enclosing message.
    pub fn cookie(&self) -> Cookie {
        self.cookie
    }

    /// Returns the transaction ID of the enclosing message.
    pub fn transaction_id(&self) -> &'a TransactionId {
        self.transaction_id
    }
}

/// Builder class used to create a stun [`MessageDecoder`]
#[derive(Debug, Default)]
pub struct MessageDecoderBuilder(MessageDecoder);

impl MessageDecoderBuilder {
    /// Decodes attributes using `registry` instead of the default one.
    pub fn with_registry(mut self, registry: Arc<AttributeRegistry>) -> Self {
        self.0.registry = registry;
        self
    }

    /// Builds a [`MessageDecoder`]
    pub fn build(self) -> MessageDecoder {
        self.0
    }
}

/// Class used to decode STUN messages
#[derive(Debug, Clone)]
pub struct MessageDecoder {
    registry: Arc<AttributeRegistry>,
}

impl Default for MessageDecoder {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}

impl MessageDecoder {
    /// Decodes the STUN raw buffer
    /// # Arguments:
    /// - `buffer` - Raw buffer containing the STUN message
    /// # Returns:
    /// A tuple with [`StunMessage`] itself and the size consumed to decode the message,
    /// or an error describing the problem if the message could not be decoded.
    /// Bytes after the length declared in the header are not consumed.
    pub fn decode(&self, buffer: &[u8]) -> Result<(StunMessage, usize), StunDecodeError> {
        trace!("Reading header of {} bytes buffer", buffer.len());
        let (raw_msg, size) =
            RawMessage::decode(buffer).map_err(|error| StunDecodeError(message_error(error)))?;
        let msg_type = MessageType::from(raw_msg.header.msg_type);
        let transaction_id = raw_msg.header.transaction_id;
        let mut builder = StunMessageBuilder::new(msg_type.method(), msg_type.class())
            .with_transaction_id(transaction_id);

        trace!(
            "Reading {} bytes of attributes, {}",
            raw_msg.attributes.len(),
            transaction_id
        );
        let mut iter = RawAttributes::from(raw_msg.attributes).into_fallible_iter();
        let mut position = 0;

        while let Some(raw_attr) = iter
            .next()
            .map_err(|error| StunDecodeError(attribute_error(None, position)(error)))?
        {
            let attr_type = AttributeType::from(raw_attr.attr_type);
            let ctx = AttributeDecoderContext::new(
                raw_msg.attributes,
                raw_attr.offset,
                raw_attr.value.len(),
                raw_msg.header.cookie,
                &transaction_id,
            );
            let attr = self
                .decode_attribute(attr_type, &raw_attr, &ctx)
                .map_err(|error| StunDecodeError(attribute_error(Some(attr_type), position)(error)))?;
            builder = builder.with_attribute(attr);
            position += 1;
        }

        trace!("Decoded {} attributes, {} bytes", position, size);
        Ok((builder.build(), size))
    }

    fn decode_attribute(
        &self,
        attr_type: AttributeType,
        raw_attr: &RawAttribute,
        ctx: &AttributeDecoderContext,
    ) -> Result<StunAttribute, StunError> {
        let value = match self.registry.lookup(attr_type)? {
            Lookup::Known(descriptor) => {
                trace!(
                    "Decoding {} ({}), length {}",
                    attr_type,
                    descriptor.name(),
                    raw_attr.value.len()
                );
                crate::attributes::decode_with(ctx, descriptor.decoder())?
            }
            Lookup::Opaque => {
                debug!(
                    "Keeping unknown comprehension-optional {} as opaque",
                    attr_type
                );
                codecs::decode_opaque(ctx)?
            }
        };
        Ok(StunAttribute::new(attr_type, value))
    }

    /// Returns the registry used to decode attributes
    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }
}

/// Builder class used to create a stun [`MessageEncoder`]
#[derive(Debug, Default)]
pub struct MessageEncoderBuilder(MessageEncoder);

impl MessageEncoderBuilder {
    /// Encodes attributes using `registry` instead of the default one.
    pub fn with_registry(mut self, registry: Arc<AttributeRegistry>) -> Self {
        self.0.registry = registry;
        self
    }

    /// Builds a [`MessageEncoder`]
    pub fn build(self) -> MessageEncoder {
        self.0
    }
}

/// Class used to encode STUN messages
#[derive(Debug, Clone)]
pub struct MessageEncoder {
    registry: Arc<AttributeRegistry>,
}

impl Default for MessageEncoder {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}

impl MessageEncoder {
    /// Encodes a STUN message.
    /// # Arguments:
    /// - `msg` - The STUN message.
    /// # Returns:
    /// The encoded message or a [`StunEncodeError`] describing the error if
    /// the message could not be encoded. The length field of the header
    /// counts the attribute bytes, padding included.
    pub fn encode(&self, msg: &StunMessage) -> Result<Vec<u8>, StunEncodeError> {
        let mut cursor = WriteCursor::with_capacity(MESSAGE_HEADER_SIZE);
        self.encode_header(&mut cursor, msg)
            .map_err(|error| StunEncodeError(message_error(error)))?;

        for (position, attr) in msg.attributes().iter().enumerate() {
            self.encode_attribute(&mut cursor, msg.transaction_id(), attr)
                .map_err(|error| {
                    StunEncodeError(attribute_error(Some(attr.attribute_type()), position)(error))
                })?;
        }

        let length = u16::try_from(cursor.position() - MESSAGE_HEADER_SIZE)
            .map_err(|error| StunEncodeError(message_error(error.into())))?;
        cursor
            .patch_u16(2, length)
            .map_err(|error| StunEncodeError(message_error(error)))?;

        trace!(
            "Encoded {} attributes, {} bytes, {}",
            msg.attributes().len(),
            cursor.position(),
            msg.transaction_id()
        );
        Ok(cursor.into_inner())
    }

    fn encode_header(&self, cursor: &mut WriteCursor, msg: &StunMessage) -> Result<(), StunError> {
        cursor.write_u16(msg.message_type().as_u16())?;
        // Length is back-filled once attributes are written
        cursor.write_u16(0)?;
        cursor.write_u32(MAGIC_COOKIE.as_u32())?;
        cursor.write_bytes(msg.transaction_id().as_bytes())?;
        Ok(())
    }

    fn encode_attribute(
        &self,
        cursor: &mut WriteCursor,
        transaction_id: &TransactionId,
        attr: &StunAttribute,
    ) -> Result<(), StunError> {
        let attr_type = attr.attribute_type();
        let lookup = self.registry.lookup(attr_type)?;

        cursor.write_u16(attr_type.as_u16())?;
        let length_index = cursor.position();
        cursor.write_u16(0)?;

        let value_index = cursor.position();
        let mut ctx = AttributeEncoderContext::new(cursor, MAGIC_COOKIE, transaction_id);
        match lookup {
            Lookup::Known(descriptor) => (descriptor.encoder())(attr.value(), &mut ctx)?,
            // Read back as opaque bytes, so only opaque values are accepted
            Lookup::Opaque => codecs::encode_opaque(attr.value(), &mut ctx)?,
        };

        let value_size = cursor.position() - value_index;
        cursor.patch_u16(length_index, u16::try_from(value_size)?)?;

        let padding_size = padding(value_size);
        for _ in 0..padding_size {
            cursor.write_u8(DEFAULT_PADDING_VALUE)?;
        }

        Ok(())
    }

    /// Returns the registry used to encode attributes
    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }
}
