//! Dispatch from a message header to the matching decoder.

use std::fmt;

use codec::{CodecError, CodecLimits, CodecResult};
use schema::MessageDescriptor;
use wire::{MessageHeader, HEADER_SIZE};

use crate::barrier::{self, Barrier, BarrierDecoder};
use crate::dynamic_map::{self, DynamicMap, DynamicMapDecoder};
use crate::message::{self, Message, MessageDecoder};
use crate::SCHEMA_ID;

/// A decoder for any message of this schema, chosen from the header.
#[derive(Debug, Clone)]
pub enum AnyDecoder<'a> {
    Message(MessageDecoder<'a>),
    Barrier(BarrierDecoder<'a>),
    DynamicMap(DynamicMapDecoder<'a>),
}

impl<'a> AnyDecoder<'a> {
    /// Descriptor of the wrapped message.
    #[must_use]
    pub const fn descriptor(&self) -> &'static MessageDescriptor {
        match self {
            Self::Message(_) => &message::DESCRIPTOR,
            Self::Barrier(_) => &barrier::DESCRIPTOR,
            Self::DynamicMap(_) => &dynamic_map::DESCRIPTOR,
        }
    }

    #[must_use]
    pub const fn template_id(&self) -> u16 {
        self.descriptor().template_id
    }

    /// Bytes consumed so far, counted from the block start.
    #[must_use]
    pub const fn encoded_length(&self) -> usize {
        match self {
            Self::Message(d) => d.encoded_length(),
            Self::Barrier(d) => d.encoded_length(),
            Self::DynamicMap(d) => d.encoded_length(),
        }
    }

    /// Decodes the rest of the message into an owned value.
    ///
    /// Reads from the current cursor, so call it on a fresh decoder.
    pub fn read_message(&mut self) -> CodecResult<AnyMessage> {
        match self {
            Self::Message(d) => Message::read(d).map(AnyMessage::Message),
            Self::Barrier(d) => Barrier::read(d).map(AnyMessage::Barrier),
            Self::DynamicMap(d) => DynamicMap::read(d).map(AnyMessage::DynamicMap),
        }
    }
}

impl fmt::Display for AnyDecoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(d) => fmt::Display::fmt(d, f),
            Self::Barrier(d) => fmt::Display::fmt(d, f),
            Self::DynamicMap(d) => fmt::Display::fmt(d, f),
        }
    }
}

/// An owned message of this schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyMessage {
    Message(Message),
    Barrier(Barrier),
    DynamicMap(DynamicMap),
}

impl AnyMessage {
    #[must_use]
    pub const fn descriptor(&self) -> &'static MessageDescriptor {
        match self {
            Self::Message(_) => &message::DESCRIPTOR,
            Self::Barrier(_) => &barrier::DESCRIPTOR,
            Self::DynamicMap(_) => &dynamic_map::DESCRIPTOR,
        }
    }

    /// Encodes header and body at `offset` and returns the bytes written.
    pub fn encode(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        match self {
            Self::Message(m) => m.encode_with_header(buf, offset),
            Self::Barrier(m) => m.encode_with_header(buf, offset),
            Self::DynamicMap(m) => m.encode_with_header(buf, offset),
        }
    }

    /// Exact length of header plus body.
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        HEADER_SIZE
            + match self {
                Self::Message(m) => m.encoded_length(),
                Self::Barrier(m) => m.encoded_length(),
                Self::DynamicMap(m) => m.encoded_length(),
            }
    }
}

impl From<Message> for AnyMessage {
    fn from(value: Message) -> Self {
        Self::Message(value)
    }
}

impl From<Barrier> for AnyMessage {
    fn from(value: Barrier) -> Self {
        Self::Barrier(value)
    }
}

impl From<DynamicMap> for AnyMessage {
    fn from(value: DynamicMap) -> Self {
        Self::DynamicMap(value)
    }
}

/// Reads the header at `offset` and wraps the body with the matching
/// decoder.
///
/// The header's block length and version become the decoder's acting
/// values, so bodies from newer or older senders of the same schema decode.
pub fn decode_any<'a>(
    buf: &'a [u8],
    offset: usize,
    wire_limits: &wire::Limits,
    limits: &CodecLimits,
) -> CodecResult<(MessageHeader, AnyDecoder<'a>)> {
    let (header, decoder) =
        codec::MessageDecoder::wrap_with_header(buf, offset, wire_limits, limits)?;
    if header.schema_id != SCHEMA_ID {
        tracing::debug!(
            schema_id = header.schema_id,
            expected = SCHEMA_ID,
            "rejecting message: foreign schema"
        );
        return Err(CodecError::SchemaMismatch {
            expected: SCHEMA_ID,
            found: header.schema_id,
        });
    }
    let decoder = match header.template_id {
        message::TEMPLATE_ID => AnyDecoder::Message(MessageDecoder::from_decoder(decoder)),
        barrier::TEMPLATE_ID => AnyDecoder::Barrier(BarrierDecoder::from_decoder(decoder)),
        dynamic_map::TEMPLATE_ID => {
            AnyDecoder::DynamicMap(DynamicMapDecoder::from_decoder(decoder))
        }
        template_id => {
            tracing::debug!(template_id, "rejecting message: unknown template");
            return Err(CodecError::UnknownTemplate { template_id });
        }
    };
    tracing::trace!(
        template_id = header.template_id,
        block_length = header.block_length,
        version = header.version,
        "dispatched message"
    );
    Ok((header, decoder))
}

/// Decodes one whole message at `offset`. Returns it with the bytes
/// consumed, header included.
pub fn decode_any_message(
    buf: &[u8],
    offset: usize,
    wire_limits: &wire::Limits,
    limits: &CodecLimits,
) -> CodecResult<(AnyMessage, usize)> {
    let (_, mut decoder) = decode_any(buf, offset, wire_limits, limits)?;
    let message = decoder.read_message()?;
    let consumed = HEADER_SIZE + decoder.encoded_length();
    wire_limits.check_message_bytes(consumed)?;
    Ok((message, consumed))
}
