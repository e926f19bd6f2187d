//! Sans I/O building blocks for STUN agents.
//!
//! This crate pairs the responses a STUN agent receives with the requests
//! it sent. No sockets or timers are owned here: callers feed buffers and
//! instants in, and collect buffers and timeouts out.
//!
//! * [`Correlator`](correlator::Correlator) keeps the table of in-flight
//!   transactions. It can be shared across threads.
//! * [`StunClient`](client::StunClient) is an event driven client that
//!   encodes requests, retransmits them over unreliable transports and
//!   matches the responses.

use bytes::Bytes;
use log::debug;
use std::fmt;
use stun_nat::error::{StunDecodeError, StunEncodeError};
use stun_nat::{MessageHeader, MESSAGE_HEADER_SIZE};

pub mod client;
pub mod correlator;
pub mod events;
pub mod message;

mod timeout;

pub use crate::correlator::CorrelatorError;

/// Errors returned by the STUN agents
#[derive(Debug)]
pub enum StunAgentError {
    /// The buffer could not be decoded
    DecodeError(StunDecodeError),
    /// The message could not be encoded
    EncodeError(StunEncodeError),
    /// The message could not be paired with a transaction
    CorrelatorError(CorrelatorError),
    /// The message was valid but it was not expected by the agent
    Discarded,
    /// The buffer does not start with a STUN header
    StunCheckFailed,
    /// Internal error
    InternalError(String),
}

impl fmt::Display for StunAgentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StunAgentError::DecodeError(e) => write!(f, "{}", e),
            StunAgentError::EncodeError(e) => write!(f, "{}", e),
            StunAgentError::CorrelatorError(e) => write!(f, "{}", e),
            StunAgentError::Discarded => write!(f, "message discarded"),
            StunAgentError::StunCheckFailed => write!(f, "not a STUN message"),
            StunAgentError::InternalError(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for StunAgentError {}

impl From<StunDecodeError> for StunAgentError {
    fn from(e: StunDecodeError) -> Self {
        StunAgentError::DecodeError(e)
    }
}

impl From<StunEncodeError> for StunAgentError {
    fn from(e: StunEncodeError) -> Self {
        StunAgentError::EncodeError(e)
    }
}

impl From<CorrelatorError> for StunAgentError {
    fn from(e: CorrelatorError) -> Self {
        StunAgentError::CorrelatorError(e)
    }
}

// Cheap checks done before decoding: a STUN header with the two most
// significant bits set to zero and the magic cookie.
pub(crate) fn validate_stunt_header(buffer: &Bytes) -> Result<(), StunAgentError> {
    if buffer.len() < MESSAGE_HEADER_SIZE {
        debug!("Buffer is too small to contain a STUN message header.");
        return Err(StunAgentError::StunCheckFailed);
    }

    MessageHeader::decode(buffer).map_err(|e| {
        debug!("Invalid STUN message header: {}", e);
        StunAgentError::StunCheckFailed
    })?;

    Ok(())
}
