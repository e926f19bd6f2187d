//! Events produced by the sans I/O agents.

use bytes::Bytes;
use std::time::Duration;
use stun_nat::{StunMessage, TransactionId};

/// Output of a [`StunClient`](crate::client::StunClient). Events are
/// collected with [`events`](crate::client::StunClient::events) after each
/// call into the client.
#[derive(Debug)]
pub enum StunClientEvent {
    /// Buffer that must be sent to the server
    OutputBuffer(Bytes),
    /// The client must call [`on_timeout`](crate::client::StunClient::on_timeout)
    /// once this time elapses. Each event replaces the previous one.
    TransactionTimeout((TransactionId, Duration)),
    /// The transaction ended without a response
    TransactionFailed((TransactionId, StunTransactionError)),
    /// A response matched the transaction
    TransactionFinished(StunMessage),
}

/// Reason a transaction failed
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StunTransactionError {
    /// No response arrived before the transaction timeout
    TimedOut,
    /// The request to retransmit is no longer available
    NotFound,
}
