//! Transaction correlator.
//!
//! Pairs the responses received by an agent with the requests it sent.
//! Every request is tracked from the moment it is submitted until a
//! response is matched or its timeout elapses. Responses that cannot be
//! paired are counted and discarded; they never abort the agent.
//!
//! # Examples
//!```rust
//! # use std::time::{Duration, Instant};
//! # use stun_nat::{MessageClass, StunMessageBuilder};
//! # use stun_nat::methods::BINDING;
//! # use stun_nat_agent::correlator::{CorrelatorBuilder, TransactionState};
//! let correlator = CorrelatorBuilder::default()
//!     .with_timeout(Duration::from_secs(5))
//!     .build();
//!
//! let now = Instant::now();
//! let request = StunMessageBuilder::new(BINDING, MessageClass::Request).build();
//! correlator.submit_request(&request, now).expect("Can not submit request");
//!
//! let response = StunMessageBuilder::new(BINDING, MessageClass::SuccessResponse)
//!     .with_transaction_id(*request.transaction_id())
//!     .build();
//! let transaction = correlator
//!     .correlate(&response, now + Duration::from_millis(20))
//!     .expect("Response not expected");
//! assert_eq!(transaction.state(), TransactionState::Matched);
//!
//! // A response is matched only once
//! assert!(correlator.correlate(&response, now).is_err());
//! assert_eq!(correlator.unsolicited_count(), 1);
//!```

use crate::timeout::{DeadlineQueue, RtoSchedule};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use stun_nat::{MessageClass, MessageMethod, StunMessage, TransactionId};

/// Errors reported by the [`Correlator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelatorError {
    /// A transaction with the same ID is still waiting for its response
    DuplicateTransaction(TransactionId),
    /// The response does not belong to any transaction waiting for one
    UnsolicitedResponse(TransactionId),
    /// Only responses can be correlated
    NotAResponse(MessageClass),
    /// Only requests can be submitted
    NotARequest(MessageClass),
}

impl fmt::Display for CorrelatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CorrelatorError::DuplicateTransaction(id) => {
                write!(f, "duplicate transaction {}", id)
            }
            CorrelatorError::UnsolicitedResponse(id) => {
                write!(f, "unsolicited response {}", id)
            }
            CorrelatorError::NotAResponse(class) => {
                write!(f, "{:?} is not a response", class)
            }
            CorrelatorError::NotARequest(class) => {
                write!(f, "{:?} is not a request", class)
            }
        }
    }
}

impl std::error::Error for CorrelatorError {}

/// State of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    /// Waiting for a response
    Waiting,
    /// A response was matched
    Matched,
    /// No response arrived before the timeout
    Expired,
}

/// A request sent by the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    transaction_id: TransactionId,
    method: MessageMethod,
    submitted_at: Instant,
    state: TransactionState,
}

impl PendingTransaction {
    /// Returns the transaction ID
    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    /// Returns the method of the request
    pub fn method(&self) -> MessageMethod {
        self.method
    }

    /// Returns the instant the request was submitted
    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    /// Returns the state of the transaction
    pub fn state(&self) -> TransactionState {
        self.state
    }

    fn is_expired(&self, timeout: Duration, instant: Instant) -> bool {
        self.submitted_at
            .checked_add(timeout)
            .is_some_and(|deadline| deadline <= instant)
    }
}

#[derive(Debug, Default)]
struct CorrelatorTable {
    pending: HashMap<TransactionId, PendingTransaction>,
    timeouts: DeadlineQueue,
    unsolicited: usize,
}

/// Builder class used to create a [`Correlator`]
#[derive(Debug)]
pub struct CorrelatorBuilder {
    timeout: Duration,
}

impl Default for CorrelatorBuilder {
    fn default() -> Self {
        // Rc=7 retransmissions starting at RTO=500 ms
        Self {
            timeout: RtoSchedule::default().total(),
        }
    }
}

impl CorrelatorBuilder {
    /// Sets how long a transaction waits for its response.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a [`Correlator`]
    pub fn build(self) -> Correlator {
        Correlator {
            timeout: self.timeout,
            table: Mutex::new(CorrelatorTable::default()),
        }
    }
}

/// Table of in-flight transactions. It can be shared between the threads
/// that send requests, receive responses and sweep expired transactions.
#[derive(Debug)]
pub struct Correlator {
    timeout: Duration,
    table: Mutex<CorrelatorTable>,
}

impl Default for Correlator {
    fn default() -> Self {
        CorrelatorBuilder::default().build()
    }
}

impl Correlator {
    fn table(&self) -> MutexGuard<'_, CorrelatorTable> {
        // The table is left consistent after every operation
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns how long a transaction waits for its response
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Starts tracking a transaction.
    /// # Arguments:
    /// - `transaction_id` - The transaction ID of the request.
    /// - `method` - The method of the request.
    /// - `instant` - The instant the request is sent.
    /// # Returns:
    /// [`CorrelatorError::DuplicateTransaction`] if a transaction with the
    /// same ID is still waiting for its response.
    pub fn submit(
        &self,
        transaction_id: TransactionId,
        method: MessageMethod,
        instant: Instant,
    ) -> Result<(), CorrelatorError> {
        let mut table = self.table();

        if let Some(previous) = table.pending.get(&transaction_id) {
            if !previous.is_expired(self.timeout, instant) {
                debug!("Transaction {} is already in flight", transaction_id);
                return Err(CorrelatorError::DuplicateTransaction(transaction_id));
            }
            info!(
                "Transaction {} expired before being reused",
                transaction_id
            );
            table.timeouts.remove(&transaction_id);
        }

        table.pending.insert(
            transaction_id,
            PendingTransaction {
                transaction_id,
                method,
                submitted_at: instant,
                state: TransactionState::Waiting,
            },
        );
        table.timeouts.add(instant, self.timeout, transaction_id);
        debug!(
            "Transaction {} submitted, {} in flight",
            transaction_id,
            table.pending.len()
        );
        Ok(())
    }

    /// Starts tracking the transaction of a request message.
    /// # Returns:
    /// [`CorrelatorError::NotARequest`] if the message is not a request, or
    /// the errors returned by [`submit`](Correlator::submit).
    pub fn submit_request(&self, msg: &StunMessage, instant: Instant) -> Result<(), CorrelatorError> {
        if msg.class() != MessageClass::Request {
            return Err(CorrelatorError::NotARequest(msg.class()));
        }
        self.submit(*msg.transaction_id(), msg.method(), instant)
    }

    /// Pairs a response with the transaction that is waiting for it.
    /// # Returns:
    /// The matched transaction, which is no longer tracked, or
    /// [`CorrelatorError::UnsolicitedResponse`] if no transaction is waiting
    /// for this response. Responses arriving after the transaction timed
    /// out are unsolicited as well; the transaction is reported by the next
    /// [`sweep`](Correlator::sweep).
    pub fn correlate(
        &self,
        msg: &StunMessage,
        instant: Instant,
    ) -> Result<PendingTransaction, CorrelatorError> {
        if !msg.class().is_response() {
            return Err(CorrelatorError::NotAResponse(msg.class()));
        }

        let transaction_id = *msg.transaction_id();
        let mut table = self.table();

        let waiting = match table.pending.get(&transaction_id) {
            Some(transaction) => !transaction.is_expired(self.timeout, instant),
            None => false,
        };

        if !waiting {
            table.unsolicited += 1;
            warn!(
                "Unsolicited response {:?} {}, {} discarded so far",
                msg.class(),
                transaction_id,
                table.unsolicited
            );
            return Err(CorrelatorError::UnsolicitedResponse(transaction_id));
        }

        table.timeouts.remove(&transaction_id);
        let mut transaction = table
            .pending
            .remove(&transaction_id)
            .ok_or(CorrelatorError::UnsolicitedResponse(transaction_id))?;
        transaction.state = TransactionState::Matched;
        debug!(
            "Transaction {} matched after {:?}",
            transaction_id,
            instant.saturating_duration_since(transaction.submitted_at)
        );
        Ok(transaction)
    }

    /// Expires the transactions that have waited longer than the timeout.
    /// # Returns:
    /// The expired transactions, which are no longer tracked.
    pub fn sweep(&self, instant: Instant) -> Vec<PendingTransaction> {
        let mut table = self.table();
        let expired_ids = table.timeouts.check(instant);

        let mut expired = Vec::with_capacity(expired_ids.len());
        for transaction_id in expired_ids {
            if let Some(mut transaction) = table.pending.remove(&transaction_id) {
                transaction.state = TransactionState::Expired;
                info!(
                    "Transaction {} expired after {:?}",
                    transaction_id, self.timeout
                );
                expired.push(transaction);
            }
        }
        expired
    }

    /// Returns the transaction that expires first and the time left until
    /// it does, zero if it already expired.
    pub fn next_timeout(&self, instant: Instant) -> Option<(TransactionId, Duration)> {
        self.table().timeouts.next_timeout(instant)
    }

    /// Returns the number of responses discarded because no transaction was
    /// waiting for them.
    pub fn unsolicited_count(&self) -> usize {
        self.table().unsolicited
    }

    /// Returns the number of transactions being tracked
    pub fn len(&self) -> usize {
        self.table().pending.len()
    }

    /// Returns true if no transaction is being tracked
    pub fn is_empty(&self) -> bool {
        self.table().pending.is_empty()
    }

    /// Returns true if the transaction is being tracked
    pub fn contains(&self, transaction_id: &TransactionId) -> bool {
        self.table().pending.contains_key(transaction_id)
    }
}
