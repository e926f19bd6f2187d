//! Sans I/O STUN client.
//!
//! The client does not own sockets or timers. Each call returns right
//! away and leaves the work to do in a list of [`StunClientEvent`]: buffers
//! to send, the next time [`on_timeout`](StunClient::on_timeout) must be
//! called, and the outcome of the transactions.
//!
//! # Examples
//!```rust
//! # use bytes::Bytes;
//! # use std::net::SocketAddr;
//! # use std::time::{Duration, Instant};
//! # use stun_nat::attributes::stun::XorMappedAddress;
//! # use stun_nat::{MessageClass, StunMessageBuilder};
//! # use stun_nat::methods::BINDING;
//! # use stun_nat_agent::client::StunClientBuilder;
//! # use stun_nat_agent::events::StunClientEvent;
//! # use stun_nat_agent::message::StunAttributes;
//! let mut client = StunClientBuilder::default().build();
//! let now = Instant::now();
//!
//! let transaction_id = client
//!     .create_request(BINDING, StunAttributes::default(), now)
//!     .expect("Can not create request");
//!
//! let events = client.events();
//! assert!(matches!(events[0], StunClientEvent::OutputBuffer(_)));
//! assert!(matches!(
//!     events[1],
//!     StunClientEvent::TransactionTimeout((_, rto)) if rto == Duration::from_millis(500)
//! ));
//!
//! let response = StunMessageBuilder::new(BINDING, MessageClass::SuccessResponse)
//!     .with_transaction_id(transaction_id)
//!     .with_attribute(XorMappedAddress::from(
//!         "192.0.2.1:32853".parse::<SocketAddr>().expect("Invalid address"),
//!     ))
//!     .build();
//! let buffer = stun_nat::encode(&response).expect("Can not encode response");
//!
//! client
//!     .on_buffer_recv(Bytes::from(buffer), now + Duration::from_millis(30))
//!     .expect("Response not accepted");
//! let events = client.events();
//! assert!(matches!(&events[0], StunClientEvent::TransactionFinished(msg) if msg == &response));
//!```

use crate::correlator::{Correlator, CorrelatorBuilder};
use crate::events::{StunClientEvent, StunTransactionError};
use crate::message::{create_stun_message, StunAttributes};
use crate::timeout::{
    DeadlineQueue, RetransmissionTimer, RtoSchedule, DEFAULT_RC, DEFAULT_RM, DEFAULT_RTO,
};
use crate::{validate_stunt_header, StunAgentError};
use bytes::Bytes;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use stun_nat::error::StunEncodeError;
use stun_nat::{
    AttributeRegistry, MessageClass, MessageDecoder, MessageDecoderBuilder, MessageEncoder,
    MessageEncoderBuilder, MessageMethod, StunMessage, TransactionId,
};

#[derive(Debug)]
struct StunClientParameters {
    rto: Duration,
    rc: u16,
    reliable: bool,
    registry: Option<Arc<AttributeRegistry>>,
}

impl Default for StunClientParameters {
    fn default() -> Self {
        Self {
            rto: DEFAULT_RTO,
            rc: DEFAULT_RC,
            reliable: false,
            registry: None,
        }
    }
}

/// Builder class used to create a [`StunClient`]
#[derive(Debug, Default)]
pub struct StunClientBuilder(StunClientParameters);

impl StunClientBuilder {
    /// Sets the initial retransmission timeout. Default is 500 ms.
    pub fn with_rto(mut self, rto: Duration) -> Self {
        self.0.rto = rto;
        self
    }

    /// Sets the number of times a request is sent, the first one included.
    /// Default is 7. A request is sent at least once.
    pub fn with_retransmissions(mut self, rc: u16) -> Self {
        self.0.rc = rc.max(1);
        self
    }

    /// Requests are sent over a reliable transport and they are never
    /// retransmitted. The transaction times out after the same time it
    /// would have taken over an unreliable transport.
    pub fn reliable(mut self) -> Self {
        self.0.reliable = true;
        self
    }

    /// Decodes and encodes the messages using the attributes of this
    /// registry instead of the default one.
    pub fn with_registry(mut self, registry: Arc<AttributeRegistry>) -> Self {
        self.0.registry = Some(registry);
        self
    }

    /// Builds the [`StunClient`]
    pub fn build(self) -> StunClient {
        StunClient::new(self.0)
    }
}

/// Event driven STUN client
#[derive(Debug)]
pub struct StunClient {
    encoder: MessageEncoder,
    decoder: MessageDecoder,
    correlator: Correlator,
    schedule: RtoSchedule,
    reliable: bool,
    timeouts: DeadlineQueue,
    timers: HashMap<TransactionId, RetransmissionTimer>,
    transactions: HashMap<TransactionId, Bytes>,
    events: Vec<StunClientEvent>,
}

impl Default for StunClient {
    fn default() -> Self {
        StunClientBuilder::default().build()
    }
}

impl StunClient {
    fn new(params: StunClientParameters) -> Self {
        let (encoder, decoder) = match params.registry {
            Some(registry) => (
                MessageEncoderBuilder::default()
                    .with_registry(registry.clone())
                    .build(),
                MessageDecoderBuilder::default()
                    .with_registry(registry)
                    .build(),
            ),
            None => (MessageEncoder::default(), MessageDecoder::default()),
        };
        let schedule = RtoSchedule::new(params.rto, DEFAULT_RM, params.rc);

        Self {
            encoder,
            decoder,
            correlator: CorrelatorBuilder::default()
                .with_timeout(schedule.total())
                .build(),
            schedule,
            reliable: params.reliable,
            timeouts: DeadlineQueue::default(),
            timers: HashMap::new(),
            transactions: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Returns the correlator pairing the responses with the requests
    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    fn set_timout(
        &mut self,
        transaction_id: TransactionId,
        instant: Instant,
    ) -> Result<(), StunAgentError> {
        let mut timer = RetransmissionTimer::new(self.schedule.clone());
        let timeout = timer.next_rto(instant).ok_or_else(|| {
            StunAgentError::InternalError(String::from("Can not calculate next RTO"))
        })?;
        self.timeouts.add(instant, timeout, transaction_id);
        self.timers.insert(transaction_id, timer);
        debug!("set timeout {:?} for {}", timeout, transaction_id);
        Ok(())
    }

    // Next instant the client must be woken up, either to retransmit or to
    // expire a transaction.
    fn add_timeout_event(&mut self, instant: Instant) {
        let next = match (
            self.timeouts.next_timeout(instant),
            self.correlator.next_timeout(instant),
        ) {
            (Some(a), Some(b)) => Some(if a.1 <= b.1 { a } else { b }),
            (a, b) => a.or(b),
        };
        if let Some(timeout) = next {
            self.events.push(StunClientEvent::TransactionTimeout(timeout));
        }
    }

    fn encode_buffer(&self, msg: &StunMessage) -> Result<Bytes, StunEncodeError> {
        Ok(Bytes::from(self.encoder.encode(msg)?))
    }

    fn transaction_finished(&mut self, transaction_id: &TransactionId) {
        self.timeouts.remove(transaction_id);
        self.timers.remove(transaction_id);
        self.transactions.remove(transaction_id);
    }

    fn manage_retransmission(
        &mut self,
        transaction_id: TransactionId,
        instant: Instant,
        timeout: Duration,
    ) {
        let Some(buffer) = self.transactions.get(&transaction_id) else {
            debug!("Transaction {} not found", transaction_id);
            self.events.push(StunClientEvent::TransactionFailed((
                transaction_id,
                StunTransactionError::NotFound,
            )));
            return;
        };

        self.timeouts.add(instant, timeout, transaction_id);
        debug!(
            "Retransmit transaction {}, next timeout {:?}",
            transaction_id, timeout
        );
        self.events.push(StunClientEvent::OutputBuffer(buffer.clone()));
    }

    /// Creates a request and starts its transaction.
    /// # Arguments:
    /// - `method` - The method of the request.
    /// - `attributes` - The attributes of the request.
    /// - `instant` - The instant the request is sent.
    /// # Returns:
    /// The transaction ID of the request. The encoded request is delivered in
    /// a [`StunClientEvent::OutputBuffer`] event.
    pub fn create_request(
        &mut self,
        method: MessageMethod,
        attributes: StunAttributes,
        instant: Instant,
    ) -> Result<TransactionId, StunAgentError> {
        let msg = create_stun_message(method, MessageClass::Request, None, attributes);
        let buffer = self.encode_buffer(&msg)?;
        let transaction_id = *msg.transaction_id();

        self.correlator.submit_request(&msg, instant)?;
        if !self.reliable {
            self.set_timout(transaction_id, instant)?;
            self.transactions.insert(transaction_id, buffer.clone());
        }

        self.events.clear();
        self.events.push(StunClientEvent::OutputBuffer(buffer));
        self.add_timeout_event(instant);

        Ok(transaction_id)
    }

    /// Creates an indication. Indications are not tracked, so they are
    /// neither retransmitted nor answered.
    pub fn create_indication(
        &mut self,
        method: MessageMethod,
        attributes: StunAttributes,
    ) -> Result<TransactionId, StunAgentError> {
        let msg = create_stun_message(method, MessageClass::Indication, None, attributes);
        let buffer = self.encode_buffer(&msg)?;

        self.events.clear();
        self.events.push(StunClientEvent::OutputBuffer(buffer));

        Ok(*msg.transaction_id())
    }

    /// Processes a buffer received from the server.
    /// # Returns:
    /// [`StunAgentError::StunCheckFailed`] if the buffer is not a STUN message,
    /// [`StunAgentError::DecodeError`] if it can not be decoded,
    /// [`StunAgentError::Discarded`] for requests, or
    /// [`StunAgentError::CorrelatorError`] if the response does not belong to
    /// a transaction in flight.
    pub fn on_buffer_recv(&mut self, buffer: Bytes, instant: Instant) -> Result<(), StunAgentError> {
        validate_stunt_header(&buffer)?;
        let (msg, _) = self.decoder.decode(&buffer)?;
        self.events.clear();

        match msg.class() {
            MessageClass::Request => {
                debug!("Stun client received a request message. Discarding.");
                Err(StunAgentError::Discarded)
            }
            MessageClass::Indication => {
                self.events.push(StunClientEvent::TransactionFinished(msg));
                Ok(())
            }
            MessageClass::SuccessResponse | MessageClass::ErrorResponse => {
                self.correlator.correlate(&msg, instant)?;
                self.transaction_finished(msg.transaction_id());
                self.events.push(StunClientEvent::TransactionFinished(msg));
                self.add_timeout_event(instant);
                Ok(())
            }
        }
    }

    /// Retransmits the requests whose timeout elapsed and fails the
    /// transactions that got no response in time.
    pub fn on_timeout(&mut self, instant: Instant) {
        self.events.clear();

        for transaction in self.correlator.sweep(instant) {
            let transaction_id = *transaction.transaction_id();
            self.transaction_finished(&transaction_id);
            info!("Transaction {} timed out", transaction_id);
            self.events.push(StunClientEvent::TransactionFailed((
                transaction_id,
                StunTransactionError::TimedOut,
            )));
        }

        for transaction_id in self.timeouts.check(instant) {
            let Some(timer) = self.timers.get_mut(&transaction_id) else {
                warn!("No retransmission timer for transaction {}", transaction_id);
                continue;
            };
            match timer.next_rto(instant) {
                Some(rto) => self.manage_retransmission(transaction_id, instant, rto),
                None => {
                    // The correlator reports the failure once the
                    // transaction expires
                    debug!("No more retransmissions for {}", transaction_id);
                    self.timers.remove(&transaction_id);
                    self.transactions.remove(&transaction_id);
                }
            }
        }

        self.add_timeout_event(instant);
    }

    /// Returns the events produced by the last call into the client.
    pub fn events(&mut self) -> Vec<StunClientEvent> {
        self.events.drain(..).collect()
    }
}
