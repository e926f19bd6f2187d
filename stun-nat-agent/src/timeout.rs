use log::debug;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};
use stun_nat::TransactionId;

pub const DEFAULT_RTO: Duration = Duration::from_millis(500);
pub const DEFAULT_RC: u16 = 7;
pub const DEFAULT_RM: u32 = 16;

#[derive(Debug, Eq)]
struct Deadline {
    expires: Instant,
    transaction_id: TransactionId,
}

// Ordered by expiration only, ties are broken arbitrarily by the heap
impl Ord for Deadline {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expires.cmp(&other.expires)
    }
}

impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Deadline {
    fn eq(&self, other: &Self) -> bool {
        self.expires == other.expires
    }
}

/// Deadlines of the transactions, earliest first.
#[derive(Debug, Default)]
pub struct DeadlineQueue(BinaryHeap<Reverse<Deadline>>);

impl DeadlineQueue {
    /// Adds a deadline `timeout` after `instant`. A deadline too far away
    /// to be represented never expires and is not queued.
    pub fn add(&mut self, instant: Instant, timeout: Duration, transaction_id: TransactionId) {
        let Some(expires) = instant.checked_add(timeout) else {
            debug!("Transaction {} never expires", transaction_id);
            return;
        };
        self.0.push(Reverse(Deadline {
            expires,
            transaction_id,
        }));
    }

    pub fn remove(&mut self, transaction_id: &TransactionId) {
        self.0
            .retain(|Reverse(deadline)| &deadline.transaction_id != transaction_id);
    }

    /// Returns the earliest deadline and the time left until it expires,
    /// zero if it already did.
    pub fn next_timeout(&self, instant: Instant) -> Option<(TransactionId, Duration)> {
        let Reverse(deadline) = self.0.peek()?;
        Some((
            deadline.transaction_id,
            deadline.expires.saturating_duration_since(instant),
        ))
    }

    /// Pops the transactions whose deadline is not after `instant`.
    pub fn check(&mut self, instant: Instant) -> Vec<TransactionId> {
        let mut expired = Vec::new();
        while self
            .0
            .peek()
            .is_some_and(|Reverse(deadline)| deadline.expires <= instant)
        {
            if let Some(Reverse(deadline)) = self.0.pop() {
                expired.push(deadline.transaction_id);
            }
        }
        expired
    }
}

/// Retransmission timeouts of a request sent over an unreliable
/// transport. The request is sent `rc` times; the timeout doubles after
/// each one and the last one waits `rm` times the initial RTO.
#[derive(Debug, Clone)]
pub struct RtoSchedule {
    rto: Duration,
    rm: u32,
    remaining: u16,
    factor: u32,
}

impl Default for RtoSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_RTO, DEFAULT_RM, DEFAULT_RC)
    }
}

impl RtoSchedule {
    pub fn new(rto: Duration, rm: u32, rc: u16) -> Self {
        Self {
            rto,
            rm,
            remaining: rc,
            factor: 1,
        }
    }

    /// Time elapsed from the first transmission until the transaction
    /// times out.
    pub fn total(&self) -> Duration {
        self.clone().fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Iterator for RtoSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.remaining = self.remaining.checked_sub(1)?;
        let factor = if self.remaining == 0 {
            self.rm
        } else {
            self.factor
        };
        self.factor = self.factor.saturating_mul(2);
        Some(self.rto.saturating_mul(factor))
    }
}

/// Tracks when a request must be sent again. Deadlines are measured from
/// the first transmission, so waking up late does not shift the ones
/// that follow.
#[derive(Debug, Default)]
pub struct RetransmissionTimer {
    schedule: RtoSchedule,
    deadline: Option<Instant>,
}

impl RetransmissionTimer {
    pub fn new(schedule: RtoSchedule) -> Self {
        Self {
            schedule,
            deadline: None,
        }
    }

    /// Returns the time left until the next retransmission, or `None`
    /// once the schedule is exhausted.
    pub fn next_rto(&mut self, instant: Instant) -> Option<Duration> {
        let mut deadline = match self.deadline {
            Some(deadline) if deadline > instant => return Some(deadline - instant),
            Some(deadline) => deadline,
            None => instant,
        };

        // Skip the deadlines that already passed
        while deadline <= instant {
            let Some(next) = self.schedule.next().and_then(|rto| deadline.checked_add(rto)) else {
                debug!("No more retransmissions");
                return None;
            };
            deadline = next;
        }

        self.deadline = Some(deadline);
        Some(deadline - instant)
    }
}
