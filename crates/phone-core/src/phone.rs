//! Simulated phones and the call protocol
//!
//! A [`Phone`] is a cheap, cloneable handle. All clones share one identity,
//! one status and one pair of registers, each guarded by a per-phone mutex.
//! A call attempt locks caller and callee together (in phone-id order, so
//! crossing calls cannot deadlock), resolves the attempt through
//! [`plan_call`], applies the plan and returns. A connected call leaves both
//! phones busy and hands a release ticket to the scheduler in [`release`](crate::release).
//!
//! # Example
//!
//! ```rust
//! use phonesim_core::{create_phone, CallError};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let alice = create_phone("5005550001");
//! let bob = create_phone("5005550002");
//!
//! alice.call(&bob, true, Duration::from_secs(2)).await.unwrap();
//! assert!(!alice.is_available());
//! assert!(!bob.is_available());
//!
//! let carol = create_phone("5005550003");
//! let err = carol.call(&bob, true, Duration::from_secs(1)).await.unwrap_err();
//! assert!(matches!(err, CallError::DestinationBusy { .. }));
//! # }
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::error::{CallError, CallResult};
use crate::events::{publish, EventSender, PhoneEvent};
use crate::handshake::{plan_call, CallOutcome, CallPlan, PhoneStatus, RecordShape};
use crate::record::CallRecord;
use crate::release::{self, ReleaseTicket};

static NEXT_PHONE_ID: AtomicU64 = AtomicU64::new(1);

/// Create an idle phone with empty registers
pub fn create_phone(number: impl Into<String>) -> Phone {
    Phone::new(number)
}

#[derive(Debug, Default)]
struct PhoneState {
    status: PhoneStatus,
    outbound: VecDeque<CallRecord>,
    inbound: VecDeque<CallRecord>,
}

#[derive(Debug)]
struct PhoneInner {
    id: u64,
    number: String,
    /// Where call outcomes are published
    events: Option<EventSender>,
    state: Mutex<PhoneState>,
}

/// Handle to a simulated phone
#[derive(Clone)]
pub struct Phone {
    inner: Arc<PhoneInner>,
}

impl Phone {
    pub fn new(number: impl Into<String>) -> Self {
        Self::build(number.into(), None)
    }

    /// Create a phone that publishes its call outcomes to `events`
    pub fn with_events(number: impl Into<String>, events: EventSender) -> Self {
        Self::build(number.into(), Some(events))
    }

    fn build(number: String, events: Option<EventSender>) -> Self {
        Self {
            inner: Arc::new(PhoneInner {
                id: NEXT_PHONE_ID.fetch_add(1, Ordering::Relaxed),
                number,
                events,
                state: Mutex::new(PhoneState::default()),
            }),
        }
    }

    /// Process-unique identity of this phone
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn number(&self) -> &str {
        &self.inner.number
    }

    pub fn status(&self) -> PhoneStatus {
        self.inner.state.lock().status
    }

    pub fn is_available(&self) -> bool {
        self.status().is_available()
    }

    /// Outbound register, newest first
    pub fn outbound_history(&self) -> Vec<CallRecord> {
        self.inner.state.lock().outbound.iter().cloned().collect()
    }

    /// Inbound register, newest first
    pub fn inbound_history(&self) -> Vec<CallRecord> {
        self.inner.state.lock().inbound.iter().cloned().collect()
    }

    /// Both registers taken under a single lock
    pub fn histories(&self) -> (Vec<CallRecord>, Vec<CallRecord>) {
        let state = self.inner.state.lock();
        (
            state.outbound.iter().cloned().collect(),
            state.inbound.iter().cloned().collect(),
        )
    }

    /// Call `destination`, which answers according to `accept`
    ///
    /// Returns once the handshake has resolved; a connected conversation keeps
    /// running in the background and both phones stay busy until its release
    /// fires `duration` later. Must be awaited inside a tokio runtime, which
    /// hosts the release task.
    ///
    /// # Errors
    ///
    /// * `CallError::SelfBusy` - this phone is in a conversation; nothing is recorded
    /// * `CallError::DestinationBusy` - `destination` is in a conversation; both
    ///   registers get an unavailable entry
    /// * `CallError::Rejected` - `destination` declined; both phones stay idle
    pub async fn call(&self, destination: &Phone, accept: bool, duration: Duration) -> CallResult<()> {
        let (plan, ticket) = self.handshake(destination, accept, duration);
        let events = self.inner.events.as_ref();
        let from = self.number().to_string();
        let to = destination.number().to_string();

        match plan.outcome {
            CallOutcome::Connected => {
                info!(
                    "{} accepted call from {}. Conversation will last for {}s",
                    destination,
                    from,
                    duration.as_secs()
                );
                if let Some(ticket) = ticket {
                    release::schedule(ticket, self.inner.events.clone());
                }
                publish(events, PhoneEvent::CallConnected { from, to, duration });
                Ok(())
            }
            CallOutcome::Rejected => {
                warn!("{} rejected call from {}", destination, from);
                publish(
                    events,
                    PhoneEvent::CallRejected {
                        from: from.clone(),
                        to: to.clone(),
                    },
                );
                Err(CallError::Rejected { from, to })
            }
            CallOutcome::DestinationBusy => {
                warn!("{} is currently unavailable, call from {} failed", destination, from);
                publish(
                    events,
                    PhoneEvent::DestinationBusy {
                        from: from.clone(),
                        to: to.clone(),
                    },
                );
                Err(CallError::DestinationBusy { from, to })
            }
            CallOutcome::SelfBusy => {
                warn!("{} is already during the conversation", self);
                publish(events, PhoneEvent::SelfBusy { number: from.clone() });
                Err(CallError::SelfBusy { number: from })
            }
        }
    }

    /// Resolve and apply a call attempt with both phones locked
    fn handshake(
        &self,
        destination: &Phone,
        accept: bool,
        duration: Duration,
    ) -> (CallPlan, Option<ReleaseTicket>) {
        if self == destination {
            return self.handshake_with_self(accept, duration);
        }

        let (mut caller, mut callee) = lock_pair(self, destination);
        let plan = plan_call(caller.status, callee.status, accept, duration);

        if let Some(shape) = plan.caller_record {
            caller.outbound.push_front(stamp(destination.number(), shape));
        }
        if let Some(shape) = plan.callee_record {
            callee.inbound.push_front(stamp(self.number(), shape));
        }
        debug!(
            "Call {} -> {} resolved as {:?}",
            self.number(),
            destination.number(),
            plan.outcome
        );

        caller.status = plan.caller_after;
        callee.status = plan.callee_after;

        let ticket = plan.release_after.map(|after| ReleaseTicket {
            caller: self.clone(),
            callee: destination.clone(),
            after,
        });

        (plan, ticket)
    }

    /// A phone dialling its own number plays both roles on one state
    fn handshake_with_self(&self, accept: bool, duration: Duration) -> (CallPlan, Option<ReleaseTicket>) {
        let mut state = self.inner.state.lock();
        let plan = plan_call(state.status, state.status, accept, duration);

        if let Some(shape) = plan.caller_record {
            state.outbound.push_front(stamp(self.number(), shape));
        }
        if let Some(shape) = plan.callee_record {
            state.inbound.push_front(stamp(self.number(), shape));
        }

        state.status = plan.caller_after;

        let ticket = plan.release_after.map(|after| ReleaseTicket {
            caller: self.clone(),
            callee: self.clone(),
            after,
        });

        (plan, ticket)
    }

    /// Return the phone to idle at the end of a conversation
    pub(crate) fn release(&self) {
        self.inner.state.lock().status = PhoneStatus::Idle;
    }
}

fn stamp(counterparty: &str, shape: RecordShape) -> CallRecord {
    CallRecord::now(counterparty, shape.accepted, shape.was_available, shape.duration)
}

/// Lock two distinct phones, lower id first
fn lock_pair<'a>(
    caller: &'a Phone,
    callee: &'a Phone,
) -> (MutexGuard<'a, PhoneState>, MutexGuard<'a, PhoneState>) {
    if caller.inner.id < callee.inner.id {
        let first = caller.inner.state.lock();
        let second = callee.inner.state.lock();
        (first, second)
    } else {
        let second = callee.inner.state.lock();
        let first = caller.inner.state.lock();
        (first, second)
    }
}

impl PartialEq for Phone {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Phone {}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phone{{{}}}", self.inner.number)
    }
}

impl fmt::Debug for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Phone")
            .field("id", &self.inner.id)
            .field("number", &self.inner.number)
            .field("status", &self.status())
            .finish()
    }
}
