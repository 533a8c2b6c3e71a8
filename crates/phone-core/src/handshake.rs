//! Handshake transition table
//!
//! The outcome of a call attempt depends only on the two phones' statuses,
//! the callee's accept decision and the requested conversation length.
//! [`plan_call`] maps those inputs to a [`CallPlan`]: which records each side
//! receives, where each side ends up and whether a release must be scheduled.
//! The [`Phone`](crate::Phone) applies the plan while holding both phones'
//! locks, so the table itself stays free of I/O and clocks.
//!
//! ```text
//! caller  callee  accept │ outcome          caller rec  callee rec  final   release
//! ───────────────────────┼─────────────────────────────────────────────────────────
//! Busy    *       *      │ SelfBusy         -           -           as-is   no
//! Idle    Busy    *      │ DestinationBusy  unavail     unavail     as-is   no
//! Idle    Idle    true   │ Connected        avail/acc   avail/acc   Busy    yes
//! Idle    Idle    false  │ Rejected         avail/rej   avail/rej   Idle    no
//! ```
//!
//! Only a connected call records the requested duration; every other entry
//! carries a zero duration.

use std::fmt;
use std::time::Duration;

/// Availability of a phone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhoneStatus {
    /// Free to place or receive a call
    #[default]
    Idle,
    /// Placing, receiving or in a conversation
    Busy,
}

impl PhoneStatus {
    /// Whether the phone can take part in a new call
    pub fn is_available(self) -> bool {
        self == PhoneStatus::Idle
    }
}

impl fmt::Display for PhoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhoneStatus::Idle => write!(f, "Available"),
            PhoneStatus::Busy => write!(f, "Busy"),
        }
    }
}

/// How a call attempt resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallOutcome {
    /// Caller was already busy; nothing recorded
    SelfBusy,
    /// Callee was busy; both sides record an unavailable attempt
    DestinationBusy,
    /// Callee declined; both sides back to idle
    Rejected,
    /// Conversation running until the release fires
    Connected,
}

/// Field values for a record to be stamped and appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    pub accepted: bool,
    pub was_available: bool,
    pub duration: Duration,
}

impl RecordShape {
    /// Shape recorded when the destination could not be reached
    pub const UNAVAILABLE: RecordShape = RecordShape {
        accepted: false,
        was_available: false,
        duration: Duration::ZERO,
    };

    fn reached(accepted: bool, duration: Duration) -> Self {
        Self {
            accepted,
            was_available: true,
            duration,
        }
    }
}

/// Effects of one call attempt on both parties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPlan {
    pub outcome: CallOutcome,
    /// Appended to the caller's outbound register
    pub caller_record: Option<RecordShape>,
    /// Appended to the callee's inbound register
    pub callee_record: Option<RecordShape>,
    pub caller_after: PhoneStatus,
    pub callee_after: PhoneStatus,
    /// Delay before both phones are returned to idle, if connected
    pub release_after: Option<Duration>,
}

/// Resolve a call attempt
///
/// `duration` is only recorded and scheduled when the call connects. A
/// rejected attempt records a zero duration on both sides even when a
/// non-zero `duration` is passed with `accept = false`, and an unavailable
/// destination always records zero.
pub fn plan_call(
    caller: PhoneStatus,
    callee: PhoneStatus,
    accept: bool,
    duration: Duration,
) -> CallPlan {
    match (caller, callee) {
        (PhoneStatus::Busy, _) => CallPlan {
            outcome: CallOutcome::SelfBusy,
            caller_record: None,
            callee_record: None,
            caller_after: caller,
            callee_after: callee,
            release_after: None,
        },
        (PhoneStatus::Idle, PhoneStatus::Busy) => CallPlan {
            outcome: CallOutcome::DestinationBusy,
            caller_record: Some(RecordShape::UNAVAILABLE),
            callee_record: Some(RecordShape::UNAVAILABLE),
            caller_after: PhoneStatus::Idle,
            callee_after: PhoneStatus::Busy,
            release_after: None,
        },
        (PhoneStatus::Idle, PhoneStatus::Idle) if accept => CallPlan {
            outcome: CallOutcome::Connected,
            caller_record: Some(RecordShape::reached(true, duration)),
            callee_record: Some(RecordShape::reached(true, duration)),
            caller_after: PhoneStatus::Busy,
            callee_after: PhoneStatus::Busy,
            release_after: Some(duration),
        },
        (PhoneStatus::Idle, PhoneStatus::Idle) => CallPlan {
            outcome: CallOutcome::Rejected,
            caller_record: Some(RecordShape::reached(false, Duration::ZERO)),
            callee_record: Some(RecordShape::reached(false, Duration::ZERO)),
            caller_after: PhoneStatus::Idle,
            callee_after: PhoneStatus::Idle,
            release_after: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_status() -> impl Strategy<Value = PhoneStatus> {
        prop_oneof![Just(PhoneStatus::Idle), Just(PhoneStatus::Busy)]
    }

    #[test]
    fn test_connected_plan() {
        let plan = plan_call(PhoneStatus::Idle, PhoneStatus::Idle, true, Duration::from_secs(2));
        assert_eq!(plan.outcome, CallOutcome::Connected);
        assert_eq!(plan.caller_after, PhoneStatus::Busy);
        assert_eq!(plan.callee_after, PhoneStatus::Busy);
        assert_eq!(plan.release_after, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_zero_duration_still_schedules_release() {
        let plan = plan_call(PhoneStatus::Idle, PhoneStatus::Idle, true, Duration::ZERO);
        assert_eq!(plan.release_after, Some(Duration::ZERO));
        assert_eq!(plan.caller_after, PhoneStatus::Busy);
    }

    #[test]
    fn test_rejected_plan_records_zero_duration() {
        let plan = plan_call(PhoneStatus::Idle, PhoneStatus::Idle, false, Duration::from_secs(7));
        assert_eq!(plan.outcome, CallOutcome::Rejected);
        let record = plan.caller_record.unwrap();
        assert!(!record.accepted);
        assert!(record.was_available);
        assert_eq!(record.duration, Duration::ZERO);
        assert_eq!(plan.caller_after, PhoneStatus::Idle);
        assert_eq!(plan.callee_after, PhoneStatus::Idle);
    }

    #[test]
    fn test_destination_busy_records_unavailable() {
        let plan = plan_call(PhoneStatus::Idle, PhoneStatus::Busy, true, Duration::from_secs(9));
        assert_eq!(plan.outcome, CallOutcome::DestinationBusy);
        assert_eq!(plan.caller_record, Some(RecordShape::UNAVAILABLE));
        assert_eq!(plan.callee_record, Some(RecordShape::UNAVAILABLE));
        assert_eq!(plan.caller_after, PhoneStatus::Idle);
        assert_eq!(plan.callee_after, PhoneStatus::Busy);
    }

    proptest! {
        #[test]
        fn busy_caller_changes_nothing(callee in any_status(), accept in any::<bool>(), secs in 0u64..3600) {
            let plan = plan_call(PhoneStatus::Busy, callee, accept, Duration::from_secs(secs));
            prop_assert_eq!(plan.outcome, CallOutcome::SelfBusy);
            prop_assert!(plan.caller_record.is_none());
            prop_assert!(plan.callee_record.is_none());
            prop_assert_eq!(plan.caller_after, PhoneStatus::Busy);
            prop_assert_eq!(plan.callee_after, callee);
        }

        #[test]
        fn only_connected_calls_leave_phones_busy(caller in any_status(), callee in any_status(), accept in any::<bool>(), secs in 0u64..3600) {
            let plan = plan_call(caller, callee, accept, Duration::from_secs(secs));
            if plan.outcome != CallOutcome::Connected {
                prop_assert!(plan.release_after.is_none());
                prop_assert_eq!(plan.caller_after, caller);
                prop_assert_eq!(plan.callee_after, callee);
            } else {
                prop_assert_eq!(plan.release_after, Some(Duration::from_secs(secs)));
            }
        }

        #[test]
        fn recorded_attempts_touch_both_sides(caller in any_status(), callee in any_status(), accept in any::<bool>(), secs in 0u64..3600) {
            let plan = plan_call(caller, callee, accept, Duration::from_secs(secs));
            prop_assert_eq!(plan.caller_record.is_some(), plan.callee_record.is_some());
            prop_assert_eq!(plan.caller_record, plan.callee_record);
        }
    }
}
