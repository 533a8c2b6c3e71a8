//! Deferred release of connected phones
//!
//! Every connected call spawns exactly one task on the tokio runtime. The task
//! sleeps for the conversation length and then returns both parties to idle,
//! whatever their status is at that moment. Releases are never cancelled.
//! When the runtime shuts down, releases that have not fired yet are dropped
//! along with it.
//!
//! A connected phone stays busy until this release fires, and a busy phone
//! cannot enter another handshake, so a release always ends the conversation
//! it was scheduled for.

use std::time::Duration;

use tracing::{debug, info};

use crate::events::{publish, EventSender, PhoneEvent};
use crate::phone::Phone;

/// A connected call waiting for its release
#[derive(Debug)]
pub(crate) struct ReleaseTicket {
    pub caller: Phone,
    pub callee: Phone,
    pub after: Duration,
}

/// Spawn the release task for a connected call
pub(crate) fn schedule(ticket: ReleaseTicket, events: Option<EventSender>) {
    debug!(
        "Scheduling release of {} and {} in {:?}",
        ticket.caller, ticket.callee, ticket.after
    );

    tokio::spawn(async move {
        tokio::time::sleep(ticket.after).await;

        let ReleaseTicket { caller, callee, .. } = ticket;
        caller.release();
        callee.release();
        info!("Conversation between {} and {} ended", caller, callee);

        publish(
            events.as_ref(),
            PhoneEvent::Released {
                first: caller.number().to_string(),
                second: callee.number().to_string(),
            },
        );
    });
}
