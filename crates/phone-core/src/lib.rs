//! # phonesim-core - Phone Call Simulation
//!
//! A small population of phones placing and receiving calls, each keeping an
//! inbound and an outbound call register.
//!
//! ## Quick Start
//!
//! ```rust
//! use phonesim_core::{create_phone, render_register, CallError};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let alice = create_phone("5005550001");
//! let bob = create_phone("5005550002");
//!
//! // Bob declines
//! let err = alice.call(&bob, false, Duration::ZERO).await.unwrap_err();
//! assert!(matches!(err, CallError::Rejected { .. }));
//!
//! // Bob answers; both phones are busy for two seconds
//! alice.call(&bob, true, Duration::from_secs(2)).await.unwrap();
//!
//! println!("{}", render_register(&alice));
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`handshake`]: pure transition table deciding every call outcome
//! - [`phone`]: phone handles, per-phone locking and register updates
//! - [`release`]: deferred return to idle after a conversation
//! - [`record`]: call register entries
//! - [`export`]: register rendering and file export
//! - [`directory`]: ID-addressed phone collection with number generation
//! - [`events`]: broadcast of call outcomes
//! - [`config`], [`logging`]: run settings and `tracing` setup

pub mod config;
pub mod directory;
pub mod error;
pub mod events;
pub mod export;
pub mod handshake;
pub mod logging;
pub mod phone;
pub mod record;
pub mod release;

pub use config::SimulatorConfig;
pub use directory::{random_number, validate_number, PhoneDirectory, MAX_GENERATED_PHONES};
pub use error::{CallError, CallResult, PhoneSimError, PhoneSimResult};
pub use events::{event_channel, EventReceiver, EventSender, PhoneEvent};
pub use export::{render_register, save_register, validate_file_name};
pub use handshake::{plan_call, CallOutcome, CallPlan, PhoneStatus};
pub use logging::{setup_logging, LoggingConfig};
pub use phone::{create_phone, Phone};
pub use record::{format_iso_duration, CallRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
