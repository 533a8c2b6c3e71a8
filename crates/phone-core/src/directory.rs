//! Phone directory
//!
//! The ordered set of phones a simulation runs with. Phones are addressed by
//! their zero-based position, which is what the console shows as "ID".
//! Every phone created here publishes to the directory's event channel.
//!
//! Numbers added by hand must be unused. Generated numbers are drawn at random
//! and may repeat; [`generate`](PhoneDirectory::generate) does not check them
//! against each other.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rand::Rng;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{PhoneSimError, PhoneSimResult};
use crate::events::{event_channel, EventReceiver, EventSender};
use crate::phone::Phone;

static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[5-8]\d{8}$").expect("valid phone number pattern"));

/// Check that `number` is nine digits starting with 5 to 8
pub fn validate_number(number: &str) -> PhoneSimResult<()> {
    if PHONE_NUMBER.is_match(number) {
        Ok(())
    } else {
        Err(PhoneSimError::invalid_number(number))
    }
}

/// Produce a random nine-digit number in the `[500-899][500-899][000-999]` range
pub fn random_number<R: Rng>(rng: &mut R) -> String {
    format!(
        "{:03}{:03}{:03}",
        rng.gen_range(500..900),
        rng.gen_range(500..900),
        rng.gen_range(0..1000)
    )
}

/// Largest number of phones a single [`PhoneDirectory::generate`] call creates
pub const MAX_GENERATED_PHONES: usize = 100_000;

/// Ordered, ID-addressed collection of phones
pub struct PhoneDirectory {
    phones: Arc<RwLock<Vec<Phone>>>,
    events: EventSender,
}

impl PhoneDirectory {
    pub fn new() -> Self {
        let (events, _) = event_channel();
        Self {
            phones: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    /// Subscribe to events of every phone in this directory
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Replace the directory content with `amount` randomly numbered phones
    ///
    /// Amounts above [`MAX_GENERATED_PHONES`] are refused and leave the
    /// directory untouched.
    pub fn generate(&self, amount: usize) -> PhoneSimResult<()> {
        self.generate_with(amount, &mut rand::thread_rng())
    }

    /// Like [`generate`](Self::generate) with a caller-provided generator
    pub fn generate_with<R: Rng>(&self, amount: usize, rng: &mut R) -> PhoneSimResult<()> {
        if amount > MAX_GENERATED_PHONES {
            return Err(PhoneSimError::InvalidAmount {
                amount: amount as u64,
                max: MAX_GENERATED_PHONES,
            });
        }
        let fresh: Vec<Phone> = (0..amount)
            .map(|_| Phone::with_events(random_number(rng), self.events.clone()))
            .collect();
        *self.phones.write() = fresh;
        info!("Generated {} phones", amount);
        Ok(())
    }

    /// Register a phone under a validated, unused number
    ///
    /// Returns the ID of the new phone.
    pub fn add(&self, number: &str) -> PhoneSimResult<usize> {
        validate_number(number)?;

        let mut phones = self.phones.write();
        if phones.iter().any(|p| p.number() == number) {
            return Err(PhoneSimError::DuplicateNumber {
                number: number.to_string(),
            });
        }
        phones.push(Phone::with_events(number, self.events.clone()));
        debug!("Added phone {} with ID {}", number, phones.len() - 1);
        Ok(phones.len() - 1)
    }

    /// Remove the phone at `id`; later phones shift down by one
    pub fn remove(&self, id: usize) -> PhoneSimResult<Phone> {
        let mut phones = self.phones.write();
        if id >= phones.len() {
            return Err(PhoneSimError::PhoneNotFound { id });
        }
        let phone = phones.remove(id);
        debug!("Removed {} from ID {}", phone, id);
        Ok(phone)
    }

    pub fn get(&self, id: usize) -> PhoneSimResult<Phone> {
        self.phones
            .read()
            .get(id)
            .cloned()
            .ok_or(PhoneSimError::PhoneNotFound { id })
    }

    /// All phones with their IDs
    pub fn list(&self) -> Vec<(usize, Phone)> {
        self.phones.read().iter().cloned().enumerate().collect()
    }

    pub fn len(&self) -> usize {
        self.phones.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.read().is_empty()
    }
}

impl Default for PhoneDirectory {
    fn default() -> Self {
        Self::new()
    }
}
