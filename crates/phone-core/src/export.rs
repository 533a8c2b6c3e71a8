//! Register export
//!
//! Renders a phone's registers as the plain-text block written by the
//! "Save register to file" command:
//!
//! ```text
//! Phone{500123456}
//! [Outbound calls]
//! {600111222, Accepted, Available, 2021-03-07 14:05:09, PT2S}
//!
//! [Inbound calls]
//! {700333444, Rejected, Unavailable, 2021-03-07 14:06:10, PT0S}
//!
//! ```

use std::fmt::Write as _;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::{PhoneSimError, PhoneSimResult};
use crate::phone::Phone;

pub const OUTBOUND_HEADER: &str = "[Outbound calls]";
pub const INBOUND_HEADER: &str = "[Inbound calls]";

static REGISTER_FILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\s.]+\.[a-zA-Z]{3}$").expect("valid file name pattern"));

/// Render both registers of `phone`, newest entries first
pub fn render_register(phone: &Phone) -> String {
    let (outbound, inbound) = phone.histories();
    let mut out = String::new();

    let _ = writeln!(out, "{}", phone);
    let _ = writeln!(out, "{}", OUTBOUND_HEADER);
    for record in &outbound {
        let _ = writeln!(out, "{}", record);
    }
    out.push('\n');
    let _ = writeln!(out, "{}", INBOUND_HEADER);
    for record in &inbound {
        let _ = writeln!(out, "{}", record);
    }
    out.push('\n');
    out
}

/// Check a register file name: word characters, spaces and dots, ending in a
/// three-letter extension
pub fn validate_file_name(name: &str) -> PhoneSimResult<()> {
    if REGISTER_FILE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(PhoneSimError::InvalidFileName {
            name: name.to_string(),
        })
    }
}

/// Write the rendered register to `path`, replacing any existing file
pub fn save_register(phone: &Phone, path: impl AsRef<Path>) -> PhoneSimResult<()> {
    let path = path.as_ref();
    std::fs::write(path, render_register(phone)).map_err(|source| PhoneSimError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved register of {} to {}", phone, path.display());
    Ok(())
}
