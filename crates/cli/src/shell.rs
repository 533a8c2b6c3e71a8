//! Interactive menus
//!
//! The main menu manages the phone directory; the phone menu places calls
//! from one selected phone and shows or saves its registers. Bad input never
//! ends the session: the shell prints a retry message and shows the menu
//! again. End of input behaves like choosing "Exit".
//!
//! Conversations end in the background. The shell notes every ended
//! conversation and reports it the next time a menu is shown.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use phonesim_core::{
    save_register, validate_file_name, CallRecord, EventReceiver, Phone, PhoneDirectory,
    PhoneEvent, SimulatorConfig,
};
use tokio::io::AsyncBufRead;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

use crate::input::TokenReader;

const INVALID_INPUT: &str = "Invalid input. Try again ...";
const UNKNOWN_OPTION: &str = "Given option doesn't exist. Try again ...";
const INVALID_AMOUNT: &str = "Invalid amount. Try again ...";
const UNKNOWN_PHONE: &str = "Phone with given ID doesn't exist. Try again ...";

/// Console session over a phone directory
pub struct Shell<R, W> {
    input: TokenReader<R>,
    out: W,
    directory: PhoneDirectory,
    events: EventReceiver,
    config: SimulatorConfig,
}

impl<R: AsyncBufRead + Unpin, W: Write> Shell<R, W> {
    pub fn new(input: R, out: W, directory: PhoneDirectory, config: SimulatorConfig) -> Self {
        let events = directory.subscribe();
        Self {
            input: TokenReader::new(input),
            out,
            directory,
            events,
            config,
        }
    }

    /// Run the main menu until "Exit" or end of input
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Phone Simulator")?;
        loop {
            self.report_ended_conversations()?;
            self.print_main_menu()?;
            self.prompt("Select option: ")?;
            let Some(token) = self.input.next_token().await? else {
                break;
            };
            let Ok(choice) = token.parse::<i64>() else {
                self.input.discard_line();
                writeln!(self.out, "{}", INVALID_INPUT)?;
                continue;
            };
            match choice {
                0 => break,
                1 => self.generate_phones().await?,
                2 => self.add_phone().await?,
                3 => self.remove_phone().await?,
                4 => self.select_phone().await?,
                5 => self.display_phones()?,
                _ => writeln!(self.out, "{}", UNKNOWN_OPTION)?,
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Print a line for every conversation released since the last menu
    fn report_ended_conversations(&mut self) -> Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(PhoneEvent::Released { first, second }) => writeln!(
                    self.out,
                    "Conversation between Phone{{{}}} and Phone{{{}}} has ended",
                    first, second
                )?,
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {} phone events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
            }
        }
    }

    fn print_main_menu(&mut self) -> Result<()> {
        writeln!(self.out, "1 - Generate phones")?;
        writeln!(self.out, "2 - Add phone")?;
        writeln!(self.out, "3 - Remove phone")?;
        writeln!(self.out, "4 - Select phone")?;
        writeln!(self.out, "5 - Display phones")?;
        writeln!(self.out, "0 - Exit")?;
        Ok(())
    }

    fn print_phone_menu(&mut self) -> Result<()> {
        writeln!(self.out, "1 - Call")?;
        writeln!(self.out, "2 - Display register")?;
        writeln!(self.out, "3 - Save register to file")?;
        writeln!(self.out, "4 - Go back")?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    /// Read a non-negative integer, printing `complaint` for anything else
    async fn read_count(&mut self, complaint: &str) -> Result<Option<u64>> {
        let Some(token) = self.input.next_token().await? else {
            return Ok(None);
        };
        match token.parse::<u64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.input.discard_line();
                writeln!(self.out, "{}", complaint)?;
                Ok(None)
            }
        }
    }

    async fn generate_phones(&mut self) -> Result<()> {
        self.prompt("Amount of phones to generate: ")?;
        let Some(amount) = self.read_count(INVALID_AMOUNT).await? else {
            return Ok(());
        };
        let Ok(amount) = usize::try_from(amount) else {
            writeln!(self.out, "{}", INVALID_AMOUNT)?;
            return Ok(());
        };
        match self.directory.generate(amount) {
            Ok(()) => Ok(()),
            Err(e) if e.is_user_error() => {
                debug!("Refused amount {}: {}", amount, e);
                writeln!(self.out, "{}", INVALID_AMOUNT)?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn add_phone(&mut self) -> Result<()> {
        self.prompt("Phone number: ")?;
        let Some(number) = self.input.next_token().await? else {
            return Ok(());
        };
        match self.directory.add(&number) {
            Ok(_) => Ok(()),
            Err(e) if e.is_user_error() => {
                debug!("Refused phone number {}: {}", number, e);
                writeln!(self.out, "{}", INVALID_INPUT)?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_phone(&mut self) -> Result<()> {
        self.prompt("Phone ID: ")?;
        if let Some(id) = self.read_count(INVALID_INPUT).await? {
            if self.directory.remove(id as usize).is_err() {
                writeln!(self.out, "{}", UNKNOWN_PHONE)?;
            }
        }
        Ok(())
    }

    async fn select_phone(&mut self) -> Result<()> {
        self.prompt("Phone ID: ")?;
        let Some(id) = self.read_count(INVALID_INPUT).await? else {
            return Ok(());
        };
        match self.directory.get(id as usize) {
            Ok(phone) => self.phone_menu(id as usize, phone).await,
            Err(_) => {
                writeln!(self.out, "{}", UNKNOWN_PHONE)?;
                Ok(())
            }
        }
    }

    fn display_phones(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Phones:")?;
        let phones = self.directory.list();
        if phones.is_empty() {
            writeln!(self.out, "(Empty)")?;
            return Ok(());
        }
        for (id, phone) in phones {
            writeln!(self.out, "ID:{} {}", id, phone)?;
        }
        Ok(())
    }

    async fn phone_menu(&mut self, id: usize, phone: Phone) -> Result<()> {
        loop {
            self.report_ended_conversations()?;
            self.print_phone_menu()?;
            self.prompt(&format!("(ID:{} {}) select option: ", id, phone))?;
            let Some(token) = self.input.next_token().await? else {
                return Ok(());
            };
            let Ok(choice) = token.parse::<i64>() else {
                self.input.discard_line();
                writeln!(self.out, "{}", INVALID_INPUT)?;
                continue;
            };
            match choice {
                1 => self.place_call(&phone).await?,
                2 => self.display_register(&phone)?,
                3 => self.save_register(&phone).await?,
                4 => return Ok(()),
                _ => writeln!(self.out, "{}", UNKNOWN_OPTION)?,
            }
        }
    }

    async fn place_call(&mut self, phone: &Phone) -> Result<()> {
        self.prompt("Phone ID: ")?;
        let Some(dest_id) = self.read_count(INVALID_INPUT).await? else {
            return Ok(());
        };
        let Ok(destination) = self.directory.get(dest_id as usize) else {
            writeln!(self.out, "{}", UNKNOWN_PHONE)?;
            return Ok(());
        };

        self.prompt("Should call be accepted by destination? (Y/N): ")?;
        let Some(answer) = self.input.next_token().await? else {
            return Ok(());
        };
        let (accept, duration) = match answer.as_str() {
            "Y" => {
                self.prompt("Conversation duration in seconds: ")?;
                match self.read_count(INVALID_INPUT).await? {
                    Some(secs) => (true, Duration::from_secs(secs)),
                    None => return Ok(()),
                }
            }
            "N" => (false, Duration::ZERO),
            _ => {
                writeln!(self.out, "Given input doesn't match Y or N. Try again ...")?;
                return Ok(());
            }
        };

        match phone.call(&destination, accept, duration).await {
            Ok(()) => writeln!(
                self.out,
                "{} accepted call from {}. Conversation will last for {}s ...",
                destination,
                phone.number(),
                duration.as_secs()
            )?,
            Err(e) => writeln!(self.out, "{}", e)?,
        }
        Ok(())
    }

    fn display_register(&mut self, phone: &Phone) -> Result<()> {
        let (outbound, inbound) = phone.histories();
        self.print_records("Outbound register:", &outbound)?;
        self.print_records("Inbound register:", &inbound)?;
        Ok(())
    }

    fn print_records(&mut self, title: &str, records: &[CallRecord]) -> Result<()> {
        writeln!(self.out, "{}", title)?;
        if records.is_empty() {
            writeln!(self.out, "(Empty)")?;
        }
        for record in records {
            writeln!(self.out, "{}", record)?;
        }
        Ok(())
    }

    async fn save_register(&mut self, phone: &Phone) -> Result<()> {
        self.prompt("File name: ")?;
        let Some(name) = self.input.next_line().await? else {
            return Ok(());
        };
        if validate_file_name(&name).is_err() {
            writeln!(self.out, "Given filename is invalid. Try again ...")?;
            return Ok(());
        }
        let path = self.config.export_path(&name);
        match save_register(phone, &path) {
            Ok(()) => writeln!(self.out, "Register saved to {}", path.display())?,
            Err(e) => writeln!(self.out, "{}", e)?,
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}
