//! Collecting trip parameters and secrets from the user.
//!
//! Everything reads through a [`Prompter`] so commands can be driven by
//! the terminal or by a script in tests.

pub mod scripted;
pub mod terminal;

use anyhow::Result;
use chrono::NaiveDate;

use crate::consts::DEFAULT_DAYS;
use crate::itinerary::ValidationError;

/// Source of user input.
pub trait Prompter: Send + Sync {
    /// Read one line, trimmed. `None` on end of input.
    fn read_line(&self, label: &str) -> Result<Option<String>>;

    /// Read a masked value (password, API key).
    fn read_secret(&self, label: &str) -> Result<String>;
}

/// Raw answers to the trip form, before [`TripRequest`] validation.
///
/// [`TripRequest`]: crate::itinerary::TripRequest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripForm {
    pub days: u32,
    pub destination: String,
    pub departure: NaiveDate,
    pub next_destination: String,
}

/// Ask for every field of the trip form.
///
/// Blank days default to [`DEFAULT_DAYS`]; a blank date defaults to `today`.
pub fn collect_trip(prompter: &dyn Prompter, today: NaiveDate) -> Result<TripForm> {
    let days = prompter.read_line(&format!("Number of traveling days [{DEFAULT_DAYS}]: "))?;
    let days = parse_days(days.as_deref().unwrap_or(""))?;

    let destination = prompter.read_line("Destination: ")?.unwrap_or_default();

    let departure = prompter.read_line(&format!("Departure date [{today}]: "))?;
    let departure = parse_date(departure.as_deref().unwrap_or(""), today)?;

    let next_destination = prompter
        .read_line("Next destination (optional): ")?
        .unwrap_or_default();

    Ok(TripForm {
        days,
        destination,
        departure,
        next_destination,
    })
}

pub fn parse_days(input: &str) -> Result<u32, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(DEFAULT_DAYS);
    }
    input
        .parse()
        .map_err(|_| ValidationError::InvalidDays(input.to_string()))
}

pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}
