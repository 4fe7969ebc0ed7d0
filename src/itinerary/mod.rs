//! Trip parameters, prompt construction and the itinerary request path.

pub mod cache;
pub mod prompt;
pub mod requester;

pub use cache::ItineraryCache;
pub use requester::Requester;

use chrono::NaiveDate;
use thiserror::Error;

use crate::consts::{MAX_DAYS, MIN_DAYS, UNKNOWN_NEXT_DESTINATION};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a destination.")]
    MissingDestination,

    #[error(
        "Number of traveling days must be between {min} and {max} (got {0}).",
        min = MIN_DAYS,
        max = MAX_DAYS
    )]
    DaysOutOfRange(u32),

    #[error("Number of traveling days must be a whole number (got {0:?}).")]
    InvalidDays(String),

    #[error("Departure date must look like YYYY-MM-DD (got {0:?}).")]
    InvalidDate(String),
}

/// One submission's worth of trip parameters. Built fresh per submit and
/// never mutated afterwards; doubles as the memoization key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TripRequest {
    days: u32,
    destination: String,
    departure: NaiveDate,
    next_destination: String,
}

impl TripRequest {
    /// Validate and normalize. An empty next destination becomes
    /// [`UNKNOWN_NEXT_DESTINATION`].
    pub fn new(
        days: u32,
        destination: &str,
        departure: NaiveDate,
        next_destination: &str,
    ) -> Result<Self, ValidationError> {
        if destination.trim().is_empty() {
            return Err(ValidationError::MissingDestination);
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
            return Err(ValidationError::DaysOutOfRange(days));
        }
        let next_destination = if next_destination.trim().is_empty() {
            UNKNOWN_NEXT_DESTINATION.to_string()
        } else {
            next_destination.to_string()
        };
        Ok(Self {
            days,
            destination: destination.to_string(),
            departure,
            next_destination,
        })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn departure(&self) -> NaiveDate {
        self.departure
    }

    pub fn next_destination(&self) -> &str {
        &self.next_destination
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    QuotaExceeded,
    Unexpected,
}

/// Outcome of one itinerary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItineraryResult {
    /// Raw backend text, untouched.
    Success { text: String },
    Failure { kind: FailureKind, detail: String },
}

impl ItineraryResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ItineraryResult::Success { .. })
    }
}
