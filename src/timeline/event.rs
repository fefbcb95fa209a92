//! Timestamped commentary events and match-clock conversions.

use crate::defaults::HALF_LENGTH_SECS;
use crate::error::{MatchJuryError, Result};

/// A single piece of commentary pinned to an absolute match second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Seconds since kick-off, second half offset by one full half.
    pub time_seconds: u32,
    /// Event text, already carrying its source prefix.
    pub text: String,
}

impl Event {
    pub fn new(time_seconds: u32, text: impl Into<String>) -> Self {
        Self {
            time_seconds,
            text: text.into(),
        }
    }
}

/// Parse a match-time string of the form `"<half> - <mm>:<ss>"` into seconds.
///
/// `half` must be 1 or 2. Minutes are unbounded so stoppage time
/// (`"1 - 47:12"`) is accepted; seconds must be below 60.
pub fn parse_match_time(value: &str) -> Result<u32> {
    let invalid = |message: &str| MatchJuryError::InvalidMatchTime {
        value: value.to_string(),
        message: message.to_string(),
    };

    let (half, clock) = value
        .split_once(" - ")
        .ok_or_else(|| invalid("expected \"<half> - <mm>:<ss>\""))?;
    let (minutes, seconds) = clock
        .split_once(':')
        .ok_or_else(|| invalid("expected mm:ss after the half"))?;

    let half: u32 = half
        .trim()
        .parse()
        .map_err(|_| invalid("half is not a number"))?;
    let minutes: u32 = minutes
        .trim()
        .parse()
        .map_err(|_| invalid("minutes are not a number"))?;
    let seconds: u32 = seconds
        .trim()
        .parse()
        .map_err(|_| invalid("seconds are not a number"))?;

    if !(1..=2).contains(&half) {
        return Err(invalid("half must be 1 or 2"));
    }
    if seconds >= 60 {
        return Err(invalid("seconds must be below 60"));
    }

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add((half - 1) * HALF_LENGTH_SECS + seconds))
        .ok_or_else(|| invalid("minutes out of range"))
}

/// Render absolute seconds as `H:MM:SS` (hours unpadded, e.g. `0:01:20`).
pub fn format_clock(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
