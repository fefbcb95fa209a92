//! Sliding-window generation over a [`Timeline`].
//!
//! Window starts run over `[first_second, last_second)` in `step_size`
//! increments; each window covers the inclusive range
//! `[start, start + window_size]`. Later windows may reach past the final
//! event to pick up trailing context. Windows without events are dropped.

use crate::defaults;
use crate::error::{MatchJuryError, Result};
use crate::timeline::{Timeline, format_clock};
use serde::Serialize;

/// Sizing of the sliding window, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub window_size: u32,
    pub step_size: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: defaults::WINDOW_SIZE,
            step_size: defaults::STEP_SIZE,
        }
    }
}

/// A slice of the match timeline handed to the judges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start_seconds: u32,
    pub end_seconds: u32,
    /// Event texts in ascending time order.
    pub events: Vec<String>,
}

impl Window {
    /// Start time as `H:MM:SS`.
    pub fn start_clock(&self) -> String {
        format_clock(self.start_seconds)
    }

    /// End time as `H:MM:SS`.
    pub fn end_clock(&self) -> String {
        format_clock(self.end_seconds)
    }

    /// Event texts joined one per line, as presented to judges.
    pub fn transcript(&self) -> String {
        self.events.join("\n")
    }
}

/// Slice `timeline` into overlapping windows.
///
/// # Errors
///
/// Returns [`MatchJuryError::EmptyInput`] when the timeline holds no events,
/// and [`MatchJuryError::ConfigInvalidValue`] for a zero step or window size.
pub fn generate_windows(timeline: &Timeline, config: &WindowConfig) -> Result<Vec<Window>> {
    if config.step_size == 0 {
        return Err(MatchJuryError::ConfigInvalidValue {
            key: "windowing.step_size".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    if config.window_size == 0 {
        return Err(MatchJuryError::ConfigInvalidValue {
            key: "windowing.window_size".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    let (Some(first), Some(last)) = (timeline.first_second(), timeline.last_second()) else {
        return Err(MatchJuryError::EmptyInput);
    };

    let windows = (first..last)
        .step_by(config.step_size as usize)
        .filter_map(|start| {
            let end = start.saturating_add(config.window_size);
            let events = timeline.events_between(start, end);
            (!events.is_empty()).then_some(Window {
                start_seconds: start,
                end_seconds: end,
                events,
            })
        })
        .collect();

    Ok(windows)
}
