//! Ingestion of raw annotation documents into an immutable [`Timeline`].
//!
//! Two document shapes are understood:
//! - captions: `{ "annotations": [ { "gameTime": "1 - 12:20", "description": "..." }, ... ] }`
//! - transcript: `[ { "start_time": 12.4, "end_time": 15.0, "text": "..." }, ... ]`
//!
//! Records that are not objects or lack either field are dropped silently.
//! A caption whose `gameTime` is present but unparseable is dropped with a
//! warning and counted in [`IngestReport::invalid_time`].

use crate::defaults::{CAPTION_PREFIX, TRANSCRIPT_PREFIX};
use crate::error::{MatchJuryError, Result};
use crate::timeline::event::{Event, parse_match_time};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

const ANNOTATIONS_KEY: &str = "annotations";
const GAME_TIME_KEY: &str = "gameTime";
const DESCRIPTION_KEY: &str = "description";
const START_TIME_KEY: &str = "start_time";
const TEXT_KEY: &str = "text";

/// Shape of the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Object with `annotations` → captions, top-level array → transcript.
    #[default]
    Auto,
    Captions,
    Transcript,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "captions" | "caption" => Ok(Self::Captions),
            "transcript" => Ok(Self::Transcript),
            other => Err(format!(
                "unknown input format '{other}' (expected auto, captions or transcript)"
            )),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Captions => write!(f, "captions"),
            Self::Transcript => write!(f, "transcript"),
        }
    }
}

/// Counters describing what ingestion kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: usize,
    /// Records missing a required field or not being objects at all.
    pub skipped: usize,
    /// Well-formed caption records whose match time failed to parse.
    pub invalid_time: usize,
}

/// Read-only mapping from match second to the texts that occurred in it.
///
/// Texts within one second keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    entries: BTreeMap<u32, Vec<String>>,
}

impl Timeline {
    /// Build a timeline from events; duplicate seconds accumulate.
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut entries: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for event in events {
            entries.entry(event.time_seconds).or_default().push(event.text);
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct seconds carrying at least one event.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of events across all seconds.
    pub fn event_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn first_second(&self) -> Option<u32> {
        self.entries.keys().next().copied()
    }

    pub fn last_second(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    pub fn events_at(&self, second: u32) -> &[String] {
        self.entries.get(&second).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All texts whose second lies in `start..=end`, ascending by second.
    pub fn events_between(&self, start: u32, end: u32) -> Vec<String> {
        if start > end {
            return Vec::new();
        }
        self.entries
            .range(start..=end)
            .flat_map(|(_, texts)| texts.iter().cloned())
            .collect()
    }
}

/// Extract events from caption records, applying the filtering contract.
pub fn events_from_captions(records: &[Value]) -> (Vec<Event>, IngestReport) {
    let mut report = IngestReport::default();
    let mut events = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let (Some(game_time), Some(description)) = (
            record.get(GAME_TIME_KEY).and_then(Value::as_str),
            record.get(DESCRIPTION_KEY).and_then(Value::as_str),
        ) else {
            report.skipped += 1;
            continue;
        };

        match parse_match_time(game_time) {
            Ok(seconds) => {
                events.push(Event::new(
                    seconds,
                    format!("{CAPTION_PREFIX} {description}"),
                ));
                report.accepted += 1;
            }
            Err(e) => {
                warn!(record = index, error = %e, "skipping caption with unparseable match time");
                report.invalid_time += 1;
            }
        }
    }

    (events, report)
}

/// Extract events from speech-to-text segments (`start_time` in seconds).
pub fn events_from_transcript(segments: &[Value]) -> (Vec<Event>, IngestReport) {
    let mut report = IngestReport::default();
    let mut events = Vec::with_capacity(segments.len());

    for segment in segments {
        let start = segment.get(START_TIME_KEY).and_then(Value::as_f64);
        let text = segment.get(TEXT_KEY).and_then(Value::as_str);
        match (start, text) {
            (Some(start), Some(text)) if start.is_finite() && start >= 0.0 => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    report.skipped += 1;
                    continue;
                }
                events.push(Event::new(
                    start.floor() as u32,
                    format!("{TRANSCRIPT_PREFIX} {trimmed}"),
                ));
                report.accepted += 1;
            }
            _ => report.skipped += 1,
        }
    }

    (events, report)
}

/// Build a timeline from an already-parsed input document.
pub fn build_timeline(document: &Value, format: InputFormat) -> Result<(Timeline, IngestReport)> {
    let shape = match format {
        InputFormat::Auto => detect_shape(document)?,
        InputFormat::Captions => Shape::Captions,
        InputFormat::Transcript => Shape::Transcript,
    };

    let (events, report) = match shape {
        Shape::Captions => {
            let records = document
                .get(ANNOTATIONS_KEY)
                .and_then(Value::as_array)
                .ok_or_else(|| MatchJuryError::InputParse {
                    message: format!("caption document has no '{ANNOTATIONS_KEY}' array"),
                })?;
            events_from_captions(records)
        }
        Shape::Transcript => {
            let segments = document
                .as_array()
                .ok_or_else(|| MatchJuryError::InputParse {
                    message: "transcript document must be a top-level array".to_string(),
                })?;
            events_from_transcript(segments)
        }
    };

    debug!(
        shape = ?shape,
        accepted = report.accepted,
        skipped = report.skipped,
        invalid_time = report.invalid_time,
        "ingested input document"
    );

    Ok((Timeline::from_events(events), report))
}

/// Read and ingest an input document from disk.
pub fn load_timeline(path: &Path, format: InputFormat) -> Result<(Timeline, IngestReport)> {
    let contents = std::fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&contents).map_err(|e| MatchJuryError::InputParse {
        message: format!("{}: {e}", path.display()),
    })?;
    build_timeline(&document, format)
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Captions,
    Transcript,
}

fn detect_shape(document: &Value) -> Result<Shape> {
    if document.get(ANNOTATIONS_KEY).is_some() {
        Ok(Shape::Captions)
    } else if document.is_array() {
        Ok(Shape::Transcript)
    } else {
        Err(MatchJuryError::InputParse {
            message: format!(
                "cannot detect input format: expected an object with '{ANNOTATIONS_KEY}' or a top-level array"
            ),
        })
    }
}
