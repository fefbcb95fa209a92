//! Output artifacts: highlight markers and highlight descriptions.
//!
//! Both collections are straight projections of the accepted decisions, in
//! window order. Nothing is filtered here.

use crate::consensus::Decision;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Marker-only highlight with vote provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRecord {
    pub start_time: String,
    pub end_time: String,
    pub description: String,
}

/// Highlight with its generated one-sentence summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightEvent {
    pub start_time: String,
    pub end_time: String,
    pub event: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub segments: Vec<HighlightRecord>,
    pub events: Vec<HighlightEvent>,
}

/// Destination files for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub segments: PathBuf,
    pub events: PathBuf,
}

impl ArtifactPaths {
    /// `<dir>/highlight_segments_<tag>.json` and `<dir>/highlight_events_<tag>.json`.
    pub fn new(dir: &Path, tag: &str) -> Self {
        let tag = file_safe(tag);
        Self {
            segments: dir.join(format!("highlight_segments_{tag}.json")),
            events: dir.join(format!("highlight_events_{tag}.json")),
        }
    }
}

fn file_safe(tag: &str) -> String {
    let cleaned: String = tag
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "run".to_string()
    } else {
        cleaned
    }
}

/// Provenance text, e.g. `Selected by 2/3 llama3 judges`.
pub fn provenance(decision: &Decision, label: &str) -> String {
    format!(
        "Selected by {}/{} {} judges",
        decision.vote_count, decision.judge_count, label
    )
}

/// Project decisions into both output collections.
///
/// Decisions without a description get `sentinel` in the events collection.
pub fn project(decisions: &[Decision], label: &str, sentinel: &str) -> Artifacts {
    let mut artifacts = Artifacts::default();
    for decision in decisions {
        let start_time = decision.window.start_clock();
        let end_time = decision.window.end_clock();
        artifacts.segments.push(HighlightRecord {
            start_time: start_time.clone(),
            end_time: end_time.clone(),
            description: provenance(decision, label),
        });
        artifacts.events.push(HighlightEvent {
            start_time,
            end_time,
            event: decision
                .description
                .clone()
                .unwrap_or_else(|| sentinel.to_string()),
        });
    }
    artifacts
}

/// Write both collections as pretty-printed JSON, creating the directory.
pub fn write_artifacts(artifacts: &Artifacts, paths: &ArtifactPaths) -> Result<()> {
    for parent in [paths.segments.parent(), paths.events.parent()]
        .into_iter()
        .flatten()
    {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(
        &paths.segments,
        serde_json::to_string_pretty(&artifacts.segments)?,
    )?;
    fs::write(&paths.events, serde_json::to_string_pretty(&artifacts.events)?)?;

    info!(
        segments = %paths.segments.display(),
        events = %paths.events.display(),
        highlights = artifacts.segments.len(),
        "artifacts written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Window;

    fn decision(start: u32, votes: usize, description: Option<&str>) -> Decision {
        Decision {
            window: Window {
                start_seconds: start,
                end_seconds: start + 60,
                events: vec!["x".to_string()],
            },
            vote_count: votes,
            judge_count: 3,
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn projection_keeps_order_and_pairs_collections() {
        let decisions = vec![
            decision(80, 2, Some("Goal by Kane.")),
            decision(100, 3, None),
        ];
        let artifacts = project(&decisions, "llama3", "Unknown event (error)");

        assert_eq!(artifacts.segments.len(), 2);
        assert_eq!(artifacts.events.len(), 2);
        assert_eq!(
            artifacts.segments[0],
            HighlightRecord {
                start_time: "0:01:20".to_string(),
                end_time: "0:02:20".to_string(),
                description: "Selected by 2/3 llama3 judges".to_string(),
            }
        );
        assert_eq!(artifacts.events[0].event, "Goal by Kane.");
        assert_eq!(artifacts.segments[1].start_time, "0:01:40");
        assert_eq!(artifacts.events[1].event, "Unknown event (error)");
    }

    #[test]
    fn empty_decisions_give_empty_collections() {
        let artifacts = project(&[], "llama3", "sentinel");
        assert!(artifacts.segments.is_empty());
        assert!(artifacts.events.is_empty());
    }

    #[test]
    fn paths_sanitize_tag() {
        let paths = ArtifactPaths::new(Path::new("out"), "meta-llama/llama-3.1:8b");
        assert_eq!(
            paths.segments,
            PathBuf::from("out/highlight_segments_meta-llama_llama-3.1_8b.json")
        );
        assert_eq!(
            paths.events,
            PathBuf::from("out/highlight_events_meta-llama_llama-3.1_8b.json")
        );
        assert_eq!(
            ArtifactPaths::new(Path::new("."), "  ").segments,
            PathBuf::from("./highlight_segments_run.json")
        );
    }

    #[test]
    fn write_artifacts_round_trips_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(&dir.path().join("nested"), "mistral");
        let artifacts = project(&[decision(0, 2, Some("Save by Alisson."))], "mistral", "s");

        write_artifacts(&artifacts, &paths).unwrap();

        let segments: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.segments).unwrap()).unwrap();
        assert_eq!(segments[0]["start_time"], "0:00:00");
        assert_eq!(segments[0]["end_time"], "0:01:00");
        assert_eq!(segments[0]["description"], "Selected by 2/3 mistral judges");

        let events: Vec<HighlightEvent> =
            serde_json::from_str(&fs::read_to_string(&paths.events).unwrap()).unwrap();
        assert_eq!(events, artifacts.events);
    }
}
