//! End-to-end detection over a caption document with scripted judges.

use matchjury::artifacts::{ArtifactPaths, HighlightEvent, HighlightRecord, project, write_artifacts};
use matchjury::consensus::{ConsensusAggregator, MockSummarizer};
use matchjury::judge::{Judge, JudgeEnsemble, MockJudge};
use matchjury::timeline::{InputFormat, build_timeline};
use matchjury::window::{WindowConfig, generate_windows};
use matchjury::{HighlightDetector, MatchJuryError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const SENTINEL: &str = "Unknown event (error)";

fn captions() -> serde_json::Value {
    json!({
        "UrlLocal": "england_epl/2016-2017/liverpool-arsenal",
        "annotations": [
            {"gameTime": "1 - 00:00", "description": "The referee blows the whistle."},
            {"gameTime": "1 - 01:40", "description": "Goal! A thunderous strike into the top corner."},
            {"gameTime": "1 - 01:45", "description": "The players celebrate with the fans."},
            {"gameTime": "1 - 03:30", "description": "Throw-in deep in midfield."},
            {"gameTime": "half time", "description": "This record has a broken clock."},
            {"gameTime": "1 - 04:00"},
            "garbage",
            {"gameTime": "1 - 05:00", "description": "Possession recycled at the back."}
        ]
    })
}

fn detector(judges: Vec<MockJudge>, summarizer: MockSummarizer) -> HighlightDetector {
    let n = judges.len();
    let judges: Vec<Arc<dyn Judge>> = judges
        .into_iter()
        .map(|j| Arc::new(j) as Arc<dyn Judge>)
        .collect();
    HighlightDetector::new(
        JudgeEnsemble::new(judges, Duration::from_secs(5)),
        ConsensusAggregator::new(2, n, Arc::new(summarizer), Duration::from_secs(5)),
    )
}

#[tokio::test]
async fn goal_windows_are_selected_and_written() {
    let (timeline, report) = build_timeline(&captions(), InputFormat::Auto).unwrap();
    assert_eq!(report.accepted, 5);
    assert_eq!(report.invalid_time, 1);
    assert_eq!(report.skipped, 2);

    let windows = generate_windows(&timeline, &WindowConfig::default()).unwrap();
    let det = detector(
        vec![
            MockJudge::new("impact").voting_yes_on("Goal"),
            MockJudge::new("drama").voting_yes_on("celebrate"),
            MockJudge::new("tactical"),
        ],
        MockSummarizer::new("Goal from long range."),
    );

    let detection = det.run(windows).await;

    // 60, 80 and 100 span both the goal (100) and the celebration (105); 40 stops at 100.
    let starts: Vec<u32> = detection
        .decisions
        .iter()
        .map(|d| d.window.start_seconds)
        .collect();
    assert_eq!(starts, vec![60, 80, 100]);
    assert!(detection.decisions.iter().all(|d| d.vote_count == 2));

    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path(), "llama3");
    let artifacts = project(&detection.decisions, "llama3", SENTINEL);
    write_artifacts(&artifacts, &paths).unwrap();

    let segments: Vec<HighlightRecord> =
        serde_json::from_str(&std::fs::read_to_string(&paths.segments).unwrap()).unwrap();
    let events: Vec<HighlightEvent> =
        serde_json::from_str(&std::fs::read_to_string(&paths.events).unwrap()).unwrap();

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[1].start_time, "0:01:20");
    assert_eq!(segments[1].end_time, "0:02:20");
    assert_eq!(segments[1].description, "Selected by 2/3 llama3 judges");
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.event == "Goal from long range."));
}

#[tokio::test]
async fn judge_outage_yields_no_highlights() {
    let (timeline, _) = build_timeline(&captions(), InputFormat::Captions).unwrap();
    let windows = generate_windows(&timeline, &WindowConfig::default()).unwrap();
    let window_count = windows.len();
    let det = detector(
        vec![
            MockJudge::new("a").with_failure(),
            MockJudge::new("b").with_failure(),
            MockJudge::new("c").with_failure(),
        ],
        MockSummarizer::new("never used"),
    );

    let mut votes = Vec::new();
    let detection = det
        .run_with_progress(windows, |outcome| votes.push(outcome.vote_count))
        .await;

    assert_eq!(votes.len(), window_count);
    assert!(votes.iter().all(|&v| v == 0));
    assert!(detection.decisions.is_empty());
    assert_eq!(detection.report.judge_abstentions, window_count * 3);
}

#[tokio::test]
async fn summarizer_outage_keeps_markers_and_uses_sentinel() {
    let (timeline, _) = build_timeline(&captions(), InputFormat::Auto).unwrap();
    let windows = generate_windows(&timeline, &WindowConfig::default()).unwrap();
    let det = detector(
        vec![
            MockJudge::new("a").voting_yes_on("Goal"),
            MockJudge::new("b").voting_yes_on("Goal"),
            MockJudge::new("c").with_failure(),
        ],
        MockSummarizer::failing(),
    );

    let detection = det.run(windows).await;
    assert!(!detection.decisions.is_empty());

    let artifacts = project(&detection.decisions, "mistral", SENTINEL);
    assert_eq!(artifacts.segments.len(), detection.decisions.len());
    assert_eq!(artifacts.events.len(), detection.decisions.len());
    assert!(artifacts.events.iter().all(|e| e.event == SENTINEL));
    assert_eq!(
        detection.report.summary_failures,
        detection.decisions.len()
    );
}

#[test]
fn empty_document_is_a_structural_error() {
    let (timeline, _) = build_timeline(&json!({"annotations": []}), InputFormat::Auto).unwrap();
    let err = generate_windows(&timeline, &WindowConfig::default()).unwrap_err();
    assert!(matches!(err, MatchJuryError::EmptyInput));
}
