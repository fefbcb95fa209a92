//! Sequential highlight detection over an ordered window sequence.
//!
//! Windows are processed one at a time in chronological order. Within a
//! window the judges run concurrently and the aggregator waits for all of
//! them. Decisions are appended only after a window is fully resolved, so
//! output order always matches window order.

use crate::backend::ChatBackend;
use crate::config::Config;
use crate::consensus::{ConsensusAggregator, ConsensusState, Decision, LlmSummarizer, WindowOutcome};
use crate::judge::{JudgeEnsemble, build_judges};
use crate::window::Window;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Counters for one detection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub windows: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Judge calls that failed, timed out or gave no verdict.
    pub judge_abstentions: usize,
    /// Accepted windows whose summary fell back to the sentinel.
    pub summary_failures: usize,
}

impl RunReport {
    fn record(&mut self, outcome: &WindowOutcome) {
        self.windows += 1;
        self.judge_abstentions += outcome.abstentions;
        match outcome.state {
            ConsensusState::Accepted => {
                self.accepted += 1;
                if outcome
                    .decision
                    .as_ref()
                    .is_some_and(|d| d.description.is_none())
                {
                    self.summary_failures += 1;
                }
            }
            ConsensusState::Rejected => self.rejected += 1,
            ConsensusState::Pending => {}
        }
    }
}

/// Accepted decisions in window order, plus run counters.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub decisions: Vec<Decision>,
    pub report: RunReport,
}

pub struct HighlightDetector {
    ensemble: JudgeEnsemble,
    aggregator: ConsensusAggregator,
}

impl HighlightDetector {
    pub fn new(ensemble: JudgeEnsemble, aggregator: ConsensusAggregator) -> Self {
        Self {
            ensemble,
            aggregator,
        }
    }

    /// Wire LLM judges and summarizer from `config` onto `backend`.
    pub fn from_config(config: &Config, backend: Arc<dyn ChatBackend>) -> Self {
        let timeout = Duration::from_secs(config.backend.timeout_secs);
        let judges = build_judges(config, &backend);
        let judge_count = judges.len();
        let summarizer = Arc::new(LlmSummarizer::new(config.summarizer_model(), backend));
        Self::new(
            JudgeEnsemble::new(judges, timeout),
            ConsensusAggregator::new(config.threshold(), judge_count, summarizer, timeout),
        )
    }

    pub fn judge_count(&self) -> usize {
        self.ensemble.len()
    }

    pub fn threshold(&self) -> usize {
        self.aggregator.threshold()
    }

    pub async fn run(&self, windows: Vec<Window>) -> Detection {
        self.run_with_progress(windows, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_window` after each window resolves.
    pub async fn run_with_progress<F>(&self, windows: Vec<Window>, mut on_window: F) -> Detection
    where
        F: FnMut(&WindowOutcome),
    {
        let mut detection = Detection::default();
        info!(
            windows = windows.len(),
            judges = self.ensemble.len(),
            threshold = self.aggregator.threshold(),
            "evaluating windows"
        );

        for window in windows {
            let verdicts = self.ensemble.evaluate(&window).await;
            let mut outcome = self.aggregator.aggregate(window, &verdicts).await;
            detection.report.record(&outcome);
            on_window(&outcome);
            if let Some(decision) = outcome.decision.take() {
                detection.decisions.push(decision);
            }
        }

        info!(
            windows = detection.report.windows,
            accepted = detection.report.accepted,
            judge_abstentions = detection.report.judge_abstentions,
            summary_failures = detection.report.summary_failures,
            "detection finished"
        );
        detection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::MockSummarizer;
    use crate::judge::{Judge, MockJudge};

    fn window(start: u32, events: &[&str]) -> Window {
        Window {
            start_seconds: start,
            end_seconds: start + 60,
            events: events.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn detector(judges: Vec<MockJudge>, summarizer: MockSummarizer) -> HighlightDetector {
        let judge_count = judges.len();
        let judges: Vec<Arc<dyn Judge>> = judges
            .into_iter()
            .map(|j| Arc::new(j) as Arc<dyn Judge>)
            .collect();
        HighlightDetector::new(
            JudgeEnsemble::new(judges, Duration::from_secs(5)),
            ConsensusAggregator::new(
                crate::defaults::majority_threshold(judge_count),
                judge_count,
                Arc::new(summarizer),
                Duration::from_secs(5),
            ),
        )
    }

    #[tokio::test]
    async fn accepted_windows_keep_chronological_order() {
        let det = detector(
            vec![
                MockJudge::new("a").voting_yes_on("Goal"),
                MockJudge::new("b").voting_yes_on("Goal"),
                MockJudge::new("c"),
            ],
            MockSummarizer::new("Goal."),
        );
        let windows = vec![
            window(0, &["Goal"]),
            window(20, &["Throw-in"]),
            window(40, &["Goal", "VAR check"]),
        ];

        let detection = det.run(windows).await;

        let starts: Vec<u32> = detection
            .decisions
            .iter()
            .map(|d| d.window.start_seconds)
            .collect();
        assert_eq!(starts, vec![0, 40]);
        assert_eq!(
            detection.report,
            RunReport {
                windows: 3,
                accepted: 2,
                rejected: 1,
                judge_abstentions: 0,
                summary_failures: 0,
            }
        );
    }

    #[tokio::test]
    async fn always_failing_backend_accepts_nothing() {
        let det = detector(
            vec![
                MockJudge::new("a").with_failure(),
                MockJudge::new("b").with_failure(),
                MockJudge::new("c").with_failure(),
            ],
            MockSummarizer::new("unused"),
        );
        let mut vote_counts = Vec::new();
        let detection = det
            .run_with_progress(vec![window(0, &["Goal"]), window(20, &["Goal"])], |o| {
                vote_counts.push(o.vote_count)
            })
            .await;

        assert_eq!(vote_counts, vec![0, 0]);
        assert!(detection.decisions.is_empty());
        assert_eq!(detection.report.judge_abstentions, 6);
        assert_eq!(detection.report.rejected, 2);
    }

    #[tokio::test]
    async fn summary_failure_is_counted_not_dropped() {
        let det = detector(
            vec![
                MockJudge::new("a").with_response("YES"),
                MockJudge::new("b").with_response("YES"),
                MockJudge::new("c").with_response("NO"),
            ],
            MockSummarizer::failing(),
        );
        let detection = det.run(vec![window(0, &["Goal"])]).await;
        assert_eq!(detection.decisions.len(), 1);
        assert_eq!(detection.decisions[0].description, None);
        assert_eq!(detection.report.summary_failures, 1);
    }

    #[test]
    fn from_config_uses_panel_and_threshold() {
        let backend = crate::backend::create_backend(&Config::default().backend).unwrap();
        let det = HighlightDetector::from_config(&Config::default(), backend);
        assert_eq!(det.judge_count(), 3);
        assert_eq!(det.threshold(), 2);
    }
}
