//! Majority-threshold consensus over judge verdicts.
//!
//! Each window moves `Pending → Accepted | Rejected` exactly once. An
//! accepted window gets one summarizer call; if that call fails the window
//! stays accepted and carries no description.

use crate::consensus::summarizer::Summarizer;
use crate::judge::Verdict;
use crate::window::Window;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusState {
    Pending,
    Accepted,
    Rejected,
}

impl ConsensusState {
    /// Resolve a pending window. Resolved states are terminal.
    pub fn resolve(self, vote_count: usize, threshold: usize) -> Self {
        match self {
            Self::Pending if vote_count >= threshold => Self::Accepted,
            Self::Pending => Self::Rejected,
            resolved => resolved,
        }
    }
}

/// An accepted window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub window: Window,
    pub vote_count: usize,
    /// Panel size the votes were cast by.
    pub judge_count: usize,
    /// Present only when the summarizer succeeded.
    pub description: Option<String>,
}

/// Result of running consensus on one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOutcome {
    pub state: ConsensusState,
    pub vote_count: usize,
    pub abstentions: usize,
    pub decision: Option<Decision>,
}

/// Positive votes, one per distinct judge, abstentions excluded.
///
/// Independent of verdict order and never above the number of distinct
/// judges present.
pub fn count_votes(verdicts: &[Verdict]) -> usize {
    verdicts
        .iter()
        .filter(|v| v.is_positive && !v.abstained)
        .map(|v| v.judge_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub struct ConsensusAggregator {
    threshold: usize,
    judge_count: usize,
    summarizer: Arc<dyn Summarizer>,
    timeout: Duration,
}

impl ConsensusAggregator {
    /// A `threshold` of zero is raised to one; a window needs at least one vote.
    pub fn new(
        threshold: usize,
        judge_count: usize,
        summarizer: Arc<dyn Summarizer>,
        timeout: Duration,
    ) -> Self {
        Self {
            threshold: threshold.max(1),
            judge_count,
            summarizer,
            timeout,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Decide `window` from the complete set of its verdicts.
    pub async fn aggregate(&self, window: Window, verdicts: &[Verdict]) -> WindowOutcome {
        let vote_count = count_votes(verdicts).min(self.judge_count);
        let abstentions = verdicts.iter().filter(|v| v.abstained).count();
        let state = ConsensusState::Pending.resolve(vote_count, self.threshold);

        debug!(
            window_start = window.start_seconds,
            votes = vote_count,
            threshold = self.threshold,
            ?state,
            "consensus"
        );

        if state != ConsensusState::Accepted {
            return WindowOutcome {
                state,
                vote_count,
                abstentions,
                decision: None,
            };
        }

        let description = self.summarize(&window).await;
        info!(
            start = %window.start_clock(),
            end = %window.end_clock(),
            votes = vote_count,
            judges = self.judge_count,
            "highlight accepted"
        );

        WindowOutcome {
            state,
            vote_count,
            abstentions,
            decision: Some(Decision {
                window,
                vote_count,
                judge_count: self.judge_count,
                description,
            }),
        }
    }

    async fn summarize(&self, window: &Window) -> Option<String> {
        match tokio::time::timeout(self.timeout, self.summarizer.summarize(window)).await {
            Ok(Ok(sentence)) => Some(sentence),
            Ok(Err(e)) => {
                warn!(
                    summarizer = self.summarizer.name(),
                    window_start = window.start_seconds,
                    error = %e,
                    "event summarization failed"
                );
                None
            }
            Err(_) => {
                warn!(
                    summarizer = self.summarizer.name(),
                    window_start = window.start_seconds,
                    secs = self.timeout.as_secs(),
                    "event summarization timed out"
                );
                None
            }
        }
    }
}
