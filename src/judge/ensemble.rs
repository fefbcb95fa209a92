//! Ensemble that asks every judge about a window concurrently.
//!
//! Each judge call is independent and bounded by a timeout. Any call that
//! does not yield a YES/NO becomes an abstaining [`Verdict`]. The ensemble
//! returns only once every judge has answered or failed.

use crate::error::MatchJuryError;
use crate::judge::verdict::{Verdict, parse_verdict};
use crate::judge::Judge;
use crate::window::Window;
use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct JudgeEnsemble {
    judges: Vec<Arc<dyn Judge>>,
    timeout: Duration,
}

impl JudgeEnsemble {
    /// Judge ids must be unique; votes are counted per id.
    pub fn new(judges: Vec<Arc<dyn Judge>>, timeout: Duration) -> Self {
        debug_assert!(
            {
                let mut seen = HashSet::new();
                judges.iter().all(|j| seen.insert(j.id().to_string()))
            },
            "duplicate judge id in ensemble"
        );
        Self { judges, timeout }
    }

    /// Number of judges, i.e. the maximum possible vote count.
    pub fn len(&self) -> usize {
        self.judges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judges.is_empty()
    }

    pub fn judge_ids(&self) -> Vec<&str> {
        self.judges.iter().map(|j| j.id()).collect()
    }

    /// One verdict per judge, in panel order.
    pub async fn evaluate(&self, window: &Window) -> Vec<Verdict> {
        let calls = self
            .judges
            .iter()
            .map(|judge| self.ask(judge.as_ref(), window));
        join_all(calls).await
    }

    async fn ask(&self, judge: &dyn Judge, window: &Window) -> Verdict {
        let id = judge.id();
        let outcome = match tokio::time::timeout(self.timeout, judge.evaluate(window)).await {
            Ok(result) => result,
            Err(_) => Err(MatchJuryError::JudgeTimeout {
                judge: id.to_string(),
                secs: self.timeout.as_secs(),
            }),
        };

        match outcome {
            Ok(reply) => {
                let verdict = parse_verdict(id, &reply);
                if verdict.abstained {
                    warn!(
                        judge = id,
                        window_start = window.start_seconds,
                        "judge reply carried no YES/NO verdict, counting as no vote"
                    );
                } else {
                    debug!(
                        judge = id,
                        window_start = window.start_seconds,
                        positive = verdict.is_positive,
                        "judge verdict"
                    );
                }
                verdict
            }
            Err(e) => {
                warn!(
                    judge = id,
                    window_start = window.start_seconds,
                    error = %e,
                    "judge call failed, counting as no vote"
                );
                Verdict::abstain(id, e.to_string())
            }
        }
    }
}
