//! Vote aggregation and summarization of accepted windows.

pub mod aggregator;
pub mod summarizer;

pub use aggregator::{ConsensusAggregator, ConsensusState, Decision, WindowOutcome, count_votes};
pub use summarizer::{LlmSummarizer, MockSummarizer, Summarizer};
