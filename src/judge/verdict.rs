//! Reduction of free-text judge replies to a binary verdict.
//!
//! Judges are asked to open their reply with `YES` or `NO`. The first
//! alphabetic word decides when it is one of those (case-insensitive,
//! punctuation and markdown ignored). Otherwise the first standalone
//! `yes`/`no` word anywhere in the reply decides. Words that merely
//! contain the letters ("eyes", "nothing") never count. A reply with
//! neither token is unparseable and treated as a non-vote.

/// One judge's opinion on one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub judge_id: String,
    pub is_positive: bool,
    pub rationale: Option<String>,
    /// The judge failed or replied without a verdict token; counts as no vote.
    pub abstained: bool,
}

impl Verdict {
    /// Non-vote recorded for a failed or unparseable judge call.
    pub fn abstain(judge_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            judge_id: judge_id.into(),
            is_positive: false,
            rationale: (!reason.is_empty()).then_some(reason),
            abstained: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Yes,
    No,
}

fn token(word: &str) -> Option<Token> {
    if word.eq_ignore_ascii_case("yes") {
        Some(Token::Yes)
    } else if word.eq_ignore_ascii_case("no") {
        Some(Token::No)
    } else {
        None
    }
}

/// Byte spans of maximal alphabetic runs.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_alphabetic(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a judge reply into a [`Verdict`].
pub fn parse_verdict(judge_id: &str, response: &str) -> Verdict {
    let spans = word_spans(response);

    if let Some(&(start, end)) = spans.first()
        && let Some(tok) = token(&response[start..end])
    {
        let rest = response[end..].trim_start_matches(|c: char| !c.is_alphanumeric());
        return Verdict {
            judge_id: judge_id.to_string(),
            is_positive: tok == Token::Yes,
            rationale: non_empty(rest),
            abstained: false,
        };
    }

    let found = spans
        .iter()
        .find_map(|&(start, end)| token(&response[start..end]));

    match found {
        Some(tok) => Verdict {
            judge_id: judge_id.to_string(),
            is_positive: tok == Token::Yes,
            rationale: non_empty(response),
            abstained: false,
        },
        None => Verdict::abstain(judge_id, response.trim()),
    }
}
