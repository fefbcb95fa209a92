//! Chat prompts for judge personas and the event summarizer.

use crate::backend::ChatMessage;
use crate::config::Persona;
use crate::window::Window;

const ANSWER_FORMAT: &str =
    "Start your reply with the single word YES or NO, then give a one-sentence justification.";

const IMPACT_SYSTEM: &str = "You are a football analyst who spots game-changing moments. \
    Decide whether the time window contains an event that directly affects the result of the match, \
    such as a goal, a penalty, a red card or another decisive turning point.";

const IMPACT_QUESTION: &str = "Does this window contain an event that could change the outcome \
    of the game, such as a goal, red card or penalty?";

const DRAMA_SYSTEM: &str = "You are a football analyst who spots emotionally charged moments. \
    Decide whether the time window contains high drama that would excite fans, such as a \
    spectacular save, a near miss, a controversial VAR decision or an intense crowd reaction, \
    even if the score does not change.";

const DRAMA_QUESTION: &str = "Is this an exciting highlight for viewers, such as a dramatic save, \
    near miss or controversial moment?";

const TACTICAL_SYSTEM: &str = "You are a tactical football analyst. Decide whether the time window \
    contains a strategically significant sequence, such as a momentum shift, an impactful \
    substitution, a formation change or coordinated build-up play leading to a chance.";

const TACTICAL_QUESTION: &str = "Does this window contain a tactically significant moment, such as \
    a momentum shift, impactful substitution or build-up play?";

const CUSTOM_QUESTION: &str = "Should this window be included in the match highlights?";

const SUMMARY_SYSTEM: &str = "You are a professional football commentator. Summarize the most \
    significant moment in a match window from the commentary lines provided. Use one sentence at \
    most and real-world football language (for example 'Goal by X' or 'Save by Y').";

fn persona_prompts(persona: Persona) -> (&'static str, &'static str) {
    match persona {
        Persona::Impact => (IMPACT_SYSTEM, IMPACT_QUESTION),
        Persona::Drama => (DRAMA_SYSTEM, DRAMA_QUESTION),
        Persona::Tactical => (TACTICAL_SYSTEM, TACTICAL_QUESTION),
        Persona::Custom => ("", CUSTOM_QUESTION),
    }
}

fn window_block(window: &Window) -> String {
    format!(
        "Time Window: {} to {}\nCommentary:\n{}",
        window.start_clock(),
        window.end_clock(),
        window.transcript()
    )
}

/// Messages asking one judge for a verdict on `window`.
///
/// `custom_system` replaces the persona's system prompt when set.
pub fn judge_messages(
    persona: Persona,
    custom_system: Option<&str>,
    window: &Window,
) -> Vec<ChatMessage> {
    let (system, question) = persona_prompts(persona);
    let system = custom_system.unwrap_or(system);
    vec![
        ChatMessage::system(format!("{system} {ANSWER_FORMAT}")),
        ChatMessage::user(format!(
            "{}\n\n{question} {ANSWER_FORMAT}",
            window_block(window)
        )),
    ]
}

/// Messages asking for a one-sentence summary of `window`.
pub fn summary_messages(window: &Window) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SUMMARY_SYSTEM),
        ChatMessage::user(format!(
            "Match commentary from {} to {}:\n{}\n\nSummarize the key event in this window.",
            window.start_clock(),
            window.end_clock(),
            window.transcript()
        )),
    ]
}
