//! Turns a moderation reply into a [`ModerationVerdict`].

use std::fmt;

use crate::error::{AssistantError, Result};

const VERDICT_FIELD: &str = "verdict";
const EXPLANATION_MARKER: &str = "Explanation:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationVerdict {
    pub appropriate: bool,
    pub explanation: String,
}

impl ModerationVerdict {
    pub fn status(&self) -> &'static str {
        if self.appropriate {
            "Appropriate"
        } else {
            "Inappropriate"
        }
    }
}

impl fmt::Display for ModerationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status: {}\nExplanation: {}", self.status(), self.explanation)
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

fn label(word: &str) -> Option<bool> {
    if word.eq_ignore_ascii_case("appropriate") {
        Some(true)
    } else if word.eq_ignore_ascii_case("inappropriate") {
        Some(false)
    } else {
        None
    }
}

/// The value of a `Verdict:` field line, tolerating markdown emphasis such
/// as `**Verdict:** Appropriate`.
fn verdict_field(line: &str) -> Option<&str> {
    let line = line.trim_start_matches(|c: char| !c.is_alphanumeric());
    let head = line.get(..VERDICT_FIELD.len())?;
    if !head.eq_ignore_ascii_case(VERDICT_FIELD) {
        return None;
    }
    let rest = line[VERDICT_FIELD.len()..].trim_start_matches(|c: char| c == '*' || c.is_whitespace());
    rest.strip_prefix(':')
}

/// Parse the model's reply.
///
/// If a `Verdict:` line is present, its first word alone decides. Otherwise
/// the reply must open with the label. `Appropriate` and `Inappropriate`
/// are compared as whole words ignoring ASCII case, so "Inappropriate"
/// never reads as "Appropriate". Anything else is [`AssistantError::Parse`].
pub fn parse_verdict(text: &str) -> Result<ModerationVerdict> {
    let appropriate = match text.lines().find_map(verdict_field) {
        Some(value) => words(value).next().and_then(label).ok_or_else(|| {
            AssistantError::Parse(format!("unrecognised verdict field: {:?}", value.trim()))
        })?,
        None => words(text).next().and_then(label).ok_or_else(|| {
            AssistantError::Parse(format!(
                "reply does not start with Appropriate/Inappropriate: {:?}",
                text.trim()
            ))
        })?,
    };

    let explanation = match text.rfind(EXPLANATION_MARKER) {
        Some(idx) => text[idx + EXPLANATION_MARKER.len()..].trim(),
        None => text.trim(),
    };

    Ok(ModerationVerdict {
        appropriate,
        explanation: explanation.to_string(),
    })
}
