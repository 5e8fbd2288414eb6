//! Lesson outline / summary generation.

use aiweb_types::LessonResponse;
use tracing::debug;

use super::{require_non_blank, ServiceError};
use crate::provider::CompletionProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonKind {
    Outline,
    Summary,
}

impl LessonKind {
    fn action(self) -> &'static str {
        match self {
            LessonKind::Outline => "lesson outline",
            LessonKind::Summary => "lesson summary",
        }
    }

    fn prompt(self, topic: &str) -> String {
        match self {
            LessonKind::Outline => format!(
                "You are helping an instructor design a web programming lesson. \
                 Return a concise outline with 3-5 bullet points that cover the key \
                 concepts for the topic: {topic}."
            ),
            LessonKind::Summary => format!(
                "You are helping an instructor summarize a web programming lesson. \
                 Return a concise summary with 3-5 bullet points that highlight the key \
                 takeaways for the topic: {topic}."
            ),
        }
    }
}

/// Ask the provider for a lesson outline or summary and split it into lines.
pub async fn generate(
    provider: &dyn CompletionProvider,
    kind: LessonKind,
    topic: &str,
) -> Result<LessonResponse, ServiceError> {
    let topic = require_non_blank(topic, "Topic")?;

    let raw = provider
        .complete(&kind.prompt(topic))
        .await
        .map_err(ServiceError::provider(kind.action()))?;

    let outline = parse_outline_lines(&raw);
    debug!(kind = kind.action(), lines = outline.len(), "lesson generated");

    Ok(LessonResponse { topic: topic.to_owned(), outline })
}

/// Split provider text into plain outline lines.
///
/// Blank lines are dropped and leading bullet / numbering characters
/// (`-`, `*`, `•`, digits, `.`, spaces, tabs) are stripped.
pub fn parse_outline_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| {
                    matches!(c, '-' | '*' | '•' | '.' | ' ' | '\t') || c.is_ascii_digit()
                })
        })
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
