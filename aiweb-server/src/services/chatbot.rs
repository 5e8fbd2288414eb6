//! Stateless multi-turn chat relay.
//!
//! Every call rebuilds the full prompt from the caller-supplied history; the
//! server keeps nothing between calls.  History is rendered oldest first as
//! `User: ...` / `Assistant: ...` lines after a fixed system prompt, followed
//! by the new message and a trailing `Assistant:` cue.

use std::sync::LazyLock;

use aiweb_types::{ChatResponse, Message, Role};
use regex::Regex;
use tracing::debug;

use super::{require_non_blank, ServiceError};
use crate::provider::CompletionProvider;

const SYSTEM_PROMPT: &str = "You are a helpful AI teaching assistant for a web programming course. \
Provide clear, well-structured answers about web development, AI integration, \
FastAPI, React, and related technologies. \n\n\
Guidelines:\n\
- Keep responses concise and educational\n\
- Use proper formatting with clear paragraphs\n\
- When listing items, use clear numbering or bullet points\n\
- Avoid excessive markdown formatting\n\
- Focus on practical, actionable information\n\
- Stay relevant to web programming topics";

static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line pattern compiles"));
static PERIOD_BEFORE_CAPITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([A-Z])").expect("period pattern compiles"));
static COMMA_BEFORE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",([A-Za-z])").expect("comma pattern compiles"));

/// Returned instead of an empty completion.
pub const EMPTY_REPLY_NOTICE: &str =
    "I apologize, but I couldn't generate a response. Please try again.";

/// Validate `message` and every `history` entry, forward them to the
/// provider and wrap the reply as one assistant turn.
pub async fn send_chat_message(
    provider: &dyn CompletionProvider,
    message: &str,
    history: &[Message],
) -> Result<ChatResponse, ServiceError> {
    let message = require_non_blank(message, "Message")?;
    if history.iter().any(|m| m.content.trim().is_empty()) {
        return Err(ServiceError::Validation("History messages must not be empty.".to_owned()));
    }
    let prompt = build_prompt(message, history);

    debug!(history_len = history.len(), prompt_len = prompt.len(), "chat relay request");

    let raw = provider
        .complete(&prompt)
        .await
        .map_err(ServiceError::provider("chatbot response"))?;

    let content = clean_response_text(&raw);
    if content.is_empty() {
        return Ok(ChatResponse::assistant(EMPTY_REPLY_NOTICE));
    }
    Ok(ChatResponse::assistant(content))
}

fn build_prompt(message: &str, history: &[Message]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str("\n\n");
    for msg in history {
        prompt.push_str(role_label(msg.role));
        prompt.push_str(": ");
        prompt.push_str(&msg.content);
        prompt.push('\n');
    }
    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push_str("\nAssistant:");
    prompt
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
    }
}

/// Tidy provider output: collapse runs of blank lines, trim every line, put
/// a space after sentence / list punctuation that lacks one, and strip stray
/// markdown markers from both ends.
fn clean_response_text(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    let text = BLANK_LINE_RUN.replace_all(text, "\n\n");
    let text = text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n");
    let text = PERIOD_BEFORE_CAPITAL.replace_all(&text, ". $1");
    let text = COMMA_BEFORE_LETTER.replace_all(&text, ", $1");

    text.trim_matches(|c: char| matches!(c, '*' | '-' | '_')).to_owned()
}
