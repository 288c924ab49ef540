//! Keyword-matching help responder

use crate::domain::{NovaError, Result};

/// Prefix of every answer
pub const ANSWER_PREFIX: &str = "Nova AI: ";

const UPLOAD_ANSWER: &str =
    "Your uploads are secured with checksum verification and metadata auditing.";
const SECURITY_ANSWER: &str =
    "We apply zero-trust principles, integrity hashing, and encrypted storage pipelines.";
const GENERIC_ANSWER: &str =
    "I can help with uploads, security practices, and status. Ask me about how we protect your data.";

/// Answer a help question
///
/// Matching is case-insensitive; "upload" takes precedence over "security".
///
/// # Errors
///
/// Returns `NovaError::Validation` if the question is blank.
pub fn answer(question: &str) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(NovaError::Validation("Question cannot be empty".to_string()));
    }

    let lowered = question.to_lowercase();
    let body = if lowered.contains("upload") {
        UPLOAD_ANSWER
    } else if lowered.contains("security") {
        SECURITY_ANSWER
    } else {
        GENERIC_ANSWER
    };

    Ok(format!("{ANSWER_PREFIX}{body}"))
}
