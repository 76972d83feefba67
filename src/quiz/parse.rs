use log::{debug, warn};
use serde_json::Value;

use super::Question;
use crate::error::{ParseError, QuizError};

const FENCE_OPENER: &str = "```json";
const FENCE_CLOSER: &str = "```";
const LIST_KEY: &str = "mcqs";

/// Removes a Markdown code fence tagged `json` from around `text`.
///
/// The result is trimmed and never starts with "```json" left by the model's
/// opener, nor ends with the closing "```". Text without a fence only loses
/// surrounding whitespace.
pub fn strip_code_fence(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix(FENCE_OPENER) {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix(FENCE_CLOSER) {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Parses raw model output into questions. A response whose `mcqs` key is
/// missing or null is an empty quiz; anything that is not JSON is an error
/// carrying `raw`.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, QuizError> {
    let questions = parse_list(strip_code_fence(raw)).map_err(|source| QuizError::Parse {
        source,
        raw: raw.to_string(),
    })?;

    for (index, question) in questions.iter().enumerate() {
        if !question.is_gradable() {
            warn!(
                "question {} has no option matching its correct answer {:?}",
                index + 1,
                question.correct
            );
        }
    }
    debug!("parsed {} questions", questions.len());

    Ok(questions)
}

fn parse_list(json: &str) -> Result<Vec<Question>, ParseError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(mut map) => match map.remove(LIST_KEY) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(list) => Ok(serde_json::from_value(list)?),
        },
        other => Err(ParseError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
