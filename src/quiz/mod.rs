mod parse;
mod request;
mod session;

use std::{collections::BTreeMap, fmt, fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    document::{submit_document, Document},
    error::QuizError,
    gemini::GenerativeService,
};

pub use parse::{parse_questions, strip_code_fence};
pub use request::{build_prompt, request_quiz};
pub use session::{Grade, Phase, QuizSession, SessionError};

/// One multiple-choice item as the model returns it. Missing or null fields
/// come back empty and scalars are kept as their text, rather than failing the
/// whole quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, deserialize_with = "lenient_text")]
    pub mcq: String,

    /// option label -> option text
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: BTreeMap<String, String>,

    /// literal text of the correct option
    #[serde(default, deserialize_with = "lenient_text")]
    pub correct: String,
}

/// `4` becomes "4", `true` becomes "true", null becomes "".
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_text)
}

/// Anything but an object yields no options.
fn lenient_options<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let options = match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(label, text)| (label, value_text(text)))
            .collect(),
        _ => BTreeMap::new(),
    };
    Ok(options)
}

impl Question {
    /// Whether `correct` names one of the options, so the question can be answered right.
    pub fn is_gradable(&self) -> bool {
        self.options.values().any(|o| *o == self.correct)
    }

    /// Resolves what the user typed to an option text: either a label (`b`)
    /// or a 1-based position in label order (`2`).
    pub fn option_for(&self, input: &str) -> Option<&str> {
        let input = input.trim();
        if let Some(text) = self
            .options
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(input))
            .map(|(_, text)| text)
        {
            return Some(text);
        }

        input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.options.values().nth(i))
            .map(String::as_str)
    }
}

/// An ordered set of questions, stored in the same `mcqs` shape the model answers with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    mcqs: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { mcqs: questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.mcqs
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.mcqs.get(index)
    }

    pub fn len(&self) -> usize {
        self.mcqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mcqs.is_empty()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self).context("failed to serialize quiz")?;
        fs::write(path, content).context(format!("failed to write quiz to {}", path.display()))
    }

    /// Accepts anything the response parser accepts, fenced model output included.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).context(format!("failed to read {}", path.display()))?;
        let questions = parse_questions(&content)?;
        Ok(Self::new(questions))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// Number of questions to ask for, between 1 and 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionCount(u8);

impl QuestionCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(count: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&count).then_some(Self(count))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(3)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizSettings {
    pub count: QuestionCount,
    pub difficulty: Difficulty,
}

impl QuizSettings {
    pub fn new(count: QuestionCount, difficulty: Difficulty) -> Self {
        Self { count, difficulty }
    }
}

/// Uploads `document`, asks the model for a quiz about it and parses the answer.
/// Nothing is returned unless every step succeeds.
pub fn generate_quiz<S>(
    service: &S,
    document: &Document,
    settings: &QuizSettings,
) -> Result<Quiz, QuizError>
where
    S: GenerativeService + ?Sized,
{
    let reference = submit_document(service, document)?;
    let raw = request_quiz(service, &reference, settings)?;
    let questions = parse_questions(&raw)?;
    Ok(Quiz::new(questions))
}
