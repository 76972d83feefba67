use log::{debug, warn};
use serde_json::json;

use super::QuizSettings;
use crate::{
    error::QuizError,
    gemini::{DocumentRef, GenerativeService},
};

fn response_schema() -> String {
    let schema = json!({
        "mcqs": [
            {
                "mcq": "multiple choice question",
                "options": {
                    "a": "choice 1",
                    "b": "choice 2",
                    "c": "choice 3",
                    "d": "choice 4",
                },
                "correct": "The full text of the correct choice",
            }
        ]
    });

    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Instruction sent alongside the uploaded document.
pub fn build_prompt(settings: &QuizSettings) -> String {
    format!(
        r#"You are an expert in generating MCQ quizzes based on provided content.
Given the content from the attached file, create a quiz of {count} multiple choice questions.
The difficulty of the questions should be {difficulty}.
Ensure the questions are not repeated and are directly based on the provided text.
Your response MUST be a valid JSON object. Format your response exactly like the JSON schema below.
The "correct" field must contain the full text of the correct option, which must also be one of the values in the "options" dictionary.

JSON Schema:
```json
{schema}
```
"#,
        count = settings.count.get(),
        difficulty = settings.difficulty,
        schema = response_schema(),
    )
}

/// Asks the model for a quiz about `document` and returns its raw text.
pub fn request_quiz<S>(
    service: &S,
    document: &DocumentRef,
    settings: &QuizSettings,
) -> Result<String, QuizError>
where
    S: GenerativeService + ?Sized,
{
    let prompt = build_prompt(settings);
    let generation = service.generate(&prompt, document)?;

    match generation.text() {
        Some(text) => {
            debug!("model response: {}", text);
            Ok(text.to_string())
        }
        None => {
            let feedback = generation.prompt_feedback().map(|f| f.to_string());
            warn!("model returned no text, prompt feedback: {:?}", feedback);
            Err(QuizError::EmptyResponse { feedback })
        }
    }
}
