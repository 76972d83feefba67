use std::error::Error as StdError;

use thiserror::Error;

use crate::gemini::RequestError;

/// Everything that can abort a quiz generation attempt.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Error processing file {name}")]
    Upload {
        name: String,
        #[source]
        source: UploadError,
    },

    #[error("An error occurred during content generation")]
    Generation(#[from] RequestError),

    #[error("Model did not generate any text.")]
    EmptyResponse { feedback: Option<String> },

    /// `raw` is the untouched model output, kept so it can be shown to the user.
    #[error("Error parsing JSON response from the model")]
    Parse {
        #[source]
        source: ParseError,
        raw: String,
    },
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("document is empty")]
    Empty,

    #[error("failed to write temporary copy")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Joins an error with each of its causes, outermost first.
pub fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut cause = error.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}
