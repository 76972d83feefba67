//! Generate multiple-choice quizzes from a document with Gemini and step
//! through them one question at a time.

pub mod config;
pub mod document;
pub mod error;
pub mod gemini;
pub mod quiz;

pub use config::{Config, ConfigError};
pub use document::{submit_document, Document, DocumentFormat};
pub use error::{error_chain, ParseError, QuizError, UploadError};
pub use gemini::{DocumentRef, GeminiClient, Generation, GenerativeService, RequestError};
pub use quiz::{
    generate_quiz, Difficulty, Grade, Phase, Question, QuestionCount, Quiz, QuizSession,
    QuizSettings, SessionError,
};
