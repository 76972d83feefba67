mod generate;
mod upload;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

pub use generate::Generation;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body")]
    Io(#[from] std::io::Error),

    #[error("Gemini returned an error: {status} {body}")]
    ServerError { status: u16, body: String },

    #[error("upload session did not return an upload URL")]
    MissingUploadUrl,
}

fn request_error(e: ureq::Error) -> RequestError {
    match e {
        ureq::Error::Status(status, response) => RequestError::ServerError {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        other => RequestError::Http(other),
    }
}

/// Handle to a file held by the Gemini File API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    #[serde(default)]
    name: String,
    uri: String,
    mime_type: String,
}

impl DocumentRef {
    pub fn new(name: impl Into<String>, uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }

    /// The URI the generation endpoint accepts in place of the document bytes.
    pub fn reference(&self) -> &str {
        &self.uri
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The two calls the quiz pipeline makes against the hosted model.
pub trait GenerativeService {
    /// Uploads the file at `path` and returns a reference to the stored copy.
    fn upload_file(
        &self,
        path: &Path,
        display_name: &str,
        mime_type: &str,
    ) -> Result<DocumentRef, RequestError>;

    /// Sends `prompt` with `document` attached and returns the model's answer.
    fn generate(&self, prompt: &str, document: &DocumentRef) -> Result<Generation, RequestError>;
}

pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();

        Self {
            agent,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl GenerativeService for GeminiClient {
    fn upload_file(
        &self,
        path: &Path,
        display_name: &str,
        mime_type: &str,
    ) -> Result<DocumentRef, RequestError> {
        self.upload(path, display_name, mime_type)
    }

    fn generate(&self, prompt: &str, document: &DocumentRef) -> Result<Generation, RequestError> {
        self.generate_content(prompt, document)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::{cell::RefCell, path::PathBuf};

    use super::*;

    /// In-memory stand-in that records what it was asked to do.
    #[derive(Default)]
    pub struct FakeService {
        pub fail_upload: bool,
        pub fail_generate: bool,
        pub response: Option<String>,
        pub uploads: RefCell<Vec<(PathBuf, Vec<u8>)>>,
        pub prompts: RefCell<Vec<String>>,
    }

    impl FakeService {
        pub fn answering(text: &str) -> Self {
            Self {
                response: Some(text.to_string()),
                ..Default::default()
            }
        }
    }

    impl GenerativeService for FakeService {
        fn upload_file(
            &self,
            path: &Path,
            display_name: &str,
            mime_type: &str,
        ) -> Result<DocumentRef, RequestError> {
            let content = std::fs::read(path)?;
            self.uploads
                .borrow_mut()
                .push((path.to_path_buf(), content));

            if self.fail_upload {
                return Err(RequestError::ServerError {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }

            Ok(DocumentRef::new(
                format!("files/{}", display_name),
                "https://example.test/v1beta/files/abc123",
                mime_type,
            ))
        }

        fn generate(&self, prompt: &str, _document: &DocumentRef) -> Result<Generation, RequestError> {
            self.prompts.borrow_mut().push(prompt.to_string());

            if self.fail_generate {
                return Err(RequestError::ServerError {
                    status: 429,
                    body: "quota exceeded".to_string(),
                });
            }

            Ok(Generation::new(self.response.clone(), None))
        }
    }
}
