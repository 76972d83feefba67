use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{request_error, DocumentRef, GeminiClient, RequestError};

/// Text produced by one `generateContent` call.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    text: Option<String>,
    prompt_feedback: Option<Value>,
}

impl Generation {
    pub fn new(text: Option<String>, prompt_feedback: Option<Value>) -> Self {
        Self {
            text: text.filter(|t| !t.is_empty()),
            prompt_feedback,
        }
    }

    /// `None` when the model produced no text at all.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn prompt_feedback(&self) -> Option<&Value> {
        self.prompt_feedback.as_ref()
    }
}

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    File { file_data: FileData<'a> },
}

#[derive(Serialize, Debug)]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, document: &'a DocumentRef) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::File {
                        file_data: FileData {
                            mime_type: document.mime_type(),
                            file_uri: document.reference(),
                        },
                    },
                ],
            }],
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<Value>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

impl From<GenerateContentResponse> for Generation {
    fn from(response: GenerateContentResponse) -> Self {
        // only the first candidate is ever shown
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            });

        Generation::new(text, response.prompt_feedback)
    }
}

impl GeminiClient {
    pub(super) fn generate_content(
        &self,
        prompt: &str,
        document: &DocumentRef,
    ) -> Result<Generation, RequestError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("requesting generation from {} for {}", self.model, document.reference());

        let response = self
            .agent
            .post(&url)
            .set("x-goog-api-key", &self.api_key)
            .send_json(GenerateContentRequest::new(prompt, document))
            .map_err(request_error)?;

        let body: GenerateContentResponse = response.into_json()?;
        Ok(body.into())
    }
}
