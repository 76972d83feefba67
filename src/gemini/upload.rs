use std::{fs, path::Path};

use log::debug;
use serde::Deserialize;
use serde_json::json;

use super::{request_error, DocumentRef, GeminiClient, RequestError};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: DocumentRef,
}

impl GeminiClient {
    /// Resumable upload: one request opens the session, a second sends the
    /// bytes and finalizes it.
    pub(super) fn upload(
        &self,
        path: &Path,
        display_name: &str,
        mime_type: &str,
    ) -> Result<DocumentRef, RequestError> {
        let bytes = fs::read(path)?;

        let start = self
            .agent
            .post(&format!("{}/upload/v1beta/files", self.base_url))
            .set("x-goog-api-key", &self.api_key)
            .set("X-Goog-Upload-Protocol", "resumable")
            .set("X-Goog-Upload-Command", "start")
            .set("X-Goog-Upload-Header-Content-Length", &bytes.len().to_string())
            .set("X-Goog-Upload-Header-Content-Type", mime_type)
            .send_json(json!({ "file": { "display_name": display_name } }))
            .map_err(request_error)?;

        let upload_url = start
            .header("x-goog-upload-url")
            .ok_or(RequestError::MissingUploadUrl)?
            .to_string();
        debug!("upload session opened for {}", display_name);

        let response = self
            .agent
            .post(&upload_url)
            .set("X-Goog-Upload-Offset", "0")
            .set("X-Goog-Upload-Command", "upload, finalize")
            .send_bytes(&bytes)
            .map_err(request_error)?;

        let body: UploadResponse = response.into_json()?;
        Ok(body.file)
    }
}
