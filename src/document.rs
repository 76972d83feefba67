use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::{debug, info};

use crate::{
    error::{QuizError, UploadError},
    gemini::{DocumentRef, GenerativeService},
};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// File types the upload control accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 3] = [Self::Pdf, Self::Docx, Self::Txt];

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Txt => "text/plain",
        }
    }
}

/// A user-provided file held in memory.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    content: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    pub fn read(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name, fs::read(path)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_path(Path::new(&self.name))
    }

    fn mime_type(&self) -> &'static str {
        self.format()
            .map(|f| f.mime_type())
            .unwrap_or(FALLBACK_MIME_TYPE)
    }

    /// Suffix for the transient copy, so the service can sniff the type from the name too.
    fn suffix(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default()
    }
}

/// Uploads `document` through a transient local copy and returns the service's
/// reference to it. The local copy is gone when this returns, whatever the outcome.
pub fn submit_document<S>(service: &S, document: &Document) -> Result<DocumentRef, QuizError>
where
    S: GenerativeService + ?Sized,
{
    info!("Attempting to attach file: {}", document.name());

    let reference = upload_transient_copy(service, document).map_err(|source| QuizError::Upload {
        name: document.name().to_string(),
        source,
    })?;

    info!(
        "Uploaded file for attachment (URI: {}): {}",
        reference.reference(),
        document.name()
    );
    Ok(reference)
}

fn upload_transient_copy<S>(service: &S, document: &Document) -> Result<DocumentRef, UploadError>
where
    S: GenerativeService + ?Sized,
{
    if document.content().is_empty() {
        return Err(UploadError::Empty);
    }

    // NamedTempFile removes itself on drop
    let mut transient = tempfile::Builder::new()
        .prefix("quizgen-")
        .suffix(&document.suffix())
        .tempfile()?;
    transient.write_all(document.content())?;
    transient.flush()?;
    debug!("wrote transient copy to {}", transient.path().display());

    let reference = service.upload_file(transient.path(), document.name(), document.mime_type())?;
    Ok(reference)
}
