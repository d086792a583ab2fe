use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The document formats accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Maps a declared media type onto the allow-list.
    /// Parameters (`; charset=...`) and letter case are ignored.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MEDIA_TYPE => Some(DocumentKind::Pdf),
            DOCX_MEDIA_TYPE => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// User-supplied file content plus its declared media type.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedDocument {
    pub file_name: String,
    pub media_type: String,
    pub content: Bytes,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedDocument {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            content: content.into(),
            uploaded_at: Utc::now(),
        }
    }

    /// `None` when the declared media type is outside the allow-list.
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_media_type(&self.media_type)
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            file_name: self.file_name.clone(),
            media_type: self.media_type.clone(),
            size_bytes: self.content.len(),
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Metadata view of an upload; the content itself never leaves the process.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
}
