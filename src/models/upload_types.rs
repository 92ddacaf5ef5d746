use crate::error::{AppError, ErrorKind};
use crate::models::classify_types::RankedResults;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tiff", "image/tiff"),
    ("tif", "image/tiff"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
];

/// A selected file: name, declared media type and the raw payload.
/// Bytes are shared so the session and an in-flight request can both hold them.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: Arc::from(bytes),
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, AppError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::new(
                ErrorKind::Io,
                format!("Failed to read {}: {}", path.display(), e),
            )
        })?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        self.media_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn media_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            let lower = ext.to_lowercase();
            IMAGE_EXTENSIONS
                .iter()
                .find(|(candidate, _)| *candidate == lower)
                .map(|(_, media_type)| *media_type)
        })
        .unwrap_or("application/octet-stream")
}

/// A locally derived, renderable form of the selected image.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PreviewHandle {
    pub data_url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Previewing,
    Submitting,
    Completed,
    Failed,
}

/// What the presentation layer renders.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub file_name: Option<String>,
    pub preview: Option<PreviewHandle>,
    pub results: Option<RankedResults>,
    pub error: Option<AppError>,
    pub notice: Option<AppError>,
    pub generation: u64,
}

impl SessionSnapshot {
    /// A request is in flight.
    pub fn is_busy(&self) -> bool {
        self.status == SessionStatus::Submitting
    }
}
