use crate::config::Settings;
use crate::error::{AppError, ErrorKind};
use crate::models::classify_types::{ClassificationResult, ClassifyResponse};
use crate::models::upload_types::ImageFile;
use crate::services::classifier::ClassificationService;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

/// How much of an error body ends up in the surfaced message.
const BODY_EXCERPT_CHARS: usize = 200;

/// Posts the image as `multipart/form-data` to a remote classifier.
#[derive(Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    field_name: String,
}

impl HttpClassifier {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| {
                AppError::new(ErrorKind::Config, format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            field_name: settings.upload_field.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ClassificationService for HttpClassifier {
    async fn classify(&self, file: &ImageFile) -> Result<Vec<ClassificationResult>, AppError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| {
                AppError::new(
                    ErrorKind::TransportError,
                    format!("Invalid media type {}: {}", file.media_type, e),
                )
            })?;
        let form = Form::new().part(self.field_name.clone(), part);

        info!("Submitting {} ({} bytes) to {}", file.name, file.len(), self.endpoint);
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::new(
                ErrorKind::ServerError,
                format!(
                    "Classification service returned HTTP {}: {}",
                    status,
                    excerpt(&body)
                ),
            ));
        }

        let body = response.bytes().await?;
        debug!("Classification response: {} bytes", body.len());
        parse_response(&body)
    }
}

/// Parse a success body into results. Schema checks happen during ranking.
pub fn parse_response(body: &[u8]) -> Result<Vec<ClassificationResult>, AppError> {
    let parsed: ClassifyResponse = serde_json::from_slice(body)?;
    Ok(parsed.into_results())
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
    format!("{}...", cut)
}
