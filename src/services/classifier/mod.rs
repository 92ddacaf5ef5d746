pub mod http_client;
pub mod ranking;

use crate::error::AppError;
use crate::models::classify_types::ClassificationResult;
use crate::models::upload_types::ImageFile;
use async_trait::async_trait;

/// The external classifier. One call is one request/response round trip.
#[async_trait]
pub trait ClassificationService: Send + Sync {
    async fn classify(&self, file: &ImageFile) -> Result<Vec<ClassificationResult>, AppError>;
}
