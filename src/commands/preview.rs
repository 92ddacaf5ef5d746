use crate::config::Settings;
use crate::error::{AppError, ErrorKind};
use crate::models::upload_types::ImageFile;
use crate::services::preview_service;
use std::path::Path;
use tracing::info;

/// Write the preview data URL of an image to `out`, or stdout.
pub async fn preview(settings: &Settings, path: &Path, out: Option<&Path>) -> Result<(), AppError> {
    let file = ImageFile::from_path(path).await?;
    if !file.is_image() {
        return Err(AppError::new(
            ErrorKind::InvalidMediaType,
            format!("{} is not an image", path.display()),
        ));
    }

    let (max_edge, quality) = (settings.preview_max_edge, settings.preview_quality);
    let media_type = file.media_type.clone();
    let bytes = file.bytes.clone();
    let handle = tokio::task::spawn_blocking(move || {
        preview_service::generate_preview(&bytes, &media_type, max_edge, quality)
    })
    .await
    .map_err(|e| AppError::new(ErrorKind::Preview, format!("Preview task failed: {}", e)))?;

    match out {
        Some(out) => {
            tokio::fs::write(out, handle.data_url.as_bytes()).await?;
            info!("Wrote preview of {} to {}", file.name, out.display());
        }
        None => println!("{}", handle.data_url),
    }
    Ok(())
}
