use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";
const CONFIG_FILE: &str = "leaf-lens";
const ENV_PREFIX: &str = "LEAF_LENS";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Classification endpoint receiving the multipart upload.
    pub endpoint: String,
    pub request_timeout_secs: u64,
    /// Multipart field carrying the image.
    pub upload_field: String,
    pub preview_max_edge: u32,
    pub preview_quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 30,
            upload_field: "image".to_string(),
            preview_max_edge: 640,
            preview_quality: 80,
        }
    }
}

impl Settings {
    /// Defaults, then `leaf-lens.{toml,json,yaml}` if present, then
    /// `LEAF_LENS_*` environment variables.
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(file: &Path) -> Result<Self, AppError> {
        let defaults = Settings::default();
        let settings = config::Config::builder()
            .set_default("endpoint", defaults.endpoint)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("upload_field", defaults.upload_field)?
            .set_default("preview_max_edge", defaults.preview_max_edge as i64)?
            .set_default("preview_quality", defaults.preview_quality as i64)?
            .add_source(config::File::from(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
