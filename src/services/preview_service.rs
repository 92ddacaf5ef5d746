use crate::error::{AppError, ErrorKind};
use crate::models::upload_types::PreviewHandle;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use std::io::Cursor;
use tracing::{debug, warn};

/// Build a preview for the given payload.
/// Decodable images become a bounded, orientation-corrected JPEG data URL;
/// anything else is embedded as-is under its declared media type.
pub fn generate_preview(
    bytes: &[u8],
    media_type: &str,
    max_edge: u32,
    quality: u8,
) -> PreviewHandle {
    match generate_thumbnail_bytes(bytes, max_edge, quality) {
        Ok((jpeg, width, height)) => PreviewHandle {
            data_url: data_url("image/jpeg", &jpeg),
            width: Some(width),
            height: Some(height),
        },
        Err(e) => {
            warn!("[preview] decode failed ({}), embedding raw {} bytes", e, media_type);
            PreviewHandle {
                data_url: data_url(media_type, bytes),
                width: None,
                height: None,
            }
        }
    }
}

/// Decode, shrink to fit `max_edge`, apply EXIF orientation and re-encode.
/// Returns the JPEG bytes and the final dimensions.
pub fn generate_thumbnail_bytes(
    bytes: &[u8],
    max_edge: u32,
    quality: u8,
) -> Result<(Vec<u8>, u32, u32), AppError> {
    let orientation = read_orientation(bytes);

    let mut img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AppError::new(ErrorKind::Preview, e.to_string()))?
        .decode()
        .map_err(|e| AppError::new(ErrorKind::Preview, format!("Failed to decode image: {}", e)))?;

    let max_edge = max_edge.max(1);
    if img.width() > max_edge || img.height() > max_edge {
        // Cheap first pass for very large photos, then a smooth one
        let intermediate = max_edge * 4;
        if img.width() > intermediate * 2 || img.height() > intermediate * 2 {
            img = img.resize(intermediate, intermediate, FilterType::Nearest);
        }
        img = img.resize(max_edge, max_edge, FilterType::Triangle);
    }

    if orientation != 1 {
        img = apply_orientation(img, orientation);
    }

    let (width, height) = (img.width(), img.height());
    let jpeg = encode_jpeg(&img, quality)?;
    debug!("[preview] {}x{} -> {} bytes", width, height, jpeg.len());
    Ok((jpeg, width, height))
}

fn encode_jpeg(img: &image::DynamicImage, quality: u8) -> Result<Vec<u8>, AppError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    // JPEG has no alpha channel
    image::DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| {
            AppError::new(ErrorKind::Preview, format!("Failed to encode preview: {}", e))
        })?;
    Ok(buffer.into_inner())
}

/// Orientation from the EXIF block, 1 when absent or unreadable.
fn read_orientation(bytes: &[u8]) -> u32 {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(e) => e,
        Err(_) => return 1,
    };

    match exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY) {
        Some(field) => match field.value {
            exif::Value::Short(ref v) => *v.first().unwrap_or(&1) as u32,
            exif::Value::Long(ref v) => *v.first().unwrap_or(&1),
            _ => 1,
        },
        None => 1,
    }
}

fn apply_orientation(img: image::DynamicImage, orientation: u32) -> image::DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.fliph().rotate90(),
        6 => img.rotate90(),
        7 => img.fliph().rotate270(),
        8 => img.rotate270(),
        _ => img,
    }
}

pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", media_type, b64)
}
