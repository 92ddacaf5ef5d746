use crate::config::Settings;
use crate::error::{AppError, ErrorKind};
use crate::models::classify_types::{ConfidenceLevel, RankedResults};
use crate::models::upload_types::{ImageFile, SessionStatus};
use crate::services::classifier::http_client::HttpClassifier;
use crate::services::upload_session::UploadSession;
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

const BAR_WIDTH: usize = 20;

pub async fn analyze(settings: &Settings, path: &Path, json: bool) -> Result<(), AppError> {
    let classifier = Arc::new(HttpClassifier::new(settings)?);
    let session = UploadSession::new(classifier, settings);

    let file = ImageFile::from_path(path).await?;
    session.select_file(file).await?;
    session.request_analysis().await?;
    let snapshot = session.settled().await;

    match (snapshot.status, snapshot.results) {
        (SessionStatus::Completed, Some(results)) => {
            if json {
                let body = serde_json::to_string_pretty(&results).map_err(|e| {
                    AppError::new(ErrorKind::Io, format!("Failed to serialize results: {}", e))
                })?;
                println!("{}", body);
            } else {
                print!("{}", render_results(&results));
            }
            Ok(())
        }
        _ => Err(snapshot.error.unwrap_or_else(|| {
            AppError::new(ErrorKind::NotReady, "Analysis finished without results")
        })),
    }
}

fn level_tag(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "high",
        ConfidenceLevel::Medium => "medium",
        ConfidenceLevel::Low => "low",
    }
}

pub fn render_results(results: &RankedResults) -> String {
    let primary = &results.primary;
    let mut out = String::new();

    let badge = if primary.is_high_confidence() { " [High Confidence]" } else { "" };
    let _ = writeln!(out, "Primary Detection{}", badge);
    let _ = writeln!(
        out,
        "  {}  {}% ({})",
        primary.label,
        primary.percent(),
        level_tag(primary.level())
    );
    if let Some(description) = &primary.description {
        let _ = writeln!(out, "  Description: {}", description);
    }
    if let Some(treatment) = &primary.treatment {
        let _ = writeln!(out, "  Recommended Treatment: {}", treatment);
    }

    if !results.secondary.is_empty() {
        let _ = writeln!(out, "Other Possibilities");
        for result in &results.secondary {
            let filled = ((result.confidence * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
            let _ = writeln!(
                out,
                "  {:<32} {:>3}% [{}{}]",
                result.label,
                result.percent(),
                "#".repeat(filled),
                " ".repeat(BAR_WIDTH - filled)
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classify_types::ClassificationResult;
    use crate::services::classifier::ranking;

    #[test]
    fn renders_primary_then_others() {
        let results = ranking::rank(vec![
            ClassificationResult::new("Tomato Early Blight", 0.05),
            ClassificationResult::new("Tomato Late Blight", 0.92)
                .with_treatment("Apply fungicides as a preventive measure."),
        ])
        .unwrap();

        let text = render_results(&results);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Primary Detection [High Confidence]");
        assert!(lines[1].contains("Tomato Late Blight  92% (high)"));
        assert!(lines[2].starts_with("  Recommended Treatment:"));
        assert_eq!(lines[3], "Other Possibilities");
        assert!(lines[4].contains("Tomato Early Blight"));
        assert!(lines[4].contains("  5% [#"));
    }

    #[test]
    fn no_badge_or_others_for_lone_low_result() {
        let results = ranking::rank(vec![ClassificationResult::new("Unknown", 0.3)]).unwrap();
        let text = render_results(&results);
        assert!(text.starts_with("Primary Detection\n"));
        assert!(text.contains("30% (low)"));
        assert!(!text.contains("Other Possibilities"));
    }
}
