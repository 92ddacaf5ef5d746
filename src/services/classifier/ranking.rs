use crate::error::{AppError, ErrorKind};
use crate::models::classify_types::{ClassificationResult, RankedResults};
use std::cmp::Ordering;

/// Check a response against the result schema.
pub fn validate(results: &[ClassificationResult]) -> Result<(), AppError> {
    if results.is_empty() {
        return Err(malformed("Classification service returned no results".to_string()));
    }

    for (idx, result) in results.iter().enumerate() {
        if result.label.trim().is_empty() {
            return Err(malformed(format!("Result {} has an empty label", idx)));
        }
        if !result.confidence.is_finite() || !(0.0..=1.0).contains(&result.confidence) {
            return Err(malformed(format!(
                "Result {} ({}) has confidence {} outside [0, 1]",
                idx, result.label, result.confidence
            )));
        }
    }

    Ok(())
}

/// Validate and order a result set. The response order is never trusted:
/// the primary is the highest confidence (earliest wins a tie) and the rest
/// follow in descending confidence.
pub fn rank(results: Vec<ClassificationResult>) -> Result<RankedResults, AppError> {
    validate(&results)?;

    let mut sorted = results;
    // sort_by is stable, so equal confidences keep input order
    sorted.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));

    let mut iter = sorted.into_iter();
    let primary = iter
        .next()
        .ok_or_else(|| malformed("Classification service returned no results".to_string()))?;

    Ok(RankedResults {
        primary,
        secondary: iter.collect(),
    })
}

fn malformed(message: String) -> AppError {
    AppError::new(ErrorKind::MalformedResponse, message)
}
