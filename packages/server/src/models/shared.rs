use serde::Serialize;

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Validate a trimmed name (1-256 Unicode characters).
pub fn validate_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 256 {
        return Err(AppError::Validation("Name must be 1-256 characters".into()));
    }
    Ok(())
}

/// Validate an asset kind.
pub fn validate_kind(kind: &str) -> Result<(), AppError> {
    match kind {
        "image" | "video" | "tryon" => Ok(()),
        other => Err(AppError::Validation(format!(
            "Asset type must be one of image, video, tryon; got '{other}'"
        ))),
    }
}

/// Clamp-check a requested batch size. The fan-out is unbounded in the
/// core, so the request layer enforces a ceiling.
pub fn validate_batch_count(count: u32, name: &str) -> Result<(), AppError> {
    if !(1..=8).contains(&count) {
        return Err(AppError::Validation(format!("{name} must be 1-8")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert!(validate_name("Test Project").is_ok());
        assert!(validate_name("  ").is_err());
        assert!(validate_name(&"x".repeat(257)).is_err());
    }

    #[test]
    fn kind_values() {
        assert!(validate_kind("image").is_ok());
        assert!(validate_kind("video").is_ok());
        assert!(validate_kind("tryon").is_ok());
        assert!(validate_kind("audio").is_err());
    }

    #[test]
    fn batch_count_bounds() {
        assert!(validate_batch_count(1, "num_images").is_ok());
        assert!(validate_batch_count(8, "num_images").is_ok());
        assert!(validate_batch_count(0, "num_images").is_err());
        assert!(validate_batch_count(9, "num_images").is_err());
    }
}
