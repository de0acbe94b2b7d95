use axum::extract::multipart::Field;

use crate::error::AppError;

/// A file field read fully into memory.
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Read a multipart file field, defaulting the content type to JPEG the way
/// browser uploads without an explicit type are treated.
pub async fn read_file_field(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let content_type = field
        .content_type()
        .unwrap_or("image/jpeg")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
    Ok(UploadedFile {
        bytes: bytes.to_vec(),
        content_type,
    })
}

/// Read a text field.
pub async fn read_text_field(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))
}

/// Parse a numeric text field.
pub async fn read_u32_field(field: Field<'_>, name: &str) -> Result<u32, AppError> {
    let text = read_text_field(field).await?;
    text.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{name} must be a positive integer")))
}
