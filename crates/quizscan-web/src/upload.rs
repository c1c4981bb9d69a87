use axum::extract::Multipart;

use crate::error::ApiError;

/// An uploaded exam sheet with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from the multipart upload.
pub struct FormFields {
    pub file: UploadedFile,
    pub class: String,
}

/// Parse the `pdf` and `class` fields of a multipart upload.
///
/// A missing or blank class is reported before a missing file.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut class: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?
                    .to_vec();
                file = Some(UploadedFile { filename, data });
            }
            "class" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read class: {}", e)))?;
                if !val.trim().is_empty() {
                    class = Some(val);
                }
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let class = class.ok_or_else(|| ApiError::BadRequest("Class is required".into()))?;
    let file = file.ok_or_else(|| ApiError::BadRequest("PDF file is missing".into()))?;

    Ok(FormFields { file, class })
}
