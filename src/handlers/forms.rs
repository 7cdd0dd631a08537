//! Shared multipart form collection.
//!
//! Text fields and file fields are gathered into one structure so handlers
//! can validate per field. An empty file part is treated the same as the
//! field being absent.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::{AppError, AppResult};

pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(|s| s.as_str())
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn require_file(&self, name: &str) -> AppResult<&UploadedFile> {
        self.file(name)
            .ok_or_else(|| AppError::Validation(format!("`{name}` image is required")))
    }
}

pub async fn collect(mut multipart: Multipart) -> AppResult<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(|s| s.to_string()) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read `{name}`: {e}")))?;
            if !bytes.is_empty() {
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    },
                );
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read `{name}`: {e}")))?;
            form.texts.insert(name, value);
        }
    }

    Ok(form)
}
