//! Multipart upload reading.
//!
//! The whole form is buffered in memory first (bounded by the router's body
//! limit), then individual image parts are written to transient files.

use std::collections::HashMap;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::Multipart;
use facegate_core::FaceGateError;
use facegate_media::TransientImage;
use tracing::debug;

/// A file part of an upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Write the part to a fresh transient file under `dir`.
    pub async fn persist(&self, dir: &Path) -> Result<TransientImage, FaceGateError> {
        Ok(TransientImage::persist(dir, self.filename.as_deref(), &self.bytes).await?)
    }
}

/// A buffered multipart form: file parts and text parts by field name.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, UploadedFile>,
    texts: HashMap<String, String>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, FaceGateError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| {
                FaceGateError::BadRequest(format!("invalid multipart body: {}", e.body_text()))
            })?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let filename = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(|e| {
                FaceGateError::BadRequest(format!(
                    "failed to read field '{name}': {}",
                    e.body_text()
                ))
            })?;

            match filename {
                Some(filename) => {
                    debug!(
                        field = %name,
                        filename = %filename,
                        size = bytes.len(),
                        "Received file part"
                    );
                    form.files.insert(
                        name,
                        UploadedFile {
                            filename: Some(filename),
                            bytes,
                        },
                    );
                }
                None => {
                    let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
                        FaceGateError::BadRequest(format!("field '{name}' is not valid UTF-8"))
                    })?;
                    form.texts.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    /// Remove and return the named file part; it must be present and non-empty.
    pub fn take_file(&mut self, name: &str) -> Result<UploadedFile, FaceGateError> {
        let file = self
            .files
            .remove(name)
            .ok_or_else(|| FaceGateError::BadRequest(format!("missing file field '{name}'")))?;
        if file.bytes.is_empty() {
            return Err(FaceGateError::BadRequest(format!("file field '{name}' is empty")));
        }
        Ok(file)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }
}
