//! Photo upload storage
//!
//! Multipart image parts are validated (MIME, per-file size, file count),
//! written under the configured upload directory with generated names, and
//! referenced by public URL. The directory is served back at `/uploads`.

use crate::core::config::StorageConfig;
use crate::core::error::{BoomError, Result};
use axum::body::Bytes;
use axum::extract::Multipart;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One buffered file part from a multipart form
pub struct PhotoPart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Local file store for uploaded photos
pub struct UploadStore {
    root: PathBuf,
    public_base_url: String,
    max_file_size: usize,
    max_files: usize,
}

impl UploadStore {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.upload_dir).map_err(|e| {
            BoomError::InitializationError(format!(
                "Failed to create upload directory {:?}: {}",
                config.upload_dir, e
            ))
        })?;

        Ok(Self {
            root: config.upload_dir.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_file_size: config.max_file_size,
            max_files: config.max_files_per_upload,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Validate and persist one image part, returning its public URL
    pub async fn store_image(&self, part: &PhotoPart) -> Result<String> {
        let is_image = part
            .content_type
            .as_deref()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(BoomError::InvalidRequest(
                "Only image files are allowed".to_string(),
            ));
        }

        if part.data.len() > self.max_file_size {
            return Err(BoomError::InvalidRequest(format!(
                "File exceeds the {} byte upload limit",
                self.max_file_size
            )));
        }

        // Keep the original extension, replace the name entirely
        let ext = part
            .file_name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let file_name = format!("{}{}", Uuid::new_v4(), ext);

        tokio::fs::write(self.root.join(&file_name), &part.data)
            .await
            .map_err(BoomError::IoError)?;

        Ok(format!("{}/uploads/{}", self.public_base_url, file_name))
    }

    /// Persist a batch of image parts, returning their public URLs
    pub async fn store_parts(&self, parts: &[PhotoPart]) -> Result<Vec<String>> {
        let mut urls = Vec::with_capacity(parts.len());
        for part in parts {
            urls.push(self.store_image(part).await?);
        }
        Ok(urls)
    }
}

/// Read a multipart form into plain text fields and buffered `photos` parts.
///
/// Photo parts are buffered rather than streamed so a form that fails
/// validation persists nothing.
pub async fn read_photo_form(
    multipart: &mut Multipart,
    max_files: usize,
) -> Result<(HashMap<String, String>, Vec<PhotoPart>)> {
    let mut fields = HashMap::new();
    let mut photos = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BoomError::InvalidRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "photos" {
            if photos.len() >= max_files {
                return Err(BoomError::InvalidRequest(format!(
                    "At most {} photos per upload",
                    max_files
                )));
            }
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| BoomError::InvalidRequest(e.to_string()))?;
            photos.push(PhotoPart {
                file_name,
                content_type,
                data,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| BoomError::InvalidRequest(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, photos))
}
