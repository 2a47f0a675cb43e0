//! Bill attachment uploads to the external asset host

pub mod cloudinary;
pub mod url;

use async_trait::async_trait;
use axum::body::Bytes;
use std::sync::Arc;

use crate::config::UploadConfig;
use crate::error::{AppError, Result};

pub use cloudinary::CloudinaryUploader;

/// A file received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A stored asset on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedAsset {
    /// Publicly resolvable URL of the original
    pub url: String,
}

/// Asset host accepting one file at a time
#[async_trait]
pub trait AssetUploader: Send + Sync {
    async fn upload(&self, file: UploadedFile) -> Result<HostedAsset>;
}

/// Uploader used when no asset host is configured
pub struct DisabledUploader;

#[async_trait]
impl AssetUploader for DisabledUploader {
    async fn upload(&self, file: UploadedFile) -> Result<HostedAsset> {
        Err(AppError::InvalidRequest(format!(
            "File uploads are disabled; cannot accept '{}'",
            file.file_name
        )))
    }
}

/// Build the uploader described by the configuration
pub fn from_config(config: &UploadConfig) -> Result<Arc<dyn AssetUploader>> {
    if !config.enabled {
        return Ok(Arc::new(DisabledUploader));
    }
    Ok(Arc::new(CloudinaryUploader::new(config)?))
}

/// Enforce format and size limits before anything leaves the server
pub fn check_constraints(config: &UploadConfig, file: &UploadedFile) -> Result<()> {
    let ext = url::normalized_extension(&file.file_name).ok_or_else(|| {
        AppError::InvalidRequest(format!("File '{}' has no extension", file.file_name))
    })?;

    let allowed = config
        .allowed_formats
        .iter()
        .filter_map(|format| url::normalized_extension(&format!("x.{}", format)))
        .any(|format| format == ext);
    if !allowed {
        return Err(AppError::InvalidRequest(format!(
            "Format '{}' is not allowed; expected one of: {}",
            ext,
            config.allowed_formats.join(", ")
        )));
    }

    if file.data.len() > config.max_file_bytes {
        return Err(AppError::InvalidRequest(format!(
            "File is {} bytes; the limit is {}",
            file.data.len(),
            config.max_file_bytes
        )));
    }

    Ok(())
}
