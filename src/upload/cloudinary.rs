//! Unsigned uploads to Cloudinary

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::UploadConfig;
use crate::error::{AppError, Result};
use crate::upload::{AssetUploader, HostedAsset, UploadedFile};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Client for the Cloudinary upload API
pub struct CloudinaryUploader {
    client: Client,
    endpoint: String,
    upload_preset: String,
    folder: String,
}

impl CloudinaryUploader {
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            upload_preset: config.upload_preset.clone(),
            folder: config.folder.clone(),
        })
    }
}

#[async_trait]
impl AssetUploader for CloudinaryUploader {
    async fn upload(&self, file: UploadedFile) -> Result<HostedAsset> {
        debug!(file = %file.file_name, size = file.data.len(), "Uploading attachment");

        let mut part = Part::bytes(file.data.to_vec()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone())
            .part("file", part);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Asset host rejected upload");
            return Err(AppError::Upload(format!("asset host returned {}", status)));
        }

        let body: UploadResponse = response.json().await?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| AppError::Upload("asset host response has no url".to_string()))?;

        info!(file = %file.file_name, url = %url, "Attachment uploaded");
        Ok(HostedAsset { url })
    }
}
