use async_trait::async_trait;
use serde::Deserialize;
use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("Upload request failed: {0}")]
    RequestFailed(String),
    #[error("Upload rejected by the image host: {0}")]
    Rejected(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// External image CDN. Takes raw bytes, returns a public URL; any
/// resizing or format conversion happens on the CDN side.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ImageStoreError>;
}

/// Logs the upload and fabricates a URL. Used whenever the CDN is not
/// configured, including in tests.
pub struct MockImageStore;

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ImageStoreError> {
        tracing::info!(
            "[MOCK IMAGE] Upload of {} ({} bytes)",
            filename,
            bytes.len()
        );
        Ok(format!("https://images.invalid/gifts/{}", filename))
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Cloudinary-style unsigned upload over HTTP multipart.
pub struct CloudinaryImageStore {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    upload_preset: String,
    folder: String,
}

impl CloudinaryImageStore {
    pub fn new() -> Result<Self, ImageStoreError> {
        let cloud_name = env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| ImageStoreError::ConfigError("CLOUDINARY_CLOUD_NAME not set".to_string()))?;
        let upload_preset = env::var("CLOUDINARY_UPLOAD_PRESET").map_err(|_| {
            ImageStoreError::ConfigError("CLOUDINARY_UPLOAD_PRESET not set".to_string())
        })?;
        let folder =
            env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "gifts-upload".to_string());

        Ok(Self::with_config(cloud_name, upload_preset, folder))
    }

    pub fn with_config(
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: "https://api.cloudinary.com/v1_1".to_string(),
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            folder: folder.into(),
        }
    }

    /// Point the store at a different API host. Tests use this to target
    /// a local mock server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ImageStoreError> {
        let url = format!("{}/{}/image/upload", self.api_base, self.cloud_name);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone())
            .part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageStoreError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageStoreError::Rejected(format!("{}: {}", status, body)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageStoreError::RequestFailed(e.to_string()))?;

        Ok(uploaded.secure_url)
    }
}

pub fn create_image_store() -> Box<dyn ImageStore> {
    if env::var("CLOUDINARY_CLOUD_NAME").is_ok() {
        match CloudinaryImageStore::new() {
            Ok(store) => {
                tracing::info!("Using Cloudinary image store");
                Box::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize Cloudinary image store: {}. Falling back to mock store",
                    e
                );
                Box::new(MockImageStore)
            }
        }
    } else {
        tracing::info!("Image CDN not configured. Using mock image store (uploads are logged)");
        Box::new(MockImageStore)
    }
}
