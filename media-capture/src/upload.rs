//! Remote media store abstraction.
//!
//! The coordinator only needs "one file in, one durable reference out". The
//! HTTP implementation behind the `http` feature talks to an endpoint that
//! accepts a multipart form with a single `file` part and answers with
//! `{ "result": { "secure_url": "..." } }`.

use std::future::Future;

use crate::error::UploadError;
use crate::models::{LocalPayload, RemoteRef};

/// Stores one payload remotely and returns its durable reference
pub trait MediaUploader: Send + Sync {
    fn upload(
        &self,
        payload: LocalPayload,
    ) -> impl Future<Output = Result<RemoteRef, UploadError>> + Send;
}

#[cfg(feature = "http")]
pub use http::{HttpMediaUploader, HttpUploadConfig};

#[cfg(feature = "http")]
mod http {
    use super::*;
    use serde::Deserialize;
    use std::time::Duration;

    /// Configuration for the HTTP upload endpoint
    #[derive(Debug, Clone)]
    pub struct HttpUploadConfig {
        pub server_url: String,
        pub upload_path: String,
        pub timeout_secs: u64,
    }

    impl HttpUploadConfig {
        pub fn endpoint(&self) -> String {
            format!(
                "{}/{}",
                self.server_url.trim_end_matches('/'),
                self.upload_path.trim_start_matches('/')
            )
        }
    }

    impl Default for HttpUploadConfig {
        fn default() -> Self {
            Self {
                server_url: "http://localhost:3000".to_string(),
                upload_path: "api/upload".to_string(),
                timeout_secs: 60,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct UploadResponse {
        result: UploadResult,
    }

    #[derive(Debug, Deserialize)]
    struct UploadResult {
        secure_url: String,
    }

    pub struct HttpMediaUploader {
        client: reqwest::Client,
        endpoint: String,
    }

    impl HttpMediaUploader {
        pub fn new(config: &HttpUploadConfig) -> Result<Self, UploadError> {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .user_agent(concat!("media-capture/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| UploadError::Network(format!("Client build failed: {}", e)))?;
            Ok(Self {
                client,
                endpoint: config.endpoint(),
            })
        }
    }

    impl MediaUploader for HttpMediaUploader {
        async fn upload(&self, payload: LocalPayload) -> Result<RemoteRef, UploadError> {
            let size = payload.len();
            let part = reqwest::multipart::Part::bytes(payload.bytes.to_vec())
                .file_name(payload.name.clone())
                .mime_str(&payload.mime)
                .map_err(|e| UploadError::Other(format!("Invalid MIME type: {}", e)))?;
            let form = reqwest::multipart::Form::new().part("file", part);

            let response = self
                .client
                .post(&self.endpoint)
                .multipart(form)
                .send()
                .await
                .map_err(|e| UploadError::Network(format!("Request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                log::error!("Upload of {} rejected: {}", payload.name, status);
                return Err(UploadError::Rejected(status.as_u16()));
            }

            let body = response
                .json::<UploadResponse>()
                .await
                .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

            if body.result.secure_url.is_empty() {
                return Err(UploadError::InvalidResponse("empty secure_url".to_string()));
            }

            log::info!("Uploaded {} ({} bytes)", payload.name, size);
            Ok(RemoteRef(body.result.secure_url))
        }
    }

}
