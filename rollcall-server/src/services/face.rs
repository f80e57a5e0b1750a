//! Face-embedding service client
//!
//! The face-recognition service is a separate process. This client
//! uploads an image plus a display name and stores whatever embedding
//! comes back; every failure path (unreachable service, timeout,
//! non-success status, missing or undecodable `embedding_b64` field)
//! degrades to "no embedding available" — never a hard error for the
//! surrounding operation.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaceError {
    #[error("Face service is unreachable: {0}")]
    Unreachable(String),

    #[error("Face service timed out")]
    Timeout,

    #[error("Face service rejected the image (HTTP {0})")]
    Rejected(u16),

    #[error("Face service returned no embedding")]
    NoEmbedding,

    #[error("Face service returned an invalid payload: {0}")]
    BadPayload(String),
}

#[derive(Clone)]
pub struct FaceClient {
    client: reqwest::Client,
    url: String,
}

impl FaceClient {
    /// `url` is the full add-face endpoint of the external service
    pub fn new(url: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, url }
    }

    /// Upload an image and return the embedding blob.
    ///
    /// One attempt, no retries. Callers turn the error into a warning.
    pub async fn fetch_embedding(
        &self,
        image: Vec<u8>,
        file_name: &str,
        display_name: &str,
    ) -> Result<Vec<u8>, FaceError> {
        let part = reqwest::multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .map_err(|e| FaceError::BadPayload(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("image", part)
            .text("name", display_name.to_string());

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FaceError::Timeout
                } else {
                    FaceError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FaceError::Rejected(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FaceError::BadPayload(e.to_string()))?;

        let encoded = body
            .get("embedding_b64")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or(FaceError::NoEmbedding)?;

        BASE64
            .decode(encoded)
            .map_err(|e| FaceError::BadPayload(format!("Invalid base64 embedding: {e}")))
    }
}
