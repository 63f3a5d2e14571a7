//! Client for the hosted platform's object-storage bucket.
//!
//! Uploaded images go straight to the platform over HTTP; this service only
//! hands back the resulting public URL. Object keys are random so repeated
//! uploads of the same filename never collide.

use anyhow::{Context, Result};
use reqwest::Client;
use uuid::Uuid;

#[derive(Clone)]
pub struct StorageClient {
    http: Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(base_url: String, bucket: String, service_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            service_key,
        }
    }

    /// Upload an object and return its public URL.
    pub async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let key = object_key(content_type);
        let endpoint = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key);

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .context("Storage upload request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Storage upload rejected ({}): {}", status, body);
        }

        Ok(self.public_url(&key))
    }

    /// Public URL for an object key.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}

/// Random object key with an extension matching the content type.
fn object_key(content_type: &str) -> String {
    let ext = match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    };
    format!("uploads/{}.{}", Uuid::new_v4(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_shape() {
        let client = StorageClient::new(
            "https://storage.example.com/".to_string(),
            "images".to_string(),
            "key".to_string(),
        );
        assert_eq!(
            client.public_url("uploads/abc.png"),
            "https://storage.example.com/storage/v1/object/public/images/uploads/abc.png"
        );
    }

    #[test]
    fn test_object_key_extension_follows_content_type() {
        assert!(object_key("image/png").ends_with(".png"));
        assert!(object_key("application/octet-stream").ends_with(".bin"));
        assert!(object_key("image/png").starts_with("uploads/"));
    }
}
