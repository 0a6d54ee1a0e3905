// src/storage/supabase.rs
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use crate::storage::object_store::{ObjectStore, Result, StoreError};

const MAX_ERROR_BODY: usize = 512;

/// Reads objects from a Supabase storage bucket over its REST API.
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: Url,
    bucket: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| StoreError::Request(format!("invalid storage URL: {}", base_url)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Request(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            bucket: bucket.into(),
            api_key: api_key.into(),
        })
    }

    /// Object endpoint for `key`. Each key segment is percent-encoded, so the
    /// key can only name an object inside the configured bucket.
    pub fn object_url(&self, key: &str) -> Result<Url> {
        let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Request(format!("invalid storage URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["storage", "v1", "object", self.bucket.as_str()])
            .extend(segments);

        Ok(url)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStore {
    async fn download(&self, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(key)?;
        debug!(%url, "Downloading object");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !message.is_char_boundary(cut) {
                    cut -= 1;
                }
                message.truncate(cut);
            }
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
