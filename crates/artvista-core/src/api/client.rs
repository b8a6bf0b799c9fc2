//! API client for the artwork backend.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{header, Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{ArtworkDraft, ArtworkRecord};

use super::ApiError;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Collection path on the backend
const ARTWORKS_PATH: &str = "artworks";

#[derive(Debug, Deserialize)]
struct ArtworkListResponse {
    #[serde(alias = "items", alias = "documents")]
    artworks: Vec<ArtworkRecord>,
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot have paths: {}", base_url));
        }

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Copy of this client carrying `token`, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow!("API base URL cannot have paths"))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {}", url))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let text = self.get_text(url.clone()).await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .request(method.clone(), url.clone())
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send {} request to {}", method, url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    pub async fn list_artworks(&self) -> Result<Vec<ArtworkRecord>> {
        let url = self.url(&[ARTWORKS_PATH])?;
        let text = self.get_text(url).await?;
        let artworks = parse_artwork_list(&text)?;
        debug!(count = artworks.len(), "Fetched artworks");
        Ok(artworks)
    }

    pub async fn fetch_artwork(&self, id: &str) -> Result<ArtworkRecord> {
        let url = self.url(&[ARTWORKS_PATH, id])?;
        self.get(url).await
    }

    /// Upload a new artwork. The backend assigns its id.
    pub async fn create_artwork(&self, draft: &ArtworkDraft) -> Result<ArtworkRecord> {
        let url = self.url(&[ARTWORKS_PATH])?;
        let created: ArtworkRecord = self.send_json(reqwest::Method::POST, url, draft).await?;
        debug!(id = %created.id, "Artwork created");
        Ok(created)
    }

    /// Replace a stored artwork with `artwork`.
    pub async fn update_artwork(&self, artwork: &ArtworkRecord) -> Result<ArtworkRecord> {
        let url = self.url(&[ARTWORKS_PATH, &artwork.id])?;
        self.send_json(reqwest::Method::PUT, url, artwork).await
    }

    /// Fetch, append a comment with the next per-artwork id, store.
    pub async fn add_comment(
        &self,
        artwork_id: &str,
        username: &str,
        email: &str,
        text: &str,
    ) -> Result<ArtworkRecord> {
        let mut artwork = self.fetch_artwork(artwork_id).await?;
        let comment_id = artwork.add_comment(username, email, text).comment_id;
        debug!(artwork_id = artwork_id, comment_id = comment_id, "Adding comment");
        self.update_artwork(&artwork).await
    }

    /// Fetch, flip `user_id` in the likes, store. Returns the stored record
    /// and whether the user now likes it.
    pub async fn toggle_like(&self, artwork_id: &str, user_id: &str) -> Result<(ArtworkRecord, bool)> {
        let mut artwork = self.fetch_artwork(artwork_id).await?;
        let liked = artwork.toggle_like(user_id);
        let stored = self.update_artwork(&artwork).await?;
        Ok((stored, liked))
    }
}

/// The list endpoint answers with either a bare array or `{"artworks": [...]}`.
fn parse_artwork_list(text: &str) -> Result<Vec<ArtworkRecord>> {
    if let Ok(items) = serde_json::from_str::<Vec<ArtworkRecord>>(text) {
        return Ok(items);
    }

    match serde_json::from_str::<ArtworkListResponse>(text) {
        Ok(resp) => Ok(resp.artworks),
        Err(e) => {
            warn!(error = %e, "Failed to parse artwork list response");
            Err(ApiError::InvalidResponse(e.to_string()).into())
        }
    }
}
