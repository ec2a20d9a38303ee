//! Catalog HTTP client
//!
//! Bearer-token client for a Spotify-compatible web API. Every request waits
//! on a token-bucket rate limiter before it is sent.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::time::Duration;
use vibelist_common::config::{is_valid_key, CatalogConfig};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    AddTracks, CatalogTrack, CreatedPlaylist, CurrentUser, NewPlaylist, PlaylistCreated,
    SearchResponse,
};

/// Catalog operations used by resolution, enhancement and export
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Track search; an empty result is `Ok(vec![])`
    async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<CatalogTrack>>;

    /// Full track details by id
    async fn track(&self, id: &str) -> CatalogResult<CatalogTrack>;

    /// Id of the user the token belongs to
    async fn current_user_id(&self) -> CatalogResult<String>;

    /// Create a private playlist owned by `user_id`
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> CatalogResult<CreatedPlaylist>;

    /// Append up to 100 track URIs to a playlist
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> CatalogResult<()>;
}

pub struct CatalogClient {
    /// HTTP client with configured timeout
    http_client: Client,
    base_url: String,
    token: String,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl CatalogClient {
    /// # Errors
    /// `CatalogError::Config` for a blank token, a zero request rate, or an
    /// HTTP client that cannot be built.
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        requests_per_second: u32,
        timeout: Duration,
    ) -> CatalogResult<Self> {
        let token = token.into();
        if !is_valid_key(&token) {
            return Err(CatalogError::Config("catalog access token is missing".to_string()));
        }

        let per_second = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            CatalogError::Config("requests_per_second must be at least 1".to_string())
        })?;

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    /// Client from configuration, resolving the token ENV → TOML
    pub fn from_config(config: &CatalogConfig) -> CatalogResult<Self> {
        let token = config
            .resolve_token()
            .map_err(|e| CatalogError::Config(e.to_string()))?;
        Self::new(
            &config.base_url,
            token,
            config.requests_per_second,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Rate-limit, send, check status
    async fn send(&self, request: RequestBuilder) -> CatalogResult<reqwest::Response> {
        self.rate_limiter.until_ready().await;

        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %error_text, "Catalog request failed");
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> CatalogResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<CatalogTrack>> {
        tracing::debug!(query = %query, limit, "Catalog search");
        let limit = limit.to_string();
        let request = self.http_client.get(self.url("search")).query(&[
            ("q", query),
            ("type", "track"),
            ("limit", limit.as_str()),
        ]);
        let response: SearchResponse = self.send_json(request).await?;
        Ok(response.tracks.map(|page| page.items).unwrap_or_default())
    }

    async fn track(&self, id: &str) -> CatalogResult<CatalogTrack> {
        let request = self.http_client.get(self.url(&format!("tracks/{}", id)));
        self.send_json(request).await
    }

    async fn current_user_id(&self) -> CatalogResult<String> {
        let request = self.http_client.get(self.url("me"));
        let user: CurrentUser = self.send_json(request).await?;
        Ok(user.id)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> CatalogResult<CreatedPlaylist> {
        let request = self
            .http_client
            .post(self.url(&format!("users/{}/playlists", user_id)))
            .json(&NewPlaylist {
                name,
                description,
                public: false,
            });
        let created: PlaylistCreated = self.send_json(request).await?;
        Ok(created.into())
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> CatalogResult<()> {
        let request = self
            .http_client
            .post(self.url(&format!("playlists/{}/tracks", playlist_id)))
            .json(&AddTracks { uris });
        self.send(request).await?;
        Ok(())
    }
}
