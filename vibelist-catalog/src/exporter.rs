//! Playlist export
//!
//! Creates a private catalog playlist for the current user and fills it with
//! the resolved songs. Unresolvable songs and failed add batches are reported,
//! not fatal.

use chrono::Utc;
use std::sync::Arc;
use vibelist_common::config::CatalogConfig;
use vibelist_common::events::{EventBus, VibelistEvent};
use vibelist_common::models::DEFAULT_PLAYLIST_NAME;
use vibelist_common::Song;

use crate::client::{CatalogApi, CatalogClient};
use crate::enhancer::Batching;
use crate::error::{CatalogError, CatalogResult};
use crate::resolver::TrackResolver;

/// Description used when the caller gives none
pub const DEFAULT_DESCRIPTION: &str = "Generated by YouLists AI";

/// Catalog limit on URIs per add-tracks call
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Result of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPlaylist {
    pub id: String,
    pub url: Option<String>,
    /// Tracks actually added (failed batches excluded)
    pub added: usize,
    /// Songs that could not be resolved
    pub missing: Vec<Song>,
}

pub struct PlaylistExporter {
    resolver: TrackResolver,
    batching: Batching,
    events: Option<EventBus>,
}

impl PlaylistExporter {
    pub fn new(resolver: TrackResolver) -> Self {
        Self {
            resolver,
            batching: Batching::default(),
            events: None,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> CatalogResult<Self> {
        let client = CatalogClient::from_config(config)?;
        let resolver = TrackResolver::new(Arc::new(client)).with_search_limit(config.search_limit);
        Ok(Self::new(resolver).with_batching(Batching::from(config)))
    }

    pub fn with_batching(mut self, batching: Batching) -> Self {
        self.batching = batching;
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    fn api(&self) -> &Arc<dyn CatalogApi> {
        self.resolver.api()
    }

    /// Catalog URI for every song, resolving the ones that have none
    async fn resolve_all(&self, songs: &[Song]) -> Vec<Option<String>> {
        self.batching
            .run(
                songs.iter().collect::<Vec<&Song>>(),
                |song| async move {
                    match &song.uri {
                        Some(uri) => Some(uri.clone()),
                        None => self.resolver.resolve(&song.title, &song.artist).await,
                    }
                },
                |_, _, _| {},
            )
            .await
    }

    /// Create a playlist named `name` holding `songs`
    ///
    /// # Errors
    /// - `CatalogError::InvalidInput` when no song resolves
    /// - user lookup or playlist creation failures
    pub async fn export(
        &self,
        name: &str,
        description: Option<&str>,
        songs: &[Song],
    ) -> CatalogResult<ExportedPlaylist> {
        let resolved = self.resolve_all(songs).await;

        let mut uris = Vec::with_capacity(songs.len());
        let mut missing = Vec::new();
        for (song, uri) in songs.iter().zip(resolved) {
            match uri {
                Some(uri) => uris.push(uri),
                None => missing.push(song.clone()),
            }
        }

        if uris.is_empty() {
            return Err(CatalogError::InvalidInput(
                "No tracks found to add to playlist.".to_string(),
            ));
        }

        let name = match name.trim() {
            "" => DEFAULT_PLAYLIST_NAME,
            trimmed => trimmed,
        };
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);

        let user_id = self.api().current_user_id().await?;
        let playlist = self
            .api()
            .create_playlist(&user_id, name, description)
            .await?;
        tracing::info!(playlist_id = %playlist.id, name = %name, "Created playlist");

        let mut added = 0;
        for (index, chunk) in uris.chunks(MAX_TRACKS_PER_REQUEST).enumerate() {
            match self.api().add_tracks(&playlist.id, chunk).await {
                Ok(()) => added += chunk.len(),
                Err(e) => {
                    tracing::warn!(
                        playlist_id = %playlist.id,
                        batch = index + 1,
                        tracks = chunk.len(),
                        error = %e,
                        "Failed to add track batch, continuing"
                    );
                }
            }
        }

        tracing::info!(
            playlist_id = %playlist.id,
            added,
            missing = missing.len(),
            "Exported playlist"
        );
        if let Some(bus) = &self.events {
            bus.emit_lossy(VibelistEvent::PlaylistExported {
                playlist_id: playlist.id.clone(),
                track_count: added,
                missing_count: missing.len(),
                timestamp: Utc::now(),
            });
        }

        Ok(ExportedPlaylist {
            id: playlist.id,
            url: playlist.url,
            added,
            missing,
        })
    }
}
