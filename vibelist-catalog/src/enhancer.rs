//! Playlist enhancement
//!
//! Attaches catalog URIs and presentation details (cover, preview,
//! popularity) to synthesized songs. Songs are processed in fixed-size
//! batches: concurrently within a batch, batches one after another with a
//! short pause in between. Output has the same length and order as input.

use chrono::Utc;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use vibelist_common::config::CatalogConfig;
use vibelist_common::events::{EventBus, VibelistEvent};
use vibelist_common::Song;

use crate::client::{CatalogApi, CatalogClient};
use crate::error::CatalogResult;
use crate::models::track_id;
use crate::resolver::TrackResolver;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(250);

/// Batch shape shared by enhancement and export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batching {
    pub size: usize,
    pub pause: Duration,
}

impl Default for Batching {
    fn default() -> Self {
        Self {
            size: DEFAULT_BATCH_SIZE,
            pause: DEFAULT_BATCH_PAUSE,
        }
    }
}

impl From<&CatalogConfig> for Batching {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            size: config.enhance_batch_size,
            pause: Duration::from_millis(config.batch_pause_ms),
        }
    }
}

impl Batching {
    /// Apply `f` to every item, concurrently within a batch, preserving order
    ///
    /// `on_batch` sees the 1-based batch number, the batch count and the
    /// batch's outputs.
    pub async fn run<T, U, F, Fut>(
        &self,
        items: Vec<T>,
        f: F,
        mut on_batch: impl FnMut(usize, usize, &[U]),
    ) -> Vec<U>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = U>,
    {
        let size = self.size.max(1);
        let total_batches = items.len().div_ceil(size);
        let mut output = Vec::with_capacity(items.len());
        let mut remaining = items.into_iter().peekable();
        let mut batch = 0;

        while remaining.peek().is_some() {
            batch += 1;
            let chunk: Vec<T> = remaining.by_ref().take(size).collect();
            let results = join_all(chunk.into_iter().map(&f)).await;
            on_batch(batch, total_batches, &results);
            output.extend(results);

            if batch < total_batches && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        output
    }
}

pub struct PlaylistEnhancer {
    resolver: TrackResolver,
    batching: Batching,
    events: Option<EventBus>,
}

impl PlaylistEnhancer {
    pub fn new(resolver: TrackResolver) -> Self {
        Self {
            resolver,
            batching: Batching::default(),
            events: None,
        }
    }

    /// Enhancer over the HTTP catalog client
    pub fn from_config(config: &CatalogConfig) -> CatalogResult<Self> {
        let client = CatalogClient::from_config(config)?;
        let resolver = TrackResolver::new(Arc::new(client)).with_search_limit(config.search_limit);
        Ok(Self::new(resolver).with_batching(Batching::from(config)))
    }

    pub fn with_batching(mut self, batching: Batching) -> Self {
        self.batching = batching;
        self
    }

    /// Report per-batch progress on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn resolver(&self) -> &TrackResolver {
        &self.resolver
    }

    fn api(&self) -> &Arc<dyn CatalogApi> {
        self.resolver.api()
    }

    /// Enhance every song; failures pass the song through unchanged
    pub async fn enhance(&self, songs: Vec<Song>) -> Vec<Song> {
        let total = songs.len();
        let mut resolved = 0;

        let enhanced = self
            .batching
            .run(
                songs,
                |song| self.enhance_song(song),
                |batch, total_batches, done| {
                    resolved += done.iter().filter(|s| s.is_resolved()).count();
                    tracing::debug!(batch, total_batches, resolved, "Enhancement batch finished");
                    if let Some(bus) = &self.events {
                        bus.emit_lossy(VibelistEvent::EnhancementProgress {
                            batch,
                            total_batches,
                            resolved,
                            timestamp: Utc::now(),
                        });
                    }
                },
            )
            .await;

        tracing::info!(songs = total, resolved, "Enhanced playlist");
        enhanced
    }

    /// Resolve one song and attach its catalog details
    pub async fn enhance_song(&self, mut song: Song) -> Song {
        let uri = match &song.uri {
            Some(uri) => uri.clone(),
            None => match self.resolver.resolve(&song.title, &song.artist).await {
                Some(uri) => uri,
                None => return song,
            },
        };

        match self.api().track(track_id(&uri)).await {
            Ok(details) => {
                song.cover_url = details.cover_url().map(str::to_string);
                song.preview_url = details.preview_url.clone();
                song.popularity = Some(details.popularity);
            }
            Err(e) => {
                tracing::warn!(uri = %uri, error = %e, "Track detail lookup failed");
            }
        }

        song.uri = Some(uri);
        song
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_batches_preserve_order_and_report_progress() {
        let batching = Batching {
            size: 3,
            pause: Duration::ZERO,
        };
        let mut seen = Vec::new();
        let out = batching
            .run(
                (1..=7).collect::<Vec<u32>>(),
                |n| async move { n * 10 },
                |batch, total, done| seen.push((batch, total, done.len())),
            )
            .await;

        assert_eq!(out, vec![10, 20, 30, 40, 50, 60, 70]);
        assert_eq!(seen, vec![(1, 3, 3), (2, 3, 3), (3, 3, 1)]);
    }

    #[tokio::test]
    async fn test_empty_input_runs_no_batches() {
        let mut calls = 0;
        let out = Batching::default()
            .run(Vec::<u32>::new(), |n| async move { n }, |_, _, _| calls += 1)
            .await;
        assert!(out.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_pause_only_between_batches() {
        let batching = Batching {
            size: 2,
            pause: Duration::from_millis(100),
        };
        let start = std::time::Instant::now();
        batching
            .run(vec![1, 2, 3, 4], |n| async move { n }, |_, _, _| {})
            .await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(200));
    }
}
