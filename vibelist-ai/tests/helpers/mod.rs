//! Test Helper Utilities
//!
//! Scripted completion provider for exercising the pipeline without network
//! access.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use vibelist_ai::completion::{CompletionProvider, CompletionRequest};
use vibelist_common::{Error, Result};

/// Which pipeline stage a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ImageVibe,
    TextVibe,
    CombinedVibe,
    Title,
    Playlist,
}

impl Stage {
    pub fn of(request: &CompletionRequest) -> Self {
        if request.has_image() {
            Stage::ImageVibe
        } else if request.max_tokens == 2000 {
            Stage::Playlist
        } else if request.max_tokens == 50 {
            Stage::Title
        } else if request.text().contains("Combine the vibes now.") {
            Stage::CombinedVibe
        } else {
            Stage::TextVibe
        }
    }
}

/// Canned answer per stage, plus a log of every request received
pub struct ScriptedProvider {
    image_vibe: Result<String>,
    text_vibe: Result<String>,
    combined_vibe: Result<String>,
    title: Result<String>,
    playlist: Result<String>,
    delay: Option<Duration>,
    playlist_calls: AtomicUsize,
    requests: Mutex<Vec<(Stage, CompletionRequest)>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            image_vibe: Ok("neon-lit rainy streets, melancholic and cinematic".to_string()),
            text_vibe: Ok("mellow, rain-soaked jazz warmth".to_string()),
            combined_vibe: Ok("cinematic rainy jazz".to_string()),
            title: Ok("Neon Rain".to_string()),
            playlist: Ok(playlist_json(&numbered_tracks(5))),
            delay: None,
            playlist_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedProvider {
    pub fn with_playlist(mut self, answer: Result<String>) -> Self {
        self.playlist = answer;
        self
    }

    pub fn with_text_vibe(mut self, answer: Result<String>) -> Self {
        self.text_vibe = answer;
        self
    }

    pub fn with_image_vibe(mut self, answer: Result<String>) -> Self {
        self.image_vibe = answer;
        self
    }

    pub fn with_combined_vibe(mut self, answer: Result<String>) -> Self {
        self.combined_vibe = answer;
        self
    }

    pub fn with_title(mut self, answer: Result<String>) -> Self {
        self.title = answer;
        self
    }

    /// Sleep before answering every request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of synthesis completions performed
    pub fn playlist_calls(&self) -> usize {
        self.playlist_calls.load(Ordering::SeqCst)
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(stage, _)| *stage)
            .collect()
    }

    pub fn request_for(&self, stage: Stage) -> Option<CompletionRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, r)| r.clone())
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let stage = Stage::of(request);
        self.requests.lock().unwrap().push((stage, request.clone()));
        if stage == Stage::Playlist {
            self.playlist_calls.fetch_add(1, Ordering::SeqCst);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match stage {
            Stage::ImageVibe => self.image_vibe.clone(),
            Stage::TextVibe => self.text_vibe.clone(),
            Stage::CombinedVibe => self.combined_vibe.clone(),
            Stage::Title => self.title.clone(),
            Stage::Playlist => self.playlist.clone(),
        }
    }
}

/// `(title, artist)` pairs with distinct artists
pub fn numbered_tracks(n: usize) -> Vec<(String, String)> {
    (1..=n)
        .map(|i| (format!("Track {i}"), format!("Artist {i}")))
        .collect()
}

/// `{"playlist": [...]}` for the given pairs
pub fn playlist_json(tracks: &[(String, String)]) -> String {
    let entries: Vec<serde_json::Value> = tracks
        .iter()
        .map(|(title, artist)| serde_json::json!({"title": title, "artist": artist}))
        .collect();
    serde_json::json!({ "playlist": entries }).to_string()
}

pub fn upstream_error(status: u16) -> Error {
    Error::Upstream {
        status,
        body: "service unavailable".to_string(),
    }
}
