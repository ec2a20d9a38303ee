//! Playlist synthesizer
//!
//! One structured-output completion turns a vibe plus constraints into an
//! ordered candidate list, which is then post-processed locally.

use serde::Deserialize;
use std::sync::Arc;
use vibelist_common::{Error, Result, Song, SynthesisConstraints};

use crate::completion::{CompletionProvider, ModelChoice};
use crate::postprocess;
use crate::prompts;

#[derive(Debug, Deserialize)]
struct PlaylistEnvelope {
    playlist: Vec<Song>,
}

/// Remove an optional Markdown code fence (```json ... ```) around a payload
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse the model's `{ "playlist": [...] }` answer
///
/// # Errors
/// `Error::InvalidPlaylistFormat` when the payload is not the expected shape.
pub fn parse_playlist(content: &str) -> Result<Vec<Song>> {
    let payload = strip_code_fence(content);
    serde_json::from_str::<PlaylistEnvelope>(payload)
        .map(|envelope| envelope.playlist)
        .map_err(|e| {
            tracing::warn!(error = %e, content = %payload, "Failed to parse playlist JSON");
            Error::InvalidPlaylistFormat(format!("Failed to parse playlist response: {}", e))
        })
}

/// Structured playlist generation
pub struct PlaylistSynthesizer {
    provider: Arc<dyn CompletionProvider>,
    models: ModelChoice,
}

impl PlaylistSynthesizer {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: ModelChoice) -> Self {
        Self { provider, models }
    }

    /// Generate at most `song_count` candidates for a vibe
    ///
    /// # Errors
    /// - `Error::InvalidInput` for an empty vibe or a zero song count
    /// - `Error::Upstream` / `Error::Network` from the completion call
    /// - `Error::InvalidPlaylistFormat` when the answer cannot be parsed
    pub async fn synthesize(
        &self,
        vibe: &str,
        context: &str,
        song_count: usize,
        constraints: &SynthesisConstraints,
    ) -> Result<Vec<Song>> {
        if vibe.trim().is_empty() {
            return Err(Error::InvalidInput("vibe description is empty".to_string()));
        }
        if song_count == 0 {
            return Err(Error::InvalidInput("song count must be at least 1".to_string()));
        }

        let request = prompts::playlist_request(&self.models, vibe, context, song_count, constraints);
        let content = self.provider.complete(&request).await?;
        tracing::debug!(content = %content, "Raw playlist response");

        let candidates = parse_playlist(&content)?;
        let songs = postprocess::finalize(candidates, song_count, constraints);

        tracing::info!(
            requested = song_count,
            tracks = songs.len(),
            "Generated playlist"
        );
        Ok(songs)
    }
}
