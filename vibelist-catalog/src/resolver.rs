//! Track resolution
//!
//! Maps a synthesized `(title, artist)` pair to the best playable catalog
//! track: scoped search first, unscoped fallback on zero results, then
//! scoring. Every failure is a miss for the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::client::CatalogApi;
use crate::error::{CatalogError, CatalogResult};
use crate::models::CatalogTrack;
use crate::scoring::{score_track, ScoreCard, ScoreWeights};

/// Results requested per search
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

/// Replace every non-word, non-space character with a space, then trim
pub fn sanitize(text: &str) -> String {
    NON_WORD.replace_all(text, " ").trim().to_string()
}

/// `track:"<title>" artist:"<artist>"` over sanitized inputs
pub fn exact_query(title: &str, artist: &str) -> String {
    format!("track:\"{}\" artist:\"{}\"", sanitize(title), sanitize(artist))
}

/// `<title> <artist>` over sanitized inputs
pub fn fallback_query(title: &str, artist: &str) -> String {
    format!("{} {}", sanitize(title), sanitize(artist))
}

/// Winning candidate with its score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub track: CatalogTrack,
    pub score: ScoreCard,
}

pub struct TrackResolver {
    api: Arc<dyn CatalogApi>,
    weights: ScoreWeights,
    search_limit: u32,
}

impl TrackResolver {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            weights: ScoreWeights::DEFAULT,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_search_limit(mut self, search_limit: u32) -> Self {
        self.search_limit = search_limit;
        self
    }

    pub fn api(&self) -> &Arc<dyn CatalogApi> {
        &self.api
    }

    /// Candidates for a pair: scoped search, falling back to unscoped on zero results
    ///
    /// A failed scoped search aborts; a failed fallback is an empty result.
    async fn candidates(&self, title: &str, artist: &str) -> CatalogResult<Vec<CatalogTrack>> {
        let tracks = self
            .api
            .search_tracks(&exact_query(title, artist), self.search_limit)
            .await?;
        if !tracks.is_empty() {
            return Ok(tracks);
        }

        tracing::debug!(title = %title, artist = %artist, "No scoped results, trying fallback query");
        match self
            .api
            .search_tracks(&fallback_query(title, artist), self.search_limit)
            .await
        {
            Ok(tracks) => Ok(tracks),
            Err(e) => {
                tracing::debug!(error = %e, "Fallback search failed");
                Ok(Vec::new())
            }
        }
    }

    /// Highest-scoring candidate; ties keep search order
    ///
    /// # Errors
    /// `CatalogError::ResolutionMiss` when no candidate exists, or the search
    /// error when the scoped query failed.
    pub async fn best_match(&self, title: &str, artist: &str) -> CatalogResult<ScoredCandidate> {
        let tracks = self.candidates(title, artist).await?;

        let mut scored: Vec<ScoredCandidate> = tracks
            .into_iter()
            .map(|track| {
                let score = score_track(&track, title, artist, &self.weights);
                ScoredCandidate { track, score }
            })
            .collect();
        // Stable: equal scores keep search order
        scored.sort_by(|a, b| b.score.total.cmp(&a.score.total));

        scored
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::miss(title, artist))
    }

    /// Catalog URI of the best match, `None` on any failure
    pub async fn resolve(&self, title: &str, artist: &str) -> Option<String> {
        match self.best_match(title, artist).await {
            Ok(best) => {
                tracing::debug!(
                    title = %title,
                    artist = %artist,
                    uri = %best.track.uri,
                    score = best.score.total,
                    "Resolved track"
                );
                Some(best.track.uri)
            }
            Err(e) => {
                tracing::warn!(title = %title, artist = %artist, error = %e, "Track resolution missed");
                None
            }
        }
    }
}
