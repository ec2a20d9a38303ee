//! Deterministic post-processing of synthesized candidates
//!
//! Artist-diversity filtering followed by trimming to the requested length.
//! Order from the model is significant: earlier entries win both steps.

use std::collections::HashSet;
use vibelist_common::{Song, SynthesisConstraints};

/// Diversity values above this enable the artist filter
pub const DIVERSITY_FILTER_THRESHOLD: u8 = 7;

/// What post-processing did to a candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiversityOutcome {
    /// No diversity signal, or signal at or below the threshold
    NotRequested,
    /// Filtered list kept
    Applied { removed: usize },
    /// Filtered list would have been too short; original list kept
    Rejected { filtered_len: usize },
}

/// Minimum filtered length for the diversity filter to be committed:
/// `min(song_count * 0.8, song_count - 3)`
pub fn diversity_floor(song_count: usize) -> f64 {
    let count = song_count as f64;
    (count * 0.8).min(count - 3.0)
}

/// Keep the first occurrence of each artist (case-insensitive)
pub fn unique_artists(songs: &[Song]) -> Vec<Song> {
    let mut seen = HashSet::new();
    songs
        .iter()
        .filter(|song| seen.insert(song.artist.to_lowercase()))
        .cloned()
        .collect()
}

/// Apply the diversity filter when requested and affordable
pub fn apply_diversity(
    songs: Vec<Song>,
    song_count: usize,
    constraints: &SynthesisConstraints,
) -> (Vec<Song>, DiversityOutcome) {
    match constraints.diversity {
        Some(d) if d > DIVERSITY_FILTER_THRESHOLD => {}
        _ => return (songs, DiversityOutcome::NotRequested),
    }

    let filtered = unique_artists(&songs);
    if filtered.len() as f64 >= diversity_floor(song_count) {
        let removed = songs.len() - filtered.len();
        (filtered, DiversityOutcome::Applied { removed })
    } else {
        let filtered_len = filtered.len();
        (songs, DiversityOutcome::Rejected { filtered_len })
    }
}

/// Diversity filter then truncation to `song_count`
pub fn finalize(
    songs: Vec<Song>,
    song_count: usize,
    constraints: &SynthesisConstraints,
) -> Vec<Song> {
    let candidates = songs.len();
    let (mut songs, diversity) = apply_diversity(songs, song_count, constraints);
    songs.truncate(song_count);

    tracing::debug!(
        candidates,
        song_count,
        kept = songs.len(),
        diversity = ?diversity,
        "Post-processed synthesized playlist"
    );

    songs
}
