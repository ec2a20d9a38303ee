//! Candidate scoring
//!
//! Ranks catalog search results against a requested `(title, artist)`.
//! Favours exact titles, matching artists, popular tracks and studio
//! releases; penalises live/remix/alternate versions and decorated titles.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CatalogTrack;

/// Substrings marking a non-canonical recording (checked in track and album name)
pub const ALTERNATE_VERSION_KEYWORDS: &[&str] = &[
    "live",
    "concert",
    "tour",
    "acoustic",
    "unplugged",
    "session",
    "remix",
    "edit",
    "mix",
    "version",
    "remaster",
    "demo",
    "alternate",
    "rehearsal",
    "bootleg",
    "radio",
    "instrumental",
    "karaoke",
];

static PAREN_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));
static BRACKET_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

/// One scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Track name equals the requested title (case-insensitive)
    ExactTitle,
    /// One title contains the other
    PartialTitle,
    /// Some track artist contains the requested artist or vice versa
    ArtistMatch,
    /// Catalog popularity, capped
    Popularity,
    AlbumRelease,
    SingleRelease,
    AlternateVersion,
    /// Per `(...)` or `[...]` group in the track name
    BracketGroup,
    /// `feat.`/`ft.` in the track name but not in the requested title
    UnrequestedFeature,
}

/// Weight table, one entry per [`Criterion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    pub exact_title: i32,
    pub partial_title: i32,
    pub artist_match: i32,
    /// Upper bound of the popularity contribution
    pub popularity_cap: u32,
    pub album_release: i32,
    pub single_release: i32,
    pub alternate_version: i32,
    pub bracket_group: i32,
    pub unrequested_feature: i32,
}

impl ScoreWeights {
    pub const DEFAULT: ScoreWeights = ScoreWeights {
        exact_title: 100,
        partial_title: 80,
        artist_match: 80,
        popularity_cap: 100,
        album_release: 30,
        single_release: 20,
        alternate_version: -50,
        bracket_group: -10,
        unrequested_feature: -15,
    };

    /// Fixed weight of a criterion (`Popularity` reports its cap)
    pub fn weight(&self, criterion: Criterion) -> i32 {
        match criterion {
            Criterion::ExactTitle => self.exact_title,
            Criterion::PartialTitle => self.partial_title,
            Criterion::ArtistMatch => self.artist_match,
            Criterion::Popularity => self.popularity_cap as i32,
            Criterion::AlbumRelease => self.album_release,
            Criterion::SingleRelease => self.single_release,
            Criterion::AlternateVersion => self.alternate_version,
            Criterion::BracketGroup => self.bracket_group,
            Criterion::UnrequestedFeature => self.unrequested_feature,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Score with its per-criterion breakdown
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreCard {
    pub total: i32,
    pub contributions: Vec<(Criterion, i32)>,
}

impl ScoreCard {
    fn add(&mut self, criterion: Criterion, points: i32) {
        if points != 0 {
            self.total += points;
            self.contributions.push((criterion, points));
        }
    }

    pub fn contains(&self, criterion: Criterion) -> bool {
        self.contributions.iter().any(|(c, _)| *c == criterion)
    }
}

/// Whether a track or album name marks an alternate recording
pub fn is_alternate_version(track_name: &str, album_name: &str) -> bool {
    let track = track_name.to_lowercase();
    let album = album_name.to_lowercase();
    ALTERNATE_VERSION_KEYWORDS
        .iter()
        .any(|k| track.contains(k) || album.contains(k))
}

/// Number of `(...)` plus `[...]` groups in a name
pub fn bracket_groups(name: &str) -> usize {
    PAREN_GROUP.find_iter(name).count() + BRACKET_GROUP.find_iter(name).count()
}

fn has_feature_marker(text: &str) -> bool {
    text.contains("feat.") || text.contains("ft.")
}

/// Score one candidate against the requested title and artist
pub fn score_track(
    track: &CatalogTrack,
    title: &str,
    artist: &str,
    weights: &ScoreWeights,
) -> ScoreCard {
    let mut card = ScoreCard::default();
    let name = track.name.to_lowercase();
    let wanted_title = title.to_lowercase();
    let wanted_artist = artist.to_lowercase();

    if name == wanted_title {
        card.add(Criterion::ExactTitle, weights.exact_title);
    } else if name.contains(&wanted_title) || wanted_title.contains(&name) {
        card.add(Criterion::PartialTitle, weights.partial_title);
    }

    let artist_matches = track.artists.iter().any(|a| {
        let candidate = a.name.to_lowercase();
        candidate.contains(&wanted_artist) || wanted_artist.contains(&candidate)
    });
    if artist_matches {
        card.add(Criterion::ArtistMatch, weights.artist_match);
    }

    card.add(
        Criterion::Popularity,
        track.popularity.min(weights.popularity_cap) as i32,
    );

    match track.album.album_type.as_str() {
        "album" => card.add(Criterion::AlbumRelease, weights.album_release),
        "single" => card.add(Criterion::SingleRelease, weights.single_release),
        _ => {}
    }

    if is_alternate_version(&track.name, &track.album.name) {
        card.add(Criterion::AlternateVersion, weights.alternate_version);
    }

    let groups = bracket_groups(&name) as i32;
    card.add(Criterion::BracketGroup, groups * weights.bracket_group);

    if has_feature_marker(&name) && !has_feature_marker(&wanted_title) {
        card.add(Criterion::UnrequestedFeature, weights.unrequested_feature);
    }

    card
}
