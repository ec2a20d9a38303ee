//! Service-agnostic playlist renderings
//!
//! Text, CSV and JSON forms of a playlist, plus search links for the common
//! streaming platforms. All functions are pure.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::models::Song;
use crate::{Error, Result};

/// Streaming platforms with a public search page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Spotify,
    Apple,
    YouTube,
    Amazon,
    Deezer,
    Tidal,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Spotify,
        Platform::Apple,
        Platform::YouTube,
        Platform::Amazon,
        Platform::Deezer,
        Platform::Tidal,
    ];

    /// Search page URL for one song
    pub fn search_url(&self, song: &Song) -> String {
        let query = urlencoding::encode(&format!("{} {}", song.title, song.artist)).into_owned();
        match self {
            Platform::Spotify => format!("https://open.spotify.com/search/{query}"),
            Platform::Apple => format!("https://music.apple.com/search?term={query}"),
            Platform::YouTube => format!("https://music.youtube.com/search?q={query}"),
            Platform::Amazon => format!("https://music.amazon.com/search/{query}"),
            Platform::Deezer => format!("https://www.deezer.com/search/{query}"),
            Platform::Tidal => format!("https://listen.tidal.com/search?q={query}"),
        }
    }
}

/// Numbered plain-text list headed by the playlist name
pub fn to_text(name: &str, songs: &[Song]) -> String {
    let list = songs
        .iter()
        .enumerate()
        .map(|(i, song)| format!("{}. {} - {}", i + 1, song.title, song.artist))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{name}\n\n{list}")
}

/// CSV with a `Track,Artist,Title` header
pub fn to_csv(songs: &[Song]) -> String {
    let mut out = String::from("Track,Artist,Title\n");
    let rows = songs
        .iter()
        .enumerate()
        .map(|(i, song)| {
            format!(
                "{},\"{}\",\"{}\"",
                i + 1,
                csv_escape(&song.artist),
                csv_escape(&song.title)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&rows);
    out
}

fn csv_escape(field: &str) -> String {
    field.replace('"', "\"\"")
}

#[derive(Serialize)]
struct JsonExport<'a> {
    name: &'a str,
    created: String,
    tracks: Vec<JsonTrack<'a>>,
}

#[derive(Serialize)]
struct JsonTrack<'a> {
    position: usize,
    title: &'a str,
    artist: &'a str,
}

/// Pretty-printed JSON document with 1-based track positions
pub fn to_json(name: &str, songs: &[Song], created: DateTime<Utc>) -> Result<String> {
    let doc = JsonExport {
        name,
        created: created.to_rfc3339_opts(SecondsFormat::Millis, true),
        tracks: songs
            .iter()
            .enumerate()
            .map(|(i, song)| JsonTrack {
                position: i + 1,
                title: &song.title,
                artist: &song.artist,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| Error::Internal(format!("Serialize playlist failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn songs() -> Vec<Song> {
        vec![
            Song::new("So What", "Miles Davis"),
            Song::new("Take Five", "The Dave Brubeck Quartet"),
        ]
    }

    #[test]
    fn test_text_export() {
        assert_eq!(
            to_text("Rainy Jazz", &songs()),
            "Rainy Jazz\n\n1. So What - Miles Davis\n2. Take Five - The Dave Brubeck Quartet"
        );
    }

    #[test]
    fn test_csv_export_quotes_and_escapes() {
        let mut list = songs();
        list.push(Song::new("The \"Real\" Thing", "Someone"));
        let csv = to_csv(&list);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Track,Artist,Title");
        assert_eq!(lines[1], "1,\"Miles Davis\",\"So What\"");
        assert_eq!(lines[3], "3,\"Someone\",\"The \"\"Real\"\" Thing\"");
    }

    #[test]
    fn test_json_export_positions() {
        let created = Utc.with_ymd_and_hms(2024, 3, 5, 19, 0, 0).unwrap();
        let json = to_json("Rainy Jazz", &songs(), created).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Rainy Jazz");
        assert_eq!(value["created"], "2024-03-05T19:00:00.000Z");
        assert_eq!(value["tracks"][1]["position"], 2);
        assert_eq!(value["tracks"][1]["title"], "Take Five");
    }

    #[test]
    fn test_platform_search_urls_encode_query() {
        let song = Song::new("So What", "Miles Davis");
        assert_eq!(
            Platform::Spotify.search_url(&song),
            "https://open.spotify.com/search/So%20What%20Miles%20Davis"
        );
        assert_eq!(
            Platform::Apple.search_url(&song),
            "https://music.apple.com/search?term=So%20What%20Miles%20Davis"
        );
        assert_eq!(Platform::ALL.len(), 6);
    }
}
