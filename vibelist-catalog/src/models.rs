//! Catalog wire types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogImage {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    /// `album`, `single` or `compilation`
    #[serde(default)]
    pub album_type: String,
}

/// A playable catalog track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    pub album: CatalogAlbum,
    #[serde(default)]
    pub preview_url: Option<String>,
    /// 0-100
    #[serde(default)]
    pub popularity: u32,
}

impl CatalogTrack {
    /// Track id: last `:` segment of the URI
    pub fn id(&self) -> &str {
        track_id(&self.uri)
    }

    /// Artist names joined with `, `
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.album.images.first().map(|i| i.url.as_str())
    }
}

/// Last `:` segment of a catalog URI (`catalog:track:<id>` → `<id>`)
pub fn track_id(uri: &str) -> &str {
    uri.rsplit(':').next().unwrap_or(uri)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub items: Vec<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentUser {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewPlaylist<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub public: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistCreated {
    pub id: String,
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
}

/// A playlist just created in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    pub id: String,
    /// Public web URL, when the catalog returns one
    pub url: Option<String>,
}

impl From<PlaylistCreated> for CreatedPlaylist {
    fn from(created: PlaylistCreated) -> Self {
        Self {
            id: created.id,
            url: created.external_urls.and_then(|u| u.spotify),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddTracks<'a> {
    pub uris: &'a [String],
}
