//! Test Helper Utilities
//!
//! In-memory catalog for resolver, enhancer and exporter tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use vibelist_catalog::models::{CatalogAlbum, CatalogArtist, CatalogImage, CreatedPlaylist};
use vibelist_catalog::{CatalogApi, CatalogError, CatalogResult, CatalogTrack};

/// Catalog track with one artist and one cover image
pub fn catalog_track(id: &str, name: &str, artist: &str, album_type: &str, popularity: u32) -> CatalogTrack {
    CatalogTrack {
        uri: format!("spotify:track:{id}"),
        name: name.to_string(),
        artists: vec![CatalogArtist {
            name: artist.to_string(),
        }],
        album: CatalogAlbum {
            name: format!("{name} - album"),
            images: vec![CatalogImage {
                url: format!("https://img.example/{id}.jpg"),
                height: Some(640),
                width: Some(640),
            }],
            album_type: album_type.to_string(),
        },
        preview_url: Some(format!("https://preview.example/{id}.mp3")),
        popularity,
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    searches: HashMap<String, CatalogResult<Vec<CatalogTrack>>>,
    details: HashMap<String, CatalogTrack>,
    failing_add_batches: HashSet<usize>,
    queries: Mutex<Vec<String>>,
    added_batches: Mutex<Vec<Vec<String>>>,
    created: Mutex<Vec<(String, String, String)>>,
}

impl FakeCatalog {
    /// Answer `query` with `tracks` and register them for detail lookup
    pub fn with_search(mut self, query: &str, tracks: Vec<CatalogTrack>) -> Self {
        for track in &tracks {
            self.details.insert(track.id().to_string(), track.clone());
        }
        self.searches.insert(query.to_string(), Ok(tracks));
        self
    }

    pub fn with_search_error(mut self, query: &str, error: CatalogError) -> Self {
        self.searches.insert(query.to_string(), Err(error));
        self
    }

    /// Forget the detail record of a track so its lookup fails
    pub fn without_details(mut self, id: &str) -> Self {
        self.details.remove(id);
        self
    }

    /// Make the n-th (0-based) add-tracks call fail
    pub fn with_failing_add_batch(mut self, index: usize) -> Self {
        self.failing_add_batches.insert(index);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn added_batch_sizes(&self) -> Vec<usize> {
        self.added_batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn created(&self) -> Vec<(String, String, String)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn search_tracks(&self, query: &str, _limit: u32) -> CatalogResult<Vec<CatalogTrack>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.searches.get(query).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn track(&self, id: &str) -> CatalogResult<CatalogTrack> {
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::Api(404, "non existing id".to_string()))
    }

    async fn current_user_id(&self) -> CatalogResult<String> {
        Ok("listener".to_string())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> CatalogResult<CreatedPlaylist> {
        self.created.lock().unwrap().push((
            user_id.to_string(),
            name.to_string(),
            description.to_string(),
        ));
        Ok(CreatedPlaylist {
            id: "pl-1".to_string(),
            url: Some("https://open.example/playlist/pl-1".to_string()),
        })
    }

    async fn add_tracks(&self, _playlist_id: &str, uris: &[String]) -> CatalogResult<()> {
        let mut batches = self.added_batches.lock().unwrap();
        let index = batches.len();
        batches.push(uris.to_vec());
        if self.failing_add_batches.contains(&index) {
            return Err(CatalogError::Api(500, "server error".to_string()));
        }
        Ok(())
    }
}
