//! # vibelist Catalog
//!
//! Track resolution engine against a Spotify-compatible catalog:
//! - [`client`]: rate-limited HTTP client behind the [`CatalogApi`] seam
//! - [`scoring`]: weighted candidate ranking
//! - [`resolver`]: `(title, artist)` → catalog URI
//! - [`enhancer`]: batched URI/detail attachment for whole playlists
//! - [`exporter`]: playlist creation in the user's library

pub mod client;
pub mod enhancer;
pub mod error;
pub mod exporter;
pub mod models;
pub mod resolver;
pub mod scoring;

pub use client::{CatalogApi, CatalogClient};
pub use enhancer::{Batching, PlaylistEnhancer};
pub use error::{CatalogError, CatalogResult};
pub use exporter::{ExportedPlaylist, PlaylistExporter};
pub use models::CatalogTrack;
pub use resolver::TrackResolver;
pub use scoring::{Criterion, ScoreWeights};
