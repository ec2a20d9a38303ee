//! # vibelist Common Library
//!
//! Shared code for the vibelist crates including:
//! - Error taxonomy (`Error`, `Result`)
//! - Data model (songs, preference knobs, pipeline request/response)
//! - Listening context derived from the wall clock
//! - Configuration loading and credential resolution
//! - Tracing bootstrap
//! - Event bus
//! - Service-agnostic playlist exports

pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod logging;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{
    AdvancedParameters, PlaylistRequest, PlaylistResponse, ProcessedImage, Song,
    SynthesisConstraints,
};
pub use time::ListeningContext;
