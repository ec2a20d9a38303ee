//! Shared data model
//!
//! Songs, preference knobs, the typed synthesis constraints derived from them,
//! and the request/response pair of one pipeline run.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Song count used when the caller does not ask for one
pub const DEFAULT_SONG_COUNT: usize = 15;

/// Playlist name used when nothing better is available
pub const DEFAULT_PLAYLIST_NAME: &str = "ai-generated playlist";

/// Lowest accepted value of a 1-10 preference knob
pub const KNOB_MIN: u8 = 1;

/// Highest accepted value of a 1-10 preference knob
pub const KNOB_MAX: u8 = 10;

/// One playlist entry
///
/// Identity is `(title, artist)` as proposed by the synthesizer. The catalog
/// annotations are attached only by enhancement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub title: String,
    pub artist: String,
    /// Playable catalog URI, present after successful resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// Catalog popularity (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            uri: None,
            cover_url: None,
            preview_url: None,
            popularity: None,
        }
    }

    /// Whether the song has been resolved to a catalog track
    pub fn is_resolved(&self) -> bool {
        self.uri.is_some()
    }
}

/// Caller-supplied preference knobs for a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedParameters {
    pub include_obscure: bool,
    /// 1-10
    pub energy_level: u8,
    /// 1-10
    pub tempo: u8,
    /// 1-10; above 7 enables the artist diversity filter
    pub diversity: u8,
    /// Whether the user opened the advanced panel. Carried for the host only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
}

impl Default for AdvancedParameters {
    fn default() -> Self {
        Self {
            include_obscure: true,
            energy_level: 5,
            tempo: 5,
            diversity: 5,
            is_used: None,
        }
    }
}

impl AdvancedParameters {
    /// Reject knob values outside 1..=10
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("energyLevel", self.energy_level),
            ("tempo", self.tempo),
            ("diversity", self.diversity),
        ] {
            if !(KNOB_MIN..=KNOB_MAX).contains(&value) {
                return Err(Error::InvalidInput(format!(
                    "{name} must be between {KNOB_MIN} and {KNOB_MAX}, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Typed constraints carrying every knob as a present signal
    pub fn constraints(&self) -> SynthesisConstraints {
        SynthesisConstraints {
            include_obscure: self.include_obscure,
            energy_level: Some(self.energy_level),
            tempo: Some(self.tempo),
            diversity: Some(self.diversity),
        }
    }
}

/// Constraint signals handed to the synthesis request builder
///
/// `None` means "no signal": no instruction text is emitted for that knob and
/// no default is substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisConstraints {
    pub include_obscure: bool,
    pub energy_level: Option<u8>,
    pub tempo: Option<u8>,
    pub diversity: Option<u8>,
}

impl From<&AdvancedParameters> for SynthesisConstraints {
    fn from(params: &AdvancedParameters) -> Self {
        params.constraints()
    }
}

/// Square-cropped image encoded for transmission
///
/// The pipeline treats this as an opaque payload and only forwards `base64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImage {
    /// Original file name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// `data:image/jpeg;base64,...`
    pub data_url: String,
    /// Raw base64 payload (no data-URL prefix)
    pub base64: String,
}

impl ProcessedImage {
    /// Wrap bytes that are already a prepared (cropped, compressed) JPEG
    pub fn from_jpeg_bytes(file: Option<String>, jpeg: &[u8]) -> Self {
        let base64 = base64::engine::general_purpose::STANDARD.encode(jpeg);
        Self {
            file,
            data_url: format!("data:image/jpeg;base64,{base64}"),
            base64,
        }
    }
}

/// External collaborator that crops/resizes/encodes a raw upload
pub trait ImagePreprocessor: Send + Sync {
    fn preprocess(&self, file_name: Option<String>, raw: &[u8]) -> Result<ProcessedImage>;
}

/// Inputs of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    /// Free-text description; may be empty when an image is supplied
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ProcessedImage>,
    #[serde(default = "default_song_count")]
    pub song_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<AdvancedParameters>,
}

fn default_song_count() -> usize {
    DEFAULT_SONG_COUNT
}

impl PlaylistRequest {
    /// Text-only request with the default song count
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            song_count: DEFAULT_SONG_COUNT,
            parameters: None,
        }
    }

    pub fn with_image(mut self, image: ProcessedImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Attach a raw upload, prepared by `preprocessor`
    ///
    /// # Errors
    /// Whatever the preprocessor reports for an unusable upload
    pub fn with_raw_image(
        self,
        preprocessor: &dyn ImagePreprocessor,
        file_name: Option<String>,
        raw: &[u8],
    ) -> Result<Self> {
        let image = preprocessor.preprocess(file_name, raw)?;
        Ok(self.with_image(image))
    }

    pub fn with_song_count(mut self, song_count: usize) -> Self {
        self.song_count = song_count;
        self
    }

    pub fn with_parameters(mut self, parameters: AdvancedParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Trimmed prompt, `None` when blank
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.prompt.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Constraint signals for this run (no parameters: no numeric signals)
    pub fn constraints(&self) -> SynthesisConstraints {
        self.parameters
            .as_ref()
            .map(SynthesisConstraints::from)
            .unwrap_or_default()
    }

    /// Check the request before any remote call is made
    pub fn validate(&self) -> Result<()> {
        if self.text().is_none() && self.image.is_none() {
            return Err(Error::InvalidInput(
                "Please provide either a text description or upload an image.".to_string(),
            ));
        }
        if self.song_count == 0 {
            return Err(Error::InvalidInput(
                "song count must be at least 1".to_string(),
            ));
        }
        if let Some(params) = &self.parameters {
            params.validate()?;
        }
        Ok(())
    }
}

/// Terminal output of the synthesis pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub playlist: Vec<Song>,
    /// Present only when an image alone supplied the vibe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_title: Option<String>,
}

/// Name a playlist after its prompt: first five words (with `...` when longer),
/// or the default name for a blank prompt
pub fn default_playlist_name(prompt: &str) -> String {
    if prompt.trim().is_empty() {
        return DEFAULT_PLAYLIST_NAME.to_string();
    }
    let words: Vec<&str> = prompt.split(' ').collect();
    if words.len() > 5 {
        format!("{}...", words[..5].join(" "))
    } else {
        prompt.to_string()
    }
}
