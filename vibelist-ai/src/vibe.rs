//! Vibe extraction
//!
//! Turns a prompt, an image, or both into a short textual description of the
//! musical atmosphere the user is after. Also generates titles for
//! image-only runs.

use std::sync::Arc;
use vibelist_common::models::DEFAULT_PLAYLIST_NAME;
use vibelist_common::{Error, ProcessedImage, Result};

use crate::completion::{CompletionProvider, CompletionRequest, ModelChoice};
use crate::prompts;

/// Which inputs supplied the vibe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibeSource {
    Text,
    Image,
    Combined,
}

impl VibeSource {
    pub fn select(prompt: Option<&str>, image: Option<&ProcessedImage>) -> Option<Self> {
        match (prompt, image) {
            (Some(_), Some(_)) => Some(VibeSource::Combined),
            (None, Some(_)) => Some(VibeSource::Image),
            (Some(_), None) => Some(VibeSource::Text),
            (None, None) => None,
        }
    }
}

/// Stage errors become `ExtractionFailed`; configuration errors pass through
fn extraction_error(stage: &str, err: Error) -> Error {
    match err {
        Error::Config(_) | Error::ExtractionFailed(_) => err,
        other => Error::ExtractionFailed(format!("{stage}: {other}")),
    }
}

pub struct VibeExtractor {
    provider: Arc<dyn CompletionProvider>,
    models: ModelChoice,
}

impl VibeExtractor {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: ModelChoice) -> Self {
        Self { provider, models }
    }

    async fn ask(&self, stage: &str, request: CompletionRequest) -> Result<String> {
        self.provider
            .complete(&request)
            .await
            .map_err(|e| extraction_error(stage, e))
    }

    async fn ask_non_empty(&self, stage: &str, request: CompletionRequest) -> Result<String> {
        let answer = self.ask(stage, request).await?;
        if answer.is_empty() {
            return Err(Error::ExtractionFailed(format!("{stage}: empty response")));
        }
        Ok(answer)
    }

    /// Describe the vibe of the supplied inputs
    ///
    /// A blank prompt counts as absent.
    ///
    /// # Errors
    /// - `Error::InvalidInput` when neither input is present
    /// - `Error::ExtractionFailed` on transport failure, non-2xx or an empty answer
    /// - `Error::Config` when the completion credential is missing
    pub async fn extract_vibe(
        &self,
        prompt: Option<&str>,
        image: Option<&ProcessedImage>,
        context: &str,
    ) -> Result<String> {
        let prompt = prompt.map(str::trim).filter(|p| !p.is_empty());
        let source = VibeSource::select(prompt, image).ok_or_else(|| {
            Error::InvalidInput(
                "Please provide either a text description or upload an image.".to_string(),
            )
        })?;

        let vibe = match (source, prompt, image) {
            (VibeSource::Text, Some(text), _) => {
                let request = prompts::text_vibe_request(&self.models, text, context);
                self.ask_non_empty("text vibe", request).await?
            }
            (VibeSource::Image, _, Some(image)) => self.image_vibe(image).await?,
            (VibeSource::Combined, Some(text), Some(image)) => {
                let image_vibe = self.image_vibe(image).await?;
                let request =
                    prompts::combined_vibe_request(&self.models, &image_vibe, text, context);
                let merged = self.ask("combined vibe", request).await?;
                if merged.is_empty() {
                    tracing::debug!("Empty combined vibe, keeping image vibe");
                    image_vibe
                } else {
                    merged
                }
            }
            _ => return Err(Error::Internal("vibe source does not match inputs".to_string())),
        };

        tracing::info!(source = ?source, vibe = %vibe, "Extracted vibe");
        Ok(vibe)
    }

    async fn image_vibe(&self, image: &ProcessedImage) -> Result<String> {
        let request = prompts::image_vibe_request(&self.models, &image.base64);
        self.ask_non_empty("image vibe", request).await
    }

    /// Short creative title; never fails
    pub async fn generate_title(&self, vibe: &str) -> String {
        let request = prompts::title_request(&self.models, vibe);
        match self.provider.complete(&request).await {
            Ok(title) => {
                let title = title.trim_matches('"').trim();
                if title.is_empty() {
                    DEFAULT_PLAYLIST_NAME.to_string()
                } else {
                    title.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Title generation failed, using default name");
                DEFAULT_PLAYLIST_NAME.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_selection() {
        let image = ProcessedImage::from_jpeg_bytes(None, b"x");
        assert_eq!(VibeSource::select(Some("a"), None), Some(VibeSource::Text));
        assert_eq!(VibeSource::select(None, Some(&image)), Some(VibeSource::Image));
        assert_eq!(
            VibeSource::select(Some("a"), Some(&image)),
            Some(VibeSource::Combined)
        );
        assert_eq!(VibeSource::select(None, None), None);
    }

    #[test]
    fn test_extraction_error_mapping() {
        let err = extraction_error(
            "text vibe",
            Error::Upstream {
                status: 500,
                body: "oops".to_string(),
            },
        );
        assert!(matches!(err, Error::ExtractionFailed(_)));

        let err = extraction_error("text vibe", Error::Network("reset".to_string()));
        assert!(matches!(err, Error::ExtractionFailed(_)));

        let err = extraction_error("text vibe", Error::Config("no key".to_string()));
        assert!(matches!(err, Error::Config(_)));
    }
}
