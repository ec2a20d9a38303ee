//! Playlist generation pipeline
//!
//! context → vibe → (title, image-only) → synthesis. Stages run strictly in
//! sequence and the first failure ends the run.

use async_trait::async_trait;
use std::sync::Arc;
use vibelist_common::config::CompletionConfig;
use vibelist_common::{ListeningContext, PlaylistRequest, PlaylistResponse, Result};

use crate::completion::{ChatCompletionClient, CompletionProvider, ModelChoice};
use crate::synthesizer::PlaylistSynthesizer;
use crate::vibe::VibeExtractor;

/// Source of the listening context for a run
pub trait ContextSource: Send + Sync {
    fn current(&self) -> ListeningContext;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ContextSource for SystemClock {
    fn current(&self) -> ListeningContext {
        ListeningContext::now()
    }
}

/// Always the same context (tests, replays)
#[derive(Debug, Clone, Copy)]
pub struct FixedContext(pub ListeningContext);

impl ContextSource for FixedContext {
    fn current(&self) -> ListeningContext {
        self.0
    }
}

/// Anything that can turn a request into a playlist
#[async_trait]
pub trait PlaylistGenerator: Send + Sync {
    async fn generate(&self, request: &PlaylistRequest) -> Result<PlaylistResponse>;
}

pub struct PlaylistPipeline {
    extractor: VibeExtractor,
    synthesizer: PlaylistSynthesizer,
    context: Arc<dyn ContextSource>,
}

impl PlaylistPipeline {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: ModelChoice) -> Self {
        Self {
            extractor: VibeExtractor::new(Arc::clone(&provider), models.clone()),
            synthesizer: PlaylistSynthesizer::new(provider, models),
            context: Arc::new(SystemClock),
        }
    }

    /// Pipeline backed by the HTTP completion client
    ///
    /// # Errors
    /// `Error::Config` when no API key can be resolved.
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let client = ChatCompletionClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), ModelChoice::from(config)))
    }

    pub fn with_context_source(mut self, context: Arc<dyn ContextSource>) -> Self {
        self.context = context;
        self
    }
}

#[async_trait]
impl PlaylistGenerator for PlaylistPipeline {
    async fn generate(&self, request: &PlaylistRequest) -> Result<PlaylistResponse> {
        request.validate()?;

        let context = self.context.current().to_string();
        let prompt = request.text();
        let image = request.image.as_ref();
        tracing::debug!(
            context = %context,
            has_prompt = prompt.is_some(),
            has_image = image.is_some(),
            song_count = request.song_count,
            "Starting playlist generation"
        );

        let vibe = self.extractor.extract_vibe(prompt, image, &context).await?;

        let generated_title = match (prompt, image) {
            (None, Some(_)) => Some(self.extractor.generate_title(&vibe).await),
            _ => None,
        };

        let playlist = self
            .synthesizer
            .synthesize(&vibe, &context, request.song_count, &request.constraints())
            .await?;

        Ok(PlaylistResponse {
            playlist,
            generated_title,
        })
    }
}
