//! # vibelist AI
//!
//! Playlist synthesis pipeline:
//! - [`completion`]: chat-completion client and the [`CompletionProvider`] seam
//! - [`vibe`]: vibe extraction from prompt and/or image, title generation
//! - [`synthesizer`]: structured playlist generation
//! - [`postprocess`]: artist-diversity filter and trimming
//! - [`pipeline`]: the end-to-end run
//! - [`coordinator`]: single-flight guard around the pipeline

pub mod completion;
pub mod coordinator;
pub mod pipeline;
pub mod postprocess;
pub mod prompts;
pub mod synthesizer;
pub mod vibe;

pub use completion::{ChatCompletionClient, CompletionProvider, CompletionRequest, ModelChoice};
pub use coordinator::{CoordinatorStatus, Phase, RequestCoordinator};
pub use pipeline::{ContextSource, FixedContext, PlaylistGenerator, PlaylistPipeline, SystemClock};
pub use synthesizer::PlaylistSynthesizer;
pub use vibe::VibeExtractor;
