//! # Kiosk LLM
//!
//! Everything between the chat shell and the remote services:
//!
//! - [`ResponsePipeline`]: identity short-circuit, primary/fallback model
//!   selection, bounded retry with jittered exponential backoff
//! - [`RateLimiter`]: minimum spacing between outbound generation calls
//! - [`GeminiBackend`]: REST client for the Gemini generation API
//! - [`Translator`]: best-effort translation that never breaks the flow
//! - [`WebSpeechClient`]: WAV transcription through the Web Speech endpoint

pub mod backend;
pub mod error;
pub mod gemini;
pub mod limiter;
pub mod pipeline;
pub mod speech;
pub mod translate;

// Re-export core types
pub use backend::GenerationBackend;
pub use error::{GenerationError, Result, TranscribeError, TranslateError};
pub use gemini::GeminiBackend;
pub use limiter::RateLimiter;
pub use pipeline::{backoff_delay, identity_reply, ResponsePipeline, IDENTITY_REPLY, MAX_ATTEMPTS};
pub use speech::{Transcription, WebSpeechClient};
pub use translate::{GoogleTranslate, TranslationBackend, Translator};
