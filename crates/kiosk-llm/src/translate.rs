//! Best-effort translation of assistant replies.
//!
//! Translation must never break the conversational flow: any failure of
//! the underlying service yields the original text unchanged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::error::TranslateError;

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A translation service handle
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` into the `target` language code (e.g. `ta`).
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

/// Client for the public Google translate endpoint
pub struct GoogleTranslate {
    client: Client,
}

impl GoogleTranslate {
    pub fn new() -> Result<Self, TranslateError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslate {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslateError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Network(e.to_string()))?;
        extract_translation(&body)
    }
}

/// The endpoint answers with nested arrays; the translated sentence is
/// split over `body[0][n][0]` segments.
fn extract_translation(body: &serde_json::Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::Parse("missing segment list".to_string()))?;

    let mut out = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(|v| v.as_str()) {
            out.push_str(text);
        }
    }

    if out.is_empty() {
        return Err(TranslateError::Parse(
            "no translated text in response".to_string(),
        ));
    }
    Ok(out)
}

/// Best-effort wrapper around a [`TranslationBackend`]
pub struct Translator {
    backend: Arc<dyn TranslationBackend>,
}

impl Translator {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self { backend }
    }

    /// Translate `text`, falling back to the original on any failure.
    pub async fn translate_or_original(&self, text: &str, target: &str) -> String {
        match self.backend.translate(text, target).await {
            Ok(translated) => translated,
            Err(err) => {
                warn!(target, error = %err, "translation failed, returning original text");
                text.to_string()
            }
        }
    }
}
