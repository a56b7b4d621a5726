//! Response acquisition pipeline.
//!
//! Order of business for one user input: identity short-circuit, primary
//! model, fallback model on quota failures, jittered exponential backoff
//! between full primary→fallback rounds, fixed delay for other transient
//! failures. Authorization failures abort immediately.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::backend::GenerationBackend;
use crate::error::{GenerationError, Result};

/// Attempts of the full primary→fallback sequence before giving up.
pub const MAX_ATTEMPTS: usize = 3;

/// Delay after a transient (non-quota) failure.
const TRANSIENT_DELAY: Duration = Duration::from_secs(1);

/// Canned reply for identity questions.
pub const IDENTITY_REPLY: &str =
    "I am an AI assistant to handle admission queries about Kongu Engineering College.";

const IDENTITY_PROMPTS: [&str; 4] = ["who are you", "who are you?", "who r u", "who r u?"];

/// Matches identity questions on the trimmed, case-folded input. A match
/// is answered without any model call.
pub fn identity_reply(input: &str) -> Option<&'static str> {
    let normalized = input.trim().to_lowercase();
    IDENTITY_PROMPTS
        .contains(&normalized.as_str())
        .then_some(IDENTITY_REPLY)
}

/// Backoff before re-running the primary→fallback sequence, as a pure
/// function of the attempt index. `jitter` is expected in `[0, 1)`, so the
/// delay grows strictly across attempts regardless of the samples drawn.
pub fn backoff_delay(attempt: usize, jitter: f64) -> Duration {
    Duration::from_secs_f64((1u64 << attempt) as f64 + jitter)
}

/// Orders retry, fallback and backoff around two generation backends.
///
/// Holds no mutable state: the pipeline only talks to the network through
/// its backends.
pub struct ResponsePipeline {
    primary: Arc<dyn GenerationBackend>,
    fallback: Arc<dyn GenerationBackend>,
    max_attempts: usize,
}

impl ResponsePipeline {
    pub fn new(primary: Arc<dyn GenerationBackend>, fallback: Arc<dyn GenerationBackend>) -> Self {
        Self {
            primary,
            fallback,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Produce assistant text for `input`, or the last error observed once
    /// all attempts are spent.
    pub async fn get_response(&self, input: &str) -> Result<String> {
        if let Some(reply) = identity_reply(input) {
            debug!("identity question answered without a model call");
            return Ok(reply.to_string());
        }

        let mut last_error: Option<GenerationError> = None;

        for attempt in 0..self.max_attempts {
            match self.primary.generate(input).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_permission() => return Err(err),
                Err(err) if err.is_quota() => {
                    debug!(
                        model = self.primary.model_id(),
                        attempt, "primary over quota, trying fallback"
                    );
                    match self.fallback.generate(input).await {
                        Ok(text) => return Ok(text),
                        Err(err) if err.is_permission() => return Err(err),
                        Err(err) if err.is_quota() => {
                            last_error = Some(err);
                            if attempt + 1 < self.max_attempts {
                                let delay = backoff_delay(attempt, rand::thread_rng().gen());
                                warn!(
                                    attempt,
                                    delay_secs = delay.as_secs_f64(),
                                    "both models over quota, backing off"
                                );
                                sleep(delay).await;
                            }
                        }
                        Err(err) => {
                            warn!(
                                model = self.fallback.model_id(),
                                attempt, error = %err, "transient fallback failure"
                            );
                            last_error = Some(err);
                            if attempt + 1 < self.max_attempts {
                                sleep(TRANSIENT_DELAY).await;
                            }
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        model = self.primary.model_id(),
                        attempt, error = %err, "transient generation failure"
                    );
                    last_error = Some(err);
                    if attempt + 1 < self.max_attempts {
                        sleep(TRANSIENT_DELAY).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or(GenerationError::Exhausted {
            attempts: self.max_attempts,
        }))
    }
}
