//! End-to-end pipeline behavior against scripted backends.
//!
//! The tokio clock is paused, so every timing assertion is exact and the
//! suite runs instantly.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use kiosk_llm::{
    GenerationBackend, GenerationError, RateLimiter, ResponsePipeline, TranslateError,
    TranslationBackend, Translator, IDENTITY_REPLY,
};

/// One scripted backend outcome.
#[derive(Clone)]
enum Step {
    Ok(&'static str),
    Quota,
    Permission,
    ServerError,
}

impl Step {
    fn into_result(self) -> Result<String, GenerationError> {
        match self {
            Step::Ok(text) => Ok(text.to_string()),
            Step::Quota => Err(GenerationError::QuotaExceeded("out of quota".to_string())),
            Step::Permission => Err(GenerationError::PermissionDenied(
                "key not authorized".to_string(),
            )),
            Step::ServerError => Err(GenerationError::Api {
                status: 500,
                message: "internal".to_string(),
            }),
        }
    }
}

/// Scripted generation backend; the last step repeats once the script runs
/// out.
struct FakeBackend {
    model: &'static str,
    calls: AtomicUsize,
    script: Mutex<VecDeque<Step>>,
}

impl FakeBackend {
    fn new(model: &'static str, steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            model,
            calls: AtomicUsize::new(0),
            script: Mutex::new(steps.into()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> Step {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().expect("script must not be empty")
        }
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    fn model_id(&self) -> &str {
        self.model
    }

    async fn generate(&self, _input: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.next_step().into_result()
    }
}

#[tokio::test]
async fn identity_question_skips_the_models() {
    let primary = FakeBackend::new("pro", vec![Step::Ok("unused")]);
    let fallback = FakeBackend::new("flash", vec![Step::Ok("unused")]);
    let pipeline = ResponsePipeline::new(primary.clone(), fallback.clone());

    let reply = pipeline.get_response("  Who Are You?  ").await.unwrap();

    assert_eq!(reply, IDENTITY_REPLY);
    assert_eq!(primary.calls(), 0);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn fallback_serves_when_primary_is_over_quota() {
    let primary = FakeBackend::new("pro", vec![Step::Quota]);
    let fallback = FakeBackend::new("flash", vec![Step::Ok("from the flash model")]);
    let pipeline = ResponsePipeline::new(primary.clone(), fallback.clone());

    let start = Instant::now();
    let reply = pipeline.get_response("admission dates?").await.unwrap();

    assert_eq!(reply, "from the flash model");
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
    // Fallback success inserts no sleep at all.
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn both_models_over_quota_exhausts_three_attempts() {
    let primary = FakeBackend::new("pro", vec![Step::Quota]);
    let fallback = FakeBackend::new("flash", vec![Step::Quota]);
    let pipeline = ResponsePipeline::new(primary.clone(), fallback.clone());

    let start = Instant::now();
    let err = pipeline.get_response("admission dates?").await.unwrap_err();

    assert!(err.is_quota());
    assert_eq!(primary.calls(), 3);
    assert_eq!(fallback.calls(), 3);

    // Two backoff sleeps happened: (2^0 + j0) + (2^1 + j1) with both
    // jitters in [0, 1). No sleep follows the final attempt.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn permission_denied_from_primary_aborts_immediately() {
    let primary = FakeBackend::new("pro", vec![Step::Permission]);
    let fallback = FakeBackend::new("flash", vec![Step::Ok("never served")]);
    let pipeline = ResponsePipeline::new(primary.clone(), fallback.clone());

    let start = Instant::now();
    let err = pipeline.get_response("admission dates?").await.unwrap_err();

    assert!(err.is_permission());
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 0);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn permission_denied_from_fallback_aborts_immediately() {
    let primary = FakeBackend::new("pro", vec![Step::Quota]);
    let fallback = FakeBackend::new("flash", vec![Step::Permission]);
    let pipeline = ResponsePipeline::new(primary.clone(), fallback.clone());

    let err = pipeline.get_response("admission dates?").await.unwrap_err();

    assert!(err.is_permission());
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn transient_failure_retries_after_a_fixed_delay() {
    let primary = FakeBackend::new("pro", vec![Step::ServerError, Step::Ok("recovered")]);
    let fallback = FakeBackend::new("flash", vec![Step::Ok("unused")]);
    let pipeline = ResponsePipeline::new(primary.clone(), fallback.clone());

    let start = Instant::now();
    let reply = pipeline.get_response("admission dates?").await.unwrap();

    assert_eq!(reply, "recovered");
    assert_eq!(primary.calls(), 2);
    assert_eq!(fallback.calls(), 0);
    assert_eq!(start.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn transient_failures_surface_the_last_error_when_spent() {
    let primary = FakeBackend::new("pro", vec![Step::ServerError]);
    let fallback = FakeBackend::new("flash", vec![Step::Ok("unused")]);
    let pipeline = ResponsePipeline::new(primary.clone(), fallback.clone());

    let start = Instant::now();
    let err = pipeline.get_response("admission dates?").await.unwrap_err();

    assert!(matches!(err, GenerationError::Api { status: 500, .. }));
    assert_eq!(primary.calls(), 3);
    // Two fixed 1 s delays, none after the last attempt.
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn throttle_blocks_until_the_minimum_spacing() {
    let mut limiter = RateLimiter::new(Duration::from_secs(2));
    limiter.record();

    let start = Instant::now();
    limiter.throttle().await;
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    // Immediately after, a second throttle with a fresh record waits again.
    limiter.record();
    let start = Instant::now();
    limiter.throttle().await;
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

struct BrokenTranslation;

#[async_trait]
impl TranslationBackend for BrokenTranslation {
    async fn translate(&self, _text: &str, _target: &str) -> Result<String, TranslateError> {
        Err(TranslateError::Network("connection reset".to_string()))
    }
}

#[tokio::test]
async fn failed_translation_returns_the_original_text() {
    let translator = Translator::new(Arc::new(BrokenTranslation));
    let text = "Admissions open in June.";
    assert_eq!(translator.translate_or_original(text, "ta").await, text);
}
