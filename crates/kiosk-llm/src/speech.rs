//! Speech-to-text over the Web Speech recognize endpoint.
//!
//! The shell hands over a captured WAV file; the raw PCM is extracted here
//! and posted as `audio/l16`. Unrecognized audio and missing samples are
//! outcomes, not errors; only service failures raise.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::TranscribeError;

const ENDPOINT: &str = "http://www.google.com/speech-api/v2/recognize";

/// Bound on one recognize request, mirroring the shell's listen timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one transcription attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Text(String),
    /// Audio was received but nothing could be recognized.
    Unintelligible,
    /// The capture produced no usable samples.
    NoAudio,
}

/// Client for the Web Speech recognize endpoint
pub struct WebSpeechClient {
    client: Client,
    api_key: String,
    language: String,
}

impl WebSpeechClient {
    pub fn new(
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, TranscribeError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| TranscribeError::Network(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            language: language.into(),
        })
    }

    /// Transcribe a PCM-16 WAV recording.
    pub async fn transcribe_wav(&self, wav: &[u8]) -> Result<Transcription, TranscribeError> {
        let pcm = PcmAudio::from_wav(wav)?;
        if pcm.samples.is_empty() {
            return Ok(Transcription::NoAudio);
        }

        let response = self
            .client
            .post(ENDPOINT)
            .query(&[
                ("client", "chromium"),
                ("lang", self.language.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("audio/l16; rate={}", pcm.sample_rate),
            )
            .body(pcm.samples)
            .send()
            .await
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranscribeError::Network(e.to_string()))?;
        parse_recognize_response(&body)
    }
}

/// Raw PCM pulled out of a WAV container
#[derive(Debug)]
struct PcmAudio {
    sample_rate: u32,
    samples: Vec<u8>,
}

impl PcmAudio {
    /// Minimal RIFF reader: the recognize endpoint only needs the PCM-16
    /// bytes and their sample rate.
    fn from_wav(bytes: &[u8]) -> Result<Self, TranscribeError> {
        if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(TranscribeError::UnsupportedAudio(
                "not a RIFF/WAVE file".to_string(),
            ));
        }

        let mut sample_rate = None;
        let mut samples = None;
        let mut offset = 12;

        while offset + 8 <= bytes.len() {
            let id = &bytes[offset..offset + 4];
            let size = u32::from_le_bytes([
                bytes[offset + 4],
                bytes[offset + 5],
                bytes[offset + 6],
                bytes[offset + 7],
            ]) as usize;
            let body_start = offset + 8;
            let body_end = body_start.saturating_add(size).min(bytes.len());
            let body = &bytes[body_start..body_end];

            match id {
                b"fmt " => {
                    if body.len() < 16 {
                        return Err(TranscribeError::UnsupportedAudio(
                            "truncated fmt chunk".to_string(),
                        ));
                    }
                    let format = u16::from_le_bytes([body[0], body[1]]);
                    let bits = u16::from_le_bytes([body[14], body[15]]);
                    if format != 1 || bits != 16 {
                        return Err(TranscribeError::UnsupportedAudio(format!(
                            "expected PCM-16, got format {format} at {bits} bits"
                        )));
                    }
                    sample_rate = Some(u32::from_le_bytes([body[4], body[5], body[6], body[7]]));
                }
                b"data" => {
                    samples = Some(body.to_vec());
                }
                _ => {}
            }

            // Chunks are word-aligned.
            offset = body_start + size + (size & 1);
        }

        match (sample_rate, samples) {
            (Some(sample_rate), Some(samples)) => Ok(Self {
                sample_rate,
                samples,
            }),
            _ => Err(TranscribeError::UnsupportedAudio(
                "missing fmt or data chunk".to_string(),
            )),
        }
    }
}

#[derive(Deserialize)]
struct RecognizeLine {
    #[serde(default)]
    result: Vec<RecognizeResult>,
}

#[derive(Deserialize)]
struct RecognizeResult {
    alternative: Option<Vec<Alternative>>,
}

#[derive(Deserialize)]
struct Alternative {
    transcript: Option<String>,
}

/// The endpoint answers with one JSON object per line; the first line is
/// usually an empty result set.
fn parse_recognize_response(body: &str) -> Result<Transcription, TranscribeError> {
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed: RecognizeLine = serde_json::from_str(line)?;
        for result in parsed.result {
            if let Some(alternatives) = result.alternative {
                if let Some(transcript) = alternatives.into_iter().find_map(|a| a.transcript) {
                    if !transcript.is_empty() {
                        return Ok(Transcription::Text(transcript));
                    }
                }
            }
        }
    }
    Ok(Transcription::Unintelligible)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canonical 44-byte header + `data` payload.
    fn wav_fixture(sample_rate: u32, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
        bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
        bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(data);
        bytes
    }

    #[test]
    fn test_wav_parse_extracts_rate_and_samples() {
        let wav = wav_fixture(16000, &[1, 2, 3, 4]);
        let pcm = PcmAudio::from_wav(&wav).unwrap();
        assert_eq!(pcm.sample_rate, 16000);
        assert_eq!(pcm.samples, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_wav_parse_rejects_non_riff() {
        let err = PcmAudio::from_wav(b"OggS000000000000").unwrap_err();
        assert!(matches!(err, TranscribeError::UnsupportedAudio(_)));
    }

    #[test]
    fn test_wav_parse_rejects_non_pcm() {
        let mut wav = wav_fixture(16000, &[0, 0]);
        wav[20] = 3; // IEEE float format tag
        assert!(PcmAudio::from_wav(&wav).is_err());
    }

    #[test]
    fn test_parse_recognize_picks_first_transcript() {
        let body = concat!(
            "{\"result\":[]}\n",
            "{\"result\":[{\"alternative\":[{\"transcript\":\"is hostel available\",\"confidence\":0.9}],\"final\":true}],\"result_index\":0}\n",
        );
        assert_eq!(
            parse_recognize_response(body).unwrap(),
            Transcription::Text("is hostel available".to_string())
        );
    }

    #[test]
    fn test_parse_recognize_empty_results_are_unintelligible() {
        assert_eq!(
            parse_recognize_response("{\"result\":[]}\n").unwrap(),
            Transcription::Unintelligible
        );
    }

    #[tokio::test]
    async fn test_empty_data_chunk_is_no_audio() {
        let client = WebSpeechClient::new("test-key", "en-US").unwrap();
        let wav = wav_fixture(16000, &[]);
        // No network call happens: the empty capture short-circuits.
        assert_eq!(
            client.transcribe_wav(&wav).await.unwrap(),
            Transcription::NoAudio
        );
    }
}
