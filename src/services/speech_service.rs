use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use validator::Validate;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::dto::request::TtsRequest,
};

pub const DEFAULT_VOICE: &str = "en-US-JennyNeural";
pub const DEFAULT_RATE: &str = "0%";
const OUTPUT_FORMAT: &str = "audio-16khz-32kbitrate-mono-mp3";
const USER_AGENT: &str = "research-coach-server";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: String,
    pub rate: String,
}

impl From<TtsRequest> for SpeechRequest {
    fn from(request: TtsRequest) -> Self {
        let pick = |value: Option<String>, default: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        SpeechRequest {
            text: request.text.trim().to_string(),
            voice: pick(request.voice, DEFAULT_VOICE),
            rate: pick(request.rate, DEFAULT_RATE),
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

pub fn build_ssml(request: &SpeechRequest) -> String {
    format!(
        "<speak version=\"1.0\" xml:lang=\"en-US\"><voice name=\"{}\"><prosody rate=\"{}\">{}</prosody></voice></speak>",
        escape_xml(&request.voice),
        escape_xml(&request.rate),
        escape_xml(&request.text)
    )
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns MP3 audio for the request.
    async fn synthesize(&self, request: SpeechRequest) -> AppResult<Vec<u8>>;
}

struct AzureCredentials {
    key: SecretString,
    region: String,
}

/// Azure Cognitive Services text-to-speech over REST.
pub struct AzureSpeechSynthesizer {
    http: reqwest::Client,
    credentials: Option<AzureCredentials>,
    endpoint_override: Option<String>,
}

impl AzureSpeechSynthesizer {
    pub fn new(config: &Config) -> Self {
        let credentials = match (&config.azure_speech_key, &config.azure_speech_region) {
            (Some(key), Some(region)) => Some(AzureCredentials {
                key: key.clone(),
                region: region.clone(),
            }),
            _ => None,
        };

        Self {
            http: reqwest::Client::new(),
            credentials,
            endpoint_override: None,
        }
    }

    /// Sends requests to `endpoint` instead of the regional Azure host.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn endpoint(&self, region: &str) -> String {
        self.endpoint_override.clone().unwrap_or_else(|| {
            format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", region)
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeechSynthesizer {
    async fn synthesize(&self, request: SpeechRequest) -> AppResult<Vec<u8>> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            AppError::ConfigurationError(
                "AZURE_SPEECH_KEY / AZURE_SPEECH_REGION not set".to_string(),
            )
        })?;

        let response = self
            .http
            .post(self.endpoint(&credentials.region))
            .header("Ocp-Apim-Subscription-Key", credentials.key.expose_secret())
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header("User-Agent", USER_AGENT)
            .body(build_ssml(&request))
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to reach Azure TTS: {}", e);
                AppError::ProviderError(format!("Azure TTS request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read response body".to_string());
            log::error!("Azure TTS error: {} {}", status, message);
            return Err(AppError::ProviderError(format!(
                "Azure TTS failed with status {}",
                status
            )));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}

pub struct SpeechService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl SpeechService {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synthesizer }
    }

    pub async fn speak(&self, request: TtsRequest) -> AppResult<Vec<u8>> {
        request.validate()?;

        let speech = SpeechRequest::from(request);
        let audio = self.synthesizer.synthesize(speech).await?;
        log::info!("Synthesized {} bytes of speech", audio.len());
        Ok(audio)
    }
}
