//! Chapter audio: a recorded narration if one turns up within the audio
//! timeout, otherwise a speech-synthesis plan for the client.

use std::time::Duration;

use super::chain::{ContentSource, FallbackChain, GuaranteedChain, Resolved, SourceFuture, TerminalSource};
use super::http::{UpstreamClient, API_KEY_HEADER};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{AudioLookupResponse, ChapterAudio};

pub const RECORDED_AUDIO_SOURCE: &str = "audio-bible";
pub const SPEECH_SYNTHESIS_SOURCE: &str = "speech-synthesis";

#[derive(Debug, Clone)]
pub struct AudioRequest {
    pub translation_id: String,
    pub book: String,
    pub chapter: u32,
    /// Voice preference handed to the speech-synthesis fallback.
    pub voice: Option<String>,
}

pub struct RecordedAudioSource {
    client: UpstreamClient,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RecordedAudioSource {
    async fn lookup(&self, request: &AudioRequest, key: &str) -> Result<ChapterAudio, AppError> {
        let url = format!(
            "{}/{}/chapters/{}.{}/audio",
            self.base_url, request.translation_id, request.book, request.chapter
        );
        let response: AudioLookupResponse =
            self.client.get_json(&url, &[(API_KEY_HEADER, key)]).await?;

        response
            .data
            .audio_files
            .into_iter()
            .map(|file| file.url)
            .find(|url| !url.is_empty())
            .map(|url| ChapterAudio::Recorded { url })
            .ok_or_else(|| AppError::Malformed(format!("No audio files listed at {}", url)))
    }
}

impl ContentSource<AudioRequest, ChapterAudio> for RecordedAudioSource {
    fn id(&self) -> &str {
        RECORDED_AUDIO_SOURCE
    }

    fn fetch<'a>(&'a self, request: &'a AudioRequest) -> SourceFuture<'a, ChapterAudio> {
        Box::pin(async move {
            let key = self
                .api_key
                .as_deref()
                .ok_or_else(|| AppError::Config("TABSPIRE_BIBLE_API_KEY is not set".to_string()))?;

            tokio::time::timeout(self.timeout, self.lookup(request, key))
                .await
                .map_err(|_| {
                    AppError::Timeout(format!(
                        "Audio lookup exceeded {} ms",
                        self.timeout.as_millis()
                    ))
                })?
        })
    }
}

pub struct SpeechSynthesis;

impl TerminalSource<AudioRequest, ChapterAudio> for SpeechSynthesis {
    fn id(&self) -> &str {
        SPEECH_SYNTHESIS_SOURCE
    }

    fn pick(&self, request: &AudioRequest) -> ChapterAudio {
        ChapterAudio::SpeechSynthesis {
            voice: request.voice.clone().filter(|v| !v.is_empty()),
        }
    }
}

pub struct AudioFetcher {
    chain: GuaranteedChain<AudioRequest, ChapterAudio>,
}

impl AudioFetcher {
    pub fn new(client: UpstreamClient, config: &Config) -> Self {
        let recorded = RecordedAudioSource {
            client,
            base_url: config.audio_api_url.trim_end_matches('/').to_string(),
            api_key: config.bible_api_key.clone(),
            timeout: config.audio_timeout,
        };
        Self {
            chain: GuaranteedChain::new(FallbackChain::new("audio").with_source(recorded), SpeechSynthesis),
        }
    }

    pub async fn fetch(&self, request: &AudioRequest) -> Resolved<ChapterAudio> {
        self.chain.resolve(request).await
    }
}
