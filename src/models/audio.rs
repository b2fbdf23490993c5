//! Chapter audio models.

use serde::{Deserialize, Serialize};

/// How the client should voice a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChapterAudio {
    /// A recorded narration is available at `url`.
    Recorded { url: String },
    /// No recording could be found in time; synthesize speech locally.
    #[serde(rename_all = "camelCase")]
    SpeechSynthesis { voice: Option<String> },
}

/// Audio endpoint response: `{ data: { audioFiles: [{ url }] } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioLookupResponse {
    pub data: AudioLookupData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioLookupData {
    #[serde(default)]
    pub audio_files: Vec<AudioFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioFile {
    pub url: String,
}
