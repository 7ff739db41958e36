use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::error::ValidationError;

/// Which of the two synthesis actions the form is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Basic,
    Clone,
}

impl Mode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Basic => Self::Clone,
            Self::Clone => Self::Basic,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Basic => "Basic TTS",
            Self::Clone => "Voice Clone",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Clone => write!(f, "clone"),
        }
    }
}

/// Languages accepted by the clone endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Pl,
    Tr,
    Ru,
    Nl,
    Cs,
    Ar,
    #[serde(rename = "zh-cn", alias = "zh")]
    ZhCn,
    Hu,
    #[serde(alias = "kr")]
    Ko,
    Ja,
    Hi,
}

impl Language {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Pl => "pl",
            Self::Tr => "tr",
            Self::Ru => "ru",
            Self::Nl => "nl",
            Self::Cs => "cs",
            Self::Ar => "ar",
            Self::ZhCn => "zh-cn",
            Self::Hu => "hu",
            Self::Ko => "ko",
            Self::Ja => "ja",
            Self::Hi => "hi",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
            Self::It => "Italian",
            Self::Pt => "Portuguese",
            Self::Pl => "Polish",
            Self::Tr => "Turkish",
            Self::Ru => "Russian",
            Self::Nl => "Dutch",
            Self::Cs => "Czech",
            Self::Ar => "Arabic",
            Self::ZhCn => "Chinese",
            Self::Hu => "Hungarian",
            Self::Ko => "Korean",
            Self::Ja => "Japanese",
            Self::Hi => "Hindi",
        }
    }

    pub fn all() -> Vec<Language> {
        Self::iter().collect()
    }

    /// Next language in canonical order, wrapping around.
    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|l| *l == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|l| *l == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = Language::iter().map(Language::as_code).collect();
        write!(
            f,
            "unknown language {:?} (expected one of: {})",
            self.0,
            codes.join(", ")
        )
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = match normalized.as_str() {
            "kr" => "ko",
            "zh" => "zh-cn",
            other => other,
        };
        Language::iter()
            .find(|l| l.as_code() == normalized)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// A user-supplied voice sample. Only audio media types can be constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioFile {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl AudioFile {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let media_type = media_type.into();
        if !is_audio_media_type(&media_type) {
            return Err(ValidationError::NotAudio { media_type });
        }
        Ok(Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        })
    }

    /// Read a sample from disk. Without an override the media type is inferred
    /// from the extension, and anything unrecognised is rejected as non-audio.
    pub fn from_path(path: &Path, media_type_override: Option<&str>) -> Result<Self> {
        let media_type = media_type_override
            .map(str::to_string)
            .unwrap_or_else(|| media_type_for_path(path).to_string());

        if !is_audio_media_type(&media_type) {
            return Err(ValidationError::NotAudio { media_type }.into());
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read voice sample {path:?}"))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "voice_sample".to_string());

        Ok(Self::new(file_name, media_type, bytes)?)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Samples can be megabytes; keep Debug output to the metadata.
impl fmt::Debug for AudioFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

pub fn is_audio_media_type(media_type: &str) -> bool {
    media_type.starts_with("audio/")
}

pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "webm" | "weba" => "audio/webm",
        "mid" | "midi" => "audio/midi",
        "aif" | "aiff" => "audio/aiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Body of `POST /synthesize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
}

/// Fields of the multipart `POST /clone-voice` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub text: String,
    pub language: Language,
    pub voice_sample: AudioFile,
}

/// Raw audio returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableFeatures {
    #[serde(default)]
    pub basic_tts: bool,
    #[serde(default)]
    pub voice_cloning: bool,
    #[serde(default)]
    pub multi_language: bool,
}

/// Response of `GET /model-info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub supports_voice_cloning: bool,
    #[serde(default)]
    pub compatibility_patches: bool,
    #[serde(default)]
    pub available_features: AvailableFeatures,
    #[serde(default)]
    pub supported_languages: Vec<String>,
}

impl ModelInfo {
    pub fn is_loaded(&self) -> bool {
        self.status == "loaded"
    }

    pub fn summary(&self) -> String {
        if !self.is_loaded() {
            return "model not loaded".to_string();
        }
        let name = self.model_name.as_deref().unwrap_or("unknown model");
        if self.supports_voice_cloning {
            format!("{name} (cloning)")
        } else {
            name.to_string()
        }
    }
}

/// Response of `GET /`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBanner {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
}
