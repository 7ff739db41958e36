//! Playable handles for audio returned by the service.
//!
//! A handle owns a temporary file holding the payload. The file lives exactly
//! as long as the handle, so replacing a result slot or ending the session
//! releases the previous audio.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::types::{AudioPayload, Mode};

pub struct AudioHandle {
    file: NamedTempFile,
    mode: Mode,
    len: usize,
    content_type: Option<String>,
}

impl AudioHandle {
    pub fn create(mode: Mode, payload: &AudioPayload) -> Result<Self> {
        Self::create_in(std::env::temp_dir(), mode, payload)
    }

    pub fn create_in(dir: impl AsRef<Path>, mode: Mode, payload: &AudioPayload) -> Result<Self> {
        let extension = extension_for(payload.content_type.as_deref());
        let mut file = tempfile::Builder::new()
            .prefix(&format!("voxclone-{mode}-"))
            .suffix(&format!(".{extension}"))
            .tempfile_in(dir)
            .context("Failed to allocate audio handle")?;

        file.write_all(&payload.bytes)
            .context("Failed to write audio payload")?;
        file.flush().context("Failed to flush audio payload")?;

        debug!(path = ?file.path(), len = payload.bytes.len(), %mode, "audio handle created");

        Ok(Self {
            file,
            mode,
            len: payload.bytes.len(),
            content_type: payload.content_type.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(self.path()).with_context(|| format!("Failed to read {:?}", self.path()))
    }

    /// Default download name, e.g. `synthesized_audio.wav` or `cloned_voice.wav`.
    pub fn suggested_name(&self) -> String {
        let stem = match self.mode {
            Mode::Basic => "synthesized_audio",
            Mode::Clone => "cloned_voice",
        };
        format!("{stem}.{}", extension_for(self.content_type.as_deref()))
    }

    /// Copy the audio out. A directory destination receives the suggested name.
    pub fn save_to(&self, dest: &Path) -> Result<PathBuf> {
        let target = if dest.is_dir() {
            dest.join(self.suggested_name())
        } else {
            dest.to_path_buf()
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }

        fs::copy(self.path(), &target)
            .with_context(|| format!("Failed to save audio to {target:?}"))?;
        Ok(target)
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        debug!(path = ?self.file.path(), mode = %self.mode, "audio handle released");
    }
}

impl fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioHandle")
            .field("path", &self.path())
            .field("mode", &self.mode)
            .field("len", &self.len)
            .field("content_type", &self.content_type)
            .finish()
    }
}

fn extension_for(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match essence.as_str() {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/ogg" | "audio/opus" => "ogg",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/webm" => "webm",
        _ => "wav",
    }
}
