use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::service::http::DEFAULT_BASE_URL;
use crate::types::Language;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Address of the synthesis service, without a trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language preselected for voice cloning
    #[serde(default)]
    pub default_language: Language,

    /// Where saved results go. Defaults to the working directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// Program and leading arguments used to play a result; the audio path is
    /// appended as the final argument.
    #[serde(default)]
    pub player_command: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_language: Language::default(),
            download_dir: None,
            player_command: None,
        }
    }
}

impl Settings {
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn player_command(&self) -> Vec<String> {
        match &self.player_command {
            Some(command) if !command.is_empty() => command.clone(),
            _ => default_player_command(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_player_command() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["afplay".to_string()]
    } else {
        vec!["aplay".to_string(), "-q".to_string()]
    }
}
