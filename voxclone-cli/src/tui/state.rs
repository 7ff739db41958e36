use std::path::{Path, PathBuf};

use voxclone_core::error::ValidationError;
use voxclone_core::form::{FormAction, FormSession, FormState};
use voxclone_core::types::Mode;

/// Oldest activity entries are dropped past this many.
pub const MAX_ACTIVITY_ENTRIES: usize = 200;

/// A single line in the activity panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivityEntry {
    Info { content: String },
    Success { content: String },
    Error { content: String },
}

/// Which input currently receives keystrokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Text,
    VoiceFilePath,
}

pub struct TuiState {
    /// The form and the service it submits to.
    pub session: FormSession,

    /// Ordered activity log, newest last.
    pub activity: Vec<ActivityEntry>,

    /// Blocking prompt; any key dismisses it.
    pub notice: Option<String>,

    pub focus: Focus,

    /// Spinner animation frame counter.
    pub spinner_frame: usize,

    /// Service address for the status bar.
    pub service_name: String,

    /// Model summary from the service, once fetched.
    pub model_summary: Option<String>,

    pub download_dir: PathBuf,
    pub player_command: Vec<String>,

    /// Whether the app should exit.
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(session: FormSession, download_dir: PathBuf, player_command: Vec<String>) -> Self {
        let service_name = session.service().name();
        Self {
            session,
            activity: Vec::new(),
            notice: None,
            focus: Focus::Text,
            spinner_frame: 0,
            service_name,
            model_summary: None,
            download_dir,
            player_command,
            should_quit: false,
        }
    }

    pub fn form(&self) -> &FormState {
        self.session.state()
    }

    pub fn dispatch(&mut self, action: FormAction) {
        self.session.dispatch(action);
    }

    pub fn mode(&self) -> Mode {
        self.form().mode()
    }

    pub fn push_activity(&mut self, entry: ActivityEntry) {
        self.activity.push(entry);
        if self.activity.len() > MAX_ACTIVITY_ENTRIES {
            let excess = self.activity.len() - MAX_ACTIVITY_ENTRIES;
            self.activity.drain(..excess);
        }
    }

    pub fn info(&mut self, content: impl Into<String>) {
        self.push_activity(ActivityEntry::Info {
            content: content.into(),
        });
    }

    pub fn success(&mut self, content: impl Into<String>) {
        self.push_activity(ActivityEntry::Success {
            content: content.into(),
        });
    }

    pub fn error(&mut self, content: impl Into<String>) {
        self.push_activity(ActivityEntry::Error {
            content: content.into(),
        });
    }

    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Select the voice sample at `path`, or raise a notice and keep the
    /// current one.
    pub fn pick_voice_file(&mut self, path: &str) {
        match self.session.select_voice_sample_from(Path::new(path), None) {
            Ok(()) => {
                let message = self.form().voice_sample().map(|file| {
                    format!(
                        "Voice sample {} selected ({}).",
                        file.file_name(),
                        file.media_type()
                    )
                });
                if let Some(message) = message {
                    self.info(message);
                }
            }
            Err(e) => match e.downcast_ref::<ValidationError>() {
                Some(validation) => self.show_notice(validation.to_string()),
                None => self.show_notice(format!("{e:#}")),
            },
        }
    }
}
