use tracing::debug;

use crate::error::ValidationError;
use crate::handle::AudioHandle;
use crate::types::{AudioFile, CloneRequest, Language, Mode, SynthesisRequest};

pub const BASIC_FAILURE_MESSAGE: &str =
    "Speech synthesis failed. Check that the synthesis service is running.";
pub const CLONE_FAILURE_MESSAGE: &str =
    "Voice cloning failed. Check the voice sample and text, and that the synthesis service is running.";

pub fn failure_message(mode: Mode) -> &'static str {
    match mode {
        Mode::Basic => BASIC_FAILURE_MESSAGE,
        Mode::Clone => CLONE_FAILURE_MESSAGE,
    }
}

/// Per-mode request status and result.
#[derive(Debug, Default)]
pub struct ModeSlot {
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<AudioHandle>,
}

/// Every way the form can change.
#[derive(Debug)]
pub enum FormAction {
    EditText(String),
    SwitchMode(Mode),
    SelectLanguage(Language),
    SelectVoiceSample(AudioFile),
    ClearVoiceSample,
    SubmitStarted(Mode),
    SubmitSucceeded { mode: Mode, handle: AudioHandle },
    SubmitFailed { mode: Mode, message: String },
}

/// A validated request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Synthesize(SynthesisRequest),
    Clone(CloneRequest),
}

impl Submission {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Synthesize(_) => Mode::Basic,
            Self::Clone(_) => Mode::Clone,
        }
    }
}

#[derive(Debug, Default)]
pub struct FormState {
    text: String,
    mode: Mode,
    language: Language,
    voice_sample: Option<AudioFile>,
    basic: ModeSlot,
    clone: ModeSlot,
}

impl FormState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Consume the current record and produce the next one. Any result handle
    /// displaced by the transition is dropped, and so released, here.
    pub fn apply(mut self, action: FormAction) -> Self {
        match action {
            FormAction::EditText(text) => self.text = text,
            FormAction::SwitchMode(mode) => self.mode = mode,
            FormAction::SelectLanguage(language) => self.language = language,
            FormAction::SelectVoiceSample(file) => {
                debug!(file = file.file_name(), media_type = file.media_type(), "voice sample selected");
                self.voice_sample = Some(file);
            }
            FormAction::ClearVoiceSample => self.voice_sample = None,
            FormAction::SubmitStarted(mode) => {
                let slot = self.slot_mut(mode);
                slot.loading = true;
                slot.error = None;
                slot.result = None;
            }
            FormAction::SubmitSucceeded { mode, handle } => {
                let slot = self.slot_mut(mode);
                slot.loading = false;
                slot.error = None;
                slot.result = Some(handle);
            }
            FormAction::SubmitFailed { mode, message } => {
                let slot = self.slot_mut(mode);
                slot.loading = false;
                slot.error = Some(message);
            }
        }
        self
    }

    /// In-place variant of [`FormState::apply`] for owners holding `&mut`.
    pub fn dispatch(&mut self, action: FormAction) {
        let current = std::mem::take(self);
        *self = current.apply(action);
    }

    /// Validate the active mode and build its request.
    pub fn prepare(&self) -> Result<Submission, ValidationError> {
        if self.slot(self.mode).loading {
            return Err(ValidationError::Busy(self.mode));
        }
        if self.text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        match self.mode {
            Mode::Basic => Ok(Submission::Synthesize(SynthesisRequest {
                text: self.text.clone(),
            })),
            Mode::Clone => {
                let voice_sample = self
                    .voice_sample
                    .clone()
                    .ok_or(ValidationError::MissingVoiceSample)?;
                Ok(Submission::Clone(CloneRequest {
                    text: self.text.clone(),
                    language: self.language,
                    voice_sample,
                }))
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn voice_sample(&self) -> Option<&AudioFile> {
        self.voice_sample.as_ref()
    }

    pub fn slot(&self, mode: Mode) -> &ModeSlot {
        match mode {
            Mode::Basic => &self.basic,
            Mode::Clone => &self.clone,
        }
    }

    fn slot_mut(&mut self, mode: Mode) -> &mut ModeSlot {
        match mode {
            Mode::Basic => &mut self.basic,
            Mode::Clone => &mut self.clone,
        }
    }

    pub fn active_slot(&self) -> &ModeSlot {
        self.slot(self.mode)
    }

    /// Whether the active mode has a request outstanding.
    pub fn is_loading(&self) -> bool {
        self.active_slot().loading
    }

    pub fn any_loading(&self) -> bool {
        self.basic.loading || self.clone.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.active_slot().error.as_deref()
    }

    pub fn result(&self, mode: Mode) -> Option<&AudioHandle> {
        self.slot(mode).result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioPayload;
    use tempfile::TempDir;

    fn sample() -> AudioFile {
        AudioFile::new("sample.mp3", "audio/mpeg", vec![0xFF, 0xFB]).unwrap()
    }

    fn handle(dir: &TempDir, mode: Mode) -> AudioHandle {
        AudioHandle::create_in(
            dir.path(),
            mode,
            &AudioPayload::new(vec![0x52, 0x49, 0x46, 0x46], Some("audio/wav".to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_text_rejected_in_both_modes() {
        let state = FormState::default();
        assert_eq!(state.prepare(), Err(ValidationError::EmptyText));

        let state = state
            .apply(FormAction::SwitchMode(Mode::Clone))
            .apply(FormAction::SelectVoiceSample(sample()));
        assert_eq!(state.prepare(), Err(ValidationError::EmptyText));
    }

    #[test]
    fn test_clone_requires_voice_sample() {
        let state = FormState::default()
            .apply(FormAction::EditText("Bonjour".to_string()))
            .apply(FormAction::SwitchMode(Mode::Clone));
        assert_eq!(state.prepare(), Err(ValidationError::MissingVoiceSample));
    }

    #[test]
    fn test_prepare_builds_clone_request() {
        let state = FormState::default()
            .apply(FormAction::EditText("Bonjour".to_string()))
            .apply(FormAction::SwitchMode(Mode::Clone))
            .apply(FormAction::SelectLanguage(Language::Fr))
            .apply(FormAction::SelectVoiceSample(sample()));

        let Submission::Clone(request) = state.prepare().unwrap() else {
            panic!("expected a clone submission");
        };
        assert_eq!(request.text, "Bonjour");
        assert_eq!(request.language, Language::Fr);
        assert_eq!(request.voice_sample, sample());
    }

    #[test]
    fn test_whitespace_text_is_submitted() {
        let state = FormState::default().apply(FormAction::EditText(" ".to_string()));
        assert_eq!(
            state.prepare(),
            Ok(Submission::Synthesize(SynthesisRequest {
                text: " ".to_string()
            }))
        );
    }

    #[test]
    fn test_busy_while_loading() {
        let state = FormState::default()
            .apply(FormAction::EditText("Hello".to_string()))
            .apply(FormAction::SubmitStarted(Mode::Basic));
        assert!(state.is_loading());
        assert_eq!(state.prepare(), Err(ValidationError::Busy(Mode::Basic)));

        // The other mode is not blocked by the basic request.
        let state = state
            .apply(FormAction::SwitchMode(Mode::Clone))
            .apply(FormAction::SelectVoiceSample(sample()));
        assert!(!state.is_loading());
        assert!(state.any_loading());
        assert!(state.prepare().is_ok());
    }

    #[test]
    fn test_started_clears_previous_result_and_error() {
        let dir = TempDir::new().unwrap();
        let first = handle(&dir, Mode::Basic);
        let first_path = first.path().to_path_buf();

        let state = FormState::default()
            .apply(FormAction::SubmitFailed {
                mode: Mode::Basic,
                message: "old".to_string(),
            })
            .apply(FormAction::SubmitSucceeded {
                mode: Mode::Basic,
                handle: first,
            })
            .apply(FormAction::SubmitStarted(Mode::Basic));

        assert!(state.result(Mode::Basic).is_none());
        assert!(state.error().is_none());
        assert!(!first_path.exists());
    }

    #[test]
    fn test_failure_keeps_other_mode() {
        let dir = TempDir::new().unwrap();
        let state = FormState::default()
            .apply(FormAction::SubmitSucceeded {
                mode: Mode::Basic,
                handle: handle(&dir, Mode::Basic),
            })
            .apply(FormAction::SubmitStarted(Mode::Clone))
            .apply(FormAction::SubmitFailed {
                mode: Mode::Clone,
                message: failure_message(Mode::Clone).to_string(),
            });

        assert!(state.result(Mode::Basic).is_some());
        assert!(state.slot(Mode::Basic).error.is_none());
        assert_eq!(
            state.slot(Mode::Clone).error.as_deref(),
            Some(CLONE_FAILURE_MESSAGE)
        );
        assert!(state.result(Mode::Clone).is_none());
        assert!(!state.any_loading());
    }

    #[test]
    fn test_dispatch_in_place() {
        let mut state = FormState::new(Language::Ko);
        state.dispatch(FormAction::EditText("안녕하세요".to_string()));
        state.dispatch(FormAction::SwitchMode(Mode::Clone));
        assert_eq!(state.text(), "안녕하세요");
        assert_eq!(state.mode(), Mode::Clone);
        assert_eq!(state.language(), Language::Ko);
    }

    #[test]
    fn test_clear_voice_sample() {
        let state = FormState::default()
            .apply(FormAction::SelectVoiceSample(sample()))
            .apply(FormAction::ClearVoiceSample);
        assert!(state.voice_sample().is_none());
    }
}
