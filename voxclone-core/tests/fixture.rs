use std::sync::Arc;
use tempfile::TempDir;
use voxclone_core::{
    form::{FormAction, FormSession, FormState},
    service::mock::{MockBehavior, MockService},
    types::{AudioFile, Language, Mode},
};

pub struct Fixture {
    pub session: FormSession,
    pub handle_dir: TempDir,
    mock_service: MockService,
}

impl Fixture {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::with_mock_behavior(MockBehavior::default())
    }

    #[allow(dead_code)]
    pub fn with_mock_behavior(behavior: MockBehavior) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let handle_dir = TempDir::new().unwrap();
        let mock_service = MockService::new(behavior);
        let session = FormSession::new(FormState::new(Language::En), Arc::new(mock_service.clone()))
            .with_handle_dir(handle_dir.path());

        Fixture {
            session,
            handle_dir,
            mock_service,
        }
    }

    #[allow(dead_code)]
    pub fn mock(&self) -> &MockService {
        &self.mock_service
    }

    #[allow(dead_code)]
    pub fn type_text(&mut self, text: &str) {
        self.session.dispatch(FormAction::EditText(text.to_string()));
    }

    #[allow(dead_code)]
    pub fn switch_mode(&mut self, mode: Mode) {
        self.session.dispatch(FormAction::SwitchMode(mode));
    }

    #[allow(dead_code)]
    pub fn select_sample(&mut self, name: &str, media_type: &str) {
        let file = AudioFile::new(name, media_type, vec![0xFF, 0xFB, 0x90, 0x00]).unwrap();
        self.session.dispatch(FormAction::SelectVoiceSample(file));
    }

    /// Number of result files currently alive in the handle directory.
    #[allow(dead_code)]
    pub fn live_handles(&self) -> usize {
        std::fs::read_dir(self.handle_dir.path()).unwrap().count()
    }
}
