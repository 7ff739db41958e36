mod fixture;

use fixture::Fixture;
use tempfile::TempDir;
use voxclone_core::{
    error::ValidationError,
    form::{failure_message, FormAction},
    service::mock::{CapturedRequest, MockBehavior, WAV_HEADER},
    types::{Language, Mode},
};

#[tokio::test]
async fn test_empty_text_makes_no_request() {
    let mut fixture = Fixture::new();

    assert_eq!(
        fixture.session.submit().await,
        Err(ValidationError::EmptyText)
    );

    fixture.switch_mode(Mode::Clone);
    fixture.select_sample("sample.wav", "audio/wav");
    assert_eq!(
        fixture.session.submit().await,
        Err(ValidationError::EmptyText)
    );

    assert_eq!(fixture.mock().get_call_count(), 0);
    assert!(!fixture.session.state().any_loading());
}

#[tokio::test]
async fn test_clone_without_sample_makes_no_request() {
    let mut fixture = Fixture::new();
    fixture.type_text("Bonjour");
    fixture.switch_mode(Mode::Clone);

    assert_eq!(
        fixture.session.submit().await,
        Err(ValidationError::MissingVoiceSample)
    );
    assert_eq!(fixture.mock().get_call_count(), 0);
}

#[tokio::test]
async fn test_non_audio_selection_keeps_previous_sample() {
    let mut fixture = Fixture::new();
    fixture.switch_mode(Mode::Clone);
    let files = TempDir::new().unwrap();
    let pdf = files.path().join("document.pdf");
    std::fs::write(&pdf, b"%PDF-1.7").unwrap();
    let mp3 = files.path().join("sample.mp3");
    std::fs::write(&mp3, [0xFF, 0xFB, 0x90, 0x44]).unwrap();

    let err = fixture
        .session
        .select_voice_sample_from(&pdf, None)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::NotAudio { media_type }) if media_type == "application/pdf"
    ));
    assert!(fixture.session.state().voice_sample().is_none());

    fixture.session.select_voice_sample_from(&mp3, None).unwrap();
    let err = fixture
        .session
        .select_voice_sample_from(&pdf, None)
        .unwrap_err();
    assert_eq!(err.to_string(), "Only audio files can be uploaded.");

    let sample = fixture.session.state().voice_sample().unwrap();
    assert_eq!(sample.file_name(), "sample.mp3");
    assert_eq!(sample.media_type(), "audio/mpeg");
    assert_eq!(fixture.mock().get_call_count(), 0);
}

#[tokio::test]
async fn test_basic_success_fills_only_basic_slot() {
    let mut fixture = Fixture::new();
    fixture.type_text("Hello world");

    fixture.session.submit().await.unwrap();

    assert_eq!(
        fixture.mock().get_captured_requests(),
        vec![CapturedRequest::Synthesize(
            voxclone_core::types::SynthesisRequest {
                text: "Hello world".to_string()
            }
        )]
    );

    let state = fixture.session.state();
    let handle = state.result(Mode::Basic).expect("basic result");
    assert_eq!(handle.read_bytes().unwrap(), WAV_HEADER.to_vec());
    assert!(state.error().is_none());
    assert!(!state.is_loading());
    assert!(state.result(Mode::Clone).is_none());
}

#[tokio::test]
async fn test_clone_success_fills_only_clone_slot() {
    let mut fixture = Fixture::new();
    fixture.type_text("Hello world");
    fixture.session.submit().await.unwrap();
    let basic_path = fixture
        .session
        .state()
        .result(Mode::Basic)
        .unwrap()
        .path()
        .to_path_buf();

    fixture.switch_mode(Mode::Clone);
    fixture.select_sample("sample.wav", "audio/wav");
    fixture.session.submit().await.unwrap();

    let state = fixture.session.state();
    assert!(state.result(Mode::Clone).is_some());
    assert_eq!(state.result(Mode::Basic).unwrap().path(), basic_path);
    assert!(basic_path.exists());
    assert_eq!(fixture.live_handles(), 2);
}

#[tokio::test]
async fn test_clone_failure_scenario() {
    let mut fixture = Fixture::with_mock_behavior(MockBehavior::Status(500));
    fixture.type_text("Bonjour");
    fixture.switch_mode(Mode::Clone);
    fixture
        .session
        .dispatch(FormAction::SelectLanguage("fr".parse::<Language>().unwrap()));
    fixture.select_sample("sample.mp3", "audio/mpeg");

    fixture.session.submit().await.unwrap();

    let Some(CapturedRequest::Clone(request)) = fixture.mock().get_last_captured_request() else {
        panic!("expected a clone request");
    };
    assert_eq!(request.text, "Bonjour");
    assert_eq!(request.language.as_code(), "fr");
    assert_eq!(request.voice_sample.file_name(), "sample.mp3");
    assert_eq!(request.voice_sample.media_type(), "audio/mpeg");

    let state = fixture.session.state();
    assert!(!state.is_loading());
    assert_eq!(state.error(), Some(failure_message(Mode::Clone)));
    assert!(state.result(Mode::Clone).is_none());
    assert_eq!(fixture.live_handles(), 0);
}

#[tokio::test]
async fn test_failure_does_not_touch_existing_result_of_other_mode() {
    let mut fixture = Fixture::new();
    fixture.type_text("Hello");
    fixture.session.submit().await.unwrap();

    fixture.mock().set_behavior(MockBehavior::Transport);
    fixture.switch_mode(Mode::Clone);
    fixture.select_sample("sample.wav", "audio/wav");
    fixture.session.submit().await.unwrap();

    let state = fixture.session.state();
    assert!(state.result(Mode::Basic).is_some());
    assert!(state.slot(Mode::Basic).error.is_none());
    assert_eq!(
        state.slot(Mode::Clone).error.as_deref(),
        Some(failure_message(Mode::Clone))
    );
}

#[tokio::test]
async fn test_basic_transport_failure_message() {
    let mut fixture = Fixture::with_mock_behavior(MockBehavior::Transport);
    fixture.type_text("Hello");

    fixture.session.submit().await.unwrap();

    let state = fixture.session.state();
    assert_eq!(state.error(), Some(failure_message(Mode::Basic)));
    assert!(state.result(Mode::Basic).is_none());
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_resubmit_replaces_and_releases_previous_handle() {
    let mut fixture = Fixture::with_mock_behavior(MockBehavior::BehaviorQueue {
        behaviors: vec![
            MockBehavior::Success {
                bytes: b"first".to_vec(),
                content_type: Some("audio/wav".to_string()),
            },
            MockBehavior::Success {
                bytes: b"second".to_vec(),
                content_type: Some("audio/wav".to_string()),
            },
        ],
    });
    fixture.type_text("Hello world");

    fixture.session.submit().await.unwrap();
    let first_path = fixture
        .session
        .state()
        .result(Mode::Basic)
        .unwrap()
        .path()
        .to_path_buf();

    fixture.session.submit().await.unwrap();
    let second = fixture.session.state().result(Mode::Basic).unwrap();

    assert_ne!(second.path(), first_path);
    assert!(!first_path.exists());
    assert_eq!(second.read_bytes().unwrap(), b"second".to_vec());
    assert_eq!(fixture.mock().get_call_count(), 2);
    assert_eq!(fixture.live_handles(), 1);
}

#[tokio::test]
async fn test_loading_between_begin_and_complete() {
    let mut fixture = Fixture::new();
    fixture.type_text("Hello");

    let pending = fixture.session.begin_submit().unwrap();
    assert_eq!(pending.mode(), Mode::Basic);
    assert!(fixture.session.state().is_loading());
    assert_eq!(
        fixture.session.begin_submit().err(),
        Some(ValidationError::Busy(Mode::Basic))
    );

    let outcome = pending.run().await;
    fixture.session.complete(outcome);

    assert!(!fixture.session.state().is_loading());
    assert_eq!(fixture.mock().get_call_count(), 1);
}

#[tokio::test]
async fn test_both_modes_in_flight_independently() {
    let mut fixture = Fixture::with_mock_behavior(MockBehavior::BehaviorQueue {
        behaviors: vec![MockBehavior::wav(), MockBehavior::Status(503)],
    });
    fixture.type_text("Hello");
    let basic = fixture.session.begin_submit().unwrap();

    fixture.switch_mode(Mode::Clone);
    fixture.select_sample("sample.wav", "audio/wav");
    let clone = fixture.session.begin_submit().unwrap();

    let (basic_outcome, clone_outcome) = tokio::join!(basic.run(), clone.run());
    fixture.session.complete(clone_outcome);
    assert!(fixture.session.state().slot(Mode::Basic).loading);
    fixture.session.complete(basic_outcome);

    let state = fixture.session.state();
    assert!(!state.any_loading());
    assert!(state.result(Mode::Basic).is_some());
    assert!(state.slot(Mode::Clone).error.is_some());
}

#[tokio::test]
async fn test_dropping_session_releases_handles() {
    let mut fixture = Fixture::new();
    fixture.type_text("Hello");
    fixture.session.submit().await.unwrap();
    fixture.switch_mode(Mode::Clone);
    fixture.select_sample("sample.wav", "audio/wav");
    fixture.session.submit().await.unwrap();
    assert_eq!(fixture.live_handles(), 2);

    let Fixture {
        session,
        handle_dir,
        ..
    } = fixture;
    drop(session);

    assert_eq!(std::fs::read_dir(handle_dir.path()).unwrap().count(), 0);
}
