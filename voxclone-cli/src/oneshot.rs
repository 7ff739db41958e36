//! Non-interactive commands. They drive the same form session as the TUI, so
//! validation and failure handling are identical.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use voxclone_core::form::{FormAction, FormSession, FormState};
use voxclone_core::service::SynthesisService;
use voxclone_core::settings::Settings;
use voxclone_core::types::{Language, Mode};

pub struct CloneArgs {
    pub text: String,
    pub voice_file: PathBuf,
    pub language: Language,
    pub media_type: Option<String>,
    pub out: Option<PathBuf>,
}

pub async fn run_synthesize(
    service: Arc<dyn SynthesisService>,
    settings: &Settings,
    text: String,
    out: Option<PathBuf>,
) -> Result<PathBuf> {
    let mut session = FormSession::new(FormState::new(settings.default_language), service);
    session.dispatch(FormAction::EditText(text));

    submit_and_save(session, out.unwrap_or_else(|| settings.download_dir())).await
}

pub async fn run_clone(
    service: Arc<dyn SynthesisService>,
    settings: &Settings,
    args: CloneArgs,
) -> Result<PathBuf> {
    let mut session = FormSession::new(FormState::new(args.language), service);
    session.select_voice_sample_from(&args.voice_file, args.media_type.as_deref())?;
    session.dispatch(FormAction::SwitchMode(Mode::Clone));
    session.dispatch(FormAction::EditText(args.text));

    submit_and_save(session, args.out.unwrap_or_else(|| settings.download_dir())).await
}

async fn submit_and_save(mut session: FormSession, dest: PathBuf) -> Result<PathBuf> {
    session.submit().await.map_err(|e| anyhow!(e))?;

    let state = session.state();
    if let Some(message) = state.error() {
        bail!("{message}");
    }
    let handle = state
        .result(state.mode())
        .context("Service returned no audio")?;
    handle.save_to(&dest)
}

pub async fn describe_service(service: &dyn SynthesisService) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Service:   {}", service.name())?;

    match service.banner().await {
        Ok(banner) => writeln!(out, "API:       {} v{}", banner.message, banner.version)?,
        Err(e) => bail!("Could not reach the synthesis service: {e}"),
    }

    let info = service
        .model_info()
        .await
        .map_err(|e| anyhow!("Could not read model info: {e}"))?;

    writeln!(out, "Status:    {}", info.status)?;
    if let Some(name) = &info.model_name {
        writeln!(out, "Model:     {name} ({})", info.model_type)?;
    }
    writeln!(
        out,
        "Features:  basic_tts={} voice_cloning={} multi_language={}",
        info.available_features.basic_tts,
        info.available_features.voice_cloning,
        info.available_features.multi_language
    )?;
    if !info.supported_languages.is_empty() {
        writeln!(out, "Languages: {}", info.supported_languages.join(", "))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use voxclone_core::service::mock::{CapturedRequest, MockBehavior, MockService, WAV_HEADER};
    use voxclone_core::types::ModelInfo;

    fn settings_in(dir: &TempDir) -> Settings {
        Settings {
            download_dir: Some(dir.path().to_path_buf()),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_synthesize_saves_to_download_dir() {
        let dir = TempDir::new().unwrap();
        let mock = MockService::default();

        let saved = run_synthesize(
            Arc::new(mock.clone()),
            &settings_in(&dir),
            "Hello world".to_string(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(saved, dir.path().join("synthesized_audio.wav"));
        assert_eq!(std::fs::read(saved).unwrap(), WAV_HEADER.to_vec());
        assert_eq!(mock.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_synthesize_empty_text_is_rejected_without_request() {
        let dir = TempDir::new().unwrap();
        let mock = MockService::default();

        let err = run_synthesize(Arc::new(mock.clone()), &settings_in(&dir), String::new(), None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Enter the text to convert to speech.");
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_clone_failure_reports_mode_message() {
        let dir = TempDir::new().unwrap();
        let sample = dir.path().join("sample.mp3");
        std::fs::write(&sample, b"ID3").unwrap();
        let mock = MockService::new(MockBehavior::Status(500));

        let err = run_clone(
            Arc::new(mock.clone()),
            &settings_in(&dir),
            CloneArgs {
                text: "Bonjour".to_string(),
                voice_file: sample,
                language: Language::Fr,
                media_type: None,
                out: None,
            },
        )
        .await
        .unwrap_err();

        assert!(err.to_string().starts_with("Voice cloning failed."));
        let Some(CapturedRequest::Clone(request)) = mock.get_last_captured_request() else {
            panic!("expected a clone request");
        };
        assert_eq!(request.language, Language::Fr);
    }

    #[tokio::test]
    async fn test_clone_rejects_pdf_sample() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("document.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();
        let mock = MockService::default();

        let err = run_clone(
            Arc::new(mock.clone()),
            &settings_in(&dir),
            CloneArgs {
                text: "Bonjour".to_string(),
                voice_file: pdf,
                language: Language::Fr,
                media_type: None,
                out: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Only audio files can be uploaded.");
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_clone_saves_to_explicit_path() {
        let dir = TempDir::new().unwrap();
        let sample = dir.path().join("sample.wav");
        std::fs::write(&sample, b"RIFF").unwrap();
        let out = dir.path().join("me.wav");

        let saved = run_clone(
            Arc::new(MockService::default()),
            &settings_in(&dir),
            CloneArgs {
                text: "Hello".to_string(),
                voice_file: sample,
                language: Language::En,
                media_type: None,
                out: Some(out.clone()),
            },
        )
        .await
        .unwrap();

        assert_eq!(saved, out);
        assert!(out.exists());
    }

    #[tokio::test]
    async fn test_describe_service() {
        let mock = MockService::default();
        mock.set_model_info(ModelInfo {
            status: "loaded".to_string(),
            model_name: Some("tts_models/en/ljspeech/tacotron2-DDC".to_string()),
            model_type: "basic".to_string(),
            supported_languages: vec!["en".to_string()],
            ..ModelInfo::default()
        });

        let text = describe_service(&mock).await.unwrap();

        assert!(text.contains("Service:   mock"));
        assert!(text.contains("Model:     tts_models/en/ljspeech/tacotron2-DDC (basic)"));
        assert!(text.contains("Languages: en"));
    }

    #[tokio::test]
    async fn test_describe_unreachable_model_info() {
        let err = describe_service(&MockService::default()).await.unwrap_err();
        assert!(err.to_string().starts_with("Could not read model info"));
    }
}
