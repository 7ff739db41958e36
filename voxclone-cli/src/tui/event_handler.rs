use std::process::ExitStatus;

use voxclone_core::error::ServiceError;
use voxclone_core::form::SubmissionOutcome;
use voxclone_core::types::ModelInfo;

use super::state::TuiState;

/// Completions delivered back to the UI loop by spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    SubmissionFinished(SubmissionOutcome),
    ModelInfo(Result<ModelInfo, ServiceError>),
    PlaybackFinished(anyhow::Result<ExitStatus>),
}

pub fn handle_app_event(state: &mut TuiState, event: AppEvent) {
    match event {
        AppEvent::SubmissionFinished(outcome) => {
            let mode = outcome.mode;
            state.session.complete(outcome);

            let slot = state.form().slot(mode);
            let message = match (&slot.result, &slot.error) {
                (Some(handle), _) => Ok(format!(
                    "{} result ready ({} bytes). Ctrl+P to play, Ctrl+W to save.",
                    mode.title(),
                    handle.len()
                )),
                (None, Some(error)) => Err(error.clone()),
                (None, None) => Err(format!("{} finished without a result.", mode.title())),
            };
            match message {
                Ok(content) => state.success(content),
                Err(content) => state.error(content),
            }
        }

        AppEvent::ModelInfo(Ok(info)) => {
            state.model_summary = Some(info.summary());
            if info.is_loaded() && !info.supports_voice_cloning {
                state.info("The loaded model does not support voice cloning; clone requests fall back to the default voice.");
            }
        }

        AppEvent::ModelInfo(Err(e)) => {
            state.model_summary = Some("service unreachable".to_string());
            state.error(format!("Could not reach the synthesis service: {e}"));
        }

        AppEvent::PlaybackFinished(Ok(status)) => {
            if !status.success() {
                state.error(format!("Player exited with {status}"));
            }
        }

        AppEvent::PlaybackFinished(Err(e)) => {
            state.error(format!("{e:#}"));
        }
    }
}
