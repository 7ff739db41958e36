use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::state::{failure_message, FormAction, FormState, Submission};
use crate::error::{ServiceError, ValidationError};
use crate::handle::AudioHandle;
use crate::service::SynthesisService;
use crate::types::{AudioFile, AudioPayload, Mode};

/// Result of one request, delivered back to the form.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub mode: Mode,
    pub result: Result<AudioPayload, ServiceError>,
}

/// A request that has passed validation and been marked as loading.
///
/// Owns everything it needs, so it can be moved onto a spawned task while the
/// form keeps handling input.
pub struct PendingSubmission {
    submission: Submission,
    service: Arc<dyn SynthesisService>,
}

impl PendingSubmission {
    pub fn mode(&self) -> Mode {
        self.submission.mode()
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub async fn run(self) -> SubmissionOutcome {
        let mode = self.mode();
        let result = match &self.submission {
            Submission::Synthesize(request) => self.service.synthesize(request).await,
            Submission::Clone(request) => self.service.clone_voice(request).await,
        };
        SubmissionOutcome { mode, result }
    }
}

/// The form together with the service it submits to.
pub struct FormSession {
    state: FormState,
    service: Arc<dyn SynthesisService>,
    handle_dir: Option<PathBuf>,
}

impl FormSession {
    pub fn new(state: FormState, service: Arc<dyn SynthesisService>) -> Self {
        Self {
            state,
            service,
            handle_dir: None,
        }
    }

    /// Keep result files under `dir` instead of the system temp directory.
    pub fn with_handle_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.handle_dir = Some(dir.into());
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn service(&self) -> Arc<dyn SynthesisService> {
        self.service.clone()
    }

    pub fn dispatch(&mut self, action: FormAction) {
        self.state.dispatch(action);
    }

    /// Read the sample at `path` and select it. A rejected file leaves the
    /// current selection in place; the error text is what the user should see.
    pub fn select_voice_sample_from(
        &mut self,
        path: &Path,
        media_type_override: Option<&str>,
    ) -> anyhow::Result<()> {
        let file = AudioFile::from_path(path, media_type_override).map_err(|e| {
            warn!(?path, error = %e, "voice sample rejected");
            e
        })?;
        self.state.dispatch(FormAction::SelectVoiceSample(file));
        Ok(())
    }

    /// Validate, then move the active mode into loading.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, ValidationError> {
        let submission = self.state.prepare()?;
        let mode = submission.mode();
        info!(%mode, service = %self.service.name(), "submission started");

        self.state.dispatch(FormAction::SubmitStarted(mode));
        Ok(PendingSubmission {
            submission,
            service: self.service.clone(),
        })
    }

    /// Fold a finished request back into the form.
    pub fn complete(&mut self, outcome: SubmissionOutcome) {
        let SubmissionOutcome { mode, result } = outcome;

        let handle = result
            .map_err(|e| {
                warn!(%mode, error = %e, transport = e.is_transport(), "submission failed");
            })
            .and_then(|payload| {
                self.allocate_handle(mode, &payload).map_err(|e| {
                    warn!(%mode, error = ?e, "failed to allocate audio handle");
                })
            });

        match handle {
            Ok(handle) => {
                info!(%mode, len = handle.len(), "submission succeeded");
                self.state
                    .dispatch(FormAction::SubmitSucceeded { mode, handle });
            }
            Err(()) => {
                self.state.dispatch(FormAction::SubmitFailed {
                    mode,
                    message: failure_message(mode).to_string(),
                });
            }
        }
    }

    /// Validate, send and record the result, awaiting the request inline.
    pub async fn submit(&mut self) -> Result<(), ValidationError> {
        let pending = self.begin_submit()?;
        let outcome = pending.run().await;
        self.complete(outcome);
        Ok(())
    }

    pub fn into_state(self) -> FormState {
        self.state
    }

    fn allocate_handle(&self, mode: Mode, payload: &AudioPayload) -> anyhow::Result<AudioHandle> {
        match &self.handle_dir {
            Some(dir) => AudioHandle::create_in(dir, mode, payload),
            None => AudioHandle::create(mode, payload),
        }
    }
}
