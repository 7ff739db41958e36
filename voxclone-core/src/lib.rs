pub mod error;
pub mod form;
pub mod handle;
pub mod service;
pub mod settings;
pub mod types;

pub use error::{ServiceError, ValidationError};
pub use form::{FormAction, FormSession, FormState};
pub use handle::AudioHandle;
pub use service::{HttpSynthesisService, SynthesisService};
pub use settings::{Settings, SettingsManager};
pub use types::{AudioFile, Language, Mode};
