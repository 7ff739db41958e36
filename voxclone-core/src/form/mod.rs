//! The synthesis form: one state record, driven by discrete actions.

pub mod session;
pub mod state;

pub use session::{FormSession, PendingSubmission, SubmissionOutcome};
pub use state::{failure_message, FormAction, FormState, ModeSlot, Submission};
