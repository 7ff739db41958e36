use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{AudioPayload, CloneRequest, ModelInfo, ServiceBanner, SynthesisRequest};

/// The remote synthesis service as seen by the form.
#[async_trait]
pub trait SynthesisService: Send + Sync {
    /// Short identifier used in logs and the status bar
    fn name(&self) -> String;

    /// Synthesize text with the service's default voice
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioPayload, ServiceError>;

    /// Synthesize text in the voice of the supplied sample
    async fn clone_voice(&self, request: &CloneRequest) -> Result<AudioPayload, ServiceError>;

    /// Describe the model currently loaded by the service
    async fn model_info(&self) -> Result<ModelInfo, ServiceError>;

    /// Service name and version
    async fn banner(&self) -> Result<ServiceBanner, ServiceError>;
}
