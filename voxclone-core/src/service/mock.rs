use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use super::provider::SynthesisService;
use crate::error::ServiceError;
use crate::types::{AudioPayload, CloneRequest, ModelInfo, ServiceBanner, SynthesisRequest};

/// A minimal RIFF/WAVE header, enough to look like audio to a player.
pub const WAV_HEADER: [u8; 12] = [
    0x52, 0x49, 0x46, 0x46, 0x24, 0x00, 0x00, 0x00, 0x57, 0x41, 0x56, 0x45,
];

/// Mock behavior for the mock service
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the given audio payload
    Success {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
    /// Fail as if the service answered with a non-2xx status
    Status(u16),
    /// Fail as if the service could not be reached
    Transport,
    /// Run each behavior once in order, then fall back to a WAV success
    BehaviorQueue { behaviors: Vec<MockBehavior> },
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self::wav()
    }
}

impl MockBehavior {
    pub fn wav() -> Self {
        Self::Success {
            bytes: WAV_HEADER.to_vec(),
            content_type: Some("audio/wav".to_string()),
        }
    }
}

/// A request as the mock received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedRequest {
    Synthesize(SynthesisRequest),
    Clone(CloneRequest),
}

/// Mock synthesis service for testing
#[derive(Clone, Default)]
pub struct MockService {
    behavior: Arc<Mutex<MockBehavior>>,
    model_info: Arc<Mutex<Option<ModelInfo>>>,
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockService {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            model_info: Arc::new(Mutex::new(None)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn set_model_info(&self, info: ModelInfo) {
        *self.model_info.lock().unwrap() = Some(info);
    }

    pub fn get_call_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    pub fn get_captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().unwrap().clone()
    }

    pub fn get_last_captured_request(&self) -> Option<CapturedRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }

    fn next_behavior(&self) -> MockBehavior {
        let mut behavior = self.behavior.lock().unwrap();
        if let MockBehavior::BehaviorQueue { behaviors } = &mut *behavior {
            if behaviors.is_empty() {
                return MockBehavior::wav();
            }
            return behaviors.remove(0);
        }
        behavior.clone()
    }

    fn respond(&self, request: CapturedRequest) -> Result<AudioPayload, ServiceError> {
        self.captured_requests.lock().unwrap().push(request);

        match self.next_behavior() {
            MockBehavior::Success {
                bytes,
                content_type,
            } => Ok(AudioPayload::new(bytes, content_type)),
            MockBehavior::Status(status) => Err(ServiceError::Status { status }),
            MockBehavior::Transport => Err(ServiceError::Transport(anyhow!(
                "Connection refused (mock)"
            ))),
            MockBehavior::BehaviorQueue { .. } => Err(ServiceError::Malformed(anyhow!(
                "Nested behavior queues are not supported"
            ))),
        }
    }
}

#[async_trait]
impl SynthesisService for MockService {
    fn name(&self) -> String {
        "mock".to_string()
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioPayload, ServiceError> {
        self.respond(CapturedRequest::Synthesize(request.clone()))
    }

    async fn clone_voice(&self, request: &CloneRequest) -> Result<AudioPayload, ServiceError> {
        self.respond(CapturedRequest::Clone(request.clone()))
    }

    async fn model_info(&self) -> Result<ModelInfo, ServiceError> {
        self.model_info
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ServiceError::Transport(anyhow!("Connection refused (mock)")))
    }

    async fn banner(&self) -> Result<ServiceBanner, ServiceError> {
        Ok(ServiceBanner {
            message: "Mock synthesis service".to_string(),
            version: "0.0.0".to_string(),
        })
    }
}
