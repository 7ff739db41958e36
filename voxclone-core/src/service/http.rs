//! HTTP implementation of the synthesis service

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use super::provider::SynthesisService;
use crate::error::ServiceError;
use crate::types::{
    is_audio_media_type, AudioPayload, CloneRequest, ModelInfo, ServiceBanner, SynthesisRequest,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8005";

/// Only 2xx counts as success.
pub fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Audio responses may omit the header; anything declared must be audio or opaque bytes.
pub fn is_acceptable_audio_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return true;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    is_audio_media_type(&essence) || essence == "application/octet-stream"
}

pub struct HttpSynthesisService {
    base_url: String,
    client: Client,
}

impl HttpSynthesisService {
    /// Build a client that does not follow redirects, so a 3xx answer is
    /// classified as a failure instead of being chased to its target.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|e| ServiceError::InvalidRequest(anyhow!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn check_status(response: &Response) -> Result<(), ServiceError> {
        let status = response.status().as_u16();
        if is_success_status(status) {
            Ok(())
        } else {
            warn!(status, url = %response.url(), "synthesis service returned failure status");
            Err(ServiceError::Status { status })
        }
    }

    async fn read_audio(response: Response) -> Result<AudioPayload, ServiceError> {
        Self::check_status(&response)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !is_acceptable_audio_content_type(content_type.as_deref()) {
            return Err(ServiceError::UnexpectedContentType(
                content_type.unwrap_or_default(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(anyhow!("Failed to read audio bytes: {e}")))?
            .to_vec();

        if bytes.is_empty() {
            return Err(ServiceError::EmptyPayload);
        }

        debug!(len = bytes.len(), ?content_type, "received audio payload");
        Ok(AudioPayload::new(bytes, content_type))
    }

    fn clone_form(request: &CloneRequest) -> Result<Form, ServiceError> {
        let sample = &request.voice_sample;
        let part = Part::bytes(sample.bytes().to_vec())
            .file_name(sample.file_name().to_string())
            .mime_str(sample.media_type())
            .map_err(|e| {
                ServiceError::InvalidRequest(anyhow!(
                    "Invalid media type {:?}: {e}",
                    sample.media_type()
                ))
            })?;

        Ok(Form::new()
            .text("text", request.text.clone())
            .text("language", request.language.as_code())
            .part("voice_file", part))
    }
}

#[async_trait]
impl SynthesisService for HttpSynthesisService {
    fn name(&self) -> String {
        self.base_url.clone()
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioPayload, ServiceError> {
        let url = self.endpoint("synthesize");
        info!(%url, chars = request.text.chars().count(), "sending synthesis request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ServiceError::from)?;

        Self::read_audio(response).await
    }

    async fn clone_voice(&self, request: &CloneRequest) -> Result<AudioPayload, ServiceError> {
        let url = self.endpoint("clone-voice");
        info!(
            %url,
            chars = request.text.chars().count(),
            language = %request.language,
            sample = request.voice_sample.file_name(),
            sample_len = request.voice_sample.len(),
            "sending voice clone request"
        );

        let form = Self::clone_form(request)?;
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ServiceError::from)?;

        Self::read_audio(response).await
    }

    async fn model_info(&self) -> Result<ModelInfo, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("model-info"))
            .send()
            .await
            .map_err(ServiceError::from)?;
        Self::check_status(&response)?;

        let body = response.text().await.map_err(ServiceError::from)?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn banner(&self) -> Result<ServiceBanner, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("/"))
            .send()
            .await
            .map_err(ServiceError::from)?;
        Self::check_status(&response)?;

        let body = response.text().await.map_err(ServiceError::from)?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200, true)]
    #[case(204, true)]
    #[case(299, true)]
    #[case(199, false)]
    #[case(301, false)]
    #[case(304, false)]
    #[case(404, false)]
    #[case(500, false)]
    fn test_success_range(#[case] status: u16, #[case] expected: bool) {
        assert_eq!(is_success_status(status), expected);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("audio/wav"), true)]
    #[case(Some("audio/mpeg; charset=binary"), true)]
    #[case(Some("Audio/WAV"), true)]
    #[case(Some("application/octet-stream"), true)]
    #[case(Some("text/plain"), false)]
    #[case(Some("application/json"), false)]
    fn test_acceptable_content_types(#[case] content_type: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_acceptable_audio_content_type(content_type), expected);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let service = HttpSynthesisService::new("http://localhost:8005/").unwrap();
        assert_eq!(service.base_url(), "http://localhost:8005");
        assert_eq!(
            service.endpoint("synthesize"),
            "http://localhost:8005/synthesize"
        );
        assert_eq!(service.endpoint("/"), "http://localhost:8005/");
    }
}
