//! Gemini API timestamp oracle adapter
//!
//! Talks to two Gemini surfaces: the Files API for uploading audio
//! and tracking its processing state, and generateContent with a JSON
//! response schema for the actual topic lookup.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{OracleError, RemoteAudioFile, RemoteFileState, TimestampOracle};
use crate::domain::config::DEFAULT_MODEL;
use crate::domain::{AudioMimeType, TopicPrompt};

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Seconds between file state polls
const POLL_INTERVAL_SECS: u64 = 3;

/// Seconds to wait for an uploaded file to become active
const PROCESSING_TIMEOUT_SECS: u64 = 120;

/// Seconds before an individual HTTP request is abandoned
const REQUEST_TIMEOUT_SECS: u64 = 120;

// Request types for the Gemini API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: ResponseSchema,
}

#[derive(Debug, Serialize)]
struct ResponseSchema {
    #[serde(rename = "type")]
    schema_type: String,
    properties: SchemaProperties,
    required: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SchemaProperties {
    timestamp: PropertySchema,
}

#[derive(Debug, Serialize)]
struct PropertySchema {
    #[serde(rename = "type")]
    schema_type: String,
    description: String,
}

// Request and response types for the Files API

#[derive(Debug, Serialize)]
struct StartUploadRequest {
    file: FileMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata {
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileResource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    name: String,
    uri: Option<String>,
    mime_type: Option<String>,
    state: Option<String>,
}

// Response types for the Gemini API

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    status: Option<String>,
    code: Option<i32>,
}

/// Shape of the structured output document
#[derive(Debug, Deserialize)]
struct TimestampReply {
    timestamp: Option<String>,
}

/// Gemini API timestamp oracle
pub struct GeminiOracle {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
    poll_interval: Duration,
    processing_timeout: Duration,
}

impl GeminiOracle {
    /// Create a new Gemini oracle with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create a new Gemini oracle with a custom model
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, API_BASE_URL)
    }

    /// Create a new Gemini oracle against a custom API endpoint
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("reqwest client build never fails with valid TLS config"),
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            processing_timeout: Duration::from_secs(PROCESSING_TIMEOUT_SECS),
        }
    }

    /// Override the file processing poll cadence
    pub fn with_polling(mut self, interval: Duration, ceiling: Duration) -> Self {
        self.poll_interval = interval;
        self.processing_timeout = ceiling;
        self
    }

    /// Build the generateContent URL
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Build the resumable upload start URL
    fn start_upload_url(&self) -> String {
        format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key)
    }

    /// Build the URL of a file resource
    fn file_url(&self, name: &str) -> String {
        format!("{}/v1beta/{}?key={}", self.base_url, name, self.api_key)
    }

    /// Map HTTP-level failures to oracle errors
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OracleError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(OracleError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OracleError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OracleError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }

    /// Convert a file resource into a port-level handle
    fn to_handle(resource: FileResource) -> Result<RemoteAudioFile, OracleError> {
        let uri = resource
            .uri
            .ok_or_else(|| OracleError::ParseError("file resource has no uri".to_string()))?;

        let mime_type = resource
            .mime_type
            .as_deref()
            .and_then(AudioMimeType::from_mime)
            .unwrap_or_default();

        Ok(RemoteAudioFile {
            name: resource.name,
            uri,
            mime_type,
            state: Self::parse_state(resource.state.as_deref()),
        })
    }

    /// Interpret the server-side processing state.
    /// Unknown states count as still processing so polling keeps going
    /// until the ceiling instead of failing on new state names.
    fn parse_state(state: Option<&str>) -> RemoteFileState {
        match state {
            Some("ACTIVE") => RemoteFileState::Active,
            Some("FAILED") => RemoteFileState::Failed,
            _ => RemoteFileState::Processing,
        }
    }

    /// Build the generateContent request body
    fn build_request(
        &self,
        file: &RemoteAudioFile,
        prompt: &TopicPrompt,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part {
                        text: None,
                        file_data: Some(FileData {
                            mime_type: file.mime_type.to_string(),
                            file_uri: file.uri.clone(),
                        }),
                    },
                    Part {
                        text: Some(prompt.content().to_string()),
                        file_data: None,
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
                response_schema: ResponseSchema {
                    schema_type: "OBJECT".to_string(),
                    properties: SchemaProperties {
                        timestamp: PropertySchema {
                            schema_type: "STRING".to_string(),
                            description: "Timestamp in HH:MM:SS format".to_string(),
                        },
                    },
                    required: vec!["timestamp".to_string()],
                },
            },
        }
    }

    /// Extract text from response
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts: Vec<&str> = response
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }

    /// Parse the structured output document, tolerating a missing field
    fn parse_timestamp_reply(text: &str) -> Result<String, OracleError> {
        let reply: TimestampReply =
            serde_json::from_str(text).map_err(|e| OracleError::ParseError(e.to_string()))?;

        Ok(reply.timestamp.unwrap_or_else(|| "00:00:00".to_string()))
    }

    /// Fetch the current state of an uploaded file
    async fn fetch_state(&self, name: &str) -> Result<RemoteAudioFile, OracleError> {
        let response = self
            .client
            .get(self.file_url(name))
            .send()
            .await
            .map_err(|e| OracleError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let resource: FileResource = response
            .json()
            .await
            .map_err(|e| OracleError::ParseError(e.to_string()))?;

        Self::to_handle(resource)
    }
}

#[async_trait]
impl TimestampOracle for GeminiOracle {
    async fn upload(
        &self,
        path: &Path,
        mime_type: AudioMimeType,
    ) -> Result<RemoteAudioFile, OracleError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| OracleError::RequestFailed(format!("Failed to read audio file: {}", e)))?;

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        // Start a resumable upload session
        let start = self
            .client
            .post(self.start_upload_url())
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len())
            .header("X-Goog-Upload-Header-Content-Type", mime_type.as_str())
            .json(&StartUploadRequest {
                file: FileMetadata { display_name },
            })
            .send()
            .await
            .map_err(|e| OracleError::RequestFailed(e.to_string()))?;

        let start = Self::check_status(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                OracleError::ParseError("upload session response has no upload URL".to_string())
            })?;

        // Send the bytes and finalize in one shot
        let finish = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .map_err(|e| OracleError::RequestFailed(e.to_string()))?;

        let finish = Self::check_status(finish).await?;

        let uploaded: UploadResponse = finish
            .json()
            .await
            .map_err(|e| OracleError::ParseError(e.to_string()))?;

        Self::to_handle(uploaded.file)
    }

    async fn await_active(&self, file: &RemoteAudioFile) -> Result<RemoteAudioFile, OracleError> {
        let mut current = file.clone();
        let mut waited = Duration::ZERO;

        while !current.is_active() {
            if waited >= self.processing_timeout {
                return Err(OracleError::ProcessingTimeout);
            }

            tokio::time::sleep(self.poll_interval).await;
            waited += self.poll_interval;

            current = self.fetch_state(&current.name).await?;
        }

        Ok(current)
    }

    async fn find_timestamp(
        &self,
        file: &RemoteAudioFile,
        prompt: &TopicPrompt,
    ) -> Result<String, OracleError> {
        let body = self.build_request(file, prompt);

        let response = self
            .client
            .post(self.generate_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        // Parse response
        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| OracleError::ParseError(e.to_string()))?;

        // Check for API error in response body
        if let Some(error) = response.error {
            return Err(OracleError::ApiError(error.message));
        }

        let text = Self::extract_text(&response).ok_or(OracleError::EmptyResponse)?;

        Self::parse_timestamp_reply(&text)
    }

    async fn delete(&self, file: &RemoteAudioFile) -> Result<(), OracleError> {
        let response = self
            .client
            .delete(self.file_url(&file.name))
            .send()
            .await
            .map_err(|e| OracleError::RequestFailed(e.to_string()))?;

        Self::check_status(response).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_file() -> RemoteAudioFile {
        RemoteAudioFile {
            name: "files/abc".to_string(),
            uri: "https://example.com/files/abc".to_string(),
            mime_type: AudioMimeType::Mpeg,
            state: RemoteFileState::Active,
        }
    }

    #[test]
    fn build_request_has_correct_structure() {
        let oracle = GeminiOracle::new("test-key");
        let prompt = TopicPrompt::for_topic("rust");

        let request = oracle.build_request(&active_file(), &prompt);

        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].role, "user");
        assert_eq!(request.contents[0].parts.len(), 2);
        assert!(request.contents[0].parts[0].file_data.is_some());
        assert!(request.contents[0].parts[1].text.is_some());
        assert_eq!(request.generation_config.temperature, 0.0);
        assert_eq!(
            request.generation_config.response_mime_type,
            "application/json"
        );
        assert_eq!(
            request.generation_config.response_schema.required,
            vec!["timestamp"]
        );
    }

    #[test]
    fn generate_url_contains_model_and_key() {
        let oracle = GeminiOracle::new("test-api-key");
        let url = oracle.generate_url();

        assert!(url.contains("gemini-2.0-flash"));
        assert!(url.contains("test-api-key"));
        assert!(url.contains("generateContent"));
    }

    #[test]
    fn custom_base_url_is_normalized() {
        let oracle = GeminiOracle::with_base_url("key", "custom-model", "http://localhost:9090/");
        let url = oracle.generate_url();

        assert!(url.starts_with("http://localhost:9090/v1beta/models/custom-model"));
    }

    #[test]
    fn file_url_addresses_resource_by_name() {
        let oracle = GeminiOracle::new("k");

        assert_eq!(
            oracle.file_url("files/abc123"),
            format!("{}/v1beta/files/abc123?key=k", API_BASE_URL)
        );
    }

    #[test]
    fn parse_state_maps_known_states() {
        assert_eq!(
            GeminiOracle::parse_state(Some("ACTIVE")),
            RemoteFileState::Active
        );
        assert_eq!(
            GeminiOracle::parse_state(Some("FAILED")),
            RemoteFileState::Failed
        );
        assert_eq!(
            GeminiOracle::parse_state(Some("PROCESSING")),
            RemoteFileState::Processing
        );
        assert_eq!(GeminiOracle::parse_state(None), RemoteFileState::Processing);
    }

    #[test]
    fn extract_text_from_response() {
        let response = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![ResponsePart {
                        text: Some(r#"{"timestamp": "00:05:47"}"#.to_string()),
                    }]),
                }),
            }]),
            error: None,
        };

        let text = GeminiOracle::extract_text(&response);
        assert_eq!(text, Some(r#"{"timestamp": "00:05:47"}"#.to_string()));
    }

    #[test]
    fn extract_text_empty_response() {
        let response = GenerateContentResponse {
            candidates: None,
            error: None,
        };

        let text = GeminiOracle::extract_text(&response);
        assert!(text.is_none());
    }

    #[test]
    fn parse_timestamp_reply_reads_field() {
        let ts = GeminiOracle::parse_timestamp_reply(r#"{"timestamp": "00:05:47"}"#).unwrap();
        assert_eq!(ts, "00:05:47");
    }

    #[test]
    fn parse_timestamp_reply_defaults_missing_field() {
        let ts = GeminiOracle::parse_timestamp_reply("{}").unwrap();
        assert_eq!(ts, "00:00:00");
    }

    #[test]
    fn parse_timestamp_reply_rejects_invalid_json() {
        assert!(GeminiOracle::parse_timestamp_reply("not json").is_err());
    }

    #[test]
    fn to_handle_requires_uri() {
        let resource = FileResource {
            name: "files/abc".to_string(),
            uri: None,
            mime_type: None,
            state: None,
        };

        assert!(GeminiOracle::to_handle(resource).is_err());
    }

    #[test]
    fn to_handle_defaults_unknown_mime_type() {
        let resource = FileResource {
            name: "files/abc".to_string(),
            uri: Some("https://example.com/files/abc".to_string()),
            mime_type: Some("application/octet-stream".to_string()),
            state: Some("ACTIVE".to_string()),
        };

        let handle = GeminiOracle::to_handle(resource).unwrap();
        assert_eq!(handle.mime_type, AudioMimeType::Mpeg);
        assert!(handle.is_active());
    }
}
