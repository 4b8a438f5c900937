use chrono::Utc;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use super::error::ApiError;
use super::signing::{Credentials, SigV4Signer};

/// Target prefix for the service's JSON 1.0 protocol
const TARGET_PREFIX: &str = "PinpointSMSVoiceV2";
const CONTENT_TYPE: &str = "application/x-amz-json-1.0";
const SIGNING_SERVICE: &str = "sms-voice";

/// End User Messaging SMS and Voice API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    endpoint: Url,
    signer: SigV4Signer,
    retry_config: RetryConfig,
}

#[derive(Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

/// Wire shape of a service error body
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(
        region: &str,
        credentials: Credentials,
        endpoint: Option<&str>,
    ) -> Result<Self, ApiError> {
        Self::with_config(region, credentials, endpoint, RetryConfig::default())
    }

    /// Create a new API client with custom retry configuration
    pub fn with_config(
        region: &str,
        credentials: Credentials,
        endpoint: Option<&str>,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let endpoint = match endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}.amazonaws.com", SIGNING_SERVICE, region),
        };
        let endpoint =
            Url::parse(&endpoint).map_err(|e| ApiError::InvalidEndpoint(e.to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(retry_config.timeout_seconds))
            .build()?;

        let signer = SigV4Signer::new(credentials, region, SIGNING_SERVICE);

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                endpoint,
                signer,
                retry_config,
            }),
        })
    }

    /// Execute a signed JSON 1.0 operation with retry of transient failures
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        operation: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| ApiError::Parse(format!("failed to encode request: {}", e)))?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.inner.retry_config.max_retries {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    self.inner.retry_config.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    self.inner.retry_config.max_backoff_ms,
                );
                tracing::debug!(
                    "Retrying {} after {}ms (attempt {})",
                    operation,
                    backoff,
                    attempt
                );
                tokio::time::sleep(tokio::time::Duration::from_millis(backoff)).await;
            }

            match self.send(&target, &payload).await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return self.parse_success_response(response).await;
                    }

                    match self.classify_error_response(response).await {
                        err @ (ApiError::Throttled | ApiError::ServiceUnavailable) => {
                            last_error = Some(err);
                        }
                        err => return Err(err),
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error =
                            Some(ApiError::Timeout(self.inner.retry_config.timeout_seconds));
                    } else if e.is_connect() || e.is_request() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(ApiError::Request(e));
                    }
                }
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }

    async fn send(
        &self,
        target: &str,
        payload: &[u8],
    ) -> Result<reqwest::Response, reqwest::Error> {
        tracing::debug!("POST {} target {}", self.inner.endpoint, target);

        let headers = vec![
            ("content-type".to_string(), CONTENT_TYPE.to_string()),
            ("x-amz-target".to_string(), target.to_string()),
        ];
        let signed = self.inner.signer.sign(
            "POST",
            &self.inner.endpoint,
            &headers,
            payload,
            Utc::now(),
        );

        let mut request = self
            .inner
            .http_client
            .post(self.inner.endpoint.clone())
            .body(payload.to_vec());
        for (name, value) in headers.iter().chain(signed.iter()) {
            request = request.header(name, value);
        }

        request.send().await
    }

    /// Parse successful response
    async fn parse_success_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        // Empty-output operations return no body at all
        let text = if text.is_empty() { "{}".to_string() } else { text };

        serde_json::from_str::<T>(&text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::Parse(format!("failed to parse response: {}", e))
        })
    }

    /// Classify an error response into the ApiError taxonomy
    async fn classify_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status();
        let error_type_header = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let parsed = serde_json::from_str::<ErrorResponse>(&text).ok();
        let code = error_type_header
            .or_else(|| parsed.as_ref().and_then(|e| e.error_type.clone()))
            .map(|raw| normalize_error_code(&raw))
            .unwrap_or_else(|| status.as_str().to_string());
        let message = parsed
            .and_then(|e| e.message)
            .unwrap_or_else(|| text.clone());

        if status == StatusCode::TOO_MANY_REQUESTS || code == "ThrottlingException" {
            return ApiError::Throttled;
        }
        if status.is_server_error() {
            return ApiError::ServiceUnavailable;
        }

        match code.as_str() {
            "ResourceNotFoundException" => ApiError::NotFound(message),
            "ConflictException" => ApiError::Conflict(message),
            "ValidationException" => ApiError::Validation(message),
            "AccessDeniedException" => ApiError::AccessDenied(message),
            _ => ApiError::Api { code, message },
        }
    }
}

/// Error codes arrive as "namespace#Code" in bodies or "Code:Sender" in
/// the x-amzn-errortype header
fn normalize_error_code(raw: &str) -> String {
    let after_hash = raw.rsplit('#').next().unwrap_or(raw);
    after_hash
        .split(':')
        .next()
        .unwrap_or(after_hash)
        .to_string()
}
