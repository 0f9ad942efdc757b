//! HTTP dispatch
//!
//! Sends exactly one request per call and hands back the whole body together
//! with the declared content type. Nothing here retries; transport failures
//! go straight back to the caller.
//!
//! # design principles
//! - **One request, fully buffered** - bodies are small XML/JSON documents or
//!   zone files, so the body is read into memory before any decoding
//! - **Classification by header only** - the body is never sniffed
//! - **Decoding is the caller's choice** - the target type is picked per
//!   operation through [`FromResponse`]

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method};

use crate::config::ClientConfig;
use crate::decode::{BodyFormat, FromResponse, decode_error, decode_success};
use crate::error::{ClientError, Result};
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

/// Content type of an outgoing request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestContentType {
    /// `application/x-www-form-urlencoded`, used by the token endpoint.
    Form,
    /// `text/plain; charset=UTF-8`.
    Text,
    /// `text/xml; charset=UTF-8`.
    Xml,
}

impl RequestContentType {
    pub fn header_value(self) -> &'static str {
        match self {
            Self::Form => "application/x-www-form-urlencoded",
            Self::Text => "text/plain; charset=UTF-8",
            Self::Xml => "text/xml; charset=UTF-8",
        }
    }
}

/// One API call: method, absolute path below the host, and optional body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub content_type: RequestContentType,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, content_type: RequestContentType) -> Self {
        Self {
            method,
            path: path.into(),
            content_type,
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A decoded 2xx response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: T,
}

/// A response as received, before status and content type are interpreted.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Declared `Content-Type`, empty when absent or not valid text.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    pub fn format(&self) -> BodyFormat {
        BodyFormat::classify(self.content_type())
    }

    /// Apply the status policy: any status outside 200–299 is an error decoded
    /// from the body, everything else is decoded into `T`.
    pub fn into_api_response<T: FromResponse>(self) -> Result<ApiResponse<T>> {
        let format = self.format();
        if !(200..300).contains(&self.status) {
            let err = decode_error(self.status, format, &self.body);
            log::debug!("[nicdns] Request failed: {err}");
            return Err(err);
        }
        let body = decode_success(self.status, format, self.body)?;
        Ok(ApiResponse {
            status: self.status,
            headers: self.headers,
            body,
        })
    }
}

/// Sends requests to the API host.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
    base_url: String,
}

impl HttpDispatcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ClientError::ConfigError {
            detail: format!("Failed to create HTTP client: {e}"),
        })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Performs one HTTP request and reads the whole response.
    ///
    /// # Arguments
    /// * `request` - method, path, content type and body
    /// * `bearer` - access token for the `Authorization` header; `None` for
    ///   the token request itself
    ///
    /// # Returns
    /// * `Ok(RawResponse)` - whatever the server answered, any status
    /// * `Err(ClientError::NetworkError | ClientError::Timeout)` - transport failure
    pub(crate) async fn execute(
        &self,
        request: ApiRequest,
        bearer: Option<&str>,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        log::debug!(
            "[nicdns] {} {url} (auth: {})",
            request.method,
            bearer.map_or_else(|| "none".to_string(), mask_secret)
        );

        let mut builder = self
            .client
            .request(request.method, &url)
            .header(CONTENT_TYPE, request.content_type.header_value());
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        log::debug!("[nicdns] Response Status: {status}");

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?
            .to_vec();

        log::debug!(
            "[nicdns] Response Body: {}",
            truncate_for_log(&String::from_utf8_lossy(&body))
        );

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout {
            detail: e.to_string(),
        }
    } else {
        ClientError::NetworkError {
            detail: e.to_string(),
        }
    }
}
