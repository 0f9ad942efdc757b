use serde::{Deserialize, Serialize};

use crate::decode::BodyFormat;

/// One entry of an API error report.
///
/// The DNS-master API reports failures as a list of `<error code="…">`
/// elements, optionally followed by a `<validator-output>` explaining what the
/// zone validator rejected. The OAuth endpoint reports a single JSON `error`
/// string, which becomes one entry without a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorEntry {
    /// Human readable description.
    pub description: String,
    /// Numeric error code as sent by the service, if any.
    pub code: Option<String>,
    /// Validator output attached to this entry, if any.
    pub validator_output: Option<String>,
}

impl ApiErrorEntry {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: None,
            validator_output: None,
        }
    }

    pub fn with_code(description: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: Some(code.into()),
            validator_output: None,
        }
    }
}

impl std::fmt::Display for ApiErrorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)?;
        if let Some(validator) = self.validator_output.as_deref().filter(|v| !v.is_empty()) {
            write!(f, ", validator-output: {validator}")?;
        }
        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }
        Ok(())
    }
}

/// Structured error decoded from a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Value of the `<status>` element of an XML error document (usually `fail`).
    pub status_text: Option<String>,
    /// Error entries in document order.
    pub entries: Vec<ApiErrorEntry>,
}

impl ApiError {
    /// Returns `true` if any entry carries the given error code.
    pub fn has_code(&self, code: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.code.as_deref() == Some(code))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP status: {}", self.status)?;
        if self.entries.is_empty() {
            if let Some(status_text) = &self.status_text {
                write!(f, ", status: {status_text}")?;
            }
            return Ok(());
        }
        f.write_str(", errors: ")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Unified error type for every client operation.
///
/// Nothing in the client retries on its own: every variant reaches the caller
/// of the operation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ClientError {
    /// Connection, DNS resolution or TLS failure, or the body could not be read.
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The service answered with a non-2xx status and a decodable error body.
    Api(ApiError),

    /// The service answered with a non-2xx status whose content type has no
    /// error decoder.
    UnsupportedErrorContentType {
        /// HTTP status code.
        status: u16,
        /// Declared `Content-Type` header value.
        content_type: String,
        /// Raw response body.
        body: String,
    },

    /// A 2xx response declared a content type that cannot be decoded.
    UnsupportedContentType {
        /// HTTP status code.
        status: u16,
        /// Declared `Content-Type` header value.
        content_type: String,
    },

    /// A response body could not be decoded in its declared format.
    ParseError {
        /// Format the body was declared as.
        format: BodyFormat,
        /// Details about the parse failure.
        detail: String,
    },

    /// A request body could not be serialized.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// The credentials file could not be read or parsed.
    CredentialsError {
        /// Path of the credentials file.
        path: String,
        /// Error details.
        detail: String,
    },

    /// A token store failed to load or save a token.
    TokenStoreError {
        /// Error details.
        detail: String,
    },

    /// The HTTP client could not be constructed.
    ConfigError {
        /// Error details.
        detail: String,
    },

    /// An operation was invoked with arguments it cannot be sent with.
    /// Nothing was sent.
    InvalidRequest {
        /// Name of the operation.
        operation: String,
        /// Error details.
        detail: String,
    },
}

impl ClientError {
    /// HTTP status of the response that produced this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(api) => Some(api.status),
            Self::UnsupportedErrorContentType { status, .. }
            | Self::UnsupportedContentType { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the decoded API error, if this is one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            _ => None,
        }
    }

    pub(crate) fn parse(format: BodyFormat, detail: impl ToString) -> Self {
        Self::ParseError {
            format,
            detail: detail.to_string(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::Api(api) => write!(f, "{api}"),
            Self::UnsupportedErrorContentType {
                status,
                content_type,
                body,
            } => write!(
                f,
                "error body content type {content_type} not supported. HTTP status: {status}, body: {body}"
            ),
            Self::UnsupportedContentType {
                status,
                content_type,
            } => write!(
                f,
                "body content type {content_type} not supported. HTTP status: {status}"
            ),
            Self::ParseError { format, detail } => {
                write!(f, "Parse error ({format}): {detail}")
            }
            Self::SerializationError { detail } => write!(f, "Serialization error: {detail}"),
            Self::CredentialsError { path, detail } => {
                write!(f, "Failed to load credentials from {path}: {detail}")
            }
            Self::TokenStoreError { detail } => write!(f, "Token store error: {detail}"),
            Self::ConfigError { detail } => write!(f, "Configuration error: {detail}"),
            Self::InvalidRequest { operation, detail } => {
                write!(f, "Invalid {operation} request: {detail}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ApiError> for ClientError {
    fn from(api: ApiError) -> Self {
        Self::Api(api)
    }
}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;
