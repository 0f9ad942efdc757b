//! Response decoding
//!
//! A response body is routed to a decoder purely by its declared
//! `Content-Type`. [`BodyFormat::classify`] turns the header into a closed set
//! of formats and every consumer matches on it exhaustively, so an unknown
//! content type can only ever surface as an error.
//!
//! Success bodies are decoded into whatever the caller asked for through the
//! [`FromResponse`] trait. Error bodies are always decoded into an
//! [`ApiError`].

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiErrorEntry, ClientError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_XML: &str = "text/xml";
const CONTENT_TYPE_XML_APP: &str = "application/xml";
const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Body format derived from a response's `Content-Type` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyFormat {
    Json,
    Xml,
    Text,
    /// Anything else, carrying the header value as received.
    Unsupported(String),
}

impl BodyFormat {
    /// Classify a `Content-Type` header value by substring match.
    ///
    /// JSON is checked first, then XML, then plain text. Parameters such as
    /// `charset` are irrelevant to the match.
    pub fn classify(content_type: &str) -> Self {
        let lowered = content_type.to_ascii_lowercase();
        if lowered.contains(CONTENT_TYPE_JSON) {
            Self::Json
        } else if lowered.contains(CONTENT_TYPE_XML) || lowered.contains(CONTENT_TYPE_XML_APP) {
            Self::Xml
        } else if lowered.contains(CONTENT_TYPE_TEXT) {
            Self::Text
        } else {
            Self::Unsupported(content_type.to_string())
        }
    }
}

impl std::fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Xml => f.write_str("xml"),
            Self::Text => f.write_str("text"),
            Self::Unsupported(content_type) => write!(f, "unsupported: {content_type}"),
        }
    }
}

/// Shape of a successful response body as an operation declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    None,
    Text,
    Bytes,
    Json,
    Xml,
}

/// A value that can be produced from a successful response body.
///
/// Implemented for `()` (body discarded), `String` and `Vec<u8>` (plain text
/// copied verbatim) and [`Structured<T>`] (JSON or XML deserialization).
pub trait FromResponse: Sized {
    /// Whether this target decodes bodies of the given declared shape.
    fn accepts(shape: ResponseShape) -> bool {
        let _ = shape;
        false
    }

    /// Returns a value without looking at the body, for targets that ignore it.
    fn without_body() -> Option<Self> {
        None
    }

    fn from_json(body: &[u8]) -> Result<Self> {
        let _ = body;
        Err(ClientError::parse(
            BodyFormat::Json,
            "JSON body cannot be decoded into this target",
        ))
    }

    fn from_xml(body: &[u8]) -> Result<Self> {
        let _ = body;
        Err(ClientError::parse(
            BodyFormat::Xml,
            "XML body cannot be decoded into this target",
        ))
    }

    fn from_text(body: Vec<u8>) -> Result<Self> {
        let _ = body;
        Err(ClientError::parse(
            BodyFormat::Text,
            "plain text body can only be decoded into a string or byte sequence",
        ))
    }
}

impl FromResponse for () {
    fn accepts(shape: ResponseShape) -> bool {
        shape == ResponseShape::None
    }

    fn without_body() -> Option<Self> {
        Some(())
    }
}

impl FromResponse for String {
    fn accepts(shape: ResponseShape) -> bool {
        shape == ResponseShape::Text
    }

    fn from_text(body: Vec<u8>) -> Result<Self> {
        String::from_utf8(body).map_err(|e| ClientError::parse(BodyFormat::Text, e))
    }
}

impl FromResponse for Vec<u8> {
    fn accepts(shape: ResponseShape) -> bool {
        shape == ResponseShape::Bytes
    }

    fn from_text(body: Vec<u8>) -> Result<Self> {
        Ok(body)
    }
}

/// Target wrapper for bodies deserialized structurally with serde.
///
/// The same `T` is decoded from JSON or XML depending on what the service
/// declared, which mirrors how the API answers with either format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structured<T>(pub T);

impl<T> Structured<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> FromResponse for Structured<T> {
    fn accepts(shape: ResponseShape) -> bool {
        matches!(shape, ResponseShape::Json | ResponseShape::Xml)
    }

    fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map(Structured)
            .map_err(|e| log_parse_failure(BodyFormat::Json, body, e))
    }

    fn from_xml(body: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(body).map_err(|e| ClientError::parse(BodyFormat::Xml, e))?;
        quick_xml::de::from_str(text)
            .map(Structured)
            .map_err(|e| log_parse_failure(BodyFormat::Xml, body, e))
    }
}

fn log_parse_failure(format: BodyFormat, body: &[u8], err: impl std::fmt::Display) -> ClientError {
    log::error!("[nicdns] {format} parse failed: {err}");
    log::error!(
        "[nicdns] Raw response: {}",
        truncate_for_log(&String::from_utf8_lossy(body))
    );
    ClientError::parse(format, err)
}

/// Decode a 2xx body into `T`.
pub(crate) fn decode_success<T: FromResponse>(
    status: u16,
    format: BodyFormat,
    body: Vec<u8>,
) -> Result<T> {
    if let Some(value) = T::without_body() {
        return Ok(value);
    }
    match format {
        BodyFormat::Json => T::from_json(&body),
        BodyFormat::Xml => T::from_xml(&body),
        BodyFormat::Text => T::from_text(body),
        BodyFormat::Unsupported(content_type) => Err(ClientError::UnsupportedContentType {
            status,
            content_type,
        }),
    }
}

/// Decode a non-2xx body into the error the caller receives.
pub(crate) fn decode_error(status: u16, format: BodyFormat, body: &[u8]) -> ClientError {
    let decoded = match format {
        BodyFormat::Json => parse_json_error(status, body),
        BodyFormat::Xml => parse_xml_error(status, body),
        BodyFormat::Text => return unsupported_error(status, CONTENT_TYPE_TEXT.to_string(), body),
        BodyFormat::Unsupported(content_type) => {
            return unsupported_error(status, content_type, body);
        }
    };
    match decoded {
        Ok(api) => ClientError::Api(api),
        Err(e) => e,
    }
}

fn unsupported_error(status: u16, content_type: String, body: &[u8]) -> ClientError {
    ClientError::UnsupportedErrorContentType {
        status,
        content_type,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

/// OAuth / JSON error body: `{"error": "...", "error_description": "..."}`.
#[derive(Debug, Deserialize)]
struct JsonErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

fn parse_json_error(status: u16, body: &[u8]) -> Result<ApiError> {
    let parsed: JsonErrorBody =
        serde_json::from_slice(body).map_err(|e| log_parse_failure(BodyFormat::Json, body, e))?;
    let description = match parsed.error_description.filter(|d| !d.is_empty()) {
        Some(detail) if !parsed.error.is_empty() => format!("{}: {detail}", parsed.error),
        Some(detail) => detail,
        None => parsed.error,
    };
    Ok(ApiError {
        status,
        status_text: None,
        entries: vec![ApiErrorEntry::new(description)],
    })
}

/// An `<error>` element that is still open while walking the document.
#[derive(Default)]
struct OpenError {
    code: Option<String>,
    text: String,
    has_child_error: bool,
}

/// Element whose text is currently being collected.
enum Capture {
    None,
    Status,
    Validator,
}

/// Walk an XML error document and collect every `<error>` entry.
///
/// Accepts both the flat `<errors><error code="N">text</error></errors>`
/// layout and the wrapped `<errors><error><error code="N">…` one: an
/// `<error>` that only wraps another `<error>` does not produce an entry of
/// its own. A `<validator-output>` attaches to the entry it follows.
fn parse_xml_error(status: u16, body: &[u8]) -> Result<ApiError> {
    let text = std::str::from_utf8(body).map_err(|e| ClientError::parse(BodyFormat::Xml, e))?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut open: Vec<OpenError> = Vec::new();
    let mut entries: Vec<ApiErrorEntry> = Vec::new();
    let mut pending_validator: Option<String> = None;
    let mut status_text: Option<String> = None;
    let mut capture = Capture::None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"error" => {
                    if let Some(parent) = open.last_mut() {
                        parent.has_child_error = true;
                    }
                    open.push(OpenError {
                        code: error_code(&e),
                        ..OpenError::default()
                    });
                }
                b"status" => capture = Capture::Status,
                b"validator-output" => capture = Capture::Validator,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"error" => {
                if let Some(parent) = open.last_mut() {
                    parent.has_child_error = true;
                }
                if let Some(code) = error_code(&e) {
                    push_entry(
                        &mut entries,
                        &mut pending_validator,
                        ApiErrorEntry {
                            description: String::new(),
                            code: Some(code),
                            validator_output: None,
                        },
                    );
                }
            }
            Ok(Event::Text(t)) => {
                let value = t
                    .unescape()
                    .map_err(|e| ClientError::parse(BodyFormat::Xml, e))?;
                match capture {
                    Capture::Status => status_text = Some(value.into_owned()),
                    Capture::Validator => attach_validator(
                        &mut entries,
                        &mut pending_validator,
                        value.into_owned(),
                    ),
                    Capture::None => {
                        if let Some(current) = open.last_mut() {
                            current.text.push_str(&value);
                        }
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if let (Capture::None, Some(current)) = (&capture, open.last_mut()) {
                    current.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"error" => {
                    let Some(closed) = open.pop() else {
                        continue;
                    };
                    let description = closed.text.trim().to_string();
                    if closed.has_child_error && closed.code.is_none() && description.is_empty() {
                        continue;
                    }
                    push_entry(
                        &mut entries,
                        &mut pending_validator,
                        ApiErrorEntry {
                            description,
                            code: closed.code,
                            validator_output: None,
                        },
                    );
                }
                b"status" | b"validator-output" => capture = Capture::None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(log_parse_failure(BodyFormat::Xml, body, e)),
            _ => {}
        }
    }

    Ok(ApiError {
        status,
        status_text,
        entries,
    })
}

fn error_code(element: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .filter_map(std::result::Result::ok)
        .find(|attr| attr.key.as_ref() == b"code")
        .and_then(|attr| attr.unescape_value().ok().map(Cow::into_owned))
}

fn push_entry(
    entries: &mut Vec<ApiErrorEntry>,
    pending_validator: &mut Option<String>,
    mut entry: ApiErrorEntry,
) {
    if entry.validator_output.is_none() {
        entry.validator_output = pending_validator.take();
    }
    entries.push(entry);
}

fn attach_validator(
    entries: &mut [ApiErrorEntry],
    pending_validator: &mut Option<String>,
    output: String,
) {
    match entries.last_mut() {
        Some(last) if last.validator_output.is_none() => last.validator_output = Some(output),
        _ => *pending_validator = Some(output),
    }
}
