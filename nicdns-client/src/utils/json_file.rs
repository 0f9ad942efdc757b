//! JSON file helpers
//!
//! Both the credentials file and the token cache are plain JSON documents.
//! Files edited on Windows often start with a UTF-8 byte order mark, which
//! `serde_json` rejects, so it is stripped before parsing. Written files use
//! tab indentation.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Parse JSON bytes, tolerating a leading UTF-8 byte order mark.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    serde_json::from_slice(bytes)
}

/// Serialize to tab-indented JSON.
pub fn to_indented_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Read and parse a JSON file synchronously.
///
/// Errors are flattened to strings; callers attach the path and decide how
/// fatal a failure is.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    from_json_bytes(&bytes).map_err(|e| e.to_string())
}
