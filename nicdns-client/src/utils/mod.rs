//! Utility modules.

/// Date/time serialization helpers for cached tokens.
pub mod datetime;

/// JSON file helpers for the credentials file and the token cache.
pub mod json_file;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
