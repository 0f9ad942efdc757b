//! Manager construction from a credentials file.

use std::path::Path;

use crate::error::{ClientError, Result};
use crate::manager::{DnsManager, DnsManagerBuilder};
use crate::types::AuthFile;

/// Creates a [`DnsManager`] from a credentials file.
///
/// `path` defaults to [`DEFAULT_AUTH_FILE`](crate::DEFAULT_AUTH_FILE).
/// `service` and `zone` fall back to the values stored in the file.
///
/// # Examples
///
/// ```rust,no_run
/// use nicdns_client::create_manager_from_file;
///
/// # async fn run() -> nicdns_client::Result<()> {
/// let manager = create_manager_from_file(None, Some("MYSERVICE"), Some("example.ru"))?;
/// let ttl = manager.get_default_ttl().await?;
/// # Ok(())
/// # }
/// ```
pub fn create_manager_from_file(
    path: Option<&Path>,
    service: Option<&str>,
    zone: Option<&str>,
) -> Result<DnsManager> {
    builder_from_file(path, service, zone)?.build()
}

/// Like [`create_manager_from_file`], returning the builder for further setup.
pub fn builder_from_file(
    path: Option<&Path>,
    service: Option<&str>,
    zone: Option<&str>,
) -> Result<DnsManagerBuilder> {
    let file = AuthFile::load(path)?;
    let service = service
        .map(str::to_string)
        .or(file.service)
        .ok_or_else(|| missing_scope("service"))?;
    let zone = zone
        .map(str::to_string)
        .or(file.zone)
        .ok_or_else(|| missing_scope("zone"))?;
    Ok(DnsManager::builder(file.credentials, service, zone))
}

fn missing_scope(field: &str) -> ClientError {
    ClientError::ConfigError {
        detail: format!("no {field} given and none in the credentials file"),
    }
}
