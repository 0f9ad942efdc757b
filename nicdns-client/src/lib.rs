//! # nicdns-client
//!
//! Client library for the nic.ru DNS-master zone management API.
//!
//! The API authenticates with an OAuth2 password grant and answers in JSON,
//! XML or plain text depending on the endpoint and the status. This crate
//! takes care of the token lifecycle, dispatches each call and decodes the
//! answer by its declared content type.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* - Use the platform's native TLS implementation.
//! - **`rustls`** - Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nicdns_client::{AddRecordsRequest, Credentials, DnsManager, RecordData, ZoneRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::load(None)?;
//!     let manager = DnsManager::new(credentials, "MYSERVICE", "example.ru")?;
//!
//!     println!("default TTL: {}", manager.get_default_ttl().await?);
//!
//!     for record in manager.list_records().await? {
//!         println!("{} {} {}", record.name, record.data.type_tag(), record.data.display_value());
//!     }
//!
//!     let request = AddRecordsRequest::default().with_record(
//!         ZoneRecord::new("www", RecordData::A { address: "192.0.2.1".to_string() }).with_ttl(300),
//!     );
//!     manager.add_records(&request).await?;
//!     manager.commit().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Tokens
//!
//! Access tokens are cached per service and zone through a [`TokenStore`].
//! The default [`FileTokenStore`] writes `~{service}-{zone}.json` in the
//! working directory, so separate processes managing the same zone share a
//! token. A token is refreshed when it is missing or
//! `token_time + expires_in` is not after the current time.
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ClientError>`](ClientError). Nothing is
//! retried:
//!
//! - [`ClientError::Api`] - non-2xx status with a decoded error list
//! - [`ClientError::UnsupportedErrorContentType`] - non-2xx with an undecodable body
//! - [`ClientError::UnsupportedContentType`] - 2xx with an unknown content type
//! - [`ClientError::NetworkError`] / [`ClientError::Timeout`] - transport failure

mod config;
mod decode;
mod error;
mod factory;
mod http_client;
mod manager;
mod token_store;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ApiError, ApiErrorEntry, ClientError, Result};

// Re-export configuration
pub use config::{
    ClientConfig, DEFAULT_API_ROOT, DEFAULT_AUTH_PATH, DEFAULT_BASE_URL, DEFAULT_GRANT_TYPE,
    DEFAULT_SCOPE,
};

// Re-export factory functions
pub use factory::{builder_from_file, create_manager_from_file};

// Re-export the manager and the operation catalog
pub use manager::{
    AddRecordsRequest, DnsManager, DnsManagerBuilder, Operation, PathTemplate, ResponseShape,
    catalog,
};

// Re-export dispatch and decoding types
pub use decode::{BodyFormat, FromResponse, Structured};
pub use http_client::{ApiRequest, ApiResponse, RequestContentType};

// Re-export token persistence
pub use token_store::{FileTokenStore, MemoryTokenStore};
pub use traits::{Clock, SystemClock, TokenStore};

// Re-export types
pub use types::{
    AuthFile, Credentials, DEFAULT_AUTH_FILE, DnsRecordType, DomainZone, RecordData, SoaData,
    TokenCacheKey, TokenState, ZoneRecord, ZoneRevision,
};

// Re-export utils module
pub use utils::datetime;
