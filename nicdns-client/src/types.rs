use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::utils::json_file::load_json_file;
use crate::utils::log_sanitizer::mask_secret;

/// Default credentials file name, resolved against the working directory.
pub const DEFAULT_AUTH_FILE: &str = "nicdns_auth.json";

// ============ Credentials ============

/// Long-lived application and account credentials.
///
/// The application pair (`app_login`/`app_pwd`) is issued when an OAuth
/// application is registered; the contract pair is the account login used
/// for the password grant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// OAuth `client_id`.
    pub app_login: String,
    /// OAuth `client_secret`.
    pub app_pwd: String,
    /// Account login, sent as `username`.
    pub contract_login: String,
    /// Account password, sent as `password`.
    pub contract_pwd: String,
}

impl Credentials {
    pub fn new(
        app_login: impl Into<String>,
        app_pwd: impl Into<String>,
        contract_login: impl Into<String>,
        contract_pwd: impl Into<String>,
    ) -> Self {
        Self {
            app_login: app_login.into(),
            app_pwd: app_pwd.into(),
            contract_login: contract_login.into(),
            contract_pwd: contract_pwd.into(),
        }
    }

    /// Load credentials from a JSON file, [`DEFAULT_AUTH_FILE`] when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        AuthFile::load(path).map(|file| file.credentials)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_login", &self.app_login)
            .field("app_pwd", &mask_secret(&self.app_pwd))
            .field("contract_login", &self.contract_login)
            .field("contract_pwd", &mask_secret(&self.contract_pwd))
            .finish()
    }
}

/// Contents of a credentials file.
///
/// Besides the credentials themselves the file may name the service and zone
/// to manage, which is how scripts usually keep everything in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthFile {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl AuthFile {
    /// Load a credentials file, [`DEFAULT_AUTH_FILE`] when `path` is `None`.
    ///
    /// A leading UTF-8 byte order mark is tolerated. Any failure is fatal: the
    /// client cannot authenticate without these values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_AUTH_FILE));
        load_json_file(path).map_err(|detail| ClientError::CredentialsError {
            path: path.display().to_string(),
            detail,
        })
    }
}

// ============ Token State ============

/// Cached OAuth access token with its issuance time and lifetime.
///
/// Serialized as-is into the token cache, so the field names follow the
/// OAuth response (`access_token`, `expires_in`, `refresh_token`) plus
/// `token_time`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    #[serde(default)]
    pub access_token: String,
    /// Lifetime in seconds; `0` means the token does not expire.
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: String,
    /// When the login that produced this token was started.
    #[serde(default, with = "crate::utils::datetime")]
    pub token_time: DateTime<Utc>,
    /// Grant type used for the login.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub grant_type: String,
    /// Scope requested at login.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
}

impl TokenState {
    /// An empty token stamped with `now`, the starting point of every login.
    pub fn issued_at(now: DateTime<Utc>) -> Self {
        Self {
            token_time: now,
            ..Self::default()
        }
    }

    /// Expiry instant, or `None` for a non-expiring token.
    ///
    /// A lifetime too large to represent is treated as non-expiring.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires_in == 0 {
            return None;
        }
        let secs = i64::try_from(self.expires_in).ok()?;
        TimeDelta::try_seconds(secs).and_then(|lifetime| self.token_time.checked_add_signed(lifetime))
    }

    /// A token is usable while it is non-empty and `token_time + expires_in > now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        self.expires_at().is_none_or(|expiry| expiry > now)
    }
}

/// Identifies the cached token shared by every client of one service/zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenCacheKey {
    pub service: String,
    pub zone: String,
}

impl TokenCacheKey {
    pub fn new(service: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            zone: zone.into(),
        }
    }

    /// Cache file name, `~{service}-{zone}.json`.
    pub fn file_name(&self) -> String {
        format!("~{}-{}.json", self.service, self.zone)
    }
}

impl std::fmt::Display for TokenCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.service, self.zone)
    }
}

// ============ Zones & Revisions ============

/// A DNS zone under a service, as listed by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainZone {
    #[serde(rename(deserialize = "@admin"), default)]
    pub admin: String,
    #[serde(rename(deserialize = "@enable"), default)]
    pub enable: bool,
    #[serde(rename(deserialize = "@has-changes"), default)]
    pub has_changes: bool,
    #[serde(rename(deserialize = "@has-primary"), default)]
    pub has_primary: bool,
    #[serde(rename(deserialize = "@id"), default)]
    pub id: String,
    #[serde(rename(deserialize = "@idn-name"), default)]
    pub idn_name: String,
    #[serde(rename(deserialize = "@name"), default)]
    pub name: String,
    #[serde(rename(deserialize = "@payer"), default)]
    pub payer: String,
    #[serde(rename(deserialize = "@service"), default)]
    pub service: String,
}

/// A saved snapshot of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRevision {
    /// Timestamp as sent by the service, e.g. `2013-04-01 18:36:57`.
    #[serde(rename(deserialize = "@date"), default)]
    pub date: String,
    /// Address the change was made from, or `no data`.
    #[serde(rename(deserialize = "@ip"), default)]
    pub ip: String,
    /// Revision number, increasing with every commit.
    #[serde(rename(deserialize = "@number"))]
    pub number: u64,
}

// ============ Zone Records ============

/// DNS record kinds the zone API manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    Soa,
    A,
    Aaaa,
    Cname,
    Ns,
    Mx,
    Srv,
    Ptr,
    Txt,
    Dname,
    Hinfo,
}

impl DnsRecordType {
    /// Upper-case type tag as used in `<type>` elements.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Soa => "SOA",
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Ns => "NS",
            Self::Mx => "MX",
            Self::Srv => "SRV",
            Self::Ptr => "PTR",
            Self::Txt => "TXT",
            Self::Dname => "DNAME",
            Self::Hinfo => "HINFO",
        }
    }

    /// Parse a type tag case-insensitively.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "SOA" => Some(Self::Soa),
            "A" => Some(Self::A),
            "AAAA" => Some(Self::Aaaa),
            "CNAME" => Some(Self::Cname),
            "NS" => Some(Self::Ns),
            "MX" => Some(Self::Mx),
            "SRV" => Some(Self::Srv),
            "PTR" => Some(Self::Ptr),
            "TXT" => Some(Self::Txt),
            "DNAME" => Some(Self::Dname),
            "HINFO" => Some(Self::Hinfo),
            _ => None,
        }
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SOA record fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaData {
    /// Primary name server.
    pub mname: String,
    /// Responsible mailbox, in domain-name form.
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// Type-safe representation of record data.
///
/// Each variant carries the fields specific to that record kind. Records of
/// a kind this client does not model are kept as [`RecordData::Other`] so
/// that listing a zone never fails on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum RecordData {
    SOA(SoaData),

    /// IPv4 address.
    A { address: String },

    /// IPv6 address.
    AAAA { address: String },

    CNAME { target: String },

    NS { nameserver: String },

    MX {
        /// Lower is preferred.
        preference: u16,
        exchange: String,
    },

    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },

    PTR { target: String },

    /// One or more character strings.
    TXT { strings: Vec<String> },

    DNAME { target: String },

    HINFO { hardware: String, os: String },

    /// A record kind without a dedicated variant.
    Other { record_type: String },
}

impl RecordData {
    /// Returns the [`DnsRecordType`] of this data, `None` for [`RecordData::Other`].
    pub fn record_type(&self) -> Option<DnsRecordType> {
        Some(match self {
            Self::SOA(_) => DnsRecordType::Soa,
            Self::A { .. } => DnsRecordType::A,
            Self::AAAA { .. } => DnsRecordType::Aaaa,
            Self::CNAME { .. } => DnsRecordType::Cname,
            Self::NS { .. } => DnsRecordType::Ns,
            Self::MX { .. } => DnsRecordType::Mx,
            Self::SRV { .. } => DnsRecordType::Srv,
            Self::PTR { .. } => DnsRecordType::Ptr,
            Self::TXT { .. } => DnsRecordType::Txt,
            Self::DNAME { .. } => DnsRecordType::Dname,
            Self::HINFO { .. } => DnsRecordType::Hinfo,
            Self::Other { .. } => return None,
        })
    }

    /// Type tag as sent in `<type>`.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Other { record_type } => record_type.as_str(),
            known => known.record_type().map_or("", DnsRecordType::as_str),
        }
    }

    /// Primary value for display (address, target host, first TXT string…).
    pub fn display_value(&self) -> &str {
        match self {
            Self::SOA(soa) => &soa.mname,
            Self::A { address } | Self::AAAA { address } => address,
            Self::CNAME { target }
            | Self::PTR { target }
            | Self::DNAME { target }
            | Self::SRV { target, .. } => target,
            Self::NS { nameserver } => nameserver,
            Self::MX { exchange, .. } => exchange,
            Self::TXT { strings } => strings.first().map_or("", String::as_str),
            Self::HINFO { hardware, .. } => hardware,
            Self::Other { .. } => "",
        }
    }
}

/// A resource record of a zone.
///
/// Records read from the service carry their `id`; records built for
/// submission leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owner name, `@` for the zone apex.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idn_name: Option<String>,
    /// TTL exactly as sent by the service; `None` uses the zone default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    pub data: RecordData,
}

impl ZoneRecord {
    /// A new record for submission.
    pub fn new(name: impl Into<String>, data: RecordData) -> Self {
        Self {
            id: None,
            name: name.into(),
            idn_name: None,
            ttl: None,
            data,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl.to_string());
        self
    }
}
