//! Wire documents of the zone-management API.
//!
//! Every response is wrapped in `<response><status/><data>…</data></response>`;
//! only the `data` part is modelled. Unknown elements and attributes are
//! ignored.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::BodyFormat;
use crate::error::{ClientError, Result};
use crate::types::{DomainZone, RecordData, SoaData, ZoneRecord, ZoneRevision};

/// Prolog prepended to XML request documents.
pub(crate) const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>"#;

// ============ Auth ============

/// Token endpoint answer.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: String,
}

// ============ Default TTL ============

#[derive(Debug, Deserialize)]
pub(crate) struct TtlResponse {
    pub data: TtlData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TtlData {
    #[serde(rename = "default-ttl")]
    pub default_ttl: u32,
}

/// Body of a default TTL update, root element `request`.
#[derive(Debug, Serialize)]
pub(crate) struct TtlRequest {
    #[serde(rename = "default-ttl")]
    pub default_ttl: u32,
}

// ============ Zones & Revisions ============

#[derive(Debug, Deserialize)]
pub(crate) struct ZonesResponse {
    #[serde(default)]
    pub data: ZonesData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ZonesData {
    #[serde(default, rename = "zone")]
    pub zones: Vec<DomainZone>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevisionsResponse {
    #[serde(default)]
    pub data: RevisionsData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RevisionsData {
    #[serde(default, rename = "revision")]
    pub revisions: Vec<ZoneRevision>,
}

// ============ Records ============

#[derive(Debug, Deserialize)]
pub(crate) struct RecordsResponse {
    #[serde(default)]
    pub data: RecordsData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordsData {
    #[serde(default)]
    pub zone: RecordsZone,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordsZone {
    #[serde(default)]
    pub rr: Vec<RawRecord>,
}

/// A host name element, `<name>` plus optional `<idn-name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RawName {
    #[serde(default)]
    pub name: String,
    #[serde(
        rename = "idn-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub idn_name: Option<String>,
}

impl RawName {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            idn_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RawSoa {
    #[serde(default)]
    pub mname: RawName,
    #[serde(default)]
    pub rname: RawName,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub refresh: String,
    #[serde(default)]
    pub retry: String,
    #[serde(default)]
    pub expire: String,
    #[serde(default)]
    pub minimum: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RawMx {
    #[serde(default)]
    pub preference: String,
    #[serde(default)]
    pub exchange: RawName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RawSrv {
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub target: RawName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RawTxt {
    #[serde(default, rename = "string")]
    pub strings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RawHinfo {
    #[serde(default)]
    pub hardware: String,
    #[serde(default)]
    pub os: String,
}

/// The flat `<rr>` element: one optional child per record kind.
///
/// Field order is the element order the service expects on submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(
        rename = "idn-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub idn_name: Option<String>,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aaaa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soa: Option<RawSoa>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<RawName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<RawName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mx: Option<RawMx>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srv: Option<RawSrv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptr: Option<RawName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txt: Option<RawTxt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dname: Option<RawName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hinfo: Option<RawHinfo>,
}

fn number<T: FromStr>(field: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        ClientError::parse(
            BodyFormat::Xml,
            format!("invalid {field} value '{value}': {e}"),
        )
    })
}

fn missing(record_type: &str, element: &str) -> ClientError {
    ClientError::parse(
        BodyFormat::Xml,
        format!("{record_type} record without <{element}>"),
    )
}

impl RawRecord {
    fn into_data(self) -> Result<RecordData> {
        let tag = self.record_type.to_ascii_uppercase();
        let data = match tag.as_str() {
            "SOA" => {
                let soa = self.soa.ok_or_else(|| missing(&tag, "soa"))?;
                RecordData::SOA(SoaData {
                    mname: soa.mname.name,
                    rname: soa.rname.name,
                    serial: number("serial", &soa.serial)?,
                    refresh: number("refresh", &soa.refresh)?,
                    retry: number("retry", &soa.retry)?,
                    expire: number("expire", &soa.expire)?,
                    minimum: number("minimum", &soa.minimum)?,
                })
            }
            "A" => RecordData::A {
                address: self.a.ok_or_else(|| missing(&tag, "a"))?,
            },
            "AAAA" => RecordData::AAAA {
                address: self.aaaa.ok_or_else(|| missing(&tag, "aaaa"))?,
            },
            "CNAME" => RecordData::CNAME {
                target: self.cname.ok_or_else(|| missing(&tag, "cname"))?.name,
            },
            "NS" => RecordData::NS {
                nameserver: self.ns.ok_or_else(|| missing(&tag, "ns"))?.name,
            },
            "MX" => {
                let mx = self.mx.ok_or_else(|| missing(&tag, "mx"))?;
                RecordData::MX {
                    preference: number("preference", &mx.preference)?,
                    exchange: mx.exchange.name,
                }
            }
            "SRV" => {
                let srv = self.srv.ok_or_else(|| missing(&tag, "srv"))?;
                RecordData::SRV {
                    priority: number("priority", &srv.priority)?,
                    weight: number("weight", &srv.weight)?,
                    port: number("port", &srv.port)?,
                    target: srv.target.name,
                }
            }
            "PTR" => RecordData::PTR {
                target: self.ptr.ok_or_else(|| missing(&tag, "ptr"))?.name,
            },
            "TXT" => RecordData::TXT {
                strings: self.txt.unwrap_or_default().strings,
            },
            "DNAME" => RecordData::DNAME {
                target: self.dname.ok_or_else(|| missing(&tag, "dname"))?.name,
            },
            "HINFO" => {
                let hinfo = self.hinfo.ok_or_else(|| missing(&tag, "hinfo"))?;
                RecordData::HINFO {
                    hardware: hinfo.hardware,
                    os: hinfo.os,
                }
            }
            _ => RecordData::Other {
                record_type: self.record_type,
            },
        };
        Ok(data)
    }
}

impl TryFrom<RawRecord> for ZoneRecord {
    type Error = ClientError;

    fn try_from(raw: RawRecord) -> Result<Self> {
        let id = raw.id.clone();
        let name = raw.name.clone();
        let idn_name = raw.idn_name.clone();
        let ttl = raw.ttl.clone();
        let data = raw.into_data()?;
        Ok(ZoneRecord {
            id,
            name,
            idn_name,
            ttl,
            data,
        })
    }
}

impl From<&ZoneRecord> for RawRecord {
    fn from(record: &ZoneRecord) -> Self {
        let mut raw = RawRecord {
            id: record.id.clone(),
            name: record.name.clone(),
            idn_name: record.idn_name.clone(),
            record_type: record.data.type_tag().to_string(),
            ttl: record.ttl.clone(),
            ..RawRecord::default()
        };
        match &record.data {
            RecordData::SOA(soa) => {
                raw.soa = Some(RawSoa {
                    mname: RawName::new(&soa.mname),
                    rname: RawName::new(&soa.rname),
                    serial: soa.serial.to_string(),
                    refresh: soa.refresh.to_string(),
                    retry: soa.retry.to_string(),
                    expire: soa.expire.to_string(),
                    minimum: soa.minimum.to_string(),
                });
            }
            RecordData::A { address } => raw.a = Some(address.clone()),
            RecordData::AAAA { address } => raw.aaaa = Some(address.clone()),
            RecordData::CNAME { target } => raw.cname = Some(RawName::new(target)),
            RecordData::NS { nameserver } => raw.ns = Some(RawName::new(nameserver)),
            RecordData::MX {
                preference,
                exchange,
            } => {
                raw.mx = Some(RawMx {
                    preference: preference.to_string(),
                    exchange: RawName::new(exchange),
                });
            }
            RecordData::SRV {
                priority,
                weight,
                port,
                target,
            } => {
                raw.srv = Some(RawSrv {
                    priority: priority.to_string(),
                    weight: weight.to_string(),
                    port: port.to_string(),
                    target: RawName::new(target),
                });
            }
            RecordData::PTR { target } => raw.ptr = Some(RawName::new(target)),
            RecordData::TXT { strings } => {
                raw.txt = Some(RawTxt {
                    strings: strings.clone(),
                });
            }
            RecordData::DNAME { target } => raw.dname = Some(RawName::new(target)),
            RecordData::HINFO { hardware, os } => {
                raw.hinfo = Some(RawHinfo {
                    hardware: hardware.clone(),
                    os: os.clone(),
                });
            }
            RecordData::Other { .. } => {}
        }
        raw
    }
}

// ============ Add records request ============

#[derive(Debug, Serialize)]
struct RrList {
    rr: Vec<RawRecord>,
}

#[derive(Debug, Serialize)]
struct AddRecordsDocument {
    #[serde(rename = "rr-list")]
    rr_list: RrList,
}

/// Records to add to a zone in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRecordsRequest {
    pub records: Vec<ZoneRecord>,
}

impl AddRecordsRequest {
    pub fn new(records: Vec<ZoneRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn with_record(mut self, record: ZoneRecord) -> Self {
        self.records.push(record);
        self
    }

    /// The submitted document: XML prolog followed by
    /// `<request><rr-list><rr>…</rr></rr-list></request>`.
    pub fn to_xml(&self) -> Result<String> {
        let document = AddRecordsDocument {
            rr_list: RrList {
                rr: self.records.iter().map(RawRecord::from).collect(),
            },
        };
        let body = quick_xml::se::to_string_with_root("request", &document).map_err(|e| {
            ClientError::SerializationError {
                detail: e.to_string(),
            }
        })?;
        Ok(format!("{XML_HEADER}{body}"))
    }
}

impl From<Vec<ZoneRecord>> for AddRecordsRequest {
    fn from(records: Vec<ZoneRecord>) -> Self {
        Self::new(records)
    }
}
