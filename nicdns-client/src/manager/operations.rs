//! Operation catalog
//!
//! Each API operation is a constant [`Operation`] descriptor plus a thin
//! method on [`DnsManager`] that fills in the path and body and picks the
//! decode target. A target that does not decode the descriptor's
//! [`ResponseShape`] is rejected before anything is sent.

use reqwest::Method;

pub use crate::decode::ResponseShape;
use crate::decode::{FromResponse, Structured};
use crate::error::{ClientError, Result};
use crate::http_client::{ApiRequest, RequestContentType};
use crate::types::{DomainZone, ZoneRecord, ZoneRevision};

use super::DnsManager;
use super::types::{
    AddRecordsRequest, RecordsResponse, RevisionsResponse, TtlRequest, TtlResponse, ZonesResponse,
};

/// Where an operation's path points, relative to the API root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTemplate {
    /// `/services/{service}/zones`
    ServiceRoot,
    /// `/services/{service}/zones/{zone}` followed by a fixed suffix.
    Zone(&'static str),
    /// Like [`PathTemplate::Zone`] with a trailing `/{item}`.
    ZoneItem(&'static str),
}

/// Static description of one API operation.
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: &'static str,
    pub method: Method,
    pub path: PathTemplate,
    pub content_type: RequestContentType,
    pub response: ResponseShape,
}

impl Operation {
    /// Build the request path. Identifiers are substituted as given.
    ///
    /// [`PathTemplate::ZoneItem`] needs a non-empty `item`; other templates
    /// take none.
    pub fn path(
        &self,
        api_root: &str,
        service: &str,
        zone: &str,
        item: Option<&str>,
    ) -> Result<String> {
        let service_root = format!("{api_root}/services/{service}/zones");
        match (self.path, item) {
            (PathTemplate::ServiceRoot, None) => Ok(service_root),
            (PathTemplate::Zone(suffix), None) => Ok(format!("{service_root}/{zone}{suffix}")),
            (PathTemplate::ZoneItem(suffix), Some(item)) if !item.is_empty() => {
                Ok(format!("{service_root}/{zone}{suffix}/{item}"))
            }
            (PathTemplate::ZoneItem(_), _) => Err(self.invalid("an item identifier is required")),
            (_, Some(_)) => Err(self.invalid("the path takes no item identifier")),
        }
    }

    fn invalid(&self, detail: &str) -> ClientError {
        ClientError::InvalidRequest {
            operation: self.name.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Every operation the API offers.
pub mod catalog {
    use reqwest::Method;

    use super::{Operation, PathTemplate, ResponseShape};
    use crate::http_client::RequestContentType;

    pub const GET_DEFAULT_TTL: Operation = Operation {
        name: "get default TTL",
        method: Method::GET,
        path: PathTemplate::Zone("/default-ttl"),
        content_type: RequestContentType::Text,
        response: ResponseShape::Xml,
    };

    pub const SET_DEFAULT_TTL: Operation = Operation {
        name: "set default TTL",
        method: Method::POST,
        path: PathTemplate::Zone("/default-ttl"),
        content_type: RequestContentType::Xml,
        response: ResponseShape::None,
    };

    pub const LIST_ZONES: Operation = Operation {
        name: "list zones",
        method: Method::GET,
        path: PathTemplate::ServiceRoot,
        content_type: RequestContentType::Text,
        response: ResponseShape::Xml,
    };

    pub const GET_ZONE_FILE: Operation = Operation {
        name: "get zone file",
        method: Method::GET,
        path: PathTemplate::Zone(""),
        content_type: RequestContentType::Text,
        response: ResponseShape::Bytes,
    };

    pub const PUT_ZONE_FILE: Operation = Operation {
        name: "put zone file",
        method: Method::POST,
        path: PathTemplate::Zone(""),
        content_type: RequestContentType::Text,
        response: ResponseShape::None,
    };

    pub const ROLLBACK: Operation = Operation {
        name: "rollback",
        method: Method::POST,
        path: PathTemplate::Zone("/rollback"),
        content_type: RequestContentType::Text,
        response: ResponseShape::None,
    };

    pub const COMMIT: Operation = Operation {
        name: "commit",
        method: Method::POST,
        path: PathTemplate::Zone("/commit"),
        content_type: RequestContentType::Text,
        response: ResponseShape::None,
    };

    pub const LIST_REVISIONS: Operation = Operation {
        name: "list revisions",
        method: Method::GET,
        path: PathTemplate::Zone("/revisions"),
        content_type: RequestContentType::Text,
        response: ResponseShape::Xml,
    };

    pub const GET_REVISION: Operation = Operation {
        name: "get revision",
        method: Method::GET,
        path: PathTemplate::ZoneItem("/revisions"),
        content_type: RequestContentType::Text,
        response: ResponseShape::Text,
    };

    pub const SET_REVISION: Operation = Operation {
        name: "set revision",
        method: Method::POST,
        path: PathTemplate::ZoneItem("/revisions"),
        content_type: RequestContentType::Xml,
        response: ResponseShape::None,
    };

    pub const LIST_RECORDS: Operation = Operation {
        name: "list records",
        method: Method::GET,
        path: PathTemplate::Zone("/records"),
        content_type: RequestContentType::Text,
        response: ResponseShape::Xml,
    };

    pub const DELETE_RECORD: Operation = Operation {
        name: "delete record",
        method: Method::DELETE,
        path: PathTemplate::ZoneItem("/records"),
        content_type: RequestContentType::Text,
        response: ResponseShape::None,
    };

    /// Sent with a plain-text content type although the body is XML.
    pub const ADD_RECORDS: Operation = Operation {
        name: "add records",
        method: Method::PUT,
        path: PathTemplate::Zone("/records"),
        content_type: RequestContentType::Text,
        response: ResponseShape::None,
    };

    /// All descriptors, in API documentation order.
    pub const ALL: [Operation; 13] = [
        GET_DEFAULT_TTL,
        SET_DEFAULT_TTL,
        LIST_ZONES,
        GET_ZONE_FILE,
        PUT_ZONE_FILE,
        ROLLBACK,
        COMMIT,
        LIST_REVISIONS,
        GET_REVISION,
        SET_REVISION,
        LIST_RECORDS,
        DELETE_RECORD,
        ADD_RECORDS,
    ];
}

impl DnsManager {
    /// Request for `op` in this manager's service and zone.
    pub fn request_for(&self, op: &Operation, item: Option<&str>) -> Result<ApiRequest> {
        let path = op.path(&self.config.api_root, &self.service, &self.zone, item)?;
        Ok(ApiRequest::new(op.method.clone(), path, op.content_type))
    }

    async fn run<T: FromResponse>(
        &self,
        op: &Operation,
        item: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<T> {
        if !T::accepts(op.response) {
            return Err(op.invalid(&format!(
                "decode target does not match the {:?} response",
                op.response
            )));
        }
        let mut request = self.request_for(op, item)?;
        request.body = body;
        Ok(self.perform::<T>(request).await?.body)
    }

    /// Default TTL of the zone, in seconds.
    pub async fn get_default_ttl(&self) -> Result<u32> {
        let response: Structured<TtlResponse> =
            self.run(&catalog::GET_DEFAULT_TTL, None, None).await?;
        Ok(response.into_inner().data.default_ttl)
    }

    pub async fn set_default_ttl(&self, ttl: u32) -> Result<()> {
        let body = quick_xml::se::to_string_with_root("request", &TtlRequest { default_ttl: ttl })
            .map_err(|e| ClientError::SerializationError {
                detail: e.to_string(),
            })?;
        self.run(&catalog::SET_DEFAULT_TTL, None, Some(body.into_bytes()))
            .await
    }

    /// Zones of the service. The zone this manager is bound to is not used.
    pub async fn list_zones(&self) -> Result<Vec<DomainZone>> {
        let response: Structured<ZonesResponse> = self.run(&catalog::LIST_ZONES, None, None).await?;
        Ok(response.into_inner().data.zones)
    }

    /// Zone file in master-file format, as sent by the service.
    pub async fn get_zone_file(&self) -> Result<Vec<u8>> {
        self.run(&catalog::GET_ZONE_FILE, None, None).await
    }

    /// Replace the zone with a master file. Takes effect on [`commit`](Self::commit).
    pub async fn put_zone_file(&self, zone_file: impl Into<Vec<u8>>) -> Result<()> {
        self.run(&catalog::PUT_ZONE_FILE, None, Some(zone_file.into()))
            .await
    }

    /// Discard uncommitted changes.
    pub async fn rollback(&self) -> Result<()> {
        self.run(&catalog::ROLLBACK, None, None).await
    }

    /// Publish pending changes as a new revision.
    pub async fn commit(&self) -> Result<()> {
        self.run(&catalog::COMMIT, None, None).await
    }

    /// Saved revisions in the order the service lists them.
    pub async fn list_revisions(&self) -> Result<Vec<ZoneRevision>> {
        let response: Structured<RevisionsResponse> =
            self.run(&catalog::LIST_REVISIONS, None, None).await?;
        Ok(response.into_inner().data.revisions)
    }

    /// Zone file of revision `number`.
    pub async fn get_revision(&self, number: u64) -> Result<String> {
        let item = number.to_string();
        self.run(&catalog::GET_REVISION, Some(&item), None).await
    }

    /// Make revision `number` the current zone content.
    pub async fn set_revision(&self, number: u64) -> Result<()> {
        let item = number.to_string();
        self.run(&catalog::SET_REVISION, Some(&item), None).await
    }

    pub async fn list_records(&self) -> Result<Vec<ZoneRecord>> {
        let response: Structured<RecordsResponse> =
            self.run(&catalog::LIST_RECORDS, None, None).await?;
        response
            .into_inner()
            .data
            .zone
            .rr
            .into_iter()
            .map(ZoneRecord::try_from)
            .collect()
    }

    /// Delete one record by id. An empty id is rejected without a request.
    pub async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.run(&catalog::DELETE_RECORD, Some(record_id), None).await
    }

    /// Add records to the zone. Takes effect on [`commit`](Self::commit).
    pub async fn add_records(&self, records: &AddRecordsRequest) -> Result<()> {
        let body = records.to_xml()?;
        self.run(&catalog::ADD_RECORDS, None, Some(body.into_bytes()))
            .await
    }
}
