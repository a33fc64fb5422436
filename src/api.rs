//! External call envelopes for the import and export operations.
//!
//! The engine is embedded by a caller-owned transport layer; these are the
//! JSON shapes it exchanges.  `success: false` with a top-level `error` is
//! produced only for pre-traversal validation failures — every per-node
//! failure rides inside `data.results.errors` with `success: true`, since
//! partial success is the expected common case for a large hierarchy.

use serde::{Deserialize, Serialize};

use crate::export::Exporter;
use crate::import::Importer;
use crate::model::HierarchyNode;
use crate::remote::RemoteOrgHost;
use crate::report::SyncReport;

/// Response envelope of an import call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HierarchyNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body of an export call.
///
/// `baseUrl` selects an enterprise-hosted deployment of the remote
/// platform; the caller applies it when constructing the client
/// ([`crate::client::GithubConfig::with_base_url`]) before invoking
/// [`run_export`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub hierarchy: Option<HierarchyNode>,
    #[serde(rename = "baseUrl", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Payload of a successful export call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub results: SyncReport,
}

/// Response envelope of an export call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ExportData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Import the remote topology into a tree snapshot.
pub async fn run_import<R: RemoteOrgHost + ?Sized>(remote: &R) -> ImportResponse {
    match Importer::new(remote).import().await {
        Ok(tree) => ImportResponse {
            success: true,
            data: Some(tree),
            error: None,
        },
        Err(e) => ImportResponse {
            success: false,
            data: None,
            error: Some(e.to_string()),
        },
    }
}

/// Export a declared tree against the remote host.
pub async fn run_export<R: RemoteOrgHost + ?Sized>(
    remote: &R,
    request: &ExportRequest,
) -> ExportResponse {
    let Some(hierarchy) = &request.hierarchy else {
        return ExportResponse {
            success: false,
            data: None,
            error: Some("validation failed: request must carry a non-empty hierarchy".into()),
        };
    };

    match Exporter::new(remote).export(hierarchy).await {
        Ok(report) => ExportResponse {
            success: true,
            data: Some(ExportData { results: report }),
            error: None,
        },
        Err(e) => ExportResponse {
            success: false,
            data: None,
            error: Some(e.to_string()),
        },
    }
}
