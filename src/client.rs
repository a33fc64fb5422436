//! GitHub-style REST client (reqwest-based).
//!
//! Production implementation of [`RemoteOrgHost`] over the platform's REST
//! v3 surface.  The base URL is configurable to support enterprise-hosted
//! deployments; each call is a single round trip bounded by the configured
//! timeout, and HTTP status codes are mapped onto the [`SyncError`]
//! taxonomy (404 is a negative existence probe, not a failure).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::GithubAuth;
use crate::error::{SyncError, SyncResult};
use crate::remote::{
    Organization, OrganizationUpdate, RemoteOrgHost, RepoVisibility, Repository,
    RepositoryUpdate, Team, TeamPermission, TeamUpdate,
};

/// Default base URL of the public hosted API.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Per-call timeout applied when none is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// API base URL; override for enterprise-hosted deployments.
    pub base_url: String,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GithubConfig {
    /// Config for the public API with an overridable base URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// REST client for the remote organization host.
#[derive(Debug, Clone)]
pub struct GithubClient {
    base_url: String,
    auth: GithubAuth,
    http_client: Client,
}

impl GithubClient {
    /// Create a new client.
    pub fn new(config: GithubConfig, auth: GithubAuth) -> SyncResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("orgtree-sync/0.1")
            .build()
            .map_err(|e| SyncError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        // Normalize base URL: strip trailing slash.
        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            auth,
            http_client,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: String, auth: GithubAuth, http_client: Client) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            auth,
            http_client,
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Internal HTTP Methods ─────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> SyncResult<T> {
        debug!("GET {}", url);
        let builder = self.http_client.get(url);
        let builder = self.auth.apply(builder).await?;
        let response = builder
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> SyncResult<T> {
        debug!("POST {}", url);
        let builder = self.http_client.post(url);
        let builder = self.auth.apply(builder).await?;
        let response = builder
            .header("Accept", "application/vnd.github+json")
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> SyncResult<T> {
        debug!("PATCH {}", url);
        let builder = self.http_client.patch(url);
        let builder = self.auth.apply(builder).await?;
        let response = builder
            .header("Accept", "application/vnd.github+json")
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn put_unit<B: Serialize>(&self, url: &str, body: &B) -> SyncResult<()> {
        debug!("PUT {}", url);
        let builder = self.http_client.put(url);
        let builder = self.auth.apply(builder).await?;
        let response = builder
            .header("Accept", "application/vnd.github+json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response).await
        }
    }

    // ── Response Handling ─────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> SyncResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| SyncError::Parse(format!("failed to parse response: {e}")))
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(&self, response: reqwest::Response) -> SyncResult<T> {
        let status = response.status();

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        match status {
            StatusCode::NOT_FOUND => Err(SyncError::NotFound(body)),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("remote platform rate limited, retry after {:?}s", retry_after);
                Err(SyncError::RateLimited {
                    retry_after_secs: retry_after,
                })
            }
            StatusCode::UNAUTHORIZED => {
                // Invalidate a cached installation token on 401.
                self.auth.invalidate_cache().await;
                Err(SyncError::Auth(format!("authentication failed (401): {body}")))
            }
            _ => {
                let detail = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                };
                Err(SyncError::Api {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

#[async_trait]
impl RemoteOrgHost for GithubClient {
    async fn list_organizations(&self) -> SyncResult<Vec<Organization>> {
        let url = format!("{}/user/orgs", self.base_url);
        self.get(&url).await
    }

    async fn get_organization(&self, org: &str) -> SyncResult<Organization> {
        let url = format!("{}/orgs/{}", self.base_url, org);
        self.get(&url).await
    }

    async fn update_organization(
        &self,
        org: &str,
        fields: &OrganizationUpdate,
    ) -> SyncResult<Organization> {
        let url = format!("{}/orgs/{}", self.base_url, org);
        self.patch(&url, fields).await
    }

    async fn list_teams(&self, org: &str) -> SyncResult<Vec<Team>> {
        let url = format!("{}/orgs/{}/teams", self.base_url, org);
        self.get(&url).await
    }

    async fn create_team(
        &self,
        org: &str,
        name: &str,
        parent_team_id: Option<u64>,
    ) -> SyncResult<Team> {
        let url = format!("{}/orgs/{}/teams", self.base_url, org);
        let mut body = json!({ "name": name });
        if let Some(parent) = parent_team_id {
            body["parent_team_id"] = json!(parent);
        }
        self.post(&url, &body).await
    }

    async fn update_team(
        &self,
        org: &str,
        team_slug: &str,
        fields: &TeamUpdate,
        parent_team_id: Option<u64>,
    ) -> SyncResult<Team> {
        let url = format!("{}/orgs/{}/teams/{}", self.base_url, org, team_slug);
        let mut body = serde_json::to_value(fields)?;
        if let Some(parent) = parent_team_id {
            body["parent_team_id"] = json!(parent);
        }
        self.patch(&url, &body).await
    }

    async fn get_repository(&self, org: &str, name: &str) -> SyncResult<Repository> {
        let url = format!("{}/repos/{}/{}", self.base_url, org, name);
        self.get(&url).await
    }

    async fn create_repository(
        &self,
        org: &str,
        name: &str,
        visibility: RepoVisibility,
    ) -> SyncResult<Repository> {
        let url = format!("{}/orgs/{}/repos", self.base_url, org);
        let body = json!({
            "name": name,
            "private": visibility == RepoVisibility::Private,
        });
        self.post(&url, &body).await
    }

    async fn update_repository(
        &self,
        org: &str,
        name: &str,
        fields: &RepositoryUpdate,
    ) -> SyncResult<Repository> {
        let url = format!("{}/repos/{}/{}", self.base_url, org, name);
        self.patch(&url, fields).await
    }

    async fn grant_team_repo_permission(
        &self,
        org: &str,
        team_slug: &str,
        repo: &str,
        level: TeamPermission,
    ) -> SyncResult<()> {
        let url = format!(
            "{}/orgs/{}/teams/{}/repos/{}/{}",
            self.base_url, org, team_slug, org, repo
        );
        let body = json!({ "permission": level });
        self.put_unit(&url, &body).await
    }
}
