//! Remote resource host contract.
//!
//! Capability surface the engine consumes over the remote platform's three
//! nested resource kinds: organizations, teams (possibly nested), and
//! repositories.  Every operation is a single blocking round trip that
//! either returns a payload or fails with a classified [`SyncError`]; a
//! negative existence probe surfaces as [`SyncError::NotFound`].
//!
//! [`crate::client::GithubClient`] is the production implementation; tests
//! substitute an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;

/// A remote organization (top-level account).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: u64,
    /// URL-safe account name.
    pub login: String,
    /// Display name, if set.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fields an organization update may change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reference to a team's parent team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentTeam {
    pub id: u64,
    pub slug: String,
}

/// A remote team, optionally nested under a parent team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<ParentTeam>,
}

/// Fields a team update may change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A remote repository (leaf resource).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
}

/// Fields a repository update may change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepositoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Visibility of a newly created repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoVisibility {
    Public,
    Private,
}

/// Permission level granted to a team on a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamPermission {
    Pull,
    Push,
    Admin,
}

/// Operations the engine performs against the remote platform.
///
/// Calls fail independently and are never batched.  Per-call timeout is the
/// implementation's responsibility and surfaces as an ordinary failure.
#[async_trait]
pub trait RemoteOrgHost: Send + Sync {
    /// List the organizations visible to the authenticated identity.
    async fn list_organizations(&self) -> SyncResult<Vec<Organization>>;

    /// Fetch a single organization by login.  `NotFound` doubles as the
    /// negative arm of an existence probe.
    async fn get_organization(&self, org: &str) -> SyncResult<Organization>;

    /// Update an existing organization's profile.
    async fn update_organization(
        &self,
        org: &str,
        fields: &OrganizationUpdate,
    ) -> SyncResult<Organization>;

    /// List all teams of an organization, including nested teams.
    async fn list_teams(&self, org: &str) -> SyncResult<Vec<Team>>;

    /// Create a team, optionally nested under an existing parent team.
    async fn create_team(
        &self,
        org: &str,
        name: &str,
        parent_team_id: Option<u64>,
    ) -> SyncResult<Team>;

    /// Update a team addressed by slug, optionally re-parenting it.
    async fn update_team(
        &self,
        org: &str,
        team_slug: &str,
        fields: &TeamUpdate,
        parent_team_id: Option<u64>,
    ) -> SyncResult<Team>;

    /// Fetch a repository by name.  `NotFound` doubles as the negative arm
    /// of an existence probe.
    async fn get_repository(&self, org: &str, name: &str) -> SyncResult<Repository>;

    /// Create a repository owned by the organization.
    async fn create_repository(
        &self,
        org: &str,
        name: &str,
        visibility: RepoVisibility,
    ) -> SyncResult<Repository>;

    /// Update an existing repository.
    async fn update_repository(
        &self,
        org: &str,
        name: &str,
        fields: &RepositoryUpdate,
    ) -> SyncResult<Repository>;

    /// Grant a team a permission level on a repository.
    async fn grant_team_repo_permission(
        &self,
        org: &str,
        team_slug: &str,
        repo: &str,
        level: TeamPermission,
    ) -> SyncResult<()>;
}
