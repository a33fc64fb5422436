//! In-memory fake of the remote organization host for engine tests.
//!
//! Tracks created resources in maps and records every call so tests can
//! assert which remote operations a traversal issued (and which it did
//! not).

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use orgtree_sync::error::{SyncError, SyncResult};
use orgtree_sync::model::team_slug;
use orgtree_sync::remote::{
    Organization, OrganizationUpdate, ParentTeam, RemoteOrgHost, RepoVisibility, Repository,
    RepositoryUpdate, Team, TeamPermission, TeamUpdate,
};

#[derive(Default)]
struct State {
    /// Organizations keyed by login.
    orgs: HashMap<String, Organization>,
    /// Teams per organization login.
    teams: HashMap<String, Vec<Team>>,
    /// Repositories keyed by (org login, repo name).
    repos: HashMap<(String, String), Repository>,
    next_id: u64,
}

/// In-memory remote host with call recording.
pub struct MockRemote {
    state: Arc<RwLock<State>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                next_id: 1000,
                ..State::default()
            })),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed an organization.
    pub async fn seed_org(&self, id: u64, login: &str) {
        let mut state = self.state.write().await;
        state.orgs.insert(
            login.to_string(),
            Organization {
                id,
                login: login.to_string(),
                name: Some(login.to_string()),
                description: None,
            },
        );
    }

    /// Seed a team, optionally nested under a previously seeded team.
    pub async fn seed_team(&self, org: &str, id: u64, name: &str, parent_id: Option<u64>) {
        let mut state = self.state.write().await;
        let parent = parent_id.and_then(|pid| {
            state
                .teams
                .get(org)
                .and_then(|teams| teams.iter().find(|t| t.id == pid))
                .map(|t| ParentTeam {
                    id: t.id,
                    slug: t.slug.clone(),
                })
        });
        state.teams.entry(org.to_string()).or_default().push(Team {
            id,
            name: name.to_string(),
            slug: team_slug(name),
            description: None,
            parent,
        });
    }

    /// Every call issued so far, in order, as "`method arg arg`" strings.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    /// Number of recorded calls whose method name matches.
    pub async fn call_count(&self, method: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    async fn record(&self, call: String) {
        self.calls.write().await.push(call);
    }

    async fn next_id(&self) -> u64 {
        let mut state = self.state.write().await;
        state.next_id += 1;
        state.next_id
    }
}

#[async_trait]
impl RemoteOrgHost for MockRemote {
    async fn list_organizations(&self) -> SyncResult<Vec<Organization>> {
        self.record("list_organizations".to_string()).await;
        let state = self.state.read().await;
        let mut orgs: Vec<Organization> = state.orgs.values().cloned().collect();
        orgs.sort_by_key(|o| o.id);
        Ok(orgs)
    }

    async fn get_organization(&self, org: &str) -> SyncResult<Organization> {
        self.record(format!("get_organization {org}")).await;
        let state = self.state.read().await;
        state
            .orgs
            .get(org)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("org {org}")))
    }

    async fn update_organization(
        &self,
        org: &str,
        fields: &OrganizationUpdate,
    ) -> SyncResult<Organization> {
        self.record(format!("update_organization {org}")).await;
        let mut state = self.state.write().await;
        let entry = state
            .orgs
            .get_mut(org)
            .ok_or_else(|| SyncError::NotFound(format!("org {org}")))?;
        if let Some(name) = &fields.name {
            entry.name = Some(name.clone());
        }
        Ok(entry.clone())
    }

    async fn list_teams(&self, org: &str) -> SyncResult<Vec<Team>> {
        self.record(format!("list_teams {org}")).await;
        let state = self.state.read().await;
        Ok(state.teams.get(org).cloned().unwrap_or_default())
    }

    async fn create_team(
        &self,
        org: &str,
        name: &str,
        parent_team_id: Option<u64>,
    ) -> SyncResult<Team> {
        self.record(format!("create_team {org} {name}")).await;
        {
            let state = self.state.read().await;
            if !state.orgs.contains_key(org) {
                return Err(SyncError::NotFound(format!("org {org}")));
            }
        }
        let id = self.next_id().await;
        let mut state = self.state.write().await;
        let parent = parent_team_id.and_then(|pid| {
            state
                .teams
                .get(org)
                .and_then(|teams| teams.iter().find(|t| t.id == pid))
                .map(|t| ParentTeam {
                    id: t.id,
                    slug: t.slug.clone(),
                })
        });
        let team = Team {
            id,
            name: name.to_string(),
            slug: team_slug(name),
            description: None,
            parent,
        };
        state
            .teams
            .entry(org.to_string())
            .or_default()
            .push(team.clone());
        Ok(team)
    }

    async fn update_team(
        &self,
        org: &str,
        team_slug: &str,
        fields: &TeamUpdate,
        _parent_team_id: Option<u64>,
    ) -> SyncResult<Team> {
        self.record(format!("update_team {org} {team_slug}")).await;
        let mut state = self.state.write().await;
        let team = state
            .teams
            .get_mut(org)
            .and_then(|teams| teams.iter_mut().find(|t| t.slug == team_slug))
            .ok_or_else(|| SyncError::NotFound(format!("team {team_slug}")))?;
        if let Some(name) = &fields.name {
            name.clone_into(&mut team.name);
        }
        Ok(team.clone())
    }

    async fn get_repository(&self, org: &str, name: &str) -> SyncResult<Repository> {
        self.record(format!("get_repository {org} {name}")).await;
        let state = self.state.read().await;
        state
            .repos
            .get(&(org.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("repo {org}/{name}")))
    }

    async fn create_repository(
        &self,
        org: &str,
        name: &str,
        visibility: RepoVisibility,
    ) -> SyncResult<Repository> {
        self.record(format!("create_repository {org} {name}")).await;
        {
            let state = self.state.read().await;
            if !state.orgs.contains_key(org) {
                return Err(SyncError::NotFound(format!("org {org}")));
            }
        }
        let id = self.next_id().await;
        let mut state = self.state.write().await;
        let repo = Repository {
            id,
            name: name.to_string(),
            description: None,
            private: visibility == RepoVisibility::Private,
        };
        state
            .repos
            .insert((org.to_string(), name.to_string()), repo.clone());
        Ok(repo)
    }

    async fn update_repository(
        &self,
        org: &str,
        name: &str,
        _fields: &RepositoryUpdate,
    ) -> SyncResult<Repository> {
        self.record(format!("update_repository {org} {name}")).await;
        let state = self.state.read().await;
        state
            .repos
            .get(&(org.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("repo {org}/{name}")))
    }

    async fn grant_team_repo_permission(
        &self,
        org: &str,
        team_slug: &str,
        repo: &str,
        level: TeamPermission,
    ) -> SyncResult<()> {
        self.record(format!(
            "grant_team_repo_permission {org} {team_slug} {repo} {level:?}"
        ))
        .await;
        let state = self.state.read().await;
        let known = state
            .teams
            .get(org)
            .is_some_and(|teams| teams.iter().any(|t| t.slug == team_slug));
        if known {
            Ok(())
        } else {
            Err(SyncError::NotFound(format!("team {team_slug}")))
        }
    }
}
