//! Importer — materializes a hierarchy snapshot from remote state.
//!
//! Walks the remote listing (organizations, then each organization's teams)
//! and builds a fresh tree rooted at the synthetic node.  The importer
//! issues no mutating calls, and repository-level nodes are not populated:
//! the listing consumed here covers organizations and teams only.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::SyncResult;
use crate::model::{HierarchyNode, NodeVariant, ORG_ID_PREFIX, ROOT_ID, TEAM_ID_PREFIX};
use crate::remote::{RemoteOrgHost, Team};

/// Derive a team-like variant from a team's display name.
///
/// Ordered, case-insensitive substring match; the first matching keyword
/// wins.  A name that matches no keyword classifies as `Entity`.
#[must_use]
pub fn classify_team_name(name: &str) -> NodeVariant {
    let lower = name.to_lowercase();
    if lower.contains("ministry") || lower.contains("department") {
        NodeVariant::SubordinateDivision
    } else if lower.contains("imperium") || lower.contains("alliance") {
        NodeVariant::InterGovOrg
    } else if lower.contains("class") {
        NodeVariant::EnterpriseIntegrationClass
    } else if lower.contains("cooperative") {
        NodeVariant::CooperativeGroup
    } else {
        NodeVariant::Entity
    }
}

/// Builds a hierarchy snapshot from the remote listing.
pub struct Importer<'a, R: ?Sized> {
    remote: &'a R,
}

impl<'a, R: RemoteOrgHost + ?Sized> Importer<'a, R> {
    /// Create an importer over the given remote host.
    pub fn new(remote: &'a R) -> Self {
        Self { remote }
    }

    /// Materialize a fresh tree from remote state.
    ///
    /// One `SovereignBranch` per organization (`org-<id>`), its teams
    /// attached beneath it (`team-<id>`), nested teams resolved via their
    /// parent-team links.
    pub async fn import(&self) -> SyncResult<HierarchyNode> {
        info!("starting hierarchy import");
        let mut root = HierarchyNode::root();

        let organizations = self.remote.list_organizations().await?;
        for org in organizations {
            let org_node_id = format!("{ORG_ID_PREFIX}{}", org.id);
            let mut org_node = HierarchyNode::new(
                org_node_id.clone(),
                ROOT_ID,
                NodeVariant::SovereignBranch,
                org.login.clone(),
            );

            let teams = self.remote.list_teams(&org.login).await?;
            let (top_level, nested): (Vec<Team>, Vec<Team>) =
                teams.into_iter().partition(|t| t.parent.is_none());

            // Index nested teams by their parent team's remote ID.
            let mut by_parent: HashMap<u64, Vec<Team>> = HashMap::new();
            for team in nested {
                if let Some(parent) = &team.parent {
                    by_parent.entry(parent.id).or_default().push(team);
                }
            }

            for team in top_level {
                org_node
                    .children
                    .push(build_team_node(&org_node_id, team, &mut by_parent));
            }

            if !by_parent.is_empty() {
                let stranded: usize = by_parent.values().map(Vec::len).sum();
                warn!(
                    org = %org.login,
                    count = stranded,
                    "nested teams reference parents missing from the listing; skipped"
                );
            }

            root.children.push(org_node);
        }

        info!(orgs = root.children.len(), "hierarchy import complete");
        Ok(root)
    }
}

/// Build a team node and recursively attach its nested teams.
fn build_team_node(
    parent_node_id: &str,
    team: Team,
    by_parent: &mut HashMap<u64, Vec<Team>>,
) -> HierarchyNode {
    let node_id = format!("{TEAM_ID_PREFIX}{}", team.id);
    let mut node = HierarchyNode::new(
        node_id.clone(),
        parent_node_id,
        classify_team_name(&team.name),
        team.name,
    );

    if let Some(children) = by_parent.remove(&team.id) {
        for child in children {
            node.children.push(build_team_node(&node_id, child, by_parent));
        }
    }

    node
}
