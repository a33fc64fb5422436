//! Exporter — reconciles a declared hierarchy against remote state.
//!
//! Traversal is single-threaded, depth-first, parent strictly before
//! children: a child's remote operations may reference the parent's
//! resolved identity.  Every per-node failure is contained at that node's
//! boundary and recorded in the [`SyncReport`]; only the top-level input
//! validation can fail the whole call.  A subtree is skipped only for a
//! variant-constraint violation or when the owning organization cannot be
//! resolved from ancestry.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::model::{team_slug, HierarchyNode, NodeVariant, TEAM_ID_PREFIX};
use crate::remote::{
    OrganizationUpdate, RemoteOrgHost, RepoVisibility, RepositoryUpdate, TeamPermission,
    TeamUpdate,
};
use crate::report::{ResourceKind, SyncReport};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parent-link entry threaded through the traversal.
///
/// Keeps organization resolution O(depth) instead of re-searching the tree.
#[derive(Debug, Clone)]
struct Ancestor {
    variant: NodeVariant,
    name: String,
    id: String,
}

impl Ancestor {
    fn from_node(node: &HierarchyNode) -> Self {
        Self {
            variant: node.variant.clone(),
            name: node.name.clone(),
            id: node.id.clone(),
        }
    }

    fn materialized_team_id(&self) -> Option<u64> {
        self.id.strip_prefix(TEAM_ID_PREFIX)?.parse().ok()
    }
}

/// The login of the nearest `SovereignBranch` ancestor, if any.
fn resolve_organization(ancestors: &[Ancestor]) -> Option<&str> {
    ancestors
        .iter()
        .rev()
        .find(|a| a.variant == NodeVariant::SovereignBranch)
        .map(|a| a.name.as_str())
}

/// Reconciles a declared tree against the remote host.
pub struct Exporter<'a, R: ?Sized> {
    remote: &'a R,
}

impl<'a, R: RemoteOrgHost + ?Sized> Exporter<'a, R> {
    /// Create an exporter over the given remote host.
    pub fn new(remote: &'a R) -> Self {
        Self { remote }
    }

    /// Export a declared tree, returning the aggregated report.
    ///
    /// Fails fast with [`SyncError::Validation`] on an empty hierarchy;
    /// every other failure is recorded per node and the run completes.
    pub async fn export(&self, tree: &HierarchyNode) -> SyncResult<SyncReport> {
        if tree.id.is_empty() && tree.children.is_empty() {
            return Err(SyncError::Validation("hierarchy is empty".into()));
        }

        info!(root = %tree.name, "starting hierarchy export");
        let mut report = SyncReport::default();
        self.visit(tree, &[], &mut report).await;
        info!(
            created = report.created.total(),
            updated = report.updated.total(),
            errors = report.errors.len(),
            "hierarchy export complete"
        );
        Ok(report)
    }

    /// Process one node, then (where defined) its children.
    fn visit<'s>(
        &'s self,
        node: &'s HierarchyNode,
        ancestors: &'s [Ancestor],
        report: &'s mut SyncReport,
    ) -> BoxFuture<'s, ()> {
        Box::pin(async move {
            // Anchor resolution comes first: a team or repository with no
            // organization in its ancestry cannot be addressed remotely at
            // all, whatever its variant pairing says.
            if (node.variant.is_team_like() || node.variant == NodeVariant::Entity)
                && resolve_organization(ancestors).is_none()
            {
                report.record_error(format!(
                    "{}: could not determine organization",
                    node.name
                ));
                return;
            }

            // Constraint check before any remote call.  A violating node
            // cannot be anchored to a resolvable remote parent, so its
            // whole subtree is skipped.  Unrecognized variants bypass the
            // table; the dispatch below diagnoses them by tag.
            let recognized = !matches!(node.variant, NodeVariant::Unknown(_));
            if let Some(parent) = ancestors.last() {
                if recognized && !node.variant.may_nest_under(&parent.variant) {
                    warn!(node = %node.name, variant = %node.variant, parent = %parent.variant,
                        "constraint violation, skipping subtree");
                    report.record_error(format!(
                        "Constraint violation at '{}': {} may not be nested under {}",
                        node.name, node.variant, parent.variant
                    ));
                    return;
                }
            } else if recognized && node.variant != NodeVariant::SupremeEntity {
                report.record_error(format!(
                    "Constraint violation at '{}': {} cannot be the root",
                    node.name, node.variant
                ));
                return;
            }

            let recurse = match &node.variant {
                NodeVariant::SupremeEntity => true,
                NodeVariant::SovereignBranch => {
                    self.sync_organization(node, report).await;
                    true
                }
                NodeVariant::SubordinateDivision
                | NodeVariant::InterGovOrg
                | NodeVariant::EnterpriseIntegrationClass
                | NodeVariant::CooperativeGroup => self.sync_team(node, ancestors, report).await,
                NodeVariant::Entity => {
                    self.sync_repository(node, ancestors, report).await;
                    // Entities are leaves; children are not structural.
                    false
                }
                NodeVariant::Unknown(tag) => {
                    report.record_error(format!("Unknown node type: {tag}"));
                    false
                }
            };

            if recurse {
                let mut chain = ancestors.to_vec();
                chain.push(Ancestor::from_node(node));
                for child in &node.children {
                    self.visit(child, &chain, report).await;
                }
            }
        })
    }

    /// Reconcile an organization node: update if it exists; creation
    /// requires elevated privilege and is not attempted.  Children are
    /// visited either way, since they reference the organization by name.
    async fn sync_organization(&self, node: &HierarchyNode, report: &mut SyncReport) {
        match self.remote.get_organization(&node.name).await {
            Ok(_) => {
                let fields = OrganizationUpdate {
                    name: Some(node.name.clone()),
                    ..Default::default()
                };
                match self.remote.update_organization(&node.name, &fields).await {
                    Ok(_) => report.record_updated(ResourceKind::Organization),
                    Err(e) => {
                        warn!(org = %node.name, error = %e, "organization update failed");
                        report.record_error(format!(
                            "{}: failed to update organization: {e}",
                            node.name
                        ));
                    }
                }
            }
            Err(e) if e.is_not_found() => {
                report.record_error(format!(
                    "{}: organization does not exist; creating one requires elevated privileges and was not attempted",
                    node.name
                ));
            }
            Err(e) => {
                report.record_error(format!("{}: failed to probe organization: {e}", node.name));
            }
        }
    }

    /// Reconcile a team node.  Returns whether children should be visited:
    /// false only when the owning organization cannot be resolved.
    async fn sync_team(
        &self,
        node: &HierarchyNode,
        ancestors: &[Ancestor],
        report: &mut SyncReport,
    ) -> bool {
        let Some(org) = resolve_organization(ancestors) else {
            report.record_error(format!("{}: could not determine organization", node.name));
            return false;
        };

        let parent_team_id = ancestors
            .last()
            .filter(|a| a.variant.is_team_like())
            .and_then(Ancestor::materialized_team_id);

        if node.materialized_team_id().is_some() {
            // Previously materialized: update by slug, create on failure.
            let slug = team_slug(&node.name);
            let fields = TeamUpdate {
                name: Some(node.name.clone()),
                ..Default::default()
            };
            match self
                .remote
                .update_team(org, &slug, &fields, parent_team_id)
                .await
            {
                Ok(_) => report.record_updated(ResourceKind::Team),
                Err(update_err) => {
                    debug!(team = %node.name, error = %update_err,
                        "team update failed, falling back to create");
                    match self.remote.create_team(org, &node.name, parent_team_id).await {
                        Ok(_) => report.record_created(ResourceKind::Team),
                        Err(create_err) => report.record_error(format!(
                            "{}: failed to update team ({update_err}) and to create it ({create_err})",
                            node.name
                        )),
                    }
                }
            }
        } else {
            match self.remote.create_team(org, &node.name, parent_team_id).await {
                Ok(_) => report.record_created(ResourceKind::Team),
                Err(e) => {
                    report.record_error(format!("{}: failed to create team: {e}", node.name));
                }
            }
        }

        true
    }

    /// Reconcile a repository node: probe, then update or create.  On the
    /// creation path only, grant the immediate parent team administrative
    /// permission — and only if that parent is itself materialized.
    async fn sync_repository(
        &self,
        node: &HierarchyNode,
        ancestors: &[Ancestor],
        report: &mut SyncReport,
    ) {
        let Some(org) = resolve_organization(ancestors) else {
            report.record_error(format!("{}: could not determine organization", node.name));
            return;
        };

        match self.remote.get_repository(org, &node.name).await {
            Ok(_) => {
                let fields = RepositoryUpdate {
                    name: Some(node.name.clone()),
                    ..Default::default()
                };
                match self.remote.update_repository(org, &node.name, &fields).await {
                    Ok(_) => report.record_updated(ResourceKind::Repository),
                    Err(e) => report.record_error(format!(
                        "{}: failed to update repository: {e}",
                        node.name
                    )),
                }
            }
            Err(e) if e.is_not_found() => {
                match self
                    .remote
                    .create_repository(org, &node.name, RepoVisibility::Private)
                    .await
                {
                    Ok(_) => {
                        report.record_created(ResourceKind::Repository);
                        self.grant_parent_team_access(org, node, ancestors, report).await;
                    }
                    Err(e) => report.record_error(format!(
                        "{}: failed to create repository: {e}",
                        node.name
                    )),
                }
            }
            Err(e) => {
                report.record_error(format!("{}: failed to probe repository: {e}", node.name));
            }
        }
    }

    async fn grant_parent_team_access(
        &self,
        org: &str,
        node: &HierarchyNode,
        ancestors: &[Ancestor],
        report: &mut SyncReport,
    ) {
        let Some(parent) = ancestors
            .last()
            .filter(|a| a.variant.is_team_like() && a.materialized_team_id().is_some())
        else {
            return;
        };

        let slug = team_slug(&parent.name);
        if let Err(e) = self
            .remote
            .grant_team_repo_permission(org, &slug, &node.name, TeamPermission::Admin)
            .await
        {
            report.record_error(format!(
                "{}: failed to grant team '{}' admin permission: {e}",
                node.name, parent.name
            ));
        }
    }
}
