//! Typed hierarchy node model and the variant constraint table.
//!
//! Each [`NodeVariant`] denotes a position in the organizational tree and
//! maps to a remote resource kind: `SovereignBranch` is an organization, the
//! four team-like variants are (possibly nested) teams, and `Entity` is a
//! repository.  `SupremeEntity` is the synthetic root and owns no remote
//! resource.

use serde::{Deserialize, Serialize};

/// ID of the synthetic root node.
pub const ROOT_ID: &str = "0";

/// Sentinel parent ID carried only by the root.
pub const NO_PARENT: &str = "NA";

/// Fixed display name of the synthetic root.
pub const ROOT_NAME: &str = "Supreme Entity";

/// ID prefix for nodes correlated to a materialized remote organization.
pub const ORG_ID_PREFIX: &str = "org-";

/// ID prefix for nodes correlated to a materialized remote team.
pub const TEAM_ID_PREFIX: &str = "team-";

/// Position of a node in the hierarchy.
///
/// Unrecognized tags deserialize into [`NodeVariant::Unknown`] so a caller-
/// supplied tree with a bogus `Type` is diagnosed per node during traversal
/// rather than rejected wholesale at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeVariant {
    /// Synthetic root; no remote resource.
    SupremeEntity,
    /// Top-level remote organization.
    SovereignBranch,
    /// Team (ministry/department naming).
    SubordinateDivision,
    /// Team (imperium/alliance naming).
    InterGovOrg,
    /// Team (class naming).
    EnterpriseIntegrationClass,
    /// Team (cooperative naming).
    CooperativeGroup,
    /// Leaf repository.
    Entity,
    /// Unrecognized type tag, preserved verbatim for diagnostics.
    Unknown(String),
}

impl NodeVariant {
    /// Whether this variant maps to a remote team.
    #[must_use]
    pub fn is_team_like(&self) -> bool {
        matches!(
            self,
            NodeVariant::SubordinateDivision
                | NodeVariant::InterGovOrg
                | NodeVariant::EnterpriseIntegrationClass
                | NodeVariant::CooperativeGroup
        )
    }

    /// The allowed-parent constraint table.
    ///
    /// Returns whether a node of this variant may be nested under a parent
    /// of the given variant.  `SupremeEntity` may never appear as a child;
    /// organizations sit directly under the root; teams nest under an
    /// organization or another team; repositories under a team.
    #[must_use]
    pub fn may_nest_under(&self, parent: &NodeVariant) -> bool {
        match self {
            NodeVariant::SupremeEntity => false,
            NodeVariant::SovereignBranch => matches!(parent, NodeVariant::SupremeEntity),
            NodeVariant::SubordinateDivision
            | NodeVariant::InterGovOrg
            | NodeVariant::EnterpriseIntegrationClass
            | NodeVariant::CooperativeGroup => {
                matches!(parent, NodeVariant::SovereignBranch) || parent.is_team_like()
            }
            NodeVariant::Entity => parent.is_team_like(),
            NodeVariant::Unknown(_) => false,
        }
    }
}

impl From<String> for NodeVariant {
    fn from(tag: String) -> Self {
        let known = match tag.as_str() {
            "SupremeEntity" => Some(NodeVariant::SupremeEntity),
            "SovereignBranch" => Some(NodeVariant::SovereignBranch),
            "SubordinateDivision" => Some(NodeVariant::SubordinateDivision),
            "InterGovOrg" => Some(NodeVariant::InterGovOrg),
            "EnterpriseIntegrationClass" => Some(NodeVariant::EnterpriseIntegrationClass),
            "CooperativeGroup" => Some(NodeVariant::CooperativeGroup),
            "Entity" => Some(NodeVariant::Entity),
            _ => None,
        };
        match known {
            Some(variant) => variant,
            None => NodeVariant::Unknown(tag),
        }
    }
}

impl From<NodeVariant> for String {
    fn from(variant: NodeVariant) -> Self {
        variant.to_string()
    }
}

impl std::fmt::Display for NodeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeVariant::SupremeEntity => write!(f, "SupremeEntity"),
            NodeVariant::SovereignBranch => write!(f, "SovereignBranch"),
            NodeVariant::SubordinateDivision => write!(f, "SubordinateDivision"),
            NodeVariant::InterGovOrg => write!(f, "InterGovOrg"),
            NodeVariant::EnterpriseIntegrationClass => write!(f, "EnterpriseIntegrationClass"),
            NodeVariant::CooperativeGroup => write!(f, "CooperativeGroup"),
            NodeVariant::Entity => write!(f, "Entity"),
            NodeVariant::Unknown(tag) => write!(f, "{tag}"),
        }
    }
}

/// A node of the declarative organizational tree.
///
/// Children are exclusively owned by the parent; the tree is strict (no
/// sharing, no cycles).  Nodes correlated to an already-materialized remote
/// resource carry a derived ID (`org-<id>` / `team-<id>`) so re-import and
/// re-export correlate without a separate ID map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Unique within a tree.
    #[serde(rename = "ID")]
    pub id: String,

    /// `ID` of the parent node; the sentinel `"NA"` only at the root.
    #[serde(rename = "Parent")]
    pub parent_id: String,

    /// Position in the hierarchy.
    #[serde(rename = "Type")]
    pub variant: NodeVariant,

    /// Used verbatim as the remote organization/repository name, slugified
    /// for team identifiers.
    #[serde(rename = "Name")]
    pub name: String,

    /// Ordered children.
    #[serde(rename = "Children", default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Create a childless node.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        variant: NodeVariant,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.into(),
            variant,
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create the synthetic root node.
    #[must_use]
    pub fn root() -> Self {
        Self::new(ROOT_ID, NO_PARENT, NodeVariant::SupremeEntity, ROOT_NAME)
    }

    /// The numeric remote team ID, if this node's ID marks it as a
    /// previously-materialized team (`team-<id>`).
    #[must_use]
    pub fn materialized_team_id(&self) -> Option<u64> {
        self.id.strip_prefix(TEAM_ID_PREFIX)?.parse().ok()
    }
}

/// Derive the remote team slug from a display name: lowercase, spaces to
/// hyphens.  Deterministic for a given name.
#[must_use]
pub fn team_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
