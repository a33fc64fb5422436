//! Hierarchy reconciliation engine for a GitHub-style resource host.
//!
//! Keeps a declarative, typed organizational tree in sync with a remote
//! platform exposing three nested resource kinds: organizations, teams
//! (possibly nested), and repositories.  Two directions are supported:
//!
//! - **Import** ([`import::Importer`]): materialize a tree snapshot from
//!   the remote listing.  Read-only.
//! - **Export** ([`export::Exporter`]): diff a declared tree against remote
//!   state, issuing create-or-update calls with per-node failure isolation
//!   and an aggregated [`report::SyncReport`].
//!
//! The remote surface is the [`remote::RemoteOrgHost`] trait;
//! [`client::GithubClient`] is the production implementation, with base-URL
//! override for enterprise deployments and two interchangeable credential
//! shapes behind [`auth::GithubAuth`].

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod remote;
pub mod report;

pub use error::{SyncError, SyncResult};
pub use model::{HierarchyNode, NodeVariant};
pub use report::SyncReport;
