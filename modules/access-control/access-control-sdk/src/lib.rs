#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Access Control SDK
//!
//! This crate provides the public API for the `access_control` module:
//!
//! - [`AccessControlClientV1`] - Public API trait for consumers
//! - [`PermissionNode`], [`PermissionKind`] - Catalog models
//! - [`PermissionTreeNode`] - Rendered permission tree
//! - [`ActorContext`] - Caller identity and tenant scope
//! - [`GrantOutcome`] - Result of a grant assignment
//! - [`AccessControlError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use access_control_sdk::AccessControlClientV1;
//!
//! let access: Arc<dyn AccessControlClientV1> = module.client();
//! let outcome = access
//!     .assign_role_permissions(&actor, role_id, desired_ids)
//!     .await?;
//! tracing::info!(inserted = outcome.inserted, removed = outcome.removed, "grants updated");
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::AccessControlClientV1;
pub use error::AccessControlError;
pub use models::{
    ActorContext, ActorScope, CatalogFilter, GrantOutcome, NewPermissionNode, PermissionKind,
    PermissionNode, PermissionTreeLeaf, PermissionTreeNode, UpdatePermissionNode,
};
