//! Access Control Module
//!
//! This module owns the permission catalog and the role/tenant grant
//! tables, and keeps derived per-user permission caches coherent with
//! grant changes.
//!
//! ## Architecture
//!
//! This module follows clean architecture with strict layering:
//!
//! ### Contract Layer (`access-control-sdk`)
//! - **Location:** `modules/access-control/access-control-sdk/`
//! - **Purpose:** Public API contract for consumers
//! - **Contains:**
//!   - `AccessControlClientV1` trait
//!   - Model types: `PermissionNode`, `PermissionKind`, `PermissionTreeNode`
//!   - Request types: `NewPermissionNode`, `UpdatePermissionNode`, `CatalogFilter`
//!   - `ActorContext` / `GrantOutcome` for grant assignment
//!   - Error type: `AccessControlError`
//!
//! ### Domain Layer (`access_control::domain`)
//! - **Location:** `src/domain/`
//! - **Purpose:** Business logic and grant rules
//! - **Contains:**
//!   - `service/` - Catalog management and grant reconciliation
//!   - `reconcile.rs` - Pure set diff between stored and desired grants
//!   - `scope.rs` - Tenant allowance filtering
//!   - `tree.rs` - Two-level permission tree assembly
//!   - `cache.rs` - Cache eviction port and invalidator
//!   - `repos.rs` - Repository traits and the tenant store resolver
//!   - `error.rs` - Domain error types
//! - **Rule:** MUST NOT import `infra::*` types beyond the repository traits' needs
//!
//! ### Infrastructure Layer (`access_control::infra`)
//! - **Location:** `src/infra/`
//! - **Purpose:** `SeaORM` persistence and the in-memory cache backend
//! - **Contains:**
//!   - `storage/entity/` - `SeaORM` entity definitions
//!   - `storage/mapper.rs` - Entity ↔ SDK model conversions
//!   - `storage/migrations.rs` - Database schema migrations
//!   - `cache/` - `DashMap`-backed permission cache
//!
//! ## Public API
//!
//! The public API is defined in the `access-control-sdk` crate and
//! re-exported here. Consumers wire the module once and talk to it through
//! `Arc<dyn AccessControlClientV1>`:
//!
//! ```ignore
//! let module = AccessControlModule::connect(&config).await?;
//! let access = module.client();
//! let outcome = access.assign_role_permissions(&actor, role_id, desired).await?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// === PUBLIC API (from SDK) ===
pub use access_control_sdk::{
    AccessControlClientV1, AccessControlError, ActorContext, ActorScope, CatalogFilter,
    GrantOutcome, NewPermissionNode, PermissionKind, PermissionNode, PermissionTreeLeaf,
    PermissionTreeNode, UpdatePermissionNode,
};

// === MODULE DEFINITION ===
pub mod module;
pub use config::{AccessControlConfig, DatabaseConfig};
pub use module::AccessControlModule;

// === INTERNAL MODULES ===
// WARNING: These modules are internal implementation details!
// They are exposed only for comprehensive testing and should NOT be used by
// external consumers. Only use the SDK types for stable public APIs.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

#[cfg(test)]
mod test_support;
