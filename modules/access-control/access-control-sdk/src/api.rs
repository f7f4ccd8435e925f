//! Public API trait for the access control module.
//!
//! This trait defines the interface that consumers (REST handlers, other
//! modules) use to manage the permission catalog and role/tenant grants.
//! The module implements it and registers the client during wiring.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AccessControlError;
use crate::models::{
    ActorContext, CatalogFilter, GrantOutcome, NewPermissionNode, PermissionKind, PermissionNode,
    PermissionTreeNode, UpdatePermissionNode,
};

/// Public API trait for the access control module.
///
/// ```ignore
/// let access: Arc<dyn AccessControlClientV1> = module.client();
///
/// // Replace a role's grants with the desired set
/// let outcome = access
///     .assign_role_permissions(&actor, role_id, desired_ids)
///     .await?;
/// ```
///
/// Grant assignment is declarative: callers pass the full desired set and
/// the module reconciles stored grants against it inside one transaction,
/// then evicts the affected users' cached permissions.
#[async_trait]
pub trait AccessControlClientV1: Send + Sync {
    /// Fetch a single catalog node.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no node with `id` exists
    /// - `Internal` on persistence failures
    async fn permission(&self, id: Uuid) -> Result<PermissionNode, AccessControlError>;

    /// Fetch a single catalog node, checking it has the expected kind.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no node with `id` exists
    /// - `Validation` if the stored node has a different kind
    /// - `Internal` on persistence failures
    async fn permission_of_kind(
        &self,
        id: Uuid,
        kind: PermissionKind,
    ) -> Result<PermissionNode, AccessControlError>;

    /// List catalog nodes ordered by `(parent_id, sort)`.
    ///
    /// # Errors
    ///
    /// - `Internal` on persistence failures
    async fn list_permissions(
        &self,
        filter: CatalogFilter,
    ) -> Result<Vec<PermissionNode>, AccessControlError>;

    /// Create a catalog node.
    ///
    /// # Errors
    ///
    /// - `Validation` if the parent reference violates the catalog rules
    /// - `Internal` on persistence failures
    async fn create_permission(
        &self,
        new_node: NewPermissionNode,
    ) -> Result<PermissionNode, AccessControlError>;

    /// Update a catalog node. The node kind is immutable.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no node with the given id exists
    /// - `Validation` if the parent reference violates the catalog rules
    /// - `Internal` on persistence failures
    async fn update_permission(
        &self,
        update: UpdatePermissionNode,
    ) -> Result<PermissionNode, AccessControlError>;

    /// Mark a catalog node deleted, hiding it from reads while keeping
    /// the row and any grants pointing at it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no live node with `id` exists
    /// - `Internal` on persistence failures
    async fn soft_delete_permission(&self, id: Uuid) -> Result<(), AccessControlError>;

    /// Delete a catalog node.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no node with `id` exists
    /// - `Internal` on persistence failures
    async fn delete_permission(&self, id: Uuid) -> Result<(), AccessControlError>;

    /// Render the two-level permission tree visible to `actor`.
    ///
    /// Tenant-scoped actors see only nodes granted to their tenant.
    ///
    /// # Errors
    ///
    /// - `Internal` on persistence failures
    async fn permission_tree(
        &self,
        actor: &ActorContext,
    ) -> Result<Vec<PermissionTreeNode>, AccessControlError>;

    /// Permission ids currently granted to a role.
    ///
    /// # Errors
    ///
    /// - `Internal` on persistence failures
    async fn role_permission_ids(&self, role_id: Uuid) -> Result<Vec<Uuid>, AccessControlError>;

    /// Permission ids currently granted to a tenant.
    ///
    /// # Errors
    ///
    /// - `Internal` on persistence failures
    async fn tenant_permission_ids(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<Uuid>, AccessControlError>;

    /// Replace a role's grants with `desired`.
    ///
    /// For tenant-scoped actors, ids outside the tenant's allowance are
    /// dropped before persistence and reported in the outcome. When the
    /// desired set equals the stored set nothing is written and no cache
    /// entries are evicted.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the role does not exist or was deleted
    /// - `Internal` on persistence failures
    async fn assign_role_permissions(
        &self,
        actor: &ActorContext,
        role_id: Uuid,
        desired: Vec<Uuid>,
    ) -> Result<GrantOutcome, AccessControlError>;

    /// Replace a tenant's grants with `desired`.
    ///
    /// Platform operation. Revoked permissions are also removed from the
    /// tenant's roles, and every user of the tenant has their cached
    /// permissions evicted.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the tenant has no registered store
    /// - `Internal` on persistence failures
    async fn assign_tenant_permissions(
        &self,
        tenant_id: Uuid,
        desired: Vec<Uuid>,
    ) -> Result<GrantOutcome, AccessControlError>;

    /// Cache key templates this module writes to, for admin tooling.
    fn cache_key_templates(&self) -> Vec<&'static str>;

    /// Remove one cache entry by exact key. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// - `Internal` if the cache backend fails
    async fn clear_cache_key(&self, key: &str) -> Result<bool, AccessControlError>;
}
