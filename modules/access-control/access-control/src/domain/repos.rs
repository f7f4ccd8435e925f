//! Repository traits consumed by the domain services.
//!
//! Implementations live in `infra::storage`. Every method takes the
//! connection explicitly so the same repository serves both pooled
//! connections and open transactions.

use std::collections::BTreeSet;

use access_control_sdk::{CatalogFilter, PermissionNode};
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::DomainError;

/// A role visible to grant assignment: exists and is not soft-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRole {
    pub id: Uuid,
    /// Owning tenant, `None` for platform roles.
    pub tenant_id: Option<Uuid>,
}

/// Permission catalog persistence. Reads skip soft-deleted nodes.
#[async_trait]
pub trait PermissionsRepository: Send + Sync {
    /// Nodes matching `filter`, ordered by `(parent_id, sort)`.
    async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: &CatalogFilter,
    ) -> Result<Vec<PermissionNode>, DomainError>;

    /// Nodes granted to `tenant_id`, ordered by `(parent_id, sort)`.
    async fn list_granted_to_tenant<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<PermissionNode>, DomainError>;

    async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<PermissionNode>, DomainError>;

    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        node: &PermissionNode,
    ) -> Result<(), DomainError>;

    /// Full-row update. Returns whether a row was written.
    async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        node: &PermissionNode,
    ) -> Result<bool, DomainError>;

    /// Marks the row deleted at `at`. Returns whether a live row was marked.
    async fn soft_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError>;

    /// Hard delete. Returns whether a row existed, soft-deleted or not.
    async fn delete<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> Result<bool, DomainError>;
}

/// Read-only role lookups.
///
/// Roles are managed elsewhere; grant assignment only needs existence,
/// soft-delete state and the owning tenant.
#[async_trait]
pub trait RolesRepository: Send + Sync {
    async fn find_active<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
    ) -> Result<Option<ActiveRole>, DomainError>;
}

/// Role ↔ permission association store.
#[async_trait]
pub trait RoleGrantsRepository: Send + Sync {
    async fn permission_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError>;

    /// Like [`Self::permission_ids`], but locks the matched rows for the
    /// duration of the enclosing transaction so concurrent assignments to
    /// the same role serialize.
    async fn permission_ids_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError>;

    /// Insert one grant row per id. Empty input writes nothing.
    async fn insert_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError>;

    /// Delete the given grants of `role_id`. Empty input writes nothing.
    async fn delete_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError>;

    /// Delete grants for the given permissions across every role owned by
    /// `tenant_id`. Backs the cascade when a tenant's allowance shrinks.
    async fn delete_by_permissions_in_tenant<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError>;
}

/// Tenant ↔ permission association store (the tenant's allowance).
#[async_trait]
pub trait TenantGrantsRepository: Send + Sync {
    async fn permission_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError>;

    /// Like [`Self::permission_ids`], but locks the matched rows for the
    /// duration of the enclosing transaction.
    async fn permission_ids_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError>;

    /// Insert one grant row per id. Empty input writes nothing.
    async fn insert_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError>;

    /// Delete the given grants of `tenant_id`. Empty input writes nothing.
    async fn delete_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError>;
}

/// Read-only user directory lookups for cache invalidation.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Ids of users holding `role_id`.
    async fn users_of_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError>;

    /// Ids of users belonging to `tenant_id`.
    async fn users_of_tenant<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError>;
}

/// Storage partition backing a tenant's role and user data.
pub enum TenantPartition {
    /// The tenant's data lives in the primary database.
    Primary,
    /// The tenant's data lives in its own database.
    Dedicated(DatabaseConnection),
}

/// Maps a tenant to the store holding its roles and users.
///
/// Deployments running one database per tenant implement this against
/// their connection registry; single-database deployments use
/// [`SingleDatabaseResolver`].
#[async_trait]
pub trait TenantStoreResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns [`DomainError::TenantUnavailable`] when `tenant_id` has no
    /// registered store.
    async fn resolve(&self, tenant_id: Uuid) -> Result<TenantPartition, DomainError>;
}

/// Resolver for single-database deployments: every tenant maps to the
/// primary store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleDatabaseResolver;

#[async_trait]
impl TenantStoreResolver for SingleDatabaseResolver {
    async fn resolve(&self, _tenant_id: Uuid) -> Result<TenantPartition, DomainError> {
        Ok(TenantPartition::Primary)
    }
}
