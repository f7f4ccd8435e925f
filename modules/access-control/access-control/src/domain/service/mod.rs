//! Domain service layer - business logic and grant rules.
//!
//! ## Architecture
//!
//! Two services split the module's responsibilities:
//! - `catalog` - Permission catalog CRUD, typed reads and the permission tree
//! - `grants` - Declarative role/tenant grant assignment (reconcile, persist,
//!   evict caches)
//!
//! ## Layering Rules
//!
//! The domain layer:
//! - **MAY** import: `access_control_sdk` (contract types), repository traits
//! - **MUST NOT** import: `infra::*` implementations (composition happens in
//!   `module.rs`)
//! - **Uses**: SDK contract types (`PermissionNode`, `GrantOutcome`, etc.) as
//!   primary domain models
//!
//! ## Connection Management
//!
//! Services hold the primary [`sea_orm::DatabaseConnection`] and open
//! transactions internally; repositories receive the connection per call.
//! Grant workflows run inside one transaction and lock the owner's grant
//! rows, so concurrent assignments to the same role or tenant serialize
//! instead of computing stale diffs.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::cache::{CacheInvalidator, PermissionCacheEvictor};
use crate::domain::repos::{
    PermissionsRepository, RoleGrantsRepository, RolesRepository, TenantGrantsRepository,
    TenantStoreResolver, UsersRepository,
};

mod catalog;
mod grants;

pub use catalog::CatalogService;
pub use grants::GrantService;


#[cfg(test)]
mod tests_grants;

/// Configuration for the domain services.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceConfig {
    /// Whether tenant allowances restrict role grant assignment and the
    /// permission tree.
    pub tenant_mode: bool,
}

/// Aggregates the domain services over one set of repositories.
pub struct AppServices<P, R, G, T, U>
where
    P: PermissionsRepository,
    R: RolesRepository,
    G: RoleGrantsRepository,
    T: TenantGrantsRepository,
    U: UsersRepository,
{
    pub catalog: Arc<CatalogService<P>>,
    pub grants: Arc<GrantService<R, G, T, U>>,
    pub invalidator: Arc<CacheInvalidator>,
}

impl<P, R, G, T, U> AppServices<P, R, G, T, U>
where
    P: PermissionsRepository,
    R: RolesRepository,
    G: RoleGrantsRepository,
    T: TenantGrantsRepository,
    U: UsersRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: DatabaseConnection,
        permissions: P,
        roles: R,
        role_grants: G,
        tenant_grants: T,
        users: U,
        tenant_store: Arc<dyn TenantStoreResolver>,
        evictor: Arc<dyn PermissionCacheEvictor>,
        config: ServiceConfig,
    ) -> Self {
        let invalidator = Arc::new(CacheInvalidator::new(evictor));

        let catalog = Arc::new(CatalogService::new(db.clone(), Arc::new(permissions), config));
        let grants = Arc::new(GrantService::new(
            db,
            Arc::new(roles),
            Arc::new(role_grants),
            Arc::new(tenant_grants),
            Arc::new(users),
            tenant_store,
            Arc::clone(&invalidator),
            config,
        ));

        Self {
            catalog,
            grants,
            invalidator,
        }
    }
}
