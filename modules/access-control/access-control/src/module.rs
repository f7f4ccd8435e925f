//! Module wiring: connects storage, composes the services and exposes the
//! SDK client.

use std::sync::Arc;

use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use access_control_sdk::AccessControlClientV1;

use crate::config::AccessControlConfig;
use crate::domain::cache::PermissionCacheEvictor;
use crate::domain::local_client::LocalClient;
use crate::domain::repos::SingleDatabaseResolver;
use crate::domain::service::{AppServices, ServiceConfig};
use crate::infra::cache::InMemoryPermissionCache;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    SeaPermissionsRepository, SeaRoleGrantsRepository, SeaRolesRepository,
    SeaTenantGrantsRepository, SeaUsersRepository,
};

/// Service set wired over the `SeaORM` repositories.
pub type ConcreteAppServices = AppServices<
    SeaPermissionsRepository,
    SeaRolesRepository,
    SeaRoleGrantsRepository,
    SeaTenantGrantsRepository,
    SeaUsersRepository,
>;

/// Access control module handle.
///
/// Owns the database connection and hands out the SDK client. Keep one
/// instance per process and clone the client into consumers.
pub struct AccessControlModule {
    db: DatabaseConnection,
    cache: Arc<InMemoryPermissionCache>,
    client: Arc<dyn AccessControlClientV1>,
}

impl AccessControlModule {
    /// Connect to the configured database, apply migrations when enabled
    /// and wire the services.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection cannot be established or a
    /// migration fails.
    pub async fn connect(config: &AccessControlConfig) -> anyhow::Result<Self> {
        let mut options = ConnectOptions::new(config.database.dsn.clone());
        options.max_connections(config.database.max_connections);

        let db = Database::connect(options)
            .await
            .context("connecting to the access-control database")?;

        if config.database.auto_migrate {
            Migrator::up(&db, None)
                .await
                .context("applying access-control migrations")?;
        }

        info!(
            tenant_mode = config.tenant_mode,
            "access-control module ready"
        );
        Ok(Self::with_database(db, config.tenant_mode))
    }

    /// Wire the module over an existing connection, e.g. a shared pool.
    #[must_use]
    pub fn with_database(db: DatabaseConnection, tenant_mode: bool) -> Self {
        let cache = Arc::new(InMemoryPermissionCache::new());
        let evictor: Arc<dyn PermissionCacheEvictor> = cache.clone();
        let services = AppServices::new(
            db.clone(),
            SeaPermissionsRepository::new(),
            SeaRolesRepository::new(),
            SeaRoleGrantsRepository::new(),
            SeaTenantGrantsRepository::new(),
            SeaUsersRepository::new(),
            Arc::new(SingleDatabaseResolver),
            evictor,
            ServiceConfig { tenant_mode },
        );
        let client = Arc::new(LocalClient::new(services));

        Self { db, cache, client }
    }

    /// Client implementing the SDK contract.
    #[must_use]
    pub fn client(&self) -> Arc<dyn AccessControlClientV1> {
        Arc::clone(&self.client)
    }

    /// The in-process cache backend, for seeding and inspection.
    #[must_use]
    pub fn cache(&self) -> Arc<InMemoryPermissionCache> {
        Arc::clone(&self.cache)
    }

    /// The underlying database connection.
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
