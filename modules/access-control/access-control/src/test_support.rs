#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;
use time::OffsetDateTime;
use uuid::Uuid;

use access_control_sdk::PermissionKind;

use crate::domain::cache::{CacheError, PermissionCacheEvictor};
use crate::domain::error::DomainError;
use crate::domain::repos::{SingleDatabaseResolver, TenantPartition, TenantStoreResolver};
use crate::domain::service::{AppServices, ServiceConfig};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    SeaPermissionsRepository, SeaRoleGrantsRepository, SeaRolesRepository,
    SeaTenantGrantsRepository, SeaUsersRepository, mapper,
};
use crate::module::ConcreteAppServices;

/// Create an in-memory database with the schema applied.
///
/// A single pooled connection keeps every query on the same `SQLite`
/// in-memory handle.
pub async fn inmem_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).min_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn seed_permission(
    db: &DatabaseConnection,
    id: Uuid,
    parent_id: Option<Uuid>,
    label: &str,
    kind: PermissionKind,
    sort: i32,
) {
    use crate::infra::storage::entity::permission::{ActiveModel, Entity};

    let row = ActiveModel {
        id: Set(id),
        parent_id: Set(parent_id),
        label: Set(label.to_owned()),
        path: Set(Some(format!("api/{}", label.to_lowercase()))),
        kind: Set(mapper::kind_to_db(kind)),
        sort: Set(sort),
        created_at: Set(OffsetDateTime::now_utc()),
        updated_at: Set(None),
        deleted_at: Set(None),
    };
    Entity::insert(row)
        .exec(db)
        .await
        .expect("Failed to seed permission");
}

pub async fn seed_role(db: &DatabaseConnection, id: Uuid, tenant_id: Option<Uuid>, deleted: bool) {
    use crate::infra::storage::entity::role::{ActiveModel, Entity};

    let now = OffsetDateTime::now_utc();
    let row = ActiveModel {
        id: Set(id),
        tenant_id: Set(tenant_id),
        name: Set(format!("role-{id}")),
        created_at: Set(now),
        deleted_at: Set(deleted.then_some(now)),
    };
    Entity::insert(row).exec(db).await.expect("Failed to seed role");
}

pub async fn seed_user(db: &DatabaseConnection, id: Uuid, tenant_id: Option<Uuid>) {
    use crate::infra::storage::entity::user::{ActiveModel, Entity};

    let row = ActiveModel {
        id: Set(id),
        tenant_id: Set(tenant_id),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    Entity::insert(row).exec(db).await.expect("Failed to seed user");
}

pub async fn seed_user_role(db: &DatabaseConnection, user_id: Uuid, role_id: Uuid) {
    use crate::infra::storage::entity::user_role::{ActiveModel, Entity};

    let row = ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    Entity::insert(row)
        .exec(db)
        .await
        .expect("Failed to seed user role");
}

/// Evictor double recording every key it is asked to remove.
#[derive(Default)]
pub struct RecordingCache {
    keys: Mutex<Vec<String>>,
    fail_keys: Vec<String>,
}

impl RecordingCache {
    /// A cache that fails eviction for the given keys.
    pub fn failing_on(fail_keys: Vec<String>) -> Self {
        Self {
            keys: Mutex::new(Vec::new()),
            fail_keys,
        }
    }

    /// Keys evicted so far, in call order.
    pub fn evicted(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl PermissionCacheEvictor for RecordingCache {
    async fn evict(&self, key: &str) -> Result<bool, CacheError> {
        if self.fail_keys.iter().any(|k| k == key) {
            return Err(CacheError::backend(format!("refusing to evict {key}")));
        }
        self.keys.lock().unwrap().push(key.to_owned());
        Ok(true)
    }
}

/// Resolver double that knows no tenants at all.
pub struct UnknownTenantResolver;

#[async_trait]
impl TenantStoreResolver for UnknownTenantResolver {
    async fn resolve(&self, tenant_id: Uuid) -> Result<TenantPartition, DomainError> {
        Err(DomainError::tenant_unavailable(tenant_id))
    }
}

/// Wire the services over `db` with a recording cache double.
pub fn build_services(
    db: DatabaseConnection,
    config: ServiceConfig,
) -> (ConcreteAppServices, Arc<RecordingCache>) {
    let cache = Arc::new(RecordingCache::default());
    let services = build_services_with(db, config, Arc::new(SingleDatabaseResolver), cache.clone());
    (services, cache)
}

pub fn build_services_with(
    db: DatabaseConnection,
    config: ServiceConfig,
    tenant_store: Arc<dyn TenantStoreResolver>,
    evictor: Arc<dyn PermissionCacheEvictor>,
) -> ConcreteAppServices {
    AppServices::new(
        db,
        SeaPermissionsRepository::new(),
        SeaRolesRepository::new(),
        SeaRoleGrantsRepository::new(),
        SeaTenantGrantsRepository::new(),
        SeaUsersRepository::new(),
        tenant_store,
        evictor,
        config,
    )
}
