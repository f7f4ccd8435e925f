//! Grant assignment service.
//!
//! Assignments are declarative: the caller sends the full desired grant set
//! and the service reconciles stored rows against it, deleting and inserting
//! only the difference. Writes on the primary store run inside one
//! transaction that locks the owner's current rows first; tenants on a
//! dedicated store get their cascade and user listing routed there. Cache
//! evictions run strictly after commit.

use std::collections::BTreeSet;
use std::sync::Arc;

use access_control_sdk::{ActorContext, GrantOutcome};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::cache::CacheInvalidator;
use crate::domain::error::DomainError;
use crate::domain::reconcile::GrantDiff;
use crate::domain::repos::{
    RoleGrantsRepository, RolesRepository, TenantGrantsRepository, TenantPartition,
    TenantStoreResolver, UsersRepository,
};
use crate::domain::scope;
use crate::domain::service::ServiceConfig;

pub struct GrantService<R, G, T, U>
where
    R: RolesRepository,
    G: RoleGrantsRepository,
    T: TenantGrantsRepository,
    U: UsersRepository,
{
    db: DatabaseConnection,
    roles: Arc<R>,
    role_grants: Arc<G>,
    tenant_grants: Arc<T>,
    users: Arc<U>,
    tenant_store: Arc<dyn TenantStoreResolver>,
    invalidator: Arc<CacheInvalidator>,
    config: ServiceConfig,
}

impl<R, G, T, U> GrantService<R, G, T, U>
where
    R: RolesRepository,
    G: RoleGrantsRepository,
    T: TenantGrantsRepository,
    U: UsersRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: DatabaseConnection,
        roles: Arc<R>,
        role_grants: Arc<G>,
        tenant_grants: Arc<T>,
        users: Arc<U>,
        tenant_store: Arc<dyn TenantStoreResolver>,
        invalidator: Arc<CacheInvalidator>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            db,
            roles,
            role_grants,
            tenant_grants,
            users,
            tenant_store,
            invalidator,
            config,
        }
    }

    /// Ids of permissions currently granted to `role_id`.
    #[instrument(skip(self), fields(role_id = %role_id))]
    pub async fn role_permission_ids(&self, role_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        self.role_grants.permission_ids(&self.db, role_id).await
    }

    /// Ids of permissions currently allowed to `tenant_id`.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn tenant_permission_ids(&self, tenant_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        self.tenant_grants.permission_ids(&self.db, tenant_id).await
    }

    /// Replaces the grant set of `role_id` with `desired`.
    ///
    /// Tenant-scoped actors can only hand out permissions their tenant holds;
    /// anything else is silently dropped from `desired` and reported in
    /// [`GrantOutcome::dropped`]. When the filtered set already matches the
    /// stored one, nothing is written and no caches are touched.
    #[instrument(skip(self, actor, desired), fields(role_id = %role_id, subject_id = %actor.subject_id))]
    pub async fn assign_role_permissions(
        &self,
        actor: &ActorContext,
        role_id: Uuid,
        desired: Vec<Uuid>,
    ) -> Result<GrantOutcome, DomainError> {
        let txn = self.db.begin().await?;

        let role = self
            .roles
            .find_active(&txn, role_id)
            .await?
            .ok_or_else(|| DomainError::role_not_found(role_id))?;

        let current: BTreeSet<Uuid> = self
            .role_grants
            .permission_ids_for_update(&txn, role_id)
            .await?
            .into_iter()
            .collect();

        let mut desired: BTreeSet<Uuid> = desired.into_iter().collect();
        let mut dropped = Vec::new();
        if self.config.tenant_mode
            && let Some(actor_tenant) = actor.tenant_id()
        {
            // Platform roles assigned by a tenant admin fall back to the
            // actor's own allowance.
            let scope_tenant = role.tenant_id.unwrap_or(actor_tenant);
            let allowed: BTreeSet<Uuid> = self
                .tenant_grants
                .permission_ids(&txn, scope_tenant)
                .await?
                .into_iter()
                .collect();
            let scoped = scope::restrict(desired, &allowed);
            desired = scoped.granted;
            dropped = scoped.dropped;
            if !dropped.is_empty() {
                tracing::debug!(
                    tenant_id = %scope_tenant,
                    dropped = dropped.len(),
                    "dropped permissions outside the tenant allowance"
                );
            }
        }

        let diff = GrantDiff::between(&current, &desired);
        if diff.is_noop() {
            txn.commit().await?;
            tracing::debug!("desired grants already in place, nothing to write");
            return Ok(GrantOutcome {
                dropped,
                ..GrantOutcome::default()
            });
        }

        let removed = self
            .role_grants
            .delete_many(&txn, role_id, &diff.to_delete)
            .await?;
        let inserted = self
            .role_grants
            .insert_many(&txn, role_id, &diff.to_insert)
            .await?;
        let affected_users = self.users.users_of_role(&txn, role_id).await?;

        txn.commit().await?;

        let cache_evictions = self.invalidator.invalidate_users(affected_users).await;
        tracing::info!(inserted, removed, cache_evictions, "role grants reconciled");

        Ok(GrantOutcome {
            inserted,
            removed,
            dropped,
            cache_evictions,
        })
    }

    /// Replaces the allowance set of `tenant_id` with `desired`.
    ///
    /// Revoked allowances cascade into the tenant's role grants so no role
    /// keeps a permission its tenant lost. When the desired set already
    /// matches the stored one, nothing is written and no caches are touched.
    #[instrument(skip(self, desired), fields(tenant_id = %tenant_id))]
    pub async fn assign_tenant_permissions(
        &self,
        tenant_id: Uuid,
        desired: Vec<Uuid>,
    ) -> Result<GrantOutcome, DomainError> {
        let partition = self.tenant_store.resolve(tenant_id).await?;

        let txn = self.db.begin().await?;

        let current: BTreeSet<Uuid> = self
            .tenant_grants
            .permission_ids_for_update(&txn, tenant_id)
            .await?
            .into_iter()
            .collect();
        let desired: BTreeSet<Uuid> = desired.into_iter().collect();

        let diff = GrantDiff::between(&current, &desired);
        if diff.is_noop() {
            txn.commit().await?;
            tracing::debug!("desired allowances already in place, nothing to write");
            return Ok(GrantOutcome::default());
        }

        let removed = self
            .tenant_grants
            .delete_many(&txn, tenant_id, &diff.to_delete)
            .await?;

        let cascaded = match &partition {
            TenantPartition::Primary => {
                self.role_grants
                    .delete_by_permissions_in_tenant(&txn, tenant_id, &diff.to_delete)
                    .await?
            }
            TenantPartition::Dedicated(conn) => {
                self.role_grants
                    .delete_by_permissions_in_tenant(conn, tenant_id, &diff.to_delete)
                    .await?
            }
        };

        let inserted = self
            .tenant_grants
            .insert_many(&txn, tenant_id, &diff.to_insert)
            .await?;

        let affected_users = match &partition {
            TenantPartition::Primary => self.users.users_of_tenant(&txn, tenant_id).await?,
            TenantPartition::Dedicated(conn) => self.users.users_of_tenant(conn, tenant_id).await?,
        };

        txn.commit().await?;

        let cache_evictions = self.invalidator.invalidate_users(affected_users).await;
        tracing::info!(
            inserted,
            removed,
            cascaded,
            cache_evictions,
            "tenant allowances reconciled"
        );

        Ok(GrantOutcome {
            inserted,
            removed,
            dropped: Vec::new(),
            cache_evictions,
        })
    }
}
