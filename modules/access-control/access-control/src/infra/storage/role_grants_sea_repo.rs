//! `SeaORM` implementation of the role grant store.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, QueryTrait, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::RoleGrantsRepository;

use super::entity::role::{Column as RoleColumn, Entity as RoleEntity};
use super::entity::role_grant::{ActiveModel as RoleGrantAM, Column, Entity as RoleGrantEntity};

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaRoleGrantsRepository;

impl SeaRoleGrantsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoleGrantsRepository for SeaRoleGrantsRepository {
    async fn permission_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError> {
        let ids = RoleGrantEntity::find()
            .select_only()
            .column(Column::PermissionId)
            .filter(Column::RoleId.eq(role_id))
            .into_tuple::<Uuid>()
            .all(conn)
            .await?;
        Ok(ids)
    }

    async fn permission_ids_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError> {
        // SQLite has no row locks; its single-writer model covers us there.
        let ids = RoleGrantEntity::find()
            .select_only()
            .column(Column::PermissionId)
            .filter(Column::RoleId.eq(role_id))
            .lock_exclusive()
            .into_tuple::<Uuid>()
            .all(conn)
            .await?;
        Ok(ids)
    }

    async fn insert_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError> {
        if permission_ids.is_empty() {
            return Ok(0);
        }
        let now = OffsetDateTime::now_utc();
        let rows = permission_ids.iter().map(|permission_id| RoleGrantAM {
            role_id: Set(role_id),
            permission_id: Set(*permission_id),
            created_at: Set(now),
        });
        let affected = RoleGrantEntity::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
        Ok(affected)
    }

    async fn delete_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError> {
        if permission_ids.is_empty() {
            return Ok(0);
        }
        let result = RoleGrantEntity::delete_many()
            .filter(Column::RoleId.eq(role_id))
            .filter(Column::PermissionId.is_in(permission_ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_permissions_in_tenant<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError> {
        if permission_ids.is_empty() {
            return Ok(0);
        }
        let tenant_roles = RoleEntity::find()
            .select_only()
            .column(RoleColumn::Id)
            .filter(RoleColumn::TenantId.eq(tenant_id));
        let result = RoleGrantEntity::delete_many()
            .filter(Column::PermissionId.is_in(permission_ids.iter().copied()))
            .filter(Column::RoleId.in_subquery(tenant_roles.into_query()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
