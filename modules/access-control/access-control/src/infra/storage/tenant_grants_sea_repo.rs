//! `SeaORM` implementation of the tenant allowance store.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::TenantGrantsRepository;

use super::entity::tenant_grant::{
    ActiveModel as TenantGrantAM, Column, Entity as TenantGrantEntity,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaTenantGrantsRepository;

impl SeaTenantGrantsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TenantGrantsRepository for SeaTenantGrantsRepository {
    async fn permission_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError> {
        let ids = TenantGrantEntity::find()
            .select_only()
            .column(Column::PermissionId)
            .filter(Column::TenantId.eq(tenant_id))
            .into_tuple::<Uuid>()
            .all(conn)
            .await?;
        Ok(ids)
    }

    async fn permission_ids_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError> {
        let ids = TenantGrantEntity::find()
            .select_only()
            .column(Column::PermissionId)
            .filter(Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .into_tuple::<Uuid>()
            .all(conn)
            .await?;
        Ok(ids)
    }

    async fn insert_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError> {
        if permission_ids.is_empty() {
            return Ok(0);
        }
        let now = OffsetDateTime::now_utc();
        let rows = permission_ids.iter().map(|permission_id| TenantGrantAM {
            tenant_id: Set(tenant_id),
            permission_id: Set(*permission_id),
            created_at: Set(now),
        });
        let affected = TenantGrantEntity::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
        Ok(affected)
    }

    async fn delete_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
        permission_ids: &BTreeSet<Uuid>,
    ) -> Result<u64, DomainError> {
        if permission_ids.is_empty() {
            return Ok(0);
        }
        let result = TenantGrantEntity::delete_many()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::PermissionId.is_in(permission_ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
