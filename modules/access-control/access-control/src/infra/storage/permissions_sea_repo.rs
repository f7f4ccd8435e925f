//! `SeaORM` implementation of the permission catalog repository.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Set,
};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use access_control_sdk::{CatalogFilter, PermissionNode};

use crate::domain::error::DomainError;
use crate::domain::repos::PermissionsRepository;

use super::entity::permission::{ActiveModel as PermissionAM, Column, Entity as PermissionEntity};
use super::entity::tenant_grant::{Column as TenantGrantColumn, Entity as TenantGrantEntity};
use super::mapper;

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaPermissionsRepository;

impl SeaPermissionsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PermissionsRepository for SeaPermissionsRepository {
    async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: &CatalogFilter,
    ) -> Result<Vec<PermissionNode>, DomainError> {
        let mut condition = Condition::all().add(Column::DeletedAt.is_null());
        if let Some(key) = filter.key.as_deref() {
            condition = condition.add(
                Condition::any()
                    .add(Column::Path.contains(key))
                    .add(Column::Label.contains(key)),
            );
        }
        // The date range applies only when both bounds are present; the end
        // bound covers the whole day it falls on. Extending it past the last
        // representable day overflows, and no row can sit beyond that anyway.
        if let (Some(from), Some(to)) = (filter.created_from, filter.created_to) {
            condition = condition.add(Column::CreatedAt.gte(from));
            if let Some(end) = to.checked_add(Duration::days(1)) {
                condition = condition.add(Column::CreatedAt.lt(end));
            }
        }

        let rows = PermissionEntity::find()
            .filter(condition)
            .order_by_asc(Column::ParentId)
            .order_by_asc(Column::Sort)
            .all(conn)
            .await?;

        rows.into_iter().map(mapper::node_from_row).collect()
    }

    async fn list_granted_to_tenant<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<PermissionNode>, DomainError> {
        let granted = TenantGrantEntity::find()
            .select_only()
            .column(TenantGrantColumn::PermissionId)
            .filter(TenantGrantColumn::TenantId.eq(tenant_id));

        let rows = PermissionEntity::find()
            .filter(Column::Id.in_subquery(granted.into_query()))
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::ParentId)
            .order_by_asc(Column::Sort)
            .all(conn)
            .await?;

        rows.into_iter().map(mapper::node_from_row).collect()
    }

    async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<PermissionNode>, DomainError> {
        let row = PermissionEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(conn)
            .await?;
        row.map(mapper::node_from_row).transpose()
    }

    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        node: &PermissionNode,
    ) -> Result<(), DomainError> {
        let model = PermissionAM {
            id: Set(node.id),
            parent_id: Set(node.parent_id),
            label: Set(node.label.clone()),
            path: Set(node.path.clone()),
            kind: Set(mapper::kind_to_db(node.kind)),
            sort: Set(node.sort),
            created_at: Set(node.created_at),
            updated_at: Set(node.updated_at),
            deleted_at: Set(None),
        };
        PermissionEntity::insert(model).exec(conn).await?;
        Ok(())
    }

    async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        node: &PermissionNode,
    ) -> Result<bool, DomainError> {
        let model = PermissionAM {
            parent_id: Set(node.parent_id),
            label: Set(node.label.clone()),
            path: Set(node.path.clone()),
            kind: Set(mapper::kind_to_db(node.kind)),
            sort: Set(node.sort),
            created_at: Set(node.created_at),
            updated_at: Set(node.updated_at),
            ..Default::default()
        };
        let result = PermissionEntity::update_many()
            .set(model)
            .filter(Column::Id.eq(node.id))
            .filter(Column::DeletedAt.is_null())
            .exec(conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn soft_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        at: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        let model = PermissionAM {
            deleted_at: Set(Some(at)),
            ..Default::default()
        };
        let result = PermissionEntity::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> Result<bool, DomainError> {
        let result = PermissionEntity::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }
}
