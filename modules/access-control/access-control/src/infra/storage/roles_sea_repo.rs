//! `SeaORM` implementation of the read-only role lookups.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::{ActiveRole, RolesRepository};

use super::entity::role::{Column, Entity as RoleEntity};
use super::mapper;

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaRolesRepository;

impl SeaRolesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RolesRepository for SeaRolesRepository {
    async fn find_active<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
    ) -> Result<Option<ActiveRole>, DomainError> {
        let row = RoleEntity::find()
            .filter(Column::Id.eq(role_id))
            .filter(Column::DeletedAt.is_null())
            .one(conn)
            .await?;
        Ok(row.map(mapper::active_role_from_row))
    }
}
