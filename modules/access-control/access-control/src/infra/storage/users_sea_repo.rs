//! `SeaORM` implementation of the user membership lookups.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::UsersRepository;

use super::entity::user::{Column as UserColumn, Entity as UserEntity};
use super::entity::user_role::{Column, Entity as UserRoleEntity};

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaUsersRepository;

impl SeaUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UsersRepository for SeaUsersRepository {
    async fn users_of_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError> {
        let ids = UserRoleEntity::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::RoleId.eq(role_id))
            .into_tuple::<Uuid>()
            .all(conn)
            .await?;
        Ok(ids)
    }

    async fn users_of_tenant<C: ConnectionTrait>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError> {
        let ids = UserEntity::find()
            .select_only()
            .column(UserColumn::Id)
            .filter(UserColumn::TenantId.eq(tenant_id))
            .into_tuple::<Uuid>()
            .all(conn)
            .await?;
        Ok(ids)
    }
}
