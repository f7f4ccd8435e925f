use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Parent node, `None` for roots.
    pub parent_id: Option<Uuid>,
    pub label: String,
    /// Route or endpoint path; `None` for kinds without one.
    pub path: Option<String>,
    /// Discriminant of [`access_control_sdk::PermissionKind`].
    pub kind: i16,
    pub sort: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    /// Soft-delete marker. Marked nodes are invisible to catalog reads.
    pub deleted_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
