//! Schema migrations for the access-control tables.

use sea_orm_migration::prelude as mig;

pub struct Migrator;

#[async_trait::async_trait]
impl mig::MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn mig::MigrationTrait>> {
        vec![Box::new(CreateAccessControlTables)]
    }
}

struct CreateAccessControlTables;

impl mig::MigrationName for CreateAccessControlTables {
    fn name(&self) -> &'static str {
        "m001_create_access_control_tables"
    }
}

#[async_trait::async_trait]
impl mig::MigrationTrait for CreateAccessControlTables {
    async fn up(&self, manager: &mig::SchemaManager) -> Result<(), mig::DbErr> {
        manager.create_table(permissions_table()).await?;
        manager.create_table(roles_table()).await?;
        manager.create_table(role_permissions_table()).await?;
        manager.create_table(tenant_permissions_table()).await?;
        manager.create_table(users_table()).await?;
        manager.create_table(user_roles_table()).await?;

        manager
            .create_index(index("idx_permissions_parent", "permissions", "parent_id"))
            .await?;
        manager
            .create_index(index("idx_roles_tenant", "roles", "tenant_id"))
            .await?;
        manager
            .create_index(index(
                "idx_role_permissions_permission",
                "role_permissions",
                "permission_id",
            ))
            .await?;
        manager
            .create_index(index("idx_user_roles_role", "user_roles", "role_id"))
            .await?;
        manager
            .create_index(index("idx_users_tenant", "users", "tenant_id"))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &mig::SchemaManager) -> Result<(), mig::DbErr> {
        for table in [
            "user_roles",
            "users",
            "tenant_permissions",
            "role_permissions",
            "roles",
            "permissions",
        ] {
            manager
                .drop_table(mig::Table::drop().table(mig::Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}

fn permissions_table() -> mig::TableCreateStatement {
    mig::Table::create()
        .table(mig::Alias::new("permissions"))
        .if_not_exists()
        .col(
            mig::ColumnDef::new(mig::Alias::new("id"))
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(mig::ColumnDef::new(mig::Alias::new("parent_id")).uuid())
        .col(
            mig::ColumnDef::new(mig::Alias::new("label"))
                .string()
                .not_null(),
        )
        .col(mig::ColumnDef::new(mig::Alias::new("path")).string())
        .col(
            mig::ColumnDef::new(mig::Alias::new("kind"))
                .small_integer()
                .not_null(),
        )
        .col(
            mig::ColumnDef::new(mig::Alias::new("sort"))
                .integer()
                .not_null(),
        )
        .col(
            mig::ColumnDef::new(mig::Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(mig::ColumnDef::new(mig::Alias::new("updated_at")).timestamp_with_time_zone())
        .col(mig::ColumnDef::new(mig::Alias::new("deleted_at")).timestamp_with_time_zone())
        .to_owned()
}

fn roles_table() -> mig::TableCreateStatement {
    mig::Table::create()
        .table(mig::Alias::new("roles"))
        .if_not_exists()
        .col(
            mig::ColumnDef::new(mig::Alias::new("id"))
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(mig::ColumnDef::new(mig::Alias::new("tenant_id")).uuid())
        .col(
            mig::ColumnDef::new(mig::Alias::new("name"))
                .string()
                .not_null(),
        )
        .col(
            mig::ColumnDef::new(mig::Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(mig::ColumnDef::new(mig::Alias::new("deleted_at")).timestamp_with_time_zone())
        .to_owned()
}

fn role_permissions_table() -> mig::TableCreateStatement {
    association_table("role_permissions", "role_id", "permission_id")
}

fn tenant_permissions_table() -> mig::TableCreateStatement {
    association_table("tenant_permissions", "tenant_id", "permission_id")
}

fn user_roles_table() -> mig::TableCreateStatement {
    association_table("user_roles", "user_id", "role_id")
}

fn users_table() -> mig::TableCreateStatement {
    mig::Table::create()
        .table(mig::Alias::new("users"))
        .if_not_exists()
        .col(
            mig::ColumnDef::new(mig::Alias::new("id"))
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(mig::ColumnDef::new(mig::Alias::new("tenant_id")).uuid())
        .col(
            mig::ColumnDef::new(mig::Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

/// Two-column association table with a composite primary key.
fn association_table(name: &str, left: &str, right: &str) -> mig::TableCreateStatement {
    mig::Table::create()
        .table(mig::Alias::new(name))
        .if_not_exists()
        .col(
            mig::ColumnDef::new(mig::Alias::new(left))
                .uuid()
                .not_null(),
        )
        .col(
            mig::ColumnDef::new(mig::Alias::new(right))
                .uuid()
                .not_null(),
        )
        .col(
            mig::ColumnDef::new(mig::Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .primary_key(
            mig::Index::create()
                .col(mig::Alias::new(left))
                .col(mig::Alias::new(right)),
        )
        .to_owned()
}

fn index(name: &str, table: &str, column: &str) -> mig::IndexCreateStatement {
    mig::Index::create()
        .if_not_exists()
        .name(name)
        .table(mig::Alias::new(table))
        .col(mig::Alias::new(column))
        .to_owned()
}
