//! In-process client: adapts the domain services to the SDK contract.

use access_control_sdk::{
    AccessControlClientV1, AccessControlError, ActorContext, CatalogFilter, GrantOutcome,
    NewPermissionNode, PermissionKind, PermissionNode, PermissionTreeNode, UpdatePermissionNode,
};
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::cache;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    PermissionsRepository, RoleGrantsRepository, RolesRepository, TenantGrantsRepository,
    UsersRepository,
};
use crate::domain::service::AppServices;

fn log_and_convert(op: &str, e: DomainError) -> AccessControlError {
    tracing::error!(error = %e, "access-control operation failed: {op}");
    e.into()
}

/// Client implementation handing calls straight to the domain services.
pub struct LocalClient<P, R, G, T, U>
where
    P: PermissionsRepository,
    R: RolesRepository,
    G: RoleGrantsRepository,
    T: TenantGrantsRepository,
    U: UsersRepository,
{
    services: AppServices<P, R, G, T, U>,
}

impl<P, R, G, T, U> LocalClient<P, R, G, T, U>
where
    P: PermissionsRepository,
    R: RolesRepository,
    G: RoleGrantsRepository,
    T: TenantGrantsRepository,
    U: UsersRepository,
{
    #[must_use]
    pub fn new(services: AppServices<P, R, G, T, U>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl<P, R, G, T, U> AccessControlClientV1 for LocalClient<P, R, G, T, U>
where
    P: PermissionsRepository,
    R: RolesRepository,
    G: RoleGrantsRepository,
    T: TenantGrantsRepository,
    U: UsersRepository,
{
    async fn permission(&self, id: Uuid) -> Result<PermissionNode, AccessControlError> {
        self.services
            .catalog
            .node(id)
            .await
            .map_err(|e| log_and_convert("permission", e))
    }

    async fn permission_of_kind(
        &self,
        id: Uuid,
        kind: PermissionKind,
    ) -> Result<PermissionNode, AccessControlError> {
        self.services
            .catalog
            .node_of_kind(id, kind)
            .await
            .map_err(|e| log_and_convert("permission_of_kind", e))
    }

    async fn list_permissions(
        &self,
        filter: CatalogFilter,
    ) -> Result<Vec<PermissionNode>, AccessControlError> {
        self.services
            .catalog
            .list(&filter)
            .await
            .map_err(|e| log_and_convert("list_permissions", e))
    }

    async fn create_permission(
        &self,
        new_node: NewPermissionNode,
    ) -> Result<PermissionNode, AccessControlError> {
        self.services
            .catalog
            .create_node(new_node)
            .await
            .map_err(|e| log_and_convert("create_permission", e))
    }

    async fn update_permission(
        &self,
        update: UpdatePermissionNode,
    ) -> Result<PermissionNode, AccessControlError> {
        self.services
            .catalog
            .update_node(update)
            .await
            .map_err(|e| log_and_convert("update_permission", e))
    }

    async fn soft_delete_permission(&self, id: Uuid) -> Result<(), AccessControlError> {
        self.services
            .catalog
            .soft_delete_node(id)
            .await
            .map_err(|e| log_and_convert("soft_delete_permission", e))
    }

    async fn delete_permission(&self, id: Uuid) -> Result<(), AccessControlError> {
        self.services
            .catalog
            .delete_node(id)
            .await
            .map_err(|e| log_and_convert("delete_permission", e))
    }

    async fn permission_tree(
        &self,
        actor: &ActorContext,
    ) -> Result<Vec<PermissionTreeNode>, AccessControlError> {
        self.services
            .catalog
            .permission_tree(actor)
            .await
            .map_err(|e| log_and_convert("permission_tree", e))
    }

    async fn role_permission_ids(&self, role_id: Uuid) -> Result<Vec<Uuid>, AccessControlError> {
        self.services
            .grants
            .role_permission_ids(role_id)
            .await
            .map_err(|e| log_and_convert("role_permission_ids", e))
    }

    async fn tenant_permission_ids(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<Uuid>, AccessControlError> {
        self.services
            .grants
            .tenant_permission_ids(tenant_id)
            .await
            .map_err(|e| log_and_convert("tenant_permission_ids", e))
    }

    async fn assign_role_permissions(
        &self,
        actor: &ActorContext,
        role_id: Uuid,
        desired: Vec<Uuid>,
    ) -> Result<GrantOutcome, AccessControlError> {
        self.services
            .grants
            .assign_role_permissions(actor, role_id, desired)
            .await
            .map_err(|e| log_and_convert("assign_role_permissions", e))
    }

    async fn assign_tenant_permissions(
        &self,
        tenant_id: Uuid,
        desired: Vec<Uuid>,
    ) -> Result<GrantOutcome, AccessControlError> {
        self.services
            .grants
            .assign_tenant_permissions(tenant_id, desired)
            .await
            .map_err(|e| log_and_convert("assign_tenant_permissions", e))
    }

    fn cache_key_templates(&self) -> Vec<&'static str> {
        cache::key_templates()
    }

    async fn clear_cache_key(&self, key: &str) -> Result<bool, AccessControlError> {
        self.services.invalidator.clear_key(key).await.map_err(|e| {
            tracing::error!(error = %e, "access-control operation failed: clear_cache_key");
            AccessControlError::internal()
        })
    }
}
