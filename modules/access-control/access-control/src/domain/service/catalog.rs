//! Permission catalog service: CRUD over catalog nodes and the grant tree.

use std::collections::BTreeSet;
use std::sync::Arc;

use access_control_sdk::{
    ActorContext, CatalogFilter, NewPermissionNode, PermissionKind, PermissionNode,
    PermissionTreeNode, UpdatePermissionNode,
};
use sea_orm::DatabaseConnection;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::PermissionsRepository;
use crate::domain::service::ServiceConfig;
use crate::domain::tree;

/// Catalog operations over permission nodes.
///
/// Catalog writes are single-row and rely on database constraints; only the
/// grant workflows in [`super::GrantService`] need explicit transactions.
pub struct CatalogService<P: PermissionsRepository> {
    db: DatabaseConnection,
    permissions: Arc<P>,
    config: ServiceConfig,
}

impl<P: PermissionsRepository> CatalogService<P> {
    pub fn new(db: DatabaseConnection, permissions: Arc<P>, config: ServiceConfig) -> Self {
        Self {
            db,
            permissions,
            config,
        }
    }

    /// Lists catalog nodes matching `filter`, ordered by parent then sort key.
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<PermissionNode>, DomainError> {
        let nodes = self.permissions.list(&self.db, filter).await?;
        tracing::debug!(count = nodes.len(), "listed permission nodes");
        Ok(nodes)
    }

    /// Fetches one node by id.
    #[instrument(skip(self), fields(permission_id = %id))]
    pub async fn node(&self, id: Uuid) -> Result<PermissionNode, DomainError> {
        self.permissions
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::permission_not_found(id))
    }

    /// Fetches one node by id and checks it has the expected kind.
    #[instrument(skip(self), fields(permission_id = %id, kind = %kind))]
    pub async fn node_of_kind(
        &self,
        id: Uuid,
        kind: PermissionKind,
    ) -> Result<PermissionNode, DomainError> {
        let node = self.node(id).await?;
        if node.kind != kind {
            return Err(DomainError::kind_mismatch(id, kind, node.kind));
        }
        Ok(node)
    }

    /// Creates a catalog node.
    ///
    /// Leaf nodes (api, dot) must hang off an existing container; container
    /// nodes may be roots. Ids default to a fresh UUIDv7 when not supplied.
    #[instrument(skip(self, new), fields(kind = %new.kind))]
    pub async fn create_node(
        &self,
        new: NewPermissionNode,
    ) -> Result<PermissionNode, DomainError> {
        if new.label.trim().is_empty() {
            return Err(DomainError::validation("label must not be empty"));
        }
        self.assert_valid_parent(None, new.parent_id, new.kind)
            .await?;

        let node = PermissionNode {
            id: new.id.unwrap_or_else(Uuid::now_v7),
            parent_id: new.parent_id,
            label: new.label,
            path: new.path,
            kind: new.kind,
            sort: new.sort,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        self.permissions.insert(&self.db, &node).await?;

        tracing::info!(permission_id = %node.id, "permission node created");
        Ok(node)
    }

    /// Updates a catalog node in place. The kind is immutable; everything
    /// else is replaced with the supplied values.
    #[instrument(skip(self, update), fields(permission_id = %update.id))]
    pub async fn update_node(
        &self,
        update: UpdatePermissionNode,
    ) -> Result<PermissionNode, DomainError> {
        if update.label.trim().is_empty() {
            return Err(DomainError::validation("label must not be empty"));
        }

        let current = self.node(update.id).await?;
        self.assert_valid_parent(Some(update.id), update.parent_id, current.kind)
            .await?;

        let node = PermissionNode {
            id: current.id,
            parent_id: update.parent_id,
            label: update.label,
            path: update.path,
            kind: current.kind,
            sort: update.sort,
            created_at: current.created_at,
            updated_at: Some(OffsetDateTime::now_utc()),
        };
        let written = self.permissions.update(&self.db, &node).await?;
        if !written {
            return Err(DomainError::permission_not_found(update.id));
        }

        tracing::info!(permission_id = %node.id, "permission node updated");
        Ok(node)
    }

    /// Marks a catalog node deleted without removing the row. The node
    /// disappears from listings, lookups and the tree; grant rows pointing
    /// at it stay put.
    #[instrument(skip(self), fields(permission_id = %id))]
    pub async fn soft_delete_node(&self, id: Uuid) -> Result<(), DomainError> {
        let marked = self
            .permissions
            .soft_delete(&self.db, id, OffsetDateTime::now_utc())
            .await?;
        if !marked {
            return Err(DomainError::permission_not_found(id));
        }

        tracing::info!(permission_id = %id, "permission node soft-deleted");
        Ok(())
    }

    /// Deletes a catalog node. Children are left in place and simply stop
    /// appearing in the tree until reparented.
    #[instrument(skip(self), fields(permission_id = %id))]
    pub async fn delete_node(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = self.permissions.delete(&self.db, id).await?;
        if !deleted {
            return Err(DomainError::permission_not_found(id));
        }

        tracing::info!(permission_id = %id, "permission node deleted");
        Ok(())
    }

    /// Builds the two-level permission tree visible to `actor`.
    ///
    /// Tenant-scoped actors see only nodes granted to their tenant when
    /// tenant mode is on; platform actors see the whole catalog.
    #[instrument(skip(self, actor), fields(subject_id = %actor.subject_id))]
    pub async fn permission_tree(
        &self,
        actor: &ActorContext,
    ) -> Result<Vec<PermissionTreeNode>, DomainError> {
        let nodes = if self.config.tenant_mode
            && let Some(tenant_id) = actor.tenant_id()
        {
            self.permissions
                .list_granted_to_tenant(&self.db, tenant_id)
                .await?
        } else {
            self.permissions
                .list(&self.db, &CatalogFilter::default())
                .await?
        };

        Ok(tree::build_permission_tree(&nodes))
    }

    /// Validates a parent reference for a node of `kind`.
    ///
    /// `node_id` is set on updates so reparenting onto the node's own
    /// subtree is rejected.
    async fn assert_valid_parent(
        &self,
        node_id: Option<Uuid>,
        parent_id: Option<Uuid>,
        kind: PermissionKind,
    ) -> Result<(), DomainError> {
        let Some(parent_id) = parent_id else {
            if kind.is_container() {
                return Ok(());
            }
            return Err(DomainError::invalid_parent(format!(
                "{kind} nodes require a group or menu parent"
            )));
        };

        if node_id == Some(parent_id) {
            return Err(DomainError::invalid_parent("node cannot be its own parent"));
        }

        let parent = self
            .permissions
            .get(&self.db, parent_id)
            .await?
            .ok_or_else(|| {
                DomainError::invalid_parent(format!("parent {parent_id} does not exist"))
            })?;
        if !parent.kind.is_container() {
            return Err(DomainError::invalid_parent(format!(
                "parent {parent_id} is a {} node, expected group or menu",
                parent.kind
            )));
        }

        if let Some(node_id) = node_id {
            let mut seen = BTreeSet::new();
            let mut cursor = parent.parent_id;
            while let Some(ancestor_id) = cursor {
                if ancestor_id == node_id {
                    return Err(DomainError::invalid_parent(
                        "node cannot be moved under its own subtree",
                    ));
                }
                if !seen.insert(ancestor_id) {
                    break;
                }
                cursor = self
                    .permissions
                    .get(&self.db, ancestor_id)
                    .await?
                    .and_then(|node| node.parent_id);
            }
        }

        Ok(())
    }
}
