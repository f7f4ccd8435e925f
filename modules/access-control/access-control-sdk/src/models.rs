//! Domain models for the access control module.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Kind of a permission catalog node.
///
/// `Group` and `Menu` nodes form the container level of the permission
/// tree; `Api` and `Dot` (fine-grained action point) nodes are leaves
/// attached to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    Group,
    Menu,
    Api,
    Dot,
}

impl PermissionKind {
    /// Stable lowercase name, used in messages and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Menu => "menu",
            Self::Api => "api",
            Self::Dot => "dot",
        }
    }

    /// Whether nodes of this kind may carry children in the permission tree.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Group | Self::Menu)
    }
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the permission catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionNode {
    pub id: Uuid,
    /// Containing node, `None` for top-level entries.
    pub parent_id: Option<Uuid>,
    /// Human-readable name shown in admin UIs.
    pub label: String,
    /// Route or endpoint path, where applicable for the kind.
    pub path: Option<String>,
    pub kind: PermissionKind,
    /// Ordering weight among siblings.
    pub sort: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Request payload for creating a catalog node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPermissionNode {
    /// Explicit id; generated when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub kind: PermissionKind,
    #[serde(default)]
    pub sort: i32,
}

/// Request payload for updating a catalog node.
///
/// All fields are replaced; the node kind is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePermissionNode {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub sort: i32,
}

/// Filter for catalog listing.
///
/// The created range is applied only when both bounds are present;
/// the upper bound is inclusive of the whole day it falls on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Substring matched against node label and path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_to: Option<OffsetDateTime>,
}

/// Container node of the rendered permission tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTreeNode {
    pub id: Uuid,
    pub label: String,
    pub kind: PermissionKind,
    /// Leaf permissions attached to this container, in catalog order.
    pub leaves: Vec<PermissionTreeLeaf>,
}

/// Leaf of the rendered permission tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTreeLeaf {
    pub id: Uuid,
    pub label: String,
    pub kind: PermissionKind,
}

/// Scope of the caller performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorScope {
    /// Platform operator, no tenant restrictions apply.
    Platform,
    /// Tenant administrator, grants are confined to the tenant's allowance.
    Tenant(Uuid),
}

/// Identity and scope of the caller, as resolved by the authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub subject_id: Uuid,
    pub scope: ActorScope,
}

impl ActorContext {
    /// Platform-scoped actor.
    #[must_use]
    pub fn platform(subject_id: Uuid) -> Self {
        Self {
            subject_id,
            scope: ActorScope::Platform,
        }
    }

    /// Tenant-scoped actor.
    #[must_use]
    pub fn tenant(subject_id: Uuid, tenant_id: Uuid) -> Self {
        Self {
            subject_id,
            scope: ActorScope::Tenant(tenant_id),
        }
    }

    #[must_use]
    pub fn is_tenant_scoped(&self) -> bool {
        matches!(self.scope, ActorScope::Tenant(_))
    }

    /// Tenant of a tenant-scoped actor, `None` for platform actors.
    #[must_use]
    pub fn tenant_id(&self) -> Option<Uuid> {
        match self.scope {
            ActorScope::Platform => None,
            ActorScope::Tenant(tenant_id) => Some(tenant_id),
        }
    }
}

/// Result of a grant assignment.
///
/// Reports what the reconciliation actually did: rows written, desired
/// ids dropped by tenant scoping, and how many user cache entries were
/// evicted after commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantOutcome {
    /// Grant rows inserted.
    pub inserted: u64,
    /// Grant rows deleted.
    pub removed: u64,
    /// Desired ids outside the caller's allowance, dropped before persistence.
    #[serde(default)]
    pub dropped: Vec<Uuid>,
    /// Unique users whose cached permissions were evicted.
    pub cache_evictions: u64,
}
