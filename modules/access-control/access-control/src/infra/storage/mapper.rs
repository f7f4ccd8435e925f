//! Conversions between storage rows and contract types.

use access_control_sdk::{PermissionKind, PermissionNode};

use crate::domain::error::DomainError;
use crate::domain::repos::ActiveRole;

use super::entity::{permission, role};

pub fn kind_to_db(kind: PermissionKind) -> i16 {
    match kind {
        PermissionKind::Group => 1,
        PermissionKind::Menu => 2,
        PermissionKind::Api => 3,
        PermissionKind::Dot => 4,
    }
}

pub fn kind_from_db(raw: i16) -> Result<PermissionKind, DomainError> {
    match raw {
        1 => Ok(PermissionKind::Group),
        2 => Ok(PermissionKind::Menu),
        3 => Ok(PermissionKind::Api),
        4 => Ok(PermissionKind::Dot),
        other => Err(DomainError::database(format!(
            "unknown permission kind discriminant {other}"
        ))),
    }
}

pub fn node_from_row(row: permission::Model) -> Result<PermissionNode, DomainError> {
    Ok(PermissionNode {
        id: row.id,
        parent_id: row.parent_id,
        label: row.label,
        path: row.path,
        kind: kind_from_db(row.kind)?,
        sort: row.sort,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn active_role_from_row(row: role::Model) -> ActiveRole {
    ActiveRole {
        id: row.id,
        tenant_id: row.tenant_id,
    }
}
