use access_control_sdk::{AccessControlError, PermissionKind};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("role {id} does not exist or was deleted")]
    RoleNotFound { id: Uuid },

    #[error("permission not found: {id}")]
    PermissionNotFound { id: Uuid },

    #[error("permission {id} is a {actual}, expected {expected}")]
    KindMismatch {
        id: Uuid,
        expected: PermissionKind,
        actual: PermissionKind,
    },

    #[error("invalid parent: {message}")]
    InvalidParent { message: String },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("tenant {tenant_id} has no registered store")]
    TenantUnavailable { tenant_id: Uuid },

    #[error("database error: {message}")]
    Database { message: String },
}

impl DomainError {
    #[must_use]
    pub fn role_not_found(id: Uuid) -> Self {
        Self::RoleNotFound { id }
    }

    #[must_use]
    pub fn permission_not_found(id: Uuid) -> Self {
        Self::PermissionNotFound { id }
    }

    #[must_use]
    pub fn kind_mismatch(id: Uuid, expected: PermissionKind, actual: PermissionKind) -> Self {
        Self::KindMismatch {
            id,
            expected,
            actual,
        }
    }

    pub fn invalid_parent(message: impl Into<String>) -> Self {
        Self::InvalidParent {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn tenant_unavailable(tenant_id: Uuid) -> Self {
        Self::TenantUnavailable { tenant_id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        Self::database(e.to_string())
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for AccessControlError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::RoleNotFound { .. }
            | DomainError::PermissionNotFound { .. }
            | DomainError::TenantUnavailable { .. } => {
                AccessControlError::not_found(domain_error.to_string())
            }
            DomainError::KindMismatch { .. }
            | DomainError::InvalidParent { .. }
            | DomainError::Validation { .. } => {
                AccessControlError::validation(domain_error.to_string())
            }
            DomainError::Database { .. } => AccessControlError::internal(),
        }
    }
}
