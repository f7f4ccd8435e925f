//! `SeaORM` entities for the access-control tables.

pub mod permission;
pub mod role;
pub mod role_grant;
pub mod tenant_grant;
pub mod user;
pub mod user_role;
