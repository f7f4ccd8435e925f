//! `SeaORM`-backed persistence for the access-control module.

pub mod entity;
pub mod migrations;

pub(crate) mod mapper;

mod permissions_sea_repo;
mod role_grants_sea_repo;
mod roles_sea_repo;
mod tenant_grants_sea_repo;
mod users_sea_repo;

pub use permissions_sea_repo::SeaPermissionsRepository;
pub use role_grants_sea_repo::SeaRoleGrantsRepository;
pub use roles_sea_repo::SeaRolesRepository;
pub use tenant_grants_sea_repo::SeaTenantGrantsRepository;
pub use users_sea_repo::SeaUsersRepository;
