//! Cache backends for user permission sets.

mod memory;

pub use memory::InMemoryPermissionCache;
