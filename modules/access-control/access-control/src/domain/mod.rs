//! Domain layer: catalog rules, grant reconciliation and cache coherence.

pub mod cache;
pub mod error;
pub mod local_client;
pub mod reconcile;
pub mod repos;
pub mod scope;
pub mod service;
pub mod tree;

pub use error::DomainError;
pub use local_client::LocalClient;
