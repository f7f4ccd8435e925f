//! Infrastructure layer: storage and cache backends.

pub mod cache;
pub mod storage;
