//! Infrastructure layer - Store implementations, services and runtime plumbing

pub mod logging;
pub mod storage;
pub mod user;
