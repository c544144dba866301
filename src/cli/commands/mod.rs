//! CLI command implementations.

pub mod auth;
pub mod fix;
pub mod init;
pub mod issues;
pub mod sync;
