//! Command implementations

pub mod annotate;
pub mod cache;
pub mod contract;
pub mod fiscal;
pub mod init;
pub mod links;
pub mod refresh;
pub mod snapshot;
pub mod sub;
