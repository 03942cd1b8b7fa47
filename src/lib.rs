//! Pacta: Pacta Contract Toolkit
//!
//! Mirrors a remote contract catalog into a local SQLite cache, layers
//! locally-authored annotations on top, and merges annotation snapshots
//! across machines without a central server.

pub mod cli;
pub mod core;
pub mod entities;
