//! AWS-oriented adapters and handlers for the GEMP statistics export.
//!
//! This crate owns runtime integration details (Lambda handler, Secrets
//! Manager, MySQL and S3 adapters, configuration and logging) on top of the
//! domain primitives in `gemp_stats_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
