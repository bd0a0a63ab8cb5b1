//! CLI command implementations.

pub mod ai;
pub mod backup;
pub mod config;
pub mod key;
pub mod smtp;
