//! Subcommand implementations.

pub mod config;
pub mod crops;
pub mod diagnose;
pub mod serve;
