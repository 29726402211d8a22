//! Test utilities and fixtures for jsprune
//!
//! Shared by the integration tests of `jsprune-core` and `jsprune-cli`.

pub mod clean;
pub mod fixtures;
