// GitFyle Provenance - API Core
//
// This crate provides the records backend for software-contribution provenance:
// sources, repositories, contributors, contribution types, contributions and
// configuration entries, each behind the same foundation service.

pub mod common;
pub mod config;
pub mod domains;
pub mod foundation;
pub mod kernel;

pub use config::*;
