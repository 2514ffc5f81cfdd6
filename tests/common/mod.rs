//! Common fixtures for repowatcher integration tests
//!
//! - `TestRepo` / `TestRemote` build real git working trees in temp dirs
//! - `ConfigFile` writes watch-list configs next to them
//! - assertions for parsing status lines

#![allow(dead_code)]

pub mod assertions;
pub mod test_repo;

pub use assertions::*;
pub use test_repo::{git_available, ConfigFile, TestRemote, TestRepo};
