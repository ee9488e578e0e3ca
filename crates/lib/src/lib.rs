//! repatch-lib: Core types and logic for repatch
//!
//! This crate reconciles an original Maven repository tree with a patch tree:
//! - `coord`: path <-> coordinate codec for repository files
//! - `scan`: locating the repository root and enumerating artifacts
//! - `package`: the version map embedded in a galleon feature-pack
//! - `diff`: which entries of a package's version map are superseded
//! - `patch`: assembling and installing patch feature-packs
//! - `delete`: removing superseded files without touching their neighbours
//! - `manifest`: the `patches.xml` list of created patches
//! - `run`: the end-to-end reconciliation run

pub mod archive;
pub mod config;
pub mod consts;
pub mod coord;
pub mod delete;
pub mod descriptor;
pub mod diff;
pub mod manifest;
pub mod package;
pub mod patch;
pub mod props;
pub mod run;
pub mod scan;
pub mod summary;
pub mod util;
