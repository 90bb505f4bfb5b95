//! Core extraction engine.
//!
//! ## Module Structure
//!
//! - `file_scanner`: Source tree scanning (walkdir + glob filtering)
//! - `parsers`: TypeScript parsing via swc
//! - `symbols`: Symbol table and per-occurrence name resolution
//! - `decl`: Structural declaration bodies with reference occurrences
//! - `registry`: Output-side registries with collision-free renaming
//! - `walk`: Reference closure walking
//! - `harvest`: Constant harvesting for extracted types
//! - `emit`: Rendering and output verification
//! - `context`: Pipeline orchestration
//! - `error`: Pipeline-specific error types

pub mod context;
pub mod decl;
pub mod emit;
pub mod error;
pub mod file_scanner;
pub mod harvest;
pub mod parsers;
pub mod registry;
pub mod symbols;
pub mod walk;

pub use context::{ParseIssue, Snapshot, SnapshotContext};
pub use error::SnapshotError;
