//! tysnap - TypeScript type snapshotter
//!
//! tysnap extracts one named type declaration and everything it transitively
//! references from a TypeScript codebase, and re-emits the whole closure as a
//! single self-contained generated file under one namespace. Constants
//! annotated with an extracted type travel with it.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (resolve, walk, harvest, emit)

pub mod cli;
pub mod config;
pub mod core;
