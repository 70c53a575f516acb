//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`datasets`] - List configured datasets
//! - [`inspect`] - Load one tile synchronously and describe it
//! - [`walk`] - Stream the quadtree breadth-first through asynchronous loads

pub mod common;
pub mod datasets;
pub mod inspect;
pub mod walk;
