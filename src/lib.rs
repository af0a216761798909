//! Bookshelf application library
//!
//! Wires the project modules into the kernel registry and runs them behind
//! the HTTP facade.

pub mod app;
pub mod modules;
pub mod utils;

pub use app::{build_registry, run};
