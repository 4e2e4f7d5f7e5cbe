//! LIBRIS application library
//!
//! Wires the project modules onto the kernel, database and HTTP crates.

pub mod app;
pub mod modules;

pub use app::App;
