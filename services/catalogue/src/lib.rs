//! services/catalogue/src/lib.rs
//!
//! The terminal client for the movie catalogue: HTTP and file adapters for the
//! core ports, the views, and the shell that drives them.

pub mod adapters;
pub mod config;
pub mod error;
pub mod render;
pub mod router;
pub mod shell;
pub mod views;
