//! Shared library for the Mentor tutoring service
//!
//! Provides the error taxonomy, configuration resolution, and database
//! layer (pool initialization, schema, persistent models) used by the
//! service crates.

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
