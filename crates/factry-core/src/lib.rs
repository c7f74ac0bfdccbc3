//! Core types and trait definitions for the Factry fact bot.
//!
//! This crate is deliberately free of database and transport dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod matcher;
pub mod similarity;
pub mod store;

pub use error::{Error, Result};
