//! Family tree library
//!
//! Genealogy graph storage, relationship queries, display projection and
//! ancestry autocompletion. Re-exports modules for use by the binary.

pub mod biography;
pub mod config;
pub mod demographics;
pub mod error;
pub mod family;
pub mod persistence;
pub mod render;
pub mod synthesis;
