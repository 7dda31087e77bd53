//! Error types shared across the crate.

use std::io;

use thiserror::Error;

use crate::family::PersonId;

/// Failures surfaced by the entity store and the operations built on it.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Serialized tree data did not parse into `{people, relationships}`.
    #[error("malformed tree data: {0}")]
    MalformedData(serde_json::Error),

    #[error("failed to encode tree: {0}")]
    Encode(serde_json::Error),

    #[error("person {0} not found")]
    PersonNotFound(PersonId),

    /// Autocomplete needs at least one person to anchor on.
    #[error("the tree is empty; add at least one person before autocompleting")]
    EmptyTree,

    #[error("a person needs a name")]
    EmptyName,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Failures from a `BiographySource`. Always recovered by the synthesis engine.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Demographic tables that do not cover every decade they claim to.
#[derive(Debug, Error)]
pub enum DemographicsError {
    #[error("demographic tables have no decades")]
    NoDecades,

    #[error("decade {decade} missing from the {table} table")]
    MissingDecade { decade: i32, table: &'static str },

    #[error("decade {0} has an empty name pool")]
    EmptyNamePool(i32),

    #[error("surname list is empty")]
    NoSurnames,

    #[error("failed to parse demographic data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to parse config {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
}
