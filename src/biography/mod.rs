//! External biographical lookups.
//!
//! The synthesis engine talks to the outside world through two collaborators:
//! a [`BiographySource`] that searches and fetches person records, and a
//! [`Selection`] that asks a human to pick among candidates or to confirm a
//! fallback. Any concrete service can back the source; [`wikidata`] provides one.

pub mod gather;
pub mod wikidata;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use gather::gather_family;
pub use wikidata::{WikidataConfig, WikidataSource};

use crate::error::LookupError;

/// A search hit offered to the user for disambiguation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A fetched person with references to relatives by external id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub death_date: Option<NaiveDate>,
    #[serde(default)]
    pub father_id: Option<String>,
    #[serde(default)]
    pub mother_id: Option<String>,
    #[serde(default)]
    pub spouse_ids: Vec<String>,
    #[serde(default)]
    pub children_ids: Vec<String>,
}

/// Source of candidate person records.
#[async_trait]
pub trait BiographySource: Send + Sync {
    /// Candidates matching a given name and surname. Empty when nothing matches.
    async fn search(&self, given_name: &str, surname: &str) -> Result<Vec<CandidateRecord>, LookupError>;

    /// Full record for `id`, or `None` when the source has no such entity.
    async fn fetch_detail(&self, id: &str) -> Result<Option<PersonRecord>, LookupError>;
}

/// The human in the loop.
#[async_trait]
pub trait Selection: Send + Sync {
    /// Pick one of `candidates`, or `None` to cancel.
    async fn choose(&self, candidates: &[CandidateRecord]) -> Option<CandidateRecord>;

    /// Whether to generate plausible relatives when no external data was merged.
    async fn confirm_synthetic(&self) -> bool;
}

/// A `Selection` that never picks a candidate and always accepts synthetic data.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysSynthesize;

#[async_trait]
impl Selection for AlwaysSynthesize {
    async fn choose(&self, _candidates: &[CandidateRecord]) -> Option<CandidateRecord> {
        None
    }

    async fn confirm_synthetic(&self) -> bool {
        true
    }
}
