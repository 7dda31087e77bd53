//! Demographic table data loaded from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Typical age at which people of each gender had children.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParentingAge {
    pub male: i32,
    pub female: i32,
}

/// Origin and regional spread of a surname.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurnameInfo {
    pub surname: String,
    pub origin: String,
    #[serde(default)]
    pub common_regions: Vec<String>,
}

/// Container for deserializing the demographics JSON file.
///
/// All tables are keyed by decade start year. The decades of the given-name
/// table are the canonical decade axis; the other tables must cover them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DemographicTables {
    pub given_names_by_decade: BTreeMap<i32, Vec<String>>,
    pub life_expectancy_by_decade: BTreeMap<i32, i32>,
    pub parenting_age_by_decade: BTreeMap<i32, ParentingAge>,
    pub average_children_by_decade: BTreeMap<i32, f32>,
    /// Names ending in a consonant that are still feminine.
    #[serde(default)]
    pub feminine_exceptions: Vec<String>,
    /// Names treated as masculine regardless of ending.
    #[serde(default)]
    pub masculine_exceptions: Vec<String>,
    pub surnames: Vec<SurnameInfo>,
}
