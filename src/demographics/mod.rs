//! Demographic model: decade tables of given names, life expectancy,
//! parenting age and family size, plus the estimation queries built on them.
//!
//! Defaults are embedded in the binary via `include_str!`; a
//! `demographics.json` in a data directory can override them.

pub mod names;
pub mod tables;

use std::path::Path;

use rand::Rng;
use tracing::warn;

pub use names::{infer_gender_from_given_name, is_feminine_pool_name, is_masculine_pool_name};
pub use tables::{DemographicTables, ParentingAge, SurnameInfo};

use crate::error::DemographicsError;
use crate::family::Gender;

const DEFAULT_DEMOGRAPHICS_JSON: &str = include_str!("../../data/defaults/demographics.json");

/// Everything known about one tabulated decade.
#[derive(Clone, Debug, PartialEq)]
pub struct DecadeProfile {
    pub decade: i32,
    pub given_names: Vec<String>,
    pub life_expectancy: i32,
    pub parenting_age: ParentingAge,
    pub average_children: f32,
}

/// Validated demographic tables.
///
/// Decade profiles are kept in ascending order and are never empty.
#[derive(Clone, Debug)]
pub struct Demographics {
    profiles: Vec<DecadeProfile>,
    feminine_exceptions: Vec<String>,
    masculine_exceptions: Vec<String>,
    surnames: Vec<SurnameInfo>,
}

/// Decade a year falls in (1987 -> 1980).
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

impl Demographics {
    /// Load from embedded defaults compiled into the binary.
    pub fn defaults() -> Self {
        let tables: DemographicTables = serde_json::from_str(DEFAULT_DEMOGRAPHICS_JSON)
            .expect("Failed to parse embedded demographics.json");
        Self::from_tables(tables).expect("Embedded demographics.json is inconsistent")
    }

    /// Load `demographics.json` from `dir`, falling back to the embedded
    /// defaults when the file is missing or unusable.
    pub fn load_from(dir: &Path) -> Self {
        let path = dir.join("demographics.json");
        if !path.exists() {
            return Self::defaults();
        }
        let loaded = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|contents| Self::from_json(&contents).map_err(|e| e.to_string()));
        match loaded {
            Ok(demographics) => demographics,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring demographic override");
                Self::defaults()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DemographicsError> {
        let tables: DemographicTables = serde_json::from_str(json)?;
        Self::from_tables(tables)
    }

    /// Check that every decade in the name table is covered by the other
    /// tables and build the per-decade profiles.
    pub fn from_tables(tables: DemographicTables) -> Result<Self, DemographicsError> {
        if tables.given_names_by_decade.is_empty() {
            return Err(DemographicsError::NoDecades);
        }
        if tables.surnames.is_empty() {
            return Err(DemographicsError::NoSurnames);
        }

        let mut profiles = Vec::with_capacity(tables.given_names_by_decade.len());
        for (&decade, names) in &tables.given_names_by_decade {
            if names.is_empty() {
                return Err(DemographicsError::EmptyNamePool(decade));
            }
            let missing = |table| DemographicsError::MissingDecade { decade, table };
            let life_expectancy = *tables
                .life_expectancy_by_decade
                .get(&decade)
                .ok_or_else(|| missing("life expectancy"))?;
            let parenting_age = *tables
                .parenting_age_by_decade
                .get(&decade)
                .ok_or_else(|| missing("parenting age"))?;
            let average_children = *tables
                .average_children_by_decade
                .get(&decade)
                .ok_or_else(|| missing("average children"))?;
            profiles.push(DecadeProfile {
                decade,
                given_names: names.clone(),
                life_expectancy,
                parenting_age,
                average_children,
            });
        }

        Ok(Self {
            profiles,
            feminine_exceptions: tables.feminine_exceptions,
            masculine_exceptions: tables.masculine_exceptions,
            surnames: tables.surnames,
        })
    }

    pub fn decades(&self) -> impl Iterator<Item = i32> + '_ {
        self.profiles.iter().map(|p| p.decade)
    }

    /// The tabulated decade closest to `year`. Ties go to the earlier decade.
    pub fn closest_decade(&self, year: i32) -> &DecadeProfile {
        let mut best = &self.profiles[0];
        let mut best_diff = (year - best.decade).abs();
        for profile in &self.profiles[1..] {
            let diff = (year - profile.decade).abs();
            if diff < best_diff {
                best = profile;
                best_diff = diff;
            }
        }
        best
    }

    /// Profile for the decade `year` falls in, clamped to the tables.
    fn profile_for_year(&self, year: i32) -> &DecadeProfile {
        self.closest_decade(decade_of(year))
    }

    /// Birth year of a parent: the child's birth year minus the typical
    /// parenting age for that gender in the child's decade.
    pub fn estimate_parent_birth_year(&self, child_birth_year: i32, parent_gender: Gender) -> i32 {
        let age = self.profile_for_year(child_birth_year).parenting_age;
        child_birth_year
            - match parent_gender {
                Gender::Male => age.male,
                Gender::Female => age.female,
            }
    }

    /// Birth year plus life expectancy, or `None` when that lands after
    /// `current_year` and the person is presumed alive.
    pub fn estimate_death_year(&self, birth_year: i32, current_year: i32) -> Option<i32> {
        let death_year = birth_year + self.profile_for_year(birth_year).life_expectancy;
        (death_year <= current_year).then_some(death_year)
    }

    /// Decade of birth for someone `age` years old in `current_year`.
    pub fn estimate_birth_decade(&self, age: i32, current_year: i32) -> i32 {
        decade_of(current_year - age)
    }

    /// Number of children for a family of `decade`: the decade average
    /// perturbed by up to two either way, never negative.
    pub fn generate_number_of_children(&self, decade: i32, rng: &mut impl Rng) -> u32 {
        let avg = self.closest_decade(decade).average_children;
        let min = (avg - 2.0).floor().max(0.0) as u32;
        let max = (avg + 2.0).ceil().max(0.0) as u32;
        rng.gen_range(min..=max)
    }

    /// Given names from the pool of the decade closest to `year` that fit `gender`.
    pub fn given_names_for(&self, year: i32, gender: Gender) -> Vec<&str> {
        let pool = &self.closest_decade(year).given_names;
        let filtered: Vec<&str> = pool
            .iter()
            .filter(|name| match gender {
                Gender::Male => is_masculine_pool_name(name, &self.masculine_exceptions),
                Gender::Female => is_feminine_pool_name(name, &self.feminine_exceptions),
            })
            .map(String::as_str)
            .collect();
        if filtered.is_empty() {
            pool.iter().map(String::as_str).collect()
        } else {
            filtered
        }
    }

    /// A given name plausible for someone of `gender` born around `year`.
    pub fn random_given_name(&self, year: i32, gender: Gender, rng: &mut impl Rng) -> String {
        let names = self.given_names_for(year, gender);
        names[rng.gen_range(0..names.len())].to_string()
    }

    /// A surname from the database, different from `excluding` when possible.
    pub fn random_surname(&self, excluding: Option<&str>, rng: &mut impl Rng) -> String {
        let candidates: Vec<&SurnameInfo> = self
            .surnames
            .iter()
            .filter(|s| Some(s.surname.as_str()) != excluding)
            .collect();
        if candidates.is_empty() {
            return self.surnames[rng.gen_range(0..self.surnames.len())].surname.clone();
        }
        candidates[rng.gen_range(0..candidates.len())].surname.clone()
    }

    /// Origin details for `surname`, or an `Unknown` origin with no regions.
    pub fn surname_info(&self, surname: &str) -> SurnameInfo {
        self.surnames
            .iter()
            .find(|s| s.surname == surname)
            .cloned()
            .unwrap_or_else(|| SurnameInfo {
                surname: surname.to_string(),
                origin: "Unknown".to_string(),
                common_regions: Vec::new(),
            })
    }

    pub fn surnames(&self) -> &[SurnameInfo] {
        &self.surnames
    }
}

impl Default for Demographics {
    fn default() -> Self {
        Self::defaults()
    }
}
