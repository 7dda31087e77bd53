//! People in the family graph.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::PersonId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// A person record. The id is assigned at creation and never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub death_date: Option<NaiveDate>,
}

impl Person {
    pub fn new(
        id: PersonId,
        name: impl Into<String>,
        gender: Gender,
        birth_date: Option<NaiveDate>,
        death_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            birth_date,
            death_date,
        }
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_date.map(|d| d.year())
    }

    pub fn is_alive(&self) -> bool {
        self.death_date.is_none()
    }

    /// First token of the full name.
    pub fn given_name(&self) -> &str {
        given_name_of(&self.name)
    }

    /// Last token of the full name, empty for single-word names.
    pub fn surname(&self) -> &str {
        surname_of(&self.name)
    }
}

pub fn given_name_of(full_name: &str) -> &str {
    full_name.split_whitespace().next().unwrap_or("")
}

pub fn surname_of(full_name: &str) -> &str {
    let mut parts = full_name.split_whitespace();
    let first = parts.next();
    match (first, parts.last()) {
        (Some(_), Some(last)) => last,
        _ => "",
    }
}
