//! Manual entry of a person together with their relation to someone already
//! in the tree.

use std::str::FromStr;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{FamilyTree, Gender, Person, PersonId, Relationship};
use crate::error::{TreeError, TreeResult};

/// How a newly entered person relates to the person they are attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeRole {
    /// The new person is a parent of the related person.
    Parent,
    /// The new person is a child of the related person.
    Child,
    Spouse,
    Sibling,
}

impl FromStr for RelativeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parent" => Ok(RelativeRole::Parent),
            "child" => Ok(RelativeRole::Child),
            "spouse" => Ok(RelativeRole::Spouse),
            "sibling" => Ok(RelativeRole::Sibling),
            other => Err(format!("unknown relation '{}'", other)),
        }
    }
}

/// Add a new person, optionally related to an existing one.
///
/// A sibling gets an explicit `sibling` edge plus a parent-child edge from
/// each of the related person's current parents. Edges are appended without
/// duplicate checks. Returns the new person's id.
pub fn add_relative(
    tree: &mut FamilyTree,
    name: &str,
    gender: Gender,
    birth_date: Option<NaiveDate>,
    death_date: Option<NaiveDate>,
    relation: Option<(RelativeRole, &PersonId)>,
    rng: &mut impl Rng,
) -> TreeResult<PersonId> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TreeError::EmptyName);
    }
    if let Some((_, related_to)) = relation {
        if !tree.contains(related_to) {
            return Err(TreeError::PersonNotFound(related_to.clone()));
        }
    }

    let id = tree.new_person_id(rng);
    tree.add_person(Person::new(id.clone(), name, gender, birth_date, death_date));

    let Some((role, related_to)) = relation else {
        return Ok(id);
    };

    let related_to = related_to.clone();
    match role {
        RelativeRole::Parent => {
            let rid = tree.new_relationship_id(rng);
            tree.add_relationship(Relationship::parent_child(rid, id.clone(), related_to));
        }
        RelativeRole::Child => {
            let rid = tree.new_relationship_id(rng);
            tree.add_relationship(Relationship::parent_child(rid, related_to, id.clone()));
        }
        RelativeRole::Spouse => {
            let rid = tree.new_relationship_id(rng);
            tree.add_relationship(Relationship::spouse(rid, id.clone(), related_to));
        }
        RelativeRole::Sibling => {
            let rid = tree.new_relationship_id(rng);
            tree.add_relationship(Relationship::sibling(rid, id.clone(), related_to.clone()));

            let parent_ids: Vec<PersonId> =
                tree.parents(&related_to).into_iter().map(|p| p.id.clone()).collect();
            for parent_id in parent_ids {
                let rid = tree.new_relationship_id(rng);
                tree.add_relationship(Relationship::parent_child(rid, parent_id, id.clone()));
            }
        }
    }

    Ok(id)
}
