//! The entity store: people and relationships held in insertion order.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Person, PersonId, RelationKind, Relationship, RelationshipId};
use crate::error::{TreeError, TreeResult};

/// Owns every person and relationship in one family tree.
///
/// Person ids are unique within a store. Relationships are appended without
/// deduplication and may reference ids that do not exist; readers filter those out.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyTree {
    #[serde(default)]
    people: Vec<Person>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `person` unless its id is already taken. Returns the stored record,
    /// which is the existing one on collision.
    pub fn add_person(&mut self, person: Person) -> &Person {
        match self.people.iter().position(|p| p.id == person.id) {
            Some(idx) => &self.people[idx],
            None => {
                debug!(id = %person.id, name = %person.name, "added person");
                self.people.push(person);
                &self.people[self.people.len() - 1]
            }
        }
    }

    /// Append a relationship. No duplicate check; see [`FamilyTree::add_relationship_once`].
    pub fn add_relationship(&mut self, relationship: Relationship) {
        debug!(id = %relationship.id, kind = ?relationship.kind, "added relationship");
        self.relationships.push(relationship);
    }

    /// Append a relationship built from `kind` unless an equivalent edge exists.
    /// Returns whether a new edge was added.
    pub fn add_relationship_once(&mut self, kind: RelationKind, rng: &mut impl Rng) -> bool {
        if self.has_link(&kind) {
            return false;
        }
        let id = self.new_relationship_id(rng);
        self.add_relationship(Relationship::new(id, kind));
        true
    }

    /// Whether an edge with the same semantic endpoints is already recorded.
    pub fn has_link(&self, kind: &RelationKind) -> bool {
        self.relationships.iter().any(|r| r.same_link(kind))
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.person(id).is_some()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// The first person added; the default root for projection.
    pub fn first_person(&self) -> Option<&Person> {
        self.people.first()
    }

    pub fn clear(&mut self) {
        self.people.clear();
        self.relationships.clear();
    }

    /// A person id not used by anyone in this store.
    pub fn new_person_id(&self, rng: &mut impl Rng) -> PersonId {
        loop {
            let id = PersonId::generate(rng);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    pub fn new_relationship_id(&self, rng: &mut impl Rng) -> RelationshipId {
        loop {
            let id = RelationshipId::generate(rng);
            if !self.relationships.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }

    /// Serialize to the `{people, relationships}` JSON representation.
    pub fn to_json(&self) -> TreeResult<String> {
        serde_json::to_string(self).map_err(TreeError::Encode)
    }

    pub fn to_json_pretty(&self) -> TreeResult<String> {
        serde_json::to_string_pretty(self).map_err(TreeError::Encode)
    }

    /// Replace the contents with data parsed from `json`.
    ///
    /// The input is parsed completely before anything is replaced, so on
    /// error the store is left exactly as it was. Missing `people` or
    /// `relationships` fields read as empty. Two people sharing an id is
    /// malformed data.
    pub fn load_json(&mut self, json: &str) -> TreeResult<()> {
        let parsed: FamilyTree = serde_json::from_str(json).map_err(TreeError::MalformedData)?;
        let mut seen = HashSet::with_capacity(parsed.people.len());
        if let Some(dup) = parsed.people.iter().find(|p| !seen.insert(&p.id)) {
            return Err(TreeError::MalformedData(serde::de::Error::custom(format!(
                "duplicate person id {}",
                dup.id
            ))));
        }
        *self = parsed;
        Ok(())
    }

    pub fn from_json(json: &str) -> TreeResult<Self> {
        let mut tree = Self::new();
        tree.load_json(json)?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Gender;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn person(id: &str, name: &str, gender: Gender) -> Person {
        Person::new(PersonId::from(id), name, gender, None, None)
    }

    #[test]
    fn test_add_person_is_idempotent_on_id() {
        let mut tree = FamilyTree::new();
        tree.add_person(person("p_1", "Maria Silva", Gender::Female));
        let stored = tree.add_person(person("p_1", "Someone Else", Gender::Male)).clone();
        assert_eq!(tree.people().len(), 1);
        assert_eq!(stored.name, "Maria Silva");
    }

    #[test]
    fn test_add_relationship_keeps_duplicates() {
        let mut tree = FamilyTree::new();
        let a = PersonId::from("a");
        let b = PersonId::from("b");
        tree.add_relationship(Relationship::spouse(RelationshipId::from("r1"), a.clone(), b.clone()));
        tree.add_relationship(Relationship::spouse(RelationshipId::from("r2"), a, b));
        assert_eq!(tree.relationships().len(), 2);
    }

    #[test]
    fn test_add_relationship_once_skips_equivalent_edge() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut tree = FamilyTree::new();
        let a = PersonId::from("a");
        let b = PersonId::from("b");
        assert!(tree.add_relationship_once(
            RelationKind::Spouse { person1_id: a.clone(), person2_id: b.clone() },
            &mut rng
        ));
        assert!(!tree.add_relationship_once(
            RelationKind::Spouse { person1_id: b, person2_id: a },
            &mut rng
        ));
        assert_eq!(tree.relationships().len(), 1);
    }

    #[test]
    fn test_lookup_and_clear() {
        let mut tree = FamilyTree::new();
        tree.add_person(person("p_1", "Ana", Gender::Female));
        assert!(tree.person(&PersonId::from("p_1")).is_some());
        assert!(tree.person(&PersonId::from("p_2")).is_none());
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.relationships().is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut tree = FamilyTree::new();
        tree.add_person(Person::new(
            PersonId::from("p_1"),
            "João Costa",
            Gender::Male,
            NaiveDate::from_ymd_opt(1950, 1, 20),
            NaiveDate::from_ymd_opt(2001, 7, 3),
        ));
        tree.add_person(person("p_2", "Ana Costa", Gender::Female));
        tree.add_relationship(Relationship::parent_child(
            RelationshipId::from("r_1"),
            PersonId::from("p_1"),
            PersonId::from("p_2"),
        ));
        tree.add_relationship(Relationship::sibling(
            RelationshipId::from("r_2"),
            PersonId::from("p_2"),
            PersonId::from("p_ghost"),
        ));

        let restored = FamilyTree::from_json(&tree.to_json().unwrap()).unwrap();
        assert_eq!(restored, tree);
    }

    #[test]
    fn test_malformed_load_leaves_store_untouched() {
        let mut tree = FamilyTree::new();
        tree.add_person(person("p_1", "Ana", Gender::Female));
        let before = tree.clone();

        let err = tree.load_json("{\"people\": [ {\"id\": 3} ]").unwrap_err();
        assert!(matches!(err, TreeError::MalformedData(_)));
        assert_eq!(tree, before);

        assert!(tree.load_json("not json at all").is_err());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_duplicate_person_ids_are_rejected() {
        let mut tree = FamilyTree::new();
        tree.add_person(person("p_9", "Rui", Gender::Male));
        let before = tree.clone();

        let json = r#"{"people": [
            {"id": "p_1", "name": "Ana Silva", "gender": "female"},
            {"id": "p_1", "name": "Jose Costa", "gender": "male"}
        ]}"#;
        let err = tree.load_json(json).unwrap_err();
        assert!(matches!(err, TreeError::MalformedData(_)));
        assert!(err.to_string().contains("duplicate person id p_1"));
        assert_eq!(tree, before);
        assert!(FamilyTree::from_json(json).is_err());
    }

    #[test]
    fn test_missing_sections_load_as_empty() {
        let tree = FamilyTree::from_json("{}").unwrap();
        assert!(tree.is_empty());
        assert!(tree.relationships().is_empty());
    }

    #[test]
    fn test_new_person_id_avoids_existing() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut tree = FamilyTree::new();
        for _ in 0..50 {
            let id = tree.new_person_id(&mut rng);
            assert!(!tree.contains(&id));
            tree.add_person(Person::new(id, "X", Gender::Male, None, None));
        }
        assert_eq!(tree.people().len(), 50);
    }
}
