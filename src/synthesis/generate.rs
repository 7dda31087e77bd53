//! Heuristic generation of parents, grandparents and siblings.

use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use super::AncestrySynthesizer;
use crate::demographics::decade_of;
use crate::family::{FamilyTree, Gender, Person, PersonId, RelationKind};

/// A date in `year` with a random month and a day in 1..=28.
pub fn random_date_in_year(year: i32, rng: &mut impl Rng) -> Option<NaiveDate> {
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
}

impl AncestrySynthesizer {
    /// Generate whichever of father and mother `person_id` is missing.
    ///
    /// A generated father takes `surname` (or a random one when empty); a
    /// generated mother takes a surname different from the father's. When the
    /// mother is generated and a father is on hand, the two are married.
    /// Does nothing once two parents are recorded. Returns the number of
    /// people created.
    pub fn complete_parents(
        &self,
        tree: &mut FamilyTree,
        person_id: &PersonId,
        birth_year: i32,
        surname: &str,
        rng: &mut impl Rng,
    ) -> usize {
        let existing: Vec<Person> = tree.parents(person_id).into_iter().cloned().collect();
        if existing.len() >= 2 {
            return 0;
        }
        let mut created = 0;

        let mut father = existing.iter().find(|p| p.gender == Gender::Male).cloned();
        if father.is_none() {
            let year = self.demographics.estimate_parent_birth_year(birth_year, Gender::Male);
            let given = self.demographics.random_given_name(year, Gender::Male, rng);
            let family_name = if surname.is_empty() {
                self.demographics.random_surname(None, rng)
            } else {
                surname.to_string()
            };
            let dad = self.generate_person(tree, format!("{given} {family_name}"), Gender::Male, year, rng);
            tree.add_relationship_once(RelationKind::parent_child(dad.id.clone(), person_id.clone()), rng);
            father = Some(dad);
            created += 1;
        }

        if !existing.iter().any(|p| p.gender == Gender::Female) {
            let year = self.demographics.estimate_parent_birth_year(birth_year, Gender::Female);
            let given = self.demographics.random_given_name(year, Gender::Female, rng);
            let family_name = self
                .demographics
                .random_surname(father.as_ref().map(Person::surname), rng);
            let mom = self.generate_person(tree, format!("{given} {family_name}"), Gender::Female, year, rng);
            tree.add_relationship_once(RelationKind::parent_child(mom.id.clone(), person_id.clone()), rng);
            if let Some(dad) = &father {
                tree.add_relationship_once(RelationKind::spouse(dad.id.clone(), mom.id.clone()), rng);
            }
            created += 1;
        }

        created
    }

    /// Run [`complete_parents`](Self::complete_parents) for each parent of
    /// `person_id`, using the parent's birth year or an estimate from the
    /// child's.
    pub fn complete_grandparents(
        &self,
        tree: &mut FamilyTree,
        person_id: &PersonId,
        child_birth_year: i32,
        rng: &mut impl Rng,
    ) -> usize {
        let parents: Vec<Person> = tree.parents(person_id).into_iter().cloned().collect();
        parents
            .iter()
            .map(|parent| {
                let year = parent.birth_year().unwrap_or_else(|| {
                    self.demographics.estimate_parent_birth_year(child_birth_year, parent.gender)
                });
                self.complete_parents(tree, &parent.id, year, parent.surname(), rng)
            })
            .sum()
    }

    /// Generate siblings for `person` when none are recorded and at least one
    /// parent is known. Siblings share the person's parents, are born within
    /// the configured spread of `birth_year`, and have no death date.
    pub fn complete_siblings(
        &self,
        tree: &mut FamilyTree,
        person: &Person,
        birth_year: i32,
        rng: &mut impl Rng,
    ) -> usize {
        if !tree.siblings(&person.id).is_empty() {
            return 0;
        }
        let parents: Vec<Person> = tree.parents(&person.id).into_iter().cloned().collect();
        if parents.is_empty() {
            return 0;
        }
        let father = parents.iter().find(|p| p.gender == Gender::Male).cloned();
        let mother = parents.iter().find(|p| p.gender == Gender::Female).cloned();

        let children = self
            .demographics
            .generate_number_of_children(decade_of(birth_year), rng);
        let count = children.saturating_sub(1) as usize;
        let spread = self.config.sibling_year_spread.abs();

        for _ in 0..count {
            let year = birth_year + rng.gen_range(-spread..=spread);
            let gender = if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female };
            let given = self.demographics.random_given_name(year, gender, rng);
            let name = [given.as_str(), mother.as_ref().map_or("", Person::surname), person.surname()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            let id = tree.new_person_id(rng);
            let sibling = Person::new(id.clone(), name, gender, random_date_in_year(year, rng), None);
            debug!(id = %id, name = %sibling.name, "generated sibling");
            tree.add_person(sibling);

            for parent in father.iter().chain(mother.iter()) {
                tree.add_relationship_once(RelationKind::parent_child(parent.id.clone(), id.clone()), rng);
            }
        }
        count
    }

    /// Create a person born in `year`, with a death date when life expectancy
    /// places it before the current year.
    fn generate_person(
        &self,
        tree: &mut FamilyTree,
        name: String,
        gender: Gender,
        year: i32,
        rng: &mut impl Rng,
    ) -> Person {
        let birth = random_date_in_year(year, rng);
        let death = self
            .demographics
            .estimate_death_year(year, self.config.current_year())
            .and_then(|y| random_date_in_year(y, rng));
        let id = tree.new_person_id(rng);
        let person = Person::new(id, name, gender, birth, death);
        debug!(id = %person.id, name = %person.name, "generated relative");
        tree.add_person(person.clone());
        person
    }
}
