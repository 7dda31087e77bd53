//! Folding externally gathered records into the tree.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, trace};

use super::AncestrySynthesizer;
use crate::biography::PersonRecord;
use crate::demographics::infer_gender_from_given_name;
use crate::family::{given_name_of, FamilyTree, Gender, Person, PersonId, RelationKind};

/// Gender of `record`: male when some record names it as a father, female
/// when some record names it as a mother, otherwise read from its given name.
pub fn infer_record_gender(record: &PersonRecord, all: &[PersonRecord]) -> Gender {
    let id = Some(record.id.as_str());
    if all.iter().any(|r| r.father_id.as_deref() == id) {
        Gender::Male
    } else if all.iter().any(|r| r.mother_id.as_deref() == id) {
        Gender::Female
    } else {
        infer_gender_from_given_name(given_name_of(&record.name))
    }
}

impl AncestrySynthesizer {
    /// Merge gathered records into `tree`. The first record is the focal
    /// person and maps onto `root`; every other record becomes a new person.
    /// Links between records are added unless already present; references to
    /// ids outside the record set are dropped.
    ///
    /// Returns `false` when there was nothing to merge.
    pub fn merge_records(
        &self,
        tree: &mut FamilyTree,
        records: &[PersonRecord],
        root: &PersonId,
        rng: &mut impl Rng,
    ) -> bool {
        let Some((first, rest)) = records.split_first() else {
            return false;
        };

        let mut ids: HashMap<&str, PersonId> = HashMap::new();
        ids.insert(first.id.as_str(), root.clone());
        for record in rest {
            if ids.contains_key(record.id.as_str()) {
                continue;
            }
            let id = tree.new_person_id(rng);
            let gender = infer_record_gender(record, records);
            debug!(external = %record.id, id = %id, name = %record.name, "importing record");
            tree.add_person(Person::new(
                id.clone(),
                record.name.clone(),
                gender,
                record.birth_date,
                record.death_date,
            ));
            ids.insert(record.id.as_str(), id);
        }

        let lookup = |external: &str| {
            let found = ids.get(external).cloned();
            if found.is_none() {
                trace!(external, "reference outside gathered records");
            }
            found
        };

        for record in records {
            let Some(me) = ids.get(record.id.as_str()).cloned() else {
                continue;
            };
            let mut links = Vec::new();
            for parent in [&record.father_id, &record.mother_id].into_iter().flatten() {
                if let Some(parent) = lookup(parent.as_str()) {
                    links.push(RelationKind::parent_child(parent, me.clone()));
                }
            }
            for spouse in &record.spouse_ids {
                if let Some(spouse) = lookup(spouse.as_str()) {
                    links.push(RelationKind::spouse(me.clone(), spouse));
                }
            }
            for child in &record.children_ids {
                if let Some(child) = lookup(child.as_str()) {
                    links.push(RelationKind::parent_child(me.clone(), child));
                }
            }
            for link in links {
                tree.add_relationship_once(link, rng);
            }
        }
        true
    }
}
