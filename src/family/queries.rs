//! Family-role queries derived from the flat relationship list.
//!
//! Every query resolves ids through the store and silently drops ids that
//! resolve to nobody.

use tracing::trace;

use super::{FamilyTree, Person, PersonId, RelationKind};

impl FamilyTree {
    /// Resolve an id found on a relationship, dropping dangling references.
    fn resolve(&self, id: &PersonId) -> Option<&Person> {
        let found = self.person(id);
        if found.is_none() {
            trace!(%id, "dropping dangling relationship reference");
        }
        found
    }

    /// People recorded as a parent of `id`.
    pub fn parents(&self, id: &PersonId) -> Vec<&Person> {
        self.relationships()
            .iter()
            .filter_map(|r| match &r.kind {
                RelationKind::ParentChild { parent_id, child_id } if child_id == id => {
                    self.resolve(parent_id)
                }
                _ => None,
            })
            .collect()
    }

    /// People recorded as a child of `id`.
    pub fn children(&self, id: &PersonId) -> Vec<&Person> {
        self.relationships()
            .iter()
            .filter_map(|r| match &r.kind {
                RelationKind::ParentChild { parent_id, child_id } if parent_id == id => {
                    self.resolve(child_id)
                }
                _ => None,
            })
            .collect()
    }

    /// The other endpoint of every spouse edge touching `id`.
    pub fn spouses(&self, id: &PersonId) -> Vec<&Person> {
        self.relationships()
            .iter()
            .filter_map(|r| match &r.kind {
                RelationKind::Spouse { person1_id, person2_id } if person1_id == id => {
                    self.resolve(person2_id)
                }
                RelationKind::Spouse { person1_id, person2_id } if person2_id == id => {
                    self.resolve(person1_id)
                }
                _ => None,
            })
            .collect()
    }

    /// Other children of any of `id`'s parents, each listed once.
    ///
    /// Explicit `sibling` edges are not consulted; siblinghood comes from
    /// shared parentage only.
    pub fn siblings(&self, id: &PersonId) -> Vec<&Person> {
        let mut siblings: Vec<&Person> = Vec::new();
        for parent in self.parents(id) {
            for child in self.children(&parent.id) {
                if &child.id != id && !siblings.iter().any(|s| s.id == child.id) {
                    siblings.push(child);
                }
            }
        }
        siblings
    }
}

#[cfg(test)]
mod tests {
    use crate::family::{FamilyTree, Gender, Person, PersonId, Relationship, RelationshipId};

    fn add(tree: &mut FamilyTree, id: &str, gender: Gender) -> PersonId {
        let pid = PersonId::from(id);
        tree.add_person(Person::new(pid.clone(), id, gender, None, None));
        pid
    }

    fn link_parent(tree: &mut FamilyTree, parent: &PersonId, child: &PersonId) {
        let rid = RelationshipId(format!("r_{}_{}", parent, child));
        tree.add_relationship(Relationship::parent_child(rid, parent.clone(), child.clone()));
    }

    fn ids(people: Vec<&Person>) -> Vec<String> {
        people.into_iter().map(|p| p.id.0.clone()).collect()
    }

    #[test]
    fn test_parents_and_children() {
        let mut tree = FamilyTree::new();
        let dad = add(&mut tree, "dad", Gender::Male);
        let mom = add(&mut tree, "mom", Gender::Female);
        let kid = add(&mut tree, "kid", Gender::Male);
        link_parent(&mut tree, &dad, &kid);
        link_parent(&mut tree, &mom, &kid);

        assert_eq!(ids(tree.parents(&kid)), vec!["dad", "mom"]);
        assert_eq!(ids(tree.children(&dad)), vec!["kid"]);
        assert!(tree.parents(&dad).is_empty());
    }

    #[test]
    fn test_spouses_are_undirected() {
        let mut tree = FamilyTree::new();
        let a = add(&mut tree, "a", Gender::Male);
        let b = add(&mut tree, "b", Gender::Female);
        tree.add_relationship(Relationship::spouse(RelationshipId::from("r"), a.clone(), b.clone()));
        assert_eq!(ids(tree.spouses(&a)), vec!["b"]);
        assert_eq!(ids(tree.spouses(&b)), vec!["a"]);
    }

    #[test]
    fn test_siblings_follow_shared_parents() {
        let mut tree = FamilyTree::new();
        let a = add(&mut tree, "A", Gender::Female);
        let b = add(&mut tree, "B", Gender::Male);
        link_parent(&mut tree, &b, &a);
        assert!(tree.siblings(&a).is_empty());

        let c = add(&mut tree, "C", Gender::Male);
        link_parent(&mut tree, &b, &c);
        assert_eq!(ids(tree.siblings(&a)), vec!["C"]);
        assert_eq!(ids(tree.siblings(&c)), vec!["A"]);
    }

    #[test]
    fn test_siblings_deduplicated_and_exclude_self() {
        let mut tree = FamilyTree::new();
        let dad = add(&mut tree, "dad", Gender::Male);
        let mom = add(&mut tree, "mom", Gender::Female);
        let x = add(&mut tree, "x", Gender::Male);
        let y = add(&mut tree, "y", Gender::Female);
        for p in [&dad, &mom] {
            link_parent(&mut tree, p, &x);
            link_parent(&mut tree, p, &y);
        }
        let sibs = tree.siblings(&x);
        assert_eq!(ids(sibs), vec!["y"]);
        assert!(!tree.siblings(&y).iter().any(|p| p.id == y));
        assert!(tree.siblings(&y).iter().any(|p| p.id == x));
    }

    #[test]
    fn test_explicit_sibling_edges_are_ignored() {
        let mut tree = FamilyTree::new();
        let a = add(&mut tree, "a", Gender::Male);
        let b = add(&mut tree, "b", Gender::Male);
        tree.add_relationship(Relationship::sibling(RelationshipId::from("r"), a.clone(), b));
        assert!(tree.siblings(&a).is_empty());
    }

    #[test]
    fn test_dangling_references_are_dropped() {
        let mut tree = FamilyTree::new();
        let kid = add(&mut tree, "kid", Gender::Male);
        let ghost = PersonId::from("ghost");
        link_parent(&mut tree, &ghost, &kid);
        tree.add_relationship(Relationship::spouse(RelationshipId::from("rs"), kid.clone(), ghost.clone()));
        assert!(tree.parents(&kid).is_empty());
        assert!(tree.spouses(&kid).is_empty());
        assert!(tree.siblings(&kid).is_empty());
        assert!(tree.children(&ghost).iter().any(|p| p.id == kid));
    }
}
