//! Relationship records.
//!
//! On the wire a relationship is a flat object tagged by `type`
//! (`parent-child`, `spouse`, `sibling`) carrying that type's endpoint fields.

use serde::{Deserialize, Serialize};

use super::{PersonId, RelationshipId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    #[serde(flatten)]
    pub kind: RelationKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RelationKind {
    /// Directed: `parent_id` is a parent of `child_id`.
    #[serde(rename = "parent-child", rename_all = "camelCase")]
    ParentChild { parent_id: PersonId, child_id: PersonId },

    #[serde(rename = "spouse", rename_all = "camelCase")]
    Spouse { person1_id: PersonId, person2_id: PersonId },

    /// Recorded by manual entry only; sibling queries derive siblings from
    /// shared parents instead.
    #[serde(rename = "sibling", rename_all = "camelCase")]
    Sibling { person1_id: PersonId, person2_id: PersonId },
}

impl RelationKind {
    pub fn parent_child(parent: PersonId, child: PersonId) -> Self {
        RelationKind::ParentChild { parent_id: parent, child_id: child }
    }

    pub fn spouse(a: PersonId, b: PersonId) -> Self {
        RelationKind::Spouse { person1_id: a, person2_id: b }
    }
}

impl Relationship {
    pub fn new(id: RelationshipId, kind: RelationKind) -> Self {
        Self { id, kind }
    }

    pub fn parent_child(id: RelationshipId, parent: PersonId, child: PersonId) -> Self {
        Self::new(id, RelationKind::parent_child(parent, child))
    }

    pub fn spouse(id: RelationshipId, a: PersonId, b: PersonId) -> Self {
        Self::new(id, RelationKind::spouse(a, b))
    }

    pub fn sibling(id: RelationshipId, a: PersonId, b: PersonId) -> Self {
        Self::new(id, RelationKind::Sibling { person1_id: a, person2_id: b })
    }

    /// Every person id this relationship references.
    pub fn endpoints(&self) -> [&PersonId; 2] {
        match &self.kind {
            RelationKind::ParentChild { parent_id, child_id } => [parent_id, child_id],
            RelationKind::Spouse { person1_id, person2_id }
            | RelationKind::Sibling { person1_id, person2_id } => [person1_id, person2_id],
        }
    }

    /// Whether this edge and `kind` link the same people in the same sense.
    /// Parent-child compares direction; spouse and sibling compare unordered pairs.
    pub fn same_link(&self, kind: &RelationKind) -> bool {
        match (&self.kind, kind) {
            (
                RelationKind::ParentChild { parent_id: p1, child_id: c1 },
                RelationKind::ParentChild { parent_id: p2, child_id: c2 },
            ) => p1 == p2 && c1 == c2,
            (
                RelationKind::Spouse { person1_id: a1, person2_id: b1 },
                RelationKind::Spouse { person1_id: a2, person2_id: b2 },
            )
            | (
                RelationKind::Sibling { person1_id: a1, person2_id: b1 },
                RelationKind::Sibling { person1_id: a2, person2_id: b2 },
            ) => (a1 == a2 && b1 == b2) || (a1 == b2 && b1 == a2),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_child_wire_format() {
        let rel = Relationship::parent_child(
            RelationshipId::from("r_1"),
            PersonId::from("p_a"),
            PersonId::from("p_b"),
        );
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["id"], "r_1");
        assert_eq!(json["type"], "parent-child");
        assert_eq!(json["parentId"], "p_a");
        assert_eq!(json["childId"], "p_b");
    }

    #[test]
    fn test_parse_spouse_record() {
        let rel: Relationship = serde_json::from_str(
            r#"{"id":"r_2","type":"spouse","person1Id":"p_a","person2Id":"p_b"}"#,
        )
        .unwrap();
        assert_eq!(
            rel.kind,
            RelationKind::Spouse {
                person1_id: PersonId::from("p_a"),
                person2_id: PersonId::from("p_b"),
            }
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let res: Result<Relationship, _> =
            serde_json::from_str(r#"{"id":"r_3","type":"cousin","person1Id":"a","person2Id":"b"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_same_link_semantics() {
        let a = PersonId::from("a");
        let b = PersonId::from("b");
        let spouse = Relationship::spouse(RelationshipId::from("r"), a.clone(), b.clone());
        assert!(spouse.same_link(&RelationKind::Spouse { person1_id: b.clone(), person2_id: a.clone() }));
        assert!(!spouse.same_link(&RelationKind::Sibling { person1_id: a.clone(), person2_id: b.clone() }));

        let pc = Relationship::parent_child(RelationshipId::from("r"), a.clone(), b.clone());
        assert!(!pc.same_link(&RelationKind::ParentChild { parent_id: b, child_id: a }));
    }
}
