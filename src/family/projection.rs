//! Projection of the family graph into a rooted, acyclic display tree.
//!
//! Descent tracks a visited set per root-to-leaf path: each child subtree gets
//! its own copy, so a person can show up in several branches but never twice
//! on one path. Parents and siblings are attached at the root only.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::{FamilyTree, Gender, Person, PersonId};

/// Structural role of a node relative to its parent node in the projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Spouse,
    Child,
    Parent,
    Sibling,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Spouse => "spouse",
            Role::Child => "child",
            Role::Parent => "parent",
            Role::Sibling => "sibling",
        }
    }
}

/// A node of the display tree, in the shape the renderer consumes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: PersonId,
    pub name: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    /// Full record of the person this node displays.
    pub data: Person,
    /// `None` only on the root.
    #[serde(rename = "relationship", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(person: &Person, role: Option<Role>) -> Self {
        Self {
            id: person.id.clone(),
            name: person.name.clone(),
            gender: person.gender,
            birth_date: person.birth_date,
            death_date: person.death_date,
            data: person.clone(),
            role,
            children: Vec::new(),
        }
    }

    /// Total nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Every root-to-leaf path as a list of person ids.
    pub fn paths(&self) -> Vec<Vec<&PersonId>> {
        if self.children.is_empty() {
            return vec![vec![&self.id]];
        }
        self.children
            .iter()
            .flat_map(|child| child.paths())
            .map(|mut path| {
                path.insert(0, &self.id);
                path
            })
            .collect()
    }
}

/// Project `tree` into a display tree rooted at `root`, or at the first
/// person added when `root` is `None`.
///
/// Returns `None` for an empty store or an unknown root id.
pub fn project_tree(tree: &FamilyTree, root: Option<&PersonId>) -> Option<TreeNode> {
    let root_id = match root {
        Some(id) => id.clone(),
        None => tree.first_person()?.id.clone(),
    };
    tree.person(&root_id)?;
    build_node(tree, &root_id, &root_id, HashSet::new())
}

fn build_node(
    tree: &FamilyTree,
    root_id: &PersonId,
    person_id: &PersonId,
    mut visited: HashSet<PersonId>,
) -> Option<TreeNode> {
    if !visited.insert(person_id.clone()) {
        return None;
    }
    let person = tree.person(person_id)?;
    let mut node = TreeNode::leaf(person, None);

    for spouse in tree.spouses(person_id) {
        if !visited.contains(&spouse.id) {
            node.children.push(TreeNode::leaf(spouse, Some(Role::Spouse)));
        }
    }

    for child in tree.children(person_id) {
        if let Some(mut child_node) = build_node(tree, root_id, &child.id, visited.clone()) {
            child_node.role = Some(Role::Child);
            node.children.push(child_node);
        }
    }

    if person_id == root_id {
        let parents = tree.parents(person_id);
        for parent in &parents {
            if visited.contains(&parent.id) {
                continue;
            }
            let mut parent_node = TreeNode::leaf(parent, Some(Role::Parent));
            for other in tree.spouses(&parent.id) {
                if !visited.contains(&other.id) && !parents.iter().any(|p| p.id == other.id) {
                    parent_node.children.push(TreeNode::leaf(other, Some(Role::Spouse)));
                }
            }
            node.children.push(parent_node);
        }

        for sibling in tree.siblings(person_id) {
            if !visited.contains(&sibling.id) {
                node.children.push(TreeNode::leaf(sibling, Some(Role::Sibling)));
            }
        }
    }

    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::{Relationship, RelationshipId};

    fn add(tree: &mut FamilyTree, id: &str, gender: Gender) -> PersonId {
        let pid = PersonId::from(id);
        tree.add_person(Person::new(pid.clone(), id, gender, None, None));
        pid
    }

    fn parent_of(tree: &mut FamilyTree, parent: &PersonId, child: &PersonId) {
        let rid = RelationshipId(format!("r_{}_{}", parent, child));
        tree.add_relationship(Relationship::parent_child(rid, parent.clone(), child.clone()));
    }

    fn married(tree: &mut FamilyTree, a: &PersonId, b: &PersonId) {
        let rid = RelationshipId(format!("s_{}_{}", a, b));
        tree.add_relationship(Relationship::spouse(rid, a.clone(), b.clone()));
    }

    fn assert_paths_acyclic(node: &TreeNode) {
        for path in node.paths() {
            let unique: HashSet<_> = path.iter().collect();
            assert_eq!(unique.len(), path.len(), "path repeats a person: {:?}", path);
        }
    }

    #[test]
    fn test_empty_store_projects_to_none() {
        assert!(project_tree(&FamilyTree::new(), None).is_none());
    }

    #[test]
    fn test_unknown_root_projects_to_none() {
        let mut tree = FamilyTree::new();
        add(&mut tree, "a", Gender::Male);
        assert!(project_tree(&tree, Some(&PersonId::from("nobody"))).is_none());
    }

    #[test]
    fn test_single_person_is_single_node() {
        let mut tree = FamilyTree::new();
        let id = PersonId::from("p_maria");
        tree.add_person(Person::new(id.clone(), "Maria Silva", Gender::Female, None, None));
        let root = project_tree(&tree, Some(&id)).unwrap();
        assert_eq!(root.name, "Maria Silva");
        assert!(root.role.is_none());
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_default_root_is_first_person() {
        let mut tree = FamilyTree::new();
        add(&mut tree, "first", Gender::Male);
        add(&mut tree, "second", Gender::Female);
        assert_eq!(project_tree(&tree, None).unwrap().id, PersonId::from("first"));
    }

    #[test]
    fn test_root_attachments_and_roles() {
        let mut tree = FamilyTree::new();
        let me = add(&mut tree, "me", Gender::Male);
        let wife = add(&mut tree, "wife", Gender::Female);
        let son = add(&mut tree, "son", Gender::Male);
        let dad = add(&mut tree, "dad", Gender::Male);
        let mom = add(&mut tree, "mom", Gender::Female);
        let step = add(&mut tree, "step", Gender::Female);
        let sis = add(&mut tree, "sis", Gender::Female);

        married(&mut tree, &me, &wife);
        parent_of(&mut tree, &me, &son);
        parent_of(&mut tree, &dad, &me);
        parent_of(&mut tree, &mom, &me);
        married(&mut tree, &dad, &mom);
        married(&mut tree, &dad, &step);
        parent_of(&mut tree, &dad, &sis);

        let root = project_tree(&tree, Some(&me)).unwrap();
        let summary: Vec<(&str, Option<Role>)> = root
            .children
            .iter()
            .map(|n| (n.id.as_str(), n.role))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("wife", Some(Role::Spouse)),
                ("son", Some(Role::Child)),
                ("dad", Some(Role::Parent)),
                ("mom", Some(Role::Parent)),
                ("sis", Some(Role::Sibling)),
            ]
        );

        // Other parent is not repeated under dad; the stepmother is.
        let dad_node = &root.children[2];
        let under_dad: Vec<&str> = dad_node.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(under_dad, vec!["step"]);
        assert_eq!(dad_node.children[0].role, Some(Role::Spouse));
    }

    #[test]
    fn test_non_root_nodes_skip_parents_and_siblings() {
        let mut tree = FamilyTree::new();
        let root = add(&mut tree, "root", Gender::Male);
        let kid = add(&mut tree, "kid", Gender::Male);
        let other_parent = add(&mut tree, "other", Gender::Female);
        let half = add(&mut tree, "half", Gender::Female);
        parent_of(&mut tree, &root, &kid);
        parent_of(&mut tree, &other_parent, &kid);
        parent_of(&mut tree, &other_parent, &half);

        let node = project_tree(&tree, Some(&root)).unwrap();
        let kid_node = &node.children[0];
        assert_eq!(kid_node.id, kid);
        assert!(kid_node.children.is_empty());
    }

    #[test]
    fn test_cycles_terminate_without_repeats() {
        let mut tree = FamilyTree::new();
        let a = add(&mut tree, "a", Gender::Male);
        let b = add(&mut tree, "b", Gender::Male);
        let c = add(&mut tree, "c", Gender::Male);
        parent_of(&mut tree, &a, &b);
        parent_of(&mut tree, &b, &c);
        parent_of(&mut tree, &c, &a);
        married(&mut tree, &a, &c);

        let node = project_tree(&tree, Some(&a)).unwrap();
        assert_paths_acyclic(&node);
        assert!(node.node_count() <= tree.people().len() * 4);
    }

    #[test]
    fn test_shared_descendant_appears_in_each_branch() {
        let mut tree = FamilyTree::new();
        let root = add(&mut tree, "root", Gender::Female);
        let x = add(&mut tree, "x", Gender::Male);
        let y = add(&mut tree, "y", Gender::Female);
        let z = add(&mut tree, "z", Gender::Male);
        parent_of(&mut tree, &root, &x);
        parent_of(&mut tree, &root, &y);
        parent_of(&mut tree, &x, &z);
        parent_of(&mut tree, &y, &z);

        let node = project_tree(&tree, Some(&root)).unwrap();
        assert_eq!(node.children[0].children[0].id, z);
        assert_eq!(node.children[1].children[0].id, z);
        assert_eq!(node.depth(), 3);
    }

    #[test]
    fn test_self_parent_loop_terminates() {
        let mut tree = FamilyTree::new();
        let a = add(&mut tree, "a", Gender::Male);
        parent_of(&mut tree, &a, &a);
        married(&mut tree, &a, &a);
        let node = project_tree(&tree, Some(&a)).unwrap();
        assert_eq!(node.node_count(), 1);
    }

    #[test]
    fn test_renderer_json_shape() {
        let mut tree = FamilyTree::new();
        let a = add(&mut tree, "a", Gender::Male);
        let b = add(&mut tree, "b", Gender::Female);
        married(&mut tree, &a, &b);
        let json = serde_json::to_value(project_tree(&tree, Some(&a)).unwrap()).unwrap();
        assert!(json.get("relationship").is_none());
        assert_eq!(json["children"][0]["relationship"], "spouse");
        assert_eq!(json["children"][0]["data"]["name"], "b");
    }
}
