//! Plain-text rendering of people and projected trees for the terminal.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::family::{Gender, Person, TreeNode};

fn date_or_blank(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn gender_mark(gender: Gender) -> char {
    match gender {
        Gender::Male => 'M',
        Gender::Female => 'F',
    }
}

/// `b. 1950-02-03`, `1950-02-03 – 2010-07-01`, or empty when no dates are known.
pub fn lifespan(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> String {
    match (birth, death) {
        (None, None) => String::new(),
        (Some(_), None) => format!("b. {}", date_or_blank(birth)),
        (None, Some(_)) => format!("d. {}", date_or_blank(death)),
        (Some(_), Some(_)) => format!("{} – {}", date_or_blank(birth), date_or_blank(death)),
    }
}

/// One-line summary: `Name [M] (b. 1950-02-03)  p_...`.
pub fn describe_person(person: &Person) -> String {
    let mut line = format!("{} [{}]", person.name, gender_mark(person.gender));
    let span = lifespan(person.birth_date, person.death_date);
    if !span.is_empty() {
        let _ = write!(line, " ({})", span);
    }
    let _ = write!(line, "  {}", person.id);
    line
}

/// Indented outline of a projected tree, one node per line, with each
/// non-root node tagged by its role.
pub fn render_text(root: &TreeNode) -> String {
    let mut out = String::new();
    render_node(root, 0, &mut out);
    out
}

fn render_node(node: &TreeNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let tag = node
        .role
        .map(|role| format!("[{}] ", role.label()))
        .unwrap_or_default();
    let span = lifespan(node.birth_date, node.death_date);
    let _ = write!(out, "{indent}{tag}{} [{}]", node.name, gender_mark(node.gender));
    if !span.is_empty() {
        let _ = write!(out, " ({span})");
    }
    out.push('\n');
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}
