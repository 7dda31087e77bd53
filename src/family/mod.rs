//! Family graph: people, relationships, and the store that owns them.
//!
//! Relationships live in a flat list; parents, children, spouses and siblings
//! are derived from it on demand. The graph may be inconsistent or cyclic, so
//! everything that walks it is cycle-safe and drops dangling references.

pub mod entry;
pub mod person;
pub mod projection;
pub mod queries;
pub mod relationship;
pub mod store;

use std::fmt;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use entry::{add_relative, RelativeRole};
pub use person::{given_name_of, surname_of, Gender, Person};
pub use projection::{project_tree, Role, TreeNode};
pub use relationship::{RelationKind, Relationship};
pub use store::FamilyTree;

// =============================================================================
// ID TYPES
// =============================================================================

/// Macro to generate opaque string ID wrappers with common derives and Display.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Draw a fresh id of the form `<prefix>_<millis>_<n>`.
            pub fn generate(rng: &mut impl Rng) -> Self {
                Self(format!(
                    "{}_{}_{}",
                    $prefix,
                    Utc::now().timestamp_millis(),
                    rng.gen_range(0..1_000_000u32)
                ))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(PersonId, "p");
define_id!(RelationshipId, "r");
