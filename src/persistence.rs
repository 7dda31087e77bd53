//! Saving and loading trees as JSON files.
//!
//! The file holds exactly the `{people, relationships}` document produced by
//! [`FamilyTree::to_json`], so exported files can be imported elsewhere.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::TreeResult;
use crate::family::FamilyTree;

/// Write `tree` to `path` as pretty-printed JSON.
pub fn save_tree(tree: &FamilyTree, path: &Path) -> TreeResult<()> {
    let json = tree.to_json_pretty()?;
    fs::write(path, json)?;
    debug!(path = %path.display(), people = tree.people().len(), "saved tree");
    Ok(())
}

/// Read a tree from `path`. A missing file yields an empty tree.
pub fn load_tree(path: &Path) -> TreeResult<FamilyTree> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved tree, starting empty");
            return Ok(FamilyTree::new());
        }
        Err(e) => return Err(e.into()),
    };
    let tree = FamilyTree::from_json(&json)?;
    info!(
        path = %path.display(),
        people = tree.people().len(),
        relationships = tree.relationships().len(),
        "loaded tree"
    );
    Ok(tree)
}

/// Replace the contents of `tree` with the document at `path`.
/// On failure `tree` is left as it was.
pub fn import_into(tree: &mut FamilyTree, path: &Path) -> TreeResult<()> {
    let json = fs::read_to_string(path)?;
    tree.load_json(&json)
}
