//! Walk outward from a selected record to collect its close family.

use tracing::{debug, warn};

use super::{BiographySource, CandidateRecord, PersonRecord};
use crate::error::LookupError;

/// Fetch `selected` and up to two generations of its ancestors, then its
/// spouses and children.
///
/// Requests are issued one at a time in this order: father, paternal
/// grandparents, mother, maternal grandparents, spouses, children. The
/// selected record comes first in the result. A failing relative fetch is
/// logged and skipped; only a failure on the selected record is returned.
pub async fn gather_family(
    source: &dyn BiographySource,
    selected: &CandidateRecord,
    fallback_name: &str,
) -> Result<Vec<PersonRecord>, LookupError> {
    let Some(mut root) = source.fetch_detail(&selected.id).await? else {
        return Ok(Vec::new());
    };
    root.name = selected
        .label
        .clone()
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| fallback_name.to_string());
    if let Some(description) = &selected.description {
        root.description = description.clone();
    }

    let mut records = vec![root.clone()];

    for parent_id in [&root.father_id, &root.mother_id].into_iter().flatten() {
        let Some(parent) = fetch_relative(source, parent_id).await else {
            continue;
        };
        records.push(parent.clone());
        for grandparent_id in [&parent.father_id, &parent.mother_id].into_iter().flatten() {
            if let Some(grandparent) = fetch_relative(source, grandparent_id).await {
                records.push(grandparent);
            }
        }
    }

    for id in root.spouse_ids.iter().chain(root.children_ids.iter()) {
        if let Some(relative) = fetch_relative(source, id).await {
            records.push(relative);
        }
    }

    debug!(root = %root.id, count = records.len(), "gathered family records");
    Ok(records)
}

async fn fetch_relative(source: &dyn BiographySource, id: &str) -> Option<PersonRecord> {
    match source.fetch_detail(id).await {
        Ok(record) => record,
        Err(e) => {
            warn!(id, error = %e, "skipping relative that failed to load");
            None
        }
    }
}
