//! Ancestry synthesis: fill in a focal person's parents, grandparents and
//! siblings, from an external biography source when one is available and
//! from demographic heuristics otherwise.
//!
//! Mutations are applied to the tree as they are decided and are not rolled
//! back. One synthesis per tree at a time; callers serialize access.

pub mod generate;
pub mod merge;

use rand::Rng;
use tracing::{info, warn};

use crate::biography::{gather_family, BiographySource, PersonRecord, Selection};
use crate::config::AutocompleteConfig;
use crate::demographics::Demographics;
use crate::error::{TreeError, TreeResult};
use crate::family::{FamilyTree, Person, PersonId};

/// How an autocomplete invocation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutocompleteOutcome {
    /// External records were merged; no synthetic data was generated.
    ExternalMerged(SynthesisReport),
    /// Relatives were generated from demographic heuristics.
    Synthesized(SynthesisReport),
    /// The user cancelled; the tree is unchanged.
    Declined,
}

/// Counts of entities added by one invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    pub people_added: usize,
    pub relationships_added: usize,
}

impl SynthesisReport {
    fn between(before: (usize, usize), tree: &FamilyTree) -> Self {
        Self {
            people_added: tree.people().len().saturating_sub(before.0),
            relationships_added: tree.relationships().len().saturating_sub(before.1),
        }
    }
}

fn sizes(tree: &FamilyTree) -> (usize, usize) {
    (tree.people().len(), tree.relationships().len())
}

pub struct AncestrySynthesizer {
    demographics: Demographics,
    config: AutocompleteConfig,
}

impl AncestrySynthesizer {
    pub fn new(demographics: Demographics, config: AutocompleteConfig) -> Self {
        Self { demographics, config }
    }

    pub fn demographics(&self) -> &Demographics {
        &self.demographics
    }

    pub fn config(&self) -> &AutocompleteConfig {
        &self.config
    }

    /// Complete the family around `person_id`.
    ///
    /// With external data enabled, the source is searched first and the user
    /// picks a candidate; merged records end the invocation. If nothing was
    /// merged the user is asked whether to generate relatives instead. Lookup
    /// failures are logged and treated as "nothing found".
    pub async fn autocomplete(
        &self,
        tree: &mut FamilyTree,
        person_id: &PersonId,
        source: Option<&dyn BiographySource>,
        selection: &dyn Selection,
        rng: &mut impl Rng,
    ) -> TreeResult<AutocompleteOutcome> {
        if tree.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        let person = tree
            .person(person_id)
            .cloned()
            .ok_or_else(|| TreeError::PersonNotFound(person_id.clone()))?;

        if self.config.use_external_data {
            if let Some(source) = source {
                if let Some(records) = lookup_external(source, selection, &person).await {
                    let before = sizes(tree);
                    if self.merge_records(tree, &records, &person.id, rng) {
                        let report = SynthesisReport::between(before, tree);
                        info!(person = %person.id, ?report, "merged external family records");
                        return Ok(AutocompleteOutcome::ExternalMerged(report));
                    }
                }
            }
            if !selection.confirm_synthetic().await {
                info!(person = %person.id, "autocomplete declined");
                return Ok(AutocompleteOutcome::Declined);
            }
        }

        let report = self.synthesize(tree, person_id, rng)?;
        Ok(AutocompleteOutcome::Synthesized(report))
    }

    /// Generate missing parents, grandparents and siblings for `person_id`
    /// from demographic heuristics alone.
    pub fn synthesize(
        &self,
        tree: &mut FamilyTree,
        person_id: &PersonId,
        rng: &mut impl Rng,
    ) -> TreeResult<SynthesisReport> {
        let person = tree
            .person(person_id)
            .cloned()
            .ok_or_else(|| TreeError::PersonNotFound(person_id.clone()))?;
        let before = sizes(tree);
        let birth_year = self.base_year(&person);

        self.complete_parents(tree, &person.id, birth_year, person.surname(), rng);
        self.complete_grandparents(tree, &person.id, birth_year, rng);
        self.complete_siblings(tree, &person, birth_year, rng);

        let report = SynthesisReport::between(before, tree);
        info!(person = %person.id, ?report, "synthesized relatives");
        Ok(report)
    }

    /// Birth year of `person`, or an estimate from the configured default age.
    fn base_year(&self, person: &Person) -> i32 {
        person
            .birth_year()
            .unwrap_or_else(|| self.config.current_year() - self.config.default_age)
    }
}

/// Search, let the user pick, and gather the picked person's family.
/// `None` when nothing usable came back or the user cancelled.
async fn lookup_external(
    source: &dyn BiographySource,
    selection: &dyn Selection,
    person: &Person,
) -> Option<Vec<PersonRecord>> {
    let given_name = person.given_name();
    let surname = person.surname();

    let candidates = match source.search(given_name, surname).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(person = %person.id, error = %e, "biography search failed");
            return None;
        }
    };
    if candidates.is_empty() {
        info!(person = %person.id, "no biography candidates found");
        return None;
    }

    let selected = selection.choose(&candidates).await?;
    match gather_family(source, &selected, given_name).await {
        Ok(records) if !records.is_empty() => Some(records),
        Ok(_) => None,
        Err(e) => {
            warn!(person = %person.id, error = %e, "failed to load selected biography");
            None
        }
    }
}
