//! Wikidata-backed biography source.
//!
//! Searches with `wbsearchentities` and reads claims from `wbgetentities`:
//! P569 birth date, P570 death date, P22 father, P25 mother, P26 spouses,
//! P40 children.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{BiographySource, CandidateRecord, PersonRecord};
use crate::error::LookupError;

const BIRTH_DATE: &str = "P569";
const DEATH_DATE: &str = "P570";
const FATHER: &str = "P22";
const MOTHER: &str = "P25";
const SPOUSE: &str = "P26";
const CHILD: &str = "P40";

/// Configuration for the Wikidata API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WikidataConfig {
    /// Endpoint of the MediaWiki action API.
    pub base_url: String,
    /// Language used for search, labels and descriptions.
    pub language: String,
    /// Maximum number of search candidates.
    pub search_limit: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.wikidata.org/w/api.php".to_string(),
            language: "pt".to_string(),
            search_limit: 5,
            timeout_secs: 30,
        }
    }
}

pub struct WikidataSource {
    config: WikidataConfig,
    client: reqwest::Client,
}

impl WikidataSource {
    pub fn new(config: WikidataConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("family-tree/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value, LookupError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(params)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Api(format!("Status {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))
    }

    async fn search_query(&self, query: &str) -> Result<Vec<CandidateRecord>, LookupError> {
        let limit = self.config.search_limit.to_string();
        let body = self
            .get_json(&[
                ("action", "wbsearchentities"),
                ("search", query),
                ("language", self.config.language.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
            ])
            .await?;
        Ok(parse_search_results(&body))
    }
}

#[async_trait]
impl BiographySource for WikidataSource {
    /// Search for "given surname", retrying with the surname alone when
    /// the full name matches nothing.
    async fn search(&self, given_name: &str, surname: &str) -> Result<Vec<CandidateRecord>, LookupError> {
        let full = format!("{} {}", given_name, surname);
        let mut results = self.search_query(full.trim()).await?;
        if results.is_empty() && !surname.is_empty() {
            debug!(surname, "no match on full name, retrying with surname");
            results = self.search_query(surname).await?;
        }
        Ok(results)
    }

    async fn fetch_detail(&self, id: &str) -> Result<Option<PersonRecord>, LookupError> {
        let body = self
            .get_json(&[
                ("action", "wbgetentities"),
                ("ids", id),
                ("languages", self.config.language.as_str()),
                ("format", "json"),
            ])
            .await?;
        Ok(parse_entity(&body, id, &self.config.language))
    }
}

/// Candidates from a `wbsearchentities` response.
pub fn parse_search_results(body: &Value) -> Vec<CandidateRecord> {
    body.get("search")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| {
                    Some(CandidateRecord {
                        id: hit.get("id")?.as_str()?.to_string(),
                        label: hit.get("label").and_then(Value::as_str).map(str::to_string),
                        description: hit
                            .get("description")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Person record for entity `id` in a `wbgetentities` response.
pub fn parse_entity(body: &Value, id: &str, language: &str) -> Option<PersonRecord> {
    let entity = body.get("entities")?.get(id)?;
    if entity.get("missing").is_some() {
        return None;
    }
    let claims = entity.get("claims").cloned().unwrap_or(Value::Null);
    let localized = |field: &str| {
        entity
            .get(field)
            .and_then(|v| v.get(language))
            .and_then(|v| v.get("value"))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Some(PersonRecord {
        id: id.to_string(),
        name: localized("labels").unwrap_or_else(|| "Unknown".to_string()),
        description: localized("descriptions").unwrap_or_default(),
        birth_date: claim_date(&claims, BIRTH_DATE),
        death_date: claim_date(&claims, DEATH_DATE),
        father_id: claim_entity_ids(&claims, FATHER).into_iter().next(),
        mother_id: claim_entity_ids(&claims, MOTHER).into_iter().next(),
        spouse_ids: claim_entity_ids(&claims, SPOUSE),
        children_ids: claim_entity_ids(&claims, CHILD),
    })
}

fn claim_values<'a>(claims: &'a Value, property: &str) -> impl Iterator<Item = &'a Value> {
    claims
        .get(property)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|claim| claim.get("mainsnak")?.get("datavalue")?.get("value"))
}

fn claim_entity_ids(claims: &Value, property: &str) -> Vec<String> {
    claim_values(claims, property)
        .filter_map(|v| v.get("id").and_then(Value::as_str).map(str::to_string))
        .collect()
}

fn claim_date(claims: &Value, property: &str) -> Option<NaiveDate> {
    claim_values(claims, property)
        .next()
        .and_then(|v| v.get("time"))
        .and_then(Value::as_str)
        .and_then(parse_wikidata_time)
}

/// Parse a Wikidata time like `+1956-03-00T00:00:00Z`.
///
/// Unknown month or day (`00`, used for year- or month-precision dates)
/// becomes `01`. Negative (BCE) years are rejected.
pub fn parse_wikidata_time(time: &str) -> Option<NaiveDate> {
    let date_part = time.strip_prefix('+')?.split('T').next()?;
    let mut fields = date_part.split('-');
    let year: i32 = fields.next()?.parse().ok()?;
    let month: u32 = fields.next()?.parse().ok()?;
    let day: u32 = fields.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month.max(1), day.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wikidata_time() {
        assert_eq!(parse_wikidata_time("+1956-01-31T00:00:00Z"), NaiveDate::from_ymd_opt(1956, 1, 31));
        assert_eq!(parse_wikidata_time("+1902-00-00T00:00:00Z"), NaiveDate::from_ymd_opt(1902, 1, 1));
        assert_eq!(parse_wikidata_time("-0044-03-15T00:00:00Z"), None);
        assert_eq!(parse_wikidata_time("garbage"), None);
    }

    #[test]
    fn test_parse_search_results() {
        let body = json!({
            "search": [
                {"id": "Q1", "label": "Carlos Drummond de Andrade", "description": "poeta brasileiro"},
                {"id": "Q2"},
                {"label": "no id"}
            ]
        });
        let hits = parse_search_results(&body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].label.as_deref(), Some("Carlos Drummond de Andrade"));
        assert_eq!(hits[1].label, None);
        assert!(parse_search_results(&json!({})).is_empty());
    }

    fn item(id: &str) -> Value {
        json!({"mainsnak": {"datavalue": {"value": {"id": id}}}})
    }

    #[test]
    fn test_parse_entity_claims() {
        let body = json!({
            "entities": {
                "Q10": {
                    "labels": {"pt": {"value": "Pedro Álvares"}},
                    "descriptions": {"pt": {"value": "navegador"}},
                    "claims": {
                        "P569": [{"mainsnak": {"datavalue": {"value": {"time": "+1467-00-00T00:00:00Z"}}}}],
                        "P22": [item("Q20")],
                        "P25": [item("Q30")],
                        "P26": [item("Q40"), item("Q41")],
                        "P40": [item("Q50"), {"mainsnak": {"snaktype": "novalue"}}]
                    }
                }
            }
        });
        let rec = parse_entity(&body, "Q10", "pt").unwrap();
        assert_eq!(rec.name, "Pedro Álvares");
        assert_eq!(rec.description, "navegador");
        assert_eq!(rec.birth_date, NaiveDate::from_ymd_opt(1467, 1, 1));
        assert_eq!(rec.death_date, None);
        assert_eq!(rec.father_id.as_deref(), Some("Q20"));
        assert_eq!(rec.mother_id.as_deref(), Some("Q30"));
        assert_eq!(rec.spouse_ids, vec!["Q40", "Q41"]);
        assert_eq!(rec.children_ids, vec!["Q50"]);
    }

    #[test]
    fn test_parse_entity_without_label_or_claims() {
        let body = json!({"entities": {"Q7": {}}});
        let rec = parse_entity(&body, "Q7", "pt").unwrap();
        assert_eq!(rec.name, "Unknown");
        assert!(rec.spouse_ids.is_empty());
        assert!(parse_entity(&json!({"entities": {"Q8": {"missing": ""}}}), "Q8", "pt").is_none());
        assert!(parse_entity(&body, "Q9", "pt").is_none());
    }
}
