//! Content bundle pre-flight
//!
//! `LOAD_CONTENT_BUNDLE` forwards the compiled bundle JSON to the engine. Before
//! that happens the bridge checks the element table itself, so a bundle the
//! engine would reject never tears down a running world, and so the input
//! decoder learns the new highest element id.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::domain::elements::{ElementId, EL_EMPTY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSummary {
    pub element_count: usize,
    pub max_element_id: ElementId,
    pub reaction_count: usize,
}

impl ContentSummary {
    pub fn from_bundle_json(json: &str) -> Result<Self, String> {
        let bundle: BundleRoot = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Self::from_bundle(bundle)
    }

    fn from_bundle(bundle: BundleRoot) -> Result<Self, String> {
        let mut max_id: u16 = 0;
        for el in bundle.elements.iter() {
            if el.id > max_id {
                max_id = el.id;
            }
        }

        if max_id > (u8::MAX as u16) {
            return Err(format!("too many elements for u8 ids: max_id={}", max_id));
        }

        let mut seen: HashSet<u16> = HashSet::with_capacity(bundle.elements.len());
        let mut key_to_id: HashMap<&str, u16> = HashMap::with_capacity(bundle.elements.len());
        for el in bundle.elements.iter() {
            if !seen.insert(el.id) {
                return Err(format!("duplicate element id: {}", el.id));
            }
            key_to_id.insert(el.key.as_str(), el.id);
        }

        if !seen.contains(&(EL_EMPTY as u16)) {
            return Err("missing element id 0 (empty)".to_string());
        }
        for idx in 0..=max_id {
            if !seen.contains(&idx) {
                return Err(format!("missing element id {}", idx));
            }
        }

        for (k, v) in bundle.element_key_to_id.iter() {
            match key_to_id.get(k.as_str()) {
                Some(existing) if existing == v => {}
                Some(existing) => {
                    return Err(format!(
                        "elementKeyToId mismatch for key {}: map={} elements={}",
                        k, v, existing
                    ));
                }
                None if *v > max_id => {
                    return Err(format!("elementKeyToId points past the element table: {}={}", k, v));
                }
                None => {}
            }
        }

        for r in bundle.reactions.iter() {
            let ids = [Some(r.aggressor_id), Some(r.victim_id), Some(r.result_victim_id), r.result_aggressor_id, r.spawn_id];
            if let Some(bad) = ids.into_iter().flatten().find(|id| *id > max_id) {
                return Err(format!("reaction references unknown element id {}", bad));
            }
        }

        Ok(Self {
            element_count: max_id as usize + 1,
            max_element_id: max_id as ElementId,
            reaction_count: bundle.reactions.len(),
        })
    }
}

// Only the fields the pre-flight looks at; serde ignores the rest.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleRoot {
    elements: Vec<BundleElement>,
    #[serde(default)]
    element_key_to_id: HashMap<String, u16>,
    #[serde(default)]
    reactions: Vec<BundleReaction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleElement {
    id: u16,
    key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleReaction {
    aggressor_id: u16,
    victim_id: u16,
    result_aggressor_id: Option<u16>,
    result_victim_id: u16,
    spawn_id: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "elements": [
            {"id": 0, "key": "base:empty", "category": "utility"},
            {"id": 1, "key": "base:stone", "category": "solid"},
            {"id": 2, "key": "base:sand", "category": "powder"}
        ],
        "elementKeyToId": {"base:empty": 0, "base:stone": 1, "base:sand": 2},
        "reactions": [
            {"aggressorId": 2, "victimId": 1, "resultAggressorId": null, "resultVictimId": 0, "spawnId": null, "chance": 0.5}
        ]
    }"#;

    #[test]
    fn summarises_valid_bundle() {
        let summary = ContentSummary::from_bundle_json(BUNDLE).unwrap();
        assert_eq!(summary.element_count, 3);
        assert_eq!(summary.max_element_id, 2);
        assert_eq!(summary.reaction_count, 1);
    }

    #[test]
    fn rejects_gaps_and_duplicates() {
        let gap = r#"{"elements":[{"id":0,"key":"a"},{"id":2,"key":"b"}]}"#;
        assert_eq!(ContentSummary::from_bundle_json(gap).unwrap_err(), "missing element id 1");

        let dup = r#"{"elements":[{"id":0,"key":"a"},{"id":0,"key":"b"}]}"#;
        assert_eq!(ContentSummary::from_bundle_json(dup).unwrap_err(), "duplicate element id: 0");

        let no_empty = r#"{"elements":[{"id":1,"key":"a"}]}"#;
        assert!(ContentSummary::from_bundle_json(no_empty).is_err());
    }

    #[test]
    fn rejects_wide_ids_and_bad_references() {
        let wide = r#"{"elements":[{"id":0,"key":"a"},{"id":300,"key":"b"}]}"#;
        assert!(ContentSummary::from_bundle_json(wide).unwrap_err().contains("too many elements"));

        let bad_reaction = r#"{"elements":[{"id":0,"key":"a"}],
            "reactions":[{"aggressorId":0,"victimId":0,"resultAggressorId":null,"resultVictimId":9,"spawnId":null}]}"#;
        assert!(ContentSummary::from_bundle_json(bad_reaction).is_err());

        let mismatch = r#"{"elements":[{"id":0,"key":"a"},{"id":1,"key":"b"}],"elementKeyToId":{"b":0}}"#;
        assert!(ContentSummary::from_bundle_json(mismatch).unwrap_err().contains("mismatch"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ContentSummary::from_bundle_json("{").is_err());
        assert!(ContentSummary::from_bundle_json("{}").is_err());
    }
}
