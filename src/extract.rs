//! Turns raw executor records into the shapes the resolver needs.
//!
//! Extraction is a pure, order-independent function of the record stream:
//! facts are deduplicated by full triple identity (multiple join paths to
//! the same answer collapse to one fact) and come back in identity order,
//! per-variable observed values are collected into treemaps, and per-row
//! match sets are reassembled by original row index, which the resolver's
//! intersection depends on.

use std::collections::{BTreeMap, HashMap};

use roaring::RoaringTreemap;

use crate::store::{FactRecord, FieldValue, Record};
use crate::triple::{OtherHasher, Uid};

/// Everything extracted from one page of records.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Concrete facts, deduplicated, in identity order.
    pub facts: Vec<FactRecord>,
    /// Pattern-variable name to the set of node uids observed bound to it.
    pub observed: HashMap<String, RoaringTreemap, OtherHasher>,
    /// Matches of each original table row, indexed by row.
    pub row_matches: Vec<Vec<FactRecord>>,
}

/// Extracts facts, observed variable values, and per-row match sets from
/// `records`. `row_count` is the length of the originating query table.
pub fn extract(records: &[Record], row_count: usize) -> Extraction {
    let mut by_identity: BTreeMap<(Uid, Uid, Uid, Uid), FactRecord> = BTreeMap::new();
    let mut observed: HashMap<String, RoaringTreemap, OtherHasher> = HashMap::default();
    let mut row_sets: Vec<BTreeMap<(Uid, Uid, Uid, Uid), FactRecord>> =
        (0..row_count).map(|_| BTreeMap::new()).collect();

    for record in records {
        for (name, value) in record.iter() {
            match value {
                FieldValue::Fact(fact) => {
                    by_identity
                        .entry(fact.identity())
                        .or_insert_with(|| fact.clone());
                    if let Some(row) = row_index(name) {
                        if row < row_count {
                            row_sets[row]
                                .entry(fact.identity())
                                .or_insert_with(|| fact.clone());
                        }
                    }
                }
                FieldValue::Node { uid } => {
                    observed
                        .entry(name.clone())
                        .or_insert_with(RoaringTreemap::new)
                        .insert(*uid);
                }
                // counts belong to the twin query, not to extraction
                FieldValue::Count(_) => (),
            }
        }
    }

    Extraction {
        facts: by_identity.into_values().collect(),
        observed,
        row_matches: row_sets
            .into_iter()
            .map(|set| set.into_values().collect())
            .collect(),
    }
}

fn row_index(field: &str) -> Option<usize> {
    field.strip_prefix("fact_")?.parse().ok()
}
