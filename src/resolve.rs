//! Binding resolution through candidate intersection.
//!
//! A placeholder variable may occupy several positions in a query table. A
//! value is a valid binding only when it was observed at every distinct
//! position the variable occupies; positions are `(triple identity, side)`
//! pairs, so duplicate rows at the same side count once. Candidate sets are
//! roaring treemaps and the intersection is a running `&=` over them.
//!
//! An empty intersection is a normal negative answer: the variable stays
//! unresolved and every row referencing it comes back as a denial. When
//! several candidates survive, the smallest uid wins, which keeps the
//! outcome deterministic regardless of match order.

use std::collections::BTreeMap;

use roaring::RoaringTreemap;

use crate::store::FactRecord;
use crate::triple::{Intention, Triple, Uid};

/// The state of one placeholder variable after resolution.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableBinding {
    pub uid: Uid,
    /// Human-readable name of the resolved value, `"?"` until a grounding
    /// fact names it.
    pub name: String,
    /// All candidates that survived the intersection, ascending.
    pub possible_values: Vec<Uid>,
    pub is_resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Uid>,
}

/// Resolver output: one row per input row, same order, plus the variables.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub rows: Vec<Triple>,
    pub variables: Vec<VariableBinding>,
}

// A distinct position of a variable: the raw triple identity plus the side
// (0 = lh, 1 = rh).
type Position = (Uid, Uid, Uid, u8);

/// Unifies variable candidates across all their occurrences and renders the
/// table with resolved values substituted and each row marked as a
/// confirmation or a denial. `matches[i]` holds the facts matching row `i`.
pub fn resolve(table: &[Triple], matches: &[Vec<FactRecord>]) -> Resolution {
    // variable uid -> position -> values observed at that position
    let mut positions: BTreeMap<Uid, BTreeMap<Position, RoaringTreemap>> = BTreeMap::new();

    for (row, triple) in table.iter().enumerate() {
        let identity = (triple.lh.uid, triple.rel.uid, triple.rh.uid);
        if triple.lh.is_variable() {
            let observed = positions
                .entry(triple.lh.uid)
                .or_default()
                .entry((identity.0, identity.1, identity.2, 0))
                .or_default();
            if let Some(row_matches) = matches.get(row) {
                for fact in row_matches {
                    observed.insert(fact.lh_object_uid);
                }
            }
        }
        if triple.rh.is_variable() {
            let observed = positions
                .entry(triple.rh.uid)
                .or_default()
                .entry((identity.0, identity.1, identity.2, 1))
                .or_default();
            if let Some(row_matches) = matches.get(row) {
                for fact in row_matches {
                    observed.insert(fact.rh_object_uid);
                }
            }
        }
    }

    let mut variables = Vec::with_capacity(positions.len());
    let mut resolved: BTreeMap<Uid, Uid> = BTreeMap::new();
    for (uid, observed) in &positions {
        let mut sets = observed.values();
        let mut surviving = sets.next().cloned().unwrap_or_else(RoaringTreemap::new);
        for set in sets {
            surviving &= set;
        }
        // ascending tie-break keeps resolution deterministic
        let value = surviving.min();
        if let Some(v) = value {
            resolved.insert(*uid, v);
        }
        variables.push(VariableBinding {
            uid: *uid,
            name: String::from("?"),
            possible_values: surviving.iter().collect(),
            is_resolved: value.is_some(),
            value,
        });
    }

    let rows = table
        .iter()
        .map(|triple| {
            let mut row = triple.clone();
            let mut denied = false;
            for operand in [&mut row.lh, &mut row.rh] {
                if operand.is_variable() {
                    match resolved.get(&operand.uid) {
                        Some(value) => operand.uid = *value,
                        None => denied = true,
                    }
                }
            }
            row.intention = if denied {
                Intention::Denial
            } else {
                Intention::Confirmation
            };
            row
        })
        .collect();

    Resolution { rows, variables }
}
