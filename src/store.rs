//! The boundary to the external graph store.
//!
//! The store itself (driver, transport, retries, timeouts) lives elsewhere;
//! this module only fixes the shapes that cross the boundary: a parameterized
//! query goes out, [`Record`]s come back. The executor must support
//! same-name-variable-implies-same-node binding across clauses within one
//! query, which is what the compiler's shared `var_N` names rely on.

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::triple::{OtherHasher, Uid};

/// Named query parameters, serialized alongside the query text.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// The properties of a fact node as stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub fact_uid: Uid,
    pub lh_object_uid: Uid,
    pub lh_object_name: String,
    pub rel_type_uid: Uid,
    pub rel_type_name: String,
    pub rh_object_uid: Uid,
    pub rh_object_name: String,
}

impl FactRecord {
    /// Full triple identity, used for deduplication across join paths.
    pub fn identity(&self) -> (Uid, Uid, Uid, Uid) {
        (
            self.lh_object_uid,
            self.rel_type_uid,
            self.rh_object_uid,
            self.fact_uid,
        )
    }
}

/// One named field of a record: a fact node, a bound-variable node, or a
/// coerced count. Numeric coercion from graph-native integer types is the
/// executor's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Fact(FactRecord),
    Node { uid: Uid },
    Count(u64),
}

/// One row returned by the executor, keyed by the names projected in the
/// compiled query (`fact_0`, `var_7`, `total_count`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record(pub HashMap<String, FieldValue, OtherHasher>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> &mut Self {
        self.0.insert(name.into(), value);
        self
    }
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

/// Executes compiled queries against the graph store.
///
/// Both engine reads (primary and count) and grounding lookups go through
/// this one method. Implementations are expected to be read-only here;
/// cancellation propagates by dropping the returned future.
pub trait QueryExecutor {
    fn execute(
        &self,
        query: &str,
        params: &Params,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;
}
