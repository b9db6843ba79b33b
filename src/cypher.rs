//! Direct compilation of a query table into Cypher.
//!
//! Every row becomes one `MATCH` clause joining two entity nodes through a
//! fact node. Constant uid positions become `$param` equality predicates on
//! the node; placeholder positions become pattern variables. The same
//! placeholder N always compiles to the same pattern variable `var_N`, in
//! any row, so the store's native join semantics constrain all occurrences
//! to the same node within one execution. There is no optimizer: rows
//! compile in order, and a row with no valid translation is an error, never
//! silently dropped.

use std::collections::BTreeSet;

use serde_json::json;

use crate::error::{QuaestorError, Result};
use crate::triple::{Operand, Triple, Uid};
use crate::store::Params;

/// A parameterized query ready for the executor.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub query: String,
    pub params: Params,
}

/// The primary query and its twin count query over the same predicate graph.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub primary: CompiledQuery,
    pub count: CompiledQuery,
}

/// Compiles a query table into one paginated Cypher query plus a count twin.
///
/// `page` is 1-based; `SKIP` is `(page - 1) * page_size`. The primary query
/// is ordered by the fact uids so that pages of a fixed dataset are stable
/// and disjoint.
pub fn compile_table(table: &[Triple], page: u64, page_size: u64) -> Result<Compiled> {
    if table.is_empty() {
        return Err(QuaestorError::Compilation(String::from(
            "query table is empty; nothing to match",
        )));
    }
    if page == 0 {
        return Err(QuaestorError::Compilation(String::from("page starts at 1")));
    }
    if page_size == 0 {
        return Err(QuaestorError::Compilation(String::from(
            "page size must be at least 1",
        )));
    }

    let mut params = Params::new();
    let mut matches = Vec::with_capacity(table.len());
    let mut returns = Vec::new();
    let mut order = Vec::new();
    let mut variables: BTreeSet<Uid> = BTreeSet::new();

    for (row, triple) in table.iter().enumerate() {
        if triple.rel.placeholder {
            return Err(QuaestorError::Compilation(format!(
                "row {row}: relation type {} is a placeholder and has no graph-pattern translation",
                triple.rel.uid
            )));
        }
        let lh = node_pattern(&triple.lh, "lh", row, &mut params, &mut variables);
        let rh = node_pattern(&triple.rh, "rh", row, &mut params, &mut variables);
        params.insert(format!("rel_type_uid_{row}"), json!(triple.rel.uid));
        matches.push(format!(
            "MATCH ({lh})<-[:lh_object]-(fact_{row}:Fact {{rel_type_uid: $rel_type_uid_{row}}})-[:rh_object]->({rh})"
        ));
        returns.push(format!("fact_{row}"));
        order.push(format!("fact_{row}.fact_uid"));
    }
    for uid in &variables {
        returns.push(format!("var_{uid}"));
    }

    let count = CompiledQuery {
        query: format!(
            "{}\nRETURN count(*) AS total_count",
            matches.join("\n")
        ),
        params: params.clone(),
    };

    params.insert(
        String::from("skip"),
        json!((page - 1).saturating_mul(page_size)),
    );
    params.insert(String::from("limit"), json!(page_size));
    let primary = CompiledQuery {
        query: format!(
            "{}\nRETURN {}\nORDER BY {}\nSKIP $skip LIMIT $limit",
            matches.join("\n"),
            returns.join(", "),
            order.join(", ")
        ),
        params,
    };

    Ok(Compiled { primary, count })
}

/// Compiles the lookup that gives a resolved value a human-readable name:
/// any one fact in which the value appears as the left object.
pub fn compile_grounding(uid: Uid) -> CompiledQuery {
    let mut params = Params::new();
    params.insert(String::from("uid"), json!(uid));
    CompiledQuery {
        query: String::from(
            "MATCH (fact:Fact)-[:lh_object]->(e:Entity {uid: $uid})\n\
             RETURN fact\nORDER BY fact.fact_uid LIMIT 1",
        ),
        params,
    }
}

// Placeholder N in any row is the same `var_N`; anonymous placeholders get a
// fresh node per position; constants pin the node uid through a parameter.
fn node_pattern(
    operand: &Operand,
    side: &str,
    row: usize,
    params: &mut Params,
    variables: &mut BTreeSet<Uid>,
) -> String {
    if operand.is_variable() {
        variables.insert(operand.uid);
        format!("var_{}:Entity", operand.uid)
    } else if operand.placeholder {
        format!("{side}_{row}:Entity")
    } else {
        params.insert(format!("{side}_object_uid_{row}"), json!(operand.uid));
        format!("{side}_{row}:Entity {{uid: ${side}_object_uid_{row}}}")
    }
}
