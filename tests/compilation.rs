use quaestor::cypher::{compile_grounding, compile_table};
use quaestor::error::QuaestorError;
use quaestor::parse::parse;
use serde_json::json;

#[test]
fn shared_placeholders_compile_to_one_pattern_variable() {
    // variable 1 at rh of row 0 and lh of row 1
    let table = parse(&[
        "1000001 > 1146 > 1.?",
        "1.? > 1146 > 1000235",
    ]);
    assert_eq!(table.len(), 2);
    let compiled = compile_table(&table, 1, 25).unwrap();
    let query = &compiled.primary.query;
    assert!(
        query.matches("var_1").count() >= 2,
        "both occurrences use the same name:\n{query}"
    );
    assert!(query.contains("(var_1:Entity)"), "{query}");
    assert!(query.contains("fact_0:Fact"), "{query}");
    assert!(query.contains("fact_1:Fact"), "{query}");
    assert_eq!(compiled.primary.params["lh_object_uid_0"], json!(1000001));
    assert_eq!(compiled.primary.params["rh_object_uid_1"], json!(1000235));
    assert_eq!(compiled.primary.params["rel_type_uid_0"], json!(1146));
    assert!(
        query.contains("RETURN fact_0, fact_1, var_1"),
        "facts then variables are projected:\n{query}"
    );
}

#[test]
fn pagination_becomes_skip_and_limit() {
    let table = parse(&["123 > 1146 > 456"]);
    let compiled = compile_table(&table, 3, 10).unwrap();
    assert_eq!(compiled.primary.params["skip"], json!(20));
    assert_eq!(compiled.primary.params["limit"], json!(10));
    assert!(compiled.primary.query.contains("SKIP $skip LIMIT $limit"));
    assert!(
        compiled.primary.query.contains("ORDER BY fact_0.fact_uid"),
        "pages must be stable and disjoint"
    );
}

#[test]
fn count_twin_projects_only_the_row_count() {
    let table = parse(&["123 > 1146 > 456", "?x > 1146 > 456"]);
    let compiled = compile_table(&table, 1, 25).unwrap();
    let count = &compiled.count.query;
    assert!(count.contains("count(*) AS total_count"), "{count}");
    assert!(!count.contains("SKIP"), "count query is unpaginated");
    assert!(!count.contains("LIMIT"), "count query is unpaginated");
    // same predicate graph: every MATCH line of the primary is in the twin
    for line in compiled.primary.query.lines().filter(|l| l.starts_with("MATCH")) {
        assert!(count.contains(line), "missing clause: {line}");
    }
    assert!(!compiled.count.params.contains_key("skip"));
}

#[test]
fn anonymous_placeholders_get_fresh_nodes_per_position() {
    let table = parse(&["? > 1146 > ?", "? > 1146 > 456"]);
    let compiled = compile_table(&table, 1, 25).unwrap();
    let query = &compiled.primary.query;
    assert!(query.contains("(lh_0:Entity)"), "{query}");
    assert!(query.contains("(rh_0:Entity)"), "{query}");
    assert!(query.contains("(lh_1:Entity)"), "{query}");
    assert!(!query.contains("var_0"), "uid 0 never becomes a variable");
}

#[test]
fn empty_table_and_bad_pagination_are_compilation_errors() {
    let table = parse(&["123 > 1146 > 456"]);
    assert!(matches!(
        compile_table(&[], 1, 25),
        Err(QuaestorError::Compilation(_))
    ));
    assert!(matches!(
        compile_table(&table, 0, 25),
        Err(QuaestorError::Compilation(_))
    ));
    assert!(matches!(
        compile_table(&table, 1, 0),
        Err(QuaestorError::Compilation(_))
    ));
}

#[test]
fn relation_placeholders_have_no_translation() {
    let table = parse(&["123 > 7.? > 456"]);
    assert_eq!(table.len(), 1, "the grammar admits it");
    let err = compile_table(&table, 1, 25).unwrap_err();
    match err {
        QuaestorError::Compilation(msg) => {
            assert!(msg.contains("row 0"), "row is named: {msg}")
        }
        other => panic!("expected a compilation error, got {other}"),
    }
}

#[test]
fn grounding_query_looks_up_one_naming_fact() {
    let compiled = compile_grounding(999);
    assert!(compiled.query.contains("LIMIT 1"));
    assert_eq!(compiled.params["uid"], json!(999));
}
