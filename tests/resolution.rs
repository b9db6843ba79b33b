use quaestor::parse::parse;
use quaestor::resolve::resolve;
use quaestor::store::FactRecord;
use quaestor::triple::Intention;

fn fact(fact_uid: u64, lh: u64, rel: u64, rh: u64) -> FactRecord {
    FactRecord {
        fact_uid,
        lh_object_uid: lh,
        lh_object_name: format!("entity {lh}"),
        rel_type_uid: rel,
        rel_type_name: String::from("is related to"),
        rh_object_uid: rh,
        rh_object_name: format!("entity {rh}"),
    }
}

// variable 1 at rh of row 0 and lh of row 1
fn two_row_table() -> Vec<quaestor::triple::Triple> {
    parse(&["1000001 > 1146 > 1.?", "1.? > 1146 > 1000235"])
}

#[test]
fn consistent_observations_resolve_and_confirm() {
    let table = two_row_table();
    let matches = vec![
        vec![fact(501, 1000001, 1146, 999)],
        vec![fact(502, 999, 1146, 1000235)],
    ];
    let resolution = resolve(&table, &matches);
    assert_eq!(resolution.variables.len(), 1);
    let var = &resolution.variables[0];
    assert_eq!(var.uid, 1);
    assert!(var.is_resolved);
    assert_eq!(var.value, Some(999));
    assert_eq!(var.possible_values, vec![999]);
    assert_eq!(resolution.rows.len(), 2, "output length equals input length");
    assert_eq!(resolution.rows[0].rh.uid, 999, "value substituted");
    assert_eq!(resolution.rows[1].lh.uid, 999);
    assert_eq!(resolution.rows[0].intention, Intention::Confirmation);
    assert_eq!(resolution.rows[1].intention, Intention::Confirmation);
}

#[test]
fn inconsistent_observations_deny_both_rows() {
    let table = two_row_table();
    let matches = vec![
        vec![fact(501, 1000001, 1146, 999)],
        vec![fact(502, 888, 1146, 1000235)],
    ];
    let resolution = resolve(&table, &matches);
    let var = &resolution.variables[0];
    assert!(!var.is_resolved, "empty intersection is a negative answer");
    assert_eq!(var.value, None);
    assert!(var.possible_values.is_empty());
    assert_eq!(resolution.rows[0].intention, Intention::Denial);
    assert_eq!(resolution.rows[1].intention, Intention::Denial);
    assert_eq!(resolution.rows[0].rh.uid, 1, "placeholder kept when unresolved");
}

#[test]
fn tie_break_is_ascending() {
    let table = two_row_table();
    let matches = vec![
        vec![fact(501, 1000001, 1146, 999), fact(503, 1000001, 1146, 7)],
        vec![fact(502, 999, 1146, 1000235), fact(504, 7, 1146, 1000235)],
    ];
    let resolution = resolve(&table, &matches);
    let var = &resolution.variables[0];
    assert_eq!(var.possible_values, vec![7, 999], "ascending candidates");
    assert_eq!(var.value, Some(7), "smallest candidate wins");
}

#[test]
fn resolution_is_idempotent() {
    let table = two_row_table();
    let matches = vec![
        vec![fact(501, 1000001, 1146, 999), fact(503, 1000001, 1146, 7)],
        vec![fact(502, 999, 1146, 1000235), fact(504, 7, 1146, 1000235)],
    ];
    let first = resolve(&table, &matches);
    let second = resolve(&table, &matches);
    assert_eq!(first.variables, second.variables);
    assert_eq!(first.rows, second.rows);
}

#[test]
fn duplicate_rows_at_the_same_side_count_once() {
    // the same statement twice: still one distinct position for variable 1
    let table = parse(&["1000001 > 1146 > 1.?", "1000001 > 1146 > 1.?"]);
    let matches = vec![
        vec![fact(501, 1000001, 1146, 5)],
        vec![fact(502, 1000001, 1146, 9)],
    ];
    let resolution = resolve(&table, &matches);
    let var = &resolution.variables[0];
    assert_eq!(
        var.possible_values,
        vec![5, 9],
        "observations at the shared position pool instead of intersecting"
    );
    assert_eq!(var.value, Some(5));
}

#[test]
fn distinct_rows_at_the_same_side_are_distinct_positions() {
    // variable 1 at rh of two different statements: the value must hold in both
    let table = parse(&["1000001 > 1146 > 1.?", "1000002 > 1146 > 1.?"]);
    let matches = vec![
        vec![fact(501, 1000001, 1146, 5), fact(502, 1000001, 1146, 9)],
        vec![fact(503, 1000002, 1146, 9)],
    ];
    let resolution = resolve(&table, &matches);
    let var = &resolution.variables[0];
    assert_eq!(var.possible_values, vec![9], "only 9 is consistent at both");
    assert_eq!(var.value, Some(9));
}

#[test]
fn anonymous_placeholders_do_not_unify() {
    let table = parse(&["? > 1146 > ?"]);
    let resolution = resolve(&table, &[Vec::new()]);
    assert!(resolution.variables.is_empty(), "uid 0 is a wildcard");
    assert_eq!(
        resolution.rows[0].intention,
        Intention::Confirmation,
        "no referenced variable failed to resolve"
    );
}

#[test]
fn constant_rows_confirm_vacuously() {
    let table = parse(&["123 > 1146 > 456"]);
    let resolution = resolve(&table, &[Vec::new()]);
    assert_eq!(resolution.rows[0].intention, Intention::Confirmation);
}

#[test]
fn independent_variables_resolve_independently() {
    let table = parse(&["1.? > 1146 > 456", "2.? > 1146 > 789"]);
    let matches = vec![
        vec![fact(501, 41, 1146, 456)],
        Vec::new(),
    ];
    let resolution = resolve(&table, &matches);
    assert_eq!(resolution.variables.len(), 2);
    assert_eq!(resolution.variables[0].uid, 1);
    assert_eq!(resolution.variables[0].value, Some(41));
    assert_eq!(resolution.variables[1].uid, 2);
    assert!(!resolution.variables[1].is_resolved);
    assert_eq!(resolution.rows[0].intention, Intention::Confirmation);
    assert_eq!(resolution.rows[1].intention, Intention::Denial);
}
