use criterion::{Criterion, black_box, criterion_group, criterion_main};

use quaestor::parse::parse;
use quaestor::resolve::resolve;
use quaestor::store::FactRecord;
use quaestor::triple::Triple;

fn script_lines(relations: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(relations * 2);
    for i in 0..relations {
        lines.push(String::from("@intention=question"));
        lines.push(format!(
            "{}[\"entity {}\"] > 1146[\"is a kind of\"] > 1.?",
            1000000 + i,
            i
        ));
    }
    lines
}

fn match_sets(table: &[Triple], candidates: u64) -> Vec<Vec<FactRecord>> {
    table
        .iter()
        .map(|row| {
            (0..candidates)
                .map(|c| FactRecord {
                    fact_uid: row.sequence * 1000 + c,
                    lh_object_uid: row.lh.uid,
                    lh_object_name: row.lh.name.clone(),
                    rel_type_uid: row.rel.uid,
                    rel_type_name: row.rel.name.clone(),
                    rh_object_uid: 900 + c,
                    rh_object_name: format!("candidate {c}"),
                })
                .collect()
        })
        .collect()
}

fn parse_benchmark(c: &mut Criterion) {
    let lines = script_lines(200);
    c.bench_function("parse 200 relation lines", |b| {
        b.iter(|| parse(black_box(&lines)))
    });
}

fn resolve_benchmark(c: &mut Criterion) {
    let table = parse(&script_lines(50));
    let matches = match_sets(&table, 64);
    c.bench_function("resolve 50 rows x 64 candidates", |b| {
        b.iter(|| resolve(black_box(&table), black_box(&matches)))
    });
}

criterion_group!(benches, parse_benchmark, resolve_benchmark);
criterion_main!(benches);
