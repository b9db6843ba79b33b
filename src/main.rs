//! Debug driver: parses a script from a file argument (or stdin) and prints
//! the query table together with the Cypher it compiles to. Useful for
//! inspecting what a script will ask the store without connecting to one.

use std::io::Read;

use quaestor::cypher::compile_table;
use quaestor::error::{QuaestorError, Result};
use quaestor::parse::parse;
use quaestor::settings::Settings;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let settings = Settings::load().unwrap_or_default();

    let script = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| QuaestorError::Config(format!("cannot read {path}: {e}")))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| QuaestorError::Config(format!("cannot read stdin: {e}")))?;
            buffer
        }
    };

    let lines: Vec<&str> = script.lines().collect();
    let table = parse(&lines);
    info!(rows = table.len(), "parsed query table");
    for row in &table {
        println!("{row}");
    }
    if table.is_empty() {
        return Ok(());
    }

    let compiled = compile_table(&table, 1, settings.default_page_size)?;
    println!("\n{}", compiled.primary.query);
    println!(
        "{}",
        serde_json::Value::Object(compiled.primary.params.clone())
    );
    println!("\n{}", compiled.count.query);
    println!(
        "{}",
        serde_json::Value::Object(compiled.count.params.clone())
    );
    Ok(())
}
