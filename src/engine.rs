//! The engine wires parser, compiler, executor, extractor, and resolver into
//! the two entry points: [`Engine::interpret_query_table`] and
//! [`Engine::interpret_query_string`].
//!
//! One request is one pass: compile, run the primary and count queries
//! concurrently, extract, resolve, then fetch grounding facts for the
//! resolved values (concurrently, reassembled in variable order) so that
//! variables and substituted operands carry human-readable names. Nothing
//! survives across requests.

use std::collections::BTreeMap;

use futures_util::future;
use tracing::{debug, info};

use crate::cypher::{compile_grounding, compile_table};
use crate::error::{QuaestorError, Result};
use crate::extract::extract;
use crate::parse::{ParseErrorPolicy, parse, parse_with_policy};
use crate::resolve::{VariableBinding, resolve};
use crate::settings::Settings;
use crate::store::{FactRecord, FieldValue, QueryExecutor, Record};
use crate::triple::{Triple, Uid};

/// The answer to one interpreted query table.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    /// One result fact per table row, same order, with resolved values
    /// substituted and the intention set to confirmation or denial.
    pub facts: Vec<Triple>,
    /// The concrete facts supporting the answer, deduplicated, plus the
    /// name-lookup facts for resolved variables.
    pub grounding_facts: Vec<FactRecord>,
    /// Every placeholder variable of the table with its binding state.
    pub vars: Vec<VariableBinding>,
    /// Row count of the unpaginated predicate graph.
    pub total_count: u64,
}

/// Interprets query tables against a borrowed executor.
pub struct Engine<'en, E> {
    executor: &'en E,
    settings: Settings,
}

impl<'en, E: QueryExecutor> Engine<'en, E> {
    pub fn new(executor: &'en E) -> Self {
        Self {
            executor,
            settings: Settings::default(),
        }
    }

    pub fn with_settings(executor: &'en E, settings: Settings) -> Self {
        Self { executor, settings }
    }

    /// Parses a whole script and interprets the resulting table. Metadata
    /// lines delimit blocks; the fold concatenates all parsed triples into
    /// one conjunctive table.
    pub async fn interpret_query_string(
        &self,
        raw: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Interpretation> {
        let lines: Vec<&str> = raw.lines().collect();
        let table = match self.settings.on_parse_error {
            ParseErrorPolicy::Skip => parse(&lines),
            ParseErrorPolicy::Abort => parse_with_policy(&lines, ParseErrorPolicy::Abort)?,
        };
        self.interpret_query_table(&table, page, page_size).await
    }

    /// Interprets one query table: compiles it, runs the primary and count
    /// queries concurrently, and reconciles the results through the
    /// resolver. An empty table short-circuits without touching the store.
    pub async fn interpret_query_table(
        &self,
        table: &[Triple],
        page: u64,
        page_size: u64,
    ) -> Result<Interpretation> {
        if table.is_empty() {
            return Ok(Interpretation::default());
        }
        let page_size = page_size.min(self.settings.max_page_size);
        let compiled = compile_table(table, page, page_size)?;
        debug!(rows = table.len(), page, page_size, "compiled query table");

        // the two reads are independent
        let (records, count_records) = future::try_join(
            self.executor
                .execute(&compiled.primary.query, &compiled.primary.params),
            self.executor
                .execute(&compiled.count.query, &compiled.count.params),
        )
        .await?;
        let total_count = read_total_count(&count_records);

        let extraction = extract(&records, table.len());
        let resolution = resolve(table, &extraction.row_matches);
        info!(
            records = records.len(),
            facts = extraction.facts.len(),
            vars = resolution.variables.len(),
            total_count,
            "query table interpreted"
        );

        // grounding lookups are read-only and order-independent; run them
        // concurrently and reassemble by variable order
        let mut lookups = Vec::new();
        for value in resolution.variables.iter().filter_map(|v| v.value) {
            let grounding = compile_grounding(value);
            lookups.push(async move {
                let records = self
                    .executor
                    .execute(&grounding.query, &grounding.params)
                    .await?;
                Ok::<(Uid, Vec<Record>), QuaestorError>((value, records))
            });
        }
        let grounded = future::try_join_all(lookups).await?;

        let mut names: BTreeMap<Uid, String> = BTreeMap::new();
        let mut grounding_facts: BTreeMap<(Uid, Uid, Uid, Uid), FactRecord> = extraction
            .facts
            .into_iter()
            .map(|fact| (fact.identity(), fact))
            .collect();
        for (value, records) in grounded {
            for fact in records.iter().flat_map(fact_fields) {
                if fact.lh_object_uid == value {
                    names.entry(value).or_insert_with(|| fact.lh_object_name.clone());
                } else if fact.rh_object_uid == value {
                    names.entry(value).or_insert_with(|| fact.rh_object_name.clone());
                }
                grounding_facts
                    .entry(fact.identity())
                    .or_insert_with(|| fact.clone());
            }
        }

        let mut vars = resolution.variables;
        for var in &mut vars {
            if let Some(value) = var.value {
                if let Some(name) = names.get(&value) {
                    var.name = name.clone();
                }
            }
        }
        let mut facts = resolution.rows;
        for row in &mut facts {
            for operand in [&mut row.lh, &mut row.rh] {
                if operand.placeholder {
                    if let Some(name) = names.get(&operand.uid) {
                        operand.name = name.clone();
                    }
                }
            }
        }

        Ok(Interpretation {
            facts,
            grounding_facts: grounding_facts.into_values().collect(),
            vars,
            total_count,
        })
    }
}

fn read_total_count(records: &[Record]) -> u64 {
    records
        .iter()
        .find_map(|record| match record.get("total_count") {
            Some(FieldValue::Count(count)) => Some(*count),
            _ => None,
        })
        .unwrap_or(0)
}

fn fact_fields(record: &Record) -> impl Iterator<Item = &FactRecord> {
    record.iter().filter_map(|(_, value)| match value {
        FieldValue::Fact(fact) => Some(fact),
        _ => None,
    })
}
