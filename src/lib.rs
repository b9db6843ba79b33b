//! Quaestor – a controlled-natural-language query engine over a property
//! graph store.
//!
//! Quaestor parses Gellish-style triple statements, compiles them into one
//! parameterized Cypher query (plus a twin count query), hands them to an
//! external executor, and reconciles the results through logic-variable
//! unification to decide, per statement, whether it is confirmed or denied:
//! * A [`triple::Triple`] is a left-object / relation-type / right-object
//!   statement, optionally carrying placeholders and metadata.
//! * A placeholder uid in `[1, 99]` is a logic variable scoped to one query;
//!   uid 0 is an anonymous wildcard.
//! * A query table is an ordered sequence of triples forming one
//!   conjunctive query.
//! * A [`resolve::VariableBinding`] holds the values consistent with every
//!   position a variable occupies; ties break on the smallest uid.
//!
//! ## Modules
//! * [`triple`] – The data model: uids, operands, triples, intentions,
//!   metadata keys.
//! * [`parse`] – The line parser, a pure fold over the input.
//! * [`cypher`] – Direct compilation of a query table into Cypher.
//! * [`store`] – The executor boundary: [`store::QueryExecutor`], records,
//!   params.
//! * [`extract`] – Record stream to facts, observed values, and per-row
//!   match sets.
//! * [`resolve`] – Unification by candidate intersection.
//! * [`engine`] – The request pipeline and the two entry points.
//! * [`settings`] – File/environment configuration.
//!
//! ## Quick Start
//! ```
//! use quaestor::parse::parse;
//! use quaestor::cypher::compile_table;
//!
//! let table = parse(&[
//!     "@intention=question",
//!     "1.? > 1146[\"is a kind of\"] > 40043[\"centrifugal pump\"]",
//! ]);
//! assert_eq!(table.len(), 1);
//! let compiled = compile_table(&table, 1, 25).unwrap();
//! assert!(compiled.primary.query.contains("var_1"));
//! ```
//!
//! ## Status
//! The executor (graph-store driver, transport, retries) is an external
//! collaborator; see [`store::QueryExecutor`]. REST/WS surfaces, caches and
//! visualization live outside this crate.

pub mod cypher;
pub mod engine;
pub mod error;
pub mod extract;
pub mod parse;
pub mod resolve;
pub mod settings;
pub mod store;
pub mod triple;
