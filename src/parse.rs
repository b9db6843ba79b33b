//! Line-oriented parser for the controlled language.
//!
//! A script consists of metadata lines (`@key=value`) and relation lines
//! (`LEFT > RELATION > RIGHT`). Metadata accumulates into a pending map and
//! is consumed by the next relation line, successful or not. Parsing is a
//! pure fold `(state, line) -> (state', Option<Triple>)`; nothing is shared
//! between lines except the explicit [`ParserState`].
//!
//! Relation lines match `[?][N.]LEFT[:role] > [N.]RELATION[:role]? > [?][N.]RIGHT`:
//! * a leading `?`, a `.` after a bare placeholder number, or a literal `?`
//!   body marks the operand as a query variable;
//! * `N.` (N in [1, 99]) binds the operand to placeholder variable N;
//! * `:role` suffixes capture cardinality/role annotations apart from uid/name;
//! * constants are `UID` or `UID["NAME"]`, quotes stripped.
//!
//! A line that fails the grammar produces no triple and, under the default
//! policy, does not abort the batch; it is logged and skipped.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::error::{QuaestorError, Result};
use crate::triple::{Intention, MetadataKey, Operand, RelType, Triple, UNBOUND, Uid};

lazy_static! {
    static ref METADATA: Regex = Regex::new(r"^@([A-Za-z_]+)\s*=\s*(.+)$").unwrap();
    // the placeholder range [1, 99] is baked into the pattern
    static ref PLACEHOLDER: Regex = Regex::new(r"^([1-9][0-9]?)\.(.*)$").unwrap();
    static ref CONSTANT: Regex = Regex::new(r#"^([0-9]+)(?:\["([^"]*)"\])?$"#).unwrap();
}

/// What to do with a relation line that fails the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Log the line and continue with the rest of the batch.
    #[default]
    Skip,
    /// Surface the first malformed line as an error.
    Abort,
}

/// Metadata gathered since the last relation line.
#[derive(Debug, Clone, Default)]
struct Pending {
    intention: Option<Intention>,
    validity: Option<NaiveDate>,
    approval: Option<String>,
}

/// Explicit fold state threaded through the input.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    sequence: u64,
    pending: Pending,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Consumes one line. Metadata lines update the pending map, relation lines
/// yield a triple (and reset the pending map whether or not they parse).
pub fn step(mut state: ParserState, line: &str) -> (ParserState, Result<Option<Triple>>) {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return (state, Ok(None));
    }
    if let Some(caps) = METADATA.captures(trimmed) {
        let outcome = apply_metadata(&mut state.pending, &caps[1], &caps[2]);
        return (state, outcome.map(|_| None));
    }
    // any relation line attempt consumes the pending metadata
    let pending = std::mem::take(&mut state.pending);
    match parse_relation(trimmed) {
        Ok((lh, rel, rh)) => {
            state.sequence += 1;
            let question = lh.placeholder
                || rel.placeholder
                || rh.placeholder
                || trimmed.contains(".?");
            let intention = pending.intention.unwrap_or(if question {
                Intention::Question
            } else {
                Intention::Statement
            });
            let triple = Triple {
                sequence: state.sequence,
                // bookkeeping id from the same monotonic counter
                fact_uid: state.sequence,
                lh,
                rel,
                rh,
                intention,
                validity: pending.validity,
                approval: pending.approval,
            };
            (state, Ok(Some(triple)))
        }
        Err(e) => (state, Err(e)),
    }
}

/// Parses a batch of lines, skipping malformed ones with a warning.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Vec<Triple> {
    let mut state = ParserState::new();
    let mut table = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let (next, outcome) = step(state, line.as_ref());
        state = next;
        match outcome {
            Ok(Some(triple)) => table.push(triple),
            Ok(None) => (),
            Err(e) => warn!(line = index + 1, error = %e, "skipping malformed line"),
        }
    }
    table
}

/// Parses a batch of lines under an explicit error policy. Under
/// [`ParseErrorPolicy::Abort`] the first malformed line is surfaced with its
/// line number.
pub fn parse_with_policy<S: AsRef<str>>(
    lines: &[S],
    policy: ParseErrorPolicy,
) -> Result<Vec<Triple>> {
    match policy {
        ParseErrorPolicy::Skip => Ok(parse(lines)),
        ParseErrorPolicy::Abort => {
            let mut state = ParserState::new();
            let mut table = Vec::new();
            for (index, line) in lines.iter().enumerate() {
                let (next, outcome) = step(state, line.as_ref());
                state = next;
                match outcome {
                    Ok(Some(triple)) => table.push(triple),
                    Ok(None) => (),
                    Err(e) => return Err(at_line(e, index + 1)),
                }
            }
            Ok(table)
        }
    }
}

fn at_line(error: QuaestorError, line: usize) -> QuaestorError {
    match error {
        QuaestorError::Parse { message, .. } => QuaestorError::Parse {
            message,
            line: Some(line),
        },
        other => other,
    }
}

fn apply_metadata(pending: &mut Pending, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key.parse::<MetadataKey>()? {
        MetadataKey::Intention => pending.intention = Some(value.parse()?),
        MetadataKey::Validity => {
            let date =
                NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| QuaestorError::Parse {
                    message: format!("invalid validity date '{value}'"),
                    line: None,
                })?;
            pending.validity = Some(date);
        }
        MetadataKey::Approval => pending.approval = Some(value.to_string()),
    }
    Ok(())
}

fn parse_relation(line: &str) -> Result<(Operand, RelType, Operand)> {
    let parts = split_parts(line)?;
    let lh = parse_operand(parts[0])?;
    let rel = parse_rel_type(parts[1])?;
    let rh = parse_operand(parts[2])?;
    Ok((lh, rel, rh))
}

// Splits on `>` while tracking quote state, since quoted names may contain
// anything but a quote.
fn split_parts(line: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut in_string = false;
    let mut start = 0;
    for (i, c) in line.char_indices() {
        if c == '"' {
            in_string = !in_string;
        } else if c == '>' && !in_string {
            parts.push(&line[start..i]);
            start = i + 1;
        }
    }
    parts.push(&line[start..]);
    if parts.len() != 3 {
        return Err(QuaestorError::Parse {
            message: format!("expected LEFT > RELATION > RIGHT in '{line}'"),
            line: None,
        });
    }
    Ok(parts)
}

// A role suffix sits outside any quoted name: `123["pump"]:1` or `123:1`.
fn split_role(text: &str) -> (&str, Option<&str>) {
    if let Some(pos) = text.rfind(':') {
        let outside_quotes = match text.rfind('"') {
            Some(q) => pos > q,
            None => true,
        };
        let suffix = &text[pos + 1..];
        if outside_quotes
            && !suffix.is_empty()
            && suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return (&text[..pos], Some(suffix));
        }
    }
    (text, None)
}

fn parse_operand(text: &str) -> Result<Operand> {
    let (body, role) = split_role(text.trim());
    let mut body = body.trim();
    let mut marked = false;
    if let Some(rest) = body.strip_prefix('?') {
        marked = true;
        body = rest.trim_start();
    }
    if let Some(caps) = PLACEHOLDER.captures(body) {
        let uid: Uid = caps[1].parse().map_err(|_| malformed(text))?;
        let mut operand = Operand::variable(uid);
        operand.role = role.map(str::to_string);
        return Ok(operand);
    }
    if marked || body == "?" {
        let mut operand = Operand::variable(UNBOUND);
        operand.role = role.map(str::to_string);
        return Ok(operand);
    }
    let caps = CONSTANT.captures(body).ok_or_else(|| malformed(text))?;
    let uid: Uid = caps[1].parse().map_err(|_| malformed(text))?;
    let name = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    Ok(Operand {
        uid,
        name,
        placeholder: false,
        role: role.map(str::to_string),
    })
}

fn parse_rel_type(text: &str) -> Result<RelType> {
    let (body, role) = split_role(text.trim());
    let body = body.trim();
    if let Some(caps) = PLACEHOLDER.captures(body) {
        let uid: Uid = caps[1].parse().map_err(|_| malformed(text))?;
        return Ok(RelType {
            uid,
            name: String::from("?"),
            placeholder: true,
            role: role.map(str::to_string),
        });
    }
    let caps = CONSTANT.captures(body).ok_or_else(|| malformed(text))?;
    let uid: Uid = caps[1].parse().map_err(|_| malformed(text))?;
    let name = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    Ok(RelType {
        uid,
        name,
        placeholder: false,
        role: role.map(str::to_string),
    })
}

fn malformed(text: &str) -> QuaestorError {
    QuaestorError::Parse {
        message: format!("malformed operand '{}'", text.trim()),
        line: None,
    }
}
