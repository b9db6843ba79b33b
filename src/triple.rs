use core::hash::BuildHasherDefault;
use std::fmt;
use std::str::FromStr;

// used for the @validity metadata
use chrono::NaiveDate;
use seahash::SeaHasher;
use serde::{Deserialize, Serialize};

use crate::error::QuaestorError;

// ------------- Uid -------------
pub type Uid = u64;

// we will use a fast hashing algo for maps and sets where keys are not Uids
pub type OtherHasher = BuildHasherDefault<SeaHasher>;

/// Placeholder uids occupy a reserved range, shared with any client authoring
/// queries. Changing it is a protocol break.
pub const VARIABLE_LOW: Uid = 1;
pub const VARIABLE_HIGH: Uid = 99;

/// Denotes an operand that is marked as a placeholder but has not been given
/// a placeholder number. Such operands are existential wildcards and never
/// take part in unification.
pub const UNBOUND: Uid = 0;

/// A uid in [1, 99] is a logic variable, everything else is a constant.
pub fn is_variable(uid: Uid) -> bool {
    (VARIABLE_LOW..=VARIABLE_HIGH).contains(&uid)
}

// ------------- Intention -------------
/// The speech act carried by a triple. Parsed lines start out as statements
/// or questions; result rows come back as confirmations or denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intention {
    Statement,
    Question,
    Confirmation,
    Denial,
}

impl fmt::Display for Intention {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Intention::Statement => write!(f, "statement"),
            Intention::Question => write!(f, "question"),
            Intention::Confirmation => write!(f, "confirmation"),
            Intention::Denial => write!(f, "denial"),
        }
    }
}

impl FromStr for Intention {
    type Err = QuaestorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "statement" => Ok(Intention::Statement),
            "question" => Ok(Intention::Question),
            "confirmation" => Ok(Intention::Confirmation),
            "denial" => Ok(Intention::Denial),
            _ => Err(QuaestorError::Parse {
                message: format!("unknown intention '{s}'"),
                line: None,
            }),
        }
    }
}

// ------------- Metadata -------------
/// The closed set of metadata keys a `@key=value` line may carry.
/// Unknown keys are rejected loudly instead of silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetadataKey {
    Intention,
    Validity,
    Approval,
}

impl FromStr for MetadataKey {
    type Err = QuaestorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intention" => Ok(MetadataKey::Intention),
            "validity" => Ok(MetadataKey::Validity),
            "approval" => Ok(MetadataKey::Approval),
            _ => Err(QuaestorError::Parse {
                message: format!("unknown metadata key '@{s}'"),
                line: None,
            }),
        }
    }
}

// ------------- Operand -------------
/// One side of a triple: either a concrete entity (`uid["name"]`) or a
/// placeholder. Placeholders carry the name `"?"` and either a number in
/// [1, 99] or [`UNBOUND`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub uid: Uid,
    pub name: String,
    #[serde(default)]
    pub placeholder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Operand {
    pub fn constant(uid: Uid, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            placeholder: false,
            role: None,
        }
    }
    pub fn variable(uid: Uid) -> Self {
        Self {
            uid,
            name: String::from("?"),
            placeholder: true,
            role: None,
        }
    }
    /// True when this operand takes part in unification.
    pub fn is_variable(&self) -> bool {
        self.placeholder && is_variable(self.uid)
    }
    /// True for `?` wildcards that never got a placeholder number.
    pub fn is_anonymous(&self) -> bool {
        self.placeholder && self.uid == UNBOUND
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.placeholder && self.uid != UNBOUND {
            write!(f, "{}.?", self.uid)?;
        } else if self.placeholder {
            write!(f, "?")?;
        } else if self.name.is_empty() {
            write!(f, "{}", self.uid)?;
        } else {
            write!(f, "{}[\"{}\"]", self.uid, self.name)?;
        }
        if let Some(role) = &self.role {
            write!(f, ":{role}")?;
        }
        Ok(())
    }
}

// ------------- RelType -------------
/// The relation type joining the two operands. The grammar admits a
/// placeholder prefix here as well, but such rows have no graph-pattern
/// translation and are rejected at compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelType {
    pub uid: Uid,
    pub name: String,
    #[serde(default)]
    pub placeholder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl RelType {
    pub fn constant(uid: Uid, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            placeholder: false,
            role: None,
        }
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.placeholder {
            write!(f, "{}.?", self.uid)?;
        } else if self.name.is_empty() {
            write!(f, "{}", self.uid)?;
        } else {
            write!(f, "{}[\"{}\"]", self.uid, self.name)?;
        }
        if let Some(role) = &self.role {
            write!(f, ":{role}")?;
        }
        Ok(())
    }
}

// ------------- Triple -------------
/// A single left-object / relation-type / right-object statement.
///
/// `sequence` is a monotonic per-parse counter and `fact_uid` is the
/// synthetic bookkeeping id derived from it; neither carries meaning
/// downstream beyond identifying the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub sequence: u64,
    pub fact_uid: Uid,
    #[serde(rename = "lh_object")]
    pub lh: Operand,
    #[serde(rename = "rel_type")]
    pub rel: RelType,
    #[serde(rename = "rh_object")]
    pub rh: Operand,
    pub intention: Intention,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<String>,
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} > {} > {} ({})",
            self.lh, self.rel, self.rh, self.intention
        )
    }
}
