//! Engine settings, read from an optional `quaestor.toml` next to the
//! process plus `QUAESTOR_`-prefixed environment variables. Everything has a
//! default, so callers that never touch configuration get a working engine.

use serde::Deserialize;

use crate::error::{QuaestorError, Result};
use crate::parse::ParseErrorPolicy;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Page size used when the caller does not specify one.
    pub default_page_size: u64,
    /// Requested page sizes are clamped to this.
    pub max_page_size: u64,
    /// What to do with malformed relation lines.
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            max_page_size: 1000,
            on_parse_error: ParseErrorPolicy::Skip,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let source = config::Config::builder()
            .add_source(config::File::with_name("quaestor").required(false))
            .add_source(config::Environment::with_prefix("QUAESTOR"))
            .build()
            .map_err(|e| QuaestorError::Config(e.to_string()))?;
        source
            .try_deserialize()
            .map_err(|e| QuaestorError::Config(e.to_string()))
    }
}
