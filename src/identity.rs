//! Reviewer identity resolution.
//!
//! Confirming or remediating an issue stamps who did it. Rather than
//! requiring `--as` on every invocation, identity is resolved through a chain:
//!
//! 1. `--as <identity>`: explicit per-command override
//! 2. `SCANBOARD_REVIEWER` env var: process/session level
//! 3. `reviewer` in `~/.scanboard/config.toml`: global default

use std::env;

use crate::config::Config;

/// Error message shown when identity cannot be resolved.
pub const IDENTITY_REQUIRED: &str = "reviewer identity required: pass --as <identity>, \
    set SCANBOARD_REVIEWER, or add `reviewer = \"...\"` to ~/.scanboard/config.toml";

/// Resolve the acting reviewer from the tiered resolution chain.
pub fn resolve_identity(explicit: Option<&str>, config: &Config) -> Result<String, String> {
    resolve_with(explicit, env::var("SCANBOARD_REVIEWER").ok(), config)
}

fn resolve_with(
    explicit: Option<&str>,
    from_env: Option<String>,
    config: &Config,
) -> Result<String, String> {
    if let Some(id) = explicit.filter(|s| !s.is_empty()) {
        return Ok(id.to_string());
    }

    if let Some(id) = from_env.filter(|s| !s.is_empty()) {
        return Ok(id);
    }

    config
        .reviewer
        .clone()
        .ok_or_else(|| IDENTITY_REQUIRED.to_string())
}
