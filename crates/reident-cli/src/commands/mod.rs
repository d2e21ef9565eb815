//! Subcommand implementations.

pub(crate) mod estimate;
pub(crate) mod sweep;

use crate::error::{CliError, Result};
use reident::config::SimParams;
use std::path::Path;

/// Loads parameters from `path` (or defaults), lets `apply` override them,
/// then validates the result.
pub(crate) fn effective_params(
    path: Option<&Path>,
    apply: impl FnOnce(&mut SimParams),
) -> Result<SimParams> {
    let mut params = match path {
        Some(p) if !p.exists() => return Err(CliError::FileNotFound(p.to_path_buf())),
        Some(p) => SimParams::from_json_file(p)?,
        None => SimParams::default(),
    };
    apply(&mut params);
    params.validate()?;
    Ok(params)
}
