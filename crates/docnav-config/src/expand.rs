//! `${VAR}` expansion in path-like configuration fields.
//!
//! Only the braced forms `${VAR}` and `${VAR:-default}` are recognized, so a
//! literal `$` in a URL prefix or directory name is kept as written.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand references in an optional field in place, reading the process
/// environment. An unset field stays unset.
pub(crate) fn expand_field(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        let expanded = expand_with(raw, field, |var| std::env::var(var).ok())?;
        *value = Some(expanded);
    }
    Ok(())
}

/// Expand references in `value`, resolving names through `lookup`.
///
/// A name `lookup` doesn't know is an error unless the reference carries a
/// default.
fn expand_with(
    value: &str,
    field: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| {
        lookup(var)
            .map(Some)
            .ok_or_else(|| UnsetVar(var.to_owned()))
    })
    .map(Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Variable referenced without a default and not set.
struct UnsetVar(String);
