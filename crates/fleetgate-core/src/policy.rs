//! Tag naming policies.
//!
//! A tag may require a hostname and may constrain it with a regex. The
//! pattern is operator-supplied configuration, so compilation can fail at
//! validation time; that failure is a typed outcome, never a panic or a
//! propagated error. Compiled patterns are cached per [`PolicyCache`], which
//! callers hold for the duration of a run rather than per device.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

use crate::tag::DeviceTag;

/// Why a tag's naming policy could not be compiled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The operator-supplied pattern is not a valid regular expression.
    #[error("invalid device name pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// A tag's hostname policy with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledPolicy {
    /// Whether the tag requires a hostname to be set.
    pub rename_required: bool,
    /// The compiled pattern, when the tag carries one.
    pattern: Option<Regex>,
    /// The pattern source as the operator supplied it.
    pattern_source: Option<String>,
}

impl CompiledPolicy {
    /// Compiles the policy for a tag.
    ///
    /// A blank or whitespace-only pattern is treated as "no pattern". An
    /// invalid pattern yields [`PolicyError::InvalidPattern`].
    pub fn compile(tag: &DeviceTag) -> Result<Self, PolicyError> {
        let source = tag
            .device_name_regex
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let pattern = match source {
            Some(src) => Some(Regex::new(src).map_err(|e| PolicyError::InvalidPattern {
                pattern: src.to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            rename_required: tag.device_rename_enabled,
            pattern,
            pattern_source: source.map(String::from),
        })
    }

    /// True when the tag carries a pattern.
    #[must_use]
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// The operator-supplied pattern source, when present.
    #[must_use]
    pub fn pattern_source(&self) -> Option<&str> {
        self.pattern_source.as_deref()
    }

    /// Tests a hostname against the pattern.
    ///
    /// Vacuously true when the tag has no pattern.
    #[must_use]
    pub fn hostname_matches(&self, hostname: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(hostname),
            None => true,
        }
    }
}

/// Per-run cache of compiled tag policies, keyed by tag id string.
///
/// Compile failures are cached too, so a bad pattern is reported consistently
/// without recompiling for every device under the same tag.
#[derive(Debug, Default)]
pub struct PolicyCache {
    compiled: HashMap<String, Result<CompiledPolicy, PolicyError>>,
}

impl PolicyCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled policy for a tag, compiling on first use.
    pub fn policy_for(&mut self, tag: &DeviceTag) -> &Result<CompiledPolicy, PolicyError> {
        self.compiled
            .entry(tag.id.to_string())
            .or_insert_with(|| CompiledPolicy::compile(tag))
    }
}
