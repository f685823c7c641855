// crates/atlas-core/src/profiles.rs
// ============================================================================
// Module: Profile Registry
// Description: Named, reusable feature bundles referenced as `{NAME}`.
// Purpose: Store profile definitions and expand brace tokens in descriptions.
// Dependencies: crate::description, crate::text, crate::error
// ============================================================================

//! ## Overview
//! A profile is a [`ParsedSpecification`] registered under a name matching
//! `[A-Za-z0-9_-]+`. Descriptions reference it with a `{NAME}` token; the
//! registry merges the profile's forwards and operators into the description
//! and removes the brace token.
//!
//! Profiles may reference earlier profiles. References are resolved at
//! registration time, so stored profiles never contain brace tokens and
//! expansion is a single pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use tracing::debug;

use crate::description::ParsedSpecification;
use crate::description::brace_reference;
use crate::error::AtlasError;
use crate::text::is_profile_name;

// ============================================================================
// SECTION: Profile Registry
// ============================================================================

/// Registry of named profiles.
///
/// # Invariants
/// - Names are unique and match `[A-Za-z0-9_-]+`.
/// - Stored profiles contain no brace tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRegistry {
    /// Profiles keyed by name.
    profiles: BTreeMap<String, ParsedSpecification>,
}

impl ProfileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `spec` under `name`.
    ///
    /// Brace tokens inside `spec` are expanded against profiles registered
    /// earlier.
    ///
    /// # Errors
    /// Returns [`AtlasError::Syntax`] for an invalid name,
    /// [`AtlasError::Conflict`] for a duplicate, and
    /// [`AtlasError::UnknownReference`] when `spec` references an unknown
    /// profile.
    pub fn register(&mut self, name: &str, spec: ParsedSpecification) -> Result<(), AtlasError> {
        if !is_profile_name(name) {
            return Err(AtlasError::syntax(format!(
                "invalid profile name `{name}` (expected [A-Za-z0-9_-]+)"
            )));
        }
        if self.profiles.contains_key(name) {
            return Err(AtlasError::conflict(format!("profile `{name}` is already defined")));
        }
        let expanded = self.expand(spec)?;
        debug!(profile = name, tokens = expanded.operators.len(), "registered profile");
        self.profiles.insert(name.to_string(), expanded);
        Ok(())
    }

    /// Returns the profile registered under `name`.
    ///
    /// # Errors
    /// Returns [`AtlasError::UnknownReference`] when no such profile exists.
    pub fn get(&self, name: &str) -> Result<&ParsedSpecification, AtlasError> {
        self.profiles
            .get(name)
            .ok_or_else(|| AtlasError::unknown_reference(format!("unknown profile `{name}`")))
    }

    /// Returns true when no profile is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Returns the number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Expands every `{NAME}` token of `spec` and removes it.
    ///
    /// Profiles merge in sorted reference order; merged forwards are
    /// appended after the description's own forwards.
    ///
    /// # Errors
    /// Returns [`AtlasError::UnknownReference`] when a referenced profile
    /// does not exist.
    pub fn expand(&self, mut spec: ParsedSpecification) -> Result<ParsedSpecification, AtlasError> {
        let references: Vec<String> = spec
            .operators
            .iter()
            .filter(|token| brace_reference(token).is_some())
            .cloned()
            .collect();
        for token in references {
            spec.operators.remove(&token);
            let name = brace_reference(&token).unwrap_or_default();
            let profile = self.get(name)?;
            spec.merge(profile);
        }
        Ok(spec)
    }
}
