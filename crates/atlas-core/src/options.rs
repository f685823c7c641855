// crates/atlas-core/src/options.rs
// ============================================================================
// Module: Generator Options
// Description: Caller-supplied overrides and per-type inputs.
// Purpose: Resolve guard and language settings with a fixed precedence.
// Dependencies: crate::model
// ============================================================================

//! ## Overview
//! Settings resolve in three layers: caller overrides ([`GeneratorOptions`])
//! beat file-level values, which beat the built-in defaults (`ATLAS`, `_`,
//! upper-case on, C++11).

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::model::CppStandard;
use crate::model::TypeKind;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default include-guard prefix.
pub const DEFAULT_GUARD_PREFIX: &str = "ATLAS";
/// Default separator between guard prefix and digest.
pub const DEFAULT_GUARD_SEPARATOR: &str = "_";

// ============================================================================
// SECTION: Generator Options
// ============================================================================

/// Caller overrides applied on top of file-level settings.
///
/// Every field is optional; `None` defers to the file, then to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Guard prefix override.
    pub guard_prefix: Option<String>,
    /// Guard separator override.
    pub guard_separator: Option<String>,
    /// Guard upper-casing override.
    pub upcase_guard: Option<bool>,
    /// C++ standard override.
    pub cpp_standard: Option<CppStandard>,
    /// Namespace for types that do not name their own; takes precedence over
    /// a file-level `namespace=`.
    pub default_namespace: Option<String>,
}

/// Fully resolved include-guard settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardSettings {
    /// Prefix placed before the digest.
    pub prefix: String,
    /// Separator between prefix and digest.
    pub separator: String,
    /// Upper-case the whole guard.
    pub upcase: bool,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_GUARD_PREFIX.to_string(),
            separator: DEFAULT_GUARD_SEPARATOR.to_string(),
            upcase: true,
        }
    }
}

impl GuardSettings {
    /// Resolves settings from caller overrides and file-level values.
    #[must_use]
    pub fn resolve(
        options: &GeneratorOptions,
        file_prefix: Option<&str>,
        file_separator: Option<&str>,
        file_upcase: Option<bool>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            prefix: options
                .guard_prefix
                .clone()
                .or_else(|| file_prefix.map(str::to_string))
                .unwrap_or(defaults.prefix),
            separator: options
                .guard_separator
                .clone()
                .or_else(|| file_separator.map(str::to_string))
                .unwrap_or(defaults.separator),
            upcase: options.upcase_guard.or(file_upcase).unwrap_or(defaults.upcase),
        }
    }

    /// Builds the guard macro for a body digest.
    ///
    /// # Examples
    /// ```
    /// use atlas_core::GuardSettings;
    ///
    /// let settings = GuardSettings::default();
    /// assert_eq!(settings.guard_for("ab12"), "ATLAS_AB12");
    /// ```
    #[must_use]
    pub fn guard_for(&self, digest: &str) -> String {
        let guard = format!("{}{}{}", self.prefix, self.separator, digest);
        if self.upcase { guard.to_ascii_uppercase() } else { guard }
    }
}

/// Resolves the C++ standard from caller and file levels.
#[must_use]
pub fn resolve_standard(options: &GeneratorOptions, file_level: Option<CppStandard>) -> CppStandard {
    options.cpp_standard.or(file_level).unwrap_or_default()
}

// ============================================================================
// SECTION: Type Description
// ============================================================================

/// Everything needed to generate one wrapper outside of a type file.
///
/// This is what a command-line front-end assembles from its flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDescription {
    /// Class-key.
    pub kind: TypeKind,
    /// Enclosing namespace (`""` for global).
    pub namespace: String,
    /// Unqualified class name.
    pub name: String,
    /// Description text (§ description grammar).
    pub description: String,
    /// Default constructor literal.
    pub default_value: Option<String>,
    /// Named constants as `(name, literal)` pairs in declaration order.
    pub constants: Vec<(String, String)>,
    /// Extra forward clauses appended after the description's own.
    pub forwards: Vec<String>,
}
