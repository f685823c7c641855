// crates/atlas-core/src/diagnostics.rs
// ============================================================================
// Module: Atlas Diagnostics
// Description: Non-fatal warnings collected during classification/rendering.
// Purpose: Report questionable inputs without interleaving them with output.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! Warnings are values returned to the caller next to the generated text.
//! Each one is also emitted as a `tracing` event at `warn` level so hosts
//! with a subscriber see them as they happen.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use tracing::warn;

// ============================================================================
// SECTION: Warning Codes
// ============================================================================

/// Stable classification of warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WarningCode {
    /// A token has no effect because another token supersedes it.
    RedundantOperator,
    /// `&&`/`||` overloads lose short-circuit evaluation.
    LogicalOperatorOverload,
    /// An arithmetic mode was requested without arithmetic operators.
    UnusedArithmeticMode,
    /// `no-constexpr-hash` was requested without `hash`.
    UnusedHashModifier,
    /// A type was given two different value-access expressions.
    DuplicateValueAccess,
}

impl WarningCode {
    /// Returns a stable label for the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RedundantOperator => "redundant-operator",
            Self::LogicalOperatorOverload => "logical-operator-overload",
            Self::UnusedArithmeticMode => "unused-arithmetic-mode",
            Self::UnusedHashModifier => "unused-hash-modifier",
            Self::DuplicateValueAccess => "duplicate-value-access",
        }
    }
}

// ============================================================================
// SECTION: Warning
// ============================================================================

/// One non-fatal diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Classification.
    pub code: WarningCode,
    /// Human-readable description.
    pub message: String,
}

impl Warning {
    /// Creates a warning and emits it as a `tracing` event.
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(code = code.as_str(), "{message}");
        Self {
            code,
            message,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning[{}]: {}", self.code.as_str(), self.message)
    }
}
