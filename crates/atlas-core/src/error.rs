// crates/atlas-core/src/error.rs
// ============================================================================
// Module: Atlas Errors
// Description: Single error surface for parsing, classification, and rendering.
// Purpose: Carry human-readable failures with optional file/line origins.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every public entry point of the generator returns [`AtlasError`]. Variants
//! map onto the failure classes a caller may want to distinguish (syntax,
//! unknown token, unknown reference, conflict, invariant violation, I/O), but
//! each one renders as a single human-readable line. Errors raised while
//! reading a file carry an [`Origin`] so the message reads `file:line: ...`.
//!
//! No error is recovered internally: the first failure aborts processing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Origins
// ============================================================================

/// File name and 1-based line number of an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// File name as supplied by the caller (not canonicalized).
    pub file: String,
    /// 1-based line number.
    pub line: usize,
}

impl SourceLocation {
    /// Creates a location for `file` at `line`.
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Where an error was raised.
///
/// # Invariants
/// - `Unspecified` renders as an empty prefix so messages read naturally for
///   errors raised outside of a file (e.g. a single description string).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Origin {
    /// No source position is known.
    #[default]
    Unspecified,
    /// The error was raised while processing a specific input line.
    Line(SourceLocation),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => Ok(()),
            Self::Line(location) => write!(f, "{location}: "),
        }
    }
}

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Stable classification of [`AtlasError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// Malformed input text.
    Syntax,
    /// A feature token with no semantic mapping.
    UnknownToken,
    /// A profile or constraint name that was never defined.
    UnknownReference,
    /// Two inputs disagree (section header vs key, duplicate constant).
    Conflict,
    /// A structural rule of the model was violated.
    Invariant,
    /// Input could not be read.
    Io,
}

impl ErrorKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::UnknownToken => "unknown_token",
            Self::UnknownReference => "unknown_reference",
            Self::Conflict => "conflict",
            Self::Invariant => "invariant",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Atlas Error
// ============================================================================

/// Errors raised by the generator.
///
/// # Invariants
/// - Variant meanings are stable for automation and tests.
/// - `message` never contains the origin prefix; [`fmt::Display`] adds it.
///
/// # Examples
/// ```
/// use atlas_core::AtlasError;
/// use atlas_core::ErrorKind;
///
/// let err = AtlasError::syntax("empty description").at("types.atlas", 3);
/// assert_eq!(err.kind(), ErrorKind::Syntax);
/// assert_eq!(err.to_string(), "types.atlas:3: syntax error: empty description");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    /// Malformed section header, key/value, interaction line, or empty field.
    #[error("{origin}syntax error: {message}")]
    Syntax {
        /// Where the error was raised.
        origin: Origin,
        /// Human-readable description.
        message: String,
    },
    /// Feature token the classifier cannot map.
    #[error("{origin}unknown token: {message}")]
    UnknownToken {
        /// Where the error was raised.
        origin: Origin,
        /// Human-readable description.
        message: String,
    },
    /// Reference to an undefined profile or constraint.
    #[error("{origin}unknown reference: {message}")]
    UnknownReference {
        /// Where the error was raised.
        origin: Origin,
        /// Human-readable description.
        message: String,
    },
    /// Contradictory inputs.
    #[error("{origin}conflict: {message}")]
    Conflict {
        /// Where the error was raised.
        origin: Origin,
        /// Human-readable description.
        message: String,
    },
    /// Structural rule violation.
    #[error("{origin}invalid: {message}")]
    Invariant {
        /// Where the error was raised.
        origin: Origin,
        /// Human-readable description.
        message: String,
    },
    /// Input could not be opened or read.
    #[error("{origin}io error: {message}")]
    Io {
        /// Where the error was raised.
        origin: Origin,
        /// Human-readable description.
        message: String,
    },
}

impl AtlasError {
    /// Creates a syntax error without an origin.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            origin: Origin::Unspecified,
            message: message.into(),
        }
    }

    /// Creates an unknown-token error without an origin.
    #[must_use]
    pub fn unknown_token(message: impl Into<String>) -> Self {
        Self::UnknownToken {
            origin: Origin::Unspecified,
            message: message.into(),
        }
    }

    /// Creates an unknown-reference error without an origin.
    #[must_use]
    pub fn unknown_reference(message: impl Into<String>) -> Self {
        Self::UnknownReference {
            origin: Origin::Unspecified,
            message: message.into(),
        }
    }

    /// Creates a conflict error without an origin.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            origin: Origin::Unspecified,
            message: message.into(),
        }
    }

    /// Creates an invariant-violation error without an origin.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            origin: Origin::Unspecified,
            message: message.into(),
        }
    }

    /// Creates an I/O error without an origin.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            origin: Origin::Unspecified,
            message: message.into(),
        }
    }

    /// Attaches a file/line origin unless one is already present.
    ///
    /// Errors bubbling up from nested parsers keep the innermost location.
    #[must_use]
    pub fn at(mut self, file: &str, line: usize) -> Self {
        let origin = self.origin_mut();
        if *origin == Origin::Unspecified {
            *origin = Origin::Line(SourceLocation::new(file, line));
        }
        self
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax {
                ..
            } => ErrorKind::Syntax,
            Self::UnknownToken {
                ..
            } => ErrorKind::UnknownToken,
            Self::UnknownReference {
                ..
            } => ErrorKind::UnknownReference,
            Self::Conflict {
                ..
            } => ErrorKind::Conflict,
            Self::Invariant {
                ..
            } => ErrorKind::Invariant,
            Self::Io {
                ..
            } => ErrorKind::Io,
        }
    }

    /// Returns the message without the origin prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Syntax {
                message, ..
            }
            | Self::UnknownToken {
                message, ..
            }
            | Self::UnknownReference {
                message, ..
            }
            | Self::Conflict {
                message, ..
            }
            | Self::Invariant {
                message, ..
            }
            | Self::Io {
                message, ..
            } => message,
        }
    }

    /// Returns the source location when the error carries one.
    #[must_use]
    pub const fn location(&self) -> Option<&SourceLocation> {
        match self.origin() {
            Origin::Unspecified => None,
            Origin::Line(location) => Some(location),
        }
    }

    /// Borrows the origin of any variant.
    const fn origin(&self) -> &Origin {
        match self {
            Self::Syntax {
                origin, ..
            }
            | Self::UnknownToken {
                origin, ..
            }
            | Self::UnknownReference {
                origin, ..
            }
            | Self::Conflict {
                origin, ..
            }
            | Self::Invariant {
                origin, ..
            }
            | Self::Io {
                origin, ..
            } => origin,
        }
    }

    /// Mutably borrows the origin of any variant.
    const fn origin_mut(&mut self) -> &mut Origin {
        match self {
            Self::Syntax {
                origin, ..
            }
            | Self::UnknownToken {
                origin, ..
            }
            | Self::UnknownReference {
                origin, ..
            }
            | Self::Conflict {
                origin, ..
            }
            | Self::Invariant {
                origin, ..
            }
            | Self::Io {
                origin, ..
            } => origin,
        }
    }
}
