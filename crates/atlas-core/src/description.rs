// crates/atlas-core/src/description.rs
// ============================================================================
// Module: Description Parser
// Description: Tokenizer and classifier for one strong-type description.
// Purpose: Turn `strong int; +, -, ==, hash` into a Parsed Specification.
// Dependencies: crate::text, crate::error
// ============================================================================

//! ## Overview
//! A description names the wrapped type followed by `;`-separated segments.
//! Each segment is either a `forward=` clause (kept verbatim, in order) or a
//! comma-separated feature list whose tokens land in an unordered set.
//!
//! ### Grammar (informal)
//! ```text
//! description := [ "strong" WS ] type_part [ ";" { segment ";" } ]
//! segment     := "forward=" forward_list | feature ( "," feature )*
//! ```
//! The first `;` ends the type part; angle brackets are not tracked there.
//! Feature lists split on top-level commas so `bounded<0,100>` stays whole.
//! Unknown tokens are accepted here and rejected by the classifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::error::AtlasError;
use crate::text::split_top_level;
use crate::text::trim;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Keyword marking a description as a strong type.
const STRONG_KEYWORD: &str = "strong";
/// Prefix of a forwarded-member-function segment.
const FORWARD_PREFIX: &str = "forward=";

// ============================================================================
// SECTION: Parsed Specification
// ============================================================================

/// Result of parsing one description or profile definition.
///
/// # Invariants
/// - `operators` never contains the empty string.
/// - Shorthand tokens `+*` and `-*` are already expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSpecification {
    /// Wrapped type text (descriptions) or profile name (profiles).
    pub first_part: String,
    /// True when the description started with `strong`.
    pub had_strong_keyword: bool,
    /// Raw forward clauses in order of appearance.
    pub forwards: Vec<String>,
    /// Feature tokens.
    pub operators: BTreeSet<String>,
}

impl ParsedSpecification {
    /// Merges `other` into `self`.
    ///
    /// Forwards are appended in order and operators are unioned;
    /// `first_part` and the strong flag of `self` are kept.
    pub fn merge(&mut self, other: &Self) {
        self.forwards.extend(other.forwards.iter().cloned());
        self.operators.extend(other.operators.iter().cloned());
    }

    /// Returns the names referenced by `{NAME}` tokens, sorted.
    #[must_use]
    pub fn profile_references(&self) -> Vec<String> {
        self.operators.iter().filter_map(|token| brace_reference(token)).map(str::to_string).collect()
    }

    /// Re-emits the description in canonical form.
    ///
    /// The type part comes first, then forward segments in their original
    /// order, then the remaining tokens sorted lexicographically. The
    /// `strong` prefix is kept only if it was present.
    ///
    /// # Examples
    /// ```
    /// use atlas_core::parse_description;
    ///
    /// let spec = parse_description("strong double; hash, +, *")?;
    /// assert_eq!(spec.normalize(), "strong double; *, +, hash");
    /// # Ok::<(), atlas_core::AtlasError>(())
    /// ```
    #[must_use]
    pub fn normalize(&self) -> String {
        let mut segments = Vec::with_capacity(self.forwards.len() + 2);
        segments.push(self.first_part.clone());
        for forward in &self.forwards {
            segments.push(format!("{FORWARD_PREFIX}{forward}"));
        }
        if !self.operators.is_empty() {
            let tokens: Vec<&str> = self.operators.iter().map(String::as_str).collect();
            segments.push(tokens.join(", "));
        }
        let body = segments.join("; ");
        if self.had_strong_keyword { format!("{STRONG_KEYWORD} {body}") } else { body }
    }
}

/// Returns `NAME` when `token` is a `{NAME}` profile reference.
#[must_use]
pub fn brace_reference(token: &str) -> Option<&str> {
    token.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')).map(trim)
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses one description into a [`ParsedSpecification`].
///
/// # Errors
/// Returns [`AtlasError::Syntax`] when the description is empty, has no
/// type part, or contains an empty `forward=` clause.
///
/// # Examples
/// ```
/// use atlas_core::parse_description;
///
/// let spec = parse_description("strong int; +*, ==; forward=size")?;
/// assert!(spec.had_strong_keyword);
/// assert_eq!(spec.first_part, "int");
/// assert!(spec.operators.contains("u+"));
/// assert_eq!(spec.forwards, vec!["size".to_string()]);
/// # Ok::<(), atlas_core::AtlasError>(())
/// ```
pub fn parse_description(text: &str) -> Result<ParsedSpecification, AtlasError> {
    let text = trim(text);
    if text.is_empty() {
        return Err(AtlasError::syntax("description is empty"));
    }
    let (had_strong_keyword, text) = strip_strong_keyword(text);
    let (type_part, rest) = text.split_once(';').unwrap_or((text, ""));
    let type_part = trim(type_part);
    if type_part.is_empty() {
        return Err(AtlasError::syntax(format!("description `{text}` does not name a type")));
    }

    let mut spec = ParsedSpecification {
        first_part: type_part.to_string(),
        had_strong_keyword,
        ..ParsedSpecification::default()
    };
    for segment in rest.split(';').map(trim).filter(|segment| !segment.is_empty()) {
        if let Some(clause) = segment.strip_prefix(FORWARD_PREFIX) {
            let clause = trim(clause);
            if clause.is_empty() {
                return Err(AtlasError::syntax("forward= clause names no member functions"));
            }
            spec.forwards.push(clause.to_string());
        } else {
            for token in split_top_level(segment, ',') {
                insert_token(&mut spec.operators, token);
            }
        }
    }
    Ok(spec)
}

/// Strips a leading `strong` keyword followed by whitespace.
fn strip_strong_keyword(text: &str) -> (bool, &str) {
    match text.strip_prefix(STRONG_KEYWORD) {
        Some(rest) if rest.starts_with(crate::text::is_space) => (true, trim(rest)),
        _ => (false, text),
    }
}

/// Inserts a feature token, expanding the `+*` and `-*` shorthands.
fn insert_token(operators: &mut BTreeSet<String>, token: String) {
    match token.as_str() {
        "+*" => {
            operators.insert("+".to_string());
            operators.insert("u+".to_string());
        }
        "-*" => {
            operators.insert("-".to_string());
            operators.insert("u-".to_string());
        }
        _ => {
            operators.insert(token);
        }
    }
}
