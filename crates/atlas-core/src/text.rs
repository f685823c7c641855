// crates/atlas-core/src/text.rs
// ============================================================================
// Module: Atlas Text Utilities
// Description: Trimming, splitting, and identifier validation helpers.
// Purpose: Share one definition of whitespace and name rules across parsers.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Small, allocation-light helpers shared by the description parser, the
//! file parsers, and the classifier. Whitespace is exactly space, tab, CR and
//! LF; other Unicode whitespace is treated as content.

// ============================================================================
// SECTION: Whitespace
// ============================================================================

/// Returns true for the whitespace characters the input formats recognize.
#[must_use]
pub const fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Trims spaces, tabs, CR and LF from both ends.
#[must_use]
pub fn trim(text: &str) -> &str {
    text.trim_matches(is_space)
}

// ============================================================================
// SECTION: Splitting
// ============================================================================

/// Splits on `,`, trimming elements and dropping empty ones.
#[must_use]
pub fn split_comma(text: &str) -> Vec<String> {
    split_trimmed(text, ',')
}

/// Splits on `;`, trimming elements and dropping empty ones.
#[must_use]
pub fn split_semicolon(text: &str) -> Vec<String> {
    split_trimmed(text, ';')
}

/// Splits on `separator`, trimming elements and dropping empty ones.
fn split_trimmed(text: &str, separator: char) -> Vec<String> {
    text.split(separator).map(trim).filter(|part| !part.is_empty()).map(str::to_string).collect()
}

/// Splits on `separator` only where it is not nested in `<>`, `()` or `[]`.
///
/// Feature lists use this so `bounded<0,100>` and `cast<std::pair<int,int>>`
/// survive as single tokens. A `<` only opens a bracket when it directly
/// follows a name character, so operator tokens such as `<<` and `<=>` do
/// not. Elements are trimmed; empty ones are dropped.
#[must_use]
pub fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut current = String::new();
    let mut previous: Option<char> = None;
    for ch in text.chars() {
        match ch {
            '<' if previous.is_some_and(|prev| prev.is_ascii_alphanumeric() || prev == '_') => {
                depth += 1;
            }
            '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if ch == separator && depth == 0 {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
        previous = Some(ch);
    }
    parts.push(current);
    parts.iter().map(|part| trim(part)).filter(|part| !part.is_empty()).map(str::to_string).collect()
}

// ============================================================================
// SECTION: Validators
// ============================================================================

/// Returns true when `text` is a C++-style identifier.
///
/// The first character must be an ASCII letter or underscore; the rest must
/// be ASCII letters, digits or underscores.
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

/// Returns true when `text` is a `::`-separated namespace path.
///
/// The empty string denotes the global namespace and is valid.
#[must_use]
pub fn is_namespace(text: &str) -> bool {
    text.is_empty() || text.split("::").all(is_identifier)
}

/// Returns true when `text` is a valid profile name (`[A-Za-z0-9_-]+`).
#[must_use]
pub fn is_profile_name(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

/// Parses the boolean spellings accepted by the input formats.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no`, ignoring ASCII case.
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    match trim(text).to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Upper-cases `text` and replaces every non-identifier character with `_`.
///
/// Used for macro names derived from user text.
#[must_use]
pub fn macro_case(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_uppercase() } else { '_' })
        .collect()
}
