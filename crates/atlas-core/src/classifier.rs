// crates/atlas-core/src/classifier.rs
// ============================================================================
// Module: Operator/Feature Classifier
// Description: Maps feature tokens to their semantic effect on the model.
// Purpose: Build an immutable ClassInfo from an expanded description.
// Dependencies: crate::{description, model, options, diagnostics, text, error}
// ============================================================================

//! ## Overview
//! The classifier is the only place that knows what a token means. It walks
//! the (already profile-expanded) token set in sorted order, applies each
//! token to a fresh [`ClassInfo`], then enforces the cross-token rules:
//! spaceship vs relational operators, constraint-driven default
//! construction, the effective C++ standard, and header auto-detection.
//!
//! Unknown tokens fail with [`AtlasError::UnknownToken`]; questionable but
//! valid combinations produce [`Warning`]s.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use tracing::debug;

use crate::description::ParsedSpecification;
use crate::description::brace_reference;
use crate::diagnostics::Warning;
use crate::diagnostics::WarningCode;
use crate::error::AtlasError;
use crate::model::ArithmeticMode;
use crate::model::BinaryOperator;
use crate::model::Bounds;
use crate::model::ClassInfo;
use crate::model::Constraint;
use crate::model::ConstraintKind;
use crate::model::CppStandard;
use crate::model::ForwardedMemfn;
use crate::model::IncrementOperator;
use crate::model::LogicalOperator;
use crate::model::RefQualifiers;
use crate::model::RelationalOperator;
use crate::model::UnaryOperator;
use crate::model::constexpr_for;
use crate::options::TypeDescription;
use crate::text::is_identifier;
use crate::text::is_namespace;
use crate::text::split_comma;
use crate::text::split_top_level;
use crate::text::trim;

// ============================================================================
// SECTION: Header Recognition
// ============================================================================

/// Substrings of the wrapped type that imply a standard header.
///
/// Matching is plain substring search.
const HEADER_RECOGNITION: &[(&str, &str)] = &[
    ("std::array", "<array>"),
    ("std::atomic", "<atomic>"),
    ("std::bitset", "<bitset>"),
    ("std::byte", "<cstddef>"),
    ("std::chrono::", "<chrono>"),
    ("std::complex", "<complex>"),
    ("std::deque", "<deque>"),
    ("std::filesystem::", "<filesystem>"),
    ("std::function", "<functional>"),
    ("std::list", "<list>"),
    ("std::map", "<map>"),
    ("std::multimap", "<map>"),
    ("std::multiset", "<set>"),
    ("std::optional", "<optional>"),
    ("std::pair", "<utility>"),
    ("std::set", "<set>"),
    ("std::shared_ptr", "<memory>"),
    ("std::span", "<span>"),
    ("std::string", "<string>"),
    ("std::string_view", "<string_view>"),
    ("std::tuple", "<tuple>"),
    ("std::unique_ptr", "<memory>"),
    ("std::unordered_map", "<unordered_map>"),
    ("std::unordered_set", "<unordered_set>"),
    ("std::variant", "<variant>"),
    ("std::vector", "<vector>"),
    ("std::weak_ptr", "<memory>"),
    ("int8_t", "<cstdint>"),
    ("int16_t", "<cstdint>"),
    ("int32_t", "<cstdint>"),
    ("int64_t", "<cstdint>"),
    ("intmax_t", "<cstdint>"),
    ("intptr_t", "<cstdint>"),
    ("ptrdiff_t", "<cstddef>"),
    ("size_t", "<cstddef>"),
];

/// Header providing `std::formatter`.
const FORMAT_HEADER: &str = "<format>";
/// Feature test guarding [`FORMAT_HEADER`] and the formatter specialization.
pub const FORMAT_FEATURE_TEST: &str = "defined(__cpp_lib_format) && __cpp_lib_format >= 201907L";

/// Returns the headers implied by the wrapped type text.
#[must_use]
pub fn recognized_headers(underlying_type: &str) -> BTreeSet<String> {
    HEADER_RECOGNITION
        .iter()
        .filter(|(needle, _)| underlying_type.contains(needle))
        .map(|(_, header)| (*header).to_string())
        .collect()
}

// ============================================================================
// SECTION: Classification Result
// ============================================================================

/// A classified wrapper and the warnings raised while classifying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The resolved model.
    pub info: ClassInfo,
    /// Non-fatal diagnostics.
    pub warnings: Vec<Warning>,
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies an expanded description into a [`ClassInfo`].
///
/// `target` supplies identity, default value, constants and extra forwards;
/// its `description` field is ignored in favour of `spec`. `standard` is
/// the resolved caller/file level; `c++NN` tokens and `<=>` may raise it.
///
/// # Errors
/// - [`AtlasError::Syntax`] for invalid names or malformed tokens.
/// - [`AtlasError::UnknownToken`] for tokens with no semantic effect.
/// - [`AtlasError::UnknownReference`] for unexpanded `{NAME}` tokens.
/// - [`AtlasError::Conflict`] for duplicate constants, forwards, or
///   constraints.
pub fn classify(
    spec: &ParsedSpecification,
    target: &TypeDescription,
    standard: CppStandard,
) -> Result<Classification, AtlasError> {
    validate_identity(target)?;
    let mut info = ClassInfo::new(
        target.kind,
        &target.namespace,
        &target.name,
        &spec.first_part,
        standard,
    );
    info.description = spec.normalize();

    let mut state = TokenState::default();
    for token in &spec.operators {
        apply_token(&mut info, &mut state, token)?;
    }
    let mut warnings = Vec::new();
    if state.modes.len() > 1 {
        let modes: Vec<&str> = state.modes.iter().map(|mode| mode.as_str()).collect();
        warnings.push(Warning::new(
            WarningCode::RedundantOperator,
            format!(
                "{}: several arithmetic modes requested ({}); using `{}`",
                info.full_qualified_name,
                modes.join(", "),
                info.arithmetic_mode.as_str()
            ),
        ));
    }

    resolve_comparisons(&mut info, &mut warnings);
    resolve_standard(&mut info, &state);
    resolve_constexpr(&mut info, &state, &mut warnings);
    resolve_defaults(&mut info, target)?;
    resolve_constants(&mut info, target)?;
    resolve_forwards(&mut info, spec, target)?;
    info.includes.extend(recognized_headers(&info.underlying_type));
    if info.formatter_specialization {
        info.includes.insert(FORMAT_HEADER.to_string());
        info.include_guards.insert(FORMAT_HEADER.to_string(), FORMAT_FEATURE_TEST.to_string());
    }

    if !info.logical.is_empty() {
        warnings.push(Warning::new(
            WarningCode::LogicalOperatorOverload,
            format!(
                "{}: overloading && or || disables short-circuit evaluation",
                info.full_qualified_name
            ),
        ));
    }
    if info.arithmetic_mode != ArithmeticMode::Default
        && info.arithmetic_binary.iter().all(|op| op.is_bitwise())
    {
        warnings.push(Warning::new(
            WarningCode::UnusedArithmeticMode,
            format!(
                "{}: `{}` has no effect without arithmetic operators",
                info.full_qualified_name,
                info.arithmetic_mode.as_str()
            ),
        ));
    }

    debug!(
        class = info.full_qualified_name.as_str(),
        tokens = spec.operators.len(),
        forwards = info.forwards.len(),
        standard = info.cpp_standard.year(),
        "classified strong type"
    );
    Ok(Classification {
        info,
        warnings,
    })
}

/// Validates namespace and class name.
fn validate_identity(target: &TypeDescription) -> Result<(), AtlasError> {
    if !is_identifier(&target.name) {
        return Err(AtlasError::syntax(format!("invalid type name `{}`", target.name)));
    }
    if !is_namespace(&target.namespace) {
        return Err(AtlasError::syntax(format!("invalid namespace `{}`", target.namespace)));
    }
    Ok(())
}

// ============================================================================
// SECTION: Token Application
// ============================================================================

/// Facts collected while walking tokens that are resolved afterwards.
#[derive(Debug, Default)]
struct TokenState {
    /// Every arithmetic mode token seen.
    modes: BTreeSet<ArithmeticMode>,
    /// `no-constexpr` was present.
    no_constexpr: bool,
    /// `no-constexpr-hash` was present.
    no_constexpr_hash: bool,
    /// Highest `c++NN` token.
    requested_standard: Option<CppStandard>,
}

/// Applies one token to the model.
#[allow(
    clippy::too_many_lines,
    reason = "One flat match keeps the token table readable in one place."
)]
fn apply_token(info: &mut ClassInfo, state: &mut TokenState, token: &str) -> Result<(), AtlasError> {
    if let Some(op) = BinaryOperator::from_symbol(token) {
        info.arithmetic_binary.insert(op);
        return Ok(());
    }
    if let Some(op) = RelationalOperator::from_symbol(token) {
        info.relational.insert(op);
        return Ok(());
    }
    match token {
        "u+" => {
            info.unary.insert(UnaryOperator::Plus);
        }
        "u-" => {
            info.unary.insert(UnaryOperator::Minus);
        }
        "u~" | "~" => {
            info.unary.insert(UnaryOperator::Complement);
        }
        "+*" => {
            info.arithmetic_binary.insert(BinaryOperator::Add);
            info.unary.insert(UnaryOperator::Plus);
        }
        "-*" => {
            info.arithmetic_binary.insert(BinaryOperator::Sub);
            info.unary.insert(UnaryOperator::Minus);
        }
        "<=>" => info.spaceship = true,
        "++" => {
            info.increment.insert(IncrementOperator::Increment);
        }
        "--" => {
            info.increment.insert(IncrementOperator::Decrement);
        }
        "@" => info.indirection = true,
        "&of" => info.address_of = true,
        "->" => info.arrow = true,
        "!" | "not" => info.logical_not = true,
        "and" | "&&" => {
            info.logical.insert(LogicalOperator::And);
        }
        "or" | "||" => {
            info.logical.insert(LogicalOperator::Or);
        }
        "bool" => info.bool_conversion = true,
        "()" => info.nullary_call = true,
        "(&)" => info.callable = true,
        "[]" => info.subscript = true,
        "in" => info.istream = true,
        "out" => info.ostream = true,
        "hash" => info.hash_specialization = true,
        "iterable" => info.iterator_support = true,
        "fmt" => info.formatter_specialization = true,
        "assign" => info.template_assignment = true,
        "checked" => set_mode(info, state, ArithmeticMode::Checked),
        "saturating" => set_mode(info, state, ArithmeticMode::Saturating),
        "wrapping" => set_mode(info, state, ArithmeticMode::Wrapping),
        "no-constexpr" => state.no_constexpr = true,
        "no-constexpr-hash" => state.no_constexpr_hash = true,
        "positive" => set_constraint(info, ConstraintKind::Positive, None)?,
        "non_negative" => set_constraint(info, ConstraintKind::NonNegative, None)?,
        "non_zero" => set_constraint(info, ConstraintKind::NonZero, None)?,
        "non_empty" => set_constraint(info, ConstraintKind::NonEmpty, None)?,
        "non_null" => set_constraint(info, ConstraintKind::NonNull, None)?,
        _ => apply_parameterized_token(info, state, token)?,
    }
    Ok(())
}

/// Applies tokens that carry an argument (`cast<T>`, `bounded<A,B>`, ...).
fn apply_parameterized_token(
    info: &mut ClassInfo,
    state: &mut TokenState,
    token: &str,
) -> Result<(), AtlasError> {
    if let Some(name) = brace_reference(token) {
        return Err(AtlasError::unknown_reference(format!(
            "profile reference `{{{name}}}` was not expanded"
        )));
    }
    if let Some(header) = token.strip_prefix('#') {
        let header = trim(header);
        let well_formed = (header.starts_with('<') && header.ends_with('>'))
            || (header.len() >= 2 && header.starts_with('"') && header.ends_with('"'));
        if !well_formed || header.len() <= 2 {
            return Err(AtlasError::syntax(format!(
                "malformed include token `{token}` (expected #<header> or #\"header\")"
            )));
        }
        info.includes.insert(header.to_string());
        return Ok(());
    }
    if let Some(year) = token.strip_prefix("c++") {
        let standard = year.parse::<u16>().ok().and_then(CppStandard::from_year).ok_or_else(
            || AtlasError::unknown_token(format!("unsupported C++ standard token `{token}`")),
        )?;
        state.requested_standard = state.requested_standard.max(Some(standard));
        return Ok(());
    }
    if let Some(argument) = angle_argument(token, "bounded_range")? {
        let bounds = parse_bounds(token, argument)?;
        return set_constraint(info, ConstraintKind::BoundedRange, Some(bounds));
    }
    if let Some(argument) = angle_argument(token, "bounded")? {
        let bounds = parse_bounds(token, argument)?;
        return set_constraint(info, ConstraintKind::Bounded, Some(bounds));
    }
    if let Some(target) = angle_argument(token, "implicit_cast")? {
        info.implicit_casts.insert(target.to_string());
        return Ok(());
    }
    if let Some(target) = angle_argument(token, "explicit_cast")? {
        info.explicit_casts.insert(target.to_string());
        return Ok(());
    }
    if let Some(target) = angle_argument(token, "cast")? {
        info.explicit_casts.insert(target.to_string());
        return Ok(());
    }
    Err(AtlasError::unknown_token(format!(
        "`{token}` is not a recognized operator or feature for {}",
        info.full_qualified_name
    )))
}

/// Returns the text between `keyword<` and the final `>`.
///
/// Returns `Ok(None)` when the token does not start with `keyword<`.
fn angle_argument<'a>(token: &'a str, keyword: &str) -> Result<Option<&'a str>, AtlasError> {
    let Some(rest) = token.strip_prefix(keyword).and_then(|rest| rest.strip_prefix('<')) else {
        return Ok(None);
    };
    let argument = rest
        .strip_suffix('>')
        .map(trim)
        .filter(|argument| !argument.is_empty())
        .ok_or_else(|| AtlasError::syntax(format!("malformed `{keyword}<...>` token `{token}`")))?;
    Ok(Some(argument))
}

/// Splits `A,B` into bounds.
fn parse_bounds(token: &str, argument: &str) -> Result<Bounds, AtlasError> {
    let parts = split_top_level(argument, ',');
    match parts.as_slice() {
        [min, max] => Ok(Bounds {
            min: min.clone(),
            max: max.clone(),
        }),
        _ => Err(AtlasError::syntax(format!(
            "`{token}` must name exactly two bounds separated by a comma"
        ))),
    }
}

/// Records an arithmetic mode; the last one in token order wins.
fn set_mode(info: &mut ClassInfo, state: &mut TokenState, mode: ArithmeticMode) {
    state.modes.insert(mode);
    info.arithmetic_mode = mode;
}

/// Records the constraint, rejecting a second one.
fn set_constraint(
    info: &mut ClassInfo,
    kind: ConstraintKind,
    bounds: Option<Bounds>,
) -> Result<(), AtlasError> {
    if info.constraint.is_active() {
        return Err(AtlasError::conflict(format!(
            "{}: constraints `{}` and `{}` cannot be combined",
            info.full_qualified_name,
            info.constraint.kind.as_str(),
            kind.as_str()
        )));
    }
    let message = constraint_message(&info.full_qualified_name, kind, bounds.as_ref());
    info.constraint = Constraint {
        kind,
        bounds,
        message,
    };
    Ok(())
}

/// Builds the diagnostic thrown on constraint violation.
fn constraint_message(class_name: &str, kind: ConstraintKind, bounds: Option<&Bounds>) -> String {
    let requirement = match (kind, bounds) {
        (ConstraintKind::Positive, _) => "value must be positive (> 0)".to_string(),
        (ConstraintKind::NonNegative, _) => "value must be non-negative (>= 0)".to_string(),
        (ConstraintKind::NonZero, _) => "value must be non-zero".to_string(),
        (ConstraintKind::NonEmpty, _) => "value must not be empty".to_string(),
        (ConstraintKind::NonNull, _) => "value must not be null".to_string(),
        (ConstraintKind::Bounded, Some(bounds)) => {
            format!("value must be in [{}, {}]", bounds.min, bounds.max)
        }
        (ConstraintKind::BoundedRange, Some(bounds)) => {
            format!("value must be in [{}, {})", bounds.min, bounds.max)
        }
        (ConstraintKind::Bounded | ConstraintKind::BoundedRange | ConstraintKind::None, _) => {
            return String::new();
        }
    };
    format!("{class_name}: {requirement}")
}

// ============================================================================
// SECTION: Cross-Token Rules
// ============================================================================

/// Applies the spaceship/relational exclusivity rules.
fn resolve_comparisons(info: &mut ClassInfo, warnings: &mut Vec<Warning>) {
    if !info.spaceship {
        return;
    }
    let ordering: Vec<&str> = info
        .relational
        .iter()
        .filter(|op| !op.is_equality())
        .map(|op| op.symbol())
        .collect();
    if !ordering.is_empty() {
        warnings.push(Warning::new(
            WarningCode::RedundantOperator,
            format!(
                "{}: `<=>` already provides {}; the explicit operators are ignored",
                info.full_qualified_name,
                ordering.join(", ")
            ),
        ));
    }
    info.relational.clear();
    info.defaulted_equality = true;
}

/// Applies `c++NN` tokens and the language floor implied by features.
fn resolve_standard(info: &mut ClassInfo, state: &TokenState) {
    let mut standard = info.cpp_standard.max(state.requested_standard.unwrap_or_default());
    if info.spaceship {
        standard = standard.max(CppStandard::Cpp20);
    }
    info.cpp_standard = standard;
}

/// Applies `no-constexpr` and `no-constexpr-hash`.
fn resolve_constexpr(info: &mut ClassInfo, state: &TokenState, warnings: &mut Vec<Warning>) {
    let qualifier = if state.no_constexpr { "" } else { constexpr_for(info.cpp_standard) };
    info.constexpr_qualifier = qualifier;
    info.hash_constexpr_qualifier = if state.no_constexpr_hash { "" } else { qualifier };
    if state.no_constexpr_hash && !info.hash_specialization {
        warnings.push(Warning::new(
            WarningCode::UnusedHashModifier,
            format!("{}: `no-constexpr-hash` has no effect without `hash`", info.full_qualified_name),
        ));
    }
}

/// Resolves the default constructor from the constraint and default value.
fn resolve_defaults(info: &mut ClassInfo, target: &TypeDescription) -> Result<(), AtlasError> {
    if let Some(value) = &target.default_value {
        let value = trim(value);
        if value.is_empty() {
            return Err(AtlasError::syntax(format!(
                "{}: default_value must not be empty",
                info.full_qualified_name
            )));
        }
        info.default_value = Some(value.to_string());
    }
    info.delete_default_constructor = info.constraint.kind.forbids_default()
        || (info.constraint.is_active() && info.default_value.is_none());
    Ok(())
}

/// Copies constants, rejecting duplicates.
fn resolve_constants(info: &mut ClassInfo, target: &TypeDescription) -> Result<(), AtlasError> {
    for (name, value) in &target.constants {
        if !is_identifier(name) {
            return Err(AtlasError::syntax(format!("invalid constant name `{name}`")));
        }
        if info.constants.insert(name.clone(), value.clone()).is_some() {
            return Err(AtlasError::conflict(format!(
                "{}: constant `{name}` is defined twice",
                info.full_qualified_name
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Forwarded Member Functions
// ============================================================================

/// Parses description and extra forward clauses in order.
fn resolve_forwards(
    info: &mut ClassInfo,
    spec: &ParsedSpecification,
    target: &TypeDescription,
) -> Result<(), AtlasError> {
    let mut exposed = BTreeSet::new();
    for clause in spec.forwards.iter().chain(target.forwards.iter()) {
        for memfn in parse_forward_clause(clause, info.cpp_standard)? {
            if !exposed.insert(memfn.exposed_name().to_string()) {
                return Err(AtlasError::conflict(format!(
                    "{}: member function `{}` is forwarded twice",
                    info.full_qualified_name,
                    memfn.exposed_name()
                )));
            }
            info.forwards.push(memfn);
        }
    }
    Ok(())
}

/// Parses `[const, ]memfn[:alias][->Wrap][, ...]`.
///
/// # Errors
/// Returns [`AtlasError::Syntax`] for empty clauses and invalid names.
pub fn parse_forward_clause(
    clause: &str,
    standard: CppStandard,
) -> Result<Vec<ForwardedMemfn>, AtlasError> {
    let mut entries = split_comma(clause);
    let const_only = entries.first().is_some_and(|first| first == "const");
    if const_only {
        entries.remove(0);
    }
    if entries.is_empty() {
        return Err(AtlasError::syntax(format!("forward clause `{clause}` names no member functions")));
    }
    let qualifiers = qualifiers_for(const_only, standard);
    entries
        .iter()
        .map(|entry| {
            let (head, return_type) = match entry.split_once("->") {
                Some((head, wrap)) => {
                    let wrap = trim(wrap);
                    if wrap.is_empty() {
                        return Err(AtlasError::syntax(format!(
                            "forward `{entry}` has an empty return type"
                        )));
                    }
                    (trim(head), Some(wrap.to_string()))
                }
                None => (entry.as_str(), None),
            };
            let (name, alias) = match head.split_once(':') {
                Some((name, alias)) => (trim(name), Some(trim(alias))),
                None => (head, None),
            };
            if !is_identifier(name) {
                return Err(AtlasError::syntax(format!("invalid forwarded member function `{name}`")));
            }
            if let Some(alias) = alias
                && !is_identifier(alias)
            {
                return Err(AtlasError::syntax(format!("invalid forward alias `{alias}`")));
            }
            Ok(ForwardedMemfn {
                name: name.to_string(),
                alias: alias.map(str::to_string),
                return_type,
                const_only,
                qualifiers,
            })
        })
        .collect()
}

/// Chooses the overload set for a forwarded member function.
///
/// Const-only forwards get a single `const` overload at every level.
const fn qualifiers_for(const_only: bool, standard: CppStandard) -> RefQualifiers {
    if const_only {
        return RefQualifiers {
            const_no_ref: true,
            const_lvalue: false,
            const_rvalue: false,
            nonconst_lvalue: false,
            nonconst_rvalue: false,
            deducing_this: false,
        };
    }
    if matches!(standard, CppStandard::Cpp23) {
        return RefQualifiers {
            const_no_ref: false,
            const_lvalue: false,
            const_rvalue: false,
            nonconst_lvalue: false,
            nonconst_rvalue: false,
            deducing_this: true,
        };
    }
    RefQualifiers {
        const_no_ref: false,
        const_lvalue: true,
        const_rvalue: true,
        nonconst_lvalue: true,
        nonconst_rvalue: true,
        deducing_this: false,
    }
}

#[cfg(test)]
mod tests;
