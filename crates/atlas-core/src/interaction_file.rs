// crates/atlas-core/src/interaction_file.rs
// ============================================================================
// Module: Interaction File Parser
// Description: Line-oriented parser for cross-type operator definitions.
// Purpose: Build an InteractionFile from directives and interaction lines.
// Dependencies: crate::{options, model, text, error, input}
// ============================================================================

//! ## Overview
//! An interaction file mixes directives, which update settings applied to
//! the interactions that follow them, and interaction lines:
//!
//! ```text
//! include <chrono>
//! namespace=physics
//! concept=std::floating_point Scalar
//! enable_if=std::is_floating_point<Scalar>::value
//!
//! Distance * Time <-> Velocity
//! Distance / Time -> Velocity
//! Distance * Scalar -> Distance
//! ```
//!
//! `->` declares `LHS OP RHS` yielding `RESULT`; `<->` also declares the
//! reversed operand order. Operands named after a declared constraint are
//! template parameters constrained by it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::AtlasError;
use crate::input::read_definition_file;
use crate::model::CppStandard;
use crate::options::GeneratorOptions;
use crate::options::GuardSettings;
use crate::options::resolve_standard;
use crate::text::is_identifier;
use crate::text::is_namespace;
use crate::text::parse_bool;
use crate::text::trim;

// ============================================================================
// SECTION: Model
// ============================================================================

/// Operator symbols in match priority order; longer symbols come first.
pub const INTERACTION_OPERATORS: [&str; 18] = [
    "<<", ">>", "==", "!=", "<=", ">=", "&&", "||", "+", "-", "*", "/", "%", "&", "|", "^", "<",
    ">",
];

/// Directive keys; a `key=` line is a directive even when its value holds `->`.
const DIRECTIVE_KEYS: [&str; 10] = [
    "namespace",
    "value_access",
    "lhs_value_access",
    "rhs_value_access",
    "guard_prefix",
    "guard_separator",
    "upcase_guard",
    "cpp_standard",
    "concept",
    "enable_if",
];

/// Template parameter constraint declared with `concept=` / `enable_if=`.
///
/// # Invariants
/// - After a successful parse at least one expression is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConstraint {
    /// Parameter name, also the operand spelling that refers to it.
    pub name: String,
    /// C++20 type-constraint (`std::floating_point`), used as `template <C Name>`.
    pub concept: Option<String>,
    /// Boolean expression for `std::enable_if`.
    pub enable_if: Option<String>,
    /// Line that declared the constraint.
    pub line: usize,
}

/// One operator between two types.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "Each flag is an independent property of the interaction line."
)]
pub struct Interaction {
    /// Operator symbol.
    pub op: String,
    /// Left operand type (or constraint name).
    pub lhs: String,
    /// Right operand type (or constraint name).
    pub rhs: String,
    /// Result type (or constraint name).
    pub result: String,
    /// Left operand is a constrained template parameter.
    pub lhs_is_template: bool,
    /// Right operand is a constrained template parameter.
    pub rhs_is_template: bool,
    /// Reversed operand order is declared too.
    pub symmetric: bool,
    /// The operator is `constexpr`.
    pub constexpr: bool,
    /// Namespace the operator is defined in (`""` for global).
    pub namespace: String,
    /// Value access for the left operand, when set explicitly.
    pub lhs_value_access: Option<String>,
    /// Value access for the right operand, when set explicitly.
    pub rhs_value_access: Option<String>,
    /// Value access applied when no side-specific one is set.
    pub value_access: Option<String>,
    /// Line that declared the interaction.
    pub line: usize,
}

impl Interaction {
    /// Value access used for a non-wrapper left operand.
    #[must_use]
    pub fn lhs_access(&self) -> Option<&str> {
        self.lhs_value_access.as_deref()
    }

    /// Value access used for a non-wrapper right operand.
    #[must_use]
    pub fn rhs_access(&self) -> Option<&str> {
        self.rhs_value_access.as_deref().or(self.value_access.as_deref())
    }
}

/// A parsed interaction file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionFile {
    /// `include` directives in declaration order.
    pub includes: Vec<String>,
    /// Constraints keyed by parameter name.
    pub constraints: BTreeMap<String, TypeConstraint>,
    /// Interactions in declaration order.
    pub interactions: Vec<Interaction>,
    /// Resolved include-guard settings.
    pub guard: GuardSettings,
    /// Resolved C++ standard.
    pub cpp_standard: CppStandard,
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Parses interaction-file `content`; `filename` is used in error locations.
///
/// # Errors
/// Returns [`AtlasError::Syntax`] for malformed lines or unknown
/// directives, [`AtlasError::UnknownReference`] for an operand naming a
/// constraint that was not declared before it, and
/// [`AtlasError::Invariant`] for a constraint without expressions, a result
/// naming a constraint no operand uses, or a file without interactions.
pub fn parse_interaction_file(
    content: &str,
    filename: &str,
    options: &GeneratorOptions,
) -> Result<InteractionFile, AtlasError> {
    let mut parser = InteractionParser::default();
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        parser.line(trim(raw), line).map_err(|err| err.at(filename, line))?;
    }
    let file = parser.finish(options, filename)?;
    debug!(
        file = filename,
        interactions = file.interactions.len(),
        constraints = file.constraints.len(),
        "parsed interaction file"
    );
    Ok(file)
}

/// Reads and parses the interaction file at `path`.
///
/// # Errors
/// Returns [`AtlasError::Io`] when the file cannot be read, and otherwise
/// whatever [`parse_interaction_file`] returns.
pub fn parse_interaction_file_path(
    path: &Path,
    options: &GeneratorOptions,
) -> Result<InteractionFile, AtlasError> {
    let content = read_definition_file(path)?;
    parse_interaction_file(&content, &path.display().to_string(), options)
}

// ============================================================================
// SECTION: Parser State
// ============================================================================

/// Mutable settings and accumulated results.
#[derive(Debug)]
struct InteractionParser {
    /// Includes in order.
    includes: Vec<String>,
    /// Declared constraints.
    constraints: BTreeMap<String, TypeConstraint>,
    /// Parameter named by the last `concept=` line, awaiting `enable_if=`.
    pending_param: Option<String>,
    /// Parsed interactions.
    interactions: Vec<Interaction>,
    /// Current namespace.
    namespace: String,
    /// Current default value access.
    value_access: Option<String>,
    /// Current left value access.
    lhs_value_access: Option<String>,
    /// Current right value access.
    rhs_value_access: Option<String>,
    /// Current constexpr flag.
    constexpr: bool,
    /// `guard_prefix=`.
    guard_prefix: Option<String>,
    /// `guard_separator=`.
    guard_separator: Option<String>,
    /// `upcase_guard=`.
    upcase_guard: Option<bool>,
    /// `cpp_standard=`.
    cpp_standard: Option<CppStandard>,
}

impl Default for InteractionParser {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            constraints: BTreeMap::new(),
            pending_param: None,
            interactions: Vec::new(),
            namespace: String::new(),
            value_access: None,
            lhs_value_access: None,
            rhs_value_access: None,
            constexpr: true,
            guard_prefix: None,
            guard_separator: None,
            upcase_guard: None,
            cpp_standard: None,
        }
    }
}

impl InteractionParser {
    /// Consumes one trimmed line.
    fn line(&mut self, line: &str, number: usize) -> Result<(), AtlasError> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        if let Some((key, value)) = line.split_once('=')
            && DIRECTIVE_KEYS.contains(&trim(key))
        {
            return self.directive(trim(key), trim(value), number);
        }
        if line.contains("->") {
            return self.interaction(line, number);
        }
        if let Some(rest) = line.strip_prefix("include") {
            let header = trim(rest);
            if rest.starts_with(char::is_whitespace) && is_include(header) {
                self.includes.push(header.to_string());
                return Ok(());
            }
            return Err(AtlasError::syntax(format!(
                "malformed include `{line}` (expected include <h> or include \"h\")"
            )));
        }
        match line {
            "constexpr" => {
                self.constexpr = true;
                return Ok(());
            }
            "no-constexpr" => {
                self.constexpr = false;
                return Ok(());
            }
            _ => {}
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(AtlasError::syntax(format!("unrecognized line `{line}`")));
        };
        self.directive(trim(key), trim(value), number)
    }

    /// Applies a `key=value` directive.
    fn directive(&mut self, key: &str, value: &str, number: usize) -> Result<(), AtlasError> {
        match key {
            "namespace" => {
                if !is_namespace(value) {
                    return Err(AtlasError::syntax(format!("invalid namespace `{value}`")));
                }
                self.namespace = value.to_string();
            }
            "value_access" => self.value_access = non_empty(value),
            "lhs_value_access" => self.lhs_value_access = non_empty(value),
            "rhs_value_access" => self.rhs_value_access = non_empty(value),
            "guard_prefix" => self.guard_prefix = Some(value.to_string()),
            "guard_separator" => self.guard_separator = Some(value.to_string()),
            "upcase_guard" => {
                self.upcase_guard = Some(parse_bool(value).ok_or_else(|| {
                    AtlasError::syntax(format!("`upcase_guard` expects a boolean, got `{value}`"))
                })?);
            }
            "cpp_standard" => {
                self.cpp_standard = Some(CppStandard::parse(value).ok_or_else(|| {
                    AtlasError::syntax(format!("invalid cpp_standard `{value}`"))
                })?);
            }
            "concept" => self.concept(value, number)?,
            "enable_if" => self.enable_if(value, number)?,
            _ => return Err(AtlasError::syntax(format!("unknown directive `{key}`"))),
        }
        Ok(())
    }

    /// `concept=<expr> <param>`; a bare `<param>` declares it without expression.
    fn concept(&mut self, value: &str, number: usize) -> Result<(), AtlasError> {
        let (expression, param) = match value.rsplit_once(char::is_whitespace) {
            Some((expression, param)) => (non_empty(trim(expression)), trim(param)),
            None => (None, value),
        };
        if !is_identifier(param) {
            return Err(AtlasError::syntax(format!("invalid constraint parameter `{param}`")));
        }
        let constraint = self.constraint_mut(param, number);
        if expression.is_some() {
            constraint.concept = expression;
        }
        self.pending_param = Some(param.to_string());
        Ok(())
    }

    /// `enable_if=<expr>` for the pending or the extracted parameter.
    fn enable_if(&mut self, value: &str, number: usize) -> Result<(), AtlasError> {
        if value.is_empty() {
            return Err(AtlasError::syntax("enable_if expression is empty"));
        }
        let param = match self.pending_param.take() {
            Some(param) => param,
            None => enable_if_parameter(value)?,
        };
        self.constraint_mut(&param, number).enable_if = Some(value.to_string());
        Ok(())
    }

    /// Returns the constraint named `name`, declaring it at `number` if new.
    fn constraint_mut(&mut self, name: &str, number: usize) -> &mut TypeConstraint {
        self.constraints.entry(name.to_string()).or_insert_with(|| TypeConstraint {
            name: name.to_string(),
            concept: None,
            enable_if: None,
            line: number,
        })
    }

    /// Parses `LHS OP RHS -> RESULT` or `LHS OP RHS <-> RESULT`.
    fn interaction(&mut self, line: &str, number: usize) -> Result<(), AtlasError> {
        let (left, result, symmetric) = if let Some((left, result)) = line.split_once("<->") {
            (left, result, true)
        } else if let Some((left, result)) = line.split_once("->") {
            (left, result, false)
        } else {
            return Err(AtlasError::syntax(format!("malformed interaction `{line}`")));
        };
        let result = trim(result);
        let (lhs, op, rhs) = split_operator(left).ok_or_else(|| {
            AtlasError::syntax(format!("no recognized operator in interaction `{line}`"))
        })?;
        if lhs.is_empty() || rhs.is_empty() || result.is_empty() {
            return Err(AtlasError::syntax(format!("malformed interaction `{line}`")));
        }
        self.interactions.push(Interaction {
            op: op.to_string(),
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
            result: result.to_string(),
            lhs_is_template: self.constraints.contains_key(lhs),
            rhs_is_template: self.constraints.contains_key(rhs),
            symmetric,
            constexpr: self.constexpr,
            namespace: self.namespace.clone(),
            lhs_value_access: self.lhs_value_access.clone(),
            rhs_value_access: self.rhs_value_access.clone(),
            value_access: self.value_access.clone(),
            line: number,
        });
        Ok(())
    }

    /// Checks cross-line rules and resolves file settings.
    fn finish(self, options: &GeneratorOptions, filename: &str) -> Result<InteractionFile, AtlasError> {
        for constraint in self.constraints.values() {
            if constraint.concept.is_none() && constraint.enable_if.is_none() {
                return Err(AtlasError::invariant(format!(
                    "constraint `{}` has neither a concept nor an enable_if expression",
                    constraint.name
                ))
                .at(filename, constraint.line));
            }
        }
        for interaction in &self.interactions {
            check_interaction(interaction, &self.constraints).map_err(|err| err.at(filename, interaction.line))?;
        }
        if self.interactions.is_empty() {
            return Err(AtlasError::invariant(format!("{filename} declares no interactions")));
        }
        let guard = GuardSettings::resolve(
            options,
            self.guard_prefix.as_deref(),
            self.guard_separator.as_deref(),
            self.upcase_guard,
        );
        Ok(InteractionFile {
            includes: self.includes,
            constraints: self.constraints,
            interactions: self.interactions,
            guard,
            cpp_standard: resolve_standard(options, self.cpp_standard),
        })
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Operand and result rules that need every constraint declared.
fn check_interaction(
    interaction: &Interaction,
    constraints: &BTreeMap<String, TypeConstraint>,
) -> Result<(), AtlasError> {
    for (operand, is_template) in [
        (&interaction.lhs, interaction.lhs_is_template),
        (&interaction.rhs, interaction.rhs_is_template),
    ] {
        if !is_template && constraints.contains_key(operand) {
            return Err(AtlasError::unknown_reference(format!(
                "operand `{operand}` names a constraint declared after this interaction"
            )));
        }
    }
    let result = &interaction.result;
    if constraints.contains_key(result)
        && !(interaction.lhs_is_template && &interaction.lhs == result)
        && !(interaction.rhs_is_template && &interaction.rhs == result)
    {
        return Err(AtlasError::invariant(format!(
            "result `{result}` names a constraint that no operand uses"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits `LHS OP RHS` at the first operator in priority order.
fn split_operator(text: &str) -> Option<(&str, &'static str, &str)> {
    INTERACTION_OPERATORS.iter().find_map(|op| {
        let needle = format!(" {op} ");
        text.find(&needle).map(|position| {
            (trim(&text[..position]), *op, trim(&text[position + needle.len()..]))
        })
    })
}

/// Extracts the first template argument of an enable-if expression.
fn enable_if_parameter(expression: &str) -> Result<String, AtlasError> {
    let missing = || {
        AtlasError::syntax(format!(
            "cannot find a template parameter in enable_if expression `{expression}`"
        ))
    };
    let (_, inner) = expression.split_once('<').ok_or_else(missing)?;
    let end = inner.find(['>', ',']).unwrap_or(inner.len());
    let param = trim(&inner[..end]);
    if is_identifier(param) { Ok(param.to_string()) } else { Err(missing()) }
}

/// True for `<h>` and `"h"`.
fn is_include(header: &str) -> bool {
    let quoted = |open: char, close: char| {
        header.len() > 2 && header.starts_with(open) && header.ends_with(close)
    };
    quoted('<', '>') || quoted('"', '"')
}

/// Returns `Some(value)` unless it is empty.
fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_string()) }
}
