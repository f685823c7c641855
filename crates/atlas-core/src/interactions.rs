// crates/atlas-core/src/interactions.rs
// ============================================================================
// Module: Interaction Generator
// Description: Renders free operators between distinct strong types.
// Purpose: Turn an InteractionFile into a self-contained header.
// Dependencies: crate::{interaction_file, assembler, preamble, model}
// ============================================================================

//! ## Overview
//! An interaction header carries, in order:
//! 1. the value-access preamble (`atlas::value`);
//! 2. `atlas_value` overloads for plain operand types with a custom value
//!    access, found through `atlas::value_tag`;
//! 3. `atlas::compound_<name>` helpers for every arithmetic symbol in use;
//! 4. the free operators, grouped by namespace in order of first use.
//!
//! Operators unwrap both operands with `atlas::value` and construct the
//! result type from the combined values. `OP=` operators delegate to the
//! matching `atlas::compound_<name>` helper.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::debug;

use crate::assembler::GeneratedHeader;
use crate::assembler::IncludeLine;
use crate::assembler::frame_header;
use crate::diagnostics::Warning;
use crate::diagnostics::WarningCode;
use crate::hashing::sha1_hex;
use crate::interaction_file::Interaction;
use crate::interaction_file::InteractionFile;
use crate::interaction_file::TypeConstraint;
use crate::model::BinaryOperator;
use crate::model::CppStandard;
use crate::model::constexpr_for;
use crate::preamble::preamble;
use crate::preamble::preamble_includes;

/// Feature test selecting constrained templates over `enable_if`.
const CONCEPTS_FEATURE_TEST: &str = "defined(__cpp_concepts) && __cpp_concepts >= 201907L";

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Renders the header for a parsed interaction file.
#[must_use]
pub fn render_interactions(file: &InteractionFile) -> GeneratedHeader {
    let mut warnings = Vec::new();
    let mut body = String::new();
    body.push_str(&value_overloads(&file.interactions, &mut warnings));
    body.push_str(&compound_helpers(&file.interactions));
    for (namespace, interactions) in group_by_namespace(&file.interactions) {
        body.push_str(&render_namespace(file, namespace, &interactions));
    }

    let guard = file.guard.guard_for(&sha1_hex(body.as_bytes()));
    let fragments = BTreeSet::new();
    let mut includes: Vec<IncludeLine> = Vec::new();
    let mut seen = BTreeSet::new();
    for header in file.includes.iter().cloned().chain(preamble_includes(&fragments)) {
        if seen.insert(header.clone()) {
            includes.push(IncludeLine {
                header,
                condition: None,
            });
        }
    }
    let mut content = preamble(&fragments);
    content.push_str(&body);
    let text = frame_header(&guard, file.cpp_standard, &includes, &content);
    debug!(guard = %guard, interactions = file.interactions.len(), "rendered interactions");
    GeneratedHeader {
        text,
        guard,
        warnings,
    }
}

// ============================================================================
// SECTION: Value Access Overloads
// ============================================================================

/// A custom value access collected for one plain operand type.
struct ValueAccess {
    /// Access expression as written.
    access: String,
    /// True while every interaction using the type is constexpr.
    constexpr: bool,
}

/// Renders `atlas_value` overloads for operand types with custom access.
fn value_overloads(interactions: &[Interaction], warnings: &mut Vec<Warning>) -> String {
    let mut accesses: BTreeMap<String, ValueAccess> = BTreeMap::new();
    for interaction in interactions {
        let sides = [
            (&interaction.lhs, interaction.lhs_is_template, interaction.lhs_access()),
            (&interaction.rhs, interaction.rhs_is_template, interaction.rhs_access()),
        ];
        for (operand, is_template, access) in sides {
            let Some(access) = access else { continue };
            if is_template {
                continue;
            }
            match accesses.get_mut(operand) {
                Some(existing) => {
                    existing.constexpr &= interaction.constexpr;
                    if existing.access != access {
                        warnings.push(Warning::new(
                            WarningCode::DuplicateValueAccess,
                            format!(
                                "`{operand}` already uses value access `{}`; ignoring `{access}` on line {}",
                                existing.access, interaction.line
                            ),
                        ));
                    }
                }
                None => {
                    accesses.insert(
                        operand.clone(),
                        ValueAccess {
                            access: access.to_string(),
                            constexpr: interaction.constexpr,
                        },
                    );
                }
            }
        }
    }
    if accesses.is_empty() {
        return String::new();
    }
    let mut out = String::from("namespace atlas {\n");
    for (operand, value) in &accesses {
        let qualifier = if value.constexpr { "constexpr" } else { "inline" };
        let expression = access_expression(&value.access, "v");
        out.push_str(&format!(
            "{qualifier} auto\natlas_value({operand} const & v, value_tag)\n-> decltype({expression})\n{{\n    return {expression};\n}}\n\n"
        ));
    }
    out.push_str("} // namespace atlas\n\n");
    out
}

/// Applies a value access to `operand`: `.m`, `->m` and their `()` forms call
/// a member, anything else is a function.
fn access_expression(access: &str, operand: &str) -> String {
    if access.starts_with('.') || access.starts_with("->") {
        let call = if access.ends_with(')') { String::new() } else { "()".to_string() };
        format!("{operand}{access}{call}")
    } else {
        format!("{access}({operand})")
    }
}

// ============================================================================
// SECTION: Compound Assignment Helpers
// ============================================================================

/// Renders one `atlas::compound_<name>` helper per arithmetic symbol in use.
fn compound_helpers(interactions: &[Interaction]) -> String {
    let used: BTreeSet<BinaryOperator> =
        interactions.iter().filter_map(|interaction| BinaryOperator::from_symbol(&interaction.op)).collect();
    if used.is_empty() {
        return String::new();
    }
    let mut out = String::from(
        "namespace atlas {\nnamespace atlas_detail {\ntemplate <typename T>\nusing compound_value_t = typename std::decay<decltype(atlas::value(std::declval<T const &>()))>::type;\n} // namespace atlas_detail\n\n",
    );
    for op in used {
        out.push_str(&compound_helper(op));
    }
    out.push_str("} // namespace atlas\n\n");
    out
}

/// Renders the detection trait and both helper overloads for `op`.
///
/// The trait checks `OP=` on the underlying values and that `L` can be
/// rebuilt from the result; otherwise the helper falls back to the binary
/// interaction operator plus assignment.
fn compound_helper(op: BinaryOperator) -> String {
    let name = op.name();
    let symbol = op.symbol();
    let compound = op.compound_symbol();
    format!(
        "namespace atlas_detail {{
template <typename L, typename R, typename = void>
struct has_compound_{name}
: std::false_type
{{
}};

template <typename L, typename R>
struct has_compound_{name}<
    L,
    R,
    decltype(
        void(std::declval<compound_value_t<L> &>() {compound} atlas::value(std::declval<R const &>())),
        void(L(std::declval<compound_value_t<L>>())))>
: std::true_type
{{
}};
}} // namespace atlas_detail

template <typename L, typename R>
ATLAS_CONSTEXPR14 auto
compound_{name}(L & lhs, R const & rhs)
-> typename std::enable_if<atlas_detail::has_compound_{name}<L, R>::value, L &>::type
{{
    atlas_detail::compound_value_t<L> result = atlas::value(lhs);
    result {compound} atlas::value(rhs);
    lhs = L(result);
    return lhs;
}}

template <typename L, typename R>
ATLAS_CONSTEXPR14 auto
compound_{name}(L & lhs, R const & rhs)
-> typename std::enable_if<!atlas_detail::has_compound_{name}<L, R>::value, L &>::type
{{
    lhs = L(lhs {symbol} rhs);
    return lhs;
}}

"
    )
}

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Groups interactions by namespace, namespaces in order of first use.
fn group_by_namespace(interactions: &[Interaction]) -> Vec<(&str, Vec<&Interaction>)> {
    let mut groups: Vec<(&str, Vec<&Interaction>)> = Vec::new();
    for interaction in interactions {
        let namespace = interaction.namespace.as_str();
        match groups.iter_mut().find(|(name, _)| *name == namespace) {
            Some((_, members)) => members.push(interaction),
            None => groups.push((namespace, vec![interaction])),
        }
    }
    groups
}

/// Renders every operator of one namespace.
fn render_namespace(file: &InteractionFile, namespace: &str, interactions: &[&Interaction]) -> String {
    let mut out = String::new();
    if !namespace.is_empty() {
        out.push_str(&format!("namespace {} {{\n", open_namespace_path(namespace, file.cpp_standard)));
    }
    for interaction in interactions {
        let forward = Operands::forward(interaction);
        out.push_str(&render_operator(file, interaction, &forward));
        out.push_str(&render_compound_operator(file, interaction, &forward));
        if interaction.symmetric && interaction.lhs != interaction.rhs {
            let reversed = Operands::reversed(interaction);
            out.push_str(&render_operator(file, interaction, &reversed));
            out.push_str(&render_compound_operator(file, interaction, &reversed));
        }
    }
    if !namespace.is_empty() {
        out.push_str(&close_namespace_path(namespace, file.cpp_standard));
        out.push('\n');
    }
    out
}

/// Operand order of one rendered overload.
struct Operands<'a> {
    /// Left operand type.
    lhs: &'a str,
    /// Left operand is a template parameter.
    lhs_is_template: bool,
    /// Right operand type.
    rhs: &'a str,
    /// Right operand is a template parameter.
    rhs_is_template: bool,
}

impl<'a> Operands<'a> {
    /// Operands in declaration order.
    fn forward(interaction: &'a Interaction) -> Self {
        Self {
            lhs: &interaction.lhs,
            lhs_is_template: interaction.lhs_is_template,
            rhs: &interaction.rhs,
            rhs_is_template: interaction.rhs_is_template,
        }
    }

    /// Operands swapped for the symmetric overload.
    fn reversed(interaction: &'a Interaction) -> Self {
        Self {
            lhs: &interaction.rhs,
            lhs_is_template: interaction.rhs_is_template,
            rhs: &interaction.lhs,
            rhs_is_template: interaction.lhs_is_template,
        }
    }

    /// Distinct template parameters, left first.
    fn template_parameters(&self) -> Vec<&'a str> {
        let mut params = Vec::new();
        if self.lhs_is_template {
            params.push(self.lhs);
        }
        if self.rhs_is_template && !params.contains(&self.rhs) {
            params.push(self.rhs);
        }
        params
    }
}

/// Renders `RESULT operatorOP(LHS const &, RHS const &)`.
fn render_operator(file: &InteractionFile, interaction: &Interaction, operands: &Operands<'_>) -> String {
    let qualifier = if interaction.constexpr { "constexpr " } else { "inline " };
    let result = interaction.result.as_str();
    let op = interaction.op.as_str();
    format!(
        "{}{qualifier}{result} operator{op}({} const & lhs, {} const & rhs)\n{{\n    return {result}(atlas::value(lhs) {op} atlas::value(rhs));\n}}\n\n",
        template_header(file, &operands.template_parameters()),
        operands.lhs,
        operands.rhs,
    )
}

/// Renders `LHS & operatorOP=(LHS &, RHS const &)` when the result is the left type.
fn render_compound_operator(
    file: &InteractionFile,
    interaction: &Interaction,
    operands: &Operands<'_>,
) -> String {
    let Some(op) = BinaryOperator::from_symbol(&interaction.op) else {
        return String::new();
    };
    if operands.lhs_is_template || operands.lhs != interaction.result {
        return String::new();
    }
    let qualifier = if interaction.constexpr && file.cpp_standard >= CppStandard::Cpp14 {
        constexpr_for(file.cpp_standard)
    } else {
        "inline "
    };
    let params: Vec<&str> = operands.template_parameters();
    format!(
        "{}{qualifier}{lhs} & operator{compound}({lhs} & lhs, {rhs} const & rhs)\n{{\n    return atlas::compound_{name}(lhs, rhs);\n}}\n\n",
        template_header(file, &params),
        lhs = operands.lhs,
        rhs = operands.rhs,
        compound = op.compound_symbol(),
        name = op.name(),
    )
}

// ============================================================================
// SECTION: Template Headers
// ============================================================================

/// Renders the template header for `params`, choosing concepts by feature test.
///
/// When the concept and `enable_if` spellings differ both are emitted behind
/// the concepts feature test.
fn template_header(file: &InteractionFile, params: &[&str]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let constraints: Vec<&TypeConstraint> =
        params.iter().filter_map(|param| file.constraints.get(*param)).collect();
    let with_concepts = template_line(&constraints, true);
    let without_concepts = template_line(&constraints, false);
    if with_concepts == without_concepts {
        return with_concepts;
    }
    format!("#if {CONCEPTS_FEATURE_TEST}\n{with_concepts}#else\n{without_concepts}#endif\n")
}

/// Renders one template header spelling.
///
/// A parameter uses its concept when `prefer_concepts` is set or when it
/// has no `enable_if` expression.
fn template_line(constraints: &[&TypeConstraint], prefer_concepts: bool) -> String {
    let mut params = Vec::new();
    let mut conditions = Vec::new();
    for constraint in constraints {
        let name = constraint.name.as_str();
        match (&constraint.concept, &constraint.enable_if) {
            (Some(concept), Some(_)) if prefer_concepts => params.push(format!("{concept} {name}")),
            (Some(concept), None) => params.push(format!("{concept} {name}")),
            (_, Some(condition)) => {
                params.push(format!("typename {name}"));
                conditions.push(format!("({condition})"));
            }
            (None, None) => params.push(format!("typename {name}")),
        }
    }
    if !conditions.is_empty() {
        params.push(format!("typename std::enable_if<{}, bool>::type = true", conditions.join(" && ")));
    }
    format!("template <{}>\n", params.join(", "))
}

// ============================================================================
// SECTION: Namespaces
// ============================================================================

/// Namespace path for the opening line; nested segments need C++17.
fn open_namespace_path(namespace: &str, standard: CppStandard) -> String {
    if standard >= CppStandard::Cpp17 {
        namespace.to_string()
    } else {
        namespace.split("::").collect::<Vec<_>>().join(" { namespace ")
    }
}

/// Closing braces for [`open_namespace_path`].
fn close_namespace_path(namespace: &str, standard: CppStandard) -> String {
    let braces = if standard >= CppStandard::Cpp17 { 1 } else { namespace.split("::").count() };
    format!("{} // namespace {namespace}\n", vec!["}"; braces].join(" "))
}

#[cfg(test)]
mod tests;
