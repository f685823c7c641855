// crates/atlas-core/src/templates/mod.rs
// ============================================================================
// Module: Template Units
// Description: Composable renderers, each contributing one wrapper feature.
// Purpose: Define the unit contract, the render slots, and the registry.
// Dependencies: crate::model, crate::preamble, crate::diagnostics
// ============================================================================

//! ## Overview
//! A [`TemplateUnit`] decides whether it applies to a [`ClassInfo`], names
//! the headers and preamble fragments it needs, and renders text into one
//! [`Slot`] of the class skeleton. The registry is built once per process and
//! is read-only afterwards; the orchestrator visits applicable units in
//! `(sort_key, id)` order.
//!
//! Rendering is plain string building. Every loop iterates a sorted set or
//! an ordered list from the model, so output is deterministic.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod arithmetic;
mod comparison;
mod forwards;
mod members;
mod operators;
mod skeleton;
mod specializations;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::diagnostics::Warning;
use crate::model::BinaryOperator;
use crate::model::ClassInfo;
use crate::model::LogicalOperator;
use crate::preamble::PreambleFragment;

// ============================================================================
// SECTION: Slots
// ============================================================================

/// Where a unit's text lands in the generated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// The main class template itself.
    Skeleton,
    /// Bounds accessors and the `atlas_constraint` alias.
    Constraint,
    /// Static constant declarations inside the class.
    ConstantDeclarations,
    /// Member operators and conversions.
    Members,
    /// Forwarded member functions.
    Forwards,
    /// Arithmetic and bitwise friends, accumulated in operator order.
    Arithmetic,
    /// Relational, spaceship, and defaulted equality friends.
    Comparison,
    /// Unary, increment, logical-not, and stream friends.
    Friends,
    /// `&&` and `||` friends, accumulated in operator order.
    Logical,
    /// Constant definitions after the class, inside its namespace.
    ConstantDefinitions,
    /// Specializations outside every namespace.
    Specializations,
}

// ============================================================================
// SECTION: Render Context
// ============================================================================

/// What a unit sees while rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Model being rendered.
    pub info: &'a ClassInfo,
    /// Partials rendered so far, keyed by slot.
    pub partials: &'a BTreeMap<Slot, String>,
}

impl<'a> RenderContext<'a> {
    /// Returns the partial for `slot`, or `""`.
    #[must_use]
    pub fn partial(&self, slot: Slot) -> &'a str {
        self.partials.get(&slot).map_or("", String::as_str)
    }
}

// ============================================================================
// SECTION: Unit Contract
// ============================================================================

/// One composable renderer.
pub trait TemplateUnit: Send + Sync {
    /// Hierarchical identifier (`operators.arithmetic.addition.checked`).
    fn id(&self) -> &str;

    /// Ordering key; the operator symbol or a descriptive key.
    fn sort_key(&self) -> &str;

    /// Output slot.
    fn slot(&self) -> Slot;

    /// True when the unit contributes to `info`.
    fn applies_to(&self, info: &ClassInfo) -> bool;

    /// Headers the rendered text needs.
    fn required_includes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Preamble fragments the rendered text needs.
    fn required_preamble(&self) -> &'static [PreambleFragment] {
        &[]
    }

    /// Renders the unit.
    fn render(&self, context: &RenderContext<'_>) -> String;

    /// Warnings about `info` raised by this unit.
    fn diagnostics(&self, _info: &ClassInfo) -> Vec<Warning> {
        Vec::new()
    }

    /// Arithmetic operator rendered by the unit, if any.
    fn binary_operator(&self) -> Option<BinaryOperator> {
        None
    }

    /// Logical operator rendered by the unit, if any.
    fn logical_operator(&self) -> Option<LogicalOperator> {
        None
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Process-wide unit registry.
static REGISTRY: OnceLock<Vec<Box<dyn TemplateUnit>>> = OnceLock::new();

/// Returns every registered unit.
///
/// The registry is built on first use and never mutated afterwards.
pub fn registry() -> &'static [Box<dyn TemplateUnit>] {
    REGISTRY.get_or_init(build_registry)
}

/// Builds the full unit list.
fn build_registry() -> Vec<Box<dyn TemplateUnit>> {
    let mut units: Vec<Box<dyn TemplateUnit>> = Vec::new();
    arithmetic::register(&mut units);
    comparison::register(&mut units);
    operators::register(&mut units);
    members::register(&mut units);
    forwards::register(&mut units);
    specializations::register(&mut units);
    skeleton::register(&mut units);
    units
}

// ============================================================================
// SECTION: Shared Rendering Helpers
// ============================================================================

/// Renders `text` as a C++ narrow string literal.
pub(crate) fn cpp_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Wraps `expr` in the constraint check when `info` is constrained.
pub(crate) fn guarded(info: &ClassInfo, expr: &str) -> String {
    if info.constraint.is_active() {
        format!(
            "atlas::atlas_detail::checked_value<atlas_constraint>({expr}, {})",
            cpp_string_literal(&info.constraint.message)
        )
    } else {
        expr.to_string()
    }
}

/// Renders a statement assigning `expr` to `target`, checked when constrained.
pub(crate) fn guarded_assignment(info: &ClassInfo, target: &str, expr: &str) -> String {
    let value = if info.constraint.is_active() {
        guarded(info, &format!("static_cast<{}>({expr})", info.underlying_type))
    } else {
        expr.to_string()
    };
    format!("{target} = {value};")
}

#[cfg(test)]
mod tests;
