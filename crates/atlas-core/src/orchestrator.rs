// crates/atlas-core/src/orchestrator.rs
// ============================================================================
// Module: Template Orchestrator
// Description: Drives the template units over one class model.
// Purpose: Collect applicable units, render partials, and splice the class.
// Dependencies: crate::templates, crate::model, crate::preamble
// ============================================================================

//! ## Overview
//! Rendering a [`ClassInfo`] is a three step walk over the unit registry:
//! 1. keep the units whose `applies_to` holds and sort them by
//!    `(sort_key, id)`;
//! 2. render each into its slot, accumulating arithmetic and logical
//!    operators in the model's operator order;
//! 3. render the skeleton last, with every partial available.
//!
//! Arithmetic in a non-default mode is not spliced at its usual hook; the
//! block is inserted in front of the first friend declaration of the
//! finished class so it precedes every other friend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::debug;

use crate::diagnostics::Warning;
use crate::model::ArithmeticMode;
use crate::model::ClassInfo;
use crate::preamble::PreambleFragment;
use crate::templates::RenderContext;
use crate::templates::Slot;
use crate::templates::TemplateUnit;
use crate::templates::registry;

// ============================================================================
// SECTION: Rendered Class
// ============================================================================

/// One rendered wrapper, ready for assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedClass {
    /// Namespace-wrapped class text.
    pub body: String,
    /// Standard-library specializations emitted outside every namespace.
    pub specializations: String,
    /// Headers the class needs, excluding preamble headers.
    pub includes: BTreeSet<String>,
    /// Feature-test conditions guarding specific includes.
    pub include_guards: BTreeMap<String, String>,
    /// Preamble fragments the class needs.
    pub preamble: BTreeSet<PreambleFragment>,
    /// Diagnostics raised by template units.
    pub warnings: Vec<Warning>,
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders one class model.
#[must_use]
pub fn render_class(info: &ClassInfo) -> RenderedClass {
    let mut units: Vec<&dyn TemplateUnit> =
        registry().iter().map(|unit| &**unit).filter(|unit| unit.applies_to(info)).collect();
    units.sort_by(|a, b| a.sort_key().cmp(b.sort_key()).then_with(|| a.id().cmp(b.id())));
    debug!(class = %info.full_qualified_name, units = units.len(), "rendering class");

    let mut rendered = RenderedClass {
        includes: info.includes.clone(),
        include_guards: info.include_guards.clone(),
        ..RenderedClass::default()
    };
    for unit in &units {
        rendered.includes.extend(unit.required_includes().iter().map(|header| (*header).to_string()));
        rendered.preamble.extend(unit.required_preamble().iter().copied());
        rendered.warnings.extend(unit.diagnostics(info));
    }

    let mut partials: BTreeMap<Slot, String> = BTreeMap::new();
    let empty = BTreeMap::new();
    let context = RenderContext {
        info,
        partials: &empty,
    };
    for unit in &units {
        match unit.slot() {
            Slot::Skeleton | Slot::Arithmetic | Slot::Logical => {}
            slot => partials.entry(slot).or_default().push_str(&unit.render(&context)),
        }
    }
    let arithmetic: String = info
        .arithmetic_binary
        .iter()
        .filter_map(|op| units.iter().find(|unit| unit.binary_operator() == Some(*op)))
        .map(|unit| unit.render(&context))
        .collect();
    let logical: String = info
        .logical
        .iter()
        .filter_map(|op| units.iter().find(|unit| unit.logical_operator() == Some(*op)))
        .map(|unit| unit.render(&context))
        .collect();
    partials.insert(Slot::Logical, logical);

    let spliced_late = info.arithmetic_mode != ArithmeticMode::Default;
    if !spliced_late {
        partials.insert(Slot::Arithmetic, arithmetic.clone());
    }
    rendered.specializations = partials.remove(&Slot::Specializations).unwrap_or_default();

    let context = RenderContext {
        info,
        partials: &partials,
    };
    let mut body: String = units
        .iter()
        .filter(|unit| unit.slot() == Slot::Skeleton)
        .map(|unit| unit.render(&context))
        .collect();
    if spliced_late && !arithmetic.is_empty() {
        insert_before_first_friend(&mut body, &arithmetic);
    }
    rendered.body = body;
    rendered
}

/// Inserts `block` at the start of the first friend line, or before `};`.
fn insert_before_first_friend(body: &mut String, block: &str) {
    let position = body.find("\n    friend ").or_else(|| body.find("\n};"));
    if let Some(position) = position {
        body.insert_str(position + 1, block);
    }
}

#[cfg(test)]
mod tests;
