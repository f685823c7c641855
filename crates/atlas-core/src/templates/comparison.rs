// crates/atlas-core/src/templates/comparison.rs
// ============================================================================
// Module: Comparison Units
// Description: Relational operators, defaulted spaceship, defaulted equality.
// Purpose: Render comparison friends of the wrapper.
// Dependencies: crate::templates, crate::model
// ============================================================================

//! Comparison friends. `<=>` and its promoted `==` are defaulted; explicit
//! relational operators compare the wrapped values directly.

use crate::model::ClassInfo;
use crate::templates::RenderContext;
use crate::templates::Slot;
use crate::templates::TemplateUnit;

/// Registers the comparison units.
pub(super) fn register(units: &mut Vec<Box<dyn TemplateUnit>>) {
    units.push(Box::new(RelationalUnit));
    units.push(Box::new(SpaceshipUnit));
    units.push(Box::new(DefaultedEqualityUnit));
}

/// The relational cluster: every explicitly requested relational operator.
struct RelationalUnit;

impl TemplateUnit for RelationalUnit {
    fn id(&self) -> &str {
        "operators.relational"
    }

    fn sort_key(&self) -> &str {
        "=="
    }

    fn slot(&self) -> Slot {
        Slot::Comparison
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        !info.relational.is_empty()
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let mut out = String::new();
        for op in &info.relational {
            out.push_str("    friend ");
            out.push_str(info.constexpr_qualifier);
            out.push_str("bool operator");
            out.push_str(op.symbol());
            out.push('(');
            out.push_str(name);
            out.push_str(" const & lhs, ");
            out.push_str(name);
            out.push_str(" const & rhs)\n    {\n        return lhs.");
            out.push_str(&info.value_member);
            out.push(' ');
            out.push_str(op.symbol());
            out.push_str(" rhs.");
            out.push_str(&info.value_member);
            out.push_str(";\n    }\n\n");
        }
        out
    }
}

/// Defaulted three-way comparison.
struct SpaceshipUnit;

impl TemplateUnit for SpaceshipUnit {
    fn id(&self) -> &str {
        "operators.spaceship"
    }

    fn sort_key(&self) -> &str {
        "<=>"
    }

    fn slot(&self) -> Slot {
        Slot::Comparison
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.spaceship
    }

    fn required_includes(&self) -> &'static [&'static str] {
        &["<compare>"]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let name = context.info.class_name.as_str();
        format!("    friend auto operator<=>({name} const &, {name} const &) = default;\n\n")
    }
}

/// Defaulted equality, promoted from `==`/`!=` next to `<=>`.
struct DefaultedEqualityUnit;

impl TemplateUnit for DefaultedEqualityUnit {
    fn id(&self) -> &str {
        "operators.defaulted_equality"
    }

    fn sort_key(&self) -> &str {
        "<=>="
    }

    fn slot(&self) -> Slot {
        Slot::Comparison
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.defaulted_equality
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let name = context.info.class_name.as_str();
        format!("    friend bool operator==({name} const &, {name} const &) = default;\n\n")
    }
}
