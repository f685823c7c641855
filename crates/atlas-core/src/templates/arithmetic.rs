// crates/atlas-core/src/templates/arithmetic.rs
// ============================================================================
// Module: Arithmetic Operator Units
// Description: One unit per arithmetic/bitwise operator and arithmetic mode.
// Purpose: Render `OP=` and `OP` friends for default, checked, saturating,
//          and wrapping arithmetic.
// Dependencies: crate::templates, crate::model
// ============================================================================

//! Each operator renders a compound-assignment friend doing the work and a
//! binary friend defined in terms of it. Non-default modes call the
//! `atlas_detail` helper named `<mode>_<op>`.

use crate::model::ArithmeticMode;
use crate::model::BinaryOperator;
use crate::model::ClassInfo;
use crate::preamble::PreambleFragment;
use crate::templates::RenderContext;
use crate::templates::Slot;
use crate::templates::TemplateUnit;
use crate::templates::guarded_assignment;

/// All arithmetic modes, in registration order.
const MODES: [ArithmeticMode; 4] = [
    ArithmeticMode::Default,
    ArithmeticMode::Checked,
    ArithmeticMode::Saturating,
    ArithmeticMode::Wrapping,
];

/// Registers one unit per reachable `(operator, mode)` pair.
///
/// Pairs whose effective mode differs from the mode itself (bitwise
/// operators under any mode, wrapping division and modulo) are not
/// registered; the default-mode unit covers them.
pub(super) fn register(units: &mut Vec<Box<dyn TemplateUnit>>) {
    for op in BinaryOperator::ALL {
        for mode in MODES {
            if op.effective_mode(mode) == mode {
                units.push(Box::new(ArithmeticUnit::new(op, mode)));
            }
        }
    }
}

/// Renders one arithmetic operator under one mode.
struct ArithmeticUnit {
    /// Operator rendered.
    op: BinaryOperator,
    /// Mode the unit renders.
    mode: ArithmeticMode,
    /// Unit identifier.
    id: String,
}

impl ArithmeticUnit {
    /// Creates the unit for `op` under `mode`.
    fn new(op: BinaryOperator, mode: ArithmeticMode) -> Self {
        Self {
            op,
            mode,
            id: format!("operators.arithmetic.{}.{}", op.name(), mode.as_str()),
        }
    }

    /// Expression combining both operands' `member` under the mode.
    fn combine(&self, member: &str) -> String {
        match self.mode {
            ArithmeticMode::Default => format!("lhs.{member} {} rhs.{member}", self.op.symbol()),
            ArithmeticMode::Checked | ArithmeticMode::Saturating | ArithmeticMode::Wrapping => {
                format!(
                    "atlas::atlas_detail::{}_{}(lhs.{member}, rhs.{member})",
                    self.mode.as_str(),
                    self.op.helper_suffix()
                )
            }
        }
    }

    /// Body statement of the compound assignment.
    fn compound_statement(&self, info: &ClassInfo) -> String {
        let member = info.value_member.as_str();
        if self.mode == ArithmeticMode::Default && !info.constraint.is_active() {
            return format!("lhs.{member} {} rhs.{member};", self.op.compound_symbol());
        }
        guarded_assignment(info, &format!("lhs.{member}"), &self.combine(member))
    }
}

impl TemplateUnit for ArithmeticUnit {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> &str {
        self.op.symbol()
    }

    fn slot(&self) -> Slot {
        Slot::Arithmetic
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.arithmetic_binary.contains(&self.op)
            && self.op.effective_mode(info.arithmetic_mode) == self.mode
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        match self.mode {
            ArithmeticMode::Default => &[],
            ArithmeticMode::Checked => &[PreambleFragment::Checked],
            ArithmeticMode::Saturating => &[PreambleFragment::Saturating],
            ArithmeticMode::Wrapping => &[PreambleFragment::Wrapping],
        }
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = String::new();
        out.push_str("    friend ");
        out.push_str(cx);
        out.push_str(name);
        out.push_str(" & operator");
        out.push_str(self.op.compound_symbol());
        out.push('(');
        out.push_str(name);
        out.push_str(" & lhs, ");
        out.push_str(name);
        out.push_str(" const & rhs)\n    {\n        ");
        out.push_str(&self.compound_statement(info));
        out.push_str("\n        return lhs;\n    }\n\n");

        out.push_str("    friend ");
        out.push_str(cx);
        out.push_str(name);
        out.push_str(" operator");
        out.push_str(self.op.symbol());
        out.push('(');
        out.push_str(name);
        out.push_str(" lhs, ");
        out.push_str(name);
        out.push_str(" const & rhs)\n    {\n        lhs ");
        out.push_str(self.op.compound_symbol());
        out.push_str(" rhs;\n        return lhs;\n    }\n\n");
        out
    }

    fn binary_operator(&self) -> Option<BinaryOperator> {
        Some(self.op)
    }
}
