// crates/atlas-core/src/templates/operators.rs
// ============================================================================
// Module: Friend Operator Units
// Description: Increment, unary, logical, and stream friends.
// Purpose: Render non-arithmetic, non-comparison friend operators.
// Dependencies: crate::templates, crate::model
// ============================================================================

//! Friend operators that neither combine two wrappers arithmetically nor
//! compare them.

use crate::model::ClassInfo;
use crate::model::LogicalOperator;
use crate::model::UnaryOperator;
use crate::preamble::PreambleFragment;
use crate::templates::RenderContext;
use crate::templates::Slot;
use crate::templates::TemplateUnit;
use crate::templates::guarded;

/// Registers the friend operator units.
pub(super) fn register(units: &mut Vec<Box<dyn TemplateUnit>>) {
    units.push(Box::new(IncrementUnit));
    for (op, id, key) in [
        (UnaryOperator::Plus, "operators.unary.plus", "u+"),
        (UnaryOperator::Minus, "operators.unary.minus", "u-"),
        (UnaryOperator::Complement, "operators.unary.complement", "u~"),
    ] {
        units.push(Box::new(UnaryUnit {
            op,
            id,
            key,
        }));
    }
    units.push(Box::new(LogicalNotUnit));
    units.push(Box::new(LogicalUnit {
        op: LogicalOperator::And,
        id: "operators.logical.and",
    }));
    units.push(Box::new(LogicalUnit {
        op: LogicalOperator::Or,
        id: "operators.logical.or",
    }));
    units.push(Box::new(OstreamUnit));
    units.push(Box::new(IstreamUnit));
}

// ============================================================================
// SECTION: Increment
// ============================================================================

/// Prefix and postfix `++`/`--`.
struct IncrementUnit;

impl TemplateUnit for IncrementUnit {
    fn id(&self) -> &str {
        "operators.increment"
    }

    fn sort_key(&self) -> &str {
        "++"
    }

    fn slot(&self) -> Slot {
        Slot::Friends
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        !info.increment.is_empty()
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let member = info.value_member.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = String::new();
        for op in &info.increment {
            let symbol = op.symbol();
            let step = if info.constraint.is_active() {
                format!(
                    "auto next = self.{member};\n        {symbol}next;\n        self.{member} = {};",
                    guarded(info, "next")
                )
            } else {
                format!("{symbol}self.{member};")
            };
            out.push_str(&format!(
                "    friend {cx}{name} & operator{symbol}({name} & self)\n    {{\n        {step}\n        return self;\n    }}\n\n"
            ));
            out.push_str(&format!(
                "    friend {cx}{name} operator{symbol}({name} & self, int)\n    {{\n        auto result = self;\n        {symbol}self;\n        return result;\n    }}\n\n"
            ));
        }
        out
    }
}

// ============================================================================
// SECTION: Unary
// ============================================================================

/// One unary operator returning a new wrapper.
struct UnaryUnit {
    /// Operator rendered.
    op: UnaryOperator,
    /// Unit identifier.
    id: &'static str,
    /// Token spelling used as sort key.
    key: &'static str,
}

impl TemplateUnit for UnaryUnit {
    fn id(&self) -> &str {
        self.id
    }

    fn sort_key(&self) -> &str {
        self.key
    }

    fn slot(&self) -> Slot {
        Slot::Friends
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.unary.contains(&self.op)
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let member = info.value_member.as_str();
        let cx = info.constexpr_qualifier;
        let symbol = self.op.symbol();
        format!(
            "    friend {cx}{name} operator{symbol}({name} const & self)\n    {{\n        return {name}({symbol}self.{member});\n    }}\n\n"
        )
    }
}

// ============================================================================
// SECTION: Logical
// ============================================================================

/// `operator!`.
struct LogicalNotUnit;

impl TemplateUnit for LogicalNotUnit {
    fn id(&self) -> &str {
        "operators.logical.not"
    }

    fn sort_key(&self) -> &str {
        "!"
    }

    fn slot(&self) -> Slot {
        Slot::Friends
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.logical_not
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let member = info.value_member.as_str();
        let cx = info.constexpr_qualifier;
        format!(
            "    friend {cx}bool operator!({name} const & self)\n    {{\n        return !static_cast<bool>(self.{member});\n    }}\n\n"
        )
    }
}

/// Overloaded `&&` or `||`.
struct LogicalUnit {
    /// Operator rendered.
    op: LogicalOperator,
    /// Unit identifier.
    id: &'static str,
}

impl TemplateUnit for LogicalUnit {
    fn id(&self) -> &str {
        self.id
    }

    fn sort_key(&self) -> &str {
        self.op.symbol()
    }

    fn slot(&self) -> Slot {
        Slot::Logical
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.logical.contains(&self.op)
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let member = info.value_member.as_str();
        let cx = info.constexpr_qualifier;
        let symbol = self.op.symbol();
        format!(
            "    friend {cx}bool operator{symbol}({name} const & lhs, {name} const & rhs)\n    {{\n        return static_cast<bool>(lhs.{member}) {symbol} static_cast<bool>(rhs.{member});\n    }}\n\n"
        )
    }

    fn logical_operator(&self) -> Option<LogicalOperator> {
        Some(self.op)
    }
}

// ============================================================================
// SECTION: Streams
// ============================================================================

/// `operator<<(std::ostream &, ...)`.
struct OstreamUnit;

impl TemplateUnit for OstreamUnit {
    fn id(&self) -> &str {
        "operators.stream.out"
    }

    fn sort_key(&self) -> &str {
        "out"
    }

    fn slot(&self) -> Slot {
        Slot::Friends
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.ostream
    }

    fn required_includes(&self) -> &'static [&'static str] {
        &["<ostream>"]
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        &[PreambleFragment::OstreamDrill]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let name = context.info.class_name.as_str();
        format!(
            "    friend std::ostream & operator<<(std::ostream & os, {name} const & self)\n    {{\n        return atlas::atlas_detail::ostream_drill(os, self);\n    }}\n\n"
        )
    }
}

/// `operator>>(std::istream &, ...)`.
struct IstreamUnit;

impl TemplateUnit for IstreamUnit {
    fn id(&self) -> &str {
        "operators.stream.in"
    }

    fn sort_key(&self) -> &str {
        "in"
    }

    fn slot(&self) -> Slot {
        Slot::Friends
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.istream
    }

    fn required_includes(&self) -> &'static [&'static str] {
        &["<istream>"]
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        &[PreambleFragment::IstreamDrill]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let member = info.value_member.as_str();
        if !info.constraint.is_active() {
            return format!(
                "    friend std::istream & operator>>(std::istream & is, {name} & self)\n    {{\n        return atlas::atlas_detail::istream_drill(is, self.{member});\n    }}\n\n"
            );
        }
        format!(
            "    friend std::istream & operator>>(std::istream & is, {name} & self)\n    {{\n        auto next = self.{member};\n        if (atlas::atlas_detail::istream_drill(is, next)) {{\n            self.{member} = {};\n        }}\n        return is;\n    }}\n\n",
            guarded(info, "next")
        )
    }
}
