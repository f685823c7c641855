// crates/atlas-core/src/templates/specializations.rs
// ============================================================================
// Module: Specialization and Constant Units
// Description: std::hash, std::formatter, and named constants.
// Purpose: Render text that lives outside the class or outside namespaces.
// Dependencies: crate::templates, crate::model, crate::classifier
// ============================================================================

//! Standard-library specializations are emitted after the wrapper's
//! namespace is closed, inside `namespace std`. Named constants are
//! declared in the class; from C++17 they are defined as inline variables
//! after it, before that they are static member functions.

use crate::classifier::FORMAT_FEATURE_TEST;
use crate::model::ClassInfo;
use crate::model::CppStandard;
use crate::preamble::PreambleFragment;
use crate::templates::RenderContext;
use crate::templates::Slot;
use crate::templates::TemplateUnit;

/// Registers the specialization and constant units.
pub(super) fn register(units: &mut Vec<Box<dyn TemplateUnit>>) {
    units.push(Box::new(HashUnit));
    units.push(Box::new(FormatterUnit));
    units.push(Box::new(ConstantDeclarationUnit));
    units.push(Box::new(ConstantDefinitionUnit));
}

/// True when constants are inline variables rather than functions.
fn constants_are_variables(info: &ClassInfo) -> bool {
    info.at_least(CppStandard::Cpp17)
}

// ============================================================================
// SECTION: Standard Library Specializations
// ============================================================================

/// `std::hash` specialization.
struct HashUnit;

impl TemplateUnit for HashUnit {
    fn id(&self) -> &str {
        "specializations.hash"
    }

    fn sort_key(&self) -> &str {
        "hash"
    }

    fn slot(&self) -> Slot {
        Slot::Specializations
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.hash_specialization
    }

    fn required_includes(&self) -> &'static [&'static str] {
        &["<cstddef>", "<functional>"]
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        &[PreambleFragment::HashDrill]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let fqn = info.full_qualified_name.as_str();
        let cx = info.hash_constexpr_qualifier;
        format!(
            "namespace std {{\ntemplate <>\nstruct hash<{fqn}>\n{{\n    {cx}std::size_t operator()({fqn} const & t) const\n    {{\n        return atlas::atlas_detail::hash_drill(t);\n    }}\n}};\n}} // namespace std\n\n"
        )
    }
}

/// `std::formatter` specialization, guarded by the format feature test.
struct FormatterUnit;

impl TemplateUnit for FormatterUnit {
    fn id(&self) -> &str {
        "specializations.formatter"
    }

    fn sort_key(&self) -> &str {
        "fmt"
    }

    fn slot(&self) -> Slot {
        Slot::Specializations
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.formatter_specialization
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        &[PreambleFragment::FormatDrill]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let fqn = context.info.full_qualified_name.as_str();
        format!(
            "#if {FORMAT_FEATURE_TEST}\nnamespace std {{\ntemplate <typename CharT>\nstruct formatter<{fqn}, CharT>\n: formatter<{fqn}::atlas_value_type, CharT>\n{{\n    template <typename FormatContext>\n    auto format({fqn} const & t, FormatContext & ctx) const\n    {{\n        return formatter<{fqn}::atlas_value_type, CharT>::format(\n            atlas::atlas_detail::format_drill(t),\n            ctx);\n    }}\n}};\n}} // namespace std\n#endif\n\n"
        )
    }
}

// ============================================================================
// SECTION: Constants
// ============================================================================

/// In-class constant declarations.
struct ConstantDeclarationUnit;

impl TemplateUnit for ConstantDeclarationUnit {
    fn id(&self) -> &str {
        "constants.declaration"
    }

    fn sort_key(&self) -> &str {
        "constants"
    }

    fn slot(&self) -> Slot {
        Slot::ConstantDeclarations
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        !info.constants.is_empty()
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = String::new();
        for (constant, literal) in &info.constants {
            if constants_are_variables(info) {
                out.push_str(&format!("    static {name} const {constant};\n"));
            } else {
                out.push_str(&format!(
                    "    static {cx}{name} {constant}()\n    {{\n        return {name}({literal});\n    }}\n"
                ));
            }
        }
        out.push('\n');
        out
    }
}

/// Out-of-class constant definitions (C++17 and later).
struct ConstantDefinitionUnit;

impl TemplateUnit for ConstantDefinitionUnit {
    fn id(&self) -> &str {
        "constants.definition"
    }

    fn sort_key(&self) -> &str {
        "constants"
    }

    fn slot(&self) -> Slot {
        Slot::ConstantDefinitions
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        !info.constants.is_empty() && constants_are_variables(info)
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let qualifier = if info.constexpr_qualifier.is_empty() { "const " } else { "constexpr " };
        let mut out = String::new();
        for (constant, literal) in &info.constants {
            out.push_str(&format!(
                "inline {qualifier}{name} {name}::{constant} = {name}({literal});\n"
            ));
        }
        out.push('\n');
        out
    }
}
