// crates/atlas-core/src/templates/skeleton.rs
// ============================================================================
// Module: Class Skeleton Units
// Description: The main class template and its constraint machinery.
// Purpose: Render the wrapper declaration and splice every partial into it.
// Dependencies: crate::templates, crate::model
// ============================================================================

//! The skeleton owns everything every wrapper has: the value member, the
//! default and forwarding constructors, the explicit conversion to the
//! wrapped type, and the `atlas_value` hooks behind `atlas::value`. Feature
//! partials are spliced in at fixed hooks, in [`Slot`] order.

use crate::model::ClassInfo;
use crate::model::ConstraintKind;
use crate::model::CppStandard;
use crate::preamble::PreambleFragment;
use crate::templates::RenderContext;
use crate::templates::Slot;
use crate::templates::TemplateUnit;
use crate::templates::guarded;

/// Registers the skeleton and constraint units.
pub(super) fn register(units: &mut Vec<Box<dyn TemplateUnit>>) {
    for (kind, id) in [
        (ConstraintKind::Positive, "constraints.positive"),
        (ConstraintKind::NonNegative, "constraints.non_negative"),
        (ConstraintKind::NonZero, "constraints.non_zero"),
        (ConstraintKind::NonEmpty, "constraints.non_empty"),
        (ConstraintKind::NonNull, "constraints.non_null"),
        (ConstraintKind::Bounded, "constraints.bounded"),
        (ConstraintKind::BoundedRange, "constraints.bounded_range"),
    ] {
        units.push(Box::new(ConstraintUnit {
            kind,
            id,
        }));
    }
    units.push(Box::new(SkeletonUnit));
}

// ============================================================================
// SECTION: Constraint
// ============================================================================

/// Bounds accessors and the `atlas_constraint` alias for one constraint kind.
struct ConstraintUnit {
    /// Constraint kind handled.
    kind: ConstraintKind,
    /// Unit identifier.
    id: &'static str,
}

impl TemplateUnit for ConstraintUnit {
    fn id(&self) -> &str {
        self.id
    }

    fn sort_key(&self) -> &str {
        self.kind.as_str()
    }

    fn slot(&self) -> Slot {
        Slot::Constraint
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.constraint.kind == self.kind
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        match self.kind {
            ConstraintKind::NonNull => &[PreambleFragment::ConstraintGuard, PreambleFragment::Nilable],
            _ => &[PreambleFragment::ConstraintGuard],
        }
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = String::new();
        let alias = match &info.constraint.bounds {
            Some(bounds) if self.kind.is_bounded() => {
                for (accessor, literal) in [("atlas_bound_min", &bounds.min), ("atlas_bound_max", &bounds.max)] {
                    out.push_str(&format!(
                        "    static {cx}atlas_value_type {accessor}()\n    {{\n        return atlas_value_type({literal});\n    }}\n\n"
                    ));
                }
                format!("atlas::constraints::{}<{name}>", self.kind.as_str())
            }
            _ => format!("atlas::constraints::{}", self.kind.as_str()),
        };
        out.push_str(&format!("    using atlas_constraint = {alias};\n\n"));
        out
    }
}

// ============================================================================
// SECTION: Skeleton
// ============================================================================

/// The main class template.
struct SkeletonUnit;

impl TemplateUnit for SkeletonUnit {
    fn id(&self) -> &str {
        "class.skeleton"
    }

    fn sort_key(&self) -> &str {
        "~class"
    }

    fn slot(&self) -> Slot {
        Slot::Skeleton
    }

    fn applies_to(&self, _info: &ClassInfo) -> bool {
        true
    }

    fn required_includes(&self) -> &'static [&'static str] {
        &["<type_traits>", "<utility>"]
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        &[PreambleFragment::StrongTypeTag, PreambleFragment::ValueAccess]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let name = info.class_name.as_str();
        let value_type = info.underlying_type.as_str();
        let member = info.value_member.as_str();
        let cx = info.constexpr_qualifier;
        let defaulted = info.default_value.is_none() && !info.delete_default_constructor;

        let mut out = String::new();
        out.push_str(&open_namespace(&info.namespace, info.cpp_standard));
        out.push_str("// ");
        out.push_str(&info.full_qualified_name);
        out.push_str(": ");
        out.push_str(&info.description);
        out.push('\n');
        out.push_str(info.kind.as_str());
        out.push(' ');
        out.push_str(name);
        out.push_str("\n: private atlas::strong_type_tag\n{\n");
        out.push_str(&format!(
            "    {value_type} {member}{};\n\n",
            if defaulted { "{}" } else { "" }
        ));
        if info.is_class() {
            out.push_str("public:\n");
        }
        out.push_str(&format!("    using atlas_value_type = {value_type};\n\n"));
        out.push_str(context.partial(Slot::Constraint));
        out.push_str(context.partial(Slot::ConstantDeclarations));

        out.push_str(&default_constructor(info));
        out.push_str(&forwarding_constructor(info));

        out.push_str(&format!(
            "    explicit {cx}operator {value_type} const &() const\n    {{\n        return {member};\n    }}\n\n"
        ));
        if !info.constraint.is_active() {
            out.push_str(&format!(
                "    explicit {cx}operator {value_type} &()\n    {{\n        return {member};\n    }}\n\n"
            ));
        }

        out.push_str(context.partial(Slot::Members));
        out.push_str(context.partial(Slot::Forwards));

        out.push_str(&format!(
            "    friend {cx}{value_type} const & atlas_value({name} const & self, atlas::value_tag)\n    {{\n        return self.{member};\n    }}\n\n"
        ));
        out.push_str(context.partial(Slot::Arithmetic));
        out.push_str(context.partial(Slot::Comparison));
        out.push_str(context.partial(Slot::Friends));
        out.push_str(context.partial(Slot::Logical));
        trim_trailing_blank_line(&mut out);
        out.push_str("};\n");

        let definitions = context.partial(Slot::ConstantDefinitions);
        if !definitions.is_empty() {
            out.push('\n');
            out.push_str(definitions);
            trim_trailing_blank_line(&mut out);
        }
        out.push_str(&close_namespace(&info.namespace, info.cpp_standard));
        out
    }
}

/// Renders the default constructor.
fn default_constructor(info: &ClassInfo) -> String {
    let name = info.class_name.as_str();
    let member = info.value_member.as_str();
    if info.delete_default_constructor {
        return format!("    {name}() = delete;\n\n");
    }
    match &info.default_value {
        Some(literal) => {
            let init = guarded(info, &format!("atlas_value_type({literal})"));
            format!(
                "    {}{name}()\n    : {member}({init})\n    {{\n    }}\n\n",
                info.constexpr_qualifier
            )
        }
        None => format!("    {name}() = default;\n\n"),
    }
}

/// Renders the perfect-forwarding constructor template.
fn forwarding_constructor(info: &ClassInfo) -> String {
    let name = info.class_name.as_str();
    let member = info.value_member.as_str();
    let value_type = info.underlying_type.as_str();
    let header = if info.at_least(CppStandard::Cpp20) {
        format!(
            "    template <typename... ArgTs>\n    requires (std::is_constructible_v<{value_type}, ArgTs...>)\n"
        )
    } else {
        format!(
            "    template <\n        typename... ArgTs,\n        typename = typename std::enable_if<\n            std::is_constructible<{value_type}, ArgTs...>::value>::type>\n"
        )
    };
    let init = if info.constraint.is_active() {
        guarded(info, "atlas_value_type(std::forward<ArgTs>(args)...)")
    } else {
        "std::forward<ArgTs>(args)...".to_string()
    };
    format!(
        "{header}    {}explicit {name}(ArgTs && ... args)\n    : {member}({init})\n    {{\n    }}\n\n",
        info.constexpr_qualifier
    )
}

/// Opens `namespace` (nothing for the global namespace).
fn open_namespace(namespace: &str, standard: CppStandard) -> String {
    if namespace.is_empty() {
        return String::new();
    }
    if standard >= CppStandard::Cpp17 {
        return format!("namespace {namespace} {{\n");
    }
    namespace.split("::").map(|segment| format!("namespace {segment} {{\n")).collect()
}

/// Closes what [`open_namespace`] opened.
fn close_namespace(namespace: &str, standard: CppStandard) -> String {
    if namespace.is_empty() {
        return String::new();
    }
    let braces = if standard >= CppStandard::Cpp17 { 1 } else { namespace.split("::").count() };
    format!("{} // namespace {namespace}\n", vec!["}"; braces].join(" "))
}

/// Drops one trailing empty line so blocks close tightly.
fn trim_trailing_blank_line(out: &mut String) {
    if out.ends_with("\n\n") {
        out.pop();
    }
}
