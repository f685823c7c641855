// crates/atlas-core/src/templates/members.rs
// ============================================================================
// Module: Member Operator Units
// Description: Access operators, call operators, conversions, iteration.
// Purpose: Render member functions exposing the wrapped value.
// Dependencies: crate::templates, crate::model, crate::diagnostics
// ============================================================================

//! Member operators of the wrapper. Mutable access (non-const overloads) is
//! only generated for unconstrained wrappers, since it would let callers
//! bypass the constraint check.

use crate::diagnostics::Warning;
use crate::diagnostics::WarningCode;
use crate::model::ClassInfo;
use crate::model::CppStandard;
use crate::preamble::PreambleFragment;
use crate::templates::RenderContext;
use crate::templates::Slot;
use crate::templates::TemplateUnit;
use crate::templates::guarded;

/// Registers the member operator units.
pub(super) fn register(units: &mut Vec<Box<dyn TemplateUnit>>) {
    units.push(Box::new(ArrowUnit));
    units.push(Box::new(IndirectionUnit));
    units.push(Box::new(AddressOfUnit));
    units.push(Box::new(BoolConversionUnit));
    units.push(Box::new(NullaryCallUnit));
    units.push(Box::new(CallableUnit));
    units.push(Box::new(SubscriptUnit));
    units.push(Box::new(ExplicitCastUnit));
    units.push(Box::new(ImplicitCastUnit));
    units.push(Box::new(IterableUnit));
    units.push(Box::new(TemplateAssignmentUnit));
}

/// True when non-const access to the value may be generated.
fn allows_mutation(info: &ClassInfo) -> bool {
    !info.constraint.is_active()
}

// ============================================================================
// SECTION: Access
// ============================================================================

/// `operator->`.
struct ArrowUnit;

impl TemplateUnit for ArrowUnit {
    fn id(&self) -> &str {
        "members.arrow"
    }

    fn sort_key(&self) -> &str {
        "->"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.arrow
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        &[PreambleFragment::ArrowStar]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let value_type = info.underlying_type.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = format!(
            "    {cx}auto operator->() const\n    -> decltype(atlas::atlas_detail::arrow(std::declval<{value_type} const &>()))\n    {{\n        return atlas::atlas_detail::arrow({member});\n    }}\n\n"
        );
        if allows_mutation(info) {
            out.push_str(&format!(
                "    {cx}auto operator->()\n    -> decltype(atlas::atlas_detail::arrow(std::declval<{value_type} &>()))\n    {{\n        return atlas::atlas_detail::arrow({member});\n    }}\n\n"
            ));
        }
        out
    }
}

/// Unary `operator*`.
struct IndirectionUnit;

impl TemplateUnit for IndirectionUnit {
    fn id(&self) -> &str {
        "members.indirection"
    }

    fn sort_key(&self) -> &str {
        "@"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.indirection
    }

    fn required_preamble(&self) -> &'static [PreambleFragment] {
        &[PreambleFragment::ArrowStar]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let value_type = info.underlying_type.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = format!(
            "    {cx}auto operator*() const\n    -> decltype(atlas::atlas_detail::star(std::declval<{value_type} const &>()))\n    {{\n        return atlas::atlas_detail::star({member});\n    }}\n\n"
        );
        if allows_mutation(info) {
            out.push_str(&format!(
                "    {cx}auto operator*()\n    -> decltype(atlas::atlas_detail::star(std::declval<{value_type} &>()))\n    {{\n        return atlas::atlas_detail::star({member});\n    }}\n\n"
            ));
        }
        out
    }
}

/// Unary `operator&` yielding the address of the wrapped value.
struct AddressOfUnit;

impl TemplateUnit for AddressOfUnit {
    fn id(&self) -> &str {
        "members.address_of"
    }

    fn sort_key(&self) -> &str {
        "&of"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.address_of
    }

    fn required_includes(&self) -> &'static [&'static str] {
        &["<memory>"]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let value_type = info.underlying_type.as_str();
        // std::addressof is constexpr from C++17.
        let cx = if info.at_least(CppStandard::Cpp17) { info.constexpr_qualifier } else { "" };
        let mut out = format!(
            "    {cx}{value_type} const * operator&() const\n    {{\n        return std::addressof({member});\n    }}\n\n"
        );
        if allows_mutation(info) {
            out.push_str(&format!(
                "    {cx}{value_type} * operator&()\n    {{\n        return std::addressof({member});\n    }}\n\n"
            ));
        }
        out
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Explicit `operator bool`.
struct BoolConversionUnit;

impl TemplateUnit for BoolConversionUnit {
    fn id(&self) -> &str {
        "members.bool"
    }

    fn sort_key(&self) -> &str {
        "bool"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.bool_conversion
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let cx = context.info.constexpr_qualifier;
        let member = context.info.value_member.as_str();
        format!(
            "    explicit {cx}operator bool() const\n    {{\n        return static_cast<bool>({member});\n    }}\n\n"
        )
    }
}

/// Explicit conversions, one per target type.
///
/// Targets that are also implicit are left to the implicit unit.
struct ExplicitCastUnit;

impl TemplateUnit for ExplicitCastUnit {
    fn id(&self) -> &str {
        "members.cast.explicit"
    }

    fn sort_key(&self) -> &str {
        "cast"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.explicit_casts.iter().any(|target| !info.implicit_casts.contains(target))
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = String::new();
        for target in info.explicit_casts.iter().filter(|target| !info.implicit_casts.contains(*target)) {
            out.push_str(&format!(
                "    explicit {cx}operator {target}() const\n    {{\n        return static_cast<{target}>({member});\n    }}\n\n"
            ));
        }
        out
    }
}

/// Implicit conversions, one per target type.
struct ImplicitCastUnit;

impl TemplateUnit for ImplicitCastUnit {
    fn id(&self) -> &str {
        "members.cast.implicit"
    }

    fn sort_key(&self) -> &str {
        "implicit_cast"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        !info.implicit_casts.is_empty()
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = String::new();
        for target in &info.implicit_casts {
            out.push_str(&format!(
                "    {cx}operator {target}() const\n    {{\n        return static_cast<{target}>({member});\n    }}\n\n"
            ));
        }
        out
    }

    fn diagnostics(&self, info: &ClassInfo) -> Vec<Warning> {
        info.implicit_casts
            .intersection(&info.explicit_casts)
            .map(|target| {
                Warning::new(
                    WarningCode::RedundantOperator,
                    format!(
                        "{}: conversion to `{target}` is both explicit and implicit; keeping the implicit one",
                        info.full_qualified_name
                    ),
                )
            })
            .collect()
    }
}

// ============================================================================
// SECTION: Call and Subscript
// ============================================================================

/// `operator()()` returning the wrapped value.
struct NullaryCallUnit;

impl TemplateUnit for NullaryCallUnit {
    fn id(&self) -> &str {
        "members.call.nullary"
    }

    fn sort_key(&self) -> &str {
        "()"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.nullary_call
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let value_type = info.underlying_type.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = format!(
            "    {cx}{value_type} const & operator()() const\n    {{\n        return {member};\n    }}\n\n"
        );
        if allows_mutation(info) {
            out.push_str(&format!(
                "    {cx}{value_type} & operator()()\n    {{\n        return {member};\n    }}\n\n"
            ));
        }
        out
    }
}

/// `operator()(F &&)` invoking a callable with the wrapped value.
struct CallableUnit;

impl TemplateUnit for CallableUnit {
    fn id(&self) -> &str {
        "members.call.callable"
    }

    fn sort_key(&self) -> &str {
        "(&)"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.callable
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let value_type = info.underlying_type.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = format!(
            "    template <typename InvocableT>\n    {cx}auto operator()(InvocableT && inv) const\n    -> decltype(std::forward<InvocableT>(inv)(std::declval<{value_type} const &>()))\n    {{\n        return std::forward<InvocableT>(inv)({member});\n    }}\n\n"
        );
        if allows_mutation(info) {
            out.push_str(&format!(
                "    template <typename InvocableT>\n    {cx}auto operator()(InvocableT && inv)\n    -> decltype(std::forward<InvocableT>(inv)(std::declval<{value_type} &>()))\n    {{\n        return std::forward<InvocableT>(inv)({member});\n    }}\n\n"
            ));
        }
        out
    }
}

/// `operator[]`, variadic from C++23.
struct SubscriptUnit;

impl TemplateUnit for SubscriptUnit {
    fn id(&self) -> &str {
        "members.subscript"
    }

    fn sort_key(&self) -> &str {
        "[]"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.subscript
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let value_type = info.underlying_type.as_str();
        let cx = info.constexpr_qualifier;
        let (params, args) = if info.at_least(CppStandard::Cpp23) {
            ("typename... ArgTs", "ArgTs && ... args")
        } else {
            ("typename ArgT", "ArgT && arg")
        };
        let forwarded = if info.at_least(CppStandard::Cpp23) {
            "std::forward<ArgTs>(args)..."
        } else {
            "std::forward<ArgT>(arg)"
        };
        let mut out = format!(
            "    template <{params}>\n    {cx}auto operator[]({args}) const\n    -> decltype(std::declval<{value_type} const &>()[{forwarded}])\n    {{\n        return {member}[{forwarded}];\n    }}\n\n"
        );
        if allows_mutation(info) {
            out.push_str(&format!(
                "    template <{params}>\n    {cx}auto operator[]({args})\n    -> decltype(std::declval<{value_type} &>()[{forwarded}])\n    {{\n        return {member}[{forwarded}];\n    }}\n\n"
            ));
        }
        out
    }
}

// ============================================================================
// SECTION: Iteration and Assignment
// ============================================================================

/// `begin`/`end` forwarding.
struct IterableUnit;

impl TemplateUnit for IterableUnit {
    fn id(&self) -> &str {
        "members.iterable"
    }

    fn sort_key(&self) -> &str {
        "iterable"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.iterator_support
    }

    fn required_includes(&self) -> &'static [&'static str] {
        &["<iterator>"]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let value_type = info.underlying_type.as_str();
        let cx = info.constexpr_qualifier;
        let mut out = String::new();
        for function in ["begin", "end"] {
            out.push_str(&format!(
                "    {cx}auto {function}() const\n    -> decltype(std::{function}(std::declval<{value_type} const &>()))\n    {{\n        return std::{function}({member});\n    }}\n\n"
            ));
            if allows_mutation(info) {
                out.push_str(&format!(
                    "    {cx}auto {function}()\n    -> decltype(std::{function}(std::declval<{value_type} &>()))\n    {{\n        return std::{function}({member});\n    }}\n\n"
                ));
            }
        }
        out
    }
}

/// Constrained template `operator=` from anything assignable to the value.
struct TemplateAssignmentUnit;

impl TemplateUnit for TemplateAssignmentUnit {
    fn id(&self) -> &str {
        "members.assign"
    }

    fn sort_key(&self) -> &str {
        "assign"
    }

    fn slot(&self) -> Slot {
        Slot::Members
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        info.template_assignment
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let member = info.value_member.as_str();
        let name = info.class_name.as_str();
        let value_type = info.underlying_type.as_str();
        let cx = info.constexpr_qualifier;
        let header = if info.at_least(CppStandard::Cpp20) {
            format!(
                "    template <typename T>\n    requires (std::is_assignable_v<{value_type} &, T>)\n"
            )
        } else {
            format!(
                "    template <\n        typename T,\n        typename = typename std::enable_if<std::is_assignable<{value_type} &, T>::value>::type>\n"
            )
        };
        let assignment = if info.constraint.is_active() {
            format!(
                "{member} = {};",
                guarded(info, "atlas_value_type(std::forward<T>(t))")
            )
        } else {
            format!("{member} = std::forward<T>(t);")
        };
        format!(
            "{header}    {cx}{name} & operator=(T && t)\n    {{\n        {assignment}\n        return *this;\n    }}\n\n"
        )
    }
}
