// crates/atlas-core/src/templates/forwards.rs
// ============================================================================
// Module: Forwarded Member Function Unit
// Description: Re-exposes member functions of the wrapped value.
// Purpose: Render one overload per requested ref-qualifier.
// Dependencies: crate::templates, crate::model
// ============================================================================

//! Forwarded member functions are perfect-forwarding templates. Before
//! C++23 each ref-qualifier gets its own overload; from C++23 a single
//! explicit-object overload covers them all. A wrapping return type
//! constructs that type from the forwarded result.

use crate::model::ClassInfo;
use crate::model::ForwardedMemfn;
use crate::templates::RenderContext;
use crate::templates::Slot;
use crate::templates::TemplateUnit;

/// Registers the forwarding unit.
pub(super) fn register(units: &mut Vec<Box<dyn TemplateUnit>>) {
    units.push(Box::new(ForwardUnit));
}

/// Every forwarded member function, in declaration order.
struct ForwardUnit;

/// One classic (pre-C++23) overload shape.
struct Overload {
    /// Trailing member qualifiers.
    qualifiers: &'static str,
    /// Reference type used in the `decltype` probe.
    probe: &'static str,
    /// Move the value out of `*this` inside the body.
    moved: bool,
}

/// `const` without a ref-qualifier.
const CONST_NO_REF: Overload = Overload {
    qualifiers: " const",
    probe: " const &",
    moved: false,
};
/// `const &`.
const CONST_LVALUE: Overload = Overload {
    qualifiers: " const &",
    probe: " const &",
    moved: false,
};
/// `const &&`.
const CONST_RVALUE: Overload = Overload {
    qualifiers: " const &&",
    probe: " const &&",
    moved: true,
};
/// `&`.
const NONCONST_LVALUE: Overload = Overload {
    qualifiers: " &",
    probe: " &",
    moved: false,
};
/// `&&`.
const NONCONST_RVALUE: Overload = Overload {
    qualifiers: " &&",
    probe: " &&",
    moved: true,
};

impl TemplateUnit for ForwardUnit {
    fn id(&self) -> &str {
        "members.forward"
    }

    fn sort_key(&self) -> &str {
        "forward"
    }

    fn slot(&self) -> Slot {
        Slot::Forwards
    }

    fn applies_to(&self, info: &ClassInfo) -> bool {
        !info.forwards.is_empty()
    }

    fn required_includes(&self) -> &'static [&'static str] {
        &["<utility>"]
    }

    fn render(&self, context: &RenderContext<'_>) -> String {
        let info = context.info;
        let mut out = String::new();
        for memfn in &info.forwards {
            let flags = memfn.qualifiers;
            if flags.deducing_this {
                out.push_str(&render_deducing_this(info, memfn));
                continue;
            }
            for (enabled, overload) in [
                (flags.const_no_ref, &CONST_NO_REF),
                (flags.const_lvalue, &CONST_LVALUE),
                (flags.const_rvalue, &CONST_RVALUE),
                (flags.nonconst_lvalue, &NONCONST_LVALUE),
                (flags.nonconst_rvalue, &NONCONST_RVALUE),
            ] {
                if enabled {
                    out.push_str(&render_overload(info, memfn, overload));
                }
            }
        }
        out
    }
}

/// Renders one ref-qualified overload.
fn render_overload(info: &ClassInfo, memfn: &ForwardedMemfn, overload: &Overload) -> String {
    let cx = info.constexpr_qualifier;
    let value_type = info.underlying_type.as_str();
    let exposed = memfn.exposed_name();
    let call = format!("{}(std::forward<ArgTs>(args)...)", memfn.name);
    let member = info.value_member.as_str();
    let access = if overload.moved { format!("std::move({member})") } else { member.to_string() };
    let (signature_tail, body) = match &memfn.return_type {
        Some(wrap) => (String::new(), format!("return {wrap}({access}.{call});")),
        None => (
            format!("\n    -> decltype(std::declval<{value_type}{}>().{call})", overload.probe),
            format!("return {access}.{call};"),
        ),
    };
    let return_type = memfn.return_type.as_deref().unwrap_or("auto");
    format!(
        "    template <typename... ArgTs>\n    {cx}{return_type} {exposed}(ArgTs && ... args){}{signature_tail}\n    {{\n        {body}\n    }}\n\n",
        overload.qualifiers
    )
}

/// Renders the single C++23 explicit-object overload.
fn render_deducing_this(info: &ClassInfo, memfn: &ForwardedMemfn) -> String {
    let cx = info.constexpr_qualifier;
    let exposed = memfn.exposed_name();
    let call = format!("{}(std::forward<ArgTs>(args)...)", memfn.name);
    let access = format!("std::forward<SelfT>(self).{}", info.value_member);
    match &memfn.return_type {
        Some(wrap) => format!(
            "    template <typename SelfT, typename... ArgTs>\n    {cx}{wrap} {exposed}(this SelfT && self, ArgTs && ... args)\n    {{\n        return {wrap}({access}.{call});\n    }}\n\n"
        ),
        None => format!(
            "    template <typename SelfT, typename... ArgTs>\n    {cx}decltype(auto) {exposed}(this SelfT && self, ArgTs && ... args)\n    {{\n        return {access}.{call};\n    }}\n\n"
        ),
    }
}
