// crates/atlas-core/src/templates/tests.rs
// ============================================================================
// Module: Template Unit Tests
// Description: Registry shape and per-unit rendering.
// ============================================================================

//! ## Overview
//! Validates the unit registry and the text individual units contribute.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions are permitted."
)]

use std::collections::BTreeSet;

use super::*;
use crate::classifier::classify;
use crate::description::parse_description;
use crate::model::CppStandard;
use crate::model::TypeKind;
use crate::options::TypeDescription;

fn info_for(description: &str, standard: CppStandard) -> ClassInfo {
    let target = TypeDescription {
        kind: TypeKind::Struct,
        namespace: "app".to_string(),
        name: "Meters".to_string(),
        ..TypeDescription::default()
    };
    let spec = parse_description(description).unwrap();
    classify(&spec, &target, standard).unwrap().info
}

fn unit(id: &str) -> &'static dyn TemplateUnit {
    registry().iter().map(|unit| &**unit).find(|unit| unit.id() == id).unwrap()
}

fn render_unit(id: &str, info: &ClassInfo) -> String {
    let partials = BTreeMap::new();
    unit(id).render(&RenderContext {
        info,
        partials: &partials,
    })
}

// ============================================================================
// SECTION: Registry
// ============================================================================

#[test]
fn unit_ids_are_unique() {
    let ids: Vec<&str> = registry().iter().map(|unit| unit.id()).collect();
    let unique: BTreeSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn exactly_one_skeleton_unit() {
    let skeletons = registry().iter().filter(|unit| unit.slot() == Slot::Skeleton).count();
    assert_eq!(skeletons, 1);
}

#[test]
fn bitwise_operators_only_have_default_units() {
    assert!(registry().iter().any(|unit| unit.id() == "operators.arithmetic.bitwise_and.default"));
    assert!(!registry().iter().any(|unit| unit.id() == "operators.arithmetic.bitwise_and.checked"));
    assert!(!registry().iter().any(|unit| unit.id() == "operators.arithmetic.shift_left.wrapping"));
}

#[test]
fn wrapping_division_falls_back_to_default() {
    assert!(!registry().iter().any(|unit| unit.id() == "operators.arithmetic.division.wrapping"));
    assert!(registry().iter().any(|unit| unit.id() == "operators.arithmetic.division.checked"));
    let info = info_for("int; /, wrapping", CppStandard::Cpp11);
    assert!(unit("operators.arithmetic.division.default").applies_to(&info));
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

#[test]
fn string_literals_escape_quotes_and_backslashes() {
    assert_eq!(cpp_string_literal(r#"a "b" \c"#), r#""a \"b\" \\c""#);
}

#[test]
fn guarded_is_identity_without_constraint() {
    let info = info_for("int; +", CppStandard::Cpp11);
    assert_eq!(guarded(&info, "x"), "x");
    assert_eq!(guarded_assignment(&info, "lhs.value", "y"), "lhs.value = y;");
}

#[test]
fn guarded_wraps_constrained_expressions() {
    let info = info_for("int; positive", CppStandard::Cpp14);
    let wrapped = guarded(&info, "x");
    assert!(wrapped.starts_with("atlas::atlas_detail::checked_value<atlas_constraint>(x, \""));
    assert!(wrapped.contains("must be positive"));
}

// ============================================================================
// SECTION: Unit Rendering
// ============================================================================

#[test]
fn checked_addition_calls_the_checked_helper() {
    let info = info_for("int; +, checked", CppStandard::Cpp14);
    let text = render_unit("operators.arithmetic.addition.checked", &info);
    assert!(text.contains("atlas::atlas_detail::checked_add(lhs.value, rhs.value)"));
    assert!(text.contains("friend constexpr Meters & operator+=(Meters & lhs, Meters const & rhs)"));
    assert!(text.contains("friend constexpr Meters operator+(Meters lhs, Meters const & rhs)"));
}

#[test]
fn relational_cluster_renders_requested_operators_only() {
    let info = info_for("int; ==, <", CppStandard::Cpp11);
    let text = render_unit("operators.relational", &info);
    assert!(text.contains("bool operator==(Meters const & lhs, Meters const & rhs)"));
    assert!(text.contains("bool operator<(Meters const & lhs, Meters const & rhs)"));
    assert!(!text.contains("operator!="));
}

#[test]
fn spaceship_is_defaulted() {
    let info = info_for("int; <=>", CppStandard::Cpp11);
    let text = render_unit("operators.spaceship", &info);
    assert!(text.contains("friend auto operator<=>(Meters const &, Meters const &) = default;"));
    assert_eq!(unit("operators.spaceship").required_includes(), &["<compare>"]);
}

#[test]
fn hash_specialization_uses_the_qualified_name() {
    let info = info_for("int; hash", CppStandard::Cpp14);
    let text = render_unit("specializations.hash", &info);
    assert!(text.starts_with("namespace std {\ntemplate <>\nstruct hash<app::Meters>\n"));
    assert!(text.contains("atlas::atlas_detail::hash_drill(t)"));
}

#[test]
fn bounded_constraint_renders_bounds_accessors() {
    let info = info_for("int; bounded<0,100>", CppStandard::Cpp14);
    let text = render_unit("constraints.bounded", &info);
    assert!(text.contains("static constexpr atlas_value_type atlas_bound_min()"));
    assert!(text.contains("return atlas_value_type(0);"));
    assert!(text.contains("return atlas_value_type(100);"));
    assert!(text.contains("using atlas_constraint = atlas::constraints::bounded<Meters>;"));
}

#[test]
fn non_null_constraint_requires_the_nilable_fragment() {
    let info = info_for("int*; non_null", CppStandard::Cpp11);
    let constraint = unit("constraints.non_null");
    assert!(constraint.applies_to(&info));
    assert!(constraint.required_preamble().contains(&PreambleFragment::Nilable));
    assert!(!unit("constraints.positive").applies_to(&info));
}

#[test]
fn forwarded_member_uses_ref_qualified_overloads_before_cpp23() {
    let info = info_for("std::string; forward=size", CppStandard::Cpp17);
    let text = render_unit("members.forward", &info);
    assert!(text.contains("auto size(ArgTs && ... args) const &"));
    assert!(text.contains("auto size(ArgTs && ... args) &&"));
    assert!(!text.contains("this SelfT"));
}

#[test]
fn forwarded_member_uses_deducing_this_at_cpp23() {
    let info = info_for("std::string; forward=size:length", CppStandard::Cpp23);
    let text = render_unit("members.forward", &info);
    assert!(text.contains("decltype(auto) length(this SelfT && self, ArgTs && ... args)"));
    assert!(text.contains("std::forward<SelfT>(self).value.size("));
}

#[test]
fn constants_are_functions_before_cpp17() {
    let mut info = info_for("int; ==", CppStandard::Cpp14);
    info.constants.insert("zero".to_string(), "0".to_string());
    let declarations = render_unit("constants.declaration", &info);
    assert!(declarations.contains("static constexpr Meters zero()"));
    assert!(!unit("constants.definition").applies_to(&info));
}

#[test]
fn constants_are_inline_variables_from_cpp17() {
    let mut info = info_for("int; ==", CppStandard::Cpp17);
    info.constants.insert("zero".to_string(), "0".to_string());
    assert!(render_unit("constants.declaration", &info).contains("static Meters const zero;"));
    assert!(
        render_unit("constants.definition", &info)
            .contains("inline constexpr Meters Meters::zero = Meters(0);")
    );
}

#[test]
fn skeleton_deletes_default_constructor_for_non_empty() {
    let info = info_for("std::string; non_empty", CppStandard::Cpp17);
    let text = render_unit("class.skeleton", &info);
    assert!(text.contains("    Meters() = delete;\n"));
    assert!(text.starts_with("namespace app {\n// app::Meters: std::string; non_empty\nstruct Meters\n"));
    assert!(text.ends_with("};\n} // namespace app\n"));
}

#[test]
fn skeleton_nests_namespaces_before_cpp17() {
    let target = TypeDescription {
        namespace: "outer::inner".to_string(),
        name: "Id".to_string(),
        ..TypeDescription::default()
    };
    let spec = parse_description("int").unwrap();
    let info = classify(&spec, &target, CppStandard::Cpp14).unwrap().info;
    let text = render_unit("class.skeleton", &info);
    assert!(text.starts_with("namespace outer {\nnamespace inner {\n"));
    assert!(text.ends_with("} } // namespace outer::inner\n"));
}

#[test]
fn class_kind_opens_a_public_section() {
    let target = TypeDescription {
        kind: TypeKind::Class,
        namespace: String::new(),
        name: "Secret".to_string(),
        ..TypeDescription::default()
    };
    let spec = parse_description("int").unwrap();
    let info = classify(&spec, &target, CppStandard::Cpp20).unwrap().info;
    let text = render_unit("class.skeleton", &info);
    assert!(text.starts_with("// Secret: int\nclass Secret\n: private atlas::strong_type_tag\n{\n    int value{};\n\npublic:\n"));
    assert!(text.contains("requires (std::is_constructible_v<int, ArgTs...>)"));
}

#[test]
fn address_of_is_not_constexpr_before_cpp17() {
    let info = info_for("int; &of", CppStandard::Cpp14);
    let text = render_unit("members.address_of", &info);
    assert!(text.contains("    int const * operator&() const\n"));
    assert!(text.contains("    int * operator&()\n"));
    assert!(!text.contains("constexpr int * operator&"));
    assert!(!text.contains("constexpr int const * operator&"));
}

#[test]
fn address_of_is_constexpr_from_cpp17() {
    let info = info_for("int; &of", CppStandard::Cpp17);
    let text = render_unit("members.address_of", &info);
    assert!(text.contains("constexpr int const * operator&() const"));
    assert!(text.contains("constexpr int * operator&()"));
}

#[test]
fn skeleton_initializes_and_exposes_the_value_member() {
    let target = TypeDescription {
        kind: TypeKind::Struct,
        namespace: "app".to_string(),
        name: "Level".to_string(),
        default_value: Some("7".to_string()),
        ..TypeDescription::default()
    };
    let spec = parse_description("int").unwrap();
    let info = classify(&spec, &target, CppStandard::Cpp17).unwrap().info;
    let text = render_unit("class.skeleton", &info);
    assert!(text.contains("    int value;\n"));
    assert!(text.contains("    : value(atlas_value_type(7))\n"));
    assert!(text.contains("    : value(std::forward<ArgTs>(args)...)\n"));
    assert!(text.contains("        return self.value;\n"));
}

#[test]
fn value_member_name_flows_through_every_unit() {
    let mut info = info_for("int; +, ==, <, ++, u-, !, bool, in, &of", CppStandard::Cpp17);
    info.value_member = "raw".to_string();
    let body = crate::orchestrator::render_class(&info).body;
    assert!(body.contains("    int raw{};\n"));
    assert!(body.contains("lhs.raw += rhs.raw;"));
    assert!(body.contains("return lhs.raw == rhs.raw;"));
    assert!(body.contains("return lhs.raw < rhs.raw;"));
    assert!(body.contains("++self.raw;"));
    assert!(body.contains("return Meters(-self.raw);"));
    assert!(body.contains("return !static_cast<bool>(self.raw);"));
    assert!(body.contains("return static_cast<bool>(raw);"));
    assert!(body.contains("istream_drill(is, self.raw)"));
    assert!(body.contains("return std::addressof(raw);"));
    assert!(body.contains("return self.raw;"));
    for stale in ["self.value", "lhs.value", "rhs.value", "(value)", "return value;"] {
        assert!(!body.contains(stale), "{stale}");
    }
}

#[test]
fn forwarded_members_use_the_value_member_name() {
    let mut info = info_for("std::string; forward=size", CppStandard::Cpp17);
    info.value_member = "raw".to_string();
    let text = render_unit("members.forward", &info);
    assert!(text.contains("return raw.size(std::forward<ArgTs>(args)...);"));
    assert!(text.contains("return std::move(raw).size(std::forward<ArgTs>(args)...);"));
    let mut info = info_for("std::string; forward=size", CppStandard::Cpp23);
    info.value_member = "raw".to_string();
    let text = render_unit("members.forward", &info);
    assert!(text.contains("std::forward<SelfT>(self).raw.size("));
}
