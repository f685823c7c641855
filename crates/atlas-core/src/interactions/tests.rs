// crates/atlas-core/src/interactions/tests.rs
// ============================================================================
// Module: Interaction Generator Unit Tests
// Description: Free operators, value overloads, and compound helpers.
// ============================================================================

//! ## Overview
//! Validates the text rendered for interaction files.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions are permitted."
)]

use super::*;
use crate::interaction_file::parse_interaction_file;
use crate::options::GeneratorOptions;

fn render(content: &str) -> GeneratedHeader {
    let file = parse_interaction_file(content, "ops.atlas", &GeneratorOptions::default()).unwrap();
    render_interactions(&file)
}

#[test]
fn plain_interaction_unwraps_both_operands() {
    let header = render("namespace=physics\nDistance / Time -> Velocity\n");
    assert!(header.text.contains(
        "namespace physics {\nconstexpr Velocity operator/(Distance const & lhs, Time const & rhs)\n{\n    return Velocity(atlas::value(lhs) / atlas::value(rhs));\n}\n"
    ));
    assert!(header.text.contains("} // namespace physics\n"));
    assert!(!header.text.contains("operator/=("));
    assert!(header.warnings.is_empty());
}

#[test]
fn symmetric_interaction_adds_the_reversed_overload() {
    let header = render("Distance * Time <-> Velocity\n");
    assert!(header.text.contains("Velocity operator*(Distance const & lhs, Time const & rhs)"));
    assert!(header.text.contains("Velocity operator*(Time const & lhs, Distance const & rhs)"));
}

#[test]
fn symmetric_interaction_with_equal_operands_is_rendered_once() {
    let header = render("Meters * Meters <-> Area\n");
    assert_eq!(header.text.matches("Area operator*(Meters const & lhs, Meters const & rhs)").count(), 1);
}

#[test]
fn result_equal_to_left_operand_gets_a_compound_operator() {
    let header = render("cpp_standard=14\nDistance * double -> Distance\n");
    assert!(header.text.contains(
        "constexpr Distance & operator*=(Distance & lhs, double const & rhs)\n{\n    return atlas::compound_multiplication(lhs, rhs);\n}\n"
    ));
}

#[test]
fn compound_operator_is_inline_before_cpp14() {
    let header = render("Distance + Distance -> Distance\n");
    assert!(header.text.contains("inline Distance & operator+=(Distance & lhs, Distance const & rhs)"));
    assert!(header.text.contains("constexpr Distance operator+(Distance const & lhs, Distance const & rhs)"));
}

#[test]
fn no_constexpr_switches_to_inline() {
    let header = render("no-constexpr\nA - B -> C\n");
    assert!(header.text.contains("inline C operator-(A const & lhs, B const & rhs)"));
}

#[test]
fn compound_helper_is_emitted_per_symbol_in_use() {
    let header = render("A * B -> C\nD * E -> F\nA == B -> bool\n");
    assert_eq!(header.text.matches("struct has_compound_multiplication\n").count(), 1);
    assert!(header.text.contains("compound_multiplication(L & lhs, R const & rhs)"));
    assert!(header.text.contains("    result *= atlas::value(rhs);\n    lhs = L(result);\n"));
    assert!(header.text.contains("    lhs = L(lhs * rhs);\n"));
    assert!(!header.text.contains("has_compound_equal"));
}

#[test]
fn compound_helpers_detect_on_underlying_values() {
    let header = render("A * B -> A\nA + B -> A\n");
    assert_eq!(header.text.matches("using compound_value_t =").count(), 1);
    assert!(header.text.contains(
        "void(std::declval<compound_value_t<L> &>() *= atlas::value(std::declval<R const &>())),\n        void(L(std::declval<compound_value_t<L>>())))>"
    ));
    assert!(header.text.contains("    atlas_detail::compound_value_t<L> result = atlas::value(lhs);\n"));
    let alias = header.text.find("using compound_value_t =").unwrap();
    let helper = header.text.find("struct has_compound_multiplication\n").unwrap();
    assert!(alias < helper);
}

#[test]
fn compound_operators_delegate_to_the_helpers() {
    let header = render("A * B -> A\nA + B -> A\n");
    let helper = header.text.find("compound_addition(L & lhs, R const & rhs)").unwrap();
    let operator = header.text.find("A & operator+=(A & lhs, B const & rhs)\n{\n    return atlas::compound_addition(lhs, rhs);\n}").unwrap();
    assert!(helper < operator);
    assert!(header.text.contains("A & operator*=(A & lhs, B const & rhs)\n{\n    return atlas::compound_multiplication(lhs, rhs);\n}"));
    assert!(!header.text.contains("    lhs = lhs * rhs;\n"));
}

#[test]
fn value_access_overloads_plain_operands() {
    let header = render("value_access=.count\nDuration + std::chrono::seconds -> Duration\n");
    assert!(header.text.contains(
        "constexpr auto\natlas_value(std::chrono::seconds const & v, value_tag)\n-> decltype(v.count())\n{\n    return v.count();\n}\n"
    ));
    assert!(!header.text.contains("atlas_value(Duration const & v"));
}

#[test]
fn arrow_value_access_calls_through_the_pointer() {
    let header = render("value_access=->get()\nHandle + Ptr -> Handle\n");
    assert!(header.text.contains("atlas_value(Ptr const & v, value_tag)\n-> decltype(v->get())\n{\n    return v->get();\n}"));
}

#[test]
fn function_value_access_calls_the_function() {
    let header = render("lhs_value_access=raw\nHandle + int -> Handle\n");
    assert!(header.text.contains("atlas_value(Handle const & v, value_tag)\n-> decltype(raw(v))"));
}

#[test]
fn conflicting_value_access_warns_and_keeps_the_first() {
    let header = render("value_access=.count\nA + Sec -> A\nvalue_access=.ticks\nB + Sec -> B\n");
    assert_eq!(header.warnings.len(), 1);
    assert_eq!(header.warnings[0].code, WarningCode::DuplicateValueAccess);
    assert!(header.text.contains("decltype(v.count())"));
    assert!(!header.text.contains("v.ticks()"));
}

#[test]
fn concept_only_constraint_uses_a_constrained_parameter() {
    let header = render("concept=std::floating_point S\nDistance * S -> Distance\n");
    assert!(header.text.contains("template <std::floating_point S>\nconstexpr Distance operator*(Distance const & lhs, S const & rhs)"));
    assert!(!header.text.contains("__cpp_concepts"));
}

#[test]
fn dual_constraint_selects_by_feature_test() {
    let content = "concept=std::integral N\nenable_if=std::is_integral<N>::value\nCount * N -> Count\n";
    let header = render(content);
    assert!(header.text.contains(
        "#if defined(__cpp_concepts) && __cpp_concepts >= 201907L\ntemplate <std::integral N>\n#else\ntemplate <typename N, typename std::enable_if<(std::is_integral<N>::value), bool>::type = true>\n#endif\n"
    ));
}

#[test]
fn namespaces_group_in_first_use_order() {
    let header = render("namespace=b\nX + Y -> X\nnamespace=a\nX - Y -> X\nnamespace=b\nX * Y -> X\n");
    let b = header.text.find("namespace b {").unwrap();
    let a = header.text.find("namespace a {").unwrap();
    assert!(b < a);
    assert_eq!(header.text.matches("namespace b {").count(), 1);
}

#[test]
fn nested_namespaces_split_before_cpp17() {
    let header = render("namespace=units::si\nA + B -> A\n");
    assert!(header.text.contains("namespace units { namespace si {\n"));
    assert!(header.text.contains("} } // namespace units::si\n"));
}

#[test]
fn user_includes_precede_baseline_includes() {
    let header = render("include <chrono>\ninclude <utility>\nA + B -> A\n");
    let chrono = header.text.find("#include <chrono>").unwrap();
    let traits = header.text.find("#include <type_traits>").unwrap();
    assert!(chrono < traits);
    assert_eq!(header.text.matches("#include <utility>\n").count(), 1);
}

#[test]
fn guard_hashes_the_body() {
    let first = render("A + B -> A\n");
    let second = render("A + B -> A\n");
    let third = render("A - B -> A\n");
    assert_eq!(first.text, second.text);
    assert_ne!(first.guard, third.guard);
    assert!(first.text.ends_with(&format!("#endif // {}\n", first.guard)));
}
