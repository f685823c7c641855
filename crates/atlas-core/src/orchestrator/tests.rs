// crates/atlas-core/src/orchestrator/tests.rs
// ============================================================================
// Module: Orchestrator Unit Tests
// Description: Unit selection, partial ordering, and late arithmetic splicing.
// ============================================================================

//! ## Overview
//! Validates how the orchestrator composes unit output into one class.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions are permitted."
)]

use super::*;
use crate::classifier::classify;
use crate::description::parse_description;
use crate::model::CppStandard;
use crate::options::TypeDescription;

fn render(description: &str, standard: CppStandard) -> RenderedClass {
    let target = TypeDescription {
        namespace: "app".to_string(),
        name: "UserId".to_string(),
        ..TypeDescription::default()
    };
    let spec = parse_description(description).unwrap();
    render_class(&classify(&spec, &target, standard).unwrap().info)
}

fn position(body: &str, needle: &str) -> usize {
    body.find(needle).unwrap_or_else(|| panic!("`{needle}` not found in:\n{body}"))
}

#[test]
fn minimal_class_has_constructors_and_conversion_only() {
    let rendered = render("strong int", CppStandard::Cpp11);
    let body = &rendered.body;
    assert!(body.contains("    int value{};\n"));
    assert!(body.contains("    UserId() = default;\n"));
    assert!(body.contains("explicit UserId(ArgTs && ... args)"));
    assert!(body.contains("explicit operator int const &() const"));
    assert!(!body.contains(" operator+"));
    assert!(!body.contains(" operator=="));
    assert!(rendered.specializations.is_empty());
    assert!(rendered.preamble.contains(&PreambleFragment::StrongTypeTag));
}

#[test]
fn arithmetic_follows_operator_order() {
    let body = render("int; -, +, *", CppStandard::Cpp14).body;
    let add = position(&body, "operator+=(");
    let sub = position(&body, "operator-=(");
    let mul = position(&body, "operator*=(");
    assert!(add < sub && sub < mul);
}

#[test]
fn default_mode_arithmetic_sits_after_value_access() {
    let body = render("int; +, ==", CppStandard::Cpp14).body;
    let value_access = position(&body, "atlas_value(UserId const & self, atlas::value_tag)");
    let add = position(&body, "operator+=(");
    let eq = position(&body, "operator==(");
    assert!(value_access < add && add < eq);
}

#[test]
fn non_default_mode_arithmetic_precedes_every_friend() {
    let rendered = render("int; +, ==, checked", CppStandard::Cpp14);
    let body = &rendered.body;
    let first_friend = position(body, "    friend ");
    assert!(body[first_friend..].starts_with("    friend constexpr UserId & operator+=("));
    assert!(position(body, "operator+=(") < position(body, "atlas_value(UserId const & self"));
    assert_eq!(body.matches("operator+=(").count(), 1);
    assert!(rendered.preamble.contains(&PreambleFragment::Checked));
}

#[test]
fn logical_operators_follow_operator_order() {
    let rendered = render("bool; ||, &&", CppStandard::Cpp14);
    let and = position(&rendered.body, "operator&&(");
    let or = position(&rendered.body, "operator||(");
    assert!(and < or);
}

#[test]
fn specializations_are_kept_out_of_the_body() {
    let rendered = render("int; hash", CppStandard::Cpp14);
    assert!(!rendered.body.contains("struct hash<"));
    assert!(rendered.specializations.contains("struct hash<app::UserId>"));
    assert!(rendered.includes.contains("<functional>"));
    assert!(rendered.preamble.contains(&PreambleFragment::HashDrill));
}

#[test]
fn recognized_headers_flow_into_includes() {
    let rendered = render("std::vector<int>; iterable", CppStandard::Cpp17);
    assert!(rendered.includes.contains("<vector>"));
    assert!(rendered.includes.contains("<iterator>"));
}

#[test]
fn redundant_cast_warning_is_collected() {
    let rendered = render("int; cast<long>, implicit_cast<long>", CppStandard::Cpp14);
    assert_eq!(rendered.warnings.len(), 1);
    assert!(!rendered.body.contains("explicit constexpr operator long()"));
    assert!(rendered.body.contains("constexpr operator long() const"));
}

#[test]
fn rendering_is_deterministic() {
    let first = render("int; +, -, *, /, ==, <, hash, ++, checked", CppStandard::Cpp17);
    let second = render("int; +, -, *, /, ==, <, hash, ++, checked", CppStandard::Cpp17);
    assert_eq!(first, second);
}
