// crates/atlas-core/src/assembler/tests.rs
// ============================================================================
// Module: Header Assembler Unit Tests
// Description: Header framing, guard derivation, and include consolidation.
// ============================================================================

//! ## Overview
//! Validates the layout of assembled headers.

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
use crate::options::TypeDescription;
use crate::orchestrator::render_class;

fn rendered(name: &str, description: &str, standard: CppStandard) -> RenderedClass {
    let target = TypeDescription {
        namespace: "app".to_string(),
        name: name.to_string(),
        ..TypeDescription::default()
    };
    let spec = parse_description(description).unwrap();
    render_class(&classify(&spec, &target, standard).unwrap().info)
}

#[test]
fn guard_is_derived_from_the_class_text() {
    let class = rendered("UserId", "strong int; +, -, ==, !=", CppStandard::Cpp11);
    let header = assemble(std::slice::from_ref(&class), CppStandard::Cpp11, &GuardSettings::default());
    let expected = format!("ATLAS_{}", sha1_hex(class.body.as_bytes()).to_ascii_uppercase());
    assert_eq!(header.guard, expected);
    assert!(header.text.starts_with(&format!("#ifndef {expected}\n#define {expected}\n")));
    assert!(header.text.ends_with(&format!("#endif // {expected}\n")));
}

#[test]
fn guard_case_is_kept_when_upcase_is_off() {
    let class = rendered("UserId", "int", CppStandard::Cpp11);
    let settings = GuardSettings {
        prefix: "my".to_string(),
        separator: "__".to_string(),
        upcase: false,
    };
    let header = assemble(&[class], CppStandard::Cpp11, &settings);
    assert!(header.guard.starts_with("my__"));
    assert!(header.guard[4..].chars().all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase()));
}

#[test]
fn cpp11_headers_carry_no_static_assert() {
    let header = assemble(&[rendered("A", "int", CppStandard::Cpp11)], CppStandard::Cpp11, &GuardSettings::default());
    assert!(!header.text.contains("static_assert(__cplusplus"));
}

#[test]
fn newer_standards_assert_cplusplus() {
    let header = assemble(&[rendered("A", "int", CppStandard::Cpp17)], CppStandard::Cpp17, &GuardSettings::default());
    assert!(header.text.contains("static_assert(__cplusplus >= 201703L"));
}

#[test]
fn banner_and_version_probe_precede_includes() {
    let header = assemble(&[rendered("A", "int; hash", CppStandard::Cpp14)], CppStandard::Cpp14, &GuardSettings::default());
    let text = &header.text;
    let notice = text.find("DO NOT EDIT").unwrap();
    let version = text.find("#if __has_include(<version>)").unwrap();
    let functional = text.find("#include <functional>").unwrap();
    let preamble = text.find("#ifndef ATLAS_PREAMBLE_STRONG_TYPE_TAG_V1").unwrap();
    assert!(notice < version && version < functional && functional < preamble);
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn includes_are_sorted_and_unique() {
    let a = rendered("A", "std::string; hash", CppStandard::Cpp17);
    let b = rendered("B", "std::string; hash", CppStandard::Cpp17);
    let header = assemble(&[a, b], CppStandard::Cpp17, &GuardSettings::default());
    let includes: Vec<&str> = header
        .text
        .lines()
        .filter(|line| line.starts_with("#include <") && *line != "#include <version>")
        .collect();
    let mut sorted = includes.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(includes, sorted);
    assert_eq!(header.text.matches("#include <string>\n").count(), 1);
}

#[test]
fn guarded_includes_are_wrapped_in_their_condition() {
    let class = rendered("Label", "std::string; fmt", CppStandard::Cpp20);
    let header = assemble(&[class], CppStandard::Cpp20, &GuardSettings::default());
    assert!(header.text.contains(
        "#if defined(__cpp_lib_format) && __cpp_lib_format >= 201907L\n#include <format>\n#endif\n"
    ));
}

#[test]
fn multi_type_headers_share_one_preamble_and_guard() {
    let a = rendered("A", "int; hash", CppStandard::Cpp14);
    let b = rendered("B", "int; hash", CppStandard::Cpp14);
    let header = assemble(&[a.clone(), b.clone()], CppStandard::Cpp14, &GuardSettings::default());
    assert_eq!(header.text.matches("#define ATLAS_PREAMBLE_STRONG_TYPE_TAG_V1").count(), 1);
    assert_eq!(header.text.matches("struct hash<").count(), 2);
    let reordered = assemble(&[b, a], CppStandard::Cpp14, &GuardSettings::default());
    assert_ne!(header.guard, reordered.guard);
}

#[test]
fn specializations_follow_all_bodies() {
    let a = rendered("A", "int; hash", CppStandard::Cpp14);
    let b = rendered("B", "int", CppStandard::Cpp14);
    let header = assemble(&[a, b], CppStandard::Cpp14, &GuardSettings::default());
    let body_b = header.text.find("struct B\n").unwrap();
    let hash_a = header.text.find("struct hash<app::A>").unwrap();
    assert!(body_b < hash_a);
}
