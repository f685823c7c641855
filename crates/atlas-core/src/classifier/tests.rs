// crates/atlas-core/src/classifier/tests.rs
// ============================================================================
// Module: Classifier Unit Tests
// Description: Token table, cross-token rules, and forward clause parsing.
// ============================================================================

//! ## Overview
//! Validates token mapping, cross-token resolution, and forward clauses.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions are permitted."
)]

use super::*;
use crate::description::parse_description;
use crate::error::ErrorKind;
use crate::model::TypeKind;

fn target(name: &str) -> TypeDescription {
    TypeDescription {
        kind: TypeKind::Struct,
        namespace: "app".to_string(),
        name: name.to_string(),
        ..TypeDescription::default()
    }
}

fn classify_text(text: &str) -> Classification {
    let spec = parse_description(text).unwrap();
    classify(&spec, &target("Thing"), CppStandard::Cpp11).unwrap()
}

fn classify_err(text: &str) -> AtlasError {
    let spec = parse_description(text).unwrap();
    classify(&spec, &target("Thing"), CppStandard::Cpp11).unwrap_err()
}

#[test]
fn simple_value_type_collects_operators() {
    let result = classify_text("strong int; +, -, ==, !=");
    let info = result.info;
    assert_eq!(info.full_qualified_name, "app::Thing");
    assert_eq!(info.underlying_type, "int");
    assert_eq!(
        info.arithmetic_binary.iter().copied().collect::<Vec<_>>(),
        vec![BinaryOperator::Add, BinaryOperator::Sub]
    );
    assert_eq!(
        info.relational.iter().copied().collect::<Vec<_>>(),
        vec![RelationalOperator::Eq, RelationalOperator::Ne]
    );
    assert!(result.warnings.is_empty());
    assert_eq!(info.description, "strong int; !=, +, -, ==");
}

#[test]
fn unknown_token_is_rejected() {
    let err = classify_err("int; +, frobnicate");
    assert_eq!(err.kind(), ErrorKind::UnknownToken);
    assert!(err.to_string().contains("frobnicate"));
}

#[test]
fn unexpanded_profile_reference_is_rejected() {
    let err = classify_err("int; {NUMERIC}");
    assert_eq!(err.kind(), ErrorKind::UnknownReference);
}

#[test]
fn unary_spellings_normalize() {
    let info = classify_text("int; u+, u-, ~").info;
    assert_eq!(
        info.unary.iter().copied().collect::<Vec<_>>(),
        vec![UnaryOperator::Plus, UnaryOperator::Minus, UnaryOperator::Complement]
    );
}

#[test]
fn spaceship_with_equality_defaults_equality() {
    let result = classify_text("int; <=>, ==");
    assert!(result.info.spaceship);
    assert!(result.info.defaulted_equality);
    assert!(result.info.relational.is_empty());
    assert_eq!(result.info.cpp_standard, CppStandard::Cpp20);
    assert!(result.warnings.is_empty());
}

#[test]
fn spaceship_with_ordering_warns_and_drops_ordering() {
    let result = classify_text("int; <=>, <, >=");
    assert!(result.info.relational.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].code, WarningCode::RedundantOperator);
}

#[test]
fn logical_operators_warn() {
    let result = classify_text("bool; and, ||");
    assert_eq!(result.info.logical.len(), 2);
    assert!(result.warnings.iter().any(|w| w.code == WarningCode::LogicalOperatorOverload));
}

#[test]
fn arithmetic_mode_without_arithmetic_warns() {
    let result = classify_text("unsigned; checked, &");
    assert_eq!(result.info.arithmetic_mode, ArithmeticMode::Checked);
    assert!(result.warnings.iter().any(|w| w.code == WarningCode::UnusedArithmeticMode));
}

#[test]
fn several_modes_pick_one_and_warn() {
    let result = classify_text("int; +, checked, wrapping");
    assert_eq!(result.info.arithmetic_mode, ArithmeticMode::Wrapping);
    assert!(result.warnings.iter().any(|w| w.code == WarningCode::RedundantOperator));
}

#[test]
fn casts_and_includes_are_collected() {
    let info = classify_text("int; cast<long>, explicit_cast<double>, implicit_cast<bool>, #<map>, #\"my.h\"").info;
    assert_eq!(
        info.explicit_casts.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["double", "long"]
    );
    assert!(info.implicit_casts.contains("bool"));
    assert!(info.includes.contains("<map>"));
    assert!(info.includes.contains("\"my.h\""));
}

#[test]
fn malformed_include_is_a_syntax_error() {
    let err = classify_err("int; #map");
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn standard_tokens_take_the_maximum() {
    let info = classify_text("int; c++14, c++17").info;
    assert_eq!(info.cpp_standard, CppStandard::Cpp17);
    assert_eq!(info.constexpr_qualifier, "constexpr ");
}

#[test]
fn unsupported_standard_token_is_unknown() {
    let err = classify_err("int; c++98");
    assert_eq!(err.kind(), ErrorKind::UnknownToken);
}

#[test]
fn no_constexpr_clears_both_qualifiers() {
    let info = classify_text("int; c++17, no-constexpr, hash").info;
    assert_eq!(info.constexpr_qualifier, "");
    assert_eq!(info.hash_constexpr_qualifier, "");
}

#[test]
fn no_constexpr_hash_clears_only_hash() {
    let result = classify_text("int; c++17, no-constexpr-hash, hash");
    assert_eq!(result.info.constexpr_qualifier, "constexpr ");
    assert_eq!(result.info.hash_constexpr_qualifier, "");
    assert!(result.warnings.is_empty());
}

#[test]
fn no_constexpr_hash_without_hash_warns() {
    let result = classify_text("int; no-constexpr-hash");
    assert!(result.warnings.iter().any(|w| w.code == WarningCode::UnusedHashModifier));
}

#[test]
fn bounded_constraint_deletes_default_without_value() {
    let info = classify_text("uint8_t; bounded<0,100>, +, -, checked").info;
    assert_eq!(info.constraint.kind, ConstraintKind::Bounded);
    let bounds = info.constraint.bounds.clone().unwrap();
    assert_eq!((bounds.min.as_str(), bounds.max.as_str()), ("0", "100"));
    assert!(info.delete_default_constructor);
    assert!(info.constraint.message.ends_with("value must be in [0, 100]"));
    assert!(info.includes.contains("<cstdint>"));
}

#[test]
fn bounded_constraint_with_default_value_keeps_default() {
    let spec = parse_description("int; bounded<0,100>").unwrap();
    let mut description = target("Percent");
    description.default_value = Some("50".to_string());
    let info = classify(&spec, &description, CppStandard::Cpp17).unwrap().info;
    assert!(!info.delete_default_constructor);
    assert_eq!(info.default_value.as_deref(), Some("50"));
}

#[test]
fn reversed_bounds_are_accepted() {
    let info = classify_text("int; bounded<10,0>").info;
    assert_eq!(info.constraint.kind, ConstraintKind::Bounded);
}

#[test]
fn bounded_range_message_is_half_open() {
    let info = classify_text("int; bounded_range<0,10>").info;
    assert!(info.constraint.message.ends_with("value must be in [0, 10)"));
}

#[test]
fn bounded_with_one_bound_is_a_syntax_error() {
    let err = classify_err("int; bounded<5>");
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn non_empty_deletes_default_even_with_value() {
    let spec = parse_description("std::string; non_empty").unwrap();
    let mut description = target("Name");
    description.default_value = Some("\"x\"".to_string());
    let info = classify(&spec, &description, CppStandard::Cpp11).unwrap().info;
    assert!(info.delete_default_constructor);
    assert!(info.includes.contains("<string>"));
}

#[test]
fn two_constraints_conflict() {
    let err = classify_err("int; positive, non_zero");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn duplicate_constants_conflict() {
    let spec = parse_description("int; ==").unwrap();
    let mut description = target("Code");
    description.constants = vec![("zero".to_string(), "0".to_string()), ("zero".to_string(), "1".to_string())];
    let err = classify(&spec, &description, CppStandard::Cpp11).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn invalid_name_is_a_syntax_error() {
    let spec = parse_description("int").unwrap();
    let err = classify(&spec, &target("9lives"), CppStandard::Cpp11).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn forward_clause_parses_alias_and_wrap() {
    let forwards = parse_forward_clause("size:length->Count, empty", CppStandard::Cpp17).unwrap();
    assert_eq!(forwards.len(), 2);
    assert_eq!(forwards[0].name, "size");
    assert_eq!(forwards[0].exposed_name(), "length");
    assert_eq!(forwards[0].return_type.as_deref(), Some("Count"));
    assert!(forwards[0].qualifiers.nonconst_rvalue);
    assert_eq!(forwards[1].exposed_name(), "empty");
}

#[test]
fn const_forward_clause_generates_const_only() {
    let forwards = parse_forward_clause("const, size, empty", CppStandard::Cpp17).unwrap();
    assert!(forwards.iter().all(|memfn| memfn.const_only));
    assert!(forwards.iter().all(|memfn| memfn.qualifiers.const_no_ref));
    assert!(forwards.iter().all(|memfn| !memfn.qualifiers.nonconst_lvalue));
}

#[test]
fn cpp23_forwards_use_deducing_this() {
    let forwards = parse_forward_clause("size", CppStandard::Cpp23).unwrap();
    let qualifiers = forwards[0].qualifiers;
    assert!(qualifiers.deducing_this);
    assert!(!qualifiers.const_lvalue);
}

#[test]
fn forward_clause_with_only_const_is_rejected() {
    let err = parse_forward_clause("const", CppStandard::Cpp11).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn duplicate_forward_conflicts() {
    let err = classify_err("std::string; forward=size; forward=length:size");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn recognition_table_matches_substrings() {
    let headers = recognized_headers("std::optional<std::vector<std::uint32_t>>");
    assert!(headers.contains("<optional>"));
    assert!(headers.contains("<vector>"));
    assert!(headers.contains("<cstdint>"));
    assert!(!headers.contains("<string>"));
}
