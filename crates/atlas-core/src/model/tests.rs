// crates/atlas-core/src/model/tests.rs
// ============================================================================
// Module: Class Model Unit Tests
// Description: Ordering and lookup rules of the operator enums.
// ============================================================================

//! ## Overview
//! Validates operator ordering and symbol lookup in the class model.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions are permitted."
)]

use std::collections::BTreeSet;

use super::*;

#[test]
fn binary_operators_iterate_in_canonical_order() {
    let set: BTreeSet<BinaryOperator> = [">>", "^", "+", "%", "-"]
        .iter()
        .filter_map(|symbol| BinaryOperator::from_symbol(symbol))
        .collect();
    let symbols: Vec<&str> = set.iter().map(|op| op.symbol()).collect();
    assert_eq!(symbols, vec!["+", "-", "%", "^", ">>"]);
}

#[test]
fn relational_operators_iterate_in_canonical_order() {
    let set: BTreeSet<RelationalOperator> = [">=", "<", "!=", "=="]
        .iter()
        .filter_map(|symbol| RelationalOperator::from_symbol(symbol))
        .collect();
    let symbols: Vec<&str> = set.iter().map(|op| op.symbol()).collect();
    assert_eq!(symbols, vec!["==", "!=", "<", ">="]);
}

#[test]
fn bitwise_operators_collapse_modes() {
    assert_eq!(BinaryOperator::BitXor.effective_mode(ArithmeticMode::Checked), ArithmeticMode::Default);
    assert_eq!(BinaryOperator::Shl.effective_mode(ArithmeticMode::Saturating), ArithmeticMode::Default);
    assert_eq!(BinaryOperator::Add.effective_mode(ArithmeticMode::Checked), ArithmeticMode::Checked);
}

#[test]
fn wrapping_division_falls_back_to_default() {
    assert_eq!(BinaryOperator::Div.effective_mode(ArithmeticMode::Wrapping), ArithmeticMode::Default);
    assert_eq!(BinaryOperator::Rem.effective_mode(ArithmeticMode::Wrapping), ArithmeticMode::Default);
    assert_eq!(BinaryOperator::Mul.effective_mode(ArithmeticMode::Wrapping), ArithmeticMode::Wrapping);
}

#[test]
fn cpp_standard_parsing() {
    assert_eq!(CppStandard::parse("17"), Some(CppStandard::Cpp17));
    assert_eq!(CppStandard::parse("C++20"), Some(CppStandard::Cpp20));
    assert_eq!(CppStandard::parse("c++23"), Some(CppStandard::Cpp23));
    assert_eq!(CppStandard::parse("98"), None);
    assert_eq!(CppStandard::parse("c++"), None);
    assert_eq!(CppStandard::Cpp11.required_cplusplus(), None);
    assert_eq!(CppStandard::Cpp20.required_cplusplus(), Some(202_002));
}

#[test]
fn full_name_omits_global_namespace() {
    let info = ClassInfo::new(TypeKind::Struct, "", "Meters", "double", CppStandard::Cpp17);
    assert_eq!(info.full_qualified_name, "Meters");
    let info = ClassInfo::new(TypeKind::Class, "units::si", "Meters", "double", CppStandard::Cpp11);
    assert_eq!(info.full_qualified_name, "units::si::Meters");
    assert_eq!(info.constexpr_qualifier, "");
}
