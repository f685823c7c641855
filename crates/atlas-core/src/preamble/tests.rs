// crates/atlas-core/src/preamble/tests.rs
// ============================================================================
// Module: Preamble Unit Tests
// Description: Fragment selection, guards, and include sets.
// ============================================================================

//! ## Overview
//! Validates fragment selection, guard wrapping, and include sets.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions are permitted."
)]

use super::*;

#[test]
fn empty_request_still_emits_baseline() {
    let text = preamble(&BTreeSet::new());
    assert!(text.contains("#ifndef ATLAS_PREAMBLE_STRONG_TYPE_TAG_V1"));
    assert!(text.contains("#ifndef ATLAS_PREAMBLE_VALUE_ACCESS_V1"));
    assert!(text.contains("struct strong_type_tag"));
    assert!(!text.contains("checked_add"));
}

#[test]
fn fragments_are_emitted_once_in_dependency_order() {
    let fragments: BTreeSet<_> = [
        PreambleFragment::Nilable,
        PreambleFragment::ConstraintGuard,
        PreambleFragment::StrongTypeTag,
    ]
    .into_iter()
    .collect();
    let text = preamble(&fragments);
    assert_eq!(text.matches("#define ATLAS_PREAMBLE_STRONG_TYPE_TAG_V1").count(), 1);
    let guard = text.find("ATLAS_PREAMBLE_CONSTRAINT_GUARD_V1").unwrap();
    let nilable = text.find("ATLAS_PREAMBLE_NILABLE_V1").unwrap();
    let value = text.find("ATLAS_PREAMBLE_VALUE_ACCESS_V1").unwrap();
    assert!(value < guard);
    assert!(guard < nilable);
}

#[test]
fn every_guard_is_closed() {
    let all: BTreeSet<_> = [
        PreambleFragment::ArrowStar,
        PreambleFragment::Checked,
        PreambleFragment::Saturating,
        PreambleFragment::Wrapping,
        PreambleFragment::ConstraintGuard,
        PreambleFragment::Nilable,
        PreambleFragment::HashDrill,
        PreambleFragment::OstreamDrill,
        PreambleFragment::IstreamDrill,
        PreambleFragment::FormatDrill,
    ]
    .into_iter()
    .collect();
    let text = preamble(&all);
    for fragment in &all {
        let closing = format!("#endif // {}", fragment.guard());
        assert_eq!(text.matches(&closing).count(), 1, "{closing}");
    }
}

#[test]
fn wrapping_fragment_never_throws() {
    let fragments: BTreeSet<_> = [PreambleFragment::Wrapping].into_iter().collect();
    let text = preamble(&fragments);
    assert!(text.contains("wrapping_add"));
    assert!(!text.contains("throw"));
}

#[test]
fn includes_follow_fragments() {
    let fragments: BTreeSet<_> =
        [PreambleFragment::Checked, PreambleFragment::OstreamDrill].into_iter().collect();
    let includes = preamble_includes(&fragments);
    assert!(includes.contains("<limits>"));
    assert!(includes.contains("<stdexcept>"));
    assert!(includes.contains("<ostream>"));
    assert!(includes.contains("<type_traits>"));
    assert!(!includes.contains("<functional>"));
}

#[test]
fn wrapping_fragment_only_makes_integral_types_unsigned() {
    let fragments: BTreeSet<_> = [PreambleFragment::Wrapping].into_iter().collect();
    let text = preamble(&fragments);
    assert_eq!(text.matches("std::make_unsigned<T>").count(), 1);
    assert!(text.contains("struct wrapping_unsigned_impl<T, true>\n{\n    using type = typename std::make_unsigned<T>::type;"));
    assert!(text.contains("bool = std::is_integral<T>::value && !std::is_same<T, bool>::value>"));
    assert!(text.contains("using wrapping_unsigned = typename wrapping_unsigned_impl<T>::type;"));
}
