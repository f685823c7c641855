// crates/atlas-core/src/assembler.rs
// ============================================================================
// Module: Header Assembler
// Description: Frames rendered classes into one self-contained header.
// Purpose: Compute the content guard and lay out includes, preamble, bodies.
// Dependencies: crate::{orchestrator, preamble, hashing, options, model}
// ============================================================================

//! ## Overview
//! A generated header is laid out as:
//! guard open, optional `static_assert` on `__cplusplus`, the notice banner,
//! the conditional `<version>` include, the consolidated includes, the
//! preamble, the class bodies, the specializations, and the guard close.
//!
//! The guard is `PREFIX + SEPARATOR + SHA1(bodies + specializations)`,
//! upper-cased unless disabled. Preamble and includes are not hashed, so
//! identical classes produce identical guards across preamble revisions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::debug;

use crate::diagnostics::Warning;
use crate::hashing::sha1_hex;
use crate::model::CppStandard;
use crate::options::GuardSettings;
use crate::orchestrator::RenderedClass;
use crate::preamble::preamble;
use crate::preamble::preamble_includes;

// ============================================================================
// SECTION: Generated Header
// ============================================================================

/// A complete generated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeader {
    /// Full header text.
    pub text: String,
    /// Include-guard macro.
    pub guard: String,
    /// Non-fatal diagnostics, in generation order.
    pub warnings: Vec<Warning>,
}

/// One `#include` line, optionally behind a preprocessor condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IncludeLine {
    /// `<h>` or `"h"`.
    pub(crate) header: String,
    /// Condition for `#if`, when the header may be unavailable.
    pub(crate) condition: Option<String>,
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Assembles one or more rendered classes into a single header.
///
/// Includes and preamble fragments are unioned across classes; the
/// preamble appears once. Bodies keep the order of `classes`.
#[must_use]
pub fn assemble(
    classes: &[RenderedClass],
    standard: CppStandard,
    guard: &GuardSettings,
) -> GeneratedHeader {
    let mut bodies = String::new();
    let mut specializations = String::new();
    let mut headers: BTreeSet<String> = BTreeSet::new();
    let mut conditions: BTreeMap<String, String> = BTreeMap::new();
    let mut fragments = BTreeSet::new();
    let mut warnings = Vec::new();
    for (index, class) in classes.iter().enumerate() {
        if index > 0 {
            bodies.push('\n');
        }
        bodies.push_str(&class.body);
        specializations.push_str(&class.specializations);
        headers.extend(class.includes.iter().cloned());
        conditions.extend(class.include_guards.iter().map(|(h, c)| (h.clone(), c.clone())));
        fragments.extend(class.preamble.iter().copied());
        warnings.extend(class.warnings.iter().cloned());
    }
    headers.extend(preamble_includes(&fragments));

    let mut hashed = bodies.clone();
    hashed.push_str(&specializations);
    let guard = guard.guard_for(&sha1_hex(hashed.as_bytes()));
    let includes: Vec<IncludeLine> = headers
        .into_iter()
        .map(|header| {
            let condition = conditions.get(&header).cloned();
            IncludeLine {
                header,
                condition,
            }
        })
        .collect();

    let mut content = preamble(&fragments);
    content.push_str(&bodies);
    if !specializations.is_empty() {
        content.push('\n');
        content.push_str(specializations.trim_end_matches('\n'));
        content.push('\n');
    }
    let text = frame_header(&guard, standard, &includes, &content);
    debug!(guard = %guard, classes = classes.len(), bytes = text.len(), "assembled header");
    GeneratedHeader {
        text,
        guard,
        warnings,
    }
}

/// Wraps `content` in the guard, notice banner, and include block.
pub(crate) fn frame_header(
    guard: &str,
    standard: CppStandard,
    includes: &[IncludeLine],
    content: &str,
) -> String {
    let mut out = String::new();
    out.push_str("#ifndef ");
    out.push_str(guard);
    out.push_str("\n#define ");
    out.push_str(guard);
    out.push_str("\n\n");
    if let Some(required) = standard.required_cplusplus() {
        out.push_str(&format!(
            "static_assert(__cplusplus >= {required}L, \"this header requires {standard} or later\");\n\n"
        ));
    }
    out.push_str(&notice_banner());
    out.push_str("#if defined(__has_include)\n#if __has_include(<version>)\n#include <version>\n#endif\n#endif\n\n");
    for include in includes {
        match &include.condition {
            Some(condition) => {
                out.push_str(&format!("#if {condition}\n#include {}\n#endif\n", include.header));
            }
            None => {
                out.push_str("#include ");
                out.push_str(&include.header);
                out.push('\n');
            }
        }
    }
    if !includes.is_empty() {
        out.push('\n');
    }
    out.push_str(content);
    if !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("\n#endif // ");
    out.push_str(guard);
    out.push('\n');
    out
}

/// The notice banner carrying the generator version.
fn notice_banner() -> String {
    let rule = "// ======================================================================\n";
    format!(
        "{rule}// NOTICE: generated by atlas {}. DO NOT EDIT.\n// Regenerate from the source description instead.\n{rule}\n",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests;
