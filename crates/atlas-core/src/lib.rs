// crates/atlas-core/src/lib.rs
// ============================================================================
// Module: Atlas Core Library
// Description: Strong-type C++ header generator.
// Purpose: Parse strong-type and interaction descriptions and render
//          deterministic, content-guarded C++ headers.
// Dependencies: sha1, thiserror, tracing
// ============================================================================

//! ## Overview
//! Atlas turns short textual descriptions such as
//! `strong int; +, -, ==, hash` into self-contained C++ headers declaring
//! nominal wrapper types with exactly the requested operators and features.
//! A second input format declares operators between distinct wrappers
//! (`Distance * Time <-> Velocity`).
//!
//! The pipeline is a pure transformation:
//! text → [`ParsedSpecification`] → profile expansion → [`ClassInfo`] →
//! template units → [`GeneratedHeader`].
//!
//! ### Design Notes
//! - Output is byte-for-byte deterministic: every emission point iterates
//!   sorted containers or declaration-ordered lists.
//! - Include guards are content addressed (`ATLAS_<SHA1 of the bodies>`).
//! - Non-fatal findings are returned as [`Warning`] values and logged with
//!   `tracing`; the library never installs a subscriber.
//! - File input is capped at [`MAX_INPUT_BYTES`] and must be UTF-8.
//!
//! ## Index
//! - Single type: [`generate_type`]
//! - Type files: [`parse_type_file`], [`parse_type_file_path`], [`render_type_file`],
//!   [`render_types_file`]
//! - Interaction files: [`parse_interaction_file`], [`parse_interaction_file_path`],
//!   [`render_interactions`]
//! - Building blocks: [`parse_description`], [`ProfileRegistry`], [`classify`],
//!   [`render_class`], [`assemble`], [`preamble`]
//! - Errors and diagnostics: [`AtlasError`], [`ErrorKind`], [`Warning`], [`WarningCode`]

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assembler;
pub mod classifier;
pub mod description;
pub mod diagnostics;
pub mod error;
pub mod hashing;
mod input;
pub mod interaction_file;
pub mod interactions;
pub mod model;
pub mod options;
pub mod orchestrator;
pub mod preamble;
pub mod profiles;
pub mod templates;
pub mod text;
pub mod type_file;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use assembler::GeneratedHeader;
pub use assembler::assemble;
pub use classifier::Classification;
pub use classifier::classify;
pub use description::ParsedSpecification;
pub use description::parse_description;
pub use diagnostics::Warning;
pub use diagnostics::WarningCode;
pub use error::AtlasError;
pub use error::ErrorKind;
pub use error::SourceLocation;
pub use hashing::sha1_hex;
pub use input::MAX_INPUT_BYTES;
pub use interaction_file::Interaction;
pub use interaction_file::InteractionFile;
pub use interaction_file::TypeConstraint;
pub use interaction_file::parse_interaction_file;
pub use interaction_file::parse_interaction_file_path;
pub use interactions::render_interactions;
pub use model::ArithmeticMode;
pub use model::ClassInfo;
pub use model::ConstraintKind;
pub use model::CppStandard;
pub use model::TypeKind;
pub use options::GeneratorOptions;
pub use options::GuardSettings;
pub use options::TypeDescription;
pub use orchestrator::RenderedClass;
pub use orchestrator::render_class;
pub use preamble::PreambleFragment;
pub use preamble::preamble;
pub use profiles::ProfileRegistry;
pub use type_file::TypeFile;
pub use type_file::parse_type_file;
pub use type_file::parse_type_file_path;

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Generates the header for one wrapper described outside of a type file.
///
/// `options.default_namespace` applies when `target.namespace` is empty.
/// Profile references cannot be resolved here and fail as unknown
/// references.
///
/// # Errors
/// Returns [`AtlasError`] when the description is malformed or cannot be
/// classified.
///
/// # Examples
/// ```
/// use atlas_core::GeneratorOptions;
/// use atlas_core::TypeDescription;
/// use atlas_core::generate_type;
///
/// let target = TypeDescription {
///     namespace: "app".to_string(),
///     name: "UserId".to_string(),
///     description: "strong int; ==, !=".to_string(),
///     ..TypeDescription::default()
/// };
/// let header = generate_type(&target, &GeneratorOptions::default())?;
/// assert!(header.text.starts_with(&format!("#ifndef {}", header.guard)));
/// assert!(header.text.contains("struct UserId"));
/// # Ok::<(), atlas_core::AtlasError>(())
/// ```
pub fn generate_type(
    target: &TypeDescription,
    options: &GeneratorOptions,
) -> Result<GeneratedHeader, AtlasError> {
    let mut target = target.clone();
    if target.namespace.is_empty()
        && let Some(namespace) = &options.default_namespace
    {
        target.namespace.clone_from(namespace);
    }
    let spec = parse_description(&target.description)?;
    let standard = options::resolve_standard(options, None);
    let classification = classify(&spec, &target, standard)?;
    let rendered = render_class(&classification.info);
    let guard = GuardSettings::resolve(options, None, None, None);
    let mut header = assemble(&[rendered], classification.info.cpp_standard, &guard);
    prepend_warnings(&mut header, classification.warnings);
    Ok(header)
}

/// Renders every type of a parsed type file into one header.
#[must_use]
pub fn render_type_file(file: &TypeFile) -> GeneratedHeader {
    let rendered: Vec<RenderedClass> = file.classes.iter().map(render_class).collect();
    let mut header = assemble(&rendered, file.effective_standard(), &file.guard);
    prepend_warnings(&mut header, file.warnings.clone());
    header
}

/// Parses type-file `content` and renders it into one header.
///
/// # Errors
/// Returns the first [`AtlasError`] raised by [`parse_type_file`].
///
/// # Examples
/// ```
/// use atlas_core::GeneratorOptions;
/// use atlas_core::render_types_file;
///
/// let content = "namespace=geo\n[Meters]\ndescription=strong double; +, -\n";
/// let header = render_types_file(content, "geo.atlas", &GeneratorOptions::default())?;
/// assert!(header.text.ends_with(&format!("#endif // {}\n", header.guard)));
/// # Ok::<(), atlas_core::AtlasError>(())
/// ```
pub fn render_types_file(
    content: &str,
    filename: &str,
    options: &GeneratorOptions,
) -> Result<GeneratedHeader, AtlasError> {
    let file = parse_type_file(content, filename, options)?;
    Ok(render_type_file(&file))
}

/// Puts classifier warnings ahead of the template warnings.
fn prepend_warnings(header: &mut GeneratedHeader, mut warnings: Vec<Warning>) {
    warnings.append(&mut header.warnings);
    header.warnings = warnings;
}
