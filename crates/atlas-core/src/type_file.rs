// crates/atlas-core/src/type_file.rs
// ============================================================================
// Module: Type Definition File Parser
// Description: Line-oriented parser for files declaring strong types.
// Purpose: Resolve file settings, profiles, and type blocks into models.
// Dependencies: crate::{description, profiles, classifier, options, text, error}
// ============================================================================

//! ## Overview
//! A type file is a sequence of trimmed lines. Blank lines and lines
//! starting with `#` are ignored. Everything else is either a section
//! header opening a type block or a `key=value` pair.
//!
//! ```text
//! guard_prefix=MYLIB
//! namespace=geo
//! profile=NUMERIC; +, -, *, /, ==
//!
//! [struct Distance]
//! description=strong double; {NUMERIC}, hash
//! constants=zero:0.0; unit:1.0
//! ```
//!
//! File-scope keys are only accepted before the first section header.
//! `namespace=` at file scope sets the default namespace for later types;
//! inside a block it sets the namespace of that block only.
//!
//! Every error carries the file name and the line that caused it; errors
//! found while finalizing a block point at its section header.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::classifier::Classification;
use crate::classifier::classify;
use crate::description::parse_description;
use crate::diagnostics::Warning;
use crate::error::AtlasError;
use crate::input::read_definition_file;
use crate::model::ClassInfo;
use crate::model::CppStandard;
use crate::model::TypeKind;
use crate::options::GeneratorOptions;
use crate::options::GuardSettings;
use crate::options::TypeDescription;
use crate::options::resolve_standard;
use crate::profiles::ProfileRegistry;
use crate::text::is_identifier;
use crate::text::is_namespace;
use crate::text::parse_bool;
use crate::text::split_semicolon;
use crate::text::trim;

// ============================================================================
// SECTION: Parsed Type File
// ============================================================================

/// Everything a type file declares, classified and ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFile {
    /// Resolved include-guard settings.
    pub guard: GuardSettings,
    /// Resolved file-level C++ standard (types may raise their own).
    pub cpp_standard: CppStandard,
    /// Classified types in file order.
    pub classes: Vec<ClassInfo>,
    /// Classifier warnings in file order.
    pub warnings: Vec<Warning>,
}

impl TypeFile {
    /// Returns the standard the combined header must assert.
    #[must_use]
    pub fn effective_standard(&self) -> CppStandard {
        self.classes.iter().map(|info| info.cpp_standard).fold(self.cpp_standard, CppStandard::max)
    }
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Parses type-file `content`; `filename` is used in error locations.
///
/// # Errors
/// Returns the first [`AtlasError`] encountered, located at `filename`
/// and the offending line.
///
/// # Examples
/// ```
/// use atlas_core::GeneratorOptions;
/// use atlas_core::parse_type_file;
///
/// let content = "[app::UserId]\ndescription=strong int; ==\n";
/// let file = parse_type_file(content, "ids.atlas", &GeneratorOptions::default())?;
/// assert_eq!(file.classes[0].full_qualified_name, "app::UserId");
/// # Ok::<(), atlas_core::AtlasError>(())
/// ```
pub fn parse_type_file(
    content: &str,
    filename: &str,
    options: &GeneratorOptions,
) -> Result<TypeFile, AtlasError> {
    let mut parser = TypeFileParser::new(filename, options);
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        parser.line(trim(raw), line).map_err(|err| err.at(filename, line))?;
    }
    parser.finish()
}

/// Reads and parses the type file at `path`.
///
/// # Errors
/// Returns [`AtlasError::Io`] when the file cannot be read, and otherwise
/// whatever [`parse_type_file`] returns.
pub fn parse_type_file_path(path: &Path, options: &GeneratorOptions) -> Result<TypeFile, AtlasError> {
    let content = read_definition_file(path)?;
    parse_type_file(&content, &path.display().to_string(), options)
}

// ============================================================================
// SECTION: Parser State
// ============================================================================

/// File-scope settings.
#[derive(Debug, Default)]
struct FileSettings {
    /// `guard_prefix=`.
    guard_prefix: Option<String>,
    /// `guard_separator=`.
    guard_separator: Option<String>,
    /// `upcase_guard=`.
    upcase_guard: Option<bool>,
    /// `namespace=` before the first section.
    namespace: Option<String>,
    /// `cpp_standard=`.
    cpp_standard: Option<CppStandard>,
}

/// One type block under construction.
#[derive(Debug, Default)]
struct PendingType {
    /// Line of the section header.
    line: usize,
    /// Kind from the header or `kind=`.
    kind: Option<TypeKind>,
    /// Namespace from the header or `namespace=`.
    namespace: Option<String>,
    /// Name from the header or `name=`.
    name: Option<String>,
    /// `description=`.
    description: Option<String>,
    /// `default_value=`.
    default_value: Option<String>,
    /// Accumulated `constants=` entries.
    constants: Vec<(String, String)>,
    /// Accumulated `forward=` clauses.
    forwards: Vec<String>,
}

/// Line-by-line parser.
struct TypeFileParser<'a> {
    /// Name used in error locations.
    filename: &'a str,
    /// Caller overrides.
    options: &'a GeneratorOptions,
    /// File-scope settings.
    settings: FileSettings,
    /// Registered profiles.
    profiles: ProfileRegistry,
    /// Block being parsed, once the first section header was seen.
    current: Option<PendingType>,
    /// Finished types.
    classes: Vec<ClassInfo>,
    /// Classifier warnings.
    warnings: Vec<Warning>,
}

impl<'a> TypeFileParser<'a> {
    /// Creates a parser for `filename`.
    fn new(filename: &'a str, options: &'a GeneratorOptions) -> Self {
        Self {
            filename,
            options,
            settings: FileSettings::default(),
            profiles: ProfileRegistry::new(),
            current: None,
            classes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Consumes one trimmed line.
    fn line(&mut self, line: &str, number: usize) -> Result<(), AtlasError> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        if line.starts_with('[') {
            let pending = parse_section_header(line, number)?;
            self.finish_current()?;
            self.current = Some(pending);
            return Ok(());
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(AtlasError::syntax(format!("expected `key=value` or `[section]`, got `{line}`")));
        };
        let key = trim(key);
        let value = trim(value);
        match self.current.as_mut() {
            Some(pending) => type_key(pending, key, value),
            None => self.file_key(key, value),
        }
    }

    /// Applies a file-scope key.
    fn file_key(&mut self, key: &str, value: &str) -> Result<(), AtlasError> {
        match key {
            "guard_prefix" => self.settings.guard_prefix = Some(value.to_string()),
            "guard_separator" => self.settings.guard_separator = Some(value.to_string()),
            "upcase_guard" => self.settings.upcase_guard = Some(bool_value(key, value)?),
            "namespace" => self.settings.namespace = Some(namespace_value(value)?),
            "cpp_standard" => {
                let standard = CppStandard::parse(value).ok_or_else(|| {
                    AtlasError::syntax(format!("invalid cpp_standard `{value}` (expected 11, 14, 17, 20 or 23)"))
                })?;
                self.settings.cpp_standard = Some(standard);
            }
            "profile" => {
                let spec = parse_description(value)?;
                let name = spec.first_part.clone();
                self.profiles.register(&name, spec)?;
            }
            _ => return Err(AtlasError::syntax(format!("unknown file-scope key `{key}`"))),
        }
        Ok(())
    }

    /// Finalizes the open block, if any.
    fn finish_current(&mut self) -> Result<(), AtlasError> {
        let Some(pending) = self.current.take() else {
            return Ok(());
        };
        let line = pending.line;
        let classification = self.classify_pending(pending).map_err(|err| err.at(self.filename, line))?;
        self.warnings.extend(classification.warnings);
        self.classes.push(classification.info);
        Ok(())
    }

    /// Expands profiles in a finished block and classifies it.
    fn classify_pending(&self, pending: PendingType) -> Result<Classification, AtlasError> {
        let name = pending
            .name
            .ok_or_else(|| AtlasError::syntax("incomplete type: no name given"))?;
        let description = pending
            .description
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AtlasError::syntax(format!("incomplete type `{name}`: no description given")))?;
        let namespace = pending
            .namespace
            .or_else(|| self.options.default_namespace.clone())
            .or_else(|| self.settings.namespace.clone())
            .ok_or_else(|| {
                AtlasError::syntax(format!(
                    "incomplete type `{name}`: no namespace given (use `namespace=` for the global namespace)"
                ))
            })?;
        let spec = self.profiles.expand(parse_description(&description)?)?;
        let target = TypeDescription {
            kind: pending.kind.unwrap_or_default(),
            namespace,
            name,
            description,
            default_value: pending.default_value,
            constants: pending.constants,
            forwards: pending.forwards,
        };
        let standard = resolve_standard(self.options, self.settings.cpp_standard);
        debug!(file = self.filename, name = %target.name, "classifying type block");
        classify(&spec, &target, standard)
    }

    /// Finalizes the last block and resolves file settings.
    fn finish(mut self) -> Result<TypeFile, AtlasError> {
        self.finish_current()?;
        let guard = GuardSettings::resolve(
            self.options,
            self.settings.guard_prefix.as_deref(),
            self.settings.guard_separator.as_deref(),
            self.settings.upcase_guard,
        );
        let cpp_standard = resolve_standard(self.options, self.settings.cpp_standard);
        debug!(file = self.filename, types = self.classes.len(), "parsed type file");
        Ok(TypeFile {
            guard,
            cpp_standard,
            classes: self.classes,
            warnings: self.warnings,
        })
    }
}

// ============================================================================
// SECTION: Section Headers
// ============================================================================

/// Parses `[type]`, `[Name]`, `[ns::Name]`, `[struct Name]` or `[class ns::Name]`.
fn parse_section_header(line: &str, number: usize) -> Result<PendingType, AtlasError> {
    let malformed = || AtlasError::syntax(format!("malformed section header `{line}`"));
    let inner = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')).map(trim).ok_or_else(malformed)?;
    let mut pending = PendingType {
        line: number,
        ..PendingType::default()
    };
    if inner == "type" {
        return Ok(pending);
    }
    let words: Vec<&str> = inner.split_whitespace().collect();
    let qualified = match words.as_slice() {
        [qualified] => qualified,
        [kind, qualified] => {
            pending.kind = Some(TypeKind::parse(kind).ok_or_else(malformed)?);
            qualified
        }
        _ => return Err(malformed()),
    };
    let (namespace, name) = match qualified.rsplit_once("::") {
        Some((namespace, name)) => (Some(namespace), name),
        None => (None, *qualified),
    };
    if !is_identifier(name) || namespace.is_some_and(|ns| ns.is_empty() || !is_namespace(ns)) {
        return Err(malformed());
    }
    pending.name = Some(name.to_string());
    pending.namespace = namespace.map(str::to_string);
    Ok(pending)
}

// ============================================================================
// SECTION: Type-Scope Keys
// ============================================================================

/// Applies a key inside a type block.
fn type_key(pending: &mut PendingType, key: &str, value: &str) -> Result<(), AtlasError> {
    match key {
        "kind" => {
            let kind = TypeKind::parse(value)
                .ok_or_else(|| AtlasError::syntax(format!("invalid kind `{value}` (expected struct or class)")))?;
            if let Some(existing) = pending.kind
                && existing != kind
            {
                return Err(AtlasError::conflict(format!(
                    "kind `{value}` contradicts `{}` given earlier",
                    existing.as_str()
                )));
            }
            pending.kind = Some(kind);
        }
        "namespace" => set_once(&mut pending.namespace, namespace_value(value)?, "namespace")?,
        "name" => {
            if !is_identifier(value) {
                return Err(AtlasError::syntax(format!("invalid type name `{value}`")));
            }
            set_once(&mut pending.name, value.to_string(), "name")?;
        }
        "description" => {
            if value.is_empty() {
                return Err(AtlasError::syntax("description is empty"));
            }
            set_once(&mut pending.description, value.to_string(), "description")?;
        }
        "default_value" => {
            if value.is_empty() {
                return Err(AtlasError::syntax("default_value is empty"));
            }
            pending.default_value = Some(value.to_string());
        }
        "constants" => add_constants(pending, value)?,
        "forward" => {
            if value.is_empty() {
                return Err(AtlasError::syntax("forward is empty"));
            }
            pending.forwards.push(value.to_string());
        }
        _ => return Err(AtlasError::syntax(format!("unknown type-scope key `{key}`"))),
    }
    Ok(())
}

/// Stores `value` unless a different value was given before.
fn set_once(slot: &mut Option<String>, value: String, what: &str) -> Result<(), AtlasError> {
    if let Some(existing) = slot.as_deref()
        && existing != value
    {
        return Err(AtlasError::conflict(format!(
            "{what} `{value}` contradicts `{existing}` given earlier"
        )));
    }
    *slot = Some(value);
    Ok(())
}

/// Parses `name:value[; name:value]*` into the block.
fn add_constants(pending: &mut PendingType, value: &str) -> Result<(), AtlasError> {
    let mut seen: BTreeSet<String> = pending.constants.iter().map(|(name, _)| name.clone()).collect();
    for entry in split_semicolon(value) {
        let (name, literal) = entry
            .split_once(':')
            .map(|(name, literal)| (trim(name), trim(literal)))
            .filter(|(name, literal)| !name.is_empty() && !literal.is_empty())
            .ok_or_else(|| AtlasError::syntax(format!("malformed constant `{entry}` (expected name:value)")))?;
        if !is_identifier(name) {
            return Err(AtlasError::syntax(format!("invalid constant name `{name}`")));
        }
        if !seen.insert(name.to_string()) {
            return Err(AtlasError::conflict(format!("constant `{name}` is defined twice")));
        }
        pending.constants.push((name.to_string(), literal.to_string()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Value Helpers
// ============================================================================

/// Parses a boolean key.
fn bool_value(key: &str, value: &str) -> Result<bool, AtlasError> {
    parse_bool(value).ok_or_else(|| {
        AtlasError::syntax(format!("`{key}` expects true/false, 1/0 or yes/no, got `{value}`"))
    })
}

/// Validates a namespace value.
fn namespace_value(value: &str) -> Result<String, AtlasError> {
    if is_namespace(value) {
        Ok(value.to_string())
    } else {
        Err(AtlasError::syntax(format!("invalid namespace `{value}`")))
    }
}
