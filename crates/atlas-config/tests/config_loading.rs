// crates/atlas-config/tests/config_loading.rs
// =============================================================================
// Module: Config Loading Tests
// Description: Validate atlas.toml parsing, limits, and conversion.
// Purpose: Ensure config loading fails closed and maps onto generator options.
// =============================================================================

//! Config loading and validation tests for atlas-config.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions are permitted."
)]

use std::fs;

use atlas_config::AtlasConfig;
use atlas_config::ConfigError;
use atlas_config::MAX_CONFIG_FILE_SIZE;
use atlas_core::CppStandard;
use atlas_core::GeneratorOptions;
use tempfile::TempDir;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<AtlasConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(config) => Err(format!("expected invalid config, got {config:?}")),
    }
}

#[test]
fn empty_config_leaves_every_option_unset() -> TestResult {
    let config = AtlasConfig::from_toml("").map_err(|err| err.to_string())?;
    let options = config.into_options().map_err(|err| err.to_string())?;
    if options != GeneratorOptions::default() {
        return Err(format!("unexpected options {options:?}"));
    }
    Ok(())
}

#[test]
fn full_config_maps_onto_generator_options() -> TestResult {
    let content = r#"
[guard]
prefix = "MYLIB"
separator = "__"
upcase = false

[generation]
cpp_standard = 17
namespace = "app::ids"
"#;
    let options = AtlasConfig::from_toml(content)
        .and_then(AtlasConfig::into_options)
        .map_err(|err| err.to_string())?;
    assert_eq!(options.guard_prefix.as_deref(), Some("MYLIB"));
    assert_eq!(options.guard_separator.as_deref(), Some("__"));
    assert_eq!(options.upcase_guard, Some(false));
    assert_eq!(options.cpp_standard, Some(CppStandard::Cpp17));
    assert_eq!(options.default_namespace.as_deref(), Some("app::ids"));
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    assert_invalid(AtlasConfig::from_toml("[guard]\ncolour = \"red\"\n"), "config parse error")?;
    assert_invalid(AtlasConfig::from_toml("[output]\ndir = \"x\"\n"), "config parse error")
}

#[test]
fn invalid_values_are_rejected() -> TestResult {
    assert_invalid(AtlasConfig::from_toml("[generation]\ncpp_standard = 98\n"), "cpp_standard")?;
    assert_invalid(AtlasConfig::from_toml("[generation]\nnamespace = \"a::\"\n"), "generation.namespace")?;
    assert_invalid(AtlasConfig::from_toml("[guard]\nprefix = \"9LIB\"\n"), "guard.prefix")?;
    assert_invalid(AtlasConfig::from_toml("[guard]\nseparator = \"-\"\n"), "guard.separator")
}

#[test]
fn wrong_value_types_are_parse_errors() -> TestResult {
    assert_invalid(AtlasConfig::from_toml("[guard]\nupcase = \"yes\"\n"), "config parse error")
}

#[test]
fn explicit_path_is_loaded() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("atlas.toml");
    fs::write(&path, "[generation]\ncpp_standard = 20\n").map_err(|err| err.to_string())?;
    let config = AtlasConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    assert_eq!(config.generation.cpp_standard, Some(20));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    assert_invalid(AtlasConfig::load(Some(&dir.path().join("absent.toml"))), "config io error")
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("atlas.toml");
    let mut content = String::from("# padding\n");
    content.push_str(&"#".repeat(MAX_CONFIG_FILE_SIZE));
    fs::write(&path, content).map_err(|err| err.to_string())?;
    assert_invalid(AtlasConfig::load(Some(&path)), "size limit")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("atlas.toml");
    fs::write(&path, [b'#', 0xff, 0xfe, b'\n']).map_err(|err| err.to_string())?;
    assert_invalid(AtlasConfig::load(Some(&path)), "utf-8")
}

#[test]
fn loaded_options_drive_generation() -> TestResult {
    let config = AtlasConfig::from_toml("[guard]\nprefix = \"IDS\"\n[generation]\nnamespace = \"app\"\n")
        .map_err(|err| err.to_string())?;
    let options = config.into_options().map_err(|err| err.to_string())?;
    let target = atlas_core::TypeDescription {
        name: "UserId".to_string(),
        description: "strong int; ==".to_string(),
        ..atlas_core::TypeDescription::default()
    };
    let header = atlas_core::generate_type(&target, &options).map_err(|err| err.to_string())?;
    if !header.guard.starts_with("IDS_") || !header.text.contains("namespace app {") {
        return Err(format!("unexpected header guard {}", header.guard));
    }
    Ok(())
}
