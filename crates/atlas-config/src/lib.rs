// crates/atlas-config/src/lib.rs
// ============================================================================
// Module: Atlas Config Library
// Description: Generator defaults loaded from atlas.toml.
// Purpose: Single source of truth for atlas.toml semantics.
// Dependencies: atlas-core, serde, toml
// ============================================================================

//! ## Overview
//! `atlas-config` defines the configuration file a front-end reads before
//! calling the generator. It provides strict, fail-closed loading and turns
//! the result into [`atlas_core::GeneratorOptions`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
