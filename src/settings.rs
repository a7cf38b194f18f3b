//! Import Settings & Import Mode Configuration
//!
//! This module defines how a `.bbmodel` document is turned into engine assets.
//!
//! The core abstraction is [`ImportMode`], which decides the shape of the
//! output: a node hierarchy with animation clips, one merged renderable, or one
//! independent renderable per element.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_bbmodel::settings::{ImportMode, ImportSettings};
//!
//! // Default: keep the bone hierarchy and convert animations
//! let settings = ImportSettings::default();
//!
//! // Static prop: everything in one mesh, hidden elements dropped
//! let settings = ImportSettings {
//!     mode: ImportMode::MergeAllIntoOneObject,
//!     filter_hidden: true,
//!     ..Default::default()
//! };
//! ```

use std::str::FromStr;

use serde::Deserialize;

use crate::errors::{ImportError, Result};

// ---------------------------------------------------------------------------
// ImportMode
// ---------------------------------------------------------------------------

/// Top-level output shape of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ImportMode {
    /// Keep the outliner's group tree as nodes and convert every animation
    /// into a clip bound to those nodes.
    #[default]
    WithHierarchyAndAnimations,
    /// Bake every element into a single renderable. Suited to static props.
    MergeAllIntoOneObject,
    /// One independent renderable per element, no group nodes.
    SeparateObjects,
}

impl FromStr for ImportMode {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "hierarchy" | "WithHierarchyAndAnimations" => Ok(Self::WithHierarchyAndAnimations),
            "merged" | "MergeAllIntoOneObject" => Ok(Self::MergeAllIntoOneObject),
            "separate" | "SeparateObjects" => Ok(Self::SeparateObjects),
            other => Err(ImportError::UnknownImportMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for ImportMode {
    type Error = ImportError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// MaterialTemplate
// ---------------------------------------------------------------------------

/// Shading model of the instantiated materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Shading {
    #[default]
    Unlit,
    Standard,
}

/// Template every imported material is instantiated from.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MaterialTemplate {
    pub shading: Shading,
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for MaterialTemplate {
    fn default() -> Self {
        Self {
            shading: Shading::Unlit,
            metallic: 0.0,
            roughness: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ImportSettings
// ---------------------------------------------------------------------------

/// Import configuration.
///
/// Every field has a default, so a sidecar file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Output shape.
    pub mode: ImportMode,
    /// Skip elements the source marks invisible.
    ///
    /// In hierarchy mode an invisible element ends processing of the rest of
    /// its sibling list; the other modes skip only that element.
    pub filter_hidden: bool,
    /// Elements whose name contains this string are skipped.
    pub ignore_name: Option<String>,
    /// Scale applied to the produced root node(s).
    pub unit_scale: f32,
    /// Template for instantiated materials.
    pub material: MaterialTemplate,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            mode: ImportMode::default(),
            filter_hidden: false,
            ignore_name: None,
            unit_scale: 1.0,
            material: MaterialTemplate::default(),
        }
    }
}

impl ImportSettings {
    /// Parses a JSON settings sidecar.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns `true` if an element called `name` must be skipped.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_name
            .as_deref()
            .is_some_and(|pattern| !pattern.is_empty() && name.contains(pattern))
    }
}
