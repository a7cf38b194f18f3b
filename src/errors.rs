//! Error Types
//!
//! This module defines the error types used throughout the importer.
//!
//! # Overview
//!
//! The main error type [`ImportError`] covers every failure mode of an import:
//! - File I/O and JSON parsing of the document or the settings sidecar
//! - An unrecognised import mode (fatal for the whole import)
//! - Element-level conversion failures (absorbed by the loader: logged and skipped)
//! - Embedded texture decoding (data URI, base-64, image payload)
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, ImportError>`.
//!
//! ```rust,ignore
//! use myth_bbmodel::errors::{ImportError, Result};
//!
//! fn import() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the bbmodel importer.
#[derive(Error, Debug)]
pub enum ImportError {
    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The requested top-level import mode does not exist.
    #[error("Unknown import mode: {0:?}")]
    UnknownImportMode(String),

    // ========================================================================
    // Element Conversion Errors
    // ========================================================================
    /// An element does not have the shape its kind requires.
    #[error("Malformed element {uuid}: {reason}")]
    MalformedElement {
        /// Identifier of the offending element
        uuid: String,
        /// What was wrong with it
        reason: String,
    },

    /// A mesh face references a vertex name the mesh does not declare.
    #[error("Face {face} references unknown vertex {vertex:?}")]
    MissingVertex {
        /// Key of the face in the mesh's face table
        face: String,
        /// The unresolved vertex name
        vertex: String,
    },

    /// A mesh face has no UV coordinate for one of its vertices.
    #[error("Face {face} has no UV for vertex {vertex:?}")]
    MissingUv {
        /// Key of the face in the mesh's face table
        face: String,
        /// The vertex lacking a UV
        vertex: String,
    },

    // ========================================================================
    // Texture Errors
    // ========================================================================
    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// Base-64 payload could not be decoded.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),
}

impl From<image::ImageError> for ImportError {
    fn from(err: image::ImageError) -> Self {
        ImportError::ImageDecodeError(err.to_string())
    }
}

impl ImportError {
    /// Builds a [`ImportError::MalformedElement`] for the element `uuid`.
    pub fn malformed(uuid: impl Into<String>, reason: impl Into<String>) -> Self {
        ImportError::MalformedElement {
            uuid: uuid.into(),
            reason: reason.into(),
        }
    }
}

/// Alias for `Result<T, ImportError>`.
pub type Result<T> = std::result::Result<T, ImportError>;
