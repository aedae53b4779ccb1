//! Error types for the core crate.
//!
//! Configuration validation, snapshot loading and the checked edge
//! extension setter each get their own `thiserror` enum.

use crate::geometry::EdgePosition;
use std::io;
use thiserror::Error;

/// Errors found while validating an assembly configuration or void tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Dimensions are invalid (zero, negative or too small for the material).
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// A void cannot be split as requested.
    #[error("Cannot split void '{void_id}': {reason}")]
    InvalidSplit { void_id: String, reason: String },

    /// No void with this id exists in the tree.
    #[error("Unknown void: {0}")]
    UnknownVoid(String),
}

/// Errors that can occur while reading or writing an assembly snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is not recognized.
    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    /// The snapshot parsed but its configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Rejection from the checked edge extension setter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtensionError {
    /// The edge carries a male finger joint and cannot move.
    #[error("Edge {edge} is locked by its finger joint (requested {value} mm)")]
    Locked { edge: EdgePosition, value: f64 },

    /// The edge carries slots and may only move outward.
    #[error("Edge {edge} only accepts outward extension (requested {value} mm)")]
    InwardNotAllowed { edge: EdgePosition, value: f64 },

    /// The value is NaN or infinite.
    #[error("Extension on edge {edge} is not a finite number")]
    NotFinite { edge: EdgePosition },
}

/// Result type alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for snapshot loading.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
