//! # BoxKit Core
//!
//! Core types for BoxKit: geometry primitives, assembly configuration,
//! the interior void tree and the snapshot model that a generation pass
//! consumes.

pub mod config;
pub mod error;
pub mod geometry;
pub mod snapshot;
pub mod void_tree;

pub use config::{AssemblyConfig, FeetConfig, LidConfig, LidPair, MaterialConfig, TabDirection};
pub use error::{
    ConfigError, ConfigResult, ExtensionError, SnapshotError, SnapshotResult,
};
pub use geometry::{
    Axis, Bounds3, CornerPosition, EdgePosition, FaceId, Point2, Point3, SignedAxis, EPSILON,
};
pub use snapshot::{
    AssemblySnapshot, CornerFillet, Cutout, EdgeExtensions, EdgeStatus, Face, PanelExtensions,
    PanelId,
};
pub use void_tree::{Void, VoidSplit};
