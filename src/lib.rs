//! # BoxKit
//!
//! Parametric finger-joint box generator. Describes a box as an assembly
//! snapshot (outer dimensions, material, lids, feet, interior dividers and
//! per-panel edits) and produces flat panel outlines with finger joints and
//! slot holes for laser or CNC cutting.
//!
//! ## Architecture
//!
//! BoxKit is organized as a workspace with multiple crates:
//!
//! 1. **boxkit-core** - Geometry primitives, configuration, void tree, snapshots
//! 2. **boxkit-panels** - Finger alignment, joint gender, outlines, holes, overlap checks
//! 3. **boxkit** - Logging setup and the command-line front end

pub use boxkit_core::{
    AssemblyConfig, AssemblySnapshot, Axis, CornerFillet, CornerPosition, Cutout,
    EdgeExtensions, EdgePosition, EdgeStatus, FaceId, FeetConfig, LidConfig, MaterialConfig,
    PanelId, Point2, Point3, SnapshotError, TabDirection, Void,
};

pub use boxkit_panels::{
    edge_statuses, generate, EdgeJoint, FingerAxisPattern, FingerPatterns, GeneratedPanel,
    GenerationReport, HoleSource, OverlapFinding, OverlapRule, PanelError, PanelHole,
    PanelOutline, PanelResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout free for reports
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
