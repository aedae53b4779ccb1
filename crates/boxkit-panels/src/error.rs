//! Error types for panel generation.

use boxkit_core::{ConfigError, CornerPosition, ExtensionError, PanelId};
use thiserror::Error;

/// Errors raised while generating panels from a snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    /// The panel's geometry collapsed (negative extent, self-intersection,
    /// a hole touching the outline). Only this panel fails.
    #[error("Degenerate geometry on panel {panel}: {reason}")]
    DegenerateGeometry { panel: PanelId, reason: String },

    /// The snapshot references something that does not exist. Fails the
    /// whole generation pass.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A stored extension violates the status of its edge.
    #[error("Extension rejected on panel {panel}: {source}")]
    ExtensionRejected {
        panel: PanelId,
        #[source]
        source: ExtensionError,
    },

    /// A fillet cannot be applied to the requested corner.
    #[error("Fillet rejected on panel {panel} at {corner}: {reason}")]
    FilletRejected {
        panel: PanelId,
        corner: CornerPosition,
        reason: String,
    },

    /// A cut-out leaves the panel's safe space or overlaps a slot.
    #[error("Cutout '{cutout}' on panel {panel} is outside the safe space")]
    CutoutOutsideSafeSpace { panel: PanelId, cutout: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl PanelError {
    pub fn degenerate(panel: &PanelId, reason: impl Into<String>) -> Self {
        PanelError::DegenerateGeometry {
            panel: panel.clone(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for panel generation.
pub type PanelResult<T> = Result<T, PanelError>;
