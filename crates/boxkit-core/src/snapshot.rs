//! Assembly snapshot
//!
//! Everything one generation pass reads: configuration, void tree, face
//! states and the per-panel edits (extensions, fillets, cut-outs). The
//! upstream scene model owns and mutates this data; the engine only ever
//! sees an immutable copy.

use crate::config::AssemblyConfig;
use crate::error::{ExtensionError, SnapshotError, SnapshotResult};
use crate::geometry::{CornerPosition, EdgePosition, FaceId, Point2};
use crate::void_tree::Void;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub id: FaceId,
    pub solid: bool,
}

/// Stable identity of a panel across generation passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    Face(FaceId),
    /// Divider created by splitting the void with this id
    Divider(String),
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelId::Face(face) => write!(f, "face:{}", face),
            PanelId::Divider(void_id) => write!(f, "divider:{}", void_id),
        }
    }
}

/// How far an edge may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeStatus {
    /// Male finger joint: the edge cannot move.
    Locked,
    /// Female finger joint: the edge may only move outward.
    OutwardOnly,
    /// Open edge: any signed offset.
    Unlocked,
}

impl EdgeStatus {
    pub fn check(self, edge: EdgePosition, value: f64) -> Result<(), ExtensionError> {
        if !value.is_finite() {
            return Err(ExtensionError::NotFinite { edge });
        }
        match self {
            EdgeStatus::Locked if value != 0.0 => Err(ExtensionError::Locked { edge, value }),
            EdgeStatus::OutwardOnly if value < 0.0 => {
                Err(ExtensionError::InwardNotAllowed { edge, value })
            }
            _ => Ok(()),
        }
    }
}

/// Signed per-edge offsets in mm; positive moves the edge outward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeExtensions {
    #[serde(default)]
    top: f64,
    #[serde(default)]
    right: f64,
    #[serde(default)]
    bottom: f64,
    #[serde(default)]
    left: f64,
}

impl EdgeExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, edge: EdgePosition) -> f64 {
        match edge {
            EdgePosition::Top => self.top,
            EdgePosition::Right => self.right,
            EdgePosition::Bottom => self.bottom,
            EdgePosition::Left => self.left,
        }
    }

    /// Set an extension, rejecting values the edge status forbids.
    pub fn set(
        &mut self,
        edge: EdgePosition,
        value: f64,
        status: EdgeStatus,
    ) -> Result<(), ExtensionError> {
        status.check(edge, value)?;
        *self.slot(edge) = value;
        Ok(())
    }

    /// Record a value as stored upstream. Generation re-checks every value
    /// against the edge status it resolves.
    pub fn with_raw(mut self, edge: EdgePosition, value: f64) -> Self {
        *self.slot(edge) = value;
        self
    }

    pub fn is_zero(&self) -> bool {
        EdgePosition::ALL.iter().all(|&e| self.get(e) == 0.0)
    }

    fn slot(&mut self, edge: EdgePosition) -> &mut f64 {
        match edge {
            EdgePosition::Top => &mut self.top,
            EdgePosition::Right => &mut self.right,
            EdgePosition::Bottom => &mut self.bottom,
            EdgePosition::Left => &mut self.left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelExtensions {
    pub panel: PanelId,
    pub extensions: EdgeExtensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerFillet {
    pub panel: PanelId,
    pub corner: CornerPosition,
    pub radius: f64,
}

/// A user cut-out in panel-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cutout {
    pub panel: PanelId,
    pub id: String,
    pub points: Vec<Point2>,
}

impl Cutout {
    pub fn rect(panel: PanelId, id: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            panel,
            id: id.into(),
            points: vec![
                Point2::new(x, y),
                Point2::new(x + w, y),
                Point2::new(x + w, y + h),
                Point2::new(x, y + h),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblySnapshot {
    pub config: AssemblyConfig,
    pub root: Void,
    pub faces: Vec<Face>,
    #[serde(default)]
    pub extensions: Vec<PanelExtensions>,
    #[serde(default)]
    pub fillets: Vec<CornerFillet>,
    #[serde(default)]
    pub cutouts: Vec<Cutout>,
}

impl AssemblySnapshot {
    /// Closed box: all six faces solid, undivided interior.
    pub fn new(config: AssemblyConfig) -> Self {
        let root = Void::root(&config);
        Self {
            config,
            root,
            faces: FaceId::ALL
                .iter()
                .map(|&id| Face { id, solid: true })
                .collect(),
            extensions: Vec::new(),
            fillets: Vec::new(),
            cutouts: Vec::new(),
        }
    }

    /// A face missing from the face list counts as open.
    pub fn is_solid(&self, face: FaceId) -> bool {
        self.faces.iter().any(|f| f.id == face && f.solid)
    }

    pub fn set_solid(&mut self, face: FaceId, solid: bool) {
        match self.faces.iter_mut().find(|f| f.id == face) {
            Some(f) => f.solid = solid,
            None => self.faces.push(Face { id: face, solid }),
        }
    }

    pub fn extensions_for(&self, panel: &PanelId) -> EdgeExtensions {
        self.extensions
            .iter()
            .find(|e| &e.panel == panel)
            .map(|e| e.extensions)
            .unwrap_or_default()
    }

    /// Store a raw extension value for a panel edge.
    pub fn set_extension(&mut self, panel: PanelId, edge: EdgePosition, value: f64) {
        match self.extensions.iter_mut().find(|e| e.panel == panel) {
            Some(entry) => entry.extensions = entry.extensions.with_raw(edge, value),
            None => self.extensions.push(PanelExtensions {
                panel,
                extensions: EdgeExtensions::new().with_raw(edge, value),
            }),
        }
    }

    pub fn from_json_str(s: &str) -> SnapshotResult<Self> {
        let snapshot: Self = serde_json::from_str(s)?;
        snapshot.config.validate()?;
        Ok(snapshot)
    }

    pub fn from_toml_str(s: &str) -> SnapshotResult<Self> {
        let snapshot: Self = toml::from_str(s)?;
        snapshot.config.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot, choosing the format from the file extension.
    pub fn load(path: &Path) -> SnapshotResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        debug!("Loading assembly snapshot from {}", path.display());

        match ext.as_str() {
            "json" => Self::from_json_str(&content),
            "toml" => Self::from_toml_str(&content),
            other => Err(SnapshotError::UnsupportedFormat(other.to_string())),
        }
    }
}
