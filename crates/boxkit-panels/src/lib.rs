//! # BoxKit Panels
//!
//! Panel geometry engine. Turns an assembly snapshot into flat panel
//! outlines with finger joints, slot holes and user cut-outs, ready for
//! laser or CNC cutting.
//!
//! The pipeline per generation pass:
//!
//! 1. [`finger`] computes one aligned tab/slot pattern per assembly axis.
//! 2. [`layout`] derives every panel and classifies its edges via
//!    [`gender`].
//! 3. [`outline`] and [`holes`] build each panel's geometry.
//! 4. [`validator`] checks the shared corners of extended panels.
//!
//! [`generator::generate`] runs the whole pass.

pub mod error;
pub mod finger;
pub mod gender;
pub mod generator;
pub mod holes;
pub mod layout;
pub mod outline;
pub mod polygon;
pub mod validator;

pub use error::{PanelError, PanelResult};
pub use finger::{FingerAxisPattern, FingerPatterns};
pub use gender::{compare_panels, face_tier, EdgeJoint};
pub use generator::{
    edge_statuses, generate, EdgeSummary, GeneratedPanel, GenerationReport, PanelFailure,
};
pub use holes::{HoleSource, PanelHole};
pub use layout::{NeighborRef, PanelFrame, PanelLayout, PanelLayouts, PanelSource, Placement};
pub use outline::{build_outline, PanelOutline};
pub use validator::{validate_overlaps, OverlapDetails, OverlapFinding, OverlapRule};
