//! Generation driver
//!
//! One generation pass: validate the configuration, compute the aligned
//! finger patterns, lay out every panel, build outlines and holes for all
//! panels in parallel, then run the overlap validator over the results.

use crate::error::{PanelError, PanelResult};
use crate::finger::FingerPatterns;
use crate::gender::EdgeJoint;
use crate::holes::{generate_holes, PanelHole};
use crate::layout::{NeighborRef, PanelLayout, PanelLayouts, PanelSource};
use crate::outline::{build_outline, PanelOutline};
use crate::validator::{validate_overlaps, OverlapFinding};
use boxkit_core::{AssemblySnapshot, EdgePosition, EdgeStatus, PanelId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Per-edge summary of a generated panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSummary {
    pub position: EdgePosition,
    pub neighbor: NeighborRef,
    pub joint: EdgeJoint,
    pub status: EdgeStatus,
    pub extension: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPanel {
    pub id: PanelId,
    pub source: PanelSource,
    pub outline: PanelOutline,
    pub holes: Vec<PanelHole>,
    pub edges: Vec<EdgeSummary>,
}

/// A panel that could not be generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelFailure {
    pub panel: PanelId,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub panels: Vec<GeneratedPanel>,
    pub failures: Vec<PanelFailure>,
    pub findings: Vec<OverlapFinding>,
    pub patterns: FingerPatterns,
}

impl GenerationReport {
    pub fn panel(&self, id: &PanelId) -> Option<&GeneratedPanel> {
        self.panels.iter().find(|p| &p.id == id)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.findings.is_empty()
    }
}

/// Run one generation pass over a snapshot.
///
/// Snapshot-level problems (invalid configuration, references to missing
/// panels, duplicate void ids) fail the whole pass. Problems confined to one
/// panel are collected in the report's failures while the other panels are
/// still produced.
#[instrument(skip_all, fields(width = snapshot.config.width, height = snapshot.config.height, depth = snapshot.config.depth))]
pub fn generate(snapshot: &AssemblySnapshot) -> PanelResult<GenerationReport> {
    snapshot.config.validate()?;

    let patterns = FingerPatterns::compute(&snapshot.config);
    let layouts = PanelLayouts::build(snapshot, &patterns)?;
    check_references(snapshot, &layouts)?;

    let results: Vec<(PanelId, PanelResult<GeneratedPanel>)> = layouts
        .as_slice()
        .par_iter()
        .map(|layout| (layout.id.clone(), generate_panel(snapshot, &layouts, layout)))
        .collect();

    let mut panels = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (id, result) in results {
        match result {
            Ok(panel) => panels.push(panel),
            Err(err) => {
                warn!("Panel {} failed: {}", id, err);
                failures.push(PanelFailure {
                    panel: id,
                    error: err.to_string(),
                });
            }
        }
    }

    let outlines: HashMap<PanelId, Vec<_>> = panels
        .iter()
        .map(|p| (p.id.clone(), p.outline.points.clone()))
        .collect();
    let findings = validate_overlaps(snapshot, &layouts, &outlines);

    info!(
        "Generated {} panels ({} failed, {} overlap findings)",
        panels.len(),
        failures.len(),
        findings.len()
    );

    Ok(GenerationReport {
        panels,
        failures,
        findings,
        patterns,
    })
}

fn generate_panel(
    snapshot: &AssemblySnapshot,
    layouts: &PanelLayouts,
    layout: &PanelLayout,
) -> PanelResult<GeneratedPanel> {
    let outline = build_outline(snapshot, layouts, layout)?;
    let holes = generate_holes(snapshot, layouts, layout, &outline)?;
    let extensions = snapshot.extensions_for(&layout.id);

    Ok(GeneratedPanel {
        id: layout.id.clone(),
        source: layout.source.clone(),
        outline,
        holes,
        edges: layout
            .edges
            .iter()
            .map(|e| EdgeSummary {
                position: e.position,
                neighbor: e.neighbor.clone(),
                joint: e.joint,
                status: e.status,
                extension: extensions.get(e.position),
            })
            .collect(),
    })
}

/// Every extension, fillet and cut-out must name a panel that exists.
fn check_references(snapshot: &AssemblySnapshot, layouts: &PanelLayouts) -> PanelResult<()> {
    let missing = |kind: &str, id: &PanelId| {
        PanelError::InvalidReference(format!("{} targets missing panel {}", kind, id))
    };
    for entry in &snapshot.extensions {
        if layouts.get(&entry.panel).is_none() && !entry.extensions.is_zero() {
            return Err(missing("extension", &entry.panel));
        }
    }
    for fillet in &snapshot.fillets {
        if layouts.get(&fillet.panel).is_none() {
            return Err(missing("fillet", &fillet.panel));
        }
    }
    for cutout in &snapshot.cutouts {
        if layouts.get(&cutout.panel).is_none() {
            return Err(missing("cutout", &cutout.panel));
        }
    }
    Ok(())
}

/// Current status of each edge of a panel, in `EdgePosition::ALL` order.
///
/// Lets the caller drive the checked extension setter without running a
/// full generation pass.
pub fn edge_statuses(snapshot: &AssemblySnapshot, panel: &PanelId) -> PanelResult<[EdgeStatus; 4]> {
    let patterns = FingerPatterns::compute(&snapshot.config);
    let layouts = PanelLayouts::build(snapshot, &patterns)?;
    let layout = layouts
        .get(panel)
        .ok_or_else(|| PanelError::InvalidReference(format!("no panel {}", panel)))?;
    Ok(EdgePosition::ALL.map(|pos| layout.edge(pos).status))
}
