//! Overlap validator
//!
//! Advisory whole-assembly pass run after every panel exists. Where two
//! neighbouring panels both extend their edges towards the same face,
//! exactly one of them should occupy the shared corner column. The
//! validator samples that column and reports what it finds; it never fails
//! generation.

use crate::gender::compare_panels;
use crate::layout::{NeighborRef, PanelLayout, PanelLayouts};
use crate::polygon;
use boxkit_core::{AssemblySnapshot, EdgePosition, FaceId, PanelId, Point2, Point3, EPSILON};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapRule {
    /// Both panels occupy the corner column.
    CornerOverlap,
    /// Only the lower-priority panel occupies it.
    PriorityInverted,
    /// Neither panel occupies it.
    CornerUnclaimed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapDetails {
    pub expected_winner: PanelId,
    pub extension_a: f64,
    pub extension_b: f64,
    pub sample: Point3,
    pub claimed_by: Vec<PanelId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapFinding {
    pub rule: OverlapRule,
    pub panels: [PanelId; 2],
    /// Face both panels extend towards
    pub toward: FaceId,
    pub details: OverlapDetails,
}

/// Check every extended corner shared by two neighbouring panels: face
/// pairs, and dividers against the faces and parent dividers they meet.
///
/// `outlines` holds the outline of each generated panel; panels that
/// failed generation are skipped.
pub fn validate_overlaps(
    snapshot: &AssemblySnapshot,
    layouts: &PanelLayouts,
    outlines: &HashMap<PanelId, Vec<Point2>>,
) -> Vec<OverlapFinding> {
    let mut findings = Vec::new();
    let axis = snapshot.config.assembly_axis;

    for (la, lb) in neighbour_pairs(layouts) {
        let (id_a, id_b) = (&la.id, &lb.id);
        let (Some(oa), Some(ob)) = (outlines.get(id_a), outlines.get(id_b)) else {
            continue;
        };

        for ea in EdgePosition::ALL {
            let target = &la.edge(ea).neighbor;
            let NeighborRef::Face(toward) = *target else {
                continue;
            };
            let Some(eb) = lb.edge_toward(target) else {
                continue;
            };
            let xa = snapshot.extensions_for(id_a).get(ea);
            let xb = snapshot.extensions_for(id_b).get(eb);
            if xa <= 0.0 || xb <= 0.0 {
                continue;
            }

            // Stretch both extensions share beyond their edge lines.
            let span_a = extension_span(la, ea, xa);
            let span_b = extension_span(lb, eb, xb);
            let (lo, hi) = (span_a.0.max(span_b.0), span_a.1.min(span_b.1));
            if hi - lo <= EPSILON {
                continue;
            }

            let shared = toward.normal().axis;
            let mut sample = Point3::default();
            sample.set(la.frame().normal.axis, mid(la.w_range));
            sample.set(lb.frame().normal.axis, mid(lb.w_range));
            sample.set(shared, (lo + hi) / 2.0);

            let mut claimed_by = Vec::new();
            if claims(la, oa, &sample) {
                claimed_by.push(id_a.clone());
            }
            if claims(lb, ob, &sample) {
                claimed_by.push(id_b.clone());
            }

            let expected_winner = match compare_panels(axis, id_a, id_b) {
                Ordering::Greater => id_b.clone(),
                _ => id_a.clone(),
            };
            let rule = match claimed_by.as_slice() {
                [_, _] => OverlapRule::CornerOverlap,
                [] => OverlapRule::CornerUnclaimed,
                [only] if *only != expected_winner => OverlapRule::PriorityInverted,
                _ => continue,
            };

            warn!("{:?} at corner {}/{} towards {}", rule, id_a, id_b, toward);
            findings.push(OverlapFinding {
                rule,
                panels: [id_a.clone(), id_b.clone()],
                toward,
                details: OverlapDetails {
                    expected_winner,
                    extension_a: xa,
                    extension_b: xb,
                    sample,
                    claimed_by,
                },
            });
        }
    }
    findings
}

/// Each pair of laid-out panels that meet along an edge, once, in layout
/// order.
fn neighbour_pairs(layouts: &PanelLayouts) -> Vec<(&PanelLayout, &PanelLayout)> {
    let panels = layouts.as_slice();
    let index_of = |id: &PanelId| panels.iter().position(|p| &p.id == id);

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for (i, layout) in panels.iter().enumerate() {
        for edge in &layout.edges {
            let Some(j) = index_of(&edge.neighbor.panel_id()) else {
                continue;
            };
            let key = (i.min(j), i.max(j));
            if i != j && seen.insert(key) {
                pairs.push(key);
            }
        }
    }
    pairs.sort_unstable();
    pairs
        .into_iter()
        .map(|(i, j)| (&panels[i], &panels[j]))
        .collect()
}

/// Absolute range on the edge's axis covered by an outward extension.
fn extension_span(layout: &PanelLayout, edge: EdgePosition, extension: f64) -> (f64, f64) {
    let dir = layout.frame().edge_direction(edge);
    let range = if dir.axis == layout.frame().u.axis {
        layout.u_range
    } else {
        layout.v_range
    };
    if dir.positive {
        (range.1, range.1 + extension)
    } else {
        (range.0 - extension, range.0)
    }
}

fn mid(range: (f64, f64)) -> f64 {
    (range.0 + range.1) / 2.0
}

/// A panel claims a point inside its outline and within its plate.
fn claims(layout: &PanelLayout, outline: &[Point2], point: &Point3) -> bool {
    let (local, depth) = layout.placement.to_local(point);
    depth > EPSILON
        && depth < layout.thickness() - EPSILON
        && polygon::contains_point(outline, local)
}
