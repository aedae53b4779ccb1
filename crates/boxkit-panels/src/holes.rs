//! Hole generator
//!
//! Interior cut-outs of a panel: slots receiving the tabs of dividers and
//! keyed lids, slots left behind when a female edge is pushed outward, and
//! user cut-outs placed in the panel's safe space. Every hole is returned
//! counter-clockwise and must lie strictly inside the outline.

use crate::error::{PanelError, PanelResult};
use crate::gender::{is_keyed_lid, EdgeJoint};
use crate::layout::{NeighborRef, PanelLayout, PanelLayouts};
use crate::outline::{plan_edges, PanelOutline};
use crate::polygon;
use boxkit_core::{AssemblySnapshot, EdgePosition, FaceId, PanelId, Point2, EPSILON};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HoleSource {
    /// Receives a tab of this divider
    DividerSlot { divider: PanelId },
    /// Receives a tab of this keyed lid
    LidSlot { lid: FaceId },
    /// Slot of a female edge that was extended outward
    ExtensionSlot { edge: EdgePosition },
    Cutout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelHole {
    pub id: String,
    pub points: Vec<Point2>,
    pub source: HoleSource,
}

impl PanelHole {
    pub fn is_structural(&self) -> bool {
        !matches!(self.source, HoleSource::Cutout)
    }
}

/// Generate every hole of `layout` and check it against the outline.
pub fn generate_holes(
    snapshot: &AssemblySnapshot,
    layouts: &PanelLayouts,
    layout: &PanelLayout,
    outline: &PanelOutline,
) -> PanelResult<Vec<PanelHole>> {
    let mut holes = divider_slots(layouts, layout);
    holes.extend(lid_slots(snapshot, layouts, layout));
    holes.extend(extension_slots(snapshot, layout)?);

    for hole in &holes {
        if !polygon::strictly_inside(&hole.points, &outline.points) {
            return Err(PanelError::degenerate(
                &layout.id,
                format!("hole {} touches the outline", hole.id),
            ));
        }
    }

    let cutouts = cutouts(snapshot, layout, outline, &holes)?;
    holes.extend(cutouts);

    if !holes.is_empty() {
        debug!("Panel {}: {} holes", layout.id, holes.len());
    }
    Ok(holes)
}

/// Slots for the tabs of every divider edge that meets this panel.
fn divider_slots(layouts: &PanelLayouts, layout: &PanelLayout) -> Vec<PanelHole> {
    let mut holes = Vec::new();
    for divider in layouts.iter().filter(|p| !p.is_face() && p.id != layout.id) {
        let normal = divider.frame().normal.axis;
        for edge in divider
            .edges
            .iter()
            .filter(|e| e.joint == EdgeJoint::Tabbed && e.neighbor.panel_id() == layout.id)
        {
            let edge_axis = divider.frame().edge_axis(edge.position);
            for (i, &tab) in edge.tabs.iter().enumerate() {
                if let Some(points) = layout.local_rect(edge_axis, tab, normal, divider.w_range) {
                    holes.push(PanelHole {
                        id: format!("{}/{}/{}", divider.id, edge.position, i),
                        points,
                        source: HoleSource::DividerSlot {
                            divider: divider.id.clone(),
                        },
                    });
                }
            }
        }
    }
    holes
}

/// Slots for the tabs of keyed lids meeting this wall.
fn lid_slots(
    snapshot: &AssemblySnapshot,
    layouts: &PanelLayouts,
    layout: &PanelLayout,
) -> Vec<PanelHole> {
    let PanelId::Face(face) = layout.id else {
        return Vec::new();
    };
    let mut holes = Vec::new();
    for lid in FaceId::ALL
        .into_iter()
        .filter(|&f| is_keyed_lid(snapshot, f))
    {
        let Some(lid_layout) = layouts.get(&PanelId::Face(lid)) else {
            continue;
        };
        let Some(position) = lid_layout.edge_toward(&NeighborRef::Face(face)) else {
            continue;
        };
        let edge = lid_layout.edge(position);
        if edge.joint != EdgeJoint::Tabbed {
            continue;
        }
        let edge_axis = lid_layout.frame().edge_axis(position);
        let normal = lid_layout.frame().normal.axis;
        for (i, &tab) in edge.tabs.iter().enumerate() {
            if let Some(points) = layout.local_rect(edge_axis, tab, normal, lid_layout.w_range) {
                holes.push(PanelHole {
                    id: format!("lid:{}/{}", lid, i),
                    points,
                    source: HoleSource::LidSlot { lid },
                });
            }
        }
    }
    holes
}

/// Slots of female edges moved outward, kept at the original edge line.
fn extension_slots(snapshot: &AssemblySnapshot, layout: &PanelLayout) -> PanelResult<Vec<PanelHole>> {
    let plans = plan_edges(layout, &snapshot.extensions_for(&layout.id))?;
    let t = layout.thickness();
    let mut holes = Vec::new();

    for pos in EdgePosition::ALL {
        let edge = layout.edge(pos);
        let plan = plans[pos.index()];
        if edge.joint != EdgeJoint::Slotted || plan.extension <= 0.0 {
            continue;
        }
        let len = layout.edge_length(pos);
        let lo = plans[pos.prev().index()].depth.max(0.0);
        let hi = len - plans[pos.next().index()].depth.max(0.0);

        for (i, (a, b)) in layout
            .edge_tabs_local(pos)
            .into_iter()
            .filter(|&(a, b)| a >= lo - EPSILON && b <= hi + EPSILON)
            .enumerate()
        {
            let p = layout.edge_point(pos, a, 0.0);
            let q = layout.edge_point(pos, b, t);
            holes.push(PanelHole {
                id: format!("ext:{}/{}", pos, i),
                points: rect(p, q),
                source: HoleSource::ExtensionSlot { edge: pos },
            });
        }
    }
    Ok(holes)
}

/// User cut-outs, accepted only inside the safe space and clear of every
/// structural hole.
fn cutouts(
    snapshot: &AssemblySnapshot,
    layout: &PanelLayout,
    outline: &PanelOutline,
    structural: &[PanelHole],
) -> PanelResult<Vec<PanelHole>> {
    let requested: Vec<_> = snapshot
        .cutouts
        .iter()
        .filter(|c| c.panel == layout.id)
        .collect();
    if requested.is_empty() {
        return Ok(Vec::new());
    }

    let safe = safe_space(snapshot, layout)?;
    let mut accepted = Vec::with_capacity(requested.len());
    for cutout in requested {
        let rejected = || PanelError::CutoutOutsideSafeSpace {
            panel: layout.id.clone(),
            cutout: cutout.id.clone(),
        };

        let mut points = polygon::simplify(&cutout.points);
        if points.len() < 3 || polygon::has_self_intersection(&points) {
            return Err(rejected());
        }
        if polygon::is_clockwise(&points) {
            points.reverse();
        }

        let inside = polygon::strictly_inside(&points, &safe)
            && polygon::strictly_inside(&points, &outline.points);
        let clear = structural
            .iter()
            .chain(accepted.iter())
            .all(|hole: &PanelHole| !polygon::overlaps(&points, &hole.points));
        if !inside || !clear {
            warn!("Cutout '{}' rejected on panel {}", cutout.id, layout.id);
            return Err(rejected());
        }

        accepted.push(PanelHole {
            id: cutout.id.clone(),
            points,
            source: HoleSource::Cutout,
        });
    }
    Ok(accepted)
}

/// Region of a panel free of joints: inset by one thickness from every
/// edge that meets a solid neighbour, and by any inward extension.
pub fn safe_space(snapshot: &AssemblySnapshot, layout: &PanelLayout) -> PanelResult<Vec<Point2>> {
    let plans = plan_edges(layout, &snapshot.extensions_for(&layout.id))?;
    let t = layout.thickness();
    let margin = |pos: EdgePosition| {
        let solid = match &layout.edge(pos).neighbor {
            NeighborRef::Face(face) => snapshot.is_solid(*face),
            NeighborRef::Divider(_) => true,
        };
        plans[pos.index()].depth.max(0.0) + if solid { t } else { 0.0 }
    };

    Ok(rect(
        Point2::new(margin(EdgePosition::Left), margin(EdgePosition::Bottom)),
        Point2::new(
            layout.width - margin(EdgePosition::Right),
            layout.height - margin(EdgePosition::Top),
        ),
    ))
}

/// Counter-clockwise axis-aligned rectangle spanned by two corners.
fn rect(p: Point2, q: Point2) -> Vec<Point2> {
    let (x0, x1) = (p.x.min(q.x), p.x.max(q.x));
    let (y0, y1) = (p.y.min(q.y), p.y.max(q.y));
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}
