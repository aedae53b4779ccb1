//! Outline builder
//!
//! Traces a panel's closed outline clockwise from its bottom-left corner:
//! left edge up, top edge right, right edge down, bottom edge left. Each
//! edge is drawn in edge-local coordinates `(s, d)` where `s` runs along
//! the traversal direction and `d` is the depth inward from the panel's
//! outer line, then mapped into the panel frame.

use crate::error::{PanelError, PanelResult};
use crate::gender::{compare_panels, EdgeJoint};
use crate::layout::{NeighborRef, PanelLayout, PanelLayouts, Placement};
use crate::polygon;
use boxkit_core::{
    AssemblySnapshot, CornerPosition, EdgeExtensions, EdgePosition, FeetConfig, Point2,
    EPSILON,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, warn};

const FILLET_SEGMENTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelOutline {
    pub points: Vec<Point2>,
    pub placement: Placement,
}

/// Resolved line of one edge for a generation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EdgePlan {
    pub extension: f64,
    /// Depth of the edge line from the outer line, positive inward
    pub depth: f64,
    /// Edge moved outward past the outer line
    pub outward: bool,
    /// Edge carries finger transitions between its corners
    pub jointed: bool,
    pub male: bool,
    pub feet: bool,
}

/// Check stored extensions against edge status and resolve edge lines.
pub(crate) fn plan_edges(
    layout: &PanelLayout,
    extensions: &EdgeExtensions,
) -> PanelResult<[EdgePlan; 4]> {
    for edge in &layout.edges {
        edge.status
            .check(edge.position, extensions.get(edge.position))
            .map_err(|source| PanelError::ExtensionRejected {
                panel: layout.id.clone(),
                source,
            })?;
    }

    let t = layout.thickness();
    Ok(EdgePosition::ALL.map(|pos| {
        let edge = layout.edge(pos);
        let e = extensions.get(pos);
        let has_tabs = !edge.tabs.is_empty();
        let (depth, outward, jointed) = if edge.feet {
            (-t, false, false)
        } else {
            match edge.joint {
                EdgeJoint::Tabbed => (t, false, has_tabs),
                EdgeJoint::Slotted if e > 0.0 => (-e, true, false),
                EdgeJoint::Slotted => (0.0, false, has_tabs),
                EdgeJoint::Straight => (-e, e > 0.0, false),
            }
        };
        EdgePlan {
            extension: e,
            depth,
            outward,
            jointed,
            male: edge.joint.is_male(),
            feet: edge.feet,
        }
    }))
}

/// Build the outline of one panel.
pub fn build_outline(
    snapshot: &AssemblySnapshot,
    layouts: &PanelLayouts,
    layout: &PanelLayout,
) -> PanelResult<PanelOutline> {
    let extensions = snapshot.extensions_for(&layout.id);
    let plans = plan_edges(layout, &extensions)?;
    let plan = |pos: EdgePosition| plans[pos.index()];

    let usable_w = layout.width
        - plan(EdgePosition::Left).depth.max(0.0)
        - plan(EdgePosition::Right).depth.max(0.0);
    let usable_h = layout.height
        - plan(EdgePosition::Top).depth.max(0.0)
        - plan(EdgePosition::Bottom).depth.max(0.0);
    if usable_w <= EPSILON || usable_h <= EPSILON {
        return Err(PanelError::degenerate(
            &layout.id,
            format!("usable extent {:.3} x {:.3} mm", usable_w, usable_h),
        ));
    }

    let tracer = Tracer {
        snapshot,
        layouts,
        layout,
        plans,
    };

    let mut points = Vec::new();
    for edge in EdgePosition::TRAVERSAL {
        for p in tracer.corner(edge.prev(), edge) {
            polygon::push_unique(&mut points, p);
        }
        for p in tracer.interior(edge)? {
            polygon::push_unique(&mut points, p);
        }
    }
    let mut points = polygon::simplify(&points);

    for fillet in snapshot.fillets.iter().filter(|f| f.panel == layout.id) {
        points = apply_fillet(&points, fillet.corner, fillet.radius).map_err(|reason| {
            PanelError::FilletRejected {
                panel: layout.id.clone(),
                corner: fillet.corner,
                reason,
            }
        })?;
    }

    if polygon::has_self_intersection(&points) {
        return Err(PanelError::degenerate(&layout.id, "outline intersects itself"));
    }
    if !polygon::is_clockwise(&points) {
        return Err(PanelError::degenerate(&layout.id, "outline is not clockwise"));
    }

    debug!("Panel {} outline: {} points", layout.id, points.len());

    Ok(PanelOutline {
        points,
        placement: layout.placement,
    })
}

struct Tracer<'a> {
    snapshot: &'a AssemblySnapshot,
    layouts: &'a PanelLayouts,
    layout: &'a PanelLayout,
    plans: [EdgePlan; 4],
}

impl Tracer<'_> {
    fn plan(&self, pos: EdgePosition) -> EdgePlan {
        self.plans[pos.index()]
    }

    fn at(&self, pos: EdgePosition, s: f64, d: f64) -> Point2 {
        self.layout.edge_point(pos, s, d)
    }

    /// Points joining edge `prev` to edge `next`.
    fn corner(&self, prev: EdgePosition, next: EdgePosition) -> Vec<Point2> {
        let (p, n) = (self.plan(prev), self.plan(next));
        match (p.outward, n.outward) {
            (true, false) => {
                let f = self.flap(prev, next);
                let len = self.layout.edge_length(prev);
                vec![
                    self.at(prev, len - f, p.depth),
                    self.at(prev, len - f, 0.0),
                    self.at(next, 0.0, n.depth),
                ]
            }
            (false, true) => {
                let f = self.flap(next, prev);
                vec![
                    self.at(next, p.depth, 0.0),
                    self.at(next, f, 0.0),
                    self.at(next, f, n.depth),
                ]
            }
            (true, true) => self.merged_corner(prev, next),
            _ => vec![self.at(next, p.depth, n.depth)],
        }
    }

    /// Corner between two outward edges. Without a conflict this is one
    /// diagonal point; an edge whose stock yields to the panel across the
    /// other edge steps back one thickness from the outer corner instead.
    fn merged_corner(&self, prev: EdgePosition, next: EdgePosition) -> Vec<Point2> {
        let (p, n) = (self.plan(prev), self.plan(next));
        let t = self.layout.thickness();
        let prev_yields = self.yields(prev, next);
        let next_yields = self.yields(next, prev);

        let mut points = Vec::with_capacity(5);
        match (prev_yields, next_yields) {
            (false, false) => points.push(self.at(next, p.depth, n.depth)),
            (true, false) => {
                let len = self.layout.edge_length(prev);
                points.extend([
                    self.at(prev, len - t, p.depth),
                    self.at(prev, len - t, 0.0),
                    self.at(next, 0.0, n.depth),
                ]);
            }
            (false, true) => points.extend([
                self.at(next, p.depth, 0.0),
                self.at(next, t, 0.0),
                self.at(next, t, n.depth),
            ]),
            (true, true) => {
                let len = self.layout.edge_length(prev);
                points.extend([
                    self.at(prev, len - t, p.depth),
                    self.at(prev, len - t, 0.0),
                    self.at(next, 0.0, 0.0),
                    self.at(next, t, 0.0),
                    self.at(next, t, n.depth),
                ]);
            }
        }
        points
    }

    /// Distance from the outer corner at which the outward stock of
    /// `extended` starts, next to the un-extended `adjacent` edge.
    fn flap(&self, extended: EdgePosition, adjacent: EdgePosition) -> f64 {
        let a = self.plan(adjacent);
        let mut f: f64 = 0.0;
        if a.depth > 0.0 && !a.male {
            f = a.depth;
        }
        if self.yields(extended, adjacent) {
            f = f.max(self.layout.thickness());
        }
        f
    }

    /// Whether the panel across `adjacent` also extends towards the face
    /// `extended` meets and outranks this panel. Dividers lose to every
    /// face and to dividers earlier in void order.
    fn yields(&self, extended: EdgePosition, adjacent: EdgePosition) -> bool {
        let target = &self.layout.edge(extended).neighbor;
        if !matches!(target, NeighborRef::Face(_)) {
            return false;
        }
        let across = self.layout.edge(adjacent).neighbor.panel_id();
        let Some(other) = self.layouts.get(&across) else {
            return false;
        };
        let Some(other_edge) = other.edge_toward(target) else {
            return false;
        };
        let other_extension = self.snapshot.extensions_for(&other.id).get(other_edge);
        other_extension > 0.0
            && compare_panels(
                self.snapshot.config.assembly_axis,
                &self.layout.id,
                &other.id,
            ) == Ordering::Greater
    }

    /// Points strictly between the two corners of an edge.
    fn interior(&self, pos: EdgePosition) -> PanelResult<Vec<Point2>> {
        let plan = self.plan(pos);
        if plan.feet {
            return self.feet(pos);
        }
        if !plan.jointed {
            return Ok(Vec::new());
        }

        let len = self.layout.edge_length(pos);
        let lo = self.plan(pos.prev()).depth.max(0.0);
        let hi = len - self.plan(pos.next()).depth.max(0.0);
        let t = self.layout.thickness();

        let tabs = self.layout.edge_tabs_local(pos);
        let total = tabs.len();
        let mut points = Vec::with_capacity(total * 4);
        let mut kept = 0;
        for (a, b) in tabs {
            if a < lo - EPSILON || b > hi + EPSILON {
                continue;
            }
            kept += 1;
            if plan.male {
                points.extend([
                    self.at(pos, a, t),
                    self.at(pos, a, 0.0),
                    self.at(pos, b, 0.0),
                    self.at(pos, b, t),
                ]);
            } else {
                points.extend([
                    self.at(pos, a, 0.0),
                    self.at(pos, a, t),
                    self.at(pos, b, t),
                    self.at(pos, b, 0.0),
                ]);
            }
        }
        if kept < total {
            warn!(
                "Panel {} {} edge: dropped {} partial finger segments",
                self.layout.id,
                pos,
                total - kept
            );
        }
        Ok(points)
    }

    /// Stepped feet along a wall's bottom edge.
    fn feet(&self, pos: EdgePosition) -> PanelResult<Vec<Point2>> {
        let Some(FeetConfig {
            height,
            width,
            inset,
        }) = self.snapshot.config.feet
        else {
            return Ok(Vec::new());
        };
        let t = self.layout.thickness();
        if height <= t + EPSILON {
            return Err(PanelError::degenerate(
                &self.layout.id,
                format!("foot height {} mm does not clear the {} mm joint line", height, t),
            ));
        }

        let len = self.layout.edge_length(pos);
        let start = self.plan(pos.prev()).depth.max(0.0) + inset;
        let end = len - self.plan(pos.next()).depth.max(0.0) - inset;
        if end - start - 2.0 * width <= EPSILON {
            return Err(PanelError::degenerate(
                &self.layout.id,
                "no gap left between the feet",
            ));
        }

        Ok([
            (start, -t),
            (start, -height),
            (start + width, -height),
            (start + width, -t),
            (end - width, -t),
            (end - width, -height),
            (end, -height),
            (end, -t),
        ]
        .into_iter()
        .map(|(s, d)| self.at(pos, s, d))
        .collect())
    }
}

/// Replace the extreme vertex towards `corner` with a quarter arc.
fn apply_fillet(points: &[Point2], corner: CornerPosition, radius: f64) -> Result<Vec<Point2>, String> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(format!("radius {} is not positive", radius));
    }
    let n = points.len();
    if n < 3 {
        return Err("outline has too few points".to_string());
    }

    let (dx, dy) = corner.direction();
    let score = |p: &Point2| dx * p.x + dy * p.y;
    let mut k = 0;
    for (i, p) in points.iter().enumerate() {
        if score(p) > score(&points[k]) + EPSILON {
            k = i;
        }
    }

    let prev = points[(k + n - 1) % n];
    let cur = points[k];
    let next = points[(k + 1) % n];
    let (len_in, len_out) = (prev.distance(&cur), cur.distance(&next));
    let d_in = ((cur.x - prev.x) / len_in, (cur.y - prev.y) / len_in);
    let d_out = ((next.x - cur.x) / len_out, (next.y - cur.y) / len_out);

    let axis_aligned = |d: (f64, f64)| d.0.abs() < EPSILON || d.1.abs() < EPSILON;
    if !axis_aligned(d_in) || !axis_aligned(d_out) {
        return Err("corner edges are not axis-aligned".to_string());
    }
    if d_in.0 * d_out.1 - d_in.1 * d_out.0 >= 0.0 {
        return Err("corner is not convex".to_string());
    }
    if len_in < radius - EPSILON || len_out < radius - EPSILON {
        return Err(format!(
            "radius {} exceeds adjacent edge length {:.3}",
            radius,
            len_in.min(len_out)
        ));
    }

    let center = Point2::new(
        cur.x - d_in.0 * radius + d_out.0 * radius,
        cur.y - d_in.1 * radius + d_out.1 * radius,
    );
    let arc = (0..=FILLET_SEGMENTS).map(|i| {
        let theta = FRAC_PI_2 * i as f64 / FILLET_SEGMENTS as f64;
        let (sin, cos) = theta.sin_cos();
        Point2::new(
            center.x - d_out.0 * radius * cos + d_in.0 * radius * sin,
            center.y - d_out.1 * radius * cos + d_in.1 * radius * sin,
        )
    });

    let mut out = Vec::with_capacity(n + FILLET_SEGMENTS);
    out.extend_from_slice(&points[..k]);
    for p in arc {
        polygon::push_unique(&mut out, p);
    }
    for p in &points[k + 1..] {
        polygon::push_unique(&mut out, *p);
    }
    if out.len() > 1 && out[0].approx_eq(&out[out.len() - 1]) {
        out.pop();
    }
    Ok(out)
}
