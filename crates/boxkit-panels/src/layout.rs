//! Panel layout
//!
//! Derives every panel of an assembly from a snapshot: the six outer faces
//! (when solid) and one divider per split void. Each layout carries the
//! panel's local frame, its placement in assembly space, its extents and
//! the joint classification of its four edges.

use crate::error::{PanelError, PanelResult};
use crate::finger::{FingerAxisPattern, FingerPatterns};
use crate::gender::{resolve_divider_face_edge, resolve_face_edge, EdgeJoint};
use boxkit_core::{
    AssemblySnapshot, Axis, EdgePosition, EdgeStatus, FaceId, PanelId, Point2, Point3, SignedAxis,
    Void,
};
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// What lies across a panel edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborRef {
    Face(FaceId),
    Divider(String),
}

impl NeighborRef {
    pub fn panel_id(&self) -> PanelId {
        match self {
            NeighborRef::Face(face) => PanelId::Face(*face),
            NeighborRef::Divider(void_id) => PanelId::Divider(void_id.clone()),
        }
    }
}

/// Where a panel comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSource {
    Face(FaceId),
    Divider {
        void_id: String,
        axis: Axis,
        position: f64,
    },
}

/// Local axes of a panel as seen from outside: `u` right, `v` up and
/// `normal` towards the viewer, with `u × v = normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelFrame {
    pub u: SignedAxis,
    pub v: SignedAxis,
    pub normal: SignedAxis,
}

impl PanelFrame {
    pub fn for_face(face: FaceId) -> Self {
        let (u, v) = match face {
            FaceId::Front => (SignedAxis::pos(Axis::X), SignedAxis::pos(Axis::Y)),
            FaceId::Back => (SignedAxis::neg(Axis::X), SignedAxis::pos(Axis::Y)),
            FaceId::Right => (SignedAxis::neg(Axis::Z), SignedAxis::pos(Axis::Y)),
            FaceId::Left => (SignedAxis::pos(Axis::Z), SignedAxis::pos(Axis::Y)),
            FaceId::Top => (SignedAxis::pos(Axis::X), SignedAxis::neg(Axis::Z)),
            FaceId::Bottom => (SignedAxis::pos(Axis::X), SignedAxis::pos(Axis::Z)),
        };
        Self {
            u,
            v,
            normal: face.normal(),
        }
    }

    /// Dividers perpendicular to `axis` share the frame of that axis'
    /// positive face.
    pub fn for_divider(axis: Axis) -> Self {
        Self::for_face(FaceId::from_normal(SignedAxis::pos(axis)))
    }

    /// Assembly direction an edge faces.
    pub fn edge_direction(&self, edge: EdgePosition) -> SignedAxis {
        match edge {
            EdgePosition::Top => self.v,
            EdgePosition::Bottom => self.v.flipped(),
            EdgePosition::Right => self.u,
            EdgePosition::Left => self.u.flipped(),
        }
    }

    /// Assembly axis an edge runs along.
    pub fn edge_axis(&self, edge: EdgePosition) -> Axis {
        if edge.is_horizontal() {
            self.u.axis
        } else {
            self.v.axis
        }
    }
}

/// Rigid placement of a panel's local frame in assembly space.
///
/// The local origin is the panel's bottom-left corner on its outer surface.
/// Depth is measured inward from the outer surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub frame: PanelFrame,
    pub origin: Point3,
    pub thickness: f64,
}

impl Placement {
    pub fn to_world(&self, p: Point2, depth: f64) -> Point3 {
        let mut world = self.origin;
        let f = &self.frame;
        world.set(f.u.axis, world.get(f.u.axis) + f.u.sign() * p.x);
        world.set(f.v.axis, world.get(f.v.axis) + f.v.sign() * p.y);
        world.set(f.normal.axis, world.get(f.normal.axis) - f.normal.sign() * depth);
        world
    }

    pub fn to_local(&self, p: &Point3) -> (Point2, f64) {
        let f = &self.frame;
        let delta = |axis: SignedAxis| (p.get(axis.axis) - self.origin.get(axis.axis)) * axis.sign();
        (Point2::new(delta(f.u), delta(f.v)), -delta(f.normal))
    }

    /// Homogeneous transform taking `(x, y, depth, 1)` to assembly space.
    pub fn matrix(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        let f = &self.frame;
        let columns = [
            (f.u.axis, f.u.sign()),
            (f.v.axis, f.v.sign()),
            (f.normal.axis, -f.normal.sign()),
        ];
        for (col, (axis, sign)) in columns.into_iter().enumerate() {
            for row in 0..3 {
                m[(row, col)] = if row == axis.index() { sign } else { 0.0 };
            }
        }
        m[(0, 3)] = self.origin.x;
        m[(1, 3)] = self.origin.y;
        m[(2, 3)] = self.origin.z;
        m
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLayout {
    pub position: EdgePosition,
    pub neighbor: NeighborRef,
    pub joint: EdgeJoint,
    pub status: EdgeStatus,
    /// Absolute tab ranges along the edge axis
    pub tabs: Vec<(f64, f64)>,
    /// Bottom edge of a wall carrying feet
    pub feet: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    pub id: PanelId,
    pub source: PanelSource,
    pub placement: Placement,
    pub width: f64,
    pub height: f64,
    pub u_range: (f64, f64),
    pub v_range: (f64, f64),
    /// Absolute range occupied on the normal axis
    pub w_range: (f64, f64),
    pub edges: [EdgeLayout; 4],
}

impl PanelLayout {
    pub fn is_face(&self) -> bool {
        matches!(self.id, PanelId::Face(_))
    }

    pub fn frame(&self) -> &PanelFrame {
        &self.placement.frame
    }

    pub fn thickness(&self) -> f64 {
        self.placement.thickness
    }

    pub fn edge(&self, position: EdgePosition) -> &EdgeLayout {
        &self.edges[position.index()]
    }

    /// First edge whose neighbour is `neighbor`.
    pub fn edge_toward(&self, neighbor: &NeighborRef) -> Option<EdgePosition> {
        EdgePosition::ALL
            .into_iter()
            .find(|&pos| &self.edge(pos).neighbor == neighbor)
    }

    pub fn edge_length(&self, position: EdgePosition) -> f64 {
        if position.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }

    /// Local coordinate of an absolute position on an in-plane axis.
    pub fn local_coord(&self, axis: Axis, value: f64) -> Option<f64> {
        let f = self.frame();
        [f.u, f.v]
            .into_iter()
            .find(|a| a.axis == axis)
            .map(|a| (value - self.placement.origin.get(axis)) * a.sign())
    }

    /// Distance along an edge, in traversal direction, of an absolute
    /// position on the edge axis.
    pub fn edge_s(&self, position: EdgePosition, value: f64) -> f64 {
        let c = self
            .local_coord(self.frame().edge_axis(position), value)
            .unwrap_or(0.0);
        match position {
            EdgePosition::Left | EdgePosition::Top => c,
            EdgePosition::Right => self.height - c,
            EdgePosition::Bottom => self.width - c,
        }
    }

    /// Local point at distance `s` along an edge and depth `d` inward from
    /// its outer line.
    pub fn edge_point(&self, position: EdgePosition, s: f64, d: f64) -> Point2 {
        let (w, h) = (self.width, self.height);
        match position {
            EdgePosition::Left => Point2::new(d, s),
            EdgePosition::Top => Point2::new(s, h - d),
            EdgePosition::Right => Point2::new(w - d, h - s),
            EdgePosition::Bottom => Point2::new(w - s, d),
        }
    }

    /// Tab ranges of an edge in edge-local distance, ascending.
    pub fn edge_tabs_local(&self, position: EdgePosition) -> Vec<(f64, f64)> {
        let mut tabs: Vec<(f64, f64)> = self
            .edge(position)
            .tabs
            .iter()
            .map(|&(a, b)| {
                let (sa, sb) = (self.edge_s(position, a), self.edge_s(position, b));
                (sa.min(sb), sa.max(sb))
            })
            .collect();
        tabs.sort_by(|a, b| a.0.total_cmp(&b.0));
        tabs
    }

    /// Counter-clockwise local rectangle for absolute ranges on two
    /// in-plane axes. `None` if either axis is not in the panel plane.
    pub fn local_rect(
        &self,
        axis_a: Axis,
        range_a: (f64, f64),
        axis_b: Axis,
        range_b: (f64, f64),
    ) -> Option<Vec<Point2>> {
        let u_axis = self.frame().u.axis;
        let ((ux, ur), (vx, vr)) = if axis_a == u_axis {
            ((axis_a, range_a), (axis_b, range_b))
        } else {
            ((axis_b, range_b), (axis_a, range_a))
        };
        if ux != u_axis || vx != self.frame().v.axis {
            return None;
        }
        let x0 = self.local_coord(ux, ur.0)?;
        let x1 = self.local_coord(ux, ur.1)?;
        let y0 = self.local_coord(vx, vr.0)?;
        let y1 = self.local_coord(vx, vr.1)?;
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        Some(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
    }
}

/// All panels of one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelLayouts {
    panels: Vec<PanelLayout>,
}

impl PanelLayouts {
    pub fn build(snapshot: &AssemblySnapshot, patterns: &FingerPatterns) -> PanelResult<Self> {
        let mut panels: Vec<PanelLayout> = FaceId::ALL
            .into_iter()
            .filter(|&face| snapshot.is_solid(face))
            .map(|face| face_layout(snapshot, patterns, face))
            .collect();

        let mut seen = HashSet::new();
        let mut duplicate = None;
        snapshot.root.visit(&mut |void| {
            if !seen.insert(void.id.as_str()) && duplicate.is_none() {
                duplicate = Some(void.id.clone());
            }
        });
        if let Some(id) = duplicate {
            return Err(PanelError::InvalidReference(format!(
                "void id '{}' appears more than once",
                id
            )));
        }

        let root_neighbors: [NeighborRef; 6] = std::array::from_fn(|i| {
            let axis = Axis::ALL[i / 2];
            NeighborRef::Face(FaceId::from_normal(SignedAxis::new(axis, i % 2 == 1)))
        });
        collect_dividers(snapshot, patterns, &snapshot.root, &root_neighbors, &mut panels)?;

        debug!("Laid out {} panels", panels.len());
        Ok(Self { panels })
    }

    pub fn get(&self, id: &PanelId) -> Option<&PanelLayout> {
        self.panels.iter().find(|p| &p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelLayout> {
        self.panels.iter()
    }

    pub fn as_slice(&self) -> &[PanelLayout] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

fn face_layout(snapshot: &AssemblySnapshot, patterns: &FingerPatterns, face: FaceId) -> PanelLayout {
    let config = &snapshot.config;
    let t = config.thickness();
    let frame = PanelFrame::for_face(face);

    let depth = config.dimension(frame.normal.axis);
    let inset = config.lid_inset(face);
    let w_range = if frame.normal.positive {
        (depth - inset - t, depth - inset)
    } else {
        (inset, inset + t)
    };
    let u_range = (0.0, config.dimension(frame.u.axis));
    let v_range = (0.0, config.dimension(frame.v.axis));

    let feet_face = config.feet_face();
    let edges = EdgePosition::ALL.map(|position| {
        let neighbor = FaceId::from_normal(frame.edge_direction(position));
        let joint = resolve_face_edge(snapshot, face, neighbor);
        let feet = !config.is_lid(face) && feet_face == Some(neighbor);
        let tabs = if joint == EdgeJoint::Straight || feet {
            Vec::new()
        } else {
            patterns.get(frame.edge_axis(position)).tab_segments()
        };
        EdgeLayout {
            position,
            neighbor: NeighborRef::Face(neighbor),
            joint,
            status: if feet { EdgeStatus::Locked } else { joint.status() },
            tabs,
            feet,
        }
    });

    PanelLayout {
        id: PanelId::Face(face),
        source: PanelSource::Face(face),
        placement: Placement {
            frame,
            origin: origin_for(&frame, u_range, v_range, w_range),
            thickness: t,
        },
        width: u_range.1 - u_range.0,
        height: v_range.1 - v_range.0,
        u_range,
        v_range,
        w_range,
        edges,
    }
}

fn collect_dividers(
    snapshot: &AssemblySnapshot,
    patterns: &FingerPatterns,
    void: &Void,
    neighbors: &[NeighborRef; 6],
    out: &mut Vec<PanelLayout>,
) -> PanelResult<()> {
    let Some(split) = void.split else {
        return Ok(());
    };
    let (low, high) = void.ordered_children().ok_or_else(|| {
        PanelError::InvalidReference(format!(
            "void '{}' is split but does not hold two children",
            void.id
        ))
    })?;

    out.push(divider_layout(snapshot, patterns, void, split.axis, split.position, neighbors));

    let divider = NeighborRef::Divider(void.id.clone());
    let mut low_neighbors = neighbors.clone();
    low_neighbors[SignedAxis::pos(split.axis).index()] = divider.clone();
    let mut high_neighbors = neighbors.clone();
    high_neighbors[SignedAxis::neg(split.axis).index()] = divider;

    collect_dividers(snapshot, patterns, low, &low_neighbors, out)?;
    collect_dividers(snapshot, patterns, high, &high_neighbors, out)
}

fn divider_layout(
    snapshot: &AssemblySnapshot,
    patterns: &FingerPatterns,
    void: &Void,
    axis: Axis,
    position: f64,
    neighbors: &[NeighborRef; 6],
) -> PanelLayout {
    let config = &snapshot.config;
    let t = config.thickness();
    let frame = PanelFrame::for_divider(axis);

    let joints = EdgePosition::ALL.map(|pos| {
        let neighbor = &neighbors[frame.edge_direction(pos).index()];
        match neighbor {
            NeighborRef::Face(face) => resolve_divider_face_edge(snapshot, *face),
            NeighborRef::Divider(_) => EdgeJoint::Tabbed,
        }
    });

    // Body ranges: the void, clipped below inset lids.
    let mut body = [
        (void.bounds.min(frame.u.axis), void.bounds.max(frame.u.axis)),
        (void.bounds.min(frame.v.axis), void.bounds.max(frame.v.axis)),
    ];
    for pos in EdgePosition::ALL {
        let dir = frame.edge_direction(pos);
        if let NeighborRef::Face(face) = &neighbors[dir.index()] {
            let inset = config.lid_inset(*face);
            if snapshot.is_solid(*face) && inset > 0.0 {
                let range = &mut body[usize::from(dir.axis == frame.v.axis)];
                if dir.positive {
                    range.1 = range.1.min(config.dimension(dir.axis) - inset - t);
                } else {
                    range.0 = range.0.max(inset + t);
                }
            }
        }
    }

    let mut outer = body;
    for pos in EdgePosition::ALL {
        if joints[pos.index()] == EdgeJoint::Tabbed {
            let dir = frame.edge_direction(pos);
            let range = &mut outer[usize::from(dir.axis == frame.v.axis)];
            if dir.positive {
                range.1 += t;
            } else {
                range.0 -= t;
            }
        }
    }

    let edges = EdgePosition::ALL.map(|pos| {
        let neighbor = neighbors[frame.edge_direction(pos).index()].clone();
        let joint = joints[pos.index()];
        let edge_axis = frame.edge_axis(pos);
        let (lo, hi) = body[usize::from(edge_axis == frame.v.axis)];
        let tabs = match (&neighbor, joint) {
            (_, EdgeJoint::Straight) => Vec::new(),
            (NeighborRef::Divider(_), _) => {
                FingerAxisPattern::over_range(edge_axis, lo, hi, &config.material).tab_segments()
            }
            (NeighborRef::Face(_), _) => patterns.get(edge_axis).tabs_within(lo, hi),
        };
        EdgeLayout {
            position: pos,
            neighbor,
            joint,
            status: joint.status(),
            tabs,
            feet: false,
        }
    });

    let (u_range, v_range) = (outer[0], outer[1]);
    let w_range = (position - t / 2.0, position + t / 2.0);

    PanelLayout {
        id: PanelId::Divider(void.id.clone()),
        source: PanelSource::Divider {
            void_id: void.id.clone(),
            axis,
            position,
        },
        placement: Placement {
            frame,
            origin: origin_for(&frame, u_range, v_range, w_range),
            thickness: t,
        },
        width: u_range.1 - u_range.0,
        height: v_range.1 - v_range.0,
        u_range,
        v_range,
        w_range,
        edges,
    }
}

fn origin_for(
    frame: &PanelFrame,
    u_range: (f64, f64),
    v_range: (f64, f64),
    w_range: (f64, f64),
) -> Point3 {
    let pick = |axis: SignedAxis, range: (f64, f64)| if axis.positive { range.0 } else { range.1 };
    let mut origin = Point3::default();
    origin.set(frame.u.axis, pick(frame.u, u_range));
    origin.set(frame.v.axis, pick(frame.v, v_range));
    origin.set(
        frame.normal.axis,
        if frame.normal.positive { w_range.1 } else { w_range.0 },
    );
    origin
}
