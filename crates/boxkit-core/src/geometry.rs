//! Geometry primitives
//!
//! Points, bounds and the small enumerations (axes, faces, edges, corners)
//! shared by every stage of panel generation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when comparing millimetre coordinates.
pub const EPSILON: f64 = 1e-6;

/// One of the three box axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes perpendicular to this one, in X, Y, Z order.
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// The axis perpendicular to both `self` and `other`.
    ///
    /// Returns `None` when both are the same axis.
    pub fn third(self, other: Axis) -> Option<Axis> {
        if self == other {
            return None;
        }
        Axis::ALL.into_iter().find(|a| *a != self && *a != other)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// An axis with a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedAxis {
    pub axis: Axis,
    pub positive: bool,
}

impl SignedAxis {
    pub const fn new(axis: Axis, positive: bool) -> Self {
        Self { axis, positive }
    }

    pub const fn pos(axis: Axis) -> Self {
        Self::new(axis, true)
    }

    pub const fn neg(axis: Axis) -> Self {
        Self::new(axis, false)
    }

    pub fn flipped(self) -> Self {
        Self::new(self.axis, !self.positive)
    }

    pub fn sign(self) -> f64 {
        if self.positive {
            1.0
        } else {
            -1.0
        }
    }

    /// Index into a six-slot table, two slots per axis.
    pub fn index(self) -> usize {
        self.axis.index() * 2 + usize::from(self.positive)
    }
}

impl fmt::Display for SignedAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.positive { '+' } else { '-' };
        write!(f, "{}{}", sign, self.axis)
    }
}

/// The six outer faces of an assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceId {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl FaceId {
    pub const ALL: [FaceId; 6] = [
        FaceId::Front,
        FaceId::Back,
        FaceId::Left,
        FaceId::Right,
        FaceId::Top,
        FaceId::Bottom,
    ];

    /// Outward normal of the face.
    pub fn normal(self) -> SignedAxis {
        match self {
            FaceId::Front => SignedAxis::pos(Axis::Z),
            FaceId::Back => SignedAxis::neg(Axis::Z),
            FaceId::Right => SignedAxis::pos(Axis::X),
            FaceId::Left => SignedAxis::neg(Axis::X),
            FaceId::Top => SignedAxis::pos(Axis::Y),
            FaceId::Bottom => SignedAxis::neg(Axis::Y),
        }
    }

    pub fn from_normal(normal: SignedAxis) -> Self {
        match (normal.axis, normal.positive) {
            (Axis::Z, true) => FaceId::Front,
            (Axis::Z, false) => FaceId::Back,
            (Axis::X, true) => FaceId::Right,
            (Axis::X, false) => FaceId::Left,
            (Axis::Y, true) => FaceId::Top,
            (Axis::Y, false) => FaceId::Bottom,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FaceId::Front => "front",
            FaceId::Back => "back",
            FaceId::Left => "left",
            FaceId::Right => "right",
            FaceId::Top => "top",
            FaceId::Bottom => "bottom",
        }
    }

    pub fn opposite(self) -> Self {
        Self::from_normal(self.normal().flipped())
    }

    /// Two faces are adjacent when they share a box edge.
    pub fn is_adjacent(self, other: FaceId) -> bool {
        self.normal().axis != other.normal().axis
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Panel-local edge, as seen from outside the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePosition {
    Top,
    Right,
    Bottom,
    Left,
}

impl EdgePosition {
    pub const ALL: [EdgePosition; 4] = [
        EdgePosition::Top,
        EdgePosition::Right,
        EdgePosition::Bottom,
        EdgePosition::Left,
    ];

    /// Clockwise traversal order starting at the bottom-left corner.
    pub const TRAVERSAL: [EdgePosition; 4] = [
        EdgePosition::Left,
        EdgePosition::Top,
        EdgePosition::Right,
        EdgePosition::Bottom,
    ];

    pub fn index(self) -> usize {
        match self {
            EdgePosition::Top => 0,
            EdgePosition::Right => 1,
            EdgePosition::Bottom => 2,
            EdgePosition::Left => 3,
        }
    }

    /// Runs along the panel's horizontal (u) axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, EdgePosition::Top | EdgePosition::Bottom)
    }

    /// Edge that follows this one in clockwise traversal.
    pub fn next(self) -> Self {
        match self {
            EdgePosition::Left => EdgePosition::Top,
            EdgePosition::Top => EdgePosition::Right,
            EdgePosition::Right => EdgePosition::Bottom,
            EdgePosition::Bottom => EdgePosition::Left,
        }
    }

    /// Edge that precedes this one in clockwise traversal.
    pub fn prev(self) -> Self {
        match self {
            EdgePosition::Left => EdgePosition::Bottom,
            EdgePosition::Top => EdgePosition::Left,
            EdgePosition::Right => EdgePosition::Top,
            EdgePosition::Bottom => EdgePosition::Right,
        }
    }
}

impl fmt::Display for EdgePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgePosition::Top => write!(f, "top"),
            EdgePosition::Right => write!(f, "right"),
            EdgePosition::Bottom => write!(f, "bottom"),
            EdgePosition::Left => write!(f, "left"),
        }
    }
}

/// Panel-local corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerPosition {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl CornerPosition {
    pub const ALL: [CornerPosition; 4] = [
        CornerPosition::TopLeft,
        CornerPosition::TopRight,
        CornerPosition::BottomRight,
        CornerPosition::BottomLeft,
    ];

    /// The (incoming, outgoing) edges meeting at this corner in clockwise
    /// traversal.
    pub fn edges(self) -> (EdgePosition, EdgePosition) {
        match self {
            CornerPosition::TopLeft => (EdgePosition::Left, EdgePosition::Top),
            CornerPosition::TopRight => (EdgePosition::Top, EdgePosition::Right),
            CornerPosition::BottomRight => (EdgePosition::Right, EdgePosition::Bottom),
            CornerPosition::BottomLeft => (EdgePosition::Bottom, EdgePosition::Left),
        }
    }

    /// Unit direction pointing away from the panel centre towards this
    /// corner.
    pub fn direction(self) -> (f64, f64) {
        match self {
            CornerPosition::TopLeft => (-1.0, 1.0),
            CornerPosition::TopRight => (1.0, 1.0),
            CornerPosition::BottomRight => (1.0, -1.0),
            CornerPosition::BottomLeft => (-1.0, -1.0),
        }
    }
}

impl fmt::Display for CornerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CornerPosition::TopLeft => write!(f, "top-left"),
            CornerPosition::TopRight => write!(f, "top-right"),
            CornerPosition::BottomRight => write!(f, "bottom-right"),
            CornerPosition::BottomLeft => write!(f, "bottom-left"),
        }
    }
}

/// A point in a panel's local 2D frame (millimetres, y up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn approx_eq(&self, other: &Point2) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

/// A point in assembly space (millimetres, origin at the outer min corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }
}

/// Axis-aligned box given by its min corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub origin: Point3,
    pub size: Point3,
}

impl Bounds3 {
    pub fn new(origin: Point3, size: Point3) -> Self {
        Self { origin, size }
    }

    pub fn min(&self, axis: Axis) -> f64 {
        self.origin.get(axis)
    }

    pub fn max(&self, axis: Axis) -> f64 {
        self.origin.get(axis) + self.size.get(axis)
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        self.size.get(axis)
    }

    /// Copy of these bounds limited to `[lo, hi]` on one axis.
    pub fn with_range(&self, axis: Axis, lo: f64, hi: f64) -> Self {
        let mut origin = self.origin;
        let mut size = self.size;
        origin.set(axis, lo);
        size.set(axis, hi - lo);
        Self { origin, size }
    }

    pub fn contains(&self, p: &Point3) -> bool {
        Axis::ALL
            .iter()
            .all(|&a| p.get(a) >= self.min(a) - EPSILON && p.get(a) <= self.max(a) + EPSILON)
    }
}
