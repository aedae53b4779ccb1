//! Gender resolver
//!
//! Decides for every panel edge whether it carries tabs (male), slots
//! (female) or nothing, and defines the fixed priority order that settles
//! which of two panels owns a shared corner.

use boxkit_core::{AssemblySnapshot, Axis, EdgeStatus, FaceId, PanelId, TabDirection};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Joint type carried by one panel edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeJoint {
    /// Male: tabs protrude one thickness past the edge line.
    Tabbed,
    /// Female: the edge line is notched where the mate's tabs land.
    Slotted,
    /// No joint.
    Straight,
}

impl EdgeJoint {
    pub fn status(self) -> EdgeStatus {
        match self {
            EdgeJoint::Tabbed => EdgeStatus::Locked,
            EdgeJoint::Slotted => EdgeStatus::OutwardOnly,
            EdgeJoint::Straight => EdgeStatus::Unlocked,
        }
    }

    pub fn is_male(self) -> bool {
        self == EdgeJoint::Tabbed
    }
}

/// Role tier of a face under the given assembly axis. Lower wins.
///
/// Lids rank last. Of the four walls, the pair on the first of Z, X, Y that
/// is not the assembly axis ranks first.
pub fn face_tier(assembly_axis: Axis, face: FaceId) -> u8 {
    let axis = face.normal().axis;
    if axis == assembly_axis {
        return 2;
    }
    let primary = [Axis::Z, Axis::X, Axis::Y]
        .into_iter()
        .find(|&a| a != assembly_axis)
        .unwrap_or(Axis::Z);
    if axis == primary {
        0
    } else {
        1
    }
}

/// Total priority order between panels. `Ordering::Less` means `a` wins.
pub fn compare_panels(assembly_axis: Axis, a: &PanelId, b: &PanelId) -> Ordering {
    match (a, b) {
        (PanelId::Face(fa), PanelId::Face(fb)) => face_tier(assembly_axis, *fa)
            .cmp(&face_tier(assembly_axis, *fb))
            .then_with(|| fa.name().cmp(fb.name())),
        (PanelId::Face(_), PanelId::Divider(_)) => Ordering::Less,
        (PanelId::Divider(_), PanelId::Face(_)) => Ordering::Greater,
        (PanelId::Divider(va), PanelId::Divider(vb)) => va.cmp(vb),
    }
}

/// A lid keyed into the walls with tabs through slots, leaving the wall
/// edge plain: either inset below the rim, or the bottom lid of a footed
/// assembly.
pub fn is_keyed_lid(snapshot: &AssemblySnapshot, face: FaceId) -> bool {
    let config = &snapshot.config;
    config.is_lid(face) && (config.lid_inset(face) > 0.0 || config.feet_face() == Some(face))
}

/// Joint on the edge of face panel `face` that meets `neighbor`.
pub fn resolve_face_edge(snapshot: &AssemblySnapshot, face: FaceId, neighbor: FaceId) -> EdgeJoint {
    if !snapshot.is_solid(neighbor) {
        return EdgeJoint::Straight;
    }

    let config = &snapshot.config;
    let tab_direction = |lid: FaceId| {
        config
            .lid_config(lid)
            .map(|l| l.tab_direction)
            .unwrap_or_default()
    };

    match (config.is_lid(face), config.is_lid(neighbor)) {
        (true, _) => {
            if is_keyed_lid(snapshot, face) {
                return EdgeJoint::Tabbed;
            }
            match tab_direction(face) {
                TabDirection::TabsOut => EdgeJoint::Tabbed,
                TabDirection::TabsIn => EdgeJoint::Slotted,
            }
        }
        (false, true) => {
            if is_keyed_lid(snapshot, neighbor) {
                return EdgeJoint::Straight;
            }
            match tab_direction(neighbor) {
                TabDirection::TabsOut => EdgeJoint::Slotted,
                TabDirection::TabsIn => EdgeJoint::Tabbed,
            }
        }
        (false, false) => {
            let own = PanelId::Face(face);
            let other = PanelId::Face(neighbor);
            match compare_panels(config.assembly_axis, &own, &other) {
                Ordering::Less => EdgeJoint::Slotted,
                _ => EdgeJoint::Tabbed,
            }
        }
    }
}

/// Joint on a divider edge that meets an outer face.
///
/// Dividers tab into solid faces and stay plain against open faces and
/// against inset lids, which float free of them.
pub fn resolve_divider_face_edge(snapshot: &AssemblySnapshot, face: FaceId) -> EdgeJoint {
    if !snapshot.is_solid(face) || snapshot.config.lid_inset(face) > 0.0 {
        EdgeJoint::Straight
    } else {
        EdgeJoint::Tabbed
    }
}
