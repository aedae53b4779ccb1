//! Property-based checks of the engine's invariants.
//!
//! Run with: cargo test -p boxkit-panels -- properties

use crate::common::{assert_well_formed, bounds, face, has_point, report};
use approx::assert_relative_eq;
use boxkit_core::{
    AssemblyConfig, AssemblySnapshot, Axis, Cutout, EdgePosition, FaceId, FeetConfig,
    MaterialConfig, PanelId, SignedAxis,
};
use boxkit_panels::{
    build_outline, compare_panels, polygon, EdgeJoint, FingerPatterns, NeighborRef, PanelError,
    PanelLayouts,
};
use proptest::prelude::*;
use std::cmp::Ordering;

// =============================================================================
// Strategies
// =============================================================================

fn arb_axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)]
}

fn arb_panel_id() -> impl Strategy<Value = PanelId> {
    prop_oneof![
        prop::sample::select(FaceId::ALL.to_vec()).prop_map(PanelId::Face),
        prop::sample::select(vec!["root", "root.0", "root.1", "root.0.1"])
            .prop_map(|id| PanelId::Divider(id.to_string())),
    ]
}

/// Closed-box configuration with finger widths comfortably above the
/// sheet thickness.
fn arb_config() -> impl Strategy<Value = AssemblyConfig> {
    (
        60.0..300.0f64,
        60.0..300.0f64,
        60.0..300.0f64,
        2.0..4.0f64,
        8.0..20.0f64,
    )
        .prop_map(|(width, height, depth, thickness, finger_width)| AssemblyConfig {
            material: MaterialConfig {
                thickness,
                finger_width,
                ..MaterialConfig::default()
            },
            ..AssemblyConfig::new(width, height, depth)
        })
}

fn open_top_box() -> AssemblySnapshot {
    let mut snapshot = AssemblySnapshot::new(AssemblyConfig::default());
    snapshot.set_solid(FaceId::Top, false);
    snapshot
}

// =============================================================================
// Property Tests: Finger alignment
// =============================================================================

proptest! {
    /// Both panels of a shared edge see the same absolute tab ranges and
    /// opposite genders.
    #[test]
    fn mating_edges_align(config in arb_config()) {
        let snapshot = AssemblySnapshot::new(config);
        let patterns = FingerPatterns::compute(&snapshot.config);
        let layouts = PanelLayouts::build(&snapshot, &patterns).expect("layout");

        for layout in layouts.iter().filter(|l| l.is_face()) {
            let PanelId::Face(own) = layout.id else { continue };
            for edge in &layout.edges {
                let NeighborRef::Face(neighbor) = edge.neighbor else { continue };
                let other = layouts.get(&PanelId::Face(neighbor)).expect("neighbor layout");
                let mate = other
                    .edge_toward(&NeighborRef::Face(own))
                    .map(|pos| other.edge(pos))
                    .expect("mating edge");

                prop_assert_eq!(&edge.tabs, &mate.tabs, "{} / {}", own, neighbor);
                let genders = (edge.joint, mate.joint);
                prop_assert!(
                    matches!(
                        genders,
                        (EdgeJoint::Tabbed, EdgeJoint::Slotted)
                            | (EdgeJoint::Slotted, EdgeJoint::Tabbed)
                    ),
                    "{} / {}: {:?}",
                    own,
                    neighbor,
                    genders
                );
            }
        }
    }

    /// Every tab lies inside its axis and clears the corner gap.
    #[test]
    fn tabs_stay_inside_axis(config in arb_config()) {
        let patterns = FingerPatterns::compute(&config);
        let t = config.thickness();
        for axis in Axis::ALL {
            let pattern = patterns.get(axis);
            let corner_gap = config.material.finger_width * config.material.finger_gap;
            for (a, b) in pattern.tab_segments() {
                prop_assert!(a >= t + corner_gap - 1e-6);
                prop_assert!(b <= config.dimension(axis) - t - corner_gap + 1e-6);
                prop_assert!(b > a);
            }
        }
    }
}

// =============================================================================
// Property Tests: Extensions
// =============================================================================

proptest! {
    /// Growing an extension never shrinks the panel.
    #[test]
    fn extension_is_monotonic(small in 0.0..40.0f64, extra in 0.0..40.0f64) {
        let area_with = |e: f64| {
            let mut snapshot = open_top_box();
            snapshot.set_extension(PanelId::Face(FaceId::Front), EdgePosition::Top, e);
            let report = report(&snapshot);
            let front = face(&report, FaceId::Front);
            let (_, max) = bounds(&front.outline.points);
            (polygon::signed_area(&front.outline.points).abs(), max.y)
        };

        let (area_small, top_small) = area_with(small);
        let (area_large, top_large) = area_with(small + extra);
        prop_assert!(area_large >= area_small - 1e-6);
        prop_assert!((top_small - (80.0 + small)).abs() < 1e-6);
        prop_assert!((top_large - (80.0 + small + extra)).abs() < 1e-6);
    }

    /// Two extended edges meet in one diagonal corner point.
    #[test]
    fn extended_edges_merge_corner(e1 in 1.0..30.0f64, e2 in 1.0..30.0f64) {
        let mut snapshot = open_top_box();
        snapshot.set_solid(FaceId::Right, false);
        let front = PanelId::Face(FaceId::Front);
        snapshot.set_extension(front.clone(), EdgePosition::Top, e1);
        snapshot.set_extension(front, EdgePosition::Right, e2);

        let report = report(&snapshot);
        prop_assert!(report.failures.is_empty(), "{:?}", report.failures);
        let panel = face(&report, FaceId::Front);
        prop_assert!(has_point(&panel.outline.points, 100.0 + e2, 80.0 + e1));
        assert_well_formed(panel);
    }

    /// Varied boxes, with or without a lid and a divider, produce simple
    /// clockwise outlines with holes strictly inside.
    #[test]
    fn outlines_are_well_formed(
        config in arb_config(),
        open_top in any::<bool>(),
        split in prop::option::of(0.3..0.7f64),
    ) {
        let mut snapshot = AssemblySnapshot::new(config);
        snapshot.set_solid(FaceId::Top, !open_top);
        if let Some(fraction) = split {
            let t = snapshot.config.thickness();
            let position = t + fraction * (snapshot.config.width - 2.0 * t);
            snapshot.root.split(Axis::X, position, t).expect("split");
        }

        let report = report(&snapshot);
        prop_assert!(report.failures.is_empty(), "{:?}", report.failures);
        for panel in &report.panels {
            assert_well_formed(panel);
        }
    }
}

#[test]
fn test_extended_edge_matrix() {
    let order = [
        EdgePosition::Top,
        EdgePosition::Right,
        EdgePosition::Left,
        EdgePosition::Bottom,
    ];
    let front = PanelId::Face(FaceId::Front);

    for count in [0, 1, 2, 4] {
        for with_cutout in [false, true] {
            for with_feet in [false, true] {
                let mut config = AssemblyConfig::default();
                if with_feet {
                    config.feet = Some(FeetConfig {
                        height: 15.0,
                        width: 20.0,
                        inset: 5.0,
                    });
                }
                let mut snapshot = AssemblySnapshot::new(config);
                for &edge in &order[..count] {
                    snapshot.set_extension(front.clone(), edge, 10.0);
                }
                if with_cutout {
                    snapshot
                        .cutouts
                        .push(Cutout::rect(front.clone(), "window", 40.0, 30.0, 20.0, 15.0));
                }
                let case = format!("{} edges, cutout {}, feet {}", count, with_cutout, with_feet);

                let patterns = FingerPatterns::compute(&snapshot.config);
                let layouts = PanelLayouts::build(&snapshot, &patterns).expect("layout");
                let layout = layouts.get(&front).expect("front layout");
                let outline = build_outline(&snapshot, &layouts, layout);

                if with_feet && count == 4 {
                    assert!(
                        matches!(outline, Err(PanelError::ExtensionRejected { .. })),
                        "{}: {:?}",
                        case,
                        outline
                    );
                    continue;
                }

                let outline = outline.unwrap_or_else(|e| panic!("{}: {}", case, e));
                assert!(!polygon::has_self_intersection(&outline.points), "{}", case);
                assert!(polygon::is_clockwise(&outline.points), "{}", case);

                let report = report(&snapshot);
                assert!(report.failures.is_empty(), "{}: {:?}", case, report.failures);
                let panel = face(&report, FaceId::Front);
                assert_eq!(
                    panel.holes.iter().filter(|h| !h.is_structural()).count(),
                    usize::from(with_cutout),
                    "{}",
                    case
                );
                assert_well_formed(panel);
            }
        }
    }
}

// =============================================================================
// Property Tests: Priority
// =============================================================================

proptest! {
    #[test]
    fn priority_is_antisymmetric(axis in arb_axis(), a in arb_panel_id(), b in arb_panel_id()) {
        prop_assert_eq!(
            compare_panels(axis, &a, &b),
            compare_panels(axis, &b, &a).reverse()
        );
        prop_assert_eq!(compare_panels(axis, &a, &b) == Ordering::Equal, a == b);
    }

    #[test]
    fn priority_is_transitive(
        axis in arb_axis(),
        a in arb_panel_id(),
        b in arb_panel_id(),
        c in arb_panel_id(),
    ) {
        if compare_panels(axis, &a, &b) == Ordering::Less
            && compare_panels(axis, &b, &c) == Ordering::Less
        {
            prop_assert_eq!(compare_panels(axis, &a, &c), Ordering::Less);
        }
    }
}

/// A lower-tier wall extending towards the positive lid keeps its full
/// width once the walls that would outrank it are open.
#[test]
fn test_open_neighbors_do_not_conflict() {
    for axis in Axis::ALL {
        let primary = [Axis::Z, Axis::X, Axis::Y]
            .into_iter()
            .find(|&a| a != axis)
            .expect("primary axis");
        let secondary = axis.third(primary).expect("secondary axis");

        let mut config = AssemblyConfig::default();
        config.assembly_axis = axis;
        let mut snapshot = AssemblySnapshot::new(config);
        for positive in [false, true] {
            snapshot.set_solid(FaceId::from_normal(SignedAxis::new(primary, positive)), false);
        }

        let wall = PanelId::Face(FaceId::from_normal(SignedAxis::pos(secondary)));
        let lid = FaceId::from_normal(SignedAxis::pos(axis));
        let patterns = FingerPatterns::compute(&snapshot.config);
        let layouts = PanelLayouts::build(&snapshot, &patterns).expect("layout");
        let layout = layouts.get(&wall).expect("wall layout");
        let edge = layout
            .edge_toward(&NeighborRef::Face(lid))
            .expect("edge towards lid");
        let (width, height) = (layout.width, layout.height);
        snapshot.set_extension(wall.clone(), edge, 10.0);

        let report = report(&snapshot);
        assert!(report.failures.is_empty(), "{}: {:?}", axis, report.failures);
        assert!(report.findings.is_empty(), "{}: {:?}", axis, report.findings);

        let panel = report.panel(&wall).expect("wall panel");
        let (min, max) = bounds(&panel.outline.points);
        let (grown, full) = if edge.is_horizontal() {
            (max.y - min.y, max.x - min.x)
        } else {
            (max.x - min.x, max.y - min.y)
        };
        let (base, span) = if edge.is_horizontal() {
            (height, width)
        } else {
            (width, height)
        };
        assert_relative_eq!(grown, base + 10.0);
        assert_relative_eq!(full, span);
        assert_well_formed(panel);
    }
}
