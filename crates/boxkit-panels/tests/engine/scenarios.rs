//! End-to-end generation scenarios.

use crate::common::{assert_well_formed, bounds, face, has_point, report};
use approx::assert_relative_eq;
use boxkit_core::{
    AssemblyConfig, AssemblySnapshot, Axis, EdgePosition, FaceId, FeetConfig, PanelId,
    TabDirection,
};
use boxkit_panels::{build_outline, validate_overlaps, FingerPatterns, HoleSource, OverlapRule, PanelLayouts};
use std::collections::HashMap;

#[test]
fn test_single_extension_reaches_full_width() {
    let mut snapshot = AssemblySnapshot::new(AssemblyConfig::default());
    snapshot.set_extension(PanelId::Face(FaceId::Front), EdgePosition::Top, 20.0);

    let report = report(&snapshot);
    assert!(report.is_clean());
    let front = face(&report, FaceId::Front);
    let (min, max) = bounds(&front.outline.points);
    assert_relative_eq!(max.y - min.y, 100.0);
    assert_relative_eq!(min.x, 0.0);
    assert_relative_eq!(max.x, 100.0);
    assert!(has_point(&front.outline.points, 0.0, 100.0));
    assert!(has_point(&front.outline.points, 100.0, 100.0));

    // The top edge was female; its slots stay behind as holes.
    assert_eq!(
        front
            .holes
            .iter()
            .filter(|h| h.source == HoleSource::ExtensionSlot { edge: EdgePosition::Top })
            .count(),
        3
    );
    assert_well_formed(front);
}

#[test]
fn test_shared_corner_goes_to_priority_winner() {
    let mut snapshot = AssemblySnapshot::new(AssemblyConfig::default());
    let front = PanelId::Face(FaceId::Front);
    let right = PanelId::Face(FaceId::Right);
    snapshot.set_extension(front.clone(), EdgePosition::Top, 20.0);
    snapshot.set_extension(right.clone(), EdgePosition::Top, 20.0);

    let report = report(&snapshot);
    assert!(report.findings.is_empty());
    assert!(report.failures.is_empty());

    // Front outranks right: front keeps the full width, right yields one
    // thickness at the shared corner.
    let front_panel = face(&report, FaceId::Front);
    assert!(has_point(&front_panel.outline.points, 100.0, 100.0));
    let right_panel = face(&report, FaceId::Right);
    assert!(has_point(&right_panel.outline.points, 3.0, 100.0));
    assert!(!has_point(&right_panel.outline.points, 0.0, 100.0));

    // Building right as if front had not extended puts both in the column.
    let mut hidden = snapshot.clone();
    hidden.set_extension(front, EdgePosition::Top, 0.0);
    let patterns = FingerPatterns::compute(&hidden.config);
    let hidden_layouts = PanelLayouts::build(&hidden, &patterns).expect("layout");
    let right_layout = hidden_layouts.get(&right).expect("right layout");
    let greedy_right = build_outline(&hidden, &hidden_layouts, right_layout).expect("outline");

    let mut outlines: HashMap<_, _> = report
        .panels
        .iter()
        .map(|p| (p.id.clone(), p.outline.points.clone()))
        .collect();
    outlines.insert(right, greedy_right.points);

    let layouts = PanelLayouts::build(&snapshot, &patterns).expect("layout");
    let findings = validate_overlaps(&snapshot, &layouts, &outlines);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule, OverlapRule::CornerOverlap);
    assert_eq!(findings[0].toward, FaceId::Top);
    assert_eq!(findings[0].details.expected_winner, PanelId::Face(FaceId::Front));
}

#[test]
fn test_feet_on_wall_bottoms() {
    let mut config = AssemblyConfig::default();
    config.feet = Some(FeetConfig {
        height: 15.0,
        width: 20.0,
        inset: 5.0,
    });
    let snapshot = AssemblySnapshot::new(config);
    let report = report(&snapshot);
    assert!(report.failures.is_empty(), "{:?}", report.failures);

    let front = face(&report, FaceId::Front);
    let points = &front.outline.points;
    let (min, _) = bounds(points);
    assert_relative_eq!(min.y, -15.0);
    // Foot bottoms span [5, 25] and [75, 95].
    for x in [5.0, 25.0, 75.0, 95.0] {
        assert!(has_point(points, x, -15.0), "foot corner at x = {}", x);
    }
    // Between the feet the edge clears the lid joint by one thickness.
    assert!(has_point(points, 25.0, -3.0));
    assert!(has_point(points, 75.0, -3.0));

    // The bottom lid is keyed into the walls through slots.
    assert_eq!(
        front
            .holes
            .iter()
            .filter(|h| h.source == HoleSource::LidSlot { lid: FaceId::Bottom })
            .count(),
        3
    );
    for panel in &report.panels {
        assert_well_formed(panel);
    }
}

#[test]
fn test_divider_slot_in_side_wall() {
    let mut snapshot = AssemblySnapshot::new(AssemblyConfig::new(106.0, 60.0, 106.0));
    snapshot.root.split(Axis::Z, 53.0, 3.0).expect("split");

    let report = report(&snapshot);
    assert!(report.is_clean());

    let left = face(&report, FaceId::Left);
    assert_eq!(left.holes.len(), 1);
    let (min, max) = bounds(&left.holes[0].points);
    assert_relative_eq!(min.x, 51.5);
    assert_relative_eq!(max.x, 54.5);
    assert_relative_eq!(min.y, 25.0);
    assert_relative_eq!(max.y, 35.0);

    for panel in &report.panels {
        assert_well_formed(panel);
    }
}

#[test]
fn test_inset_lid_and_dividers() {
    let mut config = AssemblyConfig::new(160.0, 90.0, 120.0);
    config.lids.positive.inset = 12.0;
    let mut snapshot = AssemblySnapshot::new(config);
    snapshot.root.split(Axis::X, 80.0, 3.0).expect("split");
    snapshot
        .root
        .split_void("root.0", Axis::Z, 60.0, 3.0)
        .expect("nested split");

    let report = report(&snapshot);
    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(report.panels.len(), 8);
    for panel in &report.panels {
        assert_well_formed(panel);
    }

    let parent = report
        .panel(&PanelId::Divider("root".to_string()))
        .expect("parent divider");
    assert!(parent.holes.iter().any(|h| h.source
        == HoleSource::DividerSlot {
            divider: PanelId::Divider("root.0".to_string())
        }));
}

#[test]
fn test_lid_with_merged_corner_yields_to_wall() {
    let mut config = AssemblyConfig::default();
    config.lids.positive.tab_direction = TabDirection::TabsIn;
    let mut snapshot = AssemblySnapshot::new(config);
    let top = PanelId::Face(FaceId::Top);
    snapshot.set_extension(top.clone(), EdgePosition::Right, 10.0);
    snapshot.set_extension(top.clone(), EdgePosition::Bottom, 10.0);
    snapshot.set_extension(PanelId::Face(FaceId::Front), EdgePosition::Right, 10.0);

    let report = report(&snapshot);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert!(report.findings.is_empty(), "{:?}", report.findings);

    // Top's right-hand stock stops one thickness short of the front wall
    // instead of meeting the front extension in a diagonal point.
    let lid = report.panel(&top).expect("top panel");
    let points = &lid.outline.points;
    assert!(!has_point(points, 110.0, -10.0));
    assert!(has_point(points, 110.0, 3.0));
    assert!(has_point(points, 100.0, 3.0));
    assert!(has_point(points, 100.0, -10.0));
    assert_well_formed(lid);
}

#[test]
fn test_feet_without_gap_fail_only_walls() {
    let mut config = AssemblyConfig::default();
    config.feet = Some(FeetConfig {
        height: 15.0,
        width: 60.0,
        inset: 5.0,
    });
    let report = report(&AssemblySnapshot::new(config));

    assert_eq!(report.panels.len(), 2);
    assert!(report.panel(&PanelId::Face(FaceId::Top)).is_some());
    assert!(report.panel(&PanelId::Face(FaceId::Bottom)).is_some());
    assert_eq!(report.failures.len(), 4);
    for failure in &report.failures {
        assert!(
            failure.error.contains("no gap left between the feet"),
            "{}: {}",
            failure.panel,
            failure.error
        );
    }
}

#[test]
fn test_feet_too_short_for_joint_fail_only_walls() {
    let mut config = AssemblyConfig::default();
    config.feet = Some(FeetConfig {
        height: 3.0,
        width: 20.0,
        inset: 5.0,
    });
    let report = report(&AssemblySnapshot::new(config));

    assert_eq!(report.panels.len(), 2);
    let mut failed: Vec<_> = report.failures.iter().map(|f| f.panel.clone()).collect();
    failed.sort_by_key(|id| id.to_string());
    assert_eq!(
        failed,
        vec![
            PanelId::Face(FaceId::Back),
            PanelId::Face(FaceId::Front),
            PanelId::Face(FaceId::Left),
            PanelId::Face(FaceId::Right),
        ]
    );
    assert!(report
        .failures
        .iter()
        .all(|f| f.error.contains("does not clear")));
}
