//! Overlap validator against hand-assembled outline sets.

use boxkit_core::{
    AssemblyConfig, AssemblySnapshot, Axis, EdgePosition, FaceId, PanelId, Point2, Point3,
};
use boxkit_panels::{
    build_outline, polygon, validate_overlaps, FingerPatterns, OverlapFinding, OverlapRule,
    PanelLayouts,
};
use std::collections::HashMap;

/// Front and right both extend 20 mm towards the open top.
fn shared_corner() -> AssemblySnapshot {
    let mut snapshot = AssemblySnapshot::new(AssemblyConfig::default());
    snapshot.set_solid(FaceId::Top, false);
    snapshot.set_extension(PanelId::Face(FaceId::Front), EdgePosition::Top, 20.0);
    snapshot.set_extension(PanelId::Face(FaceId::Right), EdgePosition::Top, 20.0);
    snapshot
}

fn outlines_of(snapshot: &AssemblySnapshot) -> HashMap<PanelId, Vec<Point2>> {
    let patterns = FingerPatterns::compute(&snapshot.config);
    let layouts = PanelLayouts::build(snapshot, &patterns).expect("layout");
    layouts
        .iter()
        .map(|l| {
            let outline = build_outline(snapshot, &layouts, l).expect("outline");
            (l.id.clone(), outline.points)
        })
        .collect()
}

/// Outline of `panel` built as if it had not extended its top edge.
fn unextended(snapshot: &AssemblySnapshot, panel: &PanelId) -> Vec<Point2> {
    let mut plain = snapshot.clone();
    plain.set_extension(panel.clone(), EdgePosition::Top, 0.0);
    outlines_of(&plain)
        .remove(panel)
        .expect("panel outline")
}

/// Outline of `panel` built as if the other corner panel had not extended.
fn greedy(snapshot: &AssemblySnapshot, panel: &PanelId, other: &PanelId) -> Vec<Point2> {
    let mut alone = snapshot.clone();
    alone.set_extension(other.clone(), EdgePosition::Top, 0.0);
    outlines_of(&alone)
        .remove(panel)
        .expect("panel outline")
}

fn check(snapshot: &AssemblySnapshot, outlines: &HashMap<PanelId, Vec<Point2>>) -> Vec<OverlapFinding> {
    let patterns = FingerPatterns::compute(&snapshot.config);
    let layouts = PanelLayouts::build(snapshot, &patterns).expect("layout");
    validate_overlaps(snapshot, &layouts, outlines)
}

#[test]
fn test_generated_outlines_pass() {
    let snapshot = shared_corner();
    assert!(check(&snapshot, &outlines_of(&snapshot)).is_empty());
}

#[test]
fn test_priority_inverted() {
    let snapshot = shared_corner();
    let front = PanelId::Face(FaceId::Front);
    let right = PanelId::Face(FaceId::Right);

    let mut outlines = outlines_of(&snapshot);
    outlines.insert(front.clone(), unextended(&snapshot, &front));
    outlines.insert(right.clone(), greedy(&snapshot, &right, &front));

    let findings = check(&snapshot, &outlines);
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.rule, OverlapRule::PriorityInverted);
    assert_eq!(finding.toward, FaceId::Top);
    assert_eq!(finding.details.expected_winner, front);
    assert_eq!(finding.details.claimed_by, vec![right]);
}

#[test]
fn test_corner_unclaimed() {
    let snapshot = shared_corner();
    let front = PanelId::Face(FaceId::Front);

    let mut outlines = outlines_of(&snapshot);
    outlines.insert(front.clone(), unextended(&snapshot, &front));

    let findings = check(&snapshot, &outlines);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule, OverlapRule::CornerUnclaimed);
    assert!(findings[0].details.claimed_by.is_empty());
    assert_eq!(findings[0].details.extension_a, 20.0);
    assert_eq!(findings[0].details.extension_b, 20.0);
}

#[test]
fn test_sample_sits_in_the_corner_column() {
    let snapshot = shared_corner();
    let front = PanelId::Face(FaceId::Front);
    let right = PanelId::Face(FaceId::Right);

    let mut outlines = outlines_of(&snapshot);
    outlines.insert(right.clone(), greedy(&snapshot, &right, &front));

    let findings = check(&snapshot, &outlines);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule, OverlapRule::CornerOverlap);
    let sample = findings[0].details.sample;
    // Middle of the right plate, middle of the front plate, halfway up the
    // shorter extension.
    assert!((sample.x - 98.5).abs() < 1e-9);
    assert!((sample.y - 90.0).abs() < 1e-9);
    assert!((sample.z - 58.5).abs() < 1e-9);
}

/// Front and the centre divider both extend 20 mm towards the open top.
fn divider_corner() -> AssemblySnapshot {
    let mut snapshot = AssemblySnapshot::new(AssemblyConfig::default());
    snapshot.root.split(Axis::X, 50.0, 3.0).expect("split");
    snapshot.set_solid(FaceId::Top, false);
    snapshot.set_extension(PanelId::Face(FaceId::Front), EdgePosition::Top, 20.0);
    snapshot.set_extension(PanelId::Divider("root".into()), EdgePosition::Top, 20.0);
    snapshot
}

fn stock_at(snapshot: &AssemblySnapshot, outline: &[Point2], panel: &PanelId, point: &Point3) -> bool {
    let patterns = FingerPatterns::compute(&snapshot.config);
    let layouts = PanelLayouts::build(snapshot, &patterns).expect("layout");
    let layout = layouts.get(panel).expect("panel layout");
    let (local, depth) = layout.placement.to_local(point);
    depth > 0.0 && depth < layout.thickness() && polygon::contains_point(outline, local)
}

#[test]
fn test_divider_yields_column_to_face() {
    let snapshot = divider_corner();
    let front = PanelId::Face(FaceId::Front);
    let divider = PanelId::Divider("root".into());
    let outlines = outlines_of(&snapshot);

    assert!(check(&snapshot, &outlines).is_empty());

    // Divider centre plane, front plate middle, inside both extensions.
    let column = Point3::new(50.0, 88.5, 58.5);
    assert!(stock_at(&snapshot, &outlines[&front], &front, &column));
    assert!(!stock_at(&snapshot, &outlines[&divider], &divider, &column));
}

#[test]
fn test_greedy_divider_overlaps_face() {
    let snapshot = divider_corner();
    let front = PanelId::Face(FaceId::Front);
    let divider = PanelId::Divider("root".into());

    let mut outlines = outlines_of(&snapshot);
    outlines.insert(divider.clone(), greedy(&snapshot, &divider, &front));

    let findings = check(&snapshot, &outlines);
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.rule, OverlapRule::CornerOverlap);
    assert_eq!(finding.toward, FaceId::Top);
    assert_eq!(finding.details.expected_winner, front);
    let sample = finding.details.sample;
    assert!((sample.x - 50.0).abs() < 1e-9);
    assert!((sample.y - 88.5).abs() < 1e-9);
    assert!((sample.z - 58.5).abs() < 1e-9);
}
