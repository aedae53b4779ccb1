//! Finger-axis aligner
//!
//! Every edge that runs along the same assembly axis must place its tabs
//! and slots at the same absolute positions, otherwise mating panels do not
//! fit. One [`FingerAxisPattern`] is computed per axis and generation pass
//! and shared by all edges on that axis.

use boxkit_core::{AssemblyConfig, Axis, MaterialConfig, EPSILON};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tab/slot transitions along one axis.
///
/// Transitions are relative to `origin` and alternate tab start, tab end.
/// The pattern always starts and ends with a tab, so the segment count is
/// odd and every even-indexed segment is a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerAxisPattern {
    pub axis: Axis,
    /// Absolute coordinate where the pattern's inner range starts
    pub origin: f64,
    pub inner_length: f64,
    pub transitions: Vec<f64>,
    pub inner_offset: f64,
    /// Finger width, or zero when the axis is too short for any finger
    pub finger_length: f64,
}

impl FingerAxisPattern {
    /// Aligned pattern for an assembly axis of outer length `axis_length`.
    pub fn for_axis(axis: Axis, axis_length: f64, material: &MaterialConfig) -> Self {
        let t = material.thickness;
        Self::over_range(axis, t, axis_length - t, material)
    }

    /// Pattern over an arbitrary absolute range.
    ///
    /// Used directly for divider-to-divider joints, which only have to agree
    /// with each other and not with the assembly axis.
    pub fn over_range(axis: Axis, start: f64, end: f64, material: &MaterialConfig) -> Self {
        let inner_length = end - start;
        let finger = material.finger_width;
        let corner_gap = finger * material.finger_gap;
        let usable = inner_length - 2.0 * corner_gap;

        let mut count = if usable > 0.0 && finger > 0.0 {
            (usable / finger + EPSILON).floor() as usize
        } else {
            0
        };
        if count % 2 == 0 {
            count = count.saturating_sub(1);
        }

        if count == 0 {
            debug!(
                "Axis {} too short for fingers ({:.2} mm usable), edges degrade to straight",
                axis,
                usable
            );
            return Self {
                axis,
                origin: start,
                inner_length,
                transitions: Vec::new(),
                inner_offset: 0.0,
                finger_length: 0.0,
            };
        }

        let leftover = usable - count as f64 * finger;
        let inner_offset = corner_gap + leftover / 2.0;
        let transitions: Vec<f64> = (0..=count)
            .map(|i| inner_offset + i as f64 * finger)
            .collect();

        debug!(
            "Axis {} pattern: {} segments of {:.2} mm, offset {:.3} mm",
            axis,
            count,
            finger,
            inner_offset
        );

        Self {
            axis,
            origin: start,
            inner_length,
            transitions,
            inner_offset,
            finger_length: finger,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.finger_length == 0.0 || self.transitions.is_empty()
    }

    /// Number of tab and slot segments.
    pub fn segment_count(&self) -> usize {
        self.transitions.len().saturating_sub(1)
    }

    /// Absolute `(start, end)` of every tab.
    pub fn tab_segments(&self) -> Vec<(f64, f64)> {
        self.transitions
            .chunks_exact(2)
            .map(|pair| (self.origin + pair[0], self.origin + pair[1]))
            .collect()
    }

    /// Tabs lying fully inside `[lo, hi]`; partial tabs are dropped.
    pub fn tabs_within(&self, lo: f64, hi: f64) -> Vec<(f64, f64)> {
        self.tab_segments()
            .into_iter()
            .filter(|&(a, b)| a >= lo - EPSILON && b <= hi + EPSILON)
            .collect()
    }
}

/// The three aligned patterns of one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerPatterns {
    pub x: FingerAxisPattern,
    pub y: FingerAxisPattern,
    pub z: FingerAxisPattern,
}

impl FingerPatterns {
    pub fn compute(config: &AssemblyConfig) -> Self {
        let pattern = |axis| FingerAxisPattern::for_axis(axis, config.dimension(axis), &config.material);
        Self {
            x: pattern(Axis::X),
            y: pattern(Axis::Y),
            z: pattern(Axis::Z),
        }
    }

    pub fn get(&self, axis: Axis) -> &FingerAxisPattern {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}
