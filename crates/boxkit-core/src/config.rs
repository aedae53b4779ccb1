//! Assembly configuration
//!
//! Outer dimensions, assembly axis, material and lid/feet settings. The
//! engine reads this as part of a snapshot and never mutates it.

use crate::error::{ConfigError, ConfigResult};
use crate::geometry::{Axis, Bounds3, FaceId, Point3, SignedAxis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    /// Sheet thickness in mm
    pub thickness: f64,
    /// Width of one finger segment in mm
    pub finger_width: f64,
    /// Gap left at each corner, in multiples of the finger width
    pub finger_gap: f64,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            thickness: 3.0,
            finger_width: 10.0,
            finger_gap: 1.5,
        }
    }
}

/// Which side of a lid joint carries the tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabDirection {
    /// Lid tabs point out into slots in the walls.
    #[default]
    TabsOut,
    /// Wall tabs point in to slots in the lid.
    TabsIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LidConfig {
    #[serde(default)]
    pub tab_direction: TabDirection,
    /// Distance the lid sits below the wall rim, in mm. Zero is flush.
    #[serde(default)]
    pub inset: f64,
}

/// Lid settings for the two faces perpendicular to the assembly axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LidPair {
    #[serde(default)]
    pub positive: LidConfig,
    #[serde(default)]
    pub negative: LidConfig,
}

/// Stepped feet cut into the bottom edge of each wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeetConfig {
    pub height: f64,
    pub width: f64,
    pub inset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    #[serde(default = "default_assembly_axis")]
    pub assembly_axis: Axis,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub lids: LidPair,
    #[serde(default)]
    pub feet: Option<FeetConfig>,
}

fn default_assembly_axis() -> Axis {
    Axis::Y
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 80.0,
            depth: 60.0,
            assembly_axis: Axis::Y,
            material: MaterialConfig::default(),
            lids: LidPair::default(),
            feet: None,
        }
    }
}

impl AssemblyConfig {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
            ..Self::default()
        }
    }

    /// Outer dimension along an axis.
    pub fn dimension(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Z => self.depth,
        }
    }

    pub fn thickness(&self) -> f64 {
        self.material.thickness
    }

    /// Lids are the two faces perpendicular to the assembly axis.
    pub fn is_lid(&self, face: FaceId) -> bool {
        face.normal().axis == self.assembly_axis
    }

    pub fn lid_config(&self, face: FaceId) -> Option<&LidConfig> {
        if !self.is_lid(face) {
            return None;
        }
        if face.normal().positive {
            Some(&self.lids.positive)
        } else {
            Some(&self.lids.negative)
        }
    }

    /// Lid inset in mm, zero for walls and flush lids.
    pub fn lid_inset(&self, face: FaceId) -> f64 {
        self.lid_config(face).map_or(0.0, |lid| lid.inset)
    }

    /// The face that carries feet, if feet are configured.
    pub fn feet_face(&self) -> Option<FaceId> {
        self.feet
            .as_ref()
            .map(|_| FaceId::from_normal(SignedAxis::neg(self.assembly_axis)))
    }

    /// Interior region enclosed by the six faces.
    pub fn interior_bounds(&self) -> Bounds3 {
        let t = self.thickness();
        Bounds3::new(
            Point3::new(t, t, t),
            Point3::new(
                self.width - 2.0 * t,
                self.height - 2.0 * t,
                self.depth - 2.0 * t,
            ),
        )
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let m = &self.material;

        if !(m.thickness > 0.0 && m.thickness <= 50.0) {
            return Err(ConfigError::OutOfRange {
                name: "thickness".to_string(),
                value: m.thickness,
                min: 0.0,
                max: 50.0,
            });
        }

        if !(m.finger_width > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "finger_width".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if !(m.finger_gap >= 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "finger_gap".to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        for axis in Axis::ALL {
            let dim = self.dimension(axis);
            if !(dim > 2.0 * m.thickness) {
                return Err(ConfigError::InvalidDimensions(format!(
                    "{} dimension {} mm must exceed twice the material thickness",
                    axis, dim
                )));
            }
        }

        let lid_span = self.dimension(self.assembly_axis) - 2.0 * m.thickness;
        for (name, lid) in [
            ("lids.positive.inset", &self.lids.positive),
            ("lids.negative.inset", &self.lids.negative),
        ] {
            if !(lid.inset >= 0.0 && lid.inset < lid_span) {
                return Err(ConfigError::OutOfRange {
                    name: name.to_string(),
                    value: lid.inset,
                    min: 0.0,
                    max: lid_span,
                });
            }
        }

        if let Some(feet) = &self.feet {
            if self.assembly_axis != Axis::Y {
                return Err(ConfigError::InvalidValue {
                    name: "feet".to_string(),
                    reason: "feet require a Y assembly axis".to_string(),
                });
            }
            if !(feet.height > 0.0 && feet.width > 0.0 && feet.inset >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    name: "feet".to_string(),
                    reason: "height and width must be positive, inset not negative".to_string(),
                });
            }
        }

        Ok(())
    }
}
