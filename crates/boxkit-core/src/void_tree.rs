//! Void tree
//!
//! The interior of an assembly is a tree of rectangular voids. A void that
//! is split holds exactly two children separated by a divider panel whose
//! centre plane sits at the split position.

use crate::config::AssemblyConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::geometry::{Axis, Bounds3, EPSILON};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoidSplit {
    pub axis: Axis,
    /// Absolute coordinate of the divider's centre plane
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Void {
    pub id: String,
    pub bounds: Bounds3,
    #[serde(default)]
    pub split: Option<VoidSplit>,
    #[serde(default)]
    pub children: Vec<Void>,
    /// Nested assembly occupying this void. Its panels are generated from
    /// its own snapshot, so the tree is not followed below it.
    #[serde(default)]
    pub sub_assembly: Option<String>,
}

impl Void {
    pub fn new(id: impl Into<String>, bounds: Bounds3) -> Self {
        Self {
            id: id.into(),
            bounds,
            split: None,
            children: Vec::new(),
            sub_assembly: None,
        }
    }

    /// Root void covering the interior of the assembly.
    pub fn root(config: &AssemblyConfig) -> Self {
        Self::new("root", config.interior_bounds())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Split this void with a divider of the given thickness.
    ///
    /// Children are named `<id>.0` (low side) and `<id>.1` (high side).
    pub fn split(&mut self, axis: Axis, position: f64, thickness: f64) -> ConfigResult<()> {
        if self.split.is_some() || !self.children.is_empty() {
            return Err(ConfigError::InvalidSplit {
                void_id: self.id.clone(),
                reason: "void is already split".to_string(),
            });
        }
        if self.sub_assembly.is_some() {
            return Err(ConfigError::InvalidSplit {
                void_id: self.id.clone(),
                reason: "void holds a sub-assembly".to_string(),
            });
        }

        let lo = self.bounds.min(axis);
        let hi = self.bounds.max(axis);
        let half = thickness / 2.0;
        if position - half <= lo + EPSILON || position + half >= hi - EPSILON {
            return Err(ConfigError::InvalidSplit {
                void_id: self.id.clone(),
                reason: format!(
                    "divider at {} on {} leaves no room inside [{}, {}]",
                    position, axis, lo, hi
                ),
            });
        }

        self.children = vec![
            Void::new(
                format!("{}.0", self.id),
                self.bounds.with_range(axis, lo, position - half),
            ),
            Void::new(
                format!("{}.1", self.id),
                self.bounds.with_range(axis, position + half, hi),
            ),
        ];
        self.split = Some(VoidSplit { axis, position });
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<&Void> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Void> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Split the void with the given id.
    pub fn split_void(
        &mut self,
        id: &str,
        axis: Axis,
        position: f64,
        thickness: f64,
    ) -> ConfigResult<()> {
        self.find_mut(id)
            .ok_or_else(|| ConfigError::UnknownVoid(id.to_string()))?
            .split(axis, position, thickness)
    }

    /// Depth-first pre-order visit of this void and its descendants.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Void)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Lower and upper child of a split void, ordered along the split axis.
    pub fn ordered_children(&self) -> Option<(&Void, &Void)> {
        let split = self.split?;
        match self.children.as_slice() {
            [a, b] => {
                if a.bounds.min(split.axis) <= b.bounds.min(split.axis) {
                    Some((a, b))
                } else {
                    Some((b, a))
                }
            }
            _ => None,
        }
    }
}
