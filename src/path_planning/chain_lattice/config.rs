//! Configuration loading for the chain lattice environment

use std::path::Path;

use serde::Deserialize;

use crate::common::{PlanningError, PlanningResult};

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct ChainLatticeConfig {
    /// Angular resolution shared by all joints (degrees, default: 1.0)
    #[serde(default = "default_angle_resolution_deg")]
    pub angle_resolution_deg: f64,

    /// Per-joint resolution override (degrees)
    #[serde(default)]
    pub joint_resolutions_deg: Option<Vec<f64>>,

    /// Joints whose angle wraps around a full turn
    #[serde(default)]
    pub wrap_joints: Vec<bool>,

    /// Distance (cells) at or below which only fine primitives are used (default: 5)
    #[serde(default = "default_distance_switch_threshold")]
    pub distance_switch_threshold: u32,

    /// Constant cost of one edge (default: 1000)
    #[serde(default = "default_edge_cost")]
    pub edge_cost: i32,

    /// Keep one state per (coordinate, primitive) pair (default: false)
    #[serde(default)]
    pub key_by_primitive: bool,

    /// Heuristic cost of one end-effector cell (default: 100)
    #[serde(default = "default_heuristic_cost_per_cell")]
    pub heuristic_cost_per_cell: i32,

    #[serde(default)]
    pub primitives: PrimitiveConfig,
}

/// Motion primitive generation settings
#[derive(Clone, Debug, Deserialize)]
pub struct PrimitiveConfig {
    /// Fine joint step (degrees, default: 4.0)
    #[serde(default = "default_normal_step_deg")]
    pub normal_step_deg: f64,

    /// Long-range joint step (degrees); enables resolution switching
    #[serde(default)]
    pub coarse_step_deg: Option<f64>,

    /// `[min, max]` per joint (degrees)
    #[serde(default)]
    pub joint_limits_deg: Option<Vec<[f64; 2]>>,
}

impl Default for PrimitiveConfig {
    fn default() -> Self {
        Self {
            normal_step_deg: default_normal_step_deg(),
            coarse_step_deg: None,
            joint_limits_deg: None,
        }
    }
}

impl Default for ChainLatticeConfig {
    fn default() -> Self {
        Self {
            angle_resolution_deg: default_angle_resolution_deg(),
            joint_resolutions_deg: None,
            wrap_joints: Vec::new(),
            distance_switch_threshold: default_distance_switch_threshold(),
            edge_cost: default_edge_cost(),
            key_by_primitive: false,
            heuristic_cost_per_cell: default_heuristic_cost_per_cell(),
            primitives: PrimitiveConfig::default(),
        }
    }
}

// Default value functions
fn default_angle_resolution_deg() -> f64 {
    1.0
}
fn default_distance_switch_threshold() -> u32 {
    5
}
fn default_edge_cost() -> i32 {
    1000
}
fn default_heuristic_cost_per_cell() -> i32 {
    100
}
fn default_normal_step_deg() -> f64 {
    4.0
}

impl ChainLatticeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> PlanningResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> PlanningResult<Self> {
        let config: ChainLatticeConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Per-joint resolutions in radians
    pub fn joint_resolutions_rad(&self, num_joints: usize) -> Vec<f64> {
        match &self.joint_resolutions_deg {
            Some(res) => res.iter().map(|r| r.to_radians()).collect(),
            None => vec![self.angle_resolution_deg.to_radians(); num_joints],
        }
    }

    /// Per-joint wrap flags, unlisted joints do not wrap
    pub fn joint_wraps(&self, num_joints: usize) -> Vec<bool> {
        (0..num_joints)
            .map(|j| self.wrap_joints.get(j).copied().unwrap_or(false))
            .collect()
    }

    pub fn validate(&self, num_joints: usize) -> PlanningResult<()> {
        if !(self.angle_resolution_deg > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "angle_resolution_deg must be positive, got {}",
                self.angle_resolution_deg
            )));
        }
        if let Some(res) = &self.joint_resolutions_deg {
            if res.len() != num_joints {
                return Err(PlanningError::InvalidParameter(format!(
                    "{} joint resolutions for {} joints",
                    res.len(),
                    num_joints
                )));
            }
        }
        if self.wrap_joints.len() > num_joints {
            return Err(PlanningError::InvalidParameter(format!(
                "{} wrap flags for {} joints",
                self.wrap_joints.len(),
                num_joints
            )));
        }
        if self.edge_cost <= 0 {
            return Err(PlanningError::InvalidParameter(format!(
                "edge_cost must be positive, got {}",
                self.edge_cost
            )));
        }
        if self.heuristic_cost_per_cell < 0 {
            return Err(PlanningError::InvalidParameter(format!(
                "heuristic_cost_per_cell must be non-negative, got {}",
                self.heuristic_cost_per_cell
            )));
        }
        Ok(())
    }
}
