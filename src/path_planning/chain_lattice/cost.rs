//! Edge cost and heuristic policies
//!
//! Costs and heuristics are integers so that they can be fed directly to
//! search engines that keep integer g/f values.

use std::f64::consts::PI;
use std::fmt::Debug;

use crate::common::cell_distance;

use super::state_table::StateRecord;

/// Cost of moving between two states
pub trait CostPolicy: Debug {
    /// Must be a positive integer
    fn cost(&self, from: &StateRecord, to: &StateRecord) -> i32;
}

/// Distance estimate between two states
pub trait Heuristic: Debug {
    /// Must be non-negative and consistent with the cost policy in use
    fn distance(&self, from: &StateRecord, to: &StateRecord) -> i32;
}

/// Same cost for every edge, so search minimizes hop count
#[derive(Debug, Clone, Copy)]
pub struct ConstantCost(pub i32);

impl Default for ConstantCost {
    fn default() -> Self {
        Self(1000)
    }
}

impl CostPolicy for ConstantCost {
    fn cost(&self, _from: &StateRecord, _to: &StateRecord) -> i32 {
        self.0
    }
}

/// Cost proportional to end-effector travel, at least 1
#[derive(Debug, Clone, Copy)]
pub struct EndEffectorDistanceCost {
    pub cost_per_cell: i32,
}

impl CostPolicy for EndEffectorDistanceCost {
    fn cost(&self, from: &StateRecord, to: &StateRecord) -> i32 {
        let d = cell_distance(&from.xyz, &to.xyz) * self.cost_per_cell as f64;
        (d.round() as i32).max(1)
    }
}

/// Straight-line end-effector distance, in cost units
#[derive(Debug, Clone, Copy)]
pub struct EndEffectorHeuristic {
    pub cost_per_cell: i32,
}

impl Heuristic for EndEffectorHeuristic {
    fn distance(&self, from: &StateRecord, to: &StateRecord) -> i32 {
        (cell_distance(&from.xyz, &to.xyz) * self.cost_per_cell as f64).floor() as i32
    }
}

/// Lower bound on the number of joint steps, times the edge cost
///
/// Admissible under `ConstantCost(edge_cost)` as long as no primitive moves
/// a joint further than `max_step`.
#[derive(Debug, Clone)]
pub struct JointSpaceHeuristic {
    max_step: f64,
    edge_cost: i32,
    wraps: Vec<bool>,
}

impl JointSpaceHeuristic {
    pub fn new(max_step: f64, edge_cost: i32) -> Self {
        Self { max_step, edge_cost, wraps: Vec::new() }
    }

    pub fn with_wrapping(mut self, wraps: Vec<bool>) -> Self {
        self.wraps = wraps;
        self
    }
}

impl Heuristic for JointSpaceHeuristic {
    fn distance(&self, from: &StateRecord, to: &StateRecord) -> i32 {
        let max_diff = from
            .angles
            .iter()
            .zip(to.angles.iter())
            .enumerate()
            .map(|(j, (a, b))| {
                if self.wraps.get(j).copied().unwrap_or(false) {
                    angle_diff(*b, *a).abs()
                } else {
                    (b - a).abs()
                }
            })
            .fold(0.0, f64::max);

        // tolerance so that an exact multiple of the step is not undercounted
        let steps = (max_diff / self.max_step + 1e-9).floor();
        steps as i32 * self.edge_cost
    }
}

/// Signed difference `a - b` reduced to [-pi, pi)
///
/// Non-finite input yields NaN.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    (a - b + PI).rem_euclid(2.0 * PI) - PI
}
