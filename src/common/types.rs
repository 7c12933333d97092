//! Common types used throughout chain_lattice

use nalgebra::Vector3;

/// Dense identifier handed to the search engine
pub type StateId = usize;

/// Continuous joint configuration, one angle per joint [rad]
pub type JointAngles = Vec<f64>;

/// Discretized joint configuration, one bucket index per joint
pub type Coord = Vec<i32>;

/// End-effector position expressed in grid cells
pub type CellXYZ = Vector3<i32>;

/// 3D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn distance(&self, other: &Point3D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Grid cell containing this point for a cubic cell of `cell_size` meters
    pub fn to_cell(&self, cell_size: f64) -> CellXYZ {
        CellXYZ::new(
            (self.x / cell_size).floor() as i32,
            (self.y / cell_size).floor() as i32,
            (self.z / cell_size).floor() as i32,
        )
    }
}

/// Euclidean distance between two cells, in cells
pub fn cell_distance(a: &CellXYZ, b: &CellXYZ) -> f64 {
    (a - b).cast::<f64>().norm()
}

/// One outgoing edge reported to the search engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Successor {
    pub state_id: StateId,
    pub cost: i32,
}

impl Successor {
    pub fn new(state_id: StateId, cost: i32) -> Self {
        Self { state_id, cost }
    }
}

/// Start/goal identifiers for search initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartGoal {
    pub start_id: StateId,
    pub goal_id: StateId,
}
