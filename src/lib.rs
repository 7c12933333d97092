//! chain_lattice - joint-space lattice planning environment
//!
//! This crate adapts a robot chain's continuous joint space to discrete
//! graph search: coordinate hashing, motion-primitive expansion with
//! distance-based resolution switching, and the cost/heuristic contract
//! consumed by A*-family search engines.

// Core modules
pub mod common;

// Algorithm modules
pub mod path_planning;
pub mod arm_navigation;

// Re-export common types for convenience
pub use common::{CellXYZ, Coord, JointAngles, Point3D, StartGoal, StateId, Successor};
pub use common::{DistanceField, ForwardKinematics, GoalPredicate, SearchEnvironment, StateValidityChecker};
pub use common::{PlanningError, PlanningResult};
