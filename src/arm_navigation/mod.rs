//! Arm navigation: concrete manipulator collaborators for joint-space planning

pub mod planar_chain;

pub use planar_chain::{CircleObstacle, EndEffectorGoal, PlanarChain, PlanarWorkspace};
