//! Chain Lattice Environment Module
//!
//! Adapts a serial chain's continuous joint space to discrete graph
//! search. Joint configurations are discretized into integer coordinates,
//! each coordinate gets a dense state id, and successors are produced by a
//! library of motion primitives whose resolution is chosen by the source
//! state's distance to obstacles.
//!
//! # Components
//!
//! - `coord`: joint angle <-> coordinate codec
//! - `state_table`: coordinate-hashed store of state records
//! - `motion_primitive`: primitive trait, joint steps and the ordered library
//! - `cost`: edge cost and heuristic policies
//! - `environment`: successor generation and start/goal bookkeeping
//!
//! # Example
//!
//! ```no_run
//! use chain_lattice::common::CellXYZ;
//! use chain_lattice::path_planning::chain_lattice::{
//!     ChainEnvironment, CoordCodec, JointStep, MotionPrimitiveLibrary, Resolution,
//! };
//!
//! let mut library = MotionPrimitiveLibrary::new();
//! library.register(JointStep::single(1, 0, 0.1, Resolution::Normal));
//!
//! let mut env = ChainEnvironment::new(CoordCodec::uniform(1, 0.0175).unwrap(), library.finalize())
//!     .with_kinematics(|q: &[f64]| Some(CellXYZ::new((q[0] * 100.0) as i32, 0, 0)))
//!     .with_goal_predicate(|q: &[f64]| q[0] > 1.0);
//!
//! let start = env.set_start(&[0.0]).unwrap();
//! let succs = env.expand(start).unwrap();
//! ```
//!
//! # References
//!
//! - SBPL `EnvironmentChain3D` (Cohen, Jones, Ferguson)
//! - "Search-Based Planning for Manipulation with Motion Primitives" (Cohen et al., ICRA 2010)

pub mod config;
pub mod coord;
pub mod cost;
pub mod environment;
pub mod motion_primitive;
pub mod state_table;
pub mod statistics;

// Re-exports
pub use config::{ChainLatticeConfig, PrimitiveConfig};
pub use coord::CoordCodec;
pub use cost::{
    ConstantCost, CostPolicy, EndEffectorDistanceCost, EndEffectorHeuristic, Heuristic,
    JointSpaceHeuristic,
};
pub use environment::{CancelToken, ChainEnvironment, DEFAULT_DISTANCE_SWITCH_THRESHOLD};
pub use motion_primitive::{
    JointStep, MotionPrimitive, MotionPrimitiveLibrary, MotionPrimitiveSet, Resolution,
};
pub use state_table::{StateRecord, StateTable, UNSET_DISTANCE};
pub use statistics::PlanningStatistics;
