//! Common traits defining the seams between the planning environment,
//! its collaborators and the search engine

use crate::common::error::{PlanningError, PlanningResult};
use crate::common::types::*;

/// Segment validity oracle (collision, joint limits, path constraints)
pub trait StateValidityChecker {
    /// Check the motion from `from` to `to`, not only its endpoint
    fn is_state_to_state_valid(&self, from: &[f64], to: &[f64]) -> bool;
}

/// Goal test over joint configurations
pub trait GoalPredicate {
    fn is_state_goal(&self, angles: &[f64]) -> bool;
}

/// Forward kinematics producing the end-effector cell
pub trait ForwardKinematics {
    /// `None` means the configuration cannot be placed
    fn end_effector_xyz(&self, angles: &[f64]) -> Option<CellXYZ>;
}

/// Source of distance-to-obstacle values, in cells
pub trait DistanceField {
    fn distance_at(&self, cell: &CellXYZ) -> Option<u32>;
}

impl<F> StateValidityChecker for F
where
    F: Fn(&[f64], &[f64]) -> bool,
{
    fn is_state_to_state_valid(&self, from: &[f64], to: &[f64]) -> bool {
        self(from, to)
    }
}

impl<F> GoalPredicate for F
where
    F: Fn(&[f64]) -> bool,
{
    fn is_state_goal(&self, angles: &[f64]) -> bool {
        self(angles)
    }
}

impl<F> ForwardKinematics for F
where
    F: Fn(&[f64]) -> Option<CellXYZ>,
{
    fn end_effector_xyz(&self, angles: &[f64]) -> Option<CellXYZ> {
        self(angles)
    }
}

/// Environment contract consumed by a discrete graph search
///
/// Forward search needs only the first five operations. Predecessor
/// generation and equivalence testing are optional capabilities; callers
/// should query `supports_*` before relying on them.
pub trait SearchEnvironment {
    /// Start and goal ids for search initialization
    fn initialize_mdp(&self) -> PlanningResult<StartGoal>;

    /// All valid successors of `state_id` with their edge costs
    fn get_succs(&mut self, state_id: StateId) -> PlanningResult<Vec<Successor>>;

    /// Estimated cost from `from_id` to `to_id`
    fn get_from_to_heuristic(&self, from_id: StateId, to_id: StateId) -> PlanningResult<i32>;

    /// Estimated cost from `state_id` to the goal
    fn get_goal_heuristic(&self, state_id: StateId) -> PlanningResult<i32>;

    /// Estimated cost from `state_id` to the start
    fn get_start_heuristic(&self, state_id: StateId) -> PlanningResult<i32>;

    /// Number of states created so far
    fn size_of_created_env(&self) -> usize;

    fn supports_predecessors(&self) -> bool {
        false
    }

    fn get_preds(&mut self, _state_id: StateId) -> PlanningResult<Vec<Successor>> {
        Err(PlanningError::Unsupported("predecessor generation"))
    }

    fn supports_equivalence(&self) -> bool {
        false
    }

    fn are_equivalent(&self, _a: StateId, _b: StateId) -> PlanningResult<bool> {
        Err(PlanningError::Unsupported("state equivalence testing"))
    }
}
