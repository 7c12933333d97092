//! Joint-space lattice environment for discrete graph search
//!
//! `ChainEnvironment` owns the state table for one planning episode and
//! answers the search engine's queries: start/goal ids, successor
//! expansion with edge costs, and heuristic estimates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::common::*;

use super::config::ChainLatticeConfig;
use super::coord::CoordCodec;
use super::cost::{ConstantCost, CostPolicy, EndEffectorHeuristic, Heuristic};
use super::motion_primitive::{MotionPrimitiveLibrary, MotionPrimitiveSet, Resolution};
use super::state_table::{StateRecord, StateTable, UNSET_DISTANCE};
use super::statistics::PlanningStatistics;

/// Default distance (cells) separating fine and coarse expansion
pub const DEFAULT_DISTANCE_SWITCH_THRESHOLD: u32 = 5;

/// Cooperative cancellation flag shared with a supervisor
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Planning environment over a serial chain's joint space
pub struct ChainEnvironment {
    codec: CoordCodec,
    table: StateTable,
    prims: MotionPrimitiveSet,

    validity: Option<Box<dyn StateValidityChecker>>,
    kinematics: Option<Box<dyn ForwardKinematics>>,
    goal_predicate: Option<Box<dyn GoalPredicate>>,
    distance_field: Option<Box<dyn DistanceField>>,
    heuristic: Option<Box<dyn Heuristic>>,
    cost: Box<dyn CostPolicy>,

    distance_switch_threshold: u32,

    start_id: Option<StateId>,
    goal_id: Option<StateId>,

    stats: PlanningStatistics,
    cancel: CancelToken,

    warned_permissive: bool,
    warned_no_kinematics: bool,
}

impl ChainEnvironment {
    pub fn new(codec: CoordCodec, prims: MotionPrimitiveSet) -> Self {
        Self {
            codec,
            table: StateTable::new(),
            prims,
            validity: None,
            kinematics: None,
            goal_predicate: None,
            distance_field: None,
            heuristic: None,
            cost: Box::new(ConstantCost::default()),
            distance_switch_threshold: DEFAULT_DISTANCE_SWITCH_THRESHOLD,
            start_id: None,
            goal_id: None,
            stats: PlanningStatistics::default(),
            cancel: CancelToken::new(),
            warned_permissive: false,
            warned_no_kinematics: false,
        }
    }

    /// Environment with codec, primitives, cost and heuristic taken from `config`
    pub fn from_config(num_joints: usize, config: &ChainLatticeConfig) -> PlanningResult<Self> {
        config.validate(num_joints)?;

        let codec = CoordCodec::with_wrapping(
            &config.joint_resolutions_rad(num_joints),
            &config.joint_wraps(num_joints),
        )?;
        let prims = MotionPrimitiveLibrary::from_config(num_joints, &config.primitives)?.finalize();

        info!(
            "Chain lattice: {} joints, {} primitives (coarse: {}), switch at {} cells",
            num_joints,
            prims.len(),
            prims.has_coarse(),
            config.distance_switch_threshold
        );

        Ok(Self::new(codec, prims)
            .with_cost_policy(ConstantCost(config.edge_cost))
            .with_heuristic(EndEffectorHeuristic {
                cost_per_cell: config.heuristic_cost_per_cell,
            })
            .with_distance_switch_threshold(config.distance_switch_threshold)
            .with_key_by_primitive(config.key_by_primitive))
    }

    pub fn with_validity_checker<V: StateValidityChecker + 'static>(mut self, validity: V) -> Self {
        self.validity = Some(Box::new(validity));
        self
    }

    pub fn with_kinematics<K: ForwardKinematics + 'static>(mut self, kinematics: K) -> Self {
        self.kinematics = Some(Box::new(kinematics));
        self
    }

    pub fn with_goal_predicate<G: GoalPredicate + 'static>(mut self, goal: G) -> Self {
        self.goal_predicate = Some(Box::new(goal));
        self
    }

    pub fn with_distance_field<D: DistanceField + 'static>(mut self, field: D) -> Self {
        self.distance_field = Some(Box::new(field));
        self
    }

    pub fn with_heuristic<H: Heuristic + 'static>(mut self, heuristic: H) -> Self {
        self.heuristic = Some(Box::new(heuristic));
        self
    }

    pub fn with_cost_policy<C: CostPolicy + 'static>(mut self, cost: C) -> Self {
        self.cost = Box::new(cost);
        self
    }

    pub fn with_distance_switch_threshold(mut self, cells: u32) -> Self {
        self.distance_switch_threshold = cells;
        self
    }

    /// Has no effect once states exist
    pub fn with_key_by_primitive(mut self, enabled: bool) -> Self {
        if !self.table.is_empty() {
            warn!("Chain lattice: cannot change state keying after states were created");
            return self;
        }
        self.table = if enabled {
            StateTable::keyed_by_primitive()
        } else {
            StateTable::new()
        };
        debug!(
            "Chain lattice: states keyed by primitive: {}",
            self.table.is_keyed_by_primitive()
        );
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn codec(&self) -> &CoordCodec {
        &self.codec
    }

    pub fn primitives(&self) -> &MotionPrimitiveSet {
        &self.prims
    }

    pub fn table(&self) -> &StateTable {
        &self.table
    }

    pub fn state(&self, state_id: StateId) -> PlanningResult<&StateRecord> {
        self.table.get_by_id(state_id)
    }

    /// Overwrite the distance-to-obstacle value used for resolution switching
    pub fn set_state_distance(&mut self, state_id: StateId, dist: u32) -> PlanningResult<()> {
        self.table.set_distance(state_id, dist)
    }

    pub fn statistics(&self) -> PlanningStatistics {
        self.stats
    }

    /// Discard every state, the start/goal pair and the statistics
    pub fn reset_episode(&mut self) {
        self.table.clear();
        self.start_id = None;
        self.goal_id = None;
        self.stats.reset();
        self.cancel.reset();
        self.warned_permissive = false;
        self.warned_no_kinematics = false;
        info!("Chain lattice: episode reset");
    }

    pub fn set_start(&mut self, angles: &[f64]) -> PlanningResult<StateId> {
        let id = self.register_endpoint(angles, "start")?;
        self.start_id = Some(id);
        Ok(id)
    }

    pub fn set_goal(&mut self, angles: &[f64]) -> PlanningResult<StateId> {
        let id = self.register_endpoint(angles, "goal")?;
        self.goal_id = Some(id);
        Ok(id)
    }

    pub fn start_id(&self) -> Option<StateId> {
        self.start_id
    }

    pub fn goal_id(&self) -> Option<StateId> {
        self.goal_id
    }

    fn register_endpoint(&mut self, angles: &[f64], label: &str) -> PlanningResult<StateId> {
        if angles.len() != self.codec.num_joints() {
            return Err(PlanningError::InvalidConfiguration(format!(
                "{} has {} joints, expected {}",
                label,
                angles.len(),
                self.codec.num_joints()
            )));
        }
        if angles.iter().any(|a| !a.is_finite()) {
            return Err(PlanningError::InvalidConfiguration(format!(
                "{} {:?} has non-finite joint angles",
                label, angles
            )));
        }
        let kinematics = self
            .kinematics
            .as_ref()
            .ok_or(PlanningError::MissingCollaborator("forward kinematics"))?;
        let xyz = kinematics.end_effector_xyz(angles).ok_or_else(|| {
            PlanningError::InvalidConfiguration(format!("{} {:?} cannot be placed", label, angles))
        })?;

        let coord = self.codec.to_coord(angles);
        let id = lookup_or_insert(
            &mut self.table,
            self.distance_field.as_deref(),
            coord,
            angles.to_vec(),
            xyz,
            None,
        );
        info!("Chain lattice: {} set to state {} at cell {:?}", label, id, xyz.as_slice());
        Ok(id)
    }

    /// Start and goal ids for search initialization
    pub fn start_goal(&self) -> PlanningResult<StartGoal> {
        match (self.start_id, self.goal_id) {
            (Some(start_id), Some(goal_id)) => Ok(StartGoal { start_id, goal_id }),
            _ => Err(PlanningError::StartGoalUnset),
        }
    }

    /// Generate every valid successor of `source_id`
    ///
    /// Per-candidate failures drop the candidate. An out-of-range source
    /// yields no successors. Errors are reserved for cancellation and for
    /// a goal predicate that was never supplied.
    pub fn expand(&mut self, source_id: StateId) -> PlanningResult<Vec<Successor>> {
        if self.cancel.is_cancelled() {
            return Err(PlanningError::Cancelled);
        }
        let expansion_start = Instant::now();

        // goal is absorbing
        if self.goal_id == Some(source_id) {
            warn!("Chain lattice: source state {} is the goal", source_id);
            return Ok(Vec::new());
        }
        if source_id >= self.table.len() {
            warn!(
                "Chain lattice: source state {} is too large (table size {})",
                source_id,
                self.table.len()
            );
            return Ok(Vec::new());
        }

        let (source_angles, source_dist) = {
            let source = self.table.get_by_id(source_id)?;
            (source.angles.clone(), source.dist)
        };

        if self.validity.is_none() && !self.warned_permissive {
            warn!("Chain lattice: no validity checker configured, no collision checking will occur");
            self.warned_permissive = true;
        }
        if self.kinematics.is_none() && !self.warned_no_kinematics {
            warn!("Chain lattice: no forward kinematics configured, every successor is discarded");
            self.warned_no_kinematics = true;
        }

        let gate = self.prims.has_coarse();
        let near = source_dist <= self.distance_switch_threshold;
        let mut succs = Vec::new();

        for (prim_index, prim) in self.prims.iter() {
            if gate {
                match prim.resolution() {
                    Resolution::Coarse if near => continue,
                    Resolution::Normal if !near => continue,
                    _ => {}
                }
            }

            let succ_angles = match prim.successor(&source_angles) {
                Some(angles) => angles,
                None => continue,
            };

            if let Some(validity) = &self.validity {
                if !validity.is_state_to_state_valid(&source_angles, &succ_angles) {
                    continue;
                }
            }

            let xyz = match self
                .kinematics
                .as_ref()
                .and_then(|k| k.end_effector_xyz(&succ_angles))
            {
                Some(xyz) => xyz,
                None => continue,
            };

            let coord = self.codec.to_coord(&succ_angles);

            let goal_predicate = match &self.goal_predicate {
                Some(goal) => goal,
                None => {
                    error!("Chain lattice: no goal predicate configured, the goal can never be reached");
                    return Err(PlanningError::MissingCollaborator("goal predicate"));
                }
            };

            let succ_id = if goal_predicate.is_state_goal(&succ_angles) {
                match self.goal_id {
                    Some(goal_id) => goal_id,
                    None => {
                        warn!("Chain lattice: successor satisfies the goal but no goal state is set");
                        continue;
                    }
                }
            } else {
                lookup_or_insert(
                    &mut self.table,
                    self.distance_field.as_deref(),
                    coord,
                    succ_angles,
                    xyz,
                    Some(prim_index),
                )
            };

            let cost = self
                .cost
                .cost(self.table.get_by_id(source_id)?, self.table.get_by_id(succ_id)?);
            succs.push(Successor::new(succ_id, cost));
        }

        self.stats.record_expansion(expansion_start.elapsed());
        debug!(
            "Chain lattice: expanded {} (dist {}) into {} successors, {} states",
            source_id,
            source_dist,
            succs.len(),
            self.table.len()
        );
        Ok(succs)
    }

    /// Heuristic between two states
    ///
    /// Unknown ids give 0. A missing heuristic is a configuration error.
    pub fn heuristic(&self, from_id: StateId, to_id: StateId) -> PlanningResult<i32> {
        let heuristic = match &self.heuristic {
            Some(h) => h,
            None => {
                error!("Chain lattice: no heuristic configured");
                return Err(PlanningError::MissingCollaborator("heuristic"));
            }
        };

        match (self.table.get_by_id(from_id), self.table.get_by_id(to_id)) {
            (Ok(from), Ok(to)) => Ok(heuristic.distance(from, to)),
            _ => {
                warn!(
                    "Chain lattice: heuristic requested for unknown states {} -> {} (table size {})",
                    from_id,
                    to_id,
                    self.table.len()
                );
                Ok(0)
            }
        }
    }

    pub fn goal_heuristic(&self, state_id: StateId) -> PlanningResult<i32> {
        let goal_id = self.goal_id.ok_or(PlanningError::StartGoalUnset)?;
        self.heuristic(state_id, goal_id)
    }

    pub fn start_heuristic(&self, state_id: StateId) -> PlanningResult<i32> {
        let start_id = self.start_id.ok_or(PlanningError::StartGoalUnset)?;
        self.heuristic(state_id, start_id)
    }

    /// Joint configurations along a path of state ids
    pub fn configurations_for(&self, path: &[StateId]) -> PlanningResult<Vec<JointAngles>> {
        path.iter()
            .map(|&id| self.table.get_by_id(id).map(|r| r.angles.clone()))
            .collect()
    }
}

fn lookup_or_insert(
    table: &mut StateTable,
    distance_field: Option<&dyn DistanceField>,
    coord: Coord,
    angles: JointAngles,
    xyz: CellXYZ,
    primitive: Option<usize>,
) -> StateId {
    if let Some(record) = table.lookup(&coord, primitive) {
        return record.state_id;
    }
    let dist = distance_field
        .and_then(|f| f.distance_at(&xyz))
        .unwrap_or(UNSET_DISTANCE);
    table
        .insert_with_distance(coord, angles, xyz, dist, primitive)
        .state_id
}

impl SearchEnvironment for ChainEnvironment {
    fn initialize_mdp(&self) -> PlanningResult<StartGoal> {
        self.start_goal()
    }

    fn get_succs(&mut self, state_id: StateId) -> PlanningResult<Vec<Successor>> {
        self.expand(state_id)
    }

    fn get_from_to_heuristic(&self, from_id: StateId, to_id: StateId) -> PlanningResult<i32> {
        self.heuristic(from_id, to_id)
    }

    fn get_goal_heuristic(&self, state_id: StateId) -> PlanningResult<i32> {
        self.goal_heuristic(state_id)
    }

    fn get_start_heuristic(&self, state_id: StateId) -> PlanningResult<i32> {
        self.start_heuristic(state_id)
    }

    fn size_of_created_env(&self) -> usize {
        self.table.len()
    }
}
