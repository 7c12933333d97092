//! Weighted A* over a `SearchEnvironment`
//!
//! Only uses the forward-search contract: start/goal ids, successor
//! expansion and the goal heuristic. States are created by the
//! environment as they are discovered, so the bookkeeping vectors grow
//! with `size_of_created_env`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, info};

use crate::common::{PlanningError, PlanningResult, SearchEnvironment, StateId};

/// Configuration for the environment A* search
#[derive(Debug, Clone)]
pub struct EnvAStarConfig {
    /// Heuristic inflation (1.0 = optimal, >1.0 = faster but suboptimal)
    pub epsilon: f64,
    /// Give up after this many expansions
    pub max_expansions: usize,
}

impl Default for EnvAStarConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            max_expansions: 100_000,
        }
    }
}

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct EnvAStarSolution {
    /// State ids from start to goal
    pub path: Vec<StateId>,
    /// Sum of edge costs along `path`
    pub cost: i64,
    pub expansions: usize,
}

#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f: i64,
    g: i64,
    state_id: StateId,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior, ties go to deeper states
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.state_id.cmp(&self.state_id))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct EnvAStar {
    config: EnvAStarConfig,
}

impl EnvAStar {
    pub fn new(config: EnvAStarConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(EnvAStarConfig::default())
    }

    pub fn search<E: SearchEnvironment>(&self, env: &mut E) -> PlanningResult<EnvAStarSolution> {
        let mdp = env.initialize_mdp()?;

        let mut g: Vec<i64> = Vec::new();
        let mut parent: Vec<Option<StateId>> = Vec::new();
        let mut closed: Vec<bool> = Vec::new();
        let grow = |g: &mut Vec<i64>, parent: &mut Vec<Option<StateId>>, closed: &mut Vec<bool>, size: usize| {
            if g.len() < size {
                g.resize(size, i64::MAX);
                parent.resize(size, None);
                closed.resize(size, false);
            }
        };

        grow(&mut g, &mut parent, &mut closed, env.size_of_created_env());
        g[mdp.start_id] = 0;

        let mut open_set = BinaryHeap::new();
        open_set.push(OpenEntry {
            f: self.priority(0, env.get_goal_heuristic(mdp.start_id)?),
            g: 0,
            state_id: mdp.start_id,
        });

        let mut expansions = 0;
        while let Some(current) = open_set.pop() {
            let id = current.state_id;
            if closed[id] || current.g > g[id] {
                continue;
            }

            if id == mdp.goal_id {
                info!("Find goal after {} expansions!", expansions);
                return Ok(EnvAStarSolution {
                    path: Self::calc_final_path(id, &parent),
                    cost: g[id],
                    expansions,
                });
            }

            if expansions >= self.config.max_expansions {
                break;
            }
            closed[id] = true;
            expansions += 1;

            let succs = env.get_succs(id)?;
            grow(&mut g, &mut parent, &mut closed, env.size_of_created_env());

            for succ in succs {
                if closed[succ.state_id] {
                    continue;
                }
                let new_g = g[id] + succ.cost as i64;
                if new_g < g[succ.state_id] {
                    g[succ.state_id] = new_g;
                    parent[succ.state_id] = Some(id);
                    let h = env.get_goal_heuristic(succ.state_id)?;
                    open_set.push(OpenEntry {
                        f: self.priority(new_g, h),
                        g: new_g,
                        state_id: succ.state_id,
                    });
                }
            }

            if expansions % 1000 == 0 {
                debug!(
                    "Expansions: {}, Open set size: {}, States: {}",
                    expansions,
                    open_set.len(),
                    env.size_of_created_env()
                );
            }
        }

        Err(PlanningError::PlanningFailed(format!(
            "goal not reached after {} expansions",
            expansions
        )))
    }

    fn priority(&self, g: i64, h: i32) -> i64 {
        g + (self.config.epsilon * h as f64).round() as i64
    }

    fn calc_final_path(goal_id: StateId, parent: &[Option<StateId>]) -> Vec<StateId> {
        let mut path = vec![goal_id];
        let mut current = parent[goal_id];
        while let Some(id) = current {
            path.push(id);
            current = parent[id];
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{StartGoal, Successor};

    /// 1D corridor 0..=n where every state steps to its neighbors
    struct Corridor {
        n: usize,
        created: usize,
    }

    impl SearchEnvironment for Corridor {
        fn initialize_mdp(&self) -> PlanningResult<StartGoal> {
            Ok(StartGoal { start_id: 0, goal_id: self.n })
        }

        fn get_succs(&mut self, state_id: StateId) -> PlanningResult<Vec<Successor>> {
            let mut succs = vec![Successor::new(state_id + 1, 10)];
            if state_id > 0 {
                succs.push(Successor::new(state_id - 1, 10));
            }
            self.created = self.created.max(state_id + 2);
            Ok(succs)
        }

        fn get_from_to_heuristic(&self, from_id: StateId, to_id: StateId) -> PlanningResult<i32> {
            Ok(10 * (to_id as i32 - from_id as i32).abs())
        }

        fn get_goal_heuristic(&self, state_id: StateId) -> PlanningResult<i32> {
            self.get_from_to_heuristic(state_id, self.n)
        }

        fn get_start_heuristic(&self, state_id: StateId) -> PlanningResult<i32> {
            self.get_from_to_heuristic(state_id, 0)
        }

        fn size_of_created_env(&self) -> usize {
            self.created.max(self.n + 1)
        }
    }

    #[test]
    fn test_env_a_star_finds_path() {
        let mut env = Corridor { n: 5, created: 1 };
        let solution = EnvAStar::with_defaults().search(&mut env).unwrap();
        assert_eq!(solution.path, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(solution.cost, 50);
        assert_eq!(solution.expansions, 5);
    }

    #[test]
    fn test_env_a_star_expansion_limit() {
        let mut env = Corridor { n: 50, created: 1 };
        let planner = EnvAStar::new(EnvAStarConfig {
            epsilon: 1.0,
            max_expansions: 3,
        });
        assert!(matches!(
            planner.search(&mut env),
            Err(PlanningError::PlanningFailed(_))
        ));
    }

    #[test]
    fn test_open_entry_min_heap() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry { f: 30, g: 0, state_id: 0 });
        heap.push(OpenEntry { f: 10, g: 0, state_id: 1 });
        heap.push(OpenEntry { f: 20, g: 0, state_id: 2 });
        assert_eq!(heap.pop().unwrap().state_id, 1);
        assert_eq!(heap.pop().unwrap().state_id, 2);
    }
}
