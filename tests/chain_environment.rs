use std::f64::consts::PI;

use chain_lattice::arm_navigation::{CircleObstacle, EndEffectorGoal, PlanarChain, PlanarWorkspace};
use chain_lattice::path_planning::{
    ChainEnvironment, ChainLatticeConfig, CoordCodec, EndEffectorHeuristic, EnvAStar,
    EnvAStarConfig, JointStep, MotionPrimitiveLibrary, PrimitiveConfig, Resolution,
};
use chain_lattice::{CellXYZ, PlanningError, SearchEnvironment, StateValidityChecker, Successor};

fn line_fk(q: &[f64]) -> Option<CellXYZ> {
    Some(CellXYZ::new((q[0] * 100.0).round() as i32, 0, 0))
}

fn one_joint_env(prims: &[(f64, Resolution)]) -> ChainEnvironment {
    let mut library = MotionPrimitiveLibrary::new();
    for &(delta, resolution) in prims {
        library.register(JointStep::single(1, 0, delta, resolution));
    }
    ChainEnvironment::new(CoordCodec::uniform(1, 0.0175).unwrap(), library.finalize())
        .with_validity_checker(|_: &[f64], _: &[f64]| true)
        .with_kinematics(line_fk)
        .with_goal_predicate(|q: &[f64]| q[0] >= 2.0)
}

#[test]
fn test_single_primitive_example() {
    let mut env = one_joint_env(&[(0.1, Resolution::Normal)]);
    let start = env.set_start(&[0.0]).unwrap();

    let succs = env.get_succs(start).unwrap();
    assert_eq!(succs, vec![Successor::new(1, 1000)]);

    let record = env.state(1).unwrap();
    assert!((record.angles[0] - 0.1).abs() < 1e-10);
    assert_ne!(record.coord, env.state(start).unwrap().coord);
    assert_eq!(env.size_of_created_env(), 2);
}

#[test]
fn test_ids_are_monotonic_and_stable() {
    let mut env = one_joint_env(&[(0.1, Resolution::Normal), (-0.1, Resolution::Normal)]);
    let start = env.set_start(&[0.0]).unwrap();

    let mut frontier = vec![start];
    for _ in 0..5 {
        let mut next = Vec::new();
        for id in frontier {
            next.extend(env.get_succs(id).unwrap().into_iter().map(|s| s.state_id));
        }
        frontier = next;
    }

    for id in 0..env.size_of_created_env() {
        assert_eq!(env.state(id).unwrap().state_id, id);
    }
    // every coordinate appears once
    let mut coords: Vec<_> = env.table().iter().map(|r| r.coord.clone()).collect();
    coords.sort();
    coords.dedup();
    assert_eq!(coords.len(), env.size_of_created_env());
}

#[test]
fn test_goal_absorbs_expansion() {
    let mut env = one_joint_env(&[(0.1, Resolution::Normal)]);
    env.set_start(&[0.0]).unwrap();
    let goal = env.set_goal(&[2.0]).unwrap();
    assert!(env.get_succs(goal).unwrap().is_empty());
}

#[test]
fn test_resolution_gating_threshold() {
    let mut env = one_joint_env(&[(0.05, Resolution::Normal), (0.3, Resolution::Coarse)])
        .with_distance_switch_threshold(5);
    let start = env.set_start(&[0.0]).unwrap();

    // a distance equal to the threshold still counts as near
    for (dist, expected) in [(3, 0.05), (5, 0.05), (6, 0.3), (10, 0.3)] {
        env.set_state_distance(start, dist).unwrap();
        let succs = env.get_succs(start).unwrap();
        assert_eq!(succs.len(), 1);
        assert!((env.state(succs[0].state_id).unwrap().angles[0] - expected).abs() < 1e-10);
    }
}

#[test]
fn test_unsupported_capabilities() {
    let mut env = one_joint_env(&[(0.1, Resolution::Normal)]);
    assert!(!env.supports_predecessors());
    assert!(matches!(env.get_preds(0), Err(PlanningError::Unsupported(_))));
    assert!(matches!(env.are_equivalent(0, 0), Err(PlanningError::Unsupported(_))));
}

#[test]
fn test_search_stops_when_cancelled() {
    let mut env = one_joint_env(&[(0.1, Resolution::Normal)])
        .with_heuristic(EndEffectorHeuristic { cost_per_cell: 1 });
    env.set_start(&[0.0]).unwrap();
    env.set_goal(&[2.0]).unwrap();
    env.cancel_token().cancel();

    assert!(matches!(
        EnvAStar::with_defaults().search(&mut env),
        Err(PlanningError::Cancelled)
    ));
}

fn planar_env(obstacles: Vec<CircleObstacle>) -> (ChainEnvironment, PlanarWorkspace) {
    let chain = PlanarChain::new(vec![1.0, 1.0], 0.02);
    let workspace = PlanarWorkspace::new(chain.clone(), obstacles);
    let config = ChainLatticeConfig {
        primitives: PrimitiveConfig {
            normal_step_deg: 4.0,
            coarse_step_deg: None,
            joint_limits_deg: None,
        },
        ..Default::default()
    };

    let env = ChainEnvironment::from_config(2, &config)
        .unwrap()
        .with_validity_checker(workspace.clone())
        .with_distance_field(workspace.clone())
        .with_kinematics(chain.clone())
        .with_goal_predicate(EndEffectorGoal::new(
            chain,
            chain_lattice::Point3D::new(0.0, 2.0, 0.0),
            0.1,
        ));
    (env, workspace)
}

#[test]
fn test_planar_arm_reaches_goal() {
    let (mut env, _) = planar_env(Vec::new());
    let start = env.set_start(&[0.0, 0.0]).unwrap();
    let goal = env.set_goal(&[PI / 2.0, 0.0]).unwrap();

    let planner = EnvAStar::new(EnvAStarConfig {
        epsilon: 2.0,
        ..Default::default()
    });
    let solution = planner.search(&mut env).unwrap();

    assert_eq!(solution.path.first(), Some(&start));
    assert_eq!(solution.path.last(), Some(&goal));
    assert_eq!(solution.cost, 1000 * (solution.path.len() as i64 - 1));
    assert_eq!(env.statistics().expansions as usize, solution.expansions);
}

#[test]
fn test_planar_arm_avoids_obstacle() {
    let (mut env, workspace) = planar_env(vec![CircleObstacle::new(1.4, 1.4, 0.25)]);
    let start_q = [0.0, 0.0];
    let goal_q = [PI / 2.0, 0.0];
    assert!(!workspace.is_state_to_state_valid(&start_q, &goal_q));

    env.set_start(&start_q).unwrap();
    let goal = env.set_goal(&goal_q).unwrap();

    let planner = EnvAStar::new(EnvAStarConfig {
        epsilon: 2.0,
        ..Default::default()
    });
    let solution = planner.search(&mut env).unwrap();
    assert_eq!(solution.path.last(), Some(&goal));

    // the goal record stores the registered goal configuration, so skip the final edge
    let configs = env.configurations_for(&solution.path).unwrap();
    let n = configs.len();
    for pair in configs[..n - 1].windows(2) {
        assert!(workspace.is_state_to_state_valid(&pair[0], &pair[1]));
    }
}
