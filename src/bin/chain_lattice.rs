// Joint-space lattice planning for a two-link planar arm
//
// Usage: chain_lattice [config.toml]

use std::f64::consts::PI;
use std::path::Path;

use gnuplot::{AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};
use tracing::{info, warn};

use chain_lattice::arm_navigation::{CircleObstacle, EndEffectorGoal, PlanarChain, PlanarWorkspace};
use chain_lattice::path_planning::{
    ChainEnvironment, ChainLatticeConfig, EnvAStar, EnvAStarConfig, PrimitiveConfig,
};
use chain_lattice::{Point3D, PlanningResult};

const SHOW_ANIMATION: bool = true;

fn main() -> PlanningResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            ChainLatticeConfig::load(Path::new(path))?
        }
        None => ChainLatticeConfig {
            heuristic_cost_per_cell: 35,
            primitives: PrimitiveConfig {
                normal_step_deg: 4.0,
                coarse_step_deg: Some(16.0),
                joint_limits_deg: Some(vec![[-180.0, 180.0], [-170.0, 170.0]]),
            },
            ..Default::default()
        },
    };

    let chain = PlanarChain::new(vec![1.0, 1.0], 0.02);
    let obstacles = vec![CircleObstacle::new(1.4, 1.4, 0.25)];
    let workspace = PlanarWorkspace::new(chain.clone(), obstacles.clone())
        .with_joint_limits(vec![(-PI, PI), (-170.0_f64.to_radians(), 170.0_f64.to_radians())]);

    let start = [0.0, 0.0];
    let goal = [PI / 2.0, 0.0];
    let target = Point3D::new(0.0, 2.0, 0.0);

    let mut env = ChainEnvironment::from_config(chain.num_joints(), &config)?
        .with_validity_checker(workspace.clone())
        .with_distance_field(workspace)
        .with_kinematics(chain.clone())
        .with_goal_predicate(EndEffectorGoal::new(chain.clone(), target, 0.1));

    env.set_start(&start)?;
    env.set_goal(&goal)?;

    let planner = EnvAStar::new(EnvAStarConfig {
        epsilon: 3.0,
        ..Default::default()
    });
    let solution = planner.search(&mut env)?;

    let stats = env.statistics();
    info!(
        "Path found with {} states, cost {}, {} expansions in {:.2?} ({} states created)",
        solution.path.len(),
        solution.cost,
        stats.expansions,
        stats.expansion_time,
        env.table().len()
    );

    let configurations = env.configurations_for(&solution.path)?;
    for (id, q) in solution.path.iter().zip(configurations.iter()) {
        info!(
            "state {:>5}: [{:>7.2}, {:>7.2}] deg",
            id,
            q[0].to_degrees(),
            q[1].to_degrees()
        );
    }

    if SHOW_ANIMATION {
        let (ee_x, ee_y): (Vec<f64>, Vec<f64>) = configurations
            .iter()
            .filter_map(|q| chain.end_effector(q))
            .map(|p| (p.x, p.y))
            .unzip();

        let mut fg = Figure::new();
        {
            let axes = fg.axes2d();
            for o in &obstacles {
                let (ox, oy): (Vec<f64>, Vec<f64>) = (0..=36)
                    .map(|i| {
                        let a = i as f64 * 2.0 * PI / 36.0;
                        (o.center.x + o.radius * a.cos(), o.center.y + o.radius * a.sin())
                    })
                    .unzip();
                axes.lines(&ox, &oy, &[Color("black"), LineWidth(2.0)]);
            }

            for q in configurations.iter().step_by(3) {
                let links = chain.joint_positions(q);
                let lx: Vec<f64> = links.iter().map(|p| p.x).collect();
                let ly: Vec<f64> = links.iter().map(|p| p.y).collect();
                axes.lines(&lx, &ly, &[Color("gray")]);
            }

            axes.lines(&ee_x, &ee_y, &[Caption("End effector"), Color("red"), LineWidth(2.0)])
                .points(
                    &[target.x],
                    &[target.y],
                    &[Caption("Target"), Color("blue"), PointSymbol('O'), PointSize(2.0)],
                )
                .set_aspect_ratio(gnuplot::AutoOption::Fix(1.0))
                .set_title("Chain Lattice Planning", &[])
                .set_x_label("X [m]", &[])
                .set_y_label("Y [m]", &[]);
        }

        let output_path = "chain_lattice_result.png";
        if let Err(e) = fg.save_to_png(output_path, 800, 600) {
            warn!("Failed to save image: {}", e);
        } else {
            info!("Plot saved to: {}", output_path);
        }
    }

    Ok(())
}
