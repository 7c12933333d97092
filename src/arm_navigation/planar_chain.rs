//
// N-link planar arm collaborators for the chain lattice environment
// Forward kinematics follows the two-joint arm example by
// Daniel Ingram (daniel-s-ingram) and Atsushi Sakai (@Atsushi_twi)
//

use nalgebra::Vector3;
use ordered_float::OrderedFloat;

use crate::common::{
    CellXYZ, DistanceField, ForwardKinematics, GoalPredicate, Point3D, StateValidityChecker,
};

/// Serial chain of revolute joints moving in the XY plane
#[derive(Debug, Clone)]
pub struct PlanarChain {
    pub link_lengths: Vec<f64>,
    /// Edge length of one workspace cell [m]
    pub cell_size: f64,
}

impl PlanarChain {
    pub fn new(link_lengths: Vec<f64>, cell_size: f64) -> Self {
        Self { link_lengths, cell_size }
    }

    pub fn num_joints(&self) -> usize {
        self.link_lengths.len()
    }

    /// Base followed by every joint position, ending at the end effector
    pub fn joint_positions(&self, angles: &[f64]) -> Vec<Point3D> {
        let mut points = Vec::with_capacity(self.link_lengths.len() + 1);
        let mut p = Point3D::origin();
        let mut theta = 0.0_f64;
        points.push(p);

        for (&length, &angle) in self.link_lengths.iter().zip(angles.iter()) {
            theta += angle;
            p = Point3D::new(p.x + length * theta.cos(), p.y + length * theta.sin(), 0.0);
            points.push(p);
        }
        points
    }

    pub fn end_effector(&self, angles: &[f64]) -> Option<Point3D> {
        if angles.len() != self.link_lengths.len() {
            return None;
        }
        self.joint_positions(angles).last().copied()
    }
}

impl ForwardKinematics for PlanarChain {
    fn end_effector_xyz(&self, angles: &[f64]) -> Option<CellXYZ> {
        self.end_effector(angles).map(|p| p.to_cell(self.cell_size))
    }
}

/// Circular obstacle in the arm's plane
#[derive(Debug, Clone, Copy)]
pub struct CircleObstacle {
    pub center: Point3D,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: Point3D::new(x, y, 0.0),
            radius,
        }
    }

    /// Signed clearance between the obstacle surface and segment `a`-`b`
    pub fn clearance_to_segment(&self, a: &Point3D, b: &Point3D) -> f64 {
        distance_point_to_segment(&self.center.to_vector(), &a.to_vector(), &b.to_vector())
            - self.radius
    }
}

fn distance_point_to_segment(p: &Vector3<f64>, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-12 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Arm, obstacles and joint limits; checks motions by joint-space interpolation
#[derive(Debug, Clone)]
pub struct PlanarWorkspace {
    pub chain: PlanarChain,
    pub obstacles: Vec<CircleObstacle>,
    pub joint_limits: Option<Vec<(f64, f64)>>,
    /// Largest joint change between two collision checks [rad]
    pub interpolation_step: f64,
}

impl PlanarWorkspace {
    pub fn new(chain: PlanarChain, obstacles: Vec<CircleObstacle>) -> Self {
        Self {
            chain,
            obstacles,
            joint_limits: None,
            interpolation_step: 1.0_f64.to_radians(),
        }
    }

    pub fn with_joint_limits(mut self, limits: Vec<(f64, f64)>) -> Self {
        self.joint_limits = Some(limits);
        self
    }

    fn within_limits(&self, angles: &[f64]) -> bool {
        match &self.joint_limits {
            Some(limits) => angles
                .iter()
                .zip(limits.iter())
                .all(|(&a, &(min, max))| a >= min && a <= max),
            None => true,
        }
    }

    /// Smallest link clearance over all obstacles [m]
    pub fn clearance(&self, angles: &[f64]) -> Option<f64> {
        let points = self.chain.joint_positions(angles);
        points
            .windows(2)
            .flat_map(|link| {
                self.obstacles
                    .iter()
                    .map(move |o| OrderedFloat(o.clearance_to_segment(&link[0], &link[1])))
            })
            .min()
            .map(|d| d.0)
    }

    pub fn is_configuration_valid(&self, angles: &[f64]) -> bool {
        if angles.len() != self.chain.num_joints() || !self.within_limits(angles) {
            return false;
        }
        self.clearance(angles).map_or(true, |d| d > 0.0)
    }
}

impl StateValidityChecker for PlanarWorkspace {
    fn is_state_to_state_valid(&self, from: &[f64], to: &[f64]) -> bool {
        if from.len() != to.len() {
            return false;
        }
        let max_diff = from
            .iter()
            .zip(to.iter())
            .map(|(a, b)| OrderedFloat((b - a).abs()))
            .max()
            .map_or(0.0, |d| d.0);
        let steps = (max_diff / self.interpolation_step).ceil().max(1.0) as usize;

        (1..=steps).all(|i| {
            let t = i as f64 / steps as f64;
            let q: Vec<f64> = from.iter().zip(to.iter()).map(|(a, b)| a + (b - a) * t).collect();
            self.is_configuration_valid(&q)
        })
    }
}

impl DistanceField for PlanarWorkspace {
    /// Cells between the cell center and the nearest obstacle surface
    fn distance_at(&self, cell: &CellXYZ) -> Option<u32> {
        let s = self.chain.cell_size;
        let center = Point3D::new(
            (cell.x as f64 + 0.5) * s,
            (cell.y as f64 + 0.5) * s,
            (cell.z as f64 + 0.5) * s,
        );
        self.obstacles
            .iter()
            .map(|o| OrderedFloat((center.distance(&o.center) - o.radius).max(0.0)))
            .min()
            .map(|d| (d.0 / s).floor() as u32)
    }
}

/// Goal region around a target end-effector position
#[derive(Debug, Clone)]
pub struct EndEffectorGoal {
    pub chain: PlanarChain,
    pub target: Point3D,
    /// Accepted end-effector distance to `target` [m]
    pub tolerance: f64,
}

impl EndEffectorGoal {
    pub fn new(chain: PlanarChain, target: Point3D, tolerance: f64) -> Self {
        Self { chain, target, tolerance }
    }
}

impl GoalPredicate for EndEffectorGoal {
    fn is_state_goal(&self, angles: &[f64]) -> bool {
        self.chain
            .end_effector(angles)
            .map_or(false, |p| p.distance(&self.target) <= self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn two_link() -> PlanarChain {
        PlanarChain::new(vec![1.0, 1.0], 0.02)
    }

    #[test]
    fn test_forward_kinematics() {
        let chain = two_link();
        let p = chain.end_effector(&[0.0, 0.0]).unwrap();
        assert!((p.x - 2.0).abs() < 1e-10);
        assert!(p.y.abs() < 1e-10);

        let p = chain.end_effector(&[PI / 2.0, -PI / 2.0]).unwrap();
        assert!((p.x - 1.0).abs() < 1e-10);
        assert!((p.y - 1.0).abs() < 1e-10);

        assert!(chain.end_effector(&[0.0]).is_none());
    }

    #[test]
    fn test_end_effector_cell() {
        let chain = two_link();
        assert_eq!(chain.end_effector_xyz(&[0.0, 0.0]), Some(CellXYZ::new(100, 0, 0)));
    }

    #[test]
    fn test_segment_distance() {
        let p = Vector3::new(0.5, 1.0, 0.0);
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        assert!((distance_point_to_segment(&p, &a, &b) - 1.0).abs() < 1e-10);

        let p = Vector3::new(2.0, 0.0, 0.0);
        assert!((distance_point_to_segment(&p, &a, &b) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_collision_along_motion() {
        let workspace = PlanarWorkspace::new(two_link(), vec![CircleObstacle::new(0.0, 1.5, 0.2)]);
        assert!(workspace.is_configuration_valid(&[0.0, 0.0]));
        assert!(!workspace.is_configuration_valid(&[PI / 2.0, 0.0]));

        // both endpoints are free but the arm sweeps through the obstacle
        assert!(workspace.is_configuration_valid(&[PI, 0.0]));
        assert!(!workspace.is_state_to_state_valid(&[0.0, 0.0], &[PI, 0.0]));
        assert!(workspace.is_state_to_state_valid(&[0.0, 0.0], &[0.1, 0.0]));
    }

    #[test]
    fn test_joint_limits() {
        let workspace = PlanarWorkspace::new(two_link(), Vec::new())
            .with_joint_limits(vec![(-1.0, 1.0), (-1.0, 1.0)]);
        assert!(workspace.is_state_to_state_valid(&[0.0, 0.0], &[0.5, 0.0]));
        assert!(!workspace.is_state_to_state_valid(&[0.0, 0.0], &[1.5, 0.0]));
    }

    #[test]
    fn test_distance_field() {
        let workspace = PlanarWorkspace::new(two_link(), vec![CircleObstacle::new(1.0, 0.0, 0.1)]);
        assert_eq!(workspace.distance_at(&CellXYZ::new(50, 0, 0)), Some(0));
        // cell center is about 0.41 m from the obstacle surface
        assert_eq!(workspace.distance_at(&CellXYZ::new(50, 25, 0)), Some(20));

        let empty = PlanarWorkspace::new(two_link(), Vec::new());
        assert_eq!(empty.distance_at(&CellXYZ::new(0, 0, 0)), None);
    }

    #[test]
    fn test_goal_tolerance() {
        let goal = EndEffectorGoal::new(two_link(), Point3D::new(2.0, 0.0, 0.0), 0.05);
        assert!(goal.is_state_goal(&[0.0, 0.0]));
        assert!(goal.is_state_goal(&[0.01, 0.0]));
        assert!(!goal.is_state_goal(&[0.2, 0.0]));
    }
}
