//! Motion primitives for joint-space lattice expansion
//!
//! A primitive proposes one successor configuration from a source
//! configuration. Primitives are registered in a fixed order; that order is
//! the expansion order and therefore the tie-break among equal-cost edges.

use std::fmt::Debug;

use itertools::iproduct;

use crate::common::{JointAngles, PlanningError, PlanningResult};

use super::config::PrimitiveConfig;

/// Resolution class of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Fine step, used near obstacles
    Normal,
    /// Long-range step, used far from obstacles
    Coarse,
}

/// Parameterized transition rule
pub trait MotionPrimitive: Debug {
    fn resolution(&self) -> Resolution;

    /// Successor configuration, or `None` when the rule does not apply
    fn successor(&self, angles: &[f64]) -> Option<JointAngles>;
}

/// Adds a fixed offset to the joint vector, optionally within joint limits
#[derive(Debug, Clone)]
pub struct JointStep {
    deltas: Vec<f64>,
    resolution: Resolution,
    limits: Option<Vec<(f64, f64)>>,
}

impl JointStep {
    pub fn new(deltas: Vec<f64>, resolution: Resolution) -> Self {
        Self { deltas, resolution, limits: None }
    }

    /// Step of `delta` [rad] on a single joint
    pub fn single(num_joints: usize, joint: usize, delta: f64, resolution: Resolution) -> Self {
        let mut deltas = vec![0.0; num_joints];
        if let Some(d) = deltas.get_mut(joint) {
            *d = delta;
        }
        Self::new(deltas, resolution)
    }

    /// Decline successors outside `[min, max]` on any joint
    pub fn with_limits(mut self, limits: Vec<(f64, f64)>) -> Self {
        self.limits = Some(limits);
        self
    }
}

impl MotionPrimitive for JointStep {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn successor(&self, angles: &[f64]) -> Option<JointAngles> {
        if angles.len() != self.deltas.len() {
            return None;
        }

        let succ: JointAngles = angles
            .iter()
            .zip(self.deltas.iter())
            .map(|(a, d)| a + d)
            .collect();

        if let Some(limits) = &self.limits {
            let within = succ
                .iter()
                .zip(limits.iter())
                .all(|(&a, &(min, max))| a >= min && a <= max);
            if !within {
                return None;
            }
        }

        Some(succ)
    }
}

/// Append-only primitive registry used while setting up an episode
#[derive(Debug, Default)]
pub struct MotionPrimitiveLibrary {
    prims: Vec<Box<dyn MotionPrimitive>>,
}

impl MotionPrimitiveLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: MotionPrimitive + 'static>(&mut self, prim: P) -> &mut Self {
        self.prims.push(Box::new(prim));
        self
    }

    pub fn len(&self) -> usize {
        self.prims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }

    /// Freeze the registration order and compute the resolution flag
    pub fn finalize(self) -> MotionPrimitiveSet {
        let has_coarse = self
            .prims
            .iter()
            .any(|p| p.resolution() == Resolution::Coarse);
        MotionPrimitiveSet {
            prims: self.prims,
            has_coarse,
        }
    }

    /// Symmetric single-joint steps for every joint
    ///
    /// Per joint, in joint order: `+normal`, `-normal`, then `+coarse`,
    /// `-coarse` when a coarse step is configured.
    pub fn from_config(num_joints: usize, config: &PrimitiveConfig) -> PlanningResult<Self> {
        if !(config.normal_step_deg > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "normal_step_deg must be positive, got {}",
                config.normal_step_deg
            )));
        }
        if let Some(coarse) = config.coarse_step_deg {
            if !(coarse > 0.0) {
                return Err(PlanningError::InvalidParameter(format!(
                    "coarse_step_deg must be positive, got {}",
                    coarse
                )));
            }
        }

        let limits = match &config.joint_limits_deg {
            Some(limits) if limits.len() != num_joints => {
                return Err(PlanningError::InvalidParameter(format!(
                    "{} joint limits for {} joints",
                    limits.len(),
                    num_joints
                )));
            }
            Some(limits) => Some(
                limits
                    .iter()
                    .map(|[min, max]| (min.to_radians(), max.to_radians()))
                    .collect::<Vec<_>>(),
            ),
            None => None,
        };

        let mut steps = vec![(config.normal_step_deg, Resolution::Normal)];
        if let Some(coarse) = config.coarse_step_deg {
            steps.push((coarse, Resolution::Coarse));
        }

        let mut library = Self::new();
        for (joint, &(step_deg, resolution), sign) in iproduct!(0..num_joints, steps.iter(), [1.0, -1.0]) {
            let mut prim = JointStep::single(num_joints, joint, sign * step_deg.to_radians(), resolution);
            if let Some(limits) = &limits {
                prim = prim.with_limits(limits.clone());
            }
            library.register(prim);
        }
        Ok(library)
    }
}

/// Immutable, ordered primitive set used during expansion
#[derive(Debug)]
pub struct MotionPrimitiveSet {
    prims: Vec<Box<dyn MotionPrimitive>>,
    has_coarse: bool,
}

impl MotionPrimitiveSet {
    /// Whether expansion switches resolution by distance
    pub fn has_coarse(&self) -> bool {
        self.has_coarse
    }

    pub fn len(&self) -> usize {
        self.prims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }

    /// Primitives with their registration index
    pub fn iter(&self) -> impl Iterator<Item = (usize, &dyn MotionPrimitive)> {
        self.prims.iter().map(|p| p.as_ref()).enumerate()
    }
}

impl Default for MotionPrimitiveSet {
    fn default() -> Self {
        MotionPrimitiveLibrary::new().finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_step_successor() {
        let prim = JointStep::single(3, 1, 0.2, Resolution::Normal);
        let succ = prim.successor(&[0.0, 0.1, 0.5]).unwrap();
        assert!((succ[0] - 0.0).abs() < 1e-10);
        assert!((succ[1] - 0.3).abs() < 1e-10);
        assert!((succ[2] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_joint_step_declines_dimension_mismatch() {
        let prim = JointStep::single(2, 0, 0.1, Resolution::Normal);
        assert!(prim.successor(&[0.0]).is_none());
    }

    #[test]
    fn test_joint_step_respects_limits() {
        let prim = JointStep::single(1, 0, 0.5, Resolution::Normal).with_limits(vec![(-1.0, 1.0)]);
        assert!(prim.successor(&[0.4]).is_some());
        assert!(prim.successor(&[0.6]).is_none());
    }

    #[test]
    fn test_has_coarse_computed_on_finalize() {
        let mut library = MotionPrimitiveLibrary::new();
        library.register(JointStep::single(1, 0, 0.1, Resolution::Normal));
        assert!(!library.finalize().has_coarse());

        let mut library = MotionPrimitiveLibrary::new();
        library
            .register(JointStep::single(1, 0, 0.1, Resolution::Normal))
            .register(JointStep::single(1, 0, 0.4, Resolution::Coarse));
        let set = library.finalize();
        assert!(set.has_coarse());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_iteration_preserves_registration_order() {
        let mut library = MotionPrimitiveLibrary::new();
        for delta in [0.3, -0.1, 0.2] {
            library.register(JointStep::single(1, 0, delta, Resolution::Normal));
        }
        let set = library.finalize();
        let firsts: Vec<f64> = set
            .iter()
            .map(|(_, p)| p.successor(&[0.0]).unwrap()[0])
            .collect();
        assert_eq!(firsts, vec![0.3, -0.1, 0.2]);

        let indices: Vec<usize> = set.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_from_config_layout() {
        let config = PrimitiveConfig {
            normal_step_deg: 2.0,
            coarse_step_deg: Some(8.0),
            joint_limits_deg: None,
        };
        let set = MotionPrimitiveLibrary::from_config(2, &config).unwrap().finalize();
        assert_eq!(set.len(), 8);
        assert!(set.has_coarse());

        let resolutions: Vec<Resolution> = set.iter().map(|(_, p)| p.resolution()).collect();
        assert_eq!(
            resolutions,
            vec![
                Resolution::Normal,
                Resolution::Normal,
                Resolution::Coarse,
                Resolution::Coarse,
                Resolution::Normal,
                Resolution::Normal,
                Resolution::Coarse,
                Resolution::Coarse,
            ]
        );

        let (_, first) = set.iter().next().unwrap();
        let succ = first.successor(&[0.0, 0.0]).unwrap();
        assert!((succ[0] - 2.0_f64.to_radians()).abs() < 1e-10);
    }

    #[test]
    fn test_from_config_rejects_bad_limits() {
        let config = PrimitiveConfig {
            normal_step_deg: 2.0,
            coarse_step_deg: None,
            joint_limits_deg: Some(vec![[-90.0, 90.0]]),
        };
        assert!(MotionPrimitiveLibrary::from_config(2, &config).is_err());
    }
}
