//! Coordinate codec
//!
//! Maps continuous joint angles to integer bucket coordinates and back.
//! Each joint has its own angular resolution. Joints flagged as wrapping
//! are reduced to one turn so that `-pi` and `pi` share a coordinate.

use std::f64::consts::PI;

use crate::common::{Coord, JointAngles, PlanningError, PlanningResult};

#[derive(Debug, Clone)]
struct JointDiscretization {
    resolution: f64,
    /// Buckets per full turn, only for wrapping joints
    turn_buckets: Option<i32>,
}

/// Joint angle discretizer
#[derive(Debug, Clone)]
pub struct CoordCodec {
    joints: Vec<JointDiscretization>,
}

impl CoordCodec {
    /// Codec with one resolution [rad] per joint and no wrapping
    pub fn new(resolutions: &[f64]) -> PlanningResult<Self> {
        Self::with_wrapping(resolutions, &vec![false; resolutions.len()])
    }

    /// Codec with the same resolution [rad] on every joint
    pub fn uniform(num_joints: usize, resolution: f64) -> PlanningResult<Self> {
        Self::new(&vec![resolution; num_joints])
    }

    pub fn with_wrapping(resolutions: &[f64], wraps: &[bool]) -> PlanningResult<Self> {
        if resolutions.is_empty() {
            return Err(PlanningError::InvalidParameter(
                "codec needs at least one joint".to_string(),
            ));
        }
        if resolutions.len() != wraps.len() {
            return Err(PlanningError::InvalidParameter(format!(
                "{} resolutions but {} wrap flags",
                resolutions.len(),
                wraps.len()
            )));
        }

        let mut joints = Vec::with_capacity(resolutions.len());
        for (i, (&resolution, &wraps)) in resolutions.iter().zip(wraps.iter()).enumerate() {
            if !(resolution.is_finite() && resolution > 0.0) {
                return Err(PlanningError::InvalidParameter(format!(
                    "joint {} resolution must be positive, got {}",
                    i, resolution
                )));
            }
            let turn_buckets = if wraps {
                Some(((2.0 * PI) / resolution).round().max(1.0) as i32)
            } else {
                None
            };
            joints.push(JointDiscretization { resolution, turn_buckets });
        }

        Ok(Self { joints })
    }

    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    /// Discretize by rounding each angle to the nearest bucket center
    pub fn to_coord(&self, angles: &[f64]) -> Coord {
        self.joints
            .iter()
            .zip(angles.iter())
            .map(|(joint, &angle)| {
                let bucket = (angle / joint.resolution).round() as i32;
                match joint.turn_buckets {
                    Some(n) => wrap_bucket(bucket, n),
                    None => bucket,
                }
            })
            .collect()
    }

    /// Bucket centers for a coordinate
    pub fn to_angles(&self, coord: &[i32]) -> JointAngles {
        self.joints
            .iter()
            .zip(coord.iter())
            .map(|(joint, &bucket)| bucket as f64 * joint.resolution)
            .collect()
    }
}

/// Reduce a bucket index into `[-n/2, n - n/2)`
fn wrap_bucket(bucket: i32, n: i32) -> i32 {
    let lo = -(n / 2);
    (bucket - lo).rem_euclid(n) + lo
}
