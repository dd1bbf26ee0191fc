//! Free rigid motion: translation x, y, z and orientation quaternion (x, y, z, w).
//! The orientation is a point on SO(3), the four quaternion components are not independent
//! and are kept at unit norm.

use nalgebra::{Quaternion, Translation3, Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

use crate::joint_model::JointVariant;
use crate::kinematic_traits::{Pose, UniformSource, VariableBounds};

const TRANSLATION: std::ops::Range<usize> = 0..3;
const QX: usize = 3;
const QY: usize = 4;
const QZ: usize = 5;
const QW: usize = 6;

/// Accepted deviation of the squared quaternion norm from 1
const NORM_TOLERANCE: f64 = f32::EPSILON as f64 * 10.0;

/// Quaternions closer than this to unit norm are left untouched
const RENORMALIZE_THRESHOLD: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingJoint {
    /// Weight of the rotation angle when combined with the translation into one distance
    pub angular_distance_weight: f64,
}

impl Default for FloatingJoint {
    fn default() -> Self {
        Self {
            angular_distance_weight: 1.0,
        }
    }
}

fn quaternion_of(values: &[f64]) -> Quaternion<f64> {
    Quaternion::new(values[QW], values[QX], values[QY], values[QZ])
}

fn store_quaternion(q: &Quaternion<f64>, values: &mut [f64]) {
    values[QX] = q.i;
    values[QY] = q.j;
    values[QZ] = q.k;
    values[QW] = q.w;
}

/// Uniformly distributed rotation (Shoemake), built from three uniform samples.
fn random_quaternion<R: UniformSource + ?Sized>(rng: &mut R) -> Quaternion<f64> {
    let u1 = rng.uniform_real(0.0, 1.0);
    let u2 = rng.uniform_real(0.0, 2.0 * PI);
    let u3 = rng.uniform_real(0.0, 2.0 * PI);
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    Quaternion::new(b * u3.cos(), a * u2.sin(), a * u2.cos(), b * u3.sin())
}

/// Random direction on the unit sphere.
fn random_axis<R: UniformSource + ?Sized>(rng: &mut R) -> Unit<Vector3<f64>> {
    let z = rng.uniform_real(-1.0, 1.0);
    let phi = rng.uniform_real(0.0, 2.0 * PI);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Unit::new_normalize(Vector3::new(r * phi.cos(), r * phi.sin(), z))
}

impl FloatingJoint {
    /// Half of the angle between two orientations, in [0, PI/2].
    fn rotation_distance(&self, values1: &[f64], values2: &[f64]) -> f64 {
        let dq = quaternion_of(values1).coords.dot(&quaternion_of(values2).coords).abs();
        if dq + f64::EPSILON >= 1.0 { 0.0 } else { dq.acos() }
    }

    fn push_translation_near_by<R: UniformSource + ?Sized>(
        rng: &mut R,
        bounds: &[VariableBounds],
        near: &[f64],
        distance: f64,
        values: &mut Vec<f64>,
    ) {
        for i in TRANSLATION {
            values.push(bounds[i].sample_near_by(rng, near[i], distance));
        }
    }
}

impl JointVariant for FloatingJoint {
    fn variable_names(&self, joint_name: &str) -> Vec<String> {
        ["trans_x", "trans_y", "trans_z", "rot_x", "rot_y", "rot_z", "rot_w"]
            .iter()
            .map(|local| format!("{}/{}", joint_name, local))
            .collect()
    }

    fn initial_bounds(&self) -> Vec<VariableBounds> {
        let mut bounds = vec![VariableBounds::unbounded(); 3];
        bounds.extend([VariableBounds::new(-1.0, 1.0); 4]);
        bounds
    }

    fn maximum_extent(&self, bounds: &[VariableBounds]) -> f64 {
        let sum: f64 = bounds[TRANSLATION]
            .iter()
            .map(|b| {
                let d = b.lower - b.upper;
                d * d
            })
            .sum();
        sum.sqrt() + PI * 0.5 * self.angular_distance_weight
    }

    fn default_values(&self, bounds: &[VariableBounds], values: &mut Vec<f64>) {
        values.extend(bounds[TRANSLATION].iter().map(|b| b.default_value()));
        values.extend([0.0, 0.0, 0.0, 1.0]);
    }

    fn random_values<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        values: &mut Vec<f64>,
    ) {
        values.extend(bounds[TRANSLATION].iter().map(|b| b.sample(rng)));
        let q = random_quaternion(rng);
        values.extend([q.i, q.j, q.k, q.w]);
    }

    fn random_values_near_by<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &[VariableBounds],
        near: &[f64],
        distance: f64,
        values: &mut Vec<f64>,
    ) {
        Self::push_translation_near_by(rng, bounds, near, distance, values);

        // A zero weight leaves the rotation where it is, even for an unbounded distance
        let da = if self.angular_distance_weight > 0.0 {
            self.angular_distance_weight * distance
        } else {
            0.0
        };
        let q = if da >= 0.25 * PI {
            random_quaternion(rng)
        } else {
            // Rotate the reference by a random axis and an angle not exceeding da,
            // denser towards larger angles so the ball is filled evenly.
            let angle = 2.0 * rng.uniform_real(0.0, 1.0).cbrt() * da;
            let delta = UnitQuaternion::from_axis_angle(&random_axis(rng), angle);
            let reference = UnitQuaternion::from_quaternion(quaternion_of(near));
            (reference * delta).into_inner()
        };
        let start = values.len();
        values.extend([q.i, q.j, q.k, q.w]);
        self.normalize_rotation(&mut values[start - 3..]);
    }

    fn interpolate(&self, from: &[f64], to: &[f64], t: f64, state: &mut [f64]) {
        for i in TRANSLATION {
            state[i] = from[i] + (to[i] - from[i]) * t;
        }

        let q1 = quaternion_of(from);
        let mut q2 = quaternion_of(to);
        let mut dq = q1.coords.dot(&q2.coords);
        if dq < 0.0 {
            // Shortest path: the same rotation, other hemisphere
            q2 = -q2;
            dq = -dq;
        }
        let q = if dq + f64::EPSILON >= 1.0 {
            q1.lerp(&q2, t)
        } else {
            let theta = dq.acos();
            let d = 1.0 / theta.sin();
            q1 * (((1.0 - t) * theta).sin() * d) + q2 * ((t * theta).sin() * d)
        };
        store_quaternion(&q.normalize(), state);
    }

    fn distance(&self, values1: &[f64], values2: &[f64]) -> f64 {
        let translation: f64 = TRANSLATION
            .map(|i| {
                let d = values1[i] - values2[i];
                d * d
            })
            .sum::<f64>()
            .sqrt();
        translation + self.angular_distance_weight * self.rotation_distance(values1, values2)
    }

    fn satisfies_bounds(&self, values: &[f64], bounds: &[VariableBounds], margin: f64) -> bool {
        let translation_ok = (0..3).all(|i| bounds[i].contains(values[i], margin));
        let norm_squared = quaternion_of(values).norm_squared();
        translation_ok && (norm_squared - 1.0).abs() <= NORM_TOLERANCE + margin
    }

    fn normalize_rotation(&self, values: &mut [f64]) {
        let q = quaternion_of(values);
        let norm = q.norm();
        if norm < f64::EPSILON {
            store_quaternion(&Quaternion::identity(), values);
        } else if (norm - 1.0).abs() > RENORMALIZE_THRESHOLD {
            store_quaternion(&(q / norm), values);
        }
    }

    fn enforce_bounds(&self, values: &mut [f64], bounds: &[VariableBounds]) {
        self.normalize_rotation(values);
        for i in TRANSLATION {
            values[i] = bounds[i].clamp(values[i]);
        }
    }

    fn compute_transform(&self, values: &[f64]) -> Pose {
        Pose::from_parts(
            Translation3::new(values[0], values[1], values[2]),
            UnitQuaternion::from_quaternion(quaternion_of(values)),
        )
    }

    fn compute_joint_state_values(&self, transform: &Pose, values: &mut [f64]) {
        let t = &transform.translation.vector;
        values[0] = t.x;
        values[1] = t.y;
        values[2] = t.z;
        store_quaternion(transform.rotation.quaternion(), values);
    }
}
