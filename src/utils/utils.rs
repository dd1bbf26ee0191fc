//! Helper functions

use crate::kinematic_traits::{Pose, UniformSource};
use nalgebra::UnitQuaternion;
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

/// Wraps an angle into (-PI, PI]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut v = angle % TWO_PI;
    if v <= -PI {
        v += TWO_PI;
    } else if v > PI {
        v -= TWO_PI;
    }
    v
}

/// Distance between two angles on the circle, in [0, PI]. Inputs are expected in (-PI, PI].
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    if d > PI { TWO_PI - d } else { d }
}

/// Interpolates between two angles along the shorter arc. The result is in (-PI, PI].
pub fn interpolate_angle(from: f64, to: f64, t: f64) -> f64 {
    let mut diff = to - from;
    if diff.abs() <= PI {
        return normalize_angle(from + diff * t);
    }
    // Go the other way round
    if diff > 0.0 {
        diff = TWO_PI - diff;
    } else {
        diff = -TWO_PI - diff;
    }
    normalize_angle(from - diff * t)
}

/// Uniform angle within `distance` of `near` on the circle, in (-PI, PI]. A window that
/// covers half a turn or more in each direction samples the whole circle.
pub fn random_angle_near_by<R: UniformSource + ?Sized>(rng: &mut R, near: f64, distance: f64) -> f64 {
    if distance >= PI {
        normalize_angle(rng.uniform_real(-PI, PI))
    } else {
        normalize_angle(rng.uniform_real(near - distance, near + distance))
    }
}

/// Print pose as translation and quaternion.
pub fn dump_pose(isometry: &Pose) {
    let translation = isometry.translation.vector;
    let rotation: UnitQuaternion<f64> = isometry.rotation;

    println!(
        "x: {:.5}, y: {:.5}, z: {:.5},  quat: {:.5},{:.5},{:.5},{:.5}",
        translation.x, translation.y, translation.z, rotation.i, rotation.j, rotation.k, rotation.w
    );
}

/// Print configuration values, one name = value pair per variable.
pub fn dump_values(names: &[String], values: &[f64]) {
    let mut row_str = String::new();
    for (name, value) in names.iter().zip(values) {
        row_str.push_str(&format!("{}={:.4} ", name, value));
    }
    println!("[{}]", row_str.trim_end());
}

/// Panics with both poses printed if they differ more than the given tolerances.
pub fn assert_pose_eq(ta: &Pose, tb: &Pose, distance_tolerance: f64, angular_tolerance: f64) -> bool {
    fn bad(ta: &Pose, tb: &Pose) {
        dump_pose(ta);
        dump_pose(tb);
    }

    let translation_distance = (ta.translation.vector - tb.translation.vector).norm();
    let angular_distance = ta.rotation.angle_to(&tb.rotation);

    if translation_distance.abs() > distance_tolerance {
        bad(ta, tb);
        panic!("Poses have too different translations");
    }

    if angular_distance.abs() > angular_tolerance {
        bad(ta, tb);
        panic!("Poses have too different angles");
    }
    true
}
