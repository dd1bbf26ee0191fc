//! Shared types and the contracts this crate expects from its collaborators.

use nalgebra::Isometry3;
use rand::Rng;

/// Pose is used for all rigid transforms in the tree (joint local transforms, global link
/// transforms, attached shape offsets). It contains both Cartesian position and rotation quaternion
/// ```
/// use nalgebra::{Isometry3, Translation3, UnitQuaternion};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(1.0, 0.0, 0.0);
/// // The quaternion should be normalized to represent a valid rotation.
/// let rotation = UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(1.0, 0.0, 0.0, 1.0).normalize());
/// let transform = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Sentinel magnitude for unbounded variables. A bound at or beyond it counts as unbounded.
pub const UNBOUNDED: f64 = f64::MAX;

/// Lower and upper limit of a single configuration variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableBounds {
    pub lower: f64,
    pub upper: f64,
}

impl VariableBounds {
    /// Bounds with lower <= upper. Panics otherwise, as this is a description error.
    pub fn new(lower: f64, upper: f64) -> Self {
        assert!(
            lower <= upper,
            "Lower bound {} must not exceed upper bound {}",
            lower,
            upper
        );
        VariableBounds { lower, upper }
    }

    /// Both sides at the representable extremes.
    pub const fn unbounded() -> Self {
        VariableBounds {
            lower: -UNBOUNDED,
            upper: UNBOUNDED,
        }
    }

    /// False if either side sits at (or beyond) the sentinel.
    pub fn is_bounded(&self) -> bool {
        self.lower > -UNBOUNDED && self.upper < UNBOUNDED
    }

    pub fn straddles_zero(&self) -> bool {
        self.lower <= 0.0 && self.upper >= 0.0
    }

    /// Zero if it is a valid value, the midpoint otherwise.
    pub fn default_value(&self) -> f64 {
        if self.straddles_zero() {
            0.0
        } else {
            (self.lower + self.upper) / 2.0
        }
    }

    /// True if `lower - margin <= value <= upper + margin`
    pub fn contains(&self, value: f64, margin: f64) -> bool {
        value >= self.lower - margin && value <= self.upper + margin
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.lower {
            self.lower
        } else if value > self.upper {
            self.upper
        } else {
            value
        }
    }

    /// Width of the range, infinite for unbounded variables.
    pub fn range(&self) -> f64 {
        if self.is_bounded() {
            self.upper - self.lower
        } else {
            f64::INFINITY
        }
    }

    /// Uniform value within the bounds. A range too wide to sample (unbounded on either side,
    /// or wider than an f64 can hold) gives the admissible value closest to 0 instead.
    pub fn sample<R: UniformSource + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.range().is_finite() {
            rng.uniform_real(self.lower, self.upper)
        } else {
            self.clamp(0.0)
        }
    }

    /// Uniform value within `distance` of `near` that also respects the bounds. Falls back to
    /// the clamped reference if the two do not overlap, and follows [`VariableBounds::sample`]
    /// if the window is still too wide to sample.
    pub fn sample_near_by<R: UniformSource + ?Sized>(&self, rng: &mut R, near: f64, distance: f64) -> f64 {
        let window = VariableBounds {
            lower: self.lower.max(near - distance),
            upper: self.upper.min(near + distance),
        };
        if window.lower > window.upper {
            self.clamp(near)
        } else {
            window.sample(rng)
        }
    }
}

/// Source of uniformly distributed reals used by all sampling operations.
/// Any `rand::Rng` qualifies.
pub trait UniformSource {
    /// Returns value with `lower <= value <= upper`
    fn uniform_real(&mut self, lower: f64, upper: f64) -> f64;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn uniform_real(&mut self, lower: f64, upper: f64) -> f64 {
        assert!(lower <= upper, "Empty sampling range [{}, {}]", lower, upper);
        if lower == upper {
            return lower;
        }
        self.gen_range(lower..=upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sentinels_are_unbounded() {
        let b = VariableBounds::unbounded();
        assert!(!b.is_bounded());
        assert!(!VariableBounds::new(-1.0, f64::MAX).is_bounded());
        assert!(!VariableBounds::new(f64::NEG_INFINITY, 1.0).is_bounded());
        assert!(VariableBounds::new(-1.0, 1.0).is_bounded());
        assert_eq!(b.range(), f64::INFINITY);
    }

    #[test]
    fn test_default_value() {
        assert_eq!(VariableBounds::new(-1.0, 2.0).default_value(), 0.0);
        assert_eq!(VariableBounds::new(1.0, 2.0).default_value(), 1.5);
        assert_eq!(VariableBounds::new(-3.0, -1.0).default_value(), -2.0);
        assert_eq!(VariableBounds::unbounded().default_value(), 0.0);
    }

    #[test]
    fn test_contains_and_clamp() {
        let b = VariableBounds::new(-1.0, 1.0);
        assert!(b.contains(1.05, 0.1));
        assert!(!b.contains(1.05, 0.0));
        assert_eq!(b.clamp(3.0), 1.0);
        assert_eq!(b.clamp(-3.0), -1.0);
        assert_eq!(b.clamp(0.25), 0.25);
    }

    #[test]
    #[should_panic]
    fn test_inverted_bounds_rejected() {
        VariableBounds::new(1.0, -1.0);
    }

    #[test]
    fn test_uniform_source_for_rng() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = rng.uniform_real(-0.5, 0.25);
            assert!((-0.5..=0.25).contains(&v));
        }
        assert_eq!(rng.uniform_real(2.0, 2.0), 2.0);
    }

    #[test]
    fn test_sample_wide_ranges() {
        let mut rng = StdRng::seed_from_u64(8);
        assert_eq!(VariableBounds::unbounded().sample(&mut rng), 0.0);
        assert_eq!(VariableBounds::new(2.0, UNBOUNDED).sample(&mut rng), 2.0);
        assert_eq!(VariableBounds::new(f64::NEG_INFINITY, -1.0).sample(&mut rng), -1.0);
        // Finite ends, but the width overflows
        assert_eq!(VariableBounds::new(-1e308, 1e308).sample(&mut rng), 0.0);
        for _ in 0..100 {
            let v = VariableBounds::new(-0.5, 0.5).sample(&mut rng);
            assert!((-0.5..=0.5).contains(&v));
        }
    }

    #[test]
    fn test_sample_near_by_windows() {
        let mut rng = StdRng::seed_from_u64(9);
        let unbounded = VariableBounds::unbounded();
        for distance in [f64::INFINITY, f64::MAX, 1e308] {
            assert_eq!(unbounded.sample_near_by(&mut rng, 3.0, distance), 0.0);
        }
        for _ in 0..100 {
            let v = unbounded.sample_near_by(&mut rng, 3.0, 0.5);
            assert!((2.5..=3.5).contains(&v));
        }

        let limited = VariableBounds::new(0.0, 1.0);
        for _ in 0..100 {
            let v = limited.sample_near_by(&mut rng, 0.9, f64::INFINITY);
            assert!((0.0..=1.0).contains(&v));
            let v = limited.sample_near_by(&mut rng, 0.9, 0.2);
            assert!((0.7..=1.0).contains(&v));
        }
        assert_eq!(limited.sample_near_by(&mut rng, 5.0, 0.1), 1.0);
    }
}
