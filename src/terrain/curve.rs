//! Keyframed response curves over the normalized noise domain.
//!
//! [`Ramp`] maps a value in [0, 1] through sorted `(position, value)` keys with
//! linear interpolation, clamping outside the first and last key. The height
//! response curve and the surface color gradient are both ramps.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

// ---------------------------------------------------------------------------
// Lerp trait
// ---------------------------------------------------------------------------

/// Trait for types that can be linearly interpolated.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for [f32; 4] {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        [
            self[0] + (other[0] - self[0]) * t,
            self[1] + (other[1] - self[1]) * t,
            self[2] + (other[2] - self[2]) * t,
            self[3] + (other[3] - self[3]) * t,
        ]
    }
}

// ---------------------------------------------------------------------------
// Ramp
// ---------------------------------------------------------------------------

/// Keyframe ramp with at least one key.
#[derive(Clone, Debug, PartialEq)]
pub struct Ramp<T: Lerp> {
    keys: Vec<(f32, T)>,
}

/// Noise value -> height fraction.
pub type HeightCurve = Ramp<f32>;

/// Noise value -> RGBA vertex color.
pub type Gradient = Ramp<[f32; 4]>;

impl<T: Lerp> Ramp<T> {
    /// Create a ramp from unsorted keys. Fails on an empty key list.
    pub fn new(mut keys: Vec<(f32, T)>) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::config("ramp needs at least one key"));
        }
        keys.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(Self { keys })
    }

    /// A ramp that always returns `value`.
    pub fn constant(value: T) -> Self {
        Self { keys: vec![(0.0, value)] }
    }

    pub fn keys(&self) -> &[(f32, T)] {
        &self.keys
    }

    /// Evaluate at `t`, clamped to the key range.
    pub fn evaluate(&self, t: f32) -> T {
        let n = self.keys.len();
        let (first_t, ref first) = self.keys[0];
        if n == 1 || t <= first_t {
            return first.clone();
        }
        let (last_t, ref last) = self.keys[n - 1];
        if t >= last_t {
            return last.clone();
        }

        // first key strictly after t; exists and is > 0 given the checks above
        let upper = self.keys.iter().position(|k| k.0 > t).unwrap_or(n - 1);
        let (t_a, ref v_a) = self.keys[upper - 1];
        let (t_b, ref v_b) = self.keys[upper];
        let span = t_b - t_a;
        if span < 1e-6 {
            return v_b.clone();
        }
        v_a.lerp(v_b, (t - t_a) / span)
    }
}

impl HeightCurve {
    /// Identity response: height fraction equals the noise value.
    pub fn linear() -> Self {
        Self { keys: vec![(0.0, 0.0), (1.0, 1.0)] }
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl Default for Gradient {
    /// Shore sand through grass and rock up to snow.
    fn default() -> Self {
        Self {
            keys: vec![
                (0.0, [0.76, 0.70, 0.50, 1.0]),
                (0.3, [0.33, 0.55, 0.22, 1.0]),
                (0.65, [0.45, 0.42, 0.38, 1.0]),
                (1.0, [0.95, 0.95, 0.97, 1.0]),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Serde support
// ---------------------------------------------------------------------------

impl<T: Lerp + Serialize> Serialize for Ramp<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.keys.serialize(serializer)
    }
}

impl<'de, T: Lerp + Deserialize<'de>> Deserialize<'de> for Ramp<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let keys = Vec::<(f32, T)>::deserialize(deserializer)?;
        Self::new(keys).map_err(serde::de::Error::custom)
    }
}
