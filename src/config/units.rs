//! Unit types for physical quantities.
//!
//! Type-safe radian-based units; one pulse advances a fixed angular
//! increment derived from the motor's step count and resolution.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Angular position in radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f32);

impl Radians {
    /// Create a new Radians value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Add for Radians {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Radians {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Angular velocity in radians per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct RadiansPerSec(pub f32);

impl RadiansPerSec {
    /// Create a new RadiansPerSec value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Angular acceleration in radians per second squared.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct RadiansPerSecSquared(pub f32);

impl RadiansPerSecSquared {
    /// Create a new RadiansPerSecSquared value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Angular increment of one pulse, in radians.
///
/// `2π / (steps_per_revolution × microstep divisor)`.
#[inline]
pub fn step_angle(steps_per_revolution: u16, divisor: u16) -> f32 {
    core::f32::consts::TAU / (steps_per_revolution as f32 * divisor as f32)
}
