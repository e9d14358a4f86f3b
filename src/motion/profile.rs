//! Delay profile calculation.
//!
//! Translates a displacement and velocity/acceleration bounds into an
//! ordered sequence of per-step delays realizing a trapezoidal velocity
//! profile, with a triangular fallback when the travel distance is too
//! short to reach cruise velocity.

use libm::{ceilf, fabsf, floorf, sqrtf};

use crate::error::{ArgumentError, Result};

/// Maximum number of steps a single delay profile can hold.
pub const MAX_PROFILE_STEPS: usize = 4096;

/// Default minimum per-step delay in nanoseconds.
///
/// Represents the pulse-rate ceiling of DRV-class driver chips
/// (500 kHz step rate); delays are never shorter than this floor.
pub const DEFAULT_MIN_STEP_DELAY_NS: u32 = 2_000;

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive displacement.
    #[default]
    Forward,
    /// Negative displacement.
    Reverse,
}

impl Direction {
    /// Get direction from a signed displacement.
    #[inline]
    pub fn from_displacement(displacement: f32) -> Self {
        if displacement < 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// Computed per-step delay sequence for one move.
///
/// Ordered, consumed monotonically by the execution loop, and discarded
/// on completion or cancellation.
#[derive(Debug, Clone, Default)]
pub struct DelayProfile {
    delays: heapless::Vec<u32, MAX_PROFILE_STEPS>,
    direction: Direction,
    step_angle: f32,
    residual: f32,
    peak_velocity: f32,
    accel_steps: usize,
    cruise_steps: usize,
    decel_steps: usize,
}

impl DelayProfile {
    /// Number of steps in the profile.
    #[inline]
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Whether the profile contains no steps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// The per-step delays in nanoseconds, in execution order.
    #[inline]
    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    /// Direction the steps are issued in.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Angular increment of one step, in radians.
    #[inline]
    pub fn step_angle(&self) -> f32 {
        self.step_angle
    }

    /// Sub-step remainder of the requested displacement, in radians.
    ///
    /// Displacements are truncated to whole steps; the residual is
    /// unreachable by this profile and the caller decides whether to
    /// re-plan.
    #[inline]
    pub fn residual(&self) -> f32 {
        self.residual
    }

    /// Peak velocity the profile reaches, in rad/s.
    #[inline]
    pub fn peak_velocity(&self) -> f32 {
        self.peak_velocity
    }

    /// Steps spent ramping toward cruise velocity.
    #[inline]
    pub fn accel_steps(&self) -> usize {
        self.accel_steps
    }

    /// Steps spent at constant cruise velocity.
    #[inline]
    pub fn cruise_steps(&self) -> usize {
        self.cruise_steps
    }

    /// Steps spent ramping down to rest.
    #[inline]
    pub fn decel_steps(&self) -> usize {
        self.decel_steps
    }

    /// Signed angular distance the profile covers, in radians.
    #[inline]
    pub fn total_angle(&self) -> f32 {
        self.direction.sign() * self.delays.len() as f32 * self.step_angle
    }

    /// Total duration of the profile in nanoseconds.
    pub fn duration_ns(&self) -> u64 {
        self.delays.iter().map(|&d| d as u64).sum()
    }
}

/// Inputs to delay profile computation.
///
/// Pure data; [`ProfilePlan::compute`] has no side effects.
#[derive(Debug, Clone, Copy)]
pub struct ProfilePlan {
    /// Signed displacement to cover, in radians.
    pub displacement: f32,
    /// Velocity the motor is currently at, in rad/s (magnitude used).
    pub initial_velocity: f32,
    /// Cruise velocity ceiling for the move, in rad/s.
    pub cruise_velocity: f32,
    /// Acceleration bound, in rad/s² (magnitude used).
    pub max_acceleration: f32,
    /// Angular increment of one step, in radians.
    pub step_angle: f32,
    /// Minimum per-step delay in nanoseconds (driver pulse-rate ceiling).
    pub min_step_delay_ns: u32,
}

impl ProfilePlan {
    /// Compute the delay profile for this plan.
    ///
    /// For each step the instantaneous velocity follows the kinematic
    /// relation `v² = v₀² ± 2·a·Δs` and the step's delay is `Δs / v`,
    /// clamped to the minimum delay. When the displacement is too short
    /// for a full ramp to cruise velocity and back to rest, the profile
    /// degrades to a triangular accelerate-then-decelerate shape whose
    /// peak stays below the requested cruise velocity.
    ///
    /// # Errors
    ///
    /// * `NonFinite` - any kinematic input is NaN or infinite
    /// * `ZeroVelocity` - non-zero displacement with cruise velocity <= 0
    /// * `ZeroAcceleration` - zero acceleration with a required velocity change
    /// * `ProfileTooLong` - the move needs more steps than a profile holds
    pub fn compute(&self) -> Result<DelayProfile> {
        self.check_finite()?;

        let direction = Direction::from_displacement(self.displacement);
        let step_angle = self.step_angle;
        let distance = fabsf(self.displacement);

        // Truncate to whole steps; the remainder is reported, not stepped.
        // The clamp absorbs division rounding when the quotient lands on
        // an integer boundary.
        let total = floorf(distance / step_angle) as usize;
        let residual = (distance - total as f32 * step_angle).max(0.0);

        if total == 0 {
            return Ok(DelayProfile {
                direction,
                step_angle,
                residual,
                ..DelayProfile::default()
            });
        }

        let vc = self.cruise_velocity;
        if vc <= 0.0 {
            return Err(ArgumentError::ZeroVelocity.into());
        }

        if total > MAX_PROFILE_STEPS {
            return Err(ArgumentError::ProfileTooLong {
                steps: total,
                capacity: MAX_PROFILE_STEPS,
            }
            .into());
        }

        let v0 = fabsf(self.initial_velocity);
        let a = fabsf(self.max_acceleration);

        if a == 0.0 {
            // No way to change velocity; only a constant-rate move from
            // an already-matching velocity is realizable.
            if fabsf(v0 - vc) > 1e-6 {
                return Err(ArgumentError::ZeroAcceleration {
                    current: v0,
                    target: vc,
                }
                .into());
            }
            return self.constant_rate(direction, total, residual, vc);
        }

        let two_a_ds = 2.0 * a * step_angle;
        let vc_sq = vc * vc;
        let v0_sq = v0 * v0;

        // Steps needed to ramp between v0 and vc, and from vc to rest.
        let ramp_steps = ceilf(fabsf(vc_sq - v0_sq) / two_a_ds) as usize;
        let stop_steps = ceilf(vc_sq / two_a_ds) as usize;

        let ramp_up = v0_sq <= vc_sq;
        // Entry steps ramp between v0 and vc; exit steps ramp down to
        // rest. The trajectory peak is the entry velocity when the move
        // starts faster than cruise.
        let (entry_steps, cruise_steps, exit_steps, peak_sq) =
            if ramp_steps + stop_steps <= total {
                // Full trapezoid.
                let peak_sq = if ramp_up { vc_sq } else { v0_sq };
                (ramp_steps, total - ramp_steps - stop_steps, stop_steps, peak_sq)
            } else if ramp_up {
                // Triangular fallback: accelerate to a reduced peak, then
                // immediately decelerate to rest. The peak satisfies
                // (v_p² − v0²)/(2aΔs) + v_p²/(2aΔs) = total.
                let peak_sq = (two_a_ds * total as f32 + v0_sq) * 0.5;
                let peak_sq = if peak_sq < v0_sq { v0_sq } else { peak_sq };
                let entry = ceilf((peak_sq - v0_sq) / two_a_ds) as usize;
                let entry = entry.min(total);
                (entry, 0, total - entry, peak_sq)
            } else {
                // Already faster than cruise with no room to settle at it:
                // decelerate the whole way.
                (0, 0, total, v0_sq)
            };

        let mut profile = DelayProfile {
            direction,
            step_angle,
            residual,
            peak_velocity: sqrtf(peak_sq),
            // A slow-down entry counts as deceleration, not ramp-up.
            accel_steps: if ramp_up { entry_steps } else { 0 },
            cruise_steps,
            decel_steps: if ramp_up {
                exit_steps
            } else {
                entry_steps + exit_steps
            },
            ..DelayProfile::default()
        };

        // First-step-from-rest velocity, capped so the floor never
        // implies a step faster than the cruise ceiling or the peak.
        let v_floor_sq = two_a_ds.min(vc_sq).min(peak_sq);
        let mut v_sq = v0_sq;

        for i in 0..total {
            if i < entry_steps {
                v_sq = if ramp_up {
                    (v_sq + two_a_ds).min(peak_sq)
                } else {
                    (v_sq - two_a_ds).max(vc_sq)
                };
            } else if i < entry_steps + cruise_steps {
                v_sq = vc_sq;
            } else {
                v_sq = (v_sq - two_a_ds).max(0.0);
            }

            let v = sqrtf(v_sq.max(v_floor_sq));
            let _ = profile.delays.push(self.delay_for(v));
        }

        Ok(profile)
    }

    fn constant_rate(
        &self,
        direction: Direction,
        total: usize,
        residual: f32,
        velocity: f32,
    ) -> Result<DelayProfile> {
        let mut profile = DelayProfile {
            direction,
            step_angle: self.step_angle,
            residual,
            peak_velocity: velocity,
            cruise_steps: total,
            ..DelayProfile::default()
        };
        let delay = self.delay_for(velocity);
        for _ in 0..total {
            let _ = profile.delays.push(delay);
        }
        Ok(profile)
    }

    #[inline]
    fn delay_for(&self, velocity: f32) -> u32 {
        let ns = self.step_angle / velocity * 1_000_000_000.0;
        let ns = ns as u32; // saturating cast
        ns.max(self.min_step_delay_ns)
    }

    fn check_finite(&self) -> Result<()> {
        let params = [
            ("displacement", self.displacement),
            ("initial_velocity", self.initial_velocity),
            ("cruise_velocity", self.cruise_velocity),
            ("max_acceleration", self.max_acceleration),
            ("step_angle", self.step_angle),
        ];
        for (name, value) in params {
            if !value.is_finite() {
                return Err(ArgumentError::NonFinite { name }.into());
            }
        }
        Ok(())
    }
}
