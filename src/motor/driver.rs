//! Stepper motor driver.
//!
//! Owns one motor's kinematic state and pin bindings, and orchestrates
//! profile planning, microstep control, and step pulse execution through
//! an injected pin port.

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::cancel::CancelToken;
use crate::config::units::{step_angle, Radians, RadiansPerSec, RadiansPerSecSquared};
use crate::error::{ArgumentError, ConfigError, Error, Result};
use crate::microstep::{MicrostepController, StepResolution};
use crate::motion::{DelayProfile, Direction, ProfilePlan, DEFAULT_MIN_STEP_DELAY_NS};
use crate::port::{Level, PinClaims, PinPort};

use super::state::MotorState;

/// Step pulse high time in nanoseconds.
///
/// Driver chips need only a few microseconds of high time; the pulse
/// width is subtracted from each step's delay.
const STEP_PULSE_WIDTH_NS: u32 = 2_000;

/// The five driver pins a motor is wired to.
///
/// Pin ids are opaque board-defined strings; construction validates them
/// but never interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinBindings {
    step: String<16>,
    dir: String<16>,
    m1: String<16>,
    m2: String<16>,
    m3: String<16>,
}

impl PinBindings {
    /// Create a binding set from pin ids.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPinId` for an empty or over-long id and
    /// `DuplicatePin` when one id is bound to more than one role.
    pub fn new(step: &str, dir: &str, m1: &str, m2: &str, m3: &str) -> Result<Self> {
        let roles = [("step", step), ("dir", dir), ("m1", m1), ("m2", m2), ("m3", m3)];

        for (role, pin) in roles {
            if pin.is_empty() || pin.len() > 16 {
                return Err(ConfigError::InvalidPinId { role }.into());
            }
        }
        for (i, (_, pin)) in roles.iter().enumerate() {
            if roles[i + 1..].iter().any(|(_, other)| other == pin) {
                return Err(ConfigError::DuplicatePin(
                    String::try_from(*pin).unwrap_or_default(),
                )
                .into());
            }
        }

        Ok(Self {
            step: String::try_from(step).unwrap_or_default(),
            dir: String::try_from(dir).unwrap_or_default(),
            m1: String::try_from(m1).unwrap_or_default(),
            m2: String::try_from(m2).unwrap_or_default(),
            m3: String::try_from(m3).unwrap_or_default(),
        })
    }

    /// The step pin id.
    pub fn step(&self) -> &str {
        self.step.as_str()
    }

    /// The direction pin id.
    pub fn dir(&self) -> &str {
        self.dir.as_str()
    }

    /// The mode-select pin ids, in M1, M2, M3 order.
    pub fn mode_pins(&self) -> [&str; 3] {
        [self.m1.as_str(), self.m2.as_str(), self.m3.as_str()]
    }

    fn all(&self) -> [&str; 5] {
        [
            self.step.as_str(),
            self.dir.as_str(),
            self.m1.as_str(),
            self.m2.as_str(),
            self.m3.as_str(),
        ]
    }
}

/// One physical stepper motor.
///
/// Construct with [`Motor::new`], bind pins with
/// [`Motor::configure_pins`], then issue motion requests. All hardware
/// interaction goes through the injected [`PinPort`]; step timing uses an
/// embedded-hal [`DelayNs`] provider.
#[derive(Debug)]
pub struct Motor {
    id: String<32>,

    /// Current position in radians.
    position: f32,

    /// Current velocity in rad/s (signed).
    velocity: f32,

    /// Acceleration bound in rad/s² (magnitude used for ramps).
    acceleration: f32,

    target_position: f32,
    target_velocity: f32,

    resolution: StepResolution,
    steps_per_revolution: u16,
    min_step_delay_ns: u32,

    pins: Option<PinBindings>,

    /// Cached direction pin state, to skip redundant writes.
    current_direction: Option<Direction>,

    /// Profile for the move in flight; empty when idle.
    profile: DelayProfile,

    state: MotorState,
}

impl Motor {
    /// Create a motor with zeroed kinematics, full-step resolution, and a
    /// 200-step-per-revolution mechanical default. Pins are unbound.
    pub fn new(id: &str) -> Self {
        Self {
            id: String::try_from(id).unwrap_or_default(),
            position: 0.0,
            velocity: 0.0,
            acceleration: 0.0,
            target_position: 0.0,
            target_velocity: 0.0,
            resolution: StepResolution::Full,
            steps_per_revolution: 200,
            min_step_delay_ns: DEFAULT_MIN_STEP_DELAY_NS,
            pins: None,
            current_direction: None,
            profile: DelayProfile::default(),
            state: MotorState::Idle,
        }
    }

    /// Create a motor from a configuration entry.
    pub fn from_config(id: &str, config: &crate::config::MotorConfig) -> Result<Self> {
        if config.steps_per_revolution == 0 {
            return Err(ConfigError::InvalidStepsPerRevolution(0).into());
        }

        let mut motor = Self::new(id);
        motor.steps_per_revolution = config.steps_per_revolution;
        motor.resolution = config.resolution;
        motor.acceleration = config.acceleration.value();
        motor.min_step_delay_ns = config.min_step_delay_ns;
        Ok(motor)
    }

    /// The motor's unique identifier.
    #[inline]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Current position in radians.
    #[inline]
    pub fn position(&self) -> Radians {
        Radians(self.position)
    }

    /// Current velocity in rad/s.
    #[inline]
    pub fn velocity(&self) -> RadiansPerSec {
        RadiansPerSec(self.velocity)
    }

    /// Configured acceleration bound in rad/s².
    #[inline]
    pub fn acceleration(&self) -> RadiansPerSecSquared {
        RadiansPerSecSquared(self.acceleration)
    }

    /// Current step resolution.
    #[inline]
    pub fn step_resolution(&self) -> StepResolution {
        self.resolution
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// The delay profile held for the move in flight; empty when idle.
    #[inline]
    pub fn delay_profile(&self) -> &DelayProfile {
        &self.profile
    }

    /// Whether pins have been bound.
    #[inline]
    pub fn is_configured(&self) -> bool {
        self.pins.is_some()
    }

    /// Angular increment of one pulse at the current resolution, in
    /// radians.
    #[inline]
    pub fn step_angle(&self) -> f32 {
        step_angle(self.steps_per_revolution, self.resolution.divisor())
    }

    /// Bind and configure the motor's five driver pins as outputs.
    ///
    /// Valid from Idle; calling it again rebinds, releasing the previous
    /// claims. Ownership is checked against `claims` for all five pins
    /// before any claim or hardware write, so a conflict leaves this
    /// motor's bindings unset and the other motor's untouched. A failure
    /// after the previous claims were released (registry full, port
    /// rejecting a pin) leaves the motor fully unconfigured; bind again
    /// before moving. After the outputs are configured the current step
    /// resolution is asserted on the mode pins, keeping resolution and
    /// pin levels consistent.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` variants for ownership conflicts or rejected
    /// pins; `HardwareTimeout` if the mode-pin write stalls.
    pub fn configure_pins<P: PinPort>(
        &mut self,
        port: &mut P,
        claims: &mut PinClaims,
        bindings: PinBindings,
    ) -> Result<()> {
        // Fail fast, before any claim or pin write.
        for pin in bindings.all() {
            claims.check(pin, self.id.as_str()).map_err(Error::Config)?;
        }

        claims.release_all(self.id.as_str());
        for pin in bindings.all() {
            if let Err(e) = claims.claim(pin, self.id.as_str()) {
                self.unbind(claims);
                return Err(e.into());
            }
        }

        for pin in bindings.all() {
            if port.configure_output(pin).is_err() {
                self.unbind(claims);
                return Err(ConfigError::PortRejected(
                    String::try_from(pin).unwrap_or_default(),
                )
                .into());
            }
        }

        let mode_pins = [
            bindings.m1.clone(),
            bindings.m2.clone(),
            bindings.m3.clone(),
        ];
        self.pins = Some(bindings);
        self.current_direction = None;

        MicrostepController::apply(
            port,
            [mode_pins[0].as_str(), mode_pins[1].as_str(), mode_pins[2].as_str()],
            self.resolution,
        )
    }

    /// Switch the driver's microstep resolution.
    ///
    /// Idempotent; the stored resolution is updated only after all three
    /// mode pins were written. If the port stalls mid-write the stored
    /// resolution keeps its previous value while the mode pins may hold
    /// a partial pattern; re-issue the call once the port recovers to
    /// re-assert a complete one.
    ///
    /// # Errors
    ///
    /// `NotConfigured` if pins are unbound.
    pub fn set_step_resolution<P: PinPort>(
        &mut self,
        port: &mut P,
        resolution: StepResolution,
    ) -> Result<()> {
        let pins = self.pins.as_ref().ok_or_else(|| Error::NotConfigured {
            motor: self.id.clone(),
        })?;

        MicrostepController::apply(port, pins.mode_pins(), resolution)?;
        self.resolution = resolution;
        Ok(())
    }

    /// Set the acceleration bound used by subsequent moves.
    ///
    /// Pure state mutation, no pin writes. Any finite value is accepted;
    /// unusable combinations are rejected at plan time.
    pub fn set_acceleration(&mut self, acceleration: RadiansPerSecSquared) -> Result<()> {
        if !acceleration.value().is_finite() {
            return Err(ArgumentError::NonFinite {
                name: "acceleration",
            }
            .into());
        }
        self.acceleration = acceleration.value();
        Ok(())
    }

    /// Move to an absolute position, cruising at up to `velocity`.
    ///
    /// Blocks until the move completes; the motor ends at rest. The
    /// displacement is truncated to whole steps at the current
    /// resolution; a sub-step remainder is left untravelled.
    pub fn move_to<P: PinPort, D: DelayNs>(
        &mut self,
        port: &mut P,
        delay: &mut D,
        position: Radians,
        velocity: RadiansPerSec,
    ) -> Result<()> {
        self.run_move(port, delay, position.value(), velocity.value(), None)
    }

    /// Move by a relative displacement, cruising at up to `velocity`.
    pub fn move_by<P: PinPort, D: DelayNs>(
        &mut self,
        port: &mut P,
        delay: &mut D,
        displacement: Radians,
        velocity: RadiansPerSec,
    ) -> Result<()> {
        let target = self.position + displacement.value();
        self.run_move(port, delay, target, velocity.value(), None)
    }

    /// [`Motor::move_to`] observing a cancellation token between steps.
    pub fn move_to_with_cancel<P: PinPort, D: DelayNs>(
        &mut self,
        port: &mut P,
        delay: &mut D,
        position: Radians,
        velocity: RadiansPerSec,
        cancel: &CancelToken,
    ) -> Result<()> {
        self.run_move(port, delay, position.value(), velocity.value(), Some(cancel))
    }

    /// [`Motor::move_by`] observing a cancellation token between steps.
    pub fn move_by_with_cancel<P: PinPort, D: DelayNs>(
        &mut self,
        port: &mut P,
        delay: &mut D,
        displacement: Radians,
        velocity: RadiansPerSec,
        cancel: &CancelToken,
    ) -> Result<()> {
        let target = self.position + displacement.value();
        self.run_move(port, delay, target, velocity.value(), Some(cancel))
    }

    fn run_move<P: PinPort, D: DelayNs>(
        &mut self,
        port: &mut P,
        delay: &mut D,
        target: f32,
        velocity: f32,
        cancel: Option<&CancelToken>,
    ) -> Result<()> {
        if self.pins.is_none() {
            return Err(Error::NotConfigured {
                motor: self.id.clone(),
            });
        }

        self.state = MotorState::Planning;

        let plan = ProfilePlan {
            displacement: target - self.position,
            initial_velocity: self.velocity,
            cruise_velocity: velocity,
            max_acceleration: self.acceleration,
            step_angle: self.step_angle(),
            min_step_delay_ns: self.min_step_delay_ns,
        };

        // Plan errors abort before any pin is toggled.
        let profile = match plan.compute() {
            Ok(p) => p,
            Err(e) => {
                self.state = MotorState::Idle;
                return Err(e);
            }
        };

        if profile.is_empty() {
            // Zero (or sub-step) displacement: no-op, not an error.
            self.state = MotorState::Idle;
            return Ok(());
        }

        self.target_position = target;
        self.target_velocity = velocity;
        self.profile = profile;

        if let Err(e) = self.set_direction(port, self.profile.direction()) {
            self.finish(MotorState::Idle);
            return Err(e);
        }

        let step_pin = match &self.pins {
            Some(p) => p.step.clone(),
            None => {
                // Checked at entry; pins cannot be unbound mid-request.
                self.finish(MotorState::Idle);
                return Err(Error::NotConfigured {
                    motor: self.id.clone(),
                });
            }
        };

        self.state = MotorState::Executing;
        self.execute(port, delay, &step_pin, cancel)
    }

    /// Walk the stored profile, pulsing the step pin once per entry.
    ///
    /// Each pulse: step pin high, pulse-width wait, step pin low, then
    /// the remainder of the entry's delay. Position is committed on the
    /// rising edge (where the driver latches the step), so an error on
    /// the trailing edge still leaves position accurate.
    fn execute<P: PinPort, D: DelayNs>(
        &mut self,
        port: &mut P,
        delay: &mut D,
        step_pin: &str,
        cancel: Option<&CancelToken>,
    ) -> Result<()> {
        let profile = core::mem::take(&mut self.profile);
        let increment = profile.direction().sign() * profile.step_angle();

        for &delay_ns in profile.delays() {
            // Observed between steps only, never mid-pulse.
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    self.finish(MotorState::Idle);
                    return Ok(());
                }
            }

            if port.write_level(step_pin, Level::High).is_err() {
                self.finish(MotorState::Idle);
                return Err(Self::timeout(step_pin));
            }

            self.position += increment;
            self.velocity = increment / (delay_ns as f32 * 1e-9);

            delay.delay_ns(STEP_PULSE_WIDTH_NS);

            if port.write_level(step_pin, Level::Low).is_err() {
                self.finish(MotorState::Idle);
                return Err(Self::timeout(step_pin));
            }

            delay.delay_ns(delay_ns.saturating_sub(STEP_PULSE_WIDTH_NS));
        }

        self.finish(MotorState::Idle);
        Ok(())
    }

    /// Reconcile state after a move ends, completes early, or aborts.
    ///
    /// The motor is at rest; targets collapse onto the achieved position
    /// and the profile is discarded (never replayed).
    fn finish(&mut self, state: MotorState) {
        self.velocity = 0.0;
        self.target_position = self.position;
        self.target_velocity = 0.0;
        self.profile = DelayProfile::default();
        self.state = state;
    }

    fn set_direction<P: PinPort>(&mut self, port: &mut P, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pins = self.pins.as_ref().ok_or_else(|| Error::NotConfigured {
            motor: self.id.clone(),
        })?;
        let level = match direction {
            Direction::Forward => Level::High,
            Direction::Reverse => Level::Low,
        };

        port.write_level(pins.dir(), level)
            .map_err(|_| Self::timeout(pins.dir()))?;
        self.current_direction = Some(direction);
        Ok(())
    }

    /// Drop the motor's bindings and claims after a failed rebind.
    ///
    /// The previous claims were already released, so keeping the old
    /// bindings would let this motor drive pins another motor may now
    /// own.
    fn unbind(&mut self, claims: &mut PinClaims) {
        claims.release_all(self.id.as_str());
        self.pins = None;
        self.current_direction = None;
    }

    fn timeout(pin: &str) -> Error {
        Error::HardwareTimeout {
            pin: String::try_from(pin).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::sim::SimPort;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    fn bindings() -> PinBindings {
        PinBindings::new("P8_13", "P8_14", "P8_15", "P8_16", "P8_17").unwrap()
    }

    fn configured_motor(port: &mut SimPort, claims: &mut PinClaims) -> Motor {
        let mut motor = Motor::new("azimuth");
        motor.configure_pins(port, claims, bindings()).unwrap();
        motor.set_acceleration(RadiansPerSecSquared(2.0)).unwrap();
        motor
    }

    #[test]
    fn test_bindings_reject_empty_and_duplicate() {
        assert!(matches!(
            PinBindings::new("", "d", "a", "b", "c").unwrap_err(),
            Error::Config(ConfigError::InvalidPinId { role: "step" })
        ));
        assert!(matches!(
            PinBindings::new("s", "d", "a", "a", "c").unwrap_err(),
            Error::Config(ConfigError::DuplicatePin(_))
        ));
    }

    #[test]
    fn test_move_before_configure_rejected() {
        let mut port = SimPort::new();
        let mut delay = NoopDelay::new();
        let mut motor = Motor::new("azimuth");

        let err = motor
            .move_to(&mut port, &mut delay, Radians(1.0), RadiansPerSec(2.0))
            .unwrap_err();
        assert!(matches!(err, Error::NotConfigured { .. }));
        // Zero pin writes observed.
        assert_eq!(port.total_writes(), 0);
    }

    #[test]
    fn test_set_resolution_before_configure_rejected() {
        let mut port = SimPort::new();
        let mut motor = Motor::new("azimuth");

        let err = motor
            .set_step_resolution(&mut port, StepResolution::Quarter)
            .unwrap_err();
        assert!(matches!(err, Error::NotConfigured { .. }));
        assert_eq!(motor.step_resolution(), StepResolution::Full);
    }

    #[test]
    fn test_configure_pins_sets_outputs_and_mode() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let motor = configured_motor(&mut port, &mut claims);

        assert!(motor.is_configured());
        for pin in ["P8_13", "P8_14", "P8_15", "P8_16", "P8_17"] {
            assert!(port.is_output(pin));
        }
        // Full-step pattern asserted on the mode pins.
        assert_eq!(port.level("P8_15"), Some(Level::Low));
        assert_eq!(port.level("P8_16"), Some(Level::Low));
        assert_eq!(port.level("P8_17"), Some(Level::Low));
    }

    #[test]
    fn test_ownership_conflict_leaves_second_motor_unset() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let _first = configured_motor(&mut port, &mut claims);

        let mut second = Motor::new("elevation");
        let conflicting = PinBindings::new("P8_13", "P9_14", "P9_15", "P9_16", "P9_17").unwrap();
        let err = second
            .configure_pins(&mut port, &mut claims, conflicting)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::PinAlreadyOwned { .. })
        ));
        assert!(!second.is_configured());
        // The first motor's claims are intact.
        assert_eq!(claims.owner("P8_13"), Some("azimuth"));
    }

    #[test]
    fn test_rebind_releases_prior_claims() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut motor = configured_motor(&mut port, &mut claims);

        let rebound = PinBindings::new("P9_13", "P9_14", "P9_15", "P9_16", "P9_17").unwrap();
        motor.configure_pins(&mut port, &mut claims, rebound).unwrap();

        assert_eq!(claims.owner("P8_13"), None);
        assert_eq!(claims.owner("P9_13"), Some("azimuth"));
    }

    #[test]
    fn test_failed_rebind_unbinds_motor() {
        use core::fmt::Write;

        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut delay = NoopDelay::new();
        let mut motor = configured_motor(&mut port, &mut claims);

        // Exhaust the port's pin table so any new pin is rejected.
        for i in 0..27 {
            let mut name = heapless::String::<16>::new();
            write!(name, "fill{}", i).unwrap();
            port.configure_output(name.as_str()).unwrap();
        }

        let rebound = PinBindings::new("P9_13", "P9_14", "P9_15", "P9_16", "P9_17").unwrap();
        let err = motor
            .configure_pins(&mut port, &mut claims, rebound)
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::PortRejected(_))));

        // The motor holds no stale bindings and no claims; its former
        // pins are claimable by another motor.
        assert!(!motor.is_configured());
        assert_eq!(claims.owner("P8_13"), None);
        claims.claim("P8_13", "elevation").unwrap();

        let writes = port.total_writes();
        let err = motor
            .move_by(&mut port, &mut delay, Radians(0.5), RadiansPerSec(1.0))
            .unwrap_err();
        assert!(matches!(err, Error::NotConfigured { .. }));
        assert_eq!(port.total_writes(), writes);
    }

    #[test]
    fn test_resolution_unchanged_when_mode_write_stalls() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut motor = configured_motor(&mut port, &mut claims);

        // One mode-pin write lands before the port stalls.
        port.fail_after_writes(1);
        let err = motor
            .set_step_resolution(&mut port, StepResolution::Sixteenth)
            .unwrap_err();

        assert!(matches!(err, Error::HardwareTimeout { .. }));
        // The stored resolution keeps the last fully applied value, so
        // the step angle stays consistent with it.
        assert_eq!(motor.step_resolution(), StepResolution::Full);
        assert_eq!(motor.step_angle(), step_angle(200, 1));
    }

    #[test]
    fn test_move_by_pulses_and_updates_position() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut delay = NoopDelay::new();
        let mut motor = configured_motor(&mut port, &mut claims);

        motor
            .move_by(&mut port, &mut delay, Radians(1.0), RadiansPerSec(2.0))
            .unwrap();

        let ds = motor.step_angle();
        let expected_steps = (1.0 / ds) as u32;
        assert_eq!(port.high_count("P8_13"), expected_steps);
        assert!((motor.position().value() - expected_steps as f32 * ds).abs() < 1e-4);
        assert_eq!(motor.velocity().value(), 0.0);
        assert_eq!(motor.state(), MotorState::Idle);
        assert!(motor.delay_profile().is_empty());
        // Forward move: direction pin high before the first step.
        assert_eq!(port.level("P8_14"), Some(Level::High));
    }

    #[test]
    fn test_negative_move_sets_reverse_direction() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut delay = NoopDelay::new();
        let mut motor = configured_motor(&mut port, &mut claims);

        motor
            .move_by(&mut port, &mut delay, Radians(-0.5), RadiansPerSec(2.0))
            .unwrap();

        assert_eq!(port.level("P8_14"), Some(Level::Low));
        assert!(motor.position().value() < 0.0);
    }

    #[test]
    fn test_zero_displacement_is_noop() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut delay = NoopDelay::new();
        let mut motor = configured_motor(&mut port, &mut claims);
        let writes_after_configure = port.total_writes();

        motor
            .move_by(&mut port, &mut delay, Radians(0.0), RadiansPerSec(2.0))
            .unwrap();

        assert_eq!(port.total_writes(), writes_after_configure);
        assert_eq!(motor.position().value(), 0.0);
        assert_eq!(motor.velocity().value(), 0.0);
    }

    #[test]
    fn test_plan_error_toggles_no_pins() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut delay = NoopDelay::new();
        let mut motor = configured_motor(&mut port, &mut claims);
        motor.set_acceleration(RadiansPerSecSquared(0.0)).unwrap();
        let writes_after_configure = port.total_writes();

        let err = motor
            .move_by(&mut port, &mut delay, Radians(1.0), RadiansPerSec(2.0))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidArgument(ArgumentError::ZeroAcceleration { .. })
        ));
        assert_eq!(port.total_writes(), writes_after_configure);
        assert_eq!(motor.state(), MotorState::Idle);
    }

    #[test]
    fn test_cancelled_before_first_step() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut delay = NoopDelay::new();
        let mut motor = configured_motor(&mut port, &mut claims);

        let token = CancelToken::new();
        token.cancel();
        motor
            .move_by_with_cancel(
                &mut port,
                &mut delay,
                Radians(1.0),
                RadiansPerSec(2.0),
                &token,
            )
            .unwrap();

        assert_eq!(port.high_count("P8_13"), 0);
        assert_eq!(motor.position().value(), 0.0);
        assert_eq!(motor.state(), MotorState::Idle);
        assert!(motor.delay_profile().is_empty());
    }

    #[test]
    fn test_hardware_timeout_keeps_completed_steps() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut delay = NoopDelay::new();
        let mut motor = configured_motor(&mut port, &mut claims);

        // Direction write plus five full pulses, then the port stalls on
        // the rising edge of the sixth.
        port.fail_after_writes(1 + 10);
        let err = motor
            .move_by(&mut port, &mut delay, Radians(1.0), RadiansPerSec(2.0))
            .unwrap_err();

        assert!(matches!(err, Error::HardwareTimeout { .. }));
        let ds = motor.step_angle();
        assert!((motor.position().value() - 5.0 * ds).abs() < 1e-5);
        assert_eq!(motor.state(), MotorState::Idle);
    }

    #[test]
    fn test_set_acceleration_rejects_non_finite() {
        let mut motor = Motor::new("azimuth");
        assert!(motor.set_acceleration(RadiansPerSecSquared(f32::NAN)).is_err());
        assert!(motor.set_acceleration(RadiansPerSecSquared(3.5)).is_ok());
        assert_eq!(motor.acceleration().value(), 3.5);
    }

    #[test]
    fn test_resolution_change_scales_step_angle() {
        let mut port = SimPort::new();
        let mut claims = PinClaims::new();
        let mut motor = configured_motor(&mut port, &mut claims);

        let full = motor.step_angle();
        motor
            .set_step_resolution(&mut port, StepResolution::Sixteenth)
            .unwrap();
        assert!((full / motor.step_angle() - 16.0).abs() < 1e-3);
        assert_eq!(port.level("P8_17"), Some(Level::High));
    }
}
