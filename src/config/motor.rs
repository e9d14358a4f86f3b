//! Motor configuration from TOML.

use heapless::String;
use serde::Deserialize;

use crate::error::Result;
use crate::microstep::StepResolution;
use crate::motion::DEFAULT_MIN_STEP_DELAY_NS;
use crate::motor::PinBindings;

use super::units::RadiansPerSecSquared;

/// Pin ids a configured motor is wired to.
#[derive(Debug, Clone, Deserialize)]
pub struct PinConfig {
    /// Step pin id.
    pub step: String<16>,
    /// Direction pin id.
    pub dir: String<16>,
    /// Mode-select pin M1.
    pub m1: String<16>,
    /// Mode-select pin M2.
    pub m2: String<16>,
    /// Mode-select pin M3.
    pub m3: String<16>,
}

impl PinConfig {
    /// Build validated pin bindings from this configuration.
    pub fn bindings(&self) -> Result<PinBindings> {
        PinBindings::new(
            self.step.as_str(),
            self.dir.as_str(),
            self.m1.as_str(),
            self.m2.as_str(),
            self.m3.as_str(),
        )
    }

    /// All five pin ids.
    pub fn all(&self) -> [&str; 5] {
        [
            self.step.as_str(),
            self.dir.as_str(),
            self.m1.as_str(),
            self.m2.as_str(),
            self.m3.as_str(),
        ]
    }
}

/// Complete motor configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Base full steps per revolution (typically 200 for 1.8° motors).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,

    /// Microstep divisor (1, 2, 4, 8, 16).
    #[serde(default)]
    pub resolution: StepResolution,

    /// Acceleration bound in radians per second squared.
    #[serde(rename = "acceleration_rad_per_sec2")]
    pub acceleration: RadiansPerSecSquared,

    /// Minimum per-step delay in nanoseconds (driver pulse-rate ceiling).
    #[serde(default = "default_min_step_delay_ns")]
    pub min_step_delay_ns: u32,

    /// Driver pin wiring.
    pub pins: PinConfig,
}

fn default_steps_per_revolution() -> u16 {
    200
}

fn default_min_step_delay_ns() -> u32 {
    DEFAULT_MIN_STEP_DELAY_NS
}
