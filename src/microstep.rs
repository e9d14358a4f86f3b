//! Microstep resolution control.
//!
//! Maps a step resolution to the bit pattern on the driver chip's three
//! mode-select pins (M1/M2/M3). The table is fixed by the driver chip and
//! is not configurable.

use serde::Deserialize;

use crate::error::{ArgumentError, Result};
use crate::port::{Level, PinPort};

/// Step resolution of the motor driver.
///
/// Each variant divides the base full-step angle by its divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepResolution {
    /// Full step (divisor 1).
    #[default]
    Full,
    /// Half step (divisor 2).
    Half,
    /// Quarter step (divisor 4).
    Quarter,
    /// Eighth step (divisor 8).
    Eighth,
    /// Sixteenth step (divisor 16).
    Sixteenth,
}

impl StepResolution {
    /// Microstep divisor for this resolution.
    #[inline]
    pub const fn divisor(self) -> u16 {
        match self {
            StepResolution::Full => 1,
            StepResolution::Half => 2,
            StepResolution::Quarter => 4,
            StepResolution::Eighth => 8,
            StepResolution::Sixteenth => 16,
        }
    }

    /// Look up a resolution from its microstep divisor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolutionDivisor` for divisors the driver chip
    /// does not support.
    pub fn from_divisor(divisor: u16) -> core::result::Result<Self, ArgumentError> {
        match divisor {
            1 => Ok(StepResolution::Full),
            2 => Ok(StepResolution::Half),
            4 => Ok(StepResolution::Quarter),
            8 => Ok(StepResolution::Eighth),
            16 => Ok(StepResolution::Sixteenth),
            other => Err(ArgumentError::InvalidResolutionDivisor(other)),
        }
    }

    /// Mode-select pin levels (M1, M2, M3) for this resolution.
    ///
    /// Driver-chip-defined truth table:
    ///
    /// | resolution | M1 | M2 | M3 |
    /// |------------|----|----|----|
    /// | Full       | L  | L  | L  |
    /// | Half       | H  | L  | L  |
    /// | Quarter    | L  | H  | L  |
    /// | Eighth     | H  | H  | L  |
    /// | Sixteenth  | H  | H  | H  |
    #[inline]
    pub const fn mode_levels(self) -> [Level; 3] {
        use Level::{High, Low};
        match self {
            StepResolution::Full => [Low, Low, Low],
            StepResolution::Half => [High, Low, Low],
            StepResolution::Quarter => [Low, High, Low],
            StepResolution::Eighth => [High, High, Low],
            StepResolution::Sixteenth => [High, High, High],
        }
    }
}

impl<'de> Deserialize<'de> for StepResolution {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let divisor = u16::deserialize(deserializer)?;
        StepResolution::from_divisor(divisor).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

/// Applies step resolutions to a driver's mode-select pins.
pub struct MicrostepController;

impl MicrostepController {
    /// Assert the mode-select pattern for `resolution` on the three mode
    /// pins, in M1, M2, M3 order.
    ///
    /// Idempotent: re-applying the same resolution writes the same levels
    /// and is safe to repeat. Does not move the motor.
    ///
    /// # Errors
    ///
    /// Returns `HardwareTimeout` if the port stops responding mid-write;
    /// pins written before the stall already carry the new pattern.
    pub fn apply<P: PinPort>(
        port: &mut P,
        mode_pins: [&str; 3],
        resolution: StepResolution,
    ) -> Result<()> {
        let levels = resolution.mode_levels();
        for (pin, level) in mode_pins.iter().zip(levels) {
            port.write_level(pin, level)
                .map_err(|_| crate::error::Error::HardwareTimeout {
                    pin: heapless::String::try_from(*pin).unwrap_or_default(),
                })?;
        }
        Ok(())
    }
}
