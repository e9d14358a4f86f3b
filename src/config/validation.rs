//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Steps per revolution is positive
/// - Acceleration is finite and non-negative
/// - Pin ids are well-formed and unique within each motor
/// - No pin id is shared between two motors (ownership is exclusive)
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, motor) in config.motors.iter() {
        validate_motor(motor)?;
    }
    validate_pin_exclusivity(config)?;
    Ok(())
}

fn validate_motor(config: &super::MotorConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)));
    }

    let accel = config.acceleration.value();
    if !accel.is_finite() || accel < 0.0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration(accel)));
    }

    // Well-formed and role-unique pin ids. Resolution divisors are
    // rejected at deserialization.
    config.pins.bindings()?;

    Ok(())
}

fn validate_pin_exclusivity(config: &SystemConfig) -> Result<()> {
    let motors: heapless::Vec<_, 8> = config.motors.iter().collect();
    for (i, (id_a, motor_a)) in motors.iter().enumerate() {
        for (_, motor_b) in motors.iter().skip(i + 1) {
            for pin in motor_a.pins.all() {
                if motor_b.pins.all().contains(&pin) {
                    return Err(Error::Config(ConfigError::PinAlreadyOwned {
                        pin: heapless::String::try_from(pin).unwrap_or_default(),
                        owner: (*id_a).clone(),
                    }));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::RadiansPerSecSquared;
    use crate::config::{MotorConfig, PinConfig};
    use heapless::String;

    fn pins(step: &str, dir: &str, m1: &str, m2: &str, m3: &str) -> PinConfig {
        PinConfig {
            step: String::try_from(step).unwrap(),
            dir: String::try_from(dir).unwrap(),
            m1: String::try_from(m1).unwrap(),
            m2: String::try_from(m2).unwrap(),
            m3: String::try_from(m3).unwrap(),
        }
    }

    fn motor(p: PinConfig) -> MotorConfig {
        MotorConfig {
            steps_per_revolution: 200,
            resolution: crate::microstep::StepResolution::Full,
            acceleration: RadiansPerSecSquared(2.0),
            min_step_delay_ns: 2_000,
            pins: p,
        }
    }

    #[test]
    fn test_invalid_acceleration() {
        let config = motor(pins("a", "b", "c", "d", "e"));
        let mut config = config;
        config.acceleration = RadiansPerSecSquared(-1.0);

        assert!(matches!(
            validate_motor(&config),
            Err(Error::Config(ConfigError::InvalidAcceleration(_)))
        ));
    }

    #[test]
    fn test_zero_steps_per_revolution() {
        let mut config = motor(pins("a", "b", "c", "d", "e"));
        config.steps_per_revolution = 0;

        assert!(matches!(
            validate_motor(&config),
            Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
        ));
    }

    #[test]
    fn test_shared_pin_between_motors() {
        let mut system = SystemConfig::default();
        let _ = system.motors.insert(
            String::try_from("azimuth").unwrap(),
            motor(pins("P8_13", "P8_14", "P8_15", "P8_16", "P8_17")),
        );
        let _ = system.motors.insert(
            String::try_from("elevation").unwrap(),
            // Shares P8_13 with azimuth.
            motor(pins("P8_13", "P9_14", "P9_15", "P9_16", "P9_17")),
        );

        assert!(matches!(
            validate_config(&system),
            Err(Error::Config(ConfigError::PinAlreadyOwned { .. }))
        ));
    }

    #[test]
    fn test_disjoint_motors_pass() {
        let mut system = SystemConfig::default();
        let _ = system.motors.insert(
            String::try_from("azimuth").unwrap(),
            motor(pins("P8_13", "P8_14", "P8_15", "P8_16", "P8_17")),
        );
        let _ = system.motors.insert(
            String::try_from("elevation").unwrap(),
            motor(pins("P9_13", "P9_14", "P9_15", "P9_16", "P9_17")),
        );

        assert!(validate_config(&system).is_ok());
    }
}
