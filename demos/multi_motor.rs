//! Two motors from a TOML configuration, driven through one port.
//!
//! Run with: cargo run --example multi_motor

use embedded_hal_mock::eh1::delay::NoopDelay;

use stepper_pulse::port::sim::SimPort;
use stepper_pulse::{Motor, PinClaims, Radians, RadiansPerSec};

const CONFIG: &str = r#"
[motors.azimuth]
steps_per_revolution = 200
resolution = 4
acceleration_rad_per_sec2 = 2.0

[motors.azimuth.pins]
step = "P8_13"
dir = "P8_14"
m1 = "P8_15"
m2 = "P8_16"
m3 = "P8_17"

[motors.elevation]
steps_per_revolution = 400
resolution = 8
acceleration_rad_per_sec2 = 1.5

[motors.elevation.pins]
step = "P9_13"
dir = "P9_14"
m1 = "P9_15"
m2 = "P9_16"
m3 = "P9_17"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = stepper_pulse::config::parse_config(CONFIG)?;

    let mut port = SimPort::new();
    let mut claims = PinClaims::new();
    let mut delay = NoopDelay::new();

    for id in ["azimuth", "elevation"] {
        let motor_config = config
            .motor(id)
            .ok_or_else(|| format!("motor '{}' missing", id))?;
        let mut motor = Motor::from_config(id, motor_config)?;
        motor.configure_pins(&mut port, &mut claims, motor_config.pins.bindings()?)?;

        motor.move_by(&mut port, &mut delay, Radians(1.57), RadiansPerSec(3.0))?;
        println!(
            "{}: {:.4} rad in {} pulses",
            motor.id(),
            motor.position().value(),
            port.high_count(motor_config.pins.step.as_str()),
        );
    }

    Ok(())
}
