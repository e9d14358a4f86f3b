//! Basic motor usage with a simulated pin port.
//!
//! Run with: cargo run --example basic_move

use embedded_hal_mock::eh1::delay::NoopDelay;

use stepper_pulse::port::sim::SimPort;
use stepper_pulse::{
    Motor, PinBindings, PinClaims, Radians, RadiansPerSec, RadiansPerSecSquared, StepResolution,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut port = SimPort::new();
    let mut claims = PinClaims::new();
    let mut delay = NoopDelay::new();

    let mut motor = Motor::new("azimuth");
    motor.configure_pins(
        &mut port,
        &mut claims,
        PinBindings::new("P8_13", "P8_14", "P8_15", "P8_16", "P8_17")?,
    )?;
    motor.set_acceleration(RadiansPerSecSquared(2.0))?;
    motor.set_step_resolution(&mut port, StepResolution::Quarter)?;

    println!("Moving to 20 rad at up to 4 rad/s...");
    motor.move_to(&mut port, &mut delay, Radians(20.0), RadiansPerSec(4.0))?;

    println!("Position: {:.4} rad", motor.position().value());
    println!("Pulses issued: {}", port.high_count("P8_13"));
    println!("State: {}", motor.state().name());

    Ok(())
}
