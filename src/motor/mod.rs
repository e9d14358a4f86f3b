//! Motor module for stepper-pulse.
//!
//! Provides the motor driver: kinematic state, pin bindings, and the
//! blocking step execution loop.

mod driver;
mod state;

pub use driver::{Motor, PinBindings};
pub use state::MotorState;
