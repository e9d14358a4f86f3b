//! Motion module for stepper-pulse.
//!
//! Pure delay-profile computation; execution lives in the motor driver.

mod profile;

pub use profile::{
    DelayProfile, Direction, ProfilePlan, DEFAULT_MIN_STEP_DELAY_NS, MAX_PROFILE_STEPS,
};
