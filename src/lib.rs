//! # stepper-pulse
//!
//! Open-loop stepper motor control: trapezoidal delay profiles and step
//! pulse generation over an injected pin port.
//!
//! ## Features
//!
//! - **Injected pin port**: all GPIO goes through the [`PinPort`] trait,
//!   so the full stack runs against a simulated port without hardware
//! - **Trapezoidal profiles**: bounded acceleration, cruise, and
//!   deceleration, with a triangular fallback for short moves
//! - **Microstep control**: driver mode pins follow the step resolution,
//!   always kept consistent
//! - **Exclusive pin ownership**: a pin belongs to one motor, enforced at
//!   configuration time
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_pulse::{
//!     Motor, PinBindings, PinClaims, Radians, RadiansPerSec, RadiansPerSecSquared,
//! };
//!
//! let mut claims = PinClaims::new();
//! let mut motor = Motor::new("azimuth");
//!
//! motor.configure_pins(
//!     &mut port,
//!     &mut claims,
//!     PinBindings::new("P8_13", "P8_14", "P8_15", "P8_16", "P8_17")?,
//! )?;
//! motor.set_acceleration(RadiansPerSecSquared(2.0))?;
//!
//! // Blocking move: ramp up, cruise at 4 rad/s, ramp down.
//! motor.move_to(&mut port, &mut delay, Radians(20.0), RadiansPerSec(4.0))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod cancel;
pub mod config;
pub mod error;
pub mod microstep;
pub mod motion;
pub mod motor;
pub mod port;

// Re-exports for ergonomic API
pub use cancel::CancelToken;
pub use config::{validate_config, MotorConfig, SystemConfig};
pub use error::{Error, Result};
pub use microstep::{MicrostepController, StepResolution};
pub use motion::{DelayProfile, Direction, ProfilePlan};
pub use motor::{Motor, MotorState, PinBindings};
pub use port::{Level, PinClaims, PinPort};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{Radians, RadiansPerSec, RadiansPerSecSquared};
