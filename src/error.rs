//! Error types for stepper-pulse.
//!
//! Provides unified error handling across pin configuration, motion
//! planning, and step execution.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-pulse operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Operation requires pins that have not been bound yet.
    NotConfigured {
        /// Id of the motor the operation was issued against.
        motor: heapless::String<32>,
    },
    /// Pin configuration or system configuration error.
    Config(ConfigError),
    /// Unrealizable motion profile parameters.
    InvalidArgument(ArgumentError),
    /// The pin port stopped responding during execution.
    ///
    /// The motor's position remains accurate up to the last completed step.
    HardwareTimeout {
        /// Pin being driven when the port stalled.
        pin: heapless::String<16>,
    },
}

/// Configuration-related errors.
///
/// Detected before any hardware side effect occurs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Pin identifier is empty or exceeds the supported length.
    InvalidPinId {
        /// Which binding the pin was supplied for (step, dir, m1, m2, m3).
        role: &'static str,
    },
    /// The same pin identifier appears twice in one binding set.
    DuplicatePin(heapless::String<16>),
    /// Pin is already owned by another live motor.
    PinAlreadyOwned {
        /// The contested pin.
        pin: heapless::String<16>,
        /// Id of the motor that owns it.
        owner: heapless::String<32>,
    },
    /// The pin port rejected a pin during output configuration.
    PortRejected(heapless::String<16>),
    /// The pin ownership registry is full.
    RegistryFull,
    /// Failed to parse TOML configuration.
    ParseError(heapless::String<128>),
    /// Motor name not found in configuration.
    MotorNotFound(heapless::String<32>),
    /// Steps per revolution must be > 0.
    InvalidStepsPerRevolution(u16),
    /// Acceleration in configuration must be finite and non-negative.
    InvalidAcceleration(f32),
    /// File I/O error (std only).
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Unrealizable motion parameters, rejected at plan time.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentError {
    /// A kinematic input is NaN or infinite.
    NonFinite {
        /// Name of the offending parameter.
        name: &'static str,
    },
    /// Zero acceleration cannot realize the required velocity change.
    ZeroAcceleration {
        /// Velocity the motor is currently at (rad/s).
        current: f32,
        /// Velocity the request asked for (rad/s).
        target: f32,
    },
    /// Cruise velocity must be > 0 for a non-zero displacement.
    ZeroVelocity,
    /// Unsupported microstep divisor (valid: 1, 2, 4, 8, 16).
    InvalidResolutionDivisor(u16),
    /// The move requires more steps than a profile can hold.
    ProfileTooLong {
        /// Steps the move would need.
        steps: usize,
        /// Maximum steps a profile can hold.
        capacity: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotConfigured { motor } => {
                write!(f, "Motor '{}' has no pins configured", motor)
            }
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            Error::HardwareTimeout { pin } => {
                write!(f, "Pin port unresponsive while driving '{}'", pin)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPinId { role } => {
                write!(f, "Invalid pin id for '{}' (empty or too long)", role)
            }
            ConfigError::DuplicatePin(pin) => {
                write!(f, "Pin '{}' bound to more than one role", pin)
            }
            ConfigError::PinAlreadyOwned { pin, owner } => {
                write!(f, "Pin '{}' is already owned by motor '{}'", pin, owner)
            }
            ConfigError::PortRejected(pin) => {
                write!(f, "Pin port rejected pin '{}'", pin)
            }
            ConfigError::RegistryFull => write!(f, "Pin ownership registry is full"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be finite and >= 0", v)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::NonFinite { name } => {
                write!(f, "Parameter '{}' is not finite", name)
            }
            ArgumentError::ZeroAcceleration { current, target } => {
                write!(
                    f,
                    "Cannot change velocity from {} to {} rad/s at zero acceleration",
                    current, target
                )
            }
            ArgumentError::ZeroVelocity => {
                write!(f, "Cruise velocity must be > 0 for a non-zero displacement")
            }
            ArgumentError::InvalidResolutionDivisor(v) => {
                write!(f, "Invalid microstep divisor: {}. Valid values: 1, 2, 4, 8, 16", v)
            }
            ArgumentError::ProfileTooLong { steps, capacity } => {
                write!(f, "Move needs {} steps, profile holds at most {}", steps, capacity)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ArgumentError> for Error {
    fn from(e: ArgumentError) -> Self {
        Error::InvalidArgument(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for ArgumentError {}
