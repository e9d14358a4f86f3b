//! Pin port boundary.
//!
//! The port is the hardware seam: an injected capability that configures
//! pins and writes logic levels. Pin identifiers are opaque board-defined
//! strings (e.g. `"P8_13"`); this crate never interprets their structure.
//! Substituting a simulated port allows the full motion stack to run
//! without hardware.

mod claims;
pub mod sim;

pub use claims::PinClaims;

/// Digital logic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic low.
    Low,
    /// Logic high.
    High,
}

/// Errors reported by a pin port implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinPortError {
    /// The port does not know the given pin, or it is not configured
    /// for the requested operation.
    UnknownPin,
    /// The port stalled beyond its response bound.
    Unresponsive,
}

/// Process-wide digital pin service.
///
/// Implementations wrap the platform GPIO layer. All pin configuration
/// and writes for a given physical pin are serialized by the
/// exclusive-ownership rule enforced through [`PinClaims`]; the trait
/// itself carries no locking.
pub trait PinPort {
    /// Configure a pin as a digital output.
    fn configure_output(&mut self, pin: &str) -> core::result::Result<(), PinPortError>;

    /// Configure a pin as a digital input.
    fn configure_input(&mut self, pin: &str) -> core::result::Result<(), PinPortError>;

    /// Drive an output pin to the given level.
    fn write_level(&mut self, pin: &str, level: Level) -> core::result::Result<(), PinPortError>;
}

impl<P: PinPort + ?Sized> PinPort for &mut P {
    fn configure_output(&mut self, pin: &str) -> core::result::Result<(), PinPortError> {
        (**self).configure_output(pin)
    }

    fn configure_input(&mut self, pin: &str) -> core::result::Result<(), PinPortError> {
        (**self).configure_input(pin)
    }

    fn write_level(&mut self, pin: &str, level: Level) -> core::result::Result<(), PinPortError> {
        (**self).write_level(pin, level)
    }
}
