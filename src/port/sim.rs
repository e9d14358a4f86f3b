//! Simulated pin port.
//!
//! Records pin configurations and level writes so the motion stack can be
//! exercised without hardware. Can be scripted to stop responding after a
//! number of writes to test the timeout path.

use heapless::{FnvIndexMap, String};

use super::{Level, PinPort, PinPortError};

/// How a simulated pin has been configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Configured as digital input.
    Input,
    /// Configured as digital output.
    Output,
}

/// Recorded state of one simulated pin.
#[derive(Debug, Clone, Copy)]
struct PinState {
    mode: PinMode,
    level: Option<Level>,
    writes: u32,
    highs: u32,
}

/// In-memory pin port for tests and demos.
#[derive(Debug, Default)]
pub struct SimPort {
    pins: FnvIndexMap<String<16>, PinState, 32>,
    total_writes: u32,
    fail_after: Option<u32>,
}

impl SimPort {
    /// Create a simulated port with no pins configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop responding (report `Unresponsive`) after `writes` more level
    /// writes have been accepted.
    pub fn fail_after_writes(&mut self, writes: u32) {
        self.fail_after = Some(self.total_writes + writes);
    }

    /// Current level of a pin, if it has ever been written.
    pub fn level(&self, pin: &str) -> Option<Level> {
        self.state(pin).and_then(|s| s.level)
    }

    /// Whether a pin has been configured as an output.
    pub fn is_output(&self, pin: &str) -> bool {
        matches!(self.state(pin), Some(s) if s.mode == PinMode::Output)
    }

    /// Number of level writes issued to a pin.
    pub fn write_count(&self, pin: &str) -> u32 {
        self.state(pin).map(|s| s.writes).unwrap_or(0)
    }

    /// Number of high-level writes issued to a pin.
    ///
    /// On the step pin this is the pulse count.
    pub fn high_count(&self, pin: &str) -> u32 {
        self.state(pin).map(|s| s.highs).unwrap_or(0)
    }

    /// Total level writes across all pins.
    pub fn total_writes(&self) -> u32 {
        self.total_writes
    }

    fn state(&self, pin: &str) -> Option<&PinState> {
        self.pins
            .iter()
            .find(|(k, _)| k.as_str() == pin)
            .map(|(_, v)| v)
    }

    fn configure(&mut self, pin: &str, mode: PinMode) -> core::result::Result<(), PinPortError> {
        let key = String::try_from(pin).map_err(|_| PinPortError::UnknownPin)?;
        let state = PinState {
            mode,
            level: None,
            writes: 0,
            highs: 0,
        };
        self.pins.insert(key, state).map_err(|_| PinPortError::UnknownPin)?;
        Ok(())
    }
}

impl PinPort for SimPort {
    fn configure_output(&mut self, pin: &str) -> core::result::Result<(), PinPortError> {
        self.configure(pin, PinMode::Output)
    }

    fn configure_input(&mut self, pin: &str) -> core::result::Result<(), PinPortError> {
        self.configure(pin, PinMode::Input)
    }

    fn write_level(&mut self, pin: &str, level: Level) -> core::result::Result<(), PinPortError> {
        if let Some(limit) = self.fail_after {
            if self.total_writes >= limit {
                return Err(PinPortError::Unresponsive);
            }
        }

        let state = self
            .pins
            .iter_mut()
            .find(|(k, _)| k.as_str() == pin)
            .map(|(_, v)| v)
            .ok_or(PinPortError::UnknownPin)?;

        if state.mode != PinMode::Output {
            return Err(PinPortError::UnknownPin);
        }

        state.level = Some(level);
        state.writes += 1;
        if level == Level::High {
            state.highs += 1;
        }
        self.total_writes += 1;
        Ok(())
    }
}
