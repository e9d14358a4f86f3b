//! Motor execution states.

/// Where a motor is in its request lifecycle.
///
/// A motion request moves Idle → Planning → Executing → Idle; execution
/// returns to Idle early on cancellation or a hardware fault. Pins may
/// only be (re)bound from Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// Ready for commands; no profile held.
    #[default]
    Idle,
    /// A delay profile is being computed for a motion request.
    Planning,
    /// Stepping through a delay profile.
    Executing,
}

impl MotorState {
    /// State name for display and logs.
    pub fn name(self) -> &'static str {
        match self {
            MotorState::Idle => "Idle",
            MotorState::Planning => "Planning",
            MotorState::Executing => "Executing",
        }
    }
}
