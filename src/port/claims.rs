//! Pin ownership registry.
//!
//! A physical pin must never be driven from two logical owners. Ownership
//! is decided once, at configuration time; the registry records which
//! motor owns which pin and rejects conflicting claims before any
//! hardware side effect occurs.

use heapless::{FnvIndexMap, String};

use crate::error::ConfigError;

/// Maximum number of pins the registry can track.
pub const MAX_CLAIMED_PINS: usize = 32;

/// Process-wide pin ownership registry.
///
/// One instance is shared by all motors driven through the same port.
#[derive(Debug, Default)]
pub struct PinClaims {
    owners: FnvIndexMap<String<16>, String<32>, MAX_CLAIMED_PINS>,
}

impl PinClaims {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            owners: FnvIndexMap::new(),
        }
    }

    /// Get the id of the motor owning a pin, if any.
    pub fn owner(&self, pin: &str) -> Option<&str> {
        self.owners
            .iter()
            .find(|(k, _)| k.as_str() == pin)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a pin may be claimed by the given motor.
    ///
    /// A pin already owned by the same motor is re-claimable (rebinding).
    pub fn check(&self, pin: &str, motor: &str) -> core::result::Result<(), ConfigError> {
        match self.owner(pin) {
            Some(owner) if owner != motor => Err(ConfigError::PinAlreadyOwned {
                pin: String::try_from(pin).unwrap_or_default(),
                owner: String::try_from(owner).unwrap_or_default(),
            }),
            _ => Ok(()),
        }
    }

    /// Claim a pin for a motor.
    ///
    /// # Errors
    ///
    /// Returns `PinAlreadyOwned` if another motor owns the pin, or
    /// `RegistryFull` if the registry has no room left.
    pub fn claim(&mut self, pin: &str, motor: &str) -> core::result::Result<(), ConfigError> {
        self.check(pin, motor)?;

        let pin_key = String::try_from(pin).map_err(|_| ConfigError::InvalidPinId {
            role: "unknown",
        })?;
        let owner = String::try_from(motor).unwrap_or_default();

        self.owners
            .insert(pin_key, owner)
            .map_err(|_| ConfigError::RegistryFull)?;
        Ok(())
    }

    /// Release every pin owned by a motor.
    ///
    /// Called when a motor rebinds its pins, so the old bindings do not
    /// linger as phantom owners.
    pub fn release_all(&mut self, motor: &str) {
        // Cannot remove while iterating; collect keys first.
        let mut stale: heapless::Vec<String<16>, MAX_CLAIMED_PINS> = heapless::Vec::new();
        for (pin, owner) in self.owners.iter() {
            if owner.as_str() == motor {
                let _ = stale.push(pin.clone());
            }
        }
        for pin in &stale {
            self.owners.remove(pin);
        }
    }

    /// Number of claimed pins.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no pin is claimed.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_owner() {
        let mut claims = PinClaims::new();
        claims.claim("P8_13", "azimuth").unwrap();

        assert_eq!(claims.owner("P8_13"), Some("azimuth"));
        assert_eq!(claims.owner("P8_14"), None);
    }

    #[test]
    fn test_conflicting_claim_rejected() {
        let mut claims = PinClaims::new();
        claims.claim("P8_13", "azimuth").unwrap();

        let err = claims.claim("P8_13", "elevation").unwrap_err();
        assert!(matches!(err, ConfigError::PinAlreadyOwned { .. }));
    }

    #[test]
    fn test_reclaim_by_same_motor() {
        let mut claims = PinClaims::new();
        claims.claim("P8_13", "azimuth").unwrap();
        claims.claim("P8_13", "azimuth").unwrap();

        assert_eq!(claims.len(), 1);
    }

    #[test]
    fn test_release_all() {
        let mut claims = PinClaims::new();
        claims.claim("P8_13", "azimuth").unwrap();
        claims.claim("P8_14", "azimuth").unwrap();
        claims.claim("P9_11", "elevation").unwrap();

        claims.release_all("azimuth");

        assert_eq!(claims.owner("P8_13"), None);
        assert_eq!(claims.owner("P9_11"), Some("elevation"));
        assert_eq!(claims.len(), 1);
    }
}
