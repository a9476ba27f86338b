// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control intents sent to pool controllers.
//!
//! A control is a requested value for exactly one of the four independently
//! reconciled control families. Each controller generation has its own
//! control enum because the generations encode heater state differently
//! (boolean heating flag on current firmware, numeric heater mode on the
//! legacy firmware).

/// The four independently debounced and reconciled control families.
///
/// Each family has its own pending-call slot in the coalescing arena and its
/// own single-field rollback on failure. Families never interfere with each
/// other: a slow pump call and a fast thermostat call may complete in either
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlFamily {
    /// Pump program selection.
    Pump,
    /// Heater state (boolean or numeric mode, generation-dependent).
    Heater,
    /// Salt-water chlorine generator duty percentage.
    SwgPercent,
    /// Heater thermostat target temperature.
    ThermostatTarget,
}

impl std::fmt::Display for ControlFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pump => "pump",
            Self::Heater => "heater",
            Self::SwgPercent => "swg",
            Self::ThermostatTarget => "thermostat",
        };
        write!(f, "{name}")
    }
}

/// A requested value for one control family.
///
/// Implemented by the per-generation control enums; the family drives
/// debounce keying and failure rollback in the reconciliation core.
pub trait Control: Clone + Send + Sync + 'static {
    /// Returns the control family this request belongs to.
    fn family(&self) -> ControlFamily;
}

/// Control requests understood by current-generation controllers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeadowControl {
    /// Select a pump program (0 = off, 1..N = named program).
    PumpProgram(u8),
    /// Turn the heater on or off.
    Heating(bool),
    /// Set the salt-water chlorine generator duty percentage.
    ///
    /// The domain-legal range is 0-100; `-1` means "no change requested".
    /// Values are passed to the device unvalidated, it is the source of
    /// truth for what it accepts.
    SwgPercent(i16),
    /// Set the thermostat target temperature in the controller's native
    /// unit (typically Celsius).
    ThermostatTarget(f64),
}

impl Control for MeadowControl {
    fn family(&self) -> ControlFamily {
        match self {
            Self::PumpProgram(_) => ControlFamily::Pump,
            Self::Heating(_) => ControlFamily::Heater,
            Self::SwgPercent(_) => ControlFamily::SwgPercent,
            Self::ThermostatTarget(_) => ControlFamily::ThermostatTarget,
        }
    }
}

/// Control requests understood by legacy Poolduino controllers.
///
/// The legacy firmware has no thermostat target; its heater is a numeric
/// mode (0 = off, 1..N = named mode) rather than a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolduinoControl {
    /// Select a pump program (0 = off, 1..N = named program).
    PumpProgram(u8),
    /// Select a heater mode (0 = off, 1..N = named mode).
    HeaterMode(u8),
    /// Set the salt-water chlorine generator duty percentage.
    SwgPercent(i16),
}

impl Control for PoolduinoControl {
    fn family(&self) -> ControlFamily {
        match self {
            Self::PumpProgram(_) => ControlFamily::Pump,
            Self::HeaterMode(_) => ControlFamily::Heater,
            Self::SwgPercent(_) => ControlFamily::SwgPercent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meadow_control_families() {
        assert_eq!(MeadowControl::PumpProgram(2).family(), ControlFamily::Pump);
        assert_eq!(MeadowControl::Heating(true).family(), ControlFamily::Heater);
        assert_eq!(
            MeadowControl::SwgPercent(50).family(),
            ControlFamily::SwgPercent
        );
        assert_eq!(
            MeadowControl::ThermostatTarget(29.5).family(),
            ControlFamily::ThermostatTarget
        );
    }

    #[test]
    fn poolduino_control_families() {
        assert_eq!(
            PoolduinoControl::PumpProgram(1).family(),
            ControlFamily::Pump
        );
        assert_eq!(
            PoolduinoControl::HeaterMode(2).family(),
            ControlFamily::Heater
        );
        assert_eq!(
            PoolduinoControl::SwgPercent(0).family(),
            ControlFamily::SwgPercent
        );
    }

    #[test]
    fn family_display_names() {
        assert_eq!(ControlFamily::Pump.to_string(), "pump");
        assert_eq!(ControlFamily::ThermostatTarget.to_string(), "thermostat");
    }
}
