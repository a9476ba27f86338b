// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status snapshot for current-generation Meadow controllers.

use serde::{Deserialize, Serialize};

use crate::command::{ControlFamily, MeadowControl};

use super::StatusModel;

/// Status snapshot reported by a current-generation Meadow controller.
///
/// Wire field names match the controller's JSON verbatim. The `address` and
/// `port` identity fields never come from the wire; the device client stamps
/// them after decoding, and they are immutable for the lifetime of the
/// controller.
///
/// Decoding is lenient: a field the firmware omits falls back to its zero
/// value rather than failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeadowStatus {
    /// Controller host address (identity, not part of the wire payload).
    #[serde(skip_deserializing)]
    pub address: String,

    /// Controller HTTP port (identity, not part of the wire payload).
    #[serde(skip_deserializing)]
    pub port: u16,

    /// Whether the heater is currently on.
    #[serde(rename = "Heating")]
    pub heating: bool,

    /// Active pump program (0 = off, 1..N = named program).
    #[serde(rename = "Pump")]
    pub pump: u8,

    /// Salt-water chlorine generator duty percentage (0-100, -1 = no
    /// change requested).
    #[serde(rename = "SwgPercent")]
    pub swg_percent: i16,

    /// Thermostat target temperature in the controller's native unit.
    #[serde(rename = "ThermostatTarget")]
    pub thermostat_target: f64,

    /// Controller-reported timestamp of the snapshot.
    #[serde(rename = "Timestamp")]
    pub timestamp: u64,

    /// Water temperature.
    #[serde(rename = "Temp")]
    pub temp: f64,

    /// Filter pressure.
    #[serde(rename = "Pressure")]
    pub pressure: f64,

    /// Seconds the chlorine generator is on within the current cycle.
    #[serde(rename = "SwgCycleTimeOn")]
    pub swg_cycle_time_on: u32,

    /// Seconds elapsed in the current chlorine generator cycle.
    #[serde(rename = "SwgCycleTime")]
    pub swg_cycle_time: u32,

    /// Total length of a chlorine generator cycle in seconds.
    #[serde(rename = "SwgCycleDuration")]
    pub swg_cycle_duration: u32,

    /// External account-correlation identifier.
    #[serde(rename = "PoolMathUserId")]
    pub pool_math_user_id: String,
}

impl MeadowStatus {
    /// Creates the all-zero initial snapshot held before the first device
    /// response is adopted.
    #[must_use]
    pub fn initial(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            ..Self::default()
        }
    }

}

impl StatusModel for MeadowStatus {
    type Control = MeadowControl;

    fn stamp_identity(&mut self, address: &str, port: u16) {
        self.address = address.to_string();
        self.port = port;
    }

    fn apply_control(&mut self, control: &MeadowControl) {
        match *control {
            MeadowControl::PumpProgram(program) => self.pump = program,
            MeadowControl::Heating(on) => self.heating = on,
            MeadowControl::SwgPercent(percent) => self.swg_percent = percent,
            MeadowControl::ThermostatTarget(target) => self.thermostat_target = target,
        }
    }

    fn revert_control(&mut self, family: ControlFamily, previous: &Self) {
        match family {
            ControlFamily::Pump => self.pump = previous.pump,
            ControlFamily::Heater => self.heating = previous.heating,
            ControlFamily::SwgPercent => self.swg_percent = previous.swg_percent,
            ControlFamily::ThermostatTarget => {
                self.thermostat_target = previous.thermostat_target;
            }
        }
    }
}
