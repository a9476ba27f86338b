// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status snapshot for legacy Poolduino controllers.

use serde::{Deserialize, Serialize};

use crate::command::{ControlFamily, PoolduinoControl};

use super::StatusModel;

/// Status snapshot reported by a legacy Poolduino controller.
///
/// The legacy firmware uses camel-case wire names, reports the heater as a
/// numeric mode, and has no thermostat target or filter pressure sensor.
/// As with [`MeadowStatus`](super::MeadowStatus), `address` and `port` are
/// stamped by the device client and never decoded from the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolduinoStatus {
    /// Controller host address (identity, not part of the wire payload).
    #[serde(skip_deserializing)]
    pub address: String,

    /// Controller HTTP port (identity, not part of the wire payload).
    #[serde(skip_deserializing)]
    pub port: u16,

    /// Active heater mode (0 = off, 1..N = named mode).
    #[serde(rename = "heaterState")]
    pub heater_state: u8,

    /// Temperature measured at the heater.
    #[serde(rename = "heaterTemp")]
    pub heater_temp: f64,

    /// Controller system mode.
    #[serde(rename = "systemMode")]
    pub system_mode: u8,

    /// Active pump program (0 = off, 1..N = named program).
    #[serde(rename = "pumpProgram")]
    pub pump_program: u8,

    /// Salt-water chlorine generator duty percentage (0-100, -1 = no
    /// change requested).
    #[serde(rename = "swgPercent")]
    pub swg_percent: i16,

    /// Seconds the chlorine generator is on within the current cycle.
    #[serde(rename = "swgCycleTimeOn")]
    pub swg_cycle_time_on: u32,

    /// Seconds elapsed in the current chlorine generator cycle.
    #[serde(rename = "swgCycleTime")]
    pub swg_cycle_time: u32,

    /// Water temperature.
    #[serde(rename = "currentTemp")]
    pub current_temp: f64,

    /// External account-correlation identifier.
    #[serde(rename = "poolMathUserId")]
    pub pool_math_user_id: String,

    /// Controller clock, minutes since midnight.
    #[serde(rename = "currentMinOfDay")]
    pub current_min_of_day: u16,
}

impl PoolduinoStatus {
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

impl StatusModel for PoolduinoStatus {
    type Control = PoolduinoControl;

    fn stamp_identity(&mut self, address: &str, port: u16) {
        self.address = address.to_string();
        self.port = port;
    }

    fn apply_control(&mut self, control: &PoolduinoControl) {
        match *control {
            PoolduinoControl::PumpProgram(program) => self.pump_program = program,
            PoolduinoControl::HeaterMode(mode) => self.heater_state = mode,
            PoolduinoControl::SwgPercent(percent) => self.swg_percent = percent,
        }
    }

    fn revert_control(&mut self, family: ControlFamily, previous: &Self) {
        match family {
            ControlFamily::Pump => self.pump_program = previous.pump_program,
            ControlFamily::Heater => self.heater_state = previous.heater_state,
            ControlFamily::SwgPercent => self.swg_percent = previous.swg_percent,
            // No thermostat on the legacy firmware.
            ControlFamily::ThermostatTarget => {}
        }
    }
}
