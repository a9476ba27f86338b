// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for current-generation Meadow controllers.

use std::time::Duration;

use crate::command::MeadowControl;
use crate::error::Result;
use crate::status::{MeadowStatus, StatusModel};

use super::{DEFAULT_TIMEOUT, DeviceClient, base_url, build_http, get_json};

/// HTTP client for a current-generation Meadow controller.
///
/// Status is read from `/status`; control values are path-encoded
/// (`/pump/2`, `/heater/true`, `/swg/45`, `/thermostat/29.5`). Values are
/// passed through unvalidated; the controller decides what it accepts.
///
/// # Examples
///
/// ```no_run
/// use poolmath_lib::client::{DeviceClient, MeadowClient};
///
/// # async fn example() -> poolmath_lib::Result<()> {
/// let client = MeadowClient::new("192.168.1.40", 8080)?;
/// let status = client.fetch_status().await?;
/// println!("water is {} degrees", status.temp);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MeadowClient {
    address: String,
    port: u16,
    base_url: String,
    http: reqwest::Client,
}

impl MeadowClient {
    /// Creates a client with the default request deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(address: impl Into<String>, port: u16) -> Result<Self> {
        Self::with_timeout(address, port, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn with_timeout(address: impl Into<String>, port: u16, timeout: Duration) -> Result<Self> {
        let address = address.into();
        let base_url = base_url(&address, port);
        let http = build_http(&base_url, timeout)?;

        Ok(Self {
            address,
            port,
            base_url,
            http,
        })
    }

    /// Returns the base URL of the controller.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the request path for a control value.
    fn control_path(control: MeadowControl) -> String {
        match control {
            MeadowControl::PumpProgram(program) => format!("pump/{program}"),
            MeadowControl::Heating(on) => format!("heater/{on}"),
            MeadowControl::SwgPercent(percent) => format!("swg/{percent}"),
            MeadowControl::ThermostatTarget(target) => format!("thermostat/{target}"),
        }
    }
}

impl DeviceClient for MeadowClient {
    type Status = MeadowStatus;

    async fn fetch_status(&self) -> Result<MeadowStatus> {
        let url = format!("{}/status", self.base_url);
        let mut snapshot: MeadowStatus = get_json(&self.http, &url).await?;
        snapshot.stamp_identity(&self.address, self.port);
        Ok(snapshot)
    }

    async fn send_control(&self, control: MeadowControl) -> Result<MeadowStatus> {
        let url = format!("{}/{}", self.base_url, Self::control_path(control));
        let mut snapshot: MeadowStatus = get_json(&self.http, &url).await?;
        snapshot.stamp_identity(&self.address, self.port);
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_paths_are_path_encoded() {
        assert_eq!(
            MeadowClient::control_path(MeadowControl::PumpProgram(2)),
            "pump/2"
        );
        assert_eq!(
            MeadowClient::control_path(MeadowControl::Heating(true)),
            "heater/true"
        );
        assert_eq!(
            MeadowClient::control_path(MeadowControl::Heating(false)),
            "heater/false"
        );
        assert_eq!(
            MeadowClient::control_path(MeadowControl::SwgPercent(45)),
            "swg/45"
        );
        assert_eq!(
            MeadowClient::control_path(MeadowControl::ThermostatTarget(29.5)),
            "thermostat/29.5"
        );
    }

    #[test]
    fn client_base_url() {
        let client = MeadowClient::new("192.168.1.40", 8080).unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.40:8080");
    }
}
