// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for legacy Poolduino controllers.

use std::time::Duration;

use crate::command::PoolduinoControl;
use crate::error::Result;
use crate::status::{PoolduinoStatus, StatusModel};

use super::{DEFAULT_TIMEOUT, DeviceClient, base_url, build_http, get_json};

/// HTTP client for a legacy Poolduino controller.
///
/// Status is read from `/info`; control values are query-encoded
/// (`/pump?program=2`, `/heater?state=1`, `/swg?percent=45`), matching the
/// legacy firmware's routing.
#[derive(Debug, Clone)]
pub struct PoolduinoClient {
    address: String,
    port: u16,
    base_url: String,
    http: reqwest::Client,
}

impl PoolduinoClient {
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

    /// Builds the request path and query for a control value.
    fn control_path(control: PoolduinoControl) -> String {
        match control {
            PoolduinoControl::PumpProgram(program) => format!("pump?program={program}"),
            PoolduinoControl::HeaterMode(mode) => format!("heater?state={mode}"),
            PoolduinoControl::SwgPercent(percent) => format!("swg?percent={percent}"),
        }
    }
}

impl DeviceClient for PoolduinoClient {
    type Status = PoolduinoStatus;

    async fn fetch_status(&self) -> Result<PoolduinoStatus> {
        let url = format!("{}/info", self.base_url);
        let mut snapshot: PoolduinoStatus = get_json(&self.http, &url).await?;
        snapshot.stamp_identity(&self.address, self.port);
        Ok(snapshot)
    }

    async fn send_control(&self, control: PoolduinoControl) -> Result<PoolduinoStatus> {
        let url = format!("{}/{}", self.base_url, Self::control_path(control));
        let mut snapshot: PoolduinoStatus = get_json(&self.http, &url).await?;
        snapshot.stamp_identity(&self.address, self.port);
        Ok(snapshot)
    }
}
