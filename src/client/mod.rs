// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP clients for the pool controller status/control API.
//!
//! A device client translates a status query or a control intent into one
//! HTTP GET request and decodes the JSON body into a full status snapshot.
//! Every control endpoint returns the complete refreshed snapshot, not a
//! bare acknowledgement; the device is the source of truth for side effects
//! of a change (selecting one pump program may switch another mode off).
//!
//! Each call is a single best-effort round trip. No retries happen at this
//! layer; the reconciliation core decides how to react to failures.

mod meadow;
mod poolduino;

pub use meadow::MeadowClient;
pub use poolduino::PoolduinoClient;

use std::future::Future;
use std::time::Duration;

use crate::error::{DecodeError, Result, TransportError};
use crate::status::StatusModel;

/// Default request deadline applied to every round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport seam between the reconciliation core and a controller.
///
/// The two HTTP clients implement this for their respective firmware
/// generations; tests substitute fakes to exercise the core without a
/// network.
pub trait DeviceClient: Send + Sync + 'static {
    /// The snapshot generation this client produces.
    type Status: StatusModel;

    /// Fetches the full current status snapshot.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure or a non-success HTTP
    /// status, and a decode error on a malformed body.
    fn fetch_status(&self) -> impl Future<Output = Result<Self::Status>> + Send;

    /// Sends one control request and returns the refreshed snapshot the
    /// device reports afterwards.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure or a non-success HTTP
    /// status, and a decode error on a malformed body.
    fn send_control(
        &self,
        control: <Self::Status as StatusModel>::Control,
    ) -> impl Future<Output = Result<Self::Status>> + Send;
}

/// Builds the base URL shared by both controller generations.
pub(crate) fn base_url(address: &str, port: u16) -> String {
    format!("http://{address}:{port}")
}

/// Constructs a reqwest client with the given request deadline.
pub(crate) fn build_http(base: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| TransportError::from_reqwest(base, &err).into())
}

/// Issues one GET request and decodes the JSON body.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
) -> Result<T> {
    tracing::debug!(url = %url, "sending controller request");

    let response = http
        .get(url)
        .send()
        .await
        .map_err(|err| TransportError::from_reqwest(url, &err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }
        .into());
    }

    let body = response
        .text()
        .await
        .map_err(|err| TransportError::from_reqwest(url, &err))?;

    tracing::debug!(body = %body, "received controller response");

    Ok(serde_json::from_str(&body).map_err(DecodeError::from)?)
}
