// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-controller configuration.

use std::time::Duration;

/// Configuration for one pool controller.
///
/// Only the endpoint is mandatory; the timing knobs default to values that
/// match the controller firmware's expectations and rarely need changing.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use poolmath_lib::ControllerConfig;
///
/// // Just the endpoint
/// let config = ControllerConfig::new("192.168.1.40", 8080);
///
/// // With all options
/// let config = ControllerConfig::new("192.168.1.40", 8080)
///     .with_update_interval(Duration::from_secs(30))
///     .with_request_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    address: String,
    port: u16,
    update_interval: Duration,
    request_timeout: Duration,
    control_debounce: Duration,
    refresh_debounce: Duration,
}

impl ControllerConfig {
    /// Default period of the status polling loop.
    pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(60_000);
    /// Default deadline for one HTTP round trip.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default coalescing window for control setters.
    pub const DEFAULT_CONTROL_DEBOUNCE: Duration = Duration::from_millis(1200);
    /// Default coalescing window for status refreshes.
    pub const DEFAULT_REFRESH_DEBOUNCE: Duration = Duration::from_millis(2000);

    /// Creates a configuration for the given controller endpoint.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            update_interval: Self::DEFAULT_UPDATE_INTERVAL,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            control_debounce: Self::DEFAULT_CONTROL_DEBOUNCE,
            refresh_debounce: Self::DEFAULT_REFRESH_DEBOUNCE,
        }
    }

    /// Sets the polling period.
    #[must_use]
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Sets the per-request deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the coalescing window for control setters.
    #[must_use]
    pub fn with_control_debounce(mut self, window: Duration) -> Self {
        self.control_debounce = window;
        self
    }

    /// Sets the coalescing window for status refreshes.
    #[must_use]
    pub fn with_refresh_debounce(mut self, window: Duration) -> Self {
        self.refresh_debounce = window;
        self
    }

    /// Returns the controller host address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the controller HTTP port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the polling period.
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Returns the per-request deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the coalescing window for control setters.
    #[must_use]
    pub fn control_debounce(&self) -> Duration {
        self.control_debounce
    }

    /// Returns the coalescing window for status refreshes.
    #[must_use]
    pub fn refresh_debounce(&self) -> Duration {
        self.refresh_debounce
    }
}
