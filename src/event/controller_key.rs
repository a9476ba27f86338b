// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller identity.

/// Identity of one configured controller.
///
/// Controllers are keyed by their network endpoint: the `address:port` pair
/// is stable across restarts and unique per device, so it doubles as the
/// registry key and the identity carried on every change event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerKey {
    address: String,
    port: u16,
}

impl ControllerKey {
    /// Creates a key for the given endpoint.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
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
}

impl std::fmt::Display for ControllerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_address_colon_port() {
        let key = ControllerKey::new("192.168.1.40", 8080);
        assert_eq!(key.to_string(), "192.168.1.40:8080");
    }

    #[test]
    fn keys_compare_by_endpoint() {
        let a = ControllerKey::new("pool", 80);
        let b = ControllerKey::new("pool", 80);
        let c = ControllerKey::new("pool", 81);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
