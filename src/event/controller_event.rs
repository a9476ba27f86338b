// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller event types.

use super::ControllerKey;

/// Events emitted by a controller.
///
/// Generic over the snapshot generation so the same event plumbing serves
/// both controller families. An event is only published when the adopted
/// snapshot structurally differs from the one it replaced, so subscribers
/// never see redundant notifications under a fixed polling interval.
#[derive(Debug, Clone)]
pub enum ControllerEvent<S> {
    /// The controller's status snapshot was replaced with a changed one.
    StatusUpdated {
        /// The controller the snapshot belongs to.
        key: ControllerKey,
        /// The complete new snapshot.
        status: S,
    },
}

impl<S> ControllerEvent<S> {
    /// Creates a status-updated event.
    #[must_use]
    pub fn status_updated(key: ControllerKey, status: S) -> Self {
        Self::StatusUpdated { key, status }
    }

    /// Returns the controller key associated with this event.
    #[must_use]
    pub fn key(&self) -> &ControllerKey {
        match self {
            Self::StatusUpdated { key, .. } => key,
        }
    }

    /// Returns the snapshot carried by this event.
    #[must_use]
    pub fn status(&self) -> &S {
        match self {
            Self::StatusUpdated { status, .. } => status,
        }
    }
}
