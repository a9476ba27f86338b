// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status snapshot types for pool controllers.
//!
//! A snapshot is the full set of currently known device status fields. It is
//! replaced wholesale each time an authoritative device response is adopted,
//! and selectively reverted on a single control field when a control call
//! fails. Fields not under optimistic control are never guessed locally;
//! they only change when a device response is adopted.
//!
//! Two controller generations exist with different wire formats:
//!
//! - [`MeadowStatus`]: current firmware, `/status` endpoint, boolean heating
//!   flag and a thermostat target.
//! - [`PoolduinoStatus`]: legacy firmware, `/info` endpoint, numeric heater
//!   mode, no thermostat.

mod meadow;
mod poolduino;

pub use meadow::MeadowStatus;
pub use poolduino::PoolduinoStatus;

use crate::command::{Control, ControlFamily};

/// A controller status snapshot that the reconciliation core can operate on.
///
/// The core only ever needs a few things from a snapshot: wholesale
/// replacement (`Clone` + structural equality), an optimistic write of one
/// control field, a single-field revert of one control family from an
/// earlier snapshot, and identity stamping (`Default` provides the all-zero
/// snapshot held before the first device response).
pub trait StatusModel:
    Clone + PartialEq + std::fmt::Debug + Default + Send + Sync + 'static
{
    /// The control request type this generation understands.
    type Control: Control;

    /// Sets the identity fields.
    ///
    /// Called by device clients on freshly decoded snapshots and by the
    /// controller on the initial all-zero snapshot; identity never comes
    /// from the wire.
    fn stamp_identity(&mut self, address: &str, port: u16);

    /// Applies a requested control value to the snapshot.
    ///
    /// This is the optimistic write: the snapshot reflects the requested
    /// value before the device has confirmed it.
    fn apply_control(&mut self, control: &Self::Control);

    /// Restores exactly one control family's field from `previous`.
    ///
    /// All other fields are left untouched; they were never speculated.
    fn revert_control(&mut self, family: ControlFamily, previous: &Self);
}
