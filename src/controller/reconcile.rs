// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure resolution of an optimistic control write against the device's
//! verdict.
//!
//! Kept free of any transport or locking so the compensating-action
//! protocol (apply locally, confirm remotely, undo on failure) can be
//! tested without a network.

use crate::command::ControlFamily;
use crate::status::StatusModel;

/// Resolves one completed control call.
///
/// * `previous` is the snapshot captured before the first optimistic write
///   of the call's debounce window.
/// * `current` is the snapshot held right now, which still carries the
///   optimistic value.
/// * `outcome` is the device's authoritative snapshot on success, or `None`
///   when the call failed.
///
/// On success the authoritative snapshot is adopted wholesale; that also
/// reconciles fields the device changed as a side effect of the request,
/// and the device's value wins over the optimistic guess. On failure only
/// the speculated family field is reverted; everything else in `current`
/// was never guessed and stays untouched.
///
/// The returned flag says whether observers should be notified: true iff
/// the snapshot to adopt structurally differs from `current`.
pub(crate) fn reconcile<S: StatusModel>(
    previous: &S,
    current: &S,
    family: ControlFamily,
    outcome: Option<S>,
) -> (S, bool) {
    match outcome {
        Some(authoritative) => {
            let changed = authoritative != *current;
            (authoritative, changed)
        }
        None => {
            let mut reverted = current.clone();
            reverted.revert_control(family, previous);
            let changed = reverted != *current;
            (reverted, changed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MeadowControl;
    use crate::status::MeadowStatus;

    fn snapshot() -> MeadowStatus {
        MeadowStatus {
            pump: 1,
            heating: true,
            swg_percent: 40,
            thermostat_target: 28.0,
            temp: 26.0,
            pressure: 14.0,
            ..MeadowStatus::initial("pool", 80)
        }
    }

    #[test]
    fn success_adopts_the_server_snapshot_exactly() {
        let previous = snapshot();
        let mut current = previous.clone();
        current.apply_control(&MeadowControl::PumpProgram(2));

        // The device accepted a different program and reports fresher
        // telemetry; its snapshot must win with no merge.
        let server = MeadowStatus {
            pump: 3,
            temp: 26.8,
            ..previous.clone()
        };

        let (next, notify) =
            reconcile(&previous, &current, ControlFamily::Pump, Some(server.clone()));

        assert_eq!(next, server);
        assert!(notify);
    }

    #[test]
    fn success_matching_the_optimistic_guess_is_silent() {
        let previous = snapshot();
        let mut current = previous.clone();
        current.apply_control(&MeadowControl::SwgPercent(55));

        let server = current.clone();
        let (next, notify) =
            reconcile(&previous, &current, ControlFamily::SwgPercent, Some(server));

        assert_eq!(next, current);
        assert!(!notify);
    }

    #[test]
    fn failure_reverts_only_the_speculated_field() {
        let previous = snapshot();
        let mut current = previous.clone();
        current.apply_control(&MeadowControl::ThermostatTarget(32.0));

        let (next, notify) =
            reconcile(&previous, &current, ControlFamily::ThermostatTarget, None);

        assert_eq!(next.thermostat_target, previous.thermostat_target);
        assert!(notify);
        // Every other field is exactly the pre-call value.
        assert_eq!(next, previous);
    }

    #[test]
    fn failure_leaves_unrelated_authoritative_fields_alone() {
        let previous = snapshot();
        let mut current = previous.clone();
        // Another family's response replaced telemetry while this call was
        // in flight; the rollback must not undo it.
        current.temp = 27.5;
        current.apply_control(&MeadowControl::SwgPercent(80));

        let (next, notify) = reconcile(&previous, &current, ControlFamily::SwgPercent, None);

        assert_eq!(next.swg_percent, previous.swg_percent);
        assert_eq!(next.temp, 27.5);
        assert!(notify);
    }

    #[test]
    fn failed_write_of_the_already_held_value_is_silent() {
        let previous = snapshot();
        let mut current = previous.clone();
        current.apply_control(&MeadowControl::PumpProgram(previous.pump));

        let (next, notify) = reconcile(&previous, &current, ControlFamily::Pump, None);

        assert_eq!(next, previous);
        assert!(!notify);
    }
}
