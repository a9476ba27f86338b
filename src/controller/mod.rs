// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The state-reconciliation core.
//!
//! A [`Controller`] owns the authoritative status snapshot for one device
//! and makes remote control operations feel synchronous and idempotent:
//!
//! - Control setters apply their value to the local snapshot immediately
//!   (optimistic write), then confirm it with the device.
//! - Rapid repeated calls to the same control family coalesce into a single
//!   network call carrying the latest requested value; every caller in the
//!   window observes that one call's outcome.
//! - On success the device's full snapshot is adopted wholesale, which also
//!   picks up side effects of the change. On failure only the speculated
//!   field is rolled back and the error is returned to the caller.
//! - A change event is published exactly when a snapshot replacement
//!   actually changed something.
//!
//! The polling loop drives periodic status refreshes through the same
//! replace-and-diff path. Poll failures are logged and swallowed - the
//! previous snapshot stays authoritative - while control failures always
//! surface to the caller. That asymmetry is deliberate: a missed poll is a
//! transient non-event, a failed user action must be reported.

mod config;
mod debounce;
mod reconcile;

pub use config::ControllerConfig;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::{DeviceClient, MeadowClient, PoolduinoClient};
use crate::command::{Control, ControlFamily, MeadowControl, PoolduinoControl};
use crate::error::{Result, TransportError};
use crate::event::{ControllerEvent, ControllerKey, EventBus};
use crate::status::{MeadowStatus, PoolduinoStatus, StatusModel};

use self::debounce::DebounceQueue;
use self::reconcile::reconcile;

/// Control request type produced by a client's snapshot generation.
type ControlOf<C> = <<C as DeviceClient>::Status as StatusModel>::Control;

/// Pending state of one control window: the snapshot captured before the
/// burst's first optimistic write (the rollback baseline) and the latest
/// requested value.
struct PendingControl<C: DeviceClient> {
    previous: C::Status,
    control: ControlOf<C>,
}

/// State-reconciliation core for one pool controller.
///
/// Cheap to clone; clones share the same snapshot, debounce arena, and
/// event bus. Observers hold subscriptions, never the snapshot itself.
///
/// # Examples
///
/// ```no_run
/// use poolmath_lib::{Controller, ControllerConfig};
///
/// #[tokio::main]
/// async fn main() -> poolmath_lib::Result<()> {
///     let config = ControllerConfig::new("192.168.1.40", 8080);
///     let controller = Controller::meadow(&config)?;
///
///     let mut events = controller.subscribe();
///     controller.start_polling();
///
///     controller.set_pump_program(2).await?;
///
///     while let Ok(event) = events.recv().await {
///         println!("water is now {} degrees", event.status().temp);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Controller<C: DeviceClient> {
    inner: Arc<ControllerInner<C>>,
}

struct ControllerInner<C: DeviceClient> {
    key: ControllerKey,
    client: C,
    status: RwLock<C::Status>,
    events: EventBus<ControllerEvent<C::Status>>,
    controls: DebounceQueue<ControlFamily, PendingControl<C>, Result<C::Status>>,
    refreshes: DebounceQueue<(), (), Result<C::Status>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
    update_interval: Duration,
}

impl<C: DeviceClient> Controller<C> {
    /// Creates a controller around an existing device client.
    ///
    /// The snapshot starts at its all-zero initial value and is first
    /// populated when a device response is adopted.
    #[must_use]
    pub fn with_client(client: C, config: &ControllerConfig) -> Self {
        let mut status = C::Status::default();
        status.stamp_identity(config.address(), config.port());

        Self {
            inner: Arc::new(ControllerInner {
                key: ControllerKey::new(config.address(), config.port()),
                client,
                status: RwLock::new(status),
                events: EventBus::new(),
                controls: DebounceQueue::new(config.control_debounce()),
                refreshes: DebounceQueue::new(config.refresh_debounce()),
                poll_task: Mutex::new(None),
                update_interval: config.update_interval(),
            }),
        }
    }

    /// Returns the controller's identity.
    #[must_use]
    pub fn key(&self) -> &ControllerKey {
        &self.inner.key
    }

    /// Returns a copy of the current status snapshot.
    #[must_use]
    pub fn status(&self) -> C::Status {
        self.inner.status.read().clone()
    }

    /// Subscribes to change events.
    ///
    /// An event is published exactly when an adopted snapshot structurally
    /// differs from the one it replaced. Unsubscribe by dropping the
    /// receiver.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent<C::Status>> {
        self.inner.events.subscribe()
    }

    /// Returns the number of active event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.events.subscriber_count()
    }

    /// Refreshes the status snapshot from the device.
    ///
    /// Coalesced with other refreshes (including the polling loop's ticks)
    /// in its own debounce bucket, so a manual refresh and a periodic tick
    /// can never race into two concurrent requests.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error of the underlying fetch. The
    /// previous snapshot stays authoritative; no rollback is needed since
    /// refreshing never writes optimistically.
    pub async fn refresh(&self) -> Result<C::Status> {
        Arc::clone(&self.inner)
            .debounced_refresh()
            .await
            .unwrap_or_else(|| Err(TransportError::ChannelClosed.into()))
    }

    /// Applies one control request through the optimistic-write,
    /// coalesce, reconcile protocol.
    ///
    /// The local snapshot reflects the requested value as soon as this is
    /// called. Calls for the same control family within the debounce
    /// window collapse into one device call carrying the latest value;
    /// every caller gets that call's outcome.
    ///
    /// # Errors
    ///
    /// Returns the device call's error after the speculated field has been
    /// rolled back to its pre-call value (and observers notified of the
    /// revert).
    pub async fn apply(&self, control: ControlOf<C>) -> Result<C::Status> {
        let family = control.family();
        let inner = Arc::clone(&self.inner);

        let outcome = self
            .inner
            .controls
            .run(
                family,
                || {
                    let mut status = self.inner.status.write();
                    let previous = status.clone();
                    status.apply_control(&control);
                    PendingControl {
                        previous,
                        control: control.clone(),
                    }
                },
                |pending| {
                    self.inner.status.write().apply_control(&control);
                    pending.control = control.clone();
                },
                move |pending| async move { inner.dispatch_control(pending).await },
            )
            .await;

        outcome.unwrap_or_else(|| Err(TransportError::ChannelClosed.into()))
    }

    /// Starts the periodic status polling loop.
    ///
    /// The first refresh happens immediately, then one per update
    /// interval. Does nothing if polling is already running. The loop
    /// stops on [`stop_polling`](Self::stop_polling) or once every handle
    /// to this controller has been dropped.
    pub fn start_polling(&self) {
        let mut slot = self.inner.poll_task.lock();
        if slot.is_some() {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.update_interval;
        let key = self.inner.key.clone();

        let handle = tokio::spawn(async move {
            tracing::debug!(controller = %key, "status polling started");

            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;

                let Some(inner) = weak.upgrade() else { break };
                if let Some(Err(err)) = inner.debounced_refresh().await {
                    tracing::warn!(controller = %key, error = %err, "status poll failed");
                }
            }

            tracing::debug!(controller = %key, "status polling stopped");
        });

        *slot = Some(handle);
    }

    /// Stops the periodic status polling loop.
    ///
    /// A refresh that is already in flight runs to completion.
    pub fn stop_polling(&self) {
        if let Some(handle) = self.inner.poll_task.lock().take() {
            handle.abort();
        }
    }

    /// Returns true while the polling loop is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner.poll_task.lock().is_some()
    }
}

impl<C: DeviceClient> Clone for Controller<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: DeviceClient> std::fmt::Debug for ControllerInner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerInner")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<C: DeviceClient> ControllerInner<C> {
    /// Routes one refresh through the shared refresh debounce bucket.
    async fn debounced_refresh(self: Arc<Self>) -> Option<Result<C::Status>> {
        let inner = Arc::clone(&self);
        self.refreshes
            .run(
                (),
                || (),
                |()| {},
                move |()| async move { inner.dispatch_refresh().await },
            )
            .await
    }

    /// Fetches the status and adopts it, notifying on actual change.
    async fn dispatch_refresh(&self) -> Result<C::Status> {
        let fetched = self.client.fetch_status().await?;

        let notify = {
            let mut status = self.status.write();
            let changed = fetched != *status;
            *status = fetched.clone();
            changed
        };

        if notify {
            self.events
                .publish(ControllerEvent::status_updated(self.key.clone(), fetched.clone()));
        }

        Ok(fetched)
    }

    /// Sends one coalesced control call and reconciles its outcome.
    async fn dispatch_control(&self, pending: PendingControl<C>) -> Result<C::Status> {
        let PendingControl { previous, control } = pending;
        let family = control.family();

        tracing::debug!(controller = %self.key, %family, "dispatching control call");

        let call = self.client.send_control(control).await;
        let (failure, adopted) = match call {
            Ok(server) => (None, Some(server)),
            Err(err) => (Some(err), None),
        };

        let (next, notify) = {
            let mut status = self.status.write();
            let (next, notify) = reconcile(&previous, &status, family, adopted);
            *status = next.clone();
            (next, notify)
        };

        if notify {
            self.events
                .publish(ControllerEvent::status_updated(self.key.clone(), next.clone()));
        }

        match failure {
            None => Ok(next),
            Some(err) => {
                tracing::debug!(controller = %self.key, %family, error = %err, "control call failed, rolled back");
                Err(err)
            }
        }
    }
}

// ========== Meadow (current generation) ==========

impl Controller<MeadowClient> {
    /// Creates a controller for a current-generation Meadow device.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn meadow(config: &ControllerConfig) -> Result<Self> {
        let client =
            MeadowClient::with_timeout(config.address(), config.port(), config.request_timeout())?;
        Ok(Self::with_client(client, config))
    }
}

impl<C: DeviceClient<Status = MeadowStatus>> Controller<C> {
    /// Selects a pump program (0 = off, 1..N = named program).
    ///
    /// # Errors
    ///
    /// Returns the device call's error after rollback.
    pub async fn set_pump_program(&self, program: u8) -> Result<MeadowStatus> {
        self.apply(MeadowControl::PumpProgram(program)).await
    }

    /// Turns the heater on or off.
    ///
    /// # Errors
    ///
    /// Returns the device call's error after rollback.
    pub async fn set_heating(&self, on: bool) -> Result<MeadowStatus> {
        self.apply(MeadowControl::Heating(on)).await
    }

    /// Sets the chlorine generator duty percentage (0-100; -1 = no change).
    ///
    /// # Errors
    ///
    /// Returns the device call's error after rollback.
    pub async fn set_swg_percent(&self, percent: i16) -> Result<MeadowStatus> {
        self.apply(MeadowControl::SwgPercent(percent)).await
    }

    /// Sets the thermostat target temperature.
    ///
    /// # Errors
    ///
    /// Returns the device call's error after rollback.
    pub async fn set_thermostat_target(&self, target: f64) -> Result<MeadowStatus> {
        self.apply(MeadowControl::ThermostatTarget(target)).await
    }
}

// ========== Poolduino (legacy generation) ==========

impl Controller<PoolduinoClient> {
    /// Creates a controller for a legacy Poolduino device.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn poolduino(config: &ControllerConfig) -> Result<Self> {
        let client = PoolduinoClient::with_timeout(
            config.address(),
            config.port(),
            config.request_timeout(),
        )?;
        Ok(Self::with_client(client, config))
    }

    /// Selects a pump program (0 = off, 1..N = named program).
    ///
    /// # Errors
    ///
    /// Returns the device call's error after rollback.
    pub async fn set_pump_program(&self, program: u8) -> Result<PoolduinoStatus> {
        self.apply(PoolduinoControl::PumpProgram(program)).await
    }

    /// Selects a heater mode (0 = off, 1..N = named mode).
    ///
    /// # Errors
    ///
    /// Returns the device call's error after rollback.
    pub async fn set_heater_mode(&self, mode: u8) -> Result<PoolduinoStatus> {
        self.apply(PoolduinoControl::HeaterMode(mode)).await
    }

    /// Sets the chlorine generator duty percentage (0-100; -1 = no change).
    ///
    /// # Errors
    ///
    /// Returns the device call's error after rollback.
    pub async fn set_swg_percent(&self, percent: i16) -> Result<PoolduinoStatus> {
        self.apply(PoolduinoControl::SwgPercent(percent)).await
    }
}
