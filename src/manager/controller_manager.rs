// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller registry and event aggregation.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::client::DeviceClient;
use crate::controller::Controller;
use crate::event::{ControllerEvent, ControllerKey, EventBus};

/// One registered controller and the task forwarding its events into the
/// aggregate bus.
struct Registered<C: DeviceClient> {
    controller: Controller<C>,
    forwarder: JoinHandle<()>,
}

/// Registry for multiple controllers of one firmware generation.
///
/// Controllers are keyed by their `address:port` endpoint. Registering a
/// controller starts its polling loop; removing it stops the loop and the
/// event forwarding. Registering an endpoint that is already present keeps
/// the existing controller and discards the new one.
pub struct ControllerManager<C: DeviceClient> {
    controllers: RwLock<HashMap<ControllerKey, Registered<C>>>,
    events: EventBus<ControllerEvent<C::Status>>,
}

impl<C: DeviceClient> ControllerManager<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            controllers: RwLock::new(HashMap::new()),
            events: EventBus::new(),
        }
    }

    /// Subscribes to the aggregate event stream.
    ///
    /// Receives every registered controller's change events; the event key
    /// identifies which controller changed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent<C::Status>> {
        self.events.subscribe()
    }

    /// Registers a controller and starts its polling loop.
    ///
    /// Returns the controller's key. If the endpoint is already registered
    /// the existing controller stays in place and the new one is dropped.
    pub fn register(&self, controller: Controller<C>) -> ControllerKey {
        let key = controller.key().clone();

        let mut controllers = self.controllers.write();
        if controllers.contains_key(&key) {
            tracing::info!(controller = %key, "controller already registered");
            return key;
        }

        tracing::info!(controller = %key, "registering controller");

        let forwarder = self.spawn_forwarder(&controller);
        controller.start_polling();

        controllers.insert(
            key.clone(),
            Registered {
                controller,
                forwarder,
            },
        );

        key
    }

    /// Removes a controller, stopping its polling loop and event
    /// forwarding.
    ///
    /// Returns `true` if the key was registered.
    pub fn remove(&self, key: &ControllerKey) -> bool {
        let Some(entry) = self.controllers.write().remove(key) else {
            return false;
        };

        tracing::info!(controller = %key, "removing controller");
        entry.controller.stop_polling();
        entry.forwarder.abort();
        true
    }

    /// Returns a handle to a registered controller.
    #[must_use]
    pub fn get(&self, key: &ControllerKey) -> Option<Controller<C>> {
        self.controllers
            .read()
            .get(key)
            .map(|entry| entry.controller.clone())
    }

    /// Returns the keys of all registered controllers.
    #[must_use]
    pub fn keys(&self) -> Vec<ControllerKey> {
        self.controllers.read().keys().cloned().collect()
    }

    /// Returns the number of registered controllers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.read().len()
    }

    /// Returns `true` if no controllers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.read().is_empty()
    }

    /// Spawns the task that copies one controller's events into the
    /// aggregate bus.
    fn spawn_forwarder(&self, controller: &Controller<C>) -> JoinHandle<()> {
        let mut rx = controller.subscribe();
        let bus = self.events.clone();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => bus.publish(event),
                    // A lagged subscriber skips to the freshest events.
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl<C: DeviceClient> Default for ControllerManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DeviceClient> Drop for ControllerManager<C> {
    fn drop(&mut self) {
        for entry in self.controllers.get_mut().values() {
            entry.controller.stop_polling();
            entry.forwarder.abort();
        }
    }
}
