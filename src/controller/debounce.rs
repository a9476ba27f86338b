// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-key debouncing with last-value-wins coalescing.
//!
//! Rapid UI interaction (dragging a brightness-style slider) would otherwise
//! flood a controller with redundant requests. The queue holds one pending
//! slot per key; calls arriving while a slot is open supersede its value,
//! and when the window elapses exactly one underlying call is dispatched
//! with the latest value. Every caller queued in the window receives the
//! outcome of that single call, error included.
//!
//! Once a call has been dispatched it runs to completion; a per-key gate
//! ensures at most one call per key is in flight, so a window that closes
//! while an earlier call is still outstanding waits for it instead of
//! racing it.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;

/// One open debounce window: the latest requested value and the channel the
/// eventual outcome fans out on.
struct Slot<V, R> {
    value: V,
    outcome: broadcast::Sender<R>,
}

/// Arena state shared between callers and the spawned window drivers.
struct Arena<K, V, R> {
    slots: Mutex<HashMap<K, Slot<V, R>>>,
    gates: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

/// Arena of pending-call state, keyed by control family (or any other key).
///
/// Values joining an open window are merged into the slot; the first caller
/// of a window spawns a driver task that sleeps out the window, waits for
/// the key's in-flight gate, and dispatches once.
pub(crate) struct DebounceQueue<K, V, R> {
    window: Duration,
    arena: Arc<Arena<K, V, R>>,
}

impl<K, V, R> DebounceQueue<K, V, R>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
    R: Clone + Send + 'static,
{
    /// Creates a queue with the given coalescing window.
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            arena: Arc::new(Arena {
                slots: Mutex::new(HashMap::new()),
                gates: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Joins or opens the debounce window for `key` and waits for the
    /// outcome of the window's single dispatched call.
    ///
    /// `init` builds the slot value when this call opens a new window;
    /// `merge` folds this call's request into an already open slot. Both
    /// run under the arena lock and must not block.
    ///
    /// Returns `None` only if the driver task died without delivering an
    /// outcome, which does not happen in normal operation.
    pub(crate) async fn run<F, Fut>(
        &self,
        key: K,
        init: impl FnOnce() -> V,
        merge: impl FnOnce(&mut V),
        dispatch: F,
    ) -> Option<R>
    where
        F: FnOnce(V) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let (mut rx, opened_window) = {
            let mut slots = self.arena.slots.lock();
            if let Some(slot) = slots.get_mut(&key) {
                merge(&mut slot.value);
                (slot.outcome.subscribe(), false)
            } else {
                let (tx, rx) = broadcast::channel(1);
                slots.insert(
                    key.clone(),
                    Slot {
                        value: init(),
                        outcome: tx,
                    },
                );
                (rx, true)
            }
        };

        if opened_window {
            let arena = Arc::clone(&self.arena);
            let window = self.window;
            tokio::spawn(async move {
                arena.drive(window, key, dispatch).await;
            });
        }

        rx.recv().await.ok()
    }
}

impl<K, V, R> Arena<K, V, R>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
    R: Clone + Send + 'static,
{
    /// Driver for one window: sleep it out, serialize with any in-flight
    /// call for the same key, then dispatch the latest value exactly once.
    async fn drive<F, Fut>(self: Arc<Self>, window: Duration, key: K, dispatch: F)
    where
        F: FnOnce(V) -> Fut + Send,
        Fut: Future<Output = R> + Send,
    {
        tokio::time::sleep(window).await;

        let gate = self.gate(&key);
        let _in_flight = gate.lock().await;

        // Callers can keep superseding the value right up to this point;
        // once the slot is gone they open a fresh window instead.
        let Some(slot) = self.slots.lock().remove(&key) else {
            return;
        };

        let result = dispatch(slot.value).await;
        let _ = slot.outcome.send(result);
    }

    fn gate(&self, key: &K) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.gates.lock().entry(key.clone()).or_default())
    }
}
