// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change-notification types for controllers.
//!
//! A controller publishes exactly one kind of event: its status snapshot
//! was replaced with one that structurally differs from the previous one.
//! Observers subscribe through the [`EventBus`] and unsubscribe by dropping
//! their receiver.
//!
//! # Examples
//!
//! ```
//! use poolmath_lib::event::{ControllerEvent, ControllerKey, EventBus};
//! use poolmath_lib::status::MeadowStatus;
//!
//! let bus: EventBus<ControllerEvent<MeadowStatus>> = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let key = ControllerKey::new("192.168.1.40", 8080);
//! bus.publish(ControllerEvent::status_updated(
//!     key,
//!     MeadowStatus::initial("192.168.1.40", 8080),
//! ));
//! ```

mod controller_event;
mod controller_key;
mod event_bus;

pub use controller_event::ControllerEvent;
pub use controller_key::ControllerKey;
pub use event_bus::EventBus;
