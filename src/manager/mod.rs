// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry for coordinating multiple pool controllers.
//!
//! Deployments with more than one controller register each of them here.
//! The [`ControllerManager`] keys controllers by their `address:port`
//! endpoint, starts each controller's polling loop on registration, and
//! merges every controller's change events into one aggregate stream.
//!
//! # Examples
//!
//! ```no_run
//! use poolmath_lib::manager::ControllerManager;
//! use poolmath_lib::{Controller, ControllerConfig};
//!
//! #[tokio::main]
//! async fn main() -> poolmath_lib::Result<()> {
//!     let manager = ControllerManager::new();
//!     let mut events = manager.subscribe();
//!
//!     let config = ControllerConfig::new("192.168.1.40", 8080);
//!     let key = manager.register(Controller::meadow(&config)?);
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{}: {} degrees", event.key(), event.status().temp);
//!     }
//!
//!     manager.remove(&key);
//!     Ok(())
//! }
//! ```

mod controller_manager;

pub use controller_manager::ControllerManager;
