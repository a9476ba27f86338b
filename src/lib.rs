// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `PoolMath` Lib - A Rust library to control pool automation controllers.
//!
//! This library bridges networked pool-equipment controllers (exposing a
//! small HTTP status/control API) to smart-home integrations. It maintains
//! an authoritative status snapshot per controller, applies control
//! operations optimistically with rollback on failure, coalesces rapid
//! repeated writes, and notifies observers only on genuine state change.
//!
//! # Supported Features
//!
//! - **Status polling**: periodic `/status` (or legacy `/info`) refreshes
//!   fed through a replace-and-diff reconciliation path
//! - **Pump control**: program selection
//! - **Heater control**: on/off (current firmware) or numeric mode (legacy)
//! - **Thermostat**: target temperature (current firmware)
//! - **Salt-water chlorine generator**: duty percentage, cycle telemetry
//! - **Change events**: one broadcast event per actual snapshot change
//!
//! # Supported Controllers
//!
//! - Meadow (current generation): `/status`, path-encoded controls
//! - Poolduino (legacy generation): `/info`, query-encoded controls
//!
//! # Quick Start
//!
//! ```no_run
//! use poolmath_lib::{Controller, ControllerConfig};
//!
//! #[tokio::main]
//! async fn main() -> poolmath_lib::Result<()> {
//!     let config = ControllerConfig::new("192.168.1.40", 8080);
//!     let controller = Controller::meadow(&config)?;
//!
//!     // Watch for genuine state changes
//!     let mut events = controller.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("pool update: {:?}", event.status());
//!         }
//!     });
//!
//!     // Poll the device every update interval
//!     controller.start_polling();
//!
//!     // Control operations are optimistic and debounced; the returned
//!     // snapshot is the device's authoritative state after the change.
//!     let status = controller.set_pump_program(2).await?;
//!     println!("pump now running program {}", status.pump);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Multiple Controllers
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
//!     manager.register(Controller::meadow(&ControllerConfig::new("192.168.1.40", 8080))?);
//!     manager.register(Controller::meadow(&ControllerConfig::new("192.168.1.41", 8080))?);
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{}: {:?}", event.key(), event.status());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod command;
mod controller;
pub mod error;
pub mod event;
pub mod manager;
pub mod status;

pub use client::{DeviceClient, MeadowClient, PoolduinoClient};
pub use command::{Control, ControlFamily, MeadowControl, PoolduinoControl};
pub use controller::{Controller, ControllerConfig};
pub use error::{DecodeError, Error, Result, TransportError};
pub use event::{ControllerEvent, ControllerKey, EventBus};
pub use status::{MeadowStatus, PoolduinoStatus, StatusModel};
