// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `AlarmPanel` Lib - A Rust library to monitor and control alarm panels.
//!
//! This library talks to the embedded web server of an alarm panel: it
//! logs in with a user PIN, polls the status of an area, and turns the
//! polled status into change notifications.
//!
//! # Supported Features
//!
//! - **Session handling**: Form login, single-flight re-login on expiry
//! - **Status queries**: Arming mode of an area, open/closed state of a zone
//! - **Key functions**: Send raw key functions to an area
//! - **Monitoring**: Fixed-interval polling with change, pulse and fault callbacks
//!
//! # Quick Start
//!
//! ## One-off Status Query
//!
//! ```no_run
//! use alarmpanel_lib::{PanelConfig, Pin};
//!
//! #[tokio::main]
//! async fn main() -> alarmpanel_lib::Result<()> {
//!     let client = PanelConfig::new("192.168.1.20", "installer", Pin::new("1234")?)
//!         .into_client()?;
//!
//!     let status = client.status(0).await?;
//!     println!("area 0 is {}", status.area_mode());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Monitoring with Callbacks
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use alarmpanel_lib::subscription::Subscribable;
//! use alarmpanel_lib::{Monitor, MonitorConfig, PanelConfig, Pin, ZoneConfig, ZoneNumber};
//!
//! #[tokio::main]
//! async fn main() -> alarmpanel_lib::Result<()> {
//!     let client = PanelConfig::new("192.168.1.20", "installer", Pin::new("1234")?)
//!         .into_client()?;
//!     let config = MonitorConfig::new(0).with_door_zone(ZoneConfig::new(ZoneNumber::new(3)?));
//!
//!     let handle = Monitor::from_config(Arc::new(client), &config).spawn();
//!
//!     handle.on_state_changed(|change| println!("{change}"));
//!     handle.on_pulse(|key, active| println!("pulse {key}: {active}"));
//!     handle.on_fault_changed(|faulted| println!("fault: {faulted}"));
//!
//!     tokio::time::sleep(Duration::from_secs(60)).await;
//!     handle.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod decoder;
pub mod error;
pub mod monitor;
pub mod protocol;
pub mod pulse;
pub mod reconciler;
pub mod response;
pub mod session;
pub mod state;
pub mod subscription;
pub mod types;

pub use error::{Error, ProtocolError, Result, ValueError};
pub use monitor::{Monitor, MonitorConfig, MonitorHandle};
pub use protocol::{PanelApi, PanelConfig, ProtocolClient};
pub use reconciler::{PollOutcome, PollPhase, StateReconciler};
pub use response::{CommandResult, PanelResponse, Status};
pub use session::{Session, SessionStore};
pub use state::StateChange;
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{AreaMode, Pin, ZoneConfig, ZoneNumber};
