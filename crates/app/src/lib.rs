//! # lighthub-app
//!
//! Application layer — device services, event routing, scheduling and the
//! controller that ties them together, plus the **port definitions** (traits)
//! that adapters implement.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Device` / `DeviceBus` — a physical device and the network it lives on
//!   - `DeviceBusContext` — the callbacks a bus uses to report devices and messages
//!   - `DataStorage` — load & save routes, schedules and option values
//!   - `UserInterface` — change notifications for the presentation layer
//!   - `Clock` — local wall-clock time
//! - Model what each device model can do as a tree of **device services**
//!   (`services`), assembled per vendor/model by the `profiles` registry
//! - Route internal events from source devices to target services (`router`)
//! - Fire scheduled actions once per minute (`scheduler`)
//! - Hold the shared device, route, schedule and option tables (`controller`)
//!
//! ## Dependency rule
//! Depends on `lighthub-domain` only (plus `tokio` for timers and the schedule task).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod collection;
pub mod controller;
pub mod ports;
pub mod profiles;
pub mod router;
pub mod scheduler;
pub mod services;

#[cfg(test)]
mod testing;
