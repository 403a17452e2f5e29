//! # lighthub-domain
//!
//! Pure domain model for the lighthub home automation hub.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, message fields, time helpers
//! - Define **Internal Events** (normalized push/rotate notifications)
//! - Define **Event Routes** (source event -> target device functionality)
//! - Define **Schedule Entries** (weekday + time-of-day triggers for actions)
//! - Define **Parameters** and the closed set of typed **Actions**
//! - Define **Status conversion** tables and the gamma **Brightness converter**
//! - Define the persisted **Runtime data** root
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod action;
pub mod brightness;
pub mod event;
pub mod fields;
pub mod option;
pub mod param;
pub mod route;
pub mod runtime_data;
pub mod schedule;
pub mod status;
