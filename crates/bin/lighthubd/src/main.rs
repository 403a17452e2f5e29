//! # lighthubd — lighthub daemon
//!
//! Composition root that wires the controller, storage and device buses
//! together and runs until interrupted.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Construct the JSON storage adapter and the controller
//! - Attach device buses (the virtual bus when enabled)
//! - Start the minute-tick schedule runner
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod ui;

use std::sync::Arc;

use lighthub_adapter_storage_json::JsonFileStorage;
use lighthub_adapter_virtual::VirtualBus;
use lighthub_app::controller::Controller;
use lighthub_app::ports::{DeviceBusContext, SystemClock};
use lighthub_app::scheduler::ScheduleRunner;
use lighthub_app::services::ServiceContext;
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::ui::LogUserInterface;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Storage and controller
    let storage = JsonFileStorage::new(config.storage.data_path.clone());
    info!(path = %storage.path().display(), "using runtime data file");
    let controller = Arc::new(
        Controller::new(storage, LogUserInterface, ServiceContext::current())
            .with_open_network_seconds(config.network.open_network_seconds),
    );

    // Device buses
    let virtual_bus = if config.integrations.virtual_enabled {
        let context: Arc<dyn DeviceBusContext> = controller.clone();
        let bus = Arc::new(VirtualBus::with_demo_devices(&context, Handle::current()));
        controller.add_bus(bus.clone());
        bus.start();
        Some(bus)
    } else {
        None
    };

    // Schedules
    let schedules = ScheduleRunner::new(controller.clone(), SystemClock).spawn();

    info!("lighthubd running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    info!("shutting down");
    schedules.stop().await;
    controller.shutdown();
    drop(virtual_bus);

    Ok(())
}
