//! End-to-end tests for the full lighthubd stack.
//!
//! Each test wires the real controller, the virtual device bus and the JSON
//! file storage (in a fresh temp directory) and drives it through simulated
//! device messages — no external transport is involved.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use lighthub_adapter_storage_json::JsonFileStorage;
use lighthub_adapter_virtual::VirtualBus;
use lighthub_app::controller::Controller;
use lighthub_app::ports::{Clock, Device, DeviceBusContext, UserInterface};
use lighthub_app::scheduler::ScheduleRunner;
use lighthub_app::services::ServiceContext;
use lighthub_domain::fields::fields;
use lighthub_domain::option::ServiceOptionValue;
use lighthub_domain::route::EventRoute;
use lighthub_domain::schedule::{DeviceScheduleEntry, ScheduleTrigger, TimeOfDay};
use lighthub_domain::time::LocalTime;
use tokio::runtime::Handle;

struct SilentUi;

impl UserInterface for SilentUi {
    fn device_list_updated(&self) {}

    fn device_status_updated(&self, _address: &str, _status: &BTreeMap<String, String>) {}

    fn device_options_updated(&self, _address: &str) {}

    fn network_open_status(&self, _open: bool, _seconds: u32) {}
}

type Hub = Arc<Controller<JsonFileStorage, SilentUi>>;

fn data_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("lighthubd-{}", uuid::Uuid::new_v4()))
        .join("data.json")
}

/// Build a controller on `path` with the demo virtual bus attached and started.
fn start(path: &Path) -> (Hub, Arc<VirtualBus>) {
    let controller = Arc::new(Controller::new(
        JsonFileStorage::new(path),
        SilentUi,
        ServiceContext::current(),
    ));
    let context: Arc<dyn DeviceBusContext> = controller.clone();
    let bus = Arc::new(VirtualBus::with_demo_devices(&context, Handle::current()));
    controller.add_bus(bus.clone());
    bus.start();
    (controller, bus)
}

// 2026-10-12 is a Monday.
fn monday_at(hour: u32, minute: u32, second: u32) -> LocalTime {
    NaiveDate::from_ymd_opt(2026, 10, 12)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

/// Wall clock the test moves by hand.
struct ManualClock(Mutex<LocalTime>);

impl ManualClock {
    fn set(&self, time: LocalTime) {
        *self.0.lock().unwrap() = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> LocalTime {
        *self.0.lock().unwrap()
    }
}

#[tokio::test(start_paused = true)]
async fn should_discover_every_demo_device() {
    let (controller, bus) = start(&data_path());
    assert_eq!(controller.get_device_list().len(), bus.devices().len());
}

#[tokio::test(start_paused = true)]
async fn should_toggle_routed_lamp_on_each_button_press() {
    let (controller, bus) = start(&data_path());
    let lamp = bus.device("virtual:pi5").unwrap();

    controller
        .set_device_options(
            "virtual:button",
            "",
            vec![EventRoute::new("Single", "virtual:pi5", "Toggle on/off")],
            vec![],
            vec![],
        )
        .await
        .unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        bus.emit("virtual:button", fields([("action", "single")]))
            .unwrap();
        seen.push(lamp.state().brightness);
    }

    assert_eq!(seen, vec![32767, 0, 32767]);
}

#[tokio::test(start_paused = true)]
async fn should_merge_echoed_state_into_device_status() {
    let (controller, bus) = start(&data_path());
    controller
        .set_device_options(
            "virtual:knob",
            "",
            vec![EventRoute::new("Press", "virtual:plug", "Toggle on/off")],
            vec![],
            vec![],
        )
        .await
        .unwrap();

    bus.emit("virtual:knob", fields([("action", "toggle")]))
        .unwrap();
    tokio::task::yield_now().await;

    let status = controller.try_get_device_status("virtual:plug").unwrap();
    assert_eq!(status.get("State").map(String::as_str), Some("On"));
}

#[tokio::test(start_paused = true)]
async fn should_restore_configuration_after_restart() {
    let path = data_path();
    let route = EventRoute::new("Double", "virtual:plug", "Toggle on/off");
    {
        let (controller, _bus) = start(&path);
        controller
            .set_device_options(
                "virtual:button",
                "",
                vec![route.clone()],
                vec![],
                vec![],
            )
            .await
            .unwrap();
        controller
            .set_device_options(
                "virtual:plug",
                "",
                vec![],
                vec![],
                vec![ServiceOptionValue::new("Power outage memory", "Restore")],
            )
            .await
            .unwrap();
        controller.shutdown();
    }

    let (controller, bus) = start(&path);

    assert_eq!(controller.get_routing_for("virtual:button"), vec![route]);
    let plug = bus.device("virtual:plug").unwrap();
    assert_eq!(
        plug.state().commands,
        vec![fields([("power_outage_memory", "restore")])]
    );
}

#[tokio::test(start_paused = true)]
async fn should_fire_schedule_once_per_matching_minute() {
    let (controller, bus) = start(&data_path());
    let schedule = DeviceScheduleEntry {
        event_type: "Turn on/off".to_string(),
        parameters: [("Mode".to_string(), "Turn on".to_string())].into(),
        trigger: ScheduleTrigger::new([0], TimeOfDay::new(6, 45)),
    };
    let rejected = controller
        .set_device_options("virtual:dimmer", "", vec![], vec![schedule], vec![])
        .await
        .unwrap();
    assert!(rejected.is_empty());

    let clock = Arc::new(ManualClock(Mutex::new(monday_at(6, 44, 10))));
    let mut runner = ScheduleRunner::new(controller.clone(), clock.clone());
    let mut fired = vec![runner.tick()];
    for second in [0, 1, 30, 59] {
        clock.set(monday_at(6, 45, second));
        fired.push(runner.tick());
    }
    clock.set(monday_at(6, 46, 0));
    fired.push(runner.tick());

    assert_eq!(fired, vec![0, 1, 0, 0, 0, 0]);
    assert_eq!(bus.device("virtual:dimmer").unwrap().state().brightness, 254);
}

#[tokio::test(start_paused = true)]
async fn should_reject_schedule_for_action_the_device_lacks() {
    let path = data_path();
    let (controller, _bus) = start(&path);
    let schedule = DeviceScheduleEntry {
        event_type: "Fade to brightness".to_string(),
        parameters: [
            ("Brightness".to_string(), "0.4".to_string()),
            ("Duration".to_string(), "15".to_string()),
        ]
        .into(),
        trigger: ScheduleTrigger::new([0, 1, 2, 3, 4], TimeOfDay::new(7, 0)),
    };

    let rejected = controller
        .set_device_options("virtual:button", "", vec![], vec![schedule], vec![])
        .await
        .unwrap();

    assert_eq!(rejected.schedule.len(), 1);
    assert!(JsonFileStorage::new(&path).read().unwrap().schedules.is_empty());
}

#[tokio::test(start_paused = true)]
async fn should_rename_device_through_bus() {
    let (controller, _bus) = start(&data_path());

    controller
        .set_device_options("virtual:cct", "Desk light", vec![], vec![], vec![])
        .await
        .unwrap();
    tokio::task::yield_now().await;

    let device = controller.get_device("virtual:cct").unwrap();
    assert_eq!(device.name(), "Desk light");
}
