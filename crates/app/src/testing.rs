//! In-memory fakes shared by the unit tests of this crate.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lighthub_domain::error::HubError;
use lighthub_domain::fields::Fields;
use lighthub_domain::runtime_data::RunTimeData;
use lighthub_domain::time::LocalTime;

use crate::ports::{Clock, DataStorage, Device, DeviceBus, UserInterface};

/// Something a [`RecordingDevice`] was asked to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Command(Fields),
    Brightness(i64, f64),
    ColorTemp(i64, f64),
    State(bool),
}

pub struct RecordingDevice {
    address: String,
    vendor: String,
    model: String,
    name: Mutex<String>,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingDevice {
    pub fn new(address: &str, vendor: &str, model: &str) -> Arc<Self> {
        Arc::new(Self {
            address: address.to_string(),
            vendor: vendor.to_string(),
            model: model.to_string(),
            name: Mutex::new(address.to_string()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn take_sent(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn brightness_values(&self) -> Vec<i64> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Brightness(raw, _) => Some(raw),
                _ => None,
            })
            .collect()
    }

    pub fn last_brightness(&self) -> Option<i64> {
        self.brightness_values().last().copied()
    }
}

impl Device for RecordingDevice {
    fn address(&self) -> &str {
        &self.address
    }

    fn vendor(&self) -> &str {
        &self.vendor
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn description(&self) -> &str {
        "recording test device"
    }

    fn battery_powered(&self) -> bool {
        false
    }

    fn name(&self) -> String {
        self.name.lock().unwrap().clone()
    }

    fn send_command(&self, data: Fields) {
        self.sent.lock().unwrap().push(Sent::Command(data));
    }

    fn send_brightness_transition(&self, brightness: i64, transition_secs: f64) {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Brightness(brightness, transition_secs));
    }

    fn send_color_temp_transition(&self, color_temp: i64, transition_secs: f64) {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::ColorTemp(color_temp, transition_secs));
    }

    fn send_state_change(&self, on: bool) {
        self.sent.lock().unwrap().push(Sent::State(on));
    }

    fn set_name(&self, name: &str) {
        *self.name.lock().unwrap() = name.to_string();
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    pub initial: RunTimeData,
    pub saved: Mutex<Vec<RunTimeData>>,
    pub fail_saves: bool,
    /// Delay applied to the next save only.
    pub slow_next_save: Mutex<Option<Duration>>,
}

impl InMemoryStorage {
    pub fn with(initial: RunTimeData) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    pub fn last_saved(&self) -> Option<RunTimeData> {
        self.saved.lock().unwrap().last().cloned()
    }
}

impl DataStorage for InMemoryStorage {
    fn load(&self) -> RunTimeData {
        self.initial.clone()
    }

    fn save(&self, data: RunTimeData) -> impl Future<Output = Result<(), HubError>> + Send {
        let delay = self.slow_next_save.lock().unwrap().take();
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_saves {
                return Err(HubError::Storage("disk full".into()));
            }
            self.saved.lock().unwrap().push(data);
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    DeviceList,
    Status(String, BTreeMap<String, String>),
    Options(String),
    Network(bool, u32),
}

#[derive(Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl UserInterface for RecordingUi {
    fn device_list_updated(&self) {
        self.events.lock().unwrap().push(UiEvent::DeviceList);
    }

    fn device_status_updated(&self, address: &str, status: &BTreeMap<String, String>) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Status(address.to_string(), status.clone()));
    }

    fn device_options_updated(&self, address: &str) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Options(address.to_string()));
    }

    fn network_open_status(&self, open: bool, seconds: u32) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Network(open, seconds));
    }
}

#[derive(Default)]
pub struct RecordingBus {
    pub requests: Mutex<Vec<u32>>,
}

impl DeviceBus for RecordingBus {
    fn name(&self) -> &str {
        "recording"
    }

    fn request_open_network(&self, seconds: u32) {
        self.requests.lock().unwrap().push(seconds);
    }
}

pub struct FixedClock(pub Mutex<LocalTime>);

impl FixedClock {
    pub fn at(time: LocalTime) -> Self {
        Self(Mutex::new(time))
    }

    pub fn set(&self, time: LocalTime) {
        *self.0.lock().unwrap() = time;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> LocalTime {
        *self.0.lock().unwrap()
    }
}
