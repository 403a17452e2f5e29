//! Controller — composition root of the hub core.
//!
//! Owns the four shared tables (devices, routes, schedules, option values),
//! each behind its own reader/writer lock. No code path holds two of these
//! locks at once: every operation snapshots what it needs from one table,
//! releases it, then moves on to the next. Saves are serialized so the last
//! save to finish always carries the newest tables.
//!
//! The controller receives bus notifications through [`DeviceBusContext`],
//! runs scheduled actions through [`ScheduleExecutor`], and exposes the
//! query/mutation surface used by the presentation layer.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lighthub_domain::action::ConsumableAction;
use lighthub_domain::error::{HubError, NotFoundError, ValidationError};
use lighthub_domain::event::{InternalEvent, RoutingOptions};
use lighthub_domain::fields::Fields;
use lighthub_domain::option::{PreviewMode, ServiceOption, ServiceOptionValue};
use lighthub_domain::route::EventRoute;
use lighthub_domain::runtime_data::RunTimeData;
use lighthub_domain::schedule::DeviceScheduleEntry;
use lighthub_domain::time::LocalTime;
use tracing::{debug, error, info, warn};

use crate::collection::DeviceServiceCollection;
use crate::ports::{DataStorage, Device, DeviceBus, DeviceBusContext, UserInterface};
use crate::profiles::ProfileRegistry;
use crate::router::{self, RouteTable};
use crate::scheduler::ScheduleExecutor;
use crate::services::ServiceContext;

/// Default pairing window, the longest most coordinators accept.
pub const DEFAULT_OPEN_NETWORK_SECONDS: u32 = 254;

/// Per-device state kept by the controller.
#[derive(Clone)]
pub struct DeviceInfo {
    pub device: Arc<dyn Device>,
    /// Merged display status from every message seen.
    pub status: BTreeMap<String, String>,
    pub services: Arc<DeviceServiceCollection>,
}

/// Entries dropped by [`Controller::set_device_options`] because they failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejected {
    pub routes: Vec<EventRoute>,
    pub schedule: Vec<DeviceScheduleEntry>,
    pub option_values: Vec<ServiceOptionValue>,
}

impl Rejected {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.schedule.is_empty() && self.option_values.is_empty()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(address: &str) -> HubError {
    NotFoundError {
        entity: "Device",
        id: address.to_string(),
    }
    .into()
}

pub struct Controller<S, U> {
    storage: S,
    ui: U,
    profiles: ProfileRegistry,
    context: ServiceContext,
    open_network_seconds: u32,
    buses: RwLock<Vec<Arc<dyn DeviceBus>>>,
    devices: RwLock<HashMap<String, DeviceInfo>>,
    routes: RwLock<RouteTable>,
    schedules: RwLock<HashMap<String, Vec<DeviceScheduleEntry>>>,
    option_values: RwLock<HashMap<String, Vec<ServiceOptionValue>>>,
    save_lock: tokio::sync::Mutex<()>,
    unknown_senders: Mutex<HashSet<String>>,
}

impl<S: DataStorage, U: UserInterface> Controller<S, U> {
    /// Create a controller with the built-in profiles and the stored runtime data.
    pub fn new(storage: S, ui: U, context: ServiceContext) -> Self {
        let data = storage.load();
        info!(
            routes = data.routes.len(),
            schedules = data.schedules.len(),
            option_values = data.service_option_values.len(),
            "runtime data loaded"
        );
        Self {
            storage,
            ui,
            profiles: ProfileRegistry::builtin(),
            context,
            open_network_seconds: DEFAULT_OPEN_NETWORK_SECONDS,
            buses: RwLock::new(Vec::new()),
            devices: RwLock::new(HashMap::new()),
            routes: RwLock::new(data.routes.into_iter().collect()),
            schedules: RwLock::new(data.schedules.into_iter().collect()),
            option_values: RwLock::new(data.service_option_values.into_iter().collect()),
            save_lock: tokio::sync::Mutex::new(()),
            unknown_senders: Mutex::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn with_open_network_seconds(mut self, seconds: u32) -> Self {
        self.open_network_seconds = seconds;
        self
    }

    /// Register a bus for [`Self::request_open_network`].
    pub fn add_bus(&self, bus: Arc<dyn DeviceBus>) {
        info!(bus = bus.name(), "device bus attached");
        write(&self.buses).push(bus);
    }

    /// Known devices, ordered by address.
    pub fn get_device_list(&self) -> Vec<Arc<dyn Device>> {
        let mut devices: Vec<Arc<dyn Device>> = read(&self.devices)
            .values()
            .map(|info| info.device.clone())
            .collect();
        devices.sort_by(|a, b| a.address().cmp(b.address()));
        devices
    }

    pub fn get_device(&self, address: &str) -> Option<Arc<dyn Device>> {
        read(&self.devices).get(address).map(|info| info.device.clone())
    }

    /// The merged status of a known device.
    pub fn try_get_device_status(&self, address: &str) -> Option<BTreeMap<String, String>> {
        read(&self.devices).get(address).map(|info| info.status.clone())
    }

    fn services_for(&self, address: &str) -> Result<Arc<DeviceServiceCollection>, HubError> {
        read(&self.devices)
            .get(address)
            .map(|info| info.services.clone())
            .ok_or_else(|| not_found(address))
    }

    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] for an unknown address.
    pub fn get_routing_options_for(&self, address: &str) -> Result<RoutingOptions, HubError> {
        Ok(self.services_for(address)?.routing_options())
    }

    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] for an unknown address.
    pub fn get_consumable_actions_for(&self, address: &str) -> Result<Vec<ConsumableAction>, HubError> {
        Ok(self.services_for(address)?.consumable_actions())
    }

    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] for an unknown address.
    pub fn get_service_options_for(&self, address: &str) -> Result<Vec<ServiceOption>, HubError> {
        Ok(self.services_for(address)?.service_options())
    }

    pub fn get_routing_for(&self, address: &str) -> Vec<EventRoute> {
        read(&self.routes).get(address).cloned().unwrap_or_default()
    }

    pub fn get_schedule_for(&self, address: &str) -> Vec<DeviceScheduleEntry> {
        read(&self.schedules).get(address).cloned().unwrap_or_default()
    }

    pub fn get_option_values_for(&self, address: &str) -> Vec<ServiceOptionValue> {
        read(&self.option_values)
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the routes, schedule and option values of a device, then persist.
    ///
    /// Entries that fail validation are dropped (and returned) rather than
    /// failing the call. A non-empty `name` different from the current one
    /// is forwarded to the bus as a rename request.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] for an unknown address, or the storage
    /// error if saving fails. The in-memory tables are updated either way.
    #[tracing::instrument(skip(self, routes, schedule, option_values))]
    pub async fn set_device_options(
        &self,
        address: &str,
        name: &str,
        routes: Vec<EventRoute>,
        schedule: Vec<DeviceScheduleEntry>,
        option_values: Vec<ServiceOptionValue>,
    ) -> Result<Rejected, HubError> {
        let (device, services) = {
            let devices = read(&self.devices);
            let info = devices.get(address).ok_or_else(|| not_found(address))?;
            (info.device.clone(), info.services.clone())
        };

        let name = name.trim();
        if !name.is_empty() && name != device.name() {
            info!(name, "renaming device");
            device.set_name(name);
        }

        let mut rejected = Rejected::default();
        let provided = services.provided_events();
        let routes: Vec<EventRoute> = routes
            .into_iter()
            .filter_map(|route| {
                let check = route.validate().and_then(|()| {
                    if provided.iter().any(|event| event.name == route.source_event) {
                        Ok(())
                    } else {
                        Err(ValidationError::UnknownSourceEvent(route.source_event.clone()))
                    }
                });
                match check {
                    Ok(()) => Some(route),
                    Err(err) => {
                        warn!(route = %route, error = %err, "rejecting route");
                        rejected.routes.push(route);
                        None
                    }
                }
            })
            .collect();

        let actions = services.consumable_actions();
        let schedule: Vec<DeviceScheduleEntry> = schedule
            .into_iter()
            .filter_map(|entry| match entry.validate(&actions) {
                Ok(()) => Some(entry),
                Err(err) => {
                    warn!(entry = %entry, error = %err, "rejecting schedule entry");
                    rejected.schedule.push(entry);
                    None
                }
            })
            .collect();

        let option_values: Vec<ServiceOptionValue> = option_values
            .into_iter()
            .filter_map(|value| match services.validate_option_value(&value) {
                Ok(()) => Some(value),
                Err(err) => {
                    warn!(option = %value.name, value = %value.value, error = %err, "rejecting option value");
                    rejected.option_values.push(value);
                    None
                }
            })
            .collect();

        replace(&self.routes, address, routes);
        replace(&self.schedules, address, schedule);
        replace(&self.option_values, address, option_values.clone());
        services.set_service_option_values(&option_values);

        self.ui.device_options_updated(address);

        if let Err(err) = self.save().await {
            error!(error = %err, "failed to save runtime data");
            return Err(err);
        }
        Ok(rejected)
    }

    async fn save(&self) -> Result<(), HubError> {
        let _guard = self.save_lock.lock().await;
        self.storage.save(self.snapshot()).await
    }

    /// Current routes, schedules and option values, for persistence.
    pub fn snapshot(&self) -> RunTimeData {
        let routes = read(&self.routes)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let schedules = read(&self.schedules)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let service_option_values = read(&self.option_values)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        RunTimeData {
            routes,
            schedules,
            service_option_values,
        }
    }

    /// Preview an option value on a live device, or end the preview.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] for an unknown address.
    #[tracing::instrument(skip(self))]
    pub fn preview_device_option(&self, address: &str, value: &str, mode: PreviewMode) -> Result<(), HubError> {
        self.services_for(address)?.preview_option(value, mode);
        Ok(())
    }

    /// Ask every attached bus to accept new devices.
    pub fn request_open_network(&self) {
        let buses: Vec<Arc<dyn DeviceBus>> = read(&self.buses).clone();
        for bus in buses {
            debug!(bus = bus.name(), seconds = self.open_network_seconds, "requesting open network");
            bus.request_open_network(self.open_network_seconds);
        }
    }

    /// Disarm the background work of every device service.
    pub fn shutdown(&self) {
        let services: Vec<Arc<DeviceServiceCollection>> = read(&self.devices)
            .values()
            .map(|info| info.services.clone())
            .collect();
        for collection in services {
            collection.shutdown();
        }
        info!("controller shut down");
    }

    fn route_events(&self, events: &[InternalEvent]) {
        let matches = {
            let routes = read(&self.routes);
            router::match_routes(events, &routes)
        };
        if matches.is_empty() {
            return;
        }
        let dispatches = {
            let devices = read(&self.devices);
            router::resolve_targets(matches, |address| {
                devices.get(address).map(|info| info.services.clone())
            })
        };
        router::dispatch(dispatches);
    }
}

impl<S, U> Controller<S, U> {
    /// `true` the first time `address` is seen sending without being known.
    fn remember_unknown_sender(&self, address: &str) -> bool {
        self.unknown_senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.to_string())
    }
}

fn replace<T>(table: &RwLock<HashMap<String, Vec<T>>>, address: &str, entries: Vec<T>) {
    let mut table = write(table);
    if entries.is_empty() {
        table.remove(address);
    } else {
        table.insert(address.to_string(), entries);
    }
}

impl<S: DataStorage, U: UserInterface> DeviceBusContext for Controller<S, U> {
    #[tracing::instrument(skip_all, fields(address = device.address()))]
    fn device_discovered(&self, device: Arc<dyn Device>) {
        let address = device.address().to_string();
        if read(&self.devices).contains_key(&address) {
            debug!("device already known");
            return;
        }

        let services = self.profiles.build(&device, &self.context);
        let values = self.get_option_values_for(&address);
        services.set_service_option_values(&values);

        let services = Arc::new(services);
        let inserted = {
            let mut devices = write(&self.devices);
            if devices.contains_key(&address) {
                false
            } else {
                devices.insert(
                    address.clone(),
                    DeviceInfo {
                        device: device.clone(),
                        status: BTreeMap::new(),
                        services: services.clone(),
                    },
                );
                true
            }
        };
        if !inserted {
            services.shutdown();
            return;
        }

        info!(
            vendor = device.vendor(),
            model = device.model(),
            profile = services.profile(),
            description = device.description(),
            "device discovered"
        );
        self.ui.device_list_updated();
    }

    fn device_updated(&self, device: Arc<dyn Device>) {
        let known = {
            let mut devices = write(&self.devices);
            match devices.get_mut(device.address()) {
                Some(info) => {
                    info.device = device.clone();
                    true
                }
                None => false,
            }
        };
        if known {
            debug!(address = device.address(), name = %device.name(), "device updated");
            self.ui.device_list_updated();
        } else {
            self.device_discovered(device);
        }
    }

    fn device_action(&self, device: &dyn Device, data: Fields) {
        let address = device.address();
        let (services, status) = {
            let mut devices = write(&self.devices);
            let Some(info) = devices.get_mut(address) else {
                drop(devices);
                if self.remember_unknown_sender(address) {
                    warn!(address, "message from unknown device");
                } else {
                    debug!(address, "message from unknown device");
                }
                return;
            };
            let update = info.services.extract_status(&data);
            let mut changed = false;
            for (key, value) in update {
                if info.status.get(&key) != Some(&value) {
                    info.status.insert(key, value);
                    changed = true;
                }
            }
            (info.services.clone(), changed.then(|| info.status.clone()))
        };
        if let Some(status) = status {
            self.ui.device_status_updated(address, &status);
        }

        let events = services.process_external_event(device, &data);
        if !events.is_empty() {
            self.route_events(&events);
        }
    }

    fn network_open_status(&self, open: bool, seconds: u32) {
        info!(open, seconds, "network open status");
        self.ui.network_open_status(open, seconds);
    }
}

impl<S: DataStorage, U: UserInterface> ScheduleExecutor for Controller<S, U> {
    fn run_schedules_at(&self, now: &LocalTime) -> usize {
        let due: Vec<(String, DeviceScheduleEntry)> = read(&self.schedules)
            .iter()
            .flat_map(|(address, entries)| {
                entries
                    .iter()
                    .filter(|entry| entry.trigger.matches(now))
                    .map(move |entry| (address.clone(), entry.clone()))
            })
            .collect();
        if due.is_empty() {
            return 0;
        }

        let targets: Vec<(String, DeviceScheduleEntry, Option<Arc<DeviceServiceCollection>>)> = {
            let devices = read(&self.devices);
            due.into_iter()
                .map(|(address, entry)| {
                    let services = devices.get(&address).map(|info| info.services.clone());
                    (address, entry, services)
                })
                .collect()
        };

        let mut fired = 0;
        for (address, entry, services) in targets {
            let Some(services) = services else {
                warn!(address, entry = %entry, "scheduled device not present, skipping");
                continue;
            };
            if services.process_schedule_action(&entry.event_type, &entry.parameters) {
                info!(address, entry = %entry, "schedule fired");
                fired += 1;
            } else {
                warn!(address, entry = %entry, "scheduled action not available");
            }
        }
        fired
    }
}
