//! Device profile registry — builds the service collection for a
//! discovered device from its vendor and model.

mod envilar;
mod ewelink;
mod signify;
mod talldane;
mod tuya;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::collection::DeviceServiceCollection;
use crate::ports::Device;
use crate::services::ServiceContext;

/// Builds the collection for one vendor/model.
pub type ProfileFactory = fn(&Arc<dyn Device>, &ServiceContext) -> DeviceServiceCollection;

/// Static `vendor -> model -> factory` table.
pub struct ProfileRegistry {
    factories: HashMap<String, HashMap<String, ProfileFactory>>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// A registry without any profile.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// All supported devices.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        ewelink::register(&mut registry);
        envilar::register(&mut registry);
        signify::register(&mut registry);
        talldane::register(&mut registry);
        tuya::register(&mut registry);
        registry
    }

    pub fn register(&mut self, vendor: &str, model: &str, factory: ProfileFactory) {
        self.factories
            .entry(vendor.to_string())
            .or_default()
            .insert(model.to_string(), factory);
    }

    #[must_use]
    pub fn supports(&self, vendor: &str, model: &str) -> bool {
        self.factory(vendor, model).is_some()
    }

    fn factory(&self, vendor: &str, model: &str) -> Option<ProfileFactory> {
        self.factories.get(vendor)?.get(model).copied()
    }

    /// Build the collection for `device`; unknown devices get an empty one.
    pub fn build(&self, device: &Arc<dyn Device>, context: &ServiceContext) -> DeviceServiceCollection {
        let Some(factory) = self.factory(device.vendor(), device.model()) else {
            warn!(
                address = device.address(),
                vendor = device.vendor(),
                model = device.model(),
                "no profile for device, it will have no services"
            );
            return DeviceServiceCollection::empty();
        };
        let collection = factory(device, context);
        debug!(address = device.address(), profile = collection.profile(), "profile built");
        collection
    }
}
