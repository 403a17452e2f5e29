use lighthub_domain::status::{Conversion, StatusConverter};

use super::ProfileRegistry;
use crate::collection::DeviceServiceCollection;
use crate::services::{CctLightService, DimmableLightService};

const VENDOR: &str = "ENVILAR";

fn light_status() -> StatusConverter {
    StatusConverter::new()
        .with("linkquality", "Link quality", Conversion::Identity)
        .with("brightness", "Brightness", Conversion::Identity)
        .with("state", "State", Conversion::Bool)
}

pub(super) fn register(registry: &mut ProfileRegistry) {
    registry.register(VENDOR, "HK-ZD-DIM-A", |device, context| {
        DeviceServiceCollection::new("ENVILAR HK-ZD-DIM-A")
            .with_service(DimmableLightService::new(device.clone(), 254, context))
            .with_status(light_status())
    });
    registry.register(VENDOR, "HK-ZD-CCT-A", |device, context| {
        DeviceServiceCollection::new("ENVILAR HK-ZD-CCT-A")
            .with_service(CctLightService::new(device.clone(), 254, (153, 370), context))
            .with_status(light_status().with(
                "color_temp",
                "Color temperature",
                Conversion::InverseColorTemp,
            ))
    });
}
