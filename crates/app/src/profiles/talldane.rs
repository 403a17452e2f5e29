//! Raspberry Pi PWM light driver.

use lighthub_domain::status::{Conversion, StatusConverter};

use super::ProfileRegistry;
use crate::collection::DeviceServiceCollection;
use crate::services::DimmableLightService;

/// 15-bit PWM duty cycle.
const MAX_RAW_BRIGHTNESS: i64 = 32767;

pub(super) fn register(registry: &mut ProfileRegistry) {
    registry.register("TallDane", "Pi5", |device, context| {
        DeviceServiceCollection::new("TallDane Pi5")
            .with_service(DimmableLightService::new(
                device.clone(),
                MAX_RAW_BRIGHTNESS,
                context,
            ))
            .with_status(StatusConverter::new().with(
                "brightness",
                "Brightness",
                Conversion::Identity,
            ))
    });
}
