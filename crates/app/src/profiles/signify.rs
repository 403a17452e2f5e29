use lighthub_domain::status::{Conversion, StatusConverter};

use super::ProfileRegistry;
use crate::collection::DeviceServiceCollection;
use crate::services::DimmableLightService;

pub(super) fn register(registry: &mut ProfileRegistry) {
    registry.register("Signify Netherlands B.V.", "LWE007", |device, context| {
        DeviceServiceCollection::new("Signify LWE007")
            .with_service(DimmableLightService::new(device.clone(), 254, context))
            .with_status(
                StatusConverter::new()
                    .with("linkquality", "Link quality", Conversion::Identity)
                    .with("brightness", "Brightness", Conversion::Identity)
                    .with("state", "State", Conversion::Bool),
            )
    });
}
