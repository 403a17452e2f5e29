use lighthub_domain::status::{Conversion, StatusConverter};

use super::ProfileRegistry;
use crate::collection::DeviceServiceCollection;
use crate::services::SingleButtonService;

pub(super) fn register(registry: &mut ProfileRegistry) {
    registry.register("eWeLink", "WB01", |_, _| {
        DeviceServiceCollection::new("eWeLink WB01")
            .with_service(SingleButtonService::new("single", "double", "long"))
            .with_status(
                StatusConverter::new()
                    .with("linkquality", "Link quality", Conversion::Identity)
                    .with("battery", "Battery", Conversion::Percent)
                    .with("voltage", "Voltage", Conversion::MilliToUnit("V")),
            )
    });
}
