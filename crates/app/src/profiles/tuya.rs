use lighthub_domain::status::{Conversion, StatusConverter};

use super::ProfileRegistry;
use crate::collection::DeviceServiceCollection;
use crate::services::smart_knob::SmartKnobActions;
use crate::services::{AutoModeChangeService, SmartKnobService, SmartPlugService};

const KNOB_ACTIONS: SmartKnobActions<'static> = SmartKnobActions {
    press: "toggle",
    long_press: "hue_move",
    rotate_left: "brightness_step_down",
    rotate_right: "brightness_step_up",
    pushed_rotate_left: "color_temperature_step_down",
    pushed_rotate_right: "color_temperature_step_up",
    // 12 steps per 30 degree detent
    degrees_per_step: 30.0 / 12.0,
};

pub(super) fn register(registry: &mut ProfileRegistry) {
    registry.register("_TZ3000_qja6nq5z", "TS004F", |_, _| {
        DeviceServiceCollection::new("Tuya TS004F smart knob")
            .with_service(AutoModeChangeService::new("operation_mode", "event", "command"))
            .with_service(SmartKnobService::new(&KNOB_ACTIONS))
            .with_status(
                StatusConverter::new()
                    .with("linkquality", "Link quality", Conversion::Identity)
                    .with("battery", "Battery", Conversion::Percent)
                    .with("voltage", "Voltage", Conversion::MilliToUnit("V")),
            )
    });
    registry.register("_TZ3000_nkcobies", "TS011F", |device, _| {
        DeviceServiceCollection::new("Tuya TS011F smart plug")
            .with_service(SmartPlugService::new(device.clone()))
            .with_status(
                StatusConverter::new()
                    .with("linkquality", "Link quality", Conversion::Identity)
                    .with("state", "State", Conversion::Bool)
                    .with("voltage", "Voltage", Conversion::Suffix("V"))
                    .with("power", "Power", Conversion::Suffix("W"))
                    .with("current", "Current", Conversion::Suffix("A"))
                    .with("energy", "Energy", Conversion::Identity),
            )
    });
}
