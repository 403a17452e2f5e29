//! Demo catalog — one simulated unit per built-in device profile.

/// Fixed identity of a simulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSpec {
    pub address: &'static str,
    pub vendor: &'static str,
    pub model: &'static str,
    pub description: &'static str,
    pub battery_powered: bool,
    pub name: &'static str,
}

pub const DEMO_DEVICES: &[DeviceSpec] = &[
    DeviceSpec {
        address: "virtual:button",
        vendor: "eWeLink",
        model: "WB01",
        description: "Wireless button",
        battery_powered: true,
        name: "Hallway button",
    },
    DeviceSpec {
        address: "virtual:knob",
        vendor: "_TZ3000_qja6nq5z",
        model: "TS004F",
        description: "Smart knob",
        battery_powered: true,
        name: "Living room knob",
    },
    DeviceSpec {
        address: "virtual:bulb",
        vendor: "Signify Netherlands B.V.",
        model: "LWE007",
        description: "Hue white filament bulb",
        battery_powered: false,
        name: "Hallway bulb",
    },
    DeviceSpec {
        address: "virtual:dimmer",
        vendor: "ENVILAR",
        model: "HK-ZD-DIM-A",
        description: "Zigbee LED dimmer",
        battery_powered: false,
        name: "Kitchen strip",
    },
    DeviceSpec {
        address: "virtual:cct",
        vendor: "ENVILAR",
        model: "HK-ZD-CCT-A",
        description: "Zigbee CCT LED controller",
        battery_powered: false,
        name: "Desk strip",
    },
    DeviceSpec {
        address: "virtual:pi5",
        vendor: "TallDane",
        model: "Pi5",
        description: "Raspberry Pi PWM dimmer",
        battery_powered: false,
        name: "Living room lamp",
    },
    DeviceSpec {
        address: "virtual:plug",
        vendor: "_TZ3000_nkcobies",
        model: "TS011F",
        description: "Smart plug with power metering",
        battery_powered: false,
        name: "Heater plug",
    },
];
