//! Capability tables — single source of truth for what the emulated stylus
//! declares to the kernel.
//!
//! Everything here is fixed at compile time. The factory iterates these
//! tables during setup; they are never touched again, because uinput does
//! not allow capability changes on a live device.

use crate::sys::{
    self, AbsInfo, InputId, UinputAbsSetup, UinputSetup, UINPUT_MAX_NAME_SIZE,
};

/// Upper bound of the X/Y/Pressure axes.
pub const ABS_RANGE_MAX: i32 = 65535;

/// Tilt axes span [-TILT_RANGE, TILT_RANGE] degrees.
pub const TILT_RANGE: i32 = 90;

/// Logical resolution reported for every axis (units per mm).
pub const AXIS_RESOLUTION: i32 = 12;

/// Static configuration of one absolute axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisDescriptor {
    pub code: u16,
    pub minimum: i32,
    pub maximum: i32,
    pub resolution: i32,
}

impl AxisDescriptor {
    const fn new(code: u16, minimum: i32, maximum: i32) -> Self {
        Self {
            code,
            minimum,
            maximum,
            resolution: AXIS_RESOLUTION,
        }
    }

    /// Full absinfo record as registered with UI_ABS_SETUP.
    pub const fn abs_setup(&self) -> UinputAbsSetup {
        UinputAbsSetup {
            code: self.code,
            absinfo: AbsInfo {
                value: 0,
                minimum: self.minimum,
                maximum: self.maximum,
                fuzz: 0,
                flat: 0,
                resolution: self.resolution,
            },
        }
    }
}

/// The fixed axis set, declared in this order.
pub const AXES: [AxisDescriptor; 5] = [
    AxisDescriptor::new(sys::ABS_X, 0, ABS_RANGE_MAX),
    AxisDescriptor::new(sys::ABS_Y, 0, ABS_RANGE_MAX),
    AxisDescriptor::new(sys::ABS_PRESSURE, 0, ABS_RANGE_MAX),
    AxisDescriptor::new(sys::ABS_TILT_X, -TILT_RANGE, TILT_RANGE),
    AxisDescriptor::new(sys::ABS_TILT_Y, -TILT_RANGE, TILT_RANGE),
];

/// Event families the device advertises.
pub const EVENT_FAMILIES: [u16; 4] = [sys::EV_SYN, sys::EV_KEY, sys::EV_MSC, sys::EV_ABS];

/// Tool and button codes the device can report.
pub const KEYS: [u16; 5] = [
    sys::BTN_TOOL_PEN,
    sys::BTN_TOOL_RUBBER,
    sys::BTN_STYLUS,
    sys::BTN_STYLUS2,
    sys::BTN_TOUCH,
];

/// Misc sub-channels (hardware timestamp only).
pub const MISC_CHANNELS: [u16; 1] = [sys::MSC_TIMESTAMP];

/// Input properties. INPUT_PROP_DIRECT marks a screen-mapped digitizer.
pub const PROPERTIES: [u16; 1] = [sys::INPUT_PROP_DIRECT];

/// Fixed hardware identity submitted with UI_DEV_SETUP.
///
/// udev rules downstream match on vendor/product/name, so these values must
/// never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub name: &'static str,
}

pub const IDENTITY: DeviceIdentity = DeviceIdentity {
    bustype: sys::BUS_VIRTUAL,
    vendor: 0x186d,
    product: 0x598f,
    name: "waytab",
};

impl DeviceIdentity {
    /// Build the UI_DEV_SETUP argument. The name is NUL-padded into the
    /// fixed 80-byte field.
    pub fn to_setup(&self) -> UinputSetup {
        let mut name = [0u8; UINPUT_MAX_NAME_SIZE];
        let bytes = self.name.as_bytes();
        debug_assert!(bytes.len() < UINPUT_MAX_NAME_SIZE);
        name[..bytes.len()].copy_from_slice(bytes);

        UinputSetup {
            id: InputId {
                bustype: self.bustype,
                vendor: self.vendor,
                product: self.product,
                version: 0,
            },
            name,
            ff_effects_max: 0,
        }
    }
}
