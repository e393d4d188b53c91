//! Raw uinput kernel ABI.
//!
//! Ioctl request numbers, `#[repr(C)]` record layouts, and input event codes
//! for the uinput virtual-device mechanism. Everything in here must match
//! `<linux/uinput.h>` and `<linux/input-event-codes.h>` bit-for-bit or the
//! kernel will reject the device (or worse, misparse the setup records).

use libc::{c_long, c_ulong};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Character device node the whole layer talks to.
pub const UINPUT_PATH: &str = "/dev/uinput";

/// Maximum device name length, including the NUL terminator.
pub const UINPUT_MAX_NAME_SIZE: usize = 80;

// Ioctl number construction, from asm-generic/ioctl.h:
// Direction: 2 bits at 30-31, Size: 14 bits at 16-29, Type: 8 bits at 8-15,
// Nr: 8 bits at 0-7. _IO has no argument, _IOW has a write argument.
const IOC_WRITE: u32 = 1;
const UINPUT_MAGIC: u8 = b'U';

const fn ioc(dir: u32, nr: u8, size: usize) -> c_ulong {
    ((dir << 30) | (((size as u32) & 0x3FFF) << 16) | ((UINPUT_MAGIC as u32) << 8) | nr as u32)
        as c_ulong
}

const fn io(nr: u8) -> c_ulong {
    ioc(0, nr, 0)
}

const fn iow(nr: u8, size: usize) -> c_ulong {
    ioc(IOC_WRITE, nr, size)
}

// Capability-declaration requests. All take an int code by value.
pub const UI_SET_EVBIT: c_ulong = iow(100, 4);
pub const UI_SET_KEYBIT: c_ulong = iow(101, 4);
pub const UI_SET_ABSBIT: c_ulong = iow(103, 4);
pub const UI_SET_MSCBIT: c_ulong = iow(104, 4);
pub const UI_SET_PROPBIT: c_ulong = iow(110, 4);

// Setup and lifecycle requests.
pub const UI_DEV_SETUP: c_ulong = iow(3, core::mem::size_of::<UinputSetup>());
pub const UI_ABS_SETUP: c_ulong = iow(4, core::mem::size_of::<UinputAbsSetup>());
pub const UI_DEV_CREATE: c_ulong = io(1);
pub const UI_DEV_DESTROY: c_ulong = io(2);

// Event families.
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;
pub const EV_MSC: u16 = 0x04;

/// Frame terminator code for EV_SYN.
pub const SYN_REPORT: u16 = 0x00;

// Stylus tool and button codes.
pub const BTN_TOOL_PEN: u16 = 0x140;
pub const BTN_TOOL_RUBBER: u16 = 0x141;
pub const BTN_TOUCH: u16 = 0x14a;
pub const BTN_STYLUS: u16 = 0x14b;
pub const BTN_STYLUS2: u16 = 0x14c;

// Absolute axes.
pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_PRESSURE: u16 = 0x18;
pub const ABS_TILT_X: u16 = 0x1a;
pub const ABS_TILT_Y: u16 = 0x1b;

/// Misc channel carrying the hardware timestamp.
pub const MSC_TIMESTAMP: u16 = 0x05;

/// Digitizer mapped directly to screen coordinates (not a relative pointer).
pub const INPUT_PROP_DIRECT: u16 = 0x01;

/// Bus type reported for software-defined devices.
pub const BUS_VIRTUAL: u16 = 0x06;

/// One `struct input_event` as written to the uinput fd.
///
/// The kernel overwrites the timestamp on delivery, so writers leave both
/// time fields zeroed. 24 bytes on LP64 targets.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct InputEventRecord {
    pub tv_sec: c_long,
    pub tv_usec: c_long,
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEventRecord {
    pub const fn new(kind: u16, code: u16, value: i32) -> Self {
        Self {
            tv_sec: 0,
            tv_usec: 0,
            kind,
            code,
            value,
        }
    }
}

/// `struct input_id` — hardware identity as seen by device-matching rules.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputId {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

/// `struct input_absinfo` — value range and resolution of one absolute axis.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsInfo {
    pub value: i32,
    pub minimum: i32,
    pub maximum: i32,
    pub fuzz: i32,
    pub flat: i32,
    pub resolution: i32,
}

/// `struct uinput_setup` — argument of UI_DEV_SETUP.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct UinputSetup {
    pub id: InputId,
    pub name: [u8; UINPUT_MAX_NAME_SIZE],
    pub ff_effects_max: u32,
}

/// `struct uinput_abs_setup` — argument of UI_ABS_SETUP.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UinputAbsSetup {
    pub code: u16,
    pub absinfo: AbsInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::size_of;

    #[test]
    fn ioctl_numbers_match_kernel_headers() {
        // Reference values computed from the C macros in linux/uinput.h
        assert_eq!(UI_SET_EVBIT, 0x4004_5564);
        assert_eq!(UI_SET_KEYBIT, 0x4004_5565);
        assert_eq!(UI_SET_ABSBIT, 0x4004_5567);
        assert_eq!(UI_SET_MSCBIT, 0x4004_5568);
        assert_eq!(UI_SET_PROPBIT, 0x4004_556e);
        assert_eq!(UI_DEV_SETUP, 0x405c_5503);
        assert_eq!(UI_ABS_SETUP, 0x401c_5504);
        assert_eq!(UI_DEV_CREATE, 0x5501);
        assert_eq!(UI_DEV_DESTROY, 0x5502);
    }

    #[test]
    fn record_layouts_match_kernel_structs() {
        assert_eq!(size_of::<InputEventRecord>(), 24);
        assert_eq!(size_of::<InputId>(), 8);
        assert_eq!(size_of::<AbsInfo>(), 24);
        assert_eq!(size_of::<UinputSetup>(), 92);
        assert_eq!(size_of::<UinputAbsSetup>(), 28);
    }

    #[test]
    fn event_record_bytes_start_with_zeroed_timestamp() {
        let ev = InputEventRecord::new(EV_ABS, ABS_X, 32000);
        let bytes = ev.as_bytes();
        assert_eq!(bytes.len(), 24);
        assert!(bytes[..16].iter().all(|&b| b == 0));
        assert_eq!(u16::from_ne_bytes([bytes[16], bytes[17]]), EV_ABS);
        assert_eq!(u16::from_ne_bytes([bytes[18], bytes[19]]), ABS_X);
        assert_eq!(
            i32::from_ne_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]),
            32000
        );
    }
}
