//! Virtual stylus device layer for the waytab tablet driver
//!
//! Registers a pen/digitizer with the kernel input subsystem via uinput and
//! drives it one event at a time. To every other program on the system the
//! result is indistinguishable from physical tablet hardware.
//!
//! The layer has three responsibilities around a single owned handle:
//!
//! - Factory: declare the capability set and bring the device node up
//!   ([`StylusDevice::create`])
//! - Emitter: write raw (type, code, value) events ([`StylusDevice::emit`])
//! - Teardown: remove the device again ([`StylusDevice::destroy`])
//!
//! Coordinate mapping, gesture handling, and the transport that produces
//! pointer samples live outside this crate; they call in through
//! [`pen::forward_sample`] or the raw emit primitive.

pub mod caps;
pub mod channel;
pub mod device;
pub mod error;
pub mod pen;
pub mod sys;

pub use caps::{AxisDescriptor, DeviceIdentity, ABS_RANGE_MAX, AXES, IDENTITY, KEYS};
pub use channel::{UinputChannel, UinputControl};
pub use device::{EventKind, StylusDevice, ENUMERATION_SETTLE};
pub use error::{DeviceError, SetupStep};
pub use pen::{forward_sample, PointerButtons, PointerPhase, PointerSample, PointerTool};
