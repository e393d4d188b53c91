//! Virtual stylus device lifecycle: create, emit, destroy.
//!
//! [`StylusDevice`] owns the kernel-side device exclusively. It is created
//! by declaring the capability tables from [`crate::caps`] over a
//! [`UinputControl`] channel, drives one event write per [`emit`] call, and
//! removes the device again on [`destroy`] (or on drop, best-effort).
//!
//! [`emit`]: StylusDevice::emit
//! [`destroy`]: StylusDevice::destroy

use std::time::Duration;

use crate::caps;
use crate::channel::{UinputChannel, UinputControl};
use crate::error::{DeviceError, SetupStep};
use crate::sys::{self, InputEventRecord};

/// How long to wait after UI_DEV_CREATE before the first emit. Device
/// enumeration (libinput, compositors, udev consumers) attaches
/// asynchronously; events written before a listener exists are dropped.
pub const ENUMERATION_SETTLE: Duration = Duration::from_secs(1);

/// Event family of one emitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// EV_SYN — frame boundary markers
    Synchronize,
    /// EV_KEY — tool and button transitions
    Key,
    /// EV_ABS — absolute axis samples
    Absolute,
    /// EV_MSC — misc channel (timestamps)
    Misc,
}

impl EventKind {
    pub const fn raw(self) -> u16 {
        match self {
            EventKind::Synchronize => sys::EV_SYN,
            EventKind::Key => sys::EV_KEY,
            EventKind::Absolute => sys::EV_ABS,
            EventKind::Misc => sys::EV_MSC,
        }
    }
}

/// An emulated stylus/digitizer registered with the kernel input subsystem.
///
/// Move-only by construction: there is no `Clone`, so exactly one owner can
/// emit to or destroy the underlying device. Dropping an undestroyed handle
/// issues the destroy command best-effort.
#[derive(Debug)]
pub struct StylusDevice<C: UinputControl = UinputChannel> {
    channel: C,
    destroyed: bool,
}

impl StylusDevice<UinputChannel> {
    /// Create the virtual stylus on `/dev/uinput`.
    ///
    /// Declares the full capability set, submits the device identity, issues
    /// the creation command, and waits out the enumeration settle period.
    /// Returns the handle only once every step succeeded.
    pub fn create() -> Result<Self, DeviceError> {
        let channel = UinputChannel::open().map_err(DeviceError::OpenFailed)?;
        Self::create_on(channel)
    }

    /// Create the device through an alternate control node path.
    pub fn create_at(path: &str) -> Result<Self, DeviceError> {
        let channel = UinputChannel::open_at(path).map_err(DeviceError::OpenFailed)?;
        Self::create_on(channel)
    }
}

impl<C: UinputControl> StylusDevice<C> {
    /// Create the device over an already-open control channel.
    pub fn create_on(mut channel: C) -> Result<Self, DeviceError> {
        let setup = |step: SetupStep| move |source| DeviceError::SetupFailed { step, source };

        for family in caps::EVENT_FAMILIES {
            channel
                .set_event_bit(family)
                .map_err(setup(SetupStep::EventFamilies))?;
        }
        for prop in caps::PROPERTIES {
            channel
                .set_prop_bit(prop)
                .map_err(setup(SetupStep::Properties))?;
        }
        for key in caps::KEYS {
            channel.set_key_bit(key).map_err(setup(SetupStep::Keys))?;
        }
        for misc in caps::MISC_CHANNELS {
            channel
                .set_misc_bit(misc)
                .map_err(setup(SetupStep::MiscChannels))?;
        }
        for axis in &caps::AXES {
            channel
                .set_abs_bit(axis.code)
                .map_err(setup(SetupStep::Axis(axis.code)))?;
            channel
                .setup_axis(&axis.abs_setup())
                .map_err(setup(SetupStep::Axis(axis.code)))?;
        }
        tracing::debug!(
            axes = caps::AXES.len(),
            keys = caps::KEYS.len(),
            "capability set declared"
        );

        channel
            .setup_identity(&caps::IDENTITY.to_setup())
            .map_err(setup(SetupStep::Identity))?;

        channel.create_device().map_err(DeviceError::CreationFailed)?;
        tracing::info!(
            "virtual stylus {} ({:04x}:{:04x}) created, settling for {:?}",
            caps::IDENTITY.name,
            caps::IDENTITY.vendor,
            caps::IDENTITY.product,
            ENUMERATION_SETTLE
        );
        channel.settle(ENUMERATION_SETTLE);

        Ok(Self {
            channel,
            destroyed: false,
        })
    }

    /// Emit one (type, code, value) event.
    ///
    /// Raw and unbuffered: no implicit synchronization and no range
    /// validation. Values outside the declared axis ranges are passed
    /// through verbatim; staying in range is the caller's contract.
    pub fn emit(&mut self, kind: EventKind, code: u16, value: i32) -> Result<(), DeviceError> {
        let record = InputEventRecord::new(kind.raw(), code, value);
        self.channel
            .write_event(&record)
            .map_err(DeviceError::WriteFailed)
    }

    /// Terminate the current frame with (EV_SYN, SYN_REPORT, 0).
    ///
    /// Listeners only observe axis/button changes once the frame is closed.
    pub fn sync_report(&mut self) -> Result<(), DeviceError> {
        self.emit(EventKind::Synchronize, sys::SYN_REPORT, 0)
    }

    /// Remove the device from the system and release the control node.
    ///
    /// Consumes the handle; it cannot be reused afterward. On error the
    /// kernel resource may already be gone — treat the device as invalid
    /// either way.
    pub fn destroy(mut self) -> Result<(), DeviceError> {
        self.destroyed = true;
        let result = self
            .channel
            .destroy_device()
            .map_err(DeviceError::DestroyFailed);
        if result.is_ok() {
            tracing::info!(name = caps::IDENTITY.name, "virtual stylus destroyed");
        }
        result
    }
}

impl<C: UinputControl> Drop for StylusDevice<C> {
    fn drop(&mut self) {
        if !self.destroyed {
            // Scope-exit fallback for panics and early returns.
            if let Err(err) = self.channel.destroy_device() {
                tracing::debug!("destroy on drop failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_raw_values() {
        assert_eq!(EventKind::Synchronize.raw(), 0x00);
        assert_eq!(EventKind::Key.raw(), 0x01);
        assert_eq!(EventKind::Absolute.raw(), 0x03);
        assert_eq!(EventKind::Misc.raw(), 0x04);
    }

    #[test]
    fn create_on_missing_node_short_circuits() {
        let err = StylusDevice::create_at("/dev/nonexistent-uinput").unwrap_err();
        assert!(matches!(err, DeviceError::OpenFailed(_)));
    }
}
