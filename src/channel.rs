//! The uinput control channel — the seam between device logic and the
//! kernel.
//!
//! [`UinputControl`] is the narrow surface the factory, emitter, and
//! teardown drive. [`UinputChannel`] is the real implementation on top of
//! `/dev/uinput`; tests substitute a recording mock so the declared
//! capability set can be inspected without a kernel.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::thread;
use std::time::Duration;

use libc::{c_int, c_ulong};
use zerocopy::IntoBytes;

use crate::sys::{
    self, InputEventRecord, UinputAbsSetup, UinputSetup, UI_ABS_SETUP, UI_DEV_CREATE,
    UI_DEV_DESTROY, UI_DEV_SETUP, UI_SET_ABSBIT, UI_SET_EVBIT, UI_SET_KEYBIT, UI_SET_MSCBIT,
    UI_SET_PROPBIT,
};

/// Synchronous control surface of one uinput device node.
///
/// Every method maps to exactly one kernel request and returns immediately;
/// there is no buffering and no retry at this layer. `settle` is the single
/// named wait step after creation — replace it with a real readiness signal
/// if the platform ever grows one.
pub trait UinputControl {
    fn set_event_bit(&mut self, family: u16) -> io::Result<()>;
    fn set_key_bit(&mut self, key: u16) -> io::Result<()>;
    fn set_misc_bit(&mut self, channel: u16) -> io::Result<()>;
    fn set_abs_bit(&mut self, axis: u16) -> io::Result<()>;
    fn set_prop_bit(&mut self, prop: u16) -> io::Result<()>;

    /// Register the full absinfo record for one declared axis.
    fn setup_axis(&mut self, setup: &UinputAbsSetup) -> io::Result<()>;

    /// Submit the identity record (UI_DEV_SETUP).
    fn setup_identity(&mut self, setup: &UinputSetup) -> io::Result<()>;

    /// Make the device visible to the rest of the system (UI_DEV_CREATE).
    fn create_device(&mut self) -> io::Result<()>;

    /// Remove the device from the system's device list (UI_DEV_DESTROY).
    fn destroy_device(&mut self) -> io::Result<()>;

    /// Write one fixed-layout event record. The kernel stamps the time.
    fn write_event(&mut self, event: &InputEventRecord) -> io::Result<()>;

    /// Block until the host's device enumeration has had time to pick up
    /// the newly created node. Emitting earlier risks dropped events.
    fn settle(&mut self, period: Duration);
}

/// Control channel backed by the real `/dev/uinput` node.
#[derive(Debug)]
pub struct UinputChannel {
    file: File,
}

impl UinputChannel {
    /// Open `/dev/uinput` write-only and non-blocking.
    pub fn open() -> io::Result<Self> {
        Self::open_at(sys::UINPUT_PATH)
    }

    /// Open an alternate control node. Used by tests and by callers running
    /// inside containers that remap the device path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .inspect_err(|err| {
                if err.kind() == io::ErrorKind::PermissionDenied
                    && !nix::unistd::geteuid().is_root()
                {
                    tracing::warn!(
                        "{} is not writable by uid {} - run as root or add a udev rule",
                        path.display(),
                        nix::unistd::getuid()
                    );
                }
            })?;
        tracing::debug!("opened {}", path.display());
        Ok(Self { file })
    }

    fn ioctl_val(&self, request: c_ulong, value: c_int) -> io::Result<()> {
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request, value) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn ioctl_ptr<T>(&self, request: c_ulong, arg: &T) -> io::Result<()> {
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request, arg as *const T) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl UinputControl for UinputChannel {
    fn set_event_bit(&mut self, family: u16) -> io::Result<()> {
        self.ioctl_val(UI_SET_EVBIT, family as c_int)
    }

    fn set_key_bit(&mut self, key: u16) -> io::Result<()> {
        self.ioctl_val(UI_SET_KEYBIT, key as c_int)
    }

    fn set_misc_bit(&mut self, channel: u16) -> io::Result<()> {
        self.ioctl_val(UI_SET_MSCBIT, channel as c_int)
    }

    fn set_abs_bit(&mut self, axis: u16) -> io::Result<()> {
        self.ioctl_val(UI_SET_ABSBIT, axis as c_int)
    }

    fn set_prop_bit(&mut self, prop: u16) -> io::Result<()> {
        self.ioctl_val(UI_SET_PROPBIT, prop as c_int)
    }

    fn setup_axis(&mut self, setup: &UinputAbsSetup) -> io::Result<()> {
        self.ioctl_ptr(UI_ABS_SETUP, setup)
    }

    fn setup_identity(&mut self, setup: &UinputSetup) -> io::Result<()> {
        self.ioctl_ptr(UI_DEV_SETUP, setup)
    }

    fn create_device(&mut self) -> io::Result<()> {
        self.ioctl_val(UI_DEV_CREATE, 0)
    }

    fn destroy_device(&mut self) -> io::Result<()> {
        self.ioctl_val(UI_DEV_DESTROY, 0)
    }

    fn write_event(&mut self, event: &InputEventRecord) -> io::Result<()> {
        self.file.write_all(event.as_bytes())
    }

    fn settle(&mut self, period: Duration) {
        thread::sleep(period);
    }
}
