//! Stylus device error types

use std::fmt;
use std::io;

use thiserror::Error;

/// Which setup declaration the kernel rejected.
///
/// Creation stops at the first rejected step; later declarations are never
/// issued, so the kernel-side capability set can not drift from the tables
/// in [`crate::caps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    /// UI_SET_EVBIT for one of the event families
    EventFamilies,
    /// UI_SET_PROPBIT (INPUT_PROP_DIRECT)
    Properties,
    /// UI_SET_KEYBIT for a tool or button code
    Keys,
    /// UI_SET_MSCBIT (MSC_TIMESTAMP)
    MiscChannels,
    /// UI_SET_ABSBIT / UI_ABS_SETUP for the axis with this code
    Axis(u16),
    /// UI_DEV_SETUP (bus/vendor/product/name record)
    Identity,
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupStep::EventFamilies => write!(f, "event family declaration"),
            SetupStep::Properties => write!(f, "device property declaration"),
            SetupStep::Keys => write!(f, "key code declaration"),
            SetupStep::MiscChannels => write!(f, "misc channel declaration"),
            SetupStep::Axis(code) => write!(f, "absolute axis 0x{code:02x} setup"),
            SetupStep::Identity => write!(f, "device identity submission"),
        }
    }
}

/// Errors from virtual stylus operations
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The uinput control node could not be opened (module missing, wrong
    /// path, or permission denied).
    #[error("failed to open uinput control node: {0}")]
    OpenFailed(#[source] io::Error),

    /// A capability declaration or identity submission was rejected.
    #[error("device setup rejected during {step}: {source}")]
    SetupFailed {
        step: SetupStep,
        #[source]
        source: io::Error,
    },

    /// UI_DEV_CREATE failed; the device never became visible.
    #[error("device creation failed: {0}")]
    CreationFailed(#[source] io::Error),

    /// An event write failed after the device was created.
    #[error("event write failed: {0}")]
    WriteFailed(#[source] io::Error),

    /// UI_DEV_DESTROY was rejected. The handle must still be treated as
    /// invalid by the caller.
    #[error("device destruction failed: {0}")]
    DestroyFailed(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_step_names_the_axis() {
        let step = SetupStep::Axis(0x1a);
        assert_eq!(step.to_string(), "absolute axis 0x1a setup");
    }

    #[test]
    fn errors_carry_the_os_source() {
        let err = DeviceError::SetupFailed {
            step: SetupStep::Identity,
            source: io::Error::from_raw_os_error(libc::EINVAL),
        };
        let msg = err.to_string();
        assert!(msg.contains("device identity submission"), "{msg}");
        assert!(std::error::Error::source(&err).is_some());
    }
}
