//! Translation from upstream pointer samples to stylus event frames.
//!
//! The transport (outside this crate) delivers one [`PointerSample`] per
//! motion/contact report, in the upstream wire encoding (Android
//! MotionEvent-style action names, normalized coordinates). This module
//! turns each sample into one uinput frame: tool state, scaled axes, button
//! state, timestamp, and the closing SYN_REPORT.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize};

use crate::caps::ABS_RANGE_MAX;
use crate::channel::UinputControl;
use crate::device::{EventKind, StylusDevice};
use crate::error::DeviceError;
use crate::sys;

/// Lifecycle phase of a pointer sample, as named on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    #[serde(rename = "ACTION_DOWN")]
    Down,
    #[serde(rename = "ACTION_UP")]
    Up,
    #[serde(rename = "ACTION_CANCEL")]
    Cancel,
    #[serde(rename = "ACTION_MOVE")]
    Move,
    #[serde(rename = "ACTION_HOVER_MOVE")]
    HoverMove,
    #[serde(rename = "ACTION_HOVER_ENTER")]
    HoverEnter,
    #[serde(rename = "ACTION_HOVER_EXIT")]
    HoverExit,
}

impl PointerPhase {
    /// Phases where the pen reports position and pressure.
    fn is_active(self) -> bool {
        matches!(
            self,
            PointerPhase::Down | PointerPhase::Move | PointerPhase::HoverMove | PointerPhase::HoverEnter
        )
    }

    /// Phases where the tool leaves proximity entirely.
    fn is_departure(self) -> bool {
        matches!(self, PointerPhase::Cancel | PointerPhase::HoverExit)
    }
}

/// Tool kind reported by the source device. Encoded as a plain integer on
/// the wire.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTool {
    Unknown = 0,
    Touch = 1,
    Stylus = 2,
    Mouse = 3,
    Eraser = 4,
}

impl<'de> Deserialize<'de> for PointerTool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match i8::deserialize(deserializer)? {
            0 => Ok(PointerTool::Unknown),
            1 => Ok(PointerTool::Touch),
            2 => Ok(PointerTool::Stylus),
            3 => Ok(PointerTool::Mouse),
            4 => Ok(PointerTool::Eraser),
            other => Err(serde::de::Error::custom(format!(
                "invalid pointer tool: {other}"
            ))),
        }
    }
}

bitflags! {
    /// Button mask carried with each sample.
    #[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PointerButtons: u8 {
        const PRIMARY = 0b000_0001;
        const SECONDARY = 0b000_0010;
        const TERTIARY = 0b000_0100;
        const FORWARD = 0b000_1000;
        const BACK = 0b001_0000;
        const STYLUS_PRIMARY = 0b010_0000;
        const STYLUS_SECONDARY = 0b100_0000;
    }
}

// Unknown bits from newer senders are dropped rather than rejected.
fn buttons_truncate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PointerButtons, D::Error> {
    Ok(PointerButtons::from_bits_truncate(u8::deserialize(
        deserializer,
    )?))
}

/// One pointer report from the transport.
///
/// `x`, `y`, and `pressure` are normalized to [0.0, 1.0]; tilt is already
/// in degrees. Field names follow the wire format.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PointerSample {
    #[serde(rename = "event_type")]
    pub phase: PointerPhase,
    pub pointer_id: i64,
    pub timestamp: u64,
    #[serde(rename = "pointer_type")]
    pub tool: PointerTool,
    #[serde(deserialize_with = "buttons_truncate")]
    pub buttons: PointerButtons,
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
    pub tilt_x: i32,
    pub tilt_y: i32,
    pub touch_major: f64,
    pub touch_minor: f64,
}

fn scale_axis(normalized: f64) -> i32 {
    (normalized * ABS_RANGE_MAX as f64) as i32
}

/// Fold a millisecond timestamp into the i32 value field of MSC_TIMESTAMP.
fn fold_timestamp(timestamp: u64) -> i32 {
    (timestamp % (i32::MAX as u64 + 1)) as i32
}

/// Forward one sample to the virtual stylus as a complete event frame.
///
/// Touch contacts forward only their BTN_TOUCH transition; mouse and
/// unknown tools are not representable on this device and are dropped.
pub fn forward_sample<C: UinputControl>(
    device: &mut StylusDevice<C>,
    sample: &PointerSample,
) -> Result<(), DeviceError> {
    match sample.tool {
        PointerTool::Stylus => forward_pen(device, sample, sys::BTN_TOOL_PEN),
        PointerTool::Eraser => forward_pen(device, sample, sys::BTN_TOOL_RUBBER),
        PointerTool::Touch => forward_touch(device, sample),
        PointerTool::Mouse | PointerTool::Unknown => Ok(()),
    }
}

// TODO: forward touch_major/touch_minor once the capability set declares a
// contact geometry axis for them
fn forward_touch<C: UinputControl>(
    device: &mut StylusDevice<C>,
    sample: &PointerSample,
) -> Result<(), DeviceError> {
    let contact = match sample.phase {
        PointerPhase::Up | PointerPhase::Cancel | PointerPhase::HoverExit => 0,
        _ => 1,
    };
    device.emit(EventKind::Key, sys::BTN_TOUCH, contact)?;
    device.emit(
        EventKind::Misc,
        sys::MSC_TIMESTAMP,
        fold_timestamp(sample.timestamp),
    )?;
    device.sync_report()
}

fn forward_pen<C: UinputControl>(
    device: &mut StylusDevice<C>,
    sample: &PointerSample,
    tool_code: u16,
) -> Result<(), DeviceError> {
    if sample.phase.is_departure() {
        device.emit(EventKind::Key, tool_code, 0)?;
    } else {
        device.emit(EventKind::Key, tool_code, 1)?;
    }

    if sample.phase.is_active() {
        device.emit(EventKind::Absolute, sys::ABS_X, scale_axis(sample.x))?;
        device.emit(EventKind::Absolute, sys::ABS_Y, scale_axis(sample.y))?;
        device.emit(
            EventKind::Absolute,
            sys::ABS_PRESSURE,
            scale_axis(sample.pressure),
        )?;
        device.emit(EventKind::Absolute, sys::ABS_TILT_X, sample.tilt_x)?;
        device.emit(EventKind::Absolute, sys::ABS_TILT_Y, sample.tilt_y)?;
    } else {
        device.emit(EventKind::Absolute, sys::ABS_PRESSURE, 0)?;
    }

    let primary = sample.buttons.contains(PointerButtons::STYLUS_PRIMARY);
    let secondary = sample.buttons.contains(PointerButtons::STYLUS_SECONDARY);
    device.emit(EventKind::Key, sys::BTN_STYLUS, primary.into())?;
    device.emit(EventKind::Key, sys::BTN_STYLUS2, secondary.into())?;

    device.emit(
        EventKind::Misc,
        sys::MSC_TIMESTAMP,
        fold_timestamp(sample.timestamp),
    )?;
    device.sync_report()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_parses_from_wire_json() {
        let json = r#"{
            "event_type": "ACTION_MOVE",
            "pointer_id": 0,
            "timestamp": 123456789,
            "pointer_type": 2,
            "buttons": 32,
            "x": 0.5,
            "y": 0.25,
            "pressure": 1.0,
            "tilt_x": -15,
            "tilt_y": 40,
            "touch_major": 0.0,
            "touch_minor": 0.0
        }"#;
        let sample: PointerSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.phase, PointerPhase::Move);
        assert_eq!(sample.tool, PointerTool::Stylus);
        assert!(sample.buttons.contains(PointerButtons::STYLUS_PRIMARY));
        assert!(!sample.buttons.contains(PointerButtons::STYLUS_SECONDARY));
        assert_eq!(sample.tilt_x, -15);
    }

    #[test]
    fn unknown_button_bits_are_truncated() {
        let json = r#"{
            "event_type": "ACTION_DOWN",
            "pointer_id": 1,
            "timestamp": 1,
            "pointer_type": 4,
            "buttons": 255,
            "x": 0.0, "y": 0.0, "pressure": 0.5,
            "tilt_x": 0, "tilt_y": 0,
            "touch_major": 0.0, "touch_minor": 0.0
        }"#;
        let sample: PointerSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.buttons, PointerButtons::all());
        assert_eq!(sample.tool, PointerTool::Eraser);
    }

    #[test]
    fn invalid_tool_integer_is_rejected() {
        let json = r#"{
            "event_type": "ACTION_UP",
            "pointer_id": 0,
            "timestamp": 0,
            "pointer_type": 9,
            "buttons": 0,
            "x": 0.0, "y": 0.0, "pressure": 0.0,
            "tilt_x": 0, "tilt_y": 0,
            "touch_major": 0.0, "touch_minor": 0.0
        }"#;
        let err = serde_json::from_str::<PointerSample>(json).unwrap_err();
        assert!(err.to_string().contains("invalid pointer tool"));
    }

    #[test]
    fn axis_scaling_covers_declared_range() {
        assert_eq!(scale_axis(0.0), 0);
        assert_eq!(scale_axis(1.0), 65535);
        assert_eq!(scale_axis(0.5), 32767);
    }

    #[test]
    fn timestamp_folds_into_i32_range() {
        assert_eq!(fold_timestamp(0), 0);
        assert_eq!(fold_timestamp(i32::MAX as u64), i32::MAX);
        assert_eq!(fold_timestamp(i32::MAX as u64 + 1), 0);
        assert_eq!(fold_timestamp(u64::MAX), i32::MAX);
    }
}
