//! Events consumed by the inertia processor
//!
//! `PointingEvent` is what pointing devices publish, `MotionSample` is the
//! single-axis relative sample the engine works on.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel;
use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};

/// Trait for event subscribers
pub trait EventSubscriber<T> {
    async fn next_event(&mut self) -> T;
}

impl<'a, M: RawMutex, T: Clone, const N: usize> EventSubscriber<T> for channel::Receiver<'a, M, T, N> {
    async fn next_event(&mut self) -> T {
        self.receive().await
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Copy, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointingEvent(pub [AxisEvent; 3]);

impl PointingEvent {
    /// Relative samples carried by this event, in order.
    ///
    /// Absolute values and axes without an inertia channel are skipped.
    pub fn samples(&self) -> impl Iterator<Item = MotionSample> + '_ {
        self.0.iter().filter_map(|e| match e.typ {
            AxisValType::Rel => MotionAxis::from_axis(e.axis).map(|axis| MotionSample::new(axis, e.value)),
            AxisValType::Abs => None,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Copy, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisEvent {
    /// The axis event value type, relative or absolute
    pub typ: AxisValType,
    /// The axis name
    pub axis: Axis,
    /// Value of the axis event
    pub value: i16,
}

impl AxisEvent {
    pub const fn rel(axis: Axis, value: i16) -> Self {
        Self {
            typ: AxisValType::Rel,
            axis,
            value,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Copy, PartialEq, Eq, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisValType {
    /// The axis value is relative
    Rel,
    /// The axis value is absolute
    Abs,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Axis {
    X,
    Y,
    Z,
    /// Horizontal wheel
    H,
    /// Vertical wheel
    V,
    // .. More is allowed
}

/// The two independently decaying motion channels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionChannel {
    /// Pointer movement
    Movement,
    /// Scroll wheel
    Scroll,
}

impl MotionChannel {
    /// The channel that is cancelled when this one receives live input
    pub const fn other(self) -> Self {
        match self {
            MotionChannel::Movement => MotionChannel::Scroll,
            MotionChannel::Scroll => MotionChannel::Movement,
        }
    }
}

/// Relative axes that take part in the inertia simulation
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionAxis {
    MoveX,
    MoveY,
    ScrollH,
    ScrollV,
}

impl MotionAxis {
    pub const fn channel(self) -> MotionChannel {
        match self {
            MotionAxis::MoveX | MotionAxis::MoveY => MotionChannel::Movement,
            MotionAxis::ScrollH | MotionAxis::ScrollV => MotionChannel::Scroll,
        }
    }

    /// Whether this axis is the horizontal component of its channel
    pub const fn is_horizontal(self) -> bool {
        matches!(self, MotionAxis::MoveX | MotionAxis::ScrollH)
    }

    pub const fn from_axis(axis: Axis) -> Option<Self> {
        match axis {
            Axis::X => Some(MotionAxis::MoveX),
            Axis::Y => Some(MotionAxis::MoveY),
            Axis::H => Some(MotionAxis::ScrollH),
            Axis::V => Some(MotionAxis::ScrollV),
            _ => None,
        }
    }
}

/// One relative-motion sample for a single axis
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSample {
    pub axis: MotionAxis,
    pub value: i16,
}

impl MotionSample {
    pub const fn new(axis: MotionAxis, value: i16) -> Self {
        Self { axis, value }
    }
}
