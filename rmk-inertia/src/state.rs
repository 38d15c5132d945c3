use crate::event::MotionAxis;

/// Velocity state of one motion channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelState {
    /// Last emitted, or pending, delta per tick
    pub velocity_x: i16,
    pub velocity_y: i16,
    /// Fractional carry in Q8, always within one unit after a decay step
    pub remainder_x_q8: i16,
    pub remainder_y_q8: i16,
    /// A decay tick is pending
    pub active: bool,
    /// The velocity comes from a decay tick rather than from live input
    pub is_inertial: bool,
}

impl ChannelState {
    pub const fn new() -> Self {
        Self {
            velocity_x: 0,
            velocity_y: 0,
            remainder_x_q8: 0,
            remainder_y_q8: 0,
            active: false,
            is_inertial: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Overwrite the velocity of the sample's axis, the other axis is kept.
    pub fn set_axis(&mut self, axis: MotionAxis, value: i16) {
        if axis.is_horizontal() {
            self.velocity_x = value;
        } else {
            self.velocity_y = value;
        }
    }

    /// Autonomous decay is running: a tick is pending and no live input took over yet
    pub fn is_autonomous(&self) -> bool {
        self.active && self.is_inertial
    }

    /// Either axis reaches `threshold`
    pub fn exceeds(&self, threshold: u16) -> bool {
        self.velocity_x.unsigned_abs() >= threshold || self.velocity_y.unsigned_abs() >= threshold
    }

    pub fn velocity(&self) -> (i16, i16) {
        (self.velocity_x, self.velocity_y)
    }
}

/// Both axes of `(dx, dy)` are at most `threshold`
pub(crate) fn within(dx: i16, dy: i16, threshold: u16) -> bool {
    dx.unsigned_abs() <= threshold && dy.unsigned_abs() <= threshold
}
