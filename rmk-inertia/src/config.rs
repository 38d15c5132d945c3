use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::decay::decay_factor_q8;
use crate::event::MotionChannel;

/// Default percentage of pointer velocity retained per tick
pub const DEFAULT_MOVE_DECAY_FACTOR: u8 = 90;
/// Default pointer decay tick, in ms
pub const DEFAULT_MOVE_INTERVAL_MS: u16 = 35;
pub const DEFAULT_MOVE_THRESHOLD_START: u16 = 15;
pub const DEFAULT_MOVE_THRESHOLD_STOP: u16 = 1;

/// Default percentage of scroll velocity retained per tick
pub const DEFAULT_SCROLL_DECAY_FACTOR: u8 = 85;
/// Default scroll decay tick, in ms
pub const DEFAULT_SCROLL_INTERVAL_MS: u16 = 65;
pub const DEFAULT_SCROLL_THRESHOLD_START: u16 = 2;
pub const DEFAULT_SCROLL_THRESHOLD_STOP: u16 = 0;

/// Config for the inertia processor, one table per motion channel.
///
/// Every option is optional when deserializing, a missing option takes the
/// default of its own channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(from = "InertiaConfigTable")]
pub struct InertiaConfig {
    pub movement: ChannelConfig,
    pub scroll: ChannelConfig,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            movement: ChannelConfig::MOVEMENT,
            scroll: ChannelConfig::SCROLL,
        }
    }
}

impl InertiaConfig {
    pub const fn for_channel(&self, channel: MotionChannel) -> &ChannelConfig {
        match channel {
            MotionChannel::Movement => &self.movement,
            MotionChannel::Scroll => &self.scroll,
        }
    }

    /// Check both channel tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate(MotionChannel::Movement)?;
        self.scroll.validate(MotionChannel::Scroll)
    }
}

/// Decay parameters of a single motion channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Percentage of velocity retained each tick, 0..=100
    pub decay_factor_percent: u8,
    /// Time between two decay ticks, in ms
    pub interval_ms: u16,
    /// Decay starts when |velocity| on either axis reaches this value
    pub threshold_start: u16,
    /// Decay ends when |velocity| on both axes is at most this value
    pub threshold_stop: u16,
}

impl ChannelConfig {
    pub const MOVEMENT: Self = Self::new(
        DEFAULT_MOVE_DECAY_FACTOR,
        DEFAULT_MOVE_INTERVAL_MS,
        DEFAULT_MOVE_THRESHOLD_START,
        DEFAULT_MOVE_THRESHOLD_STOP,
    );

    pub const SCROLL: Self = Self::new(
        DEFAULT_SCROLL_DECAY_FACTOR,
        DEFAULT_SCROLL_INTERVAL_MS,
        DEFAULT_SCROLL_THRESHOLD_START,
        DEFAULT_SCROLL_THRESHOLD_STOP,
    );

    pub const fn new(decay_factor_percent: u8, interval_ms: u16, threshold_start: u16, threshold_stop: u16) -> Self {
        Self {
            decay_factor_percent,
            interval_ms,
            threshold_start,
            threshold_stop,
        }
    }

    /// Decay factor in Q8, `100%` is `256`
    pub const fn decay_factor_q8(&self) -> i16 {
        decay_factor_q8(self.decay_factor_percent)
    }

    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms as u64)
    }

    fn validate(&self, channel: MotionChannel) -> Result<(), ConfigError> {
        if self.decay_factor_percent > 100 {
            return Err(ConfigError::DecayFactorOutOfRange {
                channel,
                percent: self.decay_factor_percent,
            });
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval { channel });
        }
        Ok(())
    }
}

/// Inertia config as written by the user
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InertiaConfigTable {
    movement: ChannelConfigTable,
    scroll: ChannelConfigTable,
}

/// Channel table as written by the user, the defaults depend on the channel
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ChannelConfigTable {
    decay_factor_percent: Option<u8>,
    interval_ms: Option<u16>,
    threshold_start: Option<u16>,
    threshold_stop: Option<u16>,
}

impl ChannelConfigTable {
    fn or(self, default: ChannelConfig) -> ChannelConfig {
        ChannelConfig {
            decay_factor_percent: self.decay_factor_percent.unwrap_or(default.decay_factor_percent),
            interval_ms: self.interval_ms.unwrap_or(default.interval_ms),
            threshold_start: self.threshold_start.unwrap_or(default.threshold_start),
            threshold_stop: self.threshold_stop.unwrap_or(default.threshold_stop),
        }
    }
}

impl From<InertiaConfigTable> for InertiaConfig {
    fn from(table: InertiaConfigTable) -> Self {
        Self {
            movement: table.movement.or(ChannelConfig::MOVEMENT),
            scroll: table.scroll.or(ChannelConfig::SCROLL),
        }
    }
}

/// Errors of inertia config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Decay factor is more than 100%, the velocity would grow forever
    DecayFactorOutOfRange { channel: MotionChannel, percent: u8 },
    /// Decay ticks would fire back to back
    ZeroInterval { channel: MotionChannel },
}
