//! The inertia engine
//!
//! Each motion channel (movement, scroll) is either idle or decaying. Live
//! samples set the channel velocity and, once it reaches the start threshold,
//! schedule a decay tick. Every tick decays the velocity and emits it, until
//! it drops to the stop threshold and a final `(0, 0)` report ends the cycle.
//!
//! ```text
//!              sample >= threshold_start
//!   +------+ --------------------------> +----------+
//!   | Idle |                             | Decaying | --+ tick: emit, reschedule
//!   +------+ <-------------------------- +----------+ <-+
//!       tick <= threshold_stop: emit (0, 0)
//!       live sample on the other channel: cancel
//! ```
//!
//! All state lives behind one blocking mutex, so a live sample and a tick never
//! interleave. Reports are emitted inside the same critical section: a tick
//! that was cancelled or rescheduled before it got the lock finds its deadline
//! gone and does nothing.
use core::cell::RefCell;

use embassy_futures::select::select;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};

use crate::config::{ChannelConfig, InertiaConfig};
use crate::decay::decay_step;
use crate::event::{MotionChannel, MotionSample, PointingEvent};
use crate::reporter::ReportEmitter;
use crate::scheduler::{DelayedTick, earliest};
use crate::state::{ChannelState, within};

/// State and pending tick of a single motion channel
struct ChannelEngine {
    channel: MotionChannel,
    state: ChannelState,
    tick: DelayedTick,
}

impl ChannelEngine {
    const fn new(channel: MotionChannel) -> Self {
        Self {
            channel,
            state: ChannelState::new(),
            tick: DelayedTick::new(),
        }
    }

    /// Cancel the pending tick and zero the state
    fn cancel(&mut self) {
        self.tick.cancel();
        self.state.reset();
    }

    /// Apply a live sample. Returns whether a tick was scheduled.
    fn ingest(&mut self, sample: MotionSample, config: &ChannelConfig, now: Instant) -> bool {
        self.state.set_axis(sample.axis, sample.value);

        if !self.state.exceeds(config.threshold_start) {
            return false;
        }

        // Live motion, the timer takes over once the first tick fires
        self.state.active = true;
        self.state.is_inertial = false;
        self.tick.schedule(now, config.interval());
        debug!(
            "{:?} inertia triggered, x {}, y {}",
            self.channel, self.state.velocity_x, self.state.velocity_y
        );
        true
    }

    /// Run the decay step if the tick is due at `now`
    fn fire<E: ReportEmitter>(&mut self, config: &ChannelConfig, now: Instant, emitter: &mut E) {
        if !self.tick.take_due(now) || !self.state.active {
            return;
        }

        let (dx, dy) = decay_step(
            self.state.velocity_x,
            self.state.velocity_y,
            config.decay_factor_q8(),
            &mut self.state.remainder_x_q8,
            &mut self.state.remainder_y_q8,
        );

        if within(dx, dy, config.threshold_stop) {
            self.state.reset();
            emitter.set_channel_delta(self.channel, 0, 0);
            emitter.flush();
            debug!("{:?} inertia stopped naturally", self.channel);
            return;
        }

        self.state.velocity_x = dx;
        self.state.velocity_y = dy;
        self.state.is_inertial = true;
        emitter.set_channel_delta(self.channel, dx, dy);
        emitter.flush();
        self.tick.schedule(now, config.interval());
    }
}

struct Inner<E> {
    movement: ChannelEngine,
    scroll: ChannelEngine,
    emitter: E,
}

impl<E> Inner<E> {
    fn channel_mut(&mut self, channel: MotionChannel) -> &mut ChannelEngine {
        match channel {
            MotionChannel::Movement => &mut self.movement,
            MotionChannel::Scroll => &mut self.scroll,
        }
    }

    fn channel(&self, channel: MotionChannel) -> &ChannelEngine {
        match channel {
            MotionChannel::Movement => &self.movement,
            MotionChannel::Scroll => &self.scroll,
        }
    }
}

/// Inertia engine for pointer movement and scroll.
///
/// Feed live samples with [`InertiaEngine::process`] from any task and run
/// [`InertiaEngine::run`] once to drive the decay ticks.
pub struct InertiaEngine<M: RawMutex, E: ReportEmitter> {
    config: InertiaConfig,
    inner: Mutex<M, RefCell<Inner<E>>>,
    /// Wakes the run loop when a tick is scheduled or cancelled
    schedule_changed: Signal<M, ()>,
}

impl<M: RawMutex, E: ReportEmitter> InertiaEngine<M, E> {
    pub const fn new(config: InertiaConfig, emitter: E) -> Self {
        Self {
            config,
            inner: Mutex::new(RefCell::new(Inner {
                movement: ChannelEngine::new(MotionChannel::Movement),
                scroll: ChannelEngine::new(MotionChannel::Scroll),
                emitter,
            })),
            schedule_changed: Signal::new(),
        }
    }

    pub fn config(&self) -> &InertiaConfig {
        &self.config
    }

    /// Process a live sample received now
    pub fn process(&self, sample: MotionSample) {
        self.process_at(sample, Instant::now());
    }

    /// Process a live sample received at `now`.
    ///
    /// Zero movement samples are ignored. Zero scroll samples are not, they
    /// still cancel a decaying movement channel.
    pub fn process_at(&self, sample: MotionSample, now: Instant) {
        let channel = sample.axis.channel();
        if channel == MotionChannel::Movement && sample.value == 0 {
            return;
        }

        let config = self.config.for_channel(channel);
        let schedule_changed = self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let mut changed = false;

            // Live input overrides autonomous decay instead of adding to it.
            // Fresh live motion is kept, so the Y sample of a packet doesn't wipe its X.
            let this = inner.channel_mut(channel);
            if this.state.is_autonomous() {
                trace!("{:?} inertia interrupted by live input", channel);
                this.cancel();
                changed = true;
            }

            let other = inner.channel_mut(channel.other());
            if other.state.active {
                trace!("{:?} inertia cancelled by {:?} input", other.channel, channel);
                other.cancel();
                changed = true;
            }

            inner.channel_mut(channel).ingest(sample, config, now) || changed
        });

        if schedule_changed {
            self.schedule_changed.signal(());
        }
    }

    /// Process all relative samples of a pointing event received at `now`
    pub fn process_pointing_event_at(&self, event: &PointingEvent, now: Instant) {
        for sample in event.samples() {
            self.process_at(sample, now);
        }
    }

    /// Run every tick that is due at `now`, returns the next deadline
    pub fn fire_due(&self, now: Instant) -> Option<Instant> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let Inner {
                movement,
                scroll,
                emitter,
            } = &mut *inner;
            movement.fire(&self.config.movement, now, emitter);
            scroll.fire(&self.config.scroll, now, emitter);
            earliest(movement.tick.deadline(), scroll.tick.deadline())
        })
    }

    /// Deadline of the earliest pending tick
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.lock(|inner| {
            let inner = inner.borrow();
            earliest(inner.movement.tick.deadline(), inner.scroll.tick.deadline())
        })
    }

    /// Copy of a channel's current state
    pub fn channel_state(&self, channel: MotionChannel) -> ChannelState {
        self.inner.lock(|inner| inner.borrow().channel(channel).state)
    }

    /// Whether a decay tick is pending for `channel`
    pub fn is_scheduled(&self, channel: MotionChannel) -> bool {
        self.inner.lock(|inner| inner.borrow().channel(channel).tick.is_pending())
    }

    /// Access the emitter under the engine lock
    pub fn with_emitter<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        self.inner.lock(|inner| f(&mut inner.borrow_mut().emitter))
    }

    /// Drive decay ticks forever.
    ///
    /// Sleeps until the earliest pending tick, or until a live sample changes
    /// the schedule.
    pub async fn run(&self) -> ! {
        loop {
            match self.fire_due(Instant::now()) {
                Some(deadline) => {
                    select(Timer::at(deadline), self.schedule_changed.wait()).await;
                }
                None => self.schedule_changed.wait().await,
            }
        }
    }
}
