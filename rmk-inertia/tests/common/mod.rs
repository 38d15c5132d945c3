use embassy_time::Instant;
use rmk_inertia::{InertiaEngine, MotionChannel, ReportEmitter};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Emitter that records every flushed report
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingEmitter {
    pending: Option<(MotionChannel, i16, i16)>,
    pub reports: Vec<(MotionChannel, i16, i16)>,
    pub flushes: usize,
}

impl ReportEmitter for RecordingEmitter {
    fn set_channel_delta(&mut self, channel: MotionChannel, dx: i16, dy: i16) {
        assert!(self.pending.is_none(), "delta set twice without flush");
        self.pending = Some((channel, dx, dy));
    }

    fn flush(&mut self) {
        let report = self.pending.take().expect("flush without delta");
        self.reports.push(report);
        self.flushes += 1;
    }
}

/// Fire every pending tick in order until both channels are idle.
///
/// Returns the time of the last tick.
#[allow(dead_code)]
pub fn run_until_idle<M, E>(engine: &InertiaEngine<M, E>, max_ticks: usize) -> Instant
where
    M: embassy_sync::blocking_mutex::raw::RawMutex,
    E: ReportEmitter,
{
    let mut now = Instant::from_millis(0);
    let mut ticks = 0;
    while let Some(deadline) = engine.next_deadline() {
        now = deadline;
        engine.fire_due(now);
        ticks += 1;
        assert!(ticks <= max_ticks, "inertia did not stop within {} ticks", max_ticks);
    }
    now
}
