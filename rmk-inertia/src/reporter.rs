//! Report output of the inertia engine
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use usbd_hid::descriptor::MouseReport;

use crate::event::MotionChannel;

/// Sink of the motion deltas produced by decay ticks.
///
/// The engine calls `set_channel_delta` followed by exactly one `flush` for
/// every report. Both are called while the engine lock is held, so
/// implementations must not call back into the engine.
pub trait ReportEmitter {
    /// Set the pending delta of `channel`
    fn set_channel_delta(&mut self, channel: MotionChannel, dx: i16, dy: i16);

    /// Send the pending report
    fn flush(&mut self);
}

/// Emitter that sends HID mouse reports to a channel.
///
/// Movement goes to `x`/`y`, scroll goes to `pan`/`wheel`. Values are
/// clamped to the `i8` range of the boot mouse report.
pub struct MouseReportEmitter<'a, M: RawMutex, const N: usize> {
    sender: Sender<'a, M, MouseReport, N>,
    report: MouseReport,
}

impl<'a, M: RawMutex, const N: usize> MouseReportEmitter<'a, M, N> {
    pub fn new(sender: Sender<'a, M, MouseReport, N>) -> Self {
        Self {
            sender,
            report: empty_report(),
        }
    }

    /// Buttons held down, copied into every report
    pub fn set_buttons(&mut self, buttons: u8) {
        self.report.buttons = buttons;
    }
}

impl<M: RawMutex, const N: usize> ReportEmitter for MouseReportEmitter<'_, M, N> {
    fn set_channel_delta(&mut self, channel: MotionChannel, dx: i16, dy: i16) {
        match channel {
            MotionChannel::Movement => {
                self.report.x = to_i8(dx);
                self.report.y = to_i8(dy);
            }
            MotionChannel::Scroll => {
                self.report.pan = to_i8(dx);
                self.report.wheel = to_i8(dy);
            }
        }
    }

    fn flush(&mut self) {
        let report = MouseReport {
            buttons: self.report.buttons,
            x: self.report.x,
            y: self.report.y,
            wheel: self.report.wheel,
            pan: self.report.pan,
        };
        if self.sender.try_send(report).is_err() {
            error!("Send mouse report error, channel is full");
        }
        // Deltas are one-shot, buttons stay
        let buttons = self.report.buttons;
        self.report = empty_report();
        self.report.buttons = buttons;
    }
}

fn empty_report() -> MouseReport {
    MouseReport {
        buttons: 0,
        x: 0,
        y: 0,
        wheel: 0,
        pan: 0,
    }
}

fn to_i8(v: i16) -> i8 {
    v.clamp(i8::MIN as i16, i8::MAX as i16) as i8
}

#[cfg(test)]
mod tests {
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;

    use super::*;

    #[test]
    fn test_movement_and_scroll_reports() {
        let channel: Channel<NoopRawMutex, MouseReport, 4> = Channel::new();
        let mut emitter = MouseReportEmitter::new(channel.sender());

        emitter.set_channel_delta(MotionChannel::Movement, 18, -300);
        emitter.flush();
        emitter.set_channel_delta(MotionChannel::Scroll, -2, 5);
        emitter.flush();

        let report = channel.try_receive().unwrap();
        assert_eq!((report.x, report.y, report.pan, report.wheel), (18, -128, 0, 0));
        let report = channel.try_receive().unwrap();
        assert_eq!((report.x, report.y, report.pan, report.wheel), (0, 0, -2, 5));
        assert!(channel.try_receive().is_err());
    }

    #[test]
    fn test_buttons_are_kept() {
        let channel: Channel<NoopRawMutex, MouseReport, 4> = Channel::new();
        let mut emitter = MouseReportEmitter::new(channel.sender());
        emitter.set_buttons(0b1);
        emitter.set_channel_delta(MotionChannel::Movement, 1, 1);
        emitter.flush();
        emitter.set_channel_delta(MotionChannel::Movement, 0, 0);
        emitter.flush();

        assert_eq!(channel.try_receive().unwrap().buttons, 0b1);
        assert_eq!(channel.try_receive().unwrap().buttons, 0b1);
    }

    #[test]
    fn test_full_channel_drops_report() {
        let channel: Channel<NoopRawMutex, MouseReport, 1> = Channel::new();
        let mut emitter = MouseReportEmitter::new(channel.sender());
        emitter.set_channel_delta(MotionChannel::Movement, 1, 0);
        emitter.flush();
        emitter.set_channel_delta(MotionChannel::Movement, 2, 0);
        emitter.flush();

        assert_eq!(channel.try_receive().unwrap().x, 1);
        assert!(channel.try_receive().is_err());
    }
}
