//! Input processor running the inertia engine
//!
//! The processor observes pointing events on their way through the pipeline:
//! every event is fed to the engine and then forwarded unchanged, the decay
//! reports are emitted by the engine on its own timer.
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel;
use embassy_time::Instant;

use crate::engine::InertiaEngine;
use crate::event::{EventSubscriber, PointingEvent};
use crate::reporter::ReportEmitter;

/// Trait for tasks that run forever
pub trait Runnable {
    async fn run(&mut self) -> !;
}

/// Async event publisher
pub trait AsyncEventPublisher<T> {
    async fn publish_async(&self, message: T);
}

impl<'a, M: RawMutex, T, const N: usize> AsyncEventPublisher<T> for channel::Sender<'a, M, T, N> {
    async fn publish_async(&self, message: T) {
        self.send(message).await
    }
}

/// Process result of an input processor.
///
/// [`InertiaProcessor`] only observes events and always continues. `Stop` is
/// for processors chained around it that swallow an event.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProcessResult<E> {
    /// Pass the event to the next processor
    Continue(E),
    /// The event is consumed, nothing is forwarded
    Stop,
}

/// Processor that adds inertia to pointer movement and scroll.
///
/// Events are read from `subscriber`, fed to the engine, and published to
/// `downstream` so the live motion still reaches the host.
pub struct InertiaProcessor<'a, M, E, S, P>
where
    M: RawMutex,
    E: ReportEmitter,
    S: EventSubscriber<PointingEvent>,
    P: AsyncEventPublisher<PointingEvent>,
{
    engine: &'a InertiaEngine<M, E>,
    subscriber: S,
    downstream: P,
}

impl<'a, M, E, S, P> InertiaProcessor<'a, M, E, S, P>
where
    M: RawMutex,
    E: ReportEmitter,
    S: EventSubscriber<PointingEvent>,
    P: AsyncEventPublisher<PointingEvent>,
{
    pub fn new(engine: &'a InertiaEngine<M, E>, subscriber: S, downstream: P) -> Self {
        Self {
            engine,
            subscriber,
            downstream,
        }
    }

    /// Feed the event to the engine. The event always continues down the pipeline.
    pub async fn process(&mut self, event: PointingEvent) -> ProcessResult<PointingEvent> {
        self.engine.process_pointing_event_at(&event, Instant::now());
        ProcessResult::Continue(event)
    }

    async fn forward_events(&mut self) -> ! {
        loop {
            let event = self.subscriber.next_event().await;
            match self.process(event).await {
                ProcessResult::Continue(event) => self.downstream.publish_async(event).await,
                ProcessResult::Stop => {}
            }
        }
    }
}

impl<'a, M, E, S, P> Runnable for InertiaProcessor<'a, M, E, S, P>
where
    M: RawMutex,
    E: ReportEmitter,
    S: EventSubscriber<PointingEvent>,
    P: AsyncEventPublisher<PointingEvent>,
{
    async fn run(&mut self) -> ! {
        let engine = self.engine;
        match select(engine.run(), self.forward_events()).await {
            Either::First(never) => never,
            Either::Second(never) => never,
        }
    }
}
