//! Inertia for pointer movement and scroll.
//!
//! When a pointing device stops producing motion, [`InertiaEngine`] keeps
//! emitting decaying reports at a fixed cadence until the velocity drops below
//! a stop threshold. Pointer movement and scroll decay independently, and live
//! input on one of them cancels the decay of the other.
//!
//! ```rust,ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use embassy_sync::channel::Channel;
//! use rmk_inertia::{InertiaConfig, InertiaEngine, InertiaProcessor, MouseReportEmitter, Runnable};
//!
//! static EVENTS: Channel<CriticalSectionRawMutex, PointingEvent, 8> = Channel::new();
//! static FORWARD: Channel<CriticalSectionRawMutex, PointingEvent, 8> = Channel::new();
//! static REPORTS: Channel<CriticalSectionRawMutex, MouseReport, 16> = Channel::new();
//!
//! let engine = InertiaEngine::<CriticalSectionRawMutex, _>::new(
//!     InertiaConfig::default(),
//!     MouseReportEmitter::new(REPORTS.sender()),
//! );
//! let mut processor = InertiaProcessor::new(&engine, EVENTS.receiver(), FORWARD.sender());
//! processor.run().await;
//! ```
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod config;
pub mod decay;
pub mod engine;
pub mod event;
pub mod processor;
pub mod reporter;
pub mod scheduler;
pub mod state;

pub use config::{ChannelConfig, ConfigError, InertiaConfig};
pub use decay::{decay_factor_q8, decay_step};
pub use engine::InertiaEngine;
pub use event::{Axis, AxisEvent, AxisValType, MotionAxis, MotionChannel, MotionSample, PointingEvent};
pub use processor::{InertiaProcessor, ProcessResult, Runnable};
pub use reporter::{MouseReportEmitter, ReportEmitter};
pub use state::ChannelState;
pub use {embassy_futures, embassy_sync, embassy_time};
