//! The emulated device: command dispatch, periodic status emission, and
//! named-pipe plumbing.
//!
//! Two long-lived tasks share one outbound stream:
//! - the inbound dispatch loop ([`run_dispatch_loop`]): frame in, command
//!   out, response frame back;
//! - the status emitter ([`run_status_emitter`]): an unsolicited
//!   device-status frame on a fixed cadence.
//!
//! Both write through a [`scopesim_frame::SharedWriter`], which is the
//! only state they share.

pub mod dispatch;
pub mod emitter;
pub mod error;
pub mod fixture;
pub mod service;

#[cfg(unix)]
pub mod fifo;

pub use dispatch::dispatch;
pub use emitter::{run_status_emitter, STATUS_PERIOD};
pub use error::{DeviceError, Result};
pub use fixture::Fixtures;
pub use service::{command_frame, run_dispatch_loop};

#[cfg(unix)]
pub use fifo::Fifo;
