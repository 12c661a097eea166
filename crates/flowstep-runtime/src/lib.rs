//! flowstep runtime: a small event loop that can either own its main loop or
//! be driven one step at a time by a host.
//!
//! The loop is made of a frame [`Clock`] servicing scheduled callbacks and a
//! [`Window`] draining synthetic [`WindowEvent`]s. Each drain step reports its
//! outcome as a [`FlowSignal`](flowstep_core::FlowSignal), which is what lets
//! the same loop body run under [`EventLoop::run`] or under a host's own loop.

pub mod clock;
pub mod config;
pub mod demo;
pub mod event_loop;
pub mod value;
pub mod window;

pub use clock::{Clock, ScheduleId};
pub use config::{parse_switch, StartupConfig};
pub use event_loop::EventLoop;
pub use value::Value;
pub use window::{EventQueue, Handler, Window, WindowEvent};
