//! The event loop: one frame clock, one window, two ways to run it.
//!
//! With `slave_mode` off the loop owns the iteration and [`EventLoop::run`]
//! blocks until a window event finishes it. With `slave_mode` on, `run` is
//! refused; the host calls [`EventLoop::start`] once and then steps the loop
//! itself, calling [`EventLoop::idle`] once per frame and
//! [`DrivenLoop::poll`] until it answers `Break` (frame drained) or `Return`
//! (loop finished):
//!
//! ```rust
//! use flowstep_core::{DrivenLoop, FlowSignal};
//! use flowstep_runtime::{EventLoop, StartupConfig, Value, WindowEvent};
//!
//! fn host(ev: &mut EventLoop<()>) -> Option<Value> {
//!     for _ in 0..120 {
//!         ev.idle();
//!         loop {
//!             match ev.poll() {
//!                 FlowSignal::Return(value) => return Some(value),
//!                 FlowSignal::Break => break,
//!                 FlowSignal::Continue => continue,
//!             }
//!         }
//!     }
//!     None
//! }
//!
//! let mut ev = EventLoop::new(StartupConfig::slave(), ()).unwrap();
//! ev.start().unwrap();
//! let queue = ev.events();
//! ev.clock_mut().schedule_once(1.0, move |_, _| queue.post(WindowEvent::Quit(Value::Int(7))));
//! assert_eq!(host(&mut ev), Some(Value::Int(7)));
//! ```

use std::thread;
use std::time::Duration;

use flowstep_core::error::{error, error_at, Result};
use flowstep_core::{DrivenLoop, FlowSignal};
use tracing::{debug, info, trace, warn};

use crate::clock::Clock;
use crate::config::StartupConfig;
use crate::value::Value;
use crate::window::{EventQueue, Window, WindowEvent};

pub struct EventLoop<S> {
    config: StartupConfig,
    state: S,
    clock: Clock<S>,
    window: Window<S>,
    /// Calls to `idle()` (or native frames), paused or not
    frames: u64,
    /// Set by `start()`, the host owns the iteration from then on
    driven: bool,
    /// Set once a poll produced `Return`, cleared by `reset()`
    finished: bool,
}

impl<S> EventLoop<S> {
    pub fn new(config: StartupConfig, state: S) -> Result<Self> {
        config.validate()?;
        info!(
            slave_mode = config.slave_mode,
            max_fps = config.max_fps,
            max_frames = ?config.max_frames,
            "event loop initialised"
        );
        Ok(Self {
            clock: Clock::new(config.max_fps),
            window: Window::new(),
            config,
            state,
            frames: 0,
            driven: false,
            finished: false,
        })
    }

    pub fn config(&self) -> &StartupConfig { &self.config }

    pub fn state(&self) -> &S { &self.state }

    pub fn state_mut(&mut self) -> &mut S { &mut self.state }

    pub fn into_state(self) -> S { self.state }

    pub fn clock(&self) -> &Clock<S> { &self.clock }

    pub fn clock_mut(&mut self) -> &mut Clock<S> { &mut self.clock }

    pub fn window(&self) -> &Window<S> { &self.window }

    pub fn window_mut(&mut self) -> &mut Window<S> { &mut self.window }

    /// Handle for posting window events into this loop.
    pub fn events(&self) -> EventQueue { self.window.events() }

    /// Frames run so far, paused frames included. The clock only counts the
    /// frames it ticked, see [`Clock::frames`].
    pub fn frames(&self) -> u64 { self.frames }

    pub fn is_finished(&self) -> bool { self.finished }

    pub fn is_driven(&self) -> bool { self.driven }

    pub fn on_event<F>(&mut self, handler: F)
    where
        F: FnMut(&mut S, &WindowEvent) -> FlowSignal<Value> + 'static,
    {
        self.window.on_event(handler);
    }

    /// Asks the loop to finish with `value` once the event is drained.
    pub fn stop(&self, value: Value) {
        self.window.events().post(WindowEvent::Quit(value));
    }

    /// Hands the iteration over to the host. Only valid in slave mode.
    pub fn start(&mut self) -> Result<()> {
        if !self.config.slave_mode {
            return error("start() is only available in slave mode; use run() for the blocking main loop");
        }
        if self.finished {
            return error_at(self.frames, "event loop already finished; call reset() first");
        }
        if !self.driven {
            info!("main loop handed to the host");
            self.driven = true;
        }
        Ok(())
    }

    /// Host entry points only work after `start()` and until the loop
    /// finishes. Logs and answers `true` when `op` must be skipped.
    fn refuse(&self, op: &str) -> bool {
        if !self.driven {
            warn!(frame = self.frames, "{}() before start() ignored; the loop is not host-driven", op);
            true
        } else if self.finished {
            warn!(frame = self.frames, "{}() on a finished event loop ignored", op);
            true
        } else {
            false
        }
    }

    /// Runs one frame: services the clock (unless paused) and redraws.
    ///
    /// Ignored unless the loop was handed over with `start()`.
    pub fn idle(&mut self) {
        if self.refuse("idle") {
            return;
        }
        self.frame();
    }

    /// Runs one full iteration of the native loop: a frame, then every
    /// pending event until the window is drained or the loop finishes.
    ///
    /// Answers `Continue` after a drained frame and `Return` when finished.
    /// Answers `Break` without doing any work before `start()` or after the
    /// loop finished.
    pub fn step(&mut self) -> FlowSignal<Value> {
        if self.refuse("step") {
            return FlowSignal::Break;
        }
        match self.iterate() {
            FlowSignal::Break => FlowSignal::Continue,
            signal => signal,
        }
    }

    /// The blocking main loop. Refused in slave mode.
    ///
    /// Returns the value of the event that finished the loop, or `Value::Unit`
    /// once `max_frames` frames have run.
    pub fn run(&mut self) -> Result<Value> {
        if self.config.slave_mode {
            return error("the blocking main loop is disabled in slave mode; drive the loop with poll()");
        }
        if self.finished {
            return error_at(self.frames, "event loop already finished; call reset() first");
        }
        info!("entering blocking main loop");
        let pace = Duration::from_secs_f64(self.config.frame_delta());
        let mut ran = 0;
        loop {
            if let Some(max) = self.config.max_frames {
                if ran >= max {
                    info!(frames = max, "frame limit reached");
                    return Ok(Value::Unit);
                }
            }
            ran += 1;
            if let FlowSignal::Return(value) = self.iterate() {
                info!(frames = self.frames, %value, "main loop finished");
                return Ok(value);
            }
            if self.config.pace_frames {
                thread::sleep(pace);
            }
        }
    }

    /// Makes a finished loop pollable again. Pending events are discarded,
    /// scheduled callbacks and the clock are kept.
    pub fn reset(&mut self) {
        debug!(frame = self.frames, "event loop reset");
        self.window.reset();
        self.finished = false;
    }

    fn frame(&mut self) {
        self.frames += 1;
        let ran = if self.window.is_paused() {
            0
        } else {
            self.clock.tick(&mut self.state)
        };
        self.window.redraw();
        trace!(frame = self.frames, ticks = self.clock.frames(), callbacks = ran, "frame");
    }

    fn drain_one(&mut self) -> FlowSignal<Value> {
        let signal = self.window.slave_poll(&mut self.state);
        if signal.is_return() {
            self.finished = true;
            debug!(frame = self.frames, "event loop finished");
        }
        signal
    }

    /// A frame followed by a full drain. `Break` means the window drained.
    fn iterate(&mut self) -> FlowSignal<Value> {
        self.frame();
        loop {
            match self.drain_one() {
                FlowSignal::Continue => continue,
                signal => return signal,
            }
        }
    }
}

impl<S> DrivenLoop for EventLoop<S> {
    type Output = Value;

    /// Processes at most one window event.
    ///
    /// Before `start()`, or again after `Return` without `reset()`, this does
    /// no work, logs a warning and answers `Break`.
    fn poll(&mut self) -> FlowSignal<Value> {
        if self.refuse("poll") {
            return FlowSignal::Break;
        }
        self.drain_one()
    }
}
