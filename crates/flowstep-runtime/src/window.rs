//! Window events and the one-event-per-poll drain step.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use flowstep_core::FlowSignal;
use tracing::{debug, info, trace};

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// A key press, by key name
    Key(String),
    /// The window was resized
    Resize { width: u32, height: u32 },
    /// Application-defined event with a payload
    Custom(String, Value),
    /// Enter the pause loop
    Pause,
    /// Leave the pause loop
    Resume,
    /// The window was closed; finishes the loop with `Value::Unit`
    Close,
    /// Finish the loop with the given value
    Quit(Value),
}

impl WindowEvent {
    /// Events that are still honoured while the window is paused.
    fn survives_pause(&self) -> bool {
        matches!(self, WindowEvent::Resume | WindowEvent::Close | WindowEvent::Quit(_))
    }
}

/// Shared handle to a window's pending events.
///
/// Cloning the handle does not copy the queue, so scheduled callbacks and the
/// host can both post into the same window. The handle is single-threaded.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Rc<RefCell<VecDeque<WindowEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self { Self::default() }

    pub fn post(&self, event: WindowEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    pub fn len(&self) -> usize { self.inner.borrow().len() }

    pub fn is_empty(&self) -> bool { self.inner.borrow().is_empty() }

    pub fn clear(&self) { self.inner.borrow_mut().clear(); }

    fn pop(&self) -> Option<WindowEvent> {
        self.inner.borrow_mut().pop_front()
    }
}

/// Event handler registered on a window.
///
/// Handlers answer with the flow decision for the event: `Continue` lets the
/// next handler see it, anything else ends dispatch and becomes the result of
/// the poll.
pub type Handler<S> = Box<dyn FnMut(&mut S, &WindowEvent) -> FlowSignal<Value>>;

pub struct Window<S> {
    queue: EventQueue,
    handlers: Vec<Handler<S>>,
    paused: bool,
    size: (u32, u32),
    redraws: u64,
    dropped: u64,
}

impl<S> Default for Window<S> {
    fn default() -> Self { Self::new() }
}

impl<S> Window<S> {
    pub fn new() -> Self {
        Self {
            queue: EventQueue::new(),
            handlers: Vec::new(),
            paused: false,
            size: (800, 600),
            redraws: 0,
            dropped: 0,
        }
    }

    pub fn events(&self) -> EventQueue { self.queue.clone() }

    pub fn is_paused(&self) -> bool { self.paused }

    pub fn size(&self) -> (u32, u32) { self.size }

    pub fn redraws(&self) -> u64 { self.redraws }

    /// Events discarded by the pause loop so far.
    pub fn dropped(&self) -> u64 { self.dropped }

    pub fn on_event<F>(&mut self, handler: F)
    where
        F: FnMut(&mut S, &WindowEvent) -> FlowSignal<Value> + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub(crate) fn redraw(&mut self) {
        self.redraws += 1;
    }

    pub(crate) fn reset(&mut self) {
        self.queue.clear();
        self.paused = false;
    }

    /// Processes at most one pending event.
    ///
    /// - no event pending: `Break`, the drain loop is done for this frame
    /// - `Quit(v)`: `Return(v)`; `Close`: `Return(Value::Unit)`
    /// - while paused, anything but `Resume`, `Close` and `Quit` is dropped
    /// - otherwise the handlers decide, `Continue` if none objects
    pub fn slave_poll(&mut self, state: &mut S) -> FlowSignal<Value> {
        let event = match self.queue.pop() {
            Some(event) => event,
            None => return FlowSignal::Break,
        };
        trace!(?event, paused = self.paused, "window event");

        if self.paused && !event.survives_pause() {
            self.dropped += 1;
            return FlowSignal::Continue;
        }

        match event {
            WindowEvent::Quit(value) => {
                debug!(%value, "quit requested");
                FlowSignal::Return(value)
            }
            WindowEvent::Close => {
                debug!("window closed");
                FlowSignal::Return(Value::Unit)
            }
            WindowEvent::Pause => {
                if !self.paused {
                    info!("entering pause loop");
                    self.paused = true;
                }
                self.dispatch(state, &WindowEvent::Pause)
            }
            WindowEvent::Resume => {
                if self.paused {
                    info!(dropped = self.dropped, "leaving pause loop");
                    self.paused = false;
                }
                self.dispatch(state, &WindowEvent::Resume)
            }
            WindowEvent::Resize { width, height } => {
                self.size = (width, height);
                self.dispatch(state, &WindowEvent::Resize { width, height })
            }
            other => self.dispatch(state, &other),
        }
    }

    fn dispatch(&mut self, state: &mut S, event: &WindowEvent) -> FlowSignal<Value> {
        for handler in self.handlers.iter_mut() {
            match handler(state, event) {
                FlowSignal::Continue => {}
                decided => return decided,
            }
        }
        FlowSignal::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> WindowEvent {
        WindowEvent::Key(k.to_string())
    }

    #[test]
    fn empty_queue_breaks() {
        let mut window: Window<()> = Window::new();
        assert_eq!(window.slave_poll(&mut ()), FlowSignal::Break);
    }

    #[test]
    fn one_event_per_poll() {
        let mut window: Window<Vec<String>> = Window::new();
        window.on_event(|seen, event| {
            if let WindowEvent::Key(k) = event {
                seen.push(k.clone());
            }
            FlowSignal::Continue
        });
        let queue = window.events();
        queue.post(key("a"));
        queue.post(key("b"));

        let mut seen = Vec::new();
        assert_eq!(window.slave_poll(&mut seen), FlowSignal::Continue);
        assert_eq!(seen, vec!["a"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(window.slave_poll(&mut seen), FlowSignal::Continue);
        assert_eq!(window.slave_poll(&mut seen), FlowSignal::Break);
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn quit_and_close_return() {
        let mut window: Window<()> = Window::new();
        window.events().post(WindowEvent::Quit(Value::Int(3)));
        window.events().post(WindowEvent::Close);
        assert_eq!(window.slave_poll(&mut ()), FlowSignal::Return(Value::Int(3)));
        assert_eq!(window.slave_poll(&mut ()), FlowSignal::Return(Value::Unit));
    }

    #[test]
    fn first_deciding_handler_wins() {
        let mut window: Window<Vec<&'static str>> = Window::new();
        window.on_event(|log, _| {
            log.push("first");
            FlowSignal::Continue
        });
        window.on_event(|log, _| {
            log.push("second");
            FlowSignal::Break
        });
        window.on_event(|log, _| {
            log.push("third");
            FlowSignal::Return(Value::Unit)
        });
        window.events().post(key("x"));

        let mut log = Vec::new();
        assert_eq!(window.slave_poll(&mut log), FlowSignal::Break);
        assert_eq!(log, vec!["first", "second"]);
    }

    #[test]
    fn pause_loop_drops_events_until_resume() {
        let mut window: Window<u32> = Window::new();
        window.on_event(|count, event| {
            if let WindowEvent::Key(_) = event {
                *count += 1;
            }
            FlowSignal::Continue
        });
        let queue = window.events();
        queue.post(WindowEvent::Pause);
        queue.post(key("lost"));
        queue.post(WindowEvent::Resize { width: 1, height: 1 });
        queue.post(WindowEvent::Resume);
        queue.post(key("kept"));

        let mut count = 0;
        while window.slave_poll(&mut count).is_continue() {}
        assert_eq!(count, 1);
        assert_eq!(window.dropped(), 2);
        assert!(!window.is_paused());
        assert_eq!(window.size(), (800, 600));
    }

    #[test]
    fn quit_is_honoured_while_paused() {
        let mut window: Window<()> = Window::new();
        window.events().post(WindowEvent::Pause);
        window.events().post(WindowEvent::Quit(Value::Bool(true)));
        assert_eq!(window.slave_poll(&mut ()), FlowSignal::Continue);
        assert!(window.is_paused());
        assert_eq!(window.slave_poll(&mut ()), FlowSignal::Return(Value::Bool(true)));
    }

    #[test]
    fn resize_updates_size() {
        let mut window: Window<()> = Window::new();
        window.events().post(WindowEvent::Resize { width: 320, height: 240 });
        assert!(window.slave_poll(&mut ()).is_continue());
        assert_eq!(window.size(), (320, 240));
    }
}
