//! A tiny label application used by the CLI, the bench and the tests.
//!
//! The label starts as [`TEXT_DEFAULT`] and a one-shot clock callback flips it
//! to [`TEXT_CHANGED`] after [`INTERVAL`] seconds. Pressing `escape` finishes
//! the loop with the current text; so does the optional quit timer.

use flowstep_core::error::Result;
use flowstep_core::FlowSignal;

use crate::config::StartupConfig;
use crate::event_loop::EventLoop;
use crate::value::Value;
use crate::window::WindowEvent;

pub const TEXT_DEFAULT: &str = "default";
pub const TEXT_CHANGED: &str = "changed";
pub const INTERVAL: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Keys received, in order
    pub keys: Vec<String>,
    /// Custom events received, by name
    pub custom: Vec<String>,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: TEXT_DEFAULT.to_string(),
            keys: Vec::new(),
            custom: Vec::new(),
        }
    }
}

/// Builds the label app. `quit_after` schedules a `Quit` carrying the label
/// text that many seconds in.
pub fn build(config: StartupConfig, quit_after: Option<f64>) -> Result<EventLoop<Label>> {
    let mut ev = EventLoop::new(config, Label::default())?;

    ev.clock_mut().schedule_once(INTERVAL, |label: &mut Label, _| {
        label.text = TEXT_CHANGED.to_string();
    });

    if let Some(secs) = quit_after {
        let queue = ev.events();
        ev.clock_mut().schedule_once(secs, move |label: &mut Label, _| {
            queue.post(WindowEvent::Quit(Value::Str(label.text.clone())));
        });
    }

    ev.on_event(|label, event| match event {
        WindowEvent::Key(k) if k == "escape" => FlowSignal::Return(Value::Str(label.text.clone())),
        WindowEvent::Key(k) => {
            label.keys.push(k.clone());
            FlowSignal::Continue
        }
        WindowEvent::Custom(name, _) => {
            label.custom.push(name.clone());
            FlowSignal::Continue
        }
        _ => FlowSignal::Continue,
    });

    Ok(ev)
}
