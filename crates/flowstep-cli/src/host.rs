//! The host side of slave mode: this process owns the loop.

use flowstep_core::{DrivenLoop, FlowSignal};
use flowstep_runtime::{EventLoop, Value};

/// Drives `ev` for at most `max_frames` frames.
///
/// The outer loop runs one frame per pass; the inner loop polls the window
/// until it is drained (`Break`) or the loop finishes (`Return`). `on_frame`
/// sees the loop after every drained frame. Returns `None` if the frame budget
/// runs out first.
pub fn drive_frames<S>(
    ev: &mut EventLoop<S>,
    max_frames: u64,
    mut on_frame: impl FnMut(&EventLoop<S>),
) -> Option<Value> {
    let mut frame = 0;
    while frame < max_frames {
        frame += 1;
        ev.idle();
        loop {
            match ev.poll() {
                FlowSignal::Return(value) => return Some(value),
                FlowSignal::Break => break,
                FlowSignal::Continue => continue,
            }
        }
        on_frame(ev);
    }
    None
}
