//! Frame clock with one-shot and interval callbacks.
//!
//! Time is virtual: every [`Clock::tick`] advances it by exactly one frame
//! delta (`1 / max_fps` seconds), so a host stepping the loop at its own pace
//! still sees callbacks fire on the same frames every run.

use std::cmp::Ordering;

use tracing::trace;

/// Slack when comparing due times, so `0.5` fires on frame 30 at 60 fps.
const DUE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleId(u64);

type Callback<S> = Box<dyn FnMut(&mut S, f64) -> bool>;

struct Scheduled<S> {
    id: ScheduleId,
    due: f64,
    /// Time of scheduling or of the last run, for the `dt` argument
    last: f64,
    interval: Option<f64>,
    callback: Callback<S>,
}

pub struct Clock<S> {
    max_fps: u32,
    delta: f64,
    frames: u64,
    time: f64,
    next_id: u64,
    events: Vec<Scheduled<S>>,
}

impl<S> Clock<S> {
    pub fn new(max_fps: u32) -> Self {
        let max_fps = max_fps.max(1);
        Self {
            max_fps,
            delta: 1.0 / f64::from(max_fps),
            frames: 0,
            time: 0.0,
            next_id: 0,
            events: Vec::new(),
        }
    }

    pub fn max_fps(&self) -> u32 { self.max_fps }

    pub fn frame_delta(&self) -> f64 { self.delta }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 { self.frames }

    /// Virtual seconds elapsed.
    pub fn time(&self) -> f64 { self.time }

    /// Number of callbacks still waiting to fire.
    pub fn pending(&self) -> usize { self.events.len() }

    /// Runs `callback` once, `delay` seconds from now.
    ///
    /// A zero or negative delay fires on the next tick.
    pub fn schedule_once<F>(&mut self, delay: f64, callback: F) -> ScheduleId
    where
        F: FnOnce(&mut S, f64) + 'static,
    {
        let mut callback = Some(callback);
        self.push(delay, None, Box::new(move |state: &mut S, dt: f64| {
            if let Some(f) = callback.take() {
                f(state, dt);
            }
            false
        }))
    }

    /// Runs `callback` every `interval` seconds until it returns `false`.
    ///
    /// An interval shorter than a frame fires once per tick.
    pub fn schedule_interval<F>(&mut self, interval: f64, callback: F) -> ScheduleId
    where
        F: FnMut(&mut S, f64) -> bool + 'static,
    {
        let interval = interval.max(0.0);
        self.push(interval, Some(interval), Box::new(callback))
    }

    /// Cancels a pending callback. Returns `false` if it already ran or was cancelled.
    pub fn unschedule(&mut self, id: ScheduleId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        before != self.events.len()
    }

    /// Advances one frame and runs every callback that became due.
    ///
    /// Callbacks run ordered by due time, ties in scheduling order. Returns how
    /// many ran.
    pub fn tick(&mut self, state: &mut S) -> usize {
        self.frames += 1;
        self.time = self.frames as f64 * self.delta;
        let now = self.time;

        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.events)
            .into_iter()
            .partition(|e| e.due <= now + DUE_EPSILON);
        self.events = rest;
        due.sort_by(|a, b| {
            a.due
                .partial_cmp(&b.due)
                .unwrap_or(Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });

        let ran = due.len();
        for mut event in due {
            let dt = now - event.last;
            let keep = (event.callback)(state, dt);
            trace!(frame = self.frames, id = event.id.0, dt, keep, "clock callback");
            if let (true, Some(interval)) = (keep, event.interval) {
                event.last = now;
                event.due += interval;
                if event.due <= now + DUE_EPSILON {
                    event.due = now + interval.max(self.delta);
                }
                self.events.push(event);
            }
        }
        ran
    }

    fn push(&mut self, delay: f64, interval: Option<f64>, callback: Callback<S>) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        self.events.push(Scheduled {
            id,
            due: self.time + delay.max(0.0),
            last: self.time,
            interval,
            callback,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_advances_one_delta_per_tick() {
        let mut clock: Clock<()> = Clock::new(50);
        for _ in 0..25 {
            clock.tick(&mut ());
        }
        assert_eq!(clock.frames(), 25);
        assert!((clock.time() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn once_fires_on_the_due_frame_only() {
        let mut clock: Clock<Vec<u64>> = Clock::new(60);
        clock.schedule_once(0.5, |log: &mut Vec<u64>, _| log.push(30));
        let mut log = Vec::new();
        for frame in 1..=60 {
            clock.tick(&mut log);
            if frame < 30 {
                assert!(log.is_empty(), "fired early on frame {}", frame);
            }
        }
        assert_eq!(log, vec![30]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn zero_delay_fires_next_tick() {
        let mut clock: Clock<u32> = Clock::new(60);
        clock.schedule_once(0.0, |n: &mut u32, _| *n += 1);
        let mut n = 0;
        clock.tick(&mut n);
        assert_eq!(n, 1);
    }

    #[test]
    fn callbacks_run_in_due_then_schedule_order() {
        let mut clock: Clock<Vec<&'static str>> = Clock::new(10);
        clock.schedule_once(0.08, |log: &mut Vec<&'static str>, _| log.push("later"));
        clock.schedule_once(0.02, |log: &mut Vec<&'static str>, _| log.push("first"));
        clock.schedule_once(0.02, |log: &mut Vec<&'static str>, _| log.push("second"));
        let mut log = Vec::new();
        // all three are due on the first frame (0.1s)
        assert_eq!(clock.tick(&mut log), 3);
        assert_eq!(log, vec!["first", "second", "later"]);
    }

    #[test]
    fn interval_repeats_until_false() {
        let mut clock: Clock<u32> = Clock::new(10);
        clock.schedule_interval(0.2, |n: &mut u32, dt| {
            assert!((dt - 0.2).abs() < 1e-9);
            *n += 1;
            *n < 3
        });
        let mut n = 0;
        for _ in 0..20 {
            clock.tick(&mut n);
        }
        assert_eq!(n, 3);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn sub_frame_interval_fires_once_per_tick() {
        let mut clock: Clock<u32> = Clock::new(10);
        clock.schedule_interval(0.0, |n: &mut u32, _| {
            *n += 1;
            true
        });
        let mut n = 0;
        for _ in 0..5 {
            clock.tick(&mut n);
        }
        assert_eq!(n, 5);
    }

    #[test]
    fn unschedule_cancels_pending_callbacks() {
        let mut clock: Clock<u32> = Clock::new(60);
        let id = clock.schedule_once(0.0, |n: &mut u32, _| *n += 1);
        assert!(clock.unschedule(id));
        assert!(!clock.unschedule(id));
        let mut n = 0;
        clock.tick(&mut n);
        assert_eq!(n, 0);
    }
}
