//! The polling contract between a driven loop body and its host.
//!
//! An adapter implements [`DrivenLoop`]: every [`poll`](DrivenLoop::poll) does
//! one unit of internal work and answers with exactly one [`FlowSignal`]. The
//! host owns the real loop. [`drive_once_loop`] and [`drive_nested`] are the
//! two loop shapes hosts usually write by hand, bounded by a poll budget.
//!
//! After an adapter has produced `Return` it must not be polled again until
//! it is reinitialised. The drivers here stop on the first `Return`; hosts
//! writing their own loops have to do the same.

use crate::flow::{FlowKind, FlowSignal};

/// A loop body that is driven one step at a time from the outside.
pub trait DrivenLoop {
    /// Payload of the final `Return` signal
    type Output;

    /// Performs one step and reports what the native loop would do next.
    fn poll(&mut self) -> FlowSignal<Self::Output>;
}

impl<T, F> DrivenLoop for F
where
    F: FnMut() -> FlowSignal<T>,
{
    type Output = T;

    fn poll(&mut self) -> FlowSignal<T> {
        self()
    }
}

/// How a bounded drive ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveOutcome<T> {
    /// The adapter finished and handed back this value
    Returned(T),
    /// The adapter asked to leave the loop (single-loop drives only)
    Broke,
    /// The poll budget ran out first
    Exhausted,
}

impl<T> DriveOutcome<T> {
    pub fn returned(self) -> Option<T> {
        match self {
            DriveOutcome::Returned(value) => Some(value),
            _ => None,
        }
    }
}

/// Counters collected while driving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveStats {
    /// Number of `poll()` calls issued
    pub polls: usize,
    /// How many of them answered `Continue`
    pub continues: usize,
    /// How many of them answered `Break`
    pub breaks: usize,
    /// How many inner loops the nested driver entered
    pub passes: usize,
}

impl DriveStats {
    fn record<T>(&mut self, signal: &FlowSignal<T>) {
        self.polls += 1;
        match signal.kind() {
            FlowKind::Continue => self.continues += 1,
            FlowKind::Break => self.breaks += 1,
            FlowKind::Return => {}
        }
    }
}

/// Result of a bounded drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drive<T> {
    pub outcome: DriveOutcome<T>,
    pub stats: DriveStats,
}

/// Drives `adapter` in a single loop.
///
/// `Continue` keeps polling, `Break` leaves the loop, `Return` stops with the
/// value. At most `max_polls` polls are issued.
///
/// ```rust
/// use flowstep_core::{drive_once_loop, DriveOutcome, FlowSignal};
///
/// let mut n = 0;
/// let drive = drive_once_loop(
///     &mut || { n += 1; if n == 3 { FlowSignal::<()>::Break } else { FlowSignal::Continue } },
///     10,
/// );
/// assert_eq!(drive.outcome, DriveOutcome::Broke);
/// assert_eq!(drive.stats.polls, 3);
/// ```
pub fn drive_once_loop<D: DrivenLoop + ?Sized>(adapter: &mut D, max_polls: usize) -> Drive<D::Output> {
    let mut stats = DriveStats { passes: 1, ..DriveStats::default() };
    while stats.polls < max_polls {
        let signal = adapter.poll();
        stats.record(&signal);
        match signal {
            FlowSignal::Continue => continue,
            FlowSignal::Break => return Drive { outcome: DriveOutcome::Broke, stats },
            FlowSignal::Return(value) => return Drive { outcome: DriveOutcome::Returned(value), stats },
        }
    }
    Drive { outcome: DriveOutcome::Exhausted, stats }
}

/// Drives `adapter` from an outer loop wrapping an inner poll loop.
///
/// `Break` only ends the inner loop; the outer loop then starts a new pass.
/// Only `Return` or an exhausted budget end the drive, so the outcome is
/// never [`DriveOutcome::Broke`].
pub fn drive_nested<D: DrivenLoop + ?Sized>(adapter: &mut D, max_polls: usize) -> Drive<D::Output> {
    let mut stats = DriveStats::default();
    while stats.polls < max_polls {
        stats.passes += 1;
        while stats.polls < max_polls {
            let signal = adapter.poll();
            stats.record(&signal);
            match signal {
                FlowSignal::Return(value) => return Drive { outcome: DriveOutcome::Returned(value), stats },
                FlowSignal::Break => break,
                FlowSignal::Continue => continue,
            }
        }
    }
    Drive { outcome: DriveOutcome::Exhausted, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adapter replaying a fixed script, recording every signal it hands out.
    struct Scripted<F: FnMut(usize) -> FlowSignal<i64>> {
        calls: usize,
        script: F,
        seen: Vec<FlowSignal<i64>>,
    }

    impl<F: FnMut(usize) -> FlowSignal<i64>> Scripted<F> {
        fn new(script: F) -> Self {
            Self { calls: 0, script, seen: Vec::new() }
        }
    }

    impl<F: FnMut(usize) -> FlowSignal<i64>> DrivenLoop for Scripted<F> {
        type Output = i64;

        fn poll(&mut self) -> FlowSignal<i64> {
            self.calls += 1;
            let signal = (self.script)(self.calls);
            self.seen.push(signal);
            signal
        }
    }

    #[test]
    fn stops_on_first_return() {
        let mut adapter = Scripted::new(|call| if call == 10 { FlowSignal::Return(42) } else { FlowSignal::Continue });
        let drive = drive_nested(&mut adapter, 20);

        assert_eq!(drive.outcome, DriveOutcome::Returned(42));
        assert_eq!(adapter.calls, 10);
        assert_eq!(drive.stats.polls, 10);
        assert_eq!(drive.stats.continues, 9);
        assert!(adapter.seen[..9].iter().all(|s| s.is_continue()));
        assert_eq!(adapter.seen[9], FlowSignal::Return(42));
    }

    #[test]
    fn single_loop_also_stops_on_return() {
        let mut adapter = Scripted::new(|call| if call == 10 { FlowSignal::Return(42) } else { FlowSignal::Continue });
        let drive = drive_once_loop(&mut adapter, 20);
        assert_eq!(drive.outcome.returned(), Some(42));
        assert_eq!(adapter.calls, 10);
    }

    #[test]
    fn break_only_leaves_the_inner_loop() {
        let mut adapter = Scripted::new(|call| if call == 3 { FlowSignal::Break } else { FlowSignal::Continue });
        let drive = drive_nested(&mut adapter, 10);

        assert_eq!(drive.outcome, DriveOutcome::Exhausted);
        assert_eq!(drive.stats.polls, 10);
        assert_eq!(drive.stats.breaks, 1);
        assert_eq!(drive.stats.continues, 9);
        // the outer loop started a second pass after the break on call 3
        assert_eq!(drive.stats.passes, 2);
    }

    #[test]
    fn break_ends_a_single_loop_drive() {
        let mut adapter = Scripted::new(|call| if call == 3 { FlowSignal::Break } else { FlowSignal::Continue });
        let drive = drive_once_loop(&mut adapter, 10);
        assert_eq!(drive.outcome, DriveOutcome::Broke);
        assert_eq!(adapter.calls, 3);
    }

    #[test]
    fn always_continue_runs_until_budget() {
        let mut adapter = Scripted::new(|_| FlowSignal::Continue);
        let drive = drive_nested(&mut adapter, 25);

        assert_eq!(drive.outcome, DriveOutcome::Exhausted);
        assert_eq!(drive.stats.polls, 25);
        assert_eq!(drive.stats.continues, 25);
        assert_eq!(drive.stats.breaks, 0);
        assert!(adapter.seen.iter().all(|s| s.is_continue()));
    }

    #[test]
    fn zero_budget_never_polls() {
        let mut adapter = Scripted::new(|_| FlowSignal::Return(1));
        let drive = drive_nested(&mut adapter, 0);
        assert_eq!(drive.outcome, DriveOutcome::Exhausted);
        assert_eq!(adapter.calls, 0);
    }

    #[test]
    fn closures_are_adapters() {
        let mut ticks = 0u32;
        let mut adapter = || {
            ticks += 1;
            if ticks == 4 { FlowSignal::Return(ticks) } else { FlowSignal::Continue }
        };
        let drive = drive_once_loop(&mut adapter, 100);
        assert_eq!(drive.outcome, DriveOutcome::Returned(4));
    }

    #[test]
    fn trait_objects_can_be_driven() {
        let mut adapter = Scripted::new(|call| if call == 2 { FlowSignal::Return(7) } else { FlowSignal::Continue });
        let dynamic: &mut dyn DrivenLoop<Output = i64> = &mut adapter;
        assert_eq!(drive_nested(dynamic, 5).outcome, DriveOutcome::Returned(7));
    }
}
