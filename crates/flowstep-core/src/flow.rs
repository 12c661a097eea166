//! Flow signals: the loop-control decision of one driven step.
//!
//! A framework running its own main loop decides every iteration whether to
//! `continue`, `break` out of the innermost loop or `return` a value. Once the
//! loop body is driven from the outside those keywords cannot cross the call
//! boundary, so the step hands the decision back as a [`FlowSignal`] and the
//! host replays it in its own loop:
//!
//! ```rust
//! use flowstep_core::FlowSignal;
//!
//! fn host(mut poll: impl FnMut() -> FlowSignal<i64>) -> Option<i64> {
//!     loop {
//!         match poll() {
//!             FlowSignal::Return(value) => return Some(value),
//!             FlowSignal::Break => break,
//!             FlowSignal::Continue => continue,
//!         }
//!     }
//!     None
//! }
//!
//! let mut calls = 0;
//! let result = host(|| {
//!     calls += 1;
//!     if calls == 3 { FlowSignal::Return(42) } else { FlowSignal::Continue }
//! });
//! assert_eq!(result, Some(42));
//! ```

use std::fmt;
use std::ops::ControlFlow;

/// What the native loop would have done after one step.
#[must_use = "a flow signal must be matched by the host loop"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowSignal<T> {
    /// Nothing exceptional happened; go on with the next iteration
    #[default]
    Continue,
    /// Leave the innermost loop without a value
    Break,
    /// Stop driving and hand the value back to the caller
    Return(T),
}

/// Payload-free discriminant of a [`FlowSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlowKind {
    Continue,
    Break,
    Return,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowKind::Continue => "continue",
            FlowKind::Break => "break",
            FlowKind::Return => "return",
        };
        f.write_str(name)
    }
}

/// Why a loop body left its loop, as seen through [`ControlFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopExit<T> {
    Break,
    Return(T),
}

impl<T> FlowSignal<T> {
    pub fn is_continue(&self) -> bool {
        matches!(self, FlowSignal::Continue)
    }

    pub fn is_break(&self) -> bool {
        matches!(self, FlowSignal::Break)
    }

    pub fn is_return(&self) -> bool {
        matches!(self, FlowSignal::Return(_))
    }

    pub fn kind(&self) -> FlowKind {
        match self {
            FlowSignal::Continue => FlowKind::Continue,
            FlowSignal::Break => FlowKind::Break,
            FlowSignal::Return(_) => FlowKind::Return,
        }
    }

    /// Takes the payload out of a `Return` signal.
    ///
    /// Prefer a `match` on the signal; this accessor exists for hosts that
    /// have already checked [`is_return`](Self::is_return).
    ///
    /// # Panics
    ///
    /// Panics when called on `Continue` or `Break`. There is no payload to
    /// hand out and inventing one would hide a bug in the host.
    #[track_caller]
    pub fn return_value(self) -> T {
        match self {
            FlowSignal::Return(value) => value,
            other => panic!(
                "return_value() called on a `{}` flow signal; only `return` carries a value",
                other.kind()
            ),
        }
    }

    /// Borrows the payload of a `Return` signal, `None` for the other variants.
    pub fn as_return(&self) -> Option<&T> {
        match self {
            FlowSignal::Return(value) => Some(value),
            _ => None,
        }
    }

    /// Maps the `Return` payload, leaving `Continue` and `Break` untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FlowSignal<U> {
        match self {
            FlowSignal::Continue => FlowSignal::Continue,
            FlowSignal::Break => FlowSignal::Break,
            FlowSignal::Return(value) => FlowSignal::Return(f(value)),
        }
    }
}

impl<T> From<FlowSignal<T>> for ControlFlow<LoopExit<T>> {
    fn from(signal: FlowSignal<T>) -> Self {
        match signal {
            FlowSignal::Continue => ControlFlow::Continue(()),
            FlowSignal::Break => ControlFlow::Break(LoopExit::Break),
            FlowSignal::Return(value) => ControlFlow::Break(LoopExit::Return(value)),
        }
    }
}
