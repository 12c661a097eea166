//! Error handling types shared by the flowstep crates.
//!
//! Flow signals themselves never carry errors: a [`FlowSignal`](crate::FlowSignal)
//! is a control-flow decision, not a result channel. This module covers the
//! recoverable failures around it, such as an invalid start-up configuration
//! or asking an event loop for a mode it was not initialised in.
//!
//! # Examples
//!
//! ```rust
//! use flowstep_core::error::{Error, Result, error};
//!
//! let plain = Error::new("max_fps must be positive");
//! let located = Error::at_frame("blocking loop requested", 12);
//! assert_eq!(located.to_string(), "blocking loop requested at frame 12");
//!
//! fn check_fps(fps: u32) -> Result<u32> {
//!     if fps == 0 {
//!         error("max_fps must be positive")
//!     } else {
//!         Ok(fps)
//!     }
//! }
//! assert!(check_fps(0).is_err());
//! # let _ = plain;
//! ```

use std::fmt;

/// An error raised around a driven loop.
///
/// Each error has a human-readable message and, when the failure happened
/// while a loop was already running, the frame it happened on.
///
/// # Examples
///
/// ```rust
/// use flowstep_core::Error;
///
/// let generic = Error::new("config file not found");
/// assert_eq!(generic.frame, None);
///
/// let located = Error::at_frame("event loop already finished", 42);
/// println!("{}", located); // "event loop already finished at frame 42"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,

    /// Frame counter of the loop when the error occurred, if it was running
    pub frame: Option<u64>,
}

impl Error {
    /// Creates a new error with the given message and no frame information.
    ///
    /// Suitable for configuration problems and anything raised before the
    /// first frame.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            frame: None,
        }
    }

    /// Creates a new error tied to the frame on which it happened.
    pub fn at_frame(msg: impl Into<String>, frame: u64) -> Self {
        Self {
            msg: msg.into(),
            frame: Some(frame),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frame {
            Some(frame) => write!(f, "{} at frame {}", self.msg, frame),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}

/// A specialized `Result` type for flowstep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create an error result.
///
/// Shorthand for `Err(Error::new(msg))`.
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}

/// Convenience function to create an error result tied to a frame.
///
/// Shorthand for `Err(Error::at_frame(msg, frame))`.
pub fn error_at<T>(frame: u64, msg: impl Into<String>) -> Result<T> {
    Err(Error::at_frame(msg, frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_frame_is_just_the_message() {
        assert_eq!(Error::new("bad config").to_string(), "bad config");
    }

    #[test]
    fn display_with_frame_appends_location() {
        let err: Result<()> = error_at(7, "loop finished");
        assert_eq!(err.unwrap_err().to_string(), "loop finished at frame 7");
    }

    #[test]
    fn conversions_from_strings() {
        let a: Error = "oops".into();
        let b: Error = String::from("oops").into();
        assert_eq!(a, b);
        assert_eq!(a.frame, None);
    }
}
