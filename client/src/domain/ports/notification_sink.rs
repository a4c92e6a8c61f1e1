//! Driven port for user-facing messages.
//!
//! Delivery is fire-and-forget: callers log a [`NotificationSinkError`] and
//! carry on, so a broken toast mechanism never changes refresh state.

use std::fmt;
use std::time::Duration;

use super::define_port_error;

/// Screen anchor for a transient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastPosition {
    /// Top right corner.
    #[default]
    TopRight,
    /// Top left corner.
    TopLeft,
    /// Bottom right corner.
    BottomRight,
    /// Bottom left corner.
    BottomLeft,
    /// Centre of the screen.
    Center,
}

impl ToastPosition {
    /// Kebab-case name used by web toast libraries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for ToastPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text shown to the user.
    pub message: String,
    /// How long the message stays visible.
    pub duration: Duration,
    /// Where the message is anchored.
    pub position: ToastPosition,
}

impl Notification {
    /// Build a top-right toast.
    pub fn top_right(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration,
            position: ToastPosition::TopRight,
        }
    }
}

define_port_error! {
    /// Errors raised by the notification mechanism itself.
    pub enum NotificationSinkError {
        /// The display channel is gone.
        Closed =>
            "notification channel closed",
        /// The message could not be rendered.
        Rejected { message: String } =>
            "notification rejected: {message}",
    }
}

/// Port for showing messages to the user.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    /// Show a transient message.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationSinkError`] when the message cannot be shown.
    fn notify(&self, notification: &Notification) -> Result<(), NotificationSinkError>;

    /// Show a persistent, blocking error message.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationSinkError`] when the message cannot be shown.
    fn show_error(&self, message: &str) -> Result<(), NotificationSinkError>;
}
