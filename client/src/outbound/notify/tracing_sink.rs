//! Notification sink that writes messages as structured log events.

use tracing::{error, info};

use crate::domain::ports::{Notification, NotificationSink, NotificationSinkError};

/// Emits toasts at `info` and blocking errors at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationSinkError> {
        info!(
            target: "truck_viewer::toast",
            position = %notification.position,
            duration_ms = u64::try_from(notification.duration.as_millis()).unwrap_or(u64::MAX),
            "{}",
            notification.message
        );
        Ok(())
    }

    fn show_error(&self, message: &str) -> Result<(), NotificationSinkError> {
        if message.trim().is_empty() {
            return Err(NotificationSinkError::rejected("blank error message"));
        }
        error!(target: "truck_viewer::alert", "{message}");
        Ok(())
    }
}
