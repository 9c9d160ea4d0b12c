//! Notification handlers: the event-driven recorder plus owner-facing
//! queries.

mod clear_notifications;
mod list_notifications;
mod record_notification;

pub use clear_notifications::ClearNotificationsHandler;
pub use list_notifications::{ListNotificationsHandler, RECENT_LIMIT};
pub use record_notification::RecordNotificationHandler;
