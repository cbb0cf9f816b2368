pub mod dispatcher;
pub mod scheduler;

pub use dispatcher::{HttpDispatcher, NotificationDispatcher, NotificationRequest};
pub use scheduler::{FailureSink, ReminderSource, TracingSink};
