//! Reminder planning and best-effort dispatch for scheduled events.
//!
//! Every event produces two pushes: one 15 minutes before it starts and one
//! immediate confirmation. Both are sent independently; a failed send is
//! reported to the [`FailureSink`] and otherwise ignored.

use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::warn;

use super::dispatcher::{NotificationDispatcher, NotificationRequest};
use crate::schedule::EventKind;
use crate::timefmt::{format_hm, month_es, weekday_es};

pub const REMINDER_LEAD: Duration = Duration::minutes(15);

/// The slice of an event that reminders are built from.
#[derive(Debug, Clone)]
pub struct ReminderSource {
    pub id: String,
    pub title: String,
    pub at: PrimitiveDateTime,
    pub kind: EventKind,
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderPlan {
    pub reminder: NotificationRequest,
    pub confirmation: NotificationRequest,
}

/// Receives dispatch failures that are otherwise swallowed.
pub trait FailureSink: Send + Sync {
    fn dispatch_failed(&self, request: &NotificationRequest, error: &anyhow::Error);
}

/// Writes failures to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn dispatch_failed(&self, request: &NotificationRequest, error: &anyhow::Error) {
        warn!(event_id = %request.event_id, error = %error, "notification dispatch failed");
    }
}

fn epoch_millis(t: OffsetDateTime) -> i64 {
    (t.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Long Spanish date, e.g. `lunes, 3 de junio de 2024, 08:30`.
pub fn format_event_date(at: PrimitiveDateTime) -> String {
    format!(
        "{}, {} de {} de {}, {}",
        weekday_es(at.weekday()),
        at.day(),
        month_es(at.month()),
        at.year(),
        format_hm(at.time())
    )
}

pub fn plan_reminders(src: &ReminderSource, now: OffsetDateTime, offset: UtcOffset) -> ReminderPlan {
    let event_at = src.at.assume_offset(offset);
    let label = match src.kind {
        EventKind::Medication => "Medicación",
        EventKind::Exercise => "Actividad física",
    };

    let reminder = NotificationRequest {
        event_id: src.id.clone(),
        title: src.title.clone(),
        body: format!(
            "Recordatorio: {} - {}",
            label,
            src.details.as_deref().unwrap_or_default()
        ),
        scheduled_time: epoch_millis(event_at - REMINDER_LEAD),
    };

    let confirmation = NotificationRequest {
        event_id: format!("{}-immediate", src.id),
        title: "Nuevo evento registrado".into(),
        body: format!(
            "Recordatorio: Tiene un evento registrado para {}",
            format_event_date(src.at)
        ),
        scheduled_time: epoch_millis(now),
    };

    ReminderPlan {
        reminder,
        confirmation,
    }
}

/// Sends both requests of `plan` concurrently. Never fails.
pub async fn dispatch_plan(
    dispatcher: &dyn NotificationDispatcher,
    sink: &dyn FailureSink,
    plan: &ReminderPlan,
) {
    let (first, second) = tokio::join!(
        dispatcher.dispatch(&plan.reminder),
        dispatcher.dispatch(&plan.confirmation)
    );
    if let Err(e) = first {
        sink.dispatch_failed(&plan.reminder, &e);
    }
    if let Err(e) = second {
        sink.dispatch_failed(&plan.confirmation, &e);
    }
}

pub async fn schedule_event_reminders(
    dispatcher: &dyn NotificationDispatcher,
    sink: &dyn FailureSink,
    src: &ReminderSource,
    offset: UtcOffset,
) {
    let plan = plan_reminders(src, OffsetDateTime::now_utc(), offset);
    dispatch_plan(dispatcher, sink, &plan).await;
}
