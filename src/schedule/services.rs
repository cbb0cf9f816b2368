use std::sync::Arc;

use time::macros::time;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::debug;
use uuid::Uuid;

use super::dto::CreateEventRequest;
use super::repo_types::ScheduledEvent;
use crate::error::ValidationError;
use crate::notifications::scheduler::{plan_reminders, schedule_event_reminders};
use crate::notifications::ReminderSource;
use crate::state::AppState;

pub const DEFAULT_REPEAT_SPAN: Duration = Duration::weeks(1);
pub const MAX_OCCURRENCES: usize = 500;

/// Last instant of the last representable day.
const END_OF_TIME: PrimitiveDateTime =
    PrimitiveDateTime::new(Date::MAX, time!(23:59:59.999_999_999));

/// Start times from `start` every `every_hours` until `end` (inclusive).
/// The series stops early at the end of the representable range.
pub fn expand_occurrences(
    start: PrimitiveDateTime,
    every_hours: u32,
    end: Option<PrimitiveDateTime>,
) -> Result<Vec<PrimitiveDateTime>, ValidationError> {
    if every_hours == 0 {
        return Err(ValidationError::ZeroRepeatInterval);
    }
    let end = end.unwrap_or_else(|| {
        start
            .checked_add(DEFAULT_REPEAT_SPAN)
            .unwrap_or(END_OF_TIME)
    });
    if end < start {
        return Err(ValidationError::RepeatEndsBeforeStart);
    }
    let step = Duration::hours(i64::from(every_hours));
    let mut out = Vec::new();
    let mut at = start;
    while at <= end {
        if out.len() == MAX_OCCURRENCES {
            return Err(ValidationError::TooManyOccurrences(MAX_OCCURRENCES));
        }
        out.push(at);
        match at.checked_add(step) {
            Some(next) => at = next,
            None => break,
        }
    }
    Ok(out)
}

/// Validates a create request and materializes one event per occurrence.
pub fn build_events(
    req: CreateEventRequest,
    today: Date,
) -> Result<Vec<ScheduledEvent>, ValidationError> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if req.date < today {
        return Err(ValidationError::EventInPast(req.date));
    }

    let start = PrimitiveDateTime::new(req.date, req.time);
    let starts = match &req.repeat {
        Some(rule) => {
            let end = rule
                .until
                .map(|d| PrimitiveDateTime::new(d, time!(23:59:59.999_999_999)));
            expand_occurrences(start, rule.every_hours, end)?
        }
        None => vec![start],
    };

    Ok(starts
        .into_iter()
        .map(|at| ScheduledEvent {
            id: Uuid::new_v4(),
            title: title.clone(),
            date: at.date(),
            time: at.time(),
            completed: false,
            completed_at: None,
            notes: req.notes.clone(),
            details: req.details.clone(),
        })
        .collect())
}

pub fn reminder_source(event: &ScheduledEvent) -> ReminderSource {
    ReminderSource {
        id: event.id.to_string(),
        title: event.title.clone(),
        at: event.starts_at(),
        kind: event.kind(),
        details: event.details.summary(),
    }
}

/// Detached reminder dispatch: the full plan for the first event, the
/// 15-minute reminder only for later occurrences of a series.
pub fn spawn_reminders(state: &AppState, events: &[ScheduledEvent]) {
    let Some((first, rest)) = events.split_first() else {
        return;
    };
    let dispatcher = Arc::clone(&state.notifier);
    let sink = Arc::clone(&state.failure_sink);
    let offset = state.config.utc_offset;
    let first = reminder_source(first);
    let now = OffsetDateTime::now_utc();
    let later: Vec<_> = rest
        .iter()
        .map(|e| plan_reminders(&reminder_source(e), now, offset).reminder)
        .collect();

    tokio::spawn(async move {
        schedule_event_reminders(dispatcher.as_ref(), sink.as_ref(), &first, offset).await;
        for request in &later {
            if let Err(e) = dispatcher.dispatch(request).await {
                sink.dispatch_failed(request, &e);
            }
        }
        debug!(count = later.len() + 1, "event reminders dispatched");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::dto::RepeatRule;
    use crate::schedule::repo_types::{EventDetails, MedicationDetails};
    use time::macros::{date, datetime, time};

    fn request(date: Date) -> CreateEventRequest {
        CreateEventRequest {
            title: " Metformina ".into(),
            date,
            time: time!(08:00),
            notes: None,
            repeat: None,
            details: EventDetails::Medication(MedicationDetails {
                dose: Some("500mg".into()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn rejects_dates_before_today() {
        let err = build_events(request(date!(2024 - 06 - 09)), date!(2024 - 06 - 10)).unwrap_err();
        assert_eq!(err, ValidationError::EventInPast(date!(2024 - 06 - 09)));
    }

    #[test]
    fn accepts_today_and_trims_title() {
        let events = build_events(request(date!(2024 - 06 - 10)), date!(2024 - 06 - 10)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Metformina");
        assert!(!events[0].completed);
    }

    #[test]
    fn rejects_blank_title() {
        let mut req = request(date!(2024 - 06 - 10));
        req.title = "   ".into();
        assert_eq!(
            build_events(req, date!(2024 - 06 - 10)).unwrap_err(),
            ValidationError::EmptyTitle
        );
    }

    #[test]
    fn repeat_defaults_to_one_week_inclusive() {
        let occ = expand_occurrences(datetime!(2024-06-10 08:00), 24, None).unwrap();
        assert_eq!(occ.len(), 8);
        assert_eq!(occ.last(), Some(&datetime!(2024-06-17 08:00)));
    }

    #[test]
    fn repeat_until_covers_whole_last_day() {
        let mut req = request(date!(2024 - 06 - 10));
        req.repeat = Some(RepeatRule {
            every_hours: 12,
            until: Some(date!(2024 - 06 - 11)),
        });
        let events = build_events(req, date!(2024 - 06 - 10)).unwrap();
        let starts: Vec<_> = events.iter().map(|e| e.starts_at()).collect();
        assert_eq!(
            starts,
            vec![
                datetime!(2024-06-10 08:00),
                datetime!(2024-06-10 20:00),
                datetime!(2024-06-11 08:00),
                datetime!(2024-06-11 20:00),
            ]
        );
        let ids: std::collections::HashSet<_> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn repeat_rejects_zero_interval_and_inverted_range() {
        assert_eq!(
            expand_occurrences(datetime!(2024-06-10 08:00), 0, None).unwrap_err(),
            ValidationError::ZeroRepeatInterval
        );
        assert_eq!(
            expand_occurrences(
                datetime!(2024-06-10 08:00),
                8,
                Some(datetime!(2024-06-09 08:00))
            )
            .unwrap_err(),
            ValidationError::RepeatEndsBeforeStart
        );
    }

    #[test]
    fn repeat_is_capped() {
        let err = expand_occurrences(
            datetime!(2024-01-01 00:00),
            1,
            Some(datetime!(2024-12-31 00:00)),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::TooManyOccurrences(MAX_OCCURRENCES));
    }

    #[test]
    fn huge_interval_yields_single_occurrence() {
        let occ = expand_occurrences(datetime!(2024-06-10 08:00), 100_000_000, None).unwrap();
        assert_eq!(occ, vec![datetime!(2024-06-10 08:00)]);
    }

    #[test]
    fn series_stops_at_end_of_representable_range() {
        let occ = expand_occurrences(datetime!(9999-12-30 08:00), 24, None).unwrap();
        assert_eq!(occ, vec![datetime!(9999-12-30 08:00), datetime!(9999-12-31 08:00)]);

        let mut req = request(date!(9999 - 12 - 31));
        req.repeat = Some(RepeatRule {
            every_hours: 6,
            until: Some(date!(9999 - 12 - 31)),
        });
        let events = build_events(req, date!(2024 - 06 - 10)).unwrap();
        let starts: Vec<_> = events.iter().map(|e| e.starts_at()).collect();
        assert_eq!(
            starts,
            vec![
                datetime!(9999-12-31 08:00),
                datetime!(9999-12-31 14:00),
                datetime!(9999-12-31 20:00),
            ]
        );
    }

    #[test]
    fn reminder_source_uses_dose_as_details() {
        let events = build_events(request(date!(2024 - 06 - 10)), date!(2024 - 06 - 10)).unwrap();
        let src = reminder_source(&events[0]);
        assert_eq!(src.details.as_deref(), Some("500mg"));
        assert_eq!(src.at, datetime!(2024-06-10 08:00));
    }

    #[tokio::test]
    async fn spawned_reminders_cover_every_occurrence() {
        use crate::notifications::{NotificationDispatcher, NotificationRequest};
        use tokio::sync::mpsc;

        struct Forward(mpsc::UnboundedSender<String>);

        #[async_trait::async_trait]
        impl NotificationDispatcher for Forward {
            async fn dispatch(&self, request: &NotificationRequest) -> anyhow::Result<()> {
                let _ = self.0.send(request.event_id.clone());
                Ok(())
            }
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::fake();
        state.notifier = Arc::new(Forward(tx));

        let mut req = request(date!(2024 - 06 - 10));
        req.repeat = Some(RepeatRule {
            every_hours: 24,
            until: Some(date!(2024 - 06 - 12)),
        });
        let events = build_events(req, date!(2024 - 06 - 10)).unwrap();
        assert_eq!(events.len(), 3);
        spawn_reminders(&state, &events);

        let mut seen = Vec::new();
        while seen.len() < 4 {
            let id = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
                .await
                .expect("dispatch in time")
                .expect("channel open");
            seen.push(id);
        }
        let first = events[0].id.to_string();
        assert!(seen.contains(&first));
        assert!(seen.contains(&format!("{first}-immediate")));
        assert!(seen.contains(&events[2].id.to_string()));
        assert!(!seen.contains(&format!("{}-immediate", events[1].id)));
    }
}
