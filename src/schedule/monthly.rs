use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use super::calendar::month_bounds;
use super::repo_types::{EventKind, ScheduledEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub completed_medications: u32,
    pub completed_exercises: u32,
    pub total_duration_minutes: u32,
    pub medications_by_type: BTreeMap<String, u32>,
    pub exercises_by_type: BTreeMap<String, u32>,
}

/// Folds completed events of the month containing `reference`.
///
/// Only dates strictly between the first and the last day of the month count;
/// events on either boundary day are left out.
pub fn monthly_stats(events: &[ScheduledEvent], reference: Date) -> MonthlyStats {
    let (first, last) = month_bounds(reference);
    let mut stats = MonthlyStats::default();

    for event in events
        .iter()
        .filter(|e| e.completed && e.date > first && e.date < last)
    {
        let sub_type = event.details.sub_type().to_string();
        match event.kind() {
            EventKind::Medication => {
                stats.completed_medications += 1;
                *stats.medications_by_type.entry(sub_type).or_default() += 1;
            }
            EventKind::Exercise => {
                stats.completed_exercises += 1;
                stats.total_duration_minutes += event.duration_minutes();
                *stats.exercises_by_type.entry(sub_type).or_default() += 1;
            }
        }
    }
    stats
}
