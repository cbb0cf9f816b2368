use serde::{Deserialize, Serialize};
use time::{Date, Time};

use super::calendar::{CalendarDay, DayStatus};
use super::monthly::MonthlyStats;
use super::repo_types::{EventDetails, ScheduledEvent};
use crate::timefmt::{iso_date, wall_time};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    pub every_hours: u32,
    /// Last day (inclusive) on which occurrences may fall; one week when absent.
    #[serde(default, with = "iso_date::option")]
    pub until: Option<Date>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "wall_time")]
    pub time: Time,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub repeat: Option<RepeatRule>,
    #[serde(flatten)]
    pub details: EventDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteEventRequest {
    #[serde(default)]
    pub actual_duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayEvents {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub status: DayStatus,
    pub events: Vec<ScheduledEvent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEventsResponse {
    pub events: Vec<ScheduledEvent>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: String,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyStatsResponse {
    pub month: String,
    pub stats: MonthlyStats,
}
