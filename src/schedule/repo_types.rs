use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::timefmt::{iso_date, wall_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Medication,
    Exercise,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Medication => "medication",
            EventKind::Exercise => "exercise",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDetails {
    pub dose: Option<String>,
    pub frequency: Option<String>,
    pub medication_type: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetails {
    pub activity_type: Option<String>,
    pub planned_duration_minutes: Option<u32>,
    pub actual_duration_minutes: Option<u32>,
    pub intensity: Option<Intensity>,
}

/// Kind-specific payload; the `kind` tag travels with it on the wire and in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventDetails {
    Medication(MedicationDetails),
    Exercise(ExerciseDetails),
}

impl EventDetails {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetails::Medication(_) => EventKind::Medication,
            EventDetails::Exercise(_) => EventKind::Exercise,
        }
    }

    /// Medication type or activity type, `"other"` when unset.
    pub fn sub_type(&self) -> &str {
        let raw = match self {
            EventDetails::Medication(m) => m.medication_type.as_deref(),
            EventDetails::Exercise(e) => e.activity_type.as_deref(),
        };
        raw.filter(|s| !s.trim().is_empty()).unwrap_or("other")
    }

    /// Short human text for reminders.
    pub fn summary(&self) -> Option<String> {
        match self {
            EventDetails::Medication(m) => m.dose.clone().or_else(|| m.instructions.clone()),
            EventDetails::Exercise(e) => e
                .planned_duration_minutes
                .map(|mins| format!("{mins} min")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEvent {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "wall_time")]
    pub time: Time,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub completed_at: Option<OffsetDateTime>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl ScheduledEvent {
    pub fn kind(&self) -> EventKind {
        self.details.kind()
    }

    pub fn starts_at(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.date, self.time)
    }

    /// Actual duration if recorded, else planned, else zero. Medication is always zero.
    pub fn duration_minutes(&self) -> u32 {
        match &self.details {
            EventDetails::Exercise(e) => e
                .actual_duration_minutes
                .or(e.planned_duration_minutes)
                .unwrap_or(0),
            EventDetails::Medication(_) => 0,
        }
    }

    pub fn complete(
        &mut self,
        at: OffsetDateTime,
        actual_duration_minutes: Option<u32>,
        notes: Option<String>,
    ) -> Result<(), ValidationError> {
        if let Some(mins) = actual_duration_minutes {
            match &mut self.details {
                EventDetails::Exercise(e) => e.actual_duration_minutes = Some(mins),
                EventDetails::Medication(_) => return Err(ValidationError::DurationOnMedication),
            }
        }
        if notes.is_some() {
            self.notes = notes;
        }
        self.completed = true;
        self.completed_at = Some(at);
        Ok(())
    }
}

#[derive(Debug, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub event_date: Date,
    pub event_time: Time,
    pub details: Json<EventDetails>,
    pub completed: bool,
    pub completed_at: Option<OffsetDateTime>,
    pub notes: Option<String>,
}

impl From<EventRow> for ScheduledEvent {
    fn from(r: EventRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            date: r.event_date,
            time: r.event_time,
            completed: r.completed,
            completed_at: r.completed_at,
            notes: r.notes,
            details: r.details.0,
        }
    }
}
