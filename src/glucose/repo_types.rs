use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::timefmt::{iso_date, wall_time};

pub const UNSPECIFIED_FOOD: &str = "No especificado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    #[serde(rename = "desayuno")]
    Breakfast,
    #[serde(rename = "almuerzo")]
    Lunch,
    #[serde(rename = "cena")]
    Dinner,
    #[serde(rename = "otro", alias = "Otro")]
    Other,
}

impl MealType {
    pub const ALL: [MealType; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "desayuno",
            Self::Lunch => "almuerzo",
            Self::Dinner => "cena",
            Self::Other => "otro",
        }
    }

    /// Unknown stored values read back as no meal.
    pub fn from_db(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseReading {
    pub id: Uuid,
    /// mg/dL
    pub level: i32,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "wall_time")]
    pub time: Time,
    pub ate_something: bool,
    pub meal_type: Option<MealType>,
    pub food_description: Option<String>,
}

impl GlucoseReading {
    pub fn taken_at(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.date, self.time)
    }

    /// Negative levels count as zero in every computation.
    pub fn clamped_level(&self) -> i32 {
        self.level.max(0)
    }
}

#[derive(Debug, FromRow)]
pub struct ReadingRow {
    pub id: Uuid,
    pub level: i32,
    pub reading_date: Date,
    pub reading_time: Time,
    pub ate_something: bool,
    pub meal_type: Option<String>,
    pub food_description: Option<String>,
}

impl From<ReadingRow> for GlucoseReading {
    fn from(r: ReadingRow) -> Self {
        Self {
            id: r.id,
            level: r.level,
            date: r.reading_date,
            time: r.reading_time,
            ate_something: r.ate_something,
            meal_type: r.meal_type.as_deref().and_then(MealType::from_db),
            food_description: r.food_description,
        }
    }
}
