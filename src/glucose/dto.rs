use serde::Deserialize;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use uuid::Uuid;

use super::repo_types::{GlucoseReading, MealType, UNSPECIFIED_FOOD};
use crate::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReading {
    pub level: i32,
    pub ate_something: bool,
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub food_description: Option<String>,
}

impl SubmitReading {
    /// Validates and stamps the reading with the local wall clock at `now`.
    pub fn into_reading(
        self,
        now: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<GlucoseReading, ValidationError> {
        if self.level < 0 {
            return Err(ValidationError::NegativeGlucose(self.level));
        }
        let local = now.to_offset(offset);
        let local = PrimitiveDateTime::new(local.date(), local.time());

        let (meal_type, food_description) = if self.ate_something {
            let food = self
                .food_description
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| UNSPECIFIED_FOOD.to_string());
            (self.meal_type, Some(food))
        } else {
            (None, None)
        };

        Ok(GlucoseReading {
            id: Uuid::new_v4(),
            level: self.level,
            date: local.date(),
            time: local.time().replace_nanosecond(0).unwrap_or(local.time()),
            ate_something: self.ate_something,
            meal_type,
            food_description,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    /// Lookback in days; all readings when absent.
    pub days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset, time};

    fn submit(level: i32, ate: bool) -> SubmitReading {
        SubmitReading {
            level,
            ate_something: ate,
            meal_type: Some(MealType::Lunch),
            food_description: None,
        }
    }

    #[test]
    fn negative_level_rejected() {
        let err = submit(-1, false)
            .into_reading(datetime!(2024-06-10 12:00 UTC), offset!(UTC))
            .unwrap_err();
        assert_eq!(err, ValidationError::NegativeGlucose(-1));
    }

    #[test]
    fn ate_without_description_defaults() {
        let r = submit(130, true)
            .into_reading(datetime!(2024-06-10 12:00 UTC), offset!(UTC))
            .unwrap();
        assert_eq!(r.meal_type, Some(MealType::Lunch));
        assert_eq!(r.food_description.as_deref(), Some(UNSPECIFIED_FOOD));
    }

    #[test]
    fn fasting_clears_meal_fields() {
        let mut req = submit(95, false);
        req.food_description = Some("pan".into());
        let r = req
            .into_reading(datetime!(2024-06-10 12:00 UTC), offset!(UTC))
            .unwrap();
        assert_eq!(r.meal_type, None);
        assert_eq!(r.food_description, None);
    }

    #[test]
    fn stamped_in_local_offset() {
        let r = submit(95, false)
            .into_reading(datetime!(2024-06-10 02:30:15.5 UTC), offset!(-4))
            .unwrap();
        assert_eq!(r.date, time::macros::date!(2024 - 06 - 09));
        assert_eq!(r.time, time!(22:30:15));
    }
}
