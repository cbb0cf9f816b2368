use serde::Serialize;

use super::repo_types::FoodItem;
use crate::error::ValidationError;

pub const LOW_LOAD_BELOW: f64 = 10.0;
pub const MEDIUM_LOAD_UP_TO: f64 = 19.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadCategory {
    Low,
    Medium,
    High,
}

impl LoadCategory {
    pub fn of(load: f64) -> Self {
        if load < LOW_LOAD_BELOW {
            Self::Low
        } else if load <= MEDIUM_LOAD_UP_TO {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlycemicLoad {
    pub portion_g: f64,
    pub carbohydrates_g: f64,
    pub value: f64,
    pub category: LoadCategory,
}

/// Band of the glycemic index itself: low under 55, medium up to 69.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexBand {
    Low,
    Medium,
    High,
}

impl IndexBand {
    pub fn of(gi: f64) -> Self {
        if gi < 55.0 {
            Self::Low
        } else if gi <= 69.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Carbohydrate grams per 100 g used for the load: available carbohydrates
/// when the table has them, total carbohydrates otherwise.
pub fn carb_basis(food: &FoodItem) -> f64 {
    food.available_carbohydrates_g.unwrap_or(food.carbohydrates_g)
}

pub fn glycemic_load(food: &FoodItem, portion_g: f64) -> Result<GlycemicLoad, ValidationError> {
    if !portion_g.is_finite() || portion_g <= 0.0 {
        return Err(ValidationError::NonPositivePortion);
    }
    let gi = food
        .glycemic_index
        .ok_or_else(|| ValidationError::MissingGlycemicIndex(food.code.clone()))?;

    let carbohydrates_g = carb_basis(food) * portion_g / 100.0;
    let value = gi * carbohydrates_g / 100.0;
    Ok(GlycemicLoad {
        portion_g,
        carbohydrates_g,
        value,
        category: LoadCategory::of(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::repo_types::tests::food;

    #[test]
    fn medium_load_for_150g_portion() {
        let load = glycemic_load(&food(20.0, Some(55.0), None), 150.0).unwrap();
        assert_eq!(load.carbohydrates_g, 30.0);
        assert_eq!(load.value, 16.5);
        assert_eq!(load.category, LoadCategory::Medium);
    }

    #[test]
    fn available_carbs_take_precedence() {
        let load = glycemic_load(&food(80.0, Some(50.0), Some(10.0)), 100.0).unwrap();
        assert_eq!(load.value, 5.0);
        assert_eq!(load.category, LoadCategory::Low);
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(LoadCategory::of(9.99), LoadCategory::Low);
        assert_eq!(LoadCategory::of(10.0), LoadCategory::Medium);
        assert_eq!(LoadCategory::of(19.0), LoadCategory::Medium);
        assert_eq!(LoadCategory::of(19.01), LoadCategory::High);
    }

    #[test]
    fn rejects_bad_portion_and_missing_index() {
        let f = food(20.0, Some(55.0), None);
        assert_eq!(glycemic_load(&f, 0.0), Err(ValidationError::NonPositivePortion));
        assert_eq!(glycemic_load(&f, -5.0), Err(ValidationError::NonPositivePortion));
        assert_eq!(glycemic_load(&f, f64::NAN), Err(ValidationError::NonPositivePortion));
        assert_eq!(
            glycemic_load(&food(20.0, None, None), 100.0),
            Err(ValidationError::MissingGlycemicIndex("A001".into()))
        );
    }

    #[test]
    fn index_bands() {
        assert_eq!(IndexBand::of(54.9), IndexBand::Low);
        assert_eq!(IndexBand::of(69.0), IndexBand::Medium);
        assert_eq!(IndexBand::of(70.0), IndexBand::High);
    }
}
