use serde::Serialize;
use sqlx::FromRow;

/// Per-100 g composition of one food from the reference table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub code: String,
    pub name: String,
    pub category: String,
    pub water_pct: f64,
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrates_g: f64,
    pub fiber_g: f64,
    pub calcium_mg: f64,
    pub potassium_mg: f64,
    pub zinc_mg: f64,
    pub magnesium_mg: f64,
    pub vitamin_b6_mg: f64,
    pub vitamin_b12_mcg: f64,
    pub folic_acid_mcg: f64,
    pub folate_dfe: f64,
    pub edible_fraction_pct: f64,
    pub net_carbohydrates_g: f64,
    pub carbohydrate_class: String,
    pub glycemic_index: Option<f64>,
    pub available_carbohydrates_g: Option<f64>,
}

pub const FOOD_COLUMNS: &str = "code, name, category, water_pct, calories_kcal, protein_g, fat_g, \
    carbohydrates_g, fiber_g, calcium_mg, potassium_mg, zinc_mg, magnesium_mg, vitamin_b6_mg, \
    vitamin_b12_mcg, folic_acid_mcg, folate_dfe, edible_fraction_pct, net_carbohydrates_g, \
    carbohydrate_class, glycemic_index, available_carbohydrates_g";
