use serde::{Deserialize, Serialize};

use super::glycemic::{GlycemicLoad, IndexBand};
use super::repo_types::FoodItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    /// Ascending index, foods without one last.
    Gi,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearch {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub with_glycemic_index: bool,
    #[serde(default)]
    pub sort: SortBy,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodView {
    #[serde(flatten)]
    pub food: FoodItem,
    pub glycemic_index_band: Option<IndexBand>,
}

impl From<FoodItem> for FoodView {
    fn from(food: FoodItem) -> Self {
        Self {
            glycemic_index_band: food.glycemic_index.map(IndexBand::of),
            food,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlycemicLoadRequest {
    pub portion_g: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlycemicLoadResponse {
    pub code: String,
    pub name: String,
    pub glycemic_index: Option<f64>,
    #[serde(flatten)]
    pub load: GlycemicLoad,
}
