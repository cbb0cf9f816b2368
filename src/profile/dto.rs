use serde::{Deserialize, Serialize};

use crate::glucose::GlucoseSummary;
use crate::schedule::MonthlyStats;

/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub diabetes_type: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub profile_completion: u8,
    pub glucose: GlucoseSummary,
    pub month: String,
    pub events: MonthlyStats,
}
