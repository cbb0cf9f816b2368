use lazy_static::lazy_static;
use regex::Regex;

use super::dto::ProfilePatch;
use super::repo_types::UserProfile;
use crate::error::ValidationError;

const REQUIRED_WEIGHT: f64 = 0.7;
const OPTIONAL_WEIGHT: f64 = 0.3;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

fn filled_opt(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(filled)
}

fn positive<T: Into<f64> + Copy>(v: Option<T>) -> bool {
    v.is_some_and(|v| Into::<f64>::into(v) > 0.0)
}

/// Percentage of the profile filled in. The five identity fields weigh
/// 70%, the six descriptive ones 30%.
pub fn profile_completion(p: &UserProfile) -> u8 {
    let required = [
        filled(&p.first_name),
        filled(&p.last_name),
        filled(&p.email),
        filled(&p.diabetes_type),
        filled(&p.gender),
    ];
    let optional = [
        positive(p.age),
        positive(p.weight_kg),
        positive(p.height_cm),
        filled_opt(&p.phone),
        filled_opt(&p.address),
        filled_opt(&p.photo_url),
    ];
    let share = |flags: &[bool]| {
        flags.iter().filter(|f| **f).count() as f64 / flags.len() as f64
    };
    let pct = (share(&required) * REQUIRED_WEIGHT + share(&optional) * OPTIONAL_WEIGHT) * 100.0;
    pct.round() as u8
}

/// Trims text fields and checks the email when one is supplied.
pub fn normalize_patch(mut patch: ProfilePatch) -> Result<ProfilePatch, ValidationError> {
    let trim = |v: &mut Option<String>| {
        if let Some(s) = v.as_mut() {
            *s = s.trim().to_string();
        }
    };
    trim(&mut patch.first_name);
    trim(&mut patch.last_name);
    trim(&mut patch.email);
    trim(&mut patch.diabetes_type);
    trim(&mut patch.gender);
    trim(&mut patch.phone);
    trim(&mut patch.address);

    if let Some(email) = &patch.email {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
    }
    Ok(patch)
}
