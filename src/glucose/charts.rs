//! Chart series derived from glucose readings.

use serde::Serialize;

use super::repo_types::{GlucoseReading, MealType};
use crate::timefmt::format_hm;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub label: String,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket<K> {
    pub key: K,
    /// Zero when `samples` is zero.
    pub mean: f64,
    pub samples: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    pub fn of_hour(hour: u8) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=23 => Self::Evening,
            _ => Self::Night,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub timeline: Vec<TimelinePoint>,
    pub meal_impact: Vec<Bucket<MealType>>,
    pub day_pattern: Vec<Bucket<DayPeriod>>,
}

/// One point per reading, ascending by date then time.
pub fn timeline(readings: &[GlucoseReading]) -> Vec<TimelinePoint> {
    let mut sorted: Vec<&GlucoseReading> = readings.iter().collect();
    sorted.sort_by_key(|r| r.taken_at());
    sorted
        .into_iter()
        .map(|r| TimelinePoint {
            label: format!("{} {}", r.date, format_hm(r.time)),
            level: r.clamped_level(),
        })
        .collect()
}

fn bucket<K>(key: K, members: impl Iterator<Item = i32>) -> Bucket<K> {
    let (sum, samples) = members.fold((0i64, 0u32), |(s, n), l| (s + i64::from(l), n + 1));
    let mean = if samples == 0 {
        0.0
    } else {
        sum as f64 / f64::from(samples)
    };
    Bucket { key, mean, samples }
}

/// Readings without a meal type fall in no bucket rather than being counted
/// as `otro`, matching how the mobile client charts them.
pub fn meal_impact(readings: &[GlucoseReading]) -> Vec<Bucket<MealType>> {
    MealType::ALL
        .into_iter()
        .map(|meal| {
            bucket(
                meal,
                readings
                    .iter()
                    .filter(|r| r.meal_type == Some(meal))
                    .map(GlucoseReading::clamped_level),
            )
        })
        .collect()
}

/// Buckets by the hour component only.
pub fn day_pattern(readings: &[GlucoseReading]) -> Vec<Bucket<DayPeriod>> {
    DayPeriod::ALL
        .into_iter()
        .map(|period| {
            bucket(
                period,
                readings
                    .iter()
                    .filter(|r| DayPeriod::of_hour(r.time.hour()) == period)
                    .map(GlucoseReading::clamped_level),
            )
        })
        .collect()
}

pub fn chart_series(readings: &[GlucoseReading]) -> ChartSeries {
    ChartSeries {
        timeline: timeline(readings),
        meal_impact: meal_impact(readings),
        day_pattern: day_pattern(readings),
    }
}
