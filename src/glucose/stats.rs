//! Summary statistics over a window of glucose readings.

use serde::Serialize;

use super::repo_types::GlucoseReading;

pub const LOW_BELOW: i32 = 70;
pub const HIGH_ABOVE: i32 = 140;
const TREND_MARGIN: f64 = 10.0;
const TREND_SAMPLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ReduceCarbohydrates,
    KeepFastSugar,
    ConsultDoctorHigh,
    ConsultDoctorLow,
    GoodControl,
}

impl Recommendation {
    pub fn message(self) -> &'static str {
        match self {
            Self::ReduceCarbohydrates => {
                "Considera reducir el consumo de carbohidratos y aumentar la actividad física."
            }
            Self::KeepFastSugar => {
                "Mantén siempre a mano alimentos con azúcares de rápida absorción para casos de hipoglucemia."
            }
            Self::ConsultDoctorHigh => {
                "Tu promedio está por encima del rango recomendado. Consulta con tu médico sobre ajustes en tu tratamiento."
            }
            Self::ConsultDoctorLow => {
                "Tu promedio está por debajo del rango recomendado. Consulta con tu médico sobre ajustes en tu tratamiento."
            }
            Self::GoodControl => "¡Buen trabajo! Tu promedio está dentro del rango recomendado.",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    pub code: Recommendation,
    pub message: &'static str,
}

impl From<Recommendation> for RecommendationView {
    fn from(code: Recommendation) -> Self {
        Self {
            code,
            message: code.message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseStats {
    pub average: i32,
    pub min: i32,
    pub max: i32,
    pub low: u32,
    pub normal: u32,
    pub high: u32,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

fn mean(levels: impl Iterator<Item = i32>) -> Option<f64> {
    let (sum, n) = levels.fold((0i64, 0u32), |(s, n), l| (s + i64::from(l), n + 1));
    (n > 0).then(|| sum as f64 / f64::from(n))
}

/// `None` when there is nothing to summarize.
pub fn compute_stats(readings: &[GlucoseReading]) -> Option<GlucoseStats> {
    let levels: Vec<i32> = readings.iter().map(GlucoseReading::clamped_level).collect();
    let average = mean(levels.iter().copied())?.round() as i32;
    let min = *levels.iter().min()?;
    let max = *levels.iter().max()?;

    let mut low = 0;
    let mut normal = 0;
    let mut high = 0;
    for &l in &levels {
        if l < LOW_BELOW {
            low += 1;
        } else if l > HIGH_ABOVE {
            high += 1;
        } else {
            normal += 1;
        }
    }

    let mut recommendations = Vec::new();
    if high > normal {
        recommendations.push(Recommendation::ReduceCarbohydrates);
    }
    if low > 0 {
        recommendations.push(Recommendation::KeepFastSugar);
    }
    if average > HIGH_ABOVE {
        recommendations.push(Recommendation::ConsultDoctorHigh);
    }
    if average < LOW_BELOW {
        recommendations.push(Recommendation::ConsultDoctorLow);
    }
    if (LOW_BELOW..=HIGH_ABOVE).contains(&average) {
        recommendations.push(Recommendation::GoodControl);
    }

    Some(GlucoseStats {
        average,
        min,
        max,
        low,
        normal,
        high,
        recommendations,
    })
}

/// Readings ordered newest first; equal timestamps keep their input order.
pub fn newest_first(readings: &[GlucoseReading]) -> Vec<&GlucoseReading> {
    let mut sorted: Vec<&GlucoseReading> = readings.iter().collect();
    sorted.sort_by(|a, b| b.taken_at().cmp(&a.taken_at()));
    sorted
}

/// Compares the mean of the newest three readings with the oldest three.
pub fn trend(readings: &[GlucoseReading]) -> Trend {
    if readings.len() < TREND_SAMPLE {
        return Trend::Stable;
    }
    let sorted = newest_first(readings);
    let recent = mean(sorted[..TREND_SAMPLE].iter().map(|r| r.clamped_level()));
    let older = mean(
        sorted[sorted.len() - TREND_SAMPLE..]
            .iter()
            .map(|r| r.clamped_level()),
    );
    match (recent, older) {
        (Some(r), Some(o)) if r > o + TREND_MARGIN => Trend::Up,
        (Some(r), Some(o)) if r < o - TREND_MARGIN => Trend::Down,
        _ => Trend::Stable,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseSummary {
    pub days: Option<u32>,
    pub count: usize,
    pub stats: Option<GlucoseStats>,
    pub recommendations: Vec<RecommendationView>,
    pub last_reading: Option<GlucoseReading>,
    pub trend: Trend,
}

pub fn summarize(readings: &[GlucoseReading], days: Option<u32>) -> GlucoseSummary {
    let stats = compute_stats(readings);
    let recommendations = stats
        .iter()
        .flat_map(|s| s.recommendations.iter().copied().map(RecommendationView::from))
        .collect();
    GlucoseSummary {
        days,
        count: readings.len(),
        stats,
        recommendations,
        last_reading: newest_first(readings).first().map(|r| (*r).clone()),
        trend: trend(readings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glucose::repo_types::tests::{levels, reading};
    use time::macros::{date, time};

    #[test]
    fn mixed_window() {
        let stats = compute_stats(&levels(&[65, 75, 145, 100])).unwrap();
        assert_eq!(stats.average, 96);
        assert_eq!((stats.min, stats.max), (65, 145));
        assert_eq!((stats.low, stats.normal, stats.high), (1, 2, 1));
        assert_eq!(
            stats.recommendations,
            vec![Recommendation::KeepFastSugar, Recommendation::GoodControl]
        );
    }

    #[test]
    fn thresholds_are_inclusive_normal() {
        let stats = compute_stats(&levels(&[70, 140])).unwrap();
        assert_eq!((stats.low, stats.normal, stats.high), (0, 2, 0));
    }

    #[test]
    fn all_high_fires_reduce_and_consult() {
        let stats = compute_stats(&levels(&[180, 200, 150])).unwrap();
        assert_eq!(
            stats.recommendations,
            vec![
                Recommendation::ReduceCarbohydrates,
                Recommendation::ConsultDoctorHigh
            ]
        );
    }

    #[test]
    fn low_average_fires_both_low_rules() {
        let stats = compute_stats(&levels(&[50, 60])).unwrap();
        assert_eq!(
            stats.recommendations,
            vec![Recommendation::KeepFastSugar, Recommendation::ConsultDoctorLow]
        );
    }

    #[test]
    fn empty_window_has_no_stats() {
        assert_eq!(compute_stats(&[]), None);
        let summary = summarize(&[], Some(7));
        assert!(summary.stats.is_none());
        assert!(summary.last_reading.is_none());
        assert_eq!(summary.trend, Trend::Stable);
    }

    #[test]
    fn negative_levels_floor_to_zero() {
        let stats = compute_stats(&levels(&[-20, 100])).unwrap();
        assert_eq!(stats.min, 0);
        assert_eq!(stats.average, 50);
    }

    #[test]
    fn trend_compares_newest_and_oldest_three() {
        let day = date!(2024 - 06 - 10);
        let rising = vec![
            reading(90, day, time!(06:00), None),
            reading(95, day, time!(07:00), None),
            reading(100, day, time!(08:00), None),
            reading(130, day, time!(12:00), None),
            reading(140, day, time!(18:00), None),
            reading(150, day, time!(21:00), None),
        ];
        assert_eq!(trend(&rising), Trend::Up);

        let mut falling = rising.clone();
        falling.iter_mut().for_each(|r| r.level = 250 - r.level);
        assert_eq!(trend(&falling), Trend::Down);

        assert_eq!(trend(&rising[..2]), Trend::Stable);
    }

    #[test]
    fn summary_picks_latest_reading() {
        let latest = reading(120, date!(2024 - 06 - 11), time!(07:30), None);
        let readings = vec![
            reading(100, date!(2024 - 06 - 10), time!(08:00), None),
            latest.clone(),
            reading(110, date!(2024 - 06 - 10), time!(20:00), None),
        ];
        let summary = summarize(&readings, None);
        assert_eq!(summary.last_reading, Some(latest));
        assert_eq!(summary.count, 3);
        assert_eq!(summary.recommendations.len(), 1);
    }
}
