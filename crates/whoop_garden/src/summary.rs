//! Derived statistics over aggregated days.
//!
//! Only `SCORED` records contribute to averages; pending or unscorable
//! records are counted as absent.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use whoop_client::DayData;
use whoop_client::models::Sleep;

use crate::error::{AppError, AppResult};

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryZone {
    Green,
    Yellow,
    Red,
}

impl RecoveryZone {
    pub fn from_score(score: f64) -> Self {
        if score >= 67.0 {
            RecoveryZone::Green
        } else if score >= 34.0 {
            RecoveryZone::Yellow
        } else {
            RecoveryZone::Red
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum StrainLevel {
    #[serde(rename = "All Out")]
    AllOut,
    Strenuous,
    Moderate,
    Light,
    Minimal,
}

impl StrainLevel {
    pub fn from_strain(strain: f64) -> Self {
        match strain {
            s if s >= 18.0 => StrainLevel::AllOut,
            s if s >= 14.0 => StrainLevel::Strenuous,
            s if s >= 10.0 => StrainLevel::Moderate,
            s if s >= 7.0 => StrainLevel::Light,
            _ => StrainLevel::Minimal,
        }
    }
}

/// Longest non-nap sleep by time in bed.
pub fn primary_sleep(sleeps: &[Sleep]) -> Option<&Sleep> {
    sleeps
        .iter()
        .filter(|s| !s.nap)
        .fold(None, |best: Option<&Sleep>, s| match best {
            Some(b) if b.time_in_bed_milli() >= s.time_in_bed_milli() => Some(b),
            _ => Some(s),
        })
}

/// `"7h 32m"`, or `"45m"` under an hour.
pub fn format_millis(ms: i64) -> String {
    let total = ms / 1000 / 60;
    let (h, m) = (total / 60, total % 60);
    if h == 0 {
        format!("{m}m")
    } else {
        format!("{h}h {m}m")
    }
}

/// Direction of HRV over a series of daily values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HrvTrend {
    InsufficientData,
    Stable,
    /// Percent of mean HRV per day.
    Improving(f64),
    Declining(f64),
}

impl HrvTrend {
    /// Least-squares slope normalized by the series mean.
    pub fn from_series(values: &[f64]) -> Self {
        let n = values.len();
        if n < 3 {
            return HrvTrend::InsufficientData;
        }
        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }
        let fn_ = n as f64;
        let denom = fn_ * sum_x2 - sum_x * sum_x;
        let mean = sum_y / fn_;
        if denom == 0.0 || mean == 0.0 {
            return HrvTrend::Stable;
        }
        let slope = (fn_ * sum_xy - sum_x * sum_y) / denom;
        let pct_per_day = slope / mean * 100.0;
        if pct_per_day > 0.5 {
            HrvTrend::Improving(pct_per_day)
        } else if pct_per_day < -0.5 {
            HrvTrend::Declining(pct_per_day)
        } else {
            HrvTrend::Stable
        }
    }
}

impl std::fmt::Display for HrvTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HrvTrend::InsufficientData => f.write_str("Insufficient data"),
            HrvTrend::Stable => f.write_str("Stable"),
            HrvTrend::Improving(p) => write!(f, "Improving (+{:.1}%/day)", p.abs()),
            HrvTrend::Declining(p) => write!(f, "Declining ({p:.1}%/day)"),
        }
    }
}

impl Serialize for HrvTrend {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Default)]
struct Mean {
    total: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, v: f64) {
        self.total += v;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.total / self.count as f64 }
    }
}

/// Running totals shared by the weekly and persona summaries.
#[derive(Default)]
struct Totals {
    recovery: Mean,
    hrv: Mean,
    rhr: Mean,
    strain: Mean,
    sleep_millis: Mean,
    sleep_performance: Mean,
    hrv_series: Vec<f64>,
    green: usize,
    yellow: usize,
    red: usize,
    workouts: usize,
}

impl Totals {
    fn collect(days: &[DayData]) -> Self {
        let mut t = Totals::default();
        for day in days {
            t.workouts += day.workouts.len();

            if let Some(score) = day.recovery.as_ref().and_then(|r| r.scored()) {
                t.recovery.add(score.recovery_score);
                t.hrv.add(score.hrv_rmssd_milli);
                t.rhr.add(score.resting_heart_rate);
                t.hrv_series.push(score.hrv_rmssd_milli);
                match RecoveryZone::from_score(score.recovery_score) {
                    RecoveryZone::Green => t.green += 1,
                    RecoveryZone::Yellow => t.yellow += 1,
                    RecoveryZone::Red => t.red += 1,
                }
            }

            if let Some(score) = day.cycle.as_ref().filter(|c| c.is_scored()).and_then(|c| c.score.as_ref()) {
                t.strain.add(score.strain);
            }

            for score in day.sleeps.iter().filter(|s| !s.nap).filter_map(Sleep::scored) {
                t.sleep_millis.add(score.stage_summary.total_in_bed_time_milli as f64);
                if let Some(perf) = score.sleep_performance_percentage {
                    t.sleep_performance.add(perf);
                }
            }
        }
        t
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct WeekStats {
    pub week_start: Option<NaiveDate>,
    pub week_end: Option<NaiveDate>,
    pub avg_recovery: f64,
    pub avg_hrv: f64,
    pub avg_rhr: f64,
    pub avg_strain: f64,
    pub avg_sleep: String,
    pub green_days: usize,
    pub yellow_days: usize,
    pub red_days: usize,
    pub total_workouts: usize,
    pub best_day: Option<NaiveDate>,
    pub worst_day: Option<NaiveDate>,
    pub days: Vec<DayData>,
}

impl WeekStats {
    pub fn build(days: &[DayData]) -> Self {
        let t = Totals::collect(days);

        let mut best: Option<(f64, NaiveDate)> = None;
        let mut worst: Option<(f64, NaiveDate)> = None;
        for day in days {
            let Some(score) = day.recovery.as_ref().and_then(|r| r.scored()) else {
                continue;
            };
            let s = score.recovery_score;
            if best.is_none_or(|(b, _)| s > b) {
                best = Some((s, day.date));
            }
            if worst.is_none_or(|(w, _)| s < w) {
                worst = Some((s, day.date));
            }
        }

        Self {
            week_start: days.first().map(|d| d.date),
            week_end: days.last().map(|d| d.date),
            avg_recovery: t.recovery.value(),
            avg_hrv: t.hrv.value(),
            avg_rhr: t.rhr.value(),
            avg_strain: t.strain.value(),
            avg_sleep: format_millis(t.sleep_millis.value() as i64),
            green_days: t.green,
            yellow_days: t.yellow,
            red_days: t.red,
            total_workouts: t.workouts,
            best_day: best.map(|(_, d)| d),
            worst_day: worst.map(|(_, d)| d),
            days: days.to_vec(),
        }
    }
}

/// Rolling summary over a longer period.
#[derive(Clone, Debug, Serialize)]
pub struct PersonaStats {
    pub generated: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub avg_recovery: f64,
    pub avg_hrv: f64,
    pub hrv_trend: HrvTrend,
    pub avg_rhr: f64,
    pub avg_sleep: String,
    pub avg_sleep_performance: f64,
    pub avg_strain: f64,
    pub total_workouts: usize,
    pub green_days: usize,
    pub yellow_days: usize,
    pub red_days: usize,
}

impl PersonaStats {
    pub fn build(days: &[DayData]) -> AppResult<Self> {
        let (Some(first), Some(last)) = (days.first(), days.last()) else {
            return Err(AppError::Validation("no data provided for persona".into()));
        };
        let t = Totals::collect(days);
        Ok(Self {
            generated: Utc::now().date_naive(),
            period_start: first.date,
            period_end: last.date,
            avg_recovery: t.recovery.value(),
            avg_hrv: t.hrv.value(),
            hrv_trend: HrvTrend::from_series(&t.hrv_series),
            avg_rhr: t.rhr.value(),
            avg_sleep: format_millis(t.sleep_millis.value() as i64),
            avg_sleep_performance: t.sleep_performance.value(),
            avg_strain: t.strain.value(),
            total_workouts: t.workouts,
            green_days: t.green,
            yellow_days: t.yellow,
            red_days: t.red,
        })
    }
}

/// One day with the derived labels used for a daily note.
#[derive(Clone, Debug, Serialize)]
pub struct DailySummary {
    #[serde(flatten)]
    pub day: DayData,
    pub recovery_zone: Option<RecoveryZone>,
    pub strain_level: Option<StrainLevel>,
    pub primary_sleep: Option<SleepLine>,
    pub activities: Vec<ActivityLine>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SleepLine {
    pub id: String,
    pub time_in_bed: String,
    pub performance: Option<f64>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ActivityLine {
    pub id: String,
    pub sport: String,
    pub strain: Option<f64>,
    pub strain_level: Option<StrainLevel>,
}

impl DailySummary {
    pub fn build(day: DayData) -> Self {
        let recovery_zone = day
            .recovery
            .as_ref()
            .and_then(|r| r.scored())
            .map(|s| RecoveryZone::from_score(s.recovery_score));
        let strain_level = day
            .cycle
            .as_ref()
            .filter(|c| c.is_scored())
            .and_then(|c| c.score.as_ref())
            .map(|s| StrainLevel::from_strain(s.strain));
        let primary_sleep = primary_sleep(&day.sleeps).map(|s| SleepLine {
            id: s.id.clone(),
            time_in_bed: format_millis(s.time_in_bed_milli()),
            performance: s.scored().and_then(|sc| sc.sleep_performance_percentage),
        });
        let activities = day
            .workouts
            .iter()
            .map(|w| {
                let strain = w.scored().map(|sc| sc.strain);
                ActivityLine {
                    id: w.id.clone(),
                    sport: w.display_sport(),
                    strain,
                    strain_level: strain.map(StrainLevel::from_strain),
                }
            })
            .collect();

        Self {
            day,
            recovery_zone,
            strain_level,
            primary_sleep,
            activities,
        }
    }
}
