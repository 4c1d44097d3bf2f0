//! Record types returned by the WHOOP v2 collection endpoints.
//!
//! Timestamps are kept as the provider's strings; use
//! [`parse_whoop_time`](crate::window::parse_whoop_time) where an instant is needed.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreState {
    Scored,
    PendingScore,
    Unscorable,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyMeasurements {
    pub height_meter: f64,
    pub weight_kilogram: f64,
    pub max_heart_rate: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CycleScore {
    pub strain: f64,
    pub kilojoule: f64,
    pub average_heart_rate: u32,
    pub max_heart_rate: u32,
}

/// A physiological day. `end` is absent while the cycle is still open.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Cycle {
    pub id: i64,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub start: String,
    #[serde(deserialize_with = "deserialize_opt_timestamp")]
    pub end: Option<String>,
    pub timezone_offset: String,
    pub score_state: ScoreState,
    pub score: Option<CycleScore>,
}

impl Cycle {
    pub fn is_scored(&self) -> bool {
        self.score_state == ScoreState::Scored && self.score.is_some()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecoveryScore {
    pub user_calibrating: bool,
    pub recovery_score: f64,
    pub resting_heart_rate: f64,
    pub hrv_rmssd_milli: f64,
    pub spo2_percentage: Option<f64>,
    pub skin_temp_celsius: Option<f64>,
}

/// Recovery is linked to its cycle only through `cycle_id`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Recovery {
    pub cycle_id: i64,
    pub sleep_id: String,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub score_state: ScoreState,
    pub score: Option<RecoveryScore>,
}

impl Recovery {
    /// The score, if the record has been scored.
    pub fn scored(&self) -> Option<&RecoveryScore> {
        match self.score_state {
            ScoreState::Scored => self.score.as_ref(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SleepStageSummary {
    pub total_in_bed_time_milli: i64,
    pub total_awake_time_milli: i64,
    pub total_no_data_time_milli: i64,
    pub total_light_sleep_time_milli: i64,
    pub total_slow_wave_sleep_time_milli: i64,
    pub total_rem_sleep_time_milli: i64,
    pub sleep_cycle_count: u32,
    pub disturbance_count: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SleepNeeded {
    pub baseline_milli: i64,
    pub need_from_sleep_debt_milli: i64,
    pub need_from_recent_strain_milli: i64,
    pub need_from_recent_nap_milli: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SleepScore {
    pub stage_summary: SleepStageSummary,
    pub sleep_needed: SleepNeeded,
    pub respiratory_rate: Option<f64>,
    pub sleep_performance_percentage: Option<f64>,
    pub sleep_consistency_percentage: Option<f64>,
    pub sleep_efficiency_percentage: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Sleep {
    pub id: String,
    /// Legacy integer id, no longer populated for recent records.
    pub v1_id: Option<i64>,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub start: String,
    pub end: String,
    pub timezone_offset: String,
    pub nap: bool,
    pub score_state: ScoreState,
    pub score: Option<SleepScore>,
}

impl Sleep {
    pub fn scored(&self) -> Option<&SleepScore> {
        match self.score_state {
            ScoreState::Scored => self.score.as_ref(),
            _ => None,
        }
    }

    pub fn time_in_bed_milli(&self) -> i64 {
        self.score
            .as_ref()
            .map(|s| s.stage_summary.total_in_bed_time_milli)
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoneDurations {
    pub zone_zero_milli: i64,
    pub zone_one_milli: i64,
    pub zone_two_milli: i64,
    pub zone_three_milli: i64,
    pub zone_four_milli: i64,
    pub zone_five_milli: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkoutScore {
    pub strain: f64,
    pub average_heart_rate: u32,
    pub max_heart_rate: u32,
    pub kilojoule: f64,
    pub percent_recorded: f64,
    pub distance_meter: Option<f64>,
    pub altitude_gain_meter: Option<f64>,
    pub altitude_change_meter: Option<f64>,
    pub zone_durations: ZoneDurations,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Workout {
    pub id: String,
    pub v1_id: Option<i64>,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub start: String,
    pub end: String,
    pub timezone_offset: String,
    pub sport_id: i32,
    pub sport_name: Option<String>,
    pub score_state: ScoreState,
    pub score: Option<WorkoutScore>,
}

impl Workout {
    pub fn scored(&self) -> Option<&WorkoutScore> {
        match self.score_state {
            ScoreState::Scored => self.score.as_ref(),
            _ => None,
        }
    }

    /// Provider-supplied sport name, falling back to the sport-id table.
    pub fn display_sport(&self) -> String {
        match self.sport_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => sport_name(self.sport_id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Sport({})", self.sport_id)),
        }
    }
}

/// One page of a paginated collection.
#[derive(Clone, Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "deserialize_null_vec")]
    pub records: Vec<T>,
    #[serde(default)]
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Continuation token for the following page, if any.
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|t| !t.is_empty())
    }
}

fn deserialize_null_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// `null`, a missing key and `""` all mean the cycle is still open.
fn deserialize_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Human-readable name for a WHOOP sport id.
pub fn sport_name(id: i32) -> Option<&'static str> {
    let name = match id {
        -1 => "Activity",
        0 => "Running",
        1 => "Cycling",
        16 => "Baseball",
        17 => "Basketball",
        18 => "Rowing",
        19 => "Fencing",
        20 => "Field Hockey",
        21 => "Football",
        22 => "Golf",
        24 => "Ice Hockey",
        25 => "Lacrosse",
        27 => "Rugby",
        28 => "Sailing",
        29 => "Skiing",
        30 => "Soccer",
        31 => "Softball",
        32 => "Squash",
        33 => "Swimming",
        34 => "Tennis",
        35 => "Track & Field",
        36 => "Volleyball",
        37 => "Water Polo",
        38 => "Wrestling",
        39 => "Boxing",
        42 => "Dance",
        43 => "Pilates",
        44 => "Yoga",
        45 => "Weightlifting",
        47 => "Cross Country Skiing",
        48 => "Functional Fitness",
        49 => "Duathlon",
        51 => "Gymnastics",
        52 => "Hiking/Rucking",
        53 => "Horseback Riding",
        55 => "Kayaking",
        56 => "Martial Arts",
        57 => "Mountain Biking",
        59 => "Powerlifting",
        60 => "Rock Climbing",
        61 => "Paddleboarding",
        62 => "Triathlon",
        63 => "Walking",
        64 => "Surfing",
        65 => "Elliptical",
        66 => "Stairmaster",
        70 => "Meditation",
        71 => "Other",
        73 => "Diving",
        74 => "Operations - Tactical",
        75 => "Operations - Medical",
        76 => "Operations - Flying",
        77 => "Operations - Water",
        82 => "Ultimate",
        83 => "Climber",
        84 => "Jumping Rope",
        85 => "Australian Football",
        86 => "Skateboarding",
        87 => "Coaching",
        88 => "Ice Bath",
        89 => "Commuting",
        90 => "Gaming",
        91 => "Snowboarding",
        92 => "Motocross",
        93 => "Cricket",
        94 => "Pickleball",
        95 => "Badminton",
        96 => "Obstacle Course Racing",
        97 => "Motor Racing",
        98 => "HIIT",
        99 => "Spin",
        100 => "Jiu Jitsu",
        101 => "Manual Labor",
        103 => "Archery",
        _ => return None,
    };
    Some(name)
}
