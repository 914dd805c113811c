use serde::{Deserialize, Serialize};

use super::drill::{DrillCategory, DrillDifficulty};
use super::profile::PlayerProfile;

/// Body of `POST /generate_training_plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPlanRequest {
    /// Identifier of the signed-in user.
    pub user_id: String,
    /// Profile the plan is built for.
    pub player_profile: PlayerProfile,
    /// Six weeks by default.
    pub duration_weeks: u8,
    /// Overall difficulty.
    pub difficulty: DrillDifficulty,
    /// Main skill family.
    pub category: DrillCategory,
    /// Skills to emphasise.
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Role the player trains for, for instance `Target man`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    /// Days to train on, for instance `Monday`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_days: Vec<String>,
    /// Days the plan must leave empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rest_days: Vec<String>,
}

impl TrainingPlanRequest {
    /// A six week plan request with default difficulty and category.
    pub fn new(user_id: impl Into<String>, player_profile: PlayerProfile) -> Self {
        Self {
            user_id: user_id.into(),
            player_profile,
            duration_weeks: 6,
            difficulty: DrillDifficulty::default(),
            category: DrillCategory::default(),
            focus_areas: vec![],
            target_role: None,
            preferred_days: vec![],
            rest_days: vec![],
        }
    }

    /// Sets the number of weeks.
    #[must_use]
    pub fn with_duration_weeks(mut self, duration_weeks: u8) -> Self {
        self.duration_weeks = duration_weeks;
        self
    }

    /// Sets the difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: DrillDifficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: DrillCategory) -> Self {
        self.category = category;
        self
    }

    /// Adds a focus area.
    #[must_use]
    pub fn add_focus_area(mut self, focus_area: impl Into<String>) -> Self {
        self.focus_areas.push(focus_area.into());
        self
    }

    /// Sets the target role.
    #[must_use]
    pub fn with_target_role(mut self, target_role: impl Into<String>) -> Self {
        self.target_role = Some(target_role.into());
        self
    }

    /// Adds a day without training.
    #[must_use]
    pub fn add_rest_day(mut self, day: impl Into<String>) -> Self {
        self.rest_days.push(day.into());
        self
    }

    /// Adds a day to train on.
    #[must_use]
    pub fn add_preferred_day(mut self, day: impl Into<String>) -> Self {
        self.preferred_days.push(day.into());
        self
    }
}

/// A multi-week plan returned by `POST /generate_training_plan`.
///
/// Difficulty and category are echoed as free text by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPlan {
    /// Plan title.
    pub name: String,
    /// Overview of the plan.
    #[serde(default)]
    pub description: String,
    /// Difficulty as written by the generator.
    #[serde(default)]
    pub difficulty: String,
    /// Category as written by the generator.
    #[serde(default)]
    pub category: String,
    /// Echo of the requested role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    /// In order.
    pub weeks: Vec<TrainingWeek>,
}

impl TrainingPlan {
    /// Every session of the plan, week after week.
    pub fn sessions(&self) -> impl Iterator<Item = &TrainingSession> {
        self.weeks
            .iter()
            .flat_map(|week| &week.days)
            .flat_map(|day| &day.sessions)
    }

    /// Sum of the session durations, in minutes.
    pub fn total_minutes(&self) -> u32 {
        self.sessions().map(|session| session.duration).sum()
    }
}

/// One week of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingWeek {
    /// Starts at 1.
    pub week_number: u8,
    /// Theme of the week.
    #[serde(default)]
    pub focus_area: String,
    /// Coach notes for the week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// In order.
    pub days: Vec<TrainingDay>,
}

impl TrainingWeek {
    /// Days without training.
    pub fn rest_days(&self) -> impl Iterator<Item = &TrainingDay> {
        self.days.iter().filter(|day| day.is_rest_day)
    }
}

/// One day of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDay {
    /// Starts at 1 within the week.
    pub day_number: u8,
    /// For instance `Monday`.
    pub day_of_week: String,
    /// Rest days carry no session.
    #[serde(default)]
    pub is_rest_day: bool,
    /// Sessions of the day.
    #[serde(default)]
    pub sessions: Vec<TrainingSession>,
}

/// A block of training within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSession {
    /// `Technical`, `Physical`, `Tactical` or `Recovery`.
    pub session_type: String,
    /// Duration in minutes.
    pub duration: u32,
    /// From 1 to 5.
    pub intensity: u8,
    /// What to focus on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Catalog exercises fitting the session.
    #[serde(default)]
    pub suggested_exercise_names: Vec<String>,
}
