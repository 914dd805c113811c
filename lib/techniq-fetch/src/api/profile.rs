use serde::{Deserialize, Serialize};

/// The player profile sent along every backend request.
///
/// The backend reads profile keys in `camelCase` (`experienceLevel`,
/// `skillGoals`) while the rest of the request uses `snake_case`, so only
/// serialization is renamed. Decoding goes through the executor key strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PlayerProfile {
    /// First name, used to address the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,

    /// Field position, for instance `midfielder`.
    pub position: String,

    /// `beginner`, `intermediate` or `advanced`.
    pub experience_level: String,

    /// Goals used by the drill generator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skill_goals: Vec<String>,

    /// Goals used by the recommendation functions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,

    /// Areas the player struggles with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weaknesses: Vec<String>,

    /// For instance `box-to-box`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playing_style: Option<String>,

    /// Professional the player looks up to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_role_model: Option<String>,
}

impl PlayerProfile {
    /// A profile with a position and an experience level, everything else empty.
    pub fn new(position: impl Into<String>, experience_level: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            experience_level: experience_level.into(),
            ..Self::default()
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the age.
    #[must_use]
    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }

    /// Adds a goal read by every backend function.
    #[must_use]
    pub fn add_goal(mut self, goal: impl Into<String>) -> Self {
        let goal = goal.into();
        self.skill_goals.push(goal.clone());
        self.goals.push(goal);
        self
    }

    /// Adds a weakness.
    #[must_use]
    pub fn add_weakness(mut self, weakness: impl Into<String>) -> Self {
        self.weaknesses.push(weakness.into());
        self
    }

    /// Sets the playing style.
    #[must_use]
    pub fn with_playing_style(mut self, playing_style: impl Into<String>) -> Self {
        self.playing_style = Some(playing_style.into());
        self
    }

    /// Sets the role model.
    #[must_use]
    pub fn with_player_role_model(mut self, player_role_model: impl Into<String>) -> Self {
        self.player_role_model = Some(player_role_model.into());
        self
    }
}
