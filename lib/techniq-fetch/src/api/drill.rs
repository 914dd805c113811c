use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::profile::PlayerProfile;

/// Error returned when parsing an unknown drill option.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("unknown {kind}: '{value}'")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Main skill family a drill works on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillCategory {
    /// Ball mastery, passing, first touch.
    #[default]
    #[serde(alias = "Technical")]
    Technical,
    /// Speed, agility and endurance.
    #[serde(alias = "Physical")]
    Physical,
    /// Positioning and decision making.
    #[serde(alias = "Tactical")]
    Tactical,
    /// Focus and composure.
    #[serde(alias = "Mental")]
    Mental,
}

impl DrillCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Technical, Self::Physical, Self::Tactical, Self::Mental];

    /// Label shown to players.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Physical => "Physical",
            Self::Tactical => "Tactical",
            Self::Mental => "Mental",
        }
    }
}

impl FromStr for DrillCategory {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "technical" => Ok(Self::Technical),
            "physical" => Ok(Self::Physical),
            "tactical" => Ok(Self::Tactical),
            "mental" => Ok(Self::Mental),
            _ => Err(UnknownValue::new("drill category", value)),
        }
    }
}

/// Level a drill is designed for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillDifficulty {
    /// New to structured training.
    #[serde(alias = "Beginner")]
    Beginner,
    /// Comfortable with the basics.
    #[default]
    #[serde(alias = "Intermediate")]
    Intermediate,
    /// Competitive level.
    #[serde(alias = "Advanced")]
    Advanced,
}

impl DrillDifficulty {
    /// Every difficulty, from the easiest.
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Label shown to players.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl FromStr for DrillDifficulty {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(UnknownValue::new("drill difficulty", value)),
        }
    }
}

/// Size of the area available for a drill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSize {
    /// 20 by 15 meters.
    Small,
    /// 30 by 20 meters.
    #[default]
    Medium,
    /// 50 by 30 meters.
    Large,
}

impl FieldSize {
    /// Every field size, from the smallest.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Label with the dimensions, for instance `Small (20x15m)`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Small => "Small (20x15m)",
            Self::Medium => "Medium (30x20m)",
            Self::Large => "Large (50x30m)",
        }
    }

    /// Field dimensions in meters, as used by the drill generator.
    pub fn dimensions(self) -> FieldDimensions {
        let (width, length) = match self {
            Self::Small => (20, 15),
            Self::Medium => (30, 20),
            Self::Large => (50, 30),
        };
        FieldDimensions { width, length }
    }
}

impl FromStr for FieldSize {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(UnknownValue::new("field size", value)),
        }
    }
}

/// Equipment a player has at hand.
///
/// Unknown values are kept as [`Equipment::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Equipment {
    /// A football.
    Ball,
    /// Marker cones.
    Cones,
    /// A goal of any size.
    Goal,
    /// A wall or rebounder to pass against.
    Wall,
    /// An agility ladder.
    Ladder,
    /// Mini hurdles.
    Hurdles,
    /// Free kick mannequins.
    Mannequins,
    /// Slalom poles.
    Poles,
    /// Any other equipment, kept as received.
    #[serde(untagged)]
    Other(String),
}

impl Equipment {
    /// Equipment with a dedicated variant.
    pub const KNOWN: [Self; 8] = [
        Self::Ball,
        Self::Cones,
        Self::Goal,
        Self::Wall,
        Self::Ladder,
        Self::Hurdles,
        Self::Mannequins,
        Self::Poles,
    ];

    /// Label shown to players.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ball => "Ball",
            Self::Cones => "Cones",
            Self::Goal => "Goal",
            Self::Wall => "Wall",
            Self::Ladder => "Agility Ladder",
            Self::Hurdles => "Hurdles",
            Self::Mannequins => "Mannequins",
            Self::Poles => "Poles",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for Equipment {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let known = match value.to_lowercase().as_str() {
            "ball" => Self::Ball,
            "cones" => Self::Cones,
            "goal" => Self::Goal,
            "wall" => Self::Wall,
            "ladder" => Self::Ladder,
            "hurdles" => Self::Hurdles,
            "mannequins" => Self::Mannequins,
            "poles" => Self::Poles,
            _ => Self::Other(value.to_string()),
        };
        Ok(known)
    }
}

/// What the generator is asked to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillRequirements {
    /// Free text describing the skill to work on.
    pub skill_description: String,
    /// Defaults to technical.
    #[serde(default)]
    pub category: DrillCategory,
    /// Defaults to intermediate.
    #[serde(default)]
    pub difficulty: DrillDifficulty,
    /// Equipment the player has at hand.
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    /// Players taking part, one by default.
    #[serde(default = "one_player")]
    pub number_of_players: u32,
}

fn one_player() -> u32 {
    1
}

impl DrillRequirements {
    /// Requirements for a solo technical drill of intermediate difficulty.
    pub fn new(skill_description: impl Into<String>) -> Self {
        Self {
            skill_description: skill_description.into(),
            category: DrillCategory::default(),
            difficulty: DrillDifficulty::default(),
            equipment: vec![],
            number_of_players: one_player(),
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: DrillCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: DrillDifficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Adds available equipment.
    #[must_use]
    pub fn add_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment.push(equipment);
        self
    }

    /// Sets the number of players.
    #[must_use]
    pub fn with_number_of_players(mut self, number_of_players: u32) -> Self {
        self.number_of_players = number_of_players;
        self
    }
}

/// A recently completed exercise, used to personalise the drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentExercise {
    /// Skill worked on.
    pub skill: String,
    /// Rating out of 5.
    pub rating: u8,
    /// Free text notes of the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// What the player trained recently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Most recent first.
    #[serde(default)]
    pub recent_exercises: Vec<RecentExercise>,
}

/// Feedback given on a previously generated drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillFeedback {
    /// Rating out of 5.
    pub rating: u8,
    /// `too_easy`, `appropriate` or `too_hard`.
    pub difficulty_feedback: String,
    /// `Positive`, `Neutral` or `Negative`.
    pub feedback_type: String,
    /// Free text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /generate_custom_drill`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDrillRequest {
    /// Identifier of the signed-in user.
    pub user_id: String,
    /// Profile of the player the drill is for.
    pub player_profile: PlayerProfile,
    /// What the drill must work on.
    pub requirements: DrillRequirements,
    /// Recent training, to avoid repetition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_context: Option<SessionContext>,
    /// Feedback on previous drills.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drill_feedback: Vec<DrillFeedback>,
    /// Space available, medium by default.
    #[serde(default)]
    pub field_size: FieldSize,
}

impl CustomDrillRequest {
    /// A request for a medium field, without context nor feedback.
    pub fn new(
        user_id: impl Into<String>,
        player_profile: PlayerProfile,
        requirements: DrillRequirements,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            player_profile,
            requirements,
            session_context: None,
            drill_feedback: vec![],
            field_size: FieldSize::default(),
        }
    }

    /// Sets the field size.
    #[must_use]
    pub fn with_field_size(mut self, field_size: FieldSize) -> Self {
        self.field_size = field_size;
        self
    }

    /// Sets the recent training context.
    #[must_use]
    pub fn with_session_context(mut self, session_context: SessionContext) -> Self {
        self.session_context = Some(session_context);
        self
    }

    /// Adds feedback on a previous drill.
    #[must_use]
    pub fn add_feedback(mut self, feedback: DrillFeedback) -> Self {
        self.drill_feedback.push(feedback);
        self
    }
}

/// Response of `POST /generate_custom_drill`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDrillResponse {
    /// Echo of the request user.
    pub user_id: String,
    /// The generated drill.
    pub drill: GeneratedDrill,
    /// Name of the generation algorithm.
    pub algorithm: String,
    /// Generation time, ISO 8601 without offset.
    pub generated_at: String,
    /// Version of the generation model.
    pub model_version: String,
    /// Echo of the request requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<DrillRequirements>,
}

/// A drill produced by the generator.
///
/// Difficulty and category are free text written by the generator, see
/// [`GeneratedDrill::known_difficulty`] and [`GeneratedDrill::known_category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDrill {
    /// Short title.
    pub name: String,
    /// What the drill is about.
    pub description: String,
    /// How to lay out the field.
    pub setup: String,
    /// Steps, in order.
    pub instructions: Vec<String>,
    /// Layout of the drill.
    pub diagram: DrillDiagram,
    /// Easier and harder variations.
    #[serde(default)]
    pub progressions: Vec<String>,
    /// What to focus on while running the drill.
    #[serde(default)]
    pub coaching_points: Vec<String>,
    /// Duration in minutes.
    pub estimated_duration: u32,
    /// Difficulty as written by the generator.
    #[serde(default)]
    pub difficulty: String,
    /// Category as written by the generator.
    #[serde(default)]
    pub category: String,
    /// Skills the drill improves.
    #[serde(default)]
    pub target_skills: Vec<String>,
    /// Equipment the drill needs.
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    /// Safety advice, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_notes: Option<String>,
}

impl GeneratedDrill {
    /// The difficulty, if it is one of [`DrillDifficulty::ALL`].
    pub fn known_difficulty(&self) -> Option<DrillDifficulty> {
        self.difficulty.parse().ok()
    }

    /// The category, if it is one of [`DrillCategory::ALL`].
    pub fn known_category(&self) -> Option<DrillCategory> {
        self.category.parse().ok()
    }

    /// Equipment used by the drill that is not in `available`.
    pub fn unavailable_equipment<'a>(&'a self, available: &[Equipment]) -> Vec<&'a Equipment> {
        self.equipment
            .iter()
            .filter(|item| !available.contains(item))
            .collect()
    }
}

/// Field size in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDimensions {
    /// Along the `x` axis.
    pub width: u32,
    /// Along the `y` axis.
    pub length: u32,
}

/// Layout of a drill: field, placed elements and movements between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillDiagram {
    /// Dimensions of the area.
    pub field: FieldDimensions,
    /// Cones, players and targets placed on the field.
    #[serde(default)]
    pub elements: Vec<DiagramElement>,
    /// Movements between labelled elements.
    #[serde(default)]
    pub paths: Vec<DiagramPath>,
}

impl DrillDiagram {
    /// Elements placed outside the field.
    pub fn out_of_bounds(&self) -> impl Iterator<Item = &DiagramElement> {
        let FieldDimensions { width, length } = self.field;
        self.elements.iter().filter(move |element| {
            element.x < 0.0
                || element.y < 0.0
                || element.x > f64::from(width)
                || element.y > f64::from(length)
        })
    }

    /// Paths whose ends do not match any element label.
    pub fn dangling_paths(&self) -> impl Iterator<Item = &DiagramPath> {
        let is_known = |label: &str| {
            self.elements
                .iter()
                .any(|element| element.label.as_deref() == Some(label))
        };
        self.paths
            .iter()
            .filter(move |path| !is_known(&path.from) || !is_known(&path.to))
    }
}

/// An element placed on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramElement {
    /// Sent as `type`.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Position along the width, in meters.
    pub x: f64,
    /// Position along the length, in meters.
    pub y: f64,
    /// Name referenced by paths, for instance `A`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Kind of a diagram element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A marker cone.
    Cone,
    /// A player starting position.
    Player,
    /// A zone to reach or hit.
    Target,
    /// A goal.
    Goal,
    /// A ball starting position.
    Ball,
    /// Any other kind, kept as received.
    #[serde(untagged)]
    Other(String),
}

impl ElementKind {
    /// Label shown on the diagram legend.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Cone => "Cone",
            Self::Player => "Player",
            Self::Target => "Target",
            Self::Goal => "Goal",
            Self::Ball => "Ball",
            Self::Other(name) => name,
        }
    }
}

/// A movement from one labelled element to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramPath {
    /// Label of the start element.
    pub from: String,
    /// Label of the end element.
    pub to: String,
    /// How the player moves.
    pub style: PathStyle,
}

/// How a movement is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// With the ball at the feet.
    Dribble,
    /// Without the ball.
    Run,
    /// The ball travels alone.
    Pass,
    /// Any other style, kept as received.
    #[serde(untagged)]
    Other(String),
}

impl PathStyle {
    /// Label shown on the diagram legend.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Dribble => "Dribble",
            Self::Run => "Run",
            Self::Pass => "Pass",
            Self::Other(name) => name,
        }
    }
}
