use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Classification axes
// ────────────────────────────────────────────────────────────────────────────

/// One of the four professional-development categories questions are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Capability,
    Competence,
    Character,
    Capacity,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [
        Pillar::Capability,
        Pillar::Competence,
        Pillar::Character,
        Pillar::Capacity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Pillar::Capability => "Capability",
            Pillar::Competence => "Competence",
            Pillar::Character => "Character",
            Pillar::Capacity => "Capacity",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalState {
    Awareness,
    Command,
}

impl fmt::Display for InternalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternalState::Awareness => f.write_str("awareness"),
            InternalState::Command => f.write_str("command"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalState {
    NoSystem,
    System,
}

impl fmt::Display for ExternalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalState::NoSystem => f.write_str("no-system"),
            ExternalState::System => f.write_str("system"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quadrant must be 1, 2, 3 or 4 (got {0})")]
pub struct InvalidQuadrant(pub u8);

/// A point in the 2×2 space crossing `InternalState` with `ExternalState`.
///
/// Serialized as the bare integer 1–4.
///
/// | Quadrant | InternalState | ExternalState |
/// |---|---|---|
/// | 1 | awareness | no-system |
/// | 2 | awareness | system |
/// | 3 | command | no-system |
/// | 4 | command | system |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QuadrantLevel {
    Q1 = 1,
    Q2 = 2,
    Q3 = 3,
    Q4 = 4,
}

impl QuadrantLevel {
    /// Ascending order. Tie-breaks that favor the lower quadrant iterate this.
    pub const ALL: [QuadrantLevel; 4] = [
        QuadrantLevel::Q1,
        QuadrantLevel::Q2,
        QuadrantLevel::Q3,
        QuadrantLevel::Q4,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn internal_state(self) -> InternalState {
        match self {
            QuadrantLevel::Q1 | QuadrantLevel::Q2 => InternalState::Awareness,
            QuadrantLevel::Q3 | QuadrantLevel::Q4 => InternalState::Command,
        }
    }

    pub fn external_state(self) -> ExternalState {
        match self {
            QuadrantLevel::Q1 | QuadrantLevel::Q3 => ExternalState::NoSystem,
            QuadrantLevel::Q2 | QuadrantLevel::Q4 => ExternalState::System,
        }
    }

    pub fn from_states(internal: InternalState, external: ExternalState) -> Self {
        match (internal, external) {
            (InternalState::Awareness, ExternalState::NoSystem) => QuadrantLevel::Q1,
            (InternalState::Awareness, ExternalState::System) => QuadrantLevel::Q2,
            (InternalState::Command, ExternalState::NoSystem) => QuadrantLevel::Q3,
            (InternalState::Command, ExternalState::System) => QuadrantLevel::Q4,
        }
    }
}

impl TryFrom<u8> for QuadrantLevel {
    type Error = InvalidQuadrant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(QuadrantLevel::Q1),
            2 => Ok(QuadrantLevel::Q2),
            3 => Ok(QuadrantLevel::Q3),
            4 => Ok(QuadrantLevel::Q4),
            other => Err(InvalidQuadrant(other)),
        }
    }
}

impl From<QuadrantLevel> for u8 {
    fn from(level: QuadrantLevel) -> Self {
        level.value()
    }
}

impl fmt::Display for QuadrantLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.value())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Question bank schema
// ────────────────────────────────────────────────────────────────────────────

/// One selectable answer. The state pair is derived from `quadrant` and never
/// set independently.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionOption {
    pub quadrant: QuadrantLevel,
    pub label: &'static str,
    pub internal_state: InternalState,
    pub external_state: ExternalState,
}

impl QuestionOption {
    pub fn new(quadrant: QuadrantLevel, label: &'static str) -> Self {
        Self {
            quadrant,
            label,
            internal_state: quadrant.internal_state(),
            external_state: quadrant.external_state(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub pillar: Pillar,
    /// Informational grouping (1–3); not used in scoring.
    pub stage: u8,
    pub quality: &'static str,
    pub statement: &'static str,
    /// Presentation order, not necessarily ascending by quadrant.
    pub options: [QuestionOption; 4],
}

impl Question {
    pub fn option(&self, quadrant: QuadrantLevel) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.quadrant == quadrant)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring input / output
// ────────────────────────────────────────────────────────────────────────────

/// A single selection for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub quadrant: QuadrantLevel,
    pub internal_state: InternalState,
    pub external_state: ExternalState,
    pub pillar: Pillar,
}

impl Response {
    pub fn new(pillar: Pillar, quadrant: QuadrantLevel) -> Self {
        Self {
            quadrant,
            internal_state: quadrant.internal_state(),
            external_state: quadrant.external_state(),
            pillar,
        }
    }

    /// True when the state pair is the one implied by `quadrant`.
    pub fn is_consistent(&self) -> bool {
        QuadrantLevel::from_states(self.internal_state, self.external_state) == self.quadrant
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantCounts {
    pub q1: u32,
    pub q2: u32,
    pub q3: u32,
    pub q4: u32,
}

impl QuadrantCounts {
    pub fn get(&self, level: QuadrantLevel) -> u32 {
        match level {
            QuadrantLevel::Q1 => self.q1,
            QuadrantLevel::Q2 => self.q2,
            QuadrantLevel::Q3 => self.q3,
            QuadrantLevel::Q4 => self.q4,
        }
    }

    pub fn increment(&mut self, level: QuadrantLevel) {
        self.add(level, 1);
    }

    pub fn add(&mut self, level: QuadrantLevel, n: u32) {
        match level {
            QuadrantLevel::Q1 => self.q1 += n,
            QuadrantLevel::Q2 => self.q2 += n,
            QuadrantLevel::Q3 => self.q3 += n,
            QuadrantLevel::Q4 => self.q4 += n,
        }
    }

    pub fn total(&self) -> u32 {
        self.q1 + self.q2 + self.q3 + self.q4
    }
}

/// Per-pillar sum of quadrant values (a weighted sum, not a count).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarScores {
    pub capability: u32,
    pub competence: u32,
    pub character: u32,
    pub capacity: u32,
}

impl PillarScores {
    pub fn get(&self, pillar: Pillar) -> u32 {
        match pillar {
            Pillar::Capability => self.capability,
            Pillar::Competence => self.competence,
            Pillar::Character => self.character,
            Pillar::Capacity => self.capacity,
        }
    }

    pub fn add(&mut self, pillar: Pillar, points: u32) {
        match pillar {
            Pillar::Capability => self.capability += points,
            Pillar::Competence => self.competence += points,
            Pillar::Character => self.character += points,
            Pillar::Capacity => self.capacity += points,
        }
    }

    pub fn total(&self) -> u32 {
        self.capability + self.competence + self.character + self.capacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategicPathway {
    #[serde(rename = "Direct Path")]
    DirectPath,
    #[serde(rename = "Route A: System-First")]
    SystemFirst,
    #[serde(rename = "Route B: Command-First")]
    CommandFirst,
    #[serde(rename = "Undefined")]
    Undefined,
}

impl StrategicPathway {
    pub const ALL: [StrategicPathway; 4] = [
        StrategicPathway::DirectPath,
        StrategicPathway::SystemFirst,
        StrategicPathway::CommandFirst,
        StrategicPathway::Undefined,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StrategicPathway::DirectPath => "Direct Path",
            StrategicPathway::SystemFirst => "Route A: System-First",
            StrategicPathway::CommandFirst => "Route B: Command-First",
            StrategicPathway::Undefined => "Undefined",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for StrategicPathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of a single scoring pass. Percentages are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadAssessmentResult {
    pub dominant_quadrant: QuadrantLevel,
    pub quadrant_counts: QuadrantCounts,
    pub pillar_scores: PillarScores,
    pub strategic_pathway: StrategicPathway,
    pub internal_leverage: f64,
    pub external_system: f64,
    pub total_responses: u32,
    pub readiness_for_q4: f64,
}
