//! Insights — narrative coaching generated from a scored assessment.
//!
//! Pluggable like the rest of the collaborators: `AppState` holds an
//! `Arc<dyn InsightGenerator>`. `LlmInsightGenerator` asks the LLM;
//! `StaticInsightGenerator` is used when no API key is configured.
//! Callers go through `generate_or_fallback`, which never fails: any error
//! degrades to the canned insight for the dominant quadrant.

pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::diagnostic::models::{CadAssessmentResult, Pillar, QuadrantLevel, Response};
use crate::errors::AppError;
use crate::insights::prompts::{INSIGHT_PROMPT_TEMPLATE, INSIGHT_SYSTEM};
use crate::llm_client::prompts::{EVIDENCE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub summary: String,
    pub strengths: Vec<String>,
    pub growth_areas: Vec<String>,
    pub action_steps: Vec<String>,
    pub motivational_line: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSource {
    Llm,
    Fallback,
}

impl InsightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightSource::Llm => "llm",
            InsightSource::Fallback => "fallback",
        }
    }
}

/// Everything a generator may look at.
#[derive(Debug, Clone, Copy)]
pub struct InsightRequest<'a> {
    pub result: &'a CadAssessmentResult,
    pub responses: &'a [Response],
    pub display_name: Option<&'a str>,
}

#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, request: InsightRequest<'_>) -> Result<Insight, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmInsightGenerator(pub LlmClient);

#[async_trait]
impl InsightGenerator for LlmInsightGenerator {
    async fn generate(&self, request: InsightRequest<'_>) -> Result<Insight, AppError> {
        let prompt = build_insight_prompt(request);
        let system = format!("{INSIGHT_SYSTEM} {JSON_ONLY_SYSTEM}");
        let insight: Insight = self
            .0
            .complete_json(&prompt, &system)
            .await
            .map_err(|e| AppError::Llm(format!("insight generation failed: {e}")))?;

        if insight.summary.trim().is_empty() {
            return Err(AppError::Llm("insight summary was empty".to_string()));
        }
        Ok(insight)
    }
}

/// Always answers with the canned insight for the dominant quadrant.
pub struct StaticInsightGenerator;

#[async_trait]
impl InsightGenerator for StaticInsightGenerator {
    async fn generate(&self, request: InsightRequest<'_>) -> Result<Insight, AppError> {
        Ok(fallback_insight(request.result.dominant_quadrant))
    }
}

/// Runs the generator; on failure logs and returns the quadrant fallback.
pub async fn generate_or_fallback(
    generator: &dyn InsightGenerator,
    request: InsightRequest<'_>,
) -> (Insight, InsightSource) {
    match generator.generate(request).await {
        Ok(insight) => {
            info!(
                "Generated insight for dominant quadrant {}",
                request.result.dominant_quadrant
            );
            (insight, InsightSource::Llm)
        }
        Err(e) => {
            warn!("Insight generation unavailable, using fallback: {e}");
            (
                fallback_insight(request.result.dominant_quadrant),
                InsightSource::Fallback,
            )
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

pub fn build_insight_prompt(request: InsightRequest<'_>) -> String {
    let result = request.result;
    let counts = QuadrantLevel::ALL
        .iter()
        .map(|&q| format!("{q}={}", result.quadrant_counts.get(q)))
        .collect::<Vec<_>>()
        .join(", ");
    let pillars = format!(
        "{} (total {})",
        Pillar::ALL
            .iter()
            .map(|&p| format!("{p}={}", result.pillar_scores.get(p)))
            .collect::<Vec<_>>()
            .join(", "),
        result.pillar_scores.total()
    );
    let answers = request
        .responses
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}: {}", i + 1, r.pillar, r.quadrant))
        .collect::<Vec<_>>()
        .join("\n");

    INSIGHT_PROMPT_TEMPLATE
        .replace("{name}", request.display_name.unwrap_or("the respondent"))
        .replace("{dominant}", &result.dominant_quadrant.to_string())
        .replace("{pathway}", result.strategic_pathway.label())
        .replace("{counts}", &counts)
        .replace("{pillars}", &pillars)
        .replace("{internal}", &format!("{:.0}", result.internal_leverage))
        .replace("{external}", &format!("{:.0}", result.external_system))
        .replace("{readiness}", &format!("{:.0}", result.readiness_for_q4))
        .replace("{answers}", &answers)
        .replace("{evidence}", EVIDENCE_INSTRUCTION)
}

// ────────────────────────────────────────────────────────────────────────────
// Fallbacks
// ────────────────────────────────────────────────────────────────────────────

/// Canned insight keyed only by dominant quadrant.
pub fn fallback_insight(dominant: QuadrantLevel) -> Insight {
    let (summary, strengths, growth_areas, action_steps, motivational_line) = match dominant {
        QuadrantLevel::Q1 => (
            "You are in the awareness stage: you see what matters for your career, but you have not yet built the command or the systems to act on it consistently.",
            [
                "Honest self-awareness about where you stand",
                "Openness to feedback and new approaches",
                "A clear starting point to measure progress from",
            ],
            [
                "Turning awareness into confident action",
                "Building simple routines that hold under pressure",
                "Gathering evidence of your strengths",
            ],
            [
                "Pick one pillar and commit to a single weekly habit for it",
                "Write down three recent wins and what made them work",
                "Ask a mentor which skill would unlock the most for you",
            ],
            "Every expert started exactly where you are: aware and ready to move.",
        ),
        QuadrantLevel::Q2 => (
            "You lean on systems: you follow structures and processes well, and the next step is building the personal command to lead them rather than rely on them.",
            [
                "Discipline in following proven processes",
                "Reliability others can count on",
                "Comfort working within structure",
            ],
            [
                "Trusting your own judgement when the process runs out",
                "Adapting frameworks to your own style",
                "Taking visible ownership of decisions",
            ],
            [
                "Lead one meeting or decision this month without a template",
                "Adapt one team process and document what you changed",
                "Practise explaining the why behind the systems you use",
            ],
            "You already have the structure; now make it yours.",
        ),
        QuadrantLevel::Q3 => (
            "You operate from command: you are confident and capable, but much of it lives in your head. Capturing what you do in repeatable systems is your next lever.",
            [
                "Confidence and initiative under pressure",
                "Strong instincts built from experience",
                "Ability to deliver without waiting for direction",
            ],
            [
                "Making your methods repeatable and teachable",
                "Protecting your capacity from burnout",
                "Measuring results rather than relying on feel",
            ],
            [
                "Document one thing you do well as a step-by-step playbook",
                "Set up a weekly review to track outcomes",
                "Delegate one task using your playbook",
            ],
            "Your talent is proven; systems will let it scale.",
        ),
        QuadrantLevel::Q4 => (
            "You are operating at mastery: you combine personal command with systems you have built. Your focus now is sustaining that edge and multiplying it through others.",
            [
                "Command of your craft backed by deliberate systems",
                "Consistency that holds under changing conditions",
                "Credibility to guide and develop others",
            ],
            [
                "Keeping systems fresh as your context changes",
                "Sharing your methods so others can grow",
                "Guarding against complacency",
            ],
            [
                "Mentor someone through one of your systems",
                "Schedule a quarterly review of your routines",
                "Take on a stretch goal in your weakest pillar",
            ],
            "Mastery is a practice, not a destination. Keep leading the way.",
        ),
    };

    Insight {
        summary: summary.to_string(),
        strengths: strengths.iter().map(|s| s.to_string()).collect(),
        growth_areas: growth_areas.iter().map(|s| s.to_string()).collect(),
        action_steps: action_steps.iter().map(|s| s.to_string()).collect(),
        motivational_line: motivational_line.to_string(),
    }
}
