//! CAD Diagnostic scoring engine.
//!
//! Pure, synchronous, single pass over the responses. No I/O and no shared
//! state, so concurrent callers need no coordination.
//!
//! Algorithm:
//! 1. Reject empty input and any response whose state pair disagrees with its quadrant.
//! 2. Count responses per quadrant; add the quadrant value (1–4) to its pillar.
//! 3. Count `command` and `system` states.
//! 4. Dominant quadrant = highest count, ties go to the lowest quadrant.
//! 5. Pathway: Q4 dominant → Direct Path, else Q2 vs Q3 counts decide.
//! 6. Readiness = Σ(level × count) / (n × 4) × 100.

use thiserror::Error;

use crate::diagnostic::models::{
    CadAssessmentResult, ExternalState, InternalState, PillarScores, QuadrantCounts,
    QuadrantLevel, Response, StrategicPathway,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("cannot score an empty set of responses")]
    EmptyInput,

    #[error(
        "response {index} declares {quadrant} but carries ({internal_state}, {external_state})"
    )]
    MalformedResponse {
        index: usize,
        quadrant: QuadrantLevel,
        internal_state: InternalState,
        external_state: ExternalState,
    },
}

/// Scores a batch of responses.
///
/// The engine does not check that every question was answered exactly once;
/// partial or duplicate submissions are aggregated as given.
pub fn score(responses: &[Response]) -> Result<CadAssessmentResult, ScoringError> {
    if responses.is_empty() {
        return Err(ScoringError::EmptyInput);
    }
    if let Some((index, bad)) = responses
        .iter()
        .enumerate()
        .find(|(_, r)| !r.is_consistent())
    {
        return Err(ScoringError::MalformedResponse {
            index,
            quadrant: bad.quadrant,
            internal_state: bad.internal_state,
            external_state: bad.external_state,
        });
    }

    let mut quadrant_counts = QuadrantCounts::default();
    let mut pillar_scores = PillarScores::default();
    let mut command_count = 0_u32;
    let mut system_count = 0_u32;

    for response in responses {
        quadrant_counts.increment(response.quadrant);
        pillar_scores.add(response.pillar, u32::from(response.quadrant.value()));
        if response.internal_state == InternalState::Command {
            command_count += 1;
        }
        if response.external_state == ExternalState::System {
            system_count += 1;
        }
    }

    let total_responses = responses.len() as u32;
    let total = f64::from(total_responses);

    let dominant_quadrant = dominant_quadrant(&quadrant_counts);
    let strategic_pathway = strategic_pathway(dominant_quadrant, &quadrant_counts);

    let total_points: u32 = QuadrantLevel::ALL
        .iter()
        .map(|&level| u32::from(level.value()) * quadrant_counts.get(level))
        .sum();
    let max_points = total * 4.0;

    Ok(CadAssessmentResult {
        dominant_quadrant,
        quadrant_counts,
        pillar_scores,
        strategic_pathway,
        internal_leverage: f64::from(command_count) / total * 100.0,
        external_system: f64::from(system_count) / total * 100.0,
        total_responses,
        readiness_for_q4: f64::from(total_points) / max_points * 100.0,
    })
}

/// Highest count wins; among tied quadrants the lowest-numbered one is chosen.
pub fn dominant_quadrant(counts: &QuadrantCounts) -> QuadrantLevel {
    let mut dominant = QuadrantLevel::Q1;
    for level in QuadrantLevel::ALL {
        if counts.get(level) > counts.get(dominant) {
            dominant = level;
        }
    }
    dominant
}

/// Compares the Q2 and Q3 counts directly, independent of how the dominant
/// quadrant tie was broken.
pub fn strategic_pathway(dominant: QuadrantLevel, counts: &QuadrantCounts) -> StrategicPathway {
    if dominant == QuadrantLevel::Q4 {
        return StrategicPathway::DirectPath;
    }
    let (q2, q3) = (counts.get(QuadrantLevel::Q2), counts.get(QuadrantLevel::Q3));
    if q2 > q3 {
        StrategicPathway::SystemFirst
    } else if q3 > q2 {
        StrategicPathway::CommandFirst
    } else {
        StrategicPathway::Undefined
    }
}
