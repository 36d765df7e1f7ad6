//! The CAD Diagnostic question bank.
//!
//! Static data, built once on first access. Every option is constructed from
//! its quadrant, so the internal/external state pair cannot drift from it.
//! `validate_bank` re-checks the shape at startup and the process refuses to
//! serve if it fails.

use std::collections::HashSet;
use std::sync::LazyLock;

use thiserror::Error;

use crate::diagnostic::models::{Pillar, QuadrantLevel, Question, QuestionOption};

use crate::diagnostic::models::QuadrantLevel::{Q1, Q2, Q3, Q4};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionBankError {
    #[error("question bank is empty")]
    Empty,

    #[error("duplicate question id '{0}'")]
    DuplicateId(String),

    #[error("question '{id}' has stage {stage}, expected 1–3")]
    InvalidStage { id: String, stage: u8 },

    #[error("question '{id}' must offer exactly one option for {quadrant}, found {found}")]
    QuadrantCoverage {
        id: String,
        quadrant: QuadrantLevel,
        found: usize,
    },

    #[error("question '{id}' option for {quadrant} carries a state pair of another quadrant")]
    InconsistentOption { id: String, quadrant: QuadrantLevel },
}

static QUESTION_BANK: LazyLock<Vec<Question>> = LazyLock::new(build_bank);

/// The full, ordered question bank.
pub fn question_bank() -> &'static [Question] {
    &QUESTION_BANK
}

pub fn find_question<'a>(bank: &'a [Question], id: &str) -> Option<&'a Question> {
    bank.iter().find(|q| q.id == id)
}

/// Checks every question offers exactly one option per quadrant, each
/// consistent with the mapping table, and that ids are unique.
pub fn validate_bank(questions: &[Question]) -> Result<(), QuestionBankError> {
    if questions.is_empty() {
        return Err(QuestionBankError::Empty);
    }

    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(question.id) {
            return Err(QuestionBankError::DuplicateId(question.id.to_string()));
        }
        if !(1..=3).contains(&question.stage) {
            return Err(QuestionBankError::InvalidStage {
                id: question.id.to_string(),
                stage: question.stage,
            });
        }
        for quadrant in QuadrantLevel::ALL {
            let found = question
                .options
                .iter()
                .filter(|o| o.quadrant == quadrant)
                .count();
            if found != 1 {
                return Err(QuestionBankError::QuadrantCoverage {
                    id: question.id.to_string(),
                    quadrant,
                    found,
                });
            }
        }
        for option in &question.options {
            if option.internal_state != option.quadrant.internal_state()
                || option.external_state != option.quadrant.external_state()
            {
                return Err(QuestionBankError::InconsistentOption {
                    id: question.id.to_string(),
                    quadrant: option.quadrant,
                });
            }
        }
    }
    Ok(())
}

fn question(
    id: &'static str,
    pillar: Pillar,
    stage: u8,
    quality: &'static str,
    statement: &'static str,
    options: [(QuadrantLevel, &'static str); 4],
) -> Question {
    Question {
        id,
        pillar,
        stage,
        quality,
        statement,
        options: options.map(|(quadrant, label)| QuestionOption::new(quadrant, label)),
    }
}

fn build_bank() -> Vec<Question> {
    vec![
        // ── Capability ──────────────────────────────────────────────────────
        question(
            "capability-1",
            Pillar::Capability,
            1,
            "Self-knowledge",
            "When you think about the strengths you bring to a role, how would you describe your grasp of them?",
            [
                (Q2, "I use a structured tool or framework to name my strengths, though I still lean on it to explain them."),
                (Q1, "I sense I have strengths, but I couldn't list them with confidence or evidence."),
                (Q4, "I can articulate my strengths precisely and keep a living record of evidence for each."),
                (Q3, "I know my strengths well and can speak to them, but I've never written them down."),
            ],
        ),
        question(
            "capability-2",
            Pillar::Capability,
            1,
            "Learning agility",
            "When a new skill becomes important in your field, how do you respond?",
            [
                (Q1, "I notice the shift but usually wait to see whether I really need it."),
                (Q3, "I pick it up quickly on my own, in bursts, whenever a project demands it."),
                (Q2, "I enrol in a course or programme and follow its plan step by step."),
                (Q4, "I run a deliberate learning routine and adapt it as the skill matures."),
            ],
        ),
        question(
            "capability-3",
            Pillar::Capability,
            2,
            "Problem framing",
            "Faced with an ambiguous problem at work, what best describes your approach?",
            [
                (Q3, "I trust my instincts and usually find a way through, though differently each time."),
                (Q4, "I apply a framing method I've refined, and I can teach it to others."),
                (Q1, "I recognise the problem is unclear but often struggle to know where to start."),
                (Q2, "I follow a checklist or template from my team to break it down."),
            ],
        ),
        question(
            "capability-4",
            Pillar::Capability,
            2,
            "Transferable skills",
            "How well can you apply your skills outside the context where you learned them?",
            [
                (Q4, "I map my skills to new contexts systematically and can show how they transfer."),
                (Q2, "I use career resources that translate my skills, and I follow their guidance."),
                (Q3, "I adapt easily in new settings, but I improvise the translation each time."),
                (Q1, "I suspect my skills transfer, but I'm unsure how to show it."),
            ],
        ),
        question(
            "capability-5",
            Pillar::Capability,
            3,
            "Innovation",
            "When you see a better way of doing something, what usually happens next?",
            [
                (Q1, "I notice it, but the idea rarely goes anywhere."),
                (Q2, "I submit it through the formal improvement process and let that process carry it."),
                (Q4, "I prototype it, measure it, and fold it into how the team works."),
                (Q3, "I act on it myself and make it work, though it stays my personal workaround."),
            ],
        ),
        // ── Competence ──────────────────────────────────────────────────────
        question(
            "competence-1",
            Pillar::Competence,
            1,
            "Core expertise",
            "How would you rate your command of the core technical skills your role requires?",
            [
                (Q2, "I meet the standard by following documented procedures closely."),
                (Q4, "I have deep command and maintain the standards others follow."),
                (Q1, "I understand what is expected but still have noticeable gaps."),
                (Q3, "I perform at a high level, relying on experience rather than a defined practice."),
            ],
        ),
        question(
            "competence-2",
            Pillar::Competence,
            1,
            "Quality of work",
            "How do you make sure the quality of your work is consistently high?",
            [
                (Q3, "I hold myself to a high bar, checking by feel rather than by a set process."),
                (Q1, "I try to do good work but don't have a way of checking it consistently."),
                (Q4, "I use my own quality routine and review it regularly against outcomes."),
                (Q2, "I rely on the reviews and checklists my organisation provides."),
            ],
        ),
        question(
            "competence-3",
            Pillar::Competence,
            2,
            "Planning",
            "How do you plan and prioritise your work week?",
            [
                (Q1, "I know I should plan, but most weeks just happen to me."),
                (Q2, "I use the planning tool my team uses and follow its prompts."),
                (Q3, "I keep my priorities in my head and adjust them as things come up."),
                (Q4, "I run a weekly planning ritual I designed and refine it over time."),
            ],
        ),
        question(
            "competence-4",
            Pillar::Competence,
            2,
            "Communication",
            "When you present your work to stakeholders, what describes you best?",
            [
                (Q4, "I communicate with confidence using a structure I've honed for different audiences."),
                (Q3, "I'm a confident speaker, but my preparation varies a lot."),
                (Q2, "I use templates and rehearsal guides, and I depend on them to stay on track."),
                (Q1, "I know communication matters, but presenting still feels uncertain."),
            ],
        ),
        question(
            "competence-5",
            Pillar::Competence,
            2,
            "Decision making",
            "When you make a significant decision at work, how do you reach it?",
            [
                (Q2, "I follow an approval or decision framework set by others."),
                (Q1, "I'm aware of the stakes but often defer or hesitate."),
                (Q3, "I decide confidently on judgement, without a consistent method."),
                (Q4, "I decide confidently using criteria I've defined and review the results afterwards."),
            ],
        ),
        question(
            "competence-6",
            Pillar::Competence,
            3,
            "Results orientation",
            "How do you track whether your work delivers the results it should?",
            [
                (Q3, "I have a strong sense of my impact, but I don't track it formally."),
                (Q4, "I set my own measures, track them, and use them to steer my work."),
                (Q1, "I hope my work has impact, but I rarely check."),
                (Q2, "I rely on the performance metrics my manager sets."),
            ],
        ),
        question(
            "competence-7",
            Pillar::Competence,
            3,
            "Professional development",
            "How do you manage your own professional development?",
            [
                (Q1, "I know I should invest in it, but nothing is in place yet."),
                (Q4, "I own a development plan, measure progress, and adjust it each quarter."),
                (Q2, "I follow the development plan my employer gives me."),
                (Q3, "I grow steadily through my own initiative, but without a plan."),
            ],
        ),
        // ── Character ───────────────────────────────────────────────────────
        question(
            "character-1",
            Pillar::Character,
            1,
            "Integrity",
            "When no one is checking, how consistently do your actions match your stated values?",
            [
                (Q4, "Consistently, and I have commitments and check-ins that keep me accountable."),
                (Q1, "I know what I value, but my follow-through is uneven."),
                (Q3, "Consistently, through personal conviction rather than any structure."),
                (Q2, "I rely on codes of conduct and external accountability to stay consistent."),
            ],
        ),
        question(
            "character-2",
            Pillar::Character,
            2,
            "Resilience",
            "After a significant setback, how do you recover?",
            [
                (Q3, "I bounce back through sheer determination, though it takes a toll."),
                (Q2, "I lean on support programmes or a mentor's process to get through it."),
                (Q4, "I use a recovery routine I've built and come back with lessons captured."),
                (Q1, "I know I need to recover, but setbacks tend to linger."),
            ],
        ),
        question(
            "character-3",
            Pillar::Character,
            2,
            "Accountability",
            "When something you own goes wrong, what do you typically do?",
            [
                (Q2, "I follow the incident or escalation process and let it guide the response."),
                (Q4, "I own it openly, fix it, and change the system so it doesn't repeat."),
                (Q1, "I feel responsible, but I'm not always sure how to make it right."),
                (Q3, "I own it and fix it myself, case by case."),
            ],
        ),
        question(
            "character-4",
            Pillar::Character,
            3,
            "Leadership presence",
            "How do others experience your influence when you're in the room?",
            [
                (Q1, "I'm aware I could have more influence, but I don't often step forward."),
                (Q3, "People follow my lead naturally, though I haven't shaped it deliberately."),
                (Q4, "I lead with intent and have practices that develop influence in others too."),
                (Q2, "I lead when a formal role or structure gives me the mandate."),
            ],
        ),
        // ── Capacity ────────────────────────────────────────────────────────
        question(
            "capacity-1",
            Pillar::Capacity,
            1,
            "Energy management",
            "How do you manage your energy across a demanding week?",
            [
                (Q4, "I manage it deliberately with routines I've tuned to my own patterns."),
                (Q2, "I follow wellbeing guidance or an app, and I depend on it to stay on track."),
                (Q1, "I know my energy matters, but I usually run until I'm depleted."),
                (Q3, "I push through well by instinct, with no particular routine."),
            ],
        ),
        question(
            "capacity-2",
            Pillar::Capacity,
            2,
            "Workload",
            "When your workload increases sharply, what happens?",
            [
                (Q3, "I absorb it through effort and long hours, handling it as it comes."),
                (Q1, "I notice the overload but struggle to do anything about it."),
                (Q2, "I use my team's intake and prioritisation process to manage it."),
                (Q4, "I rebalance it using a capacity model I keep and renegotiate commitments early."),
            ],
        ),
        question(
            "capacity-3",
            Pillar::Capacity,
            2,
            "Network",
            "How do you build and use your professional network?",
            [
                (Q2, "I attend organised networking events and programmes when they're offered."),
                (Q4, "I maintain my network deliberately, with regular touchpoints and clear goals."),
                (Q3, "I connect easily with people, but I don't keep in touch systematically."),
                (Q1, "I know networking matters, but I rarely do it."),
            ],
        ),
        question(
            "capacity-4",
            Pillar::Capacity,
            3,
            "Sustainability",
            "How sustainable is your current pace over the next two years?",
            [
                (Q1, "I'm aware it probably isn't sustainable, but I have no plan to change it."),
                (Q4, "It's sustainable by design. I review my commitments and recovery regularly."),
                (Q3, "I can keep it up through personal drive, though nothing protects it."),
                (Q2, "It's sustainable as long as my organisation's policies and support hold."),
            ],
        ),
    ]
}
