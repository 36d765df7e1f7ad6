//! Converts client answers (question id + chosen quadrant) into scoring
//! `Response`s. The pillar and state pair always come from the bank, never
//! from the client. A submission must answer every question exactly once.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::diagnostic::models::{QuadrantLevel, Question, Response};
use crate::diagnostic::question_bank::find_question;

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_id: String,
    pub quadrant: QuadrantLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),

    #[error("question '{0}' was answered more than once")]
    DuplicateAnswer(String),

    #[error("question '{question_id}' has no option for {quadrant}")]
    UnknownOption {
        question_id: String,
        quadrant: QuadrantLevel,
    },

    #[error("{} question(s) unanswered: {}", .0.len(), .0.join(", "))]
    Incomplete(Vec<String>),
}

/// Builds one `Response` per answer, in question-bank order.
pub fn build_responses(
    bank: &[Question],
    answers: &[AnswerInput],
) -> Result<Vec<Response>, SubmissionError> {
    let mut answered = HashSet::new();
    for answer in answers {
        if find_question(bank, &answer.question_id).is_none() {
            return Err(SubmissionError::UnknownQuestion(answer.question_id.clone()));
        }
        if !answered.insert(answer.question_id.as_str()) {
            return Err(SubmissionError::DuplicateAnswer(answer.question_id.clone()));
        }
    }

    let missing: Vec<String> = bank
        .iter()
        .filter(|q| !answered.contains(q.id))
        .map(|q| q.id.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SubmissionError::Incomplete(missing));
    }

    bank.iter()
        .map(|question| {
            let answer = answers
                .iter()
                .find(|a| a.question_id == question.id)
                .ok_or_else(|| SubmissionError::Incomplete(vec![question.id.to_string()]))?;
            let option = question.option(answer.quadrant).ok_or_else(|| {
                SubmissionError::UnknownOption {
                    question_id: question.id.to_string(),
                    quadrant: answer.quadrant,
                }
            })?;
            Ok(Response::new(question.pillar, option.quadrant))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::models::{Pillar, QuestionOption};
    use crate::diagnostic::question_bank::question_bank;

    fn answer(id: &str, quadrant: QuadrantLevel) -> AnswerInput {
        AnswerInput {
            question_id: id.to_string(),
            quadrant,
        }
    }

    fn full_answers(quadrant: QuadrantLevel) -> Vec<AnswerInput> {
        question_bank().iter().map(|q| answer(q.id, quadrant)).collect()
    }

    #[test]
    fn test_complete_submission_builds_bank_ordered_responses() {
        let mut answers = full_answers(QuadrantLevel::Q3);
        answers.reverse();

        let responses = build_responses(question_bank(), &answers).unwrap();
        assert_eq!(responses.len(), question_bank().len());
        for (response, question) in responses.iter().zip(question_bank()) {
            assert_eq!(response.pillar, question.pillar);
            assert_eq!(response.quadrant, QuadrantLevel::Q3);
            assert!(response.is_consistent());
        }
    }

    #[test]
    fn test_unknown_question_is_rejected() {
        let mut answers = full_answers(QuadrantLevel::Q1);
        answers.push(answer("made-up", QuadrantLevel::Q1));
        assert_eq!(
            build_responses(question_bank(), &answers),
            Err(SubmissionError::UnknownQuestion("made-up".to_string()))
        );
    }

    #[test]
    fn test_duplicate_answer_is_rejected() {
        let mut answers = full_answers(QuadrantLevel::Q1);
        answers.push(answer("capacity-2", QuadrantLevel::Q4));
        assert_eq!(
            build_responses(question_bank(), &answers),
            Err(SubmissionError::DuplicateAnswer("capacity-2".to_string()))
        );
    }

    #[test]
    fn test_missing_answers_are_listed() {
        let answers: Vec<_> = full_answers(QuadrantLevel::Q2)
            .into_iter()
            .filter(|a| a.question_id != "character-1" && a.question_id != "capacity-4")
            .collect();

        let err = build_responses(question_bank(), &answers).unwrap_err();
        assert_eq!(
            err,
            SubmissionError::Incomplete(vec![
                "character-1".to_string(),
                "capacity-4".to_string()
            ])
        );
        assert_eq!(
            err.to_string(),
            "2 question(s) unanswered: character-1, capacity-4"
        );
    }

    #[test]
    fn test_option_missing_from_question_is_rejected() {
        let lopsided = Question {
            id: "lopsided",
            pillar: Pillar::Capacity,
            stage: 1,
            quality: "Quality",
            statement: "Statement",
            options: [
                QuestionOption::new(QuadrantLevel::Q1, "a"),
                QuestionOption::new(QuadrantLevel::Q1, "b"),
                QuestionOption::new(QuadrantLevel::Q2, "c"),
                QuestionOption::new(QuadrantLevel::Q3, "d"),
            ],
        };
        let err = build_responses(&[lopsided], &[answer("lopsided", QuadrantLevel::Q4)])
            .unwrap_err();
        assert!(matches!(err, SubmissionError::UnknownOption { .. }));
    }
}
