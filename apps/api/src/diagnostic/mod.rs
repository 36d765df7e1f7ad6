// CAD Diagnostic: question bank, scoring engine, submission handling, persistence.
// `models`, `question_bank` and `scoring` are pure; everything with I/O lives in
// `store` and `handlers`.

pub mod handlers;
pub mod models;
pub mod question_bank;
pub mod scoring;
pub mod store;
pub mod submission;
