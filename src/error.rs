//! Error types for the quiz core and the question bank loader.

use thiserror::Error;

/// Errors raised by quiz transitions. None of them leave partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("No questions found for Assignment {0}")]
    Selection(usize),
    #[error("No questions available for this selection")]
    EmptySelection,
    #[error("No options available for question {0}")]
    MissingOptions(usize),
    #[error("\"{option}\" is not an option of question {index}")]
    InvalidOption { index: usize, option: String },
    #[error("cannot {event} from the {screen} screen")]
    InvalidTransition {
        event: &'static str,
        screen: &'static str,
    },
}

/// Errors raised while reading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON question bank: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV question bank: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    Row { row: usize, reason: String },
    #[error("Assignment {assignment}: answer \"{answer}\" is not among the options of \"{question}\"")]
    AnswerNotInOptions {
        assignment: usize,
        question: String,
        answer: String,
    },
    #[error("unsupported question bank format: {0}")]
    UnsupportedFormat(String),
}
