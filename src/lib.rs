//! Multiple-choice quiz over a bank of assignments.
//!
//! The session core (`quiz`, `session`, `results`, `controller`) is free of any UI
//! types; `app` and `ui` adapt it to an `eframe` window.

pub mod app;
pub mod bank;
pub mod config;
pub mod controller;
pub mod error;
pub mod quiz;
pub mod results;
pub mod session;
pub mod ui;

pub use bank::{Question, QuestionBank};
pub use controller::{QuizController, Screen};
pub use error::{BankError, QuizError};
pub use quiz::{QuizSettings, Selection, WorkingQuestion};
pub use results::QuizResults;
pub use session::{Feedback, QuestionView, Session};
