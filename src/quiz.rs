use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::{Question, QuestionBank};
use crate::error::QuizError;

/// Which part of the bank a session draws from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    All,
    /// 1-based assignment number.
    Assignment(usize),
}

impl Selection {
    pub fn title(&self) -> String {
        match self {
            Selection::All => "All Assignments".to_string(),
            Selection::Assignment(n) => format!("Assignment {}", n),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Assignment(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for Selection {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Selection::Assignment(n)),
            _ => Err(QuizError::Selection(0)),
        }
    }
}

/// A bank question tagged with the assignment it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingQuestion {
    pub assignment: usize,
    pub question: Question,
}

impl WorkingQuestion {
    pub fn text(&self) -> &str {
        &self.question.text
    }

    pub fn options(&self) -> &[String] {
        &self.question.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.question.correct_answer
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.question.correct_answer
    }
}

/// Session options taken from the user configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    /// Drop repeated question texts when every assignment is selected.
    pub deduplicate_all: bool,
    /// Move on automatically this long after an answer. `None` disables it.
    pub auto_advance: Option<Duration>,
    pub shuffle_options: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            deduplicate_all: true,
            auto_advance: None,
            shuffle_options: false,
        }
    }
}

/// Uniform in-place permutation: for `i` from the last index down to 1, swap `i` with a
/// uniformly drawn `j` in `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Assembles the shuffled working set for a session.
pub fn build_working_set<R: Rng + ?Sized>(
    bank: &QuestionBank,
    selection: Selection,
    settings: &QuizSettings,
    rng: &mut R,
) -> Result<Vec<WorkingQuestion>, QuizError> {
    let mut questions = match selection {
        Selection::Assignment(number) => {
            let assignment = bank
                .assignment(number)
                .filter(|a| !a.is_empty())
                .ok_or(QuizError::Selection(number))?;
            assignment
                .iter()
                .map(|q| WorkingQuestion {
                    assignment: number,
                    question: q.clone(),
                })
                .collect::<Vec<_>>()
        }
        Selection::All => {
            let mut seen = HashSet::new();
            let mut all = Vec::new();
            for (number, assignment) in bank.assignments() {
                for q in assignment {
                    if settings.deduplicate_all && !seen.insert(q.text.as_str()) {
                        debug!("Skipping duplicate question: {}", q.text);
                        continue;
                    }
                    all.push(WorkingQuestion {
                        assignment: number,
                        question: q.clone(),
                    });
                }
            }
            all
        }
    };

    if questions.is_empty() {
        return Err(QuizError::EmptySelection);
    }

    shuffle(&mut questions, rng);
    if settings.shuffle_options {
        for q in &mut questions {
            shuffle(&mut q.question.options, rng);
        }
    }

    info!("{} loaded: {} questions", selection.title(), questions.len());
    Ok(questions)
}
