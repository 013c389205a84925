use std::fmt;

use crate::session::Session;

pub const UNANSWERED: &str = "Not answered";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// 1-based position in the working set.
    pub position: usize,
    pub assignment: usize,
    pub question: String,
    /// `None` when the question was never answered.
    pub answer: Option<String>,
    pub correct: bool,
    /// Only present for incorrect or unanswered questions.
    pub correct_answer: Option<String>,
}

impl ResultEntry {
    pub fn heading(&self) -> String {
        format!(
            "Assignment {}, Question {}: {}",
            self.assignment, self.position, self.question
        )
    }

    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().unwrap_or(UNANSWERED)
    }
}

/// Final score and per-question breakdown of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    pub entries: Vec<ResultEntry>,
}

impl QuizResults {
    pub fn from_session(session: &Session, score: usize) -> Self {
        let entries = session
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let answer = session.answer(i).map(str::to_string);
                let correct = answer.as_deref().is_some_and(|a| q.is_correct(a));
                ResultEntry {
                    position: i + 1,
                    assignment: q.assignment,
                    question: q.text().to_string(),
                    answer,
                    correct,
                    correct_answer: (!correct).then(|| q.correct_answer().to_string()),
                }
            })
            .collect();

        Self {
            score,
            total: session.len(),
            entries,
        }
    }

    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f32 / self.total as f32 * 100.0
        }
    }

    pub fn incorrect(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter().filter(|e| !e.correct)
    }
}

impl fmt::Display for QuizResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Your Score: {} out of {}", self.score, self.total)
    }
}
