use std::collections::BTreeMap;

use log::debug;

use crate::error::QuizError;
use crate::quiz::{Selection, WorkingQuestion};

/// Outcome of an advance on the quiz cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// The cursor was on the last question; the session is ready to be scored.
    Finished,
}

/// Correctness signal for a recorded answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    /// Only set when the answer was wrong.
    pub correct_answer: Option<String>,
}

impl Feedback {
    fn for_answer(question: &WorkingQuestion, answer: &str) -> Self {
        let correct = question.is_correct(answer);
        Self {
            correct,
            correct_answer: (!correct).then(|| question.correct_answer().to_string()),
        }
    }

    pub fn message(&self) -> String {
        match &self.correct_answer {
            None => "Correct!".to_string(),
            Some(answer) => format!("Wrong! Correct answer: {}", answer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    /// `(a)`, `(b)`, ...
    pub label: String,
    pub text: String,
    pub selected: bool,
    pub correct: bool,
    pub wrong: bool,
}

/// Everything the presentation layer needs to draw the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub title: String,
    pub counter: String,
    pub text: String,
    pub options: Vec<OptionView>,
    /// Set when the question cannot be answered because it has no options.
    pub notice: Option<String>,
    pub feedback: Option<Feedback>,
    pub retreat_enabled: bool,
    pub advance_label: &'static str,
}

/// One quiz run over a fixed working set.
#[derive(Debug, Clone)]
pub struct Session {
    id: u64,
    selection: Selection,
    questions: Vec<WorkingQuestion>,
    current: usize,
    answers: BTreeMap<usize, String>,
}

impl Session {
    pub fn new(
        id: u64,
        selection: Selection,
        questions: Vec<WorkingQuestion>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptySelection);
        }
        Ok(Self {
            id,
            selection,
            questions,
            current: 0,
            answers: BTreeMap::new(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn questions(&self) -> &[WorkingQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &WorkingQuestion {
        &self.questions[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current == self.questions.len() - 1
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn advance(&mut self) -> Advance {
        if self.is_last() {
            Advance::Finished
        } else {
            self.current += 1;
            Advance::Moved(self.current)
        }
    }

    /// Returns `false` at the first question, where retreat is a no-op.
    pub fn retreat(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Records `option` for the current question, replacing any earlier choice.
    pub fn record_answer(&mut self, option: &str) -> Result<Feedback, QuizError> {
        let index = self.current;
        let question = &self.questions[index];
        if question.options().is_empty() {
            return Err(QuizError::MissingOptions(index + 1));
        }
        if !question.question.has_option(option) {
            return Err(QuizError::InvalidOption {
                index: index + 1,
                option: option.to_string(),
            });
        }

        let feedback = Feedback::for_answer(question, option);
        debug!(
            "Session {}: question {} answered \"{}\" ({})",
            self.id,
            index + 1,
            option,
            if feedback.correct { "correct" } else { "wrong" }
        );
        self.answers.insert(index, option.to_string());
        Ok(feedback)
    }

    pub fn score(&self) -> usize {
        score(&self.answers, &self.questions)
    }

    /// Rebuilds the view of the current question, restoring any recorded answer.
    pub fn view(&self) -> QuestionView {
        let question = self.current_question();
        let recorded = self.answer(self.current);

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let selected = recorded == Some(text.as_str());
                let correct = selected && question.is_correct(text);
                OptionView {
                    label: format!("({})", option_letter(i)),
                    text: text.clone(),
                    selected,
                    correct,
                    wrong: selected && !correct,
                }
            })
            .collect::<Vec<_>>();

        QuestionView {
            title: self.selection.title(),
            counter: format!("Question {} of {}", self.current + 1, self.len()),
            text: if question.text().is_empty() {
                "Question text missing".to_string()
            } else {
                question.text().to_string()
            },
            notice: options
                .is_empty()
                .then(|| "Error: No options available for this question.".to_string()),
            options,
            feedback: recorded.map(|answer| Feedback::for_answer(question, answer)),
            retreat_enabled: self.current > 0,
            advance_label: if self.is_last() { "Submit" } else { "Next" },
        }
    }
}

fn option_letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

/// Number of recorded answers that match their question's correct answer.
pub fn score(answers: &BTreeMap<usize, String>, questions: &[WorkingQuestion]) -> usize {
    answers
        .iter()
        .filter(|(i, answer)| questions.get(**i).is_some_and(|q| q.is_correct(answer)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Question;

    fn working(text: &str, answer: &str) -> WorkingQuestion {
        WorkingQuestion {
            assignment: 1,
            question: Question::new(text, &["a", "b", "c"], answer),
        }
    }

    fn session() -> Session {
        Session::new(
            1,
            Selection::Assignment(1),
            vec![working("Q1", "a"), working("Q2", "b"), working("Q3", "c")],
        )
        .unwrap()
    }

    #[test]
    fn empty_working_set_is_rejected() {
        assert_eq!(
            Session::new(1, Selection::All, Vec::new()).unwrap_err(),
            QuizError::EmptySelection
        );
    }

    #[test]
    fn retreat_at_first_question_is_a_no_op() {
        let mut s = session();
        assert!(!s.retreat());
        assert_eq!(s.current_index(), 0);
        assert!(!s.view().retreat_enabled);
    }

    #[test]
    fn advance_reports_finish_on_last_question() {
        let mut s = session();
        assert_eq!(s.advance(), Advance::Moved(1));
        assert_eq!(s.advance(), Advance::Moved(2));
        assert_eq!(s.view().advance_label, "Submit");
        assert_eq!(s.advance(), Advance::Finished);
        assert_eq!(s.current_index(), 2);
    }

    #[test]
    fn retreat_then_advance_keeps_answers() {
        let mut s = session();
        s.record_answer("a").unwrap();
        s.advance();
        s.record_answer("c").unwrap();
        let before = s.answers().clone();

        s.retreat();
        s.advance();

        assert_eq!(s.current_index(), 1);
        assert_eq!(s.answers(), &before);
        let view = s.view();
        assert!(view.options[2].selected && view.options[2].wrong);
        assert_eq!(view.feedback.unwrap().correct_answer.as_deref(), Some("b"));
    }

    #[test]
    fn re_answering_replaces_previous_choice() {
        let mut s = session();
        let wrong = s.record_answer("b").unwrap();
        assert!(!wrong.correct);
        assert_eq!(wrong.message(), "Wrong! Correct answer: a");

        let right = s.record_answer("a").unwrap();
        assert!(right.correct);
        assert_eq!(right.message(), "Correct!");
        assert_eq!(s.answer(0), Some("a"));
        assert_eq!(s.answers().len(), 1);
    }

    #[test]
    fn option_outside_question_is_rejected() {
        let mut s = session();
        let err = s.record_answer("z").unwrap_err();
        assert_eq!(
            err,
            QuizError::InvalidOption {
                index: 1,
                option: "z".to_string()
            }
        );
        assert!(s.answers().is_empty());
    }

    #[test]
    fn question_without_options_renders_degraded() {
        let mut s = Session::new(
            1,
            Selection::All,
            vec![WorkingQuestion {
                assignment: 2,
                question: Question::new("", &[], "a"),
            }],
        )
        .unwrap();

        let view = s.view();
        assert!(view.options.is_empty());
        assert!(view.notice.is_some());
        assert_eq!(view.text, "Question text missing");
        assert_eq!(s.record_answer("a"), Err(QuizError::MissingOptions(1)));
    }

    #[test]
    fn view_labels_options_and_counts() {
        let view = session().view();
        assert_eq!(view.title, "Assignment 1");
        assert_eq!(view.counter, "Question 1 of 3");
        assert_eq!(view.advance_label, "Next");
        let labels: Vec<_> = view.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["(a)", "(b)", "(c)"]);
        assert!(view.feedback.is_none());
    }

    #[test]
    fn score_counts_only_correct_answers() {
        let s = session();
        let questions = s.questions();

        let none = BTreeMap::new();
        assert_eq!(score(&none, questions), 0);

        let all_correct: BTreeMap<_, _> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| (i, q.correct_answer().to_string()))
            .collect();
        assert_eq!(score(&all_correct, questions), questions.len());

        let mixed: BTreeMap<_, _> = [(0, "a".to_string()), (1, "a".to_string())].into();
        assert_eq!(score(&mixed, questions), 1);
    }
}
