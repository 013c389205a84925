use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::quiz::{build_working_set, QuizSettings, Selection};
use crate::results::QuizResults;
use crate::session::{Advance, Feedback, QuestionView, Session};

#[derive(Debug)]
pub enum Screen {
    Start,
    Quiz(Session),
    Results {
        session: Session,
        results: QuizResults,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Start => "start",
            Screen::Quiz(_) => "quiz",
            Screen::Results { .. } => "results",
        }
    }
}

/// A deferred advance, valid only for the session and question it was scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    pub session_id: u64,
    pub index: usize,
    pub due: Instant,
}

/// Owns the bank and the active session, and routes input events into transitions.
pub struct QuizController<R = StdRng> {
    bank: QuestionBank,
    settings: QuizSettings,
    rng: R,
    screen: Screen,
    selection: Selection,
    next_session_id: u64,
    pending: Option<PendingAdvance>,
}

impl QuizController<StdRng> {
    pub fn new(bank: QuestionBank, settings: QuizSettings) -> Self {
        Self::with_rng(bank, settings, StdRng::from_entropy())
    }
}

impl<R: Rng> QuizController<R> {
    pub fn with_rng(bank: QuestionBank, settings: QuizSettings, rng: R) -> Self {
        Self {
            bank,
            settings,
            rng,
            screen: Screen::Start,
            selection: Selection::default(),
            next_session_id: 1,
            pending: None,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Replaces the bank. Any running session is discarded.
    pub fn set_bank(&mut self, bank: QuestionBank) {
        self.bank = bank;
        self.restart();
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: QuizSettings) {
        if settings.auto_advance.is_none() {
            self.pending = None;
        }
        self.settings = settings;
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Current value of the selection control on the start screen.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Quiz(session) | Screen::Results { session, .. } => Some(session),
            Screen::Start => None,
        }
    }

    pub fn view(&self) -> Option<QuestionView> {
        match &self.screen {
            Screen::Quiz(session) => Some(session.view()),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&QuizResults> {
        match &self.screen {
            Screen::Results { results, .. } => Some(results),
            _ => None,
        }
    }

    pub fn pending_advance(&self) -> Option<&PendingAdvance> {
        self.pending.as_ref()
    }

    /// Builds a fresh session and enters the quiz at its first question.
    /// On failure the current screen is left untouched.
    pub fn start(&mut self, selection: Selection) -> Result<(), QuizError> {
        let questions = build_working_set(&self.bank, selection, &self.settings, &mut self.rng)
            .map_err(|e| {
                debug!("Cannot start {}: {}", selection.title(), e);
                e
            })?;
        let session = Session::new(self.next_session_id, selection, questions)?;
        self.next_session_id += 1;

        info!(
            "Session {} started: {} ({} questions)",
            session.id(),
            selection.title(),
            session.len()
        );
        self.selection = selection;
        self.pending = None;
        self.screen = Screen::Quiz(session);
        Ok(())
    }

    pub fn select_option(&mut self, option: &str, now: Instant) -> Result<Feedback, QuizError> {
        let Screen::Quiz(session) = &mut self.screen else {
            return Err(self.invalid("select an option"));
        };
        let feedback = session.record_answer(option)?;

        self.pending = self.settings.auto_advance.map(|delay| PendingAdvance {
            session_id: session.id(),
            index: session.current_index(),
            due: now + delay,
        });
        Ok(feedback)
    }

    /// Moves to the next question, or scores the session and shows the results
    /// when called on the last one.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        let Screen::Quiz(session) = &mut self.screen else {
            return Err(self.invalid("advance"));
        };
        self.pending = None;

        if let Advance::Moved(index) = session.advance() {
            debug!("Session {}: moved to question {}", session.id(), index + 1);
            return Ok(());
        }

        if let Screen::Quiz(session) = std::mem::replace(&mut self.screen, Screen::Start) {
            let score = session.score();
            let results = QuizResults::from_session(&session, score);
            info!("Session {} finished: {}", session.id(), results);
            self.screen = Screen::Results { session, results };
        }
        Ok(())
    }

    /// Returns `Ok(false)` when already on the first question.
    pub fn retreat(&mut self) -> Result<bool, QuizError> {
        let Screen::Quiz(session) = &mut self.screen else {
            return Err(self.invalid("go back"));
        };
        self.pending = None;
        Ok(session.retreat())
    }

    /// Discards the session and returns to the start screen with the default selection.
    pub fn restart(&mut self) {
        if let Some(session) = self.session() {
            info!("Session {} discarded", session.id());
        }
        self.pending = None;
        self.selection = Selection::default();
        self.screen = Screen::Start;
    }

    /// Fires a due auto-advance. Returns `true` if it moved the quiz.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if now < pending.due {
            return false;
        }
        self.pending = None;

        let current = match &self.screen {
            Screen::Quiz(session) => Some((session.id(), session.current_index())),
            _ => None,
        };
        if current != Some((pending.session_id, pending.index)) {
            debug!("Dropping stale auto-advance for session {}", pending.session_id);
            return false;
        }
        self.advance().is_ok()
    }

    fn invalid(&self, event: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            event,
            screen: self.screen.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Question;
    use std::time::Duration;

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            vec![
                Question::new("A1", &["x", "y"], "x"),
                Question::new("A2", &["x", "y"], "y"),
            ],
            vec![],
        ])
        .unwrap()
    }

    fn controller(settings: QuizSettings) -> QuizController {
        QuizController::with_rng(bank(), settings, StdRng::seed_from_u64(5))
    }

    fn auto(ms: u64) -> QuizSettings {
        QuizSettings {
            auto_advance: Some(Duration::from_millis(ms)),
            ..QuizSettings::default()
        }
    }

    fn first_option(c: &QuizController) -> String {
        c.view().unwrap().options[0].text.clone()
    }

    #[test]
    fn failed_start_keeps_start_screen() {
        let mut c = controller(QuizSettings::default());
        assert_eq!(c.start(Selection::Assignment(2)), Err(QuizError::Selection(2)));
        assert!(matches!(c.screen(), Screen::Start));
    }

    #[test]
    fn failed_start_keeps_running_session() {
        let mut c = controller(QuizSettings::default());
        c.start(Selection::Assignment(1)).unwrap();
        let id = c.session().unwrap().id();
        assert!(c.start(Selection::Assignment(2)).is_err());
        assert_eq!(c.session().unwrap().id(), id);
    }

    #[test]
    fn events_outside_the_quiz_are_rejected() {
        let mut c = controller(QuizSettings::default());
        assert!(matches!(
            c.advance(),
            Err(QuizError::InvalidTransition { screen: "start", .. })
        ));
        assert!(c.retreat().is_err());
        assert!(c.select_option("x", Instant::now()).is_err());
    }

    #[test]
    fn restart_resets_selection_and_screen() {
        let mut c = controller(QuizSettings::default());
        c.set_selection(Selection::Assignment(1));
        c.start(Selection::Assignment(1)).unwrap();
        c.restart();
        assert!(matches!(c.screen(), Screen::Start));
        assert_eq!(c.selection(), Selection::All);
        assert!(c.session().is_none());
    }

    #[test]
    fn each_start_gets_a_new_session_id() {
        let mut c = controller(QuizSettings::default());
        c.start(Selection::All).unwrap();
        let first = c.session().unwrap().id();
        c.start(Selection::All).unwrap();
        assert!(c.session().unwrap().id() > first);
        assert_eq!(c.session().unwrap().current_index(), 0);
    }

    #[test]
    fn auto_advance_fires_after_delay() {
        let mut c = controller(auto(2000));
        c.start(Selection::Assignment(1)).unwrap();
        let t0 = Instant::now();
        let option = first_option(&c);
        c.select_option(&option, t0).unwrap();

        assert!(!c.tick(t0 + Duration::from_millis(1999)));
        assert_eq!(c.session().unwrap().current_index(), 0);
        assert!(c.tick(t0 + Duration::from_millis(2000)));
        assert_eq!(c.session().unwrap().current_index(), 1);
        assert!(c.pending_advance().is_none());
    }

    #[test]
    fn auto_advance_on_last_question_shows_results() {
        let mut c = controller(auto(10));
        c.start(Selection::Assignment(1)).unwrap();
        c.advance().unwrap();
        let t0 = Instant::now();
        let option = first_option(&c);
        c.select_option(&option, t0).unwrap();

        assert!(c.tick(t0 + Duration::from_millis(10)));
        assert!(c.results().is_some());
    }

    #[test]
    fn restart_cancels_auto_advance() {
        let mut c = controller(auto(10));
        c.start(Selection::Assignment(1)).unwrap();
        let t0 = Instant::now();
        let option = first_option(&c);
        c.select_option(&option, t0).unwrap();
        c.restart();
        c.start(Selection::Assignment(1)).unwrap();

        assert!(!c.tick(t0 + Duration::from_secs(1)));
        assert_eq!(c.session().unwrap().current_index(), 0);
    }

    #[test]
    fn manual_navigation_cancels_auto_advance() {
        let mut c = controller(auto(10));
        c.start(Selection::Assignment(1)).unwrap();
        let t0 = Instant::now();
        let option = first_option(&c);
        c.select_option(&option, t0).unwrap();
        c.advance().unwrap();

        assert!(!c.tick(t0 + Duration::from_secs(1)));
        assert_eq!(c.session().unwrap().current_index(), 1);
    }

    #[test]
    fn disabled_auto_advance_schedules_nothing() {
        let mut c = controller(QuizSettings::default());
        c.start(Selection::Assignment(1)).unwrap();
        let option = first_option(&c);
        c.select_option(&option, Instant::now()).unwrap();
        assert!(c.pending_advance().is_none());
    }

    #[test]
    fn disabling_auto_advance_drops_pending() {
        let mut c = controller(auto(10));
        c.start(Selection::Assignment(1)).unwrap();
        let t0 = Instant::now();
        let option = first_option(&c);
        c.select_option(&option, t0).unwrap();
        c.set_settings(QuizSettings::default());
        assert!(!c.tick(t0 + Duration::from_secs(1)));
    }
}
