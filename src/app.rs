use std::path::{Path, PathBuf};
use std::time::Instant;

use eframe::egui;
use log::{error, info, warn};

use crate::bank::QuestionBank;
use crate::config::UserConfig;
use crate::controller::{QuizController, Screen};
use crate::ui::{QuizAction, QuizUI};

const SAMPLE_BANK_NAME: &str = "Sample bank";

pub struct QuizApp {
    config: UserConfig,
    ui: QuizUI,
    controller: QuizController,
    bank_name: String,
}

impl QuizApp {
    /// `bank_override` takes precedence over the bank remembered in the config.
    pub fn new(_cc: &eframe::CreationContext<'_>, bank_override: Option<PathBuf>) -> Self {
        let config = UserConfig::load();
        let mut ui = QuizUI::default();

        let bank_path = bank_override.or_else(|| config.bank_path.clone());
        let (bank, bank_name) = match bank_path.as_deref() {
            Some(path) => match QuestionBank::load(path) {
                Ok(bank) => (bank, path.display().to_string()),
                Err(e) => {
                    warn!("Falling back to the sample bank: {}", e);
                    ui.notify(format!("Failed to load {}: {}", path.display(), e));
                    Self::sample_bank(&mut ui)
                }
            },
            None => Self::sample_bank(&mut ui),
        };

        let controller = QuizController::new(bank, config.quiz_settings());
        Self {
            config,
            ui,
            controller,
            bank_name,
        }
    }

    fn sample_bank(ui: &mut QuizUI) -> (QuestionBank, String) {
        match QuestionBank::sample() {
            Ok(bank) => (bank, SAMPLE_BANK_NAME.to_string()),
            Err(e) => {
                error!("Bundled sample bank is invalid: {}", e);
                ui.notify("Error: Questions data not loaded.");
                (QuestionBank::default(), SAMPLE_BANK_NAME.to_string())
            }
        }
    }

    fn open_bank(&mut self, path: &Path) {
        match QuestionBank::load(path) {
            Ok(bank) => {
                self.controller.set_bank(bank);
                self.bank_name = path.display().to_string();
                self.config.bank_path = Some(path.to_path_buf());
                self.config.update_file_history(self.bank_name.clone());
                self.save_config();
                self.ui.clear_notification();
            }
            Err(e) => {
                warn!("Failed to load question bank: {}", e);
                self.ui
                    .notify(format!("Failed to load {}: {}", path.display(), e));
            }
        }
    }

    fn use_sample_bank(&mut self) {
        let (bank, name) = Self::sample_bank(&mut self.ui);
        self.controller.set_bank(bank);
        self.bank_name = name;
        self.config.bank_path = None;
        self.save_config();
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            warn!("Failed to save config: {}", e);
        }
    }

    fn handle(&mut self, action: QuizAction) {
        let result = match action {
            QuizAction::None => return,
            QuizAction::Start(selection) => self.controller.start(selection),
            QuizAction::SelectOption(option) => self
                .controller
                .select_option(&option, Instant::now())
                .map(|_| ()),
            QuizAction::Advance => self.controller.advance(),
            QuizAction::Retreat => self.controller.retreat().map(|_| ()),
            QuizAction::Restart => {
                info!("Restarting quiz");
                self.controller.restart();
                Ok(())
            }
            QuizAction::OpenBank(path) => {
                self.open_bank(&path);
                return;
            }
            QuizAction::UseSampleBank => {
                self.use_sample_bank();
                return;
            }
        };

        match result {
            Ok(()) => self.ui.clear_notification(),
            Err(e) => {
                warn!("{}", e);
                self.ui.notify(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for QuizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.tick(now);
        if let Some(pending) = self.controller.pending_advance() {
            ctx.request_repaint_after(pending.due.saturating_duration_since(now));
        }

        let mut action = QuizAction::None;
        let mut selection = self.controller.selection();
        egui::CentralPanel::default().show(ctx, |ui| match self.controller.screen() {
            Screen::Start => {
                action = self.ui.show_start(
                    ui,
                    self.controller.bank(),
                    &self.bank_name,
                    &self.config.file_history,
                    &mut selection,
                );

                if ui.button("Settings").clicked() {
                    self.ui.show_settings = !self.ui.show_settings;
                }
            }
            Screen::Quiz(session) => {
                let view = session.view();
                action = self.ui.show_question(ui, &view);
            }
            Screen::Results { results, .. } => {
                action = self.ui.show_results(ui, results);
            }
        });
        if matches!(self.controller.screen(), Screen::Start) {
            self.controller.set_selection(selection);
        }

        if self.ui.show_settings {
            let mut show = true;
            let mut changed = false;
            egui::Window::new("Settings")
                .open(&mut show)
                .show(ctx, |ui| {
                    changed = self.ui.show_settings(ui, &mut self.config);
                });
            self.ui.show_settings = show;
            if changed {
                self.controller.set_settings(self.config.quiz_settings());
                self.save_config();
            }
        }

        self.handle(action);
    }
}
