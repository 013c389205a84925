use std::path::PathBuf;

use egui::{Color32, RichText, Ui};

use crate::bank::QuestionBank;
use crate::config::UserConfig;
use crate::quiz::Selection;
use crate::results::QuizResults;
use crate::session::QuestionView;

const DEFAULT_AUTO_ADVANCE_MS: u64 = 2000;

/// Input events produced by the widgets, routed into the controller by the app.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizAction {
    None,
    Start(Selection),
    SelectOption(String),
    Advance,
    Retreat,
    Restart,
    OpenBank(PathBuf),
    UseSampleBank,
}

#[derive(Default)]
pub struct QuizUI {
    pub show_settings: bool,
    notification: Option<String>,
}

impl QuizUI {
    /// Shows a non-blocking message until the next successful action.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    pub fn show_notification(&self, ui: &mut Ui) {
        if let Some(message) = &self.notification {
            ui.label(RichText::new(message).color(Color32::RED));
            ui.add_space(5.0);
        }
    }

    pub fn show_start(
        &mut self,
        ui: &mut Ui,
        bank: &QuestionBank,
        bank_name: &str,
        file_history: &[(String, i64)],
        selection: &mut Selection,
    ) -> QuizAction {
        let mut action = QuizAction::None;

        ui.heading("Assignment Quiz");
        ui.separator();
        self.show_notification(ui);

        ui.label(format!(
            "Question bank: {} ({} assignments, {} questions)",
            bank_name,
            bank.len(),
            bank.question_count()
        ));
        ui.horizontal(|ui| {
            if ui.button("Open Question Bank").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Question bank", &["json", "csv"])
                    .pick_file()
                {
                    action = QuizAction::OpenBank(path);
                }
            }
            if ui.button("Use Sample Bank").clicked() {
                action = QuizAction::UseSampleBank;
            }
        });

        if !file_history.is_empty() {
            ui.add_space(10.0);
            ui.label("Recent Banks:");
            for (file, _) in file_history {
                if ui.button(file).clicked() {
                    action = QuizAction::OpenBank(PathBuf::from(file));
                }
            }
        }

        ui.add_space(10.0);
        ui.separator();
        egui::ComboBox::from_label("Assignment")
            .selected_text(selection.title())
            .show_ui(ui, |ui| {
                ui.selectable_value(selection, Selection::All, Selection::All.title());
                for number in 1..=bank.len() {
                    let choice = Selection::Assignment(number);
                    ui.selectable_value(selection, choice, choice.title());
                }
            });

        ui.add_space(20.0);
        if ui.button("Start Quiz").clicked() {
            action = QuizAction::Start(*selection);
        }

        action
    }

    /// Returns `true` when a setting changed.
    pub fn show_settings(&mut self, ui: &mut Ui, config: &mut UserConfig) -> bool {
        let mut changed = false;

        ui.heading("Settings");
        ui.separator();

        changed |= ui
            .checkbox(
                &mut config.deduplicate_all,
                "Skip repeated questions when taking all assignments",
            )
            .changed();
        changed |= ui
            .checkbox(&mut config.shuffle_options, "Shuffle answer options")
            .changed();

        let mut auto_advance = config.auto_advance_delay_ms.is_some();
        if ui
            .checkbox(&mut auto_advance, "Move to the next question after answering")
            .changed()
        {
            config.auto_advance_delay_ms = auto_advance.then_some(DEFAULT_AUTO_ADVANCE_MS);
            changed = true;
        }
        if let Some(delay) = config.auto_advance_delay_ms.as_mut() {
            ui.horizontal(|ui| {
                ui.label("Delay:");
                changed |= ui
                    .add(
                        egui::DragValue::new(delay)
                            .clamp_range(100..=10_000)
                            .speed(50)
                            .suffix(" ms"),
                    )
                    .changed();
            });
        }

        changed
    }

    pub fn show_question(&mut self, ui: &mut Ui, view: &QuestionView) -> QuizAction {
        let mut action = QuizAction::None;

        ui.heading(view.title.as_str());
        ui.label(view.counter.as_str());
        ui.separator();
        self.show_notification(ui);

        ui.add_space(10.0);
        ui.label(RichText::new(&view.text).size(18.0));
        ui.add_space(10.0);

        if let Some(notice) = &view.notice {
            ui.label(RichText::new(notice).color(Color32::YELLOW));
        }

        for option in &view.options {
            let mut text = RichText::new(format!("{} {}", option.label, option.text));
            if option.correct {
                text = text.color(Color32::GREEN);
            } else if option.wrong {
                text = text.color(Color32::RED);
            }
            if ui.selectable_label(option.selected, text).clicked() {
                action = QuizAction::SelectOption(option.text.clone());
            }
        }

        if let Some(feedback) = &view.feedback {
            ui.add_space(10.0);
            let color = if feedback.correct {
                Color32::GREEN
            } else {
                Color32::RED
            };
            ui.label(RichText::new(feedback.message()).color(color));
        }

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(view.retreat_enabled, egui::Button::new("Previous"))
                .clicked()
            {
                action = QuizAction::Retreat;
            }
            if ui.button(view.advance_label).clicked() {
                action = QuizAction::Advance;
            }
        });

        action
    }

    pub fn show_results(&mut self, ui: &mut Ui, results: &QuizResults) -> QuizAction {
        let mut action = QuizAction::None;

        ui.heading("Quiz Results");
        ui.separator();
        ui.label(
            RichText::new(format!("{} ({:.1}%)", results, results.percentage())).size(18.0),
        );
        ui.add_space(10.0);

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 40.0)
            .show(ui, |ui| {
                for entry in &results.entries {
                    ui.label(RichText::new(entry.heading()).strong());
                    ui.horizontal(|ui| {
                        ui.label(format!("Your Answer: {}", entry.answer_text()));
                        if entry.correct {
                            ui.label(RichText::new("(Correct)").color(Color32::GREEN));
                        } else {
                            ui.label(RichText::new("(Incorrect)").color(Color32::RED));
                        }
                    });
                    if let Some(correct) = &entry.correct_answer {
                        ui.label(format!("Correct Answer: {}", correct));
                    }
                    ui.add_space(8.0);
                }
            });

        ui.separator();
        if ui.button("Restart Quiz").clicked() {
            action = QuizAction::Restart;
        }

        action
    }
}
