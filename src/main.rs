use std::fs::{self, File};
use std::path::PathBuf;

use assignment_quiz::app::QuizApp;
use assignment_quiz::config;
use eframe::egui;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

const LOG_FILE: &str = "assignment_quiz.log";

fn init_logging() {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    let dir = config::app_dir();
    match fs::create_dir_all(&dir).and_then(|_| File::create(dir.join(LOG_FILE))) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
        Err(e) => eprintln!("Could not open log file in {}: {}", dir.display(), e),
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Logger already initialized: {}", e);
    }
}

fn main() -> Result<(), eframe::Error> {
    init_logging();

    let bank_override = std::env::args_os().nth(1).map(PathBuf::from);
    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Assignment Quiz",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(QuizApp::new(cc, bank_override))
        }),
    )
}
