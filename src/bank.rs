use std::fs;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::BankError;

const SAMPLE_BANK: &str = include_str!("../assets/sample_bank.json");

/// A single multiple-choice question as supplied by the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "answer")]
    pub correct_answer: String,
}

impl Question {
    pub fn new(text: impl Into<String>, options: &[&str], correct_answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.into(),
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Ordered assignments, each an ordered list of questions. Assignment numbers are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    assignments: Vec<Vec<Question>>,
}

impl QuestionBank {
    pub fn new(assignments: Vec<Vec<Question>>) -> Result<Self, BankError> {
        for (i, assignment) in assignments.iter().enumerate() {
            for question in assignment {
                // An empty option list is a degraded question, not an invalid one.
                if !question.options.is_empty() && !question.has_option(&question.correct_answer) {
                    return Err(BankError::AnswerNotInOptions {
                        assignment: i + 1,
                        question: question.text.clone(),
                        answer: question.correct_answer.clone(),
                    });
                }
            }
        }
        Ok(Self { assignments })
    }

    /// The bank bundled with the application.
    pub fn sample() -> Result<Self, BankError> {
        Self::from_json_str(SAMPLE_BANK)
    }

    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let assignments: Vec<Vec<Question>> = serde_json::from_str(json)?;
        Self::new(assignments)
    }

    /// Reads `assignment, question, answer, option...` rows. A leading header row is skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, BankError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut assignments: Vec<Vec<Question>> = Vec::new();

        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let row = i + 1;

            if record.len() < 3 {
                return Err(BankError::Row {
                    row,
                    reason: format!(
                        "expected at least 3 columns (assignment, question, answer), found {}",
                        record.len()
                    ),
                });
            }

            let assignment = match record.get(0).and_then(|s| s.parse::<usize>().ok()) {
                Some(n) if n > 0 => n,
                Some(_) => {
                    return Err(BankError::Row {
                        row,
                        reason: "assignment numbers start at 1".to_string(),
                    })
                }
                None if row == 1 => {
                    debug!("Skipping CSV header row: {:?}", record);
                    continue;
                }
                None => {
                    return Err(BankError::Row {
                        row,
                        reason: "invalid assignment number".to_string(),
                    })
                }
            };

            let text = record.get(1).unwrap_or_default().to_string();
            let correct_answer = record.get(2).unwrap_or_default().to_string();

            let mut options: Vec<String> = record
                .iter()
                .skip(3)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !options.is_empty() && !options.contains(&correct_answer) {
                options.insert(0, correct_answer.clone());
            }
            if options.is_empty() {
                warn!("Row {} has no options: \"{}\"", row, text);
            }

            if assignments.len() < assignment {
                assignments.resize_with(assignment, Vec::new);
            }
            assignments[assignment - 1].push(Question {
                text,
                options,
                correct_answer,
            });
        }

        Self::new(assignments)
    }

    /// Loads a `.json` or `.csv` bank, picking the format from the extension.
    pub fn load(path: &Path) -> Result<Self, BankError> {
        info!("Loading question bank from: {}", path.display());
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let bank = match extension.as_str() {
            "json" => Self::from_json_str(&fs::read_to_string(path)?)?,
            "csv" => Self::from_csv_reader(fs::File::open(path)?)?,
            other => return Err(BankError::UnsupportedFormat(other.to_string())),
        };

        info!(
            "Loaded {} assignments with {} questions",
            bank.len(),
            bank.question_count()
        );
        Ok(bank)
    }

    /// Number of assignments, including empty ones.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.assignments.iter().map(Vec::len).sum()
    }

    /// Questions of a 1-based assignment.
    pub fn assignment(&self, number: usize) -> Option<&[Question]> {
        number
            .checked_sub(1)
            .and_then(|i| self.assignments.get(i))
            .map(Vec::as_slice)
    }

    /// Assignments paired with their 1-based numbers, in bank order.
    pub fn assignments(&self) -> impl Iterator<Item = (usize, &[Question])> {
        self.assignments
            .iter()
            .enumerate()
            .map(|(i, a)| (i + 1, a.as_slice()))
    }
}
