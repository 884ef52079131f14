//! Interactive prompts. Generic over the reader and writer so the flow can be
//! driven from tests.

use kassa_core::{PipelineOptions, SortOrder};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub const VALID_STATES: &[&str] = &["EXECUTED", "CANCELED", "PENDING"];

const YES: &[&str] = &["да", "д", "yes", "y"];
const NO: &[&str] = &["нет", "н", "no", "n"];
const ASCENDING: &[&str] = &["asc", "ascending", "по возрастанию", "возрастание"];
const DESCENDING: &[&str] = &["desc", "descending", "по убыванию", "убывание"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Json,
    Csv,
    Xlsx,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Json => "JSON",
            SourceKind::Csv => "CSV",
            SourceKind::Xlsx => "XLSX",
        }
    }
}

pub fn is_closed_input(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::UnexpectedEof
}

pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn prompt(&mut self, text: &str) -> io::Result<String> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn ask_source(&mut self) -> io::Result<SourceKind> {
        loop {
            let answer = self.prompt(
                "Choose a source:\n  1. JSON file\n  2. CSV file\n  3. XLSX file",
            )?;
            match answer.as_str() {
                "1" => return Ok(SourceKind::Json),
                "2" => return Ok(SourceKind::Csv),
                "3" => return Ok(SourceKind::Xlsx),
                _ => self.say("Unknown option, enter 1, 2 or 3.")?,
            }
        }
    }

    pub fn ask_path(&mut self, kind: SourceKind) -> io::Result<PathBuf> {
        loop {
            let answer = self.prompt(&format!("Path to the {} file:", kind.label()))?;
            if !answer.is_empty() {
                self.say(&format!("Processing {} file {answer}", kind.label()))?;
                return Ok(PathBuf::from(answer));
            }
        }
    }

    pub fn ask_status(&mut self) -> io::Result<String> {
        loop {
            let answer = self.prompt(&format!(
                "Enter the status to filter by. Available: {}",
                VALID_STATES.join(", ")
            ))?;
            let status = answer.to_uppercase();
            if VALID_STATES.contains(&status.as_str()) {
                self.say(&format!("Transactions filtered by status \"{status}\""))?;
                return Ok(status);
            }
            self.say(&format!("Status \"{answer}\" is not available."))?;
        }
    }

    pub fn ask_yes_no(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let answer = self.prompt(&format!("{question} (yes/no)"))?.to_lowercase();
            if YES.contains(&answer.as_str()) {
                return Ok(true);
            }
            if NO.contains(&answer.as_str()) {
                return Ok(false);
            }
            self.say("Please answer yes or no.")?;
        }
    }

    pub fn ask_sort_order(&mut self) -> io::Result<SortOrder> {
        loop {
            let answer = self
                .prompt("Sort ascending or descending? (asc/desc)")?
                .to_lowercase();
            if ASCENDING.contains(&answer.as_str()) {
                return Ok(SortOrder::Ascending);
            }
            if DESCENDING.contains(&answer.as_str()) {
                return Ok(SortOrder::Descending);
            }
            self.say("Please answer asc or desc.")?;
        }
    }

    /// Walks through the pipeline stages in their fixed order.
    pub fn collect_options(&mut self) -> io::Result<PipelineOptions> {
        let state = self.ask_status()?;
        let sort = if self.ask_yes_no("Sort transactions by date?")? {
            Some(self.ask_sort_order()?)
        } else {
            None
        };
        let rub_only = self.ask_yes_no("Show only rouble transactions?")?;
        let search = if self.ask_yes_no("Filter by a word in the description?")? {
            Some(self.prompt("Word to search for:")?)
        } else {
            None
        };
        Ok(PipelineOptions {
            state,
            sort,
            rub_only,
            search,
        })
    }
}
