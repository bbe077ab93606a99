// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Interactive cataloging session
//!
//! A [`Session`] walks the user from a file path to a committed
//! [`FileRecord`](crate::db::FileRecord): analysis, a fixed sequence of
//! prompts with prefilled defaults, and an explicit confirmation before
//! anything is written. Input and output are generic so the whole
//! conversation can be scripted.

use chrono::Local;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::analyzers::{AnalysisResult, AnalyzerRegistry};
use crate::db::{Database, FileRecord, InsertOutcome, NewFileRecord, Sensitivity, Status};
use crate::search;
use crate::Result;

/// Tag label used when the user skips tagging
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Numbered tag presets offered during tag selection
pub const TAG_PRESETS: [(&str, [&str; 2]); 6] = [
    ("1", ["📄 Document", "💼 Business"]),
    ("2", ["🔬 Research", "📊 Analysis"]),
    ("3", ["⚖️ Legal", "📋 Official"]),
    ("4", ["💻 Code", "🔧 Technical"]),
    ("5", ["🎨 Creative", "💡 Ideas"]),
    ("6", ["📝 Notes", "🤔 Personal"]),
];

/// How a process-new-file session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Saved(i64),
    Duplicate,
    Failed,
    Cancelled,
    MissingFile,
    AnalysisFailed,
}

/// One interactive user session
pub struct Session<'a, R, W> {
    db: &'a Database,
    registry: &'a AnalyzerRegistry,
    input: R,
    output: W,
}

/// Metadata collected from the prompts
struct Answers {
    description: String,
    content_type: String,
    tags: String,
    sensitivity: Sensitivity,
    status: Status,
    custom_fields: String,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(db: &'a Database, registry: &'a AnalyzerRegistry, input: R, output: W) -> Self {
        Self { db, registry, input, output }
    }

    /// Consume the session, returning the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a message and read one trimmed line; `None` at end of input
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like `prompt`, treating end of input as an empty answer
    fn ask(&mut self, message: &str) -> Result<String> {
        Ok(self.prompt(message)?.unwrap_or_default())
    }

    pub fn display_banner(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "=".repeat(60))?;
        writeln!(self.output, "🗂️  VAULT MASTER - Interactive File Manager v2.0")?;
        writeln!(self.output, "🚀  Smart Analysis & Knowledge Management")?;
        writeln!(self.output, "{}", "=".repeat(60))?;
        Ok(())
    }

    /// Menu loop: process, search, exit. End of input exits.
    pub fn run_menu(&mut self) -> Result<()> {
        self.display_banner()?;
        loop {
            writeln!(self.output, "\n🎯{}\n  MAIN MENU\n{}", "=".repeat(59), "=".repeat(60))?;
            writeln!(self.output, "  1. Process New File  |  2. Search Database  |  3. Exit")?;
            let choice = match self.prompt("\n👉 Choose option: ")? {
                Some(choice) => choice,
                None => break,
            };
            match choice.as_str() {
                "1" => match self.prompt("📁 Enter full file path: ")? {
                    Some(path) => {
                        self.process_new_file(&path)?;
                    }
                    None => break,
                },
                "2" => match self.prompt("🔍 Search for: ")? {
                    Some(term) => {
                        self.search(&term)?;
                    }
                    None => break,
                },
                "3" => break,
                _ => writeln!(self.output, "❌ Invalid choice.")?,
            }
        }
        writeln!(self.output, "👋 Goodbye!")?;
        Ok(())
    }

    /// Analyze one file, collect its metadata and save it after confirmation
    pub fn process_new_file(&mut self, raw_path: &str) -> Result<Outcome> {
        let path = match resolve_path(raw_path) {
            Some(path) => path,
            None => {
                writeln!(self.output, "❌ File not found: {}", raw_path.trim())?;
                return Ok(Outcome::MissingFile);
            }
        };
        let filename = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        writeln!(self.output, "\n🆕 Processing new file: {}", filename)?;
        let analysis = match self.registry.analyze(&path) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Analysis failed for {:?}: {}", path, e);
                writeln!(self.output, "❌ Could not analyze file: {}", e)?;
                return Ok(Outcome::AnalysisFailed);
            }
        };
        self.display_analysis(&filename, &analysis)?;

        writeln!(self.output, "\n✍️  Please provide metadata for the database:")?;
        let answers = self.collect_answers(&filename, &analysis)?;

        writeln!(self.output, "\n📋{}\n  CONFIRM AND SAVE\n{}", "=".repeat(59), "=".repeat(60))?;
        writeln!(self.output, "  Desc: {}", answers.description)?;
        writeln!(self.output, "  Type: {}", answers.content_type)?;
        writeln!(self.output, "  Tags: {}", answers.tags)?;
        writeln!(self.output, "  Sens: {}", answers.sensitivity)?;
        writeln!(self.output, "  Stat: {}", answers.status)?;

        let confirmed = self.prompt("\n💾 Save to database? (Y/n): ")?
            .map(|answer| is_affirmative(&answer))
            .unwrap_or(false);
        if !confirmed {
            writeln!(self.output, "❌ Operation cancelled.")?;
            debug!("Cancelled cataloging of {:?}", path);
            return Ok(Outcome::Cancelled);
        }

        let record = NewFileRecord {
            description: answers.description,
            tags: answers.tags,
            status: answers.status,
            content_type: answers.content_type,
            sensitivity: answers.sensitivity,
            custom_fields: answers.custom_fields,
            date_created: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            filename,
            path: path.to_string_lossy().into_owned(),
        };

        let outcome = match self.db.insert(&record) {
            InsertOutcome::Inserted(id) => {
                info!("Cataloged {} as record {}", record.path, id);
                writeln!(self.output, "✅ File metadata saved successfully! (ID {})", id)?;
                Outcome::Saved(id)
            }
            InsertOutcome::DuplicatePath => {
                writeln!(self.output, "⚠️ A record for this file path already exists in the database.")?;
                Outcome::Duplicate
            }
            InsertOutcome::Failed => {
                writeln!(self.output, "❌ Failed to save metadata.")?;
                Outcome::Failed
            }
        };
        Ok(outcome)
    }

    fn collect_answers(&mut self, filename: &str, analysis: &AnalysisResult) -> Result<Answers> {
        let default_desc = if analysis.detected_title.is_empty() {
            filename.to_string()
        } else {
            analysis.detected_title.clone()
        };
        let description = self.ask(&format!("📝 Description (or Enter for '{}'): ", default_desc))?;
        let description = if description.is_empty() { default_desc } else { description };

        writeln!(self.output, "\n📂 Content Type (Category)")?;
        writeln!(self.output, "🤖 Detected: {}", analysis.suggested_category)?;
        let content_type = self.ask("👉 Press Enter to accept, or enter a new category: ")?;
        let content_type = if content_type.is_empty() {
            analysis.suggested_category.clone()
        } else {
            content_type
        };

        let tags = self.select_tags(&analysis.suggested_tags)?;

        let options: Vec<String> = Sensitivity::ALL.iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s.label()))
            .collect();
        writeln!(self.output, "\n🔐 Sensitivity Level: {}", options.join(", "))?;
        let sensitivity = Sensitivity::from_menu_choice(&self.ask("👉 Choose (or Enter for 'Internal'): ")?);

        let options: Vec<String> = Status::ALL.iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s.label()))
            .collect();
        writeln!(self.output, "\n📊 Status: {}", options.join(", "))?;
        let status = Status::from_menu_choice(&self.ask("👉 Choose (or Enter for 'New'): ")?);

        let custom_fields = self.ask("🔧 Add any custom notes (optional): ")?;

        Ok(Answers {
            description,
            content_type,
            tags,
            sensitivity,
            status,
            custom_fields,
        })
    }

    fn select_tags(&mut self, suggested: &[String]) -> Result<String> {
        writeln!(self.output, "\n🏷️  Tag Selection System")?;
        if !suggested.is_empty() {
            writeln!(self.output, "💡 Suggestions: {}", suggested.join(", "))?;
        }
        for (key, tags) in TAG_PRESETS {
            writeln!(self.output, "  {}. {}", key, tags.join(", "))?;
        }
        writeln!(self.output, "  9. Custom tags | 0. Skip")?;

        let choice = self.ask("👉 Choose preset, 9 for custom, or Enter to use suggestions: ")?;
        if choice.is_empty() && !suggested.is_empty() {
            return Ok(suggested.join(", "));
        }
        if let Some((_, tags)) = TAG_PRESETS.iter().find(|(key, _)| *key == choice) {
            return Ok(tags.join(", "));
        }
        if choice == "9" {
            let custom = normalize_tags(&self.ask("🏷️  Enter custom tags (comma-separated): ")?);
            if !custom.is_empty() {
                return Ok(custom);
            }
        }
        Ok(UNCATEGORIZED.to_string())
    }

    fn display_analysis(&mut self, filename: &str, analysis: &AnalysisResult) -> Result<()> {
        writeln!(self.output, "\n🔍{}", "=".repeat(59))?;
        writeln!(self.output, "  FILE ANALYSIS: {}", filename)?;
        writeln!(self.output, "{}", "=".repeat(60))?;
        writeln!(
            self.output,
            "  📏 Size: {}   |   📅 Modified: {}",
            analysis.size_human, analysis.modified
        )?;
        if !analysis.detected_title.is_empty() {
            writeln!(self.output, "  📋 Detected Title: {}", analysis.detected_title)?;
        }
        if !analysis.content_preview.is_empty() {
            writeln!(self.output, "\n  📖 Content Preview:")?;
            writeln!(self.output, "  {}", "-".repeat(40))?;
            writeln!(self.output, "  {}", analysis.content_preview)?;
            writeln!(self.output, "  {}", "-".repeat(40))?;
        }
        writeln!(self.output, "{}", "=".repeat(60))?;
        Ok(())
    }

    /// Search the catalog and print one line per match
    pub fn search(&mut self, term: &str) -> Result<Vec<FileRecord>> {
        writeln!(self.output, "\n🔍 Searching for '{}'...", term)?;
        let matches = search::search(self.db, term);
        if matches.is_empty() {
            writeln!(self.output, "❌ No results found.")?;
        }
        for record in &matches {
            writeln!(self.output, "  {}", summary_line(record))?;
        }
        Ok(matches)
    }
}

/// `ID {id}: {path} ({status}) - {description}`
pub fn summary_line(record: &FileRecord) -> String {
    format!(
        "ID {}: {} ({}) - {}",
        record.id, record.path, record.status, record.description
    )
}

/// Absolute form of a user-supplied path, or `None` if nothing is there
fn resolve_path(raw: &str) -> Option<PathBuf> {
    // Terminals often quote dragged-in paths
    let cleaned = raw.trim().trim_matches(&['"', '\''][..]);
    if cleaned.is_empty() {
        return None;
    }
    std::fs::canonicalize(Path::new(cleaned)).ok()
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}

/// Trim each comma-separated tag and drop empties
fn normalize_tags(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
