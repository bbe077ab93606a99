// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! File analyzers that prefill the cataloging prompts

pub mod document;
pub mod pdf;
pub mod reader;
pub mod text;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{AppConfig, Result};
pub use reader::{DocumentReader, DocumentText, UnavailableReader};

/// Derived view of a file on disk. Every value is only a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Size with a binary unit, e.g. `1.5 KB`
    pub size_human: String,
    /// Local modification time, `YYYY-MM-DD HH:MM`
    pub modified: String,
    /// Lowercase extension including the dot, empty if none
    pub extension: String,
    pub content_preview: String,
    pub detected_title: String,
    pub suggested_category: String,
    pub suggested_tags: Vec<String>,
}

/// What a type-specific analyzer contributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSummary {
    pub content_preview: String,
    pub detected_title: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Trait for type-specific analyzers.
///
/// `analyze` cannot fail: extraction problems are reported through the
/// preview text so the rest of the session can continue.
pub trait FileAnalyzer: Send + Sync {
    /// Name of this analyzer
    fn name(&self) -> &'static str;

    /// File extensions this analyzer handles
    fn supported_extensions(&self) -> &[&str];

    /// Check if this analyzer can handle a file
    fn can_handle(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            self.supported_extensions().iter().any(|e| e.eq_ignore_ascii_case(ext))
        } else {
            false
        }
    }

    /// Whether the underlying extraction capability is usable
    fn is_available(&self) -> bool {
        true
    }

    /// Extract preview, title and type-level suggestions
    fn analyze(&self, path: &Path) -> ContentSummary;
}

/// Registry of all file analyzers
pub struct AnalyzerRegistry {
    analyzers: Vec<Box<dyn FileAnalyzer>>,
}

impl AnalyzerRegistry {
    /// Create a registry with the readers enabled in config
    pub fn new(config: &AppConfig) -> Self {
        let pdf_reader: Box<dyn DocumentReader> = if config.analyzers.pdf.enabled {
            pdf::default_reader()
        } else {
            Box::new(UnavailableReader::disabled("PDF"))
        };
        let docx_reader: Box<dyn DocumentReader> = if config.analyzers.docx.enabled {
            document::default_reader()
        } else {
            Box::new(UnavailableReader::disabled("DOCX"))
        };
        Self::with_readers(pdf_reader, docx_reader)
    }

    /// Create a registry around explicit PDF and DOCX readers
    pub fn with_readers(pdf_reader: Box<dyn DocumentReader>, docx_reader: Box<dyn DocumentReader>) -> Self {
        let mut registry = Self {
            analyzers: Vec::new(),
        };
        registry.register(Box::new(pdf::PdfAnalyzer::new(pdf_reader)));
        registry.register(Box::new(document::DocxAnalyzer::new(docx_reader)));
        registry.register(Box::new(text::TextAnalyzer::new()));
        registry
    }

    /// Register a new analyzer. Earlier registrations win on overlap.
    pub fn register(&mut self, analyzer: Box<dyn FileAnalyzer>) {
        self.analyzers.push(analyzer);
    }

    /// Find the analyzer for a file
    pub fn find_analyzer(&self, path: &Path) -> Option<&dyn FileAnalyzer> {
        self.analyzers.iter()
            .find(|a| a.can_handle(path))
            .map(|a| a.as_ref())
    }

    /// Get number of registered analyzers
    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Analyzer names with their availability
    pub fn capabilities(&self) -> Vec<(&'static str, bool)> {
        self.analyzers.iter().map(|a| (a.name(), a.is_available())).collect()
    }

    /// Analyze a file. Only a failure to stat the file is an error.
    pub fn analyze(&self, path: &Path) -> Result<AnalysisResult> {
        let meta = std::fs::metadata(path)?;
        let modified = meta.modified()
            .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let extension = path.extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();

        let mut result = AnalysisResult {
            size_human: human_readable_size(meta.len()),
            modified,
            extension,
            content_preview: "N/A".to_string(),
            detected_title: String::new(),
            suggested_category: "unknown".to_string(),
            suggested_tags: Vec::new(),
        };

        if let Some(analyzer) = self.find_analyzer(path) {
            debug!("Using analyzer: {}", analyzer.name());
            let summary = analyzer.analyze(path);
            result.content_preview = summary.content_preview;
            result.detected_title = summary.detected_title;
            result.suggested_category = summary.category;
            result.suggested_tags = summary.tags;
        }

        let filename = path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if let Some(group) = classify_filename(&filename) {
            debug!("Filename matched {} keywords", group.category);
            result.suggested_category = group.category.to_string();
            result.suggested_tags = group.tags.iter().map(|t| t.to_string()).collect();
        }

        Ok(result)
    }
}

/// Filename keyword group and the suggestions it implies
#[derive(Debug, PartialEq, Eq)]
pub struct KeywordGroup {
    pub keywords: &'static [&'static str],
    pub category: &'static str,
    pub tags: &'static [&'static str],
}

/// Checked in order; first match wins
pub const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        keywords: &["research", "study", "analysis"],
        category: "research_document",
        tags: &["🔬 Research", "📊 Analysis"],
    },
    KeywordGroup {
        keywords: &["legal", "contract", "agreement"],
        category: "legal_document",
        tags: &["⚖️ Legal", "📋 Official"],
    },
    KeywordGroup {
        keywords: &["business", "plan", "proposal"],
        category: "business_document",
        tags: &["💼 Business", "🎯 Strategy"],
    },
];

/// Match a filename against the keyword groups
pub fn classify_filename(filename: &str) -> Option<&'static KeywordGroup> {
    let lower = filename.to_lowercase();
    KEYWORD_GROUPS.iter()
        .find(|group| group.keywords.iter().any(|k| lower.contains(k)))
}

/// Format a byte count with binary prefixes and one decimal place
pub fn human_readable_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} PB", size)
}

/// First `max` characters of `s`
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
