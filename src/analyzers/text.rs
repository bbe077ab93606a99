// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Plain text, markdown and source file analyzer

use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use super::{truncate_chars, ContentSummary, FileAnalyzer};
use crate::Result;

/// Bytes read from the head of the file
const HEAD_BYTES: u64 = 500;
const PREVIEW_CHARS: usize = 250;
const TITLE_CHARS: usize = 70;

/// Analyzer for text-like files
pub struct TextAnalyzer;

impl TextAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn read_head(path: &Path) -> Result<String> {
        let mut buf = Vec::with_capacity(HEAD_BYTES as usize);
        std::fs::File::open(path)?.take(HEAD_BYTES).read_to_end(&mut buf)?;
        // Drop invalid sequences, including a character cut at the byte limit
        Ok(String::from_utf8_lossy(&buf).replace('\u{FFFD}', ""))
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Title and preview for a chunk of text.
///
/// The title is the first non-blank line; a markdown heading loses its `#`
/// markers, anything else is cut to 70 characters. The preview is the first
/// 250 characters, trimmed, with a trailing ellipsis.
pub fn summarize_text(content: &str) -> (String, String) {
    let title = content.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| {
            if line.starts_with('#') {
                line.replace('#', "").trim().to_string()
            } else {
                truncate_chars(line, TITLE_CHARS).to_string()
            }
        })
        .unwrap_or_default();

    let head = truncate_chars(content, PREVIEW_CHARS).trim();
    let preview = if head.is_empty() {
        String::new()
    } else {
        format!("{}...", head)
    };

    (title, preview)
}

impl FileAnalyzer for TextAnalyzer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supported_extensions(&self) -> &[&str] {
        &[
            "txt", "md", "markdown",
            "py", "js", "rs", "json", "toml", "yaml", "yml",
            "sh", "sql",
        ]
    }

    fn analyze(&self, path: &Path) -> ContentSummary {
        info!("Analyzing text file: {:?}", path);

        let mut summary = ContentSummary {
            content_preview: String::new(),
            detected_title: String::new(),
            category: "text_file".to_string(),
            tags: Vec::new(),
        };

        match Self::read_head(path) {
            Ok(content) => {
                let (title, preview) = summarize_text(&content);
                summary.detected_title = title;
                summary.content_preview = preview;
            }
            Err(e) => {
                warn!("Could not read {:?}: {}", path, e);
                summary.content_preview = format!("Could not read file: {}", e);
            }
        }

        summary
    }
}
