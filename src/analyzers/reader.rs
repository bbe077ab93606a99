// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Pluggable document text readers

use std::path::Path;

use crate::{Result, VaultError};

/// Raw text pulled out of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText {
    /// Title from document metadata, if the format carries one
    pub title: Option<String>,
    /// Paragraphs (DOCX) or pages (PDF), in document order
    pub paragraphs: Vec<String>,
}

/// A text-extraction capability for one document format.
///
/// Readers return [`VaultError::CapabilityUnavailable`] when they cannot
/// run at all, and any other error when the document itself is unreadable.
pub trait DocumentReader: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }

    fn read(&self, path: &Path) -> Result<DocumentText>;
}

/// Stand-in for a reader that is compiled out or switched off
pub struct UnavailableReader {
    format: &'static str,
    reason: String,
}

impl UnavailableReader {
    /// The cargo feature providing this reader was not enabled
    pub fn not_compiled(format: &'static str, feature: &str) -> Self {
        Self {
            format,
            reason: format!("rebuild with `--features {}`", feature),
        }
    }

    /// Turned off in the configuration file
    pub fn disabled(format: &'static str) -> Self {
        Self {
            format,
            reason: "reader disabled in configuration".to_string(),
        }
    }
}

impl DocumentReader for UnavailableReader {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn read(&self, _path: &Path) -> Result<DocumentText> {
        Err(VaultError::CapabilityUnavailable(format!(
            "NOTE: {} content preview unavailable ({}).",
            self.format, self.reason
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_reader_message() {
        let reader = UnavailableReader::not_compiled("PDF", "pdf");
        assert!(!reader.is_available());
        match reader.read(Path::new("/tmp/x.pdf")) {
            Err(VaultError::CapabilityUnavailable(msg)) => {
                assert_eq!(msg, "NOTE: PDF content preview unavailable (rebuild with `--features pdf`).");
            }
            other => panic!("Expected CapabilityUnavailable, got {:?}", other),
        }
    }
}
