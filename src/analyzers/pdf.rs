// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! PDF document analyzer

use std::path::Path;
use tracing::{info, warn};

use super::{truncate_chars, ContentSummary, DocumentReader, FileAnalyzer};
use crate::VaultError;

const PREVIEW_CHARS: usize = 250;

/// Reader used when nothing is injected
pub fn default_reader() -> Box<dyn DocumentReader> {
    #[cfg(feature = "pdf")]
    {
        Box::new(PdfReader::new())
    }
    #[cfg(not(feature = "pdf"))]
    {
        Box::new(super::UnavailableReader::not_compiled("PDF", "pdf"))
    }
}

/// Analyzer for PDF files
pub struct PdfAnalyzer {
    reader: Box<dyn DocumentReader>,
}

impl PdfAnalyzer {
    pub fn new(reader: Box<dyn DocumentReader>) -> Self {
        Self { reader }
    }
}

impl FileAnalyzer for PdfAnalyzer {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn is_available(&self) -> bool {
        self.reader.is_available()
    }

    fn analyze(&self, path: &Path) -> ContentSummary {
        info!("Analyzing PDF: {:?}", path);

        let mut summary = ContentSummary {
            content_preview: "Could not read PDF.".to_string(),
            detected_title: String::new(),
            category: "document_pdf".to_string(),
            tags: vec!["📄 PDF".to_string(), "📋 Document".to_string()],
        };

        match self.reader.read(path) {
            Ok(doc) => {
                if let Some(title) = doc.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                    summary.detected_title = title.to_string();
                }
                if let Some(page) = doc.paragraphs.first().map(|p| p.trim()).filter(|p| !p.is_empty()) {
                    summary.content_preview = format!("{}...", truncate_chars(page, PREVIEW_CHARS));
                }
            }
            Err(VaultError::CapabilityUnavailable(note)) => {
                summary.content_preview = note;
            }
            Err(e) => {
                warn!("PDF analysis failed for {:?}: {}", path, e);
                summary.content_preview = format!("PDF analysis failed: {}", e);
            }
        }

        summary
    }
}

#[cfg(feature = "pdf")]
pub use self::extract::PdfReader;

#[cfg(feature = "pdf")]
mod extract {
    use lopdf::{Dictionary, Document, Object};
    use std::path::Path;

    use crate::analyzers::{DocumentReader, DocumentText};
    use crate::{Result, VaultError};

    /// Reads the Info title with lopdf and page text with pdf-extract
    pub struct PdfReader;

    impl PdfReader {
        pub fn new() -> Self {
            Self
        }

        /// Title from the trailer's Info dictionary
        pub(crate) fn document_title(bytes: &[u8]) -> Option<String> {
            let doc = Document::load_mem(bytes).ok()?;
            let info = doc.trailer.get(b"Info").ok()?;
            let info_dict: &Dictionary = match info {
                Object::Reference(id) => doc.get_dictionary(*id).ok()?,
                Object::Dictionary(dict) => dict,
                _ => return None,
            };
            let title = info_dict.get(b"Title").ok()?.as_str().ok()?;
            decode_pdf_string(title)
        }

        /// Text of each page, in order
        fn page_texts(bytes: &[u8]) -> Result<Vec<String>> {
            // pdf-extract panics on some malformed files
            std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
                .map_err(|_| VaultError::Pdf("Text extraction aborted on malformed PDF".to_string()))?
                .map_err(|e| VaultError::Pdf(format!("Text extraction failed: {}", e)))
        }
    }

    impl Default for PdfReader {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DocumentReader for PdfReader {
        fn name(&self) -> &'static str {
            "pdf-extract"
        }

        fn read(&self, path: &Path) -> Result<DocumentText> {
            let bytes = std::fs::read(path)?;
            let title = Self::document_title(&bytes);
            Ok(DocumentText {
                title,
                paragraphs: Self::page_texts(&bytes)?,
            })
        }
    }

    /// Decode a PDF text string (UTF-16BE with BOM, otherwise byte text)
    pub(crate) fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
        let decoded = match bytes {
            [0xFE, 0xFF, rest @ ..] => {
                let units: Vec<u16> = rest
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            _ => String::from_utf8_lossy(bytes).into_owned(),
        };
        let trimmed = decoded.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{DocumentText, UnavailableReader};
    use crate::Result;

    struct CannedReader(DocumentText);

    impl DocumentReader for CannedReader {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn read(&self, _path: &Path) -> Result<DocumentText> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_title_and_truncated_preview() {
        let page = format!("  {}  ", "x".repeat(400));
        let analyzer = PdfAnalyzer::new(Box::new(CannedReader(DocumentText {
            title: Some(" Annual Summary ".to_string()),
            paragraphs: vec![page, "second page".to_string()],
        })));

        let summary = analyzer.analyze(Path::new("/tmp/annual.pdf"));
        assert_eq!(summary.detected_title, "Annual Summary");
        assert_eq!(summary.content_preview, format!("{}...", "x".repeat(250)));
        assert_eq!(summary.category, "document_pdf");
    }

    #[test]
    fn test_empty_page_keeps_placeholder() {
        let analyzer = PdfAnalyzer::new(Box::new(CannedReader(DocumentText {
            title: None,
            paragraphs: vec!["   ".to_string()],
        })));
        let summary = analyzer.analyze(Path::new("/tmp/blank.pdf"));
        assert_eq!(summary.content_preview, "Could not read PDF.");
        assert_eq!(summary.detected_title, "");
    }

    #[test]
    fn test_unavailable_reader_note() {
        let analyzer = PdfAnalyzer::new(Box::new(UnavailableReader::not_compiled("PDF", "pdf")));
        assert!(!analyzer.is_available());
        let summary = analyzer.analyze(Path::new("/tmp/x.pdf"));
        assert!(summary.content_preview.starts_with("NOTE: PDF content preview unavailable"));
        assert_eq!(summary.tags, vec!["📄 PDF", "📋 Document"]);
    }
}
