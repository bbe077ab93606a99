// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Word document analyzer

use std::path::Path;
use tracing::{info, warn};

use super::{truncate_chars, ContentSummary, DocumentReader, DocumentText, FileAnalyzer};
use crate::VaultError;

const TITLE_MAX_CHARS: usize = 100;
const PREVIEW_CHARS: usize = 300;

/// Reader used when nothing is injected
pub fn default_reader() -> Box<dyn DocumentReader> {
    #[cfg(feature = "docx")]
    {
        Box::new(DocxReader::new())
    }
    #[cfg(not(feature = "docx"))]
    {
        Box::new(super::UnavailableReader::not_compiled("DOCX", "docx"))
    }
}

/// Analyzer for DOCX (and legacy DOC) files
pub struct DocxAnalyzer {
    reader: Box<dyn DocumentReader>,
}

impl DocxAnalyzer {
    pub fn new(reader: Box<dyn DocumentReader>) -> Self {
        Self { reader }
    }

    /// Title guess and preview from the paragraph list
    fn summarize(doc: &DocumentText) -> (Option<String>, Option<String>) {
        let paragraphs: Vec<&str> = doc.paragraphs.iter().map(|p| p.trim()).collect();

        let title = doc.title.as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                paragraphs.first()
                    .copied()
                    .filter(|p| !p.is_empty() && p.chars().count() < TITLE_MAX_CHARS)
            })
            .map(str::to_string);

        let mut parts = Vec::new();
        let mut char_count = 0;
        for text in paragraphs.iter().filter(|p| !p.is_empty()) {
            if char_count >= PREVIEW_CHARS {
                break;
            }
            parts.push(*text);
            char_count += text.chars().count();
        }
        let preview = (!parts.is_empty())
            .then(|| format!("{}...", truncate_chars(&parts.join("\n"), PREVIEW_CHARS)));

        (title, preview)
    }
}

impl FileAnalyzer for DocxAnalyzer {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["docx", "doc"]
    }

    fn is_available(&self) -> bool {
        self.reader.is_available()
    }

    fn analyze(&self, path: &Path) -> ContentSummary {
        info!("Analyzing document: {:?}", path);

        let mut summary = ContentSummary {
            content_preview: "Could not read DOCX.".to_string(),
            detected_title: String::new(),
            category: "document_docx".to_string(),
            tags: vec!["📄 Document".to_string(), "💼 Business".to_string()],
        };

        match self.reader.read(path) {
            Ok(doc) => {
                let (title, preview) = Self::summarize(&doc);
                if let Some(title) = title {
                    summary.detected_title = title;
                }
                if let Some(preview) = preview {
                    summary.content_preview = preview;
                }
            }
            Err(VaultError::CapabilityUnavailable(note)) => {
                summary.content_preview = note;
            }
            Err(e) => {
                warn!("DOCX analysis failed for {:?}: {}", path, e);
                summary.content_preview = format!("DOCX analysis failed: {}", e);
            }
        }

        summary
    }
}

#[cfg(feature = "docx")]
pub use self::extract::DocxReader;

#[cfg(feature = "docx")]
mod extract {
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use std::io::Read;
    use std::path::Path;

    use crate::analyzers::{DocumentReader, DocumentText};
    use crate::{Result, VaultError};

    /// Reads `word/document.xml` out of the DOCX zip container
    pub struct DocxReader;

    impl DocxReader {
        pub fn new() -> Self {
            Self
        }
    }

    impl Default for DocxReader {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DocumentReader for DocxReader {
        fn name(&self) -> &'static str {
            "docx"
        }

        fn read(&self, path: &Path) -> Result<DocumentText> {
            let file = std::fs::File::open(path)?;
            let mut archive = zip::ZipArchive::new(file)
                .map_err(|e| VaultError::Docx(format!("Failed to open DOCX: {}", e)))?;

            let mut content = String::new();
            archive.by_name("word/document.xml")
                .map_err(|_| VaultError::Docx("No document.xml found".to_string()))?
                .read_to_string(&mut content)?;

            Ok(DocumentText {
                title: None,
                paragraphs: paragraphs(&content)?,
            })
        }
    }

    /// One string per `w:p`, runs concatenated
    pub(crate) fn paragraphs(xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut in_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:tab" => current.push('\t'),
                    b"w:br" => current.push('\n'),
                    b"w:p" => paragraphs.push(String::new()),
                    _ => {}
                },
                Ok(Event::Text(t)) if in_text => {
                    let text = t.unescape()
                        .map_err(|e| VaultError::Docx(format!("Bad text in document.xml: {}", e)))?;
                    current.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(VaultError::Docx(format!(
                        "Malformed document.xml at {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
        }

        Ok(paragraphs)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;

        const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Service Agreement</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t xml:space="preserve">Between </w:t></w:r><w:r><w:t>A &amp; B</w:t></w:r></w:p>
    <w:p><w:r><w:t>Term</w:t><w:tab/><w:t>12 months</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        fn write_docx(path: &Path, document_xml: Option<&str>) {
            let file = std::fs::File::create(path).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(b"<Types/>").unwrap();
            if let Some(xml) = document_xml {
                zip.start_file("word/document.xml", options).unwrap();
                zip.write_all(xml.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }

        #[test]
        fn test_paragraph_extraction() {
            let paras = paragraphs(BODY).unwrap();
            assert_eq!(paras, vec!["Service Agreement", "", "Between A & B", "Term\t12 months"]);
        }

        #[test]
        fn test_read_docx_archive() {
            let tmp = tempfile::TempDir::new().unwrap();
            let path = tmp.path().join("agreement.docx");
            write_docx(&path, Some(BODY));

            let doc = DocxReader::new().read(&path).unwrap();
            assert_eq!(doc.title, None);
            assert_eq!(doc.paragraphs.len(), 4);
            assert_eq!(doc.paragraphs[0], "Service Agreement");
        }

        #[test]
        fn test_missing_document_xml() {
            let tmp = tempfile::TempDir::new().unwrap();
            let path = tmp.path().join("empty.docx");
            write_docx(&path, None);

            let err = DocxReader::new().read(&path).unwrap_err();
            assert!(err.to_string().contains("No document.xml found"));
        }

        #[test]
        fn test_not_a_zip() {
            let tmp = tempfile::TempDir::new().unwrap();
            let path = tmp.path().join("legacy.doc");
            std::fs::write(&path, b"\xD0\xCF\x11\xE0 binary word").unwrap();
            assert!(matches!(DocxReader::new().read(&path), Err(VaultError::Docx(_))));
        }
    }
}
