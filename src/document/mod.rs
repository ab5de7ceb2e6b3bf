//! Document reading and text extraction.
//!
//! Routes files to the right reader by extension: markdown and plain text are
//! read directly, PDFs go through `pdftotext` with an optional LLM cleanup
//! pass to strip extraction artifacts.

mod pdf;

pub use pdf::{extract_pdf_text, DocumentCleaner};

use crate::error::{PratError, Result};
use std::path::Path;
use tracing::{info, warn};

/// Read a single document and return its text content.
pub async fn read_file(path: &Path, cleaner: Option<&DocumentCleaner>) -> Result<String> {
    if !path.exists() {
        return Err(PratError::Document(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "md" | "markdown" | "txt" => Ok(tokio::fs::read_to_string(path).await?),
        "pdf" => {
            let raw = extract_pdf_text(path).await?;
            match cleaner {
                Some(cleaner) => match cleaner.clean(&raw).await {
                    Ok(cleaned) => Ok(cleaned),
                    Err(e) => {
                        // Cleanup is an enhancement, not a requirement
                        warn!("PDF cleanup failed, using raw extraction: {}", e);
                        Ok(raw)
                    }
                },
                None => Ok(raw),
            }
        }
        other => Err(PratError::InvalidInput(format!(
            "Unsupported file type: .{} (supported: .md, .txt, .pdf)",
            other
        ))),
    }
}

/// Extract and concatenate text from multiple documents.
///
/// Individual read failures are logged and skipped; it is an error only when
/// no file could be read at all.
pub async fn extract_text(paths: &[impl AsRef<Path>], cleaner: Option<&DocumentCleaner>) -> Result<String> {
    let mut texts = Vec::new();

    for path in paths {
        let path = path.as_ref();
        info!("Reading: {}", path.display());
        match read_file(path, cleaner).await {
            Ok(content) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("document");
                texts.push(format!("=== {} ===\n\n{}\n", name, content));
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
            }
        }
    }

    if texts.is_empty() {
        return Err(PratError::Document(
            "No input files were successfully read".to_string(),
        ));
    }

    Ok(texts.join("\n"))
}

/// Whether the path looks like a PDF (used for pre-flight tool checks).
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_markdown_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let md = dir.path().join("notes.md");
        std::fs::write(&md, "# Title\n\nBody text.").unwrap();

        let content = read_file(&md, None).await.unwrap();
        assert!(content.contains("Body text."));
    }

    #[tokio::test]
    async fn test_read_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let docx = dir.path().join("report.docx");
        std::fs::write(&docx, "not really a docx").unwrap();

        let result = read_file(&docx, None).await;
        assert!(matches!(result, Err(PratError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let result = read_file(Path::new("/nonexistent/file.md"), None).await;
        assert!(matches!(result, Err(PratError::Document(_))));
    }

    #[tokio::test]
    async fn test_extract_text_concatenates_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let mut f = std::fs::File::create(&a).unwrap();
        writeln!(f, "First document.").unwrap();
        let mut f = std::fs::File::create(&b).unwrap();
        writeln!(f, "Second document.").unwrap();

        let text = extract_text(&[&a, &b], None).await.unwrap();
        assert!(text.contains("=== a.txt ==="));
        assert!(text.contains("First document."));
        assert!(text.contains("=== b.txt ==="));
    }

    #[tokio::test]
    async fn test_extract_text_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        std::fs::write(&good, "readable").unwrap();
        let missing = dir.path().join("missing.txt");

        let text = extract_text(&[&good, &missing], None).await.unwrap();
        assert!(text.contains("readable"));

        let result = extract_text(&[&missing], None).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("paper.PDF")));
        assert!(!is_pdf(Path::new("paper.md")));
    }
}
