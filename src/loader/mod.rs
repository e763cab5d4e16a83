// src/loader/mod.rs
use crate::utils::error::LoadError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

// PDF text tends to come out with long runs of empty lines between blocks
static BLANK_LINE_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[ \t\r]*\n){3,}").expect("Failed to compile BLANK_LINE_RUN_RE")
});

/// Source formats the loader knows how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Maps a file extension (without the dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(DocumentFormat::PlainText),
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Reads the document at `path` and returns its text content.
///
/// Dispatches on the file extension. Fails with `UnsupportedFormat` for
/// anything other than `.txt`, `.pdf` or `.docx`, and with `Read` when the file
/// cannot be read, is corrupt, or holds no extractable text.
pub fn load(path: &Path) -> Result<String, LoadError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })?;

    tracing::debug!("Loading {} as {:?}", path.display(), format);

    let bytes = fs::read(path).map_err(|e| LoadError::read(path, e))?;

    let text = match format {
        DocumentFormat::PlainText => read_plain_text(path, bytes)?,
        DocumentFormat::Pdf => read_pdf(path, &bytes)?,
        DocumentFormat::Docx => read_docx(path, &bytes)?,
    };

    if text.trim().is_empty() {
        return Err(LoadError::read(path, "document contains no extractable text"));
    }

    tracing::debug!("Loaded {} characters from {}", text.len(), path.display());
    Ok(text)
}

fn read_plain_text(path: &Path, bytes: Vec<u8>) -> Result<String, LoadError> {
    String::from_utf8(bytes).map_err(|e| LoadError::read(path, format!("invalid UTF-8: {}", e)))
}

fn read_pdf(path: &Path, bytes: &[u8]) -> Result<String, LoadError> {
    // pdf-extract panics on some malformed fonts and streams instead of erroring
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| LoadError::read(path, "PDF parser panicked on malformed document"))?;

    let text = result.map_err(|e| LoadError::read(path, format!("corrupt PDF: {}", e)))?;
    Ok(BLANK_LINE_RUN_RE.replace_all(&text, "\n\n").into_owned())
}

fn read_docx(path: &Path, bytes: &[u8]) -> Result<String, LoadError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| LoadError::read(path, format!("corrupt DOCX: {}", e)))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_docx, write_pdf};
    use tempfile::tempdir;

    #[test]
    fn test_format_dispatch_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/CV.PDF")), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_path(Path::new("cv.Docx")), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_path(Path::new("cv.txt")), Some(DocumentFormat::PlainText));
        assert_eq!(DocumentFormat::from_path(Path::new("cv.doc")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_load_plain_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alice.txt");
        fs::write(&path, "Alice Smith\nalice@example.com\n").unwrap();

        let text = load(&path).unwrap();
        assert!(text.contains("alice@example.com"));
    }

    #[test]
    fn test_load_pdf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dave.pdf");
        write_pdf(&path, "Dave Jones Rust Engineer");

        let text = load(&path).unwrap();
        assert!(!text.trim().is_empty());
        assert!(text.contains("Dave"), "unexpected PDF text: {:?}", text);
    }

    #[test]
    fn test_load_docx_keeps_paragraphs_on_separate_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("carol.docx");
        write_docx(&path, &["Carol White", "carol@example.com", "Skills: Go, SQL"]);

        let text = load(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Carol White", "carol@example.com", "Skills: Go, SQL"]);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.rtf");
        fs::write(&path, "{\\rtf1 hello}").unwrap();

        match load(&path) {
            Err(LoadError::UnsupportedFormat { extension, .. }) => assert_eq!(extension, "rtf"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_pdf_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bob.pdf");
        fs::write(&path, b"this is not a pdf at all").unwrap();

        assert!(matches!(load(&path), Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_corrupt_docx_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        fs::write(&path, b"PK not really a zip").unwrap();

        assert!(matches!(load(&path), Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(load(&dir.path().join("ghost.txt")), Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_whitespace_only_document_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, "  \n\t\n").unwrap();

        assert!(matches!(load(&path), Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        let collapsed = BLANK_LINE_RUN_RE.replace_all("a\n\n\n\n b\n\nc", "\n\n");
        assert_eq!(collapsed, "a\n\n b\n\nc");
    }
}
