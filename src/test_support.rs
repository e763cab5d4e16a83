// src/test_support.rs
// Fixture builders and a deterministic extractor shared by the unit tests.
use crate::extractors::{CandidateProfile, Extractor};
use crate::utils::error::ExtractError;
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Writes a one-page PDF showing `text` in Courier.
pub fn write_pdf(path: &Path, text: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Writes a DOCX with one paragraph per entry of `paragraphs`.
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let mut docx = docx_rs::Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(*text)));
    }
    let file = File::create(path).unwrap();
    docx.build().pack(file).unwrap();
}

/// Extractor that derives a profile from the text itself and records each call.
///
/// The first non-empty line becomes the name and the first token containing
/// `@` becomes the email. Texts containing `fail_marker` produce an error.
#[derive(Default)]
pub struct StubExtractor {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    fail_marker: Option<String>,
}

impl StubExtractor {
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// First line of every text the stub was asked to extract, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn extract(&self, text: &str) -> Result<CandidateProfile, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let first_line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or_default();
        self.seen.lock().unwrap().push(first_line.to_string());

        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(ExtractError::Api {
                    status: 500,
                    message: "stubbed failure".to_string(),
                });
            }
        }

        Ok(CandidateProfile {
            full_name: first_line.to_string(),
            email: text
                .split_whitespace()
                .find(|token| token.contains('@'))
                .unwrap_or_default()
                .to_string(),
            ..CandidateProfile::default()
        })
    }
}
