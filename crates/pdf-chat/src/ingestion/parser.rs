//! PDF text extraction, page by page

use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{DocumentSummary, RawText, UploadedDocument};

/// Upper bound for the whole-document fallback extractor
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// Text of a single PDF page
#[derive(Debug, Clone)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Extracted text
    pub content: String,
}

/// Text extracted from one PDF
#[derive(Debug, Clone)]
pub struct ExtractedPdf {
    /// Pages in the document
    pub total_pages: u32,
    /// Pages that produced text, in page order
    pub pages: Vec<PageText>,
}

/// Raw text of a batch plus what each document contributed
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub raw: RawText,
    pub documents: Vec<DocumentSummary>,
}

/// PDF text extractor
pub struct PdfExtractor;

impl PdfExtractor {
    /// Extract the text of every page in order.
    ///
    /// Pages that fail to yield text are skipped. A file that cannot be
    /// opened as a PDF is an error.
    pub fn extract(filename: &str, data: &[u8]) -> Result<ExtractedPdf> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::pdf_parse(filename, e.to_string()))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let total_pages = page_numbers.len() as u32;
        let mut pages = Vec::with_capacity(page_numbers.len());

        for page_number in page_numbers {
            match doc.extract_text(&[page_number]) {
                Ok(text) => {
                    let content = clean_page_text(&text);
                    // A text block without glyphs still extracts as "\n".
                    if !content.trim().is_empty() {
                        pages.push(PageText {
                            page_number,
                            content,
                        });
                    }
                }
                Err(e) => {
                    tracing::debug!("{}: no text on page {}: {}", filename, page_number, e);
                }
            }
        }

        if pages.is_empty() && total_pages > 0 {
            tracing::debug!("{}: page extraction found no text, trying whole-document fallback", filename);
            if let Some(content) = Self::extract_fallback(filename, data) {
                pages.push(PageText {
                    page_number: 1,
                    content,
                });
            }
        }

        Ok(ExtractedPdf { total_pages, pages })
    }

    /// Whole-document extraction with pdf-extract, isolated in a thread
    /// because it can panic or stall on unusual fonts
    fn extract_fallback(filename: &str, data: &[u8]) -> Option<String> {
        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(FALLBACK_TIMEOUT) {
            Ok(Ok(text)) => {
                let _ = handle.join();
                let content = clean_page_text(&text);
                (!content.trim().is_empty()).then_some(content)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("{}: fallback extraction failed: {}", filename, e);
                None
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!("{}: fallback extraction timed out after {:?}", filename, FALLBACK_TIMEOUT);
                None
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("{}: fallback extraction thread crashed", filename);
                None
            }
        }
    }
}

/// Concatenate the text of every page of every document, in upload order.
///
/// An empty document list yields an empty [`RawText`].
pub fn extract_raw_text(documents: &[UploadedDocument]) -> Result<RawText> {
    Ok(extract_documents(documents)?.raw)
}

/// Like [`extract_raw_text`], also reporting per-document results.
///
/// Byte-identical uploads within the batch are extracted once.
pub fn extract_documents(documents: &[UploadedDocument]) -> Result<Extraction> {
    let mut extraction = Extraction::default();
    let mut seen = HashSet::new();

    for document in documents {
        let content_hash = document.content_hash();
        let file_size = document.data.len() as u64;

        if !seen.insert(content_hash.clone()) {
            tracing::info!("Skipping duplicate upload: {}", document.filename);
            extraction.documents.push(DocumentSummary {
                filename: document.filename.clone(),
                content_hash,
                file_size,
                total_pages: 0,
                pages_with_text: 0,
                characters: 0,
                duplicate: true,
            });
            continue;
        }

        let before = extraction.raw.char_len();
        let pdf = PdfExtractor::extract(&document.filename, &document.data)?;
        for page in &pdf.pages {
            extraction
                .raw
                .push_page(&document.filename, page.page_number, &page.content);
        }
        let characters = extraction.raw.char_len() - before;

        tracing::info!(
            "Extracted '{}': {}/{} pages with text, {} characters",
            document.filename,
            pdf.pages.len(),
            pdf.total_pages,
            characters
        );

        extraction.documents.push(DocumentSummary {
            filename: document.filename.clone(),
            content_hash,
            file_size,
            total_pages: pdf.total_pages,
            pages_with_text: pdf.pages.len() as u32,
            characters,
            duplicate: false,
        });
    }

    Ok(extraction)
}

/// Strip characters that carry no text
fn clean_page_text(text: &str) -> String {
    text.replace('\0', "")
}
