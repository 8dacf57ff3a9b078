//! Document ingestion: PDF extraction and chunking

mod chunker;
mod parser;
mod processor;

pub use chunker::TextChunker;
pub use parser::{extract_documents, extract_raw_text, ExtractedPdf, Extraction, PageText, PdfExtractor};
pub use processor::{IngestOutput, IngestPipeline};

#[cfg(test)]
#[path = "../../tests/common/pdf.rs"]
mod test_pdf;

#[cfg(test)]
pub(crate) use test_pdf::build_pdf;
