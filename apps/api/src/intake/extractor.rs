//! Document Text Extractor: plain text from an uploaded resume.
//!
//! PDF parsing is CPU-bound and `pdf_extract` can panic on hostile input, so it
//! runs under `tokio::task::spawn_blocking`; a panic surfaces as a `JoinError`
//! and is reported like any other parse failure.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// How far into the buffer the `%PDF-` marker may appear.
const PDF_HEADER_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum DocumentParseError {
    #[error("document is empty")]
    Empty,

    #[error("not a readable PDF: {0}")]
    Pdf(String),

    #[error("document contains no extractable text")]
    NoText,

    #[error("extraction task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: Bytes) -> Result<String, DocumentParseError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, DocumentParseError> {
        if document.is_empty() {
            return Err(DocumentParseError::Empty);
        }
        if !looks_like_pdf(&document) {
            return Err(DocumentParseError::Pdf("missing %PDF header".to_string()));
        }

        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&document))
            .await
            .map_err(|e| DocumentParseError::Task(e.to_string()))?
            .map_err(|e| DocumentParseError::Pdf(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(DocumentParseError::NoText);
        }
        Ok(text)
    }
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One page, one line of Helvetica text, with a correct xref table.
    fn single_page_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref = pdf.len();
        let size = objects.len() + 1;
        pdf.extend_from_slice(format!("xref\n0 {size}\n0000000000 65535 f \n").as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!("trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n")
                .as_bytes(),
        );
        pdf
    }

    #[tokio::test]
    async fn test_extracts_text_from_valid_pdf() {
        let pdf = single_page_pdf("5 years React and Node developer");
        let text = PdfTextExtractor.extract(Bytes::from(pdf)).await.unwrap();
        assert!(
            text.contains("5 years React and Node developer"),
            "unexpected text: {text:?}"
        );
    }

    #[test]
    fn test_pdf_header_detection() {
        assert!(looks_like_pdf(b"%PDF-1.7\n..."));
        assert!(looks_like_pdf(b"\xEF\xBB\xBF%PDF-1.4"));
        assert!(!looks_like_pdf(b"PK\x03\x04 docx archive"));

        let mut late = vec![b' '; PDF_HEADER_WINDOW + 10];
        late.extend_from_slice(b"%PDF-1.4");
        assert!(!looks_like_pdf(&late));
    }

    #[tokio::test]
    async fn test_empty_document_rejected() {
        let err = PdfTextExtractor.extract(Bytes::new()).await.unwrap_err();
        assert!(matches!(err, DocumentParseError::Empty));
    }

    #[tokio::test]
    async fn test_non_pdf_rejected_without_parsing() {
        let err = PdfTextExtractor
            .extract(Bytes::from_static(b"just some plain text"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentParseError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_truncated_pdf_is_a_parse_error() {
        let result = PdfTextExtractor
            .extract(Bytes::from_static(b"%PDF-1.4\n1 0 obj\n<<"))
            .await;
        assert!(matches!(
            result,
            Err(DocumentParseError::Pdf(_))
                | Err(DocumentParseError::Task(_))
                | Err(DocumentParseError::NoText)
        ));
    }
}
