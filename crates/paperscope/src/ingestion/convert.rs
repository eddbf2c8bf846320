//! Document conversion boundary (PDF bytes to text)

use crate::error::{Error, Result};

/// External document-conversion capability
///
/// Turns raw uploaded bytes into Markdown-like text with structural markup
/// preserved. Failures surface as `ConversionFailed` and are not retried.
pub trait DocumentConverter: Send + Sync {
    /// Convert raw bytes to text
    fn convert(&self, data: &[u8], filename: &str) -> Result<String>;

    /// Converter name for logging
    fn name(&self) -> &str;
}

/// PDF text extraction via `pdf-extract`
pub struct PdfConverter;

impl PdfConverter {
    /// Create a new PDF converter
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter for PdfConverter {
    fn convert(&self, data: &[u8], filename: &str) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::conversion(format!("'{}': {}", filename, e)))?;

        let text = normalize_extracted_text(&text);
        if text.trim().is_empty() {
            return Err(Error::conversion(format!(
                "'{}': no extractable text (scanned or image-only PDF?)",
                filename
            )));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

/// Clean up extracted PDF text
///
/// Replaces ligatures and typographic punctuation that PDF fonts emit as
/// single glyphs, and collapses runs of blank lines so paragraph boundaries
/// stay meaningful for the chunker.
fn normalize_extracted_text(text: &str) -> String {
    let replaced = text
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2013}', "-")
        .replace('\u{2014}', "--")
        .replace('\u{00A0}', " ");

    // Collapse 3+ consecutive newlines down to a single paragraph break
    let mut out = String::with_capacity(replaced.len());
    let mut blank_run = 0usize;
    for line in replaced.split_inclusive('\n') {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
    }
    out
}
