//! Text extraction — converts uploaded bytes into a text string by declared
//! file type. Uploaded content lives only in memory for the duration of the
//! request; nothing is ever written to disk or any store.

pub mod text;

use docx_rs::read_docx;
use encoding_rs::{UTF_16BE, UTF_16LE};
use serde::Serialize;
use thiserror::Error;

use crate::models::document::FileType;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: '.{extension}'. Supported: .pdf, .docx, .doc, .txt")]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract text: {0}")]
    Parse(String),
}

/// Resolves the declared file name to a supported file type.
pub fn file_type_for(file_name: &str) -> Result<FileType, ExtractError> {
    let extension = FileType::extension_of(file_name);
    FileType::from_extension(&extension).ok_or(ExtractError::UnsupportedFormat { extension })
}

/// Extracts text from raw upload bytes. A well-formed document with no
/// extractable text (e.g. a scanned PDF) yields an empty string, not an
/// error — the caller decides what "nothing to analyze" means.
pub fn extract(bytes: &[u8], file_type: FileType) -> Result<String, ExtractError> {
    match file_type {
        FileType::Pdf => extract_pdf(bytes),
        FileType::Docx => extract_docx(bytes),
        FileType::Txt => Ok(decode_txt(bytes)),
    }
}

/// Per-page PDF extraction. Pages without text are skipped; remaining pages
/// are joined with a blank line.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Parse(format!("PDF parse error: {e}")))?;

    let parts: Vec<String> = pages
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    Ok(parts.join("\n\n"))
}

/// DOCX extraction: non-empty paragraph text one per line, followed by table
/// rows rendered as cell contents joined by " | ".
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx =
        read_docx(bytes).map_err(|e| ExtractError::Parse(format!("DOCX parse error: {e:?}")))?;

    let mut parts: Vec<String> = Vec::new();
    let mut table_parts: Vec<String> = Vec::new();

    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                let para_text = paragraph_text(para);
                if !para_text.trim().is_empty() {
                    parts.push(para_text);
                }
            }
            docx_rs::DocumentChild::Table(table) => {
                for row in &table.rows {
                    let docx_rs::TableChild::TableRow(row) = row;
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|cell| {
                            let docx_rs::TableRowChild::TableCell(cell) = cell;
                            cell_text(cell)
                        })
                        .filter(|c| !c.trim().is_empty())
                        .collect();
                    if !cells.is_empty() {
                        table_parts.push(cells.join(" | "));
                    }
                }
            }
            _ => {}
        }
    }

    parts.extend(table_parts);
    Ok(parts.join("\n"))
}

/// Paragraph → Run → Text is the path through the docx-rs tree. Runs within
/// a paragraph are parts of the same sentence, so no separator.
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut out = String::new();
    for child in &para.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let docx_rs::RunChild::Text(t) = rc {
                    out.push_str(&t.text);
                }
            }
        }
    }
    out
}

fn cell_text(cell: &docx_rs::TableCell) -> String {
    let mut out = String::new();
    for content in &cell.children {
        if let docx_rs::TableCellContent::Paragraph(para) = content {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(paragraph_text(para).trim());
        }
    }
    out.trim().to_string()
}

/// TXT decoding: utf-8 strict, then utf-16 (LE/BE, rejecting any decode
/// errors), then latin-1, which accepts every byte sequence.
fn decode_txt(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    for encoding in [UTF_16LE, UTF_16BE] {
        let (decoded, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return decoded.into_owned();
        }
    }

    encoding_rs::mem::decode_latin1(bytes).into_owned()
}

/// Basic file information, available without a full parse.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub file_name: String,
    pub file_type: Option<FileType>,
    pub file_size_kb: f64,
    pub supported: bool,
}

pub fn file_info(bytes: &[u8], file_name: &str) -> FileInfo {
    let file_type = FileType::from_extension(&FileType::extension_of(file_name));
    FileInfo {
        file_name: file_name.to_string(),
        file_type,
        file_size_kb: bytes.len() as f64 / 1024.0,
        supported: file_type.is_some(),
    }
}
