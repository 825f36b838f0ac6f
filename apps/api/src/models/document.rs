use serde::{Deserialize, Serialize};

/// Upload formats the extractor accepts. `.doc` is treated as `Docx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
}

impl FileType {
    /// Maps a lowercased file extension (without the dot) to a file type.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "pdf" => Some(FileType::Pdf),
            "docx" | "doc" => Some(FileType::Docx),
            "txt" => Some(FileType::Txt),
            _ => None,
        }
    }

    /// Extension portion of a file name, lowercased, without the dot.
    pub fn extension_of(file_name: &str) -> String {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }
}

/// A detected section of the resume. Indices into the cleaned text are
/// informational and may stay 0 when not computed. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub end_index: usize,
}

impl Section {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            start_index: 0,
            end_index: 0,
        }
    }
}

/// One parsed upload. `raw_text` holds the normalized extraction output;
/// `word_count` is derived once at construction and never recomputed.
/// `sections` starts empty and is populated exactly once by the section
/// detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub raw_text: String,
    pub file_name: String,
    pub file_type: FileType,
    pub sections: Vec<Section>,
    pub word_count: usize,
}

impl Document {
    pub fn new(raw_text: String, file_name: String, file_type: FileType) -> Self {
        let word_count = raw_text.split_whitespace().count();
        Self {
            raw_text,
            file_name,
            file_type,
            sections: Vec::new(),
            word_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_extension() {
        assert_eq!(FileType::from_extension("pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_extension("docx"), Some(FileType::Docx));
        assert_eq!(FileType::from_extension("doc"), Some(FileType::Docx));
        assert_eq!(FileType::from_extension("txt"), Some(FileType::Txt));
        assert_eq!(FileType::from_extension("png"), None);
        assert_eq!(FileType::from_extension(""), None);
    }

    #[test]
    fn test_extension_of_lowercases() {
        assert_eq!(FileType::extension_of("Resume.PDF"), "pdf");
        assert_eq!(FileType::extension_of("cv.tar.docx"), "docx");
        assert_eq!(FileType::extension_of("no_extension"), "");
    }

    #[test]
    fn test_word_count_derived_at_construction() {
        let doc = Document::new(
            "one two  three\nfour".to_string(),
            "cv.txt".to_string(),
            FileType::Txt,
        );
        assert_eq!(doc.word_count, 4);
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn test_empty_document_has_zero_words() {
        let doc = Document::new(String::new(), "cv.txt".to_string(), FileType::Txt);
        assert_eq!(doc.word_count, 0);
    }
}
