//! Input resolution and text extraction.
//!
//! An input is classified purely by file extension: `.pdf` (any case) is
//! treated as a PDF and read page by page, everything else is read as plain
//! text with lenient decoding. There is no content sniffing — a misnamed
//! file produces garbage text downstream rather than an error.

use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "pdf")]
    #[error("failed to read PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[cfg(not(feature = "pdf"))]
    #[error(
        "PDF support is not compiled into this build. \
         Reinstall with the `pdf` feature enabled: \
         `cargo install readaloud --features pdf`"
    )]
    PdfSupportMissing,
}

/// How an input file will be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Text,
}

impl InputKind {
    /// Classify a path by extension, ASCII case-insensitive.
    pub fn from_path(path: &Path) -> Self {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            InputKind::Pdf
        } else {
            InputKind::Text
        }
    }
}

/// A validated input file: the path exists and its kind is fixed.
#[derive(Debug, Clone)]
pub struct InputDocument {
    path: PathBuf,
    kind: InputKind,
}

/// Validate that `path` exists and classify it.
pub fn resolve_input(path: &Path) -> Result<InputDocument, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::InputNotFound(path.to_path_buf()));
    }
    Ok(InputDocument {
        path: path.to_path_buf(),
        kind: InputKind::from_path(path),
    })
}

impl InputDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Extract the document's text as a single trimmed string.
    ///
    /// An empty string is a valid result; the synthesizer substitutes a
    /// placeholder phrase for it later.
    pub fn read_text(&self) -> Result<String, ExtractError> {
        match self.kind {
            InputKind::Pdf => extract_pdf_text(&self.path),
            InputKind::Text => read_plain_text(&self.path),
        }
    }
}

/// Read a plain-text file, replacing undecodable byte sequences instead of
/// failing.
fn read_plain_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}

/// Extract text from every page of a PDF, in document order.
///
/// A page whose extraction fails contributes an empty string rather than
/// aborting the document; pages are joined with a newline and the final
/// result is trimmed.
#[cfg(feature = "pdf")]
fn extract_pdf_text(path: &Path) -> Result<String, ExtractError> {
    let doc = lopdf::Document::load(path)?;
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    log::debug!("extracting text from {} pages", page_numbers.len());

    let mut pages = Vec::with_capacity(page_numbers.len());
    for number in page_numbers {
        let text = match doc.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("page {number}: text extraction failed ({e}), skipping its text");
                String::new()
            }
        };
        pages.push(text);
    }

    Ok(pages.join("\n").trim().to_string())
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf_text(_path: &Path) -> Result<String, ExtractError> {
    Err(ExtractError::PdfSupportMissing)
}

#[cfg(test)]
mod tests {
    use super::{resolve_input, ExtractError, InputKind};
    use std::io::Write;
    use std::path::Path;

    #[test]
    fn classifies_by_extension_case_insensitively() {
        assert_eq!(InputKind::from_path(Path::new("a.pdf")), InputKind::Pdf);
        assert_eq!(InputKind::from_path(Path::new("a.PDF")), InputKind::Pdf);
        assert_eq!(InputKind::from_path(Path::new("a.txt")), InputKind::Text);
        assert_eq!(InputKind::from_path(Path::new("a.md")), InputKind::Text);
        assert_eq!(InputKind::from_path(Path::new("noext")), InputKind::Text);
    }

    #[test]
    fn missing_input_is_reported() {
        let err = resolve_input(Path::new("definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::InputNotFound(_)));
    }

    #[test]
    fn reads_and_trims_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "  hello from a text file \n\n").unwrap();

        let input = resolve_input(&path).unwrap();
        assert_eq!(input.kind(), InputKind::Text);
        assert_eq!(input.read_text().unwrap(), "hello from a text file");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"valid \xFF\xFE text").unwrap();
        drop(file);

        let text = resolve_input(&path).unwrap().read_text().unwrap();
        assert!(text.starts_with("valid"));
        assert!(text.ends_with("text"));
    }

    #[test]
    fn whitespace_only_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, " \n\t \n").unwrap();

        assert_eq!(resolve_input(&path).unwrap().read_text().unwrap(), "");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn extracts_pdf_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        write_two_page_pdf(&path, "Alpha page", "Omega page");

        let input = resolve_input(&path).unwrap();
        assert_eq!(input.kind(), InputKind::Pdf);

        let text = input.read_text().unwrap();
        let first = text.find("Alpha").expect("first page text missing");
        let second = text.find("Omega").expect("second page text missing");
        assert!(first < second, "pages out of order: {text:?}");
    }

    /// Build a minimal two-page PDF with one line of text per page.
    #[cfg(feature = "pdf")]
    fn write_two_page_pdf(path: &Path, first: &str, second: &str) {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for line in [first, second] {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }
}
