//! PDF rendering of laid-out documents using lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, ObjectId, Stream, StringFormat};
use std::fs;
use std::path::{Path, PathBuf};

use super::metrics::MM_PER_PT;
use super::{Document, ExportError, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::utils::sanitize_filename;

const FONT_NAME: &str = "F1";

/// Convert millimetres to PDF points
fn pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

/// Encode text for a WinAnsiEncoding simple font.
///
/// Characters outside the code page become `?`, except the arrow used in
/// plan lines which is spelled `->`.
fn win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c as u8),
            '\u{a0}'..='\u{ff}' => out.push(c as u32 as u8),
            '→' => out.extend_from_slice(b"->"),
            '•' => out.push(0x95),
            '€' => out.push(0x80),
            '…' => out.push(0x85),
            '‘' => out.push(0x91),
            '’' => out.push(0x92),
            '“' => out.push(0x93),
            '”' => out.push(0x94),
            '–' => out.push(0x96),
            '—' => out.push(0x97),
            '\t' => out.push(b' '),
            _ => out.push(b'?'),
        }
    }
    out
}

fn page_content(page: &Page) -> Content {
    let mut operations = Vec::new();

    for block in page.blocks.iter().filter(|b| !b.text.is_empty()) {
        let baseline = PAGE_HEIGHT - block.y;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![FONT_NAME.into(), block.font_size.into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![pt(block.x).into(), pt(baseline).into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(&block.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

/// Render `document` to PDF bytes, one A4 page per layout page.
pub fn render_pdf(document: &Document) -> Result<Vec<u8>, ExportError> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_NAME => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = page_content(page)
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), pt(PAGE_WIDTH).into(), pt(PAGE_HEIGHT).into()],
    };
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf_info(&mut pdf, &document.title);
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn pdf_info(pdf: &mut lopdf::Document, title: &str) -> ObjectId {
    pdf.add_object(dictionary! {
        "Title" => Object::String(win_ansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal(format!("studyos {}", crate::VERSION)),
    })
}

/// Render `document` and write it into `dir` under its file name.
///
/// The directory is created if missing. Returns the written path.
pub fn save(document: &Document, dir: &Path) -> Result<PathBuf, ExportError> {
    match sanitize_filename(&document.file_name) {
        Ok(name) if name == document.file_name => {}
        _ => return Err(ExportError::InvalidFileName(document.file_name.clone())),
    }
    let bytes = render_pdf(document)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(&document.file_name);
    fs::write(&path, bytes)?;

    tracing::info!(
        "Saved {} page(s) to {}",
        document.page_count(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export;
    use crate::models::{PlanEntry, RevisionNotes, StudyResult};

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(win_ansi("Day 1 → Optics"), b"Day 1 -> Optics".to_vec());
        assert_eq!(win_ansi("• x"), vec![0x95, b' ', b'x']);
        assert_eq!(win_ansi("café"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(win_ansi("漢"), b"?".to_vec());
    }

    #[test]
    fn test_render_produces_pdf_with_all_pages() {
        let entries: Vec<_> = (1..=80)
            .map(|d| PlanEntry::new(d, format!("Revise chapter {}", d)))
            .collect();
        let doc = export("", &StudyResult::Plan(entries));
        let bytes = render_pdf(&doc).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), doc.page_count());
    }

    #[test]
    fn test_save_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = StudyResult::Notes(RevisionNotes {
            summary: "Light bends at boundaries.".to_string(),
            key_points: vec!["Snell's law".to_string()],
            formulas: vec!["n1 sin a = n2 sin b".to_string()],
        });
        let doc = export("Optics", &result);

        let path = save(&doc, &dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "Optics_Revision_Notes.pdf");
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_save_long_multibyte_topic() {
        let dir = tempfile::tempdir().unwrap();
        let result = StudyResult::Notes(RevisionNotes {
            summary: "波粒二象性".to_string(),
            key_points: vec![],
            formulas: vec![],
        });
        let doc = export(&"量子力学".repeat(25), &result);

        let path = save(&doc, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.len() <= 255);
        assert!(name.ends_with("_Revision_Notes.pdf"));
        assert!(path.is_file());
    }

    #[test]
    fn test_save_rejects_path_in_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = export("", &StudyResult::Plan(vec![PlanEntry::new(1, "x")]));
        doc.file_name = "../escape.pdf".to_string();

        let err = save(&doc, dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::InvalidFileName(_)));
    }
}
