//! DOCX export: one body paragraph per line of the aggregated text.
//!
//! The document is a minimal WordprocessingML package (content types,
//! package relationships and `word/document.xml`) zipped in memory. Every
//! `\n`-delimited segment becomes one `<w:p>`, blank lines included, so the
//! blank-line separators between sections survive as empty paragraphs.
//! Markdown-looking markers (`1.`, `- `, `#`) are plain text; nothing is
//! styled.
//!
//! Inside a line, tabs become `<w:tab/>`, carriage returns become
//! `<w:br/>`, and characters XML 1.0 cannot carry are dropped.

use crate::error::NotesError;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// File name used when the caller does not choose one.
pub const DEFAULT_FILE_NAME: &str = "exam_notes.docx";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_TAIL: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// The paragraphs `export` will emit for `text`, in order.
///
/// Always `text.split('\n')`, so an empty string yields one empty paragraph.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Serialise `text` as a DOCX document and return its bytes.
pub fn export(text: &str) -> Result<Vec<u8>, NotesError> {
    let document_xml = document_xml(text);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, body) in [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/document.xml", document_xml.as_str()),
    ] {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())
            .map_err(|e| NotesError::ExportFailed(format!("{name}: {e}")))?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!("Exported DOCX: {} bytes", bytes.len());
    Ok(bytes)
}

/// Build `word/document.xml` for `text`.
pub fn document_xml(text: &str) -> String {
    let mut xml = String::with_capacity(DOCUMENT_HEAD.len() + DOCUMENT_TAIL.len() + text.len() * 2);
    xml.push_str(DOCUMENT_HEAD);
    for line in paragraphs(text) {
        push_paragraph(&mut xml, line);
    }
    xml.push_str(DOCUMENT_TAIL);
    xml
}

fn push_paragraph(xml: &mut String, line: &str) {
    if line.is_empty() {
        xml.push_str("<w:p/>");
        return;
    }

    xml.push_str("<w:p><w:r>");
    let mut run = String::new();
    for ch in line.chars() {
        match ch {
            '\t' => {
                flush_text(xml, &mut run);
                xml.push_str("<w:tab/>");
            }
            '\r' => {
                flush_text(xml, &mut run);
                xml.push_str("<w:br/>");
            }
            c if is_xml_char(c) => run.push(c),
            _ => {}
        }
    }
    flush_text(xml, &mut run);
    xml.push_str("</w:r></w:p>");
}

fn flush_text(xml: &mut String, run: &mut String) {
    if run.is_empty() {
        return;
    }
    xml.push_str(r#"<w:t xml:space="preserve">"#);
    escape_into(xml, run);
    xml.push_str("</w:t>");
    run.clear();
}

fn escape_into(xml: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '&' => xml.push_str("&amp;"),
            '<' => xml.push_str("&lt;"),
            '>' => xml.push_str("&gt;"),
            '"' => xml.push_str("&quot;"),
            '\'' => xml.push_str("&apos;"),
            c => xml.push(c),
        }
    }
}

/// XML 1.0 `Char` production, minus the whitespace handled separately.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn paragraph_count(xml: &str) -> usize {
        xml.matches("<w:p>").count() + xml.matches("<w:p/>").count()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut s = String::new();
        part.read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn paragraph_count_matches_split() {
        for text in ["", "one", "a\nb", "notes\n\n", "\n\n\n", "x\n\ny\n\nz\n\n"] {
            let xml = document_xml(text);
            assert_eq!(
                paragraph_count(&xml),
                text.split('\n').count(),
                "text: {text:?}"
            );
        }
    }

    #[test]
    fn blank_lines_become_empty_paragraphs() {
        let xml = document_xml("A\n\nB");
        assert!(xml.contains(
            r#"<w:p><w:r><w:t xml:space="preserve">A</w:t></w:r></w:p><w:p/><w:p><w:r><w:t xml:space="preserve">B</w:t></w:r></w:p>"#
        ));
    }

    #[test]
    fn markdown_markers_stay_literal() {
        let xml = document_xml("1. First\n- bullet\n# Heading");
        assert!(xml.contains(">1. First<"));
        assert!(xml.contains(">- bullet<"));
        assert!(xml.contains("># Heading<"));
        assert!(!xml.contains("w:pStyle"));
    }

    #[test]
    fn special_characters_are_escaped() {
        let xml = document_xml(r#"a < b && c > "d" 'e'"#);
        assert!(xml.contains("a &lt; b &amp;&amp; c &gt; &quot;d&quot; &apos;e&apos;"));
    }

    #[test]
    fn tabs_carriage_returns_and_control_chars() {
        let xml = document_xml("a\tb\r\u{1}c");
        assert!(xml.contains(
            r#"<w:t xml:space="preserve">a</w:t><w:tab/><w:t xml:space="preserve">b</w:t><w:br/><w:t xml:space="preserve">c</w:t>"#
        ));
        assert!(!xml.contains('\u{1}'));
    }

    #[test]
    fn export_produces_readable_package() {
        let bytes = export("🔹 Key Points\n- ATP\n\n").unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let doc = read_part(&bytes, "word/document.xml");
        assert!(doc.contains("🔹 Key Points"));
        assert_eq!(paragraph_count(&doc), 4);

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/word/document.xml"));
        let rels = read_part(&bytes, "_rels/.rels");
        assert!(rels.contains(r#"Target="word/document.xml""#));
    }

    #[test]
    fn export_is_deterministic_in_content() {
        let a = read_part(&export("same\ntext").unwrap(), "word/document.xml");
        let b = read_part(&export("same\ntext").unwrap(), "word/document.xml");
        assert_eq!(a, b);
    }
}
