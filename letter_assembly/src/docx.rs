//! Minimal Word-compatible (.docx) container writer.
//!
//! A .docx file is a ZIP package of WordprocessingML parts. Only the parts
//! Word needs to open the file are emitted: the content types, the package
//! relationships, the document body and a style sheet pinning the Normal
//! font.

use std::io::{Cursor, Write};

use snafu::prelude::*;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::{PackagingError, ZipEntrySnafu, ZipFinishSnafu, ZipWriteSnafu};
use crate::render::Paragraph;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

const DOCUMENT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#,
);

const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal">"#,
    r#"<w:name w:val="Normal"/>"#,
    r#"<w:rPr><w:rFonts w:ascii="Roboto" w:hAnsi="Roboto"/></w:rPr>"#,
    r#"</w:style>"#,
    r#"</w:styles>"#,
);

const DOCUMENT_HEAD: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:body>"#,
);

const DOCUMENT_TAIL: &str = r#"</w:body></w:document>"#;

/// Packages paragraphs into .docx bytes. Entry order and timestamps are
/// fixed, so identical input gives identical bytes.
pub fn write_docx(paragraphs: &[Paragraph]) -> Result<Vec<u8>, PackagingError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/document.xml", document_xml(paragraphs)),
        ("word/styles.xml", STYLES.to_string()),
    ];
    for (name, data) in parts {
        writer
            .start_file(name, options)
            .context(ZipEntrySnafu { name })?;
        writer.write_all(data.as_bytes()).context(ZipWriteSnafu)?;
    }
    let cursor = writer.finish().context(ZipFinishSnafu)?;
    Ok(cursor.into_inner())
}

fn document_xml(paragraphs: &[Paragraph]) -> String {
    let mut xml = String::from(DOCUMENT_HEAD);
    for paragraph in paragraphs {
        if paragraph.text.is_empty() {
            xml.push_str("<w:p/>");
            continue;
        }
        xml.push_str("<w:p><w:r>");
        if paragraph.bold {
            xml.push_str("<w:rPr><w:b/></w:rPr>");
        }
        xml.push_str("<w:t xml:space=\"preserve\">");
        xml.push_str(&xml_escape(&paragraph.text));
        xml.push_str("</w:t></w:r></w:p>");
    }
    xml.push_str(DOCUMENT_TAIL);
    xml
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn paragraphs() -> Vec<Paragraph> {
        vec![
            Paragraph {
                text: "Date: Mar 01, 2023".to_string(),
                bold: true,
            },
            Paragraph {
                text: String::new(),
                bold: false,
            },
            Paragraph {
                text: "Fish & Chips <--".to_string(),
                bold: false,
            },
        ]
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut text = String::new();
        part.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn package_has_the_expected_parts() {
        let bytes = write_docx(&paragraphs()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"[Content_Types].xml"));
        assert!(names.contains(&"word/document.xml"));
        assert!(names.contains(&"word/styles.xml"));
    }

    #[test]
    fn text_is_escaped_and_emphasis_kept() {
        let bytes = write_docx(&paragraphs()).unwrap();
        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains("Fish &amp; Chips &lt;--"));
        assert!(document.contains("<w:rPr><w:b/></w:rPr>"));
        assert!(document.contains("<w:p/>"));
    }

    #[test]
    fn identical_input_gives_identical_bytes() {
        assert_eq!(
            write_docx(&paragraphs()).unwrap(),
            write_docx(&paragraphs()).unwrap()
        );
    }

    #[test]
    fn normal_style_pins_the_font() {
        let bytes = write_docx(&[]).unwrap();
        let styles = read_part(&bytes, "word/styles.xml");
        assert!(styles.contains(r#"w:ascii="Roboto""#));
    }
}
