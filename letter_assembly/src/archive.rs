//! Per-electorate document collection and archive packaging.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use log::{debug, warn};
use snafu::prelude::*;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::docx;
use crate::errors::{PackagingError, RenderError, ZipEntrySnafu, ZipFinishSnafu, ZipWriteSnafu};
use crate::grouping::ElectorateGroup;
use crate::render::{self, DocumentTemplate};

/// One generated document, named and ready to be archived. Owned by the
/// archive until it is written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// The documents of one run, electorate by electorate, in rendering order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: BTreeMap<String, Vec<RenderedDocument>>,
}

impl Archive {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<RenderedDocument>)> {
        self.entries.iter()
    }

    pub fn documents(&self, electorate: &str) -> Option<&[RenderedDocument]> {
        self.entries.get(electorate).map(|docs| docs.as_slice())
    }

    pub fn document_count(&self) -> usize {
        self.entries.values().map(|docs| docs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Packages every document into one ZIP archive. Documents are written
    /// in electorate order then sequence order, so identical content gives
    /// identical archive bytes.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>, PackagingError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for documents in self.entries.values() {
            for document in documents {
                writer
                    .start_file(document.file_name.as_str(), options)
                    .context(ZipEntrySnafu {
                        name: document.file_name.clone(),
                    })?;
                writer.write_all(&document.content).context(ZipWriteSnafu)?;
            }
        }
        let cursor = writer.finish().context(ZipFinishSnafu)?;
        Ok(cursor.into_inner())
    }
}

/// The archive of one run plus one error per record that failed to render.
#[derive(Debug)]
pub struct ArchiveOutcome {
    pub archive: Archive,
    pub failures: Vec<RenderError>,
}

/// Renders every record of every group in sorted order and collects the
/// named documents. A failed record is recorded and skipped; it never
/// aborts the rest of the archive.
pub fn build(
    groups: &BTreeMap<String, ElectorateGroup>,
    template: &DocumentTemplate,
) -> ArchiveOutcome {
    let mut archive = Archive::default();
    let mut failures: Vec<RenderError> = Vec::new();
    for (electorate, group) in groups {
        let mut documents: Vec<RenderedDocument> = Vec::new();
        for (idx, record) in group.records.iter().enumerate() {
            // The sequence number comes from the sorted position, not from
            // rendering completion order.
            let position = idx + 1;
            let file_name = document_file_name(electorate, position);
            let paragraphs = match render::render_paragraphs(record, template) {
                Ok(paragraphs) => paragraphs,
                Err(source) => {
                    warn!("build: skipping {}: {}", file_name, source);
                    failures.push(RenderError::Substitution {
                        electorate: electorate.clone(),
                        position,
                        source,
                    });
                    continue;
                }
            };
            match docx::write_docx(&paragraphs) {
                Ok(content) => documents.push(RenderedDocument { file_name, content }),
                Err(source) => {
                    warn!("build: skipping {}: {}", file_name, source);
                    failures.push(RenderError::DocumentPackaging {
                        electorate: electorate.clone(),
                        position,
                        source,
                    });
                }
            }
        }
        if !documents.is_empty() {
            archive.entries.insert(electorate.clone(), documents);
        }
    }
    debug!(
        "build: {} documents, {} failures",
        archive.document_count(),
        failures.len()
    );
    ArchiveOutcome { archive, failures }
}

/// `East_001.docx`, `East_002.docx`, ... The sequence is 1-based over the
/// group's sorted order. Characters that are unsafe in file names are
/// dropped from the electorate part.
fn document_file_name(electorate: &str, position: usize) -> String {
    let clean: String = electorate
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    format!("{}_{:03}.docx", clean.trim(), position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_records;
    use crate::record::LetterRecord;
    use chrono::NaiveDate;

    fn record(electorate: &str, day: u32, body: &str) -> LetterRecord {
        LetterRecord {
            electorate: electorate.to_string(),
            mp_identifier: "Smith".to_string(),
            salutation: "Dear Ms Smith".to_string(),
            display_name: "Jane Smith".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 3, day).unwrap(),
            body_template: body.to_string(),
        }
    }

    #[test]
    fn documents_are_named_by_sorted_position() {
        let groups = group_records(vec![
            record("East", 9, "{{salutation}}"),
            record("East", 3, "{{salutation}}"),
            record("West", 1, "{{salutation}}"),
        ]);
        let outcome = build(&groups, &DocumentTemplate::default_letter());
        assert!(outcome.failures.is_empty());
        let east: Vec<&str> = outcome
            .archive
            .documents("East")
            .unwrap()
            .iter()
            .map(|d| d.file_name.as_str())
            .collect();
        assert_eq!(east, vec!["East_001.docx", "East_002.docx"]);
        assert_eq!(outcome.archive.document_count(), 3);
    }

    #[test]
    fn a_failed_record_is_skipped_not_fatal() {
        let groups = group_records(vec![
            record("East", 3, "{{body}}"),
            record("East", 9, "{{salutation}}"),
        ]);
        let outcome = build(&groups, &DocumentTemplate::default_letter());
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(
            outcome.failures[0],
            RenderError::Substitution { position: 1, .. }
        ));
        // The surviving record keeps its sorted position number.
        let east: Vec<&str> = outcome
            .archive
            .documents("East")
            .unwrap()
            .iter()
            .map(|d| d.file_name.as_str())
            .collect();
        assert_eq!(east, vec!["East_002.docx"]);
    }

    #[test]
    fn unsafe_characters_are_dropped_from_names() {
        assert_eq!(document_file_name("A/B:C?", 7), "ABC_007.docx");
    }

    #[test]
    fn empty_groups_give_an_empty_archive() {
        let outcome = build(&BTreeMap::new(), &DocumentTemplate::default_letter());
        assert!(outcome.archive.is_empty());
        assert!(outcome.failures.is_empty());
        // An empty archive still zips into a valid (empty) container.
        assert!(!outcome.archive.to_zip_bytes().unwrap().is_empty());
    }

    #[test]
    fn archive_bytes_are_deterministic() {
        let groups = group_records(vec![
            record("East", 3, "{{salutation}}"),
            record("West", 1, "hello"),
        ]);
        let a = build(&groups, &DocumentTemplate::default_letter());
        let b = build(&groups, &DocumentTemplate::default_letter());
        assert_eq!(
            a.archive.to_zip_bytes().unwrap(),
            b.archive.to_zip_bytes().unwrap()
        );
    }
}
