//! Resolution of MP identifiers into formal salutations.
//!
//! The lookup table is an externally-owned collaborator: it is built once
//! by the caller, passed into the pipeline and never mutated during a run.

use std::collections::HashMap;

use snafu::prelude::*;

use crate::errors::{UnresolvedMpError, UnresolvedMpSnafu};

/// One row of the MP lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpEntry {
    /// The honorific recorded for this MP ("Mr", "Ms", "Senator", ...).
    /// May be empty, in which case the directory default applies.
    pub honorific: String,
    pub first_name: String,
    pub surname: String,
}

/// A resolved identifier: the letter greeting plus the name used for
/// display and placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salutation {
    /// e.g. "Dear Ms Smith"
    pub salutation: String,
    /// e.g. "Jane Smith"
    pub display_name: String,
}

// Titles that may prefix an identifier in the letters input, longest first
// so that "Mrs" is never read as "Mr" plus a stray letter. The second
// element is the canonical spelling used in the salutation.
const KNOWN_TITLES: [(&str, &str); 9] = [
    ("the hon", "The Hon"),
    ("senator", "Senator"),
    ("miss", "Miss"),
    ("mrs", "Mrs"),
    ("hon", "Hon"),
    ("mr", "Mr"),
    ("ms", "Ms"),
    ("mx", "Mx"),
    ("dr", "Dr"),
];

/// The table of known MPs, indexed by surname and by full name.
#[derive(Debug, Clone)]
pub struct MpDirectory {
    entries: Vec<MpEntry>,
    by_name: HashMap<String, usize>,
    default_honorific: String,
}

impl MpDirectory {
    pub fn new(default_honorific: &str) -> MpDirectory {
        MpDirectory {
            entries: Vec::new(),
            by_name: HashMap::new(),
            default_honorific: default_honorific.to_string(),
        }
    }

    /// Registers one MP. Each entry is reachable under its lowercased
    /// surname and its lowercased "first surname" form. On a name clash the
    /// first insertion wins, which keeps lookups deterministic.
    pub fn insert(&mut self, entry: MpEntry) {
        let idx = self.entries.len();
        let surname_key = entry.surname.to_lowercase();
        let full_key = format!("{} {}", entry.first_name, entry.surname)
            .trim()
            .to_lowercase();
        self.by_name.entry(surname_key).or_insert(idx);
        self.by_name.entry(full_key).or_insert(idx);
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maps a raw identifier such as "Smith", "Jane Smith" or "Dr. Smith"
    /// to its salutation and display name.
    ///
    /// A title supplied in the input takes precedence over the table's
    /// honorific; with neither present the configured default is used.
    pub fn resolve(&self, identifier: &str) -> Result<Salutation, UnresolvedMpError> {
        let cleaned = collapse_whitespace(identifier);
        let (explicit_title, name) = split_title(&cleaned);
        let idx = self
            .by_name
            .get(&name.to_lowercase())
            .context(UnresolvedMpSnafu {
                identifier: identifier.trim(),
            })?;
        let entry = &self.entries[*idx];

        let honorific = explicit_title
            .map(str::to_string)
            .or_else(|| {
                if entry.honorific.is_empty() {
                    None
                } else {
                    Some(entry.honorific.clone())
                }
            })
            .unwrap_or_else(|| self.default_honorific.clone());

        let display_name = if entry.first_name.is_empty() {
            format!("{} {}", honorific, entry.surname)
        } else {
            format!("{} {}", entry.first_name, entry.surname)
        };
        Ok(Salutation {
            salutation: format!("Dear {} {}", honorific, entry.surname),
            display_name,
        })
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a leading recognized title off the identifier, tolerating a
/// trailing dot ("Dr." and "Dr" both work). Returns the canonical title
/// spelling and the remaining name.
fn split_title(name: &str) -> (Option<&'static str>, &str) {
    let lower = name.to_lowercase();
    for (title, canonical) in KNOWN_TITLES {
        if lower.len() > title.len() && lower.starts_with(title) {
            let rest = &name[title.len()..];
            let rest = rest.strip_prefix('.').unwrap_or(rest);
            if let Some(stripped) = rest.strip_prefix(' ') {
                return (Some(canonical), stripped);
            }
        }
    }
    (None, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> MpDirectory {
        let mut d = MpDirectory::new("Mx");
        d.insert(MpEntry {
            honorific: "Ms".to_string(),
            first_name: "Jane".to_string(),
            surname: "Smith".to_string(),
        });
        d.insert(MpEntry {
            honorific: String::new(),
            first_name: "Robert".to_string(),
            surname: "Jones".to_string(),
        });
        d
    }

    #[test]
    fn resolves_by_surname() {
        let s = directory().resolve("Smith").unwrap();
        assert_eq!(s.salutation, "Dear Ms Smith");
        assert_eq!(s.display_name, "Jane Smith");
    }

    #[test]
    fn resolves_by_full_name() {
        let s = directory().resolve("jane smith").unwrap();
        assert_eq!(s.salutation, "Dear Ms Smith");
    }

    #[test]
    fn explicit_title_wins_over_table_honorific() {
        let s = directory().resolve("Dr Smith").unwrap();
        assert_eq!(s.salutation, "Dear Dr Smith");
        let s = directory().resolve("dr. Jane Smith").unwrap();
        assert_eq!(s.salutation, "Dear Dr Smith");
    }

    #[test]
    fn default_honorific_fills_the_gap() {
        let s = directory().resolve("Jones").unwrap();
        assert_eq!(s.salutation, "Dear Mx Jones");
        assert_eq!(s.display_name, "Robert Jones");
    }

    #[test]
    fn double_word_title_is_stripped() {
        let s = directory().resolve("The Hon Robert Jones").unwrap();
        assert_eq!(s.salutation, "Dear The Hon Jones");
    }

    #[test]
    fn whitespace_is_collapsed() {
        let s = directory().resolve("  Ms   Jane   Smith ").unwrap();
        assert_eq!(s.salutation, "Dear Ms Smith");
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let err = directory().resolve("Nobody").unwrap_err();
        assert!(err.to_string().contains("Nobody"));
    }

    #[test]
    fn title_alone_does_not_resolve() {
        assert!(directory().resolve("Ms").is_err());
    }

    #[test]
    fn first_insertion_wins_on_clash() {
        let mut d = directory();
        d.insert(MpEntry {
            honorific: "Mr".to_string(),
            first_name: "John".to_string(),
            surname: "Smith".to_string(),
        });
        // "Smith" still points at Jane; the full name reaches John.
        assert_eq!(d.resolve("Smith").unwrap().display_name, "Jane Smith");
        assert_eq!(
            d.resolve("John Smith").unwrap().display_name,
            "John Smith"
        );
    }
}
