//! Placeholder substitution and the document template model.
//!
//! Substitution works over a fixed, enumerated token set rather than
//! open-ended pattern matching: every recognized token maps to one record
//! field, anything else inside `{{...}}` passes through untouched.

use snafu::prelude::*;

use crate::errors::{TemplateSubstitutionError, TemplateSubstitutionSnafu};
use crate::record::LetterRecord;

/// How dates appear in rendered documents.
pub(crate) const DATE_DISPLAY_FORMAT: &str = "%b %d, %Y";

/// The recognized placeholder tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `{{mp_name}}` - the MP display name, e.g. "Jane Smith".
    MpName,
    /// `{{salutation}}` - the letter greeting, e.g. "Dear Ms Smith".
    Salutation,
    /// `{{date}}` - the submission date.
    Date,
    /// `{{body}}` - the rendered letter text. Only available to the outer
    /// document template, not inside the letter body itself.
    Body,
}

impl Token {
    pub const ALL: [Token; 4] = [Token::MpName, Token::Salutation, Token::Date, Token::Body];

    pub fn name(self) -> &'static str {
        match self {
            Token::MpName => "mp_name",
            Token::Salutation => "salutation",
            Token::Date => "date",
            Token::Body => "body",
        }
    }

    fn from_name(name: &str) -> Option<Token> {
        Token::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// One paragraph of template or rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub bold: bool,
}

impl Paragraph {
    fn plain(text: &str) -> Paragraph {
        Paragraph {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Paragraph {
        Paragraph {
            text: text.to_string(),
            bold: true,
        }
    }
}

/// The document layout every record is rendered through. Owned by the
/// caller and read-only during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTemplate {
    pub paragraphs: Vec<Paragraph>,
}

impl DocumentTemplate {
    /// Parses a plain-text template: one line per paragraph, a line wrapped
    /// in `**` rendering bold.
    pub fn parse(text: &str) -> DocumentTemplate {
        let paragraphs = text
            .lines()
            .map(|line| {
                match line.strip_prefix("**").and_then(|l| l.strip_suffix("**")) {
                    Some(inner) if !inner.is_empty() => Paragraph::bold(inner),
                    _ => Paragraph::plain(line),
                }
            })
            .collect();
        DocumentTemplate { paragraphs }
    }

    /// The stock letter layout: a bold date heading, a spacer line and the
    /// letter text.
    pub fn default_letter() -> DocumentTemplate {
        DocumentTemplate {
            paragraphs: vec![
                Paragraph::bold("Date: {{date}}"),
                Paragraph::plain(""),
                Paragraph::plain("{{body}}"),
            ],
        }
    }
}

/// The values available to one substitution pass. A recognized token whose
/// value is absent is a substitution error, never an empty string.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenValues {
    pub mp_name: Option<String>,
    pub salutation: Option<String>,
    pub date: Option<String>,
    pub body: Option<String>,
}

impl TokenValues {
    /// The values for the body pass: everything except the body itself, so
    /// that `{{body}}` inside a letter cannot recurse.
    fn for_body(record: &LetterRecord) -> TokenValues {
        TokenValues {
            mp_name: Some(record.display_name.clone()),
            salutation: Some(record.salutation.clone()),
            date: Some(record.date.format(DATE_DISPLAY_FORMAT).to_string()),
            body: None,
        }
    }

    fn get(&self, token: Token) -> Option<&str> {
        match token {
            Token::MpName => self.mp_name.as_deref(),
            Token::Salutation => self.salutation.as_deref(),
            Token::Date => self.date.as_deref(),
            Token::Body => self.body.as_deref(),
        }
    }
}

/// A single left-to-right pass replacing recognized `{{token}}` occurrences.
/// Surrounding text is never rewritten; unknown tokens stay verbatim.
pub(crate) fn substitute(
    text: &str,
    values: &TokenValues,
) -> Result<String, TemplateSubstitutionError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            None => {
                // Unterminated braces: not a token, keep as-is.
                out.push_str(&rest[start..]);
                rest = "";
                break;
            }
            Some(end) => {
                let name = after[..end].trim();
                match Token::from_name(name) {
                    Some(token) => {
                        let value = values.get(token).context(TemplateSubstitutionSnafu {
                            token: token.name(),
                        })?;
                        out.push_str(value);
                    }
                    None => out.push_str(&rest[start..start + end + 4]),
                }
                rest = &after[end + 2..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Renders one record through the template: the letter body first, then the
/// outer template with the rendered body available to `{{body}}`. A value
/// spanning several lines expands into that many paragraphs, keeping the
/// template paragraph's emphasis.
pub fn render_paragraphs(
    record: &LetterRecord,
    template: &DocumentTemplate,
) -> Result<Vec<Paragraph>, TemplateSubstitutionError> {
    let body_values = TokenValues::for_body(record);
    let rendered_body = substitute(&record.body_template, &body_values)?;
    let values = TokenValues {
        body: Some(rendered_body),
        ..body_values
    };

    let mut out: Vec<Paragraph> = Vec::new();
    for paragraph in &template.paragraphs {
        let text = substitute(&paragraph.text, &values)?;
        for line in text.split('\n') {
            out.push(Paragraph {
                text: line.trim_end_matches('\r').to_string(),
                bold: paragraph.bold,
            });
        }
    }
    Ok(out)
}
