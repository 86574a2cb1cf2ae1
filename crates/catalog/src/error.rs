//! Catalog error types.
//!
//! Parse errors carry the 1-based line number of the offending record so a
//! translator can jump straight to it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing `.po` text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A keyword was not followed by a quoted string.
    #[error("line {line}: expected a quoted string")]
    ExpectedQuotedString { line: usize },

    /// A quoted string has no closing quote.
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    /// Unknown keyword or stray text.
    #[error("line {line}: unexpected content '{content}'")]
    UnexpectedLine { line: usize, content: String },

    /// A `"..."` continuation line with nothing to continue.
    #[error("line {line}: string continuation without a preceding keyword")]
    OrphanContinuation { line: usize },

    /// `msgstr` or `msgid_plural` appeared before any `msgid`.
    #[error("line {line}: msgstr/msgid_plural without a msgid")]
    MissingMsgid { line: usize },

    /// The entry ended without a `msgstr`.
    #[error("line {line}: entry '{msgid}' has no msgstr")]
    MissingMsgstr { line: usize, msgid: String },

    /// `msgstr[x]` where `x` is not a non-negative integer.
    #[error("line {line}: invalid plural index '{raw}'")]
    InvalidPluralIndex { line: usize, raw: String },

    /// `msgstr[n]` where `n` is not below the header's `nplurals`.
    #[error("line {line}: msgstr[{index}] is out of range for nplurals={nplurals}")]
    PluralIndexOutOfRange {
        line: usize,
        index: usize,
        nplurals: usize,
    },

    /// A plural entry does not supply exactly `nplurals` translations.
    #[error("line {line}: plural entry '{msgid}' has {found} msgstr slot(s), expected {expected}")]
    PluralSlotMismatch {
        line: usize,
        msgid: String,
        found: usize,
        expected: usize,
    },

    /// Singular and plural `msgstr` forms mixed in one entry.
    #[error("line {line}: entry '{msgid}' mixes msgstr and msgstr[n]")]
    MixedForms { line: usize, msgid: String },

    /// The same message (context + msgid) appears twice.
    #[error("line {line}: duplicate message '{msgid}' (first defined on line {first_line})")]
    DuplicateMessage {
        line: usize,
        msgid: String,
        first_line: usize,
    },

    /// A msgctxt or msgid contains the EOT byte gettext uses to join them.
    #[error("line {line}: message '{msgid}' contains the context separator \\u{{4}}")]
    ContextSeparator { line: usize, msgid: String },

    /// The header entry is not the first entry of the catalog.
    #[error("line {line}: header entry must be the first entry")]
    MisplacedHeader { line: usize },

    /// The catalog has no header entry and one was required.
    #[error("catalog has no header entry")]
    MissingHeader,

    /// The header's `Plural-Forms` value could not be parsed.
    #[error("line {line}: invalid Plural-Forms header: {source}")]
    InvalidPluralForms {
        line: usize,
        #[source]
        source: PluralError,
    },
}

impl ParseError {
    /// Line the error was reported on, if it is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::ExpectedQuotedString { line }
            | Self::UnterminatedString { line }
            | Self::UnexpectedLine { line, .. }
            | Self::OrphanContinuation { line }
            | Self::MissingMsgid { line }
            | Self::MissingMsgstr { line, .. }
            | Self::InvalidPluralIndex { line, .. }
            | Self::PluralIndexOutOfRange { line, .. }
            | Self::PluralSlotMismatch { line, .. }
            | Self::MixedForms { line, .. }
            | Self::DuplicateMessage { line, .. }
            | Self::ContextSeparator { line, .. }
            | Self::MisplacedHeader { line }
            | Self::InvalidPluralForms { line, .. } => Some(*line),
            Self::MissingHeader => None,
        }
    }
}

/// Errors from the `Plural-Forms` formula and its evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluralError {
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { offset: usize, found: char },

    #[error("unexpected token '{found}' at offset {offset}")]
    UnexpectedToken { offset: usize, found: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("integer literal out of range at offset {offset}")]
    IntegerOverflow { offset: usize },

    /// Parentheses, negations or operator chains nest past the parser's limit.
    #[error("expression nested too deeply at offset {offset}")]
    TooDeep { offset: usize },

    #[error("missing nplurals")]
    MissingNplurals,

    #[error("invalid nplurals '{raw}'")]
    InvalidNplurals { raw: String },

    #[error("missing plural expression")]
    MissingPlural,

    /// The formula selected a slot the catalog does not have.
    #[error("plural formula selected index {index} for n={count}, but nplurals={nplurals}")]
    IndexOutOfRange {
        count: u64,
        index: u64,
        nplurals: usize,
    },
}

/// Errors raised while loading a catalog from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}
