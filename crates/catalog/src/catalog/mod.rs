//! In-memory message catalog.
//!
//! A [`Catalog`] is built once by the parser and never mutated afterwards;
//! consumers share it behind an `Arc` and look messages up concurrently.
//! Missing, blank, and fuzzy translations fall back to the source string.

pub mod header;
pub mod parser;
pub mod writer;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CatalogError, ParseError, PluralError};
use crate::format::FormatKind;
use crate::plural::PluralForms;

pub use header::Header;
pub use parser::ParseOptions;

/// Separator gettext uses between a context and a msgid.
const CONTEXT_SEPARATOR: char = '\u{4}';

/// A `#:` source reference, e.g. `contrib/admin/static/admin/js/SelectFilter2.js:38`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRef {
    pub path: String,
    pub line: Option<u32>,
}

impl SourceRef {
    /// Split `path:line`; a reference without a numeric suffix is all path.
    pub fn parse(raw: &str) -> Self {
        if let Some((path, line)) = raw.rsplit_once(':')
            && let Ok(line) = line.parse::<u32>()
        {
            return Self {
                path: path.to_string(),
                line: Some(line),
            };
        }
        Self {
            path: raw.to_string(),
            line: None,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// Translation text of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Msgstr {
    /// `msgstr "..."`
    Singular(String),
    /// `msgstr[0] "..."`, `msgstr[1] "..."`, ...
    Plural(Vec<String>),
}

impl Msgstr {
    /// All translation slots; a singular msgstr is one slot.
    pub fn slots(&self) -> &[String] {
        match self {
            Self::Singular(text) => std::slice::from_ref(text),
            Self::Plural(forms) => forms,
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots().get(index).map(String::as_str)
    }
}

impl Default for Msgstr {
    fn default() -> Self {
        Self::Singular(String::new())
    }
}

/// One catalog entry.
///
/// Equality ignores [`Entry::line`] so entries can be compared across a
/// parse/serialize round trip.
#[derive(Debug, Clone, Default, Eq, Serialize)]
pub struct Entry {
    pub translator_comments: Vec<String>,
    pub extracted_comments: Vec<String>,
    pub references: Vec<SourceRef>,
    pub flags: Vec<String>,
    pub previous_msgid: Option<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: Msgstr,
    /// Entry was commented out with `#~`.
    pub obsolete: bool,
    /// Line of the `msgid` keyword.
    pub line: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.translator_comments == other.translator_comments
            && self.extracted_comments == other.extracted_comments
            && self.references == other.references
            && self.flags == other.flags
            && self.previous_msgid == other.previous_msgid
            && self.msgctxt == other.msgctxt
            && self.msgid == other.msgid
            && self.msgid_plural == other.msgid_plural
            && self.msgstr == other.msgstr
            && self.obsolete == other.obsolete
    }
}

impl Entry {
    pub fn is_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn is_fuzzy(&self) -> bool {
        self.has_flag("fuzzy")
    }

    /// Placeholder syntax declared by the `*-format` flags.
    pub fn format_kind(&self) -> Option<FormatKind> {
        FormatKind::for_entry(self)
    }

    /// Every translation slot is non-empty.
    pub fn is_translated(&self) -> bool {
        self.msgstr.slots().iter().all(|s| !s.is_empty())
    }

    /// The header pseudo-entry: empty msgid, no context.
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none()
    }
}

/// Translation progress counters over active entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub translated: usize,
    pub fuzzy: usize,
    pub untranslated: usize,
    pub obsolete: usize,
}

/// Immutable catalog for one locale.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    header: Header,
    #[serde(skip)]
    header_entry: Option<Entry>,
    plural: PluralForms,
    entries: Vec<Entry>,
    /// Message key → position in `entries`, active entries only.
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Catalog {
    pub(crate) fn new(header_entry: Option<Entry>, entries: Vec<Entry>, plural: PluralForms) -> Self {
        let header = header_entry
            .as_ref()
            .and_then(|entry| entry.msgstr.get(0))
            .map(Header::parse)
            .unwrap_or_default();

        let index = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.obsolete)
            .map(|(pos, entry)| (message_key(entry.msgctxt.as_deref(), &entry.msgid), pos))
            .collect();

        Self {
            header,
            header_entry,
            plural,
            entries,
            index,
        }
    }

    /// Parse `.po` text with default options.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        ParseOptions::default().parse(content)
    }

    /// Read and parse a `.po` file.
    pub fn from_path(path: &Path, options: ParseOptions) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = options
            .parse(&content)
            .map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), entries = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The header pseudo-entry as written, with its comments and flags.
    pub fn header_entry(&self) -> Option<&Entry> {
        self.header_entry.as_ref()
    }

    pub fn plural_forms(&self) -> &PluralForms {
        &self.plural
    }

    /// All entries in file order, obsolete ones included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn active_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.obsolete)
    }

    pub fn obsolete_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.obsolete)
    }

    /// Number of active entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Find an active entry by context and msgid.
    pub fn find(&self, msgctxt: Option<&str>, msgid: &str) -> Option<&Entry> {
        let pos = match msgctxt {
            // Parsed catalogs never hold a separator, so a joined key here is a miss.
            None if msgid.contains(CONTEXT_SEPARATOR) => None,
            None => self.index.get(msgid),
            Some(_) => self.index.get(&message_key(msgctxt, msgid)),
        }?;
        self.entries.get(*pos)
    }

    /// Plural slot for `count` under this catalog's `Plural-Forms`.
    pub fn plural_index(&self, count: u64) -> Result<usize, PluralError> {
        self.plural.index(count)
    }

    /// Translate `msgid`, or return it unchanged.
    pub fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
        self.singular_translation(None, msgid).unwrap_or(msgid)
    }

    /// Translate `msgid` in context `msgctxt`, or return it unchanged.
    pub fn pgettext<'a>(&'a self, msgctxt: &str, msgid: &'a str) -> &'a str {
        self.singular_translation(Some(msgctxt), msgid).unwrap_or(msgid)
    }

    /// Translate a plural message for `count`.
    ///
    /// Without a usable translation this returns `msgid` when `count == 1`
    /// and `msgid_plural` otherwise.
    pub fn ngettext<'a>(&'a self, msgid: &'a str, msgid_plural: &'a str, count: u64) -> &'a str {
        self.plural_translation(None, msgid, count)
            .unwrap_or(if count == 1 { msgid } else { msgid_plural })
    }

    pub fn npgettext<'a>(
        &'a self,
        msgctxt: &str,
        msgid: &'a str,
        msgid_plural: &'a str,
        count: u64,
    ) -> &'a str {
        self.plural_translation(Some(msgctxt), msgid, count)
            .unwrap_or(if count == 1 { msgid } else { msgid_plural })
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats::default();
        for entry in &self.entries {
            if entry.obsolete {
                stats.obsolete += 1;
                continue;
            }
            stats.total += 1;
            if entry.is_fuzzy() {
                stats.fuzzy += 1;
            } else if entry.is_translated() {
                stats.translated += 1;
            } else {
                stats.untranslated += 1;
            }
        }
        stats
    }

    /// Serialize back to `.po` text.
    pub fn to_po_string(&self) -> String {
        self.to_string()
    }

    fn usable(&self, msgctxt: Option<&str>, msgid: &str) -> Option<&Entry> {
        self.find(msgctxt, msgid).filter(|entry| !entry.is_fuzzy())
    }

    fn singular_translation(&self, msgctxt: Option<&str>, msgid: &str) -> Option<&str> {
        let entry = self.usable(msgctxt, msgid)?;
        entry.msgstr.get(0).filter(|s| !s.is_empty())
    }

    fn plural_translation(&self, msgctxt: Option<&str>, msgid: &str, count: u64) -> Option<&str> {
        let entry = self.usable(msgctxt, msgid)?;
        let index = match &entry.msgstr {
            Msgstr::Singular(_) => 0,
            Msgstr::Plural(_) => match self.plural.index(count) {
                Ok(index) => index,
                Err(e) => {
                    warn!(msgid = %msgid, error = %e, "plural lookup fell back to source");
                    return None;
                }
            },
        };
        entry.msgstr.get(index).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writer::write_catalog(self, f)
    }
}

/// Index key for a message: `context\u{4}msgid`, or the bare msgid. The parser
/// rejects the separator inside either part, so keys never collide.
pub(crate) fn message_key(msgctxt: Option<&str>, msgid: &str) -> String {
    match msgctxt {
        Some(ctx) => format!("{ctx}{CONTEXT_SEPARATOR}{msgid}"),
        None => msgid.to_string(),
    }
}
