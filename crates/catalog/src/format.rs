//! Placeholder checks for format-flagged entries.
//!
//! Entries flagged `c-format`, `python-format` or `javascript-format` carry
//! printf-style tokens (`%s`, `%d`, `%(name)s`, `%1$s`); `python-brace-format`
//! entries carry `{name}` tokens. Every non-empty translation must keep the
//! same multiset of tokens as its source. Problems are reported, never fatal:
//! an untranslated slot simply falls back to the source at lookup time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::catalog::{Catalog, Entry, Msgstr};

/// printf-style conversion, optionally named or positional.
#[allow(clippy::expect_used)]
static PRINTF_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"%(?:\((?P<name>[^)]*)\)|(?P<pos>\d+)\$)?[-#0 +']*(?:\*|\d+)?(?:\.(?:\*|\d+))?(?:hh|h|ll|l|L|q|j|z|t)?(?P<conv>[diouxXeEfFgGaAcsrbp%])",
    )
    .expect("valid regex literal")
});

/// `{name}` field; doubled braces are literals.
#[allow(clippy::expect_used)]
static BRACE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{(?P<field>[^{}]*)\}").expect("valid regex literal")
});

/// Placeholder syntax an entry uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormatKind {
    Printf,
    Brace,
}

impl FormatKind {
    /// Syntax declared by the entry's flags, if any.
    pub fn for_entry(entry: &Entry) -> Option<Self> {
        entry.flags.iter().find_map(|flag| match flag.as_str() {
            "c-format" | "python-format" | "javascript-format" => Some(Self::Printf),
            "python-brace-format" => Some(Self::Brace),
            _ => None,
        })
    }

    /// Extract placeholder tokens from `text`, sorted.
    pub fn placeholders(self, text: &str) -> Vec<String> {
        let mut tokens: Vec<String> = match self {
            Self::Printf => PRINTF_TOKEN
                .captures_iter(text)
                .filter_map(|caps| {
                    let conv = caps.name("conv")?.as_str();
                    if conv == "%" {
                        return None;
                    }
                    Some(match (caps.name("name"), caps.name("pos")) {
                        (Some(name), _) => format!("%({}){conv}", name.as_str()),
                        (None, Some(pos)) => format!("%{}${conv}", pos.as_str()),
                        (None, None) => format!("%{conv}"),
                    })
                })
                .collect(),
            Self::Brace => BRACE_TOKEN
                .captures_iter(text)
                .filter_map(|caps| {
                    let field = caps.name("field")?.as_str();
                    let name = field.split([':', '!']).next().unwrap_or_default();
                    Some(format!("{{{name}}}"))
                })
                .collect(),
        };
        tokens.sort();
        tokens
    }
}

/// A translation whose placeholders differ from its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatIssue {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub line: usize,
    /// `msgstr[n]` slot, `None` for a singular msgstr.
    pub slot: Option<usize>,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

impl fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: '{}'", self.line, self.msgid)?;
        if let Some(slot) = self.slot {
            write!(f, " msgstr[{slot}]")?;
        }
        if !self.missing.is_empty() {
            write!(f, " missing {}", self.missing.join(" "))?;
        }
        if !self.unexpected.is_empty() {
            write!(f, " unexpected {}", self.unexpected.join(" "))?;
        }
        Ok(())
    }
}

/// Check one entry. Fuzzy entries and empty slots are skipped.
pub fn check_entry(entry: &Entry) -> Vec<FormatIssue> {
    let Some(kind) = entry.format_kind() else {
        return Vec::new();
    };
    if entry.is_fuzzy() {
        return Vec::new();
    }

    let singular = kind.placeholders(&entry.msgid);
    let plural = entry
        .msgid_plural
        .as_deref()
        .map(|p| kind.placeholders(p))
        .unwrap_or_else(|| singular.clone());

    let slots: Vec<(Option<usize>, &str, &[String])> = match &entry.msgstr {
        Msgstr::Singular(text) => vec![(None, text.as_str(), singular.as_slice())],
        Msgstr::Plural(forms) => forms
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let source = if i == 0 {
                    singular.as_slice()
                } else {
                    plural.as_slice()
                };
                (Some(i), text.as_str(), source)
            })
            .collect(),
    };

    slots
        .into_iter()
        .filter(|(_, text, _)| !text.is_empty())
        .filter_map(|(slot, text, source)| {
            let (missing, unexpected) = diff(source, &kind.placeholders(text));
            if missing.is_empty() && unexpected.is_empty() {
                return None;
            }
            Some(FormatIssue {
                msgctxt: entry.msgctxt.clone(),
                msgid: entry.msgid.clone(),
                line: entry.line,
                slot,
                missing,
                unexpected,
            })
        })
        .collect()
}

/// Check every active entry of a catalog.
pub fn check_catalog(catalog: &Catalog) -> Vec<FormatIssue> {
    catalog.active_entries().flat_map(check_entry).collect()
}

/// Multiset difference: (in `expected` only, in `actual` only).
fn diff(expected: &[String], actual: &[String]) -> (Vec<String>, Vec<String>) {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for token in expected {
        *counts.entry(token).or_default() += 1;
    }
    for token in actual {
        *counts.entry(token).or_default() -= 1;
    }

    let mut missing = Vec::new();
    let mut unexpected = Vec::new();
    for (token, count) in counts {
        for _ in 0..count.max(0) {
            missing.push(token.to_string());
        }
        for _ in 0..(-count).max(0) {
            unexpected.push(token.to_string());
        }
    }
    (missing, unexpected)
}
