//! Gettext .po file parser.
//!
//! Reads catalog text line by line into a [`Catalog`]. Unlike a lenient
//! importer, the parser fails closed: any malformed entry aborts the whole
//! catalog so a locale is never served half-loaded.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use super::{CONTEXT_SEPARATOR, Catalog, Entry, Msgstr, SourceRef, message_key};
use crate::error::ParseError;
use crate::plural::PluralForms;

/// Options controlling catalog parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    require_header: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`ParseError::MissingHeader`] when the catalog has no
    /// header entry. Otherwise the default `Plural-Forms` is assumed.
    pub fn require_header(mut self, require: bool) -> Self {
        self.require_header = require;
        self
    }

    /// Parse `.po` text into a catalog.
    pub fn parse(&self, content: &str) -> Result<Catalog, ParseError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut state = ParserState::default();

        for (idx, raw) in content.lines().enumerate() {
            state.line(idx + 1, raw.trim())?;
        }
        state.finish_entry()?;

        if self.require_header && state.header_entry.is_none() {
            return Err(ParseError::MissingHeader);
        }

        debug!(
            entries = state.entries.len(),
            has_header = state.header_entry.is_some(),
            nplurals = state.plural.nplurals(),
            "parsed catalog"
        );

        Ok(Catalog::new(state.header_entry, state.entries, state.plural))
    }
}

/// The string field a continuation line appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    Form(usize),
    PreviousMsgid,
}

/// Entry under construction.
#[derive(Debug, Default)]
struct Pending {
    entry: Entry,
    msgid_line: Option<usize>,
    msgstr: Option<String>,
    forms: BTreeMap<usize, String>,
    field: Option<Field>,
}

impl Pending {
    fn has_msgid(&self) -> bool {
        self.msgid_line.is_some()
    }

    fn has_msgstr(&self) -> bool {
        self.msgstr.is_some() || !self.forms.is_empty()
    }

    fn append(&mut self, text: &str) {
        let target = match self.field {
            Some(Field::Msgctxt) => self.entry.msgctxt.get_or_insert_with(String::new),
            Some(Field::Msgid) => &mut self.entry.msgid,
            Some(Field::MsgidPlural) => self.entry.msgid_plural.get_or_insert_with(String::new),
            Some(Field::Msgstr) => self.msgstr.get_or_insert_with(String::new),
            Some(Field::Form(index)) => self.forms.entry(index).or_default(),
            Some(Field::PreviousMsgid) => self.entry.previous_msgid.get_or_insert_with(String::new),
            None => return,
        };
        target.push_str(text);
    }
}

#[derive(Debug, Default)]
struct ParserState {
    plural: PluralForms,
    header_entry: Option<Entry>,
    entries: Vec<Entry>,
    /// Message key → line of its first definition.
    seen: HashMap<String, usize>,
    pending: Pending,
}

impl ParserState {
    fn line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        if line.is_empty() {
            // A comment block with no message yet stays attached to the next entry.
            if self.pending.has_msgid() {
                self.finish_entry()?;
            }
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("#~") {
            return self.obsolete_line(line_no, rest.trim_start());
        }

        if let Some(rest) = line.strip_prefix('#') {
            if self.pending.has_msgstr() {
                self.finish_entry()?;
            }
            return self.comment(line_no, rest);
        }

        if line.starts_with('"') {
            return self.continuation(line_no, line);
        }

        self.keyword(line_no, line)
    }

    fn obsolete_line(&mut self, line_no: usize, rest: &str) -> Result<(), ParseError> {
        if rest.is_empty() {
            return Ok(());
        }
        if rest.starts_with('|') {
            if self.pending.has_msgstr() {
                self.finish_entry()?;
            }
            return self.comment(line_no, rest);
        }
        if rest.starts_with('"') {
            return self.continuation(line_no, rest);
        }
        self.keyword(line_no, rest)?;
        self.pending.entry.obsolete = true;
        Ok(())
    }

    fn comment(&mut self, line_no: usize, rest: &str) -> Result<(), ParseError> {
        let entry = &mut self.pending.entry;
        let mut chars = rest.chars();
        match chars.next() {
            Some('.') => {
                entry.extracted_comments.push(chars.as_str().trim().to_string());
            }
            Some(':') => {
                entry
                    .references
                    .extend(chars.as_str().split_whitespace().map(SourceRef::parse));
            }
            Some(',') => {
                entry.flags.extend(
                    chars
                        .as_str()
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string),
                );
            }
            Some('|') => {
                let body = chars.as_str().trim();
                if let Some(value) = body.strip_prefix("msgid ") {
                    entry.previous_msgid = Some(parse_quoted(value, line_no)?);
                    self.pending.field = Some(Field::PreviousMsgid);
                    return Ok(());
                } else if body.starts_with('"')
                    && self.pending.field == Some(Field::PreviousMsgid)
                {
                    let text = parse_quoted(body, line_no)?;
                    self.pending.append(&text);
                    return Ok(());
                }
                // Previous msgctxt / msgid_plural are not kept.
            }
            _ => {
                entry
                    .translator_comments
                    .push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            }
        }
        self.pending.field = None;
        Ok(())
    }

    fn continuation(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        if self.pending.field.is_none() {
            return Err(ParseError::OrphanContinuation { line: line_no });
        }
        let text = parse_quoted(line, line_no)?;
        self.pending.append(&text);
        Ok(())
    }

    fn keyword(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let split = line
            .find(|c: char| c == '"' || c.is_whitespace())
            .unwrap_or(line.len());
        let (keyword, rest) = line.split_at(split);

        match keyword {
            "msgctxt" | "msgid" => {
                if self.pending.has_msgstr() {
                    self.finish_entry()?;
                }
                if let Some(msgid_line) = self.pending.msgid_line {
                    return Err(ParseError::MissingMsgstr {
                        line: msgid_line,
                        msgid: self.pending.entry.msgid.clone(),
                    });
                }
                let value = parse_quoted(rest, line_no)?;
                if keyword == "msgctxt" {
                    if self.pending.entry.msgctxt.is_some() {
                        return Err(unexpected(line_no, line));
                    }
                    self.pending.entry.msgctxt = Some(value);
                    self.pending.field = Some(Field::Msgctxt);
                } else {
                    self.pending.entry.msgid = value;
                    self.pending.entry.line = line_no;
                    self.pending.msgid_line = Some(line_no);
                    self.pending.field = Some(Field::Msgid);
                }
            }
            "msgid_plural" => {
                if !self.pending.has_msgid() {
                    return Err(ParseError::MissingMsgid { line: line_no });
                }
                if self.pending.has_msgstr() || self.pending.entry.msgid_plural.is_some() {
                    return Err(unexpected(line_no, line));
                }
                self.pending.entry.msgid_plural = Some(parse_quoted(rest, line_no)?);
                self.pending.field = Some(Field::MsgidPlural);
            }
            "msgstr" => {
                if !self.pending.has_msgid() {
                    return Err(ParseError::MissingMsgid { line: line_no });
                }
                if self.pending.entry.msgid_plural.is_some() || !self.pending.forms.is_empty() {
                    return Err(self.mixed_forms(line_no));
                }
                if self.pending.msgstr.is_some() {
                    return Err(unexpected(line_no, line));
                }
                self.pending.msgstr = Some(parse_quoted(rest, line_no)?);
                self.pending.field = Some(Field::Msgstr);
            }
            _ => {
                let Some(raw) = keyword
                    .strip_prefix("msgstr[")
                    .and_then(|r| r.strip_suffix(']'))
                else {
                    return Err(unexpected(line_no, line));
                };
                let index = raw
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidPluralIndex {
                        line: line_no,
                        raw: raw.to_string(),
                    })?;
                if !self.pending.has_msgid() {
                    return Err(ParseError::MissingMsgid { line: line_no });
                }
                if self.pending.entry.msgid_plural.is_none() || self.pending.msgstr.is_some() {
                    return Err(self.mixed_forms(line_no));
                }
                let nplurals = self.plural.nplurals();
                if index >= nplurals {
                    return Err(ParseError::PluralIndexOutOfRange {
                        line: line_no,
                        index,
                        nplurals,
                    });
                }
                if self.pending.forms.contains_key(&index) {
                    return Err(unexpected(line_no, line));
                }
                let value = parse_quoted(rest, line_no)?;
                self.pending.forms.insert(index, value);
                self.pending.field = Some(Field::Form(index));
            }
        }
        Ok(())
    }

    fn mixed_forms(&self, line_no: usize) -> ParseError {
        ParseError::MixedForms {
            line: line_no,
            msgid: self.pending.entry.msgid.clone(),
        }
    }

    /// Validate and store the pending entry.
    fn finish_entry(&mut self) -> Result<(), ParseError> {
        let pending = std::mem::take(&mut self.pending);
        let Some(line) = pending.msgid_line else {
            // Trailing comments without a message are dropped.
            return Ok(());
        };
        let mut entry = pending.entry;

        entry.msgstr = if entry.msgid_plural.is_some() {
            let expected = self.plural.nplurals();
            let found = pending.forms.len();
            // Keys are unique and below nplurals, so a full count means 0..nplurals.
            if found != expected {
                return Err(ParseError::PluralSlotMismatch {
                    line,
                    msgid: entry.msgid,
                    found,
                    expected,
                });
            }
            Msgstr::Plural(pending.forms.into_values().collect())
        } else {
            match pending.msgstr {
                Some(text) => Msgstr::Singular(text),
                None => {
                    return Err(ParseError::MissingMsgstr {
                        line,
                        msgid: entry.msgid,
                    });
                }
            }
        };

        if entry.obsolete {
            self.entries.push(entry);
            return Ok(());
        }

        if entry.is_header() {
            return self.set_header(entry, line);
        }

        let joined = entry.msgid.contains(CONTEXT_SEPARATOR)
            || entry
                .msgctxt
                .as_deref()
                .is_some_and(|ctx| ctx.contains(CONTEXT_SEPARATOR));
        if joined {
            return Err(ParseError::ContextSeparator {
                line,
                msgid: entry.msgid,
            });
        }

        let key = message_key(entry.msgctxt.as_deref(), &entry.msgid);
        if let Some(first_line) = self.seen.get(&key) {
            return Err(ParseError::DuplicateMessage {
                line,
                msgid: entry.msgid,
                first_line: *first_line,
            });
        }
        self.seen.insert(key, line);
        self.entries.push(entry);
        Ok(())
    }

    fn set_header(&mut self, entry: Entry, line: usize) -> Result<(), ParseError> {
        if self.header_entry.is_some() || !self.entries.is_empty() {
            return Err(ParseError::MisplacedHeader { line });
        }

        let header = super::Header::parse(entry.msgstr.get(0).unwrap_or_default());
        if let Some(charset) = header.charset()
            && !charset.eq_ignore_ascii_case("utf-8")
        {
            warn!(line, charset = %charset, "catalog declares a non-UTF-8 charset; reading as UTF-8");
        }
        if let Some(value) = header.plural_forms() {
            self.plural = PluralForms::parse(value)
                .map_err(|source| ParseError::InvalidPluralForms { line, source })?;
        }
        self.header_entry = Some(entry);
        Ok(())
    }
}

fn unexpected(line: usize, content: &str) -> ParseError {
    ParseError::UnexpectedLine {
        line,
        content: content.to_string(),
    }
}

/// Parse one quoted string literal, unescaping as it goes.
///
/// Single pass, so `\\n` stays a backslash followed by `n`. Unknown escapes
/// are kept verbatim.
fn parse_quoted(text: &str, line: usize) -> Result<String, ParseError> {
    let text = text.trim();
    let Some(body) = text.strip_prefix('"') else {
        return Err(ParseError::ExpectedQuotedString { line });
    };

    let mut result = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((pos, c)) = chars.next() {
        match c {
            '"' => {
                let tail = body[pos + 1..].trim();
                if !tail.is_empty() {
                    return Err(unexpected(line, tail));
                }
                return Ok(result);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => result.push('\n'),
                Some((_, 't')) => result.push('\t'),
                Some((_, 'r')) => result.push('\r'),
                Some((_, 'a')) => result.push('\u{7}'),
                Some((_, 'b')) => result.push('\u{8}'),
                Some((_, 'f')) => result.push('\u{c}'),
                Some((_, 'v')) => result.push('\u{b}'),
                Some((_, '"')) => result.push('"'),
                Some((_, '\\')) => result.push('\\'),
                Some((_, other)) => {
                    result.push('\\');
                    result.push(other);
                }
                None => return Err(ParseError::UnterminatedString { line }),
            },
            other => result.push(other),
        }
    }

    Err(ParseError::UnterminatedString { line })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::PluralError;

    const HEADER: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"
"#;

    fn with_header(body: &str) -> String {
        format!("{HEADER}\n{body}")
    }

    #[test]
    fn parse_simple_po() {
        let content = r#"
msgid "Hello"
msgstr "Szia"

msgid "Goodbye"
msgstr "Viszlát"
"#;
        let catalog = Catalog::parse(content).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].msgid, "Hello");
        assert_eq!(catalog.entries()[0].msgstr, Msgstr::Singular("Szia".into()));
        assert_eq!(catalog.entries()[1].line, 5);
        assert!(catalog.header_entry().is_none());
        assert_eq!(catalog.plural_forms(), &PluralForms::default());
    }

    #[test]
    fn parse_multiline() {
        let content = r#"
msgid ""
"This is the list of available %s. You may choose some by selecting them in "
"the box below and then clicking the \"Choose\" arrow between the two boxes."
msgstr ""
"Ez az elérhető %s listája. Úgy választhat közülük, hogy rákattint az alábbi "
"dobozban, és megnyomja a dobozok közti \"Választás\" nyilat."
"#;
        let catalog = Catalog::parse(content).unwrap();
        let entry = &catalog.entries()[0];
        assert!(entry.msgid.starts_with("This is the list of available %s. You may"));
        assert!(entry.msgid.contains("\"Choose\""));
        assert!(entry.msgstr.get(0).unwrap().ends_with("\"Választás\" nyilat."));
        assert_eq!(entry.line, 2);
    }

    #[test]
    fn multiline_msgid_is_not_the_header() {
        // Empty first literal followed by continuation lines is a normal entry.
        let content = "msgid \"\"\n\"Hello\"\nmsgstr \"Szia\"\n";
        let catalog = Catalog::parse(content).unwrap();
        assert!(catalog.header_entry().is_none());
        assert_eq!(catalog.gettext("Hello"), "Szia");
    }

    #[test]
    fn parse_comments_and_flags() {
        let content = with_header(
            r#"# Translator note
#. Extracted note
#: contrib/admin/static/admin/js/SelectFilter2.js:38
#: contrib/admin/static/admin/js/SelectFilter2.js:49 other.js
#, javascript-format, fuzzy
#| msgid "Available %s."
msgid "Available %s"
msgstr "Elérhető %s"
"#,
        );
        let catalog = Catalog::parse(&content).unwrap();
        let entry = &catalog.entries()[0];
        assert_eq!(entry.translator_comments, vec!["Translator note"]);
        assert_eq!(entry.extracted_comments, vec!["Extracted note"]);
        assert_eq!(entry.references.len(), 3);
        assert_eq!(entry.references[1].line, Some(49));
        assert_eq!(entry.references[2].path, "other.js");
        assert_eq!(entry.flags, vec!["javascript-format", "fuzzy"]);
        assert!(entry.is_fuzzy());
        assert_eq!(entry.previous_msgid.as_deref(), Some("Available %s."));
    }

    #[test]
    fn comments_start_a_new_entry() {
        let content = "msgid \"a\"\nmsgstr \"A\"\n#: x.js:1\nmsgid \"b\"\nmsgstr \"B\"\n";
        let catalog = Catalog::parse(content).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.entries()[0].references.is_empty());
        assert_eq!(catalog.entries()[1].references[0].path, "x.js");
    }

    #[test]
    fn parse_plural() {
        let content = with_header(
            r#"msgid "%(sel)s of %(cnt)s selected"
msgid_plural "%(sel)s of %(cnt)s selected"
msgstr[0] "%(sel)s/%(cnt)s kijelölve"
msgstr[1] "%(sel)s/%(cnt)s kijelölve"
"#,
        );
        let catalog = Catalog::parse(&content).unwrap();
        let entry = &catalog.entries()[0];
        assert!(entry.is_plural());
        assert_eq!(entry.msgstr.slots().len(), 2);
    }

    #[test]
    fn plural_slots_may_be_blank() {
        let content = with_header(
            "msgid \"One\"\nmsgid_plural \"Many\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n",
        );
        let catalog = Catalog::parse(&content).unwrap();
        assert!(!catalog.entries()[0].is_translated());
        assert_eq!(catalog.ngettext("One", "Many", 4), "Many");
    }

    #[test]
    fn plural_index_out_of_range_fails() {
        let content = with_header(
            r#"msgid "One"
msgid_plural "Many"
msgstr[0] "Egy"
msgstr[1] "Sok"
msgstr[2] "Nagyon sok"
"#,
        );
        let err = Catalog::parse(&content).unwrap_err();
        assert!(matches!(
            err,
            ParseError::PluralIndexOutOfRange {
                index: 2,
                nplurals: 2,
                ..
            }
        ));
    }

    #[test]
    fn plural_slot_count_must_match() {
        let content = with_header("msgid \"One\"\nmsgid_plural \"Many\"\nmsgstr[0] \"Egy\"\n");
        let err = Catalog::parse(&content).unwrap_err();
        assert!(matches!(
            err,
            ParseError::PluralSlotMismatch {
                found: 1,
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn missing_msgstr_fails() {
        let err = Catalog::parse("msgid \"Hello\"\n\nmsgid \"Bye\"\nmsgstr \"\"\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingMsgstr { line: 1, .. }));

        let err = Catalog::parse("msgid \"Hello\"\nmsgid \"Bye\"\nmsgstr \"\"\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingMsgstr { line: 1, .. }));

        let err = Catalog::parse("msgid \"Hello\"").unwrap_err();
        assert!(matches!(err, ParseError::MissingMsgstr { .. }));
    }

    #[test]
    fn mixed_forms_fail() {
        let err = Catalog::parse("msgid \"a\"\nmsgid_plural \"b\"\nmsgstr \"x\"\n").unwrap_err();
        assert!(matches!(err, ParseError::MixedForms { .. }));

        let err = Catalog::parse("msgid \"a\"\nmsgstr[0] \"x\"\n").unwrap_err();
        assert!(matches!(err, ParseError::MixedForms { .. }));
    }

    #[test]
    fn structural_errors() {
        assert!(matches!(
            Catalog::parse("msgstr \"x\"\n").unwrap_err(),
            ParseError::MissingMsgid { line: 1 }
        ));
        assert!(matches!(
            Catalog::parse("\"dangling\"\n").unwrap_err(),
            ParseError::OrphanContinuation { line: 1 }
        ));
        assert!(matches!(
            Catalog::parse("msgid \"a\nmsgstr \"b\"\n").unwrap_err(),
            ParseError::UnterminatedString { line: 1 }
        ));
        assert!(matches!(
            Catalog::parse("msgid a\n").unwrap_err(),
            ParseError::ExpectedQuotedString { line: 1 }
        ));
        assert!(matches!(
            Catalog::parse("msgid \"a\"\nmsgtxt \"b\"\n").unwrap_err(),
            ParseError::UnexpectedLine { line: 2, .. }
        ));
        assert!(matches!(
            Catalog::parse("msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[x] \"c\"\n").unwrap_err(),
            ParseError::InvalidPluralIndex { line: 3, .. }
        ));
    }

    #[test]
    fn duplicate_messages_fail() {
        let content = "msgid \"a\"\nmsgstr \"1\"\n\nmsgid \"a\"\nmsgstr \"2\"\n";
        let err = Catalog::parse(content).unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateMessage {
                line: 4,
                first_line: 1,
                ..
            }
        ));
    }

    #[test]
    fn same_msgid_in_different_contexts_is_allowed() {
        let content = r#"msgctxt "abbrev. month May"
msgid "May"
msgstr "máj."

msgctxt "long month"
msgid "May"
msgstr "május"
"#;
        let catalog = Catalog::parse(content).unwrap();
        assert_eq!(catalog.pgettext("abbrev. month May", "May"), "máj.");
        assert_eq!(catalog.pgettext("long month", "May"), "május");
    }

    #[test]
    fn context_separator_in_msgid_fails() {
        let content = "msgctxt \"a\"\nmsgid \"b\"\nmsgstr \"1\"\n\nmsgid \"a\u{4}b\"\nmsgstr \"2\"\n";
        let err = Catalog::parse(content).unwrap_err();
        assert!(matches!(err, ParseError::ContextSeparator { line: 5, .. }));
        assert!(err.to_string().contains("context separator"));

        let content = "msgctxt \"a\u{4}b\"\nmsgid \"c\"\nmsgstr \"1\"\n";
        let err = Catalog::parse(content).unwrap_err();
        assert!(matches!(err, ParseError::ContextSeparator { line: 2, .. }));
    }

    #[test]
    fn header_must_come_first() {
        let content = "msgid \"a\"\nmsgstr \"b\"\n\nmsgid \"\"\nmsgstr \"Language: hu\\n\"\n";
        let err = Catalog::parse(content).unwrap_err();
        assert!(matches!(err, ParseError::MisplacedHeader { line: 4 }));
    }

    #[test]
    fn require_header_option() {
        let err = ParseOptions::new()
            .require_header(true)
            .parse("msgid \"a\"\nmsgstr \"b\"\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader));

        assert!(ParseOptions::new().require_header(true).parse(HEADER).is_ok());
    }

    #[test]
    fn invalid_plural_forms_header_fails() {
        let content = "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=2; plural=(n !=;\\n\"\n";
        let err = Catalog::parse(content).unwrap_err();
        assert!(matches!(err, ParseError::InvalidPluralForms { line: 1, .. }));
    }

    #[test]
    fn deeply_nested_plural_forms_fail() {
        let depth = 10_000;
        let content = format!(
            "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=2; plural={}n != 1{};\\n\"\n",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let err = Catalog::parse(&content).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidPluralForms {
                line: 1,
                source: PluralError::TooDeep { .. }
            }
        ));
    }

    #[test]
    fn header_nplurals_drives_validation() {
        let content = r#"msgid ""
msgstr "Plural-Forms: nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);\n"

msgid "file"
msgid_plural "files"
msgstr[0] "plik"
msgstr[1] "pliki"
msgstr[2] "plików"
"#;
        let catalog = Catalog::parse(content).unwrap();
        assert_eq!(catalog.ngettext("file", "files", 22), "pliki");
        assert_eq!(catalog.ngettext("file", "files", 5), "plików");
    }

    #[test]
    fn obsolete_entries_are_kept_but_not_indexed() {
        let content = r#"msgid "Now"
msgstr "Most"

#~ msgid "Now"
#~ msgstr "Épp most"

#~ msgid ""
#~ "Long "
#~ "obsolete"
#~ msgstr "Régi"
"#;
        let catalog = Catalog::parse(content).unwrap();
        assert_eq!(catalog.entries().len(), 3);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.gettext("Now"), "Most");
        let last = &catalog.entries()[2];
        assert!(last.obsolete);
        assert_eq!(last.msgid, "Long obsolete");
    }

    #[test]
    fn unescape_sequences() {
        let content = r#"msgid "Line 1\nLine 2\tTabbed \"quoted\""
msgstr "Sor 1\nSor 2\tTabulált \"idézett\""
"#;
        let catalog = Catalog::parse(content).unwrap();
        let entry = &catalog.entries()[0];
        assert_eq!(entry.msgid, "Line 1\nLine 2\tTabbed \"quoted\"");
    }

    #[test]
    fn unescape_double_backslash_then_n() {
        assert_eq!(parse_quoted(r#""line\\nend""#, 1).unwrap(), "line\\nend");
        assert_eq!(parse_quoted(r#""line\nend""#, 1).unwrap(), "line\nend");
        assert_eq!(parse_quoted(r#""path\\to\\file""#, 1).unwrap(), "path\\to\\file");
        assert_eq!(parse_quoted(r#""keep \q""#, 1).unwrap(), "keep \\q");
    }

    #[test]
    fn trailing_text_after_string_fails() {
        assert!(matches!(
            parse_quoted(r#""a" "b""#, 7).unwrap_err(),
            ParseError::UnexpectedLine { line: 7, .. }
        ));
        assert!(matches!(
            parse_quoted(r#""a\"#, 7).unwrap_err(),
            ParseError::UnterminatedString { line: 7 }
        ));
    }

    #[test]
    fn tolerates_bom_and_crlf() {
        let content = "\u{feff}msgid \"a\"\r\nmsgstr \"b\"\r\n";
        let catalog = Catalog::parse(content).unwrap();
        assert_eq!(catalog.gettext("a"), "b");
    }
}
