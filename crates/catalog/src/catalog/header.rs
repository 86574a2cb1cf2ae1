//! Catalog header metadata.
//!
//! The header is the pseudo-entry with an empty `msgid`; its `msgstr` holds
//! `Key: Value` lines such as `Language: hu` and `Plural-Forms: ...`.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Timestamp format used by `POT-Creation-Date` and `PO-Revision-Date`.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M%z";

/// Parsed header fields, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    fields: Vec<(String, String)>,
}

impl Header {
    /// Parse the header entry's `msgstr`.
    pub fn parse(msgstr: &str) -> Self {
        let fields = msgstr
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { fields }
    }

    /// Look up a field by name, ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn project_id_version(&self) -> Option<&str> {
        self.get("Project-Id-Version")
    }

    pub fn last_translator(&self) -> Option<&str> {
        self.get("Last-Translator")
    }

    pub fn language_team(&self) -> Option<&str> {
        self.get("Language-Team")
    }

    pub fn language(&self) -> Option<&str> {
        self.get("Language")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get("Content-Type")
    }

    /// Raw `Plural-Forms` value, if declared.
    pub fn plural_forms(&self) -> Option<&str> {
        self.get("Plural-Forms")
    }

    /// The `charset=` parameter of `Content-Type`.
    pub fn charset(&self) -> Option<&str> {
        self.content_type()?
            .split(';')
            .find_map(|part| part.trim().strip_prefix("charset="))
            .map(str::trim)
    }

    /// `PO-Revision-Date`, when it is a real timestamp rather than the
    /// `YEAR-MO-DA HO:MI+ZONE` template.
    pub fn revision_date(&self) -> Option<DateTime<FixedOffset>> {
        parse_date(self.get("PO-Revision-Date")?)
    }

    pub fn pot_creation_date(&self) -> Option<DateTime<FixedOffset>> {
        parse_date(self.get("POT-Creation-Date")?)
    }
}

fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, DATE_FORMAT).ok()
}
