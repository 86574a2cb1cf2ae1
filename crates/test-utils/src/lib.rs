//! Trovato test utilities.
//!
//! Helpers for integration testing: `.po` text builders, on-disk locale
//! trees, and assertion utilities for catalog output.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Default header `Plural-Forms` used by [`TestCatalog::new`].
pub const GERMANIC_PLURALS: &str = "nplurals=2; plural=(n != 1);";

/// Start a catalog for `language` with the two-form plural rule.
pub fn test_catalog(language: &str) -> TestCatalog {
    TestCatalog::new(language)
}

/// A `.po` catalog builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestCatalog {
    pub language: String,
    pub plural_forms: Option<String>,
    pub messages: Vec<TestMessage>,
}

impl TestCatalog {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            plural_forms: Some(GERMANIC_PLURALS.to_string()),
            messages: Vec::new(),
        }
    }

    /// Set the header `Plural-Forms` value.
    pub fn with_plural_forms(mut self, plural_forms: &str) -> Self {
        self.plural_forms = Some(plural_forms.to_string());
        self
    }

    /// Render without a header entry.
    pub fn without_header(mut self) -> Self {
        self.plural_forms = None;
        self
    }

    /// Add a message.
    pub fn with_message(mut self, message: TestMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Add a singular translation.
    pub fn translate(self, msgid: &str, msgstr: &str) -> Self {
        self.with_message(TestMessage::singular(msgid, msgstr))
    }

    /// Render as `.po` text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(plural_forms) = &self.plural_forms {
            out.push_str("msgid \"\"\nmsgstr \"\"\n");
            out.push_str("\"Content-Type: text/plain; charset=UTF-8\\n\"\n");
            let _ = writeln!(out, "\"Language: {}\\n\"", escape(&self.language));
            let _ = writeln!(out, "\"Plural-Forms: {}\\n\"", escape(plural_forms));
        }
        for message in &self.messages {
            if !out.is_empty() {
                out.push('\n');
            }
            message.render_into(&mut out);
        }
        out
    }
}

/// One message in a [`TestCatalog`].
#[derive(Debug, Clone, Default)]
pub struct TestMessage {
    pub flags: Vec<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: Vec<String>,
    pub obsolete: bool,
}

impl TestMessage {
    pub fn singular(msgid: &str, msgstr: &str) -> Self {
        Self {
            msgid: msgid.to_string(),
            msgstr: vec![msgstr.to_string()],
            ..Self::default()
        }
    }

    pub fn plural(msgid: &str, msgid_plural: &str, forms: &[&str]) -> Self {
        Self {
            msgid: msgid.to_string(),
            msgid_plural: Some(msgid_plural.to_string()),
            msgstr: forms.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Set the message context.
    pub fn with_context(mut self, msgctxt: &str) -> Self {
        self.msgctxt = Some(msgctxt.to_string());
        self
    }

    /// Add a `#,` flag such as `fuzzy` or `c-format`.
    pub fn with_flag(mut self, flag: &str) -> Self {
        self.flags.push(flag.to_string());
        self
    }

    /// Comment the message out with `#~`.
    pub fn obsolete(mut self) -> Self {
        self.obsolete = true;
        self
    }

    fn render_into(&self, out: &mut String) {
        if !self.flags.is_empty() {
            let _ = writeln!(out, "#, {}", self.flags.join(", "));
        }
        let prefix = if self.obsolete { "#~ " } else { "" };
        if let Some(ctx) = &self.msgctxt {
            let _ = writeln!(out, "{prefix}msgctxt \"{}\"", escape(ctx));
        }
        let _ = writeln!(out, "{prefix}msgid \"{}\"", escape(&self.msgid));
        match &self.msgid_plural {
            Some(plural) => {
                let _ = writeln!(out, "{prefix}msgid_plural \"{}\"", escape(plural));
                for (index, form) in self.msgstr.iter().enumerate() {
                    let _ = writeln!(out, "{prefix}msgstr[{index}] \"{}\"", escape(form));
                }
            }
            None => {
                let text = self.msgstr.first().map(String::as_str).unwrap_or_default();
                let _ = writeln!(out, "{prefix}msgstr \"{}\"", escape(text));
            }
        }
    }
}

/// Same escape set the catalog writer emits.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\u{7}' => escaped.push_str("\\a"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            '\u{b}' => escaped.push_str("\\v"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// A temporary `<lang>/LC_MESSAGES/<domain>.po` tree.
#[derive(Debug)]
pub struct LocaleTree {
    dir: TempDir,
    domain: String,
}

impl LocaleTree {
    pub fn new(domain: &str) -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            domain: domain.to_string(),
        })
    }

    /// Root of the tree, suitable as a locale directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Path of the catalog file for `language`.
    pub fn catalog_path(&self, language: &str) -> PathBuf {
        self.dir
            .path()
            .join(language)
            .join("LC_MESSAGES")
            .join(format!("{}.po", self.domain))
    }

    /// Write raw `.po` text for `language`, replacing any previous file.
    pub fn write(&self, language: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.catalog_path(language);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Render and write a built catalog under its own language.
    pub fn write_catalog(&self, catalog: &TestCatalog) -> io::Result<PathBuf> {
        self.write(&catalog.language, &catalog.render())
    }
}

/// Assertion helpers for command output.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_renders_header_and_messages() {
        let text = test_catalog("hu")
            .translate("Available %s", "Elérhető %s")
            .with_message(
                TestMessage::plural("One file", "%d files", &["Egy fájl", "%d fájl"])
                    .with_flag("c-format"),
            )
            .render();

        assert!(text.starts_with("msgid \"\"\nmsgstr \"\"\n"));
        assert::contains(&text, "\"Language: hu\\n\"");
        assert::contains(&text, "\"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"");
        assert::contains(&text, "msgid \"Available %s\"\nmsgstr \"Elérhető %s\"\n");
        assert::contains(&text, "#, c-format\nmsgid \"One file\"");
        assert::contains(&text, "msgstr[1] \"%d fájl\"\n");
    }

    #[test]
    fn test_message_escaping_and_obsolete() {
        let text = test_catalog("hu")
            .without_header()
            .with_message(TestMessage::singular("Say \"hi\"\n", "Mondd").obsolete())
            .render();
        assert_eq!(text, "#~ msgid \"Say \\\"hi\\\"\\n\"\n#~ msgstr \"Mondd\"\n");
    }

    #[test]
    fn test_message_escapes_control_characters() {
        let text = test_catalog("hu")
            .without_header()
            .translate("Line\r\nend\u{7}", "Sor\r\nvége\u{b}")
            .render();
        assert_eq!(
            text,
            "msgid \"Line\\r\\nend\\a\"\nmsgstr \"Sor\\r\\nvége\\v\"\n"
        );
    }

    #[test]
    fn test_locale_tree_layout() {
        let tree = LocaleTree::new("djangojs").unwrap();
        let path = tree.write_catalog(&test_catalog("hu")).unwrap();
        assert!(path.ends_with("hu/LC_MESSAGES/djangojs.po"));
        assert!(path.starts_with(tree.path()));
        assert::contains(&std::fs::read_to_string(path).unwrap(), "Language: hu");
        assert_eq!(tree.domain(), "djangojs");
    }
}
