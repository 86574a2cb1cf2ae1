//! Serialize a catalog back to `.po` text.
//!
//! Output is normalized: one blank line between entries, one `#:` line per
//! source reference, and strings with an inner newline are split into one
//! quoted line per `\n`-terminated chunk after an empty `""` literal. Lines
//! are never wrapped by width.

use std::fmt::{self, Write};

use super::{Catalog, Entry, Msgstr};

/// Write `catalog` as `.po` text.
pub fn write_catalog<W: Write>(catalog: &Catalog, out: &mut W) -> fmt::Result {
    let mut first = true;
    for entry in catalog.header_entry().into_iter().chain(catalog.entries()) {
        if !first {
            out.write_char('\n')?;
        }
        write_entry(entry, out)?;
        first = false;
    }
    Ok(())
}

/// Write one entry, comments first.
pub fn write_entry<W: Write>(entry: &Entry, out: &mut W) -> fmt::Result {
    for comment in &entry.translator_comments {
        if comment.is_empty() {
            out.write_str("#\n")?;
        } else {
            writeln!(out, "# {comment}")?;
        }
    }
    for comment in &entry.extracted_comments {
        writeln!(out, "#. {comment}")?;
    }
    for reference in &entry.references {
        writeln!(out, "#: {reference}")?;
    }
    if !entry.flags.is_empty() {
        writeln!(out, "#, {}", entry.flags.join(", "))?;
    }
    if let Some(previous) = &entry.previous_msgid {
        writeln!(out, "#| msgid \"{}\"", escape(previous))?;
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(msgctxt) = &entry.msgctxt {
        write_field(out, prefix, "msgctxt", msgctxt)?;
    }
    write_field(out, prefix, "msgid", &entry.msgid)?;
    if let Some(plural) = &entry.msgid_plural {
        write_field(out, prefix, "msgid_plural", plural)?;
    }
    match &entry.msgstr {
        Msgstr::Singular(text) => write_field(out, prefix, "msgstr", text)?,
        Msgstr::Plural(forms) => {
            for (index, text) in forms.iter().enumerate() {
                write_field(out, prefix, &format!("msgstr[{index}]"), text)?;
            }
        }
    }
    Ok(())
}

fn write_field<W: Write>(out: &mut W, prefix: &str, keyword: &str, value: &str) -> fmt::Result {
    let chunks: Vec<&str> = value.split_inclusive('\n').collect();
    if chunks.len() > 1 {
        writeln!(out, "{prefix}{keyword} \"\"")?;
        for chunk in chunks {
            writeln!(out, "{prefix}\"{}\"", escape(chunk))?;
        }
        Ok(())
    } else {
        writeln!(out, "{prefix}{keyword} \"{}\"", escape(value))
    }
}

/// Escape a string for use inside a `.po` literal.
pub fn escape(value: &str) -> String {
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
