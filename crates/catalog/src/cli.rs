//! CLI command implementations for catalog tooling.
//!
//! Each command writes its report to `out` and returns an error for the
//! conditions that should end the process with a non-zero status.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::catalog::{Catalog, ParseOptions};
use crate::error::CatalogError;
use crate::format;
use crate::plural::PluralForms;
use crate::services::locale::{LocaleService, primary_subtag};

/// Parse each file, validate format strings, and print statistics.
///
/// Fails if any file does not parse, or if `strict` and any format issue
/// was found.
pub fn cmd_check(
    out: &mut impl Write,
    files: &[PathBuf],
    options: ParseOptions,
    strict: bool,
) -> Result<()> {
    let mut broken = 0usize;
    let mut issues = 0usize;

    for path in files {
        let catalog = match Catalog::from_path(path, options) {
            Ok(catalog) => catalog,
            Err(e) => {
                writeln!(out, "{}: error: {e}", path.display())?;
                broken += 1;
                continue;
            }
        };

        let found = format::check_catalog(&catalog);
        for issue in &found {
            writeln!(out, "{}: format: {issue}", path.display())?;
        }
        issues += found.len();

        let stats = catalog.stats();
        writeln!(
            out,
            "{}: {} messages, {} translated, {} fuzzy, {} untranslated",
            path.display(),
            stats.total,
            stats.translated,
            stats.fuzzy,
            stats.untranslated
        )?;
    }

    if broken > 0 {
        bail!("{broken} of {} catalog(s) failed to parse", files.len());
    }
    if strict && issues > 0 {
        bail!("{issues} format string issue(s) found");
    }
    Ok(())
}

/// Print entry statistics for one catalog.
pub fn cmd_stats(out: &mut impl Write, path: &Path, options: ParseOptions) -> Result<()> {
    let catalog = Catalog::from_path(path, options)?;
    let stats = catalog.stats();

    writeln!(out, "{:<14} {}", "LANGUAGE", catalog.header().language().unwrap_or("-"))?;
    writeln!(out, "{:<14} {}", "PLURAL-FORMS", catalog.plural_forms().as_str())?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "{:<14} {}", "total", stats.total)?;
    writeln!(out, "{:<14} {}", "translated", stats.translated)?;
    writeln!(out, "{:<14} {}", "fuzzy", stats.fuzzy)?;
    writeln!(out, "{:<14} {}", "untranslated", stats.untranslated)?;
    writeln!(out, "{:<14} {}", "obsolete", stats.obsolete)?;
    Ok(())
}

/// Plural variant of a lookup: the `msgid_plural` and the count.
#[derive(Debug, Clone)]
pub struct PluralQuery {
    pub plural: String,
    pub count: u64,
}

/// Load `language` and print the translation of `msgid`.
///
/// A regional code such as `hu-HU` uses the `hu` catalog when no regional
/// directory exists.
pub fn cmd_lookup(
    out: &mut impl Write,
    service: &LocaleService,
    language: &str,
    context: Option<&str>,
    msgid: &str,
    plural: Option<&PluralQuery>,
) -> Result<()> {
    let mut loaded = service.load_language(language);
    if matches!(loaded, Err(CatalogError::Io { .. }))
        && let Some(primary) = primary_subtag(language)
    {
        debug!(language, primary, "no regional catalog, loading primary language");
        loaded = service.load_language(primary);
    }
    loaded.with_context(|| format!("failed to load catalog for '{language}'"))?;

    let context = context.unwrap_or_default();
    let translated = match plural {
        Some(query) => {
            service.translate_plural(msgid, &query.plural, query.count, context, language)
        }
        None => service.translate(msgid, context, language),
    };
    writeln!(out, "{translated}")?;
    Ok(())
}

/// Plural rule from a catalog header or a literal `Plural-Forms` value.
pub fn plural_forms_from(
    file: Option<&Path>,
    expr: Option<&str>,
    options: ParseOptions,
) -> Result<PluralForms> {
    match (file, expr) {
        (Some(path), None) => Ok(Catalog::from_path(path, options)?.plural_forms().clone()),
        (None, Some(expr)) => {
            PluralForms::parse(expr).with_context(|| format!("invalid Plural-Forms '{expr}'"))
        }
        _ => bail!("exactly one of --file or --expr is required"),
    }
}

/// Print the plural slot selected for each count.
pub fn cmd_plural(out: &mut impl Write, forms: &PluralForms, counts: &[u64]) -> Result<()> {
    writeln!(out, "{}", forms.as_str())?;
    for &count in counts {
        let index = forms.index(count)?;
        writeln!(out, "{count:>10} -> msgstr[{index}]")?;
    }
    Ok(())
}

/// Re-serialize a catalog in normalized form.
pub fn cmd_normalize(
    out: &mut impl Write,
    path: &Path,
    output: Option<&Path>,
    options: ParseOptions,
) -> Result<()> {
    let catalog = Catalog::from_path(path, options)?;
    let text = catalog.to_po_string();
    match output {
        Some(target) => {
            std::fs::write(target, &text)
                .with_context(|| format!("failed to write {}", target.display()))?;
            writeln!(
                out,
                "Wrote {} messages to {}.",
                catalog.entries().len(),
                target.display()
            )?;
        }
        None => out.write_all(text.as_bytes())?,
    }
    Ok(())
}

/// Dump header and entries as pretty JSON.
pub fn cmd_dump(out: &mut impl Write, path: &Path, options: ParseOptions) -> Result<()> {
    let catalog = Catalog::from_path(path, options)?;
    serde_json::to_writer_pretty(&mut *out, &catalog).context("failed to serialize catalog")?;
    writeln!(out)?;
    Ok(())
}

/// List languages found under the locale directory and whether they load.
pub fn cmd_languages(out: &mut impl Write, service: &LocaleService) -> Result<()> {
    let report = service.load_all();

    if report.loaded.is_empty() && report.failed.is_empty() {
        writeln!(out, "No catalogs found in {}.", service.locale_dir().display())?;
        return Ok(());
    }

    writeln!(out, "{:<12} {:<10} MESSAGES", "LANGUAGE", "STATUS")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for (language, count) in &report.loaded {
        writeln!(out, "{language:<12} {:<10} {count}", "ok")?;
    }
    for (language, error) in &report.failed {
        writeln!(out, "{language:<12} {:<10} {error}", "error")?;
    }
    Ok(())
}
