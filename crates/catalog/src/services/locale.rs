//! Locale service for interface string translation.
//!
//! Loads `<locale_dir>/<lang>/LC_MESSAGES/<domain>.po` catalogs into an
//! in-memory map of `Arc<Catalog>` snapshots. A reload parses the new file
//! completely before swapping it in, so readers holding the old snapshot are
//! unaffected and a broken file never replaces a working catalog.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, ParseOptions};
use crate::config::Config;
use crate::error::CatalogError;

/// Outcome of [`LocaleService::load_all`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Languages loaded, with their active entry counts.
    pub loaded: Vec<(String, usize)>,
    pub failed: Vec<(String, CatalogError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Locale translation service.
pub struct LocaleService {
    locale_dir: PathBuf,
    domain: String,
    options: ParseOptions,
    /// Published catalogs keyed by language code as found on disk.
    catalogs: DashMap<String, Arc<Catalog>>,
}

impl LocaleService {
    /// Create a service reading catalogs laid out as `config` describes.
    pub fn new(config: &Config) -> Self {
        Self::with_layout(&config.locale_dir, &config.domain, config.parse_options())
    }

    pub fn with_layout(locale_dir: &Path, domain: &str, options: ParseOptions) -> Self {
        Self {
            locale_dir: locale_dir.to_path_buf(),
            domain: domain.to_string(),
            options,
            catalogs: DashMap::new(),
        }
    }

    pub fn locale_dir(&self) -> &Path {
        &self.locale_dir
    }

    /// Catalog file path for `language`.
    pub fn catalog_path(&self, language: &str) -> PathBuf {
        self.locale_dir
            .join(language)
            .join("LC_MESSAGES")
            .join(format!("{}.po", self.domain))
    }

    /// Parse and publish the catalog for `language`.
    ///
    /// On error the previously published catalog, if any, stays in place.
    pub fn load_language(&self, language: &str) -> Result<usize, CatalogError> {
        let path = self.catalog_path(language);
        let catalog = Catalog::from_path(&path, self.options)?;
        let count = catalog.len();
        self.catalogs.insert(language.to_string(), Arc::new(catalog));

        info!(language = %language, count = count, "loaded locale catalog");
        Ok(count)
    }

    /// Re-read `language` from disk, keeping the current catalog on failure.
    pub fn reload_language(&self, language: &str) -> Result<usize, CatalogError> {
        match self.load_language(language) {
            Ok(count) => {
                info!(language = %language, count = count, "reloaded locale catalog");
                Ok(count)
            }
            Err(e) => {
                warn!(
                    language = %language,
                    error = %e,
                    kept_previous = self.catalogs.contains_key(language),
                    "catalog reload failed"
                );
                Err(e)
            }
        }
    }

    /// Load every language directory that holds a catalog for this domain.
    pub fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();
        for language in self.discover_languages() {
            match self.load_language(&language) {
                Ok(count) => report.loaded.push((language, count)),
                Err(e) => {
                    warn!(language = %language, error = %e, "failed to load locale catalog");
                    report.failed.push((language, e));
                }
            }
        }
        info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "locale catalogs loaded"
        );
        report
    }

    /// Languages with a catalog file on disk, sorted.
    pub fn discover_languages(&self) -> Vec<String> {
        if !self.locale_dir.exists() {
            info!(
                locale_dir = %self.locale_dir.display(),
                "locale directory does not exist, nothing to discover"
            );
            return Vec::new();
        }

        let entries = match std::fs::read_dir(&self.locale_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "failed to read locale directory");
                return Vec::new();
            }
        };

        let mut languages: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|language| self.catalog_path(language).is_file())
            .collect();
        languages.sort();
        debug!(count = languages.len(), "discovered locale directories");
        languages
    }

    /// Publish an already-built catalog for `language`.
    pub fn install(&self, language: &str, catalog: Catalog) {
        let count = catalog.len();
        self.catalogs.insert(language.to_string(), Arc::new(catalog));
        info!(language = %language, count = count, "installed locale catalog");
    }

    /// Snapshot of the catalog serving `language`.
    ///
    /// `hu-HU` and `hu_HU` fall back to `hu` when no regional catalog is loaded.
    pub fn catalog(&self, language: &str) -> Option<Arc<Catalog>> {
        if let Some(catalog) = self.catalogs.get(language) {
            return Some(Arc::clone(catalog.value()));
        }
        let primary = primary_subtag(language)?;
        self.catalogs
            .get(primary)
            .map(|catalog| Arc::clone(catalog.value()))
    }

    /// Translate a source string.
    ///
    /// An empty `context` means no context. Falls back to the source string
    /// if no translation is found.
    pub fn translate(&self, source: &str, context: &str, language: &str) -> String {
        let Some(catalog) = self.catalog(language) else {
            return source.to_string();
        };
        let translated = if context.is_empty() {
            catalog.gettext(source)
        } else {
            catalog.pgettext(context, source)
        };
        translated.to_string()
    }

    /// Translate a plural message for `count`.
    ///
    /// Without a translation this returns `singular` when `count == 1` and
    /// `plural` otherwise.
    pub fn translate_plural(
        &self,
        singular: &str,
        plural: &str,
        count: u64,
        context: &str,
        language: &str,
    ) -> String {
        let Some(catalog) = self.catalog(language) else {
            return if count == 1 { singular } else { plural }.to_string();
        };
        let translated = if context.is_empty() {
            catalog.ngettext(singular, plural, count)
        } else {
            catalog.npgettext(context, singular, plural, count)
        };
        translated.to_string()
    }

    /// Loaded language codes, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.catalogs.iter().map(|e| e.key().clone()).collect();
        languages.sort();
        languages
    }

    /// Drop every published catalog.
    pub fn clear_cache(&self) {
        self.catalogs.clear();
    }
}

impl std::fmt::Debug for LocaleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleService")
            .field("locale_dir", &self.locale_dir)
            .field("domain", &self.domain)
            .field("languages", &self.catalogs.len())
            .finish()
    }
}

/// `hu` for `hu-HU` or `hu_HU`; `None` when `language` has no region.
pub fn primary_subtag(language: &str) -> Option<&str> {
    language
        .split_once(['-', '_'])
        .map(|(primary, _)| primary)
        .filter(|primary| !primary.is_empty())
}
