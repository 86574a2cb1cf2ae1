//! Configuration loaded from an optional TOML file and environment variables.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::ParseOptions;

/// Catalog tooling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the `<lang>/LC_MESSAGES/<domain>.po` tree (default: ./locale).
    pub locale_dir: PathBuf,

    /// Gettext domain, the `.po` file stem (default: djangojs).
    pub domain: String,

    /// Language used when a lookup names none (default: en).
    pub default_language: String,

    /// Reject catalogs without a header entry (default: false).
    pub require_header: bool,

    /// Treat format-string mismatches as errors in `check` (default: false).
    pub strict_format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale_dir: PathBuf::from("./locale"),
            domain: "djangojs".to_string(),
            default_language: "en".to_string(),
            require_header: false,
            strict_format: false,
        }
    }
}

impl Config {
    /// Load `path` if given, then apply environment overrides. Without a
    /// file the environment is applied over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_vars(|key| env::var(key).ok())
    }

    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Apply `CATALOG_*` overrides from `lookup`.
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("CATALOG_LOCALE_DIR") {
            self.locale_dir = PathBuf::from(dir);
        }
        if let Some(domain) = lookup("CATALOG_DOMAIN") {
            self.domain = domain;
        }
        if let Some(language) = lookup("CATALOG_DEFAULT_LANGUAGE") {
            self.default_language = language;
        }
        if let Some(raw) = lookup("CATALOG_REQUIRE_HEADER") {
            self.require_header =
                parse_bool(&raw).context("CATALOG_REQUIRE_HEADER must be a boolean")?;
        }
        if let Some(raw) = lookup("CATALOG_STRICT_FORMAT") {
            self.strict_format =
                parse_bool(&raw).context("CATALOG_STRICT_FORMAT must be a boolean")?;
        }
        Ok(self)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new().require_header(self.require_header)
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized boolean '{other}'"),
    }
}
