#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Fixtures live under `tests/fixtures/locale` in the same
//! `<lang>/LC_MESSAGES/<domain>.po` layout the locale service reads.

#![allow(dead_code)]

use std::path::PathBuf;

use trovato_catalog::{Catalog, LocaleService, ParseOptions};

pub const DOMAIN: &str = "djangojs";

/// Root of the checked-in fixture locale tree.
pub fn fixture_locale_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("locale")
}

/// Path of a fixture catalog.
pub fn fixture_path(language: &str) -> PathBuf {
    fixture_locale_dir()
        .join(language)
        .join("LC_MESSAGES")
        .join(format!("{DOMAIN}.po"))
}

/// Parse a fixture catalog, panicking on failure.
pub fn load_fixture(language: &str) -> Catalog {
    Catalog::from_path(&fixture_path(language), ParseOptions::new())
        .unwrap_or_else(|e| panic!("fixture {language} failed to parse: {e}"))
}

/// A locale service over the fixture tree.
pub fn fixture_service() -> LocaleService {
    LocaleService::with_layout(&fixture_locale_dir(), DOMAIN, ParseOptions::new())
}
