//! Trovato Catalog Library
//!
//! Gettext `.po` catalogs for interface translation: a fail-closed parser,
//! a `Plural-Forms` evaluator, fallback lookups, format-string checks, a
//! normalizing writer, and a hot-reloadable locale service.
//! The `trovato-catalog` binary wraps these for command-line use.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod plural;
pub mod services;

pub use catalog::{Catalog, CatalogStats, Entry, Header, Msgstr, ParseOptions, SourceRef};
pub use config::Config;
pub use error::{CatalogError, ParseError, PluralError};
pub use format::{FormatIssue, FormatKind};
pub use plural::PluralForms;
pub use services::locale::{LoadReport, LocaleService};
