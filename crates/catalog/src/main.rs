//! Trovato Catalog CLI
//!
//! Validate, inspect, and normalize gettext `.po` catalogs.
//!
//! Usage:
//!   trovato-catalog check locale/hu/LC_MESSAGES/djangojs.po
//!   trovato-catalog lookup --lang hu "Available %s"

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trovato_catalog::cli::{self, PluralQuery};
use trovato_catalog::{Config, LocaleService};

/// Gettext catalog tooling.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file; environment variables override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Locale directory holding `<lang>/LC_MESSAGES/<domain>.po`.
    #[arg(long, global = true)]
    locale_dir: Option<PathBuf>,

    /// Gettext domain.
    #[arg(long, global = true)]
    domain: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse catalogs, validate format strings, and print statistics.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Fail on format string mismatches.
        #[arg(long)]
        strict: bool,
    },

    /// Print entry statistics.
    Stats { file: PathBuf },

    /// Translate a message using the catalogs under the locale directory.
    Lookup {
        /// Language code (default: CATALOG_DEFAULT_LANGUAGE).
        #[arg(long)]
        lang: Option<String>,

        #[arg(long)]
        context: Option<String>,

        msgid: String,

        #[arg(long, requires = "count")]
        plural: Option<String>,

        #[arg(long, requires = "plural")]
        count: Option<u64>,
    },

    /// Print the plural slot selected for each count.
    Plural {
        /// Take the rule from this catalog's header.
        #[arg(long, conflicts_with = "expr", required_unless_present = "expr")]
        file: Option<PathBuf>,

        /// A literal Plural-Forms value.
        #[arg(long)]
        expr: Option<String>,

        #[arg(required = true)]
        counts: Vec<u64>,
    },

    /// Re-serialize a catalog in normalized form.
    Normalize {
        file: PathBuf,

        /// Write here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Dump a catalog as JSON.
    Dump { file: PathBuf },

    /// List languages under the locale directory.
    Languages,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = args.locale_dir {
        config.locale_dir = dir;
    }
    if let Some(domain) = args.domain {
        config.domain = domain;
    }
    debug!(locale_dir = %config.locale_dir.display(), domain = %config.domain, "configuration loaded");

    let options = config.parse_options();
    let mut out = io::stdout().lock();

    match args.command {
        Command::Check { files, strict } => {
            cli::cmd_check(&mut out, &files, options, strict || config.strict_format)
        }
        Command::Stats { file } => cli::cmd_stats(&mut out, &file, options),
        Command::Lookup {
            lang,
            context,
            msgid,
            plural,
            count,
        } => {
            let service = LocaleService::new(&config);
            let language = lang.unwrap_or_else(|| config.default_language.clone());
            let query = plural
                .zip(count)
                .map(|(plural, count)| PluralQuery { plural, count });
            cli::cmd_lookup(
                &mut out,
                &service,
                &language,
                context.as_deref(),
                &msgid,
                query.as_ref(),
            )
        }
        Command::Plural { file, expr, counts } => {
            let forms = cli::plural_forms_from(file.as_deref(), expr.as_deref(), options)?;
            cli::cmd_plural(&mut out, &forms, &counts)
        }
        Command::Normalize { file, output } => {
            cli::cmd_normalize(&mut out, &file, output.as_deref(), options)
        }
        Command::Dump { file } => cli::cmd_dump(&mut out, &file, options),
        Command::Languages => cli::cmd_languages(&mut out, &LocaleService::new(&config)),
    }
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
