use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, error::ErrorKind};

use crate::category::{CategoryTable, KeywordMatcher};
#[cfg(feature = "http")]
use crate::config::SourceConfig;
use crate::config::{RotationConfig, StoreConfig};
use crate::constants::category::CATEGORY_ALL;
use crate::constants::present::{APP_NAME, CATEGORY_PARAM};
use crate::errors::QuoteError;
use crate::locale::{Language, Messages};
use crate::rotation::RotationEngine;
use crate::session::{PoolOrigin, QuoteSession, Selection};
use crate::source::{OfflineSource, QuoteSource};
use crate::store::{FileStore, StoreAdapter};
use crate::translate::TranslationCache;
use crate::types::CategoryId;

#[derive(Debug, Parser)]
#[command(
    name = "quote_galaxy",
    disable_help_subcommand = true,
    about = "Show quotes from a category without repeats",
    long_about = "Fetch the quote pool (falling back to the offline cache), then show quotes for a category without repeating any until the category is exhausted.",
    after_help = "Shown history, the cached pool, and translations persist in the store file between runs."
)]
/// CLI for `quote_galaxy`.
///
/// Common usage:
/// - Keep default persistence file location: `.quote_galaxy/store.bin`
/// - Set an explicit file path: `--store-path /tmp/quotes.bin`
/// - Set a custom directory and keep default filename: `--store-dir /tmp/quote_galaxy`
/// - Preselect a category from a shared link: `--url 'https://example.org/?category=love'`
struct QuoteCli {
    #[arg(long, help = "Category to draw quotes from (see --list-categories)")]
    category: Option<String>,
    #[arg(
        long,
        value_name = "URL",
        conflicts_with = "category",
        help = "Take the category from the `category` query parameter of a link"
    )]
    url: Option<String>,
    #[arg(
        long,
        default_value_t = 1,
        value_parser = parse_positive_usize,
        help = "Number of quotes to show"
    )]
    count: usize,
    #[arg(long, help = "Optional deterministic seed for quote selection")]
    seed: Option<u64>,
    #[arg(
        long = "min-category-pool",
        value_parser = parse_positive_usize,
        help = "Categories matching fewer quotes than this draw from the whole pool"
    )]
    min_category_pool: Option<usize>,
    #[arg(long, value_name = "URL", help = "Quote list endpoint override")]
    endpoint: Option<String>,
    #[arg(long, help = "Skip the network and use cached quotes only")]
    offline: bool,
    #[arg(
        long,
        value_parser = parse_language,
        help = "Display language (en, hi, es, fr, de, ja, zh); saved for later runs"
    )]
    language: Option<Language>,
    #[arg(long, help = "Translate quotes into the display language")]
    translate: bool,
    #[arg(long, help = "Print shareable text after each quote")]
    share: bool,
    #[arg(
        long = "store-path",
        value_name = "STORE_PATH",
        help = "Optional path for the persisted store file"
    )]
    store_path: Option<PathBuf>,
    #[arg(
        long = "store-dir",
        value_name = "DIR",
        conflicts_with = "store_path",
        help = "Optional directory for the persisted store file (uses store.bin filename)"
    )]
    store_dir: Option<PathBuf>,
    #[arg(long = "list-categories", help = "Print known categories and exit")]
    list_categories: bool,
    #[arg(
        long = "reset-history",
        help = "Forget which quotes were shown in the category before drawing"
    )]
    reset_history: bool,
}

/// Run the `quote_galaxy` CLI against `args_iter` (program name excluded).
pub fn run_quote_cli<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<QuoteCli, _>(std::iter::once("quote_galaxy".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let table = CategoryTable::builtin();
    if cli.list_categories {
        print_categories(&table);
        return Ok(());
    }
    let category = resolve_category(&table, cli.category.as_deref(), cli.url.as_deref())?;

    let store_path = if let Some(path) = cli.store_path {
        path
    } else if let Some(dir) = cli.store_dir {
        StoreConfig::default_path_in_dir(dir)
    } else {
        StoreConfig::default().path
    };
    let file_store = FileStore::open_config(&StoreConfig { path: store_path })?;
    println!("Persisting quote state to {}", file_store.path().display());
    let store = StoreAdapter::new(Arc::new(file_store));

    let language = match cli.language {
        Some(language) => {
            language.save(&store);
            language
        }
        None => Language::detect_from(&store),
    };
    let messages = language.messages();

    let mut rotation = RotationConfig {
        seed: cli.seed,
        ..RotationConfig::default()
    };
    if let Some(min) = cli.min_category_pool {
        rotation.min_category_pool = min;
    }
    let engine = RotationEngine::new(Arc::new(KeywordMatcher::new(table)), rotation);

    let source = build_source(cli.offline, cli.endpoint);
    let translator = if cli.translate && language != Language::English {
        build_translator(store.clone())
    } else {
        None
    };

    let mut session = QuoteSession::open(source, engine, store);
    session.select_category(category);
    if cli.reset_history {
        if session.reset_history() {
            println!("Cleared shown history for '{}'", session.category());
        } else {
            eprintln!(
                "Could not persist cleared history for '{}'",
                session.category()
            );
        }
    }

    println!("{}", messages.loading);
    match session.refresh() {
        Ok(_) => {}
        Err(QuoteError::EmptyResult) => {
            eprintln!("{}", messages.no_quotes);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }
    for _ in 0..cli.count {
        match session.next_quote() {
            Ok(selection) => {
                print_selection(
                    &selection,
                    &messages,
                    language,
                    translator.as_ref(),
                    cli.share.then_some(cli.url.as_deref()),
                );
            }
            Err(QuoteError::EmptyResult) => {
                eprintln!("{}", messages.no_quotes);
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    if session.origin() == PoolOrigin::Cache && session.is_offline() {
        println!("Served {} cached quotes", session.pool().len());
    }

    Ok(())
}

/// Shareable text for a quote, optionally followed by a link.
pub fn share_text(text: &str, author: &str, link: Option<&str>) -> String {
    let mut out = format!("\"{text}\"\n— {author}\n\n✨ From {APP_NAME}");
    if let Some(link) = link {
        out.push('\n');
        out.push_str(link);
    }
    out
}

fn share_block(text: &str, author: &str, link: Option<&str>) -> String {
    format!("--- share ---\n{}", share_text(text, author, link))
}

/// Value of the `category` query parameter in `url`, if present and non-empty.
///
/// The value is form-decoded (`+` and `%XX` escapes) before it is returned.
pub fn category_from_url(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == CATEGORY_PARAM)
        .map(|(_, value)| form_decode(value).trim().to_lowercase())
        .filter(|value| !value.is_empty())
}

/// Decode an `application/x-www-form-urlencoded` value. Malformed escapes are kept verbatim.
fn form_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = bytes
                    .get(idx + 1..idx + 3)
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match escaped {
                    Some(byte) => {
                        out.push(byte);
                        idx += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        idx += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Category to run with.
///
/// An explicit category must be known. A category taken from a link is used
/// only when known and otherwise falls back to `all`.
fn resolve_category(
    table: &CategoryTable,
    explicit: Option<&str>,
    url: Option<&str>,
) -> Result<CategoryId, QuoteError> {
    if let Some(raw) = explicit {
        let id = raw.trim().to_lowercase();
        if !table.is_known(&id) {
            return Err(QuoteError::Configuration(format!(
                "unknown category '{}'; expected one of: {}",
                raw,
                table.ids().collect::<Vec<_>>().join(", ")
            )));
        }
        return Ok(id);
    }
    let from_url = url
        .and_then(category_from_url)
        .filter(|id| table.is_known(id));
    Ok(from_url.unwrap_or_else(|| CATEGORY_ALL.to_string()))
}

#[cfg(feature = "http")]
fn build_source(offline: bool, endpoint: Option<String>) -> Box<dyn QuoteSource> {
    if offline {
        return Box::new(OfflineSource);
    }
    let mut config = SourceConfig::default();
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    Box::new(crate::source::HttpQuoteSource::new(config))
}

#[cfg(not(feature = "http"))]
fn build_source(_offline: bool, _endpoint: Option<String>) -> Box<dyn QuoteSource> {
    Box::new(OfflineSource)
}

#[cfg(feature = "http")]
fn build_translator(store: StoreAdapter) -> Option<TranslationCache> {
    Some(TranslationCache::new(
        Box::new(crate::translate::MyMemoryTranslator::default()),
        store,
    ))
}

#[cfg(not(feature = "http"))]
fn build_translator(_store: StoreAdapter) -> Option<TranslationCache> {
    None
}

fn print_selection(
    selection: &Selection,
    messages: &Messages,
    language: Language,
    translator: Option<&TranslationCache>,
    share: Option<Option<&str>>,
) {
    let (text, author) = match translator {
        Some(cache) => {
            println!("{}", messages.translating);
            (
                cache.translate(&selection.quote.text, language.code()),
                cache.translate(&selection.quote.author, language.code()),
            )
        }
        None => (selection.quote.text.clone(), selection.quote.author.clone()),
    };
    println!();
    println!("  \"{text}\"");
    println!("    — {author}");
    println!();
    if selection.widened {
        println!("{}", messages.variety);
    }
    if selection.offline {
        println!("{}", messages.offline);
    }
    println!("{}", language.viewed_status(selection.viewed));
    if let Some(link) = share {
        println!("{}", share_block(&text, &author, link));
    }
}

fn print_categories(table: &CategoryTable) {
    println!("--- categories ---");
    for id in table.ids() {
        match table.keywords(id) {
            Some(keywords) if !keywords.is_empty() => {
                println!("{id}: {}", keywords.join(", "))
            }
            _ => println!("{id}: (every quote)"),
        }
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("Could not parse '{}' as a positive integer", raw))?;
    if parsed == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_language(raw: &str) -> Result<Language, String> {
    raw.parse::<Language>().map_err(|err| err.to_string())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
