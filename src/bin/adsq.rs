//! Search or fetch BibTeX entries from NASA/ADS.

use anyhow::{Context, Result, bail};
use bibchex_core::ads::{
    AdsClient, AdsSearchQuery, AdsToken, ClientSettings, DEFAULT_DATABASE, DEFAULT_SEARCH_FIELDS,
    export_text, format_document, is_bibcode,
};
use clap::Parser;
use serde_json::Value;
use tracing::debug;

/// Search or fetch BibTeX entries from NASA/ADS.
///
/// Terms that are all bibcodes are fetched as BibTeX; anything else is
/// treated as a search query. Needs a NASA/ADS token in ADS_TOKEN
/// (see https://ui.adsabs.harvard.edu/help/api/).
#[derive(Parser, Debug)]
#[command(name = "adsq")]
#[command(author, version, about)]
struct Args {
    /// Search terms, or bibcodes to fetch
    terms: Vec<String>,

    /// Author name in standard ADS format (repeatable)
    #[arg(short, long = "author")]
    authors: Vec<String>,

    /// Publication year
    #[arg(short, long)]
    year: Option<String>,

    /// Database to search
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: String,

    /// Comma-separated fields to request
    #[arg(long, default_value = DEFAULT_SEARCH_FIELDS)]
    fields: String,

    /// Print the raw JSON response
    #[arg(long)]
    json: bool,

    /// NASA/ADS API root URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Set the logging level
    #[arg(long, alias = "loglevel", default_value = "warn")]
    log_level: String,
}

impl Args {
    fn is_fetch(&self) -> bool {
        self.authors.is_empty()
            && self.year.is_none()
            && !self.terms.is_empty()
            && self.terms.iter().all(|term| is_bibcode(term))
    }

    fn search_query(&self) -> AdsSearchQuery {
        AdsSearchQuery {
            terms: self.terms.clone(),
            authors: self.authors.clone(),
            year: self.year.clone(),
            database: Some(self.database.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_new(&args.log_level)
        .with_context(|| format!("Invalid log level '{}'", args.log_level))?;
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
    debug!(?args, "CLI arguments parsed");

    // Validate the query before asking for a token, so usage errors come first.
    let params = if args.is_fetch() {
        None
    } else {
        let query = args.search_query();
        debug!(?query, "Query object");
        Some(query.to_params()?)
    };

    let token = AdsToken::from_env()?;
    let mut settings = ClientSettings::default();
    if let Some(api_url) = &args.api_url {
        settings = settings.with_api_url(api_url.clone());
    }
    let client = AdsClient::new(token, &settings)?;

    match params {
        None => {
            debug!(terms = ?args.terms, "Fetching bibcodes");
            let body = client.export_raw(&args.terms, None).await?;
            if args.json {
                println!("{body}");
            } else {
                println!("{}", export_text(&body)?.trim());
            }
        }
        Some(params) => {
            debug!(?params, "Formatted query");
            let body = client.search_raw(&params, &args.fields).await?;
            if args.json {
                println!("{body}");
            } else {
                print_documents(&body)?;
            }
        }
    }

    Ok(())
}

fn print_documents(body: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(body).context("NASA/ADS returned invalid JSON")?;
    let Some(docs) = parsed
        .get("response")
        .and_then(|response| response.get("docs"))
        .and_then(Value::as_array)
    else {
        bail!("NASA/ADS response has no document list");
    };

    for doc in docs.iter().filter_map(Value::as_object) {
        println!("{}", format_document(doc));
    }
    Ok(())
}
