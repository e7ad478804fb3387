mod input;
mod output;
mod run;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use imgscout_core::ReferenceKind;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "imgscout")]
#[command(about = "Harvest product image URLs from an e-commerce catalog")]
struct Cli {
    /// Site profile YAML; overrides `IMGSCOUT_SITE_PATH`
    #[arg(long, global = true)]
    site: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Harvest images for every reference in an input table and write a report
    Run {
        /// Input table: .xlsx/.xls/.ods spreadsheet, .tsv, or CSV
        #[arg(long)]
        input: PathBuf,
        /// Destination report; .xlsx writes a workbook, anything else CSV
        #[arg(long)]
        output: PathBuf,
        /// Header of the column holding references (case-insensitive)
        #[arg(long, default_value = "link")]
        column: String,
        /// Treat every reference as this kind instead of classifying it
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// Process at most this many rows
        #[arg(long)]
        limit: Option<usize>,
        /// Load pages in a headless browser; overrides `IMGSCOUT_RENDER_JS`
        #[arg(long)]
        render_js: bool,
    },
    /// Harvest a single reference and print its image URLs
    Fetch {
        /// Product URL, SKU, or search term
        reference: String,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// Load the page in a headless browser; overrides `IMGSCOUT_RENDER_JS`
        #[arg(long)]
        render_js: bool,
    },
    /// Extract image URLs from a saved document without network access
    Extract {
        /// Saved HTML or JSON document
        #[arg(long)]
        file: PathBuf,
        /// URL the document was fetched from; relative paths resolve against it
        #[arg(long)]
        page_url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Url,
    Sku,
    Search,
}

impl From<KindArg> for ReferenceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Url => ReferenceKind::Url,
            KindArg::Sku => ReferenceKind::Sku,
            KindArg::Search => ReferenceKind::Search,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = imgscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let site_path = cli.site.as_deref().or(config.site_path.as_deref());

    match cli.command {
        Some(Commands::Run {
            input,
            output,
            column,
            kind,
            limit,
            render_js,
        }) => {
            let site = run::resolve_site(site_path)?;
            let options = run::RunOptions {
                input: &input,
                output: &output,
                column: &column,
                kind: kind.map(Into::into),
                limit,
                render_js: render_js || config.scraper_render_js,
            };
            run::run_batch(&config, site, &options).await?;
        }
        Some(Commands::Fetch {
            reference,
            kind,
            render_js,
        }) => {
            let site = run::resolve_site(site_path)?;
            let render_js = render_js || config.scraper_render_js;
            run::run_fetch(&config, site, &reference, kind.map(Into::into), render_js).await?;
        }
        Some(Commands::Extract { file, page_url }) => {
            let site = run::resolve_site(site_path)?;
            run::run_extract(&site, &file, &page_url)?;
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
