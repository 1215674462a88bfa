use clap::{Parser, Subcommand};
use serde::Serialize;
use simple_wiki::category::{self, Hierarchy};
use simple_wiki::config::{self, SiteConfig};
use simple_wiki::scan::{self, Manifest};
use simple_wiki::summary::{self, CategorySummary};
use simple_wiki::{links, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-wiki")]
#[command(about = "Category and wiki-link tooling for a Markdown wiki")]
#[command(long_about = "\
Category and wiki-link tooling for a Markdown wiki

Articles are Markdown files with TOML front matter. Categories are TOML
files that may name a parent category.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── categories/
  │   ├── science.toml             # name = \"Science\"
  │   └── physics.toml             # name = \"Physics\", parent = \"Science\"
  └── articles/
      ├── overview.md              # id \"overview\"
      └── physics/
          └── newton.md            # id \"physics/newton\"

Article front matter:

  +++
  title = \"Newton's laws\"
  description = \"Classical mechanics\"
  date = 2024-01-10
  lastmod = 2024-01-15
  category = \"Physics\"
  +++

Link between articles with [[Target]] or [[Target|Label]].

Run 'simple-wiki gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".simple-wiki-temp", global = true)]
    temp_dir: PathBuf,

    /// Log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load content and write the hierarchy manifest
    Scan,
    /// Validate categories and wiki links; fails on any problem
    Check,
    /// Print the category tree
    Tree {
        /// Only show the subtree under this category
        #[arg(long)]
        category: Option<String>,
        /// List each category's articles
        #[arg(long)]
        articles: bool,
    },
    /// Print article counts per category
    Summary,
    /// Print wiki links that point to no article
    Links,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// JSON written by the `scan` command.
#[derive(Serialize)]
struct ScanOutput<'a> {
    config: &'a SiteConfig,
    hierarchy: &'a Hierarchy,
    summary: &'a [CategorySummary],
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::print_error(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

/// Run one command. Errors are returned unprinted so `main` can show their
/// messages as written.
fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Scan => {
            let (manifest, hierarchy) = load(&cli.source)?;
            let summaries = summary::summarize(&manifest.articles);
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&ScanOutput {
                config: &manifest.config,
                hierarchy: &hierarchy,
                summary: &summaries,
            })?;
            std::fs::write(&manifest_path, json)?;
            info!(path = %manifest_path.display(), "manifest written");
            output::print_scan_output(&manifest, &hierarchy);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (manifest, hierarchy) = load(&cli.source)?;
            output::print_scan_output(&manifest, &hierarchy);
            let broken = links::find_broken_links(&manifest.articles, &manifest.config.base_path);
            if !broken.is_empty() {
                output::print_broken_links(&broken);
                warn!(count = broken.len(), "broken wiki links");
                return Ok(ExitCode::FAILURE);
            }
            println!("==> Content is valid");
        }
        Command::Tree { category, articles } => {
            let (_, hierarchy) = load(&cli.source)?;
            output::print_tree(&hierarchy, category.as_deref(), articles);
        }
        Command::Summary => {
            let manifest = scan_content(&cli.source)?;
            output::print_summary(&summary::summarize(&manifest.articles));
        }
        Command::Links => {
            let manifest = scan_content(&cli.source)?;
            let broken = links::find_broken_links(&manifest.articles, &manifest.config.base_path);
            output::print_broken_links(&broken);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Scan content with deployment overrides from the process environment.
///
/// The config is loaded and overridden first so the thread pool is sized
/// before any article is parsed, then handed to the scanner as is.
fn scan_content(source: &Path) -> Result<Manifest, Box<dyn std::error::Error>> {
    let mut site_config = config::load_config(source)?;
    config::apply_env_overrides(&mut site_config, |key| std::env::var(key).ok());
    site_config.validate()?;
    init_thread_pool(&site_config.processing);

    Ok(scan::scan_with_config(source, site_config)?)
}

/// Scan content and build the category hierarchy.
fn load(source: &Path) -> Result<(Manifest, Hierarchy), Box<dyn std::error::Error>> {
    let manifest = scan_content(source)?;
    let hierarchy = category::build(&manifest.categories, &manifest.articles)?;
    Ok((manifest, hierarchy))
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the level from `warn`.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
