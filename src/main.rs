use clap::{Parser, Subcommand};
use folio::{config, generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that write pages.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the write cache: rewrite every page even if unchanged
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for bilingual portfolio sites")]
#[command(long_about = "\
Static site generator for bilingual portfolio sites

Page bodies are hand-authored HTML or Markdown. Every page gets the shared
header, footer, favicon and analytics fragments, a navigation menu with the
current page marked, an English/Portuguese switch, a light/dark theme toggle
and, where the page asks for them, project cards from a JSON file.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── fragments/                   # header.html, footer.html, favicon.html, analytics.html
  │   └── pt/                      # Per-language overrides (optional)
  ├── data/projects.json           # Project cards
  ├── assets/                      # Copied verbatim to the output
  ├── index.html                   # English pages at the root
  ├── about.md                     # Markdown bodies become .html pages
  ├── projects/portfolio.html      # Nested pages keep their directories
  └── pt/                          # Portuguese pages mirror the English tree
      └── index.html

Page mount points (element ids):
  nav-links, language-toggle, theme-toggle    usually in the header fragment
  projects-container                          all project cards
  featured-projects-container                 the first [projects] featured cards

Fragments may use {{root}} and {{lang_root}} for page-relative links.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".folio-temp", global = true)]
    temp_dir: PathBuf,

    /// Log at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Compose the HTML site from the scanned manifest
    Generate(CacheArgs),
    /// Run the full pipeline: scan → generate
    Build(CacheArgs),
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate(cache_args) => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let manifest_content = std::fs::read_to_string(&manifest_path)?;
            let manifest: scan::Manifest = serde_json::from_str(&manifest_content)?;
            init_thread_pool(&manifest.config.processing);
            let result =
                generate::generate(&manifest, &cli.source, &cli.output, !cache_args.no_cache)?;
            output::print_generate_output(&result);
        }
        Command::Build(cache_args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let result =
                generate::generate(&manifest, &cli.source, &cli.output, !cache_args.no_cache)?;
            output::print_generate_output(&result);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stage output on stdout stays clean.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects info and the
/// default shows warnings (missing fragments, translations, project data).
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Write the scan manifest into the temp dir and return its path.
fn write_manifest(
    manifest: &scan::Manifest,
    temp_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&manifest_path, json)?;
    Ok(manifest_path)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores: config can lower it, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
