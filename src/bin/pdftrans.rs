//! CLI binary for pdftrans.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `TranslationConfig`, resolves the API credential, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdftrans::{
    models, translate_to_file, OutputMode, Platform, ProgressObserver, RetryPolicy,
    TranslationConfig, TranslationMode,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Placeholder value shipped in .env templates; never a real credential.
const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress observer using indicatif ────────────────────────────────────

/// Terminal progress observer: a live bar plus per-page log lines. Pages
/// complete out of order under concurrency, so the bar counts completions
/// rather than tracking a current page.
struct CliProgress {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgress {
    /// Bar length is set by `on_start` once the page count is known.
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl ProgressObserver for CliProgress {
    fn on_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Translating");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Translating {total_pages} pages…"))
        ));
    }

    fn on_page_done(&self, page_num: usize, total_pages: usize, ok: bool) {
        if ok {
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}",
                green("✓"),
                page_num,
                total_pages
            ));
        } else {
            self.errors.fetch_add(1, Ordering::SeqCst);
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                red("✗"),
                page_num,
                total_pages,
                red("failed")
            ));
        }
        self.bar.inc(1);
    }

    fn on_finish(&self, total_pages: usize, translated: usize) {
        let failed = total_pages.saturating_sub(translated);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} pages translated successfully",
                green("✔"),
                bold(&translated.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages translated  ({} failed)",
                if failed == total_pages {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&translated.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate to Korean (default), writing paper_translated.txt
  pdftrans paper.pdf

  # Another target language
  pdftrans paper.pdf -l Japanese

  # Text-only pipeline (no page rendering, cheaper)
  pdftrans paper.pdf --text-only

  # Reconstruct a translated PDF instead of text
  pdftrans paper.pdf --pdf-output -o paper_ko.pdf

  # Pick a model
  pdftrans paper.pdf -m gemini-2.0-flash

  # List available models (no API key needed)
  pdftrans --list-models

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY   Google Gemini API key (a .env file in the working
                   directory is also read)

SETUP:
  1. Set API key:  export GEMINI_API_KEY=AIza...
  2. Translate:    pdftrans document.pdf

  A pdfium shared library must be available (system-wide, or next to the
  executable)."#;

/// Translate PDF documents using Google Gemini models.
#[derive(Parser, Debug)]
#[command(
    name = "pdftrans",
    version,
    about = "Translate PDF documents using Google Gemini models",
    long_about = "Translate PDF documents page by page with Google's Gemini API. By default \
each page is rendered to an image and translated multimodally, preserving content the text \
layer misses (figures, scanned pages); --text-only switches to plain text extraction.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to translate.
    #[arg(required_unless_present = "list_models")]
    input: Option<PathBuf>,

    /// Output path. Default: {input}_translated.txt (or .pdf).
    #[arg(short, long, env = "PDFTRANS_OUTPUT")]
    output: Option<PathBuf>,

    /// Target language for the translation.
    #[arg(short = 'l', long, env = "PDFTRANS_LANGUAGE", default_value = "Korean")]
    language: String,

    /// Gemini API key. Overrides GEMINI_API_KEY and any .env file.
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Model to use (see --list-models).
    #[arg(short = 'm', long, env = "PDFTRANS_MODEL", default_value = pdftrans::DEFAULT_MODEL)]
    model: String,

    /// List available models and exit.
    #[arg(long)]
    list_models: bool,

    /// Translate extracted text instead of rendered page images.
    #[arg(long, env = "PDFTRANS_TEXT_ONLY")]
    text_only: bool,

    /// Write a reconstructed PDF instead of a text file.
    #[arg(long, env = "PDFTRANS_PDF_OUTPUT", conflicts_with = "text_only")]
    pdf_output: bool,

    /// Number of concurrent translation calls.
    #[arg(short, long, env = "PDFTRANS_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Longest edge of a rendered page in pixels.
    #[arg(long, env = "PDFTRANS_MAX_PIXELS", default_value_t = 2000,
          value_parser = clap::value_parser!(u32).range(100..=8000))]
    max_pixels: u32,

    /// Retries per page on transient failures.
    #[arg(long, env = "PDFTRANS_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// Per-call API timeout in seconds.
    #[arg(long, env = "PDFTRANS_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Font platform override for PDF output: windows, macos, linux.
    #[arg(long = "os", env = "PDFTRANS_OS")]
    os: Option<Platform>,

    /// Disable the progress bar.
    #[arg(long, env = "PDFTRANS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFTRANS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFTRANS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env into the environment before clap reads env-backed flags.
    // dotenvy never overrides variables that are already set, which gives
    // the flag > environment > .env precedence for free.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── List-models mode ─────────────────────────────────────────────────
    if cli.list_models {
        println!("{:<22}  {:<38}  {}", bold("MODEL"), bold("API NAME"), bold("IMAGE INPUT"));
        for m in models::all() {
            let default_marker = if m.logical_id == pdftrans::DEFAULT_MODEL {
                " (default)"
            } else {
                ""
            };
            println!(
                "{:<22}  {:<38}  {}{}",
                m.logical_id,
                dim(m.api_name),
                if m.supports_multimodal { green("✓") } else { red("✗") },
                default_marker,
            );
        }
        return Ok(());
    }

    let input = cli
        .input
        .clone()
        .context("No input PDF given (see --help)")?;

    // ── Credential resolution: flag > environment > .env ─────────────────
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .filter(|k| !k.trim().is_empty() && k != PLACEHOLDER_API_KEY)
        .unwrap_or_default();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = TranslationConfig::builder()
        .api_key(api_key)
        .target_language(&cli.language)
        .model(&cli.model)
        .mode(if cli.text_only {
            TranslationMode::TextOnly
        } else {
            TranslationMode::Multimodal
        })
        .output(if cli.pdf_output {
            OutputMode::Pdf
        } else {
            OutputMode::Text
        })
        .concurrency(cli.concurrency)
        .max_render_pixels(cli.max_pixels)
        .api_timeout_secs(cli.api_timeout)
        .retry(RetryPolicy {
            max_attempts: cli.max_retries + 1,
            ..RetryPolicy::default()
        });

    if let Some(platform) = cli.os {
        builder = builder.font_platform(platform);
    }
    if show_progress {
        builder = builder.progress(CliProgress::new());
    }

    let config = builder.build().context("Invalid configuration")?;

    // A PDF artifact with a non-.pdf name is almost always a stale -o value;
    // correct the extension rather than write a mislabelled file.
    let output = cli.output.clone().map(|p| {
        if cli.pdf_output && p.extension().and_then(|e| e.to_str()) != Some("pdf") {
            let corrected = p.with_extension("pdf");
            eprintln!(
                "{} Output renamed to {} to match PDF output",
                cyan("◆"),
                corrected.display()
            );
            corrected
        } else {
            p
        }
    });

    // ── Run, racing Ctrl-C ───────────────────────────────────────────────
    // The artifact is written only after every page has a terminal result,
    // so dropping the pipeline future on interrupt never leaves a partial
    // output file behind.
    let run = translate_to_file(&input, output.as_deref(), &config);
    tokio::select! {
        result = run => {
            let (path, output) = result.context("Translation failed")?;
            if !cli.quiet {
                eprintln!(
                    "{}  {}/{} pages  {}ms  →  {}",
                    if output.stats.failed_pages == 0 { green("✔") } else { cyan("⚠") },
                    output.stats.translated_pages,
                    output.stats.total_pages,
                    output.stats.total_duration_ms,
                    bold(&path.display().to_string()),
                );
            }
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n{} Interrupted; no output written.", red("✘"));
            std::process::exit(130);
        }
    }

    Ok(())
}
