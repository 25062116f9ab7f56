use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use linkpeek_core::{
    Document, PreviewContext, PreviewError, fetch_file, fetch_stdin, preview_to_json, preview_to_text,
    preview_to_toml, select,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the rendered preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Toml,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, toml, text", s)),
        }
    }
}

/// Build a rich link preview (title, description, image) for a web page
#[derive(Parser, Debug)]
#[command(name = "linkpeek")]
#[command(author = "linkpeek Contributors")]
#[command(version)]
#[command(about = "Build rich link previews from web pages", long_about = None)]
struct Args {
    /// Page URL to preview
    #[arg(value_name = "URL")]
    url: String,

    /// Extraction strategy (standard, wechat)
    #[arg(short, long, default_value = "standard", value_name = "STRATEGY")]
    strategy: String,

    /// Locale sent as Accept-Language (default: en-US)
    #[arg(short, long, value_name = "LOCALE")]
    locale: Option<String>,

    /// Output format (json, toml, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Read the page from a local HTML file, or "-" for stdin, instead of fetching URL
    #[arg(long, value_name = "FILE")]
    html: Option<String>,

    /// Download the preview image to FILE
    #[arg(long, value_name = "FILE")]
    image_out: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Routes core tracing events to stderr so stdout stays clean for output.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "linkpeek_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_context(args: &Args) -> anyhow::Result<PreviewContext> {
    let mut builder = PreviewContext::builder(&args.url)
        .strategy(&args.strategy)
        .timeout(args.timeout);

    if let Some(locale) = &args.locale {
        builder = builder.locale(locale);
    }
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if let Some(source) = &args.html {
        let html = if source == "-" {
            fetch_stdin().context("Failed to read from stdin")?
        } else {
            fetch_file(source).with_context(|| format!("Failed to read file: {}", source))?
        };

        if args.verbose {
            eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
        }
        builder = builder.document(Document::parse(&html).context("Failed to parse HTML")?);
    }

    Ok(builder.build())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let total_steps = if args.image_out.is_some() { 4 } else { 3 };
    let start = Instant::now();
    let mut timings: Vec<(String, Duration)> = Vec::new();

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    if args.verbose {
        match &args.html {
            Some(source) if source == "-" => echo::print_step(1, total_steps, "Reading page from stdin"),
            Some(source) => echo::print_step(1, total_steps, &format!("Reading page from {}", source.bright_white())),
            None => echo::print_step(1, total_steps, &format!("Preparing {}", args.url.bright_white().underline())),
        }
    }

    let step_start = Instant::now();
    let mut context = build_context(&args)?;
    timings.push(("Prepare".to_string(), step_start.elapsed()));

    if args.verbose {
        eprintln!();
        echo::print_step(2, total_steps, &format!("Extracting with strategy {}", args.strategy.bright_white()));
    }

    let step_start = Instant::now();
    let preview = select(&mut context)
        .context("Failed to select strategy")?
        .preview()
        .await
        .context("Failed to build preview")?
        .to_preview();
    timings.push(("Preview".to_string(), step_start.elapsed()));

    if args.verbose {
        echo::print_preview_details(&preview);
        echo::print_step(3, total_steps, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
    }

    let output = match args.format {
        OutputFormat::Json => preview_to_json(&preview, args.pretty),
        OutputFormat::Toml => preview_to_toml(&preview),
        OutputFormat::Text => preview_to_text(&preview),
    }
    .context("Failed to render preview")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    if let Some(path) = &args.image_out {
        if args.verbose {
            echo::print_step(4, total_steps, "Downloading preview image");
        }

        let step_start = Instant::now();
        match context.image_bytes().await {
            Ok(bytes) => {
                fs::write(path, bytes).with_context(|| format!("Failed to write image: {}", path.display()))?;
                echo::print_success(&format!(
                    "Image ({}) written to {}",
                    echo::format_size(bytes.len()),
                    path.display().bright_white()
                ));
            }
            Err(PreviewError::ImageNotFound) => echo::print_warning("Page has no preview image, nothing saved"),
            Err(e) => return Err(e).context("Failed to download image"),
        }
        timings.push(("Image".to_string(), step_start.elapsed()));
    }

    if args.verbose {
        eprintln!();
        echo::print_timing_summary(start.elapsed(), &timings);
    }

    Ok(())
}
