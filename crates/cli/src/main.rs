use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use readmode_core::{
    ConfigLoader, Document, ExtractionResult, HtmlConfig, JsonConfig, MarkdownConfig, OutputFormat, Presenter,
    ReadMode, ReadModeConfig, ReadingSession, TextConfig, convert_to_json, convert_to_markdown, convert_to_text,
    render_reading_view,
};
use tracing_subscriber::EnvFilter;

use crate::fetch::{FetchConfig, Input};

mod echo;
mod fetch;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render a web page as a distraction-free reading view
#[derive(Parser, Debug)]
#[command(name = "readmode")]
#[command(version)]
#[command(about = "Render a web page as a distraction-free reading view", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, markdown, text, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: OutputFormat,

    /// Page URL used for site lookup when reading a file or stdin
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Site config directory (default: ~/.config/readmode/sites)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Minimum characters of text a candidate needs
    #[arg(long, default_value = "300", value_name = "NUM")]
    min_chars: usize,

    /// Minimum words a candidate needs
    #[arg(long, default_value = "50", value_name = "NUM")]
    min_words: usize,

    /// Emit only the cleaned content instead of a full HTML document (HTML only)
    #[arg(long)]
    fragment: bool,

    /// Include TOML frontmatter (Markdown only)
    #[arg(long)]
    frontmatter: bool,

    /// Include reference table with all links (Markdown/JSON only)
    #[arg(long)]
    references: bool,

    /// Strip images from output (Markdown only)
    #[arg(long)]
    no_images: bool,

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

/// Reports the reading view on the terminal; the view itself is written
/// once the session is active.
struct TerminalPresenter {
    verbose: bool,
}

impl Presenter for TerminalPresenter {
    fn show(&mut self, result: &ExtractionResult) {
        if self.verbose {
            echo::print_extraction_details(result);
        }
    }

    fn dismiss(&mut self) {
        if self.verbose {
            echo::print_info("Reading view closed");
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn build_reader(args: &Args) -> anyhow::Result<ReadMode> {
    let config = ReadModeConfig::builder().min_text_length(args.min_chars).min_word_count(args.min_words).build();

    match &args.config_dir {
        Some(dir) => {
            if !dir.is_dir() {
                bail!("Config directory not found: {}", dir.display());
            }
            ReadMode::with_config_dir(config, dir).context("Failed to load site configs")
        }
        None => {
            let registry = ConfigLoader::default().registry().context("Failed to load site configs")?;
            Ok(ReadMode::with_registry(config, registry))
        }
    }
}

fn render(result: &ExtractionResult, args: &Args) -> anyhow::Result<String> {
    let output = match args.format {
        OutputFormat::Html if args.fragment => result.content_html(),
        OutputFormat::Html => render_reading_view(result, &HtmlConfig::default()),
        OutputFormat::Markdown => {
            let config = MarkdownConfig {
                include_frontmatter: args.frontmatter,
                include_references: args.references,
                strip_images: args.no_images,
                include_title_heading: true,
            };
            convert_to_markdown(result, &config).context("Failed to convert to Markdown")?
        }
        OutputFormat::PlainText => {
            convert_to_text(result, &TextConfig { include_header: true, ..Default::default() })
                .context("Failed to convert to text")?
        }
        OutputFormat::Json => {
            let config = JsonConfig { include_references: args.references, ..Default::default() };
            convert_to_json(result, &config).context("Failed to convert to JSON")?
        }
    };

    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
    }

    let input = Input::parse(&args.input)?;

    if args.verbose {
        let source = match &input {
            Input::Stdin => "Reading from stdin".to_string(),
            Input::Url(url) => format!("Fetching from {}", url.as_str().bright_white().underline()),
            Input::File(path) => format!("Reading from file {}", path.display().bright_white()),
        };
        echo::print_step(1, 4, &source);
    }

    let fetch_config = FetchConfig {
        timeout: args.timeout,
        user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
    };
    let html = input.read(&fetch_config).await?;

    if args.verbose {
        echo::print_field("Size", &echo::format_size(html.len()));
        eprintln!();
        echo::print_step(2, 4, "Parsing HTML document");
    }

    let page_url = args.url.clone().or_else(|| input.url().map(|u| u.to_string()));
    let doc = match &page_url {
        Some(url) => Document::parse_with_url(&html, url).with_context(|| format!("Invalid page URL: {}", url))?,
        None => Document::parse(&html).context("Failed to parse HTML")?,
    };

    if args.verbose {
        if let Some(host) = doc.hostname() {
            echo::print_field("Host", host);
        }
        if let Some(title) = doc.title() {
            echo::print_field("Title", &title);
        }
        eprintln!();
        echo::print_step(3, 4, "Entering reading mode");
    }

    let reader = build_reader(&args)?;
    let mut session = ReadingSession::with_reader(TerminalPresenter { verbose: args.verbose }, reader);
    session.enter(&doc);

    let Some(result) = session.result() else {
        echo::print_warning("No readable content found; the page was left unchanged");
        bail!("No readable content could be extracted from {}", args.input);
    };

    let output = render(result, &args)?;

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        echo::print_field("Format", &args.format.to_string());
        eprintln!();
    }

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    session.exit();

    Ok(())
}
