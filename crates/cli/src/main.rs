use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::Parser;
use httpedia_core::{
    FetchConfig, HttpFetcher, ImageMode, Preferences, RenderConfig, RenderedArticle, Renderer, Skin, fetch_file,
    fetch_stdin,
};
use owo_colors::OwoColorize;
use url::Url;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the rendered article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, json", s)),
        }
    }
}

/// Render Wikipedia articles as HTML 2.0 for vintage browsers
#[derive(Parser, Debug)]
#[command(name = "httpedia")]
#[command(author = "HTTPedia Contributors")]
#[command(version)]
#[command(about = "Render Wikipedia articles as HTML 2.0 for vintage browsers", long_about = None)]
struct Args {
    /// Wikipedia article URL, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Article title (default: taken from the URL or file name)
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: OutputFormat,

    /// Display skin (standard, plain)
    #[arg(long, default_value = "standard", value_name = "SKIN")]
    skin: Skin,

    /// Image mode (none, first, all)
    #[arg(long, default_value = "first", value_name = "MODE")]
    images: ImageMode,

    /// Maximum number of images kept in "all" mode
    #[arg(long, default_value = "10", value_name = "NUM")]
    max_images: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "10", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Print progress and render details to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Where the upstream HTML comes from.
enum Source {
    Stdin,
    File(String),
    Wiki { base: String, title: String },
}

impl Source {
    fn from_input(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::Stdin);
        }
        if !(input.starts_with("http://") || input.starts_with("https://")) {
            return Ok(Self::File(input.to_string()));
        }

        let url = Url::parse(input).with_context(|| format!("Invalid URL: {}", input))?;
        let Some(encoded) = url.path().strip_prefix("/wiki/").filter(|t| !t.is_empty()) else {
            bail!("Not a Wikipedia article URL: {}", input);
        };
        let title = urlencoding::decode(encoded).with_context(|| format!("Invalid article title in {}", input))?;

        Ok(Self::Wiki { base: url.origin().ascii_serialization(), title: title.into_owned() })
    }

    /// Title used when `--title` is absent.
    fn default_title(&self) -> String {
        match self {
            Self::Stdin => "Untitled".to_string(),
            Self::File(path) => Path::new(path)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Untitled".to_string()),
            Self::Wiki { title, .. } => title.clone(),
        }
    }
}

async fn render(args: &Args, source: &Source, title: &str) -> anyhow::Result<RenderedArticle> {
    let prefs = Preferences::new(args.skin, args.images);
    let mut config = RenderConfig::builder().max_images(args.max_images);

    let html = match source {
        Source::Stdin => {
            if args.verbose {
                echo::print_step(1, 3, "Reading from stdin");
            }
            fetch_stdin().context("Failed to read from stdin")?
        }
        Source::File(path) => {
            if args.verbose {
                echo::print_step(1, 3, &format!("Reading from file {}", path.bright_white()));
            }
            fetch_file(path).with_context(|| format!("Failed to read file: {}", path))?
        }
        Source::Wiki { base, title } => {
            if args.verbose {
                echo::print_step(1, 3, &format!("Fetching {} from {}", title.bright_white(), base.underline()));
            }
            config = config.wiki_base(base.clone());

            let mut fetch_config = FetchConfig { timeout: args.timeout, ..Default::default() };
            if let Some(user_agent) = &args.user_agent {
                fetch_config.user_agent = user_agent.clone();
            }

            let fetcher = HttpFetcher::new(&fetch_config).context("Failed to build HTTP client")?;
            let renderer = Renderer::with_config(config.build()).context("Failed to build renderer")?;

            if args.verbose {
                echo::print_step(2, 3, "Rendering article");
            }
            return renderer
                .fetch_and_render(&fetcher, title, &prefs)
                .await
                .with_context(|| format!("Failed to fetch article: {}", title));
        }
    };

    if args.verbose {
        echo::print_field("Size", &echo::format_size(html.len()));
        echo::print_step(2, 3, "Rendering article");
    }

    let renderer = Renderer::with_config(config.build()).context("Failed to build renderer")?;
    renderer.render_article(&html, title, &prefs).context("Failed to render article")
}

fn format_output(article: &RenderedArticle, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Html => Ok(format!("{}\n", article.body_html)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&article.to_json()).context("Failed to serialize article")?;
            Ok(format!("{}\n", json))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let started_at = Instant::now();

    if args.verbose {
        echo::print_banner();
        echo::print_info(&format!("Skin: {}, images: {}", args.skin, args.images));
        eprintln!();
    }

    let source = Source::from_input(&args.input)?;
    let title = args.title.clone().unwrap_or_else(|| source.default_title());

    let article = render(&args, &source, &title).await?;
    let rendered_in: Duration = started_at.elapsed();

    if args.verbose {
        echo::print_timing("Render", rendered_in);
        echo::print_render_details(&article);
        echo::print_step(3, 3, "Writing output");
        echo::print_field("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let output = format_output(&article, args.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", output),
    }

    Ok(())
}
