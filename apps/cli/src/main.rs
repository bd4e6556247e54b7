use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::{fs, io::AsyncReadExt};
use tracing_subscriber::EnvFilter;

use scholarsync_core::{
    Config, HttpCaptionFetcher, ModifyAction, Provider, ScholarSyncError, StudyGuide,
    StudyGuideService, TranscriptResolver, WatchPage, build_with_fallback, format_answer_key,
    format_study_guide_readable, format_transcript,
};

mod quiz;

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
enum CliProvider {
    Gemini,
    Huggingface,
    Local,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => Provider::Gemini,
            CliProvider::Huggingface => Provider::HuggingFace,
            CliProvider::Local => Provider::Local,
        }
    }
}

#[derive(Parser)]
#[command(name = "scholarsync")]
#[command(about = "Turn YouTube transcripts into AI-generated study guides")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log strategy attempts and backend calls to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the transcript of a video
    Transcript {
        /// Video URL
        url: String,

        /// Saved watch page (with the transcript panel open) to read instead of downloading
        #[arg(long)]
        page_file: Option<PathBuf>,
    },

    /// Generate a study guide: summary, key concepts and a quiz
    Guide {
        /// Video URL
        url: String,

        /// Saved watch page to read instead of downloading
        #[arg(long)]
        page_file: Option<PathBuf>,

        /// AI provider for guide generation
        #[arg(short, long)]
        provider: Option<CliProvider>,

        /// Model name, overriding the provider default
        #[arg(short, long)]
        model: Option<String>,

        /// Print the raw JSON guide
        #[arg(long)]
        json: bool,

        /// Take the quiz interactively
        #[arg(short, long)]
        quiz: bool,
    },

    /// Rewrite, translate or proofread a piece of text
    Modify {
        /// rewrite, translate or proofread
        action: ModifyAction,

        /// Target language for translate
        #[arg(long)]
        to: Option<String>,

        /// Text to modify; read from stdin when omitted
        text: Option<String>,

        /// AI provider
        #[arg(short, long)]
        provider: Option<CliProvider>,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("scholarsync_core=debug,scholarsync=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScholarSyncError>() {
        Some(ScholarSyncError::InvalidInput { .. }) => 2,
        Some(ScholarSyncError::TranscriptUnavailable) => 3,
        Some(ScholarSyncError::UpstreamInvalid { .. }) => 4,
        _ => 1,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        if let Some(ScholarSyncError::UpstreamInvalid { raw, .. }) = e.downcast_ref::<ScholarSyncError>() {
            tracing::debug!(%raw, "raw upstream response");
        }
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    match cli.command {
        Commands::Transcript { url, page_file } => {
            let page = load_page(&url, page_file, &config).await?;
            let resolver = build_resolver(&config)?;

            let spinner = create_spinner("Resolving transcript...");
            let transcript = resolver.resolve_transcript(&page).await;
            spinner.finish_and_clear();
            let transcript = transcript?;

            eprintln!(
                "{} Transcript from {}",
                style("✓").green().bold(),
                style(transcript.source.name()).dim()
            );
            println!("{}", format_transcript(&transcript, 100));
        }
        Commands::Guide {
            url,
            page_file,
            provider,
            model,
            json,
            quiz,
        } => {
            if let Some(provider) = provider {
                config.provider = provider.into();
            }
            if model.is_some() {
                config.model = model;
            }

            let service = build_service(&config)?;
            let page = load_page(&url, page_file, &config).await?;
            let resolver = build_resolver(&config)?;

            println!(
                "\n{}  {}\n",
                style("scholarsync").cyan().bold(),
                style("Study Guide").dim()
            );

            let spinner = create_spinner("Resolving transcript...");
            let transcript = resolver.resolve_transcript(&page).await;
            let transcript = match transcript {
                Ok(t) => {
                    spinner.finish_with_message(format!(
                        "{} Transcript: {} words from {}",
                        style("✓").green().bold(),
                        t.text.split_whitespace().count(),
                        style(t.source.name()).dim()
                    ));
                    t
                }
                Err(e) => {
                    spinner.finish_and_clear();
                    return Err(e.into());
                }
            };

            let spinner = create_spinner(&format!(
                "Generating study guide with {}...",
                service.backend_name()
            ));
            let guide = service.generate_guide(&transcript.text).await;
            spinner.finish_and_clear();
            let guide = guide?;
            println!(
                "{} Study guide generated ({})",
                style("✓").green().bold(),
                service.backend_name()
            );
            println!("{}", style("─".repeat(60)).dim());

            if json {
                println!("{}", serde_json::to_string_pretty(&guide)?);
                return Ok(());
            }

            let study_guide = StudyGuide::from_value(&guide)
                .context("Study guide has an unexpected shape; rerun with --json to see it")?;

            if quiz {
                println!("{}\n", study_guide.summary);
                quiz::run(&study_guide).await?;
            } else {
                println!("{}", format_study_guide_readable(&study_guide));
                println!("{}", style("Answers").bold());
                println!("{}", format_answer_key(&study_guide));
            }
        }
        Commands::Modify {
            action,
            to,
            text,
            provider,
        } => {
            if let Some(provider) = provider {
                config.provider = provider.into();
            }
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut buf)
                        .await
                        .context("Failed to read text from stdin")?;
                    buf
                }
            };
            let action = match action {
                ModifyAction::Translate { .. } => ModifyAction::translate_to(to.as_deref()),
                other => other,
            };

            let service = build_service(&config)?;
            let spinner = create_spinner(&format!("Running {}...", action.name()));
            let modified = service.modify_text(&text, &action).await;
            spinner.finish_and_clear();
            println!("{}", modified?);
        }
    }

    Ok(())
}

fn build_service(config: &Config) -> Result<StudyGuideService> {
    let backend = build_with_fallback(
        &config.backend_settings(),
        config.fallback_settings().as_ref(),
    )?;
    Ok(StudyGuideService::new(backend, config.retry.clone()))
}

fn build_resolver(config: &Config) -> Result<TranscriptResolver> {
    let fetcher = HttpCaptionFetcher::new(config.request_timeout(), config.session_cookie.clone())?;
    Ok(TranscriptResolver::new(
        Arc::new(fetcher),
        config.timed_text_probe(),
    ))
}

/// A saved page when given, otherwise the live page. A page that fails to
/// download still leaves the URL for the timed-text probes.
async fn load_page(url: &str, page_file: Option<PathBuf>, config: &Config) -> Result<WatchPage> {
    if let Some(path) = page_file {
        let html = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read page file {}", path.display()))?;
        return Ok(WatchPage::from_html(url, html));
    }

    let spinner = create_spinner("Loading video page...");
    let page = match WatchPage::fetch(url, config.request_timeout()).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(error = %e, "watch page unavailable, continuing with the URL only");
            WatchPage::from_url(url)
        }
    };
    spinner.finish_and_clear();
    Ok(page)
}
