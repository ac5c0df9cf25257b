use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use studyos::app::{PanelState, TaskPanel};
use studyos::client::{Dispatcher, HttpTransport};
use studyos::config::{default_config_path, find_config_file, load_config, Config, ConfigFile};
use studyos::export;
use studyos::models::{StudyRequest, StudyResult};
use studyos::ui::{self, present, print_status, Palette, Spinner, Status, Theme};
use studyos::utils::{is_stderr_terminal, is_terminal, terminal_width};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// AI StudyOS - doubt solver, exam planner, video summarizer and revision notes
#[derive(Parser, Debug)]
#[command(name = "studyos")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Study assistant backed by the AI StudyOS service", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service base URL (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Colour theme
    #[arg(long, global = true)]
    theme: Option<Theme>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// Directory exported PDFs are written to (overrides config)
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Text on a terminal, JSON otherwise
    Auto,
    /// Human-readable text
    Text,
    /// JSON (machine-readable)
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the AI doubt solver a question
    #[command(alias = "d")]
    Doubt {
        /// The question to explain
        question: String,

        /// Also export the explanation as PDF
        #[arg(long)]
        pdf: bool,
    },

    /// Generate a day-by-day exam study plan
    #[command(alias = "p")]
    Plan {
        /// Subjects to cover
        #[arg(long, default_value = "")]
        subjects: String,

        /// Syllabus or chapters
        #[arg(long, default_value = "")]
        syllabus: String,

        /// Exam date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        exam_date: String,

        /// Study hours available per day
        #[arg(long, default_value = "")]
        hours_per_day: String,

        /// Also export the plan as PDF
        #[arg(long)]
        pdf: bool,
    },

    /// Summarize a YouTube video
    #[command(alias = "summary")]
    Summarize {
        /// Video URL
        url: String,

        /// Also export the summary as PDF
        #[arg(long)]
        pdf: bool,
    },

    /// Generate revision notes for a topic
    #[command(alias = "n")]
    Notes {
        /// Topic to revise
        topic: String,

        /// Optional source material to base the notes on
        #[arg(long, default_value = "")]
        content: String,

        /// Also export the notes as PDF
        #[arg(long)]
        pdf: bool,
    },

    /// Check that the service is reachable
    Health,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Where to write (default: the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Commands {
    /// The study request this command submits, and whether to export it
    fn study_request(&self) -> Option<(StudyRequest, bool)> {
        match self {
            Commands::Doubt { question, pdf } => Some((StudyRequest::doubt(question.as_str()), *pdf)),
            Commands::Plan {
                subjects,
                syllabus,
                exam_date,
                hours_per_day,
                pdf,
            } => Some((
                StudyRequest::plan(
                    subjects.as_str(),
                    syllabus.as_str(),
                    exam_date.as_str(),
                    hours_per_day.as_str(),
                ),
                *pdf,
            )),
            Commands::Summarize { url, pdf } => Some((StudyRequest::summary(url.as_str()), *pdf)),
            Commands::Notes {
                topic,
                content,
                pdf,
            } => Some((StudyRequest::notes(topic.as_str(), content.as_str()), *pdf)),
            Commands::Health | Commands::Config { .. } => None,
        }
    }
}

/// Print all environment variables used by the application
fn print_env_vars() {
    println!("Environment Variables for AI StudyOS");
    println!("====================================");
    println!();
    println!("Service:");
    println!("  STUDYOS_SERVICE__BASE_URL           Service base URL (default: http://127.0.0.1:8000)");
    println!("  STUDYOS_SERVICE__TIMEOUT_SECONDS    Request timeout in seconds (default: none)");
    println!("  STUDYOS_SERVICE__ENDPOINTS__DOUBT   Base URL for the doubt solver only");
    println!("  STUDYOS_SERVICE__ENDPOINTS__PLAN    Base URL for the exam planner only");
    println!("  STUDYOS_SERVICE__ENDPOINTS__SUMMARY Base URL for the video summarizer only");
    println!("  STUDYOS_SERVICE__ENDPOINTS__NOTES   Base URL for revision notes only");
    println!();
    println!("Export:");
    println!("  STUDYOS_EXPORT__DIRECTORY           Directory PDFs are written to (default: .)");
    println!();
    println!("Display:");
    println!("  STUDYOS_UI__THEME                   light or dark (default: light)");
    println!("  NO_COLOR                            Disable coloured output");
    println!();
    println!("Logging:");
    println!("  STUDYOS_LOGGING__LEVEL              Log level (default: info)");
    println!("  STUDYOS_LOGGING__FORMAT             Set to json for structured logs");
    println!("  RUST_LOG                            Overrides all other log settings");
    println!();
    println!("Example:");
    println!("  export STUDYOS_SERVICE__BASE_URL=\"http://192.168.1.20:8000\"");
}

/// Apply command-line overrides on top of file and environment settings
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.service.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.service.timeout_seconds = Some(timeout);
    }
    if let Some(theme) = cli.theme {
        config.ui.theme = theme;
    }
    if let Some(dir) = &cli.export_dir {
        config.export.directory = dir.clone();
    }
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("studyos={}", level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let endpoints = config
        .endpoints()
        .context("Invalid service address in configuration")?;
    let transport =
        HttpTransport::with_timeout(config.timeout()).context("Failed to create HTTP client")?;
    Ok(Dispatcher::new(Arc::new(transport), endpoints))
}

/// Topic shown in the PDF header; only notes carry one
fn export_topic(request: &StudyRequest) -> &str {
    match request {
        StudyRequest::Notes { .. } => request.topic(),
        _ => "",
    }
}

fn emit(result: &StudyResult, format: OutputFormat, colored: bool) -> Result<()> {
    let as_json = match format {
        OutputFormat::Json => true,
        OutputFormat::Text => false,
        OutputFormat::Auto => !is_terminal(),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!(
            "{}",
            present(result, &Palette::current(colored), terminal_width())
        );
    }
    Ok(())
}

async fn run_task(
    cli: &Cli,
    config: &Config,
    request: StudyRequest,
    pdf: bool,
    colored: bool,
) -> Result<()> {
    let dispatcher = build_dispatcher(config)?;
    let kind = request.kind();
    let mut panel = TaskPanel::new(kind);

    let spinner = if cli.quiet || !is_stderr_terminal() {
        Spinner::hidden()
    } else {
        Spinner::new(kind.progress_message())
    };
    let state = panel.submit(&dispatcher, &request).await;
    spinner.finish();

    match state? {
        PanelState::Showing(result) => {
            emit(result, cli.output, colored)?;

            if pdf {
                let document = export::export(export_topic(&request), result);
                let path = export::save(&document, &config.export.directory)
                    .with_context(|| format!("Failed to export {}", document.file_name))?;
                if !cli.quiet {
                    print_status(
                        Status::Export,
                        &format!("Saved {}", path.display()),
                        colored,
                    );
                }
            }
            Ok(())
        }
        PanelState::Failed(message) => {
            print_status(Status::Error, message, colored);
            std::process::exit(1);
        }
        PanelState::Idle | PanelState::Loading => bail!("{} request did not complete", kind),
    }
}

async fn run_health(config: &Config, colored: bool) -> Result<()> {
    let dispatcher = build_dispatcher(config)?;
    let base = dispatcher.endpoints().base_url().to_string();

    match dispatcher.health().await {
        Ok(message) => {
            print_status(Status::Success, &format!("{} ({})", message, base), colored);
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Health check failed: {}", e);
            print_status(
                Status::Error,
                &format!("Backend connection error ({})", base),
                colored,
            );
            std::process::exit(1);
        }
    }
}

fn run_config(
    action: &ConfigAction,
    config: &Config,
    source: Option<&PathBuf>,
    colored: bool,
) -> Result<()> {
    match action {
        ConfigAction::Init { path, force } => {
            let path = match path.clone().or_else(default_config_path) {
                Some(path) => path,
                None => bail!("No configuration directory found; pass --path"),
            };
            ConfigFile::create_default(&path).save(*force)?;
            print_status(
                Status::Success,
                &format!("Wrote {}", path.display()),
                colored,
            );
        }
        ConfigAction::Show => {
            let label = source
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string());
            print_status(Status::Info, &format!("Configuration from {}", label), colored);
            let file = ConfigFile {
                path: source.cloned().unwrap_or_default(),
                config: config.clone(),
            };
            print!("{}", file.to_toml()?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
        return Ok(());
    }

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;
    apply_overrides(&mut config, &cli);

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    ui::theme::set(config.ui.theme);
    let colored = !cli.no_color && is_terminal() && std::env::var_os("NO_COLOR").is_none();

    let Some(command) = &cli.command else {
        print!("{}", ui::dashboard());
        return Ok(());
    };

    if let Some((request, pdf)) = command.study_request() {
        return run_task(&cli, &config, request, pdf, colored).await;
    }

    match command {
        Commands::Health => run_health(&config, colored).await,
        Commands::Config { action } => run_config(action, &config, config_path.as_ref(), colored),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["studyos"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert_eq!(cli.timeout, None);
        assert_eq!(cli.theme, None);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["studyos", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["studyos", "-vv", "health"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "studyos",
            "notes",
            "Optics",
            "--theme",
            "dark",
            "-o",
            "json",
            "--base-url",
            "http://10.0.0.5:8000",
        ]);
        assert_eq!(cli.theme, Some(Theme::Dark));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.5:8000"));
    }

    #[test]
    fn test_cli_doubt_command() {
        let cli = Cli::parse_from(["studyos", "doubt", "What is inertia?"]);
        let (request, pdf) = cli.command.unwrap().study_request().unwrap();
        assert_eq!(request, StudyRequest::doubt("What is inertia?"));
        assert!(!pdf);
    }

    #[test]
    fn test_cli_plan_command() {
        let cli = Cli::parse_from([
            "studyos",
            "plan",
            "--subjects",
            "Physics",
            "--syllabus",
            "Optics",
            "--exam-date",
            "2030-01-01",
            "--hours-per-day",
            "3",
            "--pdf",
        ]);
        let (request, pdf) = cli.command.unwrap().study_request().unwrap();
        assert_eq!(
            request,
            StudyRequest::plan("Physics", "Optics", "2030-01-01", "3")
        );
        assert!(pdf);
    }

    #[test]
    fn test_cli_plan_missing_fields_reach_validation() {
        let cli = Cli::parse_from(["studyos", "plan", "--subjects", "Physics"]);
        let (request, _) = cli.command.unwrap().study_request().unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_cli_notes_and_summary() {
        let cli = Cli::parse_from(["studyos", "notes", "Optics", "--content", "Snell's law"]);
        let (request, _) = cli.command.unwrap().study_request().unwrap();
        assert_eq!(request, StudyRequest::notes("Optics", "Snell's law"));
        assert_eq!(export_topic(&request), "Optics");

        let cli = Cli::parse_from(["studyos", "summary", "https://youtu.be/abc"]);
        let (request, _) = cli.command.unwrap().study_request().unwrap();
        assert_eq!(request, StudyRequest::summary("https://youtu.be/abc"));
        assert_eq!(export_topic(&request), "");
    }

    #[test]
    fn test_cli_config_commands() {
        let cli = Cli::parse_from(["studyos", "config", "init", "--force"]);
        match cli.command {
            Some(Commands::Config {
                action: ConfigAction::Init { force, path },
            }) => {
                assert!(force);
                assert!(path.is_none());
            }
            other => panic!("Expected config init, got {:?}", other),
        }

        let cli = Cli::parse_from(["studyos", "config", "show"]);
        assert!(cli.command.unwrap().study_request().is_none());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let cli = Cli::parse_from([
            "studyos",
            "--base-url",
            "http://10.0.0.5:8000",
            "--timeout",
            "12",
            "--theme",
            "dark",
            "--export-dir",
            "/tmp/pdfs",
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.service.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.service.timeout_seconds, Some(12));
        assert_eq!(config.ui.theme, Theme::Dark);
        assert_eq!(config.export.directory, PathBuf::from("/tmp/pdfs"));
    }
}
