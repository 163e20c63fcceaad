use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use link_previewer::{
    render_cards, CardStyle, ClipboardProvider, Fetcher, FetcherConfig, NoClipboard,
    NotificationKind, PreviewSession, SessionConfig, SubmitOutcome, UiState, ERROR_BANNER,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(
    name = "link-previewer",
    version,
    about = "Type or paste several links and get all their preview cards at once"
)]
struct Cli {
    /// Text containing links. When given, previews it once and exits.
    text: Vec<String>,

    /// Base URL of the preview service (overrides LINK_PREVIEW_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in milliseconds (overrides LINK_PREVIEW_TIMEOUT_MS)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// How long notifications stay visible, in milliseconds
    #[arg(long, default_value_t = 2500)]
    toast_ms: u64,

    /// Card width in terminal columns
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// Do not read the system clipboard
    #[arg(long)]
    no_clipboard: bool,

    /// Also log to stderr, at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Directory for the rolling log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

const HELP: &str = "\
  Type or paste multiple links and press Enter to get all preview cards at a time
  :paste   use the links found on your clipboard
  :open N  open card N in your browser
  :clear   clear the links and cards
  :quit    leave";

const PASTE_AFTER_ERROR: &str = "The last request failed; :clear or search again before pasting.";

enum Command {
    Paste,
    Clear,
    Open(Option<usize>),
    Help,
    Quit,
    Search(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some(":paste" | ":p") => Command::Paste,
        Some(":clear" | ":c") => Command::Clear,
        Some(":open" | ":o") => Command::Open(
            parts
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1)),
        ),
        Some(":help" | ":h" | "?") => Command::Help,
        Some(":quit" | ":q") => Command::Quit,
        _ => Command::Search(line.to_string()),
    }
}

#[cfg(feature = "logging")]
fn init_logging(cli: &Cli) {
    let config = link_previewer::LogConfig {
        log_dir: cli.log_dir.clone(),
        log_level: if cli.verbose { "debug" } else { "info" }.into(),
        console_output: cli.verbose,
        file_output: true,
    };
    if let Err(e) = link_previewer::setup_logging(config) {
        eprintln!("{}: logging disabled ({e})", "Warning".yellow());
    }
}

#[cfg(not(feature = "logging"))]
fn init_logging(_cli: &Cli) {}

fn clipboard_provider(cli: &Cli) -> Box<dyn ClipboardProvider> {
    #[cfg(feature = "clipboard")]
    if !cli.no_clipboard {
        return Box::new(link_previewer::SystemClipboard::new());
    }
    let _ = cli;
    Box::new(NoClipboard)
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Getting metadata...");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

async fn run_submit<F>(session: &mut PreviewSession<F>, paste: bool) -> SubmitOutcome
where
    F: link_previewer::PreviewFetcher,
{
    let input = session.input().to_string();
    let pb = spinner();
    let outcome = if paste {
        session.paste_clipboard_urls().await
    } else {
        session.submit().await
    };
    pb.finish_and_clear();

    #[cfg(feature = "logging")]
    match (&outcome, session.last_error()) {
        (SubmitOutcome::Succeeded(_), _) => {
            for preview in session.results() {
                link_previewer::log_preview_card(preview);
            }
        }
        (SubmitOutcome::Failed(_), Some(e)) => link_previewer::log_error_card(&input, e),
        _ => {}
    }
    debug!(input = %input, outcome = ?outcome, "Submit finished");
    outcome
}

fn show<F: link_previewer::PreviewFetcher>(session: &mut PreviewSession<F>, style: CardStyle) {
    for toast in session.active_notifications(Instant::now()) {
        match toast.kind {
            NotificationKind::Validation => println!("{}", toast.message.yellow().bold()),
            NotificationKind::RequestFailed => println!("{}", toast.message.red().bold()),
        }
    }

    match session.state() {
        UiState::Success(results) => println!("{}", render_cards(results, style)),
        UiState::Error => println!("{}", ERROR_BANNER.red()),
        UiState::Idle | UiState::Loading => {}
    }
}

fn show_actions<F: link_previewer::PreviewFetcher>(session: &PreviewSession<F>) {
    let mut actions = Vec::new();
    if session.can_paste() {
        actions.push(format!(
            ":paste ({} URLs on clipboard)",
            session.clipboard_urls().len()
        ));
    }
    if session.can_clear() {
        actions.push(":clear".to_string());
    }
    if !actions.is_empty() {
        println!("{}", actions.join("   ").dimmed());
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut fetcher_config = FetcherConfig::from_env();
    if let Some(endpoint) = &cli.endpoint {
        fetcher_config = fetcher_config.with_endpoint(endpoint.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        fetcher_config = fetcher_config.with_timeout(Duration::from_millis(ms));
    }

    let fetcher = Fetcher::new_with_config(fetcher_config).inspect_err(|e| e.log())?;
    let session_config =
        SessionConfig::default().with_toast_duration(Duration::from_millis(cli.toast_ms));
    let mut session = PreviewSession::with_config(fetcher, session_config);
    let style = CardStyle {
        width: cli.width,
        ..Default::default()
    };

    if !cli.text.is_empty() {
        session.set_input(cli.text.join(" "));
        let outcome = run_submit(&mut session, false).await;
        show(&mut session, style);
        return Ok(match outcome {
            SubmitOutcome::Succeeded(_) => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        });
    }

    let mut clipboard = clipboard_provider(&cli);
    println!("{}", "Link Previewer".bold().green());
    println!("{}", HELP.dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        session.focus(clipboard.as_mut());
        show_actions(&session);
        print!("{} ", ">".green().bold());
        std::io::Write::flush(&mut std::io::stdout())?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => println!("{}", HELP.dimmed()),
            Command::Clear => {
                session.clear();
                println!("{}", "Cleared.".dimmed());
            }
            Command::Open(index) => match index.and_then(|i| session.open_target(i)) {
                Some(url) => {
                    if let Err(e) = open::that(url) {
                        warn!(error = %e, url = %url, "Failed to open browser");
                        println!("{}: {url}", "Could not open".red());
                    }
                }
                None => println!("{}", "No such card.".yellow()),
            },
            Command::Paste => {
                if session.can_paste() {
                    run_submit(&mut session, true).await;
                    show(&mut session, style);
                } else if session.clipboard_urls().is_empty() {
                    println!("{}", "No URLs on clipboard.".yellow());
                } else {
                    println!("{}", PASTE_AFTER_ERROR.yellow());
                }
            }
            Command::Search(text) => {
                if text.is_empty() {
                    continue;
                }
                session.set_input(text);
                run_submit(&mut session, false).await;
                show(&mut session, style);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
