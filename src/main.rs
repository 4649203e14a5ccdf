//! Pushbell CLI - push notification lifecycle demo.
//!
//! This is the main binary entry point. See the `pushbell` library for the
//! core functionality.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use pushbell::env::Environment;
use pushbell::notifications::{
    Alerter, ExpoPushClient, FixedAnswer, LocalNotificationService, LogAlerter,
    NotificationCenter, NotificationService, PermissionPrompt, PushMessage, PushRelay,
};
use pushbell::tui::{self, TerminalGuard, TuiRunner};
use pushbell::{constants, Config, ControllerParts, LifecycleController};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Global allocator configured per M-MIMALLOC-APPS guideline.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Global flag for signal-triggered shutdown (as Arc for signal-hook compatibility)
static SHUTDOWN_FLAG: std::sync::LazyLock<Arc<AtomicBool>> =
    std::sync::LazyLock::new(|| Arc::new(AtomicBool::new(false)));

fn register_signal_handlers() -> Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::flag;
    flag::register(SIGINT, Arc::clone(&SHUTDOWN_FLAG))?;
    flag::register(SIGTERM, Arc::clone(&SHUTDOWN_FLAG))?;
    flag::register(SIGHUP, Arc::clone(&SHUTDOWN_FLAG))?;
    Ok(())
}

/// Where TUI mode writes its log.
///
/// Priority: `PUSHBELL_LOG_FILE`, then the config directory, then `/tmp`.
fn log_path() -> PathBuf {
    if let Ok(path) = std::env::var("PUSHBELL_LOG_FILE") {
        return PathBuf::from(path);
    }
    Config::config_dir()
        .map(|dir| dir.join(constants::LOG_FILE_NAME))
        .unwrap_or_else(|_| PathBuf::from("/tmp").join(constants::LOG_FILE_NAME))
}

/// Sets up env_logger. The TUI owns the screen, so it logs to a file.
fn init_logging(to_file: bool) -> Result<()> {
    let environment = Environment::current();
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(environment.default_log_filter()),
    );
    builder.format_timestamp_secs();

    if to_file {
        let path = log_path();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create log file at {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    log::info!("[Main] Pushbell v{} ({environment})", env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Service and controller for one session.
struct Session {
    controller: Arc<LifecycleController>,
    service: Arc<LocalNotificationService>,
}

fn build_session(
    config: &Config,
    prompt: Arc<dyn PermissionPrompt>,
    alerter: Arc<dyn Alerter>,
) -> Session {
    let center = NotificationCenter::new();
    let service = Arc::new(LocalNotificationService::new(Arc::clone(&center), prompt));
    let relay = Arc::new(ExpoPushClient::new(
        reqwest::Client::new(),
        config.relay_url.clone(),
    ));
    let parts = ControllerParts::from_config(
        config,
        Arc::clone(&service) as Arc<dyn NotificationService>,
        center,
        relay,
        alerter,
    );
    Session {
        controller: Arc::new(LifecycleController::new(parts)),
        service,
    }
}

/// Runs the single-screen TUI.
fn run_tui(config: &Config) -> Result<()> {
    register_signal_handlers()?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start Tokio runtime")?;

    let (tx, rx) = tui::ui_channel();
    let session = build_session(
        config,
        Arc::new(tui::TuiPrompt::new(tx.clone())),
        Arc::new(tui::TuiAlerter::new(tx)),
    );

    let _terminal_guard = TerminalGuard::enter()?;
    let terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    let mut runner = TuiRunner::new(
        terminal,
        session.controller,
        session.service,
        rx,
        runtime.handle().clone(),
        Arc::clone(&SHUTDOWN_FLAG),
    );
    runner.run()
}

/// Resolves once a shutdown signal has been received.
async fn wait_for_shutdown() {
    while !SHUTDOWN_FLAG.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

fn print_screen(controller: &LifecycleController) {
    let screen = controller.snapshot();
    println!("Title: {}", screen.title.unwrap_or_default());
    println!("Body: {}", screen.body.unwrap_or_default());
    println!("Data: {}", screen.data.unwrap_or_default());
}

/// Runs without a screen: mount, optionally fire notifications, report.
fn run_headless(config: &Config, local: bool, remote: bool) -> Result<()> {
    register_signal_handlers()?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start Tokio runtime")?;
    let session = build_session(
        config,
        Arc::new(FixedAnswer(config.auto_grant)),
        Arc::new(LogAlerter),
    );
    let controller = scopeguard::guard(session.controller, |controller| controller.unmount());

    runtime.block_on(async {
        match controller.mount().await {
            Some(token) => println!("Your expo push token: {token}"),
            None => println!("No push token ({:?})", controller.registration_state()),
        }
        let mut notifications = controller.watch_notifications();

        let remote_send = remote.then(|| controller.send_remote());

        if local {
            let identifier = controller.schedule_local().await?;
            println!("Scheduled local notification {identifier}");
            tokio::select! {
                changed = notifications.changed() => {
                    if changed.is_ok() {
                        print_screen(&controller);
                    }
                }
                () = wait_for_shutdown() => return Ok(()),
            }
        }

        if let Some(handle) = remote_send {
            println!("Remote notification queued, sending in {:?}", config.remote_delay());
            tokio::select! {
                sent = handle => match sent {
                    Ok(Ok(())) => println!("Remote notification sent"),
                    Ok(Err(e)) => println!("Remote notification failed: {e}"),
                    Err(e) => println!("Remote notification task failed: {e}"),
                },
                () = wait_for_shutdown() => return Ok(()),
            }
        }

        if !local && !remote {
            println!("Listening for notifications. Press Ctrl-C to quit.");
            loop {
                tokio::select! {
                    changed = notifications.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        print_screen(&controller);
                    }
                    () = wait_for_shutdown() => break,
                }
            }
        }

        Ok::<(), anyhow::Error>(())
    })
}

/// Sends the remote notification to `token` once.
fn run_send(config: &Config, token: &str, now: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start Tokio runtime")?;
    let relay = ExpoPushClient::new(reqwest::Client::new(), config.relay_url.clone());
    runtime.block_on(async {
        if !now {
            println!("Sending in {:?}...", config.remote_delay());
            tokio::time::sleep(config.remote_delay()).await;
        }
        relay.send(&PushMessage::remote_demo(token)).await?;
        println!("Sent to {}", relay.endpoint());
        Ok(())
    })
}

// CLI
#[derive(Parser)]
#[command(name = "pushbell")]
#[command(version)]
#[command(about = "Push notification lifecycle demo")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the notification screen (default)
    Start {
        /// Run without the TUI
        #[arg(long)]
        headless: bool,
        /// Headless: schedule the local notification after mounting
        #[arg(long)]
        local: bool,
        /// Headless: send the remote notification after mounting
        #[arg(long)]
        remote: bool,
    },
    /// Send the remote notification to a push token
    Send {
        /// Recipient push token (e.g. "ExponentPushToken[...]")
        #[arg(long)]
        token: String,
        /// Skip the remote delay
        #[arg(long)]
        now: bool,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Start {
        headless: false,
        local: false,
        remote: false,
    });

    let tui_mode = matches!(command, Commands::Start { headless: false, .. });
    init_logging(tui_mode)?;

    if tui_mode {
        // Restore the terminal before the default hook prints the panic.
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            log::error!("PANIC: {:?}", panic_info);
            TerminalGuard::restore();
            default_hook(panic_info);
        }));
    }

    let config = Config::load()?;

    match command {
        Commands::Start {
            headless: false, ..
        } => run_tui(&config)?,
        Commands::Start {
            headless: true,
            local,
            remote,
        } => run_headless(&config, local, remote)?,
        Commands::Send { token, now } => run_send(&config, &token, now)?,
        Commands::Config => {
            println!("# {}", Config::config_dir()?.join("config.json").display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
