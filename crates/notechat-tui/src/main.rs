//! notechat terminal front end.
//!
//! Opens a chat panel over the active document, and offers one-shot
//! subcommands for scripting.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use notechat_app::{AppContext, CredentialStore, GeminiFactory, SettingsStore};
use notechat_core::ChatRole;

mod app;
mod backend;
mod event;
mod sink;
mod state;
mod ui;

use app::App;
use event::{BackendCommand, UiEvent};
use sink::{NoPicker, StdoutSink};

#[derive(Parser)]
#[command(name = "notechat")]
#[command(about = "Chat with a language model about the document you are editing")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to <config dir>/notechat/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log file
    #[arg(long, global = true, default_value = "/tmp/notechat.log")]
    log_file: PathBuf,

    /// Model API endpoint prefix (defaults to the public Gemini endpoint)
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat panel
    Chat {
        /// Document used as page context
        #[arg(short, long)]
        document: Option<PathBuf>,
    },

    /// Store the API key (an empty string clears it)
    SetKey {
        key: String,
    },

    /// Ask a single question and print the answer
    Ask {
        question: String,

        /// Document used as page context
        #[arg(short, long)]
        document: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Write to a file to avoid terminal interference
    let log_file = std::fs::File::create(&cli.log_file).ok();
    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("notechat=debug,notechat_app=debug,notechat_client=debug")
        });
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter(filter)
            .with_ansi(false)
            .init();
    }

    let settings_path = match cli.settings {
        Some(path) => path,
        None => SettingsStore::default_path()?,
    };

    let factory = match cli.api_base_url {
        Some(url) => GeminiFactory::with_base_url(url),
        None => GeminiFactory::default(),
    };

    match cli.command {
        Commands::Chat { document } => run_chat_tui(settings_path, document, factory),
        Commands::SetKey { key } => set_key(settings_path, factory, &key),
        Commands::Ask { question, document } => ask(settings_path, document, factory, &question),
    }
}

fn run_chat_tui(
    settings_path: PathBuf,
    document: Option<PathBuf>,
    factory: GeminiFactory,
) -> Result<(), Box<dyn Error>> {
    info!(settings = %settings_path.display(), "Starting chat TUI");

    // Create channels for UI <-> backend communication
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(100);
    let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>(100);

    // Background thread with its own tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    let bg_handle = std::thread::spawn(move || {
        rt.block_on(backend::run_backend(
            settings_path,
            document,
            Arc::new(factory),
            ui_tx,
            cmd_rx,
        ));
    });

    let terminal = ratatui::init();

    let mut app = App::new(ui_rx, cmd_tx);
    app.open_on_start();
    let result = app.run(terminal);

    ratatui::restore();

    let _ = bg_handle.join();

    info!("TUI shutdown complete");

    if let Some(fatal) = app.fatal() {
        return Err(fatal.into());
    }

    result.map_err(|e| e.into())
}

fn set_key(
    settings_path: PathBuf,
    factory: GeminiFactory,
    key: &str,
) -> Result<(), Box<dyn Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let settings = Arc::new(SettingsStore::load(settings_path).await?);
        let credentials =
            CredentialStore::new(settings.clone(), Arc::new(factory)).await;
        credentials.set_key(key).await?;

        if credentials.has_client().await {
            println!("API key saved to {}", settings.path().display());
        } else {
            println!("API key cleared in {}", settings.path().display());
        }
        Ok::<(), Box<dyn Error>>(())
    })
}

fn ask(
    settings_path: PathBuf,
    document: Option<PathBuf>,
    factory: GeminiFactory,
    question: &str,
) -> Result<(), Box<dyn Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let ctx = AppContext::start(
            settings_path,
            document,
            Arc::new(factory),
            Arc::new(StdoutSink),
            Arc::new(NoPicker),
        )
        .await?;

        ctx.controller.open_session().await;
        ctx.controller.submit(question).await;

        let failed = ctx
            .controller
            .conversation()
            .await
            .last()
            .is_some_and(|m| m.role == ChatRole::Error);

        ctx.shutdown().await?;

        if failed {
            return Err("request failed".into());
        }
        Ok::<(), Box<dyn Error>>(())
    })
}
